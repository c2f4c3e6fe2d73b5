use super::*;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::yield_now;
use tokio::time::timeout;

/// The canonical 3x3 board: three matching pairs plus one extra card.
///
/// ```text
/// u u a
/// b b c
/// c a x
/// ```
const PERFECT: &str = "3x3\nu\nu\na\nb\nb\nc\nc\na\nx\n";

fn board() -> Board {
    Board::parse(PERFECT).expect("perfect board should parse")
}

fn shared() -> Arc<Board> {
    Arc::new(board())
}

fn p(row: usize, col: usize) -> Position {
    Position::new(row, col)
}

/// Lets spawned tasks run up to their next suspension point.
async fn breathe() {
    for _ in 0..16 {
        yield_now().await;
    }
}

/// The snapshot line for a cell of a 3-column board (line 0 is the header).
fn cell_line(snapshot: &str, row: usize, col: usize) -> &str {
    snapshot
        .lines()
        .nth(1 + row * 3 + col)
        .expect("snapshot should cover the whole board")
}

// =========================================================================
// Parser
// =========================================================================

#[test]
fn test_parse_perfect_board() {
    let board = board();
    assert_eq!(board.rows(), 3);
    assert_eq!(board.cols(), 3);
}

#[test]
fn test_parse_accepts_crlf_and_missing_trailing_newline() {
    let board = Board::parse("1x2\r\nA\r\nB").expect("CRLF board should parse");
    assert_eq!(board.rows(), 1);
    assert_eq!(board.cols(), 2);
}

#[test]
fn test_parse_rejects_bad_headers() {
    for text in [
        "",
        "3y3\na\n",
        "x3\na\na\na\n",
        "3x\na\na\na\n",
        "3x3x3\na\n",
        "-1x3\na\na\na\n",
        "3x 3\na\n",
        "0x3\n",
        "3x0\n",
    ] {
        let result = Board::parse(text);
        assert!(
            matches!(result, Err(BoardError::Parse(_))),
            "header of {:?} should be rejected",
            text
        );
    }
}

#[test]
fn test_parse_rejects_wrong_card_count() {
    // Too few, too many, and a blank line in the middle.
    for text in ["2x2\na\nb\nc\n", "1x1\na\nb\n", "2x2\na\n\nb\nc\nd\n"] {
        let result = Board::parse(text);
        assert!(
            matches!(result, Err(BoardError::Parse(_))),
            "{:?} should be rejected",
            text
        );
    }
}

#[test]
fn test_parse_rejects_invalid_labels() {
    for text in ["1x1\na b\n", "1x1\na\tb\n", "1x2\nok\n \n"] {
        let result = Board::parse(text);
        assert!(
            matches!(result, Err(BoardError::Parse(_))),
            "{:?} should be rejected",
            text
        );
    }
}

#[test]
fn test_valid_label() {
    assert!(valid_label("u"));
    assert!(valid_label("T_u"));
    assert!(valid_label("🦀"));
    assert!(!valid_label(""));
    assert!(!valid_label("a b"));
    assert!(!valid_label("a\tb"));
    assert!(!valid_label("a\nb"));
    assert!(!valid_label("a\rb"));
}

// =========================================================================
// Snapshot rendering
// =========================================================================

#[tokio::test]
async fn test_snapshot_initial_board_all_down() {
    let board = board();
    let view = board.snapshot("alice").await;
    assert_eq!(view, "3x3\ndown\ndown\ndown\ndown\ndown\ndown\ndown\ndown\ndown\n");
}

#[tokio::test]
async fn test_snapshot_idempotent_without_mutation() {
    let board = board();
    board
        .flip_first("alice", p(0, 0))
        .await
        .expect("flip should succeed");
    let first = board.snapshot("alice").await;
    let second = board.snapshot("alice").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_snapshot_perspective() {
    let board = board();
    board
        .flip_first("alice", p(0, 0))
        .await
        .expect("flip should succeed");
    // The controller sees "my", everyone else sees "up".
    assert_eq!(cell_line(&board.snapshot("alice").await, 0, 0), "my u");
    assert_eq!(cell_line(&board.snapshot("bob").await, 0, 0), "up u");
}

// =========================================================================
// First flips
// =========================================================================

#[tokio::test]
async fn test_first_flip_turns_card_up_and_takes_control() {
    let board = board();
    board
        .flip_first("alice", p(0, 0))
        .await
        .expect("down card should be flippable");
    assert!(board.has_first_selection("alice").await);
    assert_eq!(cell_line(&board.snapshot("alice").await, 0, 0), "my u");
}

#[tokio::test]
async fn test_first_flip_out_of_bounds() {
    let board = board();
    let result = board.flip_first("alice", p(3, 0)).await;
    assert_eq!(result, Err(BoardError::OutOfBounds(p(3, 0))));
    let result = board.flip_first("alice", p(0, 9)).await;
    assert_eq!(result, Err(BoardError::OutOfBounds(p(0, 9))));
}

#[tokio::test]
async fn test_first_flip_on_empty_space_fails() {
    let board = board();
    // Match the u pair and take it off the board.
    board.flip_first("alice", p(0, 0)).await.expect("first");
    board.flip_second("alice", p(0, 1)).await.expect("second");
    board.flip_first("alice", p(2, 2)).await.expect("third");

    let result = board.flip_first("bob", p(0, 0)).await;
    assert_eq!(result, Err(BoardError::EmptySpace(p(0, 0))));
}

#[tokio::test]
async fn test_first_flip_takes_over_uncontrolled_face_up_card_silently() {
    let board = shared();
    // Leave a and c face up and uncontrolled via a mismatch.
    board.flip_first("alice", p(0, 2)).await.expect("first");
    board.flip_second("alice", p(1, 2)).await.expect("second");

    let watcher = {
        let b = board.clone();
        tokio::spawn(async move { b.watch("carol").await })
    };
    breathe().await;

    // Control transfer with no face change: no notification.
    board.flip_first("bob", p(0, 2)).await.expect("takeover");
    breathe().await;
    assert_eq!(cell_line(&board.snapshot("bob").await, 0, 2), "my a");
    assert!(
        !watcher.is_finished(),
        "control-only change must not wake watchers"
    );
    watcher.abort();
}

#[tokio::test]
async fn test_non_waiting_first_flip_fails_on_held_card() {
    let board = board();
    board.flip_first("alice", p(0, 0)).await.expect("first");

    let result = board.try_flip_first("bob", p(0, 0)).await;
    assert_eq!(result, Err(BoardError::Contested(p(0, 0))));

    // The holder itself may re-acquire freely.
    board
        .try_flip_first("alice", p(0, 0))
        .await
        .expect("holder keeps control");
}

// =========================================================================
// Second flips
// =========================================================================

#[tokio::test]
async fn test_second_flip_without_first_fails() {
    let board = board();
    let result = board.flip_second("alice", p(0, 0)).await;
    assert_eq!(result, Err(BoardError::NoFirst));
}

#[tokio::test]
async fn test_second_flip_on_empty_target_aborts_turn() {
    let board = board();
    // Empty (0,0) and (0,1), then pick up x.
    board.flip_first("alice", p(0, 0)).await.expect("first");
    board.flip_second("alice", p(0, 1)).await.expect("second");
    board.flip_first("alice", p(2, 2)).await.expect("pick up x");

    let result = board.flip_second("alice", p(0, 0)).await;
    assert_eq!(result, Err(BoardError::EmptyTarget(p(0, 0))));
    // The first selection is released, not turned down, and the turn is over.
    assert_eq!(cell_line(&board.snapshot("alice").await, 2, 2), "up x");
    assert!(!board.has_first_selection("alice").await);
    assert_eq!(
        board.flip_second("alice", p(1, 0)).await,
        Err(BoardError::NoFirst)
    );
}

#[tokio::test]
async fn test_second_flip_on_held_card_aborts_turn() {
    let board = board();
    board.flip_first("bob", p(1, 0)).await.expect("bob's card");
    board.flip_first("alice", p(0, 0)).await.expect("alice's card");

    let result = board.flip_second("alice", p(1, 0)).await;
    assert_eq!(result, Err(BoardError::SecondContested(p(1, 0))));
    assert_eq!(cell_line(&board.snapshot("alice").await, 0, 0), "up u");
    assert_eq!(cell_line(&board.snapshot("bob").await, 1, 0), "my b");
    assert!(!board.has_first_selection("alice").await);
}

#[tokio::test]
async fn test_second_flip_on_own_first_card_is_denied() {
    let board = board();
    board.flip_first("alice", p(0, 0)).await.expect("first");
    let result = board.flip_second("alice", p(0, 0)).await;
    assert_eq!(result, Err(BoardError::SecondContested(p(0, 0))));
    assert_eq!(cell_line(&board.snapshot("alice").await, 0, 0), "up u");
}

#[tokio::test]
async fn test_matched_pair_stays_up_then_leaves_the_board() {
    let board = board();
    board.flip_first("alice", p(0, 0)).await.expect("first");
    board.flip_second("alice", p(0, 1)).await.expect("second");

    let view = board.snapshot("alice").await;
    assert_eq!(cell_line(&view, 0, 0), "my u");
    assert_eq!(cell_line(&view, 0, 1), "my u");

    // The next first move consumes the match: both cards are removed.
    board.flip_first("alice", p(2, 2)).await.expect("next move");
    let view = board.snapshot("alice").await;
    assert_eq!(cell_line(&view, 0, 0), "none");
    assert_eq!(cell_line(&view, 0, 1), "none");
    assert_eq!(cell_line(&view, 2, 2), "my x");
}

#[tokio::test]
async fn test_mismatched_pair_turns_down_on_next_move() {
    let board = board();
    board.flip_first("alice", p(0, 0)).await.expect("first");
    board.flip_second("alice", p(0, 2)).await.expect("second");

    // Both stay up, uncontrolled, until alice moves again.
    let view = board.snapshot("alice").await;
    assert_eq!(cell_line(&view, 0, 0), "up u");
    assert_eq!(cell_line(&view, 0, 2), "up a");

    board.flip_first("alice", p(1, 0)).await.expect("next move");
    let view = board.snapshot("alice").await;
    assert_eq!(cell_line(&view, 0, 0), "down");
    assert_eq!(cell_line(&view, 0, 2), "down");
    assert_eq!(cell_line(&view, 1, 0), "my b");
}

#[tokio::test]
async fn test_mismatch_without_face_change_is_not_broadcast() {
    let board = shared();
    // Leave a and c face up and uncontrolled.
    board.flip_first("alice", p(0, 2)).await.expect("first");
    board.flip_second("alice", p(1, 2)).await.expect("second");
    board.flip_first("bob", p(0, 0)).await.expect("bob's first");

    let watcher = {
        let b = board.clone();
        tokio::spawn(async move { b.watch("carol").await })
    };
    breathe().await;

    // Second card already face up: mismatch releases control but turns
    // nothing, so watchers stay parked.
    board.flip_second("bob", p(0, 2)).await.expect("mismatch");
    breathe().await;
    assert!(!watcher.is_finished());
    watcher.abort();
}

#[tokio::test]
async fn test_stale_pending_outcome_skips_removed_cells() {
    let board = board();
    // Alice mismatches a and c, leaving both face up and unclaimed.
    board.flip_first("alice", p(0, 2)).await.expect("first");
    board.flip_second("alice", p(1, 2)).await.expect("second");

    // Bob claims the face-up a, matches it with the other a, and his next
    // move removes both. Alice's recorded mismatch now points at a hole.
    board.flip_first("bob", p(0, 2)).await.expect("claim a");
    board.flip_second("bob", p(2, 1)).await.expect("match a");
    board.flip_first("bob", p(2, 2)).await.expect("consume match");

    // Alice's cleanup skips the removed cell and still turns c down.
    board.flip_first("alice", p(1, 1)).await.expect("next move");
    let view = board.snapshot("alice").await;
    assert_eq!(cell_line(&view, 0, 2), "none");
    assert_eq!(cell_line(&view, 2, 1), "none");
    assert_eq!(cell_line(&view, 1, 2), "down");
    assert_eq!(cell_line(&view, 1, 1), "my b");
}

// =========================================================================
// Waiting first flips
// =========================================================================

#[tokio::test]
async fn test_waiters_resume_in_fifo_order() {
    let board = shared();
    board.flip_first("alice", p(0, 0)).await.expect("alice holds u");

    let bob = {
        let b = board.clone();
        tokio::spawn(async move { b.flip_first("bob", p(0, 0)).await })
    };
    breathe().await;
    let charlie = {
        let b = board.clone();
        tokio::spawn(async move { b.flip_first("charlie", p(0, 0)).await })
    };
    breathe().await;
    assert!(!bob.is_finished());
    assert!(!charlie.is_finished());

    // Alice mismatches u against c: one release on (0,0) wakes bob only.
    board.flip_second("alice", p(1, 2)).await.expect("mismatch");
    breathe().await;
    assert!(bob.is_finished(), "head waiter should have resumed");
    assert!(!charlie.is_finished(), "second waiter must stay queued");
    bob.await.expect("join").expect("bob should now hold the card");
    assert_eq!(cell_line(&board.snapshot("bob").await, 0, 0), "my u");

    // Alice's cleanup turns (1,2) down; (0,0) is bob's, so charlie stays put.
    board.flip_first("alice", p(2, 2)).await.expect("alice moves on");
    breathe().await;
    assert!(!charlie.is_finished());

    // Bob mismatches in turn, releasing (0,0) to charlie.
    board.flip_second("bob", p(1, 2)).await.expect("bob mismatch");
    breathe().await;
    assert!(charlie.is_finished());
    charlie
        .await
        .expect("join")
        .expect("charlie should now hold the card");
    assert_eq!(cell_line(&board.snapshot("charlie").await, 0, 0), "my u");
}

#[tokio::test]
async fn test_removal_fails_every_waiter() {
    let board = shared();
    board.flip_first("alice", p(0, 0)).await.expect("first");
    board.flip_second("alice", p(0, 1)).await.expect("match");

    let bob = {
        let b = board.clone();
        tokio::spawn(async move { b.flip_first("bob", p(0, 0)).await })
    };
    let charlie = {
        let b = board.clone();
        tokio::spawn(async move { b.flip_first("charlie", p(0, 0)).await })
    };
    breathe().await;
    assert!(!bob.is_finished());
    assert!(!charlie.is_finished());

    // Consuming the match removes (0,0): both waiters fail out.
    board.flip_first("alice", p(2, 2)).await.expect("consume match");
    breathe().await;
    assert_eq!(
        bob.await.expect("join"),
        Err(BoardError::EmptySpace(p(0, 0)))
    );
    assert_eq!(
        charlie.await.expect("join"),
        Err(BoardError::EmptySpace(p(0, 0)))
    );
}

#[tokio::test]
async fn test_second_flip_never_waits() {
    let board = board();
    board.flip_first("alice", p(0, 0)).await.expect("alice holds u");
    board.flip_first("bob", p(1, 1)).await.expect("bob holds b");

    // Against a held card the second flip must fail promptly, not queue.
    let result = timeout(
        Duration::from_millis(250),
        board.flip_second("bob", p(0, 0)),
    )
    .await
    .expect("second flip must resolve within 250ms");
    assert_eq!(result, Err(BoardError::SecondContested(p(0, 0))));
    assert_eq!(cell_line(&board.snapshot("bob").await, 1, 1), "up b");
}

#[tokio::test]
async fn test_cancelled_waiter_does_not_consume_a_wake() {
    let board = shared();
    board.flip_first("alice", p(0, 0)).await.expect("alice holds u");

    let bob = {
        let b = board.clone();
        tokio::spawn(async move { b.flip_first("bob", p(0, 0)).await })
    };
    breathe().await;
    let charlie = {
        let b = board.clone();
        tokio::spawn(async move { b.flip_first("charlie", p(0, 0)).await })
    };
    breathe().await;

    // Bob's client goes away while queued at the head.
    bob.abort();
    breathe().await;

    // The single release must reach charlie, not die with bob.
    board.flip_second("alice", p(1, 2)).await.expect("mismatch");
    breathe().await;
    assert!(charlie.is_finished(), "wake must pass over the dead waiter");
    charlie
        .await
        .expect("join")
        .expect("charlie should hold the card");
    assert_eq!(cell_line(&board.snapshot("charlie").await, 0, 0), "my u");
}

// =========================================================================
// Watching
// =========================================================================

#[tokio::test]
async fn test_watch_resolves_on_card_turning_up() {
    let board = shared();
    let watcher = {
        let b = board.clone();
        tokio::spawn(async move { b.watch("bob").await })
    };
    breathe().await;
    assert!(!watcher.is_finished());

    board.flip_first("alice", p(0, 0)).await.expect("flip");
    breathe().await;
    assert!(watcher.is_finished());
    let view = watcher.await.expect("join").expect("watch should resolve");
    assert_eq!(cell_line(&view, 0, 0), "up u");
}

#[tokio::test]
async fn test_watch_ignores_control_only_transfer() {
    let board = shared();
    // Leave a face-up unclaimed card behind.
    board.flip_first("alice", p(0, 2)).await.expect("first");
    board.flip_second("alice", p(1, 2)).await.expect("mismatch");

    let watcher = {
        let b = board.clone();
        tokio::spawn(async move { b.watch("bob").await })
    };
    breathe().await;

    // Claiming the face-up card changes control only.
    board.flip_first("charlie", p(0, 2)).await.expect("claim");
    breathe().await;
    assert!(!watcher.is_finished());

    // A card actually turning up does resolve the watch.
    board.flip_first("dave", p(2, 2)).await.expect("turn up x");
    breathe().await;
    let view = watcher.await.expect("join").expect("watch should resolve");
    assert_eq!(cell_line(&view, 2, 2), "up x");
}

#[tokio::test]
async fn test_watch_broadcast_reaches_every_watcher_with_its_own_view() {
    let board = shared();
    let alice_watch = {
        let b = board.clone();
        tokio::spawn(async move { b.watch("alice").await })
    };
    let bob_watch = {
        let b = board.clone();
        tokio::spawn(async move { b.watch("bob").await })
    };
    breathe().await;

    board.flip_first("alice", p(0, 0)).await.expect("flip");
    breathe().await;

    // Same logical state, rendered per viewer.
    let alice_view = alice_watch.await.expect("join").expect("resolve");
    let bob_view = bob_watch.await.expect("join").expect("resolve");
    assert_eq!(cell_line(&alice_view, 0, 0), "my u");
    assert_eq!(cell_line(&bob_view, 0, 0), "up u");
}

#[tokio::test]
async fn test_watch_not_woken_by_failed_operations() {
    let board = shared();
    // Empty (0,0)/(0,1) before the watcher arrives.
    board.flip_first("alice", p(0, 0)).await.expect("first");
    board.flip_second("alice", p(0, 1)).await.expect("match");
    board.flip_first("alice", p(2, 2)).await.expect("consume match");

    let watcher = {
        let b = board.clone();
        tokio::spawn(async move { b.watch("carol").await })
    };
    breathe().await;

    assert!(board.flip_first("bob", p(0, 0)).await.is_err());
    assert!(board.flip_first("bob", p(9, 9)).await.is_err());
    assert!(board.try_flip_first("bob", p(2, 2)).await.is_err());
    breathe().await;
    assert!(!watcher.is_finished(), "failures must not wake watchers");
    watcher.abort();
}

// =========================================================================
// Label transformation
// =========================================================================

#[tokio::test]
async fn test_map_rewrites_labels() {
    let board = board();
    board.flip_first("alice", p(2, 2)).await.expect("show x");

    let changed = board
        .map(|label| async move { format!("T_{}", label) })
        .await
        .expect("map should succeed");
    assert!(changed);
    assert_eq!(cell_line(&board.snapshot("alice").await, 2, 2), "my T_x");
}

#[tokio::test]
async fn test_identity_map_changes_nothing_and_stays_silent() {
    let board = shared();
    let watcher = {
        let b = board.clone();
        tokio::spawn(async move { b.watch("bob").await })
    };
    breathe().await;

    let changed = board
        .map(|label| async move { label })
        .await
        .expect("identity map should succeed");
    assert!(!changed);
    breathe().await;
    assert!(!watcher.is_finished(), "identity map must not wake watchers");
    watcher.abort();
}

#[tokio::test]
async fn test_map_rejects_invalid_labels_without_committing() {
    let board = board();
    board.flip_first("alice", p(0, 2)).await.expect("show a");

    // "a" transforms before "u" in label order; the bad result for "u"
    // must still abort the whole call.
    let result = board
        .map(|label| async move {
            if label == "u" {
                "not valid".to_string()
            } else {
                format!("T_{}", label)
            }
        })
        .await;
    assert_eq!(result, Err(BoardError::InvalidLabel("not valid".to_string())));
    assert_eq!(
        cell_line(&board.snapshot("alice").await, 0, 2),
        "my a",
        "a failed map must leave every label untouched"
    );
}

#[tokio::test]
async fn test_map_preserves_faces_and_control() {
    let board = board();
    board.flip_first("alice", p(0, 0)).await.expect("first");
    board.flip_second("alice", p(0, 1)).await.expect("match");

    board
        .map(|label| async move { format!("T_{}", label) })
        .await
        .expect("map should succeed");

    let view = board.snapshot("alice").await;
    assert_eq!(cell_line(&view, 0, 0), "my T_u");
    assert_eq!(cell_line(&view, 0, 1), "my T_u");
    assert_eq!(cell_line(&view, 1, 0), "down");

    // The recorded match still resolves against the renamed cards.
    board.flip_first("alice", p(2, 2)).await.expect("consume match");
    let view = board.snapshot("alice").await;
    assert_eq!(cell_line(&view, 0, 0), "none");
    assert_eq!(cell_line(&view, 0, 1), "none");
}

#[tokio::test]
async fn test_map_transform_runs_once_per_distinct_label() {
    let board = board();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    board
        .map(move |label| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                label
            }
        })
        .await
        .expect("map should succeed");
    // Nine cards, five distinct labels.
    assert_eq!(calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_map_skips_cells_removed_mid_flight() {
    let board = shared();
    let gate = Arc::new(Notify::new());

    // Hold the transform on "u" until the u pair is off the board.
    let map_task = {
        let b = board.clone();
        let gate = gate.clone();
        tokio::spawn(async move {
            b.map(move |label| {
                let gate = gate.clone();
                async move {
                    if label == "u" {
                        gate.notified().await;
                    }
                    format!("T_{}", label)
                }
            })
            .await
        })
    };
    breathe().await;
    assert!(!map_task.is_finished());

    board.flip_first("alice", p(0, 0)).await.expect("first");
    board.flip_second("alice", p(0, 1)).await.expect("match");
    board.flip_first("alice", p(2, 2)).await.expect("consume match");

    gate.notify_one();
    let changed = timeout(Duration::from_secs(1), map_task)
        .await
        .expect("map should finish once released")
        .expect("join")
        .expect("map should succeed");
    assert!(changed);

    let view = board.snapshot("alice").await;
    assert_eq!(cell_line(&view, 0, 0), "none");
    assert_eq!(cell_line(&view, 0, 1), "none");
    assert_eq!(cell_line(&view, 2, 2), "my T_x");
}

#[tokio::test]
async fn test_map_never_shows_a_half_renamed_group() {
    let board = shared();
    // Make both a cards visible and unclaimed via two mismatches.
    board.flip_first("alice", p(0, 2)).await.expect("first");
    board.flip_second("alice", p(1, 2)).await.expect("mismatch");
    board.flip_first("bob", p(2, 1)).await.expect("first");
    board.flip_second("bob", p(1, 0)).await.expect("mismatch");

    let view = board.snapshot("carol").await;
    assert_eq!(cell_line(&view, 0, 2), "up a");
    assert_eq!(cell_line(&view, 2, 1), "up a");

    // Stall the transform after "a" has been computed but before commit.
    let gate = Arc::new(Notify::new());
    let map_task = {
        let b = board.clone();
        let gate = gate.clone();
        tokio::spawn(async move {
            b.map(move |label| {
                let gate = gate.clone();
                async move {
                    if label == "b" {
                        gate.notified().await;
                    }
                    format!("T_{}", label)
                }
            })
            .await
        })
    };
    breathe().await;

    // Mid-map, both a cards still show the original label.
    let view = board.snapshot("carol").await;
    assert_eq!(cell_line(&view, 0, 2), "up a");
    assert_eq!(cell_line(&view, 2, 1), "up a");

    gate.notify_one();
    timeout(Duration::from_secs(1), map_task)
        .await
        .expect("map should finish once released")
        .expect("join")
        .expect("map should succeed");

    // Afterwards both renamed together.
    let view = board.snapshot("carol").await;
    assert_eq!(cell_line(&view, 0, 2), "up T_a");
    assert_eq!(cell_line(&view, 2, 1), "up T_a");
}

// =========================================================================
// Turn dispatch
// =========================================================================

#[tokio::test]
async fn test_flip_dispatch_alternates_first_and_second() {
    let board = board();
    board.flip("alice", p(0, 0)).await.expect("first");
    assert!(board.has_first_selection("alice").await);
    board.flip("alice", p(0, 1)).await.expect("second");
    assert!(!board.has_first_selection("alice").await);

    // The next flip starts a fresh pair and consumes the match.
    board.flip("alice", p(2, 2)).await.expect("first again");
    let view = board.snapshot("alice").await;
    assert_eq!(cell_line(&view, 0, 0), "none");
    assert_eq!(cell_line(&view, 0, 1), "none");
    assert_eq!(cell_line(&view, 2, 2), "my x");
}
