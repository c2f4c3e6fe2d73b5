//! API types.

mod responses;

pub use responses::HealthResponse;
