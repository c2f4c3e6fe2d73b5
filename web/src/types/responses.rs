//! Response types for the web API.
//!
//! The game endpoints speak the plain-text snapshot grammar; only the
//! health check returns JSON.

use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
