//! Shared request/response types used by API-facing crates.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/debug`. Both fields are optional on the wire and
/// default to empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugResponse {
    pub success: bool,
    pub suggestions: Vec<String>,
}

impl DebugResponse {
    #[must_use]
    pub fn ok(suggestions: Vec<String>) -> Self {
        Self {
            success: true,
            suggestions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}
