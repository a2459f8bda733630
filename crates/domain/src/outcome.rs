//! Dispatch outcome — the single observable result of a control request.

use serde::{Deserialize, Serialize};

use crate::error::LightgateError;

/// Result of one control request: success flag plus, on failure, one
/// human-readable error detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DispatchOutcome {
    #[must_use]
    pub fn succeeded() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(error: &LightgateError) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
        }
    }
}

impl From<&Result<(), LightgateError>> for DispatchOutcome {
    fn from(result: &Result<(), LightgateError>) -> Self {
        match result {
            Ok(()) => Self::succeeded(),
            Err(err) => Self::failed(err),
        }
    }
}
