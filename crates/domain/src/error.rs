//! Error taxonomy shared across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`LightgateError`] via `#[from]`. No variant carries an untyped `String`
//! cause except where the hub itself only hands back text.

/// Top-level error for a single control or query request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LightgateError {
    /// The request could not be mapped to a target or an instruction.
    /// Raised before any hub call is made.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A single hub call failed.
    #[error(transparent)]
    Hub(#[from] HubError),

    /// At least one call of a group colour fanout failed.
    #[error(transparent)]
    Fanout(#[from] FanoutError),
}

impl LightgateError {
    /// Whether the request was rejected before reaching the hub.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Problems resolving the target or instruction of a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("no target id configured on the node or supplied with the request")]
    MissingTargetId,

    #[error("no target type configured on the node or supplied with the request")]
    MissingTargetKind,

    #[error("unknown target type {0:?}, expected \"device\" or \"group\"")]
    UnknownTargetKind(String),

    #[error("request carries no instruction")]
    EmptyInstruction,

    #[error("unrecognised command {0:?}")]
    UnrecognisedCommand(String),

    #[error("pairing requires the security code printed on the hub")]
    EmptySecurityCode,
}

/// Failures reported by the hub client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HubError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u32 },

    #[error("hub unreachable: {0}")]
    Unreachable(String),

    #[error("hub rejected the request: {0}")]
    Rejected(String),
}

impl HubError {
    /// Shorthand for a missing device.
    #[must_use]
    pub fn device_not_found(id: crate::id::DeviceId) -> Self {
        Self::NotFound {
            kind: "device",
            id: id.get(),
        }
    }

    /// Shorthand for a missing group.
    #[must_use]
    pub fn group_not_found(id: crate::id::GroupId) -> Self {
        Self::NotFound {
            kind: "group",
            id: id.get(),
        }
    }
}

/// Aggregated failure of a fanout batch.
///
/// Only the first failure (in launch order) is kept; the others are counted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{failed} of {total} hub calls failed: {first}")]
pub struct FanoutError {
    pub failed: usize,
    pub total: usize,
    pub first: HubError,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{DeviceId, GroupId};

    #[test]
    fn should_display_not_found_with_kind_and_id() {
        let err = HubError::device_not_found(DeviceId::new(7));
        assert_eq!(err.to_string(), "device 7 not found");
        let err = HubError::group_not_found(GroupId::new(3));
        assert_eq!(err.to_string(), "group 3 not found");
    }

    #[test]
    fn should_prefix_configuration_errors() {
        let err: LightgateError = ConfigurationError::MissingTargetId.into();
        assert!(err.is_configuration());
        assert!(err.to_string().starts_with("configuration error:"));
    }

    #[test]
    fn should_carry_first_detail_in_fanout_message() {
        let err: LightgateError = FanoutError {
            failed: 1,
            total: 4,
            first: HubError::Unreachable("device 2 timed out".to_string()),
        }
        .into();
        assert!(!err.is_configuration());
        assert_eq!(
            err.to_string(),
            "1 of 4 hub calls failed: hub unreachable: device 2 timed out"
        );
    }

    #[test]
    fn should_print_fanout_detail_only_once_in_error_chain() {
        use std::error::Error as _;

        let err = FanoutError {
            failed: 2,
            total: 3,
            first: HubError::Rejected("bad colour".to_string()),
        };
        assert!(err.source().is_none());
    }
}
