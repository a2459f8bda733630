//! Targets — which device or group a request addresses.
//!
//! Both the node configuration and the incoming request may name a target.
//! A non-zero node-level id wins; otherwise the request's id and type are used.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::id::{DeviceId, GroupId};

/// Kind of hub object addressed by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Device,
    Group,
}

impl TargetKind {
    /// Parse `device` / `group`, ignoring surrounding whitespace and case.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownTargetKind`] for any other value.
    pub fn parse(text: &str) -> Result<Self, ConfigurationError> {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("device") {
            Ok(Self::Device)
        } else if trimmed.eq_ignore_ascii_case("group") {
            Ok(Self::Group)
        } else {
            Err(ConfigurationError::UnknownTargetKind(trimmed.to_string()))
        }
    }
}

impl FromStr for TargetKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Device => f.write_str("device"),
            Self::Group => f.write_str("group"),
        }
    }
}

/// Unresolved target fields, as carried by a node configuration or a request.
///
/// An id of `0` counts as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSpec {
    pub id: Option<u32>,
    pub kind: Option<String>,
}

impl TargetSpec {
    #[must_use]
    pub fn new(id: Option<u32>, kind: Option<impl Into<String>>) -> Self {
        Self {
            id,
            kind: kind.map(Into::into),
        }
    }

    fn set_id(&self) -> Option<u32> {
        self.id.filter(|id| *id != 0)
    }

    fn set_kind(&self) -> Option<&str> {
        self.kind.as_deref().filter(|kind| !kind.trim().is_empty())
    }

    /// Apply the node-over-request precedence and return the winning
    /// `(id, kind)` pair, either of which may still be unset.
    fn pick<'a>(node: &'a Self, request: &'a Self) -> (Option<u32>, Option<&'a str>) {
        match node.set_id() {
            Some(id) => (Some(id), node.set_kind().or_else(|| request.set_kind())),
            None => (request.set_id(), request.set_kind()),
        }
    }
}

/// A resolved control target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Device(DeviceId),
    Group(GroupId),
}

impl Target {
    /// Build a target from a kind and a raw hub id.
    #[must_use]
    pub fn new(kind: TargetKind, id: u32) -> Self {
        match kind {
            TargetKind::Device => Self::Device(DeviceId::new(id)),
            TargetKind::Group => Self::Group(GroupId::new(id)),
        }
    }

    /// Resolve the control target from node configuration and request.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] when no non-zero id is available or
    /// the type is missing or not `device` / `group`.
    pub fn resolve(node: &TargetSpec, request: &TargetSpec) -> Result<Self, ConfigurationError> {
        let (id, kind) = TargetSpec::pick(node, request);
        let id = id.ok_or(ConfigurationError::MissingTargetId)?;
        let kind = TargetKind::parse(kind.ok_or(ConfigurationError::MissingTargetKind)?)?;
        Ok(Self::new(kind, id))
    }

    #[must_use]
    pub fn kind(&self) -> TargetKind {
        match self {
            Self::Device(_) => TargetKind::Device,
            Self::Group(_) => TargetKind::Group,
        }
    }

    /// Raw hub id.
    #[must_use]
    pub fn id(&self) -> u32 {
        match self {
            Self::Device(id) => id.get(),
            Self::Group(id) => id.get(),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}

/// What a read request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadTarget {
    Device(DeviceId),
    Group(GroupId),
    Devices,
    Groups,
    All,
}

impl ReadTarget {
    /// Resolve a read target with the same precedence as [`Target::resolve`].
    ///
    /// A type without an id lists every object of that type; neither id nor
    /// type reads everything.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] when an id is given without a type,
    /// or the type is not `device` / `group`.
    pub fn resolve(node: &TargetSpec, request: &TargetSpec) -> Result<Self, ConfigurationError> {
        match TargetSpec::pick(node, request) {
            (None, None) => Ok(Self::All),
            (None, Some(kind)) => Ok(match TargetKind::parse(kind)? {
                TargetKind::Device => Self::Devices,
                TargetKind::Group => Self::Groups,
            }),
            (Some(_), None) => Err(ConfigurationError::MissingTargetKind),
            (Some(id), Some(kind)) => Ok(match Target::new(TargetKind::parse(kind)?, id) {
                Target::Device(id) => Self::Device(id),
                Target::Group(id) => Self::Group(id),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(id: Option<u32>, kind: Option<&str>) -> TargetSpec {
        TargetSpec::new(id, kind)
    }

    #[test]
    fn should_prefer_node_target_when_node_id_is_set() {
        let node = spec(Some(5), Some("group"));
        let target = Target::resolve(&node, &spec(Some(7), Some("device"))).unwrap();
        assert_eq!(target, Target::Group(GroupId::new(5)));
    }

    #[test]
    fn should_use_request_target_when_node_id_is_zero() {
        let node = spec(Some(0), Some("group"));
        let target = Target::resolve(&node, &spec(Some(7), Some("device"))).unwrap();
        assert_eq!(target, Target::Device(DeviceId::new(7)));
    }

    #[test]
    fn should_fall_back_to_request_kind_when_node_kind_unset() {
        let target = Target::resolve(&spec(Some(5), None), &spec(None, Some("Group"))).unwrap();
        assert_eq!(target, Target::Group(GroupId::new(5)));
    }

    #[test]
    fn should_fail_when_no_id_anywhere() {
        let err = Target::resolve(&spec(None, Some("device")), &spec(None, None)).unwrap_err();
        assert_eq!(err, ConfigurationError::MissingTargetId);
    }

    #[test]
    fn should_fail_when_request_id_is_zero() {
        let err = Target::resolve(&TargetSpec::default(), &spec(Some(0), Some("device")))
            .unwrap_err();
        assert_eq!(err, ConfigurationError::MissingTargetId);
    }

    #[test]
    fn should_fail_when_kind_is_missing() {
        let err = Target::resolve(&TargetSpec::default(), &spec(Some(3), Some("  "))).unwrap_err();
        assert_eq!(err, ConfigurationError::MissingTargetKind);
    }

    #[test]
    fn should_fail_when_kind_is_unknown() {
        let err = Target::resolve(&TargetSpec::default(), &spec(Some(3), Some("scene")))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnknownTargetKind("scene".to_string())
        );
    }

    #[test]
    fn should_display_kind_and_id() {
        assert_eq!(Target::Group(GroupId::new(9)).to_string(), "group 9");
    }

    #[test]
    fn should_read_everything_when_nothing_is_named() {
        let read = ReadTarget::resolve(&TargetSpec::default(), &TargetSpec::default()).unwrap();
        assert_eq!(read, ReadTarget::All);
    }

    #[test]
    fn should_list_kind_when_only_kind_is_named() {
        let read = ReadTarget::resolve(&TargetSpec::default(), &spec(None, Some("group"))).unwrap();
        assert_eq!(read, ReadTarget::Groups);
    }

    #[test]
    fn should_read_single_device_when_id_and_kind_are_named() {
        let read =
            ReadTarget::resolve(&spec(Some(11), Some("device")), &TargetSpec::default()).unwrap();
        assert_eq!(read, ReadTarget::Device(DeviceId::new(11)));
    }

    #[test]
    fn should_reject_read_with_id_but_no_kind() {
        let err = ReadTarget::resolve(&TargetSpec::default(), &spec(Some(11), None)).unwrap_err();
        assert_eq!(err, ConfigurationError::MissingTargetKind);
    }
}
