//! Pairing service — registers a fresh client identity with the hub.

use std::sync::Arc;

use serde::Serialize;

use lightgate_domain::error::{ConfigurationError, LightgateError};

use crate::ports::HubPairing;

/// Prefix of generated client identities.
pub const IDENTITY_PREFIX: &str = "lightgate-";

/// Credentials issued by the hub for a new identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub identity: String,
    pub psk: String,
}

/// Application service for pairing with the hub.
pub struct PairingService<P> {
    hub: Arc<P>,
}

impl<P: HubPairing> PairingService<P> {
    pub fn new(hub: Arc<P>) -> Self {
        Self { hub }
    }

    /// Generate an identity and register it with the hub.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EmptySecurityCode`] for a blank code, or
    /// the hub's error when it rejects the registration.
    #[tracing::instrument(skip_all)]
    pub async fn pair(&self, security_code: &str) -> Result<Credentials, LightgateError> {
        let security_code = security_code.trim();
        if security_code.is_empty() {
            return Err(ConfigurationError::EmptySecurityCode.into());
        }
        let identity = generate_identity();
        let psk = self.hub.authenticate(&identity, security_code).await?;
        tracing::info!(%identity, "paired with hub");
        Ok(Credentials { identity, psk })
    }
}

/// `lightgate-` followed by eight random hex digits.
#[must_use]
pub fn generate_identity() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("{IDENTITY_PREFIX}{}", &uuid[..8])
}
