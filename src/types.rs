//! Common types for WebAuthn bridge operations

use serde::{Deserialize, Serialize};

/// Relying party information
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelyingParty {
    /// RP ID (domain)
    pub id: String,
    /// RP name (optional)
    pub name: Option<String>,
}

impl RelyingParty {
    /// Create a relying party with the given ID and no name.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    /// Set the relying party name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// User information
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// User handle
    pub id: Vec<u8>,
    /// User name (email or username)
    pub name: Option<String>,
    /// User display name (friendly name)
    pub display_name: Option<String>,
}

impl User {
    /// Create a user with the given handle and no names.
    pub fn new(id: Vec<u8>) -> Self {
        Self {
            id,
            name: None,
            display_name: None,
        }
    }

    /// Set the user name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the user display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }
}

/// An attached authenticator, as reported by device enumeration
///
/// Enumeration is performed fresh on every query; entries are never cached
/// because devices can be plugged and unplugged between calls.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatorDevice {
    /// Platform-specific path used to open the device
    pub path: String,
    /// Manufacturer string
    pub manufacturer: String,
    /// Product string
    pub product: String,
}

/// User verification policy requested of the authenticator
///
/// `Preferred` leaves the option out of the request entirely. Some
/// authenticators behave differently between "omitted" and "explicitly
/// false", so the three cases stay distinct all the way to the wire.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserVerification {
    /// The authenticator must verify the user
    Required,
    /// The authenticator decides
    Preferred,
    /// User verification is explicitly disabled
    #[default]
    Discouraged,
}

impl UserVerification {
    /// Wire mapping: enforce, omit, or explicitly disable.
    pub(crate) fn as_option(self) -> Option<bool> {
        match self {
            UserVerification::Required => Some(true),
            UserVerification::Preferred => None,
            UserVerification::Discouraged => Some(false),
        }
    }
}

/// Type of credential
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum CredentialType {
    /// Public key credential (the only type defined in CTAP2)
    #[default]
    #[serde(rename = "public-key")]
    PublicKey,
}

impl CredentialType {
    /// String representation used in the WebAuthn response shape.
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialType::PublicKey => "public-key",
        }
    }
}
