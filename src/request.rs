//! Request types for the two authenticator operations
//!
//! Both requests follow the same pattern: required fields go through `new`,
//! everything else through `with_*` builders with the defaults of a typical
//! passwordless-login flow (no resident key, user verification discouraged).

use crate::error::{Error, Result};
use crate::types::{RelyingParty, User, UserVerification};

use std::fmt;

use zeroize::Zeroizing;

/// Request for creating a new credential (WebAuthn registration)
///
/// `challenge` carries the client data hash and is passed through to the
/// authenticator unmodified; hashing is the caller's responsibility. The
/// [`WebAuthn`](crate::webauthn::WebAuthn) layer hashes for you.
#[derive(Clone)]
pub struct CredentialCreationRequest {
    pub(crate) rp: RelyingParty,
    pub(crate) user: User,
    pub(crate) challenge: Vec<u8>,
    pub(crate) device: Option<String>,
    pub(crate) resident_key: bool,
    pub(crate) user_verification: UserVerification,
    pub(crate) pin: Option<Zeroizing<String>>,
}

impl CredentialCreationRequest {
    /// Create a request with the required parameters.
    pub fn new(rp_id: impl Into<String>, user_id: Vec<u8>, challenge: Vec<u8>) -> Self {
        Self {
            rp: RelyingParty::new(rp_id),
            user: User::new(user_id),
            challenge,
            device: None,
            resident_key: false,
            user_verification: UserVerification::default(),
            pin: None,
        }
    }

    /// Set the relying party name.
    pub fn with_rp_name(mut self, name: impl Into<String>) -> Self {
        self.rp.name = Some(name.into());
        self
    }

    /// Set the user name.
    pub fn with_user_name(mut self, name: impl Into<String>) -> Self {
        self.user.name = Some(name.into());
        self
    }

    /// Set the user display name.
    pub fn with_user_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.user.display_name = Some(display_name.into());
        self
    }

    /// Target a specific device path instead of the first enumerated one.
    pub fn with_device(mut self, path: impl Into<String>) -> Self {
        self.device = Some(path.into());
        self
    }

    /// Request a resident key (discoverable credential).
    pub fn with_resident_key(mut self, resident_key: bool) -> Self {
        self.resident_key = resident_key;
        self
    }

    /// Set the user verification policy.
    pub fn with_user_verification(mut self, user_verification: UserVerification) -> Self {
        self.user_verification = user_verification;
        self
    }

    /// Supply the device PIN for the transaction.
    pub fn with_pin(mut self, pin: impl Into<String>) -> Self {
        self.pin = Some(Zeroizing::new(pin.into()));
        self
    }

    /// Relying party information.
    pub fn rp(&self) -> &RelyingParty {
        &self.rp
    }

    /// User information.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Client data hash.
    pub fn challenge(&self) -> &[u8] {
        &self.challenge
    }

    /// Explicit device path, if any.
    pub fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }

    pub(crate) fn pin(&self) -> Option<&str> {
        self.pin.as_ref().map(|pin| pin.as_str())
    }

    /// Check the required fields before any device interaction.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.rp.id.is_empty() {
            return Err(Error::Validation("rp.id"));
        }
        if self.user.id.is_empty() {
            return Err(Error::Validation("user.id"));
        }
        if self.challenge.is_empty() {
            return Err(Error::Validation("challenge"));
        }
        Ok(())
    }
}

impl fmt::Debug for CredentialCreationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialCreationRequest")
            .field("rp", &self.rp)
            .field("user", &self.user)
            .field("challenge", &self.challenge)
            .field("device", &self.device)
            .field("resident_key", &self.resident_key)
            .field("user_verification", &self.user_verification)
            .field("pin", &self.pin.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Request for getting an assertion (WebAuthn authentication)
#[derive(Clone)]
pub struct AssertionRequest {
    pub(crate) rp_id: String,
    pub(crate) challenge: Vec<u8>,
    pub(crate) device: Option<String>,
    pub(crate) allow_credentials: Vec<Vec<u8>>,
    pub(crate) user_verification: UserVerification,
    pub(crate) pin: Option<Zeroizing<String>>,
}

impl AssertionRequest {
    /// Create a request with the required parameters.
    pub fn new(rp_id: impl Into<String>, challenge: Vec<u8>) -> Self {
        Self {
            rp_id: rp_id.into(),
            challenge,
            device: None,
            allow_credentials: Vec::new(),
            user_verification: UserVerification::default(),
            pin: None,
        }
    }

    /// Add a credential id to the allow list. Order is preserved.
    pub fn with_allowed_credential(mut self, credential_id: Vec<u8>) -> Self {
        self.allow_credentials.push(credential_id);
        self
    }

    /// Replace the allow list.
    pub fn with_allowed_credentials(mut self, credential_ids: Vec<Vec<u8>>) -> Self {
        self.allow_credentials = credential_ids;
        self
    }

    /// Target a specific device path instead of the first enumerated one.
    pub fn with_device(mut self, path: impl Into<String>) -> Self {
        self.device = Some(path.into());
        self
    }

    /// Set the user verification policy.
    pub fn with_user_verification(mut self, user_verification: UserVerification) -> Self {
        self.user_verification = user_verification;
        self
    }

    /// Supply the device PIN for the transaction.
    pub fn with_pin(mut self, pin: impl Into<String>) -> Self {
        self.pin = Some(Zeroizing::new(pin.into()));
        self
    }

    /// Relying party id.
    pub fn rp_id(&self) -> &str {
        &self.rp_id
    }

    /// Client data hash.
    pub fn challenge(&self) -> &[u8] {
        &self.challenge
    }

    /// Allow-list credential ids, in caller order.
    pub fn allow_credentials(&self) -> &[Vec<u8>] {
        &self.allow_credentials
    }

    /// Explicit device path, if any.
    pub fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }

    pub(crate) fn pin(&self) -> Option<&str> {
        self.pin.as_ref().map(|pin| pin.as_str())
    }

    /// Check the required fields before any device interaction.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.rp_id.is_empty() {
            return Err(Error::Validation("rp_id"));
        }
        if self.challenge.is_empty() {
            return Err(Error::Validation("challenge"));
        }
        Ok(())
    }
}

impl fmt::Debug for AssertionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssertionRequest")
            .field("rp_id", &self.rp_id)
            .field("challenge", &self.challenge)
            .field("device", &self.device)
            .field("allow_credentials", &self.allow_credentials)
            .field("user_verification", &self.user_verification)
            .field("pin", &self.pin.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
