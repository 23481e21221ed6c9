//! Error types for bridge operations

use crate::status::StatusCode;

use std::fmt;

use thiserror::Error;

/// Identifies the protocol call that was rejected while building or running
/// a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Setting the credential algorithm
    CredentialType,
    /// Setting the relying party
    RelyingParty,
    /// Setting the user entity
    User,
    /// Setting the client data hash
    ClientData,
    /// Setting the resident key option
    ResidentKey,
    /// Setting the user verification option
    UserVerification,
    /// Adding an allow-list entry
    AllowCredential,
    /// The makeCredential transaction
    MakeCredential,
    /// The getAssertion transaction
    GetAssertion,
}

impl Stage {
    /// Name of the protocol call, as used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::CredentialType => "set credential type",
            Stage::RelyingParty => "set relying party",
            Stage::User => "set user",
            Stage::ClientData => "set client data hash",
            Stage::ResidentKey => "set resident key option",
            Stage::UserVerification => "set user verification option",
            Stage::AllowCredential => "add allowed credential",
            Stage::MakeCredential => "make credential",
            Stage::GetAssertion => "get assertion",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for bridge operations
///
/// Every variant is terminal for the current call: nothing is retried and no
/// partial result is returned. All native resources are released before an
/// error reaches the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A required request field is missing or empty; no device was touched.
    #[error("missing required parameter: {0}")]
    Validation(&'static str),

    /// The device enumeration call itself failed.
    #[error("device enumeration failed: {0}")]
    DeviceDiscovery(StatusCode),

    /// Enumeration succeeded but no authenticator is attached.
    #[error("no FIDO2 devices found")]
    NoDevice,

    /// Opening the device by path failed.
    #[error("failed to open device: {0}")]
    DeviceOpen(StatusCode),

    /// A protocol call was rejected by the device library.
    #[error("failed to {stage}: {status}")]
    Protocol {
        /// The rejected call
        stage: Stage,
        /// The library's diagnostic
        status: StatusCode,
    },

    /// The transaction succeeded but produced zero assertions.
    #[error("no assertion returned")]
    EmptyResult,
}

impl Error {
    pub(crate) fn protocol(stage: Stage, status: StatusCode) -> Self {
        Error::Protocol { stage, status }
    }

    /// True when the failure means the authenticator wants a (different) PIN.
    ///
    /// The WebAuthn layer uses this to decide whether prompting the caller
    /// for a PIN and retrying can succeed.
    pub fn needs_pin(&self) -> bool {
        matches!(
            self,
            Error::Protocol {
                status: StatusCode::PinRequired
                    | StatusCode::PinInvalid
                    | StatusCode::PinAuthInvalid
                    | StatusCode::PinNotSet,
                ..
            }
        )
    }
}

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, Error>;
