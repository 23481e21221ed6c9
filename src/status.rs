//! CTAP2 status codes reported by the device library
//!
//! Status codes defined in the FIDO2 specification:
//! <https://fidoalliance.org/specs/fido-v2.1-ps-20210615/fido-client-to-authenticator-protocol-v2.1-ps-20210615.html#error-responses>

use std::fmt;

/// Result type for calls into the device library
pub type CtapResult<T> = std::result::Result<T, StatusCode>;

/// Status reported by a rejected protocol call
///
/// Carries the CTAP2 status byte together with a human-readable diagnostic,
/// used to enrich every protocol-level error the client surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// Invalid command
    InvalidCommand,

    /// Invalid parameter in request
    InvalidParameter,

    /// Invalid message or item length
    InvalidLength,

    /// Message timed out
    Timeout,

    /// Channel busy
    ChannelBusy,

    /// Missing required parameter
    MissingParameter,

    /// Limit exceeded
    LimitExceeded,

    /// Credential excluded (already exists)
    CredentialExcluded,

    /// Unsupported algorithm
    UnsupportedAlgorithm,

    /// Operation denied by user
    OperationDenied,

    /// Key store full
    KeyStoreFull,

    /// Unsupported option
    UnsupportedOption,

    /// Invalid option
    InvalidOption,

    /// Keepalive cancel
    KeepaliveCancel,

    /// No credentials found
    NoCredentials,

    /// User action timeout
    UserActionTimeout,

    /// Not allowed
    NotAllowed,

    /// PIN invalid
    PinInvalid,

    /// PIN blocked
    PinBlocked,

    /// PIN/UV auth parameter invalid
    PinAuthInvalid,

    /// PIN/UV auth blocked
    PinAuthBlocked,

    /// PIN not set
    PinNotSet,

    /// PIN required
    PinRequired,

    /// PIN policy violation
    PinPolicyViolation,

    /// Request too large
    RequestTooLarge,

    /// Action timeout
    ActionTimeout,

    /// User presence required
    UpRequired,

    /// User verification blocked
    UvBlocked,

    /// User verification invalid
    UvInvalid,

    /// Any status byte this layer has no dedicated variant for
    Other(u8),
}

impl StatusCode {
    /// Map a raw CTAP status byte onto a status code.
    pub fn from_raw(code: u8) -> Self {
        match code {
            0x01 => StatusCode::InvalidCommand,
            0x02 => StatusCode::InvalidParameter,
            0x03 => StatusCode::InvalidLength,
            0x05 => StatusCode::Timeout,
            0x06 => StatusCode::ChannelBusy,
            0x14 => StatusCode::MissingParameter,
            0x15 => StatusCode::LimitExceeded,
            0x19 => StatusCode::CredentialExcluded,
            0x26 => StatusCode::UnsupportedAlgorithm,
            0x27 => StatusCode::OperationDenied,
            0x28 => StatusCode::KeyStoreFull,
            0x2B => StatusCode::UnsupportedOption,
            0x2C => StatusCode::InvalidOption,
            0x2D => StatusCode::KeepaliveCancel,
            0x2E => StatusCode::NoCredentials,
            0x2F => StatusCode::UserActionTimeout,
            0x30 => StatusCode::NotAllowed,
            0x31 => StatusCode::PinInvalid,
            0x32 => StatusCode::PinBlocked,
            0x33 => StatusCode::PinAuthInvalid,
            0x34 => StatusCode::PinAuthBlocked,
            0x35 => StatusCode::PinNotSet,
            0x36 => StatusCode::PinRequired,
            0x37 => StatusCode::PinPolicyViolation,
            0x39 => StatusCode::RequestTooLarge,
            0x3A => StatusCode::ActionTimeout,
            0x3B => StatusCode::UpRequired,
            0x3C => StatusCode::UvBlocked,
            0x3F => StatusCode::UvInvalid,
            other => StatusCode::Other(other),
        }
    }

    /// The raw CTAP status byte.
    pub fn as_raw(self) -> u8 {
        match self {
            StatusCode::InvalidCommand => 0x01,
            StatusCode::InvalidParameter => 0x02,
            StatusCode::InvalidLength => 0x03,
            StatusCode::Timeout => 0x05,
            StatusCode::ChannelBusy => 0x06,
            StatusCode::MissingParameter => 0x14,
            StatusCode::LimitExceeded => 0x15,
            StatusCode::CredentialExcluded => 0x19,
            StatusCode::UnsupportedAlgorithm => 0x26,
            StatusCode::OperationDenied => 0x27,
            StatusCode::KeyStoreFull => 0x28,
            StatusCode::UnsupportedOption => 0x2B,
            StatusCode::InvalidOption => 0x2C,
            StatusCode::KeepaliveCancel => 0x2D,
            StatusCode::NoCredentials => 0x2E,
            StatusCode::UserActionTimeout => 0x2F,
            StatusCode::NotAllowed => 0x30,
            StatusCode::PinInvalid => 0x31,
            StatusCode::PinBlocked => 0x32,
            StatusCode::PinAuthInvalid => 0x33,
            StatusCode::PinAuthBlocked => 0x34,
            StatusCode::PinNotSet => 0x35,
            StatusCode::PinRequired => 0x36,
            StatusCode::PinPolicyViolation => 0x37,
            StatusCode::RequestTooLarge => 0x39,
            StatusCode::ActionTimeout => 0x3A,
            StatusCode::UpRequired => 0x3B,
            StatusCode::UvBlocked => 0x3C,
            StatusCode::UvInvalid => 0x3F,
            StatusCode::Other(code) => code,
        }
    }

    /// Human-readable diagnostic for this status.
    pub fn description(self) -> &'static str {
        match self {
            StatusCode::InvalidCommand => "invalid command",
            StatusCode::InvalidParameter => "invalid parameter",
            StatusCode::InvalidLength => "invalid length",
            StatusCode::Timeout => "message timed out",
            StatusCode::ChannelBusy => "channel busy",
            StatusCode::MissingParameter => "missing parameter",
            StatusCode::LimitExceeded => "limit exceeded",
            StatusCode::CredentialExcluded => "credential excluded",
            StatusCode::UnsupportedAlgorithm => "unsupported algorithm",
            StatusCode::OperationDenied => "operation denied",
            StatusCode::KeyStoreFull => "key store full",
            StatusCode::UnsupportedOption => "unsupported option",
            StatusCode::InvalidOption => "invalid option",
            StatusCode::KeepaliveCancel => "operation cancelled",
            StatusCode::NoCredentials => "no credentials found",
            StatusCode::UserActionTimeout => "user action timed out",
            StatusCode::NotAllowed => "operation not allowed",
            StatusCode::PinInvalid => "PIN invalid",
            StatusCode::PinBlocked => "PIN blocked",
            StatusCode::PinAuthInvalid => "PIN authentication invalid",
            StatusCode::PinAuthBlocked => "PIN authentication blocked",
            StatusCode::PinNotSet => "PIN not set",
            StatusCode::PinRequired => "PIN required",
            StatusCode::PinPolicyViolation => "PIN policy violation",
            StatusCode::RequestTooLarge => "request too large",
            StatusCode::ActionTimeout => "action timed out",
            StatusCode::UpRequired => "user presence required",
            StatusCode::UvBlocked => "user verification blocked",
            StatusCode::UvInvalid => "user verification invalid",
            StatusCode::Other(_) => "unknown status",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusCode::Other(code) => write!(f, "unknown status 0x{:02X}", code),
            _ => f.write_str(self.description()),
        }
    }
}
