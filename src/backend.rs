//! Device library interface
//!
//! The bridge drives an external FIDO2/CTAP2 protocol engine through the
//! traits in this module. Anything that can enumerate authenticators, open
//! them by path, and run the two blocking transactions can back a
//! [`Client`](crate::Client): a libfido2-style FFI wrapper, a pure-Rust CTAP
//! stack, or a virtual authenticator in tests.
//!
//! Object construction is infallible; every setter and transaction reports
//! failure through a [`StatusCode`](crate::StatusCode), which the client
//! wraps with the stage that was rejected.

use crate::status::CtapResult;
use crate::types::AuthenticatorDevice;

/// COSE algorithm for new credentials
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Algorithm {
    /// ECDSA over P-256 with SHA-256
    #[default]
    Es256,
}

impl Algorithm {
    /// COSE algorithm identifier.
    pub fn as_cose(self) -> i32 {
        match self {
            Algorithm::Es256 => -7,
        }
    }
}

/// Entry point into the protocol engine
pub trait CtapBackend {
    /// Open device handle type
    type Device: CtapDevice<Credential = Self::Credential, Assertion = Self::Assertion>;
    /// Protocol credential object type
    type Credential: CredentialHandle;
    /// Protocol assertion object type
    type Assertion: AssertionHandle;

    /// One-time engine initialization.
    ///
    /// The client runs this under an init-on-first-use latch; backends may
    /// assume at most one invocation per client.
    fn init(&self);

    /// Enumerate attached authenticators, reporting at most `max` entries.
    fn enumerate(&self, max: usize) -> CtapResult<Vec<AuthenticatorDevice>>;

    /// Open a device by its enumeration path.
    fn open(&self, path: &str) -> CtapResult<Self::Device>;

    /// Create an empty credential object, to be populated by its setters.
    fn new_credential(&self) -> Self::Credential;

    /// Create an empty assertion object, to be populated by its setters.
    fn new_assertion(&self) -> Self::Assertion;
}

/// An open device handle
///
/// Dropping the handle closes the device; the session layer relies on this
/// to release the device on every exit path.
pub trait CtapDevice {
    /// Protocol credential object type accepted by this device
    type Credential: CredentialHandle;
    /// Protocol assertion object type accepted by this device
    type Assertion: AssertionHandle;

    /// Run the makeCredential transaction.
    ///
    /// Blocks until the authenticator responds, which may require a touch or
    /// on-device PIN entry; the engine's own transport timeout governs.
    fn make_credential(
        &mut self,
        credential: &mut Self::Credential,
        pin: Option<&str>,
    ) -> CtapResult<()>;

    /// Run the getAssertion transaction. Blocking, like
    /// [`make_credential`](Self::make_credential).
    fn get_assertion(
        &mut self,
        assertion: &mut Self::Assertion,
        pin: Option<&str>,
    ) -> CtapResult<()>;
}

/// Protocol credential object: creation parameters in, attestation out
///
/// Three-way CTAP options are carried as `Option<bool>`: `Some(true)`
/// enforce, `Some(false)` explicitly disable, `None` omit and let the
/// authenticator decide.
pub trait CredentialHandle {
    /// Set the credential algorithm.
    fn set_type(&mut self, algorithm: Algorithm) -> CtapResult<()>;

    /// Set the relying party id and name.
    fn set_rp(&mut self, id: &str, name: &str) -> CtapResult<()>;

    /// Set the user entity.
    fn set_user(&mut self, id: &[u8], name: &str, display_name: &str) -> CtapResult<()>;

    /// Set the client data hash the authenticator signs over.
    fn set_client_data_hash(&mut self, hash: &[u8]) -> CtapResult<()>;

    /// Set the resident key option. Always explicit, never omitted.
    fn set_resident_key(&mut self, resident_key: bool) -> CtapResult<()>;

    /// Set the user verification option.
    fn set_user_verification(&mut self, user_verification: Option<bool>) -> CtapResult<()>;

    /// Credential id bytes. Valid only after a successful transaction.
    fn id(&self) -> &[u8];

    /// Authenticator data bytes. Valid only after a successful transaction.
    fn authenticator_data(&self) -> &[u8];

    /// Attestation bytes. Valid only after a successful transaction.
    fn attestation_object(&self) -> &[u8];
}

/// Protocol assertion object: request parameters in, signed assertions out
pub trait AssertionHandle {
    /// Set the relying party id.
    fn set_rp(&mut self, id: &str) -> CtapResult<()>;

    /// Set the client data hash the authenticator signs over.
    fn set_client_data_hash(&mut self, hash: &[u8]) -> CtapResult<()>;

    /// Restrict the transaction to a known credential id. One call per
    /// allow-list entry, in caller order.
    fn allow_credential(&mut self, credential_id: &[u8]) -> CtapResult<()>;

    /// Set the user verification option.
    fn set_user_verification(&mut self, user_verification: Option<bool>) -> CtapResult<()>;

    /// Number of assertions produced by the transaction.
    fn count(&self) -> usize;

    /// Credential id for the assertion at `index`.
    fn id(&self, index: usize) -> &[u8];

    /// Authenticator data for the assertion at `index`.
    fn authenticator_data(&self, index: usize) -> &[u8];

    /// Signature for the assertion at `index`.
    fn signature(&self, index: usize) -> &[u8];

    /// User id for the assertion at `index`; empty when the authenticator
    /// stored none.
    fn user_id(&self, index: usize) -> &[u8];
}
