//! Request-to-protocol orchestration
//!
//! Each operation runs the same fixed sequence: validate the request, pick
//! a target device, map the request onto a protocol object, open the device
//! for the duration of one blocking transaction, then copy the outputs into
//! caller-owned buffers. Hardware is not touched until the caller-supplied
//! data has been fully validated and packaged.

use crate::backend::{Algorithm, AssertionHandle, CredentialHandle, CtapBackend};
use crate::error::{Error, Result, Stage};
use crate::request::{AssertionRequest, CredentialCreationRequest};
use crate::response::{Assertion, CreatedCredential};
use crate::session::DeviceSession;
use crate::types::AuthenticatorDevice;

use std::sync::Once;

use tracing::debug;

/// Upper bound on the enumeration manifest.
const MAX_DEVICES: usize = 64;

/// Client bridging WebAuthn-shaped requests to CTAP2 authenticators
///
/// The client is stateless between calls: every operation enumerates, opens
/// and closes devices on its own, so authenticators may be plugged and
/// unplugged between calls. Transactions block the calling thread until the
/// authenticator responds; run the client on a worker thread if that is not
/// acceptable.
pub struct Client<B: CtapBackend> {
    backend: B,
    init: Once,
}

impl<B: CtapBackend> Client<B> {
    /// Create a client over the given protocol backend.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            init: Once::new(),
        }
    }

    /// Engine init runs once, before the first device interaction.
    fn ensure_init(&self) {
        self.init.call_once(|| self.backend.init());
    }

    /// List attached authenticators.
    pub fn list_devices(&self) -> Result<Vec<AuthenticatorDevice>> {
        self.ensure_init();
        let devices = self
            .backend
            .enumerate(MAX_DEVICES)
            .map_err(Error::DeviceDiscovery)?;
        debug!(count = devices.len(), "enumerated authenticators");
        Ok(devices)
    }

    /// Create a new credential on an authenticator.
    ///
    /// Blocks until the authenticator responds; this may require a touch or
    /// on-device PIN entry.
    pub fn make_credential(
        &self,
        request: &CredentialCreationRequest,
    ) -> Result<CreatedCredential> {
        request.validate()?;
        self.ensure_init();

        let path = self.target_device(request.device())?;
        let mut credential = self.build_credential(request)?;

        let session = DeviceSession::open(&self.backend, &path)?;
        debug!(device = %path, "running makeCredential transaction");
        session
            .transact(|device| device.make_credential(&mut credential, request.pin()))
            .map_err(|status| Error::protocol(Stage::MakeCredential, status))?;

        let created = CreatedCredential::from_handle(&credential);
        debug!(credential_id = %hex::encode(&created.id), "credential created");
        Ok(created)
    }

    /// Get an assertion from an authenticator.
    ///
    /// Blocks until the authenticator responds, like
    /// [`make_credential`](Self::make_credential).
    pub fn get_assertion(&self, request: &AssertionRequest) -> Result<Assertion> {
        request.validate()?;
        self.ensure_init();

        let path = self.target_device(request.device())?;
        let mut assertion = self.build_assertion(request)?;

        let session = DeviceSession::open(&self.backend, &path)?;
        debug!(device = %path, "running getAssertion transaction");
        session
            .transact(|device| device.get_assertion(&mut assertion, request.pin()))
            .map_err(|status| Error::protocol(Stage::GetAssertion, status))?;

        let result = Assertion::from_handle(&assertion)?;
        debug!(credential_id = %hex::encode(&result.id), "assertion acquired");
        Ok(result)
    }

    /// Resolve the device to open: the caller's explicit path, or the first
    /// enumerated authenticator.
    ///
    /// A failed enumeration propagates as [`Error::DeviceDiscovery`]; only a
    /// successful, empty enumeration counts as "no devices".
    fn target_device(&self, explicit: Option<&str>) -> Result<String> {
        if let Some(path) = explicit {
            return Ok(path.to_owned());
        }

        let devices = self
            .backend
            .enumerate(MAX_DEVICES)
            .map_err(Error::DeviceDiscovery)?;
        let first = devices.into_iter().next().ok_or(Error::NoDevice)?;
        debug!(device = %first.path, "selected default authenticator");
        Ok(first.path)
    }

    /// Map a creation request onto a protocol credential object.
    ///
    /// The first rejected setter aborts the build; the partial object is
    /// released on the way out.
    fn build_credential(&self, request: &CredentialCreationRequest) -> Result<B::Credential> {
        let mut credential = self.backend.new_credential();
        credential
            .set_type(Algorithm::Es256)
            .map_err(|status| Error::protocol(Stage::CredentialType, status))?;
        credential
            .set_rp(&request.rp.id, request.rp.name.as_deref().unwrap_or(""))
            .map_err(|status| Error::protocol(Stage::RelyingParty, status))?;
        credential
            .set_user(
                &request.user.id,
                request.user.name.as_deref().unwrap_or(""),
                request.user.display_name.as_deref().unwrap_or(""),
            )
            .map_err(|status| Error::protocol(Stage::User, status))?;
        credential
            .set_client_data_hash(&request.challenge)
            .map_err(|status| Error::protocol(Stage::ClientData, status))?;
        credential
            .set_resident_key(request.resident_key)
            .map_err(|status| Error::protocol(Stage::ResidentKey, status))?;
        credential
            .set_user_verification(request.user_verification.as_option())
            .map_err(|status| Error::protocol(Stage::UserVerification, status))?;
        Ok(credential)
    }

    /// Map an assertion request onto a protocol assertion object.
    fn build_assertion(&self, request: &AssertionRequest) -> Result<B::Assertion> {
        let mut assertion = self.backend.new_assertion();
        assertion
            .set_rp(&request.rp_id)
            .map_err(|status| Error::protocol(Stage::RelyingParty, status))?;
        assertion
            .set_client_data_hash(&request.challenge)
            .map_err(|status| Error::protocol(Stage::ClientData, status))?;
        for credential_id in &request.allow_credentials {
            assertion
                .allow_credential(credential_id)
                .map_err(|status| Error::protocol(Stage::AllowCredential, status))?;
        }
        assertion
            .set_user_verification(request.user_verification.as_option())
            .map_err(|status| Error::protocol(Stage::UserVerification, status))?;
        Ok(assertion)
    }
}
