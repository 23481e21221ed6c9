//! Common test utilities for fido2-webauthn integration tests
//!
//! Provides a scriptable virtual backend implementing the device library
//! traits entirely in memory: tests script enumeration results, transaction
//! outputs, an authenticator PIN, and per-call failures, then inspect the
//! chronological call log and the live-object counter afterwards.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use fido2_webauthn::{
    Algorithm, AssertionHandle, AuthenticatorDevice, CredentialHandle, CtapBackend, CtapDevice,
    CtapResult, StatusCode,
};

/// One entry in the backend's chronological call log
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Init,
    Enumerate,
    Open(String),
    CredSetType(i32),
    CredSetRp {
        id: String,
        name: String,
    },
    CredSetUser {
        id: Vec<u8>,
        name: String,
        display_name: String,
    },
    CredSetClientDataHash(Vec<u8>),
    CredSetResidentKey(bool),
    CredSetUv(Option<bool>),
    AssertSetRp(String),
    AssertSetClientDataHash(Vec<u8>),
    AssertAllowCredential(Vec<u8>),
    AssertSetUv(Option<bool>),
    MakeCredential {
        pin: Option<String>,
    },
    GetAssertion {
        pin: Option<String>,
    },
}

/// Call sites where a failure can be injected
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailPoint {
    Enumerate,
    Open,
    CredType,
    CredRp,
    CredUser,
    CredClientData,
    CredResidentKey,
    CredUv,
    AssertRp,
    AssertClientData,
    AllowCredential,
    AssertUv,
    MakeCredential,
    GetAssertion,
}

/// Scripted output of a successful getAssertion, one entry per assertion
#[derive(Clone, Debug)]
pub struct ScriptedAssertion {
    pub id: Vec<u8>,
    pub authenticator_data: Vec<u8>,
    pub signature: Vec<u8>,
    pub user_id: Vec<u8>,
}

struct State {
    devices: Vec<AuthenticatorDevice>,
    fail: Option<(FailPoint, StatusCode)>,
    pin: Option<String>,
    credential_id: Vec<u8>,
    credential_auth_data: Vec<u8>,
    credential_attestation: Vec<u8>,
    assertions: Vec<ScriptedAssertion>,
    calls: Vec<Call>,
}

impl State {
    fn should_fail(&self, point: FailPoint) -> CtapResult<()> {
        match self.fail {
            Some((failing, status)) if failing == point => Err(status),
            _ => Ok(()),
        }
    }

    /// PIN policy of a real authenticator with client PIN configured: no PIN
    /// supplied is "PIN required", a different PIN is "PIN invalid".
    fn check_pin(&self, pin: Option<&str>) -> CtapResult<()> {
        match (&self.pin, pin) {
            (Some(_), None) => Err(StatusCode::PinRequired),
            (Some(expected), Some(given)) if given != expected => Err(StatusCode::PinInvalid),
            _ => Ok(()),
        }
    }
}

struct Shared {
    state: Mutex<State>,
    live: AtomicUsize,
}

/// Virtual protocol backend shared between the client under test and the
/// test body
///
/// Cloning shares the underlying state, so the test keeps one handle for
/// scripting and assertions while the client owns another.
#[derive(Clone)]
pub struct VirtualBackend {
    shared: Arc<Shared>,
}

impl VirtualBackend {
    /// A backend with one attached device and plausible transaction outputs.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    devices: vec![AuthenticatorDevice {
                        path: "/virtual/authenticator-0".to_owned(),
                        manufacturer: "Virtual Vendor".to_owned(),
                        product: "Virtual FIDO2 Key".to_owned(),
                    }],
                    fail: None,
                    pin: None,
                    credential_id: vec![0x10, 0x11],
                    credential_auth_data: vec![0x20, 0x21],
                    credential_attestation: vec![0x30, 0x31],
                    assertions: vec![ScriptedAssertion {
                        id: vec![0x10, 0x11],
                        authenticator_data: vec![0x22],
                        signature: vec![0x40, 0x41],
                        user_id: Vec::new(),
                    }],
                    calls: Vec::new(),
                }),
                live: AtomicUsize::new(0),
            }),
        }
    }

    pub fn add_device(&self, path: &str, manufacturer: &str, product: &str) {
        self.state().devices.push(AuthenticatorDevice {
            path: path.to_owned(),
            manufacturer: manufacturer.to_owned(),
            product: product.to_owned(),
        });
    }

    pub fn clear_devices(&self) {
        self.state().devices.clear();
    }

    /// Make the call at `point` fail with `status`; at most one point at a
    /// time.
    pub fn fail_at(&self, point: FailPoint, status: StatusCode) {
        self.state().fail = Some((point, status));
    }

    /// Configure a client PIN that transactions must match.
    pub fn require_pin(&self, pin: &str) {
        self.state().pin = Some(pin.to_owned());
    }

    pub fn script_credential(&self, id: &[u8], authenticator_data: &[u8], attestation: &[u8]) {
        let mut state = self.state();
        state.credential_id = id.to_vec();
        state.credential_auth_data = authenticator_data.to_vec();
        state.credential_attestation = attestation.to_vec();
    }

    pub fn script_assertions(&self, assertions: Vec<ScriptedAssertion>) {
        self.state().assertions = assertions;
    }

    /// Everything the client asked of the backend, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    /// Number of engine init calls observed.
    pub fn init_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Init))
            .count()
    }

    /// True when enumeration, open or a transaction was reached.
    pub fn hardware_touched(&self) -> bool {
        self.calls().iter().any(|call| {
            matches!(
                call,
                Call::Enumerate
                    | Call::Open(_)
                    | Call::MakeCredential { .. }
                    | Call::GetAssertion { .. }
            )
        })
    }

    /// Native objects currently alive: open device handles plus protocol
    /// credential/assertion objects.
    pub fn live_objects(&self) -> usize {
        self.shared.live.load(Ordering::SeqCst)
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.shared.state.lock().unwrap()
    }
}

impl Default for VirtualBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CtapBackend for VirtualBackend {
    type Device = VirtualDevice;
    type Credential = VirtualCredential;
    type Assertion = VirtualAssertion;

    fn init(&self) {
        self.state().calls.push(Call::Init);
    }

    fn enumerate(&self, max: usize) -> CtapResult<Vec<AuthenticatorDevice>> {
        let mut state = self.state();
        state.calls.push(Call::Enumerate);
        state.should_fail(FailPoint::Enumerate)?;
        Ok(state.devices.iter().take(max).cloned().collect())
    }

    fn open(&self, path: &str) -> CtapResult<VirtualDevice> {
        let mut state = self.state();
        state.calls.push(Call::Open(path.to_owned()));
        state.should_fail(FailPoint::Open)?;
        drop(state);

        self.shared.live.fetch_add(1, Ordering::SeqCst);
        Ok(VirtualDevice {
            shared: self.shared.clone(),
        })
    }

    fn new_credential(&self) -> VirtualCredential {
        self.shared.live.fetch_add(1, Ordering::SeqCst);
        VirtualCredential {
            shared: self.shared.clone(),
            id: Vec::new(),
            authenticator_data: Vec::new(),
            attestation_object: Vec::new(),
        }
    }

    fn new_assertion(&self) -> VirtualAssertion {
        self.shared.live.fetch_add(1, Ordering::SeqCst);
        VirtualAssertion {
            shared: self.shared.clone(),
            results: Vec::new(),
        }
    }
}

/// Virtual open device handle
pub struct VirtualDevice {
    shared: Arc<Shared>,
}

impl CtapDevice for VirtualDevice {
    type Credential = VirtualCredential;
    type Assertion = VirtualAssertion;

    fn make_credential(
        &mut self,
        credential: &mut VirtualCredential,
        pin: Option<&str>,
    ) -> CtapResult<()> {
        let mut state = self.shared.state.lock().unwrap();
        state.calls.push(Call::MakeCredential {
            pin: pin.map(str::to_owned),
        });
        state.should_fail(FailPoint::MakeCredential)?;
        state.check_pin(pin)?;

        credential.id = state.credential_id.clone();
        credential.authenticator_data = state.credential_auth_data.clone();
        credential.attestation_object = state.credential_attestation.clone();
        Ok(())
    }

    fn get_assertion(
        &mut self,
        assertion: &mut VirtualAssertion,
        pin: Option<&str>,
    ) -> CtapResult<()> {
        let mut state = self.shared.state.lock().unwrap();
        state.calls.push(Call::GetAssertion {
            pin: pin.map(str::to_owned),
        });
        state.should_fail(FailPoint::GetAssertion)?;
        state.check_pin(pin)?;

        assertion.results = state.assertions.clone();
        Ok(())
    }
}

impl Drop for VirtualDevice {
    fn drop(&mut self) {
        self.shared.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Virtual protocol credential object
pub struct VirtualCredential {
    shared: Arc<Shared>,
    id: Vec<u8>,
    authenticator_data: Vec<u8>,
    attestation_object: Vec<u8>,
}

impl CredentialHandle for VirtualCredential {
    fn set_type(&mut self, algorithm: Algorithm) -> CtapResult<()> {
        let mut state = self.shared.state.lock().unwrap();
        state.calls.push(Call::CredSetType(algorithm.as_cose()));
        state.should_fail(FailPoint::CredType)
    }

    fn set_rp(&mut self, id: &str, name: &str) -> CtapResult<()> {
        let mut state = self.shared.state.lock().unwrap();
        state.calls.push(Call::CredSetRp {
            id: id.to_owned(),
            name: name.to_owned(),
        });
        state.should_fail(FailPoint::CredRp)
    }

    fn set_user(&mut self, id: &[u8], name: &str, display_name: &str) -> CtapResult<()> {
        let mut state = self.shared.state.lock().unwrap();
        state.calls.push(Call::CredSetUser {
            id: id.to_vec(),
            name: name.to_owned(),
            display_name: display_name.to_owned(),
        });
        state.should_fail(FailPoint::CredUser)
    }

    fn set_client_data_hash(&mut self, hash: &[u8]) -> CtapResult<()> {
        let mut state = self.shared.state.lock().unwrap();
        state.calls.push(Call::CredSetClientDataHash(hash.to_vec()));
        state.should_fail(FailPoint::CredClientData)
    }

    fn set_resident_key(&mut self, resident_key: bool) -> CtapResult<()> {
        let mut state = self.shared.state.lock().unwrap();
        state.calls.push(Call::CredSetResidentKey(resident_key));
        state.should_fail(FailPoint::CredResidentKey)
    }

    fn set_user_verification(&mut self, user_verification: Option<bool>) -> CtapResult<()> {
        let mut state = self.shared.state.lock().unwrap();
        state.calls.push(Call::CredSetUv(user_verification));
        state.should_fail(FailPoint::CredUv)
    }

    fn id(&self) -> &[u8] {
        &self.id
    }

    fn authenticator_data(&self) -> &[u8] {
        &self.authenticator_data
    }

    fn attestation_object(&self) -> &[u8] {
        &self.attestation_object
    }
}

impl Drop for VirtualCredential {
    fn drop(&mut self) {
        self.shared.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Virtual protocol assertion object
pub struct VirtualAssertion {
    shared: Arc<Shared>,
    results: Vec<ScriptedAssertion>,
}

impl AssertionHandle for VirtualAssertion {
    fn set_rp(&mut self, id: &str) -> CtapResult<()> {
        let mut state = self.shared.state.lock().unwrap();
        state.calls.push(Call::AssertSetRp(id.to_owned()));
        state.should_fail(FailPoint::AssertRp)
    }

    fn set_client_data_hash(&mut self, hash: &[u8]) -> CtapResult<()> {
        let mut state = self.shared.state.lock().unwrap();
        state
            .calls
            .push(Call::AssertSetClientDataHash(hash.to_vec()));
        state.should_fail(FailPoint::AssertClientData)
    }

    fn allow_credential(&mut self, credential_id: &[u8]) -> CtapResult<()> {
        let mut state = self.shared.state.lock().unwrap();
        state
            .calls
            .push(Call::AssertAllowCredential(credential_id.to_vec()));
        state.should_fail(FailPoint::AllowCredential)
    }

    fn set_user_verification(&mut self, user_verification: Option<bool>) -> CtapResult<()> {
        let mut state = self.shared.state.lock().unwrap();
        state.calls.push(Call::AssertSetUv(user_verification));
        state.should_fail(FailPoint::AssertUv)
    }

    fn count(&self) -> usize {
        self.results.len()
    }

    fn id(&self, index: usize) -> &[u8] {
        &self.results[index].id
    }

    fn authenticator_data(&self, index: usize) -> &[u8] {
        &self.results[index].authenticator_data
    }

    fn signature(&self, index: usize) -> &[u8] {
        &self.results[index].signature
    }

    fn user_id(&self, index: usize) -> &[u8] {
        &self.results[index].user_id
    }
}

impl Drop for VirtualAssertion {
    fn drop(&mut self) {
        self.shared.live.fetch_sub(1, Ordering::SeqCst);
    }
}
