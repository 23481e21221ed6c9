//! Browser-shaped WebAuthn layer
//!
//! Mirrors the `navigator.credentials` surface on top of [`Client`]: it
//! assembles and hashes the client data JSON the way a browser would,
//! applies relying-party defaults, and can retry once with a PIN obtained
//! from a caller-supplied prompt when the authenticator demands one. The
//! serialized client data is attached to every returned result so the
//! relying party can verify what was signed.

use crate::backend::CtapBackend;
use crate::client::Client;
use crate::error::Result;
use crate::request::{AssertionRequest, CredentialCreationRequest};
use crate::response::{Assertion, CreatedCredential};
use crate::types::{AuthenticatorDevice, CredentialType, RelyingParty, User, UserVerification};

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

/// Callback used to obtain a PIN when the authenticator requires one
pub type PinPrompt = Box<dyn Fn() -> Option<String> + Send + Sync>;

/// Defaults applied to requests that leave the corresponding field unset
#[derive(Clone, Debug)]
pub struct WebAuthnConfig {
    /// Fallback relying party name for creation requests without one
    pub rp_name: Option<String>,
    /// Fallback user verification policy
    pub user_verification: UserVerification,
}

impl Default for WebAuthnConfig {
    fn default() -> Self {
        Self {
            rp_name: None,
            user_verification: UserVerification::Preferred,
        }
    }
}

/// Authenticator selection criteria subset honored by this layer
#[derive(Clone, Copy, Debug, Default)]
pub struct AuthenticatorSelection {
    /// Request a resident key (discoverable credential)
    pub require_resident_key: bool,
    /// User verification policy; the config default applies when unset
    pub user_verification: Option<UserVerification>,
}

/// Credential creation options, the `navigator.credentials.create` shape
#[derive(Clone)]
pub struct CreateOptions {
    /// Relying party; the config name fallback applies when `name` is unset
    pub rp: RelyingParty,
    /// User entity
    pub user: User,
    /// Raw challenge bytes; this layer hashes them into the client data hash
    pub challenge: Vec<u8>,
    /// Authenticator selection criteria
    pub authenticator_selection: Option<AuthenticatorSelection>,
    /// Explicit device path; first enumerated device when unset
    pub device: Option<String>,
    /// Device PIN
    pub pin: Option<String>,
}

impl fmt::Debug for CreateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateOptions")
            .field("rp", &self.rp)
            .field("user", &self.user)
            .field("challenge", &self.challenge)
            .field("authenticator_selection", &self.authenticator_selection)
            .field("device", &self.device)
            .field("pin", &self.pin.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Reference to an existing credential by id
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialDescriptor {
    /// The credential id
    pub id: Vec<u8>,
    /// The type of credential
    pub credential_type: CredentialType,
}

impl CredentialDescriptor {
    /// Create a public key credential descriptor.
    pub fn public_key(id: Vec<u8>) -> Self {
        Self {
            id,
            credential_type: CredentialType::PublicKey,
        }
    }
}

/// Assertion request options, the `navigator.credentials.get` shape
#[derive(Clone)]
pub struct GetOptions {
    /// Relying party id
    pub rp_id: String,
    /// Raw challenge bytes; this layer hashes them into the client data hash
    pub challenge: Vec<u8>,
    /// Credentials the caller will accept; empty means discoverable
    /// credentials are used
    pub allow_credentials: Vec<CredentialDescriptor>,
    /// User verification policy; the config default applies when unset
    pub user_verification: Option<UserVerification>,
    /// Explicit device path; first enumerated device when unset
    pub device: Option<String>,
    /// Device PIN
    pub pin: Option<String>,
}

impl fmt::Debug for GetOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GetOptions")
            .field("rp_id", &self.rp_id)
            .field("challenge", &self.challenge)
            .field("allow_credentials", &self.allow_credentials)
            .field("user_verification", &self.user_verification)
            .field("device", &self.device)
            .field("pin", &self.pin.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// High-level WebAuthn front end over a [`Client`]
pub struct WebAuthn<B: CtapBackend> {
    client: Client<B>,
    config: WebAuthnConfig,
    pin_prompt: Option<PinPrompt>,
}

impl<B: CtapBackend> WebAuthn<B> {
    /// Create a WebAuthn front end with default configuration.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, WebAuthnConfig::default())
    }

    /// Create a WebAuthn front end with the given configuration.
    pub fn with_config(backend: B, config: WebAuthnConfig) -> Self {
        Self {
            client: Client::new(backend),
            config,
            pin_prompt: None,
        }
    }

    /// Install a PIN prompt.
    ///
    /// When a transaction fails because a PIN is required or was wrong, the
    /// prompt is asked once for a PIN and the transaction is retried with
    /// it. Without a prompt the PIN failure is surfaced unchanged.
    pub fn with_pin_prompt(
        mut self,
        prompt: impl Fn() -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.pin_prompt = Some(Box::new(prompt));
        self
    }

    /// List attached authenticators.
    pub fn list_devices(&self) -> Result<Vec<AuthenticatorDevice>> {
        self.client.list_devices()
    }

    /// Create a credential, as `navigator.credentials.create` would.
    pub fn create(&self, options: CreateOptions) -> Result<CreatedCredential> {
        let client_data = client_data_json("webauthn.create", &options.challenge, &options.rp.id);
        let challenge = Sha256::digest(&client_data).to_vec();

        let selection = options.authenticator_selection.unwrap_or_default();
        let user_verification = selection
            .user_verification
            .unwrap_or(self.config.user_verification);

        let mut request = CredentialCreationRequest::new(options.rp.id, options.user.id, challenge)
            .with_resident_key(selection.require_resident_key)
            .with_user_verification(user_verification);
        if let Some(name) = options.rp.name.or_else(|| self.config.rp_name.clone()) {
            request = request.with_rp_name(name);
        }
        if let Some(name) = options.user.name {
            request = request.with_user_name(name);
        }
        if let Some(display_name) = options.user.display_name {
            request = request.with_user_display_name(display_name);
        }
        if let Some(device) = options.device {
            request = request.with_device(device);
        }
        if let Some(pin) = options.pin {
            request = request.with_pin(pin);
        }

        let mut created = match self.client.make_credential(&request) {
            Ok(created) => created,
            Err(err) if err.needs_pin() => {
                let pin = self.prompt_pin().ok_or(err)?;
                debug!("retrying makeCredential with prompted PIN");
                self.client.make_credential(&request.with_pin(pin))?
            }
            Err(err) => return Err(err),
        };

        created.response.client_data_json = Some(client_data);
        Ok(created)
    }

    /// Get an assertion, as `navigator.credentials.get` would.
    pub fn get(&self, options: GetOptions) -> Result<Assertion> {
        let client_data = client_data_json("webauthn.get", &options.challenge, &options.rp_id);
        let challenge = Sha256::digest(&client_data).to_vec();

        let user_verification = options
            .user_verification
            .unwrap_or(self.config.user_verification);

        let mut request = AssertionRequest::new(options.rp_id, challenge)
            .with_allowed_credentials(
                options
                    .allow_credentials
                    .into_iter()
                    .map(|credential| credential.id)
                    .collect(),
            )
            .with_user_verification(user_verification);
        if let Some(device) = options.device {
            request = request.with_device(device);
        }
        if let Some(pin) = options.pin {
            request = request.with_pin(pin);
        }

        let mut assertion = match self.client.get_assertion(&request) {
            Ok(assertion) => assertion,
            Err(err) if err.needs_pin() => {
                let pin = self.prompt_pin().ok_or(err)?;
                debug!("retrying getAssertion with prompted PIN");
                self.client.get_assertion(&request.with_pin(pin))?
            }
            Err(err) => return Err(err),
        };

        assertion.response.client_data_json = Some(client_data);
        Ok(assertion)
    }

    fn prompt_pin(&self) -> Option<String> {
        self.pin_prompt.as_ref().and_then(|prompt| prompt())
    }
}

#[derive(Serialize)]
struct ClientData<'a> {
    #[serde(rename = "type")]
    ceremony: &'a str,
    challenge: String,
    origin: String,
    #[serde(rename = "crossOrigin")]
    cross_origin: bool,
}

/// Client data JSON the way a browser would assemble it.
fn client_data_json(ceremony: &str, challenge: &[u8], rp_id: &str) -> Vec<u8> {
    let data = ClientData {
        ceremony,
        challenge: URL_SAFE_NO_PAD.encode(challenge),
        origin: format!("https://{rp_id}"),
        cross_origin: false,
    };
    serde_json::to_vec(&data).expect("client data is always serializable")
}
