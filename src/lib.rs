#![warn(unused_extern_crates)]

//! # fido2-webauthn
//!
//! A WebAuthn-shaped client for FIDO2/CTAP2 authenticators. The crate
//! validates caller-supplied parameters, selects a target device, maps the
//! request onto protocol credential/assertion objects, drives one blocking
//! device transaction, and copies the binary outputs (credential ids,
//! authenticator data, attestation, signatures) byte-for-byte into
//! caller-owned result structures.
//!
//! The wire protocol itself is out of scope: the client drives any engine
//! implementing the [`backend`] traits, from an FFI binding to a virtual
//! authenticator used in tests.
//!
//! ## Architecture
//!
//! - **[`Client`]**: the core operations `list_devices`, `make_credential`
//!   and `get_assertion`, with validate → select → build → transact → marshal
//!   ordering and scoped device sessions
//! - **[`WebAuthn`](webauthn::WebAuthn)**: a `navigator.credentials`-shaped
//!   layer that assembles and hashes the client data JSON and can retry once
//!   with a prompted PIN
//! - **[`backend`]**: the device library interface the client drives
//!
//! ## Example
//!
//! ```
//! use fido2_webauthn::{Client, CredentialCreationRequest, CtapBackend, Error, UserVerification};
//!
//! fn register<B: CtapBackend>(backend: B) -> Result<(), Error> {
//!     let client = Client::new(backend);
//!     for device in client.list_devices()? {
//!         println!("{} ({} {})", device.path, device.manufacturer, device.product);
//!     }
//!
//!     let request = CredentialCreationRequest::new(
//!         "example.com",
//!         b"user-1".to_vec(),
//!         vec![0u8; 32], // client data hash
//!     )
//!     .with_user_name("alice")
//!     .with_resident_key(true)
//!     .with_user_verification(UserVerification::Required);
//!
//!     let credential = client.make_credential(&request)?;
//!     println!("credential id: {}", hex::encode(&credential.id));
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod client;
pub mod error;
pub mod request;
pub mod response;
mod session;
pub mod status;
pub mod types;
pub mod webauthn;

// Re-export main types at root level for convenience
pub use backend::{Algorithm, AssertionHandle, CredentialHandle, CtapBackend, CtapDevice};
pub use client::Client;
pub use error::{Error, Result, Stage};
pub use request::{AssertionRequest, CredentialCreationRequest};
pub use response::{Assertion, AssertionResponse, AttestationResponse, CreatedCredential};
pub use status::{CtapResult, StatusCode};
pub use types::{AuthenticatorDevice, CredentialType, RelyingParty, User, UserVerification};
pub use webauthn::{
    AuthenticatorSelection, CreateOptions, CredentialDescriptor, GetOptions, WebAuthn,
    WebAuthnConfig,
};
