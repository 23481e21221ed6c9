//! Response types returned to the caller
//!
//! Every byte buffer here is an independently owned copy, taken out of the
//! protocol object before that object is dropped. Nothing returned to the
//! caller aliases protocol-owned memory.

use crate::backend::{AssertionHandle, CredentialHandle};
use crate::error::{Error, Result};
use crate::types::CredentialType;

use serde::Serialize;

/// Attestation data for a newly created credential
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AttestationResponse {
    /// Authenticator data, byte-for-byte as returned by the device
    pub authenticator_data: Vec<u8>,
    /// Attestation bytes, byte-for-byte as returned by the device
    pub attestation_object: Vec<u8>,
    /// Serialized client data JSON; filled by the WebAuthn layer, left
    /// unset by the core client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_data_json: Option<Vec<u8>>,
}

/// Result of a successful makeCredential operation
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreatedCredential {
    /// Credential id assigned by the authenticator
    pub id: Vec<u8>,
    /// Same bytes as `id`, kept as a second view to match the WebAuthn
    /// response shape
    pub raw_id: Vec<u8>,
    /// Always `public-key`
    #[serde(rename = "type")]
    pub credential_type: CredentialType,
    /// Attestation payload
    pub response: AttestationResponse,
}

impl CreatedCredential {
    /// Copy the authenticator's outputs out of the protocol object.
    pub(crate) fn from_handle(credential: &impl CredentialHandle) -> Self {
        let id = credential.id().to_vec();
        Self {
            raw_id: id.clone(),
            id,
            credential_type: CredentialType::PublicKey,
            response: AttestationResponse {
                authenticator_data: credential.authenticator_data().to_vec(),
                attestation_object: credential.attestation_object().to_vec(),
                client_data_json: None,
            },
        }
    }
}

/// Signed authentication data for one assertion
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AssertionResponse {
    /// Authenticator data, byte-for-byte as returned by the device
    pub authenticator_data: Vec<u8>,
    /// Assertion signature
    pub signature: Vec<u8>,
    /// User handle, when the authenticator stored one for this credential.
    /// `None` is distinct from an empty handle and means "no handle".
    pub user_handle: Option<Vec<u8>>,
    /// Serialized client data JSON; filled by the WebAuthn layer, left
    /// unset by the core client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_data_json: Option<Vec<u8>>,
}

/// Result of a successful getAssertion operation
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Assertion {
    /// Id of the credential that produced the assertion
    pub id: Vec<u8>,
    /// Same bytes as `id`
    pub raw_id: Vec<u8>,
    /// Always `public-key`
    #[serde(rename = "type")]
    pub credential_type: CredentialType,
    /// Assertion payload
    pub response: AssertionResponse,
}

impl Assertion {
    /// Copy the first assertion out of the protocol object.
    ///
    /// A transaction that reports zero assertions is a failure, not an empty
    /// success. When more than one assertion is returned, index 0 is chosen
    /// deterministically; disambiguation is the caller's problem.
    pub(crate) fn from_handle(assertion: &impl AssertionHandle) -> Result<Self> {
        if assertion.count() == 0 {
            return Err(Error::EmptyResult);
        }

        let id = assertion.id(0).to_vec();
        let user_id = assertion.user_id(0);
        let user_handle = if user_id.is_empty() {
            None
        } else {
            Some(user_id.to_vec())
        };

        Ok(Self {
            raw_id: id.clone(),
            id,
            credential_type: CredentialType::PublicKey,
            response: AssertionResponse {
                authenticator_data: assertion.authenticator_data(0).to_vec(),
                signature: assertion.signature(0).to_vec(),
                user_handle,
                client_data_json: None,
            },
        })
    }
}
