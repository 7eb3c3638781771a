//! # Credential Platform Client
//!
//! Types and client for the external credential platform. The platform owns
//! the lifecycles of connections, credential definitions, verification
//! policies, credentials, and verifications — this crate only supplies
//! parameters and relays results.
//!
//! The [`Platform`] trait is the seam between the proxy and the vendor: each
//! method corresponds to exactly one platform operation. [`Controller`] is
//! the HTTP implementation, constructed fresh for each request and bound to
//! a single organization's API key.

mod controller;

use std::future::Future;
use std::io::Cursor;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
pub use controller::Controller;
use qrcode::QrCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result type for platform operations.
pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;

/// The `Platform` trait is the interface to the external credential
/// platform. Implementers are responsible for transport, authentication,
/// and vendor-side failures; callers invoke exactly one operation per
/// inbound request.
pub trait Platform: Send + Sync {
    /// List the organization's connection records, optionally filtered by
    /// connection state.
    fn connections(
        &self, state: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Connection>>> + Send;

    /// List the organization's credential definitions.
    fn credential_definitions(
        &self,
    ) -> impl Future<Output = Result<Vec<CredentialDefinition>>> + Send;

    /// List the organization's verification policies.
    fn verification_policies(
        &self,
    ) -> impl Future<Output = Result<Vec<VerificationPolicy>>> + Send;

    /// Publish a credential definition from which credentials can be issued.
    fn publish_credential_definition(
        &self, definition: &NewCredentialDefinition,
    ) -> impl Future<Output = Result<CredentialDefinition>> + Send;

    /// Create a verification policy describing what a proof request must
    /// contain.
    fn create_verification_policy(
        &self, policy: &NewVerificationPolicy,
    ) -> impl Future<Output = Result<VerificationPolicy>> + Send;

    /// Create a connection invitation.
    fn create_connection(
        &self, connection: &NewConnection,
    ) -> impl Future<Output = Result<Connection>> + Send;

    /// Create a credential offer for the specified definition.
    fn create_credential(
        &self, credential: &NewCredential,
    ) -> impl Future<Output = Result<Credential>> + Send;

    /// Send a verification request, built from the specified policy, to the
    /// specified connection.
    fn send_verification_from_policy(
        &self, connection_id: &str, policy_id: &str,
    ) -> impl Future<Output = Result<Verification>> + Send;

    /// Retrieve a verification record by id.
    fn verification(
        &self, verification_id: &str,
    ) -> impl Future<Output = Result<Verification>> + Send;
}

/// Platform records render to a mapping of field name to value for inclusion
/// in API responses, decoupled from the record's internal representation.
pub trait Record: Serialize {
    /// Render the record as a mapping of field name to value.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not serialize to a JSON object.
    fn as_record(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Err(anyhow!("record should serialize to an object")),
        }
    }
}

/// An established channel between an issuer and a holder or verifier.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Platform-assigned connection identifier.
    pub connection_id: String,

    /// Display name given to the connection when it was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Lifecycle state of the connection, owned by the platform.
    pub state: String,

    /// Invitation URL the counterparty uses to establish the connection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invitation_url: Option<String>,

    /// Whether the invitation can be accepted by more than one party.
    pub multi_party: bool,

    /// When the connection record was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at_utc: Option<DateTime<Utc>>,
}

impl Record for Connection {}

/// A schema-bound template from which credentials are issued.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDefinition {
    /// Platform-assigned definition identifier.
    pub definition_id: String,

    /// Schema name the definition is bound to.
    pub name: String,

    /// Schema version.
    pub version: String,

    /// Attribute names issuable under this definition.
    pub attributes: Vec<String>,

    /// Whether credentials issued under this definition can be revoked.
    pub support_revocation: bool,

    /// Tag distinguishing definitions bound to the same schema.
    pub tag: String,

    /// When the definition was published.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at_utc: Option<DateTime<Utc>>,
}

impl Record for CredentialDefinition {}

/// A rule set describing what a proof request must contain.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationPolicy {
    /// Platform-assigned policy identifier.
    pub policy_id: String,

    /// Policy name.
    pub name: String,

    /// Policy version.
    pub version: String,

    /// Attribute names a proof must disclose.
    pub attributes: Vec<String>,

    /// When the policy was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at_utc: Option<DateTime<Utc>>,
}

impl Record for VerificationPolicy {}

/// A credential offer issued under a credential definition.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Platform-assigned credential identifier.
    pub credential_id: String,

    /// The definition the credential was issued under.
    pub definition_id: String,

    /// Connection the offer was sent to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,

    /// Lifecycle state of the offer, owned by the platform.
    pub state: String,

    /// URL the holder opens (or scans as a QR code) to accept the offer.
    pub offer_url: String,

    /// Attribute values the credential asserts.
    pub values: Map<String, Value>,
}

impl Record for Credential {}

impl Credential {
    /// Generate a QR code for the credential offer. Holders scan the code to
    /// retrieve and accept the offer.
    ///
    /// # Errors
    ///
    /// Returns an error if the offer URL cannot be encoded or the image
    /// cannot be rendered.
    pub fn offer_qrcode(&self) -> Result<Vec<u8>> {
        offer_qrcode(&self.offer_url)
    }
}

/// A verification record tracking a proof request sent to a connection.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    /// Platform-assigned verification identifier.
    pub verification_id: String,

    /// Connection the proof request was sent to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,

    /// The policy the proof request was built from.
    pub policy_id: String,

    /// Lifecycle state of the verification, owned by the platform.
    pub state: String,

    /// Whether the presented proof satisfied the policy.
    pub is_valid: bool,

    /// When the proof was verified, if it has been.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_at_utc: Option<DateTime<Utc>>,
}

impl Record for Verification {}

/// Parameters for publishing a credential definition.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCredentialDefinition {
    /// Schema name to bind the definition to.
    pub name: String,

    /// Schema version.
    pub version: String,

    /// Attribute names issuable under the definition.
    pub attributes: Vec<String>,

    /// Whether issued credentials can be revoked.
    pub support_revocation: bool,

    /// Tag distinguishing definitions bound to the same schema.
    pub tag: String,
}

/// Parameters for creating a verification policy.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVerificationPolicy {
    /// Policy name.
    pub name: String,

    /// Policy version.
    pub version: String,

    /// Attribute names a proof must disclose.
    pub attributes: Vec<String>,

    /// Predicate constraints on attribute values. The platform defines the
    /// shape; the proxy forwards it opaquely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicates: Option<Value>,

    /// Revocation requirement for presented credentials. Forwarded opaquely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation_requirement: Option<Value>,
}

/// Parameters for creating a connection invitation.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConnection {
    /// Display name for the connection.
    pub name: String,

    /// Caller-supplied connection identifier, if the platform should not
    /// assign one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,

    /// Whether the invitation can be accepted by more than one party.
    pub multi_party: bool,
}

/// Parameters for creating a credential offer.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCredential {
    /// The definition to issue under.
    pub definition_id: String,

    /// Connection to send the offer to. When absent the platform returns a
    /// connectionless offer URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,

    /// Attribute values the credential asserts.
    pub credential_values: Map<String, Value>,

    /// Whether the platform should complete issuance without a further
    /// issuer approval step.
    pub automatic_issuance: bool,
}

/// Generate a QR code PNG for a credential offer URL.
///
/// # Errors
///
/// Returns an error if the URL cannot be encoded or the image cannot be
/// rendered.
pub fn offer_qrcode(url: &str) -> Result<Vec<u8>> {
    let qr_code = QrCode::new(url).map_err(|e| anyhow!("Failed to create QR code: {e}"))?;

    // write image to buffer
    let img_buf = qr_code.render::<image::Luma<u8>>().build();
    let mut buffer: Vec<u8> = Vec::new();
    let mut writer = Cursor::new(&mut buffer);
    img_buf
        .write_to(&mut writer, image::ImageFormat::Png)
        .map_err(|e| anyhow!("Failed to render QR code: {e}"))?;

    Ok(buffer)
}
