//! # Issue Credential Endpoint
//!
//! Creates a credential offer under an existing credential definition. The
//! platform returns the offer record; issuance itself completes between the
//! platform and the holder's wallet.

use platform::{NewCredential, Platform, Record};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::{Error, Result};

/// A request to issue a credential.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct IssueCredentialRequest {
    /// The issuing organization. Set from the request query by the web
    /// layer.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub org_name: String,

    /// The credential definition to issue under.
    #[serde(default)]
    pub cred_def_id: String,

    /// Attribute values the credential asserts, keyed by attribute name.
    #[serde(default)]
    pub credential_values: Map<String, Value>,
}

/// The credential offer, in the record's mapping form.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct IssueCredentialResponse {
    /// Field name to value mapping of the platform record.
    pub record: Map<String, Value>,
}

/// Issue credential request handler.
///
/// # Errors
///
/// Returns an error if the request is invalid or the platform call fails.
#[instrument(level = "debug", skip(platform))]
pub async fn issue_credential(
    platform: impl Platform, request: &IssueCredentialRequest,
) -> Result<IssueCredentialResponse> {
    verify(request)?;
    process(platform, request).await
}

fn verify(request: &IssueCredentialRequest) -> Result<()> {
    tracing::debug!("issue_credential::verify");

    if request.org_name.is_empty() {
        return Err(Error::InvalidRequest("no org_name specified".into()));
    }
    if request.cred_def_id.is_empty() {
        return Err(Error::InvalidRequest("no cred_def_id specified".into()));
    }
    if request.credential_values.is_empty() {
        return Err(Error::InvalidRequest("no credential_values specified".into()));
    }
    Ok(())
}

async fn process(
    platform: impl Platform, request: &IssueCredentialRequest,
) -> Result<IssueCredentialResponse> {
    tracing::debug!("issue_credential::process");

    let credential = NewCredential {
        definition_id: request.cred_def_id.clone(),
        connection_id: None,
        credential_values: request.credential_values.clone(),
        automatic_issuance: false,
    };

    let offered = platform
        .create_credential(&credential)
        .await
        .map_err(|e| Error::Platform(format!("issue creating credential: {e}")))?;

    let record = offered
        .as_record()
        .map_err(|e| Error::ServerError(format!("issue rendering record: {e}")))?;

    Ok(IssueCredentialResponse { record })
}
