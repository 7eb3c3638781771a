//! # Credential Definitions Endpoint
//!
//! Returns the requesting organization's published credential definitions.

use platform::{Platform, Record};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::{Error, Result};

/// A request for an organization's credential definitions.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CredentialDefinitionsRequest {
    /// The organization whose records are requested. Set from the request
    /// query by the web layer.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub org_name: String,
}

/// The organization's credential definitions.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CredentialDefinitionsResponse {
    /// One entry per definition, in the record's mapping form.
    pub credential_definitions: Vec<Map<String, Value>>,
}

/// Credential definitions request handler.
///
/// # Errors
///
/// Returns an error if the request is invalid or the platform call fails.
#[instrument(level = "debug", skip(platform))]
pub async fn credential_definitions(
    platform: impl Platform, request: &CredentialDefinitionsRequest,
) -> Result<CredentialDefinitionsResponse> {
    verify(request)?;
    process(platform, request).await
}

fn verify(request: &CredentialDefinitionsRequest) -> Result<()> {
    tracing::debug!("credential_definitions::verify");

    if request.org_name.is_empty() {
        return Err(Error::InvalidRequest("no org_name specified".into()));
    }
    Ok(())
}

async fn process(
    platform: impl Platform, request: &CredentialDefinitionsRequest,
) -> Result<CredentialDefinitionsResponse> {
    tracing::debug!("credential_definitions::process");

    let definitions = platform
        .credential_definitions()
        .await
        .map_err(|e| Error::Platform(format!("issue listing credential definitions: {e}")))?;

    let credential_definitions = definitions
        .iter()
        .map(Record::as_record)
        .collect::<platform::Result<_>>()
        .map_err(|e| Error::ServerError(format!("issue rendering records: {e}")))?;

    Ok(CredentialDefinitionsResponse { credential_definitions })
}
