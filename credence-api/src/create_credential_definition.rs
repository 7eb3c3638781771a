//! # Create Credential Definition Endpoint
//!
//! Publishes a credential definition — a schema-bound template the
//! organization can subsequently issue credentials from. The platform owns
//! schema registration and ledger writes; this endpoint forwards the
//! definition parameters and returns the published record.

use platform::{NewCredentialDefinition, Platform, Record};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::{Error, Result};

/// A request to publish a credential definition.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CreateCredentialDefinitionRequest {
    /// The publishing organization. Set from the request query by the web
    /// layer.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub org_name: String,

    /// Name of the schema to bind the definition to.
    #[serde(default)]
    pub schema_name: String,

    /// Schema version.
    #[serde(default)]
    pub version: String,

    /// Attribute names issuable under the definition.
    #[serde(default)]
    pub attributes: Vec<String>,

    /// Tag distinguishing definitions bound to the same schema.
    #[serde(default)]
    pub tag: String,
}

/// The published credential definition, in the record's mapping form.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct CreateCredentialDefinitionResponse {
    /// Field name to value mapping of the platform record.
    pub record: Map<String, Value>,
}

/// Create credential definition request handler.
///
/// # Errors
///
/// Returns an error if the request is invalid or the platform call fails.
#[instrument(level = "debug", skip(platform))]
pub async fn create_credential_definition(
    platform: impl Platform, request: &CreateCredentialDefinitionRequest,
) -> Result<CreateCredentialDefinitionResponse> {
    verify(request)?;
    process(platform, request).await
}

fn verify(request: &CreateCredentialDefinitionRequest) -> Result<()> {
    tracing::debug!("create_credential_definition::verify");

    if request.org_name.is_empty() {
        return Err(Error::InvalidRequest("no org_name specified".into()));
    }
    if request.schema_name.is_empty() {
        return Err(Error::InvalidRequest("no schema_name specified".into()));
    }
    if request.version.is_empty() {
        return Err(Error::InvalidRequest("no version specified".into()));
    }
    if request.attributes.is_empty() {
        return Err(Error::InvalidRequest("no attributes specified".into()));
    }
    if request.tag.is_empty() {
        return Err(Error::InvalidRequest("no tag specified".into()));
    }
    Ok(())
}

async fn process(
    platform: impl Platform, request: &CreateCredentialDefinitionRequest,
) -> Result<CreateCredentialDefinitionResponse> {
    tracing::debug!("create_credential_definition::process");

    // TODO: revocation-enabled definitions
    let definition = NewCredentialDefinition {
        name: request.schema_name.clone(),
        version: request.version.clone(),
        attributes: request.attributes.clone(),
        support_revocation: false,
        tag: request.tag.clone(),
    };

    let published = platform
        .publish_credential_definition(&definition)
        .await
        .map_err(|e| Error::Platform(format!("issue publishing definition: {e}")))?;

    let record = published
        .as_record()
        .map_err(|e| Error::ServerError(format!("issue rendering record: {e}")))?;

    Ok(CreateCredentialDefinitionResponse { record })
}
