//! # Connections Endpoint
//!
//! Returns the requesting organization's connection records. Connections are
//! established channels between the organization and a holder or verifier;
//! their lifecycles are owned by the credential platform.

use platform::{Platform, Record};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::{Error, Result};

/// A request for an organization's connection records.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ConnectionsRequest {
    /// The organization whose records are requested. Set from the request
    /// query by the web layer.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub org_name: String,

    /// Only return connections in the specified state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// The organization's connection records.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ConnectionsResponse {
    /// One entry per connection record, in the record's mapping form.
    pub connections: Vec<Map<String, Value>>,
}

/// Connections request handler.
///
/// # Errors
///
/// Returns an error if the request is invalid or the platform call fails.
#[instrument(level = "debug", skip(platform))]
pub async fn connections(
    platform: impl Platform, request: &ConnectionsRequest,
) -> Result<ConnectionsResponse> {
    verify(request)?;
    process(platform, request).await
}

fn verify(request: &ConnectionsRequest) -> Result<()> {
    tracing::debug!("connections::verify");

    if request.org_name.is_empty() {
        return Err(Error::InvalidRequest("no org_name specified".into()));
    }
    Ok(())
}

async fn process(
    platform: impl Platform, request: &ConnectionsRequest,
) -> Result<ConnectionsResponse> {
    tracing::debug!("connections::process");

    let connections = platform
        .connections(request.state.as_deref())
        .await
        .map_err(|e| Error::Platform(format!("issue listing connections: {e}")))?;

    let connections = connections
        .iter()
        .map(Record::as_record)
        .collect::<platform::Result<_>>()
        .map_err(|e| Error::ServerError(format!("issue rendering records: {e}")))?;

    Ok(ConnectionsResponse { connections })
}
