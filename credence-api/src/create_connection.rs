//! # Create Connection Endpoint
//!
//! Creates a connection invitation. The platform returns the invitation
//! record, including the URL the counterparty uses to accept it.

use platform::{NewConnection, Platform, Record};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::{Error, Result};

/// A request to create a connection invitation.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CreateConnectionRequest {
    /// The inviting organization. Set from the request query by the web
    /// layer.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub org_name: String,

    /// Display name for the connection.
    #[serde(default)]
    pub connection_name: String,
}

/// The created connection invitation, in the record's mapping form.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct CreateConnectionResponse {
    /// Field name to value mapping of the platform record.
    pub record: Map<String, Value>,
}

/// Create connection request handler.
///
/// # Errors
///
/// Returns an error if the request is invalid or the platform call fails.
#[instrument(level = "debug", skip(platform))]
pub async fn create_connection(
    platform: impl Platform, request: &CreateConnectionRequest,
) -> Result<CreateConnectionResponse> {
    verify(request)?;
    process(platform, request).await
}

fn verify(request: &CreateConnectionRequest) -> Result<()> {
    tracing::debug!("create_connection::verify");

    if request.org_name.is_empty() {
        return Err(Error::InvalidRequest("no org_name specified".into()));
    }
    if request.connection_name.is_empty() {
        return Err(Error::InvalidRequest("no connection_name specified".into()));
    }
    Ok(())
}

async fn process(
    platform: impl Platform, request: &CreateConnectionRequest,
) -> Result<CreateConnectionResponse> {
    tracing::debug!("create_connection::process");

    let connection = NewConnection {
        name: request.connection_name.clone(),
        connection_id: None,
        multi_party: false,
    };

    let created = platform
        .create_connection(&connection)
        .await
        .map_err(|e| Error::Platform(format!("issue creating connection: {e}")))?;

    let record = created
        .as_record()
        .map_err(|e| Error::ServerError(format!("issue rendering record: {e}")))?;

    Ok(CreateConnectionResponse { record })
}
