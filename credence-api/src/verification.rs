//! # Verification Endpoint
//!
//! Retrieves a verification record by id. Front-ends poll this endpoint to
//! determine whether a requested verification succeeded.

use platform::{Platform, Record};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::{Error, Result};

/// A request for a verification record.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct VerificationRequest {
    /// The requesting organization. Set from the request query by the web
    /// layer.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub org_name: String,

    /// The verification record to retrieve.
    #[serde(default)]
    pub verification_id: String,
}

/// The verification record, in the record's mapping form.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct VerificationResponse {
    /// Field name to value mapping of the platform record.
    pub record: Map<String, Value>,
}

/// Verification request handler.
///
/// # Errors
///
/// Returns an error if the request is invalid or the platform call fails.
#[instrument(level = "debug", skip(platform))]
pub async fn verification(
    platform: impl Platform, request: &VerificationRequest,
) -> Result<VerificationResponse> {
    verify(request)?;
    process(platform, request).await
}

fn verify(request: &VerificationRequest) -> Result<()> {
    tracing::debug!("verification::verify");

    if request.org_name.is_empty() {
        return Err(Error::InvalidRequest("no org_name specified".into()));
    }
    if request.verification_id.is_empty() {
        return Err(Error::InvalidRequest("no verification_id specified".into()));
    }
    Ok(())
}

async fn process(
    platform: impl Platform, request: &VerificationRequest,
) -> Result<VerificationResponse> {
    tracing::debug!("verification::process");

    let verification = platform
        .verification(&request.verification_id)
        .await
        .map_err(|e| Error::Platform(format!("issue retrieving verification: {e}")))?;

    let record = verification
        .as_record()
        .map_err(|e| Error::ServerError(format!("issue rendering record: {e}")))?;

    Ok(VerificationResponse { record })
}
