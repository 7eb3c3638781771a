//! # Verification Policies Endpoint
//!
//! Returns the requesting organization's verification policies.

use platform::{Platform, Record};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::{Error, Result};

/// A request for an organization's verification policies.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct VerificationPoliciesRequest {
    /// The organization whose records are requested. Set from the request
    /// query by the web layer.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub org_name: String,
}

/// The organization's verification policies.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct VerificationPoliciesResponse {
    /// One entry per policy, in the record's mapping form.
    pub verification_policies: Vec<Map<String, Value>>,
}

/// Verification policies request handler.
///
/// # Errors
///
/// Returns an error if the request is invalid or the platform call fails.
#[instrument(level = "debug", skip(platform))]
pub async fn verification_policies(
    platform: impl Platform, request: &VerificationPoliciesRequest,
) -> Result<VerificationPoliciesResponse> {
    verify(request)?;
    process(platform, request).await
}

fn verify(request: &VerificationPoliciesRequest) -> Result<()> {
    tracing::debug!("verification_policies::verify");

    if request.org_name.is_empty() {
        return Err(Error::InvalidRequest("no org_name specified".into()));
    }
    Ok(())
}

async fn process(
    platform: impl Platform, request: &VerificationPoliciesRequest,
) -> Result<VerificationPoliciesResponse> {
    tracing::debug!("verification_policies::process");

    let policies = platform
        .verification_policies()
        .await
        .map_err(|e| Error::Platform(format!("issue listing verification policies: {e}")))?;

    let verification_policies = policies
        .iter()
        .map(Record::as_record)
        .collect::<platform::Result<_>>()
        .map_err(|e| Error::ServerError(format!("issue rendering records: {e}")))?;

    Ok(VerificationPoliciesResponse { verification_policies })
}
