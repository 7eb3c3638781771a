//! # Request Verification Endpoint
//!
//! Sends a proof request, built from an existing verification policy, to an
//! existing connection.

use platform::{Platform, Record};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::{Error, Result};

/// A request to send a verification request to a connection.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RequestVerificationRequest {
    /// The requesting organization. Set from the request query by the web
    /// layer.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub org_name: String,

    /// The connection to send the proof request to.
    #[serde(default)]
    pub connection_id: String,

    /// The policy to build the proof request from.
    #[serde(default)]
    pub policy_id: String,
}

/// The created verification record, in the record's mapping form.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RequestVerificationResponse {
    /// Field name to value mapping of the platform record.
    pub record: Map<String, Value>,
}

/// Request verification request handler.
///
/// # Errors
///
/// Returns an error if the request is invalid or the platform call fails.
#[instrument(level = "debug", skip(platform))]
pub async fn request_verification(
    platform: impl Platform, request: &RequestVerificationRequest,
) -> Result<RequestVerificationResponse> {
    verify(request)?;
    process(platform, request).await
}

fn verify(request: &RequestVerificationRequest) -> Result<()> {
    tracing::debug!("request_verification::verify");

    if request.org_name.is_empty() {
        return Err(Error::InvalidRequest("no org_name specified".into()));
    }
    if request.connection_id.is_empty() {
        return Err(Error::InvalidRequest("no connection_id specified".into()));
    }
    if request.policy_id.is_empty() {
        return Err(Error::InvalidRequest("no policy_id specified".into()));
    }
    Ok(())
}

async fn process(
    platform: impl Platform, request: &RequestVerificationRequest,
) -> Result<RequestVerificationResponse> {
    tracing::debug!("request_verification::process");

    let verification = platform
        .send_verification_from_policy(&request.connection_id, &request.policy_id)
        .await
        .map_err(|e| Error::Platform(format!("issue requesting verification: {e}")))?;

    let record = verification
        .as_record()
        .map_err(|e| Error::ServerError(format!("issue rendering record: {e}")))?;

    Ok(RequestVerificationResponse { record })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_utils::store::Platform;

    use super::*;

    #[tokio::test]
    async fn send() {
        test_utils::init_tracer();

        let platform = Platform::new();
        let request = RequestVerificationRequest {
            org_name: "faber".into(),
            connection_id: "conn-1".into(),
            policy_id: "pol-1".into(),
        };

        let response =
            request_verification(platform.clone(), &request).await.expect("should send");

        assert_eq!(platform.invocations(), vec!["send_verification_from_policy"]);
        assert_eq!(response.record.get("connectionId"), Some(&json!("conn-1")));
        assert_eq!(response.record.get("policyId"), Some(&json!("pol-1")));
        assert_eq!(response.record.get("state"), Some(&json!("Requested")));
    }

    #[tokio::test]
    async fn missing_policy_id() {
        test_utils::init_tracer();

        let request = RequestVerificationRequest {
            org_name: "faber".into(),
            connection_id: "conn-1".into(),
            ..RequestVerificationRequest::default()
        };

        let result = request_verification(Platform::new(), &request).await;
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }
}
