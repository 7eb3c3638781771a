//! # Create Verification Policy Endpoint
//!
//! Creates a verification policy — the rule set a proof request is built
//! from when the organization later asks a connection for a verification.

use platform::{NewVerificationPolicy, Platform, Record};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::{Error, Result};

/// A request to create a verification policy.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CreateVerificationPolicyRequest {
    /// The requesting organization. Set from the request query by the web
    /// layer.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub org_name: String,

    /// Policy name.
    #[serde(default)]
    pub policy_name: String,

    /// Policy version.
    #[serde(default)]
    pub version: String,

    /// Attribute names a proof must disclose.
    #[serde(default)]
    pub attributes: Vec<String>,
}

/// The created verification policy, in the record's mapping form.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct CreateVerificationPolicyResponse {
    /// Field name to value mapping of the platform record.
    pub record: Map<String, Value>,
}

/// Create verification policy request handler.
///
/// # Errors
///
/// Returns an error if the request is invalid or the platform call fails.
#[instrument(level = "debug", skip(platform))]
pub async fn create_verification_policy(
    platform: impl Platform, request: &CreateVerificationPolicyRequest,
) -> Result<CreateVerificationPolicyResponse> {
    verify(request)?;
    process(platform, request).await
}

fn verify(request: &CreateVerificationPolicyRequest) -> Result<()> {
    tracing::debug!("create_verification_policy::verify");

    if request.org_name.is_empty() {
        return Err(Error::InvalidRequest("no org_name specified".into()));
    }
    if request.policy_name.is_empty() {
        return Err(Error::InvalidRequest("no policy_name specified".into()));
    }
    if request.version.is_empty() {
        return Err(Error::InvalidRequest("no version specified".into()));
    }
    if request.attributes.is_empty() {
        return Err(Error::InvalidRequest("no attributes specified".into()));
    }
    Ok(())
}

async fn process(
    platform: impl Platform, request: &CreateVerificationPolicyRequest,
) -> Result<CreateVerificationPolicyResponse> {
    tracing::debug!("create_verification_policy::process");

    // TODO: predicate and revocation constraints
    let policy = NewVerificationPolicy {
        name: request.policy_name.clone(),
        version: request.version.clone(),
        attributes: request.attributes.clone(),
        predicates: None,
        revocation_requirement: None,
    };

    let created = platform
        .create_verification_policy(&policy)
        .await
        .map_err(|e| Error::Platform(format!("issue creating policy: {e}")))?;

    let record = created
        .as_record()
        .map_err(|e| Error::ServerError(format!("issue rendering record: {e}")))?;

    Ok(CreateVerificationPolicyResponse { record })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_utils::store::Platform;

    use super::*;

    #[tokio::test]
    async fn create() {
        test_utils::init_tracer();

        let platform = Platform::new();
        let request = CreateVerificationPolicyRequest {
            org_name: "faber".into(),
            policy_name: "EmployeeLogin".into(),
            version: "1.0".into(),
            attributes: vec!["Name".into(), "Email".into()],
        };

        let response = create_verification_policy(platform.clone(), &request)
            .await
            .expect("should create policy");

        assert_eq!(platform.invocations(), vec!["create_verification_policy"]);
        assert_eq!(response.record.get("name"), Some(&json!("EmployeeLogin")));
        assert_eq!(response.record.get("attributes"), Some(&json!(["Name", "Email"])));
    }

    #[tokio::test]
    async fn missing_policy_name() {
        test_utils::init_tracer();

        let request = CreateVerificationPolicyRequest {
            org_name: "faber".into(),
            version: "1.0".into(),
            attributes: vec!["Name".into()],
            ..CreateVerificationPolicyRequest::default()
        };

        let result = create_verification_policy(Platform::new(), &request).await;
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }
}
