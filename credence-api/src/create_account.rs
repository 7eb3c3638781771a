//! # Create Account Endpoint
//!
//! Issues the login credential for a newly registered user. The endpoint
//! forwards the user's name and email to the platform as credential values
//! under the configured login credential definition and returns the
//! resulting offer URL. The web layer renders the URL as a QR code on the
//! account-creation page for the user to scan into their wallet.

use platform::{NewCredential, Platform};
use serde::{Deserialize, Serialize};
use serde_json::Map;
use tracing::instrument;

use crate::{Error, Result};

/// A request to create an account by issuing a login credential.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CreateAccountRequest {
    /// The issuing organization. Set from configuration by the web layer.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub org_name: String,

    /// The login credential definition to issue under. Set from
    /// configuration by the web layer.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub definition_id: String,

    /// The new user's display name.
    #[serde(default)]
    pub name: String,

    /// The new user's email address.
    #[serde(default)]
    pub email: String,
}

/// Response to an account-creation request.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CreateAccountResponse {
    /// URL the new user opens, or scans as a QR code, to accept the login
    /// credential offer.
    pub offer_url: String,
}

/// Create account request handler.
///
/// # Errors
///
/// Returns an error if the request is invalid or the platform call fails.
#[instrument(level = "debug", skip(platform))]
pub async fn create_account(
    platform: impl Platform, request: &CreateAccountRequest,
) -> Result<CreateAccountResponse> {
    verify(request)?;
    process(platform, request).await
}

fn verify(request: &CreateAccountRequest) -> Result<()> {
    tracing::debug!("create_account::verify");

    if request.org_name.is_empty() {
        return Err(Error::InvalidRequest("no org_name specified".into()));
    }
    if request.definition_id.is_empty() {
        return Err(Error::InvalidRequest("no definition_id specified".into()));
    }
    if request.name.is_empty() {
        return Err(Error::InvalidRequest("no name specified".into()));
    }
    if request.email.is_empty() {
        return Err(Error::InvalidRequest("no email specified".into()));
    }
    Ok(())
}

async fn process(
    platform: impl Platform, request: &CreateAccountRequest,
) -> Result<CreateAccountResponse> {
    tracing::debug!("create_account::process");

    let mut credential_values = Map::new();
    credential_values.insert("Name".into(), request.name.clone().into());
    credential_values.insert("Email".into(), request.email.clone().into());

    let credential = NewCredential {
        definition_id: request.definition_id.clone(),
        connection_id: None,
        credential_values,
        automatic_issuance: false,
    };

    let offered = platform
        .create_credential(&credential)
        .await
        .map_err(|e| Error::Platform(format!("issue creating login credential: {e}")))?;

    Ok(CreateAccountResponse { offer_url: offered.offer_url })
}

#[cfg(test)]
mod tests {
    use test_utils::store::Platform;

    use super::*;

    #[tokio::test]
    async fn issues_login_credential() {
        test_utils::init_tracer();

        let platform = Platform::new();
        let request = CreateAccountRequest {
            org_name: "faber".into(),
            definition_id: "def-1".into(),
            name: "Alice".into(),
            email: "a@x.com".into(),
        };

        let response = create_account(platform.clone(), &request).await.expect("should issue");

        // exactly one credential-creation call
        assert_eq!(platform.invocations(), vec!["create_credential"]);
        assert!(response.offer_url.starts_with("https://platform.example/offers/"));
    }

    #[tokio::test]
    async fn missing_email() {
        test_utils::init_tracer();

        let platform = Platform::new();
        let request = CreateAccountRequest {
            org_name: "faber".into(),
            definition_id: "def-1".into(),
            name: "Alice".into(),
            ..CreateAccountRequest::default()
        };

        let result = create_account(platform.clone(), &request).await;

        assert!(matches!(result, Err(Error::InvalidRequest(_))));
        assert!(platform.invocations().is_empty());
    }
}
