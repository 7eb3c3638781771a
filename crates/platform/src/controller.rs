//! # Platform Controller
//!
//! HTTP implementation of the [`Platform`] trait. A `Controller` is
//! constructed fresh for each inbound request and bound to a single
//! organization's API key, so the key never has to reach client code.

use std::fmt::{self, Debug, Formatter};

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};

use crate::{
    Connection, Credential, CredentialDefinition, NewConnection, NewCredential,
    NewCredentialDefinition, NewVerificationPolicy, Platform, Result, Verification,
    VerificationPolicy,
};

/// A per-request client for the credential platform, bound to one
/// organization's credentials.
#[derive(Clone)]
pub struct Controller {
    base_url: String,
    organization: String,
    api_key: String,
    client: reqwest::Client,
}

impl Controller {
    /// Create a controller for the specified organization, authenticating
    /// with the organization's platform API key.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>, organization: impl Into<String>, api_key: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            organization: organization.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// The organization this controller is bound to.
    #[must_use]
    pub fn organization(&self) -> &str {
        &self.organization
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.get(url).header(ACCEPT, "application/json").header(AUTHORIZATION, &self.api_key)
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, &self.api_key)
    }
}

// The API key must not appear in logs or error output.
impl Debug for Controller {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("base_url", &self.base_url)
            .field("organization", &self.organization)
            .field("api_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl Platform for Controller {
    async fn connections(&self, state: Option<&str>) -> Result<Vec<Connection>> {
        let url = format!("{}/connections", self.base_url);
        let mut request = self.get(&url);
        if let Some(state) = state {
            request = request.query(&[("state", state)]);
        }
        let result = request.send().await?;
        Ok(result.error_for_status()?.json().await?)
    }

    async fn credential_definitions(&self) -> Result<Vec<CredentialDefinition>> {
        let url = format!("{}/definitions/credentials", self.base_url);
        let result = self.get(&url).send().await?;
        Ok(result.error_for_status()?.json().await?)
    }

    async fn verification_policies(&self) -> Result<Vec<VerificationPolicy>> {
        let url = format!("{}/verifications/policies", self.base_url);
        let result = self.get(&url).send().await?;
        Ok(result.error_for_status()?.json().await?)
    }

    async fn publish_credential_definition(
        &self, definition: &NewCredentialDefinition,
    ) -> Result<CredentialDefinition> {
        let url = format!("{}/definitions/credentials", self.base_url);
        let result = self.post(&url).json(definition).send().await?;
        Ok(result.error_for_status()?.json().await?)
    }

    async fn create_verification_policy(
        &self, policy: &NewVerificationPolicy,
    ) -> Result<VerificationPolicy> {
        let url = format!("{}/verifications/policies", self.base_url);
        let result = self.post(&url).json(policy).send().await?;
        Ok(result.error_for_status()?.json().await?)
    }

    async fn create_connection(&self, connection: &NewConnection) -> Result<Connection> {
        let url = format!("{}/connections", self.base_url);
        let result = self.post(&url).json(connection).send().await?;
        Ok(result.error_for_status()?.json().await?)
    }

    async fn create_credential(&self, credential: &NewCredential) -> Result<Credential> {
        let url = format!("{}/credentials", self.base_url);
        let result = self.post(&url).json(credential).send().await?;
        Ok(result.error_for_status()?.json().await?)
    }

    async fn send_verification_from_policy(
        &self, connection_id: &str, policy_id: &str,
    ) -> Result<Verification> {
        let url = format!(
            "{}/verifications/policy/{policy_id}/connections/{connection_id}",
            self.base_url
        );
        let result = self.post(&url).send().await?;
        Ok(result.error_for_status()?.json().await?)
    }

    async fn verification(&self, verification_id: &str) -> Result<Verification> {
        let url = format!("{}/verifications/{verification_id}", self.base_url);
        let result = self.get(&url).send().await?;
        Ok(result.error_for_status()?.json().await?)
    }
}
