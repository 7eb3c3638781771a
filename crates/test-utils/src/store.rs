//! Canned-record store and mock platform implementation.

use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use chrono::Utc;
use platform::{
    Connection, Credential, CredentialDefinition, NewConnection, NewCredential,
    NewCredentialDefinition, NewVerificationPolicy, Result, Verification, VerificationPolicy,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Clone, Debug, Deserialize)]
struct Store {
    connections: Vec<Connection>,
    credential_definitions: Vec<CredentialDefinition>,
    verification_policies: Vec<VerificationPolicy>,
    verifications: Vec<Verification>,
}

impl Default for Store {
    fn default() -> Self {
        let json = include_bytes!("store/records.json");
        serde_json::from_slice(json).expect("should deserialize")
    }
}

/// Mock credential platform backed by canned records. Create operations echo
/// their inputs back as platform records; every invocation is logged so tests
/// can assert how many downstream calls an endpoint made.
#[derive(Clone, Debug, Default)]
pub struct Platform {
    store: Store,
    invocations: Arc<Mutex<Vec<&'static str>>>,
}

impl Platform {
    /// Create a mock platform populated with the canned records.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the platform operations invoked so far, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the invocation log mutex has been poisoned.
    #[must_use]
    pub fn invocations(&self) -> Vec<&'static str> {
        self.invocations.lock().expect("should lock").clone()
    }

    fn invoked(&self, operation: &'static str) {
        self.invocations.lock().expect("should lock").push(operation);
    }
}

impl platform::Platform for Platform {
    async fn connections(&self, state: Option<&str>) -> Result<Vec<Connection>> {
        self.invoked("connections");

        let connections = self
            .store
            .connections
            .iter()
            .filter(|c| state.is_none() || state == Some(c.state.as_str()))
            .cloned()
            .collect();
        Ok(connections)
    }

    async fn credential_definitions(&self) -> Result<Vec<CredentialDefinition>> {
        self.invoked("credential_definitions");
        Ok(self.store.credential_definitions.clone())
    }

    async fn verification_policies(&self) -> Result<Vec<VerificationPolicy>> {
        self.invoked("verification_policies");
        Ok(self.store.verification_policies.clone())
    }

    async fn publish_credential_definition(
        &self, definition: &NewCredentialDefinition,
    ) -> Result<CredentialDefinition> {
        self.invoked("publish_credential_definition");

        Ok(CredentialDefinition {
            definition_id: Uuid::new_v4().to_string(),
            name: definition.name.clone(),
            version: definition.version.clone(),
            attributes: definition.attributes.clone(),
            support_revocation: definition.support_revocation,
            tag: definition.tag.clone(),
            created_at_utc: Some(Utc::now()),
        })
    }

    async fn create_verification_policy(
        &self, policy: &NewVerificationPolicy,
    ) -> Result<VerificationPolicy> {
        self.invoked("create_verification_policy");

        Ok(VerificationPolicy {
            policy_id: Uuid::new_v4().to_string(),
            name: policy.name.clone(),
            version: policy.version.clone(),
            attributes: policy.attributes.clone(),
            created_at_utc: Some(Utc::now()),
        })
    }

    async fn create_connection(&self, connection: &NewConnection) -> Result<Connection> {
        self.invoked("create_connection");

        let connection_id =
            connection.connection_id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());

        Ok(Connection {
            invitation_url: Some(format!("https://platform.example/invitations/{connection_id}")),
            connection_id,
            name: Some(connection.name.clone()),
            state: "Invited".into(),
            multi_party: connection.multi_party,
            created_at_utc: Some(Utc::now()),
        })
    }

    async fn create_credential(&self, credential: &NewCredential) -> Result<Credential> {
        self.invoked("create_credential");

        let credential_id = Uuid::new_v4().to_string();

        Ok(Credential {
            offer_url: format!("https://platform.example/offers/{credential_id}"),
            credential_id,
            definition_id: credential.definition_id.clone(),
            connection_id: credential.connection_id.clone(),
            state: "Offered".into(),
            values: credential.credential_values.clone(),
        })
    }

    async fn send_verification_from_policy(
        &self, connection_id: &str, policy_id: &str,
    ) -> Result<Verification> {
        self.invoked("send_verification_from_policy");

        Ok(Verification {
            verification_id: Uuid::new_v4().to_string(),
            connection_id: Some(connection_id.to_string()),
            policy_id: policy_id.to_string(),
            state: "Requested".into(),
            is_valid: false,
            verified_at_utc: None,
        })
    }

    async fn verification(&self, verification_id: &str) -> Result<Verification> {
        self.invoked("verification");

        self.store
            .verifications
            .iter()
            .find(|v| v.verification_id == verification_id)
            .cloned()
            .ok_or_else(|| anyhow!("verification not found: {verification_id}"))
    }
}
