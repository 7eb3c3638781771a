//! Wire-level tests for the platform controller against a mock vendor API.

use std::collections::HashMap;

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use platform::{Controller, NewCredential, NewCredentialDefinition, Platform};
use serde_json::{json, Map, Value};

// Bind a mock vendor router to an ephemeral port, returning its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("should bind");
    let addr = listener.local_addr().expect("should have addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server should run");
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn list_connections() {
    let router = Router::new().route(
        "/connections",
        get(|headers: HeaderMap, Query(query): Query<HashMap<String, String>>| async move {
            // API key travels in the Authorization header
            assert_eq!(headers.get("authorization").expect("should have key"), "test-key");
            assert_eq!(query.get("state").map(String::as_str), Some("Connected"));

            Json(json!([{
                "connectionId": "conn-1",
                "name": "faber",
                "state": "Connected",
                "multiParty": false
            }]))
        }),
    );
    let base_url = serve(router).await;

    let controller = Controller::new(base_url, "faber", "test-key");
    let connections = controller.connections(Some("Connected")).await.expect("should list");

    assert_eq!(connections.len(), 1);
    assert_eq!(connections[0].connection_id, "conn-1");
    assert_eq!(connections[0].state, "Connected");
}

#[tokio::test]
async fn publish_definition() {
    let router = Router::new().route(
        "/definitions/credentials",
        post(|Json(body): Json<Value>| async move {
            // revocation stays off until the proxy supports it
            assert_eq!(body.get("supportRevocation"), Some(&json!(false)));
            assert_eq!(body.get("name"), Some(&json!("X")));
            assert_eq!(body.get("version"), Some(&json!("1.0")));
            assert_eq!(body.get("attributes"), Some(&json!(["a"])));
            assert_eq!(body.get("tag"), Some(&json!("t")));

            Json(json!({
                "definitionId": "def-1",
                "name": "X",
                "version": "1.0",
                "attributes": ["a"],
                "supportRevocation": false,
                "tag": "t"
            }))
        }),
    );
    let base_url = serve(router).await;

    let definition = NewCredentialDefinition {
        name: "X".into(),
        version: "1.0".into(),
        attributes: vec!["a".into()],
        support_revocation: false,
        tag: "t".into(),
    };

    let controller = Controller::new(base_url, "faber", "test-key");
    let published =
        controller.publish_credential_definition(&definition).await.expect("should publish");

    assert_eq!(published.definition_id, "def-1");
    assert!(!published.support_revocation);
}

#[tokio::test]
async fn create_credential_offer() {
    let router = Router::new().route(
        "/credentials",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body.get("definitionId"), Some(&json!("def-1")));
            assert_eq!(body.get("automaticIssuance"), Some(&json!(false)));
            // connectionless offer: no connectionId on the wire
            assert!(body.get("connectionId").is_none());

            Json(json!({
                "credentialId": "cred-1",
                "definitionId": "def-1",
                "state": "Offered",
                "offerUrl": "https://platform.example/offers/cred-1",
                "values": body["credentialValues"]
            }))
        }),
    );
    let base_url = serve(router).await;

    let mut values = Map::new();
    values.insert("Name".into(), json!("Alice"));
    let credential = NewCredential {
        definition_id: "def-1".into(),
        connection_id: None,
        credential_values: values,
        automatic_issuance: false,
    };

    let controller = Controller::new(base_url, "faber", "test-key");
    let offered = controller.create_credential(&credential).await.expect("should offer");

    assert_eq!(offered.offer_url, "https://platform.example/offers/cred-1");
    assert_eq!(offered.values.get("Name"), Some(&json!("Alice")));
}

#[tokio::test]
async fn send_verification() {
    let router = Router::new().route(
        "/verifications/policy/:policy_id/connections/:connection_id",
        post(|Path((policy_id, connection_id)): Path<(String, String)>| async move {
            Json(json!({
                "verificationId": "ver-1",
                "connectionId": connection_id,
                "policyId": policy_id,
                "state": "Requested",
                "isValid": false
            }))
        }),
    );
    let base_url = serve(router).await;

    let controller = Controller::new(base_url, "faber", "test-key");
    let verification =
        controller.send_verification_from_policy("conn-1", "pol-1").await.expect("should send");

    assert_eq!(verification.verification_id, "ver-1");
    assert_eq!(verification.connection_id.as_deref(), Some("conn-1"));
    assert_eq!(verification.policy_id, "pol-1");
}

#[tokio::test]
async fn vendor_failure_surfaces() {
    let router = Router::new()
        .route("/verifications/:id", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
    let base_url = serve(router).await;

    let controller = Controller::new(base_url, "faber", "test-key");
    let result = controller.verification("ver-missing").await;

    assert!(result.is_err());
}
