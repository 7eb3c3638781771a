//! # Credence Server
//!
//! HTTP surface for the credence proxy endpoints. Each route extracts its
//! parameters, resolves the requesting organization's platform API key from
//! the key store, constructs a fresh platform [`Controller`] bound to that
//! key, and invokes exactly one endpoint. The vendor key stays server-side.

mod config;
mod pages;

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use credence_api::{
    ConnectionsRequest, ConnectionsResponse, CreateAccountRequest, CreateConnectionRequest,
    CreateConnectionResponse, CreateCredentialDefinitionRequest,
    CreateCredentialDefinitionResponse, CreateVerificationPolicyRequest,
    CreateVerificationPolicyResponse, CredentialDefinitionsRequest,
    CredentialDefinitionsResponse, Error, IssueCredentialRequest, IssueCredentialResponse,
    RequestVerificationRequest, RequestVerificationResponse, VerificationPoliciesRequest,
    VerificationPoliciesResponse, VerificationRequest, VerificationResponse,
};
use platform::Controller;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeFile;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::config::Config;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("set subscriber");

    let config = Config::from_env();
    let listen_addr = config.listen_addr.clone();

    let listener = TcpListener::bind(&listen_addr).await.expect("should bind");
    tracing::info!("listening on {}", listener.local_addr().expect("should have addr"));
    axum::serve(listener, app(config)).await.expect("server should run");
}

/// Shared state: the immutable server configuration.
#[derive(Clone, Debug)]
struct AppState {
    config: Arc<Config>,
}

// Build the router. Separated from `main` so tests can drive it directly.
fn app(config: Config) -> Router {
    let cors = CorsLayer::new().allow_methods(Any).allow_origin(Any).allow_headers(Any);
    let qr_path = config.qr_path.clone();

    Router::new()
        .route("/", get(index).post(create_account))
        .route("/create-account", get(create_account_page))
        .route("/login", get(login_page))
        .route_service("/qr.png", ServeFile::new(qr_path))
        .route("/records/connections", get(connections))
        .route("/records/credential_definitions", get(credential_definitions))
        .route("/records/verification_policies", get(verification_policies))
        .route("/create/credential_definition", post(create_credential_definition))
        .route("/create/verification_policy", get(create_verification_policy))
        .route("/create/connection", post(create_connection))
        .route("/issue_credential", post(issue_credential))
        .route("/request_verification", post(request_verification))
        .route("/verification", get(verification))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store"),
        ))
        .with_state(AppState { config: Arc::new(config) })
}

// Resolve the organization's platform API key and construct a fresh
// controller bound to it.
fn controller(state: &AppState, org_name: &str) -> Result<Controller, Error> {
    if org_name.is_empty() {
        return Err(Error::InvalidRequest("no org_name specified".into()));
    }

    let api_key = keystore::api_key(&state.config.key_file, org_name).map_err(|e| match e {
        keystore::Error::NotFound(_) => Error::UnknownOrganization(e.to_string()),
        e => Error::ServerError(format!("issue resolving API key: {e}")),
    })?;

    Ok(Controller::new(state.config.platform_url.clone(), org_name, api_key))
}

/// Organization selector, common to most routes.
#[derive(Deserialize)]
struct OrgQuery {
    #[serde(default)]
    org_name: String,
}

/// Query parameters for the verification status route.
#[derive(Deserialize)]
struct VerificationQuery {
    #[serde(default)]
    org_name: String,
    #[serde(default)]
    verification_id: String,
}

/// Account registration form fields.
#[derive(Deserialize)]
struct AccountForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
}

// Home page: account registration form
#[axum::debug_handler]
async fn index() -> Html<&'static str> {
    Html(pages::REGISTER)
}

// Account registration: issue the login credential, write the offer QR code
// for the account-created page to serve, and redirect the browser there.
#[axum::debug_handler]
async fn create_account(State(state): State<AppState>, Form(form): Form<AccountForm>) -> Response {
    let controller = match controller(&state, &state.config.login_org) {
        Ok(controller) => controller,
        Err(e) => return error_response(e),
    };

    let request = CreateAccountRequest {
        org_name: state.config.login_org.clone(),
        definition_id: state.config.login_definition_id.clone(),
        name: form.name,
        email: form.email,
    };
    let response = match credence_api::create_account(controller, &request).await {
        Ok(response) => response,
        Err(e) => return error_response(e),
    };

    let qr_png = match platform::offer_qrcode(&response.offer_url) {
        Ok(qr_png) => qr_png,
        Err(e) => {
            return error_response(Error::ServerError(format!(
                "issue rendering offer QR code: {e}"
            )));
        }
    };
    if let Err(e) = std::fs::write(&state.config.qr_path, qr_png) {
        return error_response(Error::ServerError(format!("issue writing offer QR code: {e}")));
    }

    (StatusCode::FOUND, Redirect::to("/create-account")).into_response()
}

// Account-created page with the login credential offer QR code
#[axum::debug_handler]
async fn create_account_page() -> Html<&'static str> {
    Html(pages::CREATE_ACCOUNT)
}

// Login instructions page
#[axum::debug_handler]
async fn login_page() -> Html<&'static str> {
    Html(pages::LOGIN)
}

// List an organization's connections
#[axum::debug_handler]
async fn connections(
    State(state): State<AppState>, Query(query): Query<OrgQuery>,
) -> AxResult<ConnectionsResponse> {
    let controller = match controller(&state, &query.org_name) {
        Ok(controller) => controller,
        Err(e) => return AxResult(Err(e)),
    };

    let request = ConnectionsRequest {
        org_name: query.org_name,
        state: None,
    };
    credence_api::connections(controller, &request).await.into()
}

// List an organization's credential definitions
#[axum::debug_handler]
async fn credential_definitions(
    State(state): State<AppState>, Query(query): Query<OrgQuery>,
) -> AxResult<CredentialDefinitionsResponse> {
    let controller = match controller(&state, &query.org_name) {
        Ok(controller) => controller,
        Err(e) => return AxResult(Err(e)),
    };

    let request = CredentialDefinitionsRequest { org_name: query.org_name };
    credence_api::credential_definitions(controller, &request).await.into()
}

// List an organization's verification policies
#[axum::debug_handler]
async fn verification_policies(
    State(state): State<AppState>, Query(query): Query<OrgQuery>,
) -> AxResult<VerificationPoliciesResponse> {
    let controller = match controller(&state, &query.org_name) {
        Ok(controller) => controller,
        Err(e) => return AxResult(Err(e)),
    };

    let request = VerificationPoliciesRequest { org_name: query.org_name };
    credence_api::verification_policies(controller, &request).await.into()
}

// Publish a credential definition
#[axum::debug_handler]
async fn create_credential_definition(
    State(state): State<AppState>, Query(query): Query<OrgQuery>,
    Json(mut req): Json<CreateCredentialDefinitionRequest>,
) -> AxResult<CreateCredentialDefinitionResponse> {
    let controller = match controller(&state, &query.org_name) {
        Ok(controller) => controller,
        Err(e) => return AxResult(Err(e)),
    };

    req.org_name = query.org_name;
    credence_api::create_credential_definition(controller, &req).await.into()
}

// Create a verification policy
#[axum::debug_handler]
async fn create_verification_policy(
    State(state): State<AppState>, Query(query): Query<OrgQuery>,
    Json(mut req): Json<CreateVerificationPolicyRequest>,
) -> AxResult<CreateVerificationPolicyResponse> {
    let controller = match controller(&state, &query.org_name) {
        Ok(controller) => controller,
        Err(e) => return AxResult(Err(e)),
    };

    req.org_name = query.org_name;
    credence_api::create_verification_policy(controller, &req).await.into()
}

// Create a connection invitation
#[axum::debug_handler]
async fn create_connection(
    State(state): State<AppState>, Query(query): Query<OrgQuery>,
    Json(mut req): Json<CreateConnectionRequest>,
) -> AxResult<CreateConnectionResponse> {
    let controller = match controller(&state, &query.org_name) {
        Ok(controller) => controller,
        Err(e) => return AxResult(Err(e)),
    };

    req.org_name = query.org_name;
    credence_api::create_connection(controller, &req).await.into()
}

// Issue a credential
#[axum::debug_handler]
async fn issue_credential(
    State(state): State<AppState>, Query(query): Query<OrgQuery>,
    Json(mut req): Json<IssueCredentialRequest>,
) -> AxResult<IssueCredentialResponse> {
    let controller = match controller(&state, &query.org_name) {
        Ok(controller) => controller,
        Err(e) => return AxResult(Err(e)),
    };

    req.org_name = query.org_name;
    credence_api::issue_credential(controller, &req).await.into()
}

// Send a verification request to a connection
#[axum::debug_handler]
async fn request_verification(
    State(state): State<AppState>, Query(query): Query<OrgQuery>,
    Json(mut req): Json<RequestVerificationRequest>,
) -> AxResult<RequestVerificationResponse> {
    let controller = match controller(&state, &query.org_name) {
        Ok(controller) => controller,
        Err(e) => return AxResult(Err(e)),
    };

    req.org_name = query.org_name;
    credence_api::request_verification(controller, &req).await.into()
}

// Retrieve a verification record by id
#[axum::debug_handler]
async fn verification(
    State(state): State<AppState>, Query(query): Query<VerificationQuery>,
) -> AxResult<VerificationResponse> {
    let controller = match controller(&state, &query.org_name) {
        Ok(controller) => controller,
        Err(e) => return AxResult(Err(e)),
    };

    let request = VerificationRequest {
        org_name: query.org_name,
        verification_id: query.verification_id,
    };
    credence_api::verification(controller, &request).await.into()
}

// ----------------------------------------------------------------------------
// Axum Response
// ----------------------------------------------------------------------------

/// Wrapper for `axum::Response`
pub struct AxResult<T>(credence_api::Result<T>);

impl<T> IntoResponse for AxResult<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        match self.0 {
            Ok(v) => (StatusCode::OK, Json(json!(v))).into_response(),
            Err(e) => error_response(e),
        }
    }
}

impl<T> From<credence_api::Result<T>> for AxResult<T> {
    fn from(val: credence_api::Result<T>) -> Self {
        Self(val)
    }
}

fn error_response(e: Error) -> Response {
    let status = match &e {
        Error::InvalidRequest(_) | Error::UnknownOrganization(_) => StatusCode::BAD_REQUEST,
        Error::Platform(_) => StatusCode::BAD_GATEWAY,
        Error::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(e.to_json())).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    // Mock vendor platform with a canned connection list and a counted
    // credential-creation endpoint.
    async fn mock_platform(credential_calls: Arc<AtomicUsize>) -> String {
        let router = Router::new()
            .route(
                "/connections",
                get(|| async {
                    Json(json!([{
                        "connectionId": "conn-1",
                        "name": "faber-agent",
                        "state": "Connected",
                        "multiParty": false
                    }]))
                }),
            )
            .route(
                "/credentials",
                post(move |Json(body): Json<Value>| {
                    let calls = credential_calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Json(json!({
                            "credentialId": "cred-1",
                            "definitionId": body["definitionId"],
                            "state": "Offered",
                            "offerUrl": "https://platform.example/offers/cred-1",
                            "values": body["credentialValues"]
                        }))
                    }
                }),
            );

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("should bind");
        let addr = listener.local_addr().expect("should have addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("server should run");
        });

        format!("http://{addr}")
    }

    fn test_config(platform_url: String, dir: &std::path::Path) -> Config {
        let key_file = dir.join("api_keys.txt");
        std::fs::write(&key_file, "alphaledger=test-key\n").expect("should write");

        Config {
            listen_addr: "127.0.0.1:0".into(),
            platform_url,
            key_file,
            qr_path: dir.join("qr.png"),
            login_org: "alphaledger".into(),
            login_definition_id: "def-login".into(),
        }
    }

    #[tokio::test]
    async fn home_page() {
        let dir = tempfile::tempdir().expect("should create");
        let app = app(test_config("http://localhost:9090".into(), dir.path()));

        let request = Request::builder().uri("/").body(Body::empty()).expect("should build");
        let response = app.oneshot(request).await.expect("should respond");

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.expect("should read").to_bytes();
        assert!(String::from_utf8_lossy(&body).contains("<form"));
    }

    #[tokio::test]
    async fn list_connections() {
        let calls = Arc::new(AtomicUsize::new(0));
        let platform_url = mock_platform(calls).await;
        let dir = tempfile::tempdir().expect("should create");
        let app = app(test_config(platform_url, dir.path()));

        let request = Request::builder()
            .uri("/records/connections?org_name=alphaledger")
            .body(Body::empty())
            .expect("should build");
        let response = app.oneshot(request).await.expect("should respond");

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.expect("should read").to_bytes();
        let body: Value = serde_json::from_slice(&body).expect("should parse");
        assert_eq!(body["connections"][0]["connectionId"], json!("conn-1"));
    }

    #[tokio::test]
    async fn missing_org_name() {
        let dir = tempfile::tempdir().expect("should create");
        let app = app(test_config("http://localhost:9090".into(), dir.path()));

        let request = Request::builder()
            .uri("/records/connections")
            .body(Body::empty())
            .expect("should build");
        let response = app.oneshot(request).await.expect("should respond");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.into_body().collect().await.expect("should read").to_bytes();
        let body: Value = serde_json::from_slice(&body).expect("should parse");
        assert_eq!(body["error"], json!("invalid_request"));
    }

    #[tokio::test]
    async fn unknown_organization() {
        let dir = tempfile::tempdir().expect("should create");
        let app = app(test_config("http://localhost:9090".into(), dir.path()));

        let request = Request::builder()
            .uri("/records/connections?org_name=unknown")
            .body(Body::empty())
            .expect("should build");
        let response = app.oneshot(request).await.expect("should respond");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.into_body().collect().await.expect("should read").to_bytes();
        let body: Value = serde_json::from_slice(&body).expect("should parse");
        assert_eq!(body["error"], json!("unknown_organization"));
    }

    #[tokio::test]
    async fn register_account() {
        let calls = Arc::new(AtomicUsize::new(0));
        let platform_url = mock_platform(calls.clone()).await;
        let dir = tempfile::tempdir().expect("should create");
        let config = test_config(platform_url, dir.path());
        let qr_path = config.qr_path.clone();
        let app = app(config);

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("name=Alice&email=a%40x.com"))
            .expect("should build");
        let response = app.oneshot(request).await.expect("should respond");

        // browser is redirected to the account-created page
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).expect("should redirect"),
            "/create-account"
        );

        // exactly one credential-creation call
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // the offer QR code was written as a PNG
        let qr_png = std::fs::read(qr_path).expect("should exist");
        assert_eq!(&qr_png[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn register_account_missing_name() {
        let calls = Arc::new(AtomicUsize::new(0));
        let platform_url = mock_platform(calls.clone()).await;
        let dir = tempfile::tempdir().expect("should create");
        let app = app(test_config(platform_url, dir.path()));

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("email=a%40x.com"))
            .expect("should build");
        let response = app.oneshot(request).await.expect("should respond");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
