//! An intermediary API between a front-end and a third-party verifiable
//! credential platform.
//!
//! The proxy exists for key indirection: each organization's platform API key
//! is resolved server-side (see the `keystore` crate), so the vendor key
//! never reaches client code. The platform owns all credential state and
//! protocol logic; the endpoints here supply parameters and relay results.
//!
//! # Design
//!
//! **Endpoints**
//!
//! The library is architected around proxy endpoints, each with its own
//! `XxxRequest` and `XxxResponse` types. The types serialize to and from
//! JSON. Every endpoint validates its request at the boundary, then invokes
//! exactly one platform operation through the
//! [`Platform`](platform::Platform) provider trait and renders the returned
//! records into their mapping form.
//!
//! **Running**
//!
//! Endpoints are exposed over HTTP with a few lines of wrapper code per
//! endpoint; `credence-server` does this with axum. The web layer is
//! responsible for resolving the organization's API key and constructing the
//! per-request platform controller.

pub mod connections;
pub mod create_account;
pub mod create_connection;
pub mod create_credential_definition;
pub mod create_verification_policy;
pub mod credential_definitions;
mod error;
pub mod issue_credential;
pub mod request_verification;
pub mod verification;
pub mod verification_policies;

pub use connections::*;
pub use create_account::*;
pub use create_connection::*;
pub use create_credential_definition::*;
pub use create_verification_policy::*;
pub use credential_definitions::*;
pub use error::{Error, ErrorResponse};
pub use issue_credential::*;
pub use request_verification::*;
pub use verification::*;
pub use verification_policies::*;

/// Result type for endpoint operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
