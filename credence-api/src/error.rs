//! # Endpoint Errors
//!
//! This module defines the typed errors surfaced by the proxy endpoints.
//! Errors serialize to a JSON error body so API clients receive a structured
//! response rather than a framework default.

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Proxy endpoint error codes.
#[derive(Error, Debug)]
pub enum Error {
    /// The request is missing a required parameter, includes an unsupported
    /// parameter value, or is otherwise malformed.
    #[error(r#"{{"error": "invalid_request", "error_description": "{0}"}}"#)]
    InvalidRequest(String),

    /// The requesting organization has no API key recorded in the key store.
    #[error(r#"{{"error": "unknown_organization", "error_description": "{0}"}}"#)]
    UnknownOrganization(String),

    /// The credential platform failed or rejected the forwarded operation.
    #[error(r#"{{"error": "platform_error", "error_description": "{0}"}}"#)]
    Platform(String),

    /// The server encountered an unexpected condition that prevented it from
    /// fulfilling the request.
    #[error(r#"{{"error": "server_error", "error_description": "{0}"}}"#)]
    ServerError(String),
}

/// Error response body returned to API clients.
#[allow(clippy::module_name_repetitions)]
#[derive(Deserialize, Serialize)]
pub struct ErrorResponse {
    /// Error code.
    pub error: String,

    /// Error description.
    pub error_description: String,
}

impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::Error as SerdeError;

        let Ok(error) = serde_json::from_str::<ErrorResponse>(&self.to_string()) else {
            return Err(SerdeError::custom("issue deserializing Error"));
        };
        error.serialize(serializer)
    }
}

impl Error {
    /// Transform the error to a JSON error body.
    #[must_use]
    pub fn to_json(self) -> serde_json::Value {
        serde_json::from_str(&self.to_string()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    // Test that error details are returned as json.
    #[test]
    fn err_json() {
        let err = Error::InvalidRequest("bad request".into());
        let ser: Value = serde_json::from_str(&err.to_string()).expect("should parse");
        assert_eq!(ser, json!({"error": "invalid_request", "error_description": "bad request"}));
    }

    #[test]
    fn err_serialize() {
        let err = Error::Platform("credential platform unavailable".into());
        let ser = serde_json::to_value(&err).expect("should serialize");
        assert_eq!(
            ser,
            json!({
                "error": "platform_error",
                "error_description": "credential platform unavailable"
            })
        );
    }

    #[test]
    fn err_to_json() {
        let err = Error::UnknownOrganization("no API key for organization: acme".into());
        assert_eq!(
            err.to_json(),
            json!({
                "error": "unknown_organization",
                "error_description": "no API key for organization: acme"
            })
        );
    }
}
