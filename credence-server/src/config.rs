//! # Server Configuration
//!
//! Explicit, immutable configuration for the server, read once at startup.
//! Handlers receive it through shared state; there are no ambient globals.

use std::env;
use std::path::PathBuf;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Address the HTTP listener binds to.
    pub listen_addr: String,

    /// Base URL of the credential platform API.
    pub platform_url: String,

    /// Path to the flat file of `name=key` organization API keys.
    pub key_file: PathBuf,

    /// Path the login credential offer QR code is written to.
    pub qr_path: PathBuf,

    /// Organization that issues login credentials during account creation.
    pub login_org: String,

    /// Credential definition login credentials are issued under.
    pub login_definition_id: String,
}

impl Config {
    /// Build configuration from environment variables, falling back to
    /// development defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            listen_addr: env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            platform_url: env::var("PLATFORM_URL")
                .unwrap_or_else(|_| "http://localhost:9090".into()),
            key_file: env::var("KEY_FILE").map_or_else(|_| "api_keys.txt".into(), PathBuf::from),
            qr_path: env::var("QR_PATH").map_or_else(|_| "qr.png".into(), PathBuf::from),
            login_org: env::var("LOGIN_ORG").unwrap_or_else(|_| "alphaledger".into()),
            login_definition_id: env::var("LOGIN_DEFINITION_ID")
                .unwrap_or_else(|_| "BbRYr1N4QJLM8nacfxsVM4:3:CL:328263:Default".into()),
        }
    }
}
