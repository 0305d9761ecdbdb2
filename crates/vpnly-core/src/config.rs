// ── Runtime session configuration ──
//
// Describes how to reach the control plane and which credentials to use.
// The CLI builds a `SessionConfig` from its profile files and flags; core
// never touches disk.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Access-key credentials issued by the Session Provider.
#[derive(Debug, Clone)]
pub struct AccessKey {
    pub key_id: String,
    pub secret: SecretString,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. Lab endpoints only.
    DangerAcceptInvalid,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// API root, e.g. `https://vpn.eu-central-1.example.net`.
    pub endpoint: Url,
    pub region: String,
    pub credentials: AccessKey,
    pub tls: TlsVerification,
    /// Per-request timeout. Expiry surfaces as `GatewayUnavailable`.
    pub timeout: Duration,
}

impl SessionConfig {
    pub fn new(endpoint: Url, region: impl Into<String>, credentials: AccessKey) -> Self {
        Self {
            endpoint,
            region: region.into(),
            credentials,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }
}
