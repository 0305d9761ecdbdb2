// ── IPsec profile snapshot ──

use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, Serializer};

use super::id::ResourceId;

/// Point-in-time configuration handed to a downstream consumer.
///
/// Always built from the first tunnel of a connection. The pre-shared key
/// is redacted in `Debug` but serialized in clear: the serialized form is
/// the push payload itself.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IpsecProfile {
    pub vpn_connection_id: ResourceId,
    pub peer_gateway_id: ResourceId,
    pub tunnel_inside_cidr: String,
    #[serde(serialize_with = "expose_key")]
    pub pre_shared_key: SecretString,
    pub tunnel_outside_ip: String,
}

fn expose_key<S: Serializer>(key: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(key.expose_secret())
}
