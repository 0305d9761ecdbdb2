// ── Resource identity ──

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Provider-assigned identifier of a remote resource (`vpn-…`, `cgw-…`).
///
/// Opaque and immutable; the only operations are equality, hashing and
/// display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ResourceId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<String> for ResourceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ResourceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trips_raw_string() {
        let id: ResourceId = "vpn-0a1b2c".parse().unwrap();
        assert_eq!(id.to_string(), "vpn-0a1b2c");
        assert_eq!(id.as_str(), "vpn-0a1b2c");
    }

    #[test]
    fn serializes_transparently() {
        let id = ResourceId::new("cgw-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"cgw-1\"");
    }
}
