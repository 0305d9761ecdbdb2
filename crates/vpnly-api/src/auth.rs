use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

const ACCESS_KEY_ID: HeaderName = HeaderName::from_static("x-access-key-id");
const ACCESS_KEY_SECRET: HeaderName = HeaderName::from_static("x-access-key-secret");
const REGION: HeaderName = HeaderName::from_static("x-region");

/// Credentials for the control plane, already obtained by the caller.
///
/// The secret half never appears in `Debug` output.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub key_id: String,
    pub secret: SecretString,
    pub region: String,
}

impl Credentials {
    pub fn new(key_id: impl Into<String>, secret: SecretString, region: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            secret,
            region: region.into(),
        }
    }

    /// Render the credentials as default request headers.
    ///
    /// The secret header is marked sensitive so reqwest redacts it
    /// from its own debug output.
    pub(crate) fn to_headers(&self) -> Result<HeaderMap, Error> {
        let invalid = |what: &str| Error::Authentication {
            message: format!("{what} contains characters not allowed in a header"),
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCESS_KEY_ID,
            HeaderValue::from_str(&self.key_id).map_err(|_| invalid("access key id"))?,
        );

        let mut secret = HeaderValue::from_str(self.secret.expose_secret())
            .map_err(|_| invalid("access key secret"))?;
        secret.set_sensitive(true);
        headers.insert(ACCESS_KEY_SECRET, secret);

        headers.insert(
            REGION,
            HeaderValue::from_str(&self.region).map_err(|_| invalid("region"))?,
        );
        Ok(headers)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_secret() {
        let creds = Credentials::new("AKID", SecretString::from("hunter2".to_owned()), "eu-west-1");
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("AKID"));
    }

    #[test]
    fn headers_mark_secret_sensitive() {
        let creds = Credentials::new("AKID", SecretString::from("hunter2".to_owned()), "eu-west-1");
        let headers = creds.to_headers().unwrap();
        assert_eq!(headers["x-access-key-id"], "AKID");
        assert_eq!(headers["x-region"], "eu-west-1");
        assert!(headers["x-access-key-secret"].is_sensitive());
    }

    #[test]
    fn newline_in_key_id_is_rejected() {
        let creds = Credentials::new("AK\nID", SecretString::from("s".to_owned()), "eu-west-1");
        assert!(matches!(creds.to_headers(), Err(Error::Authentication { .. })));
    }
}
