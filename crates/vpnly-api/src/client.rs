// Control-plane HTTP client
//
// Wraps `reqwest::Client` with URL construction, envelope unwrapping, and
// status-code classification. Endpoint groups (VPN connections, customer
// gateways, labels, VPCs) are inherent methods in sibling modules so this
// file stays focused on transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::models::{ApiErrorBody, ApiResponse};
use crate::transport::TransportConfig;

/// Raw HTTP client for the control-plane API.
///
/// All methods return unwrapped `data` payloads. No call is retried; the
/// caller decides whether to try again.
pub struct ControlPlaneClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl ControlPlaneClient {
    /// Create a client that authenticates every request with `credentials`.
    ///
    /// `base_url` is the API root, e.g. `https://vpn.example.net`.
    pub fn new(
        base_url: Url,
        credentials: &Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client(credentials.to_headers()?)?;
        Ok(Self {
            http,
            base_url,
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// Used by tests and by callers that manage their own auth headers.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            timeout_secs: 0,
        })
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/v1/{segments...}`, percent-encoding each segment.
    ///
    /// Resource ids come from operator input, so they are pushed as
    /// segments rather than formatted into the path.
    pub(crate) fn api_url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push("v1")
            .extend(segments);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await.map_err(|e| self.classify(e))?;
        self.parse_envelope(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        self.parse_envelope(resp).await
    }

    /// Send a request whose success body carries nothing of interest.
    pub(crate) async fn put_unit(&self, url: Url, body: &impl Serialize) -> Result<(), Error> {
        debug!("PUT {}", url);
        let resp = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        self.check_status(resp).await.map(drop)
    }

    pub(crate) async fn post_unit(&self, url: Url, body: &impl Serialize) -> Result<(), Error> {
        debug!("POST {}", url);
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        self.check_status(resp).await.map(drop)
    }

    // ── Response handling ────────────────────────────────────────────

    /// Check the status, then decode the `{ data }` envelope.
    async fn parse_envelope<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let resp = self.check_status(resp).await?;
        let body = resp.text().await.map_err(Error::Transport)?;

        let envelope: ApiResponse<T> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            })?;
        Ok(envelope.data)
    }

    /// Turn a non-success status into the matching `Error` variant.
    async fn check_status(&self, resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let resource = resp.url().path().to_owned();
        let body = resp.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(parsed) => (
                parsed.error.code,
                parsed
                    .error
                    .message
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_owned()),
            ),
            Err(_) if body.is_empty() => (
                None,
                status.canonical_reason().unwrap_or("error").to_owned(),
            ),
            Err(_) => (None, body),
        };

        Err(match status.as_u16() {
            401 | 403 => Error::Authentication { message },
            404 => Error::NotFound { resource },
            408 => Error::Timeout {
                timeout_secs: self.timeout_secs,
            },
            400 | 409 | 422 => Error::Rejected {
                status: status.as_u16(),
                code,
                message,
            },
            other => Error::Api {
                status: other,
                message,
            },
        })
    }

    fn classify(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }
}
