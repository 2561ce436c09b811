// Identity Toolkit client: the single account operation the dashboard needs.
//
// Endpoint: POST {base}/accounts:sendOobCode?key={api_key}

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::endpoint::Endpoint;
use crate::error::Error;
use crate::transport::TransportConfig;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OobRequest<'a> {
    request_type: &'static str,
    email: &'a str,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Async client for the hosted identity provider.
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<SecretString>,
}

impl IdentityClient {
    pub fn new(
        endpoint: &Endpoint,
        api_key: Option<SecretString>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        if endpoint.is_emulator() {
            headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer owner"));
        }
        let http = transport.build_client_with_headers(headers)?;
        Ok(Self::with_client(endpoint.identity_base()?, http, api_key))
    }

    pub fn with_client(base_url: Url, http: reqwest::Client, api_key: Option<SecretString>) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// Ask the provider to email a password-reset link to `email`.
    ///
    /// Rejections (unknown address, malformed address, quota) come back as
    /// [`Error::Identity`] carrying the provider's message unchanged.
    pub async fn send_password_reset_email(&self, email: &str) -> Result<(), Error> {
        let url = self.base_url.join("./accounts:sendOobCode")?;
        debug!("POST {url}");

        let mut req = self.http.post(url).json(&OobRequest {
            request_type: "PASSWORD_RESET",
            email,
        });
        if let Some(key) = &self.api_key {
            req = req.query(&[("key", key.expose_secret())]);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            info!(email, "password reset email requested");
            return Ok(());
        }

        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&raw)
            .ok()
            .and_then(|env| env.error.message)
            .unwrap_or_else(|| if raw.is_empty() { status.to_string() } else { raw });
        Err(Error::Identity { message })
    }
}
