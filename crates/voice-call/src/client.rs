//! HTTP client for the voice API.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    config::VoiceConfig,
    error::{Result, VoiceError},
    outbound_call::OutboundCall,
    request::{CallCreated, CreateCallRequest},
};

const CALLS_PATH: &str = "/v1/calls";

/// Submits call requests to the voice API.
#[derive(Debug, Clone)]
pub struct VoiceClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl VoiceClient {
    /// Creates a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceError::InvalidConfiguration`] if:
    /// - No token is configured, or the token is blank
    /// - The API base URL is empty after trimming
    pub fn new(config: &VoiceConfig) -> Result<Self> {
        let token = config
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                VoiceError::InvalidConfiguration("an API token is required".to_string())
            })?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: normalize_base_url(&config.api_base_url)?,
            token: token.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Places an outbound call.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The call has neither an NCCO nor an answer webhook
    /// - The HTTP request fails (network error, timeout, etc.)
    /// - The API returns a non-success status code
    /// - The response body cannot be decoded
    pub async fn create_outbound_call(&self, call: &OutboundCall) -> Result<CallCreated> {
        let body = CreateCallRequest::try_from(call)?;
        debug!(
            to = call.destination().kind(),
            random_from = call.uses_random_origin(),
            "creating outbound call"
        );

        let created: CallCreated = self.post_json(&self.url_with_path(CALLS_PATH)?, &body).await?;
        info!(uuid = %created.uuid, status = %created.status, "outbound call created");
        Ok(created)
    }

    /// Constructs a full URL by combining the base URL with the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting URL string is not a valid URL.
    fn url_with_path(&self, path: &str) -> Result<reqwest::Url> {
        let url_string = format!("{}{}", self.base_url, path);
        reqwest::Url::parse(&url_string).map_err(|e| {
            VoiceError::InvalidConfiguration(format!("invalid API URL {url_string:?}: {e}"))
        })
    }

    /// Sends a POST request with a JSON body and deserializes the response.
    async fn post_json<TReq: Serialize, TRes: for<'de> Deserialize<'de>>(
        &self,
        url: &reqwest::Url,
        body: &TReq,
    ) -> Result<TRes> {
        let request = self.http.post(url.clone()).json(body);
        let response = self.send_request(request).await?;
        Ok(response.json::<TRes>().await?)
    }

    /// Sends an HTTP request with authentication and standard headers.
    async fn send_request(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(VoiceError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Normalizes an API base URL by trimming whitespace and trailing slashes.
fn normalize_base_url(endpoint: &str) -> Result<String> {
    let trimmed = endpoint.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(VoiceError::InvalidConfiguration(
            "API base URL must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
