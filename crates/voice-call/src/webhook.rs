//! Webhook callbacks invoked by the voice platform.

use std::fmt;

use serde::{Deserialize, Serialize};

/// HTTP method the platform uses to call a webhook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A callback URL and the method used to reach it.
///
/// The URL is passed through as given; the platform rejects unusable URLs
/// when the call is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webhook {
    url: String,
    #[serde(default)]
    method: HttpMethod,
}

impl Webhook {
    /// Creates a webhook called with `POST`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::default(),
        }
    }

    #[must_use]
    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_defaults_to_post() {
        let webhook = Webhook::new("https://example.com/answer");
        assert_eq!(webhook.url(), "https://example.com/answer");
        assert_eq!(webhook.method(), HttpMethod::Post);
    }

    #[test]
    fn test_webhook_with_method() {
        let webhook = Webhook::new("https://example.com/event").with_method(HttpMethod::Get);
        assert_eq!(webhook.method().to_string(), "GET");
    }

    #[test]
    fn test_http_method_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&HttpMethod::Get).unwrap(), "\"GET\"");
        let method: HttpMethod = serde_json::from_str("\"POST\"").unwrap();
        assert_eq!(method, HttpMethod::Post);
    }
}
