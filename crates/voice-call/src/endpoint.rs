//! Callable endpoints.
//!
//! An [`Endpoint`] is anything the voice platform can dial: a PSTN phone
//! number, a SIP URI, a websocket, an in-app user or a VBC extension. Each
//! concrete type validates itself on construction and converts into
//! [`Endpoint`], which is what [`OutboundCall::new`] accepts.
//!
//! [`OutboundCall::new`]: crate::OutboundCall::new

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VoiceError};

/// Content type used for websocket audio when none is given.
pub const DEFAULT_WEBSOCKET_CONTENT_TYPE: &str = "audio/l16;rate=16000";

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

/// A destination the voice platform can call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Endpoint {
    Phone(Phone),
    Sip(Sip),
    Websocket(Websocket),
    App(App),
    Vbc(Vbc),
}

impl Endpoint {
    /// Wire name of the endpoint type.
    pub fn kind(&self) -> &'static str {
        match self {
            Endpoint::Phone(_) => "phone",
            Endpoint::Sip(_) => "sip",
            Endpoint::Websocket(_) => "websocket",
            Endpoint::App(_) => "app",
            Endpoint::Vbc(_) => "vbc",
        }
    }
}

/// A PSTN phone number in international format without the leading `+`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPhone")]
pub struct Phone {
    number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dtmf_answer: Option<String>,
}

impl Phone {
    /// Creates a phone endpoint.
    ///
    /// A single leading `+` is accepted and stripped. The remainder must be
    /// 7 to 15 ASCII digits.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceError::InvalidPhoneNumber`] if the number is not a
    /// plausible international number.
    pub fn new(number: impl AsRef<str>) -> Result<Self> {
        let raw = number.as_ref().trim();
        let digits = raw.strip_prefix('+').unwrap_or(raw);

        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(VoiceError::InvalidPhoneNumber(format!(
                "{raw:?} must contain only digits"
            )));
        }
        if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len()) {
            return Err(VoiceError::InvalidPhoneNumber(format!(
                "{raw:?} must have between {MIN_PHONE_DIGITS} and {MAX_PHONE_DIGITS} digits"
            )));
        }

        Ok(Self {
            number: digits.to_string(),
            dtmf_answer: None,
        })
    }

    /// Digits to send once the call is answered.
    #[must_use]
    pub fn with_dtmf_answer(mut self, digits: impl Into<String>) -> Self {
        self.dtmf_answer = Some(digits.into());
        self
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn dtmf_answer(&self) -> Option<&str> {
        self.dtmf_answer.as_deref()
    }
}

/// A SIP URI endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSip")]
pub struct Sip {
    uri: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    headers: BTreeMap<String, String>,
}

impl Sip {
    /// Creates a SIP endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceError::InvalidEndpoint`] unless the URI uses the `sip:`
    /// or `sips:` scheme.
    pub fn new(uri: impl Into<String>) -> Result<Self> {
        let uri = uri.into();
        if !(uri.starts_with("sip:") || uri.starts_with("sips:")) {
            return Err(VoiceError::InvalidEndpoint(format!(
                "SIP URI {uri:?} must start with sip: or sips:"
            )));
        }
        Ok(Self {
            uri,
            headers: BTreeMap::new(),
        })
    }

    /// Adds a custom header sent with the SIP INVITE.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }
}

/// A websocket that receives the call audio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWebsocket")]
pub struct Websocket {
    uri: String,
    #[serde(rename = "content-type")]
    content_type: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    headers: BTreeMap<String, String>,
}

impl Websocket {
    /// Creates a websocket endpoint with the default `audio/l16;rate=16000`
    /// content type.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceError::InvalidEndpoint`] unless the URI uses the `ws://`
    /// or `wss://` scheme.
    pub fn new(uri: impl Into<String>) -> Result<Self> {
        let uri = uri.into();
        if !(uri.starts_with("ws://") || uri.starts_with("wss://")) {
            return Err(VoiceError::InvalidEndpoint(format!(
                "websocket URI {uri:?} must start with ws:// or wss://"
            )));
        }
        Ok(Self {
            uri,
            content_type: DEFAULT_WEBSOCKET_CONTENT_TYPE.to_string(),
            headers: BTreeMap::new(),
        })
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Adds metadata forwarded to the websocket server on connect.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }
}

/// An in-app user registered with the client SDK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawApp")]
pub struct App {
    user: String,
}

impl App {
    /// # Errors
    ///
    /// Returns [`VoiceError::InvalidEndpoint`] if `user` is blank.
    pub fn new(user: impl Into<String>) -> Result<Self> {
        let user = user.into();
        if user.trim().is_empty() {
            return Err(VoiceError::InvalidEndpoint(
                "app user must not be empty".to_string(),
            ));
        }
        Ok(Self { user })
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}

/// A Vonage Business Communications extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawVbc")]
pub struct Vbc {
    extension: String,
}

impl Vbc {
    /// # Errors
    ///
    /// Returns [`VoiceError::InvalidEndpoint`] if `extension` is blank.
    pub fn new(extension: impl Into<String>) -> Result<Self> {
        let extension = extension.into();
        if extension.trim().is_empty() {
            return Err(VoiceError::InvalidEndpoint(
                "VBC extension must not be empty".to_string(),
            ));
        }
        Ok(Self { extension })
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

impl From<Phone> for Endpoint {
    fn from(value: Phone) -> Self {
        Endpoint::Phone(value)
    }
}

impl From<Sip> for Endpoint {
    fn from(value: Sip) -> Self {
        Endpoint::Sip(value)
    }
}

impl From<Websocket> for Endpoint {
    fn from(value: Websocket) -> Self {
        Endpoint::Websocket(value)
    }
}

impl From<App> for Endpoint {
    fn from(value: App) -> Self {
        Endpoint::App(value)
    }
}

impl From<Vbc> for Endpoint {
    fn from(value: Vbc) -> Self {
        Endpoint::Vbc(value)
    }
}

// ===== Deserialization through the validating constructors =====

#[derive(Deserialize)]
struct RawPhone {
    number: String,
    #[serde(default)]
    dtmf_answer: Option<String>,
}

impl TryFrom<RawPhone> for Phone {
    type Error = VoiceError;

    fn try_from(raw: RawPhone) -> Result<Self> {
        let phone = Phone::new(raw.number)?;
        Ok(match raw.dtmf_answer {
            Some(digits) => phone.with_dtmf_answer(digits),
            None => phone,
        })
    }
}

#[derive(Deserialize)]
struct RawSip {
    uri: String,
    #[serde(default)]
    headers: BTreeMap<String, String>,
}

impl TryFrom<RawSip> for Sip {
    type Error = VoiceError;

    fn try_from(raw: RawSip) -> Result<Self> {
        let mut sip = Sip::new(raw.uri)?;
        sip.headers = raw.headers;
        Ok(sip)
    }
}

#[derive(Deserialize)]
struct RawWebsocket {
    uri: String,
    #[serde(rename = "content-type", default)]
    content_type: Option<String>,
    #[serde(default)]
    headers: BTreeMap<String, String>,
}

impl TryFrom<RawWebsocket> for Websocket {
    type Error = VoiceError;

    fn try_from(raw: RawWebsocket) -> Result<Self> {
        let mut websocket = Websocket::new(raw.uri)?;
        if let Some(content_type) = raw.content_type {
            websocket.content_type = content_type;
        }
        websocket.headers = raw.headers;
        Ok(websocket)
    }
}

#[derive(Deserialize)]
struct RawApp {
    user: String,
}

impl TryFrom<RawApp> for App {
    type Error = VoiceError;

    fn try_from(raw: RawApp) -> Result<Self> {
        App::new(raw.user)
    }
}

#[derive(Deserialize)]
struct RawVbc {
    extension: String,
}

impl TryFrom<RawVbc> for Vbc {
    type Error = VoiceError;

    fn try_from(raw: RawVbc) -> Result<Self> {
        Vbc::new(raw.extension)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_phone_strips_leading_plus() {
        let phone = Phone::new("+447700900000").unwrap();
        assert_eq!(phone.number(), "447700900000");
    }

    #[test]
    fn test_phone_rejects_non_digits() {
        let err = Phone::new("44-7700-900000").unwrap_err();
        assert!(matches!(err, VoiceError::InvalidPhoneNumber(_)));
        assert!(err.to_string().contains("only digits"));
    }

    #[test]
    fn test_phone_rejects_wrong_length() {
        assert!(Phone::new("123456").is_err());
        assert!(Phone::new("1234567890123456").is_err());
        assert!(Phone::new("1234567").is_ok());
        assert!(Phone::new("123456789012345").is_ok());
    }

    #[test]
    fn test_phone_rejects_empty_and_bare_plus() {
        assert!(Phone::new("").is_err());
        assert!(Phone::new("+").is_err());
    }

    #[test]
    fn test_phone_endpoint_serializes_with_type_tag() {
        let endpoint: Endpoint = Phone::new("447700900000")
            .unwrap()
            .with_dtmf_answer("p*123#")
            .into();
        assert_eq!(endpoint.kind(), "phone");
        assert_eq!(
            serde_json::to_value(&endpoint).unwrap(),
            json!({"type": "phone", "number": "447700900000", "dtmf_answer": "p*123#"})
        );
    }

    #[test]
    fn test_sip_requires_sip_scheme() {
        assert!(Sip::new("sip:rebekka@sip.example.com").is_ok());
        assert!(Sip::new("sips:rebekka@sip.example.com").is_ok());
        let err = Sip::new("https://example.com").unwrap_err();
        assert!(matches!(err, VoiceError::InvalidEndpoint(_)));
    }

    #[test]
    fn test_sip_headers_serialize_only_when_present() {
        let bare: Endpoint = Sip::new("sip:a@b.example").unwrap().into();
        assert_eq!(
            serde_json::to_value(&bare).unwrap(),
            json!({"type": "sip", "uri": "sip:a@b.example"})
        );

        let with_headers: Endpoint = Sip::new("sip:a@b.example")
            .unwrap()
            .with_header("X-Campaign", "spring")
            .into();
        assert_eq!(
            serde_json::to_value(&with_headers).unwrap()["headers"],
            json!({"X-Campaign": "spring"})
        );
    }

    #[test]
    fn test_websocket_defaults_content_type() {
        let ws = Websocket::new("wss://media.example.com/socket").unwrap();
        assert_eq!(ws.content_type(), DEFAULT_WEBSOCKET_CONTENT_TYPE);

        let endpoint: Endpoint = ws.with_content_type("audio/l16;rate=8000").into();
        let value = serde_json::to_value(&endpoint).unwrap();
        assert_eq!(value["type"], "websocket");
        assert_eq!(value["content-type"], "audio/l16;rate=8000");
    }

    #[test]
    fn test_websocket_requires_ws_scheme() {
        assert!(Websocket::new("http://media.example.com").is_err());
    }

    #[test]
    fn test_app_and_vbc_reject_blank() {
        assert!(App::new("  ").is_err());
        assert!(Vbc::new("").is_err());
        let endpoint: Endpoint = Vbc::new("123").unwrap().into();
        assert_eq!(
            serde_json::to_value(&endpoint).unwrap(),
            json!({"type": "vbc", "extension": "123"})
        );
    }

    #[test]
    fn test_endpoint_deserializes_from_wire() {
        let endpoint: Endpoint =
            serde_json::from_value(json!({"type": "app", "user": "alice"})).unwrap();
        assert_eq!(endpoint, Endpoint::App(App::new("alice").unwrap()));
    }

    #[test]
    fn test_phone_deserialization_validates_number() {
        let err = serde_json::from_value::<Phone>(json!({"number": "not-a-number"})).unwrap_err();
        assert!(err.to_string().contains("invalid phone number"));

        let endpoint = serde_json::from_value::<Endpoint>(json!({"type": "phone", "number": "abc"}));
        assert!(endpoint.is_err());

        let phone: Phone =
            serde_json::from_value(json!({"number": "+447700900000", "dtmf_answer": "1"})).unwrap();
        assert_eq!(phone.number(), "447700900000");
        assert_eq!(phone.dtmf_answer(), Some("1"));
    }

    #[test]
    fn test_other_endpoints_deserialization_validates() {
        assert!(serde_json::from_value::<Sip>(json!({"uri": "https://example.com"})).is_err());
        assert!(serde_json::from_value::<Websocket>(json!({"uri": "http://example.com"})).is_err());
        assert!(serde_json::from_value::<App>(json!({"user": " "})).is_err());
        assert!(serde_json::from_value::<Vbc>(json!({"extension": ""})).is_err());

        let ws: Websocket =
            serde_json::from_value(json!({"uri": "wss://media.example.com"})).unwrap();
        assert_eq!(ws.content_type(), DEFAULT_WEBSOCKET_CONTENT_TYPE);
    }
}
