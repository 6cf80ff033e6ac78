//! Call control objects (NCCO): the script the platform runs once a call
//! connects.
//!
//! Only the actions an outbound call commonly needs are modeled. The platform
//! validates the script itself when the call is created.

use serde::{Deserialize, Serialize};

use crate::endpoint::Endpoint;

/// A single step of a call flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum NccoAction {
    /// Speak text to the callee.
    Talk {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        #[serde(rename = "loop", default, skip_serializing_if = "Option::is_none")]
        repeat: Option<u32>,
    },
    /// Play an audio file.
    Stream {
        #[serde(rename = "streamUrl")]
        stream_url: Vec<String>,
        #[serde(rename = "loop", default, skip_serializing_if = "Option::is_none")]
        repeat: Option<u32>,
    },
    /// Record the call.
    Record {
        #[serde(rename = "eventUrl", default, skip_serializing_if = "Vec::is_empty")]
        event_url: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<String>,
    },
    /// Bridge the call to another endpoint.
    Connect {
        endpoint: Vec<Endpoint>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<String>,
    },
    /// Send a payload to a webhook without affecting the call.
    Notify {
        payload: serde_json::Value,
        #[serde(rename = "eventUrl")]
        event_url: Vec<String>,
    },
}

impl NccoAction {
    pub fn talk(text: impl Into<String>) -> Self {
        NccoAction::Talk {
            text: text.into(),
            language: None,
            repeat: None,
        }
    }

    pub fn stream(url: impl Into<String>) -> Self {
        NccoAction::Stream {
            stream_url: vec![url.into()],
            repeat: None,
        }
    }

    pub fn connect(endpoint: impl Into<Endpoint>) -> Self {
        NccoAction::Connect {
            endpoint: vec![endpoint.into()],
            from: None,
        }
    }

    /// Wire name of the action.
    pub fn name(&self) -> &'static str {
        match self {
            NccoAction::Talk { .. } => "talk",
            NccoAction::Stream { .. } => "stream",
            NccoAction::Record { .. } => "record",
            NccoAction::Connect { .. } => "connect",
            NccoAction::Notify { .. } => "notify",
        }
    }
}

/// An ordered list of call flow actions. Serializes as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ncco {
    actions: Vec<NccoAction>,
}

impl Ncco {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action to the end of the flow.
    pub fn push(&mut self, action: NccoAction) -> &mut Self {
        self.actions.push(action);
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: NccoAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn actions(&self) -> &[NccoAction] {
        &self.actions
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }
}

impl FromIterator<NccoAction> for Ncco {
    fn from_iter<I: IntoIterator<Item = NccoAction>>(iter: I) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}
