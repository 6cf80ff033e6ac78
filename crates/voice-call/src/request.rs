//! Wire types for the call creation endpoint.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    endpoint::Endpoint,
    error::VoiceError,
    machine_detection::{AdvancedMachineDetection, MachineDetectionAction},
    ncco::NccoAction,
    outbound_call::OutboundCall,
    webhook::{HttpMethod, Webhook},
};

// --- API Request Types ---

/// JSON body of `POST /v1/calls`.
///
/// Built from an [`OutboundCall`] with `TryFrom`. A call must have a call
/// flow, either a non-empty NCCO or an answer webhook. When both are configured the
/// NCCO is sent and the answer webhook dropped. Advanced machine detection
/// likewise replaces the plain machine detection action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateCallRequest {
    /// Destination, always a single endpoint.
    pub to: Vec<Endpoint>,
    /// Caller number; absent when the platform picks one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Endpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_from_number: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_url: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_method: Option<HttpMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_url: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_method: Option<HttpMethod>,
    /// Maximum call duration in seconds.
    pub length_timer: u32,
    /// Ringing timeout in seconds.
    pub ringing_timer: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine_detection: Option<MachineDetectionAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced_machine_detection: Option<AdvancedMachineDetection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ncco: Option<Vec<NccoAction>>,
}

impl TryFrom<&OutboundCall> for CreateCallRequest {
    type Error = VoiceError;

    fn try_from(call: &OutboundCall) -> Result<Self, Self::Error> {
        let ncco = call
            .call_flow_script()
            .filter(|script| !script.is_empty())
            .map(|script| script.actions().to_vec());

        let answer = match (&ncco, call.answer_webhook()) {
            (None, None) => {
                return Err(VoiceError::InvalidConfiguration(
                    "a call needs either an NCCO or an answer webhook".to_string(),
                ));
            }
            (Some(_), Some(webhook)) => {
                warn!(
                    answer_url = webhook.url(),
                    "both an NCCO and an answer webhook are set; sending the NCCO"
                );
                None
            }
            (Some(_), None) => None,
            (None, Some(webhook)) => Some(webhook),
        };

        let advanced_machine_detection = call.advanced_machine_detection().cloned();
        let machine_detection = match (call.machine_detection(), &advanced_machine_detection) {
            (Some(action), Some(_)) => {
                debug!(
                    machine_detection = action.as_str(),
                    "advanced machine detection overrides the plain action"
                );
                None
            }
            (action, _) => action,
        };

        let (from, random_from_number) = match call.origin() {
            Some(phone) => (Some(Endpoint::Phone(phone.clone())), None),
            None => (None, Some(true)),
        };

        Ok(Self {
            to: vec![call.destination().clone()],
            from,
            random_from_number,
            answer_url: answer.map(|webhook| vec![webhook.url().to_string()]),
            answer_method: answer.map(Webhook::method),
            event_url: call
                .event_webhook()
                .map(|webhook| vec![webhook.url().to_string()]),
            event_method: call.event_webhook().map(Webhook::method),
            length_timer: call.max_call_duration_seconds(),
            ringing_timer: call.ringing_timeout_seconds(),
            machine_detection,
            advanced_machine_detection,
            ncco,
        })
    }
}

// --- API Response Types ---

/// Response from the call creation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallCreated {
    /// Unique identifier of the call leg.
    pub uuid: String,
    /// Initial call status, usually `started`.
    pub status: String,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub conversation_uuid: Option<String>,
}
