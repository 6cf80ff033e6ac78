//! The outbound call request.
//!
//! [`OutboundCall`] collects everything the platform needs to place a call:
//! where to call, which number to call from, how long to ring and to stay
//! connected, what to do with answering machines, and which webhooks or call
//! flow script drive the call once it connects.
//!
//! # Example
//!
//! ```
//! use voice_call::{OutboundCall, Phone, Webhook};
//!
//! # fn example() -> Result<(), voice_call::VoiceError> {
//! let mut call = OutboundCall::new(Phone::new("447700900000")?, None);
//! call.set_answer_webhook(Webhook::new("https://example.com/answer"))
//!     .set_ringing_timeout_seconds(30)
//!     .set_machine_detection_action("hangup")?;
//!
//! assert!(call.uses_random_origin());
//! assert_eq!(call.ringing_timeout_seconds(), 30);
//! # Ok(())
//! # }
//! ```

use crate::{
    endpoint::{Endpoint, Phone},
    error::Result,
    machine_detection::{AdvancedMachineDetection, MachineDetectionAction},
    ncco::Ncco,
    webhook::Webhook,
};

/// Configuration for a single outbound call.
///
/// The destination and origin are fixed at construction. Everything else is
/// adjusted through the `set_*` methods, which return `&mut Self` so they can
/// be chained.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundCall {
    destination: Endpoint,
    origin: Option<Phone>,
    uses_random_origin: bool,
    answer_webhook: Option<Webhook>,
    event_webhook: Option<Webhook>,
    max_call_duration_seconds: u32,
    ringing_timeout_seconds: u32,
    machine_detection: Option<MachineDetectionAction>,
    advanced_machine_detection: Option<AdvancedMachineDetection>,
    call_flow_script: Option<Ncco>,
}

impl OutboundCall {
    /// Seconds a connected call may last before the platform hangs up.
    pub const DEFAULT_MAX_CALL_DURATION_SECONDS: u32 = 7200;
    /// Seconds the destination may ring before the platform gives up.
    pub const DEFAULT_RINGING_TIMEOUT_SECONDS: u32 = 60;

    /// Creates a call to `destination`.
    ///
    /// Without an `origin` the platform picks a random number linked to the
    /// application, and [`uses_random_origin`](Self::uses_random_origin)
    /// reports `true` for the lifetime of the request.
    pub fn new(destination: impl Into<Endpoint>, origin: Option<Phone>) -> Self {
        let uses_random_origin = origin.is_none();
        Self {
            destination: destination.into(),
            origin,
            uses_random_origin,
            answer_webhook: None,
            event_webhook: None,
            max_call_duration_seconds: Self::DEFAULT_MAX_CALL_DURATION_SECONDS,
            ringing_timeout_seconds: Self::DEFAULT_RINGING_TIMEOUT_SECONDS,
            machine_detection: None,
            advanced_machine_detection: None,
            call_flow_script: None,
        }
    }

    pub fn destination(&self) -> &Endpoint {
        &self.destination
    }

    pub fn origin(&self) -> Option<&Phone> {
        self.origin.as_ref()
    }

    /// Whether the platform chooses the caller number.
    pub fn uses_random_origin(&self) -> bool {
        self.uses_random_origin
    }

    pub fn answer_webhook(&self) -> Option<&Webhook> {
        self.answer_webhook.as_ref()
    }

    pub fn event_webhook(&self) -> Option<&Webhook> {
        self.event_webhook.as_ref()
    }

    pub fn max_call_duration_seconds(&self) -> u32 {
        self.max_call_duration_seconds
    }

    pub fn ringing_timeout_seconds(&self) -> u32 {
        self.ringing_timeout_seconds
    }

    pub fn machine_detection(&self) -> Option<MachineDetectionAction> {
        self.machine_detection
    }

    pub fn advanced_machine_detection(&self) -> Option<&AdvancedMachineDetection> {
        self.advanced_machine_detection.as_ref()
    }

    pub fn call_flow_script(&self) -> Option<&Ncco> {
        self.call_flow_script.as_ref()
    }

    pub fn set_answer_webhook(&mut self, webhook: Webhook) -> &mut Self {
        self.answer_webhook = Some(webhook);
        self
    }

    pub fn set_event_webhook(&mut self, webhook: Webhook) -> &mut Self {
        self.event_webhook = Some(webhook);
        self
    }

    /// Not range checked; the API rejects values it does not accept.
    pub fn set_max_call_duration_seconds(&mut self, seconds: u32) -> &mut Self {
        self.max_call_duration_seconds = seconds;
        self
    }

    /// Not range checked; the API rejects values it does not accept.
    pub fn set_ringing_timeout_seconds(&mut self, seconds: u32) -> &mut Self {
        self.ringing_timeout_seconds = seconds;
        self
    }

    /// Sets the machine detection action from its wire name.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceError::InvalidConfiguration`] unless `action` is exactly
    /// `"continue"` or `"hangup"`. The current setting is left untouched.
    ///
    /// [`VoiceError::InvalidConfiguration`]: crate::VoiceError::InvalidConfiguration
    pub fn set_machine_detection_action(&mut self, action: &str) -> Result<&mut Self> {
        let action = action.parse::<MachineDetectionAction>()?;
        Ok(self.set_machine_detection(action))
    }

    pub fn set_machine_detection(&mut self, action: MachineDetectionAction) -> &mut Self {
        self.machine_detection = Some(action);
        self
    }

    pub fn set_call_flow_script(&mut self, ncco: Ncco) -> &mut Self {
        self.call_flow_script = Some(ncco);
        self
    }

    /// Replaces the advanced detection config; `None` clears it.
    pub fn set_advanced_machine_detection(
        &mut self,
        config: Option<AdvancedMachineDetection>,
    ) -> &mut Self {
        self.advanced_machine_detection = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        endpoint::Sip,
        error::VoiceError,
        machine_detection::DetectionMode,
        ncco::NccoAction,
        webhook::HttpMethod,
    };

    fn destination() -> Phone {
        Phone::new("447700900000").unwrap()
    }

    #[test]
    fn test_new_without_origin_uses_random_origin() {
        let call = OutboundCall::new(destination(), None);
        assert!(call.uses_random_origin());
        assert!(call.origin().is_none());
    }

    #[test]
    fn test_new_with_origin_keeps_it() {
        let origin = Phone::new("447700900001").unwrap();
        let call = OutboundCall::new(destination(), Some(origin.clone()));
        assert!(!call.uses_random_origin());
        assert_eq!(call.origin(), Some(&origin));
    }

    #[test]
    fn test_random_origin_flag_survives_mutation() {
        let mut call = OutboundCall::new(destination(), None);
        call.set_max_call_duration_seconds(10)
            .set_answer_webhook(Webhook::new("https://example.com/answer"));
        assert!(call.uses_random_origin());
    }

    #[test]
    fn test_defaults() {
        let call = OutboundCall::new(Sip::new("sip:alice@example.com").unwrap(), None);
        assert_eq!(call.destination().kind(), "sip");
        assert_eq!(call.max_call_duration_seconds(), 7200);
        assert_eq!(call.ringing_timeout_seconds(), 60);
        assert!(call.machine_detection().is_none());
        assert!(call.advanced_machine_detection().is_none());
        assert!(call.answer_webhook().is_none());
        assert!(call.event_webhook().is_none());
        assert!(call.call_flow_script().is_none());
    }

    #[test]
    fn test_valid_machine_detection_actions() {
        for (raw, expected) in [
            ("continue", MachineDetectionAction::Continue),
            ("hangup", MachineDetectionAction::Hangup),
        ] {
            let mut call = OutboundCall::new(destination(), None);
            call.set_machine_detection_action(raw).unwrap();
            assert_eq!(call.machine_detection(), Some(expected));
            assert_eq!(call.machine_detection().unwrap().as_str(), raw);
        }
    }

    #[test]
    fn test_invalid_machine_detection_action_leaves_field_unchanged() {
        let mut call = OutboundCall::new(destination(), None);
        let err = call.set_machine_detection_action("voicemail").unwrap_err();
        assert!(matches!(err, VoiceError::InvalidConfiguration(_)));
        assert!(call.machine_detection().is_none());

        call.set_machine_detection(MachineDetectionAction::Continue);
        for bad in ["", "Hangup", "hangup ", "stop"] {
            assert!(call.set_machine_detection_action(bad).is_err());
            assert_eq!(
                call.machine_detection(),
                Some(MachineDetectionAction::Continue)
            );
        }
    }

    #[test]
    fn test_chained_and_sequential_setters_agree() {
        let answer = Webhook::new("https://example.com/answer");
        let event = Webhook::new("https://example.com/event").with_method(HttpMethod::Get);

        let mut chained = OutboundCall::new(destination(), None);
        chained
            .set_answer_webhook(answer.clone())
            .set_event_webhook(event.clone())
            .set_ringing_timeout_seconds(25);

        let mut sequential = OutboundCall::new(destination(), None);
        sequential.set_answer_webhook(answer);
        sequential.set_event_webhook(event);
        sequential.set_ringing_timeout_seconds(25);

        assert_eq!(chained, sequential);
    }

    #[test]
    fn test_setters_are_idempotent() {
        let script = Ncco::new().with_action(NccoAction::talk("Hello"));

        let mut once = OutboundCall::new(destination(), None);
        once.set_call_flow_script(script.clone())
            .set_max_call_duration_seconds(600)
            .set_machine_detection(MachineDetectionAction::Hangup);

        let mut twice = once.clone();
        twice
            .set_call_flow_script(script.clone())
            .set_call_flow_script(script)
            .set_max_call_duration_seconds(600)
            .set_machine_detection_action("hangup")
            .unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_timers_accept_any_value() {
        let mut call = OutboundCall::new(destination(), None);
        call.set_max_call_duration_seconds(0)
            .set_ringing_timeout_seconds(u32::MAX);
        assert_eq!(call.max_call_duration_seconds(), 0);
        assert_eq!(call.ringing_timeout_seconds(), u32::MAX);
    }

    #[test]
    fn test_advanced_machine_detection_clears() {
        let mut call = OutboundCall::new(destination(), None);
        let amd = AdvancedMachineDetection::new(MachineDetectionAction::Hangup)
            .with_mode(DetectionMode::DetectBeep);

        call.set_advanced_machine_detection(Some(amd.clone()));
        assert_eq!(call.advanced_machine_detection(), Some(&amd));

        call.set_advanced_machine_detection(None);
        assert!(call.advanced_machine_detection().is_none());
        assert_eq!(call, OutboundCall::new(destination(), None));
    }

    #[test]
    fn test_outbound_call_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OutboundCall>();
    }
}
