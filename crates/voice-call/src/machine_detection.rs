//! Answering machine detection settings.

use std::{fmt, ops::RangeInclusive, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::VoiceError;

/// What the platform does when it detects an answering machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineDetectionAction {
    /// Keep the call going and report the detection through the event webhook.
    Continue,
    /// End the call.
    Hangup,
}

impl MachineDetectionAction {
    pub fn as_str(self) -> &'static str {
        match self {
            MachineDetectionAction::Continue => "continue",
            MachineDetectionAction::Hangup => "hangup",
        }
    }
}

impl fmt::Display for MachineDetectionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MachineDetectionAction {
    type Err = VoiceError;

    /// Matches exactly `"continue"` or `"hangup"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "continue" => Ok(MachineDetectionAction::Continue),
            "hangup" => Ok(MachineDetectionAction::Hangup),
            other => Err(VoiceError::InvalidConfiguration(format!(
                "unknown machine detection action {other:?}, expected \"continue\" or \"hangup\""
            ))),
        }
    }
}

/// How advanced machine detection classifies the callee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMode {
    /// Platform default behaviour.
    Default,
    /// Detect human or machine only.
    #[default]
    Detect,
    /// Detect a machine and wait for the voicemail beep.
    DetectBeep,
}

impl DetectionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DetectionMode::Default => "default",
            DetectionMode::Detect => "detect",
            DetectionMode::DetectBeep => "detect_beep",
        }
    }
}

impl fmt::Display for DetectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectionMode {
    type Err = VoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(DetectionMode::Default),
            "detect" => Ok(DetectionMode::Detect),
            "detect_beep" => Ok(DetectionMode::DetectBeep),
            other => Err(VoiceError::InvalidConfiguration(format!(
                "unknown machine detection mode {other:?}"
            ))),
        }
    }
}

/// Advanced machine detection. When present on a call it takes precedence
/// over the plain [`MachineDetectionAction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvancedMachineDetection {
    behavior: MachineDetectionAction,
    mode: DetectionMode,
    beep_timeout: u32,
}

impl AdvancedMachineDetection {
    /// Seconds to wait for a voicemail beep when none is given.
    pub const DEFAULT_BEEP_TIMEOUT: u32 = 45;
    /// Accepted beep timeout range in seconds.
    pub const BEEP_TIMEOUT_RANGE: RangeInclusive<u32> = 45..=120;

    /// Creates a detection config using the default mode and beep timeout.
    pub fn new(behavior: MachineDetectionAction) -> Self {
        Self {
            behavior,
            mode: DetectionMode::default(),
            beep_timeout: Self::DEFAULT_BEEP_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: DetectionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets how long to wait for a voicemail beep.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceError::InvalidConfiguration`] when `seconds` is outside
    /// 45 to 120.
    pub fn with_beep_timeout(mut self, seconds: u32) -> Result<Self, VoiceError> {
        if !Self::BEEP_TIMEOUT_RANGE.contains(&seconds) {
            return Err(VoiceError::InvalidConfiguration(format!(
                "beep timeout must be between {} and {} seconds, got {seconds}",
                Self::BEEP_TIMEOUT_RANGE.start(),
                Self::BEEP_TIMEOUT_RANGE.end()
            )));
        }
        self.beep_timeout = seconds;
        Ok(self)
    }

    pub fn behavior(&self) -> MachineDetectionAction {
        self.behavior
    }

    pub fn mode(&self) -> DetectionMode {
        self.mode
    }

    pub fn beep_timeout(&self) -> u32 {
        self.beep_timeout
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_action_parses_only_exact_values() {
        assert_eq!(
            "continue".parse::<MachineDetectionAction>().unwrap(),
            MachineDetectionAction::Continue
        );
        assert_eq!(
            "hangup".parse::<MachineDetectionAction>().unwrap(),
            MachineDetectionAction::Hangup
        );
        for bad in ["", "Hangup", "CONTINUE", " hangup", "hang-up", "voicemail"] {
            let err = bad.parse::<MachineDetectionAction>().unwrap_err();
            assert!(matches!(err, VoiceError::InvalidConfiguration(_)), "{bad:?}");
        }
    }

    #[test]
    fn test_action_display_matches_wire() {
        for action in [MachineDetectionAction::Continue, MachineDetectionAction::Hangup] {
            assert_eq!(
                serde_json::to_value(action).unwrap(),
                json!(action.to_string())
            );
        }
    }

    #[test]
    fn test_mode_round_trips_through_str() {
        for mode in [
            DetectionMode::Default,
            DetectionMode::Detect,
            DetectionMode::DetectBeep,
        ] {
            assert_eq!(mode.as_str().parse::<DetectionMode>().unwrap(), mode);
        }
        assert!("beep".parse::<DetectionMode>().is_err());
    }

    #[test]
    fn test_advanced_defaults() {
        let amd = AdvancedMachineDetection::new(MachineDetectionAction::Hangup);
        assert_eq!(amd.mode(), DetectionMode::Detect);
        assert_eq!(amd.beep_timeout(), 45);
        assert_eq!(
            serde_json::to_value(&amd).unwrap(),
            json!({"behavior": "hangup", "mode": "detect", "beep_timeout": 45})
        );
    }

    #[test]
    fn test_advanced_beep_timeout_bounds() {
        let base = AdvancedMachineDetection::new(MachineDetectionAction::Continue);
        assert_eq!(base.clone().with_beep_timeout(120).unwrap().beep_timeout(), 120);
        assert!(base.clone().with_beep_timeout(44).is_err());
        assert!(base.with_beep_timeout(121).is_err());
    }

    #[test]
    fn test_advanced_with_mode_serializes_snake_case() {
        let amd = AdvancedMachineDetection::new(MachineDetectionAction::Continue)
            .with_mode(DetectionMode::DetectBeep);
        assert_eq!(serde_json::to_value(&amd).unwrap()["mode"], "detect_beep");
    }
}
