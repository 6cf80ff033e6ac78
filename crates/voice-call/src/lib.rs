//! Outbound call requests for the Vonage Voice API.
//!
//! The centerpiece is [`OutboundCall`], a value object describing one call:
//! the [`Endpoint`] to dial, an optional caller [`Phone`] number, timers,
//! answering machine detection, [`Webhook`] callbacks and an [`Ncco`] call
//! flow. [`CreateCallRequest`] maps it onto the JSON body of the call
//! creation endpoint and [`VoiceClient`] submits it.
//!
//! ```no_run
//! use voice_call::{Ncco, NccoAction, OutboundCall, Phone, VoiceClient, VoiceConfig};
//!
//! # async fn example() -> Result<(), voice_call::VoiceError> {
//! let mut call = OutboundCall::new(Phone::new("447700900000")?, None);
//! call.set_call_flow_script(Ncco::new().with_action(NccoAction::talk("Hello")))
//!     .set_machine_detection_action("hangup")?;
//!
//! let client = VoiceClient::new(&VoiceConfig::resolve_or_default()?)?;
//! let created = client.create_outbound_call(&call).await?;
//! println!("call {} is {}", created.uuid, created.status);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod machine_detection;
pub mod ncco;
pub mod outbound_call;
pub mod request;
pub mod webhook;

pub use client::VoiceClient;
pub use config::{ConfigError, VoiceConfig};
pub use endpoint::{App, Endpoint, Phone, Sip, Vbc, Websocket};
pub use error::{Result, VoiceError};
pub use machine_detection::{AdvancedMachineDetection, DetectionMode, MachineDetectionAction};
pub use ncco::{Ncco, NccoAction};
pub use outbound_call::OutboundCall;
pub use request::{CallCreated, CreateCallRequest};
pub use webhook::{HttpMethod, Webhook};
