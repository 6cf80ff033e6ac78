//! Places an outbound call through the voice API.
//!
//! Usage:
//! ```bash
//! place-call --to 447700900000 --talk "Hello" --dry-run   # Print the request body
//! place-call --to 447700900000 --answer-url https://example.com/answer
//! place-call --to-sip sip:alice@example.com --from 447700900001 --talk "Hi"
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;
use voice_call::{
    AdvancedMachineDetection, CreateCallRequest, DetectionMode, Endpoint, MachineDetectionAction,
    Ncco, NccoAction, OutboundCall, Phone, Sip, VoiceClient, VoiceConfig, Webhook, Websocket,
};

#[derive(Debug, Parser)]
#[command(name = "place-call", author, version, about)]
struct Args {
    /// Phone number to call (international format, e.g. 447700900000).
    #[arg(long, conflicts_with_all = ["to_sip", "to_websocket"], required_unless_present_any = ["to_sip", "to_websocket"])]
    to: Option<String>,

    /// SIP URI to call instead of a phone number.
    #[arg(long, conflicts_with = "to_websocket")]
    to_sip: Option<String>,

    /// Websocket URI to connect the call audio to.
    #[arg(long)]
    to_websocket: Option<String>,

    /// Caller number. Without it the platform picks a number linked to the
    /// application (or `default_from` from the config file is used).
    #[arg(long)]
    from: Option<String>,

    /// Webhook returning the NCCO once the call is answered.
    #[arg(long)]
    answer_url: Option<String>,

    /// Webhook receiving call status events.
    #[arg(long)]
    event_url: Option<String>,

    /// Text spoken to the callee; builds a one-action NCCO.
    #[arg(long)]
    talk: Option<String>,

    /// Maximum call duration in seconds.
    #[arg(long)]
    length_timer: Option<u32>,

    /// Seconds to ring before giving up.
    #[arg(long)]
    ringing_timer: Option<u32>,

    /// Answering machine action: `continue` or `hangup`.
    #[arg(long)]
    machine_detection: Option<String>,

    /// Enables advanced machine detection with this behavior (`continue` or
    /// `hangup`).
    #[arg(long)]
    amd_behavior: Option<String>,

    /// Advanced detection mode: `default`, `detect` or `detect_beep`.
    #[arg(long, requires = "amd_behavior")]
    amd_mode: Option<String>,

    /// Seconds to wait for a voicemail beep (45-120).
    #[arg(long, requires = "amd_behavior")]
    amd_beep_timeout: Option<u32>,

    /// Path to a `voice-call.toml` config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the request body instead of placing the call.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("info".parse().context("failed to parse log directive")?),
        )
        .init();

    let args = Args::parse();
    run(&args).await
}

async fn run(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    let call = build_call(args, &config)?;

    if args.dry_run {
        let body = CreateCallRequest::try_from(&call).context("invalid call")?;
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let client = VoiceClient::new(&config).context("failed to create voice client")?;
    println!(
        "{} Calling {} endpoint",
        style("→").cyan(),
        style(call.destination().kind()).bold()
    );

    let created = client
        .create_outbound_call(&call)
        .await
        .context("failed to place call")?;

    println!(
        "{} Call {} {}",
        style("✓").green(),
        style(&created.uuid).bold(),
        created.status
    );
    println!("{}", serde_json::to_string_pretty(&created)?);
    Ok(())
}

fn load_config(args: &Args) -> Result<VoiceConfig> {
    match &args.config {
        Some(path) => VoiceConfig::load_with_overrides(path)
            .with_context(|| format!("failed to load config: {}", path.display())),
        None => VoiceConfig::resolve_or_default().context("failed to resolve config"),
    }
}

fn build_call(args: &Args, config: &VoiceConfig) -> Result<OutboundCall> {
    let destination: Endpoint = match (&args.to, &args.to_sip, &args.to_websocket) {
        (Some(number), _, _) => Phone::new(number)?.into(),
        (_, Some(uri), _) => Sip::new(uri.as_str())?.into(),
        (_, _, Some(uri)) => Websocket::new(uri.as_str())?.into(),
        (None, None, None) => bail!("one of --to, --to-sip or --to-websocket is required"),
    };

    let origin = args
        .from
        .as_deref()
        .or(config.default_from.as_deref())
        .map(Phone::new)
        .transpose()
        .context("invalid caller number")?;

    let mut call = OutboundCall::new(destination, origin);

    if let Some(url) = &args.answer_url {
        call.set_answer_webhook(Webhook::new(url.as_str()));
    }
    if let Some(url) = &args.event_url {
        call.set_event_webhook(Webhook::new(url.as_str()));
    }
    if let Some(text) = &args.talk {
        call.set_call_flow_script(Ncco::new().with_action(NccoAction::talk(text.as_str())));
    }
    if let Some(seconds) = args.length_timer.or(config.max_call_duration_seconds) {
        call.set_max_call_duration_seconds(seconds);
    }
    if let Some(seconds) = args.ringing_timer.or(config.ringing_timeout_seconds) {
        call.set_ringing_timeout_seconds(seconds);
    }
    if let Some(action) = &args.machine_detection {
        call.set_machine_detection_action(action)?;
    }
    if let Some(behavior) = &args.amd_behavior {
        let mut amd = AdvancedMachineDetection::new(behavior.parse::<MachineDetectionAction>()?);
        if let Some(mode) = &args.amd_mode {
            amd = amd.with_mode(mode.parse::<DetectionMode>()?);
        }
        if let Some(seconds) = args.amd_beep_timeout {
            amd = amd.with_beep_timeout(seconds)?;
        }
        call.set_advanced_machine_detection(Some(amd));
    }

    Ok(call)
}
