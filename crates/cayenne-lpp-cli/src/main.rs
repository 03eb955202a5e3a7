use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use cayenne_lpp_core::codec::registry;
use cayenne_lpp_core::{
    LppError, ReadingSet, Telemetry, UplinkError, UplinkEvent, decode, decode_units, payload,
    process_uplink,
};
use clap::{Parser, Subcommand, ValueEnum};
use glob::glob;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CAYENNE_LPP_BUILD_COMMIT"),
    " ",
    env!("CAYENNE_LPP_BUILD_DATE"),
    ")"
);

const EXAMPLES: &str = "Examples:\n  cayenne-lpp decode 03670110056700ff\n  cayenne-lpp decode A2cBEAVnAP8= --format base64 --telemetry\n  cayenne-lpp uplink event.json -o record.json --pretty\n  cayenne-lpp types";

#[derive(Parser, Debug)]
#[command(name = "cayenne-lpp")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decoder for Cayenne LPP sensor payloads (LoRaWAN uplinks).",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a raw LPP payload into readings (JSON).
    #[command(alias = "dec")]
    Decode {
        /// Payload text (hex, base64, or a JSON array of bytes)
        payload: String,

        /// Encoding of the payload argument
        #[arg(short, long, value_enum, default_value_t = InputFormat::Hex)]
        format: InputFormat,

        /// Emit flattened telemetry fields instead of per-channel readings
        #[arg(long)]
        telemetry: bool,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Decode a LoRaWAN uplink event file (use `-` for stdin).
    Uplink {
        /// Path to the event JSON
        event: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// List the supported sensor types.
    Types,
}

#[derive(clap::Args, Debug)]
struct OutputArgs {
    /// Output path (JSON); stdout when omitted
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    Hex,
    Base64,
    /// JSON array of integers, e.g. `[3,103,1,16]`
    Bytes,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Decode {
            payload,
            format,
            telemetry,
            output,
        } => cmd_decode(&payload, format, telemetry, &output, cli.quiet),
        Commands::Uplink { event, output } => cmd_uplink(&event, &output, cli.quiet),
        Commands::Types => cmd_types(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

impl From<LppError> for CliError {
    fn from(err: LppError) -> Self {
        let hint = match err {
            LppError::UnknownSensorType { .. } => {
                "the payload uses a sensor type this decoder does not support; see `cayenne-lpp types`"
            }
            LppError::TruncatedHeader { .. } | LppError::TruncatedBody { .. } => {
                "the payload ends mid-entry; check that it was copied completely"
            }
            LppError::ByteOverflow { .. } => "every payload value must be in 0..=255",
            LppError::IntegerTooWide { .. } => "the sensor type declares a field wider than 9 bytes",
        };
        CliError::new(
            format!("payload decode failed: {}", err),
            Some(hint.to_string()),
        )
    }
}

fn cmd_decode(
    text: &str,
    format: InputFormat,
    telemetry: bool,
    output: &OutputArgs,
    quiet: bool,
) -> Result<(), CliError> {
    let readings = decode_text(text, format)?;
    info!(readings = readings.len(), "payload decoded");

    let json = if telemetry {
        serialize_json(&Telemetry::from_readings(&readings), output)?
    } else {
        serialize_json(&readings, output)?
    };
    write_output(&json, output, quiet)
}

fn decode_text(text: &str, format: InputFormat) -> Result<ReadingSet, CliError> {
    let bad_payload = |err: payload::PayloadError| {
        let name = format!("{:?}", format).to_lowercase();
        CliError::new(
            format!("invalid payload: {}", err),
            Some(format!("payload was read as {}; use --format to change", name)),
        )
    };
    let readings = match format {
        InputFormat::Hex => {
            let bytes = payload::from_hex(text).map_err(bad_payload)?;
            debug!(payload = %payload::to_hex(&bytes), "hex payload");
            decode(&bytes)?
        }
        InputFormat::Base64 => {
            let bytes = payload::from_base64(text).map_err(bad_payload)?;
            debug!(payload = %payload::to_hex(&bytes), "base64 payload");
            decode(&bytes)?
        }
        InputFormat::Bytes => {
            let units: Vec<u32> = serde_json::from_str(text).map_err(|err| {
                CliError::new(
                    format!("invalid byte array: {}", err),
                    Some("expected a JSON array of integers, e.g. [3,103,1,16]".to_string()),
                )
            })?;
            decode_units(&units)?
        }
    };
    Ok(readings)
}

fn cmd_uplink(event_path: &Path, output: &OutputArgs, quiet: bool) -> Result<(), CliError> {
    let raw = read_event(event_path)?;
    let event: UplinkEvent = serde_json::from_str(&raw)
        .with_context(|| format!("invalid uplink event: {}", event_path.display()))?;

    let now = OffsetDateTime::now_utc();
    if let Ok(received_at) = now.format(&Rfc3339) {
        debug!(%received_at, "processing uplink");
    }
    let received_at_ms = (now.unix_timestamp_nanos() / 1_000_000) as i64;

    let record = process_uplink(&event, received_at_ms).map_err(|err| match err {
        UplinkError::Decode(err) => CliError::from(err),
        UplinkError::Payload(err) => CliError::new(
            format!("invalid uplink payload: {}", err),
            Some("PayloadData must be standard base64".to_string()),
        ),
    })?;

    let json = serialize_json(&record, output)?;
    write_output(&json, output, quiet)
}

fn cmd_types() -> Result<(), CliError> {
    println!("{:<5} {:<20} {:<6} {:<7} SCALE", "TAG", "NAME", "WIDTH", "SIGNED");
    for descriptor in registry::descriptors() {
        let mut scale = descriptor
            .spans
            .iter()
            .map(|span| match span.name {
                Some(name) => format!("{}:{}", name, span.exponent),
                None => span.exponent.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(multiplier) = descriptor.post_multiplier {
            scale.push_str(&format!(" (x{})", multiplier));
        }
        println!(
            "{:<5} {:<20} {:<6} {:<7} {}",
            descriptor.tag,
            descriptor.name,
            descriptor.width,
            if descriptor.signed { "yes" } else { "no" },
            scale
        );
    }
    Ok(())
}

fn serialize_json<T: Serialize>(value: &T, output: &OutputArgs) -> Result<String, CliError> {
    if output.pretty {
        serde_json::to_string_pretty(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn write_output(json: &str, output: &OutputArgs, quiet: bool) -> Result<(), CliError> {
    let Some(path) = output.output.as_ref() else {
        println!("{}", json);
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(path, format!("{}\n", json))
        .with_context(|| format!("Failed to write output: {}", path.display()))?;
    if !quiet {
        eprintln!("OK: output written -> {}", path.display());
    }
    Ok(())
}

fn read_event(input: &Path) -> Result<String, CliError> {
    if input.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read uplink event from stdin")?;
        return Ok(raw);
    }

    let resolved = resolve_input_path(input)?;
    if !resolved.is_file() {
        return Err(CliError::new(
            format!("event file not found: {}", input.display()),
            Some("pass a JSON uplink event file, or `-` for stdin".to_string()),
        ));
    }
    fs::read_to_string(&resolved)
        .with_context(|| format!("Failed to read event file: {}", resolved.display()))
        .map_err(Into::into)
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single event file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
