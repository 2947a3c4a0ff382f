// crates/descheduler-policy-cli/src/main.rs
// ============================================================================
// Module: Descheduler Policy CLI Entry Point
// Description: Command dispatcher for policy conversion and inspection.
// Purpose: Run v1alpha2 policy documents through the conversion layer.
// Dependencies: clap, descheduler-policy-api, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The `descheduler-policy` binary loads a v1alpha2 policy document, converts
//! it to the canonical model with every plugin payload decoded, and either
//! prints the normalized versioned document or a summary of the canonical
//! one. Inputs are untrusted: documents are size-limited and header-checked
//! before conversion.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use descheduler_policy_api::v1alpha2;
use descheduler_policy_cli::audit::AuditSink;
use descheduler_policy_cli::audit::DocumentConvertedEvent;
use descheduler_policy_cli::audit::RegistryInitializedEvent;
use descheduler_policy_cli::audit::build_audit_sink;
use descheduler_policy_cli::config::PolicyCliConfig;
use descheduler_policy_cli::document::DocumentFormat;
use descheduler_policy_cli::document::load_document;
use descheduler_policy_cli::document::render_document;
use descheduler_policy_cli::pipeline::PolicyConverter;
use descheduler_policy_cli::pipeline::summarize;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "descheduler-policy", version, disable_help_subcommand = true)]
struct Cli {
    /// CLI config path (overrides `DESCHEDULER_POLICY_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a v1alpha2 document through the canonical model and print it.
    Convert(ConvertCommand),
    /// Print a JSON summary of the canonical form of a document.
    Inspect(InspectCommand),
    /// Print the registered conversion pairs as JSON.
    Registry,
    /// CLI configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `convert`.
#[derive(Args, Debug)]
struct ConvertCommand {
    /// Input document path.
    #[command(flatten)]
    input: InputArgs,
    /// Output format.
    #[arg(long, value_enum, default_value_t = FormatArg::Yaml)]
    output_format: FormatArg,
}

/// Arguments for `inspect`.
#[derive(Args, Debug)]
struct InspectCommand {
    /// Input document path.
    #[command(flatten)]
    input: InputArgs,
}

/// Input document selection shared by document commands.
#[derive(Args, Debug)]
struct InputArgs {
    /// Path to the v1alpha2 policy document.
    #[arg(long, value_name = "FILE")]
    input: PathBuf,
    /// Input format; inferred from the file extension when omitted.
    #[arg(long, value_enum)]
    input_format: Option<FormatArg>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate the CLI configuration.
    Validate,
}

/// Document formats accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FormatArg {
    /// YAML.
    Yaml,
    /// JSON.
    Json,
}

impl From<FormatArg> for DocumentFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Yaml => Self::Yaml,
            FormatArg::Json => Self::Json,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Loads configuration, builds the registries, and dispatches the command.
fn run(cli: Cli) -> CliResult<ExitCode> {
    let config = PolicyCliConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    let sink = build_audit_sink(&config.audit)
        .map_err(|err| CliError::new(format!("failed to open audit sink: {err}")))?;
    let converter = PolicyConverter::new(&config.plugin_args)
        .map_err(|err| CliError::new(format!("failed to build registries: {err}")))?;
    sink.record_registry(&RegistryInitializedEvent::new(
        converter.pairs().len(),
        converter.args().kinds().count(),
        converter.args().plugin_bindings().count(),
    ));

    match cli.command {
        Commands::Convert(command) => {
            command_convert(&command, &config, &converter, sink.as_ref())
        }
        Commands::Inspect(command) => {
            command_inspect(&command, &config, &converter, sink.as_ref())
        }
        Commands::Registry => command_registry(&converter),
        Commands::Config {
            command: ConfigCommand::Validate,
        } => command_config_validate(),
    }
}

// ============================================================================
// SECTION: Document Commands
// ============================================================================

/// Executes the `convert` command.
fn command_convert(
    command: &ConvertCommand,
    config: &PolicyCliConfig,
    converter: &PolicyConverter,
    sink: &dyn AuditSink,
) -> CliResult<ExitCode> {
    let result = load_input(&command.input, config).and_then(|policy| {
        let (canonical, versioned) = converter
            .normalize(&policy)
            .map_err(|err| CliError::new(format!("conversion failed: {err}")))?;
        let rendered = render_document(&versioned, command.output_format.into())
            .map_err(|err| CliError::new(err.to_string()))?;
        Ok((profile_count(canonical.profiles.as_deref()), rendered))
    });
    let (_, rendered) = audit_document(sink, "convert", &command.input.input, result)?;
    write_stdout_text(&rendered)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `inspect` command.
fn command_inspect(
    command: &InspectCommand,
    config: &PolicyCliConfig,
    converter: &PolicyConverter,
    sink: &dyn AuditSink,
) -> CliResult<ExitCode> {
    let result = load_input(&command.input, config).and_then(|policy| {
        let canonical = converter
            .to_internal(&policy)
            .map_err(|err| CliError::new(format!("conversion failed: {err}")))?;
        let summary = serde_json::to_string_pretty(&summarize(&canonical))
            .map_err(|err| CliError::new(format!("failed to render summary: {err}")))?;
        Ok((profile_count(canonical.profiles.as_deref()), summary))
    });
    let (_, summary) = audit_document(sink, "inspect", &command.input.input, result)?;
    write_stdout_line(&summary).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Loads the input document with the configured size limit.
fn load_input(
    input: &InputArgs,
    config: &PolicyCliConfig,
) -> CliResult<v1alpha2::DeschedulerPolicy> {
    let format =
        input.input_format.map_or_else(|| DocumentFormat::from_path(&input.input), Into::into);
    load_document(&input.input, format, config.limits.max_document_bytes)
        .map_err(|err| CliError::new(err.to_string()))
}

/// Records the outcome of a document command and passes the result through.
fn audit_document<T>(
    sink: &dyn AuditSink,
    command: &'static str,
    input: &Path,
    result: CliResult<(usize, T)>,
) -> CliResult<(usize, T)> {
    match &result {
        Ok((profiles, _)) => {
            sink.record_document(&DocumentConvertedEvent::success(command, input, *profiles));
        }
        Err(err) => {
            sink.record_document(&DocumentConvertedEvent::failure(command, input, err.to_string()));
        }
    }
    result
}

/// Counts profiles, treating an absent list as empty.
fn profile_count<T>(profiles: Option<&[T]>) -> usize {
    profiles.map_or(0, <[T]>::len)
}

// ============================================================================
// SECTION: Registry and Config Commands
// ============================================================================

/// Executes the `registry` command.
fn command_registry(converter: &PolicyConverter) -> CliResult<ExitCode> {
    let rendered = serde_json::to_string_pretty(&converter.pairs())
        .map_err(|err| CliError::new(format!("failed to render registry: {err}")))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `config validate` command; loading already validated it.
fn command_config_validate() -> CliResult<ExitCode> {
    write_stdout_line("config ok").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes text to stdout, adding a trailing newline only when missing.
fn write_stdout_text(text: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    let result = if text.ends_with('\n') {
        stdout.write_all(text.as_bytes())
    } else {
        writeln!(&mut stdout, "{text}")
    };
    result.map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output stream failure.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
