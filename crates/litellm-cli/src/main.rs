mod config;
mod logging;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use litellm_client::LitellmClient;
use litellm_provider::{Diagnostics, Provider, ResourceData, Severity};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "terraform-provider-litellm")]
#[command(about = "Manage LiteLLM proxy models, users, teams and team memberships")]
#[command(version)]
struct Cli {
    /// Provider configuration file (JSON)
    #[arg(long, env = "LITELLM_PROVIDER_CONFIG", default_value = config::DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log filter, e.g. `debug` or `litellm_client=debug`
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, default_value = "false")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct StateArgs {
    /// Resource or data source type, e.g. litellm_model
    type_name: String,
    /// State file holding the resource attributes
    state: PathBuf,
    /// Write the resulting state here instead of back to the state file
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print provider, resource and data source schemas
    Schema,
    /// Validate a state file against its resource schema
    Validate {
        type_name: String,
        state: PathBuf,
    },
    /// Create the remote object
    Create(StateArgs),
    /// Refresh the state from the proxy
    Read(StateArgs),
    /// Push the state to the proxy
    Update(StateArgs),
    /// Delete the remote object
    Delete(StateArgs),
    /// Import an existing object by id and print its state
    Import {
        type_name: String,
        id: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Read a data source
    Data(StateArgs),
}

#[derive(Clone, Copy)]
enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Data,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_json)?;

    let provider = Provider::new();

    let diags = match cli.command {
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&provider.schema())?);
            Diagnostics::new()
        }
        Commands::Validate { type_name, state } => {
            let data = config::read_state(&state)?;
            let diags = provider.validate_resource(&type_name, &data);
            if !diags.has_errors() {
                eprintln!("{} {}", "✓".green(), format!("{type_name} is valid").bold());
            }
            diags
        }
        Commands::Create(args) => run(&provider, &cli.config, Operation::Create, args).await?,
        Commands::Read(args) => run(&provider, &cli.config, Operation::Read, args).await?,
        Commands::Update(args) => run(&provider, &cli.config, Operation::Update, args).await?,
        Commands::Delete(args) => run(&provider, &cli.config, Operation::Delete, args).await?,
        Commands::Data(args) => run(&provider, &cli.config, Operation::Data, args).await?,
        Commands::Import { type_name, id, out } => {
            let client = match configure(&provider, &cli.config).await? {
                Ok(client) => client,
                Err(diags) => return Ok(report(&diags)),
            };
            match provider.import(&client, &type_name, &id).await {
                Ok(data) => {
                    emit_state(&data, out.as_deref())?;
                    Diagnostics::new()
                }
                Err(diags) => diags,
            }
        }
    };

    Ok(report(&diags))
}

async fn configure(
    provider: &Provider,
    config_path: &str,
) -> Result<std::result::Result<Arc<LitellmClient>, Diagnostics>> {
    let config = config::load_provider_config(config_path)?;
    Ok(provider.configure(&config).await)
}

async fn run(
    provider: &Provider,
    config_path: &str,
    op: Operation,
    args: StateArgs,
) -> Result<Diagnostics> {
    let mut data = config::read_state(&args.state)?;
    let client = match configure(provider, config_path).await? {
        Ok(client) => client,
        Err(diags) => return Ok(diags),
    };

    let type_name = args.type_name.as_str();
    let diags = match op {
        Operation::Create => provider.create(&client, type_name, &mut data).await,
        Operation::Read => provider.read(&client, type_name, &mut data).await,
        Operation::Update => provider.update(&client, type_name, &mut data).await,
        Operation::Delete => provider.delete(&client, type_name, &mut data).await,
        Operation::Data => provider.read_data_source(&client, type_name, &mut data).await,
    };

    // Failed operations may still have changed state (a failed create leaves
    // no id), so the state is always written back.
    let target = args.out.unwrap_or(args.state);
    config::write_state(&target, &data)
        .with_context(|| format!("failed to persist state for {type_name}"))?;
    Ok(diags)
}

fn emit_state(data: &ResourceData, out: Option<&std::path::Path>) -> Result<()> {
    match out {
        Some(path) => config::write_state(path, data),
        None => {
            println!("{}", serde_json::to_string_pretty(data)?);
            Ok(())
        }
    }
}

/// Print diagnostics to stderr and pick the exit code.
fn report(diags: &Diagnostics) -> ExitCode {
    for diag in diags {
        let label = match diag.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
        };
        match &diag.attribute {
            Some(attribute) => eprintln!("{label}: {} ({})", diag.summary.bold(), attribute),
            None => eprintln!("{label}: {}", diag.summary.bold()),
        }
        if !diag.detail.is_empty() {
            eprintln!("  {}", diag.detail.dimmed());
        }
    }

    if diags.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
