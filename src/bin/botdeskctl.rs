use anyhow::{Context, Result};
use botdesk::commands::load_commands;
use botdesk::config::Config;
use botdesk::parameters::{ParameterInput, ParameterStore, StoreError};
use botdesk::{init, register};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "botdeskctl")]
#[command(about = "Botdesk CLI: inspect commands, manage parameters, register with Discord", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ./botdesk.yml, then ~/.botdesk/botdesk.yml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the commands declared in the bot's commands.js as JSON
    Commands {
        /// Only show commands listed in ALL_COMMANDS
        #[arg(long)]
        active_only: bool,
    },
    /// Manage configuration parameters
    Params {
        #[command(subcommand)]
        action: ParamsAction,
    },
    /// Register the active commands as global Discord commands (needs DISCORD_TOKEN and APP_ID)
    Register {
        /// Print the payload instead of calling Discord
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
enum ParamsAction {
    /// List all parameters, newest first
    List,
    /// Show one parameter
    Get { id: i64 },
    /// Create a parameter, or update it if the name exists
    Set { name: String, kind: String, value: String },
    /// Delete a parameter
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init::init_logging();

    let cli = Cli::parse();
    let config_path = init::resolve_config_path(cli.config);
    let config = Config::load_or_default(&config_path)?;

    match cli.command {
        Commands::Commands { active_only } => run_commands(&config, active_only)?,
        Commands::Params { action } => run_params(&config, action).await?,
        Commands::Register { dry_run } => run_register(&config, dry_run).await?,
    }
    Ok(())
}

fn run_commands(config: &Config, active_only: bool) -> Result<()> {
    let mut commands = load_commands(&config.commands.path)?;
    if active_only {
        commands.retain(|c| c.active);
    }
    if commands.is_empty() {
        eprintln!("No commands found in {}", config.commands.path.display());
    }
    println!("{}", serde_json::to_string_pretty(&commands)?);
    Ok(())
}

async fn run_params(config: &Config, action: ParamsAction) -> Result<()> {
    let store = ParameterStore::open(&config.parameters.path)?;
    match action {
        ParamsAction::List => {
            let parameters = store.list().await;
            if parameters.is_empty() {
                println!("No parameters configured.");
            }
            for p in parameters {
                println!("{:>4}  {:<24} {:<8} {}", p.id, p.name, p.kind, p.value);
            }
        }
        ParamsAction::Get { id } => {
            let parameter = store.get(id).await?;
            println!("{}", serde_json::to_string_pretty(&parameter)?);
        }
        ParamsAction::Set { name, kind, value } => {
            let input = ParameterInput::new(name.clone(), kind, value);
            let parameter = match store.get_by_name(&name).await {
                Ok(existing) => store.update(existing.id, &input).await?,
                Err(StoreError::NotFound) => store.create(&input).await?,
                Err(e) => return Err(e.into()),
            };
            println!("Saved parameter #{} ({})", parameter.id, parameter.name);
        }
        ParamsAction::Delete { id } => {
            store.delete(id).await?;
            println!("Parameter deleted successfully");
        }
    }
    Ok(())
}

async fn run_register(config: &Config, dry_run: bool) -> Result<()> {
    let records = load_commands(&config.commands.path)?;

    if dry_run {
        let payload = register::build_active_commands(&records);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let token = std::env::var("DISCORD_TOKEN").context("DISCORD_TOKEN is not set")?;
    let app_id = std::env::var("APP_ID")
        .context("APP_ID is not set")?
        .trim()
        .parse::<u64>()
        .context("APP_ID must be a numeric application id")?;

    let count = register::register_global_commands(&token, app_id, &records).await?;
    println!("Registered {} global command(s).", count);
    Ok(())
}
