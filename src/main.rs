use botdesk::config::Config;
use botdesk::{init, server};

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Botdesk - admin backend for the Discord bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (default: ./botdesk.yml, then ~/.botdesk/botdesk.yml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the REST API (default)
    Serve,
    /// Print the resolved configuration
    ShowConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init::init_logging();

    let args = Cli::parse();
    let config_path = init::resolve_config_path(args.config);
    let config = Config::load_or_default(&config_path)?;

    match args.command.unwrap_or(Commands::Serve) {
        Commands::ShowConfig => {
            println!("# {}", config_path.display());
            print!("{}", serde_yaml::to_string(&config)?);
        }
        Commands::Serve => {
            tracing::info!("configuration loaded from {}", config_path.display());
            server::serve(&config).await?;
        }
    }

    Ok(())
}
