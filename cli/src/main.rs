use anyhow::Result;
use askweb_core::{AppState, ChatService, Config, ExecutorFactory, api, config, run_agent};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "askweb")]
#[command(about = "askweb - chat agent service with web search and session memory", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to ~/.askweb/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Ask a single question and print the answer
    Ask {
        question: String,
        #[arg(long, default_value = "cli")]
        user: String,
        #[arg(long, default_value = "default")]
        session: String,
    },
    /// Clear the stored history of a session
    Reset {
        #[arg(long, default_value = "cli")]
        user: String,
        #[arg(long, default_value = "default")]
        session: String,
    },
    /// Write a default config file
    Init {
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration with secrets masked
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Serve { bind: None });

    match command {
        Commands::Serve { bind } => {
            let mut config = Config::load(cli.config.as_deref())?;
            if let Some(bind) = bind {
                config.server.bind = bind;
            }

            let state = AppState::new(config);
            api::start_server(state, shutdown_signal()).await?;
        }
        Commands::Ask {
            question,
            user,
            session,
        } => {
            let config = Arc::new(Config::load(cli.config.as_deref())?);
            let service = ChatService::new(config);

            let answer = tokio::task::spawn_blocking(move || -> Result<String> {
                let executor = service.build(&user, &session)?;
                Ok(run_agent(&question, executor.as_ref())?)
            })
            .await??;

            println!("{}", answer);
        }
        Commands::Reset { user, session } => {
            let config = Arc::new(Config::load(cli.config.as_deref())?);
            ChatService::new(config).reset(&user, &session)?;
            println!("Cleared history for {}/{}", user, session);
        }
        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(config::get_config_path);
            if path.exists() && !force {
                anyhow::bail!(
                    "Config already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            config::save_config(&Config::default(), &path)?;
            println!("Wrote default config to {}", path.display());
        }
        Commands::Config => {
            let config = Config::load(cli.config.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&config.redacted())?);
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
