//! SkillSwap CLI and MCP Server.

mod commands;
mod config;
mod demo;
mod handlers;
mod mcp;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{bot, chat, listing, rating};
use config::Backend;
use rust_i18n::t;

rust_i18n::i18n!("src/locales", fallback = "en");

/// SkillSwap CLI and MCP Server
#[derive(Parser)]
#[command(name = "skillswap")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "plain")]
    format: output::OutputFormat,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Language for output
    #[arg(short, long, global = true, default_value = "en")]
    lang: String,

    /// Use a seeded in-memory store instead of the document service
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Option<Commands>,

    /// Run as MCP Server
    #[arg(long)]
    mcp: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage authentication
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Skill listings
    #[command(alias = "l")]
    Listing {
        #[command(subcommand)]
        action: listing::ListingAction,
    },

    /// Teacher ratings
    #[command(alias = "r")]
    Rate {
        #[command(subcommand)]
        action: rating::RatingAction,
    },

    /// Direct messages
    #[command(alias = "c")]
    Chat {
        #[command(subcommand)]
        action: chat::ChatAction,
    },

    /// Ask the SkillBot assistant
    Bot(bot::BotArgs),

    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum AuthAction {
    /// Login with token and uid
    Login {
        /// Access token
        #[arg(short, long)]
        token: String,
        /// User ID
        #[arg(short, long)]
        uid: String,
        /// Display name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Logout
    Logout,
    /// Show current auth status
    Status,
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    rust_i18n::set_locale(&cli.lang);

    if cli.mcp {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive(tracing::Level::INFO.into()),
            )
            .with_writer(std::io::stderr)
            .init();

        let backend = Backend::from_flag(cli.offline).await?;
        return mcp::run_server(backend).await;
    }

    init_tracing(cli.verbose);
    let backend = Backend::from_flag(cli.offline).await?;

    let command = cli
        .command
        .ok_or_else(|| anyhow::anyhow!("{}", t!("no_command")))?;

    match command {
        Commands::Auth { action } => handle_auth(action).await,
        Commands::Listing { action } => listing::handle(action, cli.format, &backend).await,
        Commands::Rate { action } => rating::handle(action, cli.format, &backend).await,
        Commands::Chat { action } => chat::handle(action, cli.format, &backend).await,
        Commands::Bot(args) => bot::handle(args, cli.format).await,
        Commands::Config => {
            let cfg = config::load_config()?;
            println!(
                "{}",
                t!("config_file", path = config::config_path()?.display())
            );
            println!("{}", t!("authenticated", status = cfg.auth.is_some()));
            if let Some(auth) = &cfg.auth {
                println!("{}", t!("user_id", uid = &auth.uid));
            }
            println!(
                "{}",
                t!(
                    "backend_url",
                    url = cfg
                        .backend
                        .base_url
                        .as_deref()
                        .unwrap_or(skillswap::client::DEFAULT_BASE_URL)
                )
            );
            Ok(())
        }
    }
}

async fn handle_auth(action: AuthAction) -> Result<()> {
    match action {
        AuthAction::Login { token, uid, name } => {
            let mut cfg = config::load_config()?;
            cfg.auth = Some(config::AuthConfig {
                token,
                uid: uid.clone(),
                name,
            });
            config::save_config(&cfg)?;
            println!("{}", t!("logged_in_as", uid = &uid));
            Ok(())
        }
        AuthAction::Logout => {
            let mut cfg = config::load_config()?;
            cfg.auth = None;
            config::save_config(&cfg)?;
            println!("{}", t!("logged_out"));
            Ok(())
        }
        AuthAction::Status => {
            let cfg = config::load_config()?;
            if let Some(auth) = &cfg.auth {
                println!("{}", t!("logged_in_as", uid = &auth.uid));
            } else {
                println!("{}", t!("not_logged_in"));
            }
            Ok(())
        }
    }
}
