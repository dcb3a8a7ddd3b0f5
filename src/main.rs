use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pr_chatops::commands::default_registry;
use pr_chatops::config::{load_config, Config};
use pr_chatops::credentials::{load_secrets, Secrets};
use pr_chatops::error::{GitHubError, ReminderError};
use pr_chatops::schedule::{run_scheduler, Scheduler};
use pr_chatops::slack::{SlackClient, SocketModeListener};
use pr_chatops::{GitHubSource, ReminderService};

const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the bot: weekly schedule plus slash commands (default)
    Run,
    /// Send one reminder now and exit
    Remind {
        #[command(subcommand)]
        mode: RemindMode,
    },
    /// Load and validate config and secrets, then exit
    Check,
}

#[derive(Subcommand, Debug)]
enum RemindMode {
    /// Every open PR to one channel
    Global {
        /// Channel to post to (defaults to the configured channel)
        #[arg(long)]
        channel: Option<String>,
    },
    /// Each configured user's PRs to their direct messages
    Personal {
        /// Tell users with no open PRs that none were found
        #[arg(long)]
        message_no_prs: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "pr-chatops")]
#[command(about = "Slack reminders for open GitHub pull requests", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/pr-chatops/config.yml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to secrets file (defaults to ~/.config/pr-chatops/secrets.yml)
    #[arg(short, long, global = true)]
    secrets: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info,pr_chatops=debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let command = cli.command.unwrap_or(Commands::Run);

    // Config problems are fatal before anything talks to the network
    let config = match load_config(cli.config.map(PathBuf::from)) {
        Ok(c) => c,
        Err(e) => {
            error!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    let secrets = match load_secrets(cli.secrets.map(PathBuf::from)) {
        Ok(s) => s,
        Err(e) => {
            error!("Secrets error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    let scheduler = match Scheduler::from_entries(&config.schedule, Local::now().naive_local()) {
        Ok(s) => s,
        Err(errors) => {
            error!("Schedule errors: {}", errors.join("; "));
            std::process::exit(EXIT_CONFIG);
        }
    };

    info!(
        repos = config.repos.len(),
        users = config.users.len(),
        jobs = scheduler.len(),
        "configuration loaded"
    );

    if let Commands::Check = command {
        for line in scheduler.describe() {
            println!("{}", line);
        }
        println!("Configuration OK");
        std::process::exit(EXIT_SUCCESS);
    }

    let config = Arc::new(config);
    let service = match build_service(&config, &secrets) {
        Ok(s) => s,
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(EXIT_NETWORK);
        }
    };

    let result = match command {
        Commands::Run => {
            run_bot(service, scheduler, &config, &secrets).await;
            Ok(())
        }
        Commands::Remind {
            mode: RemindMode::Global { channel },
        } => {
            let channel = channel.unwrap_or_else(|| config.channel.clone());
            service.run_global(&channel).await.map(|report| {
                info!(posted = report.posted, "global reminder sent");
            })
        }
        Commands::Remind {
            mode: RemindMode::Personal { message_no_prs },
        } => service
            .run_personal(&config.users, message_no_prs)
            .await
            .map(|reports| {
                info!(users = reports.len(), "personal reminders sent");
            }),
        Commands::Check => Ok(()),
    };

    match result {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(e) => {
            error!("Reminder failed: {}", e);
            std::process::exit(exit_code_for(&e));
        }
    }
}

fn build_service(config: &Arc<Config>, secrets: &Secrets) -> Result<ReminderService> {
    let deadline = config.request_timeout();
    let github = pr_chatops::github::create_client(&secrets.github_token)
        .context("Failed to set up GitHub access")?;
    let source = GitHubSource::new(github, deadline);
    let chat = SlackClient::new(secrets.slack_bot_token.clone(), deadline);
    Ok(ReminderService::new(
        Arc::clone(config),
        Arc::new(source),
        Arc::new(chat),
    ))
}

/// Scheduler and Socket Mode listener side by side until Ctrl-C
async fn run_bot(service: ReminderService, scheduler: Scheduler, config: &Config, secrets: &Secrets) {
    let client = SlackClient::new(secrets.slack_bot_token.clone(), config.request_timeout());
    let listener = SocketModeListener::new(
        client,
        secrets.slack_app_token.clone(),
        default_registry(service.clone()),
    );

    info!("pr-chatops running");
    tokio::select! {
        _ = run_scheduler(scheduler, service, config.poll_interval()) => {}
        _ = listener.run() => {}
        _ = tokio::signal::ctrl_c() => info!("shutting down"),
    }
}

fn exit_code_for(error: &ReminderError) -> i32 {
    match error {
        ReminderError::GitHub(GitHubError::BadGitHubToken(_)) => EXIT_AUTH,
        _ => EXIT_NETWORK,
    }
}
