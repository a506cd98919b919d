//! trellis - command-line client for Trellis agent tasks

mod config;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use config::Config;
use trellis_client::{
    DriverConfig, OrchestratorClient, ProjectRef, RefreshHooks, TaskEvent, TaskOutcome,
    TaskSession, TaskSubmission, history,
};

/// trellis - run agent tasks against a Trellis project
#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a task and stream progress until it finishes
    Run {
        /// Task description for the agent
        task: String,

        /// Project to run against (defaults to the configured project)
        #[arg(long)]
        project: Option<String>,

        /// Database within the project
        #[arg(long)]
        database: Option<String>,

        /// Orchestrator base URL (defaults to the configured endpoint)
        #[arg(long)]
        endpoint: Option<String>,

        /// Iteration cap for this task
        #[arg(long)]
        max_iterations: Option<u32>,
    },

    /// Download a session's persisted messages as a JSON file
    History {
        /// Session identifier
        session_id: String,

        /// Output file
        #[arg(long, default_value = "history.json")]
        out: PathBuf,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Create a starter config file if none exists
    Init,
    /// Print the config file path
    Path,
    /// Print an example config
    Example,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            task,
            project,
            database,
            endpoint,
            max_iterations,
        } => run_task(task, project, database, endpoint, max_iterations).await,
        Command::History { session_id, out } => download_history(session_id, out).await,
        Command::Config { action } => handle_config(action),
    }
}

fn client_from(config: &Config, endpoint: Option<String>) -> anyhow::Result<OrchestratorClient> {
    let endpoint = endpoint
        .or_else(|| config.endpoint.clone())
        .context("no orchestrator endpoint configured (--endpoint or config file)")?;
    let access_token = config
        .access_token()
        .context("no access token configured (TRELLIS_ACCESS_TOKEN or config file)")?;
    let api_key = config
        .api_key()
        .context("no API key configured (TRELLIS_API_KEY or config file)")?;
    Ok(OrchestratorClient::new(endpoint, access_token, api_key))
}

async fn run_task(
    task: String,
    project: Option<String>,
    database: Option<String>,
    endpoint: Option<String>,
    max_iterations: Option<u32>,
) -> anyhow::Result<()> {
    let config = Config::load();
    let client = client_from(&config, endpoint)?;

    let scope = ProjectRef {
        project_id: project
            .or_else(|| config.project_id.clone())
            .context("no project configured (--project or config file)")?,
        database_id: database.or_else(|| config.database_id.clone()),
        connection_id: None,
        share_token: None,
    };

    let driver_config = DriverConfig {
        max_iterations: max_iterations.or(config.max_iterations).unwrap_or(5),
        ..Default::default()
    };
    let mut session = TaskSession::new(driver_config, Arc::new(client), RefreshHooks::default());

    let events = session.subscribe();
    let renderer = tokio::spawn(render_events(events));

    // Ctrl-C maps to the cooperative stop action.
    let handle = session.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nstopping...");
            handle.stop();
        }
    });

    let submission = TaskSubmission {
        task_description: task,
        ..Default::default()
    };

    let result = session.submit(&scope, submission).await;
    renderer.await.ok();

    match result {
        Ok(TaskOutcome::Completed { status }) => {
            println!("task finished with status: {}", status);
            Ok(())
        }
        Ok(TaskOutcome::Cancelled) => {
            println!("task cancelled");
            Ok(())
        }
        Ok(TaskOutcome::Exhausted) => {
            eprintln!("warning: iteration cap reached before the task finished");
            Ok(())
        }
        Ok(TaskOutcome::Incomplete) => {
            eprintln!("warning: stream kept closing early; session may be incomplete");
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("task failed: {}", e)),
    }
}

/// Render driver events as progress lines until the task ends.
async fn render_events(mut events: broadcast::Receiver<TaskEvent>) {
    // Reasoning text arrives as a monotonically-growing string; print only
    // the suffix that is new since the last event.
    let mut printed = 0usize;

    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => break,
        };

        match &event {
            TaskEvent::IterationStart { iteration } => {
                eprintln!("--- iteration {} ---", iteration);
                printed = 0;
            }
            TaskEvent::SessionCreated { session_id } => {
                eprintln!("session: {}", session_id);
            }
            TaskEvent::Reasoning { text, .. } => {
                if text.len() > printed {
                    if let Some(suffix) = text.get(printed..) {
                        print!("{}", suffix);
                        std::io::stdout().flush().ok();
                    }
                    printed = text.len();
                }
            }
            TaskEvent::OperationStart { operation } => {
                eprintln!("\n-> {}", operation);
            }
            TaskEvent::OperationComplete => {}
            TaskEvent::IterationEnd { iteration, status } => {
                eprintln!("\niteration {} done ({})", iteration, status);
            }
            TaskEvent::RetryingIteration { iteration, reason } => {
                eprintln!("warning: iteration {} {}, retrying...", iteration, reason);
            }
            TaskEvent::TaskStart => {}
            TaskEvent::TaskEnd { .. } | TaskEvent::Error { .. } => break,
        }
    }
}

async fn download_history(session_id: String, out: PathBuf) -> anyhow::Result<()> {
    let config = Config::load();
    let client = client_from(&config, None)?;

    let written = history::download_history(&client, &session_id, &out).await?;
    println!("wrote {} messages to {}", written, out.display());
    Ok(())
}

fn handle_config(action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let path = Config::init()?;
            println!("config file: {}", path.display());
        }
        ConfigAction::Path => {
            println!("{}", Config::config_path().display());
        }
        ConfigAction::Example => {
            print!("{}", config::example_config());
        }
    }
    Ok(())
}
