//! # Content Planner
//!
//! Terminal front end for drafting, scheduling and AI-assisting social
//! posts. Runs the interactive shell by default.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use planner_core::domain::StatusFilter;
use planner_core::ports::AssistError;
use planner_core::Action;

mod commands;
mod config;
mod render;
mod shell;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[derive(Parser)]
#[command(name = "planner")]
#[command(about = "Draft, schedule and polish social posts")]
struct Cli {
    /// Directory holding saved posts and preferences
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep everything in memory for this run
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive shell (default)
    Shell,

    /// Print saved posts
    List {
        /// Only posts with this status (Idea, Perfect, Ready to Post)
        #[arg(long, default_value = "All")]
        status: StatusFilter,
    },

    /// Ask the assistant for post ideas
    Brainstorm {
        /// Topic; leave out for trending ideas
        topic: Option<String>,
    },

    /// Review an already published post
    Analyze {
        /// Post text
        text: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let cli = Cli::parse();
    let config = AppConfig::from_env().with_overrides(cli.data_dir, cli.ephemeral);
    tracing::info!(
        data_dir = %config.data_dir.display(),
        ephemeral = config.ephemeral,
        "Starting planner"
    );

    let mut state = AppState::new(&config)?;

    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => shell::run(state, &config).await?,
        Command::List { status } => {
            state.session.dispatch(Action::SetFilter(status))?;
            let now = chrono::Utc::now();
            for post in state.session.visible_posts() {
                println!("{}", render::post_line(post, None, now));
            }
        }
        Command::Brainstorm { topic } => {
            state.session.dispatch(Action::OpenBrainstorm)?;
            let assistant = state.assistant.as_ref().ok_or(AssistError::NotConfigured)?;
            for (i, idea) in assistant.brainstorm(topic.as_deref()).await?.iter().enumerate() {
                println!("{:>2}. {idea}", i + 1);
            }
        }
        Command::Analyze { text } => {
            state.session.dispatch(Action::OpenAnalyzer)?;
            let assistant = state.assistant.as_ref().ok_or(AssistError::NotConfigured)?;
            println!("{}", assistant.analyze(&text).await?);
        }
    }

    Ok(())
}
