mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::{auth::AuthSubcommand, project::ProjectSubcommand, task::TaskSubcommand};
use taskdeck_core::config::ClientConfig;
use taskdeck_core::http::ApiClient;
use taskdeck_core::identity;

#[derive(Parser)]
#[command(
    name = "taskdeck",
    about = "Track projects, tasks, and task history against a taskdeck server",
    version,
    propagate_version = true
)]
struct Cli {
    /// Base URL of the tracking API, including the /api suffix
    #[arg(long, global = true, env = "TASKDECK_API_URL")]
    api_url: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register, log in, log out, or show the current identity
    Auth {
        #[command(subcommand)]
        subcommand: AuthSubcommand,
    },

    /// Manage projects
    Project {
        #[command(subcommand)]
        subcommand: ProjectSubcommand,
    },

    /// Manage tasks
    Task {
        #[command(subcommand)]
        subcommand: TaskSubcommand,
    },

    /// Show a task together with its change history
    Logs { task_id: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ClientConfig::load(cli.api_url.as_deref())?;
    let client = ApiClient::new(&config, identity::default_store())?;

    match cli.command {
        Commands::Auth { subcommand } => cmd::auth::run(&client, subcommand, cli.json).await,
        Commands::Project { subcommand } => cmd::project::run(&client, subcommand, cli.json).await,
        Commands::Task { subcommand } => cmd::task::run(&client, subcommand, cli.json).await,
        Commands::Logs { task_id } => cmd::logs::run(&client, &task_id, cli.json).await,
    }
}
