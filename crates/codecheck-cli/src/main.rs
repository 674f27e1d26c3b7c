use clap::Parser;
use codecheck_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod render;
mod session;

use session::{SearchOutcome, Session};

#[derive(Parser)]
#[command(name = "codecheck")]
#[command(version, about = "Search GitHub repositories by keyword", long_about = None)]
struct Cli {
    /// GitHub API base URL (overrides the config file)
    #[arg(long, global = true, env = "CODECHECK_API_URL")]
    api_url: Option<String>,

    /// Minimum milliseconds between two search requests (at least 1000)
    #[arg(long, global = true)]
    min_interval_ms: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Search for repositories
    Search {
        /// Search keywords
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search, then show the details of one result
    Show {
        /// Search keywords
        query: String,
        /// Position in the result list (1-based)
        position: usize,
    },
    /// Keep a session open and search repeatedly
    Interactive,
    /// Write the default config file
    InitConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "codecheck=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(api_url) = cli.api_url {
        config.github.api_url = api_url;
    }
    if let Some(min_interval_ms) = cli.min_interval_ms {
        config.search.min_interval_ms = min_interval_ms;
    }

    match cli.command {
        Some(Commands::Search { query, json }) => {
            let query = query.join(" ");
            tracing::info!("Searching for: {}", query);
            let outcome = Session::new(&config)?.submit(&query).await;

            match &outcome {
                SearchOutcome::Results(items) if json => {
                    println!("{}", serde_json::to_string_pretty(items)?);
                }
                other => session::print_outcome(other),
            }
            if !matches!(outcome, SearchOutcome::Results(_)) {
                std::process::exit(1);
            }
        }
        Some(Commands::Show { query, position }) => {
            let mut session = Session::new(&config)?;
            match session.submit(&query).await {
                SearchOutcome::Results(_) => match session.open(position) {
                    Some(item) => println!("{}", render::detail(&item)),
                    None => {
                        eprintln!("No result at position {}", position);
                        std::process::exit(1);
                    }
                },
                other => {
                    session::print_outcome(&other);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Interactive) => {
            session::run_interactive(Session::new(&config)?).await?;
        }
        Some(Commands::InitConfig) => {
            let path = Config::default().save()?;
            println!("Wrote default config to {}", path.display());
        }
        None => {
            println!("No command specified. Try --help");
        }
    }

    Ok(())
}
