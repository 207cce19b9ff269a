use clap::{Parser, Subcommand};
use clue_meister::{ClueMeister, ClueMeisterConfig, ClueResponse, ClueSession, Coordinate, KnowledgeBase};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "clue-meister")]
#[command(about = "Clue Meister SAR agent CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database path (overrides config)
    #[arg(short, long)]
    db: Option<String>,

    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a clue, e.g. "red hat at 45.2,-121.3"
    AddClue {
        /// Clue description
        description: String,
    },

    /// Rank stored clues against a rescue path
    Rank {
        /// Path points as lat,lon
        #[arg(short, long, num_args = 1.., value_parser = parse_point, allow_hyphen_values = true)]
        path: Vec<Coordinate>,
    },

    /// Apply the rule pass to stored clues
    Triage,

    /// Send a raw JSON message to the agent
    Send {
        /// Message, e.g. '{"get_clues": true}'
        message: String,
    },

    /// Get knowledge base statistics
    Stats,
}

fn parse_point(raw: &str) -> Result<Coordinate, String> {
    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected lat,lon but got '{}'", raw))?;
    let lat = lat.trim().parse::<f64>().map_err(|e| format!("bad latitude '{}': {}", lat, e))?;
    let lon = lon.trim().parse::<f64>().map_err(|e| format!("bad longitude '{}': {}", lon, e))?;
    Ok(Coordinate::new(lat, lon))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut config = ClueMeisterConfig::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database.path = db;
    }

    let agent = ClueMeister::from_config(&config).await?;
    let mut session = ClueSession::new();

    match cli.command {
        Commands::AddClue { description } => {
            let id = agent.knowledge_base().add_clue(&description).await?;
            println!("✅ Stored clue #{}: {}", id, description);
        }

        Commands::Rank { path } => {
            let length = agent.set_path(&mut session, path);
            println!("🧭 Ranking against {} path points [{}]", length, agent.ranker_name());

            let ranked = agent.rank_clues(&session).await?;
            if ranked.is_empty() {
                println!("   No clues stored");
            }
            for (i, clue) in ranked.iter().enumerate() {
                println!("   {}. [{:>6.1}] #{} {}", i + 1, clue.score, clue.id, clue.description);
            }
        }

        Commands::Triage => {
            let triaged = agent.triage().await?;

            println!("🧭 {} clues inside the search grid:", triaged.len());
            for clue in &triaged {
                println!("   +{:<3} #{} {}", clue.priority, clue.id, clue.description);
            }
        }

        Commands::Send { message } => {
            let value: serde_json::Value = serde_json::from_str(&message)?;
            let response = agent.process_request(&mut session, &value).await;

            println!("{}", serde_json::to_string_pretty(&response)?);
            if let ClueResponse::Error { .. } = response {
                std::process::exit(1);
            }
        }

        Commands::Stats => {
            let stats = agent.knowledge_base().stats().await?;

            println!("📊 Knowledge Base Statistics:");
            println!("   Clues: {}", stats.total_clues);
            println!("   Flagged: {}", stats.flagged_clues);
            println!("   Pending queries: {}", stats.pending_queries);
            println!("   Interview sightings: {}", stats.interview_sightings);

            if let Some(newest) = stats.newest_clue {
                println!("   Newest clue: {}", newest.format("%Y-%m-%d %H:%M:%S"));
            }
        }
    }

    Ok(())
}
