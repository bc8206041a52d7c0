use std::io::IsTerminal;

use cinedex::config::ClientConfig;
use cinedex::services::{movies, people};
use cinedex::ApiClient;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use serde_json::{json, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// M-MIMALLOC-APP: Use mimalloc as global allocator for improved performance.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Query the movie API from the command line.
#[derive(Debug, Parser)]
#[command(name = "cinedex", version)]
struct Cli {
    /// API base URL (overrides CINEDEX_API_BASE).
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Up to 30 popular movies.
    Popular,
    /// Up to 30 top-rated movies.
    TopRated,
    /// Top 5 movies by revenue.
    TopRevenue,
    SearchMovies {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = movies::SEARCH_PAGE_SIZE)]
        limit: u32,
    },
    SearchPeople {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = movies::SEARCH_PAGE_SIZE)]
        limit: u32,
    },
    Movie {
        id: String,
    },
    Reviews {
        id: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = movies::REVIEWS_PAGE_SIZE)]
        limit: u32,
    },
    Person {
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "cinedex=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if std::env::var_os("CINEDEX_LOG_JSON").is_some() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(std::io::stderr().is_terminal()),
            )
            .init();
    }

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(base) = cli.api_base {
        config.api_base = base;
    }
    tracing::info!(api_base = %config.api_base, "Starting cinedex");

    let api = ApiClient::anonymous(&config)?;

    let output: Value = match cli.command {
        Command::Popular => json!(movies::popular(&api).await?),
        Command::TopRated => json!(movies::top_rated(&api).await?),
        Command::TopRevenue => json!(movies::top_revenue(&api).await?),
        Command::SearchMovies { query, page, limit } => {
            listing_json(movies::search(&api, &query, page, limit).await?)
        }
        Command::SearchPeople { query, page, limit } => {
            listing_json(movies::search_people(&api, &query, page, limit).await?)
        }
        Command::Movie { id } => json!(movies::movie(&api, &id).await?),
        Command::Reviews { id, page, limit } => {
            listing_json(movies::reviews(&api, &id, page, limit).await?)
        }
        Command::Person { id } => json!(people::person(&api, &id).await?),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn listing_json(listing: cinedex::Listing) -> Value {
    json!({
        "items": listing.items,
        "pagination": listing.pagination,
        "page_buttons": listing.pagination.page_buttons(),
    })
}
