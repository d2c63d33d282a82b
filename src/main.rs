use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stayfinder::config::{SearchConfig, DEFAULT_NOMINATIM_URL, DEFAULT_OVERPASS_URL, DEFAULT_USER_AGENT};
use stayfinder::location::LocationQuery;
use stayfinder::lodging::{SearchPipeline, StaticCatalog};
use stayfinder::server::{self, AppState};

/// stayfinder: sustainable lodging search over OpenStreetMap
///
/// Resolves a city (or a whole country) to hotel candidates from live
/// OSM data, topped up from a built-in catalog when results are thin.
///
/// Examples:
///   stayfinder serve --port 5000
///   stayfinder search Lisbon --country Portugal
///   stayfinder search "Austin" --country TX
///   stayfinder search Thailand
#[derive(Parser)]
#[command(name = "stayfinder", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    service: ServiceArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ServiceArgs {
    /// Log level when RUST_LOG is unset (error, warn, info, debug, trace).
    #[arg(long, global = true, env = "STAYFINDER_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Geocoding service base URL.
    #[arg(long, global = true, env = "STAYFINDER_NOMINATIM_URL", default_value = DEFAULT_NOMINATIM_URL)]
    nominatim_url: String,

    /// Overpass interpreter endpoint.
    #[arg(long, global = true, env = "STAYFINDER_OVERPASS_URL", default_value = DEFAULT_OVERPASS_URL)]
    overpass_url: String,

    /// User-Agent sent with every outbound request.
    #[arg(long, global = true, env = "STAYFINDER_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// How long a search waits for live results, in milliseconds.
    #[arg(long, global = true, env = "STAYFINDER_DEADLINE_MS", default_value_t = 6000)]
    deadline_ms: u64,

    /// Country classification timeout, in seconds.
    #[arg(long, global = true, env = "STAYFINDER_CLASSIFY_TIMEOUT", default_value_t = 5)]
    classify_timeout: u64,

    /// Geocoding timeout, in seconds.
    #[arg(long, global = true, env = "STAYFINDER_GEOCODE_TIMEOUT", default_value_t = 8)]
    geocode_timeout: u64,

    /// Reverse lookup timeout, in seconds.
    #[arg(long, global = true, env = "STAYFINDER_REVERSE_TIMEOUT", default_value_t = 6)]
    reverse_timeout: u64,

    /// Overpass query timeout, in seconds.
    #[arg(long, global = true, env = "STAYFINDER_OVERPASS_TIMEOUT", default_value_t = 8)]
    overpass_timeout: u64,

    /// Free-text hotel search timeout, in seconds.
    #[arg(long, global = true, env = "STAYFINDER_TEXT_SEARCH_TIMEOUT", default_value_t = 8)]
    text_search_timeout: u64,
}

impl ServiceArgs {
    fn search_config(&self) -> SearchConfig {
        SearchConfig {
            nominatim_url: self.nominatim_url.clone(),
            overpass_url: self.overpass_url.clone(),
            user_agent: self.user_agent.clone(),
            request_deadline: Duration::from_millis(self.deadline_ms),
            classify_timeout: Duration::from_secs(self.classify_timeout),
            geocode_timeout: Duration::from_secs(self.geocode_timeout),
            reverse_timeout: Duration::from_secs(self.reverse_timeout),
            overpass_timeout: Duration::from_secs(self.overpass_timeout),
            text_search_timeout: Duration::from_secs(self.text_search_timeout),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API.
    Serve {
        /// Interface to bind.
        #[arg(long, env = "STAYFINDER_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to bind.
        #[arg(long, short = 'p', env = "STAYFINDER_PORT", default_value_t = 5000)]
        port: u16,
    },

    /// Run one search and print the result set as JSON.
    Search {
        /// City, "City, Country", or a country name.
        city: String,

        /// Country name, alias (UK, US) or US state code (TX).
        #[arg(long, short = 'c', default_value = "")]
        country: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.service.log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = cli.service.search_config();
    let catalog = StaticCatalog::build();
    let pipeline = SearchPipeline::from_config(config);

    match cli.command {
        Command::Serve { host, port } => {
            tracing::info!(catalog = catalog.len(), "static catalog ready");
            server::start(&host, port, AppState::new(catalog, pipeline)).await?;
        }
        Command::Search { city, country } => {
            let set = Arc::new(pipeline)
                .search(&catalog, LocationQuery::new(city, country))
                .await?;
            println!("{}", serde_json::to_string_pretty(&set)?);
        }
    }
    Ok(())
}
