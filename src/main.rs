use crate::config::{AppConfig, DEFAULT_CONFIG_FILE};
use crate::context::AppContext;
use crate::domain::filter::FilterCriteria;
use crate::domain::listing::{
    wildcard, ListingQuery, DEFAULT_LIMIT, DEFAULT_MIN_BEDROOMS, DEFAULT_PRICE_MAX,
    DEFAULT_PRICE_MIN,
};
use crate::domain::property::ListingType;
use crate::errors::AppError;
use crate::router::handle;
use crate::sources::LocationSelection;
use astra::Server;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn, Level};

mod aggregator;
mod config;
mod context;
mod dataset;
mod domain;
mod errors;
mod responses;
mod router;
mod sources;
mod telemetry;

#[cfg(test)]
mod tests;

/// Property listings by location, with nearby places, incidents,
/// demographics and weather.
#[derive(Debug, Parser)]
#[command(name = "smart_city_explorer", version)]
struct Cli {
    /// Settings file (TOML).
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Dataset path, overriding the configured one.
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Emit newline-delimited JSON logs.
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the JSON API.
    Serve,
    /// Filter listings and print them with the mean price per home type.
    Listings(ListingArgs),
    /// Count, average price, average size and price range for a city.
    Summary {
        /// City name, or "City, ST".
        city: String,
    },
    /// Fetch places, incidents, demographics and weather for a location.
    Context {
        #[arg(long)]
        city: String,
        #[arg(long)]
        state: String,
        #[arg(long)]
        zip: Option<String>,
    },
}

#[derive(Debug, Args)]
struct ListingArgs {
    #[arg(long)]
    state: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    zip: Option<String>,
    #[arg(long, default_value_t = DEFAULT_PRICE_MIN)]
    price_min: f64,
    #[arg(long, default_value_t = DEFAULT_PRICE_MAX)]
    price_max: f64,
    #[arg(long, default_value_t = DEFAULT_MIN_BEDROOMS)]
    min_bedrooms: u32,
    #[arg(long)]
    home_type: Option<String>,
    /// Rent or Buy.
    #[arg(long)]
    listing_type: Option<String>,
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,
}

impl ListingArgs {
    fn into_query(self) -> Result<ListingQuery, String> {
        let listing_type = wildcard(self.listing_type.as_deref())
            .map(str::parse::<ListingType>)
            .transpose()?;

        Ok(ListingQuery {
            criteria: FilterCriteria {
                zip: wildcard(self.zip.as_deref()).map(str::to_string),
                home_type: wildcard(self.home_type.as_deref()).map(str::to_string),
                state: self.state,
                city: self.city,
                price_min: self.price_min,
                price_max: self.price_max,
                min_bedrooms: self.min_bedrooms,
                listing_type,
            },
            limit: self.limit,
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.json_logs, Level::INFO);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "exiting");
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = AppConfig::load(&cli.config)?;
    if let Some(dataset) = cli.dataset {
        config.dataset_path = dataset;
    }

    // A dataset that fails to load stops the process here.
    let ctx = AppContext::from_config(&config)?;

    match cli.command {
        Command::Serve => serve(&config, ctx),
        Command::Listings(args) => {
            let query = args.into_query().map_err(AppError::BadArgument)?;
            print_json(&ctx.store.listings(&query))
        }
        Command::Summary { city } => {
            let summary = ctx.store.summarize(&city);
            if summary.stats().is_none() {
                warn!(%city, "no listings for city");
            }
            print_json(&summary)
        }
        Command::Context { city, state, zip } => {
            let zip = wildcard(zip.as_deref()).map(str::to_string);
            let selection = LocationSelection::new(city, state, zip);
            print_json(&ctx.aggregator.fetch_context(&selection))
        }
    }
}

fn serve(config: &AppConfig, ctx: AppContext) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .map_err(|_| AppError::BindAddr(config.bind_addr.clone()))?;

    info!(%addr, workers = config.max_workers, "starting server");

    let ctx = Arc::new(ctx);
    let server = Server::bind(&addr).max_workers(config.max_workers);

    server.serve(move |req, _info| match handle(req, &ctx) {
        Ok(resp) => resp,
        Err(err) => {
            warn!(error = %err, "request failed");
            responses::error_response(&err)
        }
    })?;

    info!("server shut down cleanly");
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
