//! `tradeprice`: compare average import unit prices across countries.

mod render;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tradeprice_analysis::{Recommender, TradeQuery};
use tradeprice_core::Config;
use tradeprice_ingestion::{RangeAggregator, TradeDataFetcher};

#[derive(Parser, Debug)]
#[command(name = "tradeprice", version, about)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct RangeArgs {
    /// HS code; shorter codes are left-padded with zeros.
    #[arg(long)]
    hs: String,

    /// First month, YYYYMM.
    #[arg(long)]
    start: String,

    /// Last month, YYYYMM.
    #[arg(long)]
    end: String,
}

impl RangeArgs {
    fn query(&self) -> Result<TradeQuery> {
        TradeQuery::parse(&self.hs, &self.start, &self.end).context("invalid query")
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Monthly import rows with unit prices.
    Fetch {
        #[command(flatten)]
        range: RangeArgs,

        /// Country code filter.
        #[arg(long)]
        country: Option<String>,
    },
    /// Countries to import from, ranked by import weight.
    Recommend {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Countries materially cheaper than a base country.
    Alternatives {
        #[command(flatten)]
        range: RangeArgs,

        /// Base country code.
        #[arg(long)]
        base: String,
    },
    /// List the configured countries.
    Countries,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let mut config = match path {
        Some(path) => {
            let config = Config::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            info!("Loaded config from {}", path.display());
            config
        }
        None => Config::default(),
    };
    config.apply_env();
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn warn_empty(message: Option<&str>) {
    eprintln!("warning: {}", message.unwrap_or("no data"));
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    if let Command::Countries = cli.command {
        if cli.json {
            return print_json(&config.recommend.countries);
        }
        print!("{}", render::render_country_list(&config.recommend.countries));
        return Ok(());
    }

    config.validate()?;
    info!(
        "Fetching from {} ({} attempts, {} countries)",
        config.api.endpoint,
        config.fetch.max_attempts,
        config.recommend.countries.len()
    );
    let fetcher = TradeDataFetcher::new(&config.api, &config.fetch)?;
    let aggregator = RangeAggregator::new(fetcher, config.fetch.month_delay());

    match cli.command {
        Command::Fetch { range, country } => {
            let query = range.query()?;
            let outcome = aggregator
                .fetch_range(query.start, query.end, &query.hs_code, country.as_deref())
                .await;
            if cli.json {
                return print_json(&outcome);
            }
            if outcome.is_empty() {
                warn_empty(outcome.message.as_deref());
            } else {
                print!("{}", render::render_rows(&outcome.rows));
            }
        }
        Command::Recommend { range } => {
            let query = range.query()?;
            let recommender = Recommender::new(aggregator, config.recommend.clone());
            let outcome = recommender.recommend_countries(&query).await;
            if cli.json {
                return print_json(&outcome);
            }
            if outcome.is_empty() {
                warn_empty(outcome.message.as_deref());
            } else {
                println!("hs code {} from {} to {}", query.hs_code, query.start, query.end);
                print!("{}", render::render_countries(&outcome.rows));
            }
        }
        Command::Alternatives { range, base } => {
            let query = range.query()?;
            let recommender = Recommender::new(aggregator, config.recommend.clone());
            let report = recommender.recommend_alternatives(&query, &base).await;
            if cli.json {
                return print_json(&report);
            }
            print!("{}", render::render_alternatives(&report));
            if report.is_empty() {
                warn_empty(report.message.as_deref());
            }
        }
        Command::Countries => {}
    }

    Ok(())
}
