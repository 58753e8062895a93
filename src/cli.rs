//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::acquisition::AcquisitionManager;
use crate::domain::config::TickstatsConfig;
use crate::domain::error::TickstatsError;
use crate::domain::indicator::{StockstatsEngine, SUPPORTED};
use crate::domain::resolver::IndicatorResolver;
use crate::domain::stats::StockStats;
use crate::ports::clock_port::SystemClock;
use crate::ports::market_data_port::MarketDataPort;

#[derive(Parser, Debug)]
#[command(name = "tickstats", about = "Technical indicator lookup over daily price history")]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print an indicator value for a symbol on a date
    Lookup {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        indicator: String,
        /// Date to look up, YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Fetch from Yahoo Finance through the daily cache
        #[arg(long, conflicts_with = "offline")]
        online: bool,
        /// Read the pre-seeded data directory only
        #[arg(long)]
        offline: bool,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long)]
        cache_dir: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Fill today's cache entry for a symbol
    Fetch {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        cache_dir: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List indicator names understood by the built-in engine
    Indicators,
}

pub fn run(cli: Cli) -> ExitCode {
    init_tracing(cli.verbose);

    match cli.command {
        Command::Lookup {
            symbol,
            indicator,
            date,
            online,
            offline,
            data_dir,
            cache_dir,
            config,
        } => {
            let mode = if online {
                Some(true)
            } else if offline {
                Some(false)
            } else {
                None
            };
            run_lookup(
                &symbol,
                &indicator,
                &date,
                mode,
                config.as_ref(),
                data_dir,
                cache_dir,
            )
        }
        Command::Fetch {
            symbol,
            cache_dir,
            config,
        } => run_fetch(&symbol, config.as_ref(), cache_dir),
        Command::Indicators => run_indicators(),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "tickstats=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn fail(err: TickstatsError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

/// Load the optional config file and apply command-line overrides.
pub fn resolve_config(
    path: Option<&PathBuf>,
    data_dir: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
) -> Result<TickstatsConfig, TickstatsError> {
    let mut config = match path {
        Some(p) => TickstatsConfig::from_port(&FileConfigAdapter::from_file(p)?),
        None => TickstatsConfig::default(),
    };
    if let Some(d) = data_dir {
        config.data_dir = d;
    }
    if let Some(c) = cache_dir {
        config.data_cache_dir = c;
    }
    Ok(config)
}

#[cfg(feature = "yahoo")]
pub fn default_provider() -> Result<Box<dyn MarketDataPort>, TickstatsError> {
    Ok(Box::new(crate::adapters::yahoo_adapter::YahooAdapter::new()?))
}

#[cfg(not(feature = "yahoo"))]
pub fn default_provider() -> Result<Box<dyn MarketDataPort>, TickstatsError> {
    struct Unavailable;

    impl MarketDataPort for Unavailable {
        fn fetch_daily(
            &self,
            symbol: &str,
            _start: &str,
            _end: &str,
        ) -> Result<Vec<crate::domain::price_table::PriceRecord>, TickstatsError> {
            Err(TickstatsError::RemoteFetch {
                symbol: symbol.to_string(),
                reason: "built without the yahoo feature".into(),
            })
        }
    }

    Ok(Box::new(Unavailable))
}

/// Wire the CSV store, the built-in indicator engine and the system clock
/// around `provider`.
pub fn build_stats(config: &TickstatsConfig, provider: Box<dyn MarketDataPort>) -> StockStats {
    let acquisition = AcquisitionManager::new(
        config.data_cache_dir.clone(),
        Box::new(CsvAdapter),
        provider,
        Box::new(SystemClock),
    );
    StockStats::new(acquisition, IndicatorResolver::new(Box::new(StockstatsEngine)))
}

fn run_lookup(
    symbol: &str,
    indicator: &str,
    date: &str,
    mode: Option<bool>,
    config_path: Option<&PathBuf>,
    data_dir: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
) -> ExitCode {
    let config = match resolve_config(config_path, data_dir, cache_dir) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let online = mode.unwrap_or(config.online);
    let provider = match default_provider() {
        Ok(p) => p,
        Err(e) => return fail(e),
    };
    let stats = build_stats(&config, provider);

    match stats.get_stock_stats(symbol, indicator, date, &config.data_dir, online) {
        Ok(value) => {
            println!("{value}");
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_fetch(symbol: &str, config_path: Option<&PathBuf>, cache_dir: Option<PathBuf>) -> ExitCode {
    let config = match resolve_config(config_path, None, cache_dir) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let provider = match default_provider() {
        Ok(p) => p,
        Err(e) => return fail(e),
    };
    let stats = build_stats(&config, provider);
    let acquisition = stats.acquisition();

    match acquisition.acquire(symbol, &config.data_dir, true) {
        Ok(table) => {
            println!(
                "{} ({} rows)",
                acquisition.cache_path(symbol).display(),
                table.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_indicators() -> ExitCode {
    for (pattern, description) in SUPPORTED {
        println!("{pattern:<20} {description}");
    }
    ExitCode::SUCCESS
}
