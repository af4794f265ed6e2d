//! MarketLab CLI — query a synthetic market snapshot.
//!
//! Commands:
//! - `stocks` — list instruments with market/trend/search/limit filters
//! - `stock` — one instrument by symbol
//! - `rates` — exchange-rate table for a quote kind
//! - `markets` — the fixed market list
//! - `breadth` / `movers` — advancers and decliners, best performers
//! - `dashboard` — first N instrument and exchange-rate cards
//! - `dump` — the full snapshot as JSON
//! - `universe` — the effective universe as TOML

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::to_string_pretty;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use marketlab_core::domain::{Instrument, InstrumentSummary, Market, QuoteKind, RangeKind, Trend};
use marketlab_core::query::{DEFAULT_DASHBOARD_CARDS, DEFAULT_TOP_MOVERS};
use marketlab_core::{
    Dashboard, ExchangeRateTable, GeneratorConfig, InstrumentQuery, MarketError, SnapshotStore,
};

#[derive(Parser)]
#[command(
    name = "marketlab",
    about = "MarketLab CLI — synthetic market data for equities and exchange rates"
)]
struct Cli {
    /// Path to a TOML generator config. Defaults to the built-in universe.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Master seed; overrides the config file.
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List instruments.
    Stocks {
        /// BMV or BNY.
        #[arg(long)]
        market: Option<Market>,

        /// up, down or all.
        #[arg(long, default_value_t = Trend::All)]
        trend: Trend,

        /// Case-insensitive text matched against symbol or name.
        #[arg(long)]
        search: Option<String>,

        /// Maximum number of rows.
        #[arg(long)]
        limit: Option<usize>,

        /// Only carry this range's series (1D, 1W, 1M).
        #[arg(long)]
        range: Option<RangeKind>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show one instrument.
    Stock {
        symbol: String,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Exchange rates for one quoting convention.
    Rates {
        /// spot, fix, cash or crypto.
        #[arg(long, default_value_t = QuoteKind::Spot)]
        kind: QuoteKind,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List markets.
    Markets,
    /// Advancing, declining and unchanged counts.
    Breadth {
        #[arg(long)]
        market: Market,
    },
    /// Best performers by change percent.
    Movers {
        #[arg(long)]
        market: Market,

        #[arg(long, default_value_t = DEFAULT_TOP_MOVERS)]
        count: usize,
    },
    /// Instrument and exchange-rate cards.
    Dashboard {
        #[arg(long, default_value_t = Market::Bmv)]
        market: Market,

        #[arg(long, default_value_t = Trend::All)]
        trend: Trend,

        #[arg(long, default_value_t = QuoteKind::Spot)]
        kind: QuoteKind,

        #[arg(long, default_value_t = DEFAULT_DASHBOARD_CARDS)]
        count: usize,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write the full snapshot as JSON.
    Dump {
        /// Output file. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the effective universe as TOML.
    Universe,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.seed)?;

    match cli.command {
        Commands::Universe => {
            print!("{}", config.universe.to_toml()?);
        }
        Commands::Stocks {
            market,
            trend,
            search,
            limit,
            range,
            json,
        } => {
            let request = InstrumentQuery {
                market,
                trend,
                search_text: search,
                limit,
                range,
            };
            let rows = open_store(&config)?.query().list_instruments(&request)?;
            if json {
                println!("{}", to_string_pretty(&rows)?);
            } else {
                print_instrument_table(&rows);
            }
        }
        Commands::Stock { symbol, json } => {
            let query = open_store(&config)?.query();
            match query.get_instrument(&symbol) {
                Ok(inst) if json => println!("{}", to_string_pretty(inst)?),
                Ok(inst) => print_instrument(inst),
                Err(err @ MarketError::NotFound { .. }) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Commands::Rates { kind, json } => {
            let table = open_store(&config)?.query().list_exchange_rates(kind)?;
            if json {
                println!("{}", to_string_pretty(&table)?);
            } else {
                print_rate_table(&table);
            }
        }
        Commands::Markets => {
            for market in open_store(&config)?.query().list_markets() {
                println!("{market}");
            }
        }
        Commands::Breadth { market } => {
            let b = open_store(&config)?.query().market_breadth(market);
            println!("Market:    {}", b.market);
            println!("Advancing: {}", b.advancing);
            println!("Declining: {}", b.declining);
            println!("Unchanged: {}", b.unchanged);
            println!("Total:     {}", b.total);
        }
        Commands::Movers { market, count } => {
            let query = open_store(&config)?.query();
            let movers = query.top_movers(market, count);
            println!("{:<10} {:>12} {:>9}", "Symbol", "Last", "Change");
            println!("{}", "-".repeat(33));
            for inst in movers {
                println!(
                    "{:<10} {:>12.2} {:>8.2}%",
                    inst.symbol, inst.last_value, inst.change_percent
                );
            }
        }
        Commands::Dashboard {
            market,
            trend,
            kind,
            count,
            json,
        } => {
            let dash = open_store(&config)?.query().dashboard(market, trend, kind, count)?;
            if json {
                println!("{}", to_string_pretty(&dash)?);
            } else {
                print_dashboard(&dash);
            }
        }
        Commands::Dump { output } => {
            let snapshot = open_store(&config)?.current();
            let body = to_string_pretty(snapshot.as_ref())?;
            match output {
                Some(path) => {
                    std::fs::write(&path, body)
                        .with_context(|| format!("write {}", path.display()))?;
                    println!("Snapshot written to: {}", path.display());
                }
                None => println!("{body}"),
            }
        }
    }

    Ok(())
}

fn open_store(config: &GeneratorConfig) -> Result<SnapshotStore> {
    let store = SnapshotStore::from_config(config).context("build market snapshot")?;
    let snapshot = store.current();
    info!(seed = snapshot.seed, generation = snapshot.generation, "snapshot ready");
    Ok(store)
}

fn load_config(path: Option<&std::path::Path>, seed: Option<u64>) -> Result<GeneratorConfig> {
    let mut config = match path {
        Some(p) => GeneratorConfig::from_file(p)?,
        None => GeneratorConfig::default(),
    };
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}

fn print_instrument_table(rows: &[InstrumentSummary]) {
    if rows.is_empty() {
        println!("No instruments match.");
        return;
    }
    println!(
        "{:<10} {:<22} {:<6} {:>12} {:>9}",
        "Symbol", "Name", "Market", "Last", "Change"
    );
    println!("{}", "-".repeat(63));
    for r in rows {
        println!(
            "{:<10} {:<22} {:<6} {:>12.2} {:>8.2}%",
            r.symbol,
            truncate(&r.display_name, 22),
            r.market,
            r.last_value,
            r.change_percent
        );
    }
}

fn print_instrument(inst: &Instrument) {
    println!();
    println!("=== {} ({}) ===", inst.symbol, inst.market);
    println!("Name:       {}", inst.display_name);
    println!("Last:       {:.2}", inst.last_value);
    println!("Change:     {:.2}%", inst.change_percent);
    println!("Open:       {:.2}", inst.stats.open);
    println!("Day High:   {:.2}", inst.stats.day_high);
    println!("Day Low:    {:.2}", inst.stats.day_low);
    println!("Volatility: {:.2}%", inst.stats.volatility);
    for range in RangeKind::ALL {
        let values: Vec<String> = inst
            .series_for(range)
            .iter()
            .map(|p| format!("{:.2}", p.value))
            .collect();
        println!("{range}: {}", values.join(" "));
    }
    println!();
}

fn print_rate_table(table: &ExchangeRateTable) {
    println!("Exchange rates ({})", table.kind);
    println!("{:<6} {:>10} {:>9} {:>14}", "Code", "Rate", "Var", "Volume");
    println!("{}", "-".repeat(42));
    for r in &table.rates {
        println!(
            "{:<6} {:>10.4} {:>8.2}% {:>14}",
            r.currency_code, r.rate, r.variation_percent, r.volume
        );
    }
}

fn print_dashboard(dash: &Dashboard) {
    println!("{} instruments", dash.market);
    for card in &dash.instruments {
        println!("  {:<10} {:>12.2} {:>8.2}%", card.label(), card.price(), card.change_percent());
    }
    println!("Exchange rates ({})", dash.kind);
    for card in &dash.exchange_rates {
        println!("  {:<10} {:>12.4} {:>8.2}%", card.label(), card.price(), card.change_percent());
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
