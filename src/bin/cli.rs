//! MC Options CLI
//!
//! Command-line interface for Monte Carlo option pricing.
//!
//! # Commands
//!
//! - `mc_options price` - Price one option and summarize the simulation
//! - `mc_options convergence` - Estimates over increasing sample counts
//! - `mc_options sensitivity` - Volatility and strike sweeps
//! - `mc_options validate --market-data quotes.csv` - Compare with market prices

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mc_options::prelude::*;
use mc_options::report::{self, Histogram};

/// Monte Carlo European option pricer
#[derive(Parser)]
#[command(name = "mc_options")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON run configuration; flags override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Random seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Draw a fresh seed from OS entropy instead
    #[arg(long, global = true, conflicts_with = "seed")]
    unseeded: bool,

    /// Generate samples in parallel chunks (applies to every command)
    #[arg(long, global = true)]
    parallel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct MarketArgs {
    /// Underlying ticker
    #[arg(short, long)]
    symbol: Option<String>,

    /// Spot price (skips fetching when given with --vol)
    #[arg(long)]
    spot: Option<f64>,

    /// Annualized volatility (skips fetching when given with --spot)
    #[arg(long)]
    vol: Option<f64>,

    /// Strike price (default: spot rounded to the nearest unit)
    #[arg(short = 'k', long)]
    strike: Option<f64>,

    /// Time to maturity in years
    #[arg(short = 't', long)]
    maturity: Option<f64>,

    /// Annualized risk-free rate
    #[arg(short, long, allow_hyphen_values = true)]
    rate: Option<f64>,

    /// Option type: call or put
    #[arg(long)]
    kind: Option<String>,

    /// History range for the volatility estimate (e.g. 6mo, 1y, 2y)
    #[arg(long)]
    range: Option<String>,

    /// Fetch directly instead of going through the local cache
    #[arg(long)]
    no_cache: bool,

    /// Cache directory
    #[arg(long, default_value = "./data/cache")]
    cache_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Price one option and summarize the simulated distribution
    Price {
        #[command(flatten)]
        market: MarketArgs,

        /// Number of Monte Carlo simulations
        #[arg(short = 'n', long)]
        sims: Option<usize>,

        /// Print histograms of terminal prices and payoffs
        #[arg(long)]
        histogram: bool,

        /// Also price the opposite kind on the same paths and check parity
        #[arg(long)]
        parity: bool,
    },

    /// Price at increasing sample counts
    Convergence {
        #[command(flatten)]
        market: MarketArgs,

        /// Comma-separated sample sizes
        #[arg(long, value_delimiter = ',')]
        sizes: Option<Vec<usize>>,
    },

    /// Price across volatilities and strikes
    Sensitivity {
        #[command(flatten)]
        market: MarketArgs,

        /// Comma-separated volatilities
        #[arg(long, value_delimiter = ',', default_value = "0.10,0.15,0.20,0.25,0.30,0.35,0.40")]
        vols: Vec<f64>,

        /// Comma-separated strikes (default: spot ± 15 in steps of 5)
        #[arg(long, value_delimiter = ',')]
        strikes: Option<Vec<f64>>,

        /// Simulations per point
        #[arg(short = 'n', long, default_value = "10000")]
        sims: usize,
    },

    /// Compare Monte Carlo prices with market quotes from CSV
    Validate {
        #[command(flatten)]
        market: MarketArgs,

        /// CSV with Strike,Market_Price columns
        #[arg(short, long)]
        market_data: PathBuf,

        /// Where to write the comparison table
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Simulations per strike
        #[arg(short = 'n', long)]
        sims: Option<usize>,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli) {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> PricingResult<()> {
    let mut config = match &cli.config {
        Some(path) => RunConfig::from_json_file(path)?,
        None => RunConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.engine.seed = Some(seed);
    }
    if cli.unseeded {
        config.engine.seed = None;
    }
    if cli.parallel {
        config.engine.parallel = true;
    }

    match cli.command {
        Commands::Price {
            market,
            sims,
            histogram,
            parity,
        } => {
            if let Some(n) = sims {
                config.num_sims = n;
            }
            let params = resolve(&mut config, &market)?;
            run_price(&config, &params, histogram, parity)
        }
        Commands::Convergence { market, sizes } => {
            if let Some(sizes) = sizes {
                config.sample_sizes = sizes;
            }
            let params = resolve(&mut config, &market)?;
            run_convergence(&config, &params)
        }
        Commands::Sensitivity {
            market,
            vols,
            strikes,
            sims,
        } => {
            let params = resolve(&mut config, &market)?;
            run_sensitivity(&config, &params, &vols, strikes, sims)
        }
        Commands::Validate {
            market,
            market_data,
            output,
            sims,
        } => {
            if let Some(n) = sims {
                config.num_sims = n;
            }
            let params = resolve(&mut config, &market)?;
            run_validate(&config, &params, &market_data, output)
        }
    }
}

/// Apply flag overrides and fetch market parameters
fn resolve(config: &mut RunConfig, args: &MarketArgs) -> PricingResult<PricingParameters> {
    if let Some(symbol) = &args.symbol {
        config.symbol = symbol.to_ascii_uppercase();
    }
    if let Some(k) = args.strike {
        config.strike = Some(k);
    }
    if let Some(t) = args.maturity {
        config.maturity = t;
    }
    if let Some(r) = args.rate {
        config.rate = r;
    }
    if let Some(kind) = &args.kind {
        config.option_type = kind.parse()?;
    }
    if let Some(range) = &args.range {
        config.history_range = range.clone();
    }
    config.validate()?;

    let market = match (args.spot, args.vol) {
        (Some(spot), Some(vol)) => {
            StaticMarketData::new()
                .with(&config.symbol, spot, vol)?
                .market_parameters(&config.symbol)?
        }
        (spot, vol) => {
            let mut fetched = fetch_market(config, args)?;
            if let Some(spot) = spot {
                fetched.spot_price = spot;
            }
            if let Some(vol) = vol {
                fetched.annualized_volatility = vol;
            }
            fetched
        }
    };

    info!(
        "{}: spot ${:.2}, historical volatility {:.3}",
        market.symbol, market.spot_price, market.annualized_volatility
    );

    market.pricing_parameters(
        config.strike_for_spot(market.spot_price),
        config.maturity,
        config.rate,
        config.option_type,
    )
}

fn fetch_market(config: &RunConfig, args: &MarketArgs) -> PricingResult<MarketParameters> {
    if args.no_cache {
        YahooClient::new()?
            .with_range(config.history_range.clone())
            .market_parameters(&config.symbol)
    } else {
        let cache = CacheConfig {
            cache_dir: args.cache_dir.clone(),
            ..Default::default()
        };
        CachedProvider::new(cache)?
            .with_range(config.history_range.clone())
            .market_parameters(&config.symbol)
    }
}

fn print_parameters(config: &RunConfig, params: &PricingParameters) {
    println!("Parameters:");
    println!("  Stock:                {}", config.symbol);
    println!("  Current Price (S0):   ${:.2}", params.spot);
    println!("  Strike Price (K):     ${:.2}", params.strike);
    println!(
        "  Time to Maturity (T): {} years ({:.0} months)",
        params.maturity,
        params.maturity * 12.0
    );
    println!("  Risk-free Rate (r):   {:.3} ({:.1}%)", params.rate, params.rate * 100.0);
    println!(
        "  Volatility (σ):       {:.3} ({:.1}%)",
        params.volatility,
        params.volatility * 100.0
    );
    match config.engine.seed {
        Some(seed) => println!("  Seed:                 {}", seed),
        None => println!("  Seed:                 (entropy)"),
    }
    println!();
}

fn run_price(
    config: &RunConfig,
    params: &PricingParameters,
    histogram: bool,
    parity: bool,
) -> PricingResult<()> {
    print_parameters(config, params);
    let engine = MonteCarloEngine::new(config.engine.clone())?;

    let run = engine.price(params, config.num_sims)?;
    let summary = run.summary()?;
    print!("{}", report::render_run(&run, &summary));
    println!(
        "  Black-Scholes:        ${:.4}",
        bs_price_params(params)
    );

    if parity {
        let other = match params.option_type {
            OptionType::Call => OptionType::Put,
            OptionType::Put => OptionType::Call,
        };
        let other_run = run.reprice_as(other)?;
        let (call, put) = match params.option_type {
            OptionType::Call => (run.price(), other_run.price()),
            OptionType::Put => (other_run.price(), run.price()),
        };
        println!("\nPut-Call Parity Check:");
        println!("  C - P             = {:.4}", call - put);
        println!("  S0 - K*e^(-rT)    = {:.4}", params.parity_value());
        println!("  Difference:         {:.6}", (call - put - params.parity_value()).abs());
    }

    if histogram {
        if let Some(h) = Histogram::from_values(&run.terminal_prices, 25) {
            println!("\nDistribution of Simulated Final Prices:");
            print!("{}", h.render(50));
        }
        if let Some(h) = Histogram::from_values(&run.payoffs, 25) {
            println!("\nDistribution of Option Payoffs (strike ${:.2}):", params.strike);
            print!("{}", h.render(50));
        }
    }

    Ok(())
}

fn run_convergence(config: &RunConfig, params: &PricingParameters) -> PricingResult<()> {
    print_parameters(config, params);
    let engine = MonteCarloEngine::new(config.engine.clone())?;

    let trace = engine.convergence(params, &config.sample_sizes)?;
    let exact = bs_price_params(params);

    println!("Convergence Analysis (Black-Scholes ${:.4}):", exact);
    print!("{}", report::render_convergence(&trace, Some(exact)));
    Ok(())
}

fn run_sensitivity(
    config: &RunConfig,
    params: &PricingParameters,
    vols: &[f64],
    strikes: Option<Vec<f64>>,
    sims: usize,
) -> PricingResult<()> {
    print_parameters(config, params);
    let engine = MonteCarloEngine::new(config.engine.clone())?;

    println!("Volatility Sensitivity:");
    let vol_sweep = engine.volatility_sweep(params, vols, sims)?;
    print!("{}", report::render_sweep(&vol_sweep));

    let strikes = strikes.unwrap_or_else(|| {
        let atm = params.strike.round();
        (-3..=3).map(|i| atm + 5.0 * i as f64).collect()
    });

    println!("\nStrike Sensitivity:");
    let strike_sweep = engine.strike_sweep(params, &strikes, sims)?;
    print!("{}", report::render_sweep(&strike_sweep));
    Ok(())
}

fn run_validate(
    config: &RunConfig,
    params: &PricingParameters,
    market_data: &Path,
    output: Option<PathBuf>,
) -> PricingResult<()> {
    print_parameters(config, params);
    let quotes = read_market_quotes_file(market_data)?;
    info!("Loaded {} market quotes from {:?}", quotes.len(), market_data);

    let engine = MonteCarloEngine::new(config.engine.clone())?;
    let report = engine.validate_against_market(params, &quotes, config.num_sims)?;

    println!(
        "{:>10} | {:>12} | {:>10} | {:>10} | {:>8}",
        "Strike", "Market", "MC", "BS", "Error %"
    );
    println!("{}", "-".repeat(62));
    for row in &report.rows {
        println!(
            "{:>10.2} | {:>12.2} | {:>10.2} | {:>10.2} | {:>+8.1}",
            row.strike, row.market_price, row.mc_price, row.bs_price, row.error_percent
        );
    }
    println!();
    println!("Average Absolute Error: {:.1}%", report.mean_abs_error_pct);
    println!("Min Error: {:.1}%", report.min_error_pct);
    println!("Max Error: {:.1}%", report.max_error_pct);

    if let Some(path) = output {
        report.write_csv_file(&path)?;
        println!("Saved: {}", path.display());
    }
    Ok(())
}
