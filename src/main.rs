//! heston-mc CLI — price a European option under the Heston model.
//!
//! Runs the round-based Monte Carlo engine to completion, logging the live
//! price estimate after every round, then prints the final price with its
//! per-batch standard deviation.

use clap::Parser;
use heston_mc::math_utils::Timer;
use heston_mc::mc::engine::{EngineConfig, PricingEngine, RoundOutcome, WORKER_BATCH};
use heston_mc::mc::payoffs::Payoff;
use heston_mc::model::{ContractParams, ModelParams};
use heston_mc::HestonResult;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Heston Monte Carlo option pricer
#[derive(Parser, Debug)]
#[command(name = "heston-mc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of simulations (path pairs)
    #[arg(short = 'n', long = "sims", default_value_t = 60_000)]
    sims: usize,

    /// Discretization steps per path
    #[arg(short = 'd', long = "discr", default_value_t = 300)]
    discr: usize,

    /// Option spot price
    #[arg(long, default_value_t = 100.0)]
    spot: f64,

    /// Option strike price
    #[arg(long, default_value_t = 100.0)]
    strike: f64,

    /// Risk-free rate
    #[arg(long, default_value_t = 0.05)]
    risk: f64,

    /// Maturity time in years
    #[arg(long, default_value_t = 5.0)]
    time: f64,

    /// Initial variance V0
    #[arg(long, default_value_t = 0.09)]
    vol: f64,

    /// Correlation coefficient between the spot and variance drivers
    #[arg(long, default_value_t = -0.30)]
    rho: f64,

    /// Mean reversion rate
    #[arg(long, default_value_t = 2.0)]
    kappa: f64,

    /// Long-term variance
    #[arg(long, default_value_t = 0.09)]
    theta: f64,

    /// Volatility of volatility
    #[arg(long, default_value_t = 1.0)]
    xi: f64,

    /// Price a put instead of a call
    #[arg(long)]
    put: bool,

    /// Base seed for the worker random streams (entropy-seeded if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Worker pool size (detected processor count if omitted)
    #[arg(short = 'w', long)]
    workers: Option<usize>,

    /// Enable debug-level output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> HestonResult<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let contract = ContractParams {
        s0: cli.spot,
        k: cli.strike,
        r: cli.risk,
        t: cli.time,
    };
    let model = ModelParams {
        v0: cli.vol,
        rho: cli.rho,
        kappa: cli.kappa,
        theta: cli.theta,
        xi: cli.xi,
    };
    let payoff = if cli.put {
        Payoff::Put { k: cli.strike }
    } else {
        Payoff::Call { k: cli.strike }
    };

    info!("S0: {}", contract.s0);
    info!("K: {}", contract.k);
    info!("r: {}", contract.r);
    info!("T: {}", contract.t);
    info!("V0: {}", model.v0);
    info!("rho: {}", model.rho);
    info!("kappa: {}", model.kappa);
    info!("theta: {}", model.theta);
    info!("xi: {}", model.xi);
    info!("SIMULATIONS TO-DO: {}", cli.sims);
    info!("DISCRETIZATION: {}", cli.discr);

    let config = EngineConfig {
        contract,
        model,
        payoff,
        simulations: cli.sims,
        steps: cli.discr,
        batch_size: WORKER_BATCH,
        workers: cli.workers,
        seed: cli.seed,
    };

    let mut engine = PricingEngine::new(config)?;
    let available = engine.pool_size();

    let mut timer = Timer::new();
    timer.start();

    while engine.advance_round(available)? == RoundOutcome::Ran {
        info!(
            cycle = engine.cycles(),
            pairs = engine.pairs_completed(),
            "price updated: {:.6}",
            engine.price_estimate()
        );
    }

    let elapsed_ms = timer.elapsed_ms();
    let summary = engine.finalize()?;

    let pairs_per_sec = summary.pairs_completed as f64 / (elapsed_ms / 1000.0);
    info!("elapsed: {:.1} ms ({:.0} pairs/sec)", elapsed_ms, pairs_per_sec);

    println!(
        "price: {:.6}  std dev: {:.6}  ({} path pairs, {} rounds)",
        summary.price, summary.std_dev, summary.pairs_completed, summary.rounds
    );

    Ok(())
}
