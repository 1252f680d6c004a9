//! Round-Based Monte Carlo Orchestration
//!
//! The engine drives rounds of simulation until a target path-pair count is
//! reached. Each round:
//!
//! 1. Reads the worker count the host makes available *this* round
//! 2. Shrinks it if fewer batches than workers remain
//! 3. Starts one fixed-size batch per active worker
//! 4. Joins the workers sequentially, establishing a full barrier before
//!    the next round
//! 5. Folds each joined batch into the running aggregate and appends its
//!    discounted batch price to the per-batch price series
//!
//! The live price estimate is recomputed after every round for monitoring;
//! finalization turns the batch price series into a sample standard
//! deviation around the final estimate.
//!
//! Workers execute with no shared mutable state: each owns its random stream
//! and reports its sums through `join`, and the model/contract parameters
//! are immutable copies.

use crate::error::{validation::*, HestonError, HestonResult};
use crate::mc::path::PathSimulator;
use crate::mc::payoffs::Payoff;
use crate::mc::worker::Worker;
use crate::model::{ContractParams, ModelParams};
use tracing::{debug, info, warn};

/// Fixed batch size, in path pairs, assigned to one worker for one round.
/// Also the floor to which a smaller requested simulation count is raised.
pub const WORKER_BATCH: usize = 10_000;

/// Complete configuration for one pricing run.
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    pub contract: ContractParams,
    pub model: ModelParams,
    pub payoff: Payoff,
    /// Requested number of path pairs for the whole run.
    pub simulations: usize,
    /// Discretization steps per path.
    pub steps: usize,
    /// Path pairs per worker per round.
    pub batch_size: usize,
    /// Worker pool size; defaults to the detected processor count.
    pub workers: Option<usize>,
    /// Base seed for the worker streams; entropy-seeded when `None`.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            contract: ContractParams::default(),
            model: ModelParams::default(),
            payoff: Payoff::Call { k: 100.0 },
            simulations: 60_000,
            steps: 300,
            batch_size: WORKER_BATCH,
            workers: None,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Validate the full configuration
    pub fn validate(&self) -> HestonResult<()> {
        self.contract.validate()?;
        self.model.validate()?;
        validate_simulations(self.simulations)?;
        validate_steps(self.steps)?;

        if self.batch_size == 0 {
            return Err(HestonError::InvalidConfiguration {
                field: "batch_size".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err(HestonError::InvalidConfiguration {
                    field: "workers".to_string(),
                    reason: "must be greater than 0".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Status returned by one invocation of [`PricingEngine::advance_round`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    /// A round of batches executed; more work may remain.
    Ran,
    /// The target was already met; no work was performed.
    TargetReached,
}

/// Final statistics of a completed run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// Discounted price estimate over all completed path pairs.
    pub price: f64,
    /// Standard deviation of the per-batch price estimates around `price`.
    pub std_dev: f64,
    /// Total path pairs completed.
    pub pairs_completed: usize,
    /// Rounds executed.
    pub rounds: usize,
}

/// Owns the worker pool and drives rounds until the simulation target is met.
pub struct PricingEngine {
    contract: ContractParams,
    steps: usize,
    batch_size: usize,
    target_pairs: usize,
    pool: Vec<Worker>,
    pairs_completed: usize,
    payoff_sum: f64,
    batch_prices: Vec<f64>,
    cycles: usize,
}

impl PricingEngine {
    /// Build the engine and its worker pool.
    ///
    /// A requested simulation count below one batch is raised to the batch
    /// floor with a diagnostic, matching the behavior documented for the
    /// configuration surface. The pool is sized to the detected processor
    /// count unless overridden.
    pub fn new(config: EngineConfig) -> HestonResult<Self> {
        config.validate()?;

        let mut target_pairs = config.simulations;
        if target_pairs < config.batch_size {
            warn!(
                requested = target_pairs,
                floor = config.batch_size,
                "requested simulation count below the batch floor; raising it"
            );
            target_pairs = config.batch_size;
        }

        let pool_size = config.workers.unwrap_or_else(num_cpus::get).max(1);
        let simulator = PathSimulator::new(config.contract, config.model, config.payoff);

        let pool = (0..pool_size)
            .map(|i| match config.seed {
                Some(seed) => Worker::with_seed(i, simulator, seed.wrapping_add(i as u64)),
                None => Worker::new(i, simulator),
            })
            .collect();

        info!(
            workers = pool_size,
            target_pairs,
            steps = config.steps,
            "pricing engine ready"
        );

        Ok(PricingEngine {
            contract: config.contract,
            steps: config.steps,
            batch_size: config.batch_size,
            target_pairs,
            pool,
            pairs_completed: 0,
            payoff_sum: 0.0,
            batch_prices: Vec::with_capacity(target_pairs / config.batch_size),
            cycles: 0,
        })
    }

    /// Execute one round of batches, or report that the target is reached.
    ///
    /// `available_workers` is read fresh every round so the host can grow or
    /// shrink the active set between rounds. The last round shrinks the
    /// number of workers assigned, never the batch size, and at least one
    /// worker runs whenever work remains.
    ///
    /// Joins are sequential; the call returns only after every worker of the
    /// round has finished, so rounds are strictly ordered.
    pub fn advance_round(&mut self, available_workers: usize) -> HestonResult<RoundOutcome> {
        if self.pairs_completed >= self.target_pairs {
            return Ok(RoundOutcome::TargetReached);
        }

        let remaining = self.target_pairs - self.pairs_completed;
        let mut active = available_workers.min(self.pool.len()).max(1);
        if active * self.batch_size > remaining {
            active = (remaining / self.batch_size).max(1);
        }

        for worker in &mut self.pool[..active] {
            worker.start(self.batch_size, self.steps)?;
        }

        let discount = self.contract.discount();
        for worker in &mut self.pool[..active] {
            worker.join()?;

            self.pairs_completed += worker.pairs_completed();
            self.payoff_sum += worker.payoff_sum();

            // One discounted price estimate per completed batch; the ×2
            // accounts for the antithetic twin in every pair.
            let batch_price =
                worker.payoff_sum() / (self.batch_size as f64 * 2.0) * discount;
            self.batch_prices.push(batch_price);

            debug!(
                worker = worker.index(),
                price = batch_price,
                "worker batch complete"
            );
        }

        self.cycles += 1;
        debug!(
            cycle = self.cycles,
            pairs = self.pairs_completed,
            estimate = self.price_estimate(),
            "round complete"
        );

        Ok(RoundOutcome::Ran)
    }

    /// Live discounted price estimate over everything completed so far.
    ///
    /// Recomputed from the running aggregate after every round; `0.0` before
    /// any round has run.
    pub fn price_estimate(&self) -> f64 {
        if self.pairs_completed == 0 {
            return 0.0;
        }
        self.payoff_sum / (self.pairs_completed as f64 * 2.0) * self.contract.discount()
    }

    /// Rounds executed so far.
    pub fn cycles(&self) -> usize {
        self.cycles
    }

    /// Path pairs completed so far.
    pub fn pairs_completed(&self) -> usize {
        self.pairs_completed
    }

    /// Effective simulation target after floor clamping.
    pub fn target_pairs(&self) -> usize {
        self.target_pairs
    }

    /// Worker pool size.
    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    /// Consume the engine, releasing the workers, and compute the final
    /// statistics.
    ///
    /// The standard deviation is the population (not Bessel-corrected)
    /// deviation of the per-batch prices around the final estimate, and is
    /// `0.0` when a single batch ran — or when none did.
    pub fn finalize(self) -> HestonResult<RunSummary> {
        let price = self.price_estimate();
        if !price.is_finite() {
            return Err(HestonError::NumericalInstability {
                method: "finalization".to_string(),
                reason: format!("price estimate is not finite: {}", price),
            });
        }

        let n = self.batch_prices.len();
        let std_dev = if n == 0 {
            0.0
        } else {
            (self
                .batch_prices
                .iter()
                .map(|p| (p - price) * (p - price))
                .sum::<f64>()
                / n as f64)
                .sqrt()
        };

        info!(
            price,
            std_dev,
            pairs = self.pairs_completed,
            rounds = self.cycles,
            "run finalized"
        );

        Ok(RunSummary {
            price,
            std_dev,
            pairs_completed: self.pairs_completed,
            rounds: self.cycles,
        })
    }

    /// Drive rounds with the whole pool until the target is met, then
    /// finalize.
    pub fn run(mut self) -> HestonResult<RunSummary> {
        loop {
            let available = self.pool.len();
            match self.advance_round(available)? {
                RoundOutcome::Ran => {}
                RoundOutcome::TargetReached => break,
            }
        }
        self.finalize()
    }
}
