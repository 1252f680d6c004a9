//! Simulation Workers
//!
//! A `Worker` owns one random stream and executes one batch of independent
//! path pairs per round on its own OS thread. The lifecycle is a strict
//! two-phase protocol:
//!
//! - [`Worker::start`] resets the batch state and spawns the thread; it never
//!   blocks the caller.
//! - [`Worker::join`] blocks until the batch completes and is the only
//!   synchronization point.
//!
//! The batch results travel back through the thread's join handle, so the
//! accumulated sum is not observable until `join` returns; the read-before-
//! join race of a shared accumulator cannot be expressed.
//!
//! Workers are entropy-seeded by default so inter-worker streams are
//! independent; explicit seeding exists for replay-based regression tests.

use crate::error::{HestonError, HestonResult};
use crate::mc::path::PathSimulator;
use crate::rng;
use rand::rngs::StdRng;
use std::thread::{self, JoinHandle};

/// Results a batch thread hands back on completion.
///
/// The RNG rides along so the worker's stream continues across batches
/// instead of restarting.
struct BatchOutput {
    rng: StdRng,
    payoff_sum: f64,
    pairs_completed: usize,
}

pub struct Worker {
    index: usize,
    simulator: PathSimulator,
    rng: Option<StdRng>,
    handle: Option<JoinHandle<BatchOutput>>,
    payoff_sum: f64,
    pairs_completed: usize,
}

impl Worker {
    /// Create a worker with an independent, entropy-seeded random stream.
    pub fn new(index: usize, simulator: PathSimulator) -> Self {
        Self::with_rng(index, simulator, rng::entropy_rng())
    }

    /// Create a worker with an explicitly seeded stream, for reproducible runs.
    pub fn with_seed(index: usize, simulator: PathSimulator, seed: u64) -> Self {
        Self::with_rng(index, simulator, rng::seed_rng_from_u64(seed))
    }

    fn with_rng(index: usize, simulator: PathSimulator, rng: StdRng) -> Self {
        Worker {
            index,
            simulator,
            rng: Some(rng),
            handle: None,
            payoff_sum: 0.0,
            pairs_completed: 0,
        }
    }

    /// Start a batch of `pairs` antithetic path pairs asynchronously.
    ///
    /// Resets the batch state before spawning. Returns immediately; results
    /// become available only after [`Worker::join`].
    ///
    /// # Errors
    ///
    /// - [`HestonError::InvalidConfiguration`] if a batch is already in flight
    /// - [`HestonError::WorkerSpawn`] if the OS thread cannot be created;
    ///   fatal for the whole run
    pub fn start(&mut self, pairs: usize, steps: usize) -> HestonResult<()> {
        if self.handle.is_some() {
            return Err(HestonError::InvalidConfiguration {
                field: format!("worker {}", self.index),
                reason: "start called while a batch is in flight".to_string(),
            });
        }

        let mut rng = self.rng.take().ok_or_else(|| HestonError::InvalidConfiguration {
            field: format!("worker {}", self.index),
            reason: "random stream lost by a previously failed batch".to_string(),
        })?;

        self.payoff_sum = 0.0;
        self.pairs_completed = 0;

        let simulator = self.simulator;
        let handle = thread::Builder::new()
            .name(format!("heston-worker-{}", self.index))
            .spawn(move || {
                let mut payoff_sum = 0.0;
                let mut pairs_completed = 0;
                for _ in 0..pairs {
                    payoff_sum += simulator.simulate_pair(steps, &mut rng);
                    pairs_completed += 1;
                }
                BatchOutput {
                    rng,
                    payoff_sum,
                    pairs_completed,
                }
            })
            .map_err(|e| HestonError::WorkerSpawn {
                worker: self.index,
                reason: e.to_string(),
            })?;

        self.handle = Some(handle);
        Ok(())
    }

    /// Block until the in-flight batch completes.
    ///
    /// After this returns, [`Worker::payoff_sum`] and
    /// [`Worker::pairs_completed`] are stable for the batch. Joining a worker
    /// with no batch in flight is a no-op.
    pub fn join(&mut self) -> HestonResult<()> {
        let handle = match self.handle.take() {
            Some(handle) => handle,
            None => return Ok(()),
        };

        let output = handle.join().map_err(|_| HestonError::WorkerPanic {
            worker: self.index,
        })?;

        self.rng = Some(output.rng);
        self.payoff_sum = output.payoff_sum;
        self.pairs_completed = output.pairs_completed;
        Ok(())
    }

    /// Accumulated payoff sum of the last joined batch.
    pub fn payoff_sum(&self) -> f64 {
        self.payoff_sum
    }

    /// Path pairs completed in the last joined batch.
    pub fn pairs_completed(&self) -> usize {
        self.pairs_completed
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mc::payoffs::Payoff;
    use crate::model::{ContractParams, ModelParams};
    use crate::rng::seed_rng_from_u64;

    fn simulator() -> PathSimulator {
        PathSimulator::new(
            ContractParams::default(),
            ModelParams::default(),
            Payoff::Call { k: 100.0 },
        )
    }

    #[test]
    fn test_batch_matches_serial_simulation() {
        let sim = simulator();
        let mut worker = Worker::with_seed(0, sim, 42);

        worker.start(100, 20).expect("spawn");
        worker.join().expect("join");

        let mut rng = seed_rng_from_u64(42);
        let mut expected = 0.0;
        for _ in 0..100 {
            expected += sim.simulate_pair(20, &mut rng);
        }

        assert_eq!(worker.payoff_sum().to_bits(), expected.to_bits());
        assert_eq!(worker.pairs_completed(), 100);
    }

    #[test]
    fn test_state_resets_between_batches() {
        let mut worker = Worker::with_seed(1, simulator(), 7);

        worker.start(50, 10).expect("spawn");
        worker.join().expect("join");
        let first_sum = worker.payoff_sum();
        assert_eq!(worker.pairs_completed(), 50);

        worker.start(50, 10).expect("spawn");
        worker.join().expect("join");

        // Second batch reports its own counts, not a running total, and the
        // stream continues rather than replaying the first batch.
        assert_eq!(worker.pairs_completed(), 50);
        assert_ne!(worker.payoff_sum().to_bits(), first_sum.to_bits());
    }

    #[test]
    fn test_start_while_in_flight_is_rejected() {
        let mut worker = Worker::with_seed(2, simulator(), 3);

        worker.start(200, 50).expect("spawn");
        assert!(worker.start(1, 1).is_err());
        worker.join().expect("join");
    }

    #[test]
    fn test_join_without_start_is_noop() {
        let mut worker = Worker::with_seed(3, simulator(), 3);
        assert!(worker.join().is_ok());
        assert_eq!(worker.pairs_completed(), 0);
        assert_eq!(worker.payoff_sum(), 0.0);
    }
}
