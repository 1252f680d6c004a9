//! Antithetic Path Simulation under the Heston Model
//!
//! # Discretization
//!
//! One path advances from 0 to maturity T in `steps` equal increments
//! Δt = T / steps using a full-truncation Euler scheme:
//! ```text
//! V⁺     = max(V_n, 0)
//! V_{n+1} = V_n + κ(θ - V⁺)Δt + ξ√(V⁺Δt) Z_V
//! S_{n+1} = S_n · exp((r - V⁺/2)Δt + √(V⁺Δt) Z_corr)
//! ```
//! with the correlated spot innovation
//! ```text
//! Z_corr = ρ Z_V + Z_S √(1 - ρ²)
//! ```
//!
//! Truncation is applied to the variance before every square root, so the
//! diffusion terms stay defined even when the discretized variance process
//! goes negative (Feller violations).
//!
//! # Antithetic Pairing
//!
//! Each call simulates a path and its antithetic twin. The twin performs the
//! identical procedure with `Z_S → -Z_S`, `Z_V → -Z_V` derived from the same
//! underlying uniform draws, so the pair's innovations are perfectly
//! anti-correlated at every step. The returned value is the sum of both
//! terminal payoffs.

use crate::mc::payoffs::Payoff;
use crate::model::{ContractParams, ModelParams};
use crate::rng;
use rand::Rng;

/// Spot/variance state of a single path in flight.
#[derive(Clone, Copy, Debug)]
struct PathState {
    spot: f64,
    variance: f64,
}

/// Advances antithetic path pairs through time and evaluates the payoff.
///
/// Holds only read-only parameter copies; safe to share across workers.
#[derive(Clone, Copy, Debug)]
pub struct PathSimulator {
    contract: ContractParams,
    model: ModelParams,
    payoff: Payoff,
}

impl PathSimulator {
    pub fn new(contract: ContractParams, model: ModelParams, payoff: Payoff) -> Self {
        PathSimulator {
            contract,
            model,
            payoff,
        }
    }

    /// One full-truncation Euler step with the given innovations.
    fn step(&self, state: &mut PathState, dt: f64, z_s: f64, z_v: f64) {
        let v_plus = state.variance.max(0.0);
        let z_corr = self.model.rho * z_v + z_s * (1.0 - self.model.rho * self.model.rho).sqrt();
        let sqrt_v_dt = (v_plus * dt).sqrt();

        state.variance += self.model.kappa * dt * (self.model.theta - v_plus)
            + self.model.xi * sqrt_v_dt * z_v;
        state.spot *= ((self.contract.r - 0.5 * v_plus) * dt + sqrt_v_dt * z_corr).exp();
    }

    /// Evolve one path and its antithetic twin to maturity.
    ///
    /// Returns the pair of terminal spot prices `(path, antithetic)`.
    pub fn evolve_pair<R: Rng + ?Sized>(&self, steps: usize, rng: &mut R) -> (f64, f64) {
        let dt = self.contract.t / steps as f64;

        let mut path = PathState {
            spot: self.contract.s0,
            variance: self.model.v0,
        };
        let mut antithetic = path;

        for _ in 0..steps {
            let z_s = rng::normal_draw(rng);
            let z_v = rng::normal_draw(rng);

            self.step(&mut path, dt, z_s, z_v);
            self.step(&mut antithetic, dt, -z_s, -z_v);
        }

        (path.spot, antithetic.spot)
    }

    /// Simulate one path pair and return the payoff sum of the pair.
    pub fn simulate_pair<R: Rng + ?Sized>(&self, steps: usize, rng: &mut R) -> f64 {
        let (spot, antithetic_spot) = self.evolve_pair(steps, rng);
        self.payoff.evaluate(spot) + self.payoff.evaluate(antithetic_spot)
    }
}
