//! # heston-mc: Multithreaded Heston Monte Carlo Option Pricing
//!
//! A Rust library for pricing European options under the Heston
//! stochastic-volatility model with Monte Carlo simulation.
//!
//! ## Key Features
//!
//! - **Antithetic variance reduction**: every simulated path runs with a
//!   sign-flipped twin driven by the same underlying uniform draws
//! - **Full-truncation Euler scheme**: robust to Feller-condition violations
//! - **Explicit worker pool**: one OS thread per worker per round, with a
//!   two-phase `start`/`join` protocol and a full barrier between rounds
//! - **Host-driven rounds**: the worker count is re-read every round, so an
//!   external resource manager can grow or shrink the active set mid-run
//!
//! ## Quick Start
//!
//! ```no_run
//! use heston_mc::mc::engine::{EngineConfig, PricingEngine};
//!
//! let config = EngineConfig {
//!     simulations: 60_000, // path pairs
//!     steps: 300,          // discretization steps per path
//!     ..Default::default()
//! };
//!
//! let summary = PricingEngine::new(config)
//!     .expect("valid configuration")
//!     .run()
//!     .expect("run to completion");
//! println!("Option price: {:.4} ± {:.4}", summary.price, summary.std_dev);
//! ```
//!
//! ## Mathematical Foundation
//!
//! The Heston model couples the asset price to a mean-reverting variance
//! process through correlated Brownian drivers. Paths are discretized with a
//! full-truncation Euler scheme, normals are drawn through a rational
//! inverse-CDF approximation, and the discounted payoff average over all
//! path pairs is the price estimate.

// Module declarations
pub mod analytics;
pub mod error;
pub mod math_utils;
pub mod mc;
pub mod model;
pub mod rng;

// Re-export commonly used types for convenience
pub use error::{HestonError, HestonResult};
