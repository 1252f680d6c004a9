//! Option Payoff Functions
//!
//! A closed set of payoff variants dispatched through a single evaluation
//! function. Payoffs are pure: read-only capture of the strike, no error
//! conditions, safe to call concurrently from any number of worker threads.

/// Enumeration of supported option payoff types
#[derive(Clone, Copy, Debug)]
pub enum Payoff {
    /// European call option: max(S_T - K, 0)
    Call { k: f64 },

    /// European put option: max(K - S_T, 0)
    Put { k: f64 },
}

impl Payoff {
    /// Calculate the payoff for a terminal spot price
    ///
    /// # Returns
    /// Non-negative payoff value (options cannot have negative intrinsic value)
    pub fn evaluate(&self, terminal_spot: f64) -> f64 {
        match self {
            Payoff::Call { k } => (terminal_spot - k).max(0.0),
            Payoff::Put { k } => (k - terminal_spot).max(0.0),
        }
    }
}
