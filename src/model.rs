// src/model.rs
//! Contract and Heston Model Parameters
//!
//! # Mathematical Framework
//!
//! The Heston model describes asset price evolution with stochastic volatility:
//! ```text
//! dS_t = r S_t dt + √V_t S_t dW_t^(1)
//! dV_t = κ(θ - V_t) dt + ξ√V_t dW_t^(2)
//! ```
//!
//! Where:
//! - S_t: Asset price
//! - V_t: Instantaneous variance (volatility squared)
//! - κ: Mean reversion speed for variance
//! - θ: Long-term variance level
//! - ξ: Volatility of variance (vol-of-vol)
//! - ρ: Correlation between dW_t^(1) and dW_t^(2)
//!
//! # Feller Condition
//!
//! For variance to remain strictly positive, the Feller condition must hold:
//! ```text
//! 2κθ > ξ²
//! ```
//!
//! When violated the discretized variance can hit zero; the full-truncation
//! scheme in `mc::path` handles that, so a violation is a warning, not an
//! error.
//!
//! Both parameter sets are immutable for the lifetime of a run and shared
//! read-only by every worker.

use crate::error::{validation::*, HestonError, HestonResult};
use tracing::warn;

/// Terms of the option contract being priced.
#[derive(Clone, Copy, Debug)]
pub struct ContractParams {
    pub s0: f64, // Spot price
    pub k: f64,  // Strike price
    pub r: f64,  // Risk-free rate
    pub t: f64,  // Maturity in years
}

impl ContractParams {
    pub fn validate(&self) -> HestonResult<()> {
        validate_positive("s0", self.s0)?;
        validate_positive("k", self.k)?;
        validate_finite("r", self.r)?;
        validate_positive("t", self.t)?;
        Ok(())
    }

    /// Discount factor e^(-rT) applied to every price estimate.
    pub fn discount(&self) -> f64 {
        (-self.r * self.t).exp()
    }
}

impl Default for ContractParams {
    fn default() -> Self {
        ContractParams {
            s0: 100.0,
            k: 100.0,
            r: 0.05,
            t: 5.0,
        }
    }
}

/// Heston stochastic-volatility parameters.
#[derive(Clone, Copy, Debug)]
pub struct ModelParams {
    pub v0: f64,    // Initial variance
    pub rho: f64,   // Correlation between stock and variance
    pub kappa: f64, // Mean reversion speed
    pub theta: f64, // Long-term variance
    pub xi: f64,    // Volatility of variance (vol-of-vol)
}

impl ModelParams {
    /// Validate model parameters and warn if the Feller condition fails.
    ///
    /// `xi = 0` is allowed: it degenerates the model to constant-variance
    /// dynamics, which the convergence tests rely on.
    pub fn validate(&self) -> HestonResult<()> {
        validate_non_negative("v0", self.v0)?;
        validate_correlation("rho", self.rho)?;
        validate_non_negative("kappa", self.kappa)?;
        validate_non_negative("theta", self.theta)?;
        validate_non_negative("xi", self.xi)?;

        // Sanity caps on numerically hostile parameterizations
        if self.kappa > 100.0 {
            return Err(HestonError::InvalidParameters {
                parameter: "kappa".to_string(),
                value: self.kappa,
                constraint: "extremely high mean reversion speed (>100) may cause numerical issues"
                    .to_string(),
            });
        }

        if self.xi > 5.0 {
            return Err(HestonError::InvalidParameters {
                parameter: "xi".to_string(),
                value: self.xi,
                constraint: "extremely high vol-of-vol (>5) may cause numerical issues".to_string(),
            });
        }

        if self.theta > 1.0 {
            return Err(HestonError::InvalidParameters {
                parameter: "theta".to_string(),
                value: self.theta,
                constraint: "long-term variance >1 (100% vol) is unrealistic".to_string(),
            });
        }

        let feller = 2.0 * self.kappa * self.theta;
        if feller <= self.xi * self.xi {
            warn!(
                feller = feller,
                xi_sq = self.xi * self.xi,
                "Feller condition violated (2κθ ≤ ξ²); variance may hit zero"
            );
        }

        Ok(())
    }
}

impl Default for ModelParams {
    fn default() -> Self {
        ModelParams {
            v0: 0.09,
            rho: -0.30,
            kappa: 2.0,
            theta: 0.09,
            xi: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_valid() {
        // The documented defaults violate Feller (2·2·0.09 = 0.36 ≤ 1.0) but
        // must still validate; the truncation scheme absorbs the violation.
        assert!(ContractParams::default().validate().is_ok());
        assert!(ModelParams::default().validate().is_ok());
    }

    #[test]
    fn test_degenerate_vol_of_vol_allowed() {
        let model = ModelParams {
            v0: 0.04,
            rho: 0.0,
            kappa: 2.0,
            theta: 0.04,
            xi: 0.0,
        };
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_invalid_contract_params() {
        let negative_spot = ContractParams {
            s0: -100.0,
            ..Default::default()
        };
        assert!(negative_spot.validate().is_err());

        let zero_maturity = ContractParams {
            t: 0.0,
            ..Default::default()
        };
        assert!(zero_maturity.validate().is_err());

        let nan_rate = ContractParams {
            r: f64::NAN,
            ..Default::default()
        };
        assert!(nan_rate.validate().is_err());
    }

    #[test]
    fn test_invalid_model_params() {
        let negative_xi = ModelParams {
            xi: -0.3,
            ..Default::default()
        };
        assert!(negative_xi.validate().is_err());

        let bad_rho = ModelParams {
            rho: 1.5,
            ..Default::default()
        };
        assert!(bad_rho.validate().is_err());

        let huge_kappa = ModelParams {
            kappa: 200.0,
            ..Default::default()
        };
        assert!(huge_kappa.validate().is_err());
    }

    #[test]
    fn test_discount_factor() {
        let contract = ContractParams {
            s0: 100.0,
            k: 100.0,
            r: 0.05,
            t: 1.0,
        };
        assert!((contract.discount() - (-0.05f64).exp()).abs() < 1e-15);
    }
}
