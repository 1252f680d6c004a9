// src/error.rs
use std::fmt;

/// Custom error types for the heston-mc library
#[derive(Debug, Clone)]
pub enum HestonError {
    /// Invalid parameter values
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Invalid engine configuration
    InvalidConfiguration { field: String, reason: String },

    /// Worker thread could not be spawned; fatal for the whole run
    WorkerSpawn { worker: usize, reason: String },

    /// Worker thread panicked before delivering its batch
    WorkerPanic { worker: usize },

    /// Numerical instability in the aggregated statistics
    NumericalInstability { method: String, reason: String },
}

impl fmt::Display for HestonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HestonError::InvalidParameters {
                parameter,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid parameter '{}' = {}: {}",
                    parameter, value, constraint
                )
            }
            HestonError::InvalidConfiguration { field, reason } => {
                write!(f, "Invalid configuration for '{}': {}", field, reason)
            }
            HestonError::WorkerSpawn { worker, reason } => {
                write!(f, "Failed to spawn thread for worker {}: {}", worker, reason)
            }
            HestonError::WorkerPanic { worker } => {
                write!(f, "Worker {} panicked during its batch", worker)
            }
            HestonError::NumericalInstability { method, reason } => {
                write!(f, "Numerical instability in {}: {}", method, reason)
            }
        }
    }
}

impl std::error::Error for HestonError {}

/// Result type alias for heston-mc operations
pub type HestonResult<T> = Result<T, HestonError>;

/// Validation utilities
pub mod validation {
    use super::{HestonError, HestonResult};

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> HestonResult<()> {
        if value <= 0.0 {
            Err(HestonError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> HestonResult<()> {
        if value < 0.0 {
            Err(HestonError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is within a range
    pub fn validate_range(name: &str, value: f64, min: f64, max: f64) -> HestonResult<()> {
        if value < min || value > max {
            Err(HestonError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: format!("must be in range [{}, {}]", min, max),
            })
        } else {
            Ok(())
        }
    }

    /// Validate correlation parameter
    pub fn validate_correlation(name: &str, rho: f64) -> HestonResult<()> {
        validate_range(name, rho, -1.0, 1.0)
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> HestonResult<()> {
        if !value.is_finite() {
            Err(HestonError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate discretization steps count
    pub fn validate_steps(steps: usize) -> HestonResult<()> {
        if steps == 0 {
            Err(HestonError::InvalidConfiguration {
                field: "steps".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if steps > 100_000 {
            Err(HestonError::InvalidConfiguration {
                field: "steps".to_string(),
                reason: "exceeds maximum allowed (100,000)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate requested simulation (path-pair) count
    pub fn validate_simulations(simulations: usize) -> HestonResult<()> {
        if simulations == 0 {
            Err(HestonError::InvalidConfiguration {
                field: "simulations".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if simulations > 1_000_000_000 {
            Err(HestonError::InvalidConfiguration {
                field: "simulations".to_string(),
                reason: "exceeds maximum allowed (1 billion)".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("kappa", 2.0).is_ok());
        assert!(validate_positive("kappa", 0.0).is_err());
        assert!(validate_positive("kappa", -0.1).is_err());
    }

    #[test]
    fn test_validate_correlation() {
        assert!(validate_correlation("rho", 0.5).is_ok());
        assert!(validate_correlation("rho", -0.8).is_ok());
        assert!(validate_correlation("rho", 1.0).is_ok());
        assert!(validate_correlation("rho", -1.0).is_ok());
        assert!(validate_correlation("rho", 1.1).is_err());
        assert!(validate_correlation("rho", -1.1).is_err());
    }

    #[test]
    fn test_validate_finite() {
        assert!(validate_finite("value", 1.0).is_ok());
        assert!(validate_finite("value", f64::NAN).is_err());
        assert!(validate_finite("value", f64::INFINITY).is_err());
        assert!(validate_finite("value", f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_validate_counts() {
        assert!(validate_steps(300).is_ok());
        assert!(validate_steps(0).is_err());
        assert!(validate_simulations(60_000).is_ok());
        assert!(validate_simulations(0).is_err());
    }

    #[test]
    fn test_error_display() {
        let error = HestonError::InvalidParameters {
            parameter: "xi".to_string(),
            value: -0.1,
            constraint: "must be non-negative".to_string(),
        };

        let display = format!("{}", error);
        assert!(display.contains("xi"));
        assert!(display.contains("-0.1"));
        assert!(display.contains("non-negative"));
    }

    #[test]
    fn test_worker_error_display() {
        let error = HestonError::WorkerSpawn {
            worker: 3,
            reason: "resource temporarily unavailable".to_string(),
        };

        let display = format!("{}", error);
        assert!(display.contains("worker 3"));
        assert!(display.contains("resource temporarily unavailable"));
    }
}
