// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Collects every problem in one pass so a bad file is fixed in one edit.

use crate::{ConfigError, ConfigResult, SimulationConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    OutOfRange { field: String, value: String, range: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { field, value, range } => {
                write!(f, "{} = {} is outside valid range {}", field, value, range)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - `network.dmax` >= 1
/// - finite `network.firing_threshold`
/// - `integration.step` in (0, 1] ms
/// - a known `logging.level`
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every violation
pub fn validate_config(config: &SimulationConfig) -> ConfigResult<()> {
    let errors = collect_errors(config);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

/// Every violation in `config`, in section order.
pub fn collect_errors(config: &SimulationConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    validate_network(config, &mut errors);
    validate_integration(config, &mut errors);
    validate_logging(config, &mut errors);
    errors
}

fn validate_network(config: &SimulationConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.network.dmax == 0 {
        errors.push(ConfigValidationError::OutOfRange {
            field: "network.dmax".to_string(),
            value: config.network.dmax.to_string(),
            range: "[1, 4294967295]".to_string(),
        });
    }
    if !config.network.firing_threshold.is_finite() {
        errors.push(ConfigValidationError::InvalidValue {
            field: "network.firing_threshold".to_string(),
            reason: "must be finite".to_string(),
        });
    }
}

fn validate_integration(config: &SimulationConfig, errors: &mut Vec<ConfigValidationError>) {
    let step = config.integration.step;
    if !step.is_finite() || step <= 0.0 || step > 1.0 {
        errors.push(ConfigValidationError::OutOfRange {
            field: "integration.step".to_string(),
            value: step.to_string(),
            range: "(0, 1] ms".to_string(),
        });
    }
}

fn validate_logging(config: &SimulationConfig, errors: &mut Vec<ConfigValidationError>) {
    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!("'{}' is not one of {}", config.logging.level, LOG_LEVELS.join(", ")),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dmax_rejected() {
        let mut config = SimulationConfig::default();
        config.network.dmax = 0;
        let errors = collect_errors(&config);
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], ConfigValidationError::OutOfRange { field, .. } if field == "network.dmax"));
    }

    #[test]
    fn test_step_bounds() {
        for bad in [0.0, -0.01, 1.5, f64::NAN, f64::INFINITY] {
            let mut config = SimulationConfig::default();
            config.integration.step = bad;
            assert!(validate_config(&config).is_err(), "step {} should be rejected", bad);
        }
        let mut config = SimulationConfig::default();
        config.integration.step = 1.0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_all_errors_reported_together() {
        let mut config = SimulationConfig::default();
        config.network.dmax = 0;
        config.network.firing_threshold = f64::NAN;
        config.integration.step = 0.0;
        config.logging.level = "loud".to_string();

        assert_eq!(collect_errors(&config).len(), 4);
        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("network.dmax"));
        assert!(message.contains("network.firing_threshold"));
        assert!(message.contains("integration.step"));
        assert!(message.contains("logging.level"));
    }

    #[test]
    fn test_log_level_case_insensitive() {
        let mut config = SimulationConfig::default();
        config.logging.level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
