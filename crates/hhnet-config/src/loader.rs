// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, DelayPolicy, IntegrationMethod, SimulationConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "hhnet.toml";

/// Find the hhnet configuration file
///
/// Search order:
/// 1. `HHNET_CONFIG_PATH` environment variable
/// 2. Current working directory: `./hhnet.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("HHNET_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        } else {
            return Err(ConfigError::FileNotFound(format!(
                "Config file specified by HHNET_CONFIG_PATH not found: {}",
                path.display()
            )));
        }
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd;
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent.to_path_buf();
                }
                None => break,
            }
        }
    }

    if let Some(found) = search_paths.iter().find(|p| p.exists()) {
        return Ok(found.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "hhnet configuration file '{}' not found in any of these locations:\n{}\n\nSet HHNET_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML.
/// Range checks are left to [`crate::validate_config`].
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SimulationConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: SimulationConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

fn parse_bool(value: &str) -> bool {
    let value = value.to_lowercase();
    value == "true" || value == "1" || value == "yes"
}

fn parse_delay_policy(value: &str) -> Option<DelayPolicy> {
    match value.trim().to_ascii_lowercase().as_str() {
        "strict" => Some(DelayPolicy::Strict),
        "drop_overflow" | "drop-overflow" => Some(DelayPolicy::DropOverflow),
        _ => None,
    }
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `HHNET_DMAX` -> `network.dmax`
/// - `HHNET_FIRING_THRESHOLD` -> `network.firing_threshold`
/// - `HHNET_DELAY_POLICY` -> `network.delay_policy`
/// - `HHNET_INTEGRATOR` -> `integration.method`
/// - `HHNET_INTEGRATION_STEP` -> `integration.step`
/// - `HHNET_PARALLEL_LAYERS` -> `engine.parallel_layers`
/// - `HHNET_RECORD_HISTORY` -> `engine.record_history`
/// - `HHNET_LOG_LEVEL` -> `logging.level`
///
/// Unparseable values are ignored.
pub fn apply_environment_overrides(config: &mut SimulationConfig) {
    if let Ok(value) = env::var("HHNET_DMAX") {
        if let Ok(dmax) = value.parse::<u32>() {
            config.network.dmax = dmax;
        }
    }
    if let Ok(value) = env::var("HHNET_FIRING_THRESHOLD") {
        if let Ok(threshold) = value.parse::<f64>() {
            config.network.firing_threshold = threshold;
        }
    }
    if let Ok(value) = env::var("HHNET_DELAY_POLICY") {
        if let Some(policy) = parse_delay_policy(&value) {
            config.network.delay_policy = policy;
        }
    }
    if let Ok(value) = env::var("HHNET_INTEGRATOR") {
        if let Some(method) = IntegrationMethod::parse(&value) {
            config.integration.method = method;
        }
    }
    if let Ok(value) = env::var("HHNET_INTEGRATION_STEP") {
        if let Ok(step) = value.parse::<f64>() {
            config.integration.step = step;
        }
    }
    if let Ok(value) = env::var("HHNET_PARALLEL_LAYERS") {
        config.engine.parallel_layers = parse_bool(&value);
    }
    if let Ok(value) = env::var("HHNET_RECORD_HISTORY") {
        config.engine.record_history = parse_bool(&value);
    }
    if let Ok(value) = env::var("HHNET_LOG_LEVEL") {
        config.logging.level = value;
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"dmax": "8", "integrator": "euler"}`)
pub fn apply_cli_overrides(config: &mut SimulationConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("dmax") {
        if let Ok(dmax) = value.parse::<u32>() {
            config.network.dmax = dmax;
        }
    }
    if let Some(value) = cli_args.get("firing_threshold") {
        if let Ok(threshold) = value.parse::<f64>() {
            config.network.firing_threshold = threshold;
        }
    }
    if let Some(value) = cli_args.get("delay_policy") {
        if let Some(policy) = parse_delay_policy(value) {
            config.network.delay_policy = policy;
        }
    }
    if let Some(value) = cli_args.get("integrator") {
        if let Some(method) = IntegrationMethod::parse(value) {
            config.integration.method = method;
        }
    }
    if let Some(value) = cli_args.get("integration_step") {
        if let Ok(step) = value.parse::<f64>() {
            config.integration.step = step;
        }
    }
    if let Some(value) = cli_args.get("parallel_layers") {
        config.engine.parallel_layers = parse_bool(value);
    }
    if let Some(value) = cli_args.get("record_history") {
        config.engine.record_history = parse_bool(value);
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const OVERRIDE_VARS: &[&str] = &[
        "HHNET_DMAX",
        "HHNET_FIRING_THRESHOLD",
        "HHNET_DELAY_POLICY",
        "HHNET_INTEGRATOR",
        "HHNET_INTEGRATION_STEP",
        "HHNET_PARALLEL_LAYERS",
        "HHNET_RECORD_HISTORY",
        "HHNET_LOG_LEVEL",
    ];

    fn clear_override_vars() {
        for var in OVERRIDE_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom_config.toml");
        File::create(&config_path).unwrap();

        env::set_var("HHNET_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("HHNET_CONFIG_PATH");

        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_missing_env_path_is_an_error() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        env::set_var("HHNET_CONFIG_PATH", dir.path().join("absent.toml"));
        let result = find_config_file();
        env::remove_var("HHNET_CONFIG_PATH");

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_partial_config_keeps_defaults() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_override_vars();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("hhnet.toml");

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[network]").unwrap();
        writeln!(file, "dmax = 8").unwrap();
        writeln!(file, "delay_policy = \"drop_overflow\"").unwrap();
        writeln!(file, "[integration]").unwrap();
        writeln!(file, "method = \"euler\"").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert_eq!(config.network.dmax, 8);
        assert_eq!(config.network.delay_policy, DelayPolicy::DropOverflow);
        assert_eq!(config.network.firing_threshold, 50.0);
        assert_eq!(config.integration.method, IntegrationMethod::Euler);
        assert_eq!(config.integration.step, 0.02);
        assert!(config.engine.record_history);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("hhnet.toml");
        fs::write(&config_path, "[network\ndmax = ").unwrap();

        let result = load_config(Some(&config_path), None);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = SimulationConfig::default();

        env::set_var("HHNET_DMAX", "12");
        env::set_var("HHNET_INTEGRATOR", "euler");
        env::set_var("HHNET_INTEGRATION_STEP", "0.01");
        env::set_var("HHNET_PARALLEL_LAYERS", "yes");
        env::set_var("HHNET_DELAY_POLICY", "not-a-policy");

        apply_environment_overrides(&mut config);
        clear_override_vars();

        assert_eq!(config.network.dmax, 12);
        assert_eq!(config.integration.method, IntegrationMethod::Euler);
        assert_eq!(config.integration.step, 0.01);
        assert!(config.engine.parallel_layers);
        assert_eq!(config.network.delay_policy, DelayPolicy::Strict);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = SimulationConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("dmax".to_string(), "3".to_string());
        cli_args.insert("record_history".to_string(), "false".to_string());
        cli_args.insert("firing_threshold".to_string(), "not-a-number".to_string());

        apply_cli_overrides(&mut config, &cli_args);

        assert_eq!(config.network.dmax, 3);
        assert!(!config.engine.record_history);
        assert_eq!(config.network.firing_threshold, 50.0);
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_override_vars();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("hhnet.toml");

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[network]").unwrap();
        writeln!(file, "dmax = 4").unwrap();
        writeln!(file, "firing_threshold = 40.0").unwrap();

        env::set_var("HHNET_DMAX", "6");
        env::set_var("HHNET_FIRING_THRESHOLD", "45.0");

        let mut cli_args = HashMap::new();
        cli_args.insert("dmax".to_string(), "7".to_string());

        let config = load_config(Some(&config_path), Some(&cli_args)).unwrap();
        clear_override_vars();

        // CLI wins for dmax, env wins for threshold (no CLI override)
        assert_eq!(config.network.dmax, 7);
        assert_eq!(config.network.firing_threshold, 45.0);
    }
}
