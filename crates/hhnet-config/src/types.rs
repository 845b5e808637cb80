// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Each struct maps to a section of `hhnet.toml`. Every field has a default,
//! so a file only needs to list what it changes.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub network: NetworkConfig,
    pub integration: IntegrationConfig,
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

/// What happens to a synapse whose delay is larger than `dmax`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayPolicy {
    /// Reject the edge at registration
    #[default]
    Strict,
    /// Accept the edge; those synapses never deliver
    DropOverflow,
}

/// Network-wide delivery and detection settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Maximum conduction delay in ticks
    pub dmax: u32,
    /// Membrane potential (mV above rest) at or above which a neuron fires
    pub firing_threshold: f64,
    pub delay_policy: DelayPolicy,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            dmax: 5,
            firing_threshold: 50.0,
            delay_policy: DelayPolicy::Strict,
        }
    }
}

/// Integration scheme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationMethod {
    Euler,
    #[default]
    Rk4,
}

impl IntegrationMethod {
    /// Parse the names accepted in files, env vars and CLI overrides.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "euler" => Some(IntegrationMethod::Euler),
            "rk4" | "runge_kutta4" | "runge-kutta4" => Some(IntegrationMethod::Rk4),
            _ => None,
        }
    }
}

/// Sub-step integration settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IntegrationConfig {
    pub method: IntegrationMethod,
    /// Sub-step size in ms; one tick runs `round(1 / step)` sub-steps
    pub step: f64,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            method: IntegrationMethod::Rk4,
            step: 0.02,
        }
    }
}

/// Tick engine settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Assemble and integrate layers on the rayon pool
    pub parallel_layers: bool,
    /// Keep the full append-only spike history for observation
    pub record_history: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel_layers: false,
            record_history: true,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
