// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Runtime settings for a [`Network`](crate::Network).

use hhnet_config::{DelayPolicy, IntegrationMethod, SimulationConfig};
use hhnet_neural::{substeps_per_tick, Integrator};

use crate::error::{EngineError, Result};

/// Resolved engine settings. Built directly or from a loaded [`SimulationConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkSettings {
    /// Longest conduction delay, in ticks, that can be delivered
    pub dmax: u32,
    /// Initial firing threshold of every layer (mV above rest)
    pub firing_threshold: f64,
    pub integrator: Integrator,
    /// Requested sub-step in ms; the effective sub-step is `1 / round(1 / step)`
    pub integration_step: f64,
    pub delay_policy: DelayPolicy,
    /// Assemble and integrate layers on the rayon pool
    pub parallel_layers: bool,
    /// Keep the full per-layer spike history for observation
    pub record_history: bool,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            dmax: 5,
            firing_threshold: 50.0,
            integrator: Integrator::RungeKutta4,
            integration_step: 0.02,
            delay_policy: DelayPolicy::Strict,
            parallel_layers: false,
            record_history: true,
        }
    }
}

impl NetworkSettings {
    /// Defaults with the given delay horizon.
    pub fn with_dmax(dmax: u32) -> Self {
        Self {
            dmax,
            ..Self::default()
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            dmax: config.network.dmax,
            firing_threshold: config.network.firing_threshold,
            integrator: integrator_for(config.integration.method),
            integration_step: config.integration.step,
            delay_policy: config.network.delay_policy,
            parallel_layers: config.engine.parallel_layers,
            record_history: config.engine.record_history,
        }
    }

    /// Check the settings and return the number of sub-steps per tick.
    pub fn validate(&self) -> Result<usize> {
        if self.dmax == 0 {
            return Err(EngineError::InvalidSettings(
                "dmax must be at least 1 tick".to_string(),
            ));
        }
        if !self.firing_threshold.is_finite() {
            return Err(EngineError::InvalidSettings(format!(
                "firing threshold must be finite, got {}",
                self.firing_threshold
            )));
        }
        Ok(substeps_per_tick(self.integration_step)?)
    }
}

fn integrator_for(method: IntegrationMethod) -> Integrator {
    match method {
        IntegrationMethod::Euler => Integrator::Euler,
        IntegrationMethod::Rk4 => Integrator::RungeKutta4,
    }
}
