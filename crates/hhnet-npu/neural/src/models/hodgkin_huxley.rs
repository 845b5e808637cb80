// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Hodgkin-Huxley Neuron Model
//!
//! Classic squid-axon formulation with potentials measured relative to rest
//! (rest sits at `v = 0`).
//!
//! ## Model Dynamics
//!
//! ```text
//! State: x = [v, m, n, h]
//!
//! Gating rates (v in mV, rates in 1/ms):
//!     alpha_m = (2.5 - 0.1 v) / (exp(2.5 - 0.1 v) - 1)     beta_m = 4 exp(-v / 18)
//!     alpha_n = (0.1 - 0.01 v) / (exp(1 - 0.1 v) - 1)      beta_n = 0.125 exp(-v / 80)
//!     alpha_h = 0.07 exp(-v / 20)                          beta_h = 1 / (exp(3 - 0.1 v) + 1)
//!
//! Gates:
//!     dx/dt = alpha_x (1 - x) - beta_x x        for x in {m, n, h}
//!
//! Membrane:
//!     I_ion = gNa m^3 h (v - ENa) + gK n^4 (v - EK) + gL (v - EL)
//!     dv/dt = (I - I_ion) / C
//! ```
//!
//! `alpha_m` and `alpha_n` are `0/0` at `v = 25` and `v = 10`. Both are
//! written as `k * x / (exp(x) - 1)` and evaluated through [`rate_ratio`],
//! which returns the limit near `x = 0`.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayViewMut2};

use super::traits::NeuronModel;
use crate::types::{NeuralError, Result};

const MODEL_NAME: &str = "Hodgkin-Huxley";

/// Row of each state variable in a Hodgkin-Huxley state array.
pub const V: usize = 0;
pub const M: usize = 1;
pub const N: usize = 2;
pub const H: usize = 3;

/// Number of state variables (v, m, n, h).
pub const STATE_DIM: usize = 4;

/// Below this magnitude `x / (exp(x) - 1)` is replaced by its series.
const RATE_RATIO_EPS: f64 = 1e-6;

/// `x / (exp(x) - 1)`, continuous through `x = 0` where it equals 1.
#[inline]
pub fn rate_ratio(x: f64) -> f64 {
    if x.abs() < RATE_RATIO_EPS {
        1.0 - 0.5 * x
    } else {
        x / x.exp_m1()
    }
}

#[inline]
fn alpha_m(v: f64) -> f64 {
    rate_ratio(2.5 - 0.1 * v)
}

#[inline]
fn beta_m(v: f64) -> f64 {
    4.0 * (-v / 18.0).exp()
}

#[inline]
fn alpha_n(v: f64) -> f64 {
    0.1 * rate_ratio(1.0 - 0.1 * v)
}

#[inline]
fn beta_n(v: f64) -> f64 {
    0.125 * (-v / 80.0).exp()
}

#[inline]
fn alpha_h(v: f64) -> f64 {
    0.07 * (-v / 20.0).exp()
}

#[inline]
fn beta_h(v: f64) -> f64 {
    1.0 / ((3.0 - 0.1 * v).exp() + 1.0)
}

/// Steady-state gate values `(m, n, h)` at a clamped potential `v`.
pub fn steady_state(v: f64) -> (f64, f64, f64) {
    let (am, bm) = (alpha_m(v), beta_m(v));
    let (an, bn) = (alpha_n(v), beta_n(v));
    let (ah, bh) = (alpha_h(v), beta_h(v));
    (am / (am + bm), an / (an + bn), ah / (ah + bh))
}

/// Scalar constants shared by a whole population
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HodgkinHuxleyConstants {
    /// Sodium conductance per unit area (mS/cm²)
    pub g_na: f64,
    /// Potassium conductance per unit area (mS/cm²)
    pub g_k: f64,
    /// Leak conductance per unit area (mS/cm²)
    pub g_l: f64,
    /// Sodium reversal potential (mV, relative to rest)
    pub e_na: f64,
    /// Potassium reversal potential (mV, relative to rest)
    pub e_k: f64,
    /// Leak reversal potential (mV, relative to rest)
    pub e_l: f64,
    /// Membrane capacitance per unit area (µF/cm²)
    pub capacitance: f64,
}

impl Default for HodgkinHuxleyConstants {
    fn default() -> Self {
        Self {
            g_na: 120.0,
            g_k: 36.0,
            g_l: 0.3,
            e_na: 115.0,
            e_k: -12.0,
            e_l: 10.6,
            capacitance: 1.0,
        }
    }
}

/// Per-neuron Hodgkin-Huxley parameters (one entry per neuron in each array)
#[derive(Debug, Clone, PartialEq)]
pub struct HodgkinHuxleyParameters {
    pub g_na: Array1<f64>,
    pub g_k: Array1<f64>,
    pub g_l: Array1<f64>,
    pub e_na: Array1<f64>,
    pub e_k: Array1<f64>,
    pub e_l: Array1<f64>,
    pub capacitance: Array1<f64>,
}

impl HodgkinHuxleyParameters {
    /// Every neuron gets the same constants.
    pub fn uniform(neuron_count: usize, constants: HodgkinHuxleyConstants) -> Self {
        let fill = |value: f64| Array1::from_elem(neuron_count, value);
        Self {
            g_na: fill(constants.g_na),
            g_k: fill(constants.g_k),
            g_l: fill(constants.g_l),
            e_na: fill(constants.e_na),
            e_k: fill(constants.e_k),
            e_l: fill(constants.e_l),
            capacitance: fill(constants.capacitance),
        }
    }

    pub fn neuron_count(&self) -> usize {
        self.capacitance.len()
    }

    fn named_arrays(&self) -> [(&'static str, &Array1<f64>); 7] {
        [
            ("g_na", &self.g_na),
            ("g_k", &self.g_k),
            ("g_l", &self.g_l),
            ("e_na", &self.e_na),
            ("e_k", &self.e_k),
            ("e_l", &self.e_l),
            ("capacitance", &self.capacitance),
        ]
    }

    /// Check lengths agree, everything is finite, conductances are
    /// non-negative and capacitance is positive.
    pub fn validate(&self) -> Result<()> {
        let expected = self.neuron_count();
        for (parameter, values) in self.named_arrays() {
            if values.len() != expected {
                return Err(NeuralError::ParameterLengthMismatch {
                    model: MODEL_NAME,
                    parameter,
                    expected,
                    actual: values.len(),
                });
            }
            for (neuron, &value) in values.iter().enumerate() {
                if !value.is_finite() {
                    return Err(NeuralError::InvalidParameter {
                        model: MODEL_NAME,
                        parameter,
                        neuron,
                        value,
                        reason: "must be finite",
                    });
                }
            }
        }

        for (parameter, values) in [("g_na", &self.g_na), ("g_k", &self.g_k), ("g_l", &self.g_l)] {
            if let Some((neuron, &value)) = values.iter().enumerate().find(|(_, &g)| g < 0.0) {
                return Err(NeuralError::InvalidParameter {
                    model: MODEL_NAME,
                    parameter,
                    neuron,
                    value,
                    reason: "conductance must be non-negative",
                });
            }
        }

        if let Some((neuron, &value)) = self.capacitance.iter().enumerate().find(|(_, &c)| c <= 0.0) {
            return Err(NeuralError::InvalidParameter {
                model: MODEL_NAME,
                parameter: "capacitance",
                neuron,
                value,
                reason: "capacitance must be positive",
            });
        }

        Ok(())
    }
}

/// Hodgkin-Huxley population with heterogeneous parameters
#[derive(Debug, Clone, PartialEq)]
pub struct HodgkinHuxley {
    params: HodgkinHuxleyParameters,
}

impl HodgkinHuxley {
    /// Build a model from validated per-neuron parameters.
    pub fn new(params: HodgkinHuxleyParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// `neuron_count` neurons with the standard squid-axon constants.
    pub fn standard(neuron_count: usize) -> Self {
        Self {
            params: HodgkinHuxleyParameters::uniform(neuron_count, HodgkinHuxleyConstants::default()),
        }
    }

    pub fn params(&self) -> &HodgkinHuxleyParameters {
        &self.params
    }
}

impl NeuronModel for HodgkinHuxley {
    fn model_name(&self) -> &'static str {
        MODEL_NAME
    }

    fn state_dim(&self) -> usize {
        STATE_DIM
    }

    fn neuron_count(&self) -> usize {
        self.params.neuron_count()
    }

    fn derivative(&self, state: ArrayView2<'_, f64>, drive: ArrayView1<'_, f64>, mut out: ArrayViewMut2<'_, f64>) {
        debug_assert_eq!(state.dim(), (STATE_DIM, self.neuron_count()));
        debug_assert_eq!(state.dim(), out.dim());
        debug_assert_eq!(drive.len(), self.neuron_count());

        let p = &self.params;
        for i in 0..state.ncols() {
            let v = state[[V, i]];
            let m = state[[M, i]];
            let n = state[[N, i]];
            let h = state[[H, i]];

            let i_ion = p.g_na[i] * m.powi(3) * h * (v - p.e_na[i])
                + p.g_k[i] * n.powi(4) * (v - p.e_k[i])
                + p.g_l[i] * (v - p.e_l[i]);

            out[[V, i]] = (drive[i] - i_ion) / p.capacitance[i];
            out[[M, i]] = alpha_m(v) * (1.0 - m) - beta_m(v) * m;
            out[[N, i]] = alpha_n(v) * (1.0 - n) - beta_n(v) * n;
            out[[H, i]] = alpha_h(v) * (1.0 - h) - beta_h(v) * h;
        }
    }

    fn resting_state(&self) -> Array2<f64> {
        let (m, n, h) = steady_state(0.0);
        let mut state = Array2::zeros((STATE_DIM, self.neuron_count()));
        state.row_mut(M).fill(m);
        state.row_mut(N).fill(n);
        state.row_mut(H).fill(h);
        state
    }

    fn validate(&self) -> Result<()> {
        self.params.validate()
    }
}
