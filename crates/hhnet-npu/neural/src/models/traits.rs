// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Neuron Model Traits
//!
//! Defines the derivative contract every neuron model implements.

use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut2};

use crate::types::Result;

/// Core trait for a neuron model's continuous dynamics
///
/// State arrays have shape `(state_dim(), neuron_count())`: row `k` holds
/// state variable `k` for every neuron, and column `i` is neuron `i`. Row 0
/// is always the primary variable (membrane potential) used for spike
/// detection.
///
/// Implementations must be pure: `derivative` reads `state` and `drive` and
/// writes only `out`.
///
/// # Example
///
/// ```ignore
/// struct Decay;
///
/// impl NeuronModel for Decay {
///     fn model_name(&self) -> &'static str { "decay" }
///     fn state_dim(&self) -> usize { 1 }
///     fn neuron_count(&self) -> usize { 1 }
///     fn derivative(&self, state: ArrayView2<f64>, _drive: ArrayView1<f64>, mut out: ArrayViewMut2<f64>) {
///         out.assign(&state.mapv(|x| -x));
///     }
///     // ...
/// }
/// ```
pub trait NeuronModel: Send + Sync {
    /// Human-readable model name for logging/debugging
    fn model_name(&self) -> &'static str;

    /// Number of state variables per neuron
    fn state_dim(&self) -> usize;

    /// Number of neurons this model instance carries parameters for
    fn neuron_count(&self) -> usize;

    /// Write `dx/dt` for every state variable of every neuron into `out`.
    ///
    /// # Arguments
    ///
    /// * `state` - Current state, shape `(state_dim, neuron_count)`
    /// * `drive` - Total injected current per neuron, length `neuron_count`
    /// * `out` - Derivative output, same shape as `state`
    ///
    /// # Performance Note
    ///
    /// Called `evaluations x substeps` times per layer per tick; must not
    /// allocate.
    fn derivative(&self, state: ArrayView2<'_, f64>, drive: ArrayView1<'_, f64>, out: ArrayViewMut2<'_, f64>);

    /// Initial condition for a quiescent layer
    fn resting_state(&self) -> Array2<f64>;

    /// Validate that parameters are within acceptable ranges
    fn validate(&self) -> Result<()>;
}
