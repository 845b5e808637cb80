// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Closed set of models a layer can be built from.

use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut2};

use super::hodgkin_huxley::HodgkinHuxley;
use super::traits::NeuronModel;
use crate::types::Result;

/// The biophysical model of one layer, selected at configuration time.
///
/// Dispatch is a `match`, so the per-substep call stays static.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum LayerModel {
    HodgkinHuxley(HodgkinHuxley),
}

impl LayerModel {
    /// Standard Hodgkin-Huxley population of `neuron_count` neurons.
    pub fn hodgkin_huxley(neuron_count: usize) -> Self {
        LayerModel::HodgkinHuxley(HodgkinHuxley::standard(neuron_count))
    }
}

impl From<HodgkinHuxley> for LayerModel {
    fn from(model: HodgkinHuxley) -> Self {
        LayerModel::HodgkinHuxley(model)
    }
}

impl NeuronModel for LayerModel {
    fn model_name(&self) -> &'static str {
        match self {
            LayerModel::HodgkinHuxley(model) => model.model_name(),
        }
    }

    fn state_dim(&self) -> usize {
        match self {
            LayerModel::HodgkinHuxley(model) => model.state_dim(),
        }
    }

    fn neuron_count(&self) -> usize {
        match self {
            LayerModel::HodgkinHuxley(model) => model.neuron_count(),
        }
    }

    #[inline]
    fn derivative(&self, state: ArrayView2<'_, f64>, drive: ArrayView1<'_, f64>, out: ArrayViewMut2<'_, f64>) {
        match self {
            LayerModel::HodgkinHuxley(model) => model.derivative(state, drive, out),
        }
    }

    fn resting_state(&self) -> Array2<f64> {
        match self {
            LayerModel::HodgkinHuxley(model) => model.resting_state(),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            LayerModel::HodgkinHuxley(model) => model.validate(),
        }
    }
}
