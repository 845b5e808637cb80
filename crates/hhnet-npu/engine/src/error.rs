// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Engine error taxonomy.
//!
//! Configuration errors surface while layers and edges are being set up,
//! before the first tick. Numerical errors surface during `update` and halt
//! the network.

use hhnet_neural::{LayerId, NeuralError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("unknown layer {layer} (network has {layer_count} layers)")]
    UnknownLayer { layer: LayerId, layer_count: usize },

    #[error(
        "edge {source_layer} -> {target}: expected ({expected_rows}, {expected_cols}), \
         got weights {weights:?} and delays {delays:?}"
    )]
    EdgeShapeMismatch {
        target: LayerId,
        source_layer: LayerId,
        expected_rows: usize,
        expected_cols: usize,
        weights: (usize, usize),
        delays: (usize, usize),
    },

    #[error(
        "edge {source_layer} -> {target}: delay {delay} at [{row}, {col}] outside [1, {dmax}]"
    )]
    DelayOutOfRange {
        target: LayerId,
        source_layer: LayerId,
        row: usize,
        col: usize,
        delay: u32,
        dmax: u32,
    },

    #[error("edge {source_layer} -> {target} is already registered")]
    DuplicateEdge { target: LayerId, source_layer: LayerId },

    #[error("edge {source_layer} -> {target}: non-finite weight at [{row}, {col}]")]
    NonFiniteWeight {
        target: LayerId,
        source_layer: LayerId,
        row: usize,
        col: usize,
    },

    #[error("edge {source_layer} -> {target}: non-finite factor {factor}")]
    NonFiniteFactor {
        target: LayerId,
        source_layer: LayerId,
        factor: f64,
    },

    #[error("{layer}: {what} has {actual} entries, expected {expected}")]
    ArrayLengthMismatch {
        layer: LayerId,
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{layer}: {what} contains a non-finite value at index {index}")]
    NonFiniteInput {
        layer: LayerId,
        what: &'static str,
        index: usize,
    },

    #[error("{layer}: neuron {neuron} out of range (layer has {size} neurons)")]
    NeuronOutOfRange {
        layer: LayerId,
        neuron: u32,
        size: usize,
    },

    #[error("topology is fixed once simulation has started (network is at tick {tick})")]
    TopologyFrozen { tick: u64 },

    #[error("invalid network settings: {0}")]
    InvalidSettings(String),

    #[error(transparent)]
    Model(#[from] NeuralError),

    #[error("tick {requested} supplied out of order, network is at tick {expected}")]
    TickOutOfOrder { expected: u64, requested: u64 },

    #[error(
        "{layer}: non-finite state at tick {tick}, sub-step {substep}, \
         neuron {neuron}, state row {variable}"
    )]
    NonFiniteState {
        layer: LayerId,
        tick: u64,
        substep: usize,
        neuron: usize,
        variable: usize,
    },

    #[error("network halted after a numerical fault at tick {tick}")]
    Halted { tick: u64 },
}

impl EngineError {
    /// Raised while building the network; nothing has been simulated.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            EngineError::UnknownLayer { .. }
                | EngineError::EdgeShapeMismatch { .. }
                | EngineError::DelayOutOfRange { .. }
                | EngineError::DuplicateEdge { .. }
                | EngineError::NonFiniteWeight { .. }
                | EngineError::NonFiniteFactor { .. }
                | EngineError::ArrayLengthMismatch { .. }
                | EngineError::NonFiniteInput { .. }
                | EngineError::NeuronOutOfRange { .. }
                | EngineError::TopologyFrozen { .. }
                | EngineError::InvalidSettings(_)
                | EngineError::Model(_)
        )
    }

    /// Divergence of the integrated state, or the halted state it leaves behind.
    pub fn is_numerical(&self) -> bool {
        matches!(
            self,
            EngineError::NonFiniteState { .. } | EngineError::Halted { .. }
        )
    }
}

pub type Result<T> = core::result::Result<T, EngineError>;
