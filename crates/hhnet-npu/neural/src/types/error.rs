// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for model construction and validation

/// Errors raised while building or validating a neuron model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NeuralError {
    #[error("{model}: parameter '{parameter}' has {actual} entries, expected {expected}")]
    ParameterLengthMismatch {
        model: &'static str,
        parameter: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{model}: parameter '{parameter}' for neuron {neuron} is invalid ({value}): {reason}")]
    InvalidParameter {
        model: &'static str,
        parameter: &'static str,
        neuron: usize,
        value: f64,
        reason: &'static str,
    },

    #[error("state has shape ({rows}, {cols}), expected ({expected_rows}, {expected_cols})")]
    StateShapeMismatch {
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },

    #[error("integration step must be finite and in (0, 1] ms, got {0}")]
    InvalidStep(f64),
}

pub type Result<T> = core::result::Result<T, NeuralError>;
