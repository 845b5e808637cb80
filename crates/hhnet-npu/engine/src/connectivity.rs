// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Incoming edges: one weight/delay matrix pair per (target, source) layer pair.

use hhnet_config::DelayPolicy;
use hhnet_neural::LayerId;
use ndarray::{Array2, ArrayView1};
use tracing::warn;

use crate::error::{EngineError, Result};

/// Weighted, delayed projection from a source layer onto the owning layer.
///
/// `weights` and `delays` are `(target size, source size)`; entry `[r, s]`
/// describes the synapse from source neuron `s` onto target neuron `r`.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    source: LayerId,
    weights: Array2<f64>,
    delays: Array2<u32>,
    factor: f64,
    max_delay: u32,
    overflow: usize,
}

/// Everything an edge is checked against at registration.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EdgeBounds {
    pub target: LayerId,
    pub target_size: usize,
    pub source: LayerId,
    pub source_size: usize,
    pub dmax: u32,
    pub policy: DelayPolicy,
}

impl Edge {
    pub(crate) fn new(
        bounds: EdgeBounds,
        weights: Array2<f64>,
        delays: Array2<u32>,
        factor: f64,
    ) -> Result<Self> {
        let EdgeBounds {
            target,
            target_size,
            source,
            source_size,
            dmax,
            policy,
        } = bounds;

        if weights.dim() != (target_size, source_size) || delays.dim() != (target_size, source_size) {
            return Err(EngineError::EdgeShapeMismatch {
                target,
                source_layer: source,
                expected_rows: target_size,
                expected_cols: source_size,
                weights: weights.dim(),
                delays: delays.dim(),
            });
        }

        if !factor.is_finite() {
            return Err(EngineError::NonFiniteFactor {
                target,
                source_layer: source,
                factor,
            });
        }

        if let Some(((row, col), _)) = weights.indexed_iter().find(|(_, w)| !w.is_finite()) {
            return Err(EngineError::NonFiniteWeight {
                target,
                source_layer: source,
                row,
                col,
            });
        }

        let mut overflow = 0usize;
        for ((row, col), &delay) in delays.indexed_iter() {
            let rejected = match policy {
                DelayPolicy::Strict => delay == 0 || delay > dmax,
                DelayPolicy::DropOverflow => delay == 0,
            };
            if rejected {
                return Err(EngineError::DelayOutOfRange {
                    target,
                    source_layer: source,
                    row,
                    col,
                    delay,
                    dmax,
                });
            }
            if delay > dmax {
                overflow += 1;
            }
        }

        if overflow > 0 {
            warn!(
                "Edge {} -> {}: {} synapses have delays beyond dmax={} and will never deliver",
                source, target, overflow, dmax
            );
        }

        let max_delay = delays.iter().copied().max().unwrap_or(0).min(dmax);

        Ok(Self {
            source,
            weights,
            delays,
            factor,
            max_delay,
            overflow,
        })
    }

    pub fn source(&self) -> LayerId {
        self.source
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    pub fn delays(&self) -> &Array2<u32> {
        &self.delays
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Longest delay on this edge that can actually be delivered.
    pub fn max_delay(&self) -> u32 {
        self.max_delay
    }

    /// Synapses whose delay exceeds dmax (only possible under `DropOverflow`).
    pub fn overflow_count(&self) -> usize {
        self.overflow
    }

    /// Delays from source neuron `s` onto every target neuron.
    pub(crate) fn delay_column(&self, s: usize) -> ArrayView1<'_, u32> {
        self.delays.column(s)
    }

    pub(crate) fn weight(&self, row: usize, col: usize) -> f64 {
        self.weights[[row, col]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn bounds(policy: DelayPolicy) -> EdgeBounds {
        EdgeBounds {
            target: LayerId(1),
            target_size: 2,
            source: LayerId(0),
            source_size: 3,
            dmax: 4,
            policy,
        }
    }

    #[test]
    fn test_valid_edge() {
        let edge = Edge::new(
            bounds(DelayPolicy::Strict),
            array![[1.0, 0.5, 0.0], [0.0, 2.0, -1.0]],
            array![[1, 2, 4], [3, 1, 1]],
            0.5,
        )
        .unwrap();
        assert_eq!(edge.source(), LayerId(0));
        assert_eq!(edge.max_delay(), 4);
        assert_eq!(edge.overflow_count(), 0);
        assert_eq!(edge.delay_column(1).to_vec(), vec![2, 1]);
        assert_eq!(edge.weight(1, 2), -1.0);
    }

    #[test]
    fn test_shape_mismatch() {
        let err = Edge::new(
            bounds(DelayPolicy::Strict),
            Array2::zeros((3, 2)),
            Array2::from_elem((2, 3), 1),
            1.0,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EngineError::EdgeShapeMismatch { expected_rows: 2, expected_cols: 3, weights: (3, 2), .. }
        ));

        let err = Edge::new(
            bounds(DelayPolicy::Strict),
            Array2::zeros((2, 3)),
            Array2::from_elem((2, 2), 1),
            1.0,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::EdgeShapeMismatch { delays: (2, 2), .. }));
    }

    #[test]
    fn test_strict_rejects_zero_and_overflow() {
        let mut delays = Array2::from_elem((2, 3), 1);
        delays[[1, 2]] = 0;
        let err = Edge::new(bounds(DelayPolicy::Strict), Array2::zeros((2, 3)), delays, 1.0).unwrap_err();
        assert!(matches!(err, EngineError::DelayOutOfRange { row: 1, col: 2, delay: 0, .. }));

        let mut delays = Array2::from_elem((2, 3), 1);
        delays[[0, 1]] = 5;
        let err = Edge::new(bounds(DelayPolicy::Strict), Array2::zeros((2, 3)), delays, 1.0).unwrap_err();
        assert!(matches!(err, EngineError::DelayOutOfRange { row: 0, col: 1, delay: 5, dmax: 4, .. }));
    }

    #[test]
    fn test_drop_overflow_accepts_long_delays() {
        let mut delays = Array2::from_elem((2, 3), 2);
        delays[[0, 1]] = 9;
        delays[[1, 1]] = 7;
        let edge = Edge::new(bounds(DelayPolicy::DropOverflow), Array2::zeros((2, 3)), delays, 1.0).unwrap();
        assert_eq!(edge.overflow_count(), 2);
        assert_eq!(edge.max_delay(), 4);

        let zero = Array2::from_elem((2, 3), 0);
        assert!(Edge::new(bounds(DelayPolicy::DropOverflow), Array2::zeros((2, 3)), zero, 1.0).is_err());
    }

    #[test]
    fn test_non_finite_weights_and_factor() {
        let mut weights = Array2::zeros((2, 3));
        weights[[1, 0]] = f64::INFINITY;
        let err = Edge::new(bounds(DelayPolicy::Strict), weights, Array2::from_elem((2, 3), 1), 1.0).unwrap_err();
        assert!(matches!(err, EngineError::NonFiniteWeight { row: 1, col: 0, .. }));

        let err = Edge::new(
            bounds(DelayPolicy::Strict),
            Array2::zeros((2, 3)),
            Array2::from_elem((2, 3), 1),
            f64::NAN,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::NonFiniteFactor { .. }));
    }
}
