// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # hhnet Engine
//!
//! Tick engine for layered spiking networks with per-synapse integer
//! conduction delays.
//!
//! ## Architecture
//! - **Network**: owns the layers, the delay horizon (Dmax) and the tick counter
//! - **Layer**: double-buffered state, input currents, incoming edges, spike ring
//! - **Synaptic delivery**: exact-match delay lines read from each source's ring
//! - **Spike ring**: dense window of the last Dmax firing frames per layer
//!
//! ## Example
//! ```rust
//! use hhnet_engine::{LayerId, Network, NeuronId};
//! use ndarray::Array2;
//!
//! let mut net = Network::new(&[1, 1], 5).unwrap();
//! net.connect(LayerId(1), LayerId(0), Array2::from_elem((1, 1), 1.0), Array2::from_elem((1, 1), 2), 1.0)
//!     .unwrap();
//! net.force_spike(LayerId(0), NeuronId(0)).unwrap();
//! for _ in 0..3 {
//!     net.update().unwrap();
//! }
//! assert_eq!(net.layer(LayerId(1)).unwrap().synaptic_current()[0], 1.0);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod connectivity;
pub mod error;
pub mod layer;
pub mod network;
pub mod settings;
pub mod spike_ring;
mod synaptic_delivery;

pub use connectivity::Edge;
pub use error::{EngineError, Result};
pub use layer::Layer;
pub use network::{Network, TickReport};
pub use settings::NetworkSettings;
pub use spike_ring::{SpikeLog, SpikeRing};

pub use hhnet_config::DelayPolicy;
pub use hhnet_neural::{Integrator, LayerId, LayerModel, NeuronId, SpikeEvent};

/// Cumulative network statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkStats {
    pub ticks: u64,
    pub spikes: u64,
    pub deliveries: u64,
}

impl NetworkStats {
    pub(crate) fn record(&mut self, report: &TickReport) {
        self.ticks += 1;
        self.spikes += report.total_spikes() as u64;
        self.deliveries += report.deliveries;
    }

    /// Get average spikes per tick
    pub fn avg_spikes_per_tick(&self) -> f64 {
        if self.ticks == 0 {
            0.0
        } else {
            self.spikes as f64 / self.ticks as f64
        }
    }

    /// Get average synapse deliveries per tick
    pub fn avg_deliveries_per_tick(&self) -> f64 {
        if self.ticks == 0 {
            0.0
        } else {
            self.deliveries as f64 / self.ticks as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_averages() {
        let mut stats = NetworkStats::default();
        assert_eq!(stats.avg_spikes_per_tick(), 0.0);

        stats.record(&TickReport {
            tick: 0,
            spikes: vec![2, 1],
            deliveries: 4,
        });
        stats.record(&TickReport {
            tick: 1,
            spikes: vec![0, 1],
            deliveries: 0,
        });
        assert_eq!(stats.ticks, 2);
        assert_eq!(stats.avg_spikes_per_tick(), 2.0);
        assert_eq!(stats.avg_deliveries_per_tick(), 2.0);
    }
}
