// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Tick orchestration.
//!
//! ```text
//! update(t):
//!   1. assemble   every layer's synaptic current from rings holding ticks < t
//!   2. integrate  every layer for 1 ms in K = round(1 / step) sub-steps
//!   3. detect     potential >= threshold (or forced) -> frame (t, fired)
//!   4. t += 1
//! ```
//!
//! Phase 1 finishes for every layer before phase 3 writes any ring, so the
//! result does not depend on layer order or on running layers in parallel.
//! Phase 3 only runs once every layer has integrated without a numerical
//! fault. After a fault the states hold the failed tick's integration, but no
//! ring, log or counter records it.
//! Detection happens only at tick boundaries: a crossing that returns below
//! threshold within the same tick is not seen.

use hhnet_neural::{LayerId, NeuronId, NeuronModel};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use tracing::{debug, error, trace};

use crate::connectivity::{Edge, EdgeBounds};
use crate::error::{EngineError, Result};
use crate::layer::{Layer, TickStep};
use crate::settings::NetworkSettings;
use crate::synaptic_delivery::assemble_into;
use crate::NetworkStats;

/// Outcome of one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    /// Spikes detected per layer, in layer order
    pub spikes: Vec<usize>,
    /// Synapse deliveries summed over all layers
    pub deliveries: u64,
}

impl TickReport {
    pub fn total_spikes(&self) -> usize {
        self.spikes.iter().sum()
    }
}

/// Layered spiking network advanced one millisecond per [`Network::update`].
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
    settings: NetworkSettings,
    substeps: usize,
    dt: f64,
    tick: u64,
    assembly: Vec<Array1<f64>>,
    stats: NetworkStats,
    halted_at: Option<u64>,
}

impl Network {
    /// Network of standard Hodgkin-Huxley layers with default settings.
    pub fn new(layer_sizes: &[usize], dmax: u32) -> Result<Self> {
        Self::with_settings(layer_sizes, NetworkSettings::with_dmax(dmax))
    }

    pub fn with_settings(layer_sizes: &[usize], settings: NetworkSettings) -> Result<Self> {
        let substeps = settings.validate()?;
        if let Some(index) = layer_sizes.iter().position(|&n| n == 0) {
            return Err(EngineError::InvalidSettings(format!(
                "layer {} has no neurons",
                index
            )));
        }
        if layer_sizes.iter().any(|&n| n > u32::MAX as usize) {
            return Err(EngineError::InvalidSettings(
                "layer size exceeds u32 neuron indices".to_string(),
            ));
        }

        let layers: Vec<Layer> = layer_sizes
            .iter()
            .enumerate()
            .map(|(i, &n)| Layer::new(LayerId(i), n, settings.firing_threshold, settings.dmax))
            .collect();
        let assembly = layer_sizes.iter().map(|&n| Array1::zeros(n)).collect();

        debug!(
            "Network created: {} layers {:?}, dmax={}, integrator={}, {} sub-steps/tick, parallel={}",
            layers.len(),
            layer_sizes,
            settings.dmax,
            settings.integrator.name(),
            substeps,
            settings.parallel_layers
        );

        Ok(Self {
            layers,
            settings,
            substeps,
            dt: 1.0 / substeps as f64,
            tick: 0,
            assembly,
            stats: NetworkStats::default(),
            halted_at: None,
        })
    }

    /// Register the edge `source -> target`.
    ///
    /// `weights` and `delays` are `(target size, source size)`. Each
    /// (target, source) pair may be registered once, and only before the
    /// first tick.
    pub fn connect(
        &mut self,
        target: LayerId,
        source: LayerId,
        weights: Array2<f64>,
        delays: Array2<u32>,
        factor: f64,
    ) -> Result<()> {
        if self.tick > 0 || self.halted_at.is_some() {
            return Err(EngineError::TopologyFrozen { tick: self.tick });
        }
        let source_size = self.layer(source)?.size();
        let target_layer = self.layer(target)?;
        if target_layer.edge_from(source).is_some() {
            return Err(EngineError::DuplicateEdge {
                target,
                source_layer: source,
            });
        }

        let bounds = EdgeBounds {
            target,
            target_size: target_layer.size(),
            source,
            source_size,
            dmax: self.settings.dmax,
            policy: self.settings.delay_policy,
        };
        let edge = Edge::new(bounds, weights, delays, factor)?;

        debug!(
            "Edge registered: {} -> {} ({}x{}), factor={}, max delay={}",
            source,
            target,
            bounds.target_size,
            bounds.source_size,
            factor,
            edge.max_delay()
        );
        self.layer_mut(target)?.push_edge(edge);
        Ok(())
    }

    /// Make `neuron` of `layer` fire at the next tick's detection phase.
    pub fn force_spike(&mut self, layer: LayerId, neuron: NeuronId) -> Result<()> {
        self.layer_mut(layer)?.force_spike(neuron)
    }

    /// Advance one tick using the network's own counter.
    pub fn update(&mut self) -> Result<TickReport> {
        if let Some(tick) = self.halted_at {
            return Err(EngineError::Halted { tick });
        }

        let tick = self.tick;
        let parallel = self.settings.parallel_layers;

        // Phase 1: current assembly against rings as they were before this tick.
        let layers = &self.layers;
        let deliveries: u64 = if parallel {
            self.assembly
                .par_iter_mut()
                .zip(layers.par_iter())
                .map(|(acc, target)| assemble_into(target, layers, tick, acc))
                .sum()
        } else {
            self.assembly
                .iter_mut()
                .zip(layers.iter())
                .map(|(acc, target)| assemble_into(target, layers, tick, acc))
                .sum()
        };
        for (layer, acc) in self.layers.iter_mut().zip(self.assembly.iter_mut()) {
            layer.swap_synaptic(acc);
        }

        // Phase 2: integration, layer-local.
        let step = TickStep {
            tick,
            integrator: self.settings.integrator,
            substeps: self.substeps,
            dt: self.dt,
            record_history: self.settings.record_history,
        };
        let outcomes: Vec<Result<()>> = if parallel {
            self.layers.par_iter_mut().map(|layer| layer.integrate(&step)).collect()
        } else {
            self.layers.iter_mut().map(|layer| layer.integrate(&step)).collect()
        };
        if let Some(err) = outcomes.into_iter().find_map(|outcome| outcome.err()) {
            error!("Network halted at tick {}: {}", tick, err);
            self.halted_at = Some(tick);
            return Err(err);
        }

        // Phase 3: detection, only after every layer integrated cleanly.
        let spikes: Vec<usize> = if parallel {
            self.layers.par_iter_mut().map(|layer| layer.detect(&step).len()).collect()
        } else {
            self.layers.iter_mut().map(|layer| layer.detect(&step).len()).collect()
        };

        let report = TickReport {
            tick,
            spikes,
            deliveries,
        };
        self.stats.record(&report);
        self.tick += 1;

        trace!(
            "Tick {} done: {} spikes, {} deliveries",
            tick,
            report.total_spikes(),
            deliveries
        );
        Ok(report)
    }

    /// Advance one tick, checking the caller's tick against the counter.
    pub fn update_at(&mut self, tick: u64) -> Result<TickReport> {
        if let Some(halted) = self.halted_at {
            return Err(EngineError::Halted { tick: halted });
        }
        if tick != self.tick {
            return Err(EngineError::TickOutOfOrder {
                expected: self.tick,
                requested: tick,
            });
        }
        self.update()
    }

    /// Run `ticks` updates, stopping at the first error.
    pub fn run(&mut self, ticks: u64) -> Result<Vec<TickReport>> {
        (0..ticks).map(|_| self.update()).collect()
    }

    pub fn layer(&self, id: LayerId) -> Result<&Layer> {
        let layer_count = self.layers.len();
        self.layers.get(id.index()).ok_or(EngineError::UnknownLayer {
            layer: id,
            layer_count,
        })
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Result<&mut Layer> {
        let layer_count = self.layers.len();
        self.layers.get_mut(id.index()).ok_or(EngineError::UnknownLayer {
            layer: id,
            layer_count,
        })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Next tick to be simulated
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn dmax(&self) -> u32 {
        self.settings.dmax
    }

    pub fn settings(&self) -> &NetworkSettings {
        &self.settings
    }

    /// Sub-steps per tick
    pub fn substeps(&self) -> usize {
        self.substeps
    }

    pub fn stats(&self) -> &NetworkStats {
        &self.stats
    }

    pub fn is_halted(&self) -> bool {
        self.halted_at.is_some()
    }

    /// Neurons across all layers
    pub fn neuron_count(&self) -> usize {
        self.layers.iter().map(|l| l.model().neuron_count()).sum()
    }
}
