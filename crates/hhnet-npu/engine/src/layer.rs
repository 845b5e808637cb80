// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! A population of neurons sharing one model type.
//!
//! The layer owns its state (double-buffered), per-neuron parameters through
//! its [`LayerModel`], the external and synaptic input currents, its incoming
//! edges and its firing history.

use hhnet_neural::{Integrator, LayerId, LayerModel, NeuronId, NeuronModel, SpikeEvent, StepWorkspace};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use tracing::{debug, error};

use crate::connectivity::Edge;
use crate::error::{EngineError, Result};
use crate::spike_ring::{SpikeLog, SpikeRing};

/// State row compared against the firing threshold.
pub const PRIMARY_VARIABLE: usize = 0;

/// Integration parameters shared by every layer for one tick.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TickStep {
    pub tick: u64,
    pub integrator: Integrator,
    pub substeps: usize,
    pub dt: f64,
    pub record_history: bool,
}

#[derive(Debug, Clone)]
pub struct Layer {
    id: LayerId,
    model: LayerModel,
    threshold: f64,
    state: Array2<f64>,
    next: Array2<f64>,
    workspace: StepWorkspace,
    external: Array1<f64>,
    synaptic: Array1<f64>,
    drive: Array1<f64>,
    incoming: Vec<Edge>,
    ring: SpikeRing,
    log: SpikeLog,
    forced: Vec<bool>,
    fired: Vec<u32>,
    spike_count: u64,
}

impl Layer {
    /// Standard Hodgkin-Huxley layer of `size` neurons at rest.
    pub(crate) fn new(id: LayerId, size: usize, threshold: f64, dmax: u32) -> Self {
        let model = LayerModel::hodgkin_huxley(size);
        let state = model.resting_state();
        Self {
            id,
            threshold,
            next: Array2::zeros(state.dim()),
            workspace: StepWorkspace::for_model(&model),
            state,
            model,
            external: Array1::zeros(size),
            synaptic: Array1::zeros(size),
            drive: Array1::zeros(size),
            incoming: Vec::new(),
            ring: SpikeRing::new(dmax as usize),
            log: SpikeLog::new(),
            forced: vec![false; size],
            fired: Vec::with_capacity(size),
            spike_count: 0,
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Neuron count
    pub fn size(&self) -> usize {
        self.external.len()
    }

    pub fn model(&self) -> &LayerModel {
        &self.model
    }

    /// Replace the layer's model (e.g. heterogeneous parameters).
    ///
    /// The state is kept when its shape still fits, otherwise it is reset to
    /// the new model's resting state.
    pub fn set_model(&mut self, model: impl Into<LayerModel>) -> Result<()> {
        let model = model.into();
        if model.neuron_count() != self.size() {
            return Err(EngineError::ArrayLengthMismatch {
                layer: self.id,
                what: "model parameters",
                expected: self.size(),
                actual: model.neuron_count(),
            });
        }
        model.validate()?;

        if model.state_dim() != self.state.nrows() {
            self.state = model.resting_state();
            self.next = Array2::zeros(self.state.dim());
        }
        self.workspace = StepWorkspace::for_model(&model);
        debug!("{}: model set to {}", self.id, model.model_name());
        self.model = model;
        Ok(())
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: f64) -> Result<()> {
        if !threshold.is_finite() {
            return Err(EngineError::InvalidSettings(format!(
                "{}: firing threshold must be finite, got {}",
                self.id, threshold
            )));
        }
        self.threshold = threshold;
        Ok(())
    }

    /// Full state, `(state_dim, size)`.
    pub fn state(&self) -> ArrayView2<'_, f64> {
        self.state.view()
    }

    /// Membrane potential of every neuron.
    pub fn potential(&self) -> ArrayView1<'_, f64> {
        self.state.row(PRIMARY_VARIABLE)
    }

    pub fn set_state(&mut self, state: Array2<f64>) -> Result<()> {
        let (rows, cols) = state.dim();
        if rows != self.model.state_dim() || cols != self.size() {
            return Err(hhnet_neural::NeuralError::StateShapeMismatch {
                rows,
                cols,
                expected_rows: self.model.state_dim(),
                expected_cols: self.size(),
            }
            .into());
        }
        if let Some(((_, col), _)) = state.indexed_iter().find(|(_, x)| !x.is_finite()) {
            return Err(EngineError::NonFiniteInput {
                layer: self.id,
                what: "state",
                index: col,
            });
        }
        self.state = state;
        Ok(())
    }

    /// Put every neuron back at the model's resting state.
    pub fn reset_to_rest(&mut self) {
        self.state = self.model.resting_state();
    }

    /// Persistent injected current, held until changed.
    pub fn external_current(&self) -> ArrayView1<'_, f64> {
        self.external.view()
    }

    pub fn set_external_current(&mut self, current: &[f64]) -> Result<()> {
        if current.len() != self.size() {
            return Err(EngineError::ArrayLengthMismatch {
                layer: self.id,
                what: "external current",
                expected: self.size(),
                actual: current.len(),
            });
        }
        if let Some(index) = current.iter().position(|i| !i.is_finite()) {
            return Err(EngineError::NonFiniteInput {
                layer: self.id,
                what: "external current",
                index,
            });
        }
        self.external.assign(&ArrayView1::from(current));
        Ok(())
    }

    /// Same injected current for every neuron.
    pub fn fill_external_current(&mut self, current: f64) -> Result<()> {
        if !current.is_finite() {
            return Err(EngineError::NonFiniteInput {
                layer: self.id,
                what: "external current",
                index: 0,
            });
        }
        self.external.fill(current);
        Ok(())
    }

    /// Synaptic current assembled during the most recent tick.
    pub fn synaptic_current(&self) -> ArrayView1<'_, f64> {
        self.synaptic.view()
    }

    pub fn incoming(&self) -> &[Edge] {
        &self.incoming
    }

    pub fn edge_from(&self, source: LayerId) -> Option<&Edge> {
        self.incoming.iter().find(|e| e.source() == source)
    }

    /// Firing frames still inside the delivery window.
    pub fn recent_spikes(&self) -> &SpikeRing {
        &self.ring
    }

    /// Full history (empty when history recording is off).
    pub fn spike_log(&self) -> &SpikeLog {
        &self.log
    }

    /// Spikes emitted since construction, recorded or not.
    pub fn spike_count(&self) -> u64 {
        self.spike_count
    }

    /// Make `neuron` fire at the next detection phase.
    pub fn force_spike(&mut self, neuron: NeuronId) -> Result<()> {
        match self.forced.get_mut(neuron.index()) {
            Some(flag) => {
                *flag = true;
                Ok(())
            }
            None => Err(EngineError::NeuronOutOfRange {
                layer: self.id,
                neuron: neuron.0,
                size: self.size(),
            }),
        }
    }

    pub(crate) fn push_edge(&mut self, edge: Edge) {
        self.incoming.push(edge);
    }

    pub(crate) fn swap_synaptic(&mut self, assembled: &mut Array1<f64>) {
        std::mem::swap(&mut self.synaptic, assembled);
    }

    /// Integrate one tick and detect spikes. Returns the neurons that fired.
    #[cfg(test)]
    pub(crate) fn advance(&mut self, step: &TickStep) -> Result<&[u32]> {
        self.integrate(step)?;
        Ok(self.detect(step))
    }

    /// Advance the state by one tick. Rings and logs are left untouched.
    pub(crate) fn integrate(&mut self, step: &TickStep) -> Result<()> {
        self.drive.assign(&self.external);
        self.drive += &self.synaptic;

        for substep in 0..step.substeps {
            step.integrator.step_into(
                &self.model,
                self.state.view(),
                self.drive.view(),
                step.dt,
                &mut self.workspace,
                self.next.view_mut(),
            );

            if let Some(((variable, neuron), value)) =
                self.next.indexed_iter().find(|(_, x)| !x.is_finite())
            {
                error!(
                    "{}: non-finite state {} at tick {}, sub-step {}, neuron {}, row {}",
                    self.id, value, step.tick, substep, neuron, variable
                );
                return Err(EngineError::NonFiniteState {
                    layer: self.id,
                    tick: step.tick,
                    substep,
                    neuron,
                    variable,
                });
            }

            std::mem::swap(&mut self.state, &mut self.next);
        }
        Ok(())
    }

    /// Record the neurons at or above threshold (or forced) as tick `step.tick`.
    pub(crate) fn detect(&mut self, step: &TickStep) -> &[u32] {
        self.fired.clear();
        let potential = self.state.row(PRIMARY_VARIABLE);
        for (i, (&v, forced)) in potential.iter().zip(self.forced.iter_mut()).enumerate() {
            if v >= self.threshold || *forced {
                self.fired.push(i as u32);
            }
            *forced = false;
        }

        self.ring.push_frame(step.tick, &self.fired);
        if step.record_history {
            self.log.record(step.tick, &self.fired);
        }
        self.spike_count += self.fired.len() as u64;
        &self.fired
    }

    /// Events at `tick`, while that tick is still inside the delivery window.
    ///
    /// Older ticks yield nothing here; use [`Layer::spike_log`] for them.
    pub fn spikes_at(&self, tick: u64) -> impl Iterator<Item = SpikeEvent> + '_ {
        self.ring
            .fired_at(tick)
            .into_iter()
            .flatten()
            .map(move |&n| SpikeEvent::new(tick, n))
    }
}
