// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Fixed-Step Integrators
//!
//! ```text
//! Euler:
//!     x(t+dt) = x + dt * f(x)
//!
//! Runge-Kutta 4:
//!     k1 = f(x)
//!     k2 = f(x + dt/2 * k1)
//!     k3 = f(x + dt/2 * k2)
//!     k4 = f(x + dt * k3)
//!     x(t+dt) = x + dt/6 * (k1 + 2*k2 + 2*k3 + k4)
//! ```
//!
//! The drive current is an input of `f`, held fixed across the stages of a
//! step.

use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut2};

use crate::models::NeuronModel;
use crate::types::{NeuralError, Result};

/// Integration strategy used to advance a layer's state by one sub-step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Integrator {
    /// First-order, one model evaluation per step
    Euler,
    /// Classic fourth-order Runge-Kutta, four evaluations per step
    #[default]
    RungeKutta4,
}

/// Stage buffers reused across steps so the hot loop never allocates.
#[derive(Debug, Clone)]
pub struct StepWorkspace {
    k1: Array2<f64>,
    k2: Array2<f64>,
    k3: Array2<f64>,
    k4: Array2<f64>,
    stage: Array2<f64>,
}

impl StepWorkspace {
    pub fn new(state_dim: usize, neuron_count: usize) -> Self {
        let shape = (state_dim, neuron_count);
        Self {
            k1: Array2::zeros(shape),
            k2: Array2::zeros(shape),
            k3: Array2::zeros(shape),
            k4: Array2::zeros(shape),
            stage: Array2::zeros(shape),
        }
    }

    /// Workspace sized for `model`.
    pub fn for_model<M: NeuronModel + ?Sized>(model: &M) -> Self {
        Self::new(model.state_dim(), model.neuron_count())
    }

    pub fn dim(&self) -> (usize, usize) {
        self.k1.dim()
    }
}

impl Integrator {
    pub fn name(&self) -> &'static str {
        match self {
            Integrator::Euler => "euler",
            Integrator::RungeKutta4 => "rk4",
        }
    }

    /// Model evaluations per step.
    pub fn evaluations(&self) -> usize {
        match self {
            Integrator::Euler => 1,
            Integrator::RungeKutta4 => 4,
        }
    }

    /// Advance `state` by `dt`, writing the result into `out`.
    ///
    /// `state` is only read; `out` must not alias it.
    pub fn step_into<M: NeuronModel + ?Sized>(
        &self,
        model: &M,
        state: ArrayView2<'_, f64>,
        drive: ArrayView1<'_, f64>,
        dt: f64,
        ws: &mut StepWorkspace,
        mut out: ArrayViewMut2<'_, f64>,
    ) {
        debug_assert_eq!(state.dim(), ws.dim());
        debug_assert_eq!(state.dim(), out.dim());

        match self {
            Integrator::Euler => {
                model.derivative(state, drive, ws.k1.view_mut());
                out.assign(&state);
                out.scaled_add(dt, &ws.k1);
            }
            Integrator::RungeKutta4 => {
                model.derivative(state, drive, ws.k1.view_mut());

                ws.stage.assign(&state);
                ws.stage.scaled_add(0.5 * dt, &ws.k1);
                model.derivative(ws.stage.view(), drive, ws.k2.view_mut());

                ws.stage.assign(&state);
                ws.stage.scaled_add(0.5 * dt, &ws.k2);
                model.derivative(ws.stage.view(), drive, ws.k3.view_mut());

                ws.stage.assign(&state);
                ws.stage.scaled_add(dt, &ws.k3);
                model.derivative(ws.stage.view(), drive, ws.k4.view_mut());

                out.assign(&state);
                out.scaled_add(dt / 6.0, &ws.k1);
                out.scaled_add(dt / 3.0, &ws.k2);
                out.scaled_add(dt / 3.0, &ws.k3);
                out.scaled_add(dt / 6.0, &ws.k4);
            }
        }
    }

    /// Allocating convenience wrapper around [`Integrator::step_into`].
    pub fn advance<M: NeuronModel + ?Sized>(
        &self,
        model: &M,
        state: ArrayView2<'_, f64>,
        drive: ArrayView1<'_, f64>,
        dt: f64,
    ) -> Array2<f64> {
        let (rows, cols) = state.dim();
        let mut ws = StepWorkspace::new(rows, cols);
        let mut out = Array2::zeros((rows, cols));
        self.step_into(model, state, drive, dt, &mut ws, out.view_mut());
        out
    }
}

/// Number of sub-steps that make up one 1 ms tick: `round(1 / step)`.
pub fn substeps_per_tick(step: f64) -> Result<usize> {
    if !step.is_finite() || step <= 0.0 || step > 1.0 {
        return Err(NeuralError::InvalidStep(step));
    }
    Ok(((1.0 / step).round() as usize).max(1))
}
