// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # hhnet Neural Computation
//!
//! Everything that happens *inside* a layer during one integration sub-step:
//! - **Types**: identifiers, spike events, error type
//! - **Models**: the `NeuronModel` derivative contract and the closed set of
//!   biophysical models a layer can be built from
//! - **Integrator**: fixed-step first-order and fourth-order Runge-Kutta
//!   steppers, generic over any `NeuronModel`
//!
//! State is laid out as one row per state variable and one column per
//! neuron, so a single neuron and a whole layer go through the same code.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod integrator;
pub mod models;
pub mod types;

pub use integrator::{substeps_per_tick, Integrator, StepWorkspace};
pub use models::{
    HodgkinHuxley, HodgkinHuxleyConstants, HodgkinHuxleyParameters, LayerModel, NeuronModel,
};
pub use types::{LayerId, NeuralError, NeuronId, Result, SpikeEvent};
