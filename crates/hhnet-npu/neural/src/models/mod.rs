// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Neuron Model Architecture
//!
//! A model is a pure derivative function: given the state of every neuron in
//! a layer and the drive current each one receives, it writes `dx/dt` for
//! every state variable. Integration, thresholding and spike bookkeeping
//! live elsewhere.
//!
//! Layers hold a [`LayerModel`], a closed set of the supported biophysical
//! models, chosen once when the layer is configured.
//!
//! ## Adding a New Neuron Model
//!
//! 1. Create `src/models/your_model.rs`
//! 2. Implement `NeuronModel` trait
//! 3. Add a variant to `LayerModel`
//! 4. Add tests

pub mod hodgkin_huxley;
pub mod layer_model;
pub mod traits;

// Re-export core types
pub use hodgkin_huxley::{HodgkinHuxley, HodgkinHuxleyConstants, HodgkinHuxleyParameters};
pub use layer_model::LayerModel;
pub use traits::NeuronModel;
