// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Core type definitions shared by the model and engine crates.

pub mod error;
pub mod fire;
pub mod ids;

pub use error::{NeuralError, Result};
pub use fire::SpikeEvent;
pub use ids::{LayerId, NeuronId};
