// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Firing events

use super::ids::NeuronId;

/// One threshold crossing (or forced firing) recorded at a tick boundary.
///
/// Ordering is by tick first, then neuron, which is the order a layer's
/// spike log is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpikeEvent {
    pub tick: u64,
    pub neuron: NeuronId,
}

impl SpikeEvent {
    pub fn new(tick: u64, neuron: u32) -> Self {
        Self {
            tick,
            neuron: NeuronId(neuron),
        }
    }
}
