// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-layer firing history.
//!
//! Key semantics:
//! - `SpikeRing` is dense: one frame per tick, explicit empty frames when silent.
//! - The ring holds exactly the ticks that can still be delivered: after the
//!   frame for tick `t` is pushed, frames for `t + 1 - window ..= t` remain.
//! - `SpikeLog` is the append-only record kept for observation. Delivery never
//!   reads it.

use std::collections::VecDeque;

use hhnet_neural::{NeuronId, SpikeEvent};

/// Frames reserved up front; longer windows grow as ticks arrive.
const INITIAL_FRAME_CAPACITY: usize = 64;

/// Bounded window of the most recent firing frames of one layer.
#[derive(Debug, Clone)]
pub struct SpikeRing {
    window: usize,
    frames: VecDeque<(u64, Vec<u32>)>, // oldest -> newest
    spare: Vec<Vec<u32>>,
}

impl SpikeRing {
    /// Ring holding `window` ticks (the network's Dmax).
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            frames: VecDeque::with_capacity(window.min(INITIAL_FRAME_CAPACITY) + 1),
            spare: Vec::new(),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Tick of the newest frame, if any.
    pub fn newest_tick(&self) -> Option<u64> {
        self.frames.back().map(|(t, _)| *t)
    }

    /// Record the neurons that fired at `tick` and drop frames that can no
    /// longer be delivered.
    ///
    /// Ticks must increase by exactly one per call.
    pub fn push_frame(&mut self, tick: u64, fired: &[u32]) {
        debug_assert!(
            self.newest_tick().map_or(true, |t| t + 1 == tick),
            "non-dense frame: newest={:?}, pushed={}",
            self.newest_tick(),
            tick
        );

        while let Some((oldest, _)) = self.frames.front() {
            if oldest + self.window as u64 > tick {
                break;
            }
            if let Some((_, mut buf)) = self.frames.pop_front() {
                buf.clear();
                self.spare.push(buf);
            }
        }

        let mut buf = self.spare.pop().unwrap_or_default();
        buf.extend_from_slice(fired);
        self.frames.push_back((tick, buf));
    }

    /// Frames newest first, as `(tick, fired neurons ascending)`.
    pub fn frames_newest_first(&self) -> impl Iterator<Item = (u64, &[u32])> + '_ {
        self.frames.iter().rev().map(|(t, fired)| (*t, fired.as_slice()))
    }

    /// Neurons that fired at `tick`, if that tick is still in the window.
    pub fn fired_at(&self, tick: u64) -> Option<&[u32]> {
        self.frames
            .iter()
            .find(|(t, _)| *t == tick)
            .map(|(_, fired)| fired.as_slice())
    }

    pub fn clear(&mut self) {
        while let Some((_, mut buf)) = self.frames.pop_front() {
            buf.clear();
            self.spare.push(buf);
        }
    }
}

/// Append-only, tick-ordered spike history of one layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpikeLog {
    events: Vec<SpikeEvent>,
}

impl SpikeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, tick: u64, fired: &[u32]) {
        debug_assert!(self.events.last().map_or(true, |e| e.tick <= tick));
        self.events
            .extend(fired.iter().map(|&neuron| SpikeEvent::new(tick, neuron)));
    }

    pub fn events(&self) -> &[SpikeEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events at or after `tick`. The log is tick-ordered, so this is a slice.
    pub fn since(&self, tick: u64) -> &[SpikeEvent] {
        let start = self.events.partition_point(|e| e.tick < tick);
        &self.events[start..]
    }

    /// Firing ticks of one neuron, oldest first.
    pub fn ticks_of(&self, neuron: NeuronId) -> impl Iterator<Item = u64> + '_ {
        self.events
            .iter()
            .filter(move |e| e.neuron == neuron)
            .map(|e| e.tick)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
