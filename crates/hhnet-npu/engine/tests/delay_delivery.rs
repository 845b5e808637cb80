// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Integration Tests: Delay-Line Delivery
//!
//! - Exact-match delivery at the registered delay, nothing before or after
//! - Delays beyond Dmax under the drop-overflow policy never deliver
//! - A spike is never delivered in the tick that produced it, whatever the
//!   layer order
//! - Several synapses and edges summing into one target

use hhnet_engine::{DelayPolicy, EngineError, LayerId, Network, NetworkSettings, NeuronId};
use ndarray::{array, Array2};

// ═══════════════════════════════════════════════════════════
// Helper Functions
// ═══════════════════════════════════════════════════════════

/// Run until `last_tick` (inclusive) and return the synaptic current of
/// `layer[neuron]` after every tick, indexed by tick.
fn synaptic_trace(net: &mut Network, layer: LayerId, neuron: usize, last_tick: u64) -> Vec<f64> {
    let mut trace = Vec::new();
    while net.tick() <= last_tick {
        net.update().unwrap();
        trace.push(net.layer(layer).unwrap().synaptic_current()[neuron]);
    }
    trace
}

/// Step to `tick` (exclusive) without recording anything.
fn run_until(net: &mut Network, tick: u64) {
    while net.tick() < tick {
        net.update().unwrap();
    }
}

// ═══════════════════════════════════════════════════════════
// Exact delivery
// ═══════════════════════════════════════════════════════════

#[test]
fn test_exact_delay_delivery() {
    let (w, f) = (0.75, 2.0);
    let mut net = Network::new(&[1, 1], 5).unwrap();
    net.connect(
        LayerId(1),
        LayerId(0),
        Array2::from_elem((1, 1), w),
        Array2::from_elem((1, 1), 4),
        f,
    )
    .unwrap();

    run_until(&mut net, 10);
    net.force_spike(LayerId(0), NeuronId(0)).unwrap();
    let trace = synaptic_trace(&mut net, LayerId(1), 0, 25);

    assert_eq!(
        net.layer(LayerId(0)).unwrap().spike_log().events()[0].tick,
        10
    );
    for (tick, &current) in (10u64..).zip(trace.iter()) {
        if tick == 14 {
            assert_eq!(current, f * w, "tick {}", tick);
        } else {
            assert_eq!(current, 0.0, "tick {}", tick);
        }
    }
}

#[test]
fn test_delivery_is_per_target_neuron() {
    // source neuron 1 reaches target 0 after 1 tick, target 1 after 3, target 2 never (weight 0)
    let mut net = Network::new(&[2, 3], 3).unwrap();
    net.connect(
        LayerId(1),
        LayerId(0),
        array![[5.0, 1.0], [5.0, 2.0], [5.0, 0.0]],
        array![[1, 1], [1, 3], [1, 2]],
        1.0,
    )
    .unwrap();

    net.force_spike(LayerId(0), NeuronId(1)).unwrap();
    let mut currents = Vec::new();
    for _ in 0..5 {
        net.update().unwrap();
        currents.push(net.layer(LayerId(1)).unwrap().synaptic_current().to_vec());
    }

    assert_eq!(currents[0], vec![0.0, 0.0, 0.0]);
    assert_eq!(currents[1], vec![1.0, 0.0, 0.0]);
    assert_eq!(currents[2], vec![0.0, 0.0, 0.0]);
    assert_eq!(currents[3], vec![0.0, 2.0, 0.0]);
    assert_eq!(currents[4], vec![0.0, 0.0, 0.0]);
}

#[test]
fn test_incoming_edges_sum() {
    let mut net = Network::new(&[1, 1, 1], 4).unwrap();
    net.connect(LayerId(2), LayerId(0), array![[1.5]], array![[2]], 1.0).unwrap();
    net.connect(LayerId(2), LayerId(1), array![[-0.25]], array![[1]], 3.0).unwrap();

    net.force_spike(LayerId(0), NeuronId(0)).unwrap();
    net.update().unwrap(); // tick 0: layer 0 fires
    net.force_spike(LayerId(1), NeuronId(0)).unwrap();
    net.update().unwrap(); // tick 1: layer 1 fires
    let report = net.update().unwrap(); // tick 2: both arrive

    assert_eq!(report.deliveries, 2);
    assert_eq!(net.layer(LayerId(2)).unwrap().synaptic_current()[0], 0.75);
}

// ═══════════════════════════════════════════════════════════
// Ordering
// ═══════════════════════════════════════════════════════════

#[test]
fn test_no_same_tick_delivery_in_either_layer_order() {
    // 0 -> 1 and 1 -> 0, both with delay 1
    let mut net = Network::new(&[1, 1], 2).unwrap();
    net.connect(LayerId(1), LayerId(0), array![[1.0]], array![[1]], 1.0).unwrap();
    net.connect(LayerId(0), LayerId(1), array![[1.0]], array![[1]], 1.0).unwrap();

    run_until(&mut net, 3);
    net.force_spike(LayerId(0), NeuronId(0)).unwrap();
    net.force_spike(LayerId(1), NeuronId(0)).unwrap();

    let report = net.update().unwrap();
    assert_eq!(report.spikes, vec![1, 1]);
    assert_eq!(report.deliveries, 0);
    assert_eq!(net.layer(LayerId(0)).unwrap().synaptic_current()[0], 0.0);
    assert_eq!(net.layer(LayerId(1)).unwrap().synaptic_current()[0], 0.0);

    let report = net.update().unwrap();
    assert_eq!(report.deliveries, 2);
    assert_eq!(net.layer(LayerId(0)).unwrap().synaptic_current()[0], 1.0);
    assert_eq!(net.layer(LayerId(1)).unwrap().synaptic_current()[0], 1.0);
}

#[test]
fn test_self_projection() {
    let mut net = Network::new(&[2], 3).unwrap();
    net.connect(LayerId(0), LayerId(0), array![[0.0, 4.0], [0.0, 0.0]], array![[1, 3], [1, 1]], 1.0)
        .unwrap();
    net.force_spike(LayerId(0), NeuronId(1)).unwrap();
    let trace = synaptic_trace(&mut net, LayerId(0), 0, 5);
    assert_eq!(trace, vec![0.0, 0.0, 0.0, 4.0, 0.0, 0.0]);
}

// ═══════════════════════════════════════════════════════════
// Delay horizon
// ═══════════════════════════════════════════════════════════

#[test]
fn test_strict_policy_rejects_delay_beyond_dmax() {
    let mut net = Network::new(&[1, 1], 3).unwrap();
    let err = net
        .connect(LayerId(1), LayerId(0), array![[1.0]], array![[4]], 1.0)
        .unwrap_err();
    assert!(matches!(err, EngineError::DelayOutOfRange { delay: 4, dmax: 3, .. }));
    assert!(err.is_configuration());

    let err = net
        .connect(LayerId(1), LayerId(0), array![[1.0]], array![[0]], 1.0)
        .unwrap_err();
    assert!(matches!(err, EngineError::DelayOutOfRange { delay: 0, .. }));
    assert!(net.layer(LayerId(1)).unwrap().incoming().is_empty());
}

#[test]
fn test_delay_overflow_is_never_delivered() {
    let settings = NetworkSettings {
        delay_policy: DelayPolicy::DropOverflow,
        ..NetworkSettings::with_dmax(5)
    };
    let mut net = Network::with_settings(&[1, 2], settings).unwrap();
    // target 0 is beyond the horizon, target 1 is not
    net.connect(LayerId(1), LayerId(0), array![[1.0], [1.0]], array![[7], [5]], 1.0)
        .unwrap();

    run_until(&mut net, 10);
    net.force_spike(LayerId(0), NeuronId(0)).unwrap();

    let mut beyond = Vec::new();
    let mut within = Vec::new();
    while net.tick() <= 30 {
        net.update().unwrap();
        let current = net.layer(LayerId(1)).unwrap().synaptic_current();
        beyond.push(current[0]);
        within.push((net.tick() - 1, current[1]));
    }

    assert!(beyond.iter().all(|&i| i == 0.0));
    let delivered: Vec<u64> = within.iter().filter(|(_, i)| *i != 0.0).map(|(t, _)| *t).collect();
    assert_eq!(delivered, vec![15]);
    assert_eq!(net.stats().deliveries, 1);
}

#[test]
fn test_ring_never_exceeds_dmax() {
    let mut net = Network::new(&[3], 4).unwrap();
    for _ in 0..20 {
        net.force_spike(LayerId(0), NeuronId(2)).unwrap();
        net.update().unwrap();
        let ring = net.layer(LayerId(0)).unwrap().recent_spikes();
        assert!(ring.len() <= 4);
        assert_eq!(ring.newest_tick(), Some(net.tick() - 1));
    }
    // history keeps every event even though the ring is bounded
    assert_eq!(net.layer(LayerId(0)).unwrap().spike_log().len(), 20);
}
