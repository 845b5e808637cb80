//! End-to-end scenarios: TOML settings -> network -> ticks -> observation.

use std::fs;

use hhnet::prelude::*;
use ndarray::{array, Array2};
use tempfile::tempdir;

fn config_from(toml_text: &str) -> SimulationConfig {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hhnet.toml");
    fs::write(&path, toml_text).unwrap();
    let config = load_config(Some(&path), None).unwrap();
    validate_config(&config).unwrap();
    config
}

#[test]
fn test_two_neuron_chain() {
    let config = config_from(
        r#"
[network]
dmax = 4

[integration]
method = "rk4"
step = 0.02
"#,
    );
    let mut net = Network::with_settings(&[1, 1], NetworkSettings::from_config(&config)).unwrap();
    net.connect(LayerId(1), LayerId(0), array![[1.0]], array![[2]], 1.0).unwrap();

    while net.tick() < 10 {
        net.update().unwrap();
    }
    net.force_spike(LayerId(0), NeuronId(0)).unwrap();

    let mut current_b = Vec::new();
    for _ in 10..=13 {
        net.update().unwrap();
        current_b.push(net.layer(LayerId(1)).unwrap().synaptic_current()[0]);
    }

    let a = net.layer(LayerId(0)).unwrap();
    assert_eq!(a.spike_log().events(), &[SpikeEvent::new(10, 0)]);
    // ticks 10, 11, 12, 13
    assert_eq!(current_b, vec![0.0, 0.0, 1.0, 0.0]);
}

#[test]
fn test_feed_forward_from_config() {
    let config = config_from(
        r#"
[network]
dmax = 3
firing_threshold = 50.0
delay_policy = "strict"

[integration]
method = "euler"
step = 0.01

[engine]
parallel_layers = true
record_history = true
"#,
    );
    assert_eq!(config.integration.method, IntegrationMethod::Euler);

    let mut net = Network::with_settings(&[3, 2], NetworkSettings::from_config(&config)).unwrap();
    assert_eq!(net.substeps(), 100);
    net.connect(LayerId(1), LayerId(0), Array2::from_elem((2, 3), 12.0), Array2::from_elem((2, 3), 1), 1.0)
        .unwrap();
    net.layer_mut(LayerId(0)).unwrap().set_external_current(&[12.0, 0.0, 0.0]).unwrap();

    net.run(60).unwrap();

    let sensor = net.layer(LayerId(0)).unwrap();
    let driven: Vec<u64> = sensor.spike_log().ticks_of(NeuronId(0)).collect();
    assert!(!driven.is_empty());
    assert_eq!(sensor.spike_log().ticks_of(NeuronId(1)).count(), 0);

    // every spike of the driven neuron shows up one tick later as 12 µA per target
    let mut probe = Network::with_settings(&[3, 2], NetworkSettings::from_config(&config)).unwrap();
    probe
        .connect(LayerId(1), LayerId(0), Array2::from_elem((2, 3), 12.0), Array2::from_elem((2, 3), 1), 1.0)
        .unwrap();
    probe.layer_mut(LayerId(0)).unwrap().set_external_current(&[12.0, 0.0, 0.0]).unwrap();
    for _ in 0..60 {
        let tick = probe.tick();
        probe.update().unwrap();
        let expected = if tick > 0 && driven.contains(&(tick - 1)) { 12.0 } else { 0.0 };
        assert_eq!(probe.layer(LayerId(1)).unwrap().synaptic_current()[0], expected, "tick {}", tick);
    }
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hhnet.toml");
    fs::write(&path, "[network]\ndmax = 0\n\n[integration]\nstep = 2.0\n").unwrap();

    let config = load_config(Some(&path), None).unwrap();
    let err = validate_config(&config).unwrap_err().to_string();
    assert!(err.contains("dmax"), "{}", err);
    assert!(err.contains("step"), "{}", err);
    assert!(Network::with_settings(&[1], NetworkSettings::from_config(&config)).is_err());
}
