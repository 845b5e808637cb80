//! # hhnet - Layered Hodgkin-Huxley spiking networks
//!
//! Simulates populations of Hodgkin-Huxley point neurons organised in layers
//! and wired by weighted synapses with per-synapse integer conduction delays.
//! One call to [`Network::update`](engine::Network::update) advances the
//! network by one millisecond.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! hhnet = "0.1"
//! ```
//!
//! ```rust
//! use hhnet::prelude::*;
//! use ndarray::Array2;
//!
//! // Two single-neuron layers, 0 -> 1 with a 2 ms delay
//! let mut net = Network::new(&[1, 1], 5)?;
//! net.connect(
//!     LayerId(1),
//!     LayerId(0),
//!     Array2::from_elem((1, 1), 1.0),
//!     Array2::from_elem((1, 1), 2),
//!     1.0,
//! )?;
//!
//! // Drive the first layer and run 50 ms
//! net.layer_mut(LayerId(0))?.fill_external_current(10.0)?;
//! for _ in 0..50 {
//!     net.update()?;
//! }
//! assert!(!net.layer(LayerId(0))?.spike_log().is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Configuration
//!
//! ```rust,no_run
//! use hhnet::prelude::*;
//!
//! let config = load_config(None, None)?;
//! validate_config(&config)?;
//! let _guard = hhnet::init_logging_from_config(&config, None)?;
//! let mut net = Network::with_settings(&[8, 4], NetworkSettings::from_config(&config))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: hhnet-config, hhnet-observability          │
//! │  (TOML settings, logging, debug flags)                  │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Models: hhnet-neural                                   │
//! │  (Hodgkin-Huxley, Euler / RK4 integrators, ids)         │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Engine: hhnet-engine                                   │
//! │  (Layers, delay-line delivery, tick orchestration)      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Feature Flags
//!
//! - **`std`** (default): serde support on model types
//! - **`file-logging`**: per-run log folder with a rolling file
//!
//! ## License
//!
//! Apache-2.0

pub use hhnet_config as config;
pub use hhnet_engine as engine;
pub use hhnet_neural as neural;
pub use hhnet_observability as observability;
pub use ndarray;

use std::path::PathBuf;

/// Install logging at `logging.level` from `config`, with `HHNET_DEBUG` and
/// `--debug-*` flags raising individual crates to `debug`.
pub fn init_logging_from_config(
    config: &config::SimulationConfig,
    log_dir: Option<PathBuf>,
) -> anyhow::Result<observability::LoggingGuard> {
    observability::init_logging(&observability::parse_debug_flags(), &config.logging.level, log_dir)
}

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::config::{load_config, validate_config, DelayPolicy, IntegrationMethod, SimulationConfig};
    pub use crate::engine::{
        EngineError, Layer, Network, NetworkSettings, NetworkStats, SpikeLog, SpikeRing, TickReport,
    };
    pub use crate::neural::{
        HodgkinHuxley, HodgkinHuxleyConstants, HodgkinHuxleyParameters, Integrator, LayerId,
        LayerModel, NeuronId, NeuronModel, SpikeEvent,
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_facade_imports() {
        use crate::prelude::*;
        let _layer = LayerId(0);
        let _neuron = NeuronId(0);
        assert_eq!(NetworkSettings::default().dmax, SimulationConfig::default().network.dmax);
    }
}
