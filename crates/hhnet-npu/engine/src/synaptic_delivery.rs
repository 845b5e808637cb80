// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Delayed synaptic current assembly.
//!
//! For target layer `L` at tick `t`, every incoming edge `(L <- S)` walks the
//! source ring newest frame first. A spike of source neuron `s` at tick `t'`
//! reaches target neuron `r` only when `delays[r, s] == t - t'`, adding
//! `factor * weights[r, s]` to `r`'s synaptic current.
//!
//! Assembly only reads rings, and rings only hold frames from earlier ticks
//! when assembly runs, so a spike can never be delivered in the tick that
//! produced it. Accumulation order is fixed (edges in registration order,
//! frames newest first, source neurons ascending, target neurons ascending),
//! which keeps parallel and sequential runs bit-identical.

use std::sync::OnceLock;

use ndarray::Array1;
use tracing::trace;

use crate::layer::Layer;

/// Runtime-gated tracing config for delivery.
///
/// Enable with:
/// - `HHNET_TRACE_DELIVERY=1`
/// - optional `HHNET_TRACE_LAYER=<target layer index>`
#[derive(Debug, Clone, Copy)]
struct DeliveryTraceCfg {
    enabled: bool,
    layer_filter: Option<usize>,
}

fn delivery_trace_cfg() -> &'static DeliveryTraceCfg {
    static CFG: OnceLock<DeliveryTraceCfg> = OnceLock::new();
    CFG.get_or_init(|| {
        let enabled = std::env::var("HHNET_TRACE_DELIVERY")
            .ok()
            .as_deref()
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let layer_filter = std::env::var("HHNET_TRACE_LAYER").ok().and_then(|v| v.parse().ok());

        DeliveryTraceCfg {
            enabled,
            layer_filter,
        }
    })
}

/// Compute the synaptic current of `target` for `tick` into `acc`.
///
/// `acc` is zeroed first. Returns the number of synapse deliveries.
pub(crate) fn assemble_into(target: &Layer, layers: &[Layer], tick: u64, acc: &mut Array1<f64>) -> u64 {
    acc.fill(0.0);

    let cfg = delivery_trace_cfg();
    let trace_this = cfg.enabled && cfg.layer_filter.map_or(true, |l| l == target.id().index());

    let mut deliveries = 0u64;
    for edge in target.incoming() {
        let source = &layers[edge.source().index()];
        let factor = edge.factor();

        for (spike_tick, fired) in source.recent_spikes().frames_newest_first() {
            if spike_tick >= tick {
                continue;
            }
            let elapsed = tick - spike_tick;
            if elapsed > u64::from(edge.max_delay()) {
                break;
            }
            let elapsed = elapsed as u32;

            for &s in fired {
                let s = s as usize;
                for (r, &delay) in edge.delay_column(s).iter().enumerate() {
                    if delay != elapsed {
                        continue;
                    }
                    let contribution = factor * edge.weight(r, s);
                    acc[r] += contribution;
                    deliveries += 1;

                    if trace_this {
                        trace!(
                            target: "hhnet_engine::delivery",
                            "[DELIVER] t={} {}[{}]@{} -> {}[{}] delay={} += {}",
                            tick,
                            edge.source(),
                            s,
                            spike_tick,
                            target.id(),
                            r,
                            delay,
                            contribution
                        );
                    }
                }
            }
        }
    }
    deliveries
}
