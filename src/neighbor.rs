//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::config::NeighborConfig;
use crate::debug::Debug;
use crate::route::Cost;

/// Raw link-metric vector as configured for a neighbor. Unrecognized fields
/// are tolerated by ordinary serde behavior; only the two named metrics feed
/// the composite cost formula.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct Metrics {
    pub latency_ms: Option<f64>,
    pub bandwidth_mbps: Option<f64>,
}

impl Metrics {
    const DFLT_LATENCY_MS: f64 = 500.0;
    const DFLT_BANDWIDTH_MBPS: f64 = 1.0;

    fn latency_ms(&self) -> f64 {
        self.latency_ms.unwrap_or(Self::DFLT_LATENCY_MS)
    }

    fn bandwidth_mbps(&self) -> f64 {
        self.bandwidth_mbps.unwrap_or(Self::DFLT_BANDWIDTH_MBPS)
    }
}

#[derive(Debug)]
pub struct Neighbor {
    pub addr: SocketAddr,
    pub metrics: Metrics,
    pub link_cost: Cost,
    pub last_seen: Option<Instant>,
}

#[derive(Debug, Default)]
pub struct NeighborTable {
    neighbors: BTreeMap<String, Neighbor>,
}

// ===== impl NeighborTable =====

impl NeighborTable {
    /// Builds the table in two passes: first populate every neighbor without
    /// a cost, then derive each `link_cost` once the full table (and hence
    /// the congestion term) is stable. This keeps the composite cost
    /// independent of the order neighbors appear in configuration.
    pub fn build(configs: &[NeighborConfig]) -> Self {
        let mut neighbors = BTreeMap::new();
        for nc in configs {
            neighbors.insert(
                nc.id.clone(),
                Neighbor {
                    addr: SocketAddr::new(nc.ip, nc.port),
                    metrics: nc.metrics,
                    link_cost: Cost::ZERO,
                    last_seen: None,
                },
            );
        }

        let congestion = 0.5 * neighbors.len() as f64;
        for nbr in neighbors.values_mut() {
            let cost =
                nbr.metrics.latency_ms() + (1000.0 / nbr.metrics.bandwidth_mbps()) + congestion;
            nbr.link_cost = Cost::new(cost);
        }

        NeighborTable { neighbors }
    }

    pub fn get(&self, id: &str) -> Option<&Neighbor> {
        self.neighbors.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.neighbors.keys()
    }

    /// Records that a datagram was just received from `id`, arming its
    /// timeout afresh. Returns `false` if `id` is not a configured
    /// neighbor — the unknown-sender gate.
    pub fn touch(&mut self, id: &str, now: Instant) -> bool {
        match self.neighbors.get_mut(id) {
            Some(nbr) => {
                nbr.last_seen = Some(now);
                true
            }
            None => false,
        }
    }

    /// Scans every neighbor for silence exceeding `timeout`, returning the
    /// identifiers that just timed out. Each timed-out neighbor's
    /// `last_seen` is cleared so the timeout doesn't fire again until a
    /// fresh message arrives.
    pub fn poll_timeouts(&mut self, now: Instant, timeout: Duration) -> Vec<String> {
        let mut timed_out = Vec::new();
        for (id, nbr) in self.neighbors.iter_mut() {
            if let Some(last_seen) = nbr.last_seen {
                if now.duration_since(last_seen) > timeout {
                    timed_out.push(id.clone());
                    nbr.last_seen = None;
                }
            }
        }
        for id in &timed_out {
            Debug::NeighborTimeout(id).log();
        }
        timed_out
    }
}
