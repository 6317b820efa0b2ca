//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeMap;
use std::time::Instant;

use ipnetwork::IpNetwork;
use tracing::{info, warn};

use crate::config::Config;
use crate::consts::{HOLD_DOWN_INTERVAL, RECV_TIMEOUT, TIMEOUT_INTERVAL, UPDATE_INTERVAL};
use crate::forwarding::ForwardingPlane;
use crate::holddown::HoldDownRegistry;
use crate::neighbor::NeighborTable;
use crate::network::Network;
use crate::packet::{Rte, Update};
use crate::reconcile::Reconciler;
use crate::route::{Cost, RoutingTable};

/// Ties the four core components together and drives one tick of the event
/// loop per §4.5: periodic advertisement, bounded-wait receive, neighbor
/// timeout scan, and (if anything changed) reconciliation.
pub struct Instance {
    router_id: String,
    network_map: BTreeMap<String, IpNetwork>,
    neighbors: NeighborTable,
    routes: RoutingTable,
    holddown: HoldDownRegistry,
    reconciler: Reconciler,
    forwarding: Box<dyn ForwardingPlane>,
    network: Network,
    last_update_sent: Instant,
}

impl Instance {
    pub fn new(config: Config, network: Network, forwarding: Box<dyn ForwardingPlane>) -> Self {
        let neighbors = NeighborTable::build(&config.neighbors);
        let routes = RoutingTable::new(&config.router_id);

        Instance {
            router_id: config.router_id,
            network_map: config.network_map,
            neighbors,
            routes,
            holddown: HoldDownRegistry::default(),
            reconciler: Reconciler::new(),
            forwarding,
            network,
            // Mirrors the reference implementation's `last_update_sent = 0.0`:
            // the first tick always finds the interval already elapsed, so
            // the initial advertisement goes out immediately.
            last_update_sent: Instant::now() - UPDATE_INTERVAL,
        }
    }

    /// Prints the table and reconciles once before entering the loop, so
    /// the self-route and an empty kernel state start out synchronized.
    pub fn initial_sync(&mut self) {
        self.print_routing_table();
        self.reconcile();
    }

    /// Exposes the current routing table for observation by callers driving
    /// the instance directly (tests, diagnostics).
    pub fn routes(&self) -> &RoutingTable {
        &self.routes
    }

    /// One tick of the event loop (§4.5).
    pub async fn tick(&mut self) {
        let now = Instant::now();

        // Step 1: periodic update.
        if now.duration_since(self.last_update_sent) >= UPDATE_INTERVAL {
            self.send_updates().await;
            self.last_update_sent = now;
        }

        // Step 2: inbound datagram, bounded wait.
        let changed_by_rx = self.receive_update(now).await;

        // Step 3: neighbor liveness scan.
        let changed_by_timeout = self.poll_neighbor_timeouts(now);

        // Step 4: reprint + reconcile only if something moved.
        if changed_by_rx || changed_by_timeout {
            self.print_routing_table();
            self.reconcile();
        }
    }

    async fn send_updates(&mut self) {
        let ids: Vec<String> = self.neighbors.ids().cloned().collect();
        for id in ids {
            let nbr = self.neighbors.get(&id).expect("id came from the table");
            let dst = nbr.addr;

            let table = outbound_table(&self.router_id, &self.routes, &id);
            let update = Update::new(&self.router_id, table);
            if let Err(error) = self.network.send(&update.encode(), dst).await {
                // Swallowed: the next periodic tick retries naturally.
                warn!(%error, neighbor = %id, "failed to send update");
            }
        }
    }

    async fn receive_update(&mut self, now: Instant) -> bool {
        let mut buf = [0u8; 4096];
        match self.network.recv_timeout(&mut buf, RECV_TIMEOUT).await {
            None => false,
            Some(Err(_error)) => {
                // Peer reset / ICMP unreachable surfaced on the socket:
                // swallowed, the neighbor will time out on its own if down.
                false
            }
            Some(Ok((n, src))) => match Update::decode(&buf[..n]) {
                Err(error) => {
                    warn!(%error, source = %src, "received malformed update");
                    false
                }
                Ok(update) => self.process_update(update, now),
            },
        }
    }

    fn process_update(&mut self, update: Update, now: Instant) -> bool {
        if update.kind != "update" {
            // Reserved for future use; tolerated, not rejected.
            tracing::debug!(kind = %update.kind, sender = %update.sender_id, "ignoring update of unrecognized type");
        }

        // Unknown-sender gate: drop the entire datagram.
        if !self.neighbors.touch(&update.sender_id, now) {
            return false;
        }
        let link_cost = self
            .neighbors
            .get(&update.sender_id)
            .expect("touch just confirmed this sender is known")
            .link_cost;

        let mut changed = false;
        for (dest, rte) in &update.table {
            let advertised_cost = Cost::new(rte.cost);
            if self.routes.apply_rte(
                &mut self.holddown,
                now,
                &update.sender_id,
                link_cost,
                dest,
                advertised_cost,
                &rte.next_hop,
            ) {
                changed = true;
            }
        }
        changed
    }

    fn poll_neighbor_timeouts(&mut self, now: Instant) -> bool {
        let timed_out = self.neighbors.poll_timeouts(now, TIMEOUT_INTERVAL);
        let mut changed = false;
        for id in timed_out {
            let poisoned = self.routes.poison_via(&id);
            for dest in poisoned {
                self.holddown.install(&dest, now + HOLD_DOWN_INTERVAL);
                changed = true;
            }
        }
        changed
    }

    fn reconcile(&mut self) {
        self.reconciler.reconcile(
            &self.router_id,
            &self.routes,
            &self.network_map,
            &self.neighbors,
            self.forwarding.as_ref(),
        );
    }

    fn print_routing_table(&self) {
        let mut body = String::new();
        for (dest, route) in self.routes.iter() {
            if route.cost.is_infinite() {
                continue;
            }
            body.push_str(&format!(
                "\n  {:<10} cost={:<10.2} next_hop={}",
                dest,
                route.cost.get(),
                route.next_hop
            ));
        }
        if body.is_empty() {
            body.push_str("\n  (no valid routes known)");
        }
        info!(router_id = %self.router_id, at = %chrono::Local::now().format("%H:%M:%S"), "routing table:{}", body);
    }
}

/// Builds the table advertised to neighbor `neighbor_id`: every route
/// verbatim except those learned through that neighbor, which are poisoned
/// (split horizon with poisoned reverse). The self-route's `next_hop` is
/// always `router_id`, so it is never affected.
fn outbound_table(
    router_id: &str,
    routes: &RoutingTable,
    neighbor_id: &str,
) -> BTreeMap<String, Rte> {
    let mut table = BTreeMap::new();
    for (dest, route) in routes.iter() {
        let cost = if dest != router_id && route.next_hop == neighbor_id {
            Cost::INFINITE
        } else {
            route.cost
        };
        table.insert(
            dest.clone(),
            Rte {
                cost: cost.get(),
                next_hop: route.next_hop.clone(),
            },
        );
    }
    table
}
