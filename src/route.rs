//
// SPDX-License-Identifier: MIT
//

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::time::Instant;

use crate::consts::INFINITY;
use crate::debug::Debug;
use crate::holddown::HoldDownRegistry;

/// A distance-vector cost, saturating at [`INFINITY`].
///
/// Saturation happens at construction time so that every `Cost` in the
/// routing table already reflects "infinite or not"; callers never need to
/// re-check for overflow before comparing two costs.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Cost(f64);

impl Cost {
    pub const INFINITE: Cost = Cost(INFINITY);
    pub const ZERO: Cost = Cost(0.0);

    pub fn new(value: f64) -> Self {
        Cost(value.min(INFINITY))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    pub fn is_infinite(self) -> bool {
        self.0 >= INFINITY
    }

    pub fn saturating_add(self, other: Cost) -> Cost {
        Cost::new(self.0 + other.0)
    }
}

#[derive(Clone, Debug)]
pub struct Route {
    pub cost: Cost,
    pub next_hop: String,
}

#[derive(Debug)]
pub struct RoutingTable {
    router_id: String,
    routes: BTreeMap<String, Route>,
}

// ===== impl RoutingTable =====

impl RoutingTable {
    pub fn new(router_id: &str) -> Self {
        let mut routes = BTreeMap::new();
        routes.insert(
            router_id.to_owned(),
            Route {
                cost: Cost::ZERO,
                next_hop: router_id.to_owned(),
            },
        );
        RoutingTable {
            router_id: router_id.to_owned(),
            routes,
        }
    }

    pub fn get(&self, dest: &str) -> Option<&Route> {
        self.routes.get(dest)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Route)> {
        self.routes.iter()
    }

    /// Applies one advertised route-table-entry, per the hold-down and
    /// reverse-path gates followed by the learn / trusted-update /
    /// competing-update rules. Returns whether the table changed.
    ///
    /// The unknown-sender gate is the caller's responsibility: it operates
    /// on the whole datagram, not on a single destination.
    pub fn apply_rte(
        &mut self,
        holddown: &mut HoldDownRegistry,
        now: Instant,
        sender: &str,
        link_cost: Cost,
        dest: &str,
        advertised_cost: Cost,
        advertised_next_hop: &str,
    ) -> bool {
        // Hold-down gate.
        if holddown.is_active(dest, now) {
            return false;
        }

        // Reverse-path gate: the neighbor is handing us back a route it
        // learned from us.
        if advertised_next_hop == self.router_id {
            return false;
        }

        let new_cost = link_cost.saturating_add(advertised_cost);

        match self.routes.entry(dest.to_owned()) {
            Entry::Vacant(v) => {
                if new_cost.is_infinite() {
                    return false;
                }
                Debug::RouteCreate(dest, sender, new_cost).log();
                v.insert(Route {
                    cost: new_cost,
                    next_hop: sender.to_owned(),
                });
                true
            }
            Entry::Occupied(mut o) => {
                let route = o.get_mut();
                if route.next_hop == sender {
                    // Trusted update: the current next hop is re-advertising
                    // this destination, good news or bad.
                    if route.cost != new_cost {
                        Debug::RouteUpdate(dest, sender, new_cost).log();
                        route.cost = new_cost;
                        true
                    } else {
                        false
                    }
                } else if new_cost.get() < route.cost.get() {
                    // Competing update: only strictly-better news switches
                    // the next hop. Ties keep the incumbent for stability.
                    Debug::RouteUpdate(dest, sender, new_cost).log();
                    route.cost = new_cost;
                    route.next_hop = sender.to_owned();
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Poisons every still-reachable route whose next hop is `next_hop`.
    /// Returns the destinations that were poisoned, for hold-down
    /// installation by the caller.
    pub fn poison_via(&mut self, next_hop: &str) -> Vec<String> {
        let mut poisoned = Vec::new();
        for (dest, route) in self.routes.iter_mut() {
            if dest != &self.router_id && route.next_hop == next_hop && !route.cost.is_infinite() {
                route.cost = Cost::INFINITE;
                poisoned.push(dest.clone());
            }
        }
        for dest in &poisoned {
            Debug::RoutePoisoned(dest).log();
        }
        poisoned
    }
}
