//
// SPDX-License-Identifier: MIT
//

use std::collections::{BTreeMap, BTreeSet};
use std::net::IpAddr;

use ipnetwork::IpNetwork;

use crate::debug::Debug;
use crate::forwarding::ForwardingPlane;
use crate::neighbor::NeighborTable;
use crate::route::RoutingTable;

/// Shadow map of what the core has asked the operating system to install,
/// used to emit only the minimal set of install/remove intents needed to
/// converge the kernel table to the logical one.
#[derive(Debug, Default)]
pub struct Reconciler {
    installed: BTreeMap<IpNetwork, IpAddr>,
}

impl Reconciler {
    pub fn new() -> Self {
        Reconciler::default()
    }

    pub fn reconcile(
        &mut self,
        router_id: &str,
        routes: &RoutingTable,
        network_map: &BTreeMap<String, IpNetwork>,
        neighbors: &NeighborTable,
        plane: &dyn ForwardingPlane,
    ) {
        let mut reachable = BTreeSet::new();

        for (dest, route) in routes.iter() {
            if dest == router_id {
                continue;
            }
            let Some(prefix) = network_map.get(dest) else {
                continue;
            };

            if route.cost.is_infinite() {
                if self.installed.remove(prefix).is_some() {
                    Debug::ReconcileRemove(dest).log();
                    plane.remove(prefix);
                }
                continue;
            }

            let Some(nbr) = neighbors.get(&route.next_hop) else {
                continue;
            };
            let next_hop_addr = nbr.addr.ip();
            reachable.insert(*prefix);

            if self.installed.get(prefix) != Some(&next_hop_addr) {
                Debug::ReconcileInstall(dest, next_hop_addr).log();
                plane.install(prefix, next_hop_addr);
                self.installed.insert(*prefix, next_hop_addr);
            }
        }

        let stale: Vec<IpNetwork> = self
            .installed
            .keys()
            .filter(|prefix| !reachable.contains(*prefix))
            .copied()
            .collect();
        for prefix in stale {
            plane.remove(&prefix);
            self.installed.remove(&prefix);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NeighborConfig;
    use crate::forwarding::{Intent, RecordingForwardingPlane};
    use crate::route::Cost;

    fn network_map() -> BTreeMap<String, IpNetwork> {
        let mut map = BTreeMap::new();
        map.insert("r1".to_owned(), "10.0.1.0/24".parse().unwrap());
        map.insert("r2".to_owned(), "10.0.2.0/24".parse().unwrap());
        map
    }

    fn neighbors() -> NeighborTable {
        NeighborTable::build(&[NeighborConfig {
            id: "r2".to_owned(),
            ip: "10.0.0.2".parse().unwrap(),
            port: 5002,
            metrics: Default::default(),
        }])
    }

    #[test]
    fn installs_a_new_reachable_route() {
        let mut routes = RoutingTable::new("r1");
        routes.apply_rte(
            &mut Default::default(),
            std::time::Instant::now(),
            "r2",
            Cost::new(1.0),
            "r2",
            Cost::ZERO,
            "r2",
        );
        let mut reconciler = Reconciler::new();
        let plane = RecordingForwardingPlane::default();
        reconciler.reconcile("r1", &routes, &network_map(), &neighbors(), &plane);

        let intents = plane.intents.borrow();
        assert_eq!(
            *intents,
            vec![Intent::Install {
                prefix: "10.0.2.0/24".parse().unwrap(),
                next_hop: "10.0.0.2".parse().unwrap(),
            }]
        );
    }

    #[test]
    fn idempotent_on_a_second_pass_with_no_changes() {
        let mut routes = RoutingTable::new("r1");
        routes.apply_rte(
            &mut Default::default(),
            std::time::Instant::now(),
            "r2",
            Cost::new(1.0),
            "r2",
            Cost::ZERO,
            "r2",
        );
        let mut reconciler = Reconciler::new();
        let plane = RecordingForwardingPlane::default();
        reconciler.reconcile("r1", &routes, &network_map(), &neighbors(), &plane);
        plane.intents.borrow_mut().clear();

        reconciler.reconcile("r1", &routes, &network_map(), &neighbors(), &plane);
        assert!(plane.intents.borrow().is_empty());
    }

    #[test]
    fn removes_a_poisoned_route() {
        let mut routes = RoutingTable::new("r1");
        routes.apply_rte(
            &mut Default::default(),
            std::time::Instant::now(),
            "r2",
            Cost::new(1.0),
            "r2",
            Cost::ZERO,
            "r2",
        );
        let mut reconciler = Reconciler::new();
        let plane = RecordingForwardingPlane::default();
        reconciler.reconcile("r1", &routes, &network_map(), &neighbors(), &plane);
        plane.intents.borrow_mut().clear();

        routes.poison_via("r2");
        reconciler.reconcile("r1", &routes, &network_map(), &neighbors(), &plane);
        assert_eq!(
            *plane.intents.borrow(),
            vec![Intent::Remove {
                prefix: "10.0.2.0/24".parse().unwrap()
            }]
        );
    }

    #[test]
    fn tolerates_removing_an_absent_route() {
        let routes = RoutingTable::new("r1");
        let mut reconciler = Reconciler::new();
        let plane = RecordingForwardingPlane::default();
        // No routes other than self; nothing to do, no panics.
        reconciler.reconcile("r1", &routes, &network_map(), &neighbors(), &plane);
        assert!(plane.intents.borrow().is_empty());
    }
}
