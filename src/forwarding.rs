//
// SPDX-License-Identifier: MIT
//

use std::net::IpAddr;
use std::process::Command;

use ipnetwork::IpNetwork;
use tracing::{debug, warn};

/// Abstract forwarding-plane interface consumed by the reconciler. Both
/// operations are fire-and-forget and must tolerate an already-desired
/// state silently.
pub trait ForwardingPlane {
    fn install(&self, prefix: &IpNetwork, next_hop: IpAddr);
    fn remove(&self, prefix: &IpNetwork);
}

/// Drives the Linux `ip route` tool, mirroring the reference
/// implementation's use of `ip route replace` / `ip route del`: `replace`
/// gives us add-or-overwrite semantics for free, and a `del` of an absent
/// route is treated as an expected outcome of convergence, not an error.
pub struct SystemForwardingPlane;

impl ForwardingPlane for SystemForwardingPlane {
    fn install(&self, prefix: &IpNetwork, next_hop: IpAddr) {
        run_ip_route(&["replace", &prefix.to_string(), "via", &next_hop.to_string()]);
    }

    fn remove(&self, prefix: &IpNetwork) {
        run_ip_route(&["del", &prefix.to_string()]);
    }
}

fn run_ip_route(args: &[&str]) {
    match Command::new("ip").arg("route").args(args).output() {
        Ok(output) if output.status.success() => {
            debug!(?args, "ip route command executed");
        }
        Ok(output) => {
            // Expected during convergence: deleting a route that's already
            // gone, or similar races with a route already in place.
            debug!(
                ?args,
                stderr = %String::from_utf8_lossy(&output.stderr),
                "ip route command reported an error"
            );
        }
        Err(error) => {
            warn!(%error, "failed to invoke ip route");
        }
    }
}

/// Records issued intents instead of touching the host's forwarding table,
/// so the reconciler's diffing behavior can be asserted directly. Used by
/// both unit tests and the crate's integration tests.
#[derive(Default)]
pub struct RecordingForwardingPlane {
    pub intents: std::cell::RefCell<Vec<Intent>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Install { prefix: IpNetwork, next_hop: IpAddr },
    Remove { prefix: IpNetwork },
}

impl ForwardingPlane for RecordingForwardingPlane {
    fn install(&self, prefix: &IpNetwork, next_hop: IpAddr) {
        self.intents.borrow_mut().push(Intent::Install {
            prefix: *prefix,
            next_hop,
        });
    }

    fn remove(&self, prefix: &IpNetwork) {
        self.intents
            .borrow_mut()
            .push(Intent::Remove { prefix: *prefix });
    }
}
