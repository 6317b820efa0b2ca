//
// SPDX-License-Identifier: MIT
//

use std::fmt;
use std::net::IpAddr;

use tracing::debug;

use crate::route::Cost;

/// Loggable events raised by the core, following the same
/// enum-plus-`Display`-plus-`log()` shape used for [`crate::error::Error`].
#[derive(Debug)]
pub enum Debug<'a> {
    NeighborTimeout(&'a str),
    RouteCreate(&'a str, &'a str, Cost),
    RouteUpdate(&'a str, &'a str, Cost),
    RoutePoisoned(&'a str),
    HoldDownInstall(&'a str),
    HoldDownExpire(&'a str),
    ReconcileInstall(&'a str, IpAddr),
    ReconcileRemove(&'a str),
}

impl<'a> Debug<'a> {
    pub fn log(&self) {
        match self {
            Debug::NeighborTimeout(id) => {
                debug!(neighbor = %id, "{}", self);
            }
            Debug::RouteCreate(dest, next_hop, cost) | Debug::RouteUpdate(dest, next_hop, cost) => {
                debug!(destination = %dest, next_hop = %next_hop, cost = cost.get(), "{}", self);
            }
            Debug::RoutePoisoned(dest) => {
                debug!(destination = %dest, "{}", self);
            }
            Debug::HoldDownInstall(dest) | Debug::HoldDownExpire(dest) => {
                debug!(destination = %dest, "{}", self);
            }
            Debug::ReconcileInstall(dest, next_hop) => {
                debug!(destination = %dest, next_hop = %next_hop, "{}", self);
            }
            Debug::ReconcileRemove(dest) => {
                debug!(destination = %dest, "{}", self);
            }
        }
    }
}

impl<'a> fmt::Display for Debug<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Debug::NeighborTimeout(..) => write!(f, "neighbor timed out"),
            Debug::RouteCreate(..) => write!(f, "route created"),
            Debug::RouteUpdate(..) => write!(f, "route updated"),
            Debug::RoutePoisoned(..) => write!(f, "route poisoned"),
            Debug::HoldDownInstall(..) => write!(f, "hold-down installed"),
            Debug::HoldDownExpire(..) => write!(f, "hold-down expired"),
            Debug::ReconcileInstall(..) => write!(f, "route installed in kernel"),
            Debug::ReconcileRemove(..) => write!(f, "route removed from kernel"),
        }
    }
}
