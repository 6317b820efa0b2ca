//
// SPDX-License-Identifier: MIT
//

use std::time::Duration;

/// Period of unsolicited advertisements to every neighbor.
pub const UPDATE_INTERVAL: Duration = Duration::from_secs(10);

/// Silence from a neighbor after which it is declared down.
pub const TIMEOUT_INTERVAL: Duration = Duration::from_secs(30);

/// Suppression window applied to a destination after it is poisoned.
pub const HOLD_DOWN_INTERVAL: Duration = Duration::from_secs(60);

/// Unreachable-cost sentinel. Any cost at or above this value is infinite.
pub const INFINITY: f64 = 999.0;

/// Bound on the inbound datagram wait within one tick.
pub const RECV_TIMEOUT: Duration = Duration::from_secs(1);

/// End-of-tick yield, to bound busy-waiting.
pub const TICK_SLEEP: Duration = Duration::from_millis(100);
