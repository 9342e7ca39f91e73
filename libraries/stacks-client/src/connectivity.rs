//! Connectivity monitoring seam
//!
//! The retry policy consults a monitor before every attempt so that a device
//! that knows it is offline fails fast instead of burning the retry budget.
//! Platform integrations implement the trait over their reachability APIs.

use std::sync::atomic::{AtomicBool, Ordering};

/// Reports whether the device currently has network connectivity.
pub trait ConnectivityMonitor: Send + Sync {
    /// Best-effort connectivity check. Must not block.
    fn is_connected(&self) -> bool;
}

/// Monitor that always reports a live connection.
///
/// Default for platforms without a reachability API.
#[derive(Debug, Default)]
pub struct AlwaysConnected;

impl ConnectivityMonitor for AlwaysConnected {
    fn is_connected(&self) -> bool {
        true
    }
}

/// Monitor backed by an externally updated flag.
///
/// The platform layer flips the flag from its reachability callback.
#[derive(Debug)]
pub struct SharedFlagMonitor {
    connected: AtomicBool,
}

impl SharedFlagMonitor {
    /// Create a monitor with the given initial state.
    pub fn new(connected: bool) -> Self {
        Self {
            connected: AtomicBool::new(connected),
        }
    }

    /// Update the connectivity state.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Relaxed);
    }
}

impl ConnectivityMonitor for SharedFlagMonitor {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }
}
