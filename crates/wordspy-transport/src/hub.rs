//! Broadcast groups: the one-to-one mapping between room names and the
//! set of sockets that should see a room's snapshots.
//!
//! Every operation here is synchronous and non-blocking — sends go into
//! per-connection unbounded channels — so room actors can hand encoded
//! snapshots to the hub from inside their closures without ever awaiting.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

/// Outbound byte frames for one connection; a pump task drains the
/// receiving end into the socket.
pub type Outbound = mpsc::UnboundedSender<Vec<u8>>;

#[derive(Default)]
struct HubInner {
    conns: HashMap<String, Outbound>,
    groups: HashMap<String, HashSet<String>>,
}

/// Connection registry plus named broadcast groups, keyed by session id.
#[derive(Clone, Default)]
pub struct Hub {
    inner: Arc<Mutex<HubInner>>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HubInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Attaches a connection's outbound channel. A reconnect with the
    /// same session id replaces the previous channel.
    pub fn register(&self, session_id: &str, outbound: Outbound) {
        self.lock().conns.insert(session_id.to_string(), outbound);
    }

    /// Detaches a connection and removes it from every group.
    pub fn unregister(&self, session_id: &str) {
        let mut inner = self.lock();
        inner.conns.remove(session_id);
        inner.groups.retain(|_, members| {
            members.remove(session_id);
            !members.is_empty()
        });
    }

    /// Adds a connection to a named group.
    pub fn join(&self, group: &str, session_id: &str) {
        self.lock()
            .groups
            .entry(group.to_string())
            .or_default()
            .insert(session_id.to_string());
    }

    /// Removes a connection from a group, dropping the group when empty.
    pub fn leave(&self, group: &str, session_id: &str) {
        let mut inner = self.lock();
        if let Some(members) = inner.groups.get_mut(group) {
            members.remove(session_id);
            if members.is_empty() {
                inner.groups.remove(group);
            }
        }
    }

    /// Sends a frame to one connection. Silently drops when the
    /// connection is gone — broadcasts are best-effort.
    pub fn send_to(&self, session_id: &str, frame: Vec<u8>) {
        if let Some(outbound) = self.lock().conns.get(session_id) {
            let _ = outbound.send(frame);
        }
    }

    /// Sends a frame to every member of a group.
    pub fn broadcast(&self, group: &str, frame: &[u8]) {
        let inner = self.lock();
        let Some(members) = inner.groups.get(group) else {
            return;
        };
        for member in members {
            if let Some(outbound) = inner.conns.get(member) {
                let _ = outbound.send(frame.to_vec());
            }
        }
    }

    /// Number of members in a group.
    pub fn group_size(&self, group: &str) -> usize {
        self.lock().groups.get(group).map_or(0, HashSet::len)
    }
}
