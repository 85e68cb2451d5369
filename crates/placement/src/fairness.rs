//! Round-robin fairness culling.
//!
//! # Algorithm
//!
//! Every host carries a selection counter (unseen hosts count as zero). To
//! pick `count` hosts from a pool:
//!
//! 1. Find the minimum counter among the candidates still in play
//! 2. Take every candidate at that minimum, in pool order, until `count` is reached
//! 3. Repeat with the next tier until `count` is reached or the pool runs dry
//! 4. Bump the counter of each picked host by one; a short pick bumps nothing
//!
//! The whole read-scan-increment sequence runs under one lock, so concurrent
//! callers see a consistent table. Tie-breaks follow pool order.
//!
//! # Performance
//!
//! - **Time**: O(t * p) where t = distinct counter tiers visited, p = pool size
//! - **Space**: O(p) for the in-play markers

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use corelib::{HostId, HostRecord};
use parking_lot::Mutex;
use tracing::{error, info};

/// Selection counters shared by every placement call of one controller.
///
/// Counters only grow and only for hosts that were actually handed out. They
/// live as long as the culler; nothing is persisted.
#[derive(Debug, Default)]
pub struct RoundRobinCuller {
    counters: Mutex<HashMap<HostId, u64>>,
}

impl RoundRobinCuller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick exactly `count` least-used hosts from `candidates`.
    ///
    /// Hosts tied at the lowest counter are taken in pool order before the
    /// next tier is considered. Each picked host's counter is bumped once.
    ///
    /// # Arguments
    /// * `candidates` - The pool to pick from (duplicates fill one seat)
    /// * `count` - How many distinct hosts are needed; zero is rejected
    /// * `note` - Audit tag attached to every log line of this call
    ///
    /// # Returns
    /// `Some` with exactly `count` hosts, or `None` when the pool can't supply
    /// them. A partial team is never handed back and then nothing is counted.
    ///
    /// # Performance
    /// - **Time**: O(t * p) where t = counter tiers visited, p = pool size
    /// - **Space**: O(p)
    /// - Holds the table lock for the whole call
    pub fn cull(
        &self,
        candidates: &[Arc<HostRecord>],
        count: usize,
        note: &str,
    ) -> Option<Vec<Arc<HostRecord>>> {
        let mut counters = self.counters.lock();

        let mut in_play: Vec<Option<&Arc<HostRecord>>> = candidates.iter().map(Some).collect();
        let mut out: Vec<Arc<HostRecord>> = Vec::with_capacity(count);
        let mut picked: HashSet<HostId> = HashSet::with_capacity(count);
        let used = |id: &HostId| counters.get(id).copied().unwrap_or(0);

        while count > 0 && out.len() < count {
            let Some(min) = in_play.iter().flatten().map(|h| used(&h.id)).min() else {
                break;
            };

            for slot in in_play.iter_mut() {
                let Some(host) = *slot else { continue };
                if used(&host.id) != min {
                    continue;
                }
                *slot = None;
                // The same host listed twice still only fills one seat.
                if picked.insert(host.id) {
                    out.push(Arc::clone(host));
                    if out.len() == count {
                        break;
                    }
                }
            }
        }

        if count == 0 || out.len() != count {
            error!(
                stress_module = "roundRobin",
                note,
                count,
                actual_count = out.len(),
                "failed to build placement team"
            );
            return None;
        }

        let placement = out
            .iter()
            .map(|h| format!("{}:{}", h.name, used(&h.id)))
            .collect::<Vec<_>>()
            .join(", ");
        for host in &out {
            *counters.entry(host.id).or_insert(0) += 1;
        }
        info!(stress_module = "roundRobin", note, %placement, "successfully culled");

        Some(out)
    }

    /// Count hosts that were handed out without going through [`cull`](Self::cull).
    pub fn record(&self, hosts: &[Arc<HostRecord>]) {
        let mut counters = self.counters.lock();
        for host in hosts {
            *counters.entry(host.id).or_insert(0) += 1;
        }
    }

    /// How many times `host` has been handed out.
    pub fn selections(&self, host: HostId) -> u64 {
        self.counters.lock().get(&host).copied().unwrap_or(0)
    }

    /// Copy of the whole counter table.
    pub fn snapshot(&self) -> HashMap<HostId, u64> {
        self.counters.lock().clone()
    }
}
