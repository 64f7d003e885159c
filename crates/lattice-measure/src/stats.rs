//! PortStatsCollector (spec §4.5): keeps a bounded history of port-stats
//! samples per (dpid, port_no) so BandwidthEstimator/LossEstimator can take
//! a delta against the previous sample.

use std::collections::{HashMap, VecDeque};

use lattice_common::{DatapathId, PortNo};
use lattice_openflow::PortStatsEntry;

#[derive(Debug, Clone, Copy)]
pub struct Sample {
    pub entry: PortStatsEntry,
    pub at_s: f64,
}

#[derive(Default)]
pub struct PortStatsCollector {
    history: HashMap<(DatapathId, PortNo), VecDeque<Sample>>,
    capacity: usize,
}

impl PortStatsCollector {
    pub fn new(capacity: usize) -> Self {
        PortStatsCollector {
            history: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Records a new sample. If the counters regressed against the most
    /// recent sample (a switch reset, typically), the history for that port
    /// is discarded and restarted from this sample (I3 — stale deltas must
    /// never be computed across a counter reset).
    pub fn record(&mut self, dpid: DatapathId, entry: PortStatsEntry, at_s: f64) {
        let key = (dpid, entry.port_no);
        let deque = self.history.entry(key).or_default();

        if let Some(last) = deque.back() {
            if entry.rx_bytes < last.entry.rx_bytes || entry.tx_bytes < last.entry.tx_bytes {
                tracing::debug!(?dpid, port = ?entry.port_no, "port counters regressed, resetting history");
                deque.clear();
            }
        }

        if deque.len() >= self.capacity {
            deque.pop_front();
        }
        deque.push_back(Sample { entry, at_s });
    }

    /// The two most recent samples for a port, oldest first, if at least two
    /// are available.
    pub fn last_two(&self, dpid: DatapathId, port: PortNo) -> Option<(Sample, Sample)> {
        let deque = self.history.get(&(dpid, port))?;
        let len = deque.len();
        if len < 2 {
            return None;
        }
        Some((deque[len - 2], deque[len - 1]))
    }

    pub fn latest(&self, dpid: DatapathId, port: PortNo) -> Option<Sample> {
        self.history.get(&(dpid, port))?.back().copied()
    }

    pub fn len(&self, dpid: DatapathId, port: PortNo) -> usize {
        self.history.get(&(dpid, port)).map_or(0, VecDeque::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(port: u32, rx: u64, tx: u64) -> PortStatsEntry {
        PortStatsEntry {
            port_no: port.into(),
            rx_bytes: rx,
            tx_bytes: tx,
            ..Default::default()
        }
    }

    #[test]
    fn evicts_oldest_once_capacity_reached() {
        let mut c = PortStatsCollector::new(2);
        c.record(DatapathId(1), entry(1, 100, 100), 0.0);
        c.record(DatapathId(1), entry(1, 200, 200), 1.0);
        c.record(DatapathId(1), entry(1, 300, 300), 2.0);
        assert_eq!(c.len(DatapathId(1), 1u32.into()), 2);
        let (older, newer) = c.last_two(DatapathId(1), 1u32.into()).unwrap();
        assert_eq!(older.entry.rx_bytes, 200);
        assert_eq!(newer.entry.rx_bytes, 300);
    }

    #[test]
    fn counter_regression_resets_history() {
        let mut c = PortStatsCollector::new(5);
        c.record(DatapathId(1), entry(1, 1000, 1000), 0.0);
        c.record(DatapathId(1), entry(1, 2000, 2000), 1.0);
        // switch rebooted, counters reset to near zero
        c.record(DatapathId(1), entry(1, 50, 50), 2.0);
        assert_eq!(c.len(DatapathId(1), 1u32.into()), 1);
        assert!(c.last_two(DatapathId(1), 1u32.into()).is_none());
    }

    #[test]
    fn distinct_ports_tracked_independently() {
        let mut c = PortStatsCollector::new(5);
        c.record(DatapathId(1), entry(1, 10, 10), 0.0);
        c.record(DatapathId(1), entry(2, 20, 20), 0.0);
        assert_eq!(c.len(DatapathId(1), 1u32.into()), 1);
        assert_eq!(c.len(DatapathId(1), 2u32.into()), 1);
    }
}
