//! LLDPDelayProbe (spec §4.3): one-way switch↔switch transit time derived
//! from relayed LLDP beacons. LLDP frame decoding itself is out of scope
//! (spec §1's "OF wire codec... echo/LLDP packet framing") — this takes the
//! already-identified `(src_dpid, src_port)` the framing service resolved
//! for a received beacon.

use std::collections::HashMap;

use lattice_common::DatapathId;
use lattice_openflow::LldpTimestamps;

#[derive(Default)]
pub struct LLDPDelayProbe {
    /// (egress dpid, receiving dpid) -> one-way transit in seconds.
    lldp_delay_s: HashMap<(DatapathId, DatapathId), f64>,
}

impl LLDPDelayProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// A beacon originally sent from `(src_dpid, src_port)` was received at
    /// `dst_dpid` at `now_s`. Looks up the embedded send-timestamp via the
    /// LLDP framing service and records the one-way delay.
    pub fn on_lldp_received(
        &mut self,
        src_dpid: DatapathId,
        src_port: lattice_common::PortNo,
        dst_dpid: DatapathId,
        now_s: f64,
        framing: &dyn LldpTimestamps,
    ) -> Option<f64> {
        let send_ts = framing.send_timestamp(src_dpid, src_port)?;
        let delay = now_s - send_ts;
        self.lldp_delay_s.insert((src_dpid, dst_dpid), delay);
        Some(delay)
    }

    pub fn delay(&self, src_dpid: DatapathId, dst_dpid: DatapathId) -> Option<f64> {
        self.lldp_delay_s.get(&(src_dpid, dst_dpid)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_openflow::fake::FakeOpenFlow;

    #[test]
    fn records_one_way_delay() {
        let fake = FakeOpenFlow::default();
        fake.set_lldp_send_timestamp(DatapathId(1), 2.into(), 100.0);
        let mut probe = LLDPDelayProbe::new();
        let delay = probe
            .on_lldp_received(DatapathId(1), 2.into(), DatapathId(2), 100.006, &fake)
            .unwrap();
        assert!((delay - 0.006).abs() < 1e-9);
        assert_eq!(probe.delay(DatapathId(1), DatapathId(2)), Some(delay));
    }

    #[test]
    fn missing_send_timestamp_yields_none() {
        let fake = FakeOpenFlow::default();
        let mut probe = LLDPDelayProbe::new();
        assert!(probe
            .on_lldp_received(DatapathId(1), 2.into(), DatapathId(2), 100.0, &fake)
            .is_none());
    }
}
