//! LossEstimator (spec §4.7): per-link packet loss from port counters.
//! Port-based is preferred when both link endpoints have a stats sample;
//! counter-based (drops over totals) is the fallback for a lone endpoint.

use crate::stats::Sample;

/// `loss_dir = max(0, tx_src - rx_dst) / tx_src`, 0 when `tx_src == 0`.
fn directional_loss(tx_src: u64, rx_dst: u64) -> f64 {
    if tx_src == 0 {
        return 0.0;
    }
    let lost = tx_src.saturating_sub(rx_dst);
    lost as f64 / tx_src as f64
}

/// Port-based link loss, averaging the forward and reverse directions.
/// `fwd` is the (src tx, dst rx) pair for one direction, `rev` for the
/// other.
pub fn port_based_loss(fwd: (u64, u64), rev: (u64, u64)) -> f64 {
    let loss_fwd = directional_loss(fwd.0, fwd.1);
    let loss_rev = directional_loss(rev.0, rev.1);
    (loss_fwd.abs() + loss_rev.abs()) / 2.0
}

/// Counter-based fallback from a single sample: drops over total traffic
/// including errors.
pub fn counter_based_loss(sample: &Sample) -> f64 {
    let e = &sample.entry;
    let dropped = e.rx_dropped + e.tx_dropped;
    let total = e.rx_packets + e.tx_packets + e.rx_errors + e.tx_errors;
    if total == 0 {
        return 0.0;
    }
    dropped as f64 / total as f64
}

pub struct LossEstimator;

impl LossEstimator {
    /// Prefers the port-based view when both endpoints' latest tx/rx counts
    /// are available; falls back to the single-endpoint counter-based
    /// estimate otherwise.
    pub fn estimate(
        src_latest: Option<Sample>,
        dst_latest: Option<Sample>,
    ) -> Option<f64> {
        match (src_latest, dst_latest) {
            (Some(src), Some(dst)) => Some(port_based_loss(
                (src.entry.tx_packets, dst.entry.rx_packets),
                (dst.entry.tx_packets, src.entry.rx_packets),
            )),
            (Some(s), None) | (None, Some(s)) => Some(counter_based_loss(&s)),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_openflow::PortStatsEntry;

    fn sample(tx: u64, rx: u64, rx_dropped: u64, tx_dropped: u64) -> Sample {
        Sample {
            entry: PortStatsEntry {
                tx_packets: tx,
                rx_packets: rx,
                rx_dropped,
                tx_dropped,
                ..Default::default()
            },
            at_s: 0.0,
        }
    }

    #[test]
    fn port_based_no_loss_when_all_delivered() {
        assert_eq!(port_based_loss((100, 100), (100, 100)), 0.0);
    }

    #[test]
    fn port_based_averages_both_directions() {
        // fwd: 100 sent, 90 received -> 10%; rev: 50 sent, 50 received -> 0%
        let loss = port_based_loss((100, 90), (50, 50));
        assert!((loss - 0.05).abs() < 1e-9);
    }

    #[test]
    fn port_based_zero_tx_has_no_loss() {
        assert_eq!(port_based_loss((0, 0), (0, 0)), 0.0);
    }

    #[test]
    fn counter_fallback_used_when_one_side_missing() {
        let s = sample(100, 100, 5, 0);
        let got = LossEstimator::estimate(Some(s), None).unwrap();
        assert!((got - counter_based_loss(&s)).abs() < 1e-9);
    }

    #[test]
    fn port_based_preferred_when_both_sides_present() {
        let src = sample(100, 90, 0, 0);
        let dst = sample(90, 100, 0, 0);
        let got = LossEstimator::estimate(Some(src), Some(dst)).unwrap();
        assert!((got - port_based_loss((100, 100), (90, 90))).abs() < 1e-9);
    }

    #[test]
    fn no_samples_yields_none() {
        assert!(LossEstimator::estimate(None, None).is_none());
    }
}
