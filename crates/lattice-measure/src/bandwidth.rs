//! BandwidthEstimator (spec §4.6): turns two consecutive port-stats samples
//! into a load figure and subtracts it from the port's current link speed.

use crate::stats::Sample;

/// `load_kbps` between two samples of the same port.
///
/// - A single sample (no predecessor) has no rate to report: `None`.
/// - Equal timestamps with equal byte counters: `0.0` (no traffic, no time
///   elapsed — not a division by zero, just "nothing happened").
/// - Equal timestamps with differing byte counters is a malformed pair (time
///   cannot stand still while bytes move): `None`, so the caller skips it
///   rather than fabricating an infinite rate.
pub fn load_kbps(prev: Sample, curr: Sample) -> Option<f64> {
    let dt = curr.at_s - prev.at_s;
    let bytes_delta = (curr.entry.rx_bytes + curr.entry.tx_bytes)
        .saturating_sub(prev.entry.rx_bytes + prev.entry.tx_bytes);

    if dt <= 0.0 {
        return if bytes_delta == 0 { Some(0.0) } else { None };
    }
    Some((bytes_delta as f64) * 8.0 / 1000.0 / dt)
}

/// `available_bandwidth_kbps = max(0, curr_speed_kbps - load_kbps)`,
/// per spec §4.6.
pub fn available_bandwidth_kbps(curr_speed_kbps: u64, load: f64) -> f64 {
    (curr_speed_kbps as f64 - load).max(0.0)
}
