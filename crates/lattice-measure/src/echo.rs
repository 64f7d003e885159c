//! EchoProbe (spec §4.2): controller↔switch round-trip via OpenFlow echo,
//! approximating one leg of the fused one-way delay.

use std::collections::HashMap;

use lattice_common::{DatapathId, LatticeError};

/// Width of the textual timestamp payload, matching the original's
/// `f'{time.time():.12f}'` (10 integer digits, a dot, 12 fractional digits).
const PAYLOAD_WIDTH: usize = 23;

#[derive(Default)]
pub struct EchoProbe {
    echo_delay_s: HashMap<DatapathId, f64>,
}

impl EchoProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes `now_s` as a fixed-width textual timestamp to embed in the
    /// echo request body.
    pub fn encode_payload(now_s: f64) -> Vec<u8> {
        format!("{now_s:0width$.12}", width = PAYLOAD_WIDTH)
            .into_bytes()
    }

    /// Parses an echo reply payload and records `echo_delay[dpid]`.
    pub fn on_echo_reply(
        &mut self,
        dpid: DatapathId,
        payload: &[u8],
        now_s: f64,
    ) -> Result<f64, LatticeError> {
        let text = std::str::from_utf8(payload)
            .map_err(|e| LatticeError::TransientNetwork(format!("non-utf8 echo payload: {e}")))?;
        let embedded: f64 = text
            .trim()
            .parse()
            .map_err(|e| LatticeError::TransientNetwork(format!("malformed echo payload: {e}")))?;
        let delay = (now_s - embedded).max(0.0);
        self.echo_delay_s.insert(dpid, delay);
        Ok(delay)
    }

    pub fn echo_delay(&self, dpid: DatapathId) -> Option<f64> {
        self.echo_delay_s.get(&dpid).copied()
    }
}
