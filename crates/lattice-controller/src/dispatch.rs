//! The cooperative dispatch loop: fans incoming events into the core,
//! drives the periodic echo/stats/settle timers, and gates the measurement
//! collectors on topology stability (spec §4.10).

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, watch, Mutex};

use lattice_topology::StabilityEdge;

use crate::core::ControllerCore;
use crate::events::ControllerEvent;

const SETTLE_RECHECK_PERIOD: Duration = Duration::from_millis(500);

/// Runs until `shutdown` is signalled or `events_rx` closes. Mirrors the
/// select-loop shape of a long-lived control channel: one branch per event
/// source, no polling outside the declared timers.
pub async fn run(
    core: Arc<Mutex<ControllerCore>>,
    mut events_rx: mpsc::Receiver<ControllerEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    let start = Instant::now();
    let (echo_period, stats_period) = {
        let guard = core.lock().await;
        (guard.config().echo_period, guard.config().stats_collect_period)
    };

    let mut echo_timer = tokio::time::interval(echo_period);
    let mut stats_timer = tokio::time::interval(stats_period);
    let mut settle_timer = tokio::time::interval(SETTLE_RECHECK_PERIOD);
    let mut stable = false;

    loop {
        tokio::select! {
            event = events_rx.recv() => {
                let Some(event) = event else {
                    tracing::info!("event channel closed, dispatch loop exiting");
                    break;
                };
                let edge = {
                    let mut guard = core.lock().await;
                    handle_event(&mut guard, event, start).await
                };
                apply_edge(&core, edge, &mut stable).await;
            }

            _ = echo_timer.tick() => {
                let guard = core.lock().await;
                let now_s = start.elapsed().as_secs_f64();
                let payload = guard.echo_payload(now_s);
                for dpid in guard.registry.ids() {
                    if let Some(chan) = guard.registry.channel(dpid) {
                        if let Err(e) = chan.send_echo_request(dpid, payload.clone()).await {
                            tracing::warn!(%dpid, error = %e, "echo request failed");
                        }
                    }
                }
            }

            _ = stats_timer.tick() => {
                if !stable {
                    continue;
                }
                let mut guard = core.lock().await;
                for dpid in guard.registry.ids() {
                    if let Some(chan) = guard.registry.channel(dpid) {
                        if let Err(e) = chan.send_port_stats_request(dpid, lattice_common::PortNo::ANY).await {
                            tracing::warn!(%dpid, error = %e, "port-stats request failed");
                        }
                    }
                }
                guard.refresh_measurements();
            }

            _ = settle_timer.tick() => {
                let edge = {
                    let mut guard = core.lock().await;
                    guard.on_tick(Instant::now())
                };
                apply_edge(&core, edge, &mut stable).await;
            }

            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    tracing::info!("shutdown signal received, dispatch loop exiting");
                    break;
                }
            }
        }
    }
}

async fn handle_event(core: &mut ControllerCore, event: ControllerEvent, start: Instant) -> StabilityEdge {
    let now = Instant::now();
    let now_s = start.elapsed().as_secs_f64();
    match event {
        ControllerEvent::SwitchEnter(dpid, chan) => core.on_switch_enter(dpid, chan, now),
        ControllerEvent::SwitchLeave(dpid) => core.on_switch_leave(dpid, now),
        ControllerEvent::PortAdd(dpid, port) => core.on_port_add(dpid, port, now),
        ControllerEvent::PortDelete(dpid, port) => core.on_port_delete(dpid, port, now),
        ControllerEvent::PortModify(..) => core.on_port_modify(now),
        ControllerEvent::LinkAdd(..) | ControllerEvent::LinkDelete(..) => core.on_link_event(now),
        ControllerEvent::EchoReply(dpid, payload) => {
            core.on_echo_reply(dpid, &payload, now_s);
            StabilityEdge::None
        }
        ControllerEvent::LldpReceived { src_dpid, src_port, dst_dpid } => {
            core.on_lldp_received(src_dpid, src_port, dst_dpid, now_s);
            StabilityEdge::None
        }
        ControllerEvent::PortDescReply(dpid, descs) => {
            core.on_port_desc_reply(dpid, &descs);
            StabilityEdge::None
        }
        ControllerEvent::PortStatsReply(dpid, entries) => {
            core.on_port_stats_reply(dpid, &entries, now_s);
            StabilityEdge::None
        }
        ControllerEvent::PortStatus(dpid, status) => {
            core.on_port_status(dpid, status);
            StabilityEdge::None
        }
        ControllerEvent::PacketIn { dpid, in_port, packet } => {
            core.on_packet_in(dpid, in_port, packet).await;
            StabilityEdge::None
        }
    }
}

async fn apply_edge(core: &Arc<Mutex<ControllerCore>>, edge: StabilityEdge, stable: &mut bool) {
    match edge {
        StabilityEdge::BecameStable => {
            *stable = true;
            tracing::info!("topology stabilized, refreshing port descriptors");
            core.lock().await.refresh_port_desc().await;
        }
        StabilityEdge::BecameUnstable => {
            *stable = false;
            tracing::info!("topology destabilized, suspending measurement collectors");
        }
        StabilityEdge::None => {}
    }
}
