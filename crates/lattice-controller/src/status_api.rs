//! Read-only HTTP status surface: `GET /topology`, `/measurements`,
//! `/stable`. Operators poll this instead of reading controller logs.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::core::ControllerCore;

#[derive(Clone)]
pub struct AppState {
    pub core: Arc<Mutex<ControllerCore>>,
}

pub fn router(core: Arc<Mutex<ControllerCore>>) -> Router {
    Router::new()
        .route("/topology", get(topology))
        .route("/measurements", get(measurements))
        .route("/stable", get(stable))
        .with_state(AppState { core })
}

#[derive(Serialize)]
struct NodeView {
    dpid: String,
}

#[derive(Serialize)]
struct EdgeView {
    src: String,
    dst: String,
    src_port: u32,
    dst_port: u32,
}

#[derive(Serialize)]
struct TopologyView {
    nodes: Vec<NodeView>,
    edges: Vec<EdgeView>,
}

async fn topology(State(state): State<AppState>) -> Json<TopologyView> {
    let guard = state.core.lock().await;
    let graph = guard.tracker.graph();
    let nodes = graph.nodes().map(|d| NodeView { dpid: d.to_string() }).collect();
    let edges = graph
        .edges()
        .map(|(src, dst, data)| EdgeView {
            src: src.to_string(),
            dst: dst.to_string(),
            src_port: data.port_pair.src_port.0,
            dst_port: data.port_pair.dst_port.0,
        })
        .collect();
    Json(TopologyView { nodes, edges })
}

#[derive(Serialize)]
struct MeasurementView {
    src: String,
    dst: String,
    delay_s: f64,
    available_bandwidth_kbps: f64,
    packet_loss: f64,
}

async fn measurements(State(state): State<AppState>) -> Json<Vec<MeasurementView>> {
    let guard = state.core.lock().await;
    let graph = guard.tracker.graph();
    let views = graph
        .edges()
        .map(|(src, dst, data)| MeasurementView {
            src: src.to_string(),
            dst: dst.to_string(),
            delay_s: data.delay_s,
            available_bandwidth_kbps: data.available_bandwidth_kbps,
            packet_loss: data.packet_loss,
        })
        .collect();
    Json(views)
}

#[derive(Serialize)]
struct StableView {
    stable: bool,
}

async fn stable(State(state): State<AppState>) -> Json<StableView> {
    let guard = state.core.lock().await;
    Json(StableView { stable: guard.tracker.is_stable() })
}
