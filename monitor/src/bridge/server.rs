use crate::bridge::model::StatusModel;
use infracore::detect::event::{DetectionEvent, Notifier};
use infracore::detect::tracker::VolcanoStatus;
use infracore::telemetry::heartbeat::CyclePulse;
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use std::thread;
use tokio::runtime::Builder;
use warp::Filter;

/// Hosts the status HTTP endpoint consumed by external monitoring. The
/// engine never depends on anyone reading it.
pub struct StatusBridge {
    state: Arc<RwLock<StatusModel>>,
}

impl StatusBridge {
    pub fn new(alarm_name: &str, bind: SocketAddr) -> Self {
        let state = Arc::new(RwLock::new(StatusModel {
            alarm_name: alarm_name.to_string(),
            ..Default::default()
        }));
        let state_for_filter = state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());

        let status_route = warp::path("status")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<RwLock<StatusModel>>| match state.read() {
                Ok(model) => warp::reply::json(&*model),
                Err(_) => warp::reply::json(&json!({ "error": "state unavailable" })),
            });

        let health_route = warp::path("healthz")
            .and(warp::get())
            .and(state_filter)
            .map(|state: Arc<RwLock<StatusModel>>| match state.read() {
                Ok(model) => warp::reply::json(&model.pulse),
                Err(_) => warp::reply::json(&json!({ "error": "state unavailable" })),
            });

        thread::spawn(move || {
            let routes = status_route.or(health_route);
            match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime.block_on(async move {
                    warp::serve(routes).run(bind).await;
                }),
                Err(err) => log::error!("status bridge runtime: {err}"),
            }
        });

        Self { state }
    }

    pub fn publish_pulse(&self, pulse: CyclePulse) {
        if let Ok(mut model) = self.state.write() {
            model.pulse = pulse;
        }
    }

    pub fn publish_volcanoes(&self, volcanoes: HashMap<String, VolcanoStatus>) {
        if let Ok(mut model) = self.state.write() {
            model.volcanoes = volcanoes;
        }
    }

    /// Notifier handle that records the most recent event on the bridge and
    /// logs its payload. Fire-and-forget from the engine's point of view.
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        Arc::new(BridgeNotifier {
            state: self.state.clone(),
        })
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> StatusModel {
        self.state.read().unwrap().clone()
    }
}

struct BridgeNotifier {
    state: Arc<RwLock<StatusModel>>,
}

impl Notifier for BridgeNotifier {
    fn notify(&self, event: &DetectionEvent) {
        log::warn!("ALARM {}", event.payload());
        if let Ok(mut model) = self.state.write() {
            model.last_event = Some(event.clone());
        }
    }
}
