//! HTTP surface: the metrics endpoint, a landing page and a health check.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use prometheus::{CounterVec, Encoder, GaugeVec, Opts, Registry, TextEncoder};
use tower_http::trace::TraceLayer;

use crate::collector::Collector;
use crate::schema::MetricKind;
use crate::snapshot::MetricSnapshot;

#[derive(Clone)]
pub struct AppState {
    pub collector: Arc<Collector>,
    pub metrics_path: String,
}

pub fn router(collector: Arc<Collector>, metrics_path: &str) -> Router {
    let state = AppState {
        collector,
        metrics_path: metrics_path.to_string(),
    };

    let mut app = Router::new()
        .route(metrics_path, get(metrics))
        .route("/health", get(health_check));
    if metrics_path != "/" {
        app = app.route("/", get(landing_page));
    }

    app.with_state(state).layer(TraceLayer::new_for_http())
}

/// Render a snapshot in the Prometheus text format.
///
/// Each scrape gets its own registry, so families missing from the snapshot
/// are absent from the output rather than reported as zero.
pub fn render(snapshot: &MetricSnapshot) -> Result<String> {
    let registry = Registry::new();

    for (desc, observations) in snapshot.families() {
        let opts = Opts::new(desc.name.clone(), desc.help);
        match desc.kind {
            MetricKind::Gauge => {
                let family = GaugeVec::new(opts, desc.labels)
                    .with_context(|| format!("invalid gauge {}", desc.name))?;
                registry.register(Box::new(family.clone()))?;
                for obs in observations {
                    let labels: Vec<&str> = obs.label_values.iter().map(String::as_str).collect();
                    family.with_label_values(&labels).set(obs.value);
                }
            }
            MetricKind::Counter => {
                let family = CounterVec::new(opts, desc.labels)
                    .with_context(|| format!("invalid counter {}", desc.name))?;
                registry.register(Box::new(family.clone()))?;
                for obs in observations {
                    let labels: Vec<&str> = obs.label_values.iter().map(String::as_str).collect();
                    family.with_label_values(&labels).inc_by(obs.value.max(0.0));
                }
            }
        }
    }

    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&registry.gather(), &mut buffer)
        .context("failed to encode metrics")?;
    String::from_utf8(buffer).context("metrics output is not UTF-8")
}

async fn metrics(State(state): State<AppState>) -> Response {
    let snapshot = state.collector.collect().await;
    match render(&snapshot) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to render metrics: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e)).into_response()
        }
    }
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn landing_page(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html>\n<head><title>Space Engineers Exporter</title></head>\n<body>\n\
         <h1>Space Engineers Dedicated Server Exporter</h1>\n\
         <p>Version {}</p>\n<p><a href=\"{}\">Metrics</a></p>\n</body>\n</html>\n",
        env!("CARGO_PKG_VERSION"),
        state.metrics_path
    ))
}
