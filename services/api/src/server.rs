use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::router;
use axum::http::HeaderValue;
use axum_prometheus::PrometheusMetricLayer;
use deep_interview::config::{AppConfig, ServerConfig};
use deep_interview::error::AppError;
use deep_interview::roster::{self, RosterError};
use deep_interview::telemetry;
use std::sync::atomic::Ordering;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let app_state = AppState::from_config(&config).with_metrics(prometheus_handle);

    let roster_path = &config.interview.roster_path;
    match roster::load_roster(roster_path, app_state.interviews.candidates()) {
        Ok(loaded) => info!(loaded, path = %roster_path.display(), "candidate roster ready"),
        Err(RosterError::NotFound(path)) => {
            warn!(path = %path.display(), "roster file missing, starting with an empty roster");
        }
        Err(err) => return Err(err.into()),
    }

    let readiness_flag = app_state.readiness.clone();
    let app = router(app_state)
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http())
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "deep interview service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if server.cors_origin == "*" {
        return layer.allow_origin(Any);
    }

    match HeaderValue::from_str(&server.cors_origin) {
        Ok(origin) => layer.allow_origin(origin),
        Err(err) => {
            warn!(origin = %server.cors_origin, error = %err, "invalid CORS origin, allowing any");
            layer.allow_origin(Any)
        }
    }
}
