//! Purpose: Provide the HTTP/JSON adapter over the loaded film table.
//! Exports: `ServeConfig`, `serve`.
//! Role: Axum-based server mapping the fixed route contract onto the engine.
//! Invariants: Route paths and payload shapes match the client contract;
//! misses and invalid input are HTTP 200 payloads, never error statuses.
//! Invariants: Loopback-only unless explicitly allowed.
//! Invariants: The table is shared read-only; handlers never mutate it.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::{Path as AxumPath, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use cartelera::api::{Error, ErrorKind, Table};

use crate::reply;

#[derive(Clone, Debug)]
pub struct ServeConfig {
    pub bind: SocketAddr,
    pub allow_non_loopback: bool,
}

struct AppState {
    table: Table,
}

pub async fn serve(config: ServeConfig, table: Table) -> Result<(), Error> {
    validate_config(&config)?;

    init_tracing();

    let rows = table.len();
    let state = Arc::new(AppState { table });

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/cantidad_filmaciones_mes/:mes", get(count_by_month))
        .route("/cantidad_filmaciones_dia/:dia", get(count_by_weekday))
        .route("/score_titulo/:titulo", get(score_by_title))
        .route("/votos_titulo/:titulo", get(votes_by_title))
        .route("/get_actor/:nombre", get(actor_credits))
        .route("/get_director/:nombre", get(director_credits))
        .route("/recomendacion/:titulo", get(recommend))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to bind server")
                .with_source(err)
        })?;

    tracing::info!(bind = %config.bind, rows, "serving film catalog");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("server failed")
                .with_source(err)
        })
}

fn is_loopback(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(addr) => addr.is_loopback(),
        IpAddr::V6(addr) => addr.is_loopback(),
    }
}

fn validate_config(config: &ServeConfig) -> Result<(), Error> {
    if !is_loopback(config.bind.ip()) && !config.allow_non_loopback {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("non-loopback bind requires explicit opt-in")
            .with_hint("Re-run with --allow-non-loopback or use a loopback address."));
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        let mut signal = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("install SIGTERM handler");
        signal.recv().await;
    };
    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    #[cfg(not(unix))]
    ctrl_c.await;
}

async fn healthz() -> Response {
    Json(json!({ "ok": true })).into_response()
}

async fn count_by_month(
    State(state): State<Arc<AppState>>,
    AxumPath(mes): AxumPath<String>,
) -> Response {
    Json(reply::month_reply(&mes, state.table.count_by_month(&mes))).into_response()
}

async fn count_by_weekday(
    State(state): State<Arc<AppState>>,
    AxumPath(dia): AxumPath<String>,
) -> Response {
    Json(reply::day_reply(&dia, state.table.count_by_weekday(&dia))).into_response()
}

async fn score_by_title(
    State(state): State<Arc<AppState>>,
    AxumPath(titulo): AxumPath<String>,
) -> Response {
    Json(reply::score_reply(state.table.score_by_title(&titulo))).into_response()
}

async fn votes_by_title(
    State(state): State<Arc<AppState>>,
    AxumPath(titulo): AxumPath<String>,
) -> Response {
    Json(reply::votes_reply(&titulo, state.table.votes_by_title(&titulo))).into_response()
}

async fn actor_credits(
    State(state): State<Arc<AppState>>,
    AxumPath(nombre): AxumPath<String>,
) -> Response {
    Json(reply::actor_reply(&nombre, state.table.actor_tally(&nombre))).into_response()
}

async fn director_credits(
    State(state): State<Arc<AppState>>,
    AxumPath(nombre): AxumPath<String>,
) -> Response {
    Json(reply::director_reply(
        &nombre,
        state.table.director_credits(&nombre),
    ))
    .into_response()
}

async fn recommend(
    State(state): State<Arc<AppState>>,
    AxumPath(titulo): AxumPath<String>,
) -> Response {
    Json(reply::recommend_reply(state.table.recommend(&titulo))).into_response()
}

#[cfg(test)]
mod tests {
    use super::{validate_config, ServeConfig};
    use cartelera::api::ErrorKind;

    #[test]
    fn non_loopback_requires_allow_flag() {
        let config = ServeConfig {
            bind: "0.0.0.0:0".parse().expect("bind"),
            allow_non_loopback: false,
        };
        let err = validate_config(&config).expect_err("expected usage error");
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn non_loopback_allowed_with_opt_in() {
        let config = ServeConfig {
            bind: "0.0.0.0:0".parse().expect("bind"),
            allow_non_loopback: true,
        };
        validate_config(&config).expect("config ok");
    }

    #[test]
    fn loopback_bind_needs_no_opt_in() {
        let config = ServeConfig {
            bind: "127.0.0.1:0".parse().expect("bind"),
            allow_non_loopback: false,
        };
        validate_config(&config).expect("config ok");
    }
}
