//! lockstep REST API server.
//!
//! Provides HTTP endpoints for event-log alignment via the lockstep engine.
//!
//! Run with: `cargo run --bin lockstep-server --features server`
//!
//! Environment variables:
//! - `LOCKSTEP_PORT` - Port to listen on (default: 8080)
//! - `LOCKSTEP_HOST` - Host to bind to (default: 0.0.0.0)
//! - `LOCKSTEP_API_TOKEN` - Bearer token for authentication (optional, if set all requests require it)

use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use tempfile::NamedTempFile;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lockstep::cli::args::{Args, SeedArg};
use lockstep::cli::exit::Outcome;
use lockstep::orchestrator;

/// Server configuration from environment.
#[derive(Clone)]
struct Config {
    port: u16,
    host: String,
    api_token: Option<String>,
}

impl Config {
    fn from_env() -> Self {
        Self {
            port: std::env::var("LOCKSTEP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            host: std::env::var("LOCKSTEP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_token: std::env::var("LOCKSTEP_API_TOKEN")
                .ok()
                .filter(|s| !s.is_empty()),
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lockstep_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid address");

    if config.api_token.is_some() {
        tracing::info!("API token authentication enabled");
    } else {
        tracing::warn!("No LOCKSTEP_API_TOKEN set - API is unauthenticated");
    }

    let shared_config = Arc::new(config);

    let app = Router::new()
        .route("/health", get(health))
        .route("/align", post(align))
        .with_state(shared_config)
        .layer(DefaultBodyLimit::max(50 * 1024 * 1024)) // 50MB max
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    tracing::info!("lockstep-server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Health check endpoint.
async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

/// Align two event logs.
///
/// Accepts multipart form data with:
/// - `left`: The left event log (CSV/TSV)
/// - `right`: The right event log (CSV/TSV)
/// - `column` / `column_right`: (optional) Timestamp column names
/// - `abs_tol`, `rel_tol`: (optional) Gap tolerances
/// - `max_missing`: (optional) Missing-event budget per side
/// - `seed`: (optional) Known first correspondence as `I,J`
/// - `scale_left`, `scale_right`: (optional) Unit multipliers
///
/// Requires `Authorization: Bearer <token>` header if `LOCKSTEP_API_TOKEN` is set.
async fn align(
    State(config): State<Arc<Config>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> impl IntoResponse {
    if let Some(expected_token) = &config.api_token {
        let auth_header = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        let provided_token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .unwrap_or("");

        if provided_token != expected_token {
            return error_response(
                StatusCode::UNAUTHORIZED,
                "Invalid or missing bearer token",
            );
        }
    }

    let mut left_file: Option<NamedTempFile> = None;
    let mut right_file: Option<NamedTempFile> = None;
    let mut column: Option<String> = None;
    let mut column_right: Option<String> = None;
    let mut abs_tol: Option<f64> = None;
    let mut rel_tol: f64 = lockstep::align::DEFAULT_REL_TOL;
    let mut max_missing: Option<usize> = None;
    let mut seed: Option<SeedArg> = None;
    let mut scale_left: f64 = 1.0;
    let mut scale_right: f64 = 1.0;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "left" | "right" => {
                let data = match field.bytes().await {
                    Ok(data) => data,
                    Err(e) => {
                        return error_response(
                            StatusCode::BAD_REQUEST,
                            format!("Failed to read '{name}' file: {e}"),
                        );
                    }
                };
                let staged = match stage_upload(&data) {
                    Ok(staged) => staged,
                    Err(e) => {
                        return error_response(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            format!("Failed to stage '{name}' file: {e}"),
                        );
                    }
                };
                if name == "left" {
                    left_file = Some(staged);
                } else {
                    right_file = Some(staged);
                }
            }
            "column" => {
                if let Ok(text) = field.text().await
                    && !text.is_empty()
                {
                    column = Some(text);
                }
            }
            "column_right" => {
                if let Ok(text) = field.text().await
                    && !text.is_empty()
                {
                    column_right = Some(text);
                }
            }
            "abs_tol" => {
                if let Ok(text) = field.text().await
                    && let Ok(val) = text.parse::<f64>()
                    && val.is_finite()
                    && val >= 0.0
                {
                    abs_tol = Some(val);
                }
            }
            "rel_tol" => {
                if let Ok(text) = field.text().await
                    && let Ok(val) = text.parse::<f64>()
                    && val.is_finite()
                    && val >= 0.0
                {
                    rel_tol = val;
                }
            }
            "max_missing" => {
                if let Ok(text) = field.text().await
                    && let Ok(val) = text.parse::<usize>()
                {
                    max_missing = Some(val);
                }
            }
            "seed" => {
                if let Ok(text) = field.text().await
                    && let Some((l, r)) = text.split_once(',')
                    && let (Ok(l), Ok(r)) =
                        (l.trim().parse::<usize>(), r.trim().parse::<usize>())
                {
                    seed = Some(SeedArg { left: l, right: r });
                }
            }
            "scale_left" => {
                if let Ok(text) = field.text().await
                    && let Ok(val) = text.parse::<f64>()
                    && val.is_finite()
                    && val > 0.0
                {
                    scale_left = val;
                }
            }
            "scale_right" => {
                if let Ok(text) = field.text().await
                    && let Ok(val) = text.parse::<f64>()
                    && val.is_finite()
                    && val > 0.0
                {
                    scale_right = val;
                }
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    let left_temp = match left_file {
        Some(f) => f,
        None => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Missing required field: 'left' (event log)",
            );
        }
    };

    let right_temp = match right_file {
        Some(f) => f,
        None => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Missing required field: 'right' (event log)",
            );
        }
    };

    let args = Args {
        left: PathBuf::from(left_temp.path()),
        right: PathBuf::from(right_temp.path()),
        column,
        column_right,
        scale_left,
        scale_right,
        abs_tol,
        rel_tol,
        max_missing,
        seed,
        overrides: None,
        subject: None,
        run: None,
        delimiter: None,
        json: true, // Always return JSON from API
    };

    match orchestrator::run(&args) {
        Ok(result) => {
            let status = match result.outcome {
                Outcome::Aligned => StatusCode::OK,
                Outcome::Stalled => StatusCode::OK,
                Outcome::Refusal => StatusCode::UNPROCESSABLE_ENTITY,
            };

            match serde_json::from_str::<serde_json::Value>(&result.output) {
                Ok(json) => (status, Json(json)).into_response(),
                Err(_) => (
                    status,
                    Json(serde_json::json!({
                        "raw_output": result.output
                    })),
                )
                    .into_response(),
            }
        }
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Alignment failed: {e}"),
        ),
    }
}

fn stage_upload(data: &[u8]) -> std::io::Result<NamedTempFile> {
    let mut temp = NamedTempFile::new()?;
    temp.write_all(data)?;
    Ok(temp)
}
