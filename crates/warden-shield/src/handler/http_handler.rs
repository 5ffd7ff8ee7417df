//! HTTP routes for the shield
//!
//! | Route                 | Outcome                                          |
//! |-----------------------|--------------------------------------------------|
//! | `GET /check?id=`      | 200 found, 404 absent, 400 no id, 500/504 store  |
//! | `GET /shield`         | JSON status of gate, filter and metrics          |
//! | `POST /shield/enable` | enable the gate, returns status                  |
//! | `POST /shield/disable`| disable the gate, returns status                 |
//! | `GET /health`         | liveness                                         |

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::StoreError;
use crate::metrics::MetricsSnapshot;
use crate::ports::{KeyStore, VerdictSource};
use crate::service::AdmissionGate;

/// Query string of `/check`
#[derive(Debug, Deserialize)]
pub struct CheckParams {
    id: Option<String>,
}

/// Status document served by `/shield`
#[derive(Debug, Serialize)]
pub struct ShieldStatus {
    pub enabled: bool,
    pub size_bits: u64,
    pub hash_count: u32,
    pub expected_items: usize,
    pub elements_inserted: u64,
    pub bits_set: usize,
    pub estimated_fpr: f64,
    pub memory_bytes: usize,
    pub metrics: MetricsSnapshot,
}

impl ShieldStatus {
    fn of<S: KeyStore + ?Sized>(gate: &AdmissionGate<S>) -> Self {
        let filter = gate.filter();
        Self {
            enabled: gate.is_enabled(),
            size_bits: filter.size_bits(),
            hash_count: filter.hash_count(),
            expected_items: filter.expected_items(),
            elements_inserted: filter.elements_inserted(),
            bits_set: filter.bits_set(),
            estimated_fpr: filter.estimated_fpr(),
            memory_bytes: filter.memory_bytes(),
            metrics: gate.metrics().snapshot(),
        }
    }
}

/// Build the router serving `gate`
pub fn router<S>(gate: Arc<AdmissionGate<S>>) -> Router
where
    S: KeyStore + ?Sized + 'static,
{
    Router::new()
        .route("/check", get(check::<S>))
        .route("/shield", get(status::<S>))
        .route("/shield/enable", post(enable::<S>))
        .route("/shield/disable", post(disable::<S>))
        .route("/health", get(health))
        .with_state(gate)
}

async fn check<S>(
    State(gate): State<Arc<AdmissionGate<S>>>,
    Query(params): Query<CheckParams>,
) -> Response
where
    S: KeyStore + ?Sized + 'static,
{
    let id = match params.id.as_deref() {
        Some(id) if !id.is_empty() => id,
        _ => return (StatusCode::BAD_REQUEST, "Missing 'id' parameter").into_response(),
    };

    match gate.check(id).await {
        Ok(verdict) if verdict.exists => {
            (StatusCode::OK, format!("User {} found!", id)).into_response()
        }
        Ok(verdict) => match verdict.source {
            VerdictSource::Filter => (StatusCode::NOT_FOUND, "User not found").into_response(),
            VerdictSource::Store => {
                (StatusCode::NOT_FOUND, "User not found in DB").into_response()
            }
        },
        Err(StoreError::Timeout) => {
            (StatusCode::GATEWAY_TIMEOUT, "Database timeout").into_response()
        }
        Err(e) => {
            error!(id, error = %e, "Existence check failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Database error").into_response()
        }
    }
}

async fn status<S>(State(gate): State<Arc<AdmissionGate<S>>>) -> Json<ShieldStatus>
where
    S: KeyStore + ?Sized + 'static,
{
    Json(ShieldStatus::of(&gate))
}

async fn enable<S>(State(gate): State<Arc<AdmissionGate<S>>>) -> Json<ShieldStatus>
where
    S: KeyStore + ?Sized + 'static,
{
    gate.enable();
    Json(ShieldStatus::of(&gate))
}

async fn disable<S>(State(gate): State<Arc<AdmissionGate<S>>>) -> Json<ShieldStatus>
where
    S: KeyStore + ?Sized + 'static,
{
    gate.disable();
    Json(ShieldStatus::of(&gate))
}

async fn health() -> &'static str {
    "OK"
}
