//! REST API handlers
//!
//! JSON endpoints for device registration, activation control, status
//! history and the transaction log.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use manager::{Activation, CreateDeviceRequest, DeviceView};
use shared::{Device, DeviceId, StatusChangeEvent, StoredTransaction, TransactionQuery};

use crate::error::{WebServerError, WebServerResult};
use crate::state::AppState;

/// Activation body: `{ok: true, device, process, alreadyRunning}`
#[derive(Debug, Serialize)]
pub struct ActivateResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub activation: Activation,
}

/// Deactivation body: `{ok: true, stopped, reason?}`
#[derive(Debug, Serialize)]
pub struct DeactivateResponse {
    pub ok: bool,
    pub stopped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Query string for `/api/transactions`
#[derive(Debug, Default, Deserialize)]
pub struct TransactionParams {
    pub device_id: Option<String>,
    pub event_type: Option<String>,
    pub limit: Option<usize>,
}

impl TransactionParams {
    pub fn into_query(self) -> WebServerResult<TransactionQuery> {
        let device_id = match self.device_id.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(raw) => Some(DeviceId::from_string(raw)?),
        };

        Ok(TransactionQuery {
            device_id,
            event_type: self.event_type.filter(|event_type| !event_type.is_empty()),
            limit: self.limit.unwrap_or(TransactionQuery::DEFAULT_LIMIT),
        })
    }
}

/// Path ids that do not parse name no device, so they are reported as missing
fn parse_device_id(raw: &str) -> WebServerResult<DeviceId> {
    DeviceId::from_string(raw).map_err(|_| WebServerError::NotFound {
        message: format!("Device not found: {raw}"),
    })
}

/// Health check - /health
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptime_seconds": state.uptime_seconds(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Register a device - POST /api/devices
pub async fn create_device(
    State(state): State<AppState>,
    payload: Result<Json<CreateDeviceRequest>, JsonRejection>,
) -> WebServerResult<(StatusCode, Json<Device>)> {
    let Json(request) = payload.map_err(|rejection| WebServerError::BadRequest {
        message: format!("Invalid request body: {}", rejection.body_text()),
    })?;
    let device = state.devices.create_device(request).await?;
    Ok((StatusCode::CREATED, Json(device)))
}

/// List devices newest first - GET /api/devices
pub async fn list_devices(State(state): State<AppState>) -> WebServerResult<Json<Vec<DeviceView>>> {
    Ok(Json(state.devices.list_devices().await?))
}

/// One device - GET /api/devices/:id
pub async fn get_device(State(state): State<AppState>, Path(id): Path<String>) -> WebServerResult<Json<DeviceView>> {
    let device_id = parse_device_id(&id)?;
    Ok(Json(state.devices.get_device(device_id).await?))
}

/// Start the device's worker - POST /api/devices/:id/activate
pub async fn activate_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebServerResult<Json<ActivateResponse>> {
    let device_id = parse_device_id(&id)?;
    let activation = state.devices.activate_device(device_id).await?;
    Ok(Json(ActivateResponse { ok: true, activation }))
}

/// Stop the device's worker - POST /api/devices/:id/deactivate
pub async fn deactivate_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebServerResult<Json<DeactivateResponse>> {
    let device_id = parse_device_id(&id)?;
    let deactivation = state.devices.deactivate_device(device_id).await?;
    Ok(Json(DeactivateResponse {
        ok: true,
        stopped: deactivation.stopped,
        reason: deactivation.reason,
    }))
}

/// Status transitions - GET /api/devices/:id/history
pub async fn device_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebServerResult<Json<Vec<StatusChangeEvent>>> {
    let device_id = parse_device_id(&id)?;
    Ok(Json(state.devices.history(device_id).await?))
}

/// Stored transactions newest first - GET /api/transactions
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(params): Query<TransactionParams>,
) -> WebServerResult<Json<Vec<StoredTransaction>>> {
    let query = params.into_query()?;
    Ok(Json(state.devices.list_transactions(query).await?))
}
