use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, instrument};

use crate::api::routes::AppState;
use crate::entities::common::ErrorResponse;

/// List devices that can be connected
#[utoipa::path(
    get,
    path = "/api/v1/devices",
    responses(
        (status = 200, description = "Available devices", body = [vitals_guide_domain::device::DeviceInfo]),
    ),
    tag = "devices"
)]
#[instrument(skip(state))]
pub async fn scan_devices(State(state): State<AppState>) -> Result<impl IntoResponse, ErrorResponse> {
    let devices = state.device.scan_for_devices().await?;
    Ok(Json(devices))
}

/// Get the connected device
#[utoipa::path(
    get,
    path = "/api/v1/devices/connected",
    responses(
        (status = 200, description = "Connected device", body = vitals_guide_domain::device::DeviceInfo),
        (status = 404, description = "No device connected", body = ErrorResponse),
    ),
    tag = "devices"
)]
#[instrument(skip(state))]
pub async fn get_connected_device(State(state): State<AppState>) -> Result<impl IntoResponse, ErrorResponse> {
    Ok(Json(state.device.connected_device()?))
}

/// Connect a device and start streaming readings into the live snapshot
#[utoipa::path(
    post,
    path = "/api/v1/devices/{id}/connect",
    params(
        ("id" = String, Path, description = "Device ID as returned by the scan")
    ),
    responses(
        (status = 200, description = "Device connected", body = vitals_guide_domain::device::DeviceInfo),
        (status = 404, description = "Unknown device", body = ErrorResponse),
        (status = 409, description = "Device already connected", body = ErrorResponse),
    ),
    tag = "devices"
)]
#[instrument(skip(state))]
pub async fn connect_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let device = state.device.connect(&id).await?;
    info!("Device {} connected", device.id);
    Ok(Json(device))
}

/// Disconnect the current device. Succeeds when nothing is connected.
#[utoipa::path(
    post,
    path = "/api/v1/devices/disconnect",
    responses(
        (status = 204, description = "Device disconnected"),
    ),
    tag = "devices"
)]
#[instrument(skip(state))]
pub async fn disconnect_device(State(state): State<AppState>) -> Result<impl IntoResponse, ErrorResponse> {
    state.device.disconnect().await?;
    Ok(StatusCode::NO_CONTENT)
}
