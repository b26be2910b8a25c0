use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
};
use tracing::{info, instrument};

use vitals_guide_domain::entities::{Condition, VitalsSnapshot};

use crate::api::routes::AppState;
use crate::entities::common::{validate_request, ErrorResponse};
use crate::entities::vitals::{PredictionResponse, SnapshotRequest};

async fn predict_with_analysis(state: &AppState, snapshot: &VitalsSnapshot) -> PredictionResponse {
    let prediction = state.prediction_service.predict(snapshot).await;
    let analysis = state.prediction_service.detailed_analysis(prediction.condition);
    info!(condition = %prediction.condition, "Prediction served");
    PredictionResponse { prediction, analysis }
}

/// Predict a condition from a posted set of vitals
#[utoipa::path(
    post,
    path = "/api/v1/predictions",
    request_body = SnapshotRequest,
    responses(
        (status = 200, description = "Prediction made", body = PredictionResponse),
        (status = 400, description = "Invalid vitals", body = ErrorResponse),
    ),
    tag = "predictions"
)]
#[instrument(skip(state, request))]
pub async fn predict_condition(
    State(state): State<AppState>,
    Json(request): Json<SnapshotRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    validate_request(&request)?;
    let snapshot = request.into_snapshot()?;
    Ok(Json(predict_with_analysis(&state, &snapshot).await))
}

/// Predict a condition from the live snapshot
#[utoipa::path(
    get,
    path = "/api/v1/predictions/latest",
    responses(
        (status = 200, description = "Prediction made", body = PredictionResponse),
    ),
    tag = "predictions"
)]
#[instrument(skip(state))]
pub async fn predict_latest(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.live.current();
    Json(predict_with_analysis(&state, &snapshot).await)
}

/// Causes, tests and treatments for a condition
#[utoipa::path(
    get,
    path = "/api/v1/predictions/conditions/{condition}",
    params(
        ("condition" = Condition, Path, description = "Condition identifier, e.g. pneumonia")
    ),
    responses(
        (status = 200, description = "Condition detail", body = vitals_guide_domain::entities::DetailedAnalysis),
        (status = 400, description = "Unknown condition"),
    ),
    tag = "predictions"
)]
#[instrument(skip(state))]
pub async fn get_condition_analysis(
    State(state): State<AppState>,
    Path(condition): Path<Condition>,
) -> impl IntoResponse {
    Json(state.prediction_service.detailed_analysis(condition))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::to_bytes;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use vitals_guide_domain::device::SimulatedDevice;
    use vitals_guide_domain::services::generator::generate_vitals_snapshot;
    use vitals_guide_domain::services::{SimulationConfig, SnapshotStore, VitalsService};
    use vitals_guide_domain::testing::{MockPredictionService, MockVitalsHistoryRepository};

    fn state_with(prediction_service: Arc<MockPredictionService>) -> AppState {
        let snapshot = generate_vitals_snapshot(&mut StdRng::seed_from_u64(3));
        AppState {
            vitals_service: Arc::new(VitalsService::new(MockVitalsHistoryRepository::new())),
            prediction_service,
            device: Arc::new(SimulatedDevice::new(SimulationConfig::default())),
            live: SnapshotStore::new(snapshot),
            history_days: 7,
        }
    }

    #[tokio::test]
    async fn test_predict_latest_uses_live_snapshot() {
        let mock = Arc::new(MockPredictionService::new().with_condition(Condition::Hypoxia, 0.75));
        let state = state_with(mock.clone());
        let live = state.live.current();

        let response = predict_latest(State(state)).await.into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["prediction"]["condition"], "hypoxia");
        assert_eq!(json["prediction"]["confidence"], 0.75);
        assert_eq!(mock.calls(), vec![live.as_ref().clone()]);
    }

    #[tokio::test]
    async fn test_invalid_request_never_reaches_predictor() {
        let mock = Arc::new(MockPredictionService::new());
        let request = SnapshotRequest {
            heart_rate: 80.0,
            temperature: 60.0,
            oxygen_level: 97.0,
            timestamp: None,
        };

        let result = predict_condition(State(state_with(mock.clone())), Json(request)).await;

        assert!(result.is_err());
        assert!(mock.calls().is_empty());
    }
}
