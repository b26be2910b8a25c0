use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use vitals_guide_domain::entities::{validate_value, DailyAverage, VitalType};
use vitals_guide_domain::services::analysis::daily_averages;
use vitals_guide_domain::services::classifier::classify;
use vitals_guide_domain::services::generator::generate_ecg_waveform;

use crate::api::routes::AppState;
use crate::entities::common::{validate_request, ErrorResponse, PaginatedResponse};
use crate::entities::vitals::{
    ClassifyRequest, ClassifyResponse, LiveVitalsResponse, ReadingRequest, ReportResponse,
};

const MAX_HISTORY_LIMIT: usize = 1000;
const MAX_PERIOD_DAYS: u32 = 365;
const MAX_ECG_LENGTH: usize = 2000;

/// Query parameters for retrieving vitals history
#[derive(Debug, Deserialize, Clone, IntoParams, ToSchema)]
pub struct HistoryQueryParams {
    /// ISO 8601 start date
    pub start_date: Option<String>,

    /// ISO 8601 end date
    pub end_date: Option<String>,

    /// Maximum number of results (default: 100, max: 1000)
    pub limit: Option<usize>,

    /// Pagination offset (default: 0)
    pub offset: Option<usize>,

    /// Sort direction (asc/desc, default: desc)
    pub sort: Option<String>,
}

/// Query parameters selecting an analysis window
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct PeriodQueryParams {
    /// Analysis period in days (default: configured history window, max: 365)
    pub days: Option<u32>,
}

/// Query parameters for daily averages
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct DailyAverageQueryParams {
    /// Vital to average
    pub vital_type: VitalType,

    /// Analysis period in days (default: configured history window, max: 365)
    pub days: Option<u32>,
}

/// Query parameters for the ECG trace
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EcgQueryParams {
    /// Number of samples (default: 100, max: 2000)
    pub length: Option<usize>,
}

fn period_days(state: &AppState, days: Option<u32>) -> Result<u32, ErrorResponse> {
    match days.unwrap_or(state.history_days) {
        0 => Err(ErrorResponse::bad_request("days must be at least 1")),
        d if d > MAX_PERIOD_DAYS => Err(ErrorResponse::bad_request("days must not exceed 365")),
        d => Ok(d),
    }
}

fn parse_date(value: &str, field: &str) -> Result<DateTime<Utc>, ErrorResponse> {
    DateTime::parse_from_rfc3339(value)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|_| ErrorResponse::bad_request(&format!(
            "Invalid {} format. Use ISO 8601 (e.g. 2024-03-15T08:30:00Z)",
            field
        )))
}

/// Build the query string of a neighbouring page
fn page_link(base_url: &str, params: &HistoryQueryParams, limit: usize, offset: usize) -> String {
    let mut query_parts = Vec::new();
    if let Some(start) = &params.start_date {
        query_parts.push(format!("start_date={}", start));
    }
    if let Some(end) = &params.end_date {
        query_parts.push(format!("end_date={}", end));
    }
    query_parts.push(format!("limit={}", limit));
    query_parts.push(format!("offset={}", offset));
    if let Some(sort) = &params.sort {
        query_parts.push(format!("sort={}", sort));
    }
    format!("{}?{}", base_url, query_parts.join("&"))
}

/// Generate pagination links from the current request
fn generate_pagination_links(
    total_count: usize,
    limit: usize,
    offset: usize,
    base_url: &str,
    params: &HistoryQueryParams,
) -> (Option<String>, Option<String>) {
    let next_offset = offset.saturating_add(limit);
    let next = (limit > 0 && next_offset < total_count)
        .then(|| page_link(base_url, params, limit, next_offset));
    let previous = (offset > 0)
        .then(|| page_link(base_url, params, limit, offset.saturating_sub(limit)));
    (next, previous)
}

/// Classify a single vital value
#[utoipa::path(
    post,
    path = "/api/v1/vitals/classify",
    request_body = ClassifyRequest,
    responses(
        (status = 200, description = "Value classified", body = ClassifyResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(request))]
pub async fn classify_vital(
    Json(request): Json<ClassifyRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    validate_request(&request)?;
    let value = validate_value(request.vital_type, request.value)?;

    let response = ClassifyResponse {
        vital_type: request.vital_type,
        value,
        unit: request.vital_type.unit().to_string(),
        status: classify(request.vital_type, value),
    };
    Ok(Json(response))
}

/// Get the live snapshot with its alert summary
#[utoipa::path(
    get,
    path = "/api/v1/vitals/latest",
    responses(
        (status = 200, description = "Current vitals", body = LiveVitalsResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(state))]
pub async fn get_latest_vitals(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.live.current();
    Json(LiveVitalsResponse::from(snapshot.as_ref()))
}

/// Merge one device reading into the live snapshot
#[utoipa::path(
    post,
    path = "/api/v1/vitals/readings",
    request_body = ReadingRequest,
    responses(
        (status = 200, description = "Reading applied", body = LiveVitalsResponse),
        (status = 400, description = "Invalid reading", body = ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(state, request))]
pub async fn submit_reading(
    State(state): State<AppState>,
    Json(request): Json<ReadingRequest>,
) -> Result<impl IntoResponse, ErrorResponse> {
    validate_request(&request)?;

    let reading = request.into_reading()?;
    let snapshot = state.live.apply(&reading)?;
    Ok(Json(LiveVitalsResponse::from(snapshot.as_ref())))
}

/// Record the live snapshot into history
#[utoipa::path(
    post,
    path = "/api/v1/vitals/history",
    responses(
        (status = 201, description = "Snapshot recorded", body = vitals_guide_domain::entities::HistoryEntry),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(state))]
pub async fn record_live_snapshot(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let snapshot = state.live.current();
    let entry = state.vitals_service.record_snapshot(&snapshot).await?;
    info!("Recorded live snapshot {}", entry.id);
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Get paginated vitals history
#[utoipa::path(
    get,
    path = "/api/v1/vitals/history",
    params(HistoryQueryParams),
    responses(
        (status = 200, description = "Vitals history retrieved", body = HistoryPage),
        (status = 400, description = "Invalid query", body = ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(state))]
pub async fn get_vitals_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQueryParams>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let limit = match params.limit.unwrap_or(100) {
        0 => return Err(ErrorResponse::bad_request("limit must be at least 1")),
        l => l.min(MAX_HISTORY_LIMIT),
    };
    let offset = params.offset.unwrap_or(0);

    // Default to sorting by most recent if not specified
    let sort_desc = !matches!(params.sort.as_deref(), Some("asc"));

    let start_date = params.start_date.as_deref().map(|d| parse_date(d, "start_date")).transpose()?;
    let end_date = params.end_date.as_deref().map(|d| parse_date(d, "end_date")).transpose()?;

    let (data, total_count) = state
        .vitals_service
        .get_history(start_date, end_date, Some(limit), Some(offset), Some(sort_desc))
        .await?;

    let (next, previous) =
        generate_pagination_links(total_count, limit, offset, "/api/v1/vitals/history", &params);

    Ok(Json(PaginatedResponse {
        total_count,
        offset,
        limit,
        next,
        previous,
        data,
    }))
}

/// Get a single stored snapshot by ID
#[utoipa::path(
    get,
    path = "/api/v1/vitals/history/{id}",
    params(
        ("id" = String, Path, description = "History entry ID")
    ),
    responses(
        (status = 200, description = "History entry found", body = vitals_guide_domain::entities::HistoryEntry),
        (status = 404, description = "History entry not found", body = ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(state))]
pub async fn get_history_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let entry = state.vitals_service.get_entry(&id.to_string()).await?;
    Ok(Json(entry))
}

/// Report over recent history
#[utoipa::path(
    get,
    path = "/api/v1/vitals/report",
    params(PeriodQueryParams),
    responses(
        (status = 200, description = "Report generated", body = ReportResponse),
        (status = 422, description = "No history in the period", body = ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(state))]
pub async fn get_vitals_report(
    State(state): State<AppState>,
    Query(params): Query<PeriodQueryParams>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let days = period_days(&state, params.days)?;
    let report = state.vitals_service.get_report(days).await?;

    Ok(Json(ReportResponse {
        period_days: days,
        summary: report.to_string(),
        report,
    }))
}

/// Daily averages of one vital over recent history
#[utoipa::path(
    get,
    path = "/api/v1/vitals/daily-averages",
    params(DailyAverageQueryParams),
    responses(
        (status = 200, description = "Daily averages, oldest day first", body = [DailyAverage]),
        (status = 400, description = "Invalid query", body = ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(state))]
pub async fn get_daily_averages(
    State(state): State<AppState>,
    Query(params): Query<DailyAverageQueryParams>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let days = period_days(&state, params.days)?;
    let snapshots = state.vitals_service.get_recent_snapshots(days).await?;
    let averages: Vec<DailyAverage> = daily_averages(&snapshots, params.vital_type);
    Ok(Json(averages))
}

/// Compare the live snapshot with recent history
#[utoipa::path(
    get,
    path = "/api/v1/vitals/comparison",
    params(PeriodQueryParams),
    responses(
        (status = 200, description = "Comparison against historical averages", body = vitals_guide_domain::entities::HistoryComparison),
        (status = 400, description = "Invalid query", body = ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(state))]
pub async fn get_history_comparison(
    State(state): State<AppState>,
    Query(params): Query<PeriodQueryParams>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let days = period_days(&state, params.days)?;
    let current = state.live.current();
    let comparison = state.vitals_service.compare_with_history(&current, days).await?;
    Ok(Json(comparison))
}

/// Synthetic ECG trace for the heart rate chart
#[utoipa::path(
    get,
    path = "/api/v1/vitals/ecg",
    params(EcgQueryParams),
    responses(
        (status = 200, description = "ECG samples", body = [f64]),
    ),
    tag = "vitals"
)]
#[instrument]
pub async fn get_ecg_waveform(Query(params): Query<EcgQueryParams>) -> impl IntoResponse {
    let length = params.length.unwrap_or(100).min(MAX_ECG_LENGTH);
    Json(generate_ecg_waveform(length))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> HistoryQueryParams {
        HistoryQueryParams {
            start_date: None,
            end_date: None,
            limit: None,
            offset: None,
            sort: Some("asc".to_string()),
        }
    }

    #[test]
    fn test_pagination_links() {
        let (next, previous) = generate_pagination_links(25, 10, 10, "/h", &params());
        assert_eq!(next.as_deref(), Some("/h?limit=10&offset=20&sort=asc"));
        assert_eq!(previous.as_deref(), Some("/h?limit=10&offset=0&sort=asc"));

        let (next, previous) = generate_pagination_links(5, 10, 0, "/h", &params());
        assert!(next.is_none());
        assert!(previous.is_none());
    }

    #[test]
    fn test_pagination_links_at_the_edges() {
        let (next, previous) = generate_pagination_links(25, 10, usize::MAX, "/h", &params());
        assert!(next.is_none());
        assert_eq!(
            previous.as_deref(),
            Some(format!("/h?limit=10&offset={}&sort=asc", usize::MAX - 10).as_str())
        );

        let (next, _) = generate_pagination_links(25, 0, 0, "/h", &params());
        assert!(next.is_none());
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2024-03-15T08:30:00Z", "start_date").is_ok());
        let err = parse_date("yesterday", "start_date").unwrap_err();
        assert!(err.message.contains("start_date"));
    }
}
