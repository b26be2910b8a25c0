use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Vitals endpoints
        crate::api::handlers::vitals::classify_vital,
        crate::api::handlers::vitals::get_latest_vitals,
        crate::api::handlers::vitals::submit_reading,
        crate::api::handlers::vitals::record_live_snapshot,
        crate::api::handlers::vitals::get_vitals_history,
        crate::api::handlers::vitals::get_history_entry,
        crate::api::handlers::vitals::get_vitals_report,
        crate::api::handlers::vitals::get_daily_averages,
        crate::api::handlers::vitals::get_history_comparison,
        crate::api::handlers::vitals::get_ecg_waveform,

        // Prediction endpoints
        crate::api::handlers::predictions::predict_condition,
        crate::api::handlers::predictions::predict_latest,
        crate::api::handlers::predictions::get_condition_analysis,

        // Device endpoints
        crate::api::handlers::devices::scan_devices,
        crate::api::handlers::devices::get_connected_device,
        crate::api::handlers::devices::connect_device,
        crate::api::handlers::devices::disconnect_device
    ),
    components(
        schemas(
            // API entities
            crate::entities::common::ErrorResponse,
            crate::entities::common::HistoryPage,
            crate::entities::vitals::ClassifyRequest,
            crate::entities::vitals::ClassifyResponse,
            crate::entities::vitals::ReadingRequest,
            crate::entities::vitals::SnapshotRequest,
            crate::entities::vitals::LiveVitalsResponse,
            crate::entities::vitals::ReportResponse,
            crate::entities::vitals::PredictionResponse,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,

            // Vitals handlers
            crate::api::handlers::vitals::HistoryQueryParams,
            crate::api::handlers::vitals::PeriodQueryParams,
            crate::api::handlers::vitals::DailyAverageQueryParams,
            crate::api::handlers::vitals::EcgQueryParams,

            // Domain schemas
            vitals_guide_domain::entities::VitalType,
            vitals_guide_domain::entities::VitalStatus,
            vitals_guide_domain::entities::Vital,
            vitals_guide_domain::entities::Reading,
            vitals_guide_domain::entities::VitalsSnapshot,
            vitals_guide_domain::entities::HistoryEntry,
            vitals_guide_domain::entities::VitalAlert,
            vitals_guide_domain::entities::VitalStatistics,
            vitals_guide_domain::entities::VitalsReport,
            vitals_guide_domain::entities::DailyAverage,
            vitals_guide_domain::entities::Trend,
            vitals_guide_domain::entities::VitalChange,
            vitals_guide_domain::entities::HistoryComparison,
            vitals_guide_domain::entities::Condition,
            vitals_guide_domain::entities::PredictionResult,
            vitals_guide_domain::entities::DetailedAnalysis,
            vitals_guide_domain::device::DeviceInfo
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "vitals", description = "Live vitals, history and reports"),
        (name = "predictions", description = "Rule-based condition prediction"),
        (name = "devices", description = "Vitals device connection")
    ),
    info(
        title = "VitalsGuide API",
        version = "0.1.0",
        description = "API for monitoring vital signs, predicting conditions and reviewing history",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
