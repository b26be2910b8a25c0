use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use vitals_guide_data::repository::VitalsHistoryRepository;
use vitals_guide_domain::device::{SimulatedDevice, VitalsDevice};
use vitals_guide_domain::entities::VitalStatus;
use vitals_guide_domain::health::{HealthServiceTrait, VitalsHealthService};
use vitals_guide_domain::services::alerts::evaluate_alert;
use vitals_guide_domain::services::generator::generate_vitals_snapshot;
use vitals_guide_domain::services::{
    PredictionService, PredictionServiceTrait, SnapshotStore, VitalsService, VitalsServiceTrait,
};

use crate::api::handlers::{devices, health, predictions, vitals};
use crate::config::AppConfig;
use crate::openapi::configure_swagger_routes;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub vitals_service: Arc<dyn VitalsServiceTrait>,
    pub prediction_service: Arc<dyn PredictionServiceTrait>,
    pub device: Arc<dyn VitalsDevice>,

    /// Live snapshot fed by the connected device
    pub live: SnapshotStore,

    /// Default window for reports and comparisons
    pub history_days: u32,
}

/// Feed device readings into the live snapshot, logging anything abnormal
fn attach_live_snapshot(device: &dyn VitalsDevice, live: SnapshotStore) {
    device.on_reading(Arc::new(move |reading| {
        if let Ok(snapshot) = live.apply(&reading) {
            let alert = evaluate_alert(&snapshot);
            match alert.level {
                VitalStatus::Critical => warn!("{}", alert.message),
                VitalStatus::Warning => info!("{}", alert.message),
                VitalStatus::Normal => {}
            }
        }
    }));
}

/// Create the application router
pub async fn create_app(config: &AppConfig) -> Router {
    debug!("Creating application router");

    let repository = VitalsHistoryRepository::new();
    let vitals_service = VitalsService::new(repository.clone());
    if config.history_days > 0 {
        if let Err(e) = vitals_service.seed_history(config.history_days).await {
            error!("Failed to seed vitals history: {}", e);
        }
    }

    let live = SnapshotStore::new({
        let mut rng = rand::thread_rng();
        generate_vitals_snapshot(&mut rng)
    });

    let device: Arc<dyn VitalsDevice> = Arc::new(SimulatedDevice::new(config.simulation.clone()));
    attach_live_snapshot(device.as_ref(), live.clone());
    if config.simulation_autostart {
        match device.connect(SimulatedDevice::DEFAULT_ID).await {
            Ok(info) => info!("Simulated device {} connected at startup", info.id),
            Err(e) => error!("Failed to connect simulated device: {}", e),
        }
    }

    let health_service: Arc<dyn HealthServiceTrait> =
        Arc::new(VitalsHealthService::new(repository, device.clone()));

    let state = AppState {
        vitals_service: Arc::new(vitals_service),
        prediction_service: Arc::new(PredictionService::new(config.prediction.clone())),
        device,
        live,
        history_days: config.history_days,
    };

    let api_routes = Router::new()
        // Define specific routes before parametrized routes to avoid conflicts
        .route("/vitals/classify", post(vitals::classify_vital))
        .route("/vitals/latest", get(vitals::get_latest_vitals))
        .route("/vitals/readings", post(vitals::submit_reading))
        .route("/vitals/history", get(vitals::get_vitals_history).post(vitals::record_live_snapshot))
        .route("/vitals/history/:id", get(vitals::get_history_entry))
        .route("/vitals/report", get(vitals::get_vitals_report))
        .route("/vitals/daily-averages", get(vitals::get_daily_averages))
        .route("/vitals/comparison", get(vitals::get_history_comparison))
        .route("/vitals/ecg", get(vitals::get_ecg_waveform))
        .route("/predictions", post(predictions::predict_condition))
        .route("/predictions/latest", get(predictions::predict_latest))
        .route("/predictions/conditions/:condition", get(predictions::get_condition_analysis))
        .route("/devices", get(devices::scan_devices))
        .route("/devices/connected", get(devices::get_connected_device))
        .route("/devices/disconnect", post(devices::disconnect_device))
        .route("/devices/:id/connect", post(devices::connect_device));

    debug!("API routes configured");

    // Set up public routes that don't require any state
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .layer(Extension(health_service));

    let app = Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .with_state(state);

    debug!("API routes nested");

    // Configure the Swagger UI using the helper function
    let app = add_swagger_ui(app).layer(TraceLayer::new_for_http());

    // Initialize health check service startup time
    health::initialize_server_start_time();
    debug!("Health check service initialized");

    app
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    // Merge Swagger UI with the app router
    app.merge(configure_swagger_routes())
}
