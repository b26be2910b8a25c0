pub mod health;
pub mod vitals;
pub mod predictions;
pub mod devices;

// Re-export handlers for easier imports
pub use health::health_check;
pub use vitals::{
    classify_vital, get_daily_averages, get_ecg_waveform, get_history_comparison, get_history_entry,
    get_latest_vitals, get_vitals_history, get_vitals_report, record_live_snapshot, submit_reading,
};
pub use predictions::{get_condition_analysis, predict_condition, predict_latest};
pub use devices::{connect_device, disconnect_device, get_connected_device, scan_devices};
