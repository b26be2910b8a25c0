//! Synthetic data used to seed history and drive the demo dashboard

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::Rng;

use crate::entities::vitals::{Vital, VitalType, VitalsSnapshot};
use crate::services::analysis::round1;

/// Hours of day at which historical readings are taken
pub const HISTORY_READING_HOURS: [u32; 3] = [8, 14, 20];

fn random_value<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    round1(rng.gen_range(min..max))
}

fn snapshot_at(heart_rate: f64, temperature: f64, oxygen_level: f64, timestamp: DateTime<Utc>) -> VitalsSnapshot {
    VitalsSnapshot::new(
        Vital::classified(VitalType::HeartRate, heart_rate, timestamp),
        Vital::classified(VitalType::Temperature, temperature, timestamp),
        Vital::classified(VitalType::OxygenLevel, oxygen_level, timestamp),
    )
}

/// One random snapshot stamped now; ranges include abnormal values
pub fn generate_vitals_snapshot<R: Rng + ?Sized>(rng: &mut R) -> VitalsSnapshot {
    snapshot_at(
        random_value(rng, 55.0, 105.0),
        random_value(rng, 35.5, 38.0),
        random_value(rng, 92.0, 99.0),
        Utc::now(),
    )
}

/// Three normal-range snapshots per day for `days` days back plus today, oldest first
pub fn generate_historical_data<R: Rng + ?Sized>(
    days: u32,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<VitalsSnapshot> {
    (0..=days)
        .rev()
        .flat_map(|back| {
            let date = (now - Duration::days(i64::from(back))).date_naive();
            HISTORY_READING_HOURS
                .iter()
                .filter_map(move |hour| date.and_hms_opt(*hour, 0, 0))
                .collect::<Vec<_>>()
        })
        .map(|naive| {
            snapshot_at(
                random_value(rng, 60.0, 100.0),
                random_value(rng, 36.0, 37.5),
                random_value(rng, 94.0, 99.0),
                Utc.from_utc_datetime(&naive),
            )
        })
        .collect()
}

/// Repeating ECG-like trace with a period of 20 samples
pub fn generate_ecg_waveform(length: usize) -> Vec<f64> {
    (0..length)
        .map(|i| match i % 20 {
            0 => 5.0,
            3 => -2.0,
            4 => 20.0,
            5 => -5.0,
            7 => 3.0,
            2 | 9 => 0.0,
            _ => (i as f64 / 10.0).sin() * 0.5,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::entities::vitals::VitalStatus;

    #[test]
    fn test_snapshot_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let snapshot = generate_vitals_snapshot(&mut rng);
            assert!((55.0..=105.0).contains(&snapshot.heart_rate().value()));
            assert!((35.5..=38.0).contains(&snapshot.temperature().value()));
            assert!((92.0..=99.0).contains(&snapshot.oxygen_level().value()));
        }
    }

    #[test]
    fn test_historical_data_layout() {
        let mut rng = StdRng::seed_from_u64(1);
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let data = generate_historical_data(7, now, &mut rng);

        assert_eq!(data.len(), 24);
        assert_eq!(data[0].timestamp(), Utc.with_ymd_and_hms(2024, 3, 3, 8, 0, 0).unwrap());
        assert_eq!(data[23].timestamp(), Utc.with_ymd_and_hms(2024, 3, 10, 20, 0, 0).unwrap());
        assert!(data.windows(2).all(|w| w[0].timestamp() < w[1].timestamp()));

        // history ranges stay clear of critical thresholds
        assert!(data.iter().all(|s| s.highest_status() != VitalStatus::Critical));
    }

    #[test]
    fn test_zero_days_is_today_only() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(generate_historical_data(0, Utc::now(), &mut rng).len(), 3);
    }

    #[test]
    fn test_ecg_waveform_shape() {
        let trace = generate_ecg_waveform(100);
        assert_eq!(trace.len(), 100);
        assert_eq!(trace[4], 20.0);
        assert_eq!(trace[24], 20.0);
        assert_eq!(trace[25], -5.0);
        assert!(trace[1].abs() <= 0.5);
        assert!(generate_ecg_waveform(0).is_empty());
    }
}
