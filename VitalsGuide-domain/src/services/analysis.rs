use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::entities::report::{
    DailyAverage, HistoryComparison, Trend, VitalChange, VitalStatistics, VitalsReport,
};
use crate::entities::vitals::{VitalType, VitalsSnapshot};

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Mean rounded to one decimal; 0 when empty
pub fn calculate_average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    round1(values.iter().sum::<f64>() / values.len() as f64)
}

/// Smallest value; 0 when empty
pub fn find_min_value(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::min).unwrap_or(0.0)
}

/// Largest value; 0 when empty
pub fn find_max_value(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

fn values_of(data: &[VitalsSnapshot], vital_type: VitalType) -> Vec<f64> {
    data.iter().map(|s| s.vital(vital_type).value()).collect()
}

/// Snapshots grouped by UTC calendar day, days in ascending order
pub fn group_by_day(data: &[VitalsSnapshot]) -> BTreeMap<NaiveDate, Vec<&VitalsSnapshot>> {
    let mut groups: BTreeMap<NaiveDate, Vec<&VitalsSnapshot>> = BTreeMap::new();
    for snapshot in data {
        groups.entry(snapshot.timestamp().date_naive()).or_default().push(snapshot);
    }
    groups
}

/// Per-day average of one vital
pub fn daily_averages(data: &[VitalsSnapshot], vital_type: VitalType) -> Vec<DailyAverage> {
    group_by_day(data)
        .into_iter()
        .map(|(date, points)| {
            let values: Vec<f64> = points.iter().map(|s| s.vital(vital_type).value()).collect();
            DailyAverage {
                date,
                value: calculate_average(&values),
            }
        })
        .collect()
}

fn assess(vital_type: VitalType, average: f64) -> &'static str {
    match vital_type {
        VitalType::HeartRate if average < 60.0 => {
            "Your average heart rate is below normal range, indicating possible bradycardia."
        }
        VitalType::HeartRate if average > 100.0 => {
            "Your average heart rate is above normal range, indicating possible tachycardia."
        }
        VitalType::HeartRate => "Your average heart rate is within normal range.",
        VitalType::Temperature if average < 36.0 => {
            "Your average body temperature is below normal range."
        }
        VitalType::Temperature if average > 37.8 => {
            "Your average body temperature is above normal range, indicating possible fever."
        }
        VitalType::Temperature => "Your average body temperature is within normal range.",
        VitalType::OxygenLevel if average < 95.0 => {
            "Your average oxygen level is below normal range, which may indicate respiratory issues."
        }
        VitalType::OxygenLevel => "Your average oxygen level is within normal range.",
    }
}

fn statistics(data: &[VitalsSnapshot], vital_type: VitalType) -> VitalStatistics {
    let values = values_of(data, vital_type);
    let average = calculate_average(&values);
    VitalStatistics {
        vital_type,
        average,
        min: find_min_value(&values),
        max: find_max_value(&values),
        assessment: assess(vital_type, average).to_string(),
    }
}

/// Recommendations driven by average vitals
pub fn generate_recommendations(heart_rate: f64, temperature: f64, oxygen_level: f64) -> Vec<String> {
    let mut recommendations: Vec<&str> = Vec::new();

    if heart_rate < 60.0 {
        recommendations.push("Consider consulting with a healthcare provider about your low heart rate.");
    } else if heart_rate > 100.0 {
        recommendations.push("Monitor your heart rate closely and consult with a healthcare provider if it remains elevated.");
        recommendations.push("Try relaxation techniques to help lower your heart rate.");
    }

    if temperature > 37.8 {
        recommendations.push("Rest and stay hydrated to help manage your elevated temperature.");
        recommendations.push("Consider taking appropriate medication to reduce fever if needed.");
        recommendations.push("Consult with a healthcare provider if your temperature remains elevated for more than 24 hours.");
    }

    if oxygen_level < 95.0 {
        recommendations.push("Monitor your oxygen levels closely.");
        recommendations.push("Practice deep breathing exercises to help improve oxygen saturation.");
        if oxygen_level < 92.0 {
            recommendations.push("Seek immediate medical attention for low oxygen levels.");
        }
    }

    if recommendations.is_empty() {
        recommendations.push("Your vital signs are within normal ranges. Continue with your current health practices.");
        recommendations.push("Maintain regular physical activity and a balanced diet.");
        recommendations.push("Ensure you're getting adequate sleep.");
    }

    recommendations.into_iter().map(String::from).collect()
}

/// Report over historical snapshots; `None` when there is no data
pub fn generate_vital_analysis(data: &[VitalsSnapshot]) -> Option<VitalsReport> {
    if data.is_empty() {
        return None;
    }

    let heart_rate = statistics(data, VitalType::HeartRate);
    let temperature = statistics(data, VitalType::Temperature);
    let oxygen_level = statistics(data, VitalType::OxygenLevel);
    let recommendations =
        generate_recommendations(heart_rate.average, temperature.average, oxygen_level.average);

    Some(VitalsReport {
        reading_count: data.len(),
        heart_rate,
        temperature,
        oxygen_level,
        recommendations,
    })
}

/// Text rendering of `generate_vital_analysis`
pub fn render_vital_analysis(data: &[VitalsSnapshot]) -> String {
    match generate_vital_analysis(data) {
        Some(report) => report.to_string(),
        None => "No data available for analysis.".to_string(),
    }
}

/// A swing of more than 5 bpm either way counts as improving; exactly 5 as worsening
fn heart_rate_trend(change: f64) -> Trend {
    if change.abs() < 5.0 {
        Trend::Stable
    } else if change < -5.0 || change > 5.0 {
        Trend::Improving
    } else {
        Trend::Worsening
    }
}

fn temperature_trend(change: f64) -> Trend {
    if change.abs() < 0.3 {
        Trend::Stable
    } else if change < 0.0 {
        Trend::Improving
    } else {
        Trend::Worsening
    }
}

fn oxygen_level_trend(change: f64) -> Trend {
    if change.abs() < 1.0 {
        Trend::Stable
    } else if change > 0.0 {
        Trend::Improving
    } else {
        Trend::Worsening
    }
}

fn change_for(current: &VitalsSnapshot, historical: &[VitalsSnapshot], vital_type: VitalType) -> VitalChange {
    let average = calculate_average(&values_of(historical, vital_type));
    let change = current.vital(vital_type).value() - average;
    let trend = match vital_type {
        VitalType::HeartRate => heart_rate_trend(change),
        VitalType::Temperature => temperature_trend(change),
        VitalType::OxygenLevel => oxygen_level_trend(change),
    };

    VitalChange {
        change: round1(change),
        trend,
    }
}

/// Compare a snapshot against historical averages
pub fn compare_with_history(current: &VitalsSnapshot, historical: &[VitalsSnapshot]) -> HistoryComparison {
    if historical.is_empty() {
        return HistoryComparison {
            heart_rate: VitalChange::stable(),
            temperature: VitalChange::stable(),
            oxygen_level: VitalChange::stable(),
        };
    }

    HistoryComparison {
        heart_rate: change_for(current, historical, VitalType::HeartRate),
        temperature: change_for(current, historical, VitalType::Temperature),
        oxygen_level: change_for(current, historical, VitalType::OxygenLevel),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    fn snapshot_at(ts: DateTime<Utc>, hr: f64, temp: f64, o2: f64) -> VitalsSnapshot {
        VitalsSnapshot::from_values(hr, temp, o2, ts).unwrap()
    }

    #[test]
    fn test_basic_statistics() {
        assert_eq!(calculate_average(&[]), 0.0);
        assert_eq!(calculate_average(&[70.0, 71.0, 73.0]), 71.3);
        assert_eq!(find_min_value(&[3.0, 1.5, 2.0]), 1.5);
        assert_eq!(find_max_value(&[3.0, 1.5, 2.0]), 3.0);
        assert_eq!(find_min_value(&[]), 0.0);
        assert_eq!(find_max_value(&[]), 0.0);
    }

    #[test]
    fn test_daily_averages() {
        let data = vec![
            snapshot_at(at(2, 8), 70.0, 36.5, 97.0),
            snapshot_at(at(1, 8), 60.0, 36.5, 97.0),
            snapshot_at(at(1, 14), 80.0, 36.5, 97.0),
        ];
        let averages = daily_averages(&data, VitalType::HeartRate);
        assert_eq!(averages.len(), 2);
        assert_eq!(averages[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(averages[0].value, 70.0);
        assert_eq!(averages[1].value, 70.0);
        assert_eq!(group_by_day(&data).values().map(Vec::len).sum::<usize>(), 3);
    }

    #[test]
    fn test_analysis_of_normal_data() {
        let data = vec![
            snapshot_at(at(1, 8), 70.0, 36.6, 97.0),
            snapshot_at(at(1, 14), 80.0, 37.0, 98.0),
        ];
        let report = generate_vital_analysis(&data).unwrap();
        assert_eq!(report.reading_count, 2);
        assert_eq!(report.heart_rate.average, 75.0);
        assert_eq!(report.heart_rate.min, 70.0);
        assert_eq!(report.oxygen_level.max, 98.0);
        assert!(report.temperature.assessment.contains("within normal range"));
        assert_eq!(report.recommendations.len(), 3);

        let text = report.to_string();
        assert!(text.contains("- Average: 75 bpm"));
        assert!(text.contains("- Range: 97 - 98%"));
    }

    #[test]
    fn test_analysis_of_empty_data() {
        assert!(generate_vital_analysis(&[]).is_none());
        assert_eq!(render_vital_analysis(&[]), "No data available for analysis.");
    }

    #[test]
    fn test_recommendations_for_abnormal_averages() {
        let recs = generate_recommendations(110.0, 38.2, 91.0);
        assert_eq!(recs.len(), 8);
        assert!(recs.last().unwrap().contains("immediate medical attention"));

        let recs = generate_recommendations(55.0, 37.0, 96.0);
        assert_eq!(recs, vec![
            "Consider consulting with a healthcare provider about your low heart rate.".to_string(),
        ]);
    }

    #[test]
    fn test_compare_with_history() {
        let history = vec![
            snapshot_at(at(1, 8), 70.0, 37.0, 96.0),
            snapshot_at(at(1, 14), 70.0, 37.0, 96.0),
        ];

        let current = snapshot_at(at(2, 8), 80.0, 37.5, 94.0);
        let comparison = compare_with_history(&current, &history);
        assert_eq!(comparison.heart_rate, VitalChange { change: 10.0, trend: Trend::Improving });
        assert_eq!(comparison.temperature, VitalChange { change: 0.5, trend: Trend::Worsening });
        assert_eq!(comparison.oxygen_level, VitalChange { change: -2.0, trend: Trend::Worsening });

        let current = snapshot_at(at(2, 8), 75.0, 36.8, 97.5);
        let comparison = compare_with_history(&current, &history);
        assert_eq!(comparison.heart_rate.trend, Trend::Worsening);
        assert_eq!(comparison.temperature.trend, Trend::Stable);
        assert_eq!(comparison.oxygen_level.trend, Trend::Improving);
    }

    #[test]
    fn test_compare_with_empty_history_is_stable() {
        let current = snapshot_at(at(2, 8), 120.0, 39.0, 90.0);
        let comparison = compare_with_history(&current, &[]);
        assert_eq!(comparison.heart_rate, VitalChange::stable());
        assert_eq!(comparison.oxygen_level.trend, Trend::Stable);
    }
}
