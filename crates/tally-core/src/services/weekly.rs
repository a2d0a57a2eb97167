//! Weekly sleep/gym aggregates
//!
//! One value per calendar day over a short trailing window, zero-filled for
//! days without records. Unlike the Habitica chart there is no task axis.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::BTreeMap;

use crate::models::{GymRecord, SleepRecord, WeeklySeries};

pub const SLEEP_WINDOW_DAYS: i64 = 7;
/// Gym covers `now - 7 days` through today, inclusive: 8 dates
pub const GYM_LOOKBACK_DAYS: i64 = 7;

/// Zero-filled series of `days` dates starting at `start`
fn fill_days(start: NaiveDate, days: i64, values: &BTreeMap<NaiveDate, f64>) -> WeeklySeries {
    let mut series = WeeklySeries::default();
    for date in start.iter_days().take(days as usize) {
        series.dates.push(date.format("%Y-%m-%d").to_string());
        series.hours.push(values.get(&date).copied().unwrap_or(0.0));
    }
    series
}

/// First date of the sleep window ending on `today`
pub fn sleep_window_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(SLEEP_WINDOW_DAYS - 1)
}

/// Hours slept for each of the 7 days ending on `today`
pub fn weekly_sleep(records: &[SleepRecord], today: NaiveDate) -> WeeklySeries {
    let start = sleep_window_start(today);
    let values: BTreeMap<NaiveDate, f64> = records
        .iter()
        .filter(|r| r.record_date >= start && r.record_date <= today)
        .map(|r| (r.record_date, r.hours as f64))
        .collect();

    fill_days(start, SLEEP_WINDOW_DAYS, &values)
}

/// Cut-off for the gym query: sessions starting before this are ignored
pub fn gym_window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(GYM_LOOKBACK_DAYS)
}

/// Summed session hours per start date, over the 8 dates from `now - 7 days`
pub fn weekly_gym(sessions: &[GymRecord], now: DateTime<Utc>) -> WeeklySeries {
    let since = gym_window_start(now);

    let mut values: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for session in sessions.iter().filter(|s| s.start_time >= since) {
        *values.entry(session.start_time.date_naive()).or_insert(0.0) += session.duration_hours();
    }

    fill_days(since.date_naive(), GYM_LOOKBACK_DAYS + 1, &values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sleep(hours: i64, record_date: NaiveDate) -> SleepRecord {
        SleepRecord {
            id: 0,
            user_id: "u".to_string(),
            hours,
            record_date,
        }
    }

    fn session(start: DateTime<Utc>, minutes: i64) -> GymRecord {
        GymRecord {
            id: 0,
            user_id: "u".to_string(),
            start_time: start,
            end_time: start + Duration::minutes(minutes),
            exercise_title: "Lift".to_string(),
            exercise_notes: None,
        }
    }

    #[test]
    fn test_weekly_sleep_zero_fills() {
        let today = date(2024, 3, 10);
        let records = vec![sleep(8, date(2024, 3, 10)), sleep(6, date(2024, 3, 5))];

        let series = weekly_sleep(&records, today);

        assert_eq!(
            series.dates,
            vec![
                "2024-03-04", "2024-03-05", "2024-03-06", "2024-03-07", "2024-03-08",
                "2024-03-09", "2024-03-10"
            ]
        );
        assert_eq!(series.hours, vec![0.0, 6.0, 0.0, 0.0, 0.0, 0.0, 8.0]);
    }

    #[test]
    fn test_weekly_sleep_ignores_out_of_window() {
        let today = date(2024, 3, 10);
        let records = vec![sleep(9, date(2024, 3, 3)), sleep(9, date(2024, 3, 11))];

        let series = weekly_sleep(&records, today);
        assert!(series.hours.iter().all(|h| *h == 0.0));
    }

    #[test]
    fn test_weekly_gym_sums_sessions_per_day() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 18, 0, 0).unwrap();
        let sessions = vec![
            session(Utc.with_ymd_and_hms(2024, 3, 9, 7, 0, 0).unwrap(), 60),
            session(Utc.with_ymd_and_hms(2024, 3, 9, 19, 0, 0).unwrap(), 30),
            session(Utc.with_ymd_and_hms(2024, 3, 10, 7, 0, 0).unwrap(), 45),
        ];

        let series = weekly_gym(&sessions, now);

        assert_eq!(series.dates.len(), 8);
        assert_eq!(series.dates.first().unwrap(), "2024-03-03");
        assert_eq!(series.dates.last().unwrap(), "2024-03-10");
        assert_eq!(series.hours[6], 1.5);
        assert_eq!(series.hours[7], 0.75);
        assert_eq!(series.hours[0], 0.0);
    }

    #[test]
    fn test_weekly_gym_drops_sessions_before_cutoff() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 18, 0, 0).unwrap();
        // same calendar date as the first axis entry, but before the cut-off time
        let sessions = vec![session(Utc.with_ymd_and_hms(2024, 3, 3, 9, 0, 0).unwrap(), 60)];

        let series = weekly_gym(&sessions, now);
        assert_eq!(series.hours[0], 0.0);
    }
}
