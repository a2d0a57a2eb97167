//! Chart reconciliation
//!
//! Turns sparse Habitica observations into a dense date × task grid for the
//! charting front end. Every (date, task) pair in the window gets exactly one
//! point; missing pairs are filled with `0.0`.
//!
//! A stored value of `0` cannot be told apart from a filled gap. Callers that
//! need the distinction must look at the raw records.

use chrono::{Duration, Local, NaiveDate};

use crate::models::{ChartSeries, ChartWindow, Observation, TaskType};

const MONTH_DAYS: i64 = 30;
const YEAR_DAYS: i64 = 365;

/// Reconcile against the local calendar date
pub fn reconcile_today(
    records: &[Observation],
    task_type: Option<&TaskType>,
    window: ChartWindow,
) -> ChartSeries {
    reconcile(records, task_type, window, Local::now().date_naive())
}

/// Build a dense chart series from `records`.
///
/// `Day` covers only the latest `record_date` present in `records`, not
/// `today`. `Month` and `Year` cover `[today - N days, today)`.
pub fn reconcile(
    records: &[Observation],
    task_type: Option<&TaskType>,
    window: ChartWindow,
    today: NaiveDate,
) -> ChartSeries {
    let Some((threshold, end)) = window_bounds(records, window, today) else {
        return ChartSeries::empty();
    };

    let filtered: Vec<&Observation> = records
        .iter()
        .filter(|r| r.record_date >= threshold && r.record_date < end)
        .filter(|r| task_type.map_or(true, |t| t.matches(&r.task_type)))
        .collect();

    log::debug!(
        "Chart window {} [{} .. {}): {} of {} records",
        window.as_str(),
        threshold,
        end,
        filtered.len(),
        records.len()
    );

    if filtered.is_empty() {
        return ChartSeries::empty();
    }

    let tasks = distinct_task_names(&filtered);
    let axis = date_axis(window, threshold, end);

    let mut series = ChartSeries {
        keys: Vec::with_capacity(axis.len() * tasks.len()),
        values: Vec::with_capacity(axis.len() * tasks.len()),
        dates: Vec::with_capacity(axis.len() * tasks.len()),
    };

    for date in &axis {
        for task in &tasks {
            let value = filtered
                .iter()
                .find(|r| r.record_date == *date && r.task_name == *task)
                .map_or(0.0, |r| r.value);
            series.push(task, value, *date);
        }
    }

    series
}

/// `[threshold, end)` for the window, or `None` when there is nothing to chart
fn window_bounds(
    records: &[Observation],
    window: ChartWindow,
    today: NaiveDate,
) -> Option<(NaiveDate, NaiveDate)> {
    if records.is_empty() {
        return None;
    }

    match window {
        ChartWindow::Day => {
            let latest = records.iter().map(|r| r.record_date).max()?;
            Some((latest, latest + Duration::days(1)))
        }
        ChartWindow::Month => Some((today - Duration::days(MONTH_DAYS), today)),
        ChartWindow::Year => Some((today - Duration::days(YEAR_DAYS), today)),
    }
}

/// Task names in first-seen order
fn distinct_task_names<'a>(records: &[&'a Observation]) -> Vec<&'a str> {
    let mut names: Vec<&str> = Vec::new();
    for record in records {
        if !names.contains(&record.task_name.as_str()) {
            names.push(&record.task_name);
        }
    }
    names
}

fn date_axis(window: ChartWindow, threshold: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    match window {
        ChartWindow::Day => vec![threshold],
        _ => threshold.iter_days().take_while(|d| *d < end).collect(),
    }
}
