use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::calendar::{dates_in_range, format_local_date, Period};
use crate::models::DayRecord;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalEntry {
    pub date: String,
    pub content: String,
}

/// Aggregated statistics for one period.
///
/// `dates` carries one `MM-DD` label per day of the period; the metric
/// series are aligned to it, with `None` marking days where the metric was
/// not recorded, so charts keep their x-axis even across gaps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodSummary {
    pub period_index: u32,
    pub start_date: String,
    pub end_date: String,
    pub dates: Vec<String>,
    pub mood_histogram: [u32; 5],
    pub emotion_frequency: BTreeMap<String, u32>,
    pub average_sleep: Option<f64>,
    pub total_exercise_minutes: u32,
    pub total_reading_minutes: u32,
    pub total_wealth_delta: f64,
    pub sleep_series: Vec<Option<f64>>,
    pub exercise_series: Vec<Option<u32>>,
    pub reading_series: Vec<Option<u32>>,
    pub custom_activity_frequency: BTreeMap<String, u32>,
    pub journal_entries: Vec<JournalEntry>,
    pub has_any_data: bool,
}

/// Rolls the period's day records up into a [`PeriodSummary`].
///
/// Walks every date in the inclusive period range. Absent records and
/// records with nothing meaningful set contribute nothing to the aggregates
/// but still emit a `None` point in every series. Sleep averages over the
/// days it was recorded; exercise, reading and wealth sum with missing
/// treated as zero.
pub fn summarize(period: &Period, day_records: &BTreeMap<String, DayRecord>) -> PeriodSummary {
    let dates = dates_in_range(period.start_date, period.end_date);

    let mut summary = PeriodSummary {
        period_index: period.index,
        start_date: format_local_date(period.start_date),
        end_date: format_local_date(period.end_date),
        dates: dates
            .iter()
            .map(|date| format_local_date(*date)[5..].to_string())
            .collect(),
        mood_histogram: [0; 5],
        emotion_frequency: BTreeMap::new(),
        average_sleep: None,
        total_exercise_minutes: 0,
        total_reading_minutes: 0,
        total_wealth_delta: 0.0,
        sleep_series: Vec::with_capacity(dates.len()),
        exercise_series: Vec::with_capacity(dates.len()),
        reading_series: Vec::with_capacity(dates.len()),
        custom_activity_frequency: BTreeMap::new(),
        journal_entries: Vec::new(),
        has_any_data: false,
    };

    let mut sleep_total = 0.0;
    let mut sleep_days = 0u32;

    for date in &dates {
        let key = format_local_date(*date);
        let record = day_records.get(&key).filter(|record| !record.is_empty());

        let Some(record) = record else {
            summary.sleep_series.push(None);
            summary.exercise_series.push(None);
            summary.reading_series.push(None);
            continue;
        };

        summary.has_any_data = true;

        if let Some(mood) = record.mood {
            if (1..=5).contains(&mood) {
                summary.mood_histogram[mood as usize - 1] += 1;
            }
        }

        for tag in &record.emotions {
            *summary.emotion_frequency.entry(tag.clone()).or_insert(0) += 1;
        }

        for activity in &record.custom_activities {
            *summary
                .custom_activity_frequency
                .entry(activity.name.clone())
                .or_insert(0) += 1;
        }

        if !record.journal.is_empty() {
            summary.journal_entries.push(JournalEntry {
                date: key,
                content: record.journal.clone(),
            });
        }

        let metrics = record.metrics.as_ref();

        let sleep = metrics.map(|m| m.sleep_hours).filter(|&hours| hours > 0.0);
        if let Some(hours) = sleep {
            sleep_total += hours;
            sleep_days += 1;
        }
        summary.sleep_series.push(sleep);

        let exercise = metrics
            .map(|m| m.exercise_minutes)
            .filter(|&minutes| minutes > 0);
        summary.total_exercise_minutes += exercise.unwrap_or(0);
        summary.exercise_series.push(exercise);

        let reading = metrics
            .map(|m| m.reading_minutes)
            .filter(|&minutes| minutes > 0);
        summary.total_reading_minutes += reading.unwrap_or(0);
        summary.reading_series.push(reading);

        summary.total_wealth_delta += metrics.map(|m| m.wealth_delta).unwrap_or(0.0);
    }

    if sleep_days > 0 {
        summary.average_sleep = Some(sleep_total / sleep_days as f64);
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::compute_periods;
    use crate::models::{CustomActivity, Metrics};

    fn periods() -> Vec<Period> {
        compute_periods(2026, 36, 10)
    }

    fn day(journal: &str) -> DayRecord {
        DayRecord {
            journal: journal.to_string(),
            ..DayRecord::default()
        }
    }

    #[test]
    fn empty_period_has_no_data_and_zeroed_aggregates() {
        let periods = periods();
        let summary = summarize(&periods[0], &BTreeMap::new());

        assert!(!summary.has_any_data);
        assert_eq!(summary.mood_histogram, [0; 5]);
        assert!(summary.emotion_frequency.is_empty());
        assert_eq!(summary.average_sleep, None);
        assert_eq!(summary.total_exercise_minutes, 0);
        assert_eq!(summary.total_reading_minutes, 0);
        assert_eq!(summary.total_wealth_delta, 0.0);
        assert!(summary.journal_entries.is_empty());

        // series still cover every day for chart alignment
        assert_eq!(summary.dates.len(), 10);
        assert_eq!(summary.sleep_series, vec![None; 10]);
        assert_eq!(summary.exercise_series, vec![None; 10]);
    }

    #[test]
    fn blockers_only_day_counts_as_data_but_feeds_no_aggregate() {
        let periods = periods();
        let mut records = BTreeMap::new();
        records.insert(
            "2026-01-03".to_string(),
            DayRecord {
                blockers: "tired".to_string(),
                ..DayRecord::default()
            },
        );

        let summary = summarize(&periods[0], &records);
        assert!(summary.has_any_data);
        assert_eq!(summary.mood_histogram, [0; 5]);
        assert_eq!(summary.average_sleep, None);
        assert!(summary.journal_entries.is_empty());
    }

    #[test]
    fn sleep_averages_over_recorded_days_only() {
        let periods = periods();
        let mut records = BTreeMap::new();
        for (date, hours) in [("2026-01-01", 8.0), ("2026-01-02", 6.0)] {
            records.insert(
                date.to_string(),
                DayRecord {
                    mood: Some(3),
                    metrics: Some(Metrics {
                        sleep_hours: hours,
                        ..Metrics::default()
                    }),
                    ..DayRecord::default()
                },
            );
        }
        // a data day with no sleep recorded must not drag the average down
        records.insert("2026-01-03".to_string(), day("no sleep logged"));

        let summary = summarize(&periods[0], &records);
        assert_eq!(summary.average_sleep, Some(7.0));
        assert_eq!(summary.sleep_series[0], Some(8.0));
        assert_eq!(summary.sleep_series[1], Some(6.0));
        assert_eq!(summary.sleep_series[2], None);
    }

    #[test]
    fn sums_treat_missing_as_zero_but_series_keep_gaps() {
        let periods = periods();
        let mut records = BTreeMap::new();
        records.insert(
            "2026-01-02".to_string(),
            DayRecord {
                mood: Some(4),
                metrics: Some(Metrics {
                    exercise_minutes: 30,
                    reading_minutes: 20,
                    wealth_delta: -12.5,
                    ..Metrics::default()
                }),
                ..DayRecord::default()
            },
        );
        records.insert(
            "2026-01-08".to_string(),
            DayRecord {
                mood: Some(4),
                metrics: Some(Metrics {
                    exercise_minutes: 45,
                    wealth_delta: 40.0,
                    ..Metrics::default()
                }),
                ..DayRecord::default()
            },
        );

        let summary = summarize(&periods[0], &records);
        assert_eq!(summary.total_exercise_minutes, 75);
        assert_eq!(summary.total_reading_minutes, 20);
        assert_eq!(summary.total_wealth_delta, 27.5);

        assert_eq!(summary.exercise_series[1], Some(30));
        assert_eq!(summary.exercise_series[7], Some(45));
        assert_eq!(summary.exercise_series[2], None);
        assert_eq!(summary.reading_series[7], None, "zero reads as unrecorded");
    }

    #[test]
    fn mood_and_emotions_accumulate() {
        let periods = periods();
        let mut records = BTreeMap::new();
        for (date, mood, tags) in [
            ("2026-01-01", 4, vec!["calm"]),
            ("2026-01-02", 4, vec!["calm", "focused"]),
            ("2026-01-05", 2, vec!["anxious"]),
        ] {
            records.insert(
                date.to_string(),
                DayRecord {
                    mood: Some(mood),
                    emotions: tags.into_iter().map(String::from).collect(),
                    ..DayRecord::default()
                },
            );
        }

        let summary = summarize(&periods[0], &records);
        assert_eq!(summary.mood_histogram, [0, 1, 0, 2, 0]);
        assert_eq!(summary.emotion_frequency["calm"], 2);
        assert_eq!(summary.emotion_frequency["focused"], 1);
        assert_eq!(summary.emotion_frequency["anxious"], 1);
    }

    #[test]
    fn journals_come_back_in_chronological_order() {
        let periods = periods();
        let mut records = BTreeMap::new();
        records.insert("2026-01-09".to_string(), day("later"));
        records.insert("2026-01-02".to_string(), day("earlier"));

        let summary = summarize(&periods[0], &records);
        let contents: Vec<&str> = summary
            .journal_entries
            .iter()
            .map(|entry| entry.content.as_str())
            .collect();
        assert_eq!(contents, vec!["earlier", "later"]);
        assert_eq!(summary.journal_entries[0].date, "2026-01-02");
    }

    #[test]
    fn custom_activity_frequency_counts_days() {
        let periods = periods();
        let mut records = BTreeMap::new();
        for date in ["2026-01-01", "2026-01-04"] {
            records.insert(
                date.to_string(),
                DayRecord {
                    custom_activities: vec![CustomActivity {
                        name: "piano".to_string(),
                        value: "30min".to_string(),
                    }],
                    ..DayRecord::default()
                },
            );
        }

        let summary = summarize(&periods[0], &records);
        assert_eq!(summary.custom_activity_frequency["piano"], 2);
    }

    #[test]
    fn records_outside_the_period_are_ignored() {
        let periods = periods();
        let mut records = BTreeMap::new();
        records.insert("2026-01-11".to_string(), day("second period"));

        let summary = summarize(&periods[0], &records);
        assert!(!summary.has_any_data);

        let summary = summarize(&periods[1], &records);
        assert!(summary.has_any_data);
    }

    #[test]
    fn last_period_summary_spans_the_remainder() {
        let periods = periods();
        let last = periods.last().unwrap();
        let summary = summarize(last, &BTreeMap::new());
        assert_eq!(summary.dates.len(), 15);
        assert_eq!(summary.dates.first().map(String::as_str), Some("12-17"));
        assert_eq!(summary.dates.last().map(String::as_str), Some("12-31"));
    }
}
