//! Series processing: date parsing, ordering, preview table, summary statistics and the
//! top-value frequency distribution.

use crate::models::{Observation, RawObservation};
use ahash::AHashMap;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rows shown in the preview table.
pub const PREVIEW_ROWS: usize = 10;

/// Distinct values kept in the frequency distribution.
pub const TOP_VALUES: usize = 5;

#[derive(Debug, Error, PartialEq)]
pub enum ProcessError {
    /// Valid response with zero observations.
    #[error("no observations to process")]
    EmptyInput,
    /// An observation carried a date that is not ISO-8601. The whole series is rejected.
    #[error("observation {index} has an invalid date: {value:?}")]
    InvalidDate { index: usize, value: String },
}

/// Mean, maximum and minimum of a series, each rounded to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

/// How often one exact value occurs in a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: f64,
    pub count: usize,
}

/// Processed view of one series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesReport {
    /// Full series, ascending by date.
    pub series: Vec<Observation>,
    /// First [`PREVIEW_ROWS`] observations of `series`.
    pub table: Vec<Observation>,
    pub summary: SummaryStats,
    /// At most [`TOP_VALUES`] entries, descending count.
    pub frequency: Vec<ValueCount>,
}

/// Round to 2 decimals; exact ties go to the even digit (`0.125 -> 0.12`).
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

/// Parse the `fecha` field. The live API sends UTC timestamps such as
/// `2024-01-01T03:00:00.000Z`; plain `YYYY-MM-DD` is accepted too.
pub fn parse_fecha(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc().date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Turn raw observations into a date-ordered series.
pub fn to_series(raw: &[RawObservation]) -> Result<Vec<Observation>, ProcessError> {
    let mut series = raw
        .iter()
        .enumerate()
        .map(|(index, r)| {
            parse_fecha(&r.fecha)
                .map(|date| Observation {
                    date,
                    value: r.valor,
                })
                .ok_or_else(|| ProcessError::InvalidDate {
                    index,
                    value: r.fecha.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    // stable: duplicate dates keep source order
    series.sort_by_key(|o| o.date);
    Ok(series)
}

/// Mean/max/min over all values. `None` for an empty series.
pub fn summarize(series: &[Observation]) -> Option<SummaryStats> {
    if series.is_empty() {
        return None;
    }
    let (sum, min, max) = series.iter().fold(
        (0.0f64, f64::INFINITY, f64::NEG_INFINITY),
        |(sum, min, max), o| (sum + o.value, min.min(o.value), max.max(o.value)),
    );
    Some(SummaryStats {
        mean: round2(sum / series.len() as f64),
        max: round2(max),
        min: round2(min),
    })
}

/// Count each exact value and keep the `limit` most frequent.
///
/// Equal counts keep the order in which the values first appear in `series`.
pub fn top_frequencies(series: &[Observation], limit: usize) -> Vec<ValueCount> {
    let mut slot_by_bits: AHashMap<u64, usize> = AHashMap::new();
    let mut counts: Vec<ValueCount> = Vec::new();
    for o in series {
        // -0.0 and 0.0 are the same value
        let value = if o.value == 0.0 { 0.0 } else { o.value };
        let slot = *slot_by_bits.entry(value.to_bits()).or_insert_with(|| {
            counts.push(ValueCount { value, count: 0 });
            counts.len() - 1
        });
        counts[slot].count += 1;
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

/// Run the whole processing step over a fetched series.
pub fn process(raw: &[RawObservation]) -> Result<SeriesReport, ProcessError> {
    if raw.is_empty() {
        return Err(ProcessError::EmptyInput);
    }
    let series = to_series(raw)?;
    let summary = summarize(&series).ok_or(ProcessError::EmptyInput)?;
    let frequency = top_frequencies(&series, TOP_VALUES);
    let table = series.iter().take(PREVIEW_ROWS).copied().collect();
    Ok(SeriesReport {
        series,
        table,
        summary,
        frequency,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_api_timestamps_and_plain_dates() {
        assert_eq!(parse_fecha("2024-03-05T03:00:00.000Z"), Some(d(2024, 3, 5)));
        assert_eq!(parse_fecha("2024-03-05T00:00:00"), Some(d(2024, 3, 5)));
        assert_eq!(parse_fecha("2024-03-05"), Some(d(2024, 3, 5)));
        assert_eq!(parse_fecha(" 2024-03-05 "), Some(d(2024, 3, 5)));
        assert_eq!(parse_fecha("05/03/2024"), None);
        assert_eq!(parse_fecha(""), None);
    }

    #[test]
    fn round2_sends_ties_to_even() {
        assert_eq!(round2(36003.3333), 36003.33);
        assert_eq!(round2(1.005 * 1000.0), 1005.0);
        assert_eq!(round2(-2.345678), -2.35);
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(-0.125), -0.12);
    }

    #[test]
    fn negative_zero_counts_as_zero() {
        let s = [
            Observation { date: d(2024, 1, 1), value: 0.0 },
            Observation { date: d(2024, 1, 2), value: -0.0 },
        ];
        let f = top_frequencies(&s, TOP_VALUES);
        assert_eq!(f, vec![ValueCount { value: 0.0, count: 2 }]);
    }
}
