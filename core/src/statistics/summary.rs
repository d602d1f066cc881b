use crate::math::stats::StatsHelper;
use crate::protocol::Record;
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Inclusion and transform policy for [`summarize`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryOptions {
    /// Restrict value statistics to records flagged valid. Off by default:
    /// recovered frames are legitimate signal.
    pub valid_only: bool,
    /// Use magnitudes, for compression load cells that read thrust as negative.
    pub use_absolute: bool,
}

impl SummaryOptions {
    pub fn new(valid_only: bool, use_absolute: bool) -> Self {
        Self {
            valid_only,
            use_absolute,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSummary {
    pub count: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub range: f64,
    pub sample_rate_hz: f64,
    pub duration_sec: f64,
}

impl StatisticsSummary {
    /// Flat key/value view for presentation layers.
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(fields)) => fields.into_iter().collect(),
            _ => BTreeMap::new(),
        }
    }
}

/// Derives summary statistics. Returns `None` when no value qualifies under
/// `options`; that is an empty result, not an error.
pub fn summarize(records: &[Record], options: SummaryOptions) -> Option<StatisticsSummary> {
    let selected: Vec<&Record> = records
        .iter()
        .filter(|r| !options.valid_only || r.valid)
        .collect();

    let values: Vec<f64> = selected
        .iter()
        .filter_map(|r| r.value)
        .map(|v| if options.use_absolute { v.abs() } else { v })
        .collect();

    let min = StatsHelper::min(&values)?;
    let max = StatsHelper::max(&values)?;
    let mean = StatsHelper::mean(&values)?;
    let median = StatsHelper::median(&values)?;

    let valid_count = records.iter().filter(|r| r.valid).count();
    let summary = StatisticsSummary {
        count: values.len(),
        valid_count,
        invalid_count: records.len() - valid_count,
        min,
        max,
        mean,
        median,
        std: StatsHelper::std_dev(&values),
        range: max - min,
        sample_rate_hz: sample_rate_hz(&selected),
        duration_sec: duration_sec(records),
    };

    info!(
        "summarized {} values (valid_only={}, use_absolute={}): mean {:.3}, {:.1} Hz",
        summary.count, options.valid_only, options.use_absolute, summary.mean, summary.sample_rate_hz
    );
    Some(summary)
}

/// [`summarize`] flattened into a map; empty when nothing qualifies.
pub fn summary_map(records: &[Record], options: SummaryOptions) -> BTreeMap<String, Value> {
    summarize(records, options)
        .map(|summary| summary.to_map())
        .unwrap_or_default()
}

/// Consecutive `local_ts` differences in sequence order, averaged and
/// inverted. A pair with a missing timestamp contributes no interval.
fn sample_rate_hz(selected: &[&Record]) -> f64 {
    let intervals: Vec<f64> = selected
        .windows(2)
        .filter_map(|pair| match (pair[0].local_ts, pair[1].local_ts) {
            (Some(a), Some(b)) => Some(b as f64 - a as f64),
            _ => None,
        })
        .collect();

    match StatsHelper::mean(&intervals) {
        Some(mean_ms) if mean_ms > 0.0 => 1000.0 / mean_ms,
        _ => 0.0,
    }
}

fn duration_sec(records: &[Record]) -> f64 {
    let stamps = records.iter().filter_map(|r| r.local_ts);
    match (stamps.clone().min(), stamps.max()) {
        (Some(first), Some(last)) => (last - first) as f64 / 1000.0,
        _ => 0.0,
    }
}
