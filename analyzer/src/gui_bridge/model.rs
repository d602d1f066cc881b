use crate::workflow::session::Session;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thrustcore::math::StatsHelper;
use thrustcore::{DecodeReport, Record, StatisticsSummary, SummaryOptions};

/// One point of the thrust-vs-time trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub time_sec: f64,
    pub value: f64,
    pub msg_id: Option<u64>,
    pub esp_ts: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewOptions {
    pub show_invalid: bool,
    pub use_absolute: bool,
    pub valid_only: bool,
}

/// Everything an external dashboard needs to draw the plot and the
/// statistics panel for one session.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashboardModel {
    pub source: Option<String>,
    /// All records carrying a value, sorted by `time_sec`.
    pub thrust: Vec<PlotPoint>,
    /// Invalid records with a value; only filled when `show_invalid` is set.
    pub recovered: Vec<PlotPoint>,
    pub mean: Option<f64>,
    /// Present only when the spread is positive.
    pub std: Option<f64>,
    pub summary: BTreeMap<String, Value>,
    pub report: DecodeReport,
}

impl DashboardModel {
    pub fn build(session: &Session, options: ViewOptions) -> Self {
        let records = session.records();
        let thrust = plot_points(records.iter(), options.use_absolute);
        let recovered = if options.show_invalid {
            plot_points(records.iter().filter(|r| !r.valid), options.use_absolute)
        } else {
            Vec::new()
        };

        let summary = session
            .summary(SummaryOptions::new(options.valid_only, options.use_absolute))
            .as_ref()
            .map(StatisticsSummary::to_map)
            .unwrap_or_default();

        let values: Vec<f64> = thrust.iter().map(|p| p.value).collect();
        let mean = StatsHelper::mean(&values);
        let std = Some(StatsHelper::std_dev(&values)).filter(|s| *s > 0.0);

        Self {
            source: session.source().map(str::to_string),
            thrust,
            recovered,
            mean,
            std: mean.and(std),
            summary,
            report: *session.report(),
        }
    }
}

fn plot_points<'a>(
    records: impl Iterator<Item = &'a Record>,
    use_absolute: bool,
) -> Vec<PlotPoint> {
    let mut points: Vec<PlotPoint> = records
        .filter_map(|record| {
            let value = record.value?;
            Some(PlotPoint {
                time_sec: record.time_sec?,
                value: if use_absolute { value.abs() } else { value },
                msg_id: record.msg_id,
                esp_ts: record.esp_ts,
            })
        })
        .collect();
    points.sort_by(|a, b| a.time_sec.total_cmp(&b.time_sec));
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "300,VALID,$thrust_test,0003,DATA,THST,-6.000,N,250*1A\n\
                       100,VALID,$thrust_test,0001,DATA,THST,-2.000,N,50*1A\n\
                       200,INVALID,$thrust_test,0002,DATA,THST,-4.000,N,150*2B\n\
                       250,INVALID,lost\n";

    #[test]
    fn plot_is_sorted_by_time_and_skips_placeholders() {
        let session = Session::from_text("burn", LOG);
        let model = DashboardModel::build(&session, ViewOptions::default());
        let times: Vec<f64> = model.thrust.iter().map(|p| p.time_sec).collect();
        assert_eq!(times, vec![0.0, 0.1, 0.2]);
        assert!(model.recovered.is_empty());
        assert_eq!(model.mean, Some(-4.0));
        assert_eq!(model.std, Some(2.0));
    }

    #[test]
    fn show_invalid_adds_recovered_trace() {
        let session = Session::from_text("burn", LOG);
        let options = ViewOptions {
            show_invalid: true,
            use_absolute: true,
            valid_only: false,
        };
        let model = DashboardModel::build(&session, options);
        assert_eq!(model.recovered.len(), 1);
        assert_eq!(model.recovered[0].value, 4.0);
        assert_eq!(model.summary["count"], 3);
        assert_eq!(model.report.placeholder_records, 1);
    }

    #[test]
    fn empty_session_builds_empty_model() {
        let model = DashboardModel::build(&Session::empty(), ViewOptions::default());
        assert!(model.thrust.is_empty());
        assert!(model.summary.is_empty());
        assert_eq!(model.mean, None);
        assert_eq!(model.std, None);
    }
}
