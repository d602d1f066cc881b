pub use crate::decoder::{decode, decode_with_report, LineDecoder};
pub use crate::protocol::Record;
pub use crate::statistics::{summarize, summary_map, StatisticsSummary, SummaryOptions};
pub use crate::telemetry::DecodeReport;

/// Errors raised at the interchange boundary.
///
/// Malformed log lines are never errors; they degrade inside the decoder.
#[derive(thiserror::Error, Debug)]
pub enum TelemetryError {
    #[error("missing column: {0}")]
    MissingColumn(String),
    #[error("row {row}: expected {expected} cells, found {found}")]
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row}: invalid {column} value {value:?}")]
    InvalidCell {
        row: usize,
        column: String,
        value: String,
    },
    #[error("row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type TelemetryResult<T> = Result<T, TelemetryError>;
