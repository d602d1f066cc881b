//! Decoding and statistics core for thrust-stand UART telemetry logs.
//!
//! Raw SD-card log text flows one way: the [`decoder`] turns lines into an
//! ordered [`Record`] sequence (recovering frames from corrupted lines), and
//! the [`statistics`] engine derives a [`StatisticsSummary`] from it.

pub mod decoder;
pub mod math;
pub mod prelude;
pub mod protocol;
pub mod statistics;
pub mod table;
pub mod telemetry;

pub use decoder::{decode, decode_with_report, LineDecoder};
pub use prelude::{TelemetryError, TelemetryResult};
pub use protocol::Record;
pub use statistics::{summarize, summary_map, StatisticsSummary, SummaryOptions};
pub use telemetry::DecodeReport;
