pub mod line;
pub mod timeline;

pub use line::{LineDecoder, LineShape};
pub use timeline::assign_time_sec;

use crate::protocol::Record;
use crate::telemetry::DecodeReport;
use log::info;

/// Decodes a complete captured log into an ordered record sequence.
pub fn decode(text: &str) -> Vec<Record> {
    decode_with_report(text).0
}

/// Same as [`decode`], also returning how each line was handled.
pub fn decode_with_report(text: &str) -> (Vec<Record>, DecodeReport) {
    let mut decoder = LineDecoder::new();
    let mut records = Vec::new();

    for line in text.lines() {
        decoder.decode_line(line, &mut records);
    }

    assign_time_sec(&mut records);
    let report = decoder.finish();
    info!(
        "decoded {} records from {} lines ({} strict, {} recovered, {} placeholders, {} skipped)",
        records.len(),
        report.lines_seen,
        report.strict_records,
        report.recovered_records,
        report.placeholder_records,
        report.skipped_lines
    );
    (records, report)
}
