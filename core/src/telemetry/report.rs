use serde::{Deserialize, Serialize};

/// Per-decode counters describing how each line was handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeReport {
    pub lines_seen: usize,
    pub skipped_lines: usize,
    pub strict_records: usize,
    pub recovered_records: usize,
    pub placeholder_records: usize,
    /// Frame-shaped substrings whose numeric fields failed to convert.
    pub dropped_frames: usize,
}

impl DecodeReport {
    pub fn record_skipped(&mut self) {
        self.skipped_lines += 1;
    }

    pub fn record_strict(&mut self) {
        self.strict_records += 1;
    }

    pub fn record_recovered(&mut self) {
        self.recovered_records += 1;
    }

    pub fn record_placeholder(&mut self) {
        self.placeholder_records += 1;
    }

    pub fn record_dropped_frame(&mut self) {
        self.dropped_frames += 1;
    }

    pub fn total_records(&self) -> usize {
        self.strict_records + self.recovered_records + self.placeholder_records
    }

    /// Fraction of emitted records that came from strictly matched lines.
    pub fn strict_ratio(&self) -> f64 {
        let total = self.total_records();
        if total == 0 {
            return 0.0;
        }
        self.strict_records as f64 / total as f64
    }
}
