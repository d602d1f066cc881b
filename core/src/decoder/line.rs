use crate::protocol::grammar::{EMBEDDED_RE, STRICT_RE};
use crate::protocol::{Frame, Record};
use crate::telemetry::DecodeReport;
use log::debug;
use regex::Captures;

/// How a single input line was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineShape {
    /// Blank, banner, or no usable leading timestamp. Nothing emitted.
    Skipped,
    /// Matched the strict grammar; one record emitted.
    Strict,
    /// Corrupted line; carries the number of frames recovered from it.
    Recovered(usize),
    /// Corrupted line with no frame inside, or a strict-shaped line whose
    /// fields failed to convert; one timeline marker emitted.
    Placeholder,
}

/// Stateful per-line decoder. Records are appended in input order; `time_sec`
/// is assigned afterwards by [`crate::decoder::assign_time_sec`].
#[derive(Debug, Default)]
pub struct LineDecoder {
    report: DecodeReport,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decode_line(&mut self, raw: &str, out: &mut Vec<Record>) -> LineShape {
        self.report.lines_seen += 1;
        let line = raw.trim();

        if !line.starts_with(|c: char| c.is_ascii_digit()) {
            self.report.record_skipped();
            return LineShape::Skipped;
        }

        let strict = STRICT_RE.captures(line);
        if let Some(record) = strict.as_ref().and_then(strict_record) {
            out.push(record);
            self.report.record_strict();
            return LineShape::Strict;
        }
        let strict_shaped = strict.is_some();

        let Some(local_ts) = leading_timestamp(line) else {
            debug!("skipping line without usable timestamp: {line:?}");
            self.report.record_skipped();
            return LineShape::Skipped;
        };

        let mut found = 0;
        let mut recovered = 0;
        for caps in EMBEDDED_RE.captures_iter(line) {
            found += 1;
            match Frame::from_captures(&caps) {
                // The outer line failed framing, so recovered data is never valid.
                Some(frame) => {
                    out.push(frame.into_record(local_ts, false));
                    self.report.record_recovered();
                    recovered += 1;
                }
                None => {
                    debug!("dropping malformed frame {:?} at {local_ts}", &caps[0]);
                    self.report.record_dropped_frame();
                }
            }
        }

        // A well-formed line whose fields failed to convert still marks the timeline.
        if found == 0 || (strict_shaped && recovered == 0) {
            debug!("no frame recoverable at {local_ts}, emitting placeholder");
            out.push(Record::placeholder(local_ts));
            self.report.record_placeholder();
            return LineShape::Placeholder;
        }

        LineShape::Recovered(recovered)
    }

    pub fn report(&self) -> &DecodeReport {
        &self.report
    }

    pub fn finish(self) -> DecodeReport {
        self.report
    }
}

fn strict_record(caps: &Captures<'_>) -> Option<Record> {
    let local_ts = caps["local_ts"].parse().ok()?;
    let valid = &caps["flag"] == "VALID";
    let frame = Frame::from_captures(caps)?;
    Some(frame.into_record(local_ts, valid))
}

fn leading_timestamp(line: &str) -> Option<u64> {
    let end = line
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(line.len());
    line[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_one(line: &str) -> (LineShape, Vec<Record>) {
        let mut decoder = LineDecoder::new();
        let mut out = Vec::new();
        let shape = decoder.decode_line(line, &mut out);
        (shape, out)
    }

    #[test]
    fn strict_line_keeps_every_token() {
        let (shape, out) = decode_one("3890,VALID,$thrust_test,0042,DATA,THST,-105.497,N,812*0E");
        assert_eq!(shape, LineShape::Strict);
        let record = &out[0];
        assert_eq!(record.local_ts, Some(3890));
        assert!(record.valid);
        assert_eq!(record.device, "thrust_test");
        assert_eq!(record.msg_id, Some(42));
        assert_eq!(record.data_type, "DATA");
        assert_eq!(record.sensor, "THST");
        assert_eq!(record.value, Some(-105.497));
        assert_eq!(record.unit, "N");
        assert_eq!(record.esp_ts, Some(812));
        assert_eq!(record.checksum.as_deref(), Some("0E"));
    }

    #[test]
    fn invalid_flag_is_still_fully_parsed() {
        let (shape, out) = decode_one("200,INVALID,$thrust_test,0002,DATA,THST,3.000,N,150*2B");
        assert_eq!(shape, LineShape::Strict);
        assert!(!out[0].valid);
        assert_eq!(out[0].value, Some(3.0));
    }

    #[test]
    fn concatenated_frames_share_leading_timestamp() {
        let line = "5120,VALID,$thrust_test,0010,DATA,THST,1.5,N,700*3C$thrust_test,0011,DATA,THST,1.7,N,710*3D";
        let (shape, out) = decode_one(line);
        assert_eq!(shape, LineShape::Recovered(2));
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|r| !r.valid && r.local_ts == Some(5120)));
        assert_eq!(out[0].msg_id, Some(10));
        assert_eq!(out[1].value, Some(1.7));
    }

    #[test]
    fn bad_occurrence_does_not_discard_siblings() {
        let line = "90,INVALID,$thrust_test,0001,DATA,THST,1..2.,N,5*0A garbage $thrust_test,0002,DATA,THST,4.25,N,6*0B";
        let mut decoder = LineDecoder::new();
        let mut out = Vec::new();
        let shape = decoder.decode_line(line, &mut out);
        assert_eq!(shape, LineShape::Recovered(1));
        assert_eq!(out[0].msg_id, Some(2));
        assert_eq!(decoder.report().dropped_frames, 1);
    }

    #[test]
    fn all_occurrences_malformed_emits_nothing() {
        let (shape, out) = decode_one("90,INVALID,$thrust_test,0001,DATA,THST,.,N,5*0A trailing");
        assert_eq!(shape, LineShape::Recovered(0));
        assert!(out.is_empty());
    }

    #[test]
    fn corrupted_line_without_frame_yields_placeholder() {
        let (shape, out) = decode_one("777,INVALID,$thrust_te#,00");
        assert_eq!(shape, LineShape::Placeholder);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].local_ts, Some(777));
        assert!(out[0].value.is_none());
        assert!(!out[0].valid);
    }

    #[test]
    fn strict_shaped_line_with_unconvertible_value_keeps_timeline_marker() {
        let line = format!("1,VALID,$t,1,DATA,THST,{},N,2*0A", "9".repeat(400));
        let mut decoder = LineDecoder::new();
        let mut out = Vec::new();
        let shape = decoder.decode_line(&line, &mut out);
        assert_eq!(shape, LineShape::Placeholder);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].local_ts, Some(1));
        assert!(!out[0].valid);
        assert!(out[0].value.is_none());
        assert_eq!(decoder.report().dropped_frames, 1);
        assert_eq!(decoder.report().placeholder_records, 1);
    }

    #[test]
    fn non_digit_start_is_skipped() {
        let (shape, out) = decode_one("ACK,0001,OK");
        assert_eq!(shape, LineShape::Skipped);
        assert!(out.is_empty());
        assert_eq!(decode_one("   ").0, LineShape::Skipped);
    }

    #[test]
    fn overflowing_timestamp_is_skipped() {
        let (shape, out) = decode_one("999999999999999999999999,INVALID,garbage");
        assert_eq!(shape, LineShape::Skipped);
        assert!(out.is_empty());
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let (shape, _) = decode_one("  100,VALID,$thrust_test,0001,DATA,THST,-2.500,N,50*1A \t");
        assert_eq!(shape, LineShape::Strict);
    }
}
