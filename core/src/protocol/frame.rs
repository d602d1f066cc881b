use crate::protocol::record::Record;
use regex::Captures;
use std::fmt::Write;

/// Payload fields of one `$...*XX` frame, fully converted.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub device: String,
    pub msg_id: u64,
    pub data_type: String,
    pub sensor: String,
    pub value: f64,
    pub unit: String,
    pub esp_ts: u64,
    pub checksum: String,
}

impl Frame {
    /// Converts the named groups of a grammar match. Returns `None` when any
    /// numeric field fails to convert, so a bad candidate never yields a
    /// partially filled record.
    pub fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let text = |name: &str| caps.name(name).map(|m| m.as_str());

        Some(Self {
            device: text("device")?.to_string(),
            msg_id: text("msg_id")?.parse().ok()?,
            data_type: text("data_type")?.to_string(),
            sensor: text("sensor")?.to_string(),
            value: parse_value(text("value")?)?,
            unit: text("unit")?.to_string(),
            esp_ts: text("esp_ts")?.parse().ok()?,
            checksum: text("checksum")?.to_string(),
        })
    }

    pub fn into_record(self, local_ts: u64, valid: bool) -> Record {
        Record {
            local_ts: Some(local_ts),
            valid,
            device: self.device,
            msg_id: Some(self.msg_id),
            data_type: self.data_type,
            sensor: self.sensor,
            value: Some(self.value),
            unit: self.unit,
            esp_ts: Some(self.esp_ts),
            checksum: Some(self.checksum),
            time_sec: None,
        }
    }
}

/// Values that overflow to infinity are conversion failures; the decoder
/// keeps a placeholder for such a line instead of an infinite reading.
fn parse_value(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// XOR of every byte between `$` and `*`, as computed by the sender firmware.
pub fn checksum(body: &str) -> u8 {
    body.bytes().fold(0, |acc, byte| acc ^ byte)
}

/// Renders a frame the way the sender transmits it.
pub fn format_frame(
    device: &str,
    msg_id: u64,
    sensor: &str,
    value: f64,
    unit: &str,
    esp_ts: u64,
) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        "{device},{:04},DATA,{sensor},{value:.3},{unit},{esp_ts}",
        msg_id % 10_000
    );
    format!("${body}*{:02X}", checksum(&body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::grammar::{EMBEDDED_RE, STRICT_RE};

    #[test]
    fn strict_captures_convert_to_frame() {
        let caps = STRICT_RE
            .captures("100,VALID,$thrust_test,0001,DATA,THST,-2.500,N,50*1A")
            .unwrap();
        let frame = Frame::from_captures(&caps).unwrap();
        assert_eq!(frame.msg_id, 1);
        assert_eq!(frame.value, -2.5);
        assert_eq!(frame.esp_ts, 50);
        assert_eq!(frame.checksum, "1A");
    }

    #[test]
    fn malformed_value_rejects_frame() {
        let caps = EMBEDDED_RE
            .captures("$thrust_test,0001,DATA,THST,1.2.3,N,50*1A")
            .unwrap();
        assert!(Frame::from_captures(&caps).is_none());
    }

    #[test]
    fn oversized_integer_rejects_frame() {
        let caps = EMBEDDED_RE
            .captures("$thrust_test,99999999999999999999999,DATA,THST,1.0,N,50*1A")
            .unwrap();
        assert!(Frame::from_captures(&caps).is_none());
    }

    #[test]
    fn formatted_frame_matches_embedded_grammar() {
        let frame = format_frame("thrust_test", 7, "THST", -12.3456, "N", 900);
        assert!(frame.starts_with("$thrust_test,0007,DATA,THST,-12.346,N,900*"));
        let caps = EMBEDDED_RE.captures(&frame).unwrap();
        let parsed = Frame::from_captures(&caps).unwrap();
        let body = &frame[1..frame.find('*').unwrap()];
        assert_eq!(parsed.checksum, format!("{:02X}", checksum(body)));
    }

    #[test]
    fn checksum_is_xor_of_body() {
        assert_eq!(checksum(""), 0);
        assert_eq!(checksum("A"), 0x41);
        assert_eq!(checksum("AA"), 0);
    }
}
