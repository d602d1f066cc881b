//! Line grammars of the receiver's SD-card log.
//!
//! A receiver log line is `<local_ts>,<VALID|INVALID>,<frame>` where a frame is
//! `$<device>,<msg_id>,<data_type>,<sensor>,<value>,<unit>,<esp_ts>*<checksum>`.
//! Both matchers share the frame body and its named capture groups, so field
//! extraction is written once in [`crate::protocol::Frame::from_captures`].

use once_cell::sync::Lazy;
use regex::Regex;

macro_rules! frame_body {
    () => {
        concat!(
            r"\$(?P<device>\w+),",
            r"(?P<msg_id>[0-9]+),",
            r"(?P<data_type>\w+),",
            r"(?P<sensor>\w+),",
            r"(?P<value>-?[0-9.]+),",
            r"(?P<unit>\w+),",
            r"(?P<esp_ts>[0-9]+)",
            r"\*(?P<checksum>[0-9A-Fa-f]{1,2})",
        )
    };
}

/// Unanchored frame, searched for inside corrupted or concatenated lines.
pub const EMBEDDED_FRAME: &str = frame_body!();

/// Fully anchored single-record line. Adds `local_ts` and `flag` groups ahead
/// of the frame body.
pub const STRICT_LINE: &str = concat!(
    r"^(?P<local_ts>[0-9]+),(?P<flag>VALID|INVALID),",
    frame_body!(),
    r"$"
);

pub(crate) static STRICT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(STRICT_LINE).expect("strict line grammar is a valid regex"));

pub(crate) static EMBEDDED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMBEDDED_FRAME).expect("embedded frame grammar is a valid regex"));
