use serde::{Deserialize, Serialize};

pub const DEFAULT_DEVICE: &str = "thrust_test";
pub const DEFAULT_DATA_TYPE: &str = "DATA";
pub const DEFAULT_SENSOR: &str = "THST";
pub const DEFAULT_UNIT: &str = "N";

/// One decoded measurement attempt.
///
/// `valid` is the receiver's transmission-integrity verdict for the line, not
/// a statement about the measurement. A record without a `value` is never
/// valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Receiver clock in milliseconds.
    pub local_ts: Option<u64>,
    pub valid: bool,
    pub device: String,
    pub msg_id: Option<u64>,
    pub data_type: String,
    pub sensor: String,
    pub value: Option<f64>,
    pub unit: String,
    /// Sender clock in milliseconds, unrelated to `local_ts`.
    pub esp_ts: Option<u64>,
    pub checksum: Option<String>,
    /// Seconds since the earliest `local_ts` of the whole dataset.
    #[serde(default)]
    pub time_sec: Option<f64>,
}

impl Record {
    /// Timeline marker for a line that carried a failed transmission with no
    /// recoverable payload.
    pub fn placeholder(local_ts: u64) -> Self {
        Self {
            local_ts: Some(local_ts),
            valid: false,
            device: DEFAULT_DEVICE.to_string(),
            msg_id: None,
            data_type: DEFAULT_DATA_TYPE.to_string(),
            sensor: DEFAULT_SENSOR.to_string(),
            value: None,
            unit: DEFAULT_UNIT.to_string(),
            esp_ts: None,
            checksum: None,
            time_sec: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.value.is_none() && self.msg_id.is_none()
    }
}
