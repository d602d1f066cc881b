pub mod frame;
pub mod grammar;
pub mod record;

pub use frame::{checksum, format_frame, Frame};
pub use grammar::{EMBEDDED_FRAME, STRICT_LINE};
pub use record::{Record, DEFAULT_DATA_TYPE, DEFAULT_DEVICE, DEFAULT_SENSOR, DEFAULT_UNIT};
