pub mod parser;
pub mod types;

pub use parser::{parse_hex_bytes, parse_response_line};
pub use types::{BatteryReport, ChargingMode, EstimateReport, Millivolts};
