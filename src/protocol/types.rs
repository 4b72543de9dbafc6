use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, SocError};

/// Battery voltage in millivolts
pub type Millivolts = i32;

/// Header of the battery status request (report id, device index, feature index, function)
pub const BATTERY_REQUEST: [u8; 4] = [0x11, 0xff, 0x08, 0x00];

/// Charging state reported by the headset, selecting the calibration curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChargingMode {
    Discharging,
    /// Charging with the voltage still rising
    #[serde(rename = "charging")]
    ChargingAscending,
    /// Charging with the voltage falling back (device never reports this yet)
    ChargingDescending,
    Full,
}

impl ChargingMode {
    pub const ALL: [ChargingMode; 4] = [
        ChargingMode::Discharging,
        ChargingMode::ChargingAscending,
        ChargingMode::ChargingDescending,
        ChargingMode::Full,
    ];

    /// Status code used by the device for this mode, if it has one
    pub fn code(&self) -> Option<u8> {
        match self {
            ChargingMode::Discharging => Some(1),
            ChargingMode::ChargingAscending => Some(3),
            ChargingMode::ChargingDescending => None,
            ChargingMode::Full => Some(7),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChargingMode::Discharging => "discharging",
            ChargingMode::ChargingAscending => "charging",
            ChargingMode::ChargingDescending => "charging-descending",
            ChargingMode::Full => "full",
        }
    }

    /// Human readable label for status output
    pub fn label(&self) -> &'static str {
        match self {
            ChargingMode::Discharging => "discharging",
            ChargingMode::ChargingAscending => "charging (ascending)",
            ChargingMode::ChargingDescending => "charging (descending)",
            ChargingMode::Full => "full",
        }
    }
}

impl fmt::Display for ChargingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChargingMode {
    type Err = SocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChargingMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s.trim())
            .ok_or_else(|| SocError::UnknownMode(s.to_string()))
    }
}

impl TryFrom<u8> for ChargingMode {
    type Error = SocError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ChargingMode::Discharging),
            3 => Ok(ChargingMode::ChargingAscending),
            7 => Ok(ChargingMode::Full),
            code => Err(SocError::UnknownMode(code.to_string())),
        }
    }
}

/// Battery payload of the device response (request header stripped)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryReport {
    pub voltage_mv: u16,
    pub status: u8,
}

impl BatteryReport {
    /// Decode `[voltage_hi, voltage_lo, status, ..]`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let &[hi, lo, status, ..] = bytes else {
            return Err(ProtocolError::TooShort { len: bytes.len() });
        };

        Ok(Self {
            voltage_mv: u16::from_be_bytes([hi, lo]),
            status,
        })
    }

    pub fn voltage(&self) -> Millivolts {
        Millivolts::from(self.voltage_mv)
    }

    /// Resolve the status byte to a charging mode
    pub fn mode(&self) -> Result<ChargingMode, SocError> {
        ChargingMode::try_from(self.status)
    }
}

/// One state-of-charge estimate, as reported to the user
#[derive(Debug, Clone, Serialize)]
pub struct EstimateReport {
    pub timestamp: DateTime<Utc>,
    pub mode: ChargingMode,
    pub voltage_mv: Millivolts,
    /// Estimated state of charge, 0-100
    pub charge: f64,
}

impl EstimateReport {
    pub fn new(mode: ChargingMode, voltage_mv: Millivolts, charge: f64) -> Self {
        Self::with_timestamp(Utc::now(), mode, voltage_mv, charge)
    }

    pub fn with_timestamp(
        timestamp: DateTime<Utc>,
        mode: ChargingMode,
        voltage_mv: Millivolts,
        charge: f64,
    ) -> Self {
        Self {
            timestamp,
            mode,
            voltage_mv,
            charge,
        }
    }

    /// One-line status, e.g. `Status: 73.2% [discharging]`
    pub fn summary(&self) -> String {
        format!("Status: {:.01}% [{}]", self.charge, self.mode.label())
    }
}
