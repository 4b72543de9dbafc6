use thiserror::Error;

/// Main error type for state-of-charge estimation
#[derive(Error, Debug)]
pub enum SocError {
    #[error("Unknown mode: {0}. No calibration curve is registered for it")]
    UnknownMode(String),

    #[error("Invalid curve: {0}")]
    InvalidCurve(String),

    #[error("Degenerate curve: nearest calibration points for {voltage} mV share a voltage")]
    DegenerateCurve { voltage: i32 },

    #[error("Curve parse error on line {line}: {reason}")]
    CurveParse { line: usize, reason: String },

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Calibration file error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors decoding the raw battery report returned by the headset
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    #[error("Invalid hex byte sequence: {0}")]
    InvalidHex(String),

    #[error("Battery report too short: got {len} bytes, need at least 3")]
    TooShort { len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_display() {
        let err = ProtocolError::TooShort { len: 2 };
        assert!(err.to_string().contains("got 2 bytes"));

        let err = ProtocolError::InvalidHex("zz".to_string());
        assert!(err.to_string().contains("zz"));
    }

    #[test]
    fn test_soc_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let soc_err: SocError = io_err.into();
        assert!(matches!(soc_err, SocError::Io(_)));
    }

    #[test]
    fn test_soc_error_from_protocol() {
        let soc_err: SocError = ProtocolError::TooShort { len: 0 }.into();
        assert!(matches!(soc_err, SocError::Protocol(_)));
    }

    #[test]
    fn test_unknown_mode_display() {
        let err = SocError::UnknownMode("99".to_string());
        assert!(err.to_string().contains("Unknown mode: 99"));
    }

    #[test]
    fn test_degenerate_curve_display() {
        let err = SocError::DegenerateCurve { voltage: 3800 };
        assert!(err.to_string().contains("3800 mV"));
    }
}
