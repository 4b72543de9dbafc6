//! Battery state-of-charge estimation from voltage readings.
//!
//! A [`CalibrationStore`] holds one voltage-to-charge curve per
//! [`ChargingMode`]. A [`SocEstimator`] picks the curve for the reported
//! mode and linearly interpolates between the two calibration points
//! nearest the reading, clamping the result to 0-100.
//!
//! ```
//! use battery_soc::{CalibrationStore, ChargingMode, SocEstimator};
//!
//! let store = CalibrationStore::default()
//!     .with_curve(
//!         ChargingMode::Discharging,
//!         [(3700, 10.0), (3900, 50.0), (4100, 90.0)],
//!     )
//!     .unwrap();
//! let estimator = SocEstimator::new(&store);
//!
//! assert_eq!(estimator.estimate(ChargingMode::Discharging, 3800).unwrap(), 30.0);
//! assert_eq!(estimator.estimate(ChargingMode::Discharging, 4200).unwrap(), 100.0);
//! ```

pub mod calibration;
pub mod config;
pub mod error;
pub mod processing;
pub mod protocol;

pub use calibration::{CalibrationStore, Curve, CurvePoint};
pub use error::{ProtocolError, SocError};
pub use processing::SocEstimator;
pub use protocol::{BatteryReport, ChargingMode, EstimateReport};
