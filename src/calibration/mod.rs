pub mod curve;
pub mod loader;
pub mod store;

pub use curve::{Curve, CurvePoint};
pub use loader::{load_calibration_file, parse_csv};
pub use store::{CalibrationStore, CurveSummary};
