use super::interpolation::{clamp_soc, interpolate, nearest_two};
use crate::calibration::CalibrationStore;
use crate::error::SocError;
use crate::protocol::{BatteryReport, ChargingMode, EstimateReport, Millivolts};

/// State-of-charge estimator over a calibration store
///
/// Stateless: every call reads the store and nothing else.
#[derive(Debug, Clone, Copy)]
pub struct SocEstimator<'a> {
    store: &'a CalibrationStore,
}

impl<'a> SocEstimator<'a> {
    pub fn new(store: &'a CalibrationStore) -> Self {
        Self { store }
    }

    /// Estimate state of charge (0-100) for `voltage` using the curve of `mode`
    ///
    /// Readings outside the curve are extrapolated from the two nearest
    /// points and clamped, never rejected.
    pub fn estimate(&self, mode: ChargingMode, voltage: Millivolts) -> Result<f64, SocError> {
        let curve = self.store.get_curve(mode)?;

        tracing::debug!("Estimating {} mV with {} curve", voltage, mode);

        if let Some(point) = curve.single_point() {
            tracing::debug!("Single-point curve, charge: {}", point.soc);
            return Ok(clamp_soc(point.soc));
        }

        // Sampled voltage: report the table value as is
        if let Some(soc) = curve.get(voltage) {
            tracing::debug!("Exact calibration point, charge: {}", soc);
            return Ok(clamp_soc(soc));
        }

        let (lo, hi) = nearest_two(curve, voltage)
            .ok_or_else(|| SocError::InvalidCurve(format!("{} curve has no points", mode)))?;

        tracing::debug!(
            "Closest mapped voltages: {}, {} (charges {}, {})",
            lo.voltage,
            hi.voltage,
            lo.soc,
            hi.soc
        );

        let raw = interpolate(lo, hi, voltage)?;
        let charge = clamp_soc(raw);

        tracing::debug!("Raw charge: {:.2}, clamped: {:.2}", raw, charge);

        Ok(charge)
    }

    /// Same as [`estimate`](Self::estimate), with the mode given as a device status code
    pub fn estimate_code(&self, code: u8, voltage: Millivolts) -> Result<f64, SocError> {
        let mode = ChargingMode::try_from(code)?;
        self.estimate(mode, voltage)
    }

    /// Estimate from a decoded device report
    pub fn estimate_report(&self, report: &BatteryReport) -> Result<EstimateReport, SocError> {
        let mode = report.mode()?;
        let charge = self.estimate(mode, report.voltage())?;

        Ok(EstimateReport::new(mode, report.voltage(), charge))
    }
}
