//! Nearest-point selection and linear interpolation over a calibration curve.
//!
//! The two points used are the ones closest to the reading by absolute
//! voltage difference. They do not have to bracket the reading, so outside
//! the sampled range the same formula extrapolates from the two outermost
//! points and the result is clamped afterwards.

use crate::calibration::{Curve, CurvePoint};
use crate::error::SocError;
use crate::protocol::Millivolts;

pub const SOC_MIN: f64 = 0.0;
pub const SOC_MAX: f64 = 100.0;

fn distance(a: Millivolts, b: Millivolts) -> i64 {
    (i64::from(a) - i64::from(b)).abs()
}

/// The two curve points nearest to `voltage`, ordered by ascending voltage
///
/// Equal distances prefer the lower voltage. Returns `None` for curves with
/// fewer than two points.
pub fn nearest_two(curve: &Curve, voltage: Millivolts) -> Option<(CurvePoint, CurvePoint)> {
    // The two nearest overall are among the two nearest on each side
    let mut candidates: Vec<CurvePoint> = curve
        .range(..voltage)
        .rev()
        .take(2)
        .chain(curve.range(voltage..).take(2))
        .map(|(&v, &soc)| CurvePoint::new(v, soc))
        .collect();

    candidates.sort_by_key(|p| (distance(p.voltage, voltage), p.voltage));

    let mut nearest = candidates.into_iter();
    let (a, b) = (nearest.next()?, nearest.next()?);

    if a.voltage <= b.voltage {
        Some((a, b))
    } else {
        Some((b, a))
    }
}

/// Position of `voltage` relative to `lo` (0.0) and `hi` (1.0)
///
/// Below 0 or above 1 when extrapolating.
pub fn ratio(lo: Millivolts, hi: Millivolts, voltage: Millivolts) -> Result<f64, SocError> {
    if lo == hi {
        return Err(SocError::DegenerateCurve { voltage });
    }

    Ok(distance_signed(voltage, lo) / distance_signed(hi, lo))
}

fn distance_signed(a: Millivolts, b: Millivolts) -> f64 {
    (i64::from(a) - i64::from(b)) as f64
}

/// Unclamped linear estimate through `lo` and `hi`
pub fn interpolate(lo: CurvePoint, hi: CurvePoint, voltage: Millivolts) -> Result<f64, SocError> {
    let ratio = ratio(lo.voltage, hi.voltage, voltage)?;
    Ok(lo.soc + (hi.soc - lo.soc) * ratio)
}

/// Bound an estimate to 0-100
pub fn clamp_soc(raw: f64) -> f64 {
    raw.clamp(SOC_MIN, SOC_MAX)
}
