use std::collections::BTreeMap;

use serde::Serialize;

use super::curve::Curve;
use super::loader;
use crate::error::SocError;
use crate::protocol::{ChargingMode, Millivolts};

/// Calibration curves keyed by charging mode
///
/// Built once at startup and read-only afterwards. Share it by reference.
#[derive(Debug, Clone, Default)]
pub struct CalibrationStore {
    curves: BTreeMap<ChargingMode, Curve>,
}

impl CalibrationStore {
    pub fn new<I>(curves: I) -> Self
    where
        I: IntoIterator<Item = (ChargingMode, Curve)>,
    {
        Self {
            curves: curves.into_iter().collect(),
        }
    }

    /// Store holding the tables shipped with the crate, one per mode
    pub fn builtin() -> Result<Self, SocError> {
        loader::builtin_store()
    }

    /// Validate `points` and register them as the curve for `mode`
    pub fn with_curve<I>(mut self, mode: ChargingMode, points: I) -> Result<Self, SocError>
    where
        I: IntoIterator<Item = (Millivolts, f64)>,
    {
        let curve = Curve::new(points).map_err(|e| match e {
            SocError::InvalidCurve(msg) => {
                SocError::InvalidCurve(format!("{} curve: {}", mode, msg))
            }
            other => other,
        })?;

        self.curves.insert(mode, curve);
        Ok(self)
    }

    /// Replace curves with the ones in `overrides`, keeping the rest
    pub fn with_overrides(mut self, overrides: CalibrationStore) -> Self {
        for (mode, curve) in overrides.curves {
            tracing::debug!("Overriding {} calibration curve", mode);
            self.curves.insert(mode, curve);
        }
        self
    }

    /// Curve registered for `mode`
    pub fn get_curve(&self, mode: ChargingMode) -> Result<&Curve, SocError> {
        self.curves
            .get(&mode)
            .ok_or_else(|| SocError::UnknownMode(mode.to_string()))
    }

    pub fn modes(&self) -> impl Iterator<Item = ChargingMode> + '_ {
        self.curves.keys().copied()
    }

    pub fn curves(&self) -> impl Iterator<Item = (ChargingMode, &Curve)> + '_ {
        self.curves.iter().map(|(&mode, curve)| (mode, curve))
    }

    /// Per-mode overview of the registered curves
    pub fn summaries(&self) -> Vec<CurveSummary> {
        self.curves()
            .map(|(mode, curve)| {
                let (min_voltage_mv, max_voltage_mv) = curve.voltage_range();
                CurveSummary {
                    mode,
                    points: curve.len(),
                    min_voltage_mv,
                    max_voltage_mv,
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurveSummary {
    pub mode: ChargingMode,
    pub points: usize,
    pub min_voltage_mv: Millivolts,
    pub max_voltage_mv: Millivolts,
}
