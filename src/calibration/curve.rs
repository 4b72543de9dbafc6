use std::collections::BTreeMap;
use std::collections::btree_map;
use std::ops::RangeBounds;

use crate::error::SocError;
use crate::protocol::Millivolts;

/// A single calibration sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub voltage: Millivolts,
    /// State of charge, 0-100
    pub soc: f64,
}

impl CurvePoint {
    pub fn new(voltage: Millivolts, soc: f64) -> Self {
        Self { voltage, soc }
    }
}

/// Calibration curve: voltage (mV) to state of charge, ordered by voltage
///
/// SoC values are not required to be monotonic in voltage; measured tables are noisy.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    points: BTreeMap<Millivolts, f64>,
}

impl Curve {
    /// Build and validate a curve from `(voltage, soc)` pairs
    ///
    /// Rejects empty input, duplicate voltages and SoC values outside 0-100.
    pub fn new<I>(points: I) -> Result<Self, SocError>
    where
        I: IntoIterator<Item = (Millivolts, f64)>,
    {
        let mut map = BTreeMap::new();

        for (voltage, soc) in points {
            if !(0.0..=100.0).contains(&soc) {
                return Err(SocError::InvalidCurve(format!(
                    "state of charge {} at {} mV is outside 0-100",
                    soc, voltage
                )));
            }

            if map.insert(voltage, soc).is_some() {
                return Err(SocError::InvalidCurve(format!(
                    "duplicate voltage {} mV",
                    voltage
                )));
            }
        }

        if map.is_empty() {
            return Err(SocError::InvalidCurve("curve has no points".to_string()));
        }

        Ok(Self { points: map })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// SoC recorded at exactly `voltage`
    pub fn get(&self, voltage: Millivolts) -> Option<f64> {
        self.points.get(&voltage).copied()
    }

    /// The only point of a one-point curve
    pub fn single_point(&self) -> Option<CurvePoint> {
        match self.points.len() {
            1 => self
                .points
                .iter()
                .next()
                .map(|(&voltage, &soc)| CurvePoint::new(voltage, soc)),
            _ => None,
        }
    }

    /// Lowest and highest sampled voltage
    pub fn voltage_range(&self) -> (Millivolts, Millivolts) {
        let first = self.points.keys().next().copied().unwrap_or_default();
        let last = self.points.keys().next_back().copied().unwrap_or_default();
        (first, last)
    }

    /// Points whose voltage falls in `range`, in ascending voltage order
    pub fn range<R>(&self, range: R) -> btree_map::Range<'_, Millivolts, f64>
    where
        R: RangeBounds<Millivolts>,
    {
        self.points.range(range)
    }

    pub fn points(&self) -> impl DoubleEndedIterator<Item = CurvePoint> + '_ {
        self.points
            .iter()
            .map(|(&voltage, &soc)| CurvePoint::new(voltage, soc))
    }
}
