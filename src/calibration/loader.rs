use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::curve::Curve;
use super::store::CalibrationStore;
use crate::error::SocError;
use crate::protocol::{ChargingMode, Millivolts};

const DISCHARGING_CSV: &str = include_str!("../../data/discharging.csv");
const CHARGING_ASCENDING_CSV: &str = include_str!("../../data/charging_ascending.csv");
const CHARGING_DESCENDING_CSV: &str = include_str!("../../data/charging_descending.csv");

/// Flat curve: a full battery always reports 100%
const FULL_POINTS: [(Millivolts, f64); 2] = [(0, 100.0), (1, 100.0)];

/// Parse `voltage,soc` lines into a curve
///
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_csv(input: &str) -> Result<Curve, SocError> {
    let mut points = Vec::new();

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((voltage, soc)) = trimmed.split_once(',') else {
            return Err(SocError::CurveParse {
                line: line_no,
                reason: format!("expected `voltage,soc`, got {:?}", trimmed),
            });
        };

        let voltage = voltage
            .trim()
            .parse::<Millivolts>()
            .map_err(|e| SocError::CurveParse {
                line: line_no,
                reason: format!("invalid voltage {:?}: {}", voltage.trim(), e),
            })?;

        let soc = soc.trim().parse::<f64>().map_err(|e| SocError::CurveParse {
            line: line_no,
            reason: format!("invalid state of charge {:?}: {}", soc.trim(), e),
        })?;

        points.push((voltage, soc));
    }

    Curve::new(points)
}

/// Read and parse a CSV calibration file
pub fn load_csv_file(path: &Path) -> Result<Curve, SocError> {
    let contents = std::fs::read_to_string(path)?;
    let curve = parse_csv(&contents)?;

    tracing::debug!("Loaded {} calibration points from {:?}", curve.len(), path);

    Ok(curve)
}

/// Calibration tables shipped with the crate
pub fn builtin_store() -> Result<CalibrationStore, SocError> {
    let store = CalibrationStore::new([
        (ChargingMode::Discharging, parse_csv(DISCHARGING_CSV)?),
        (
            ChargingMode::ChargingAscending,
            parse_csv(CHARGING_ASCENDING_CSV)?,
        ),
        (
            ChargingMode::ChargingDescending,
            parse_csv(CHARGING_DESCENDING_CSV)?,
        ),
    ])
    .with_curve(ChargingMode::Full, FULL_POINTS)?;

    Ok(store)
}

/// TOML calibration file
///
/// ```toml
/// [[curve]]
/// mode = "discharging"
/// file = "discharging.csv"
///
/// [[curve]]
/// mode = "full"
/// points = [[0, 100.0], [1, 100.0]]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalibrationFile {
    #[serde(default, rename = "curve")]
    pub curves: Vec<CurveEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurveEntry {
    pub mode: ChargingMode,
    /// CSV file, relative to the calibration file's directory
    pub file: Option<PathBuf>,
    /// Inline `[voltage, soc]` pairs
    pub points: Option<Vec<(Millivolts, f64)>>,
}

impl CalibrationFile {
    pub fn from_toml_str(input: &str) -> Result<Self, SocError> {
        Ok(toml::from_str(input)?)
    }

    /// Resolve every entry into a curve; relative CSV paths are joined onto `base_dir`
    pub fn into_store(self, base_dir: &Path) -> Result<CalibrationStore, SocError> {
        let mut seen = BTreeSet::new();
        let mut curves = Vec::with_capacity(self.curves.len());

        for entry in self.curves {
            if !seen.insert(entry.mode) {
                return Err(SocError::Config(format!(
                    "mode {} is calibrated more than once",
                    entry.mode
                )));
            }

            let curve = match (entry.file, entry.points) {
                (Some(file), None) => load_csv_file(&base_dir.join(file))?,
                (None, Some(points)) => Curve::new(points)?,
                _ => {
                    return Err(SocError::Config(format!(
                        "curve for mode {} needs exactly one of `file` or `points`",
                        entry.mode
                    )));
                }
            };

            curves.push((entry.mode, curve));
        }

        Ok(CalibrationStore::new(curves))
    }
}

/// Load a TOML calibration file into a store holding only the curves it names
pub fn load_calibration_file(path: &Path) -> Result<CalibrationStore, SocError> {
    let contents = std::fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    let store = CalibrationFile::from_toml_str(&contents)?.into_store(base_dir)?;

    tracing::info!(
        "Loaded {} calibration curve(s) from {:?}",
        store.len(),
        path
    );

    Ok(store)
}
