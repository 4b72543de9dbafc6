use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::calibration::{CalibrationStore, load_calibration_file};
use crate::error::SocError;
use crate::protocol::{ChargingMode, Millivolts};

#[derive(Parser, Debug)]
#[command(name = "battery-soc")]
#[command(about = "Estimate headset battery charge from voltage readings")]
#[command(version)]
pub struct Cli {
    /// TOML calibration file; its curves replace the built-in ones
    #[arg(short, long, env = "BATTERY_SOC_CALIBRATION")]
    pub calibration: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Estimate charge from a known mode and voltage
    Estimate(EstimateArgs),

    /// Decode a raw battery response and estimate charge
    Decode(DecodeArgs),

    /// List the calibration curves in use
    Curves,
}

#[derive(Args, Debug, Clone)]
pub struct EstimateArgs {
    /// Charging mode selecting the calibration curve
    #[arg(short, long, value_enum)]
    pub mode: ModeArg,

    /// Battery voltage in millivolts
    #[arg(short, long)]
    pub voltage: Millivolts,
}

#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
    /// Response bytes in hex (e.g. `11 ff 08 00 0f 3c 01`); read from stdin when omitted
    pub bytes: Vec<String>,
}

impl DecodeArgs {
    /// The response as one line, if given on the command line
    pub fn response_line(&self) -> Option<String> {
        if self.bytes.is_empty() {
            None
        } else {
            Some(self.bytes.join(" "))
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    /// Running on battery
    Discharging,
    /// Charging, voltage rising
    Charging,
    /// Charging, voltage falling
    ChargingDescending,
    /// Fully charged
    Full,
}

impl From<ModeArg> for ChargingMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Discharging => ChargingMode::Discharging,
            ModeArg::Charging => ChargingMode::ChargingAscending,
            ModeArg::ChargingDescending => ChargingMode::ChargingDescending,
            ModeArg::Full => ChargingMode::Full,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `Status: 73.2% [discharging]`
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

impl Cli {
    /// Built-in curves, overridden by the calibration file if one is given
    pub fn load_store(&self) -> Result<CalibrationStore, SocError> {
        let store = CalibrationStore::builtin()?;

        match &self.calibration {
            Some(path) => Ok(store.with_overrides(load_calibration_file(path)?)),
            None => Ok(store),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_estimate() {
        let cli = Cli::parse_from([
            "battery-soc",
            "estimate",
            "--mode",
            "discharging",
            "--voltage",
            "3800",
        ]);

        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.calibration.is_none());

        let Command::Estimate(args) = cli.command else {
            panic!("Expected Estimate command");
        };
        assert_eq!(ChargingMode::from(args.mode), ChargingMode::Discharging);
        assert_eq!(args.voltage, 3800);
    }

    #[test]
    fn test_cli_parse_mode_names() {
        for (name, expected) in [
            ("discharging", ChargingMode::Discharging),
            ("charging", ChargingMode::ChargingAscending),
            ("charging-descending", ChargingMode::ChargingDescending),
            ("full", ChargingMode::Full),
        ] {
            let cli = Cli::parse_from(["battery-soc", "estimate", "-m", name, "-v", "4000"]);
            let Command::Estimate(args) = cli.command else {
                panic!("Expected Estimate command");
            };
            assert_eq!(ChargingMode::from(args.mode), expected);
            assert_eq!(ChargingMode::from(args.mode).as_str(), name);
        }
    }

    #[test]
    fn test_cli_parse_decode() {
        let cli = Cli::parse_from([
            "battery-soc",
            "--format",
            "json",
            "decode",
            "11",
            "ff",
            "08",
            "00",
            "0f",
            "3c",
            "01",
        ]);

        assert_eq!(cli.format, OutputFormat::Json);

        let Command::Decode(args) = cli.command else {
            panic!("Expected Decode command");
        };
        assert_eq!(
            args.response_line().as_deref(),
            Some("11 ff 08 00 0f 3c 01")
        );
    }

    #[test]
    fn test_cli_parse_decode_from_stdin() {
        let cli = Cli::parse_from(["battery-soc", "decode"]);

        let Command::Decode(args) = cli.command else {
            panic!("Expected Decode command");
        };
        assert!(args.response_line().is_none());
    }

    #[test]
    fn test_cli_parse_curves_with_calibration() {
        let cli = Cli::parse_from(["battery-soc", "--calibration", "cal.toml", "curves"]);

        assert_eq!(cli.calibration, Some(PathBuf::from("cal.toml")));
        assert!(matches!(cli.command, Command::Curves));
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        let result = Cli::try_parse_from(["battery-soc", "estimate", "-m", "idle", "-v", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_store_builtin() {
        let cli = Cli::parse_from(["battery-soc", "curves"]);
        let store = cli.load_store().unwrap();

        assert_eq!(store.len(), ChargingMode::ALL.len());
    }

    #[test]
    fn test_load_store_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calibration.toml");
        std::fs::write(
            &path,
            "[[curve]]\nmode = \"discharging\"\npoints = [[3000, 0.0], [4000, 100.0]]\n",
        )
        .unwrap();

        let cli = Cli::parse_from([
            "battery-soc",
            "--calibration",
            path.to_str().unwrap(),
            "curves",
        ]);
        let store = cli.load_store().unwrap();

        assert_eq!(store.len(), ChargingMode::ALL.len());
        let curve = store.get_curve(ChargingMode::Discharging).unwrap();
        assert_eq!(curve.voltage_range(), (3000, 4000));
    }
}
