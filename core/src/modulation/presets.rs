use crate::modulation::params::CpfskParams;
use crate::prelude::ModulatorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Modulation index scale used by every CPFSK preset.
pub const PRESET_K: f32 = 0.5;
pub const PRESET_SAMPLES_PER_SYMBOL: usize = 8;

/// Named 2/4/8-level CPFSK transmitter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpfskPreset {
    #[serde(rename = "2cpfsk")]
    Cpfsk2,
    #[serde(rename = "4cpfsk")]
    Cpfsk4,
    #[serde(rename = "8cpfsk")]
    Cpfsk8,
}

impl CpfskPreset {
    pub const ALL: [CpfskPreset; 3] = [
        CpfskPreset::Cpfsk2,
        CpfskPreset::Cpfsk4,
        CpfskPreset::Cpfsk8,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CpfskPreset::Cpfsk2 => "2cpfsk",
            CpfskPreset::Cpfsk4 => "4cpfsk",
            CpfskPreset::Cpfsk8 => "8cpfsk",
        }
    }

    pub fn bits_per_symbol(self) -> u32 {
        match self {
            CpfskPreset::Cpfsk2 => 1,
            CpfskPreset::Cpfsk4 => 2,
            CpfskPreset::Cpfsk8 => 3,
        }
    }

    pub fn params(self) -> CpfskParams {
        CpfskParams::new(
            PRESET_K,
            1.0,
            PRESET_SAMPLES_PER_SYMBOL,
            self.bits_per_symbol(),
        )
    }
}

impl fmt::Display for CpfskPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CpfskPreset {
    type Err = ModulatorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        CpfskPreset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(value))
            .ok_or_else(|| ModulatorError::Configuration(format!("unknown preset '{}'", value)))
    }
}
