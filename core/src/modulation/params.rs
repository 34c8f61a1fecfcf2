use crate::prelude::{ModulatorError, ModulatorResult};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

pub const TWO_PI: f32 = 2.0 * PI;

/// Largest symbol width a byte-valued input port can carry.
pub const MAX_BITS_PER_SYMBOL: u32 = 8;

/// Beyond this magnitude the wrap loops would spin for too long (or forever
/// once `phase - 2π == phase` in f32), so the phase is reduced with `%` first.
const LOOP_WRAP_LIMIT: f32 = 1024.0 * TWO_PI;

/// Rule used to keep the phase accumulator bounded after every sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WrapPolicy {
    /// Fold into `[-2π, 2π]`.
    #[default]
    Symmetric,
    /// Bit-compatible with existing CPFSK recordings: the lower check compares against
    /// `+2π`, so the accumulator settles in `[2π, 4π)` (4π itself can appear
    /// through f32 rounding).
    Reference,
}

impl WrapPolicy {
    pub fn apply(self, phase: f32) -> f32 {
        let mut phase = if phase.abs() > LOOP_WRAP_LIMIT {
            phase % TWO_PI
        } else {
            phase
        };

        while phase > TWO_PI {
            phase -= TWO_PI;
        }
        let lower = match self {
            WrapPolicy::Symmetric => -TWO_PI,
            WrapPolicy::Reference => TWO_PI,
        };
        while phase < lower {
            phase += TWO_PI;
        }
        phase
    }

    /// Inclusive range the accumulator lies within after `apply`.
    pub fn bounds(self) -> (f32, f32) {
        match self {
            WrapPolicy::Symmetric => (-TWO_PI, TWO_PI),
            WrapPolicy::Reference => (TWO_PI, 2.0 * TWO_PI),
        }
    }
}

impl fmt::Display for WrapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WrapPolicy::Symmetric => f.write_str("symmetric"),
            WrapPolicy::Reference => f.write_str("reference"),
        }
    }
}

impl FromStr for WrapPolicy {
    type Err = ModulatorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "symmetric" => Ok(WrapPolicy::Symmetric),
            "reference" => Ok(WrapPolicy::Reference),
            other => Err(ModulatorError::Configuration(format!(
                "unknown wrap policy '{}'",
                other
            ))),
        }
    }
}

/// Construction parameters for a CPFSK modulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpfskParams {
    /// Phase-sensitivity scale factor.
    pub k: f32,
    pub amplitude: f32,
    pub samples_per_symbol: usize,
    pub bits_per_symbol: u32,
    #[serde(default)]
    pub wrap: WrapPolicy,
}

impl CpfskParams {
    pub fn new(k: f32, amplitude: f32, samples_per_symbol: usize, bits_per_symbol: u32) -> Self {
        Self {
            k,
            amplitude,
            samples_per_symbol,
            bits_per_symbol,
            wrap: WrapPolicy::default(),
        }
    }

    pub fn with_wrap(mut self, wrap: WrapPolicy) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn validate(&self) -> ModulatorResult<()> {
        if self.samples_per_symbol == 0 {
            return Err(ModulatorError::Configuration(
                "samples_per_symbol must be positive".into(),
            ));
        }
        if self.bits_per_symbol == 0 || self.bits_per_symbol > MAX_BITS_PER_SYMBOL {
            return Err(ModulatorError::Configuration(format!(
                "bits_per_symbol must be within 1..={}, got {}",
                MAX_BITS_PER_SYMBOL, self.bits_per_symbol
            )));
        }
        if !self.k.is_finite() {
            return Err(ModulatorError::Configuration("k must be finite".into()));
        }
        if !self.amplitude.is_finite() {
            return Err(ModulatorError::Configuration(
                "amplitude must be finite".into(),
            ));
        }
        Ok(())
    }

    /// `k * π / (samples_per_symbol * bits_per_symbol)`
    pub fn frequency_step(&self) -> f32 {
        self.k * PI / (self.samples_per_symbol as f32 * self.bits_per_symbol as f32)
    }

    /// `2^(bits_per_symbol - 1)`
    pub fn mid_level(&self) -> i32 {
        1 << (self.bits_per_symbol.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_constants_follow_construction_formula() {
        let params = CpfskParams::new(0.5, 1.0, 8, 2);
        assert!((params.frequency_step() - 0.5 * PI / 16.0).abs() < 1e-7);
        assert_eq!(params.mid_level(), 2);
        assert_eq!(CpfskParams::new(1.0, 1.0, 4, 1).mid_level(), 1);
        assert_eq!(CpfskParams::new(1.0, 1.0, 4, 8).mid_level(), 128);
    }

    #[test]
    fn validation_rejects_degenerate_parameters() {
        assert!(CpfskParams::new(1.0, 1.0, 0, 1).validate().is_err());
        assert!(CpfskParams::new(1.0, 1.0, 4, 0).validate().is_err());
        assert!(CpfskParams::new(1.0, 1.0, 4, 9).validate().is_err());
        assert!(CpfskParams::new(f32::NAN, 1.0, 4, 1).validate().is_err());
        assert!(CpfskParams::new(1.0, f32::INFINITY, 4, 1).validate().is_err());
        assert!(CpfskParams::new(-1.0, 0.0, 1, 8).validate().is_ok());
    }

    #[test]
    fn symmetric_wrap_folds_both_directions() {
        let wrap = WrapPolicy::Symmetric;
        assert!((wrap.apply(2.5 * TWO_PI) - 0.5 * TWO_PI).abs() < 1e-5);
        assert!((wrap.apply(-2.5 * TWO_PI) + 0.5 * TWO_PI).abs() < 1e-5);
        assert_eq!(wrap.apply(-PI), -PI);
        assert_eq!(wrap.apply(TWO_PI), TWO_PI);
    }

    #[test]
    fn reference_wrap_lifts_into_upper_turn() {
        let wrap = WrapPolicy::Reference;
        assert!((wrap.apply(-PI / 4.0) - 15.0 * PI / 4.0).abs() < 1e-5);
        assert!((wrap.apply(PI) - 3.0 * PI).abs() < 1e-5);
        assert_eq!(wrap.apply(TWO_PI), TWO_PI);
        let (low, high) = wrap.bounds();
        for raw in [-40.0_f32, -7.0, -0.1, 0.0, 3.0, 6.5, 13.0, 90.0] {
            let wrapped = wrap.apply(raw);
            assert!(wrapped >= low && wrapped < high, "{} -> {}", raw, wrapped);
        }
    }

    #[test]
    fn wrap_handles_huge_phase_without_spinning() {
        let wrapped = WrapPolicy::Symmetric.apply(1.0e12);
        assert!(wrapped.abs() <= TWO_PI);
    }

    #[test]
    fn wrap_policy_parses_from_text() {
        assert_eq!("reference".parse::<WrapPolicy>().unwrap(), WrapPolicy::Reference);
        assert_eq!("Symmetric".parse::<WrapPolicy>().unwrap(), WrapPolicy::Symmetric);
        assert!("loose".parse::<WrapPolicy>().is_err());
    }

    #[test]
    fn params_deserialize_with_default_wrap() {
        let json = r#"{"k":0.5,"amplitude":1.0,"samples_per_symbol":8,"bits_per_symbol":3}"#;
        let params: CpfskParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.wrap, WrapPolicy::Symmetric);
        assert_eq!(params.bits_per_symbol, 3);
    }
}
