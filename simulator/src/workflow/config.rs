use anyhow::{bail, Context};
use cpfskcore::modulation::{CpfskParams, CpfskPreset, WrapPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Symbols streamed per `work` call when no block size is given.
pub const DEFAULT_SYMBOLS_PER_BLOCK: usize = 8;

/// Amplitude applied from the start of `block` onwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AmplitudeChange {
    pub block: usize,
    pub amplitude: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub name: String,
    pub modulator: CpfskParams,
    pub payload_bytes: usize,
    pub seed: u64,
    /// Output samples requested per `work` call.
    pub block_size: usize,
    pub amplitude_schedule: Vec<AmplitudeChange>,
    pub record_frames: bool,
    /// AWGN channel SNR applied before exemplars are cut; `None` keeps the stream clean.
    pub snr_db: Option<f32>,
    pub exemplars: usize,
    pub exemplar_len: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self::from_preset(CpfskPreset::Cpfsk2)
    }
}

/// Command-line values that replace individual modulator parameters.
#[derive(Clone, Debug, Default)]
pub struct ModulatorOverrides {
    pub k: Option<f32>,
    pub amplitude: Option<f32>,
    pub samples_per_symbol: Option<usize>,
    pub bits_per_symbol: Option<u32>,
    pub wrap: Option<WrapPolicy>,
}

impl ModulatorOverrides {
    /// True when an override changes the waveform itself, not just its level or wrap rule.
    pub fn changes_waveform(&self) -> bool {
        self.k.is_some() || self.samples_per_symbol.is_some() || self.bits_per_symbol.is_some()
    }

    pub fn apply(&self, params: &mut CpfskParams) {
        if let Some(k) = self.k {
            params.k = k;
        }
        if let Some(amplitude) = self.amplitude {
            params.amplitude = amplitude;
        }
        if let Some(samples_per_symbol) = self.samples_per_symbol {
            params.samples_per_symbol = samples_per_symbol;
        }
        if let Some(bits_per_symbol) = self.bits_per_symbol {
            params.bits_per_symbol = bits_per_symbol;
        }
        if let Some(wrap) = self.wrap {
            params.wrap = wrap;
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .validate()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_preset(preset: CpfskPreset) -> Self {
        let modulator = preset.params();
        Self {
            name: preset.name().to_string(),
            block_size: modulator.samples_per_symbol * DEFAULT_SYMBOLS_PER_BLOCK,
            modulator,
            payload_bytes: 1024,
            seed: 0,
            amplitude_schedule: Vec::new(),
            record_frames: false,
            snr_db: None,
            exemplars: 0,
            exemplar_len: 128,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.modulator
            .validate()
            .context("invalid modulator parameters")?;

        let sps = self.modulator.samples_per_symbol;
        if self.block_size == 0 || self.block_size % sps != 0 {
            bail!(
                "block_size {} must be a positive multiple of samples_per_symbol {}",
                self.block_size,
                sps
            );
        }
        if self.exemplars > 0 && self.exemplar_len == 0 {
            bail!("exemplar_len must be positive when exemplars are requested");
        }
        if let Some(snr_db) = self.snr_db.filter(|snr| !snr.is_finite()) {
            bail!("snr_db {} is not finite", snr_db);
        }
        if let Some(change) = self
            .amplitude_schedule
            .iter()
            .find(|change| !change.amplitude.is_finite())
        {
            bail!("amplitude change at block {} is not finite", change.block);
        }
        Ok(())
    }
}
