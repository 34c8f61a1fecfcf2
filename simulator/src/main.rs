use anyhow::Context;
use clap::Parser;
use cpfskcore::math::StatsHelper;
use cpfskcore::modulation::{CpfskPreset, WrapPolicy};
use generator::channel::add_awgn;
use generator::exemplar::extract_exemplars;
use generator::payload::build_payload;
use log::info;
use std::path::PathBuf;
use workflow::config::{ModulatorOverrides, WorkflowConfig, DEFAULT_SYMBOLS_PER_BLOCK};
use workflow::runner::Runner;

mod generator;
mod output;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline CPFSK modulation driver")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Named transmitter settings: 2cpfsk, 4cpfsk or 8cpfsk
    #[arg(long, default_value = "2cpfsk", conflicts_with = "workflow")]
    preset: CpfskPreset,
    #[arg(long)]
    k: Option<f32>,
    #[arg(long)]
    amplitude: Option<f32>,
    #[arg(long)]
    samples_per_symbol: Option<usize>,
    #[arg(long)]
    bits_per_symbol: Option<u32>,
    /// Phase wrap rule: symmetric or reference
    #[arg(long)]
    wrap: Option<WrapPolicy>,
    /// Random payload size in bytes
    #[arg(long, default_value_t = 1024, conflicts_with = "workflow")]
    bytes: usize,
    #[arg(long, default_value_t = 0, conflicts_with = "workflow")]
    seed: u64,
    /// Output samples requested per work call
    #[arg(long)]
    block_size: Option<usize>,
    #[arg(long, default_value_t = 0, conflicts_with = "workflow")]
    exemplars: usize,
    #[arg(long, default_value_t = 128, conflicts_with = "workflow")]
    exemplar_len: usize,
    /// Pass the exemplar stream through an AWGN channel at this SNR (dB)
    #[arg(long, allow_hyphen_values = true)]
    snr_db: Option<f32>,
    /// Write raw interleaved f32 I/Q samples
    #[arg(long)]
    output: Option<PathBuf>,
    /// Write every streamed block as JSON
    #[arg(long)]
    frames: Option<PathBuf>,
    #[arg(long)]
    exemplar_output: Option<PathBuf>,
    /// Append a one-line run summary
    #[arg(long)]
    report: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ModulatorOverrides {
        ModulatorOverrides {
            k: self.k,
            amplitude: self.amplitude,
            samples_per_symbol: self.samples_per_symbol,
            bits_per_symbol: self.bits_per_symbol,
            wrap: self.wrap,
        }
    }

    fn workflow_config(&self) -> anyhow::Result<WorkflowConfig> {
        let overrides = self.overrides();
        let mut config = if let Some(path) = &self.workflow {
            WorkflowConfig::load(path)?
        } else {
            let mut config = WorkflowConfig::from_preset(self.preset);
            config.payload_bytes = self.bytes;
            config.seed = self.seed;
            config.exemplars = self.exemplars;
            config.exemplar_len = self.exemplar_len;
            if overrides.changes_waveform() {
                config.name = format!("{}-custom", self.preset.name());
            }
            config
        };

        overrides.apply(&mut config.modulator);
        if let Some(block_size) = self.block_size {
            config.block_size = block_size;
        } else if self.workflow.is_none() {
            config.block_size = config.modulator.samples_per_symbol * DEFAULT_SYMBOLS_PER_BLOCK;
        }
        config.snr_db = self.snr_db.or(config.snr_db);
        config.record_frames |= self.frames.is_some();
        config.validate().context("resolving workflow settings")?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.workflow_config()?;

    let payload = build_payload(&config)?;
    info!(
        "{}: {} payload bytes -> {} symbols",
        config.name,
        payload.bytes.len(),
        payload.symbols.len()
    );

    let runner = Runner::new(config.clone());
    let result = runner.execute(&payload.symbols)?;

    let summary = format!(
        "{} symbols={} samples={} blocks={} errors={} final_phase={:.6} rms={:.4}",
        config.name,
        result.symbols_consumed,
        result.samples.len(),
        result.metrics.blocks,
        result.metrics.errors,
        result.final_phase,
        StatsHelper::rms_magnitude(&result.samples)
    );
    println!("{}", summary);

    if let Some(path) = &args.output {
        output::writer::write_cf32(path, &result.samples)?;
        info!("wrote {} samples to {}", result.samples.len(), path.display());
    }
    if let Some(path) = &args.frames {
        output::writer::write_frames(path, &result.frames)?;
        info!("wrote {} frames to {}", result.frames.len(), path.display());
    }

    if config.exemplars > 0 {
        let stream = match config.snr_db {
            Some(snr_db) => add_awgn(&result.samples, snr_db, config.seed)?,
            None => result.samples.clone(),
        };
        let set = extract_exemplars(
            &config.name,
            config.snr_db,
            &stream,
            config.exemplars,
            config.exemplar_len,
            config.seed,
        )?;
        let (rows, columns) = set.matrix.dim();
        println!("{} exemplars -> {}x{} matrix", set.mod_name, rows, columns);
        if let Some(path) = &args.exemplar_output {
            output::writer::write_exemplars(path, &set)?;
        }
    }

    if let Some(path) = &args.report {
        output::writer::append_report(path, &summary)?;
    }

    Ok(())
}
