use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use cpfskcore::frame::{FrameAncillary, SampleFrame};
use cpfskcore::modulation::CpfskModulator;
use cpfskcore::processing::BufferPool;
use cpfskcore::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};
use cpfskcore::Interpolator;
use num_complex::Complex32;

pub struct WorkflowResult {
    pub samples: Vec<Complex32>,
    pub frames: Vec<SampleFrame>,
    pub symbols_consumed: usize,
    pub final_phase: f32,
    pub metrics: MetricsSnapshot,
}

pub struct Runner {
    config: WorkflowConfig,
    metrics: MetricsRecorder,
    logger: LogManager,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            metrics: MetricsRecorder::new(),
            logger: LogManager::new("simulator"),
        }
    }

    /// Streams `symbols` through a fresh modulator, `block_size` output samples per call.
    pub fn execute(&self, symbols: &[u8]) -> anyhow::Result<WorkflowResult> {
        let mut modulator = CpfskModulator::new(self.config.modulator.clone())
            .context("constructing CPFSK modulator")?;

        let block_size = self.config.block_size;
        let total = symbols
            .len()
            .checked_mul(modulator.interpolation())
            .context("overflow computing output length")?;

        let mut pool = BufferPool::with_capacity(1);
        let mut samples = Vec::with_capacity(total);
        let mut frames = Vec::new();
        let mut produced = 0;
        let mut consumed = 0;
        let mut block_index = 0;

        while produced < total {
            if let Some(change) = self
                .config
                .amplitude_schedule
                .iter()
                .find(|change| change.block == block_index)
            {
                modulator.set_amplitude(change.amplitude);
                self.logger.record(&format!(
                    "block {} amplitude -> {}",
                    block_index, change.amplitude
                ));
            }

            let noutput = block_size.min(total - produced);
            let mut buffer = pool
                .checkout(noutput)
                .context("checking out output buffer")?;
            let phase_start = modulator.phase();

            let report = match modulator.work(noutput, &symbols[consumed..], &mut buffer) {
                Ok(report) => report,
                Err(err) => {
                    self.metrics.record_error();
                    return Err(err).with_context(|| format!("modulating block {}", block_index));
                }
            };
            self.metrics.record_block(report.produced);

            if self.config.record_frames {
                frames.push(SampleFrame::new(
                    &buffer[..report.produced],
                    FrameAncillary {
                        mod_name: self.config.name.clone(),
                        block_index,
                        start_sample: produced,
                        symbols_consumed: report.consumed,
                        phase_start,
                        phase_end: modulator.phase(),
                        amplitude: modulator.amplitude(),
                    },
                ));
            }

            samples.extend_from_slice(&buffer[..report.produced]);
            pool.release(buffer);
            produced += report.produced;
            consumed += report.consumed;
            block_index += 1;
        }

        self.logger.record(&format!(
            "{} streamed {} symbols into {} samples over {} blocks",
            self.config.name, consumed, produced, block_index
        ));

        Ok(WorkflowResult {
            samples,
            frames,
            symbols_consumed: consumed,
            final_phase: modulator.phase(),
            metrics: self.metrics.snapshot(),
        })
    }
}
