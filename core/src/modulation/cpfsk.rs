use crate::modulation::params::{CpfskParams, WrapPolicy};
use crate::prelude::{Interpolator, ModulatorError, ModulatorResult, WorkReport};
use crate::telemetry::log::LogManager;
use num_complex::Complex32;

/// Mutable streaming state: the phase accumulator in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CpfskState {
    pub phase: f32,
}

/// Per-sample phase advance derived once from the construction parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseStep {
    pub frequency_step: f32,
    pub mid_level: i32,
    pub wrap: WrapPolicy,
}

impl PhaseStep {
    pub fn from_params(params: &CpfskParams) -> Self {
        Self {
            frequency_step: params.frequency_step(),
            mid_level: params.mid_level(),
            wrap: params.wrap,
        }
    }

    /// Signed phase increment contributed by one sample of `symbol`.
    ///
    /// Levels at or above the mid level carry a `+1` offset, so `mid` itself
    /// maps to one positive step and `mid - 1` to one negative step.
    pub fn increment(&self, symbol: u8) -> f32 {
        let level = i32::from(symbol);
        if level >= self.mid_level {
            (level - self.mid_level + 1) as f32 * self.frequency_step
        } else {
            -((self.mid_level - level) as f32 * self.frequency_step)
        }
    }
}

/// Advances `state` by one output sample of `symbol` and returns the new
/// state with the emitted `amplitude * exp(j * phase)` sample.
pub fn step(
    phase_step: &PhaseStep,
    state: CpfskState,
    symbol: u8,
    amplitude: f32,
) -> (CpfskState, Complex32) {
    let phase = phase_step
        .wrap
        .apply(state.phase + phase_step.increment(symbol));
    (CpfskState { phase }, Complex32::from_polar(amplitude, phase))
}

/// Continuous-phase FSK modulator, a fixed `samples_per_symbol : 1` interpolator.
pub struct CpfskModulator {
    params: CpfskParams,
    phase_step: PhaseStep,
    state: CpfskState,
    logger: LogManager,
}

impl CpfskModulator {
    pub fn new(params: CpfskParams) -> ModulatorResult<Self> {
        params.validate()?;
        let phase_step = PhaseStep::from_params(&params);
        let logger = LogManager::new("cpfsk");
        logger.record(&format!(
            "CpfskModulator sps={} bits={} step={:.6} mid={} wrap={}",
            params.samples_per_symbol,
            params.bits_per_symbol,
            phase_step.frequency_step,
            phase_step.mid_level,
            params.wrap
        ));

        Ok(Self {
            params,
            phase_step,
            state: CpfskState::default(),
            logger,
        })
    }

    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.params.amplitude = amplitude;
    }

    pub fn amplitude(&self) -> f32 {
        self.params.amplitude
    }

    pub fn frequency_step(&self) -> f32 {
        self.phase_step.frequency_step
    }

    pub fn phase(&self) -> f32 {
        self.state.phase
    }

    pub fn mid_level(&self) -> i32 {
        self.phase_step.mid_level
    }

    pub fn samples_per_symbol(&self) -> usize {
        self.params.samples_per_symbol
    }

    /// Construction parameters, with `amplitude` reflecting the latest `set_amplitude`.
    pub fn params(&self) -> &CpfskParams {
        &self.params
    }

    pub fn state(&self) -> CpfskState {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = CpfskState::default();
    }

    /// Symbols needed for `noutput` samples, rounding a partial symbol up.
    pub fn required_input_len(&self, noutput: usize) -> usize {
        let sps = self.params.samples_per_symbol;
        noutput.div_ceil(sps)
    }

    /// Writes exactly `noutput` samples into `output`, reading one symbol per
    /// `samples_per_symbol` samples from `input`.
    ///
    /// All checks run before any sample is written, so a failed call leaves
    /// the phase where the previous call ended.
    pub fn work(
        &mut self,
        noutput: usize,
        input: &[u8],
        output: &mut [Complex32],
    ) -> ModulatorResult<WorkReport> {
        let sps = self.params.samples_per_symbol;
        if noutput % sps != 0 {
            return Err(ModulatorError::PartialSymbol {
                requested: noutput,
                samples_per_symbol: sps,
            });
        }

        let needed = self.required_input_len(noutput);
        if input.len() < needed {
            return Err(ModulatorError::BufferUnderrun {
                needed,
                available: input.len(),
            });
        }
        if output.len() < noutput {
            return Err(ModulatorError::OutputTooShort {
                requested: noutput,
                capacity: output.len(),
            });
        }

        let amplitude = self.params.amplitude;
        let mut state = self.state;
        for (&symbol, span) in input[..needed]
            .iter()
            .zip(output[..noutput].chunks_exact_mut(sps))
        {
            for slot in span.iter_mut() {
                let (next, sample) = step(&self.phase_step, state, symbol, amplitude);
                state = next;
                *slot = sample;
            }
        }
        self.state = state;

        self.logger.trace(format_args!(
            "work consumed={} produced={} phase={:.6}",
            needed, noutput, state.phase
        ));

        Ok(WorkReport {
            consumed: needed,
            produced: noutput,
        })
    }

    /// Modulates a whole symbol slice in one call.
    pub fn modulate(&mut self, symbols: &[u8]) -> ModulatorResult<Vec<Complex32>> {
        let noutput = symbols
            .len()
            .checked_mul(self.params.samples_per_symbol)
            .ok_or_else(|| ModulatorError::InvalidInput("output length overflows".into()))?;
        let mut output = vec![Complex32::new(0.0, 0.0); noutput];
        self.work(noutput, symbols, &mut output)?;
        Ok(output)
    }
}

impl Interpolator for CpfskModulator {
    type In = u8;
    type Out = Complex32;

    fn interpolation(&self) -> usize {
        self.params.samples_per_symbol
    }

    fn required_input_len(&self, noutput: usize) -> usize {
        CpfskModulator::required_input_len(self, noutput)
    }

    fn work(
        &mut self,
        noutput: usize,
        input: &[u8],
        output: &mut [Complex32],
    ) -> ModulatorResult<WorkReport> {
        CpfskModulator::work(self, noutput, input, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::FftHelper;
    use crate::modulation::params::TWO_PI;
    use std::f32::consts::PI;

    const TOLERANCE: f32 = 1e-5;

    fn binary_modulator(wrap: WrapPolicy) -> CpfskModulator {
        CpfskModulator::new(CpfskParams::new(1.0, 1.0, 4, 1).with_wrap(wrap)).unwrap()
    }

    fn assert_close(actual: Complex32, expected: Complex32) {
        assert!(
            (actual - expected).norm() < TOLERANCE,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn construction_derives_step_and_mid_level() {
        let modulator = binary_modulator(WrapPolicy::Symmetric);
        assert!((modulator.frequency_step() - PI / 4.0).abs() < TOLERANCE);
        assert_eq!(modulator.mid_level(), 1);
        assert_eq!(modulator.phase(), 0.0);
        assert_eq!(modulator.amplitude(), 1.0);
    }

    #[test]
    fn construction_rejects_zero_samples_per_symbol() {
        let err = CpfskModulator::new(CpfskParams::new(1.0, 1.0, 0, 1))
            .err()
            .unwrap();
        assert!(matches!(err, ModulatorError::Configuration(_)));
    }

    #[test]
    fn golden_binary_sequence() {
        let mut modulator = binary_modulator(WrapPolicy::Symmetric);
        let output = modulator.modulate(&[0, 1]).unwrap();
        assert_eq!(output.len(), 8);

        let expected_phases = [
            -PI / 4.0,
            -PI / 2.0,
            -3.0 * PI / 4.0,
            -PI,
            -3.0 * PI / 4.0,
            -PI / 2.0,
            -PI / 4.0,
            0.0,
        ];
        for (sample, phase) in output.iter().zip(expected_phases) {
            assert_close(*sample, Complex32::from_polar(1.0, phase));
        }
        assert!(modulator.phase().abs() < TOLERANCE);
    }

    #[test]
    fn reference_wrap_emits_same_samples_in_upper_turn() {
        let symbols = [0u8, 1, 1, 0, 0, 0, 1, 1, 1, 1, 0];
        let mut symmetric = binary_modulator(WrapPolicy::Symmetric);
        let mut reference = binary_modulator(WrapPolicy::Reference);

        let lhs = symmetric.modulate(&symbols).unwrap();
        let mut rhs = Vec::new();
        for &symbol in &symbols {
            rhs.extend(reference.modulate(&[symbol]).unwrap());
            let phase = reference.phase();
            assert!((TWO_PI..=2.0 * TWO_PI).contains(&phase), "phase {}", phase);
        }

        // the upper turn carries coarser f32 resolution
        for (a, b) in lhs.iter().zip(&rhs) {
            assert!((a - b).norm() < 1e-4, "{:?} vs {:?}", a, b);
        }
    }

    #[test]
    fn phase_continues_across_calls() {
        let symbols = [3u8, 0, 2, 1, 3, 3, 0, 1, 2, 2];
        let params = CpfskParams::new(0.5, 1.0, 8, 2);

        let mut whole = CpfskModulator::new(params.clone()).unwrap();
        let expected = whole.modulate(&symbols).unwrap();

        let mut split = CpfskModulator::new(params).unwrap();
        let mut streamed = vec![Complex32::new(0.0, 0.0); expected.len()];
        let mut consumed = 0;
        let mut produced = 0;
        for block in [8usize, 24, 0, 16, 32] {
            let phase_before = split.phase();
            let report = split
                .work(
                    block,
                    &symbols[consumed..],
                    &mut streamed[produced..produced + block],
                )
                .unwrap();
            if block == 0 {
                assert_eq!(split.phase(), phase_before);
            }
            consumed += report.consumed;
            produced += report.produced;
        }

        assert_eq!(produced, expected.len());
        assert_eq!(consumed, symbols.len());
        for (a, b) in streamed.iter().zip(&expected) {
            assert_close(*a, *b);
        }
        assert_eq!(split.phase(), whole.phase());
    }

    #[test]
    fn work_reports_fixed_rate() {
        let mut modulator = CpfskModulator::new(CpfskParams::new(0.5, 1.0, 8, 3)).unwrap();
        let input = [7u8; 5];
        let mut output = vec![Complex32::new(0.0, 0.0); 40];
        let report = modulator.work(40, &input, &mut output).unwrap();
        assert_eq!(
            report,
            WorkReport {
                consumed: 5,
                produced: 40
            }
        );
    }

    #[test]
    fn symbol_is_reused_across_its_span() {
        let mut modulator = CpfskModulator::new(CpfskParams::new(1.0, 1.0, 4, 2)).unwrap();
        let step = modulator.frequency_step();
        let output = modulator.modulate(&[3, 0]).unwrap();

        // symbol 3, mid 2: +2 steps per sample; symbol 0: -2 steps per sample
        let mut phase = 0.0_f32;
        for (idx, sample) in output.iter().enumerate() {
            phase += if idx < 4 { 2.0 * step } else { -2.0 * step };
            assert_close(*sample, Complex32::from_polar(1.0, phase));
        }
    }

    #[test]
    fn binary_mapping_moves_one_step_per_sample() {
        let mut modulator = binary_modulator(WrapPolicy::Symmetric);
        let step = modulator.frequency_step();

        modulator.modulate(&[0]).unwrap();
        assert!((modulator.phase() + 4.0 * step).abs() < TOLERANCE);

        let phase_step = PhaseStep::from_params(modulator.params());
        assert!((phase_step.increment(200) - 200.0 * step).abs() < TOLERANCE);
        assert!((phase_step.increment(0) + step).abs() < TOLERANCE);

        modulator.reset();
        modulator.modulate(&[1]).unwrap();
        assert!((modulator.phase() - 4.0 * step).abs() < TOLERANCE);
    }

    #[test]
    fn amplitude_change_affects_only_later_samples() {
        let mut modulator = binary_modulator(WrapPolicy::Symmetric);
        let first = modulator.modulate(&[1, 0]).unwrap();
        modulator.set_amplitude(2.5);
        let second = modulator.modulate(&[1, 1]).unwrap();

        assert!(first.iter().all(|s| (s.norm() - 1.0).abs() < TOLERANCE));
        assert!(second.iter().all(|s| (s.norm() - 2.5).abs() < TOLERANCE));
        assert_eq!(modulator.amplitude(), 2.5);
        assert_eq!(modulator.params().amplitude, 2.5);
    }

    #[test]
    fn phase_stays_within_wrap_bounds() {
        for wrap in [WrapPolicy::Symmetric, WrapPolicy::Reference] {
            let mut modulator =
                CpfskModulator::new(CpfskParams::new(3.0, 1.0, 2, 8).with_wrap(wrap)).unwrap();
            let (low, high) = wrap.bounds();
            for symbol in (0..=255u8).step_by(17) {
                modulator.modulate(&[symbol]).unwrap();
                let phase = modulator.phase();
                assert!(phase >= low && phase <= high, "{:?} phase {}", wrap, phase);
            }
        }
    }

    #[test]
    fn undersized_input_is_rejected_without_advancing() {
        let mut modulator = binary_modulator(WrapPolicy::Symmetric);
        modulator.modulate(&[1]).unwrap();
        let phase = modulator.phase();

        let mut output = vec![Complex32::new(0.0, 0.0); 16];
        let err = modulator.work(16, &[0, 1, 0], &mut output).unwrap_err();
        assert_eq!(
            err,
            ModulatorError::BufferUnderrun {
                needed: 4,
                available: 3
            }
        );
        assert_eq!(modulator.phase(), phase);
        assert!(output.iter().all(|s| *s == Complex32::new(0.0, 0.0)));
    }

    #[test]
    fn undersized_output_is_rejected() {
        let mut modulator = binary_modulator(WrapPolicy::Symmetric);
        let mut output = vec![Complex32::new(0.0, 0.0); 4];
        let err = modulator.work(8, &[0, 1], &mut output).unwrap_err();
        assert!(matches!(err, ModulatorError::OutputTooShort { .. }));
    }

    #[test]
    fn partial_symbol_request_is_rejected() {
        let mut modulator = binary_modulator(WrapPolicy::Symmetric);
        let mut output = vec![Complex32::new(0.0, 0.0); 8];
        let err = modulator.work(6, &[0, 1], &mut output).unwrap_err();
        assert_eq!(
            err,
            ModulatorError::PartialSymbol {
                requested: 6,
                samples_per_symbol: 4
            }
        );
        assert_eq!(modulator.required_input_len(6), 2);
    }

    #[test]
    fn step_function_is_pure() {
        let modulator = binary_modulator(WrapPolicy::Symmetric);
        let phase_step = PhaseStep::from_params(modulator.params());
        let start = CpfskState { phase: 1.0 };
        let (a, sample_a) = step(&phase_step, start, 1, 2.0);
        let (b, sample_b) = step(&phase_step, start, 1, 2.0);
        assert_eq!(a, b);
        assert_eq!(sample_a, sample_b);
        assert!((a.phase - (1.0 + PI / 4.0)).abs() < TOLERANCE);
        assert!((phase_step.increment(0) + PI / 4.0).abs() < TOLERANCE);
    }

    #[test]
    fn constant_symbol_produces_steady_tone() {
        let helper = FftHelper::new(64);

        let mut modulator = binary_modulator(WrapPolicy::Symmetric);
        let upper = modulator.modulate(&[1; 16]).unwrap();
        assert_eq!(helper.peak_bin(&upper), 8);

        let mut modulator = binary_modulator(WrapPolicy::Reference);
        let lower = modulator.modulate(&[0; 16]).unwrap();
        assert!((helper.peak_frequency(&lower) + 0.125).abs() < 1e-6);
    }

    #[test]
    fn modulator_drives_through_interpolator_trait() {
        fn run<I: Interpolator<In = u8, Out = Complex32>>(block: &mut I) -> usize {
            let ratio = block.interpolation();
            let input = [0u8, 1, 1];
            let mut output = vec![Complex32::new(0.0, 0.0); ratio * input.len()];
            block
                .work(ratio * input.len(), &input, &mut output)
                .map(|report| report.produced)
                .unwrap_or(0)
        }

        let mut modulator = binary_modulator(WrapPolicy::Symmetric);
        assert_eq!(run(&mut modulator), 12);
        assert_eq!(Interpolator::required_input_len(&modulator, 12), 3);
    }

    #[test]
    fn required_input_len_handles_usize_max() {
        let modulator = binary_modulator(WrapPolicy::Symmetric);
        assert_eq!(modulator.required_input_len(usize::MAX), usize::MAX / 4 + 1);
        assert_eq!(
            Interpolator::required_input_len(&modulator, usize::MAX),
            usize::MAX / 4 + 1
        );
        assert_eq!(modulator.required_input_len(0), 0);
        assert_eq!(modulator.required_input_len(5), 2);
    }
}
