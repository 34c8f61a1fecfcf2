/// Counts reported back to the caller after one `work` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkReport {
    pub consumed: usize,
    pub produced: usize,
}

/// Common error type for modulator construction and streaming.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ModulatorError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("buffer underrun: need {needed} input symbols, {available} available")]
    BufferUnderrun { needed: usize, available: usize },
    #[error("output buffer holds {capacity} samples, {requested} requested")]
    OutputTooShort { requested: usize, capacity: usize },
    #[error("{requested} samples is not a whole number of {samples_per_symbol}-sample symbols")]
    PartialSymbol {
        requested: usize,
        samples_per_symbol: usize,
    },
    #[error("buffer exhaustion: {0}")]
    BufferExhaustion(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type ModulatorResult<T> = Result<T, ModulatorError>;

/// Fixed-ratio streaming block: every input item yields `interpolation()` output items.
///
/// `work` is handed ready-made buffers and asked for `noutput` items; the
/// implementation must either produce exactly that many or fail without
/// touching its internal state.
pub trait Interpolator {
    type In;
    type Out;

    fn interpolation(&self) -> usize;

    /// Number of input items needed to produce `noutput` output items.
    fn required_input_len(&self, noutput: usize) -> usize {
        let ratio = self.interpolation().max(1);
        noutput.div_ceil(ratio)
    }

    fn work(
        &mut self,
        noutput: usize,
        input: &[Self::In],
        output: &mut [Self::Out],
    ) -> ModulatorResult<WorkReport>;
}
