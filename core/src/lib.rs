//! Continuous-phase FSK modulation core.
//!
//! The modulator turns a stream of byte-valued symbols into complex baseband
//! samples at a fixed interpolation ratio, keeping its phase accumulator
//! continuous across every `work` call. Helpers for symbol unpacking, block
//! framing, spectral checks and telemetry sit around it.

pub mod frame;
pub mod math;
pub mod modulation;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use modulation::{CpfskModulator, CpfskParams, CpfskPreset, CpfskState, WrapPolicy};
pub use prelude::{Interpolator, ModulatorError, ModulatorResult, WorkReport};
