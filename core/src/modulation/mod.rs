pub mod cpfsk;
pub mod params;
pub mod presets;
pub mod symbols;

pub use cpfsk::{step, CpfskModulator, CpfskState, PhaseStep};
pub use params::{CpfskParams, WrapPolicy};
pub use presets::CpfskPreset;
pub use symbols::unpack_msb_first;
