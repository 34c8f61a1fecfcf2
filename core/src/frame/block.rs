use num_complex::Complex32;
use serde::{Deserialize, Serialize};

/// Bookkeeping recorded alongside each streamed block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAncillary {
    pub mod_name: String,
    pub block_index: usize,
    pub start_sample: usize,
    pub symbols_consumed: usize,
    pub phase_start: f32,
    pub phase_end: f32,
    pub amplitude: f32,
}

/// One block of modulated output, stored as `[re, im]` pairs for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleFrame {
    pub samples: Vec<[f32; 2]>,
    pub ancillary: FrameAncillary,
}

impl SampleFrame {
    pub fn new(samples: &[Complex32], ancillary: FrameAncillary) -> Self {
        Self {
            samples: samples.iter().map(|s| [s.re, s.im]).collect(),
            ancillary,
        }
    }

    pub fn to_complex(&self) -> Vec<Complex32> {
        self.samples
            .iter()
            .map(|&[re, im]| Complex32::new(re, im))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
