use num_complex::Complex32;
use rustfft::{num_traits::Zero, Fft, FftPlanner};

/// Helper that wraps the `rustfft` planner for reuse.
pub struct FftHelper {
    fft: std::sync::Arc<dyn Fft<f32>>,
    size: usize,
}

impl FftHelper {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        Self { fft, size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Forward transform of the first `size` samples, zero-padded if shorter.
    pub fn forward(&self, input: &[Complex32]) -> Vec<Complex32> {
        let mut buffer: Vec<Complex32> = input.iter().take(self.size).copied().collect();
        buffer.resize(self.size, Complex32::zero());
        self.fft.process(&mut buffer);
        buffer
    }

    /// Index of the strongest bin.
    pub fn peak_bin(&self, input: &[Complex32]) -> usize {
        self.forward(input)
            .iter()
            .enumerate()
            .fold((0, f32::MIN), |best, (idx, value)| {
                let power = value.norm_sqr();
                if power > best.1 {
                    (idx, power)
                } else {
                    best
                }
            })
            .0
    }

    /// Peak frequency in cycles per sample, folded into `[-0.5, 0.5)`.
    pub fn peak_frequency(&self, input: &[Complex32]) -> f32 {
        let bin = self.peak_bin(input);
        let size = self.size as f32;
        if bin as f32 >= size / 2.0 {
            (bin as f32 - size) / size
        } else {
            bin as f32 / size
        }
    }
}
