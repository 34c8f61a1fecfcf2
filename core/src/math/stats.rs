use num_complex::Complex32;

pub struct StatsHelper;

impl StatsHelper {
    /// Sum of squared magnitudes.
    pub fn energy(samples: &[Complex32]) -> f32 {
        samples.iter().map(|s| s.norm_sqr()).sum()
    }

    pub fn rms_magnitude(samples: &[Complex32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        (Self::energy(samples) / samples.len() as f32).sqrt()
    }

    /// Divides every sample by the window energy; all-zero windows are left untouched.
    pub fn normalize_by_energy(samples: &mut [Complex32]) -> f32 {
        let energy = Self::energy(samples);
        if energy > 0.0 {
            for sample in samples.iter_mut() {
                *sample /= energy;
            }
        }
        energy
    }
}
