use anyhow::{bail, Context};
use num_complex::Complex32;
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Total complex noise power for a unit-power signal at `snr_db`.
pub fn noise_power(snr_db: f32) -> f32 {
    10f32.powf(-snr_db / 10.0)
}

/// Adds complex white Gaussian noise of amplitude `sqrt(10^(-snr/10))`,
/// split evenly between I and Q.
pub fn add_awgn(samples: &[Complex32], snr_db: f32, seed: u64) -> anyhow::Result<Vec<Complex32>> {
    if !snr_db.is_finite() {
        bail!("snr_db must be finite, got {}", snr_db);
    }

    let std_dev = (noise_power(snr_db) / 2.0).sqrt();
    let noise = Normal::new(0.0f32, std_dev).context("building noise distribution")?;
    let mut rng = StdRng::seed_from_u64(seed);

    Ok(samples
        .iter()
        .map(|s| s + Complex32::new(noise.sample(&mut rng), noise.sample(&mut rng)))
        .collect())
}
