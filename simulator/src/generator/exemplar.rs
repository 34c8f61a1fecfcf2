use anyhow::{bail, Context};
use cpfskcore::math::{ExemplarMatrix, StatsHelper};
use ndarray::Array2;
use num_complex::Complex32;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Energy-normalised windows cut from one modulated stream.
#[derive(Debug, Clone)]
pub struct ExemplarSet {
    pub mod_name: String,
    /// Channel SNR the stream passed through, `None` for a clean stream.
    pub snr_db: Option<f32>,
    pub offsets: Vec<usize>,
    /// One row per exemplar, `re, im` interleaved.
    pub matrix: Array2<f32>,
}

/// Start offsets spaced by a random gap of `2 * len .. 4 * len` samples.
///
/// Fails as soon as a window would run past `available` samples.
fn exemplar_offsets(
    count: usize,
    len: usize,
    available: usize,
    seed: u64,
) -> anyhow::Result<Vec<usize>> {
    let (Some(min_gap), Some(max_gap)) = (len.checked_mul(2), len.checked_mul(4)) else {
        bail!("exemplar length {} overflows the gap range", len);
    };

    let mut rng = StdRng::seed_from_u64(seed);
    let mut offsets = Vec::with_capacity(count.min(available));
    let mut offset = 0usize;
    for _ in 0..count {
        let gap = rng.gen_range(min_gap..max_gap);
        let fits = |start: &usize| start.checked_add(len).is_some_and(|end| end <= available);
        let Some(start) = offset.checked_add(gap).filter(fits) else {
            bail!(
                "{} exemplars of {} samples do not fit in a stream of {} samples",
                count,
                len,
                available
            );
        };
        offset = start;
        offsets.push(start);
    }
    Ok(offsets)
}

pub fn extract_exemplars(
    mod_name: &str,
    snr_db: Option<f32>,
    samples: &[Complex32],
    count: usize,
    len: usize,
    seed: u64,
) -> anyhow::Result<ExemplarSet> {
    if len == 0 {
        bail!("exemplar length must be positive");
    }

    let offsets = exemplar_offsets(count, len, samples.len(), seed)?;

    let windows: Vec<Vec<Complex32>> = offsets
        .iter()
        .map(|&offset| {
            let mut window = samples[offset..offset + len].to_vec();
            StatsHelper::normalize_by_energy(&mut window);
            window
        })
        .collect();

    let matrix = ExemplarMatrix::from_exemplars(&windows).context("packing exemplar matrix")?;
    Ok(ExemplarSet {
        mod_name: mod_name.to_string(),
        snr_db,
        offsets,
        matrix,
    })
}
