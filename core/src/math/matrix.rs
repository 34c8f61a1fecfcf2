use crate::prelude::{ModulatorError, ModulatorResult};
use ndarray::Array2;
use num_complex::Complex32;

pub struct ExemplarMatrix;

impl ExemplarMatrix {
    /// Packs equal-length exemplars into rows of interleaved `re, im` values.
    pub fn from_exemplars(exemplars: &[Vec<Complex32>]) -> ModulatorResult<Array2<f32>> {
        let width = exemplars.first().map(Vec::len).unwrap_or(0);
        if exemplars.iter().any(|row| row.len() != width) {
            return Err(ModulatorError::InvalidInput(
                "exemplars must share one length".into(),
            ));
        }

        let flat: Vec<f32> = exemplars
            .iter()
            .flat_map(|row| row.iter().flat_map(|s| [s.re, s.im]))
            .collect();
        Array2::from_shape_vec((exemplars.len(), width * 2), flat)
            .map_err(|err| ModulatorError::InvalidInput(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_interleave_real_and_imaginary() {
        let rows = vec![
            vec![Complex32::new(1.0, 2.0), Complex32::new(3.0, 4.0)],
            vec![Complex32::new(5.0, 6.0), Complex32::new(7.0, 8.0)],
        ];
        let matrix = ExemplarMatrix::from_exemplars(&rows).unwrap();
        assert_eq!(matrix.dim(), (2, 4));
        assert_eq!(matrix[[1, 2]], 7.0);
        assert_eq!(matrix[[0, 1]], 2.0);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows = vec![vec![Complex32::new(1.0, 0.0)], vec![]];
        assert!(ExemplarMatrix::from_exemplars(&rows).is_err());
    }
}
