use crate::prelude::ModulatorError;
use num_complex::Complex32;

/// Scoped pool of output buffers that caps how many blocks are in flight.
pub struct BufferPool {
    buffers: Vec<Vec<Complex32>>,
    max_capacity: usize,
    outstanding: usize,
}

impl BufferPool {
    pub fn with_capacity(max_capacity: usize) -> Self {
        Self {
            buffers: Vec::with_capacity(max_capacity),
            max_capacity,
            outstanding: 0,
        }
    }

    /// Hands out a zeroed buffer of `length` samples, reusing a released one when possible.
    pub fn checkout(&mut self, length: usize) -> Result<Vec<Complex32>, ModulatorError> {
        if self.outstanding >= self.max_capacity {
            return Err(ModulatorError::BufferExhaustion(format!(
                "{} buffers already checked out",
                self.outstanding
            )));
        }

        let mut buffer = self.buffers.pop().unwrap_or_default();
        buffer.clear();
        buffer.resize(length, Complex32::new(0.0, 0.0));
        self.outstanding += 1;
        Ok(buffer)
    }

    /// Returns a buffer back to the pool for reuse.
    pub fn release(&mut self, mut buffer: Vec<Complex32>) {
        buffer.clear();
        self.outstanding = self.outstanding.saturating_sub(1);
        if self.buffers.len() < self.max_capacity {
            self.buffers.push(buffer);
        }
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn reset(&mut self) {
        self.buffers.clear();
        self.outstanding = 0;
    }
}
