use crate::prelude::{ModulatorError, ModulatorResult};

/// Splits packed bytes into `bits_per_chunk`-bit symbols, most significant bit first.
///
/// Bits are read as one continuous stream, so a chunk may straddle two bytes.
/// Trailing bits that do not fill a whole chunk are dropped.
pub fn unpack_msb_first(bytes: &[u8], bits_per_chunk: u32) -> ModulatorResult<Vec<u8>> {
    if !(1..=8).contains(&bits_per_chunk) {
        return Err(ModulatorError::Configuration(format!(
            "bits_per_chunk must be within 1..=8, got {}",
            bits_per_chunk
        )));
    }

    let width = bits_per_chunk as usize;
    let chunk_count = bytes.len() * 8 / width;
    let mut symbols = Vec::with_capacity(chunk_count);

    for chunk in 0..chunk_count {
        let mut value = 0u8;
        for offset in 0..width {
            let bit_index = chunk * width + offset;
            let bit = (bytes[bit_index / 8] >> (7 - bit_index % 8)) & 1;
            value = (value << 1) | bit;
        }
        symbols.push(value);
    }

    Ok(symbols)
}
