use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use cpfskcore::modulation::unpack_msb_first;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Random packed bytes and the symbols unpacked from them.
#[derive(Debug, Clone)]
pub struct Payload {
    pub bytes: Vec<u8>,
    pub symbols: Vec<u8>,
}

/// Uniform bytes in `0..255`, reproducible for a given seed.
pub fn random_bytes(count: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| rng.gen_range(0u8..255)).collect()
}

pub fn build_payload(config: &WorkflowConfig) -> anyhow::Result<Payload> {
    let bytes = random_bytes(config.payload_bytes, config.seed);
    let symbols = unpack_msb_first(&bytes, config.modulator.bits_per_symbol)
        .context("unpacking payload into symbols")?;
    Ok(Payload { bytes, symbols })
}
