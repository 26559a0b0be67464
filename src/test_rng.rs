//! Scripted random source for exact state-machine traces in unit tests.

use rand::RngCore;

/// Yields a fixed sequence of uniform `f64` draws, then a value just below 1.
///
/// `rng.random::<f64>()` keeps the top 53 bits of `next_u64`, so each scripted
/// value is encoded into those bits.
pub struct ScriptedRng {
    values: Vec<f64>,
    next: usize,
    pub draws: usize,
}

const FALLBACK: f64 = 0.999_999;

impl ScriptedRng {
    pub fn new(values: &[f64]) -> Self {
        Self {
            values: values.to_vec(),
            next: 0,
            draws: 0,
        }
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let value = self.values.get(self.next).copied().unwrap_or(FALLBACK);
        self.next += 1;
        self.draws += 1;
        ((value * (1_u64 << 53) as f64) as u64) << 11
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
