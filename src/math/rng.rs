use rand::{Error, RngCore, SeedableRng};

/// Seeded mulberry32 generator.
///
/// The sequence is a pure function of the seed and the number of draws, so
/// datasets and initial weights are reproducible across runs and platforms.
/// `next_f64` yields `u32 / 2^32`, which is exactly representable in `f64`.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Mulberry32 {
        Mulberry32 { state: seed }
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let t = self.state;
        let mut r = (t ^ (t >> 15)).wrapping_mul(1 | t);
        r ^= r.wrapping_add((r ^ (r >> 7)).wrapping_mul(61 | r));
        r ^ (r >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Mulberry32 {
        Mulberry32::new(u32::from_le_bytes(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;

    #[test]
    fn matches_recorded_sequence() {
        let mut rng = Mulberry32::new(42);
        assert_eq!(rng.next_f64(), 0.6011037519201636);
        assert_eq!(rng.next_f64(), 0.44829055899754167);
        assert_eq!(rng.next_f64(), 0.8524657934904099);

        let mut rng = Mulberry32::new(0);
        assert_eq!(rng.next_f64(), 0.26642920868471265);
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = Mulberry32::new(1234);
        let mut c = Mulberry32::from_seed(1234u32.to_le_bytes());
        for _ in 0..100 {
            let x = a.next_f64();
            assert!((0.0..1.0).contains(&x));
            assert_eq!(x, c.next_f64());
        }
    }

    #[test]
    fn drives_rand_helpers_deterministically() {
        let mut v: Vec<u32> = (0..16).collect();
        let mut w = v.clone();
        v.shuffle(&mut Mulberry32::new(9));
        w.shuffle(&mut Mulberry32::new(9));
        assert_eq!(v, w);
    }
}
