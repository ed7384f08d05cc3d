use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Randomness consumed by a search restart.
pub trait TrialRng {
    fn randomized_index_vector(&mut self, out: &mut [u32]);
}

#[derive(Debug, Clone)]
pub struct RustRng {
    rng: SmallRng,
}

impl RustRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Uniform index in `0..len`; `len` must be non-zero.
    #[inline]
    pub fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

impl TrialRng for RustRng {
    fn randomized_index_vector(&mut self, out: &mut [u32]) {
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = i as u32;
        }
        let size = out.len();
        for i in 0..size {
            let j = self.rng.gen_range(i..size);
            out.swap(i, j);
        }
    }
}

/// Separates restart seeds from walk seeds drawn off the same base seed.
pub const RESTART_STREAM: u64 = 0x5EED_0F_4E57_A475;

/// Derives an independent seed for stream element `index`.
#[inline]
pub fn mix_seed(base_seed: u64, index: u64) -> u64 {
    // SplitMix64 finalizer.
    let mut z = base_seed ^ index.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn randomized_index_vector_is_a_permutation() {
        let mut rng = RustRng::new(7);
        let mut order = vec![0u32; 50];
        rng.randomized_index_vector(&mut order);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<u32>>());
    }

    #[test]
    fn same_seed_same_order() {
        let mut a = vec![0u32; 20];
        let mut b = vec![0u32; 20];
        RustRng::new(99).randomized_index_vector(&mut a);
        RustRng::new(99).randomized_index_vector(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn mixed_seeds_differ_per_index() {
        assert_ne!(mix_seed(123, 0), mix_seed(123, 1));
        assert_eq!(mix_seed(123, 5), mix_seed(123, 5));
    }
}
