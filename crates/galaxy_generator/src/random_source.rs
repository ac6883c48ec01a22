use rand::Rng;

/// Where the generator draws its randomness from.
///
/// Every `rand::Rng` is a source, so both `rand::rng()` and a seeded `StdRng` can be
/// passed straight to [`crate::generate`].
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn unit(&mut self) -> f32;

    /// `+1` or `-1` with equal probability.
    fn sign(&mut self) -> f32 {
        if self.unit() < 0.5 { 1.0 } else { -1.0 }
    }
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_unit_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let u = rng.unit();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_sign_is_balanced() {
        let mut rng = StdRng::seed_from_u64(11);
        let positive = (0..10_000).filter(|_| rng.sign() > 0.0).count();
        // 10k fair coin flips, 5 sigma is about 250
        assert!((4_750..=5_250).contains(&positive), "got {}", positive);
    }
}
