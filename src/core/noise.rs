/// A source of uniformly distributed values in `[0.0, 1.0)`.
///
/// Effects that inject noise own their source, so a stream can be rendered
/// reproducibly by seeding it, and tests can substitute a scripted sequence.
pub trait NoiseSource: Send {
    fn next_unit(&mut self) -> f32;
}

/// Linear congruential generator.
///
/// Statistically weak but cheap and allocation free, which is all dither-like
/// audio noise needs.
#[derive(Clone, Debug)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub const DEFAULT_SEED: u32 = 12345;

    pub fn new(seed: u32) -> Self {
        Lcg { state: seed }
    }
}

impl Default for Lcg {
    fn default() -> Self {
        Lcg::new(Self::DEFAULT_SEED)
    }
}

impl NoiseSource for Lcg {
    #[inline]
    fn next_unit(&mut self) -> f32 {
        self.state = self.state.wrapping_mul(1103515245).wrapping_add(12345);
        // Top 24 bits fit an f32 mantissa exactly, so the result stays below 1.0.
        (self.state >> 8) as f32 / 16_777_216.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcg_range_and_mean() {
        let mut rng = Lcg::default();
        let mut sum = 0.0f64;
        let n = 10_000;
        for _ in 0..n {
            let v = rng.next_unit();
            assert!((0.0..1.0).contains(&v));
            sum += v as f64;
        }
        let mean = sum / n as f64;
        assert!((mean - 0.5).abs() < 0.02, "mean {}", mean);
    }

    #[test]
    fn test_lcg_is_reproducible() {
        let mut a = Lcg::new(7);
        let mut b = Lcg::new(7);
        let mut c = Lcg::new(8);
        let first_a = a.next_unit();
        assert_eq!(first_a, b.next_unit());
        assert_ne!(first_a, c.next_unit());
    }
}
