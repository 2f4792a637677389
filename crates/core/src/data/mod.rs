use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::DataConfig;

/// Produces the random bar heights fed to the engines.
#[derive(Debug)]
pub struct DataGenerator {
    rng: StdRng,
    len: usize,
    min_value: u32,
    max_value: u32,
}

impl DataGenerator {
    /// Seeds from `config.seed` when present so shuffles are reproducible,
    /// otherwise from OS entropy.
    pub fn new(config: &DataConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            len: config.len,
            min_value: config.min_value.min(config.max_value),
            max_value: config.max_value.max(config.min_value),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Draws a fresh array of uniformly distributed values.
    pub fn generate(&mut self) -> Vec<u32> {
        (0..self.len)
            .map(|_| self.rng.gen_range(self.min_value..=self.max_value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: Option<u64>) -> DataConfig {
        DataConfig {
            len: 64,
            min_value: 10,
            max_value: 20,
            seed,
        }
    }

    #[test]
    fn values_stay_in_range() {
        let mut generator = DataGenerator::new(&config(None));
        let values = generator.generate();
        assert_eq!(values.len(), 64);
        assert!(values.iter().all(|v| (10..=20).contains(v)));
    }

    #[test]
    fn seeded_generators_agree() {
        let mut a = DataGenerator::new(&config(Some(11)));
        let mut b = DataGenerator::new(&config(Some(11)));
        assert_eq!(a.generate(), b.generate());
        assert_eq!(a.generate(), b.generate());
    }

    #[test]
    fn degenerate_range_is_constant() {
        let mut generator = DataGenerator::new(&DataConfig {
            len: 5,
            min_value: 7,
            max_value: 7,
            seed: Some(1),
        });
        assert_eq!(generator.generate(), vec![7; 5]);
    }
}
