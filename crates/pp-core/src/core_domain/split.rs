use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::core::ExampleGroup;

pub const DEFAULT_SHUFFLE_SEED: u64 = 333;
pub const DEFAULT_DEV_SIZE: usize = 500;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainDevSplit<T> {
    pub train: Vec<T>,
    pub dev: Vec<T>,
}

impl<T> TrainDevSplit<T> {
    /// Partitions in output order: `train` first, then `dev`.
    pub fn into_named(self) -> [(&'static str, Vec<T>); 2] {
        [("train", self.train), ("dev", self.dev)]
    }
}

/// Shuffles `items` with a generator seeded from `seed`, then holds out the
/// last `min(dev_size, len)` items as dev.
///
/// The permutation is Fisher-Yates driven by `StdRng`; it is stable for a
/// given `rand` release but not meant to match other implementations.
pub fn split_train_dev<T>(mut items: Vec<T>, seed: u64, dev_size: usize) -> TrainDevSplit<T> {
    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);

    let holdout = dev_size.min(items.len());
    let dev = items.split_off(items.len() - holdout);
    TrainDevSplit { train: items, dev }
}

/// Keeps only groups that answer the root prompt of their tree.
pub fn first_turn_only(groups: Vec<ExampleGroup>) -> Vec<ExampleGroup> {
    groups.into_iter().filter(ExampleGroup::is_first_turn).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
