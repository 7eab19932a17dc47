//! Deterministic partitioning of voting records into batches

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha12Rng;

/// Shuffle seed for voting records; changing it invalidates every cached
/// member summary
pub const SHUFFLE_SEED: u64 = 338;

/// Named generator rather than `StdRng`, whose algorithm may change between
/// `rand` releases. Cached prompts depend on the exact shuffle.
type ShuffleRng = ChaCha12Rng;

/// How many batches fit a token budget when each batch may produce up to
/// `output_token_ceiling` tokens. One slot is kept for the merge step.
pub fn batch_count_for(token_budget: u32, output_token_ceiling: u32) -> usize {
    if output_token_ceiling == 0 {
        return 1;
    }
    ((token_budget / output_token_ceiling) as usize)
        .saturating_sub(1)
        .max(1)
}

/// Shuffle `records` with `seed`, then slice them into `batch_count`
/// contiguous groups.
///
/// Every group but the last holds `len / batch_count` records; the last
/// takes the remainder. When there are fewer records than batches all of
/// them land in the first group and the rest are empty.
pub fn partition<T: Clone>(records: &[T], batch_count: usize, seed: u64) -> Vec<Vec<T>> {
    let batch_count = batch_count.max(1);
    let mut shuffled = records.to_vec();
    shuffled.shuffle(&mut ShuffleRng::seed_from_u64(seed));

    if shuffled.len() < batch_count {
        let mut batches = vec![Vec::new(); batch_count];
        batches[0] = shuffled;
        return batches;
    }

    let batch_size = shuffled.len() / batch_count;
    let mut batches = Vec::with_capacity(batch_count);
    let mut rest = shuffled.as_slice();
    for _ in 0..batch_count - 1 {
        let (head, tail) = rest.split_at(batch_size);
        batches.push(head.to_vec());
        rest = tail;
    }
    batches.push(rest.to_vec());
    batches
}
