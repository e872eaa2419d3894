use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use tracing::debug;

/// Picks `min(sample_size, total)` distinct row positions with a seeded
/// generator. Positions come back ascending so the sample keeps file order.
pub fn sample_indices(total: usize, sample_size: usize, seed: u64) -> Vec<usize> {
    if sample_size >= total {
        return (0..total).collect();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut picked = index::sample(&mut rng, total, sample_size).into_vec();
    picked.sort_unstable();
    picked
}

/// Keeps the rows chosen by `sample_indices`, consuming the input.
pub fn sample_records<T>(records: Vec<T>, sample_size: usize, seed: u64) -> Vec<T> {
    let total = records.len();
    if sample_size >= total {
        debug!(total, "sample covers the full table");
        return records;
    }

    let mut keep = vec![false; total];
    for i in sample_indices(total, sample_size, seed) {
        keep[i] = true;
    }

    debug!(total, sample_size, seed, "drew seeded sample");
    records
        .into_iter()
        .zip(keep)
        .filter_map(|(record, kept)| kept.then_some(record))
        .collect()
}
