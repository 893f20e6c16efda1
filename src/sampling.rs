use std::ops::Range;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::error::{RecipeError, RecipeResult};
use crate::types::CellGid;

/// Random stream for one cell. The seed and gid are combined by plain
/// addition, so seed 42 / gid 42 yields the same stream as seed 0 / gid 84.
pub fn cell_rng(seed: u64, gid: CellGid) -> StdRng {
    StdRng::seed_from_u64(seed.wrapping_add(gid as u64))
}

pub fn available_pool_size(excluded_gid: CellGid, pool: &Range<CellGid>) -> usize {
    if pool.contains(&excluded_gid) {
        pool.len() - 1
    } else {
        pool.len()
    }
}

/// Draws `count` distinct gids from `pool` without `excluded_gid`, uniformly
/// and without replacement: the whole pool is shuffled and a prefix taken.
pub fn sample_subset(
    rng: &mut StdRng,
    excluded_gid: CellGid,
    pool: Range<CellGid>,
    count: usize,
) -> RecipeResult<Vec<CellGid>> {
    let available = available_pool_size(excluded_gid, &pool);

    if count > available {
        return Err(RecipeError::invalid_configuration(format!(
            "cannot draw {} sources from a pool of {} cells [{}, {}) excluding cell {}",
            count, available, pool.start, pool.end, excluded_gid
        )));
    }

    Ok(shuffled_prefix(rng, excluded_gid, pool, count))
}

/// Variant of [`sample_subset`] for draw counts that were validated up
/// front. `count` must not exceed the available pool.
pub(crate) fn shuffled_prefix(
    rng: &mut StdRng,
    excluded_gid: CellGid,
    pool: Range<CellGid>,
    count: usize,
) -> Vec<CellGid> {
    let mut candidates: Vec<CellGid> = pool.filter(|gid| *gid != excluded_gid).collect();
    debug_assert!(
        count <= candidates.len(),
        "draw of {} exceeds the {} available cells",
        count,
        candidates.len()
    );
    candidates.shuffle(rng);
    candidates.truncate(count);
    candidates
}
