use rayon::prelude::*;
use smallvec::SmallVec;

use crate::atom::Atom;
use crate::element::covalent_radius_nm;
use crate::error::CoreError;
use crate::topology::morton::morton_sort;

/// Below this atom count, Morton pre-sorting is skipped — it's a
/// cache-locality optimization, not a correctness requirement.
const MORTON_SORT_THRESHOLD: usize = 10_000;

const INNER_BLOCK: usize = 4;
const MID_BLOCK: usize = 16;
const OUTER_BLOCK: usize = 64;

pub type MatchList = SmallVec<[u32; 8]>;

/// Accumulator entry kept sorted by ascending (distance, index) while a
/// query's candidate set is being built; converted to a plain `MatchList`
/// once a query's scan is complete.
type ScoredList = SmallVec<[(f64, u32); 8]>;

/// How the per-pair match radius is determined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RadiusSpec {
    AbsoluteRadius(f64),
    /// radius(i, j) = k * (covalent_radius(i) + covalent_radius(j)).
    CovalentBondLength(f64),
}

impl RadiusSpec {
    fn pair_radius(self, a: &Atom, b: &Atom) -> f64 {
        match self {
            RadiusSpec::AbsoluteRadius(r) => r,
            RadiusSpec::CovalentBondLength(k) => {
                k * (covalent_radius_nm(a.atomic_number) + covalent_radius_nm(b.atomic_number))
            }
        }
    }

    /// A conservative upper bound on the radius for any pair in `targets`,
    /// used to prune block pairs before the exact per-pair check.
    fn max_possible_radius(self, targets: &[Atom]) -> f64 {
        match self {
            RadiusSpec::AbsoluteRadius(r) => r,
            RadiusSpec::CovalentBondLength(k) => {
                let max_radius = targets
                    .iter()
                    .map(|a| covalent_radius_nm(a.atomic_number))
                    .fold(0.0_f64, f64::max);
                k * 2.0 * max_radius
            }
        }
    }
}

#[derive(Clone, Copy)]
struct AabbF {
    min: [f32; 3],
    max: [f32; 3],
}

impl AabbF {
    fn of(atoms: &[Atom]) -> Self {
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for a in atoms {
            for axis in 0..3 {
                let v = a.position.to_array()[axis];
                min[axis] = min[axis].min(v);
                max[axis] = max[axis].max(v);
            }
        }
        AabbF { min, max }
    }

    /// Conservative lower bound on the distance between any point in this
    /// box and any point in `other`.
    fn lower_bound_distance(&self, other: &AabbF) -> f64 {
        let mut sum = 0.0_f64;
        for axis in 0..3 {
            let a_lo = self.min[axis];
            let a_hi = self.max[axis];
            let b_lo = other.min[axis];
            let b_hi = other.max[axis];
            let gap = if a_hi < b_lo {
                b_lo - a_hi
            } else if b_hi < a_lo {
                a_lo - b_hi
            } else {
                0.0
            };
            sum += (gap as f64) * (gap as f64);
        }
        sum.sqrt()
    }
}

struct Block {
    start: usize,
    end: usize,
    bounds: AabbF,
}

fn partition_blocks(atoms: &[Atom], block_size: usize) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut start = 0;
    while start < atoms.len() {
        let end = (start + block_size).min(atoms.len());
        blocks.push(Block { start, end, bounds: AabbF::of(&atoms[start..end]) });
        start = end;
    }
    blocks
}

/// Runs radius-bounded nearest-neighbor matching for `queries` against
/// `targets`. Each returned list holds at most `max_neighbors` target
/// indices, sorted by ascending distance, ties broken by ascending index.
/// When the true neighbor count exceeds `max_neighbors`, only the closest
/// survive — the contract only covers that ordering, so no error is
/// raised for having more candidates than fit.
pub fn match_atoms(
    queries: &[Atom],
    targets: &[Atom],
    algorithm: RadiusSpec,
    max_neighbors: usize,
) -> Result<Vec<MatchList>, CoreError> {
    if max_neighbors == 0 {
        return Err(CoreError::CapacityExceeded { subsystem: "neighbor_match", limit: 0, actual: 1 });
    }

    let (query_order, sorted_queries) = maybe_morton_sort(queries);
    let (target_order, sorted_targets) = maybe_morton_sort(targets);

    let max_radius = algorithm.max_possible_radius(&sorted_targets);

    let outer_queries = partition_blocks(&sorted_queries, OUTER_BLOCK);
    let outer_targets = partition_blocks(&sorted_targets, OUTER_BLOCK);

    let per_query_results: Vec<Vec<ScoredList>> = outer_queries
        .par_iter()
        .map(|qblock| {
            let mut local: Vec<ScoredList> = vec![ScoredList::new(); qblock.end - qblock.start];
            for tblock in &outer_targets {
                if qblock.bounds.lower_bound_distance(&tblock.bounds) > max_radius {
                    continue;
                }
                match_block_pair(
                    &sorted_queries[qblock.start..qblock.end],
                    &sorted_targets[tblock.start..tblock.end],
                    tblock.start,
                    algorithm,
                    max_neighbors,
                    &mut local,
                );
            }
            local
        })
        .collect();

    let mut sorted_results: Vec<ScoredList> = Vec::with_capacity(sorted_queries.len());
    for chunk in per_query_results {
        sorted_results.extend(chunk);
    }

    // Remap target indices from sorted-space back to caller-space, then
    // scatter results back into caller (pre-sort) query order.
    let remapped: Vec<MatchList> = sorted_results
        .into_iter()
        .map(|list| {
            list.into_iter()
                .map(|(_, idx)| target_order[idx as usize] as u32)
                .collect()
        })
        .collect();

    let mut out: Vec<MatchList> = vec![MatchList::new(); queries.len()];
    for (sorted_pos, &orig_query_idx) in query_order.iter().enumerate() {
        out[orig_query_idx] = remapped[sorted_pos].clone();
    }
    Ok(out)
}

fn maybe_morton_sort(atoms: &[Atom]) -> (Vec<usize>, Vec<Atom>) {
    if atoms.len() >= MORTON_SORT_THRESHOLD {
        let order = morton_sort(atoms);
        let sorted = order.iter().map(|&i| atoms[i]).collect();
        (order, sorted)
    } else {
        ((0..atoms.len()).collect(), atoms.to_vec())
    }
}

/// Inner/mid block recursion within one outer-block pair: subdivides the
/// target block down to `INNER_BLOCK`/`MID_BLOCK` granularity using the
/// same bounding-box pruning, then does the exact distance test.
fn match_block_pair(
    queries: &[Atom],
    targets: &[Atom],
    target_base: usize,
    algorithm: RadiusSpec,
    max_neighbors: usize,
    out: &mut [ScoredList],
) {
    let mid_targets = partition_blocks(targets, MID_BLOCK);
    for (q_idx, query) in queries.iter().enumerate() {
        for mid in &mid_targets {
            let inner_targets = partition_blocks(&targets[mid.start..mid.end], INNER_BLOCK);
            for inner in &inner_targets {
                let base = mid.start + inner.start;
                for (local_t, target) in targets[base..mid.start + inner.end].iter().enumerate() {
                    let t_idx = target_base + base + local_t;
                    let radius = algorithm.pair_radius(query, target);
                    let dist_sq = query.position.distance_squared(target.position) as f64;
                    if dist_sq <= radius * radius {
                        insert_sorted(&mut out[q_idx], t_idx as u32, dist_sq, max_neighbors);
                    }
                }
            }
        }
    }
}

/// Inserts `candidate` into `list` keeping it sorted by ascending distance
/// (ties broken by ascending index), evicting the worst entry if the list
/// is already at `max_neighbors` and the new candidate is strictly better.
fn insert_sorted(list: &mut ScoredList, candidate: u32, candidate_dist_sq: f64, max_neighbors: usize) {
    let key = (candidate_dist_sq, candidate);
    let pos = list.partition_point(|existing| *existing < key);
    if list.len() < max_neighbors {
        list.insert(pos, key);
    } else if pos < list.len() {
        list.insert(pos, key);
        list.truncate(max_neighbors);
    }
}
