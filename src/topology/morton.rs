use crate::atom::Atom;

/// Bits of interleaving per axis (10 bits/axis) — the same interleave
/// idiom as a 16-bit-per-axis direct ID packer, generalized into a
/// z-order sort key over a normalized bounding box.
const BITS_PER_AXIS: u32 = 10;
const RESOLUTION: u32 = 1 << BITS_PER_AXIS;

fn spread_bits(v: u32) -> u64 {
    let mut x = v as u64 & 0x3ff;
    x = (x | (x << 16)) & 0x30000ff;
    x = (x | (x << 8)) & 0x300f00f;
    x = (x | (x << 4)) & 0x30c30c3;
    x = (x | (x << 2)) & 0x9249249;
    x
}

fn morton_key(discretized: (u32, u32, u32)) -> u64 {
    spread_bits(discretized.0) | (spread_bits(discretized.1) << 1) | (spread_bits(discretized.2) << 2)
}

/// Computes the bounding box of the atom set, rounds it up to a
/// power-of-two side length, and returns each atom's Morton key alongside
/// the stable-sort permutation (original index -> sorted position).
pub fn morton_sort(atoms: &[Atom]) -> Vec<usize> {
    if atoms.is_empty() {
        return Vec::new();
    }
    let mut min = atoms[0].position;
    let mut max = atoms[0].position;
    for a in atoms {
        min = min.min(a.position);
        max = max.max(a.position);
    }
    let extent = (max - min).max_element().max(1e-9);
    let side = extent.next_power_of_two_f32();

    let keys: Vec<u64> = atoms
        .iter()
        .map(|a| {
            let normalized = (a.position - min) / side;
            let disc = (
                discretize(normalized.x),
                discretize(normalized.y),
                discretize(normalized.z),
            );
            morton_key(disc)
        })
        .collect();

    let mut order: Vec<usize> = (0..atoms.len()).collect();
    order.sort_by(|&a, &b| keys[a].cmp(&keys[b]).then(a.cmp(&b)));
    order
}

fn discretize(fraction: f32) -> u32 {
    (fraction.clamp(0.0, 1.0) * (RESOLUTION - 1) as f32).round() as u32
}

trait NextPow2 {
    fn next_power_of_two_f32(self) -> f32;
}

impl NextPow2 for f32 {
    fn next_power_of_two_f32(self) -> f32 {
        let mut p = 1.0_f32;
        while p < self {
            p *= 2.0;
        }
        p
    }
}

/// Applies a permutation (as produced by `morton_sort`) to an atom list,
/// returning the reordered atoms.
pub fn apply_permutation(atoms: &[Atom], order: &[usize]) -> Vec<Atom> {
    order.iter().map(|&i| atoms[i]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::f32::Vec3;

    #[test]
    fn sort_is_a_permutation() {
        let atoms = vec![
            Atom::new(Vec3::new(0.0, 0.0, 0.0), 6),
            Atom::new(Vec3::new(1.0, 0.0, 0.0), 6),
            Atom::new(Vec3::new(0.0, 1.0, 0.0), 6),
            Atom::new(Vec3::new(1.0, 1.0, 1.0), 6),
        ];
        let order = morton_sort(&atoms);
        let mut seen = order.clone();
        seen.sort();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn sort_idempotent_up_to_ties() {
        let atoms = vec![
            Atom::new(Vec3::new(0.0, 0.0, 0.0), 6),
            Atom::new(Vec3::new(2.0, 0.0, 0.0), 6),
            Atom::new(Vec3::new(0.0, 2.0, 0.0), 6),
        ];
        let order = morton_sort(&atoms);
        let sorted = apply_permutation(&atoms, &order);
        let order2 = morton_sort(&sorted);
        assert_eq!(order2, (0..sorted.len()).collect::<Vec<_>>());
    }
}
