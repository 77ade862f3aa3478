//! Surface reconstruction: turns a raw lattice slab into a chemically
//! saturated framework by pruning pathological atoms, proposing hydrogen
//! caps from dangling orbitals, resolving collisions between caps that
//! land on (or near) the same point, and walking the resulting dimer
//! chains to decide which collisions become real carbon-carbon bonds.
//!
//! Passivation (turning the surviving proposed sites into real hydrogen
//! atoms) is a separate, non-looping pass — see `passivate`.

use glam::f32::Vec3;
use smallvec::SmallVec;

use crate::atom::{Atom, Bond};
use crate::element::{covalent_radius_nm, valence, MaterialType};
use crate::error::CoreError;
use crate::stats::ReconstructionStatistics;
use crate::topology::neighbor_match::{match_atoms, RadiusSpec};
use crate::topology::orbitals::{derive_orbitals, Hybridization};
use crate::util::timer::Timer;

const MAX_ROUNDS: u32 = 100;
const COLLISION_RADIUS_NM: f64 = 0.010;
const PATHOLOGICAL_RADIUS_FACTOR: f64 = 1.008;
const MAX_CHAIN_STEPS: usize = 4096;

#[derive(Debug, Clone, Copy)]
pub struct HydrogenSite {
    pub carbon: usize,
    pub orbital: Vec3,
}

#[derive(Debug, Clone)]
pub struct Reconstruction {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    pub hydrogen_sites: Vec<HydrogenSite>,
}

/// Runs the full reconstruction pipeline on a raw (unsaturated) framework.
pub fn reconstruct_surface(atoms: Vec<Atom>, material: MaterialType) -> Result<Reconstruction, CoreError> {
    let (result, _stats) = reconstruct_surface_with_statistics(atoms, material)?;
    Ok(result)
}

/// Same as [`reconstruct_surface`] but also returns the run's
/// [`ReconstructionStatistics`]: a per-operation accumulator the caller
/// can print with `log_statistics()`.
pub fn reconstruct_surface_with_statistics(
    mut atoms: Vec<Atom>,
    material: MaterialType,
) -> Result<(Reconstruction, ReconstructionStatistics), CoreError> {
    let _timer = Timer::new("surface_reconstruction");
    let mut stats = ReconstructionStatistics::default();

    let bulk_bond_length = material.bulk_bond_length_nm();
    let pathological_radius = RadiusSpec::AbsoluteRadius(bulk_bond_length * PATHOLOGICAL_RADIUS_FACTOR);

    let mut rounds = 0u32;

    loop {
        if rounds >= MAX_ROUNDS {
            return Err(CoreError::Divergence {
                subsystem: "surface_reconstruction",
                iterations: rounds,
                atom_hint: None,
            });
        }
        rounds += 1;
        stats.rounds = rounds;

        let before = atoms.len();
        atoms = remove_pathological_atoms(atoms, pathological_radius)?;
        stats.atoms_removed_pathological += before - atoms.len();
        if atoms.is_empty() {
            return Ok((Reconstruction { atoms, bonds: Vec::new(), hydrogen_sites: Vec::new() }, stats));
        }

        // One further match pass over the converged atom set (step 2 of
        // the carbon-site map): every i<j neighbor pair it finds is a real
        // bulk covalent bond, independent of whatever hydrogen sites or
        // dimer bonds the rest of this pass proposes.
        let neighbor_lists = match_atoms(&atoms, &atoms, pathological_radius, 8)?;
        let degrees: Vec<usize> = neighbor_lists.iter().map(|l| l.len().saturating_sub(1)).collect();
        let bulk_bonds = bulk_bonds_from_neighbor_lists(&neighbor_lists);

        let sites = propose_hydrogen_sites(&atoms, &neighbor_lists, &degrees);
        stats.hydrogen_sites_proposed = sites.len();
        if sites.is_empty() {
            return Ok((Reconstruction { atoms, bonds: bulk_bonds, hydrogen_sites: Vec::new() }, stats));
        }

        let positions: Vec<Vec3> = sites
            .iter()
            .map(|s| site_position(&atoms, s, bulk_bond_length as f32))
            .collect();
        let groups = group_colliding_sites(&positions);

        let mut to_insert: Vec<Atom> = Vec::new();
        let mut consumed_site_indices: Vec<bool> = vec![false; sites.len()];
        let mut dimer_pairs: Vec<(usize, usize)> = Vec::new();

        for group in &groups {
            if group.len() >= 3 {
                stats.collisions_3way += 1;
                let interior = build_interior_atom(group, &sites, &atoms, material)?;
                to_insert.push(interior);
                for &idx in group {
                    consumed_site_indices[idx] = true;
                }
            } else if group.len() == 2 {
                stats.collisions_2way += 1;
                dimer_pairs.push((sites[group[0]].carbon, sites[group[1]].carbon));
            }
        }

        if !to_insert.is_empty() {
            atoms.extend(to_insert);
            continue;
        }

        if dimer_pairs.is_empty() {
            return Ok((Reconstruction { atoms, bonds: bulk_bonds, hydrogen_sites: sites }, stats));
        }

        let chosen_edges = classify_dimer_chains(&dimer_pairs)?;
        stats.dimer_bonds_formed = chosen_edges.len();
        let mut bonds = bulk_bonds;
        for &(a, b) in &chosen_edges {
            bonds.push(Bond::new(a as u32, b as u32));
        }

        // Mark sites belonging to every 2-way collision group as consumed:
        // chosen edges form real bonds (dropping both sides' caps), and
        // edges not chosen default to keeping each atom's own proposed cap.
        for group in groups.iter().filter(|g| g.len() == 2) {
            let a = sites[group[0]].carbon;
            let b = sites[group[1]].carbon;
            if chosen_edges.contains(&(a, b)) || chosen_edges.contains(&(b, a)) {
                consumed_site_indices[group[0]] = true;
                consumed_site_indices[group[1]] = true;
            }
        }

        let surviving: Vec<HydrogenSite> = sites
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !consumed_site_indices[*i])
            .map(|(_, s)| s)
            .collect();

        return Ok((Reconstruction { atoms, bonds, hydrogen_sites: surviving }, stats));
    }
}

/// Records bond(i, j) for every i<j neighbor pair the match engine found —
/// the bulk covalent bonds of the converged, surviving atom set (spec
/// §4.5 step 2's "carbon-site map").
fn bulk_bonds_from_neighbor_lists(neighbor_lists: &[SmallVec<[u32; 8]>]) -> Vec<Bond> {
    let mut bonds = Vec::new();
    for (i, list) in neighbor_lists.iter().enumerate() {
        for &j in list {
            if j as usize > i {
                bonds.push(Bond::new(i as u32, j));
            }
        }
    }
    bonds
}

fn remove_pathological_atoms(atoms: Vec<Atom>, radius: RadiusSpec) -> Result<Vec<Atom>, CoreError> {
    let mut current = atoms;
    for _ in 0..MAX_ROUNDS {
        if current.is_empty() {
            return Ok(current);
        }
        let lists = match_atoms(&current, &current, radius, 8)?;
        let keep: Vec<Atom> = current
            .iter()
            .zip(lists.iter())
            .filter(|(_, l)| l.len() > 2)
            .map(|(a, _)| *a)
            .collect();
        if keep.len() == current.len() {
            return Ok(current);
        }
        current = keep;
    }
    Err(CoreError::Divergence { subsystem: "pathological_atom_removal", iterations: MAX_ROUNDS, atom_hint: None })
}

fn propose_hydrogen_sites(
    atoms: &[Atom],
    neighbor_lists: &[SmallVec<[u32; 8]>],
    degrees: &[usize],
) -> Vec<HydrogenSite> {
    let mut sites = Vec::new();
    for (i, atom) in atoms.iter().enumerate() {
        let v = valence(atom.atomic_number) as usize;
        if degrees[i] >= v {
            continue;
        }
        let existing: Vec<Vec3> = neighbor_lists[i]
            .iter()
            .filter(|&&idx| idx as usize != i)
            .map(|&idx| (atoms[idx as usize].position - atom.position).normalize())
            .collect();
        let orbitals = derive_orbitals(atom.atomic_number, &existing, Hybridization::Sp3);
        for orbital in orbitals {
            sites.push(HydrogenSite { carbon: i, orbital });
        }
    }
    sites
}

fn site_position(atoms: &[Atom], site: &HydrogenSite, bulk_bond_length: f32) -> Vec3 {
    atoms[site.carbon].position + site.orbital * bulk_bond_length
}

/// Groups proposed sites whose positions coincide within `COLLISION_RADIUS_NM`,
/// using union-find so collisions that chain through more than one pairwise
/// match still end up in a single group.
fn group_colliding_sites(positions: &[Vec3]) -> Vec<Vec<usize>> {
    let mut parent: Vec<usize> = (0..positions.len()).collect();

    fn find(parent: &mut [usize], x: usize) -> usize {
        if parent[x] != x {
            parent[x] = find(parent, parent[x]);
        }
        parent[x]
    }

    let radius_sq = (COLLISION_RADIUS_NM * COLLISION_RADIUS_NM) as f32;
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            if positions[i].distance_squared(positions[j]) <= radius_sq {
                let ri = find(&mut parent, i);
                let rj = find(&mut parent, j);
                if ri != rj {
                    parent[ri] = rj;
                }
            }
        }
    }

    let mut groups: rustc_hash::FxHashMap<usize, Vec<usize>> = rustc_hash::FxHashMap::default();
    for i in 0..positions.len() {
        let root = find(&mut parent, i);
        groups.entry(root).or_default().push(i);
    }
    // `FxHashMap` iteration order is not deterministic across runs; each
    // group's members are already ascending (i increases as we insert), so
    // sorting the groups themselves by their first member makes the overall
    // result order deterministic.
    let mut out: Vec<Vec<usize>> = groups.into_values().filter(|g| g.len() > 1).collect();
    out.sort_by_key(|g| g[0]);
    out
}

fn classify_dimer_chains(pairs: &[(usize, usize)]) -> Result<Vec<(usize, usize)>, CoreError> {
    let mut adjacency: rustc_hash::FxHashMap<usize, Vec<usize>> = rustc_hash::FxHashMap::default();
    for &(a, b) in pairs {
        adjacency.entry(a).or_default().push(b);
        adjacency.entry(b).or_default().push(a);
    }

    let mut visited_edges: std::collections::HashSet<(usize, usize)> = std::collections::HashSet::new();
    let mut chosen = Vec::new();

    let mut atoms_with_edges: Vec<usize> = adjacency.keys().copied().collect();
    atoms_with_edges.sort_unstable();

    // Prefer chain endpoints (degree 1 in the dimer graph) as walk starts so
    // chains are traversed end-to-end; anything left after that is a ring.
    let mut starts: Vec<usize> = atoms_with_edges
        .iter()
        .copied()
        .filter(|a| adjacency[a].len() == 1)
        .collect();
    if starts.is_empty() && !atoms_with_edges.is_empty() {
        starts.push(atoms_with_edges[0]);
    }

    for start in starts {
        let mut current = start;
        let mut prev: Option<usize> = None;
        let mut index = 0usize;
        let mut steps = 0usize;
        loop {
            let next = adjacency[&current]
                .iter()
                .copied()
                .find(|&n| Some(n) != prev && !visited_edges.contains(&canon_edge(current, n)));
            let Some(next) = next else { break };

            let edge = canon_edge(current, next);
            if visited_edges.contains(&edge) {
                break;
            }
            visited_edges.insert(edge);

            // The walk alternates carbon, hydrogen-site, carbon, ... so edge
            // `index` (0-based, edges walked) sits between chain-array
            // positions 2*index and 2*index+1. Chain-array index ≡ 1 mod 4
            // (the hydrogen-site position spec step 7 names for forming a
            // dimer) is 2*index+1, i.e. index even.
            if index % 2 == 0 {
                chosen.push((current, next));
            }

            prev = Some(current);
            current = next;
            index += 1;
            steps += 1;
            if steps > MAX_CHAIN_STEPS {
                return Err(CoreError::Divergence {
                    subsystem: "dimer_chain_walk",
                    iterations: steps as u32,
                    atom_hint: Some(current as u32),
                });
            }
        }
    }

    // Any edge never visited belongs to a pure ring (no degree-1 endpoint).
    for &(a, b) in pairs {
        if !visited_edges.contains(&canon_edge(a, b)) {
            return Err(CoreError::InternalInvariant {
                subsystem: "dimer_chain_walk",
                detail: format!("collision chain forms a ring at atoms {a}/{b} with no terminator"),
            });
        }
    }

    Ok(chosen)
}

fn canon_edge(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

fn build_interior_atom(
    group: &[usize],
    sites: &[HydrogenSite],
    atoms: &[Atom],
    material: MaterialType,
) -> Result<Atom, CoreError> {
    let mut center = Vec3::ZERO;
    for &idx in group {
        center += atoms[sites[idx].carbon].position;
    }
    center /= group.len() as f32;

    let atomic_number = majority_element(group, sites, atoms, material)?;
    Ok(Atom::new(center, atomic_number))
}

fn majority_element(
    group: &[usize],
    sites: &[HydrogenSite],
    atoms: &[Atom],
    material: MaterialType,
) -> Result<u8, CoreError> {
    match material {
        MaterialType::Elemental(e) => Ok(e.atomic_number()),
        MaterialType::Checkerboard(a, b) => {
            let mut count_a = 0;
            let mut count_b = 0;
            for &idx in group {
                let z = atoms[sites[idx].carbon].atomic_number;
                if z == a.atomic_number() {
                    count_a += 1;
                } else if z == b.atomic_number() {
                    count_b += 1;
                }
            }
            if count_a == count_b {
                return Err(CoreError::InternalInvariant {
                    subsystem: "surface_reconstruction",
                    detail: "checkerboard majority-element vote tied exactly".to_string(),
                });
            }
            Ok(if count_a > count_b { a.atomic_number() } else { b.atomic_number() })
        }
    }
}

/// Emits real passivator atoms and their bonds for every surviving proposed
/// site, using `passivator` as the capping element (typically hydrogen, but
/// any requested element is accepted). Kept separate from
/// `reconstruct_surface` so the (expensive, iterative) convergence loop
/// above never needs to reason about passivators at all; this pass runs
/// exactly once.
pub fn passivate(reconstruction: &Reconstruction, passivator: crate::element::Element) -> (Vec<Atom>, Vec<Bond>) {
    let base_index = reconstruction.atoms.len();
    let passivator_number = passivator.atomic_number();
    let mut passivators = Vec::with_capacity(reconstruction.hydrogen_sites.len());
    let mut bonds = Vec::with_capacity(reconstruction.hydrogen_sites.len());
    for (offset, site) in reconstruction.hydrogen_sites.iter().enumerate() {
        let host = reconstruction.atoms[site.carbon];
        let bond_length = (covalent_radius_nm(host.atomic_number) + covalent_radius_nm(passivator_number)) as f32;
        let position = host.position + site.orbital * bond_length;
        passivators.push(Atom::new(position, passivator_number));
        bonds.push(Bond::new(site.carbon as u32, (base_index + offset) as u32));
    }
    (passivators, bonds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    /// Scenario 6: a linear chain where every atom has exactly one neighbor
    /// is pathological everywhere. Pruning should converge to an empty
    /// topology, not diverge.
    #[test]
    fn linear_chain_prunes_to_empty_not_divergence() {
        let material = MaterialType::Elemental(Element::C);
        let bond_length = material.bulk_bond_length_nm() as f32;
        let atoms: Vec<Atom> = (0..6)
            .map(|i| Atom::new(Vec3::new(i as f32 * bond_length, 0.0, 0.0), 6))
            .collect();
        let result = reconstruct_surface(atoms, material).expect("must not diverge");
        assert!(result.atoms.is_empty());
        assert!(result.bonds.is_empty());
    }

    #[test]
    fn statistics_record_at_least_one_round() {
        let material = MaterialType::Elemental(Element::C);
        let bond_length = material.bulk_bond_length_nm() as f32;
        let atoms: Vec<Atom> = (0..4)
            .map(|i| Atom::new(Vec3::new(i as f32 * bond_length, 0.0, 0.0), 6))
            .collect();
        let (_result, stats) = reconstruct_surface_with_statistics(atoms, material).unwrap();
        assert!(stats.rounds >= 1);
    }

    #[test]
    fn passivate_gives_every_hydrogen_exactly_one_bond() {
        let reconstruction = Reconstruction {
            atoms: vec![Atom::new(Vec3::ZERO, 6)],
            bonds: Vec::new(),
            hydrogen_sites: vec![
                HydrogenSite { carbon: 0, orbital: Vec3::new(1.0, 1.0, 1.0).normalize() },
                HydrogenSite { carbon: 0, orbital: Vec3::new(1.0, -1.0, -1.0).normalize() },
            ],
        };
        let (hydrogens, bonds) = passivate(&reconstruction, Element::H);
        assert_eq!(hydrogens.len(), 2);
        assert_eq!(bonds.len(), 2);
        for h in &hydrogens {
            assert_eq!(h.atomic_number, 1);
        }
        for b in &bonds {
            assert_eq!(b.first, 0);
        }
    }

    #[test]
    fn group_colliding_sites_is_order_independent_of_hash_iteration() {
        // Two separate pairs that collide; run repeatedly to catch any
        // accidental reliance on hash-map iteration order creeping back in.
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0005, 0.0, 0.0),
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(5.0005, 0.0, 0.0),
        ];
        for _ in 0..8 {
            let groups = group_colliding_sites(&positions);
            assert_eq!(groups, vec![vec![0, 1], vec![2, 3]]);
        }
    }
}
