//! Topology: owns an atom list and a bond list, and exposes the
//! neighbor-match, Morton-sort, and orbital-derivation kernels as methods
//! over that owned state.

pub mod morton;
pub mod neighbor_match;
pub mod orbitals;
pub mod reconstruction;

use smallvec::SmallVec;

use crate::atom::{Atom, Bond};
use crate::element::{Element, MaterialType};
use crate::error::{CoreError, CoreResult};
use crate::topology::morton::{apply_permutation, morton_sort};
use crate::topology::neighbor_match::{match_atoms, MatchList, RadiusSpec};
use crate::topology::orbitals::{derive_orbitals, Hybridization, OrbitalSet};
use crate::topology::reconstruction::{passivate, reconstruct_surface_with_statistics};

/// Bounded adjacency-list capacity shared by `map`'s atom<->atom and
/// atom<->bond views: each entry is a bounded-capacity list, max 8 entries.
const MAX_ADJACENCY: usize = 8;

/// What a `map` call walks between. The source side is restricted to
/// atoms (`MapNode::Bonds` is a valid *target*, never a *source*).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapNode {
    Atoms,
    Bonds,
}

/// Whether `Reconstruction` also emits real passivator atoms, and which
/// element to place. `None` (the default) leaves passivation to an
/// external caller, keeping it decoupled from the reconstruction
/// convergence loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Passivation {
    #[default]
    None,
    Element(Element),
}

/// The atom list + bond list + derived adjacency that the lattice evaluator
/// and surface reconstruction both feed into, and that callers query for
/// neighbor matches, sorted order, and orbital directions.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
}

impl Topology {
    pub fn new() -> Self {
        Topology::default()
    }

    pub fn from_atoms(atoms: Vec<Atom>) -> Self {
        Topology { atoms, bonds: Vec::new() }
    }

    pub fn from_atoms_and_bonds(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        Topology { atoms, bonds }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn insert_atoms(&mut self, atoms: impl IntoIterator<Item = Atom>) {
        self.atoms.extend(atoms);
    }

    pub fn insert_bonds(&mut self, bonds: impl IntoIterator<Item = Bond>) {
        self.bonds.extend(bonds);
    }

    /// Removes the atoms at `indices` (duplicates tolerated, any order),
    /// preserving the relative order of survivors. Bonds touching a removed
    /// atom are dropped; surviving bonds are re-indexed to the compacted
    /// atom list and re-canonicalized.
    pub fn remove_atoms(&mut self, indices: &[usize]) {
        let doomed: rustc_hash::FxHashSet<usize> = indices.iter().copied().collect();
        let mut remap: Vec<Option<u32>> = vec![None; self.atoms.len()];
        let mut kept = Vec::with_capacity(self.atoms.len());
        for (i, atom) in self.atoms.iter().enumerate() {
            if doomed.contains(&i) {
                continue;
            }
            remap[i] = Some(kept.len() as u32);
            kept.push(*atom);
        }
        self.atoms = kept;
        self.bonds = self
            .bonds
            .iter()
            .filter_map(|b| {
                let a = remap[b.first as usize]?;
                let c = remap[b.second as usize]?;
                Some(Bond::new(a, c))
            })
            .collect();
    }

    /// Removes the bonds at `indices` (duplicates tolerated, any order),
    /// preserving the relative order of survivors. Atoms are untouched.
    pub fn remove_bonds(&mut self, indices: &[usize]) {
        let doomed: rustc_hash::FxHashSet<usize> = indices.iter().copied().collect();
        self.bonds = self
            .bonds
            .iter()
            .enumerate()
            .filter(|(i, _)| !doomed.contains(i))
            .map(|(_, b)| *b)
            .collect();
    }

    /// Reorders atoms into Morton order, re-indexing and re-canonicalizing
    /// bonds to match, then lex-sorting the bond list. Returns the
    /// permutation applied: `order[new_index] == old_index`.
    pub fn sort(&mut self) -> Vec<usize> {
        let order = morton_sort(&self.atoms);
        let mut new_index_of_old = vec![0u32; order.len()];
        for (new_idx, &old_idx) in order.iter().enumerate() {
            new_index_of_old[old_idx] = new_idx as u32;
        }
        self.atoms = apply_permutation(&self.atoms, &order);
        self.bonds = self
            .bonds
            .iter()
            .map(|b| Bond::new(new_index_of_old[b.first as usize], new_index_of_old[b.second as usize]))
            .collect();
        self.bonds.sort_by_key(|b| (b.first, b.second));
        order
    }

    /// Radius-bounded neighbor match of external `queries` against this
    /// topology's atoms.
    pub fn match_against(&self, queries: &[Atom], algorithm: RadiusSpec, max_neighbors: usize) -> CoreResult<Vec<MatchList>> {
        match_atoms(queries, &self.atoms, algorithm, max_neighbors)
    }

    /// Self-match: every atom in this topology against every other.
    pub fn match_self(&self, algorithm: RadiusSpec, max_neighbors: usize) -> CoreResult<Vec<MatchList>> {
        match_atoms(&self.atoms, &self.atoms, algorithm, max_neighbors)
    }

    /// Maps each atom to its incident bonds or bonded neighbor atoms.
    /// `source` must be atoms; `target` may be either atoms or bonds.
    pub fn map(&self, source: MapNode, target: MapNode) -> CoreResult<Vec<SmallVec<[u32; MAX_ADJACENCY]>>> {
        if source != MapNode::Atoms {
            return Err(CoreError::InternalInvariant {
                subsystem: "topology_map",
                detail: "map source must be atoms".to_string(),
            });
        }
        match target {
            MapNode::Bonds => self.atoms_to_bonds(),
            MapNode::Atoms => self.atoms_to_atoms(),
        }
    }

    fn atoms_to_bonds(&self) -> CoreResult<Vec<SmallVec<[u32; MAX_ADJACENCY]>>> {
        let mut out = vec![SmallVec::new(); self.atoms.len()];
        for (bond_idx, bond) in self.bonds.iter().enumerate() {
            push_capped(&mut out[bond.first as usize], bond_idx as u32)?;
            push_capped(&mut out[bond.second as usize], bond_idx as u32)?;
        }
        Ok(out)
    }

    fn atoms_to_atoms(&self) -> CoreResult<Vec<SmallVec<[u32; MAX_ADJACENCY]>>> {
        let mut out = vec![SmallVec::new(); self.atoms.len()];
        for bond in &self.bonds {
            push_capped(&mut out[bond.first as usize], bond.second)?;
            push_capped(&mut out[bond.second as usize], bond.first)?;
        }
        Ok(out)
    }

    /// Derives nonbonding orbital directions for every atom from its
    /// current bonded neighbors, under the caller-requested `hybridization`
    /// geometry. The geometry is the caller's choice, not re-derived from
    /// the atom's own element valence — `derive_orbitals` only uses the
    /// element valence to bound how many directions an atom can hold at
    /// all (see its doc comment).
    pub fn nonbonding_orbitals(&self, hybridization: Hybridization) -> CoreResult<Vec<OrbitalSet>> {
        let adjacency = self.atoms_to_atoms()?;
        let mut out = Vec::with_capacity(self.atoms.len());
        for (i, atom) in self.atoms.iter().enumerate() {
            let existing: Vec<_> = adjacency[i]
                .iter()
                .map(|&j| (self.atoms[j as usize].position - atom.position).normalize())
                .collect();
            out.push(derive_orbitals(atom.atomic_number, &existing, hybridization));
        }
        Ok(out)
    }
}

fn push_capped(list: &mut SmallVec<[u32; MAX_ADJACENCY]>, value: u32) -> CoreResult<()> {
    if list.len() >= MAX_ADJACENCY {
        return Err(CoreError::CapacityExceeded {
            subsystem: "bond_adjacency",
            limit: MAX_ADJACENCY,
            actual: list.len() + 1,
        });
    }
    list.push(value);
    Ok(())
}

/// The external `Reconstruction { atoms, material, passivation } →
/// Topology` interface: runs the surface-reconstruction pipeline on a raw
/// framework and, if requested, emits real passivator atoms in the same
/// pass — external to reconstruction's own convergence loop, which never
/// has to reason about passivators (see `topology::reconstruction` module
/// docs).
#[derive(Debug, Clone)]
pub struct Reconstruction {
    pub atoms: Vec<Atom>,
    pub material: MaterialType,
    pub passivation: Passivation,
}

impl Reconstruction {
    pub fn run(self) -> CoreResult<Topology> {
        let (result, _stats) = reconstruct_surface_with_statistics(self.atoms, self.material)?;
        let mut atoms = result.atoms.clone();
        let mut bonds = result.bonds.clone();
        if let Passivation::Element(element) = self.passivation {
            let (passivators, passivator_bonds) = passivate(&result, element);
            atoms.extend(passivators);
            bonds.extend(passivator_bonds);
        }
        Ok(Topology::from_atoms_and_bonds(atoms, bonds))
    }
}
