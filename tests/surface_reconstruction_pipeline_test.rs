//! Integration coverage for the `Reconstruction { atoms, material,
//! passivation } -> Topology` surface, run end to end on a small raw
//! lattice slab the way a caller outside `crystolecule_core` would: cut a
//! slab out of the lattice evaluator, hand it to `Reconstruction::run`,
//! and check the guarantees the result is expected to hold.

use crystolecule_core::element::{Element, MaterialType};
use crystolecule_core::lattice::{Bounds, Cubic, Lattice};
use crystolecule_core::topology::{MapNode, Passivation, Reconstruction};

#[test]
fn passivated_slab_gives_every_hydrogen_exactly_one_bond() {
    let bounds = Bounds::from_f64(3.0, 3.0, 3.0).unwrap();
    let material = MaterialType::Elemental(Element::C);
    let raw = Lattice::<Cubic>::evaluate(bounds, material, &[]).unwrap();

    let topo = Reconstruction { atoms: raw, material, passivation: Passivation::Element(Element::H) }
        .run()
        .unwrap();

    let adjacency = topo.map(MapNode::Atoms, MapNode::Atoms).unwrap();
    for (i, atom) in topo.atoms().iter().enumerate() {
        if atom.atomic_number == Element::H.atomic_number() {
            assert_eq!(adjacency[i].len(), 1, "hydrogen atom {i} has {} bonds", adjacency[i].len());
        }
    }
}

#[test]
fn passivated_slab_never_exceeds_valence_for_any_atom() {
    let bounds = Bounds::from_f64(3.0, 3.0, 3.0).unwrap();
    let material = MaterialType::Elemental(Element::C);
    let raw = Lattice::<Cubic>::evaluate(bounds, material, &[]).unwrap();

    let topo = Reconstruction { atoms: raw, material, passivation: Passivation::Element(Element::H) }
        .run()
        .unwrap();

    let adjacency = topo.map(MapNode::Atoms, MapNode::Atoms).unwrap();
    for (i, atom) in topo.atoms().iter().enumerate() {
        let valence = crystolecule_core::element::valence(atom.atomic_number) as usize;
        assert!(
            adjacency[i].len() <= valence,
            "atom {i} (Z={}) has {} bonds but valence {valence}",
            atom.atomic_number,
            adjacency[i].len()
        );
    }
}

#[test]
fn passivated_slab_saturates_every_non_hydrogen_atom_to_exactly_its_valence() {
    // Exact equality, not just the upper bound: every surviving carbon
    // must end up with its full bulk C-C bonds plus any dimer/hydrogen
    // bonds recorded, never short a bond.
    let bounds = Bounds::from_f64(3.0, 3.0, 3.0).unwrap();
    let material = MaterialType::Elemental(Element::C);
    let raw = Lattice::<Cubic>::evaluate(bounds, material, &[]).unwrap();

    let topo = Reconstruction { atoms: raw, material, passivation: Passivation::Element(Element::H) }
        .run()
        .unwrap();

    let adjacency = topo.map(MapNode::Atoms, MapNode::Atoms).unwrap();
    for (i, atom) in topo.atoms().iter().enumerate() {
        if atom.atomic_number == Element::H.atomic_number() {
            continue;
        }
        let valence = crystolecule_core::element::valence(atom.atomic_number) as usize;
        assert_eq!(
            adjacency[i].len(),
            valence,
            "atom {i} (Z={}) has {} bonds but valence {valence}",
            atom.atomic_number,
            adjacency[i].len()
        );
    }
}

#[test]
fn every_bond_index_is_in_range_after_reconstruction() {
    let bounds = Bounds::from_f64(3.0, 3.0, 2.0).unwrap();
    let material = MaterialType::Elemental(Element::C);
    let raw = Lattice::<Cubic>::evaluate(bounds, material, &[]).unwrap();

    let topo = Reconstruction { atoms: raw, material, passivation: Passivation::None }.run().unwrap();

    for bond in topo.bonds() {
        assert!((bond.first as usize) < topo.atoms().len());
        assert!((bond.second as usize) < topo.atoms().len());
        assert_ne!(bond.first, bond.second);
    }
}

#[test]
fn reconstruction_without_passivation_still_reports_a_topology() {
    let bounds = Bounds::from_f64(2.0, 2.0, 2.0).unwrap();
    let material = MaterialType::Elemental(Element::C);
    let raw = Lattice::<Cubic>::evaluate(bounds, material, &[]).unwrap();

    // Non-passivating reconstructions should not introduce hydrogens.
    let topo = Reconstruction { atoms: raw, material, passivation: Passivation::None }.run().unwrap();
    assert!(topo.atoms().iter().all(|a| a.atomic_number != Element::H.atomic_number()));
}
