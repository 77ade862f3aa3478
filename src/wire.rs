//! Packed wire-format structs for handing atoms/bonds to a consumer without
//! a serialization crate. This is an encode-only convenience — no file
//! format, no I/O.

use bytemuck::{Pod, Zeroable};

use crate::atom::{Atom, Bond};

/// 16 bytes: 3×f32 position (nm) + f32 atomic number (integer-valued,
/// bit-exact IEEE-754 f32).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct AtomWire {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub atomic_number: f32,
}

impl From<Atom> for AtomWire {
    fn from(atom: Atom) -> Self {
        AtomWire {
            x: atom.position.x,
            y: atom.position.y,
            z: atom.position.z,
            atomic_number: atom.atomic_number as f32,
        }
    }
}

/// 8 bytes: 2×u32 atom indices, little-endian on the wire, `first < second`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct BondWire {
    pub first: u32,
    pub second: u32,
}

impl From<Bond> for BondWire {
    fn from(bond: Bond) -> Self {
        BondWire { first: bond.first, second: bond.second }
    }
}

pub fn atoms_to_wire(atoms: &[Atom]) -> Vec<AtomWire> {
    atoms.iter().copied().map(AtomWire::from).collect()
}

pub fn bonds_to_wire(bonds: &[Bond]) -> Vec<BondWire> {
    bonds.iter().copied().map(BondWire::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::f32::Vec3;

    #[test]
    fn atom_wire_is_16_bytes() {
        assert_eq!(std::mem::size_of::<AtomWire>(), 16);
    }

    #[test]
    fn bond_wire_is_8_bytes() {
        assert_eq!(std::mem::size_of::<BondWire>(), 8);
    }

    #[test]
    fn atom_wire_round_trips_atomic_number() {
        let atom = Atom::new(Vec3::new(1.0, 2.0, 3.0), 14);
        let wire = AtomWire::from(atom);
        assert_eq!(wire.atomic_number as u8, 14);
        assert_eq!(wire.x, 1.0);
        assert_eq!(wire.z, 3.0);
    }

    #[test]
    fn bond_wire_preserves_canonical_order() {
        let bond = Bond::new(7, 2);
        let wire = BondWire::from(bond);
        assert!(wire.first < wire.second);
    }
}
