use glam::f32::Vec3;

/// A single atom: position in nanometers plus an atomic number. Value
/// semantics — atoms are freely copied, never aliased.
///
/// Atomic number 0 denotes an empty slot; most call sites filter these out
/// before they reach an `Atom` (the lattice evaluator only emits non-zero
/// slots), but `Replace { target: ReplaceKind::Empty }` can still produce
/// one transiently inside the evaluator's own grid representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atom {
    pub position: Vec3,
    pub atomic_number: u8,
}

impl Atom {
    pub fn new(position: Vec3, atomic_number: u8) -> Self {
        Atom { position, atomic_number }
    }

    pub fn is_empty(self) -> bool {
        self.atomic_number == 0
    }
}

/// An ordered bond between two atom indices. Canonicalized so `first < second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Bond {
    pub first: u32,
    pub second: u32,
}

impl Bond {
    /// Builds a canonical bond, swapping the indices if necessary so that
    /// `first < second`. Panics on `first == second` — a self-bond is never
    /// a valid input from any caller in this crate.
    pub fn new(a: u32, b: u32) -> Self {
        debug_assert_ne!(a, b, "a bond cannot connect an atom to itself");
        if a < b {
            Bond { first: a, second: b }
        } else {
            Bond { first: b, second: a }
        }
    }
}
