use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::error::CoreError;

/// Restricted element identity carried by an `Atom`. `Empty` is atomic number 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    H = 1,
    B = 5,
    C = 6,
    N = 7,
    O = 8,
    F = 9,
    Al = 13,
    Si = 14,
    P = 15,
    S = 16,
    Cl = 17,
    Ga = 31,
    Ge = 32,
    As = 33,
    Se = 34,
    Br = 35,
    Sn = 50,
    Au = 79,
    Pb = 82,
}

impl Element {
    pub fn atomic_number(self) -> u8 {
        self as u8
    }

    pub fn from_atomic_number(n: u8) -> Option<Self> {
        use Element::*;
        Some(match n {
            1 => H,
            5 => B,
            6 => C,
            7 => N,
            8 => O,
            9 => F,
            13 => Al,
            14 => Si,
            15 => P,
            16 => S,
            17 => Cl,
            31 => Ga,
            32 => Ge,
            33 => As,
            34 => Se,
            35 => Br,
            50 => Sn,
            79 => Au,
            82 => Pb,
            _ => return None,
        })
    }
}

/// Covalent radius (nm) and valence for elements this crate supports.
#[derive(Debug, Clone, Copy)]
pub struct ElementInfo {
    pub covalent_radius_nm: f64,
    pub valence: u8,
}

lazy_static! {
    static ref ELEMENT_INFO: HashMap<u8, ElementInfo> = {
        use Element::*;
        let mut m = HashMap::new();
        // Covalent radii from periodictable.com, converted Å -> nm
        // (factor 0.1).
        m.insert(H.atomic_number(), ElementInfo { covalent_radius_nm: 0.031, valence: 1 });
        m.insert(B.atomic_number(), ElementInfo { covalent_radius_nm: 0.085, valence: 3 });
        m.insert(C.atomic_number(), ElementInfo { covalent_radius_nm: 0.076, valence: 4 });
        m.insert(N.atomic_number(), ElementInfo { covalent_radius_nm: 0.071, valence: 3 });
        m.insert(O.atomic_number(), ElementInfo { covalent_radius_nm: 0.066, valence: 2 });
        m.insert(F.atomic_number(), ElementInfo { covalent_radius_nm: 0.057, valence: 1 });
        m.insert(Al.atomic_number(), ElementInfo { covalent_radius_nm: 0.121, valence: 3 });
        m.insert(Si.atomic_number(), ElementInfo { covalent_radius_nm: 0.111, valence: 4 });
        m.insert(P.atomic_number(), ElementInfo { covalent_radius_nm: 0.107, valence: 3 });
        m.insert(S.atomic_number(), ElementInfo { covalent_radius_nm: 0.105, valence: 2 });
        m.insert(Cl.atomic_number(), ElementInfo { covalent_radius_nm: 0.102, valence: 1 });
        m.insert(Ga.atomic_number(), ElementInfo { covalent_radius_nm: 0.122, valence: 3 });
        m.insert(Ge.atomic_number(), ElementInfo { covalent_radius_nm: 0.120, valence: 4 });
        m.insert(As.atomic_number(), ElementInfo { covalent_radius_nm: 0.119, valence: 3 });
        m.insert(Se.atomic_number(), ElementInfo { covalent_radius_nm: 0.120, valence: 2 });
        m.insert(Br.atomic_number(), ElementInfo { covalent_radius_nm: 0.120, valence: 1 });
        m.insert(Sn.atomic_number(), ElementInfo { covalent_radius_nm: 0.139, valence: 4 });
        m.insert(Au.atomic_number(), ElementInfo { covalent_radius_nm: 0.136, valence: 4 });
        m.insert(Pb.atomic_number(), ElementInfo { covalent_radius_nm: 0.146, valence: 4 });
        m
    };
}

pub fn covalent_radius_nm(atomic_number: u8) -> f64 {
    ELEMENT_INFO
        .get(&atomic_number)
        .map(|i| i.covalent_radius_nm)
        .unwrap_or(0.077)
}

pub fn valence(atomic_number: u8) -> u8 {
    ELEMENT_INFO.get(&atomic_number).map(|i| i.valence).unwrap_or(0)
}

/// Either a single element filling every lattice slot, or two elements
/// alternating by slot parity (checkerboard / zincblende-style).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialType {
    Elemental(Element),
    Checkerboard(Element, Element),
}

const ELEMENTAL_ALLOWED: [Element; 4] = [Element::C, Element::Si, Element::Ge, Element::Au];

const CHECKERBOARD_ALLOWED: [(Element, Element); 11] = [
    (Element::B, Element::N),
    (Element::B, Element::P),
    (Element::B, Element::As),
    (Element::C, Element::Si),
    (Element::C, Element::Ge),
    (Element::N, Element::Al),
    (Element::N, Element::Ga),
    (Element::Al, Element::P),
    (Element::Al, Element::As),
    (Element::P, Element::Ga),
    (Element::Ga, Element::As),
];

impl MaterialType {
    /// Validates this material against the allow-lists above; `basis` is
    /// named only for the error message (both bases share the same list).
    pub fn validate(self, basis: &'static str) -> Result<(), CoreError> {
        let ok = match self {
            MaterialType::Elemental(e) => ELEMENTAL_ALLOWED.contains(&e),
            MaterialType::Checkerboard(a, b) => {
                CHECKERBOARD_ALLOWED.contains(&(a, b)) || CHECKERBOARD_ALLOWED.contains(&(b, a))
            }
        };
        if ok {
            Ok(())
        } else {
            Err(CoreError::MaterialUnsupported {
                basis,
                material: format!("{:?}", self),
            })
        }
    }

    /// The two covalent radii entering the lattice-constant formula. For an
    /// elemental material both radii are the same element's.
    fn radii(self) -> (f64, f64) {
        match self {
            MaterialType::Elemental(e) => {
                let r = covalent_radius_nm(e.atomic_number());
                (r, r)
            }
            MaterialType::Checkerboard(a, b) => {
                (covalent_radius_nm(a.atomic_number()), covalent_radius_nm(b.atomic_number()))
            }
        }
    }

    /// Cubic lattice constant in nanometers: a = (4/sqrt(3))*(r1+r2).
    pub fn cubic_lattice_constant_nm(self) -> f64 {
        let (r1, r2) = self.radii();
        (4.0 / 3.0_f64.sqrt()) * (r1 + r2)
    }

    /// Hexagonal side length: a_hex = a_cubic / sqrt(2).
    pub fn hex_side_nm(self) -> f64 {
        self.cubic_lattice_constant_nm() / 2.0_f64.sqrt()
    }

    /// Hexagonal prism height: a_cubic * (2/sqrt(6)) * 2.
    pub fn hex_prism_height_nm(self) -> f64 {
        self.cubic_lattice_constant_nm() * (2.0 / 6.0_f64.sqrt()) * 2.0
    }

    /// Bulk nearest-neighbor bond length for diamond-cubic: a_cubic*sqrt(3)/4.
    pub fn bulk_bond_length_nm(self) -> f64 {
        self.cubic_lattice_constant_nm() * 3.0_f64.sqrt() / 4.0
    }
}
