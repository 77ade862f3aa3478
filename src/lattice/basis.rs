use glam::f64::DVec3;
use glam::i32::IVec3;

/// A crystal basis: the per-cell atom-slot layout and the affine transforms
/// needed to evaluate half-space planes and emit world-space positions.
///
/// Sealed: only `Cubic` and `Hexagonal` implement it, restricting this
/// crate to diamond-cubic (optionally FCC gold) and lonsdaleite-hexagonal
/// lattices.
pub trait Basis: private::Sealed + Copy + 'static {
    /// Human-readable name used in error messages.
    const NAME: &'static str;

    /// Number of atom slots per cell (8 cubic, 12 hexagonal).
    const SLOTS_PER_CELL: usize;

    /// Per-axis scale applied to the scope origin before the half-space dot
    /// product (s_o: cubic (4,4,4), hex (3,3,8)).
    const SCALE_ORIGIN: (i32, i32, i32);

    /// Per-axis scale applied to the plane normal (s_n: cubic (1,1,1), hex (8,8,3)).
    const SCALE_NORMAL: (i32, i32, i32);

    /// Integer per-slot offsets within a cell, already expressed in the
    /// scaled (s_o) units so they can be compared directly against a scaled origin.
    fn slot_offsets() -> &'static [IVec3];

    /// Adjusts a plane normal for the basis's coordinate metric before scaling.
    /// Identity for cubic (M = I); for hexagonal, subtracts half of the
    /// normal's swapped in-plane components to account for the non-orthogonal
    /// HKL axes.
    fn adjust_normal(n: DVec3) -> DVec3;

    /// Transforms a lattice-space (HKL) point into world XYZ coordinates
    /// (before scaling by the lattice constant).
    fn hkl_to_xyz(p: DVec3) -> DVec3;

    /// Rounds declared bounds up to whatever cell-count granularity the
    /// basis requires (cubic pads the x-dimension to a multiple of 4).
    fn pad_cell_counts(bounds: IVec3) -> IVec3;

    /// Whether the hierarchical block accelerator (32/16/8/4/2) applies.
    /// Hexagonal grids use a single-level 32-block tiling instead.
    const HIERARCHICAL_BLOCKS: bool;
}

mod private {
    pub trait Sealed {}
    impl Sealed for super::Cubic {}
    impl Sealed for super::Hexagonal {}
}

/// Diamond-cubic (and, via material choice, FCC gold) lattice basis.
#[derive(Debug, Clone, Copy)]
pub struct Cubic;

/// The 8 diamond-cubic basis sites, in quarters of a cell edge (s_o = 4),
/// interleaved so that even slot indices are the primary FCC sublattice and
/// odd slot indices are the secondary sublattice offset by (1/4,1/4,1/4).
/// This ordering is what makes "parity within the voxel slot index" select
/// chemically sensible sublattices: checkerboard materials alternate
/// species by sublattice, and gold's FCC subset keeps only the even slots.
const CUBIC_SLOT_OFFSETS: [IVec3; 8] = [
    IVec3::new(0, 0, 0),
    IVec3::new(1, 1, 1),
    IVec3::new(2, 2, 0),
    IVec3::new(3, 3, 1),
    IVec3::new(2, 0, 2),
    IVec3::new(3, 1, 3),
    IVec3::new(0, 2, 2),
    IVec3::new(1, 3, 3),
];

impl Basis for Cubic {
    const NAME: &'static str = "cubic";
    const SLOTS_PER_CELL: usize = 8;
    const SCALE_ORIGIN: (i32, i32, i32) = (4, 4, 4);
    const SCALE_NORMAL: (i32, i32, i32) = (1, 1, 1);
    const HIERARCHICAL_BLOCKS: bool = true;

    fn slot_offsets() -> &'static [IVec3] {
        &CUBIC_SLOT_OFFSETS
    }

    fn adjust_normal(n: DVec3) -> DVec3 {
        n
    }

    fn hkl_to_xyz(p: DVec3) -> DVec3 {
        p
    }

    fn pad_cell_counts(bounds: IVec3) -> IVec3 {
        let padded_x = (bounds.x + 3) / 4 * 4;
        IVec3::new(padded_x.max(bounds.x), bounds.y, bounds.z)
    }
}

/// Lonsdaleite (hexagonal diamond) lattice basis, addressed in an HKL-prism
/// coordinate system: h, h+2k, l.
#[derive(Debug, Clone, Copy)]
pub struct Hexagonal;

/// The 12 lonsdaleite basis sites: 8 "base" atoms (mirroring the cubic
/// diamond basis folded into the prism cell) plus 4 "ring" atoms unique to
/// the hexagonal stacking, expressed in the scaled (s_o = (3,3,8)) units.
/// Interleaved in primary/secondary pairs, same rationale as the cubic
/// table: even slot indices are sublattice A, odd are sublattice B.
const HEXAGONAL_SLOT_OFFSETS: [IVec3; 12] = [
    IVec3::new(0, 0, 0),
    IVec3::new(3, 3, 0),
    IVec3::new(2, 0, 4),
    IVec3::new(1, 3, 4),
    IVec3::new(2, 2, 2),
    IVec3::new(1, 1, 6),
    IVec3::new(0, 2, 6),
    IVec3::new(3, 1, 2),
    // ring atoms
    IVec3::new(1, 0, 2),
    IVec3::new(2, 3, 2),
    IVec3::new(0, 1, 6),
    IVec3::new(3, 2, 6),
];

impl Basis for Hexagonal {
    const NAME: &'static str = "hexagonal";
    const SLOTS_PER_CELL: usize = 12;
    const SCALE_ORIGIN: (i32, i32, i32) = (3, 3, 8);
    const SCALE_NORMAL: (i32, i32, i32) = (8, 8, 3);
    const HIERARCHICAL_BLOCKS: bool = false;

    fn slot_offsets() -> &'static [IVec3] {
        &HEXAGONAL_SLOT_OFFSETS
    }

    fn adjust_normal(n: DVec3) -> DVec3 {
        DVec3::new(n.x - 0.5 * n.y, n.y - 0.5 * n.x, n.z)
    }

    fn hkl_to_xyz(p: DVec3) -> DVec3 {
        DVec3::new(p.x - p.y / 2.0, p.y * 3.0_f64.sqrt() / 2.0, p.z)
    }

    fn pad_cell_counts(bounds: IVec3) -> IVec3 {
        bounds
    }
}
