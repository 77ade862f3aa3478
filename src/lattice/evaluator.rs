use glam::f64::DVec3;
use glam::i32::IVec3;
use rayon::prelude::*;

use crate::atom::Atom;
use crate::error::CoreError;
use crate::lattice::basis::Basis;
use crate::lattice::script::{Bounds, Material, ReplaceKind, ScopeMode, ScriptOp};
use crate::stats::LatticeStatistics;
use crate::util::timer::Timer;

/// A contiguous cell-index range: `origin..origin+size` in each axis.
#[derive(Debug, Clone, Copy)]
struct Block {
    origin: IVec3,
    size: IVec3,
}

/// A dense per-cell mask for one block, in x-fastest row-major order.
struct BlockResult {
    block: Block,
    cells: Vec<u16>,
}

/// One scope frame: its accumulator mask (one bitmask per cell, same shape
/// as the grid) and combination mode. Cyclic parent references from the
/// source are replaced with this plain stack of owned records (see design
/// notes): merging on pop needs no parent pointer, only the stack order.
struct ScopeFrame {
    mode: ScopeMode,
    accumulator: Vec<u16>,
}

impl ScopeFrame {
    fn new(mode: ScopeMode, cell_count: usize) -> Self {
        let seed = match mode {
            ScopeMode::Concave => u16::MAX,
            ScopeMode::Convex | ScopeMode::Volume => 0,
        };
        ScopeFrame { mode, accumulator: vec![seed; cell_count] }
    }

    fn combine_plane(&mut self, plane_mask: &[u16]) {
        match self.mode {
            ScopeMode::Concave => {
                for (acc, &m) in self.accumulator.iter_mut().zip(plane_mask) {
                    *acc &= m;
                }
            }
            ScopeMode::Convex | ScopeMode::Volume => {
                for (acc, &m) in self.accumulator.iter_mut().zip(plane_mask) {
                    *acc |= m;
                }
            }
        }
    }
}

/// Materializes a bounded region of a `Basis` lattice, carving it with a
/// scripted sequence of half-space operations, and emits the surviving
/// atoms in world coordinates.
pub struct Lattice<B: Basis> {
    _basis: std::marker::PhantomData<B>,
}

impl<B: Basis> Lattice<B> {
    /// Evaluates `script` against `bounds`/`material` and returns the
    /// surviving atoms in deterministic (z, y, x) cell order.
    pub fn evaluate(bounds: Bounds, material: Material, script: &[ScriptOp]) -> Result<Vec<Atom>, CoreError> {
        let (atoms, _stats) = Self::evaluate_with_statistics(bounds, material, script)?;
        Ok(atoms)
    }

    /// Same as [`Self::evaluate`] but also returns the run's
    /// [`LatticeStatistics`], following the per-operation
    /// accumulator-plus-`log_statistics()` convention.
    pub fn evaluate_with_statistics(
        bounds: Bounds,
        material: Material,
        script: &[ScriptOp],
    ) -> Result<(Vec<Atom>, LatticeStatistics), CoreError> {
        let _timer = Timer::new("lattice evaluate");
        material.validate(B::NAME)?;

        let raw_dims = bounds.as_ivec3();
        let cell_dims = B::pad_cell_counts(raw_dims);
        let cell_count = (cell_dims.x.max(0) * cell_dims.y.max(0) * cell_dims.z.max(0)) as usize;

        let mut stats = LatticeStatistics { cells: cell_count, ..Default::default() };

        let mut slots = vec![0u8; cell_count * B::SLOTS_PER_CELL];
        init_slots::<B>(&mut slots, material);

        let bounds_mask = bounding_box_mask::<B>(cell_dims, raw_dims);
        // Cells beyond the declared (pre-padding) bounds only exist to keep
        // `cell_dims` at the basis's required granularity (e.g. cubic pads
        // x to a multiple of 4); their slots are empty from the start, per
        // the data-model invariant, not carved out by a later Replace.
        zero_padding_slots::<B>(&mut slots, cell_dims, raw_dims);

        let mut frames: Vec<ScopeFrame> = vec![ScopeFrame::new(ScopeMode::Volume, cell_count)];
        let mut origins: Vec<DVec3> = vec![DVec3::ZERO];

        for op in script {
            match op {
                ScriptOp::PushScope(mode) => {
                    stats.scopes_opened += 1;
                    frames.push(ScopeFrame::new(*mode, cell_count));
                }
                ScriptOp::PopScope => {
                    let child = frames.pop().ok_or(CoreError::EmptyScope { operation: "PopScope" })?;
                    if frames.is_empty() {
                        return Err(CoreError::EmptyScope { operation: "PopScope" });
                    }
                    let parent = frames.last_mut().unwrap();
                    match child.mode {
                        ScopeMode::Convex => parent.combine_plane(&child.accumulator),
                        ScopeMode::Concave => {
                            // AND the child's accumulator into the parent.
                            match parent.mode {
                                ScopeMode::Concave => {
                                    for (a, c) in parent.accumulator.iter_mut().zip(&child.accumulator) {
                                        *a &= c;
                                    }
                                }
                                ScopeMode::Convex | ScopeMode::Volume => {
                                    for (a, c) in parent.accumulator.iter_mut().zip(&child.accumulator) {
                                        *a |= c;
                                    }
                                }
                            }
                        }
                        ScopeMode::Volume => {
                            // Leaving a Volume scope discards its planes:
                            // it does not propagate into the parent at all.
                        }
                    }
                }
                ScriptOp::PushOrigin(offset) => {
                    let current = *origins.last().unwrap();
                    origins.push(current + *offset);
                }
                ScriptOp::PopOrigin => {
                    if origins.len() <= 1 {
                        return Err(CoreError::EmptyScope { operation: "PopOrigin" });
                    }
                    origins.pop();
                }
                ScriptOp::Plane(normal) => {
                    stats.planes_evaluated += 1;
                    let origin = *origins.last().unwrap();
                    let plane_mask = evaluate_plane::<B>(cell_dims, origin, *normal);
                    frames.last_mut().unwrap().combine_plane(&plane_mask);
                }
                ScriptOp::Replace(kind) => {
                    stats.replace_ops += 1;
                    let selection = &frames.last().unwrap().accumulator;
                    apply_replace::<B>(&mut slots, selection, &bounds_mask, *kind);
                }
            }
        }

        if frames.len() != 1 {
            return Err(CoreError::EmptyScope { operation: "evaluate (unbalanced PushScope)" });
        }
        if origins.len() != 1 {
            return Err(CoreError::EmptyScope { operation: "evaluate (unbalanced PushOrigin)" });
        }

        let atoms = emit_atoms::<B>(&slots, cell_dims, material);
        stats.atoms_emitted = atoms.len();
        Ok((atoms, stats))
    }
}

fn init_slots<B: Basis>(slots: &mut [u8], material: Material) {
    let (e1, e2) = match material {
        Material::Elemental(e) => (e.atomic_number(), e.atomic_number()),
        Material::Checkerboard(a, b) => (a.atomic_number(), b.atomic_number()),
    };
    for (slot_index, slot) in slots.iter_mut().enumerate() {
        let within_cell = slot_index % B::SLOTS_PER_CELL;
        *slot = if within_cell % 2 == 0 { e1 } else { e2 };
    }
    if matches!(material, Material::Elemental(crate::element::Element::Au)) {
        // Gold is the FCC subset of the diamond-cubic slots: zero the
        // secondary (odd-index) sublattice.
        for (slot_index, slot) in slots.iter_mut().enumerate() {
            if slot_index % B::SLOTS_PER_CELL % 2 == 1 {
                *slot = 0;
            }
        }
    }
}

/// Scaled origin/normal used by every half-space evaluation, precomputed
/// once per `Plane` op.
fn scaled_params<B: Basis>(origin: DVec3, normal: DVec3) -> (IVec3, IVec3) {
    let adjusted = B::adjust_normal(normal);
    let (sox, soy, soz) = B::SCALE_ORIGIN;
    let (snx, sny, snz) = B::SCALE_NORMAL;
    let origin_scaled = IVec3::new(
        (origin.x * sox as f64).round() as i32,
        (origin.y * soy as f64).round() as i32,
        (origin.z * soz as f64).round() as i32,
    );
    let normal_scaled = IVec3::new(
        (adjusted.x * snx as f64).round() as i32,
        (adjusted.y * sny as f64).round() as i32,
        (adjusted.z * snz as f64).round() as i32,
    );
    (origin_scaled, normal_scaled)
}

fn dot_at(cell: IVec3, origin_scaled: IVec3, normal_scaled: IVec3, so: (i32, i32, i32)) -> i64 {
    let corner = IVec3::new(cell.x * so.0, cell.y * so.1, cell.z * so.2);
    let delta = corner - origin_scaled;
    delta.x as i64 * normal_scaled.x as i64
        + delta.y as i64 * normal_scaled.y as i64
        + delta.z as i64 * normal_scaled.z as i64
}

fn slot_dot(slot_offset: IVec3, cell: IVec3, origin_scaled: IVec3, normal_scaled: IVec3, so: (i32, i32, i32)) -> i64 {
    let global = IVec3::new(cell.x * so.0, cell.y * so.1, cell.z * so.2) + slot_offset;
    let delta = global - origin_scaled;
    delta.x as i64 * normal_scaled.x as i64
        + delta.y as i64 * normal_scaled.y as i64
        + delta.z as i64 * normal_scaled.z as i64
}

/// Evaluates one half-space plane against every slot of every cell,
/// returning a fresh per-cell bitmask (1 bit per slot, set where the slot
/// lies in the plane's "one" volume).
fn evaluate_plane<B: Basis>(dims: IVec3, origin: DVec3, normal: DVec3) -> Vec<u16> {
    let (origin_scaled, normal_scaled) = scaled_params::<B>(origin, normal);
    let cell_count = (dims.x.max(0) * dims.y.max(0) * dims.z.max(0)) as usize;
    let mut mask = vec![0u16; cell_count];

    if B::HIERARCHICAL_BLOCKS {
        let blocks = partition_blocks(dims, 32);
        let results: Vec<BlockResult> = if blocks.len() >= 4 {
            blocks
                .into_par_iter()
                .map(|b| evaluate_block::<B>(b, origin_scaled, normal_scaled))
                .collect()
        } else {
            blocks
                .into_iter()
                .map(|b| evaluate_block::<B>(b, origin_scaled, normal_scaled))
                .collect()
        };
        for r in results {
            scatter_block(&mut mask, dims, &r);
        }
    } else {
        let blocks = partition_blocks(dims, 32);
        let results: Vec<BlockResult> = if blocks.len() >= 4 {
            blocks
                .into_par_iter()
                .map(|b| evaluate_cells_direct::<B>(b, origin_scaled, normal_scaled))
                .collect()
        } else {
            blocks
                .into_iter()
                .map(|b| evaluate_cells_direct::<B>(b, origin_scaled, normal_scaled))
                .collect()
        };
        for r in results {
            scatter_block(&mut mask, dims, &r);
        }
    }
    mask
}

/// Splits `[0, dims)` into blocks of at most `size` cells per axis.
fn partition_blocks(dims: IVec3, size: i32) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut z = 0;
    while z < dims.z {
        let sz = size.min(dims.z - z);
        let mut y = 0;
        while y < dims.y {
            let sy = size.min(dims.y - y);
            let mut x = 0;
            while x < dims.x {
                let sx = size.min(dims.x - x);
                blocks.push(Block { origin: IVec3::new(x, y, z), size: IVec3::new(sx, sy, sz) });
                x += sx;
            }
            y += sy;
        }
        z += sz;
    }
    blocks
}

/// Recursively tests a block's 8 corners; if wholly inside/outside the
/// half-space, fills the block in bulk, otherwise subdivides down to
/// single-cell per-slot evaluation. Cubic grids only.
fn evaluate_block<B: Basis>(block: Block, origin_scaled: IVec3, normal_scaled: IVec3) -> BlockResult {
    let cells = fill_block::<B>(block, origin_scaled, normal_scaled, &[16, 8, 4, 2]);
    BlockResult { block, cells }
}

fn fill_block<B: Basis>(block: Block, origin_scaled: IVec3, normal_scaled: IVec3, remaining: &[i32]) -> Vec<u16> {
    let so = B::SCALE_ORIGIN;
    let volume = (block.size.x.max(0) * block.size.y.max(0) * block.size.z.max(0)) as usize;
    if volume == 0 {
        return Vec::new();
    }

    let corners = block_corners(block);
    let all_positive = corners.iter().all(|&c| dot_at(c, origin_scaled, normal_scaled, so) > 0);
    let all_negative = corners.iter().all(|&c| dot_at(c, origin_scaled, normal_scaled, so) < 0);

    if all_positive {
        return vec![all_slots_mask::<B>(); volume];
    }
    if all_negative {
        return vec![0u16; volume];
    }

    if block.size.x <= 1 && block.size.y <= 1 && block.size.z <= 1 {
        return vec![evaluate_single_cell::<B>(block.origin, origin_scaled, normal_scaled)];
    }

    let next_size = remaining.first().copied().unwrap_or(1).max(1);
    let sub_blocks = partition_blocks(block.size, next_size)
        .into_iter()
        .map(|b| Block { origin: block.origin + b.origin, size: b.size })
        .collect::<Vec<_>>();
    let rest = if remaining.is_empty() { remaining } else { &remaining[1..] };

    let mut cells = vec![0u16; volume];
    for sub in sub_blocks {
        let sub_cells = fill_block::<B>(sub, origin_scaled, normal_scaled, rest);
        let local = BlockResult {
            block: Block { origin: sub.origin - block.origin, size: sub.size },
            cells: sub_cells,
        };
        scatter_block(&mut cells, block.size, &local);
    }
    cells
}

/// Hexagonal path: no corner short-circuit, just a direct per-cell
/// evaluation within each 32-cell tile.
fn evaluate_cells_direct<B: Basis>(block: Block, origin_scaled: IVec3, normal_scaled: IVec3) -> BlockResult {
    let volume = (block.size.x.max(0) * block.size.y.max(0) * block.size.z.max(0)) as usize;
    let mut cells = vec![0u16; volume];
    for z in 0..block.size.z {
        for y in 0..block.size.y {
            for x in 0..block.size.x {
                let cell = block.origin + IVec3::new(x, y, z);
                let idx = (z * block.size.y * block.size.x + y * block.size.x + x) as usize;
                cells[idx] = evaluate_single_cell::<B>(cell, origin_scaled, normal_scaled);
            }
        }
    }
    BlockResult { block, cells }
}

fn evaluate_single_cell<B: Basis>(cell: IVec3, origin_scaled: IVec3, normal_scaled: IVec3) -> u16 {
    let so = B::SCALE_ORIGIN;
    let mut bits = 0u16;
    for (i, &offset) in B::slot_offsets().iter().enumerate() {
        if slot_dot(offset, cell, origin_scaled, normal_scaled, so) > 0 {
            bits |= 1 << i;
        }
    }
    bits
}

fn all_slots_mask<B: Basis>() -> u16 {
    (1u32 << B::SLOTS_PER_CELL).wrapping_sub(1) as u16
}

fn block_corners(block: Block) -> [IVec3; 8] {
    let lo = block.origin;
    let hi = block.origin + block.size;
    [
        IVec3::new(lo.x, lo.y, lo.z),
        IVec3::new(hi.x, lo.y, lo.z),
        IVec3::new(lo.x, hi.y, lo.z),
        IVec3::new(hi.x, hi.y, lo.z),
        IVec3::new(lo.x, lo.y, hi.z),
        IVec3::new(hi.x, lo.y, hi.z),
        IVec3::new(lo.x, hi.y, hi.z),
        IVec3::new(hi.x, hi.y, hi.z),
    ]
}

/// Writes a block's dense local cell mask into the full grid mask.
fn scatter_block(dest: &mut [u16], dest_dims: IVec3, result: &BlockResult) {
    let block = result.block;
    for z in 0..block.size.z {
        for y in 0..block.size.y {
            for x in 0..block.size.x {
                let local_idx = (z * block.size.y * block.size.x + y * block.size.x + x) as usize;
                let gx = block.origin.x + x;
                let gy = block.origin.y + y;
                let gz = block.origin.z + z;
                let global_idx = (gz * dest_dims.y * dest_dims.x + gy * dest_dims.x + gx) as usize;
                dest[global_idx] = result.cells[local_idx];
            }
        }
    }
}

/// The initial grid mask: all-ones AND'd with the 6 bounding-box planes, so
/// slots outside the declared (pre-padding) bounds start zeroed.
fn bounding_box_mask<B: Basis>(cell_dims: IVec3, declared: IVec3) -> Vec<u16> {
    let cell_count = (cell_dims.x.max(0) * cell_dims.y.max(0) * cell_dims.z.max(0)) as usize;
    let mut mask = vec![all_slots_mask::<B>(); cell_count];
    if cell_dims == declared {
        return mask;
    }
    for z in 0..cell_dims.z {
        for y in 0..cell_dims.y {
            for x in 0..cell_dims.x {
                if x >= declared.x || y >= declared.y || z >= declared.z {
                    let idx = (z * cell_dims.y * cell_dims.x + y * cell_dims.x + x) as usize;
                    mask[idx] = 0;
                }
            }
        }
    }
    mask
}

/// Zeroes every slot in a cell that lies beyond the declared (pre-padding)
/// bounds. Padding only exists to satisfy a basis's cell-count granularity
/// (cubic x-dim padded to a multiple of 4); it never holds atoms.
fn zero_padding_slots<B: Basis>(slots: &mut [u8], cell_dims: IVec3, declared: IVec3) {
    if cell_dims == declared {
        return;
    }
    for z in 0..cell_dims.z {
        for y in 0..cell_dims.y {
            for x in 0..cell_dims.x {
                if x >= declared.x || y >= declared.y || z >= declared.z {
                    let cell_index = (z * cell_dims.y * cell_dims.x + y * cell_dims.x + x) as usize;
                    let base = cell_index * B::SLOTS_PER_CELL;
                    for slot in &mut slots[base..base + B::SLOTS_PER_CELL] {
                        *slot = 0;
                    }
                }
            }
        }
    }
}

fn apply_replace<B: Basis>(slots: &mut [u8], selection: &[u16], bounds_mask: &[u16], kind: ReplaceKind) {
    let target = match kind {
        ReplaceKind::Atom(e) => e.atomic_number(),
        ReplaceKind::Empty => 0,
    };
    for (cell_index, (&sel, &bnd)) in selection.iter().zip(bounds_mask).enumerate() {
        let effective = sel & bnd;
        if effective == 0 {
            continue;
        }
        for slot_in_cell in 0..B::SLOTS_PER_CELL {
            if effective & (1 << slot_in_cell) == 0 {
                continue;
            }
            let slot_index = cell_index * B::SLOTS_PER_CELL + slot_in_cell;
            if slots[slot_index] != 0 {
                slots[slot_index] = target;
            }
        }
    }
}

/// Emits surviving atoms in deterministic (z, y, x) cell order, converting
/// each slot's HKL position to world XYZ and scaling by the material's
/// lattice constant.
fn emit_atoms<B: Basis>(slots: &[u8], cell_dims: IVec3, material: Material) -> Vec<Atom> {
    let lattice_constant = material.cubic_lattice_constant_nm();
    let so = B::SCALE_ORIGIN;
    let mut atoms = Vec::new();
    for z in 0..cell_dims.z {
        for y in 0..cell_dims.y {
            for x in 0..cell_dims.x {
                let cell = IVec3::new(x, y, z);
                let cell_index = (z * cell_dims.y * cell_dims.x + y * cell_dims.x + x) as usize;
                for (slot_in_cell, &offset) in B::slot_offsets().iter().enumerate() {
                    let atomic_number = slots[cell_index * B::SLOTS_PER_CELL + slot_in_cell];
                    if atomic_number == 0 {
                        continue;
                    }
                    let frac = DVec3::new(
                        offset.x as f64 / so.0 as f64,
                        offset.y as f64 / so.1 as f64,
                        offset.z as f64 / so.2 as f64,
                    );
                    let hkl = DVec3::new(cell.x as f64, cell.y as f64, cell.z as f64) + frac;
                    let xyz = B::hkl_to_xyz(hkl) * lattice_constant;
                    atoms.push(Atom::new(xyz.as_vec3(), atomic_number));
                }
            }
        }
    }
    atoms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Element, MaterialType};
    use crate::lattice::basis::{Cubic, Hexagonal};

    fn bounds(h: i32, k: i32, l: i32) -> Bounds {
        Bounds { h, k, l }
    }

    #[test]
    fn unfilled_box_has_closed_form_atom_count() {
        // 4 is already a multiple of the cubic x-padding granularity, so
        // there's no padding to worry about: every declared cell is fully
        // populated with all 8 diamond-cubic slots.
        let b = bounds(4, 4, 4);
        let atoms = Lattice::<Cubic>::evaluate(b, MaterialType::Elemental(Element::C), &[]).unwrap();
        assert_eq!(atoms.len(), 4 * 4 * 4 * 8);
        for a in &atoms {
            assert_eq!(a.atomic_number, 6);
        }
    }

    #[test]
    fn padding_cells_never_emit_atoms() {
        // h=3 is not a multiple of 4, so the cubic evaluator pads the grid
        // to 4 cells along x; those padding cells must stay empty.
        let b = bounds(3, 2, 2);
        let atoms = Lattice::<Cubic>::evaluate(b, MaterialType::Elemental(Element::C), &[]).unwrap();
        assert_eq!(atoms.len(), 3 * 2 * 2 * 8);
        for a in &atoms {
            assert!(a.position.x <= 3.0 * MaterialType::Elemental(Element::C).cubic_lattice_constant_nm() as f32 + 1e-3);
        }
    }

    #[test]
    fn gold_is_half_density_fcc_subset_of_diamond_cubic() {
        let b = bounds(4, 4, 4);
        let carbon = Lattice::<Cubic>::evaluate(b, MaterialType::Elemental(Element::C), &[]).unwrap();
        let gold = Lattice::<Cubic>::evaluate(b, MaterialType::Elemental(Element::Au), &[]).unwrap();
        assert_eq!(gold.len(), carbon.len() / 2);
        for a in &gold {
            assert_eq!(a.atomic_number, 79);
        }
    }

    #[test]
    fn checkerboard_alternates_species_by_slot_parity() {
        let b = bounds(4, 4, 4);
        let atoms = Lattice::<Cubic>::evaluate(b, MaterialType::Checkerboard(Element::C, Element::Si), &[]).unwrap();
        let carbon_count = atoms.iter().filter(|a| a.atomic_number == 6).count();
        let silicon_count = atoms.iter().filter(|a| a.atomic_number == 14).count();
        assert_eq!(carbon_count, silicon_count);
        assert_eq!(carbon_count + silicon_count, atoms.len());
    }

    #[test]
    fn plane_replace_empty_shrinks_atom_count_and_is_non_reversible() {
        let b = bounds(4, 4, 4);
        let full = Lattice::<Cubic>::evaluate(b, MaterialType::Elemental(Element::C), &[]).unwrap();

        let script = vec![
            ScriptOp::PushScope(ScopeMode::Volume),
            ScriptOp::Plane(DVec3::new(-1.0, 0.0, 0.0)),
            ScriptOp::Replace(ReplaceKind::Empty),
            ScriptOp::PopScope,
        ];
        let cut = Lattice::<Cubic>::evaluate(b, MaterialType::Elemental(Element::C), &script).unwrap();
        assert!(cut.len() < full.len());
    }

    #[test]
    fn unsupported_checkerboard_pair_is_rejected() {
        let b = bounds(2, 2, 2);
        let err = Lattice::<Cubic>::evaluate(b, MaterialType::Checkerboard(Element::H, Element::O), &[]).unwrap_err();
        assert!(matches!(err, CoreError::MaterialUnsupported { .. }));
    }

    #[test]
    fn unbalanced_scope_is_an_error() {
        let b = bounds(2, 2, 2);
        let script = vec![ScriptOp::PushScope(ScopeMode::Convex)];
        let err = Lattice::<Cubic>::evaluate(b, MaterialType::Elemental(Element::C), &script).unwrap_err();
        assert!(matches!(err, CoreError::EmptyScope { .. }));
    }

    #[test]
    fn all_emitted_atoms_lie_within_bounds_box() {
        let b = bounds(4, 4, 2);
        let material = MaterialType::Elemental(Element::C);
        let a_cubic = material.cubic_lattice_constant_nm() as f32;
        let atoms = Lattice::<Cubic>::evaluate(b, material, &[]).unwrap();
        for a in &atoms {
            assert!(a.position.x >= -1e-3 && a.position.x <= 4.0 * a_cubic + 1e-3);
            assert!(a.position.y >= -1e-3 && a.position.y <= 4.0 * a_cubic + 1e-3);
            assert!(a.position.z >= -1e-3 && a.position.z <= 2.0 * a_cubic + 1e-3);
        }
    }

    #[test]
    fn hexagonal_basis_emits_twelve_atoms_per_cell_when_full() {
        let b = bounds(1, 1, 1);
        let atoms = Lattice::<Hexagonal>::evaluate(b, MaterialType::Elemental(Element::C), &[]).unwrap();
        assert_eq!(atoms.len(), 12);
    }

    #[test]
    fn statistics_count_planes_and_scopes() {
        let b = bounds(2, 2, 2);
        let script = vec![
            ScriptOp::PushScope(ScopeMode::Convex),
            ScriptOp::Plane(DVec3::new(1.0, 0.0, 0.0)),
            ScriptOp::PopScope,
        ];
        let (_atoms, stats) =
            Lattice::<Cubic>::evaluate_with_statistics(b, MaterialType::Elemental(Element::C), &script).unwrap();
        assert_eq!(stats.scopes_opened, 1);
        assert_eq!(stats.planes_evaluated, 1);
        assert_eq!(stats.cells, 2 * 2 * 2);
    }
}
