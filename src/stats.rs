//! Run statistics accumulated by the lattice evaluator and surface
//! reconstruction, printed on request via a `log_statistics` method: plain
//! `println!`, no tracing/log crate.

/// Accumulated over one `Lattice::evaluate` call.
#[derive(Debug, Clone, Copy, Default)]
pub struct LatticeStatistics {
    pub cells: usize,
    pub planes_evaluated: u32,
    pub scopes_opened: u32,
    pub replace_ops: u32,
    pub atoms_emitted: usize,
}

impl LatticeStatistics {
    pub fn log_statistics(&self) {
        println!("Lattice evaluator statistics:");
        println!("  cells: {}", self.cells);
        println!("  scopes opened: {}", self.scopes_opened);
        println!("  planes evaluated: {}", self.planes_evaluated);
        println!("  replace ops: {}", self.replace_ops);
        println!("  atoms emitted: {}", self.atoms_emitted);
    }
}

/// Accumulated over one `reconstruct_surface` call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconstructionStatistics {
    pub rounds: u32,
    pub atoms_removed_pathological: usize,
    pub hydrogen_sites_proposed: usize,
    pub collisions_3way: usize,
    pub collisions_2way: usize,
    pub dimer_bonds_formed: usize,
}

impl ReconstructionStatistics {
    pub fn log_statistics(&self) {
        println!("Surface reconstruction statistics:");
        println!("  rounds: {}", self.rounds);
        println!("  atoms removed (pathological): {}", self.atoms_removed_pathological);
        println!("  hydrogen sites proposed: {}", self.hydrogen_sites_proposed);
        if self.collisions_3way > 0 {
            println!("  3-way collisions resolved: {}", self.collisions_3way);
        }
        println!("  2-way collisions (dimer candidates): {}", self.collisions_2way);
        println!("  dimer bonds formed: {}", self.dimer_bonds_formed);
    }
}
