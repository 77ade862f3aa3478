//! `crystolecule_core`: a crystal geometry compiler. Materializes a bounded
//! region of a diamondoid or zincblende-style lattice, carves it with
//! composable half-space expressions, and (optionally) reconstructs the cut
//! surfaces into a chemically realistic bonded topology with passivating
//! hydrogens.
//!
//! Two subsystems carry the algorithmic weight: [`lattice`] (the bit-mask
//! voxel evaluator) and [`topology`] (neighbor search, Morton sort, orbital
//! derivation, surface reconstruction). [`atom`], [`element`], and [`error`]
//! are the shared data model; [`wire`] is an optional packed-buffer
//! convenience for consumers that want one; [`stats`] holds the
//! per-operation statistics accumulators the two subsystems populate.

pub mod atom;
pub mod element;
pub mod error;
pub mod lattice;
pub mod stats;
pub mod topology;
pub mod util;
pub mod wire;

pub use atom::{Atom, Bond};
pub use error::{CoreError, CoreResult};
