//! The lattice evaluator: a bit-mask voxel engine that materializes a
//! cubic or hexagonal diamondoid lattice inside user-supplied bounds,
//! carves it with a stacked boolean-scope script of half-space planes,
//! and emits the surviving atoms in world coordinates.

mod basis;
mod evaluator;
mod script;

pub use basis::{Basis, Cubic, Hexagonal};
pub use evaluator::Lattice;
pub use script::{Bounds, Material, ReplaceKind, ScopeMode, ScriptBuilder, ScriptOp};
