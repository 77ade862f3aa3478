use thiserror::Error;

/// Errors surfaced by the public API. Every top-level operation is fatal on
/// error: there is no partial success and no internal retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("bounds component {axis} = {value} is not integer-valued (tolerance 1e-3)")]
    InvalidBounds { axis: &'static str, value: f64 },

    #[error("material {material} is not supported on basis {basis}")]
    MaterialUnsupported { basis: &'static str, material: String },

    #[error("scope stack is empty: {operation} has no enclosing scope")]
    EmptyScope { operation: &'static str },

    #[error("{operation} issued before both bounds and material were set")]
    EmitBeforeSetup { operation: &'static str },

    #[error("Origin cannot be pushed at the top-level scope")]
    OriginAtTopLevel,

    #[error("{subsystem} exceeded capacity {limit} (had {actual})")]
    CapacityExceeded {
        subsystem: &'static str,
        limit: usize,
        actual: usize,
    },

    #[error("{subsystem} failed to converge after {iterations} iterations (near atom {atom_hint:?})")]
    Divergence {
        subsystem: &'static str,
        iterations: u32,
        atom_hint: Option<u32>,
    },

    #[error("internal invariant violated in {subsystem}: {detail}")]
    InternalInvariant {
        subsystem: &'static str,
        detail: String,
    },
}

pub type CoreResult<T> = Result<T, CoreError>;
