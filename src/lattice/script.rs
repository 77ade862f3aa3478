use glam::f64::DVec3;
use glam::i32::IVec3;

use crate::element::{Element, MaterialType};
use crate::error::CoreError;

/// Declared extent of the lattice region, in whole unit cells along each
/// HKL axis. Must already be integer-valued — bounds must equal their own
/// ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub h: i32,
    pub k: i32,
    pub l: i32,
}

impl Bounds {
    /// Validates a floating-point bounds triple (as a caller might compute
    /// it from a parametric expression) and returns the integer form.
    pub fn from_f64(h: f64, k: f64, l: f64) -> Result<Self, CoreError> {
        const TOLERANCE: f64 = 1e-3;
        let check = |axis: &'static str, v: f64| -> Result<i32, CoreError> {
            let rounded = v.round();
            if (v - rounded).abs() > TOLERANCE {
                Err(CoreError::InvalidBounds { axis, value: v })
            } else {
                Ok(rounded as i32)
            }
        };
        Ok(Bounds {
            h: check("h", h)?,
            k: check("k", k)?,
            l: check("l", l)?,
        })
    }

    pub fn as_ivec3(self) -> IVec3 {
        IVec3::new(self.h, self.k, self.l)
    }
}

/// How a scope's accumulator combines its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeMode {
    /// Root mode: no combination semantics of its own; its accumulator is
    /// whatever its single child scope produces.
    Volume,
    /// Children combine with logical AND (intersection).
    Concave,
    /// Children combine with logical OR (union).
    Convex,
}

/// What a `Replace` operation writes into a matched slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceKind {
    Atom(Element),
    Empty,
}

/// One operation in an evaluated script. Scripts are flat sequences;
/// `PushScope`/`PopScope` and `PushOrigin`/`PopOrigin` must balance.
#[derive(Debug, Clone, Copy)]
pub enum ScriptOp {
    PushScope(ScopeMode),
    PopScope,
    PushOrigin(DVec3),
    PopOrigin,
    Plane(DVec3),
    Replace(ReplaceKind),
}

/// Builds a script explicitly, replacing the source's global scope
/// singleton (`GlobalScope.global`) with a plain owned object threaded
/// through the caller's own code — see design notes.
#[derive(Debug, Clone, Default)]
pub struct ScriptBuilder {
    ops: Vec<ScriptOp>,
    depth: i32,
    origin_depth: i32,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        ScriptBuilder { ops: Vec::new(), depth: 0, origin_depth: 0 }
    }

    pub fn push_scope(&mut self, mode: ScopeMode) -> &mut Self {
        self.ops.push(ScriptOp::PushScope(mode));
        self.depth += 1;
        self
    }

    pub fn pop_scope(&mut self) -> &mut Self {
        self.ops.push(ScriptOp::PopScope);
        self.depth -= 1;
        self
    }

    /// Pushes a translated origin for nested plane declarations. Rejected
    /// at the top level (depth 0) with `OriginAtTopLevel`, checked here so
    /// the builder can reject eagerly instead of waiting for evaluation.
    pub fn push_origin(&mut self, offset: DVec3) -> Result<&mut Self, CoreError> {
        if self.depth == 0 {
            return Err(CoreError::OriginAtTopLevel);
        }
        self.ops.push(ScriptOp::PushOrigin(offset));
        self.origin_depth += 1;
        Ok(self)
    }

    pub fn pop_origin(&mut self) -> &mut Self {
        self.ops.push(ScriptOp::PopOrigin);
        self.origin_depth -= 1;
        self
    }

    pub fn plane(&mut self, normal: DVec3) -> &mut Self {
        self.ops.push(ScriptOp::Plane(normal));
        self
    }

    pub fn replace(&mut self, kind: ReplaceKind) -> &mut Self {
        self.ops.push(ScriptOp::Replace(kind));
        self
    }

    pub fn finish(self) -> Vec<ScriptOp> {
        self.ops
    }
}

/// Material selection carried alongside `Bounds` into `Lattice::evaluate`.
pub type Material = MaterialType;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_from_f64_accepts_values_within_tolerance() {
        let bounds = Bounds::from_f64(4.0009, 2.0, 2.0).unwrap();
        assert_eq!(bounds, Bounds { h: 4, k: 2, l: 2 });
    }

    #[test]
    fn bounds_as_ivec3_preserves_axis_order() {
        let bounds = Bounds { h: 3, k: 5, l: 7 };
        assert_eq!(bounds.as_ivec3(), IVec3::new(3, 5, 7));
    }

    #[test]
    fn builder_finish_emits_ops_in_call_order() {
        let mut builder = ScriptBuilder::new();
        builder.push_scope(ScopeMode::Convex);
        builder.plane(DVec3::new(1.0, 0.0, 0.0));
        builder.replace(ReplaceKind::Atom(Element::C));
        builder.pop_scope();
        let ops = builder.finish();

        assert!(matches!(ops[0], ScriptOp::PushScope(ScopeMode::Convex)));
        assert!(matches!(ops[1], ScriptOp::Plane(_)));
        assert!(matches!(ops[2], ScriptOp::Replace(ReplaceKind::Atom(Element::C))));
        assert!(matches!(ops[3], ScriptOp::PopScope));
    }

    #[test]
    fn nested_origin_pushes_and_pops_cleanly() {
        let mut builder = ScriptBuilder::new();
        builder.push_scope(ScopeMode::Concave);
        builder.push_origin(DVec3::new(1.0, 0.0, 0.0)).unwrap();
        builder.push_origin(DVec3::new(0.0, 1.0, 0.0)).unwrap();
        builder.pop_origin();
        builder.pop_origin();
        builder.pop_scope();
        let ops = builder.finish();
        assert_eq!(ops.len(), 5);
    }

    #[test]
    fn origin_at_top_level_is_rejected_before_any_scope_push() {
        let mut builder = ScriptBuilder::new();
        let err = builder.push_origin(DVec3::ZERO).unwrap_err();
        assert!(matches!(err, CoreError::OriginAtTopLevel));
    }
}
