//! Integration coverage for `Lattice::evaluate` driven through
//! `ScriptBuilder`, exercising the public crate surface the way a caller
//! outside `crystolecule_core` would: build bounds, build a script, hand
//! both to the evaluator, and check what came back.

use glam::f64::DVec3;

use crystolecule_core::error::CoreError;
use crystolecule_core::lattice::{Bounds, Cubic, Lattice, ReplaceKind, ScopeMode, ScriptBuilder};
use crystolecule_core::element::{Element, MaterialType};

#[test]
fn script_builder_round_trips_through_evaluate() {
    let bounds = Bounds::from_f64(4.0, 4.0, 4.0).unwrap();
    let material = MaterialType::Elemental(Element::C);

    let mut builder = ScriptBuilder::new();
    builder.push_scope(ScopeMode::Volume);
    builder.plane(DVec3::new(-1.0, 0.0, 0.0));
    builder.replace(ReplaceKind::Empty);
    builder.pop_scope();
    let script = builder.finish();

    let full = Lattice::<Cubic>::evaluate(bounds, material, &[]).unwrap();
    let cut = Lattice::<Cubic>::evaluate(bounds, material, &script).unwrap();
    assert!(cut.len() < full.len());
}

#[test]
fn nested_origin_offsets_a_plane_without_moving_the_bounds_box() {
    let bounds = Bounds::from_f64(4.0, 4.0, 4.0).unwrap();
    let material = MaterialType::Elemental(Element::C);

    let mut builder = ScriptBuilder::new();
    builder.push_scope(ScopeMode::Volume);
    builder.push_origin(DVec3::new(2.0, 0.0, 0.0)).unwrap();
    builder.plane(DVec3::new(-1.0, 0.0, 0.0));
    builder.replace(ReplaceKind::Empty);
    builder.pop_origin();
    builder.pop_scope();
    let offset_script = builder.finish();

    let offset_cut = Lattice::<Cubic>::evaluate(bounds, material, &offset_script).unwrap();

    let mut builder = ScriptBuilder::new();
    builder.push_scope(ScopeMode::Volume);
    builder.plane(DVec3::new(-1.0, 0.0, 0.0));
    builder.replace(ReplaceKind::Empty);
    builder.pop_scope();
    let unshifted_script = builder.finish();
    let unshifted_cut = Lattice::<Cubic>::evaluate(bounds, material, &unshifted_script).unwrap();

    // Cutting at x=2 (origin-shifted) removes strictly less than cutting at
    // x=0 (the un-shifted origin) out of the same declared 4x4x4 box.
    assert!(offset_cut.len() > unshifted_cut.len());
}

#[test]
fn push_origin_at_top_level_is_rejected() {
    let mut builder = ScriptBuilder::new();
    let err = builder.push_origin(DVec3::new(1.0, 0.0, 0.0)).unwrap_err();
    assert!(matches!(err, CoreError::OriginAtTopLevel));
}

#[test]
fn invalid_fractional_bounds_are_rejected() {
    let err = Bounds::from_f64(3.5, 2.0, 2.0).unwrap_err();
    assert!(matches!(err, CoreError::InvalidBounds { axis: "h", .. }));
}

#[test]
fn convex_scope_unions_two_half_spaces() {
    // A convex (union) scope keeping "x < 1 OR x > 3" out of a 4-wide box
    // should remove strictly more atoms than either half alone, since the
    // two half-spaces overlap only at the edges.
    let bounds = Bounds::from_f64(4.0, 4.0, 4.0).unwrap();
    let material = MaterialType::Elemental(Element::C);

    let mut only_low = ScriptBuilder::new();
    only_low.push_scope(ScopeMode::Volume);
    only_low.plane(DVec3::new(-1.0, 0.0, 0.0));
    only_low.replace(ReplaceKind::Empty);
    only_low.pop_scope();
    let low_cut = Lattice::<Cubic>::evaluate(bounds, material, &only_low.finish()).unwrap();

    let mut both = ScriptBuilder::new();
    both.push_scope(ScopeMode::Volume);
    both.push_scope(ScopeMode::Convex);
    both.plane(DVec3::new(-1.0, 0.0, 0.0));
    both.push_origin(DVec3::new(3.0, 0.0, 0.0)).unwrap();
    both.plane(DVec3::new(1.0, 0.0, 0.0));
    both.pop_origin();
    both.pop_scope();
    both.replace(ReplaceKind::Empty);
    both.pop_scope();
    let both_cut = Lattice::<Cubic>::evaluate(bounds, material, &both.finish()).unwrap();

    assert!(both_cut.len() <= low_cut.len());
}
