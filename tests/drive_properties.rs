//! Property tests for level normalization and curve bounds

use proptest::prelude::*;
use volition::attribute::{AttributeState, AttributeType};
use volition::curve::{Curve, CurveShape};
use volition::drive::{DriveState, DriveType};

fn unit_drive() -> DriveType {
    DriveType::new("hunger", 1, Curve::over_levels(CurveShape::Linear))
}

#[test]
fn test_reference_point_raw_80_reads_level_20() {
    let mut state = DriveState::new(&unit_drive());
    state.set_raw(80.0);
    assert!((state.level() - 20.0).abs() < 1e-4);
}

proptest! {
    #[test]
    fn drive_level_always_in_range(raw in -1e6f32..1e6f32) {
        let mut state = DriveState::new(&unit_drive());
        state.set_raw(raw);
        let level = state.level();
        prop_assert!((0.0..=100.0).contains(&level));
    }

    #[test]
    fn drive_level_inverts_monotonically(a in 0.0f32..100.0, b in 0.0f32..100.0) {
        let mut low = DriveState::new(&unit_drive());
        let mut high = DriveState::new(&unit_drive());
        low.set_raw(a.min(b));
        high.set_raw(a.max(b));
        prop_assert!(low.level() >= high.level());
    }

    #[test]
    fn level_change_round_trips(start in 0.0f32..100.0, delta in -100.0f32..100.0) {
        let mut state = DriveState::new(&unit_drive());
        state.set_raw(start);
        let before = state.level();
        let reached = state.apply_level_change(delta);
        prop_assert!((0.0..=100.0).contains(&reached));
        prop_assert!((reached - (before + delta).clamp(0.0, 100.0)).abs() < 1e-3);
    }

    #[test]
    fn attribute_normalization_stays_in_unit_range(
        raw in -1e6f32..1e6f32,
        min in -100.0f32..0.0,
        max in 1.0f32..100.0,
    ) {
        let ty = AttributeType::numeric("stat", min, max, 0.0);
        let mut state = AttributeState::new(&ty);
        state.set_level(raw);
        prop_assert!((0.0..=1.0).contains(&state.normalized_level()));
    }

    #[test]
    fn attribute_bounds_map_to_unit_endpoints(
        min in -100.0f32..0.0,
        max in 1.0f32..100.0,
    ) {
        let ty = AttributeType::numeric("stat", min, max, 0.0);
        let mut state = AttributeState::new(&ty);
        state.set_level(min);
        prop_assert!(state.normalized_level().abs() < 1e-6);
        state.set_level(max);
        prop_assert!((state.normalized_level() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn curve_output_never_escapes_its_y_range(
        x in -1e3f32..1e3f32,
        y_min in -10.0f32..0.0,
        y_max in 0.1f32..10.0,
    ) {
        for shape in [
            CurveShape::Linear,
            CurveShape::Quadratic,
            CurveShape::InverseQuadratic,
            CurveShape::Sine,
            CurveShape::Logistic { steepness: 8.0 },
            CurveShape::Step { threshold: 0.5 },
        ] {
            let curve = Curve::new(shape, 0.0, 100.0, y_min, y_max);
            let y = curve.eval(x);
            prop_assert!((y_min..=y_max).contains(&y));
        }
    }
}
