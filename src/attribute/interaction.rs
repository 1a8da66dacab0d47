//! Curve-paired attribute changes
//!
//! Some attribute changes scale with another attribute: how much damage
//! armor absorbs depends on armor quality, shaped by a registered curve
//! for that (target, source) pairing. A missing pairing is a
//! configuration problem; the change is skipped, not applied blindly.

use ahash::AHashMap;

use crate::attribute::state::AttributeState;
use crate::attribute::types::{AttributeType, AttributeTypeId};
use crate::curve::Curve;

/// Registered response-curve pairings between attribute types
#[derive(Debug, Clone, Default)]
pub struct AttributeCurveTable {
    curves: AHashMap<(AttributeTypeId, AttributeTypeId), Curve>,
}

impl AttributeCurveTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, this: AttributeTypeId, other: AttributeTypeId, curve: Curve) {
        self.curves.insert((this, other), curve);
    }

    pub fn get(&self, this: &AttributeTypeId, other: &AttributeTypeId) -> Option<&Curve> {
        self.curves.get(&(this.clone(), other.clone()))
    }

    /// Change `state` by a rate read off the (this, other) pairing curve
    ///
    /// `input_value` is normalized against the other attribute's bounds.
    /// The final delta is `multiplier * rate`, signed by `increase`, and
    /// applied through `set_level` (clamped).
    pub fn change_using_curve(
        &self,
        state: &mut AttributeState,
        this: &AttributeTypeId,
        other: &AttributeType,
        input_value: f32,
        multiplier: f32,
        increase: bool,
    ) {
        let Some(curve) = self.get(this, &other.id) else {
            tracing::warn!(
                this = %this,
                other = %other.id,
                "no curve pairing registered for attribute change; skipped"
            );
            return;
        };
        let Some((other_min, other_max)) = other.bounds() else {
            tracing::warn!(
                other = %other.id,
                "curve-paired attribute change requires a numeric source attribute; skipped"
            );
            return;
        };
        let Some(raw) = state.raw() else {
            tracing::warn!(
                this = %this,
                "curve-paired attribute change requires a numeric target attribute; skipped"
            );
            return;
        };
        let rate = curve.normalize_and_eval(input_value, other_min, other_max);
        let delta = multiplier * rate * if increase { 1.0 } else { -1.0 };
        state.set_level(raw + delta);
    }
}
