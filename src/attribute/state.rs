//! Per-agent attribute state

use serde::{Deserialize, Serialize};

use crate::attribute::types::{AttributeKind, AttributeType};

/// Runtime value for one attribute on one agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AttributeState {
    Numeric { raw: f32, min: f32, max: f32 },
    /// Enumerated and categorical attributes both store an option index
    Indexed { index: usize, count: usize },
}

impl AttributeState {
    pub fn new(attribute_type: &AttributeType) -> Self {
        match &attribute_type.kind {
            AttributeKind::Numeric { min, max, default } => AttributeState::Numeric {
                raw: default.clamp(*min, *max),
                min: *min,
                max: *max,
            },
            AttributeKind::Enumerated {
                options,
                default_index,
            }
            | AttributeKind::Categorical {
                options,
                default_index,
            } => AttributeState::Indexed {
                index: (*default_index).min(options.len().saturating_sub(1)),
                count: options.len(),
            },
        }
    }

    /// Raw scalar value; None for indexed attributes
    pub fn raw(&self) -> Option<f32> {
        match self {
            AttributeState::Numeric { raw, .. } => Some(*raw),
            AttributeState::Indexed { .. } => None,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            AttributeState::Indexed { index, .. } => Some(*index),
            AttributeState::Numeric { .. } => None,
        }
    }

    /// Normalized level in [0, 1]
    pub fn normalized_level(&self) -> f32 {
        match self {
            AttributeState::Numeric { raw, min, max } => {
                if min >= max {
                    tracing::warn!(min, max, "attribute has degenerate bounds");
                    return 0.0;
                }
                ((raw - min) / (max - min)).clamp(0.0, 1.0)
            }
            AttributeState::Indexed { index, count } => {
                if *count < 2 {
                    return 0.0;
                }
                *index as f32 / (*count - 1) as f32
            }
        }
    }

    /// Set the value, clamping into bounds; the applied value is logged
    pub fn set_level(&mut self, value: f32) {
        match self {
            AttributeState::Numeric { raw, min, max } => {
                *raw = value.clamp(*min, *max);
                tracing::debug!(applied = *raw, "attribute level set");
            }
            AttributeState::Indexed { index, count } => {
                let clamped = (value.round().max(0.0) as usize).min(count.saturating_sub(1));
                *index = clamped;
                tracing::debug!(applied = clamped, "attribute index set");
            }
        }
    }

    pub fn change(&mut self, delta: f32) {
        if let Some(raw) = self.raw() {
            self.set_level(raw + delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn health() -> AttributeState {
        AttributeState::new(&AttributeType::numeric("health", 0.0, 100.0, 100.0))
    }

    #[test]
    fn test_round_trip_bounds() {
        let mut state = health();
        state.set_level(0.0);
        assert!((state.normalized_level() - 0.0).abs() < 1e-6);
        state.set_level(100.0);
        assert!((state.normalized_level() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_set_level_clamps() {
        let mut state = health();
        state.set_level(250.0);
        assert_eq!(state.raw(), Some(100.0));
        state.set_level(-50.0);
        assert_eq!(state.raw(), Some(0.0));
    }

    #[test]
    fn test_indexed_normalization() {
        let ty = AttributeType::enumerated(
            "skill",
            vec!["novice".into(), "adept".into(), "expert".into()],
        );
        let mut state = AttributeState::new(&ty);
        assert!((state.normalized_level() - 0.0).abs() < 1e-6);
        state.set_level(2.0);
        assert!((state.normalized_level() - 1.0).abs() < 1e-6);
        state.set_level(10.0);
        assert_eq!(state.index(), Some(2));
    }
}
