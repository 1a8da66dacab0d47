//! Attribute type configuration
//!
//! Attributes are bounded or categorical properties (health, stance).
//! Like drive types, they are shared read-only configuration; per-agent
//! values live in [`crate::attribute::AttributeState`].

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, VolitionError};

/// Identifies an attribute dimension (e.g. "health")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttributeTypeId(pub String);

impl std::fmt::Display for AttributeTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AttributeTypeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Storage shape of an attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeKind {
    /// Bounded scalar
    Numeric { min: f32, max: f32, default: f32 },
    /// Ordered options; the index carries meaning ("novice" < "expert")
    Enumerated { options: Vec<String>, default_index: usize },
    /// Unordered options; only identity matters
    Categorical { options: Vec<String>, default_index: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeType {
    pub id: AttributeTypeId,
    pub kind: AttributeKind,
}

impl AttributeType {
    pub fn numeric(id: impl Into<AttributeTypeId>, min: f32, max: f32, default: f32) -> Self {
        Self {
            id: id.into(),
            kind: AttributeKind::Numeric { min, max, default },
        }
    }

    pub fn enumerated(id: impl Into<AttributeTypeId>, options: Vec<String>) -> Self {
        Self {
            id: id.into(),
            kind: AttributeKind::Enumerated {
                options,
                default_index: 0,
            },
        }
    }

    pub fn categorical(id: impl Into<AttributeTypeId>, options: Vec<String>) -> Self {
        Self {
            id: id.into(),
            kind: AttributeKind::Categorical {
                options,
                default_index: 0,
            },
        }
    }

    /// Numeric bounds, if this attribute has them
    pub fn bounds(&self) -> Option<(f32, f32)> {
        match &self.kind {
            AttributeKind::Numeric { min, max, .. } => Some((*min, *max)),
            _ => None,
        }
    }
}

/// Insertion-ordered registry of attribute types
#[derive(Debug, Clone, Default)]
pub struct AttributeTypeRegistry {
    order: Vec<AttributeTypeId>,
    types: AHashMap<AttributeTypeId, AttributeType>,
}

impl AttributeTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, attribute_type: AttributeType) -> Result<()> {
        if let Some((min, max)) = attribute_type.bounds() {
            if min >= max {
                return Err(VolitionError::Config(format!(
                    "attribute {} has degenerate bounds [{}, {}]",
                    attribute_type.id, min, max
                )));
            }
        }
        if self.types.contains_key(&attribute_type.id) {
            return Err(VolitionError::Config(format!(
                "attribute {} registered twice",
                attribute_type.id
            )));
        }
        self.order.push(attribute_type.id.clone());
        self.types.insert(attribute_type.id.clone(), attribute_type);
        Ok(())
    }

    pub fn get(&self, id: &AttributeTypeId) -> Option<&AttributeType> {
        self.types.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeType> {
        self.order.iter().filter_map(|id| self.types.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_bounds_rejected() {
        let mut registry = AttributeTypeRegistry::new();
        assert!(registry
            .register(AttributeType::numeric("health", 10.0, 10.0, 10.0))
            .is_err());
    }

    #[test]
    fn test_bounds_only_for_numeric() {
        let numeric = AttributeType::numeric("health", 0.0, 100.0, 100.0);
        assert_eq!(numeric.bounds(), Some((0.0, 100.0)));

        let stance = AttributeType::categorical(
            "stance",
            vec!["standing".into(), "crouching".into(), "prone".into()],
        );
        assert_eq!(stance.bounds(), None);
    }
}
