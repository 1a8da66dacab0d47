//! Factor evaluators: scoring units that can disqualify a candidate
//!
//! Selector factors score a candidate action; target factors score a
//! candidate target for an action. Both produce an explicit
//! [`FactorScore`]: a veto is a first-class outcome that removes the
//! candidate from ranking entirely, never just a low score.

pub mod selector;
pub mod target;

use serde::{Deserialize, Serialize};

pub use selector::SelectorFactor;
pub use target::TargetFactor;

/// Outcome of a factor evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FactorScore {
    Scored(f32),
    Vetoed,
}

impl FactorScore {
    pub fn value(&self) -> Option<f32> {
        match self {
            FactorScore::Scored(v) => Some(*v),
            FactorScore::Vetoed => None,
        }
    }

    pub fn is_veto(&self) -> bool {
        matches!(self, FactorScore::Vetoed)
    }
}

/// Threshold rule that turns a level into a veto
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VetoRule {
    pub op: VetoOp,
    pub cutoff: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VetoOp {
    AtLeast,
    AtMost,
}

impl VetoRule {
    pub fn at_least(cutoff: f32) -> Self {
        Self {
            op: VetoOp::AtLeast,
            cutoff,
        }
    }

    pub fn at_most(cutoff: f32) -> Self {
        Self {
            op: VetoOp::AtMost,
            cutoff,
        }
    }

    pub fn triggered(&self, value: f32) -> bool {
        match self.op {
            VetoOp::AtLeast => value >= self.cutoff,
            VetoOp::AtMost => value <= self.cutoff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_veto_rule_directions() {
        assert!(VetoRule::at_least(50.0).triggered(50.0));
        assert!(!VetoRule::at_least(50.0).triggered(49.9));
        assert!(VetoRule::at_most(10.0).triggered(10.0));
        assert!(!VetoRule::at_most(10.0).triggered(10.1));
    }

    #[test]
    fn test_factor_score_accessors() {
        assert_eq!(FactorScore::Scored(0.4).value(), Some(0.4));
        assert!(FactorScore::Vetoed.is_veto());
        assert_eq!(FactorScore::Vetoed.value(), None);
    }
}
