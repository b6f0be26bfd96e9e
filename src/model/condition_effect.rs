//! Conditions and effects of actions.
//!
//! A [`ConditionEffect`] is a fact whose objects are drawn from an action's
//! formal parameters, tagged with a PDDL time qualifier and — for numeric
//! fluents — a comparison or assignment operator.

use serde::{Deserialize, Serialize};

use crate::model::fact::{Fact, Value};
use crate::model::fluent::FluentHandle;
use crate::model::typing::ObjectHandle;

/// When a durative action's condition must hold or effect applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeTag {
    AtStart,
    AtEnd,
    OverAll,
}

impl std::fmt::Display for TimeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeTag::AtStart => write!(f, "at start"),
            TimeTag::AtEnd => write!(f, "at end"),
            TimeTag::OverAll => write!(f, "over all"),
        }
    }
}

/// Operator applied to a numeric condition or effect.
///
/// `Greater`/`Lower`/`Equals` are comparisons (conditions);
/// `Increase`/`Decrease`/`Assign` are updates (effects).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CeOperator {
    Greater,
    Lower,
    Equals,
    Increase,
    Decrease,
    #[default]
    Assign,
}

impl std::fmt::Display for CeOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CeOperator::Greater => write!(f, ">"),
            CeOperator::Lower => write!(f, "<"),
            CeOperator::Equals => write!(f, "="),
            CeOperator::Increase => write!(f, "increase"),
            CeOperator::Decrease => write!(f, "decrease"),
            CeOperator::Assign => write!(f, "assign"),
        }
    }
}

/// A fact used inside an action, with time tag and operator.
///
/// `time` is `None` for non-durative actions. Equality compares the
/// underlying fact, the value, and the time tag.
#[derive(Debug, Clone)]
pub struct ConditionEffect {
    pub fact: Fact,
    pub time: Option<TimeTag>,
    pub op: CeOperator,
}

impl ConditionEffect {
    pub fn new(fluent: &FluentHandle, objects: Vec<ObjectHandle>) -> Self {
        ConditionEffect {
            fact: Fact::new(fluent, objects),
            time: None,
            op: CeOperator::default(),
        }
    }

    pub fn at(mut self, time: TimeTag) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_op(mut self, op: CeOperator) -> Self {
        self.op = op;
        self
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.fact.value = value.into();
        self
    }
}

impl PartialEq for ConditionEffect {
    fn eq(&self, other: &Self) -> bool {
        self.fact == other.fact && self.fact.value == other.fact.value && self.time == other.time
    }
}
