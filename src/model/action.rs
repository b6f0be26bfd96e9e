//! Parameterized PDDL actions.

use crate::model::condition_effect::ConditionEffect;
use crate::model::typing::ObjectHandle;

/// A named, parameterized PDDL operator.
///
/// Conditions and effects must reference only the action's own formal
/// parameters. Durative actions carry a duration and time-tagged
/// conditions/effects; non-durative actions must have no time tags
/// (see [`crate::model::check_action`]). Equality is by name only.
#[derive(Debug, Clone)]
pub struct Action {
    pub name: String,
    pub parameters: Vec<ObjectHandle>,
    pub conditions: Vec<ConditionEffect>,
    pub effects: Vec<ConditionEffect>,
    pub durative: bool,
    pub duration: i64,
}

impl Action {
    /// Create an empty durative action with the default duration of 10.
    pub fn new(name: impl Into<String>) -> Self {
        Action {
            name: name.into(),
            parameters: Vec::new(),
            conditions: Vec::new(),
            effects: Vec::new(),
            durative: true,
            duration: 10,
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<ObjectHandle>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_conditions(mut self, conditions: Vec<ConditionEffect>) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn with_effects(mut self, effects: Vec<ConditionEffect>) -> Self {
        self.effects = effects;
        self
    }

    /// Make the action instantaneous (no duration, no time tags allowed).
    pub fn instantaneous(mut self) -> Self {
        self.durative = false;
        self
    }
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Action {}
