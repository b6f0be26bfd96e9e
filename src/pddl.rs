//! Deterministic PDDL text rendering for every entity kind.
//!
//! The rendered text is a byte-exact contract: fixed tab indentation,
//! fixed keyword order (`:parameters`, `:duration`, `:condition` /
//! `:precondition`, `:effect`), newline-joined blocks. Fluent parameter
//! tags are the first character of the type name plus the 0-based
//! position; colliding tags for same-initial types are a known cosmetic
//! limitation, kept for output compatibility.

use std::cell::RefCell;
use std::rc::Rc;

use crate::model::action::Action;
use crate::model::condition_effect::ConditionEffect;
use crate::model::fact::{Fact, Number};
use crate::model::fluent::Fluent;
use crate::model::typing::{Object, Type};

/// Render an entity as PDDL text.
pub trait ToPddl {
    fn to_pddl(&self) -> String;
}

impl<T: ToPddl> ToPddl for Rc<RefCell<T>> {
    fn to_pddl(&self) -> String {
        self.borrow().to_pddl()
    }
}

impl ToPddl for Type {
    fn to_pddl(&self) -> String {
        match &self.father {
            Some(father) => format!("{} - {}", self.name, father.borrow().name),
            None => self.name.clone(),
        }
    }
}

impl ToPddl for Object {
    fn to_pddl(&self) -> String {
        format!("{} - {}", self.name, self.ty.borrow().name)
    }
}

impl ToPddl for Fluent {
    fn to_pddl(&self) -> String {
        let mut out = format!("({}", self.name);
        for (i, ty) in self.types.iter().enumerate() {
            let type_name = ty.borrow().name.clone();
            let tag: String = type_name.chars().take(1).collect();
            out.push_str(&format!(" ?{tag}{i} - {type_name}"));
        }
        out.push(')');
        out
    }
}

impl ToPddl for Fact {
    fn to_pddl(&self) -> String {
        let fluent = self.fluent.borrow();
        let mut base = format!("({}", fluent.name);
        for obj in &self.objects {
            base.push(' ');
            base.push_str(&obj.borrow().name);
        }
        base.push(')');

        if fluent.is_numeric {
            let value = self.value.as_number().unwrap_or(Number::Plain(0.0));
            format!("(= {base} {value})")
        } else {
            base
        }
    }
}

impl ToPddl for ConditionEffect {
    fn to_pddl(&self) -> String {
        let fluent = self.fact.fluent.borrow();
        let mut base = format!("({}", fluent.name);
        for obj in &self.fact.objects {
            base.push_str(" ?");
            base.push_str(&obj.borrow().name);
        }
        base.push(')');

        let mut out = if fluent.is_numeric {
            let value = self.fact.value.as_number().unwrap_or(Number::Plain(0.0));
            format!("({} {base} {value})", self.op)
        } else if !self.fact.value.as_bool().unwrap_or(true) {
            format!("(not {base})")
        } else {
            base
        };

        if let Some(time) = self.time {
            out = format!("({time} {out})");
        }
        out
    }
}

impl ToPddl for Action {
    fn to_pddl(&self) -> String {
        let mut out = String::from("(:");
        if self.durative {
            out.push_str("durative-");
        }
        out.push_str("action ");
        out.push_str(&self.name);

        out.push_str("\n\t:parameters (");
        for parameter in &self.parameters {
            let parameter = parameter.borrow();
            out.push_str(&format!(
                " ?{} - {}",
                parameter.name,
                parameter.ty.borrow().name
            ));
        }
        out.push(')');

        if self.durative {
            out.push_str(&format!("\n\t:duration (= ?duration {})", self.duration));
        }

        if self.durative {
            out.push_str("\n\t:condition (and");
        } else {
            out.push_str("\n\t:precondition (and");
        }
        for condition in &self.conditions {
            out.push_str("\n\t\t");
            out.push_str(&condition.to_pddl());
        }
        out.push_str("\n\t)");

        out.push_str("\n\t:effect (and");
        for effect in &self.effects {
            out.push_str("\n\t\t");
            out.push_str(&effect.to_pddl());
        }
        out.push_str("\n\t)");

        out.push_str("\n)");
        out
    }
}
