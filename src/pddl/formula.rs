//! Compiled formulas and effects.
//!
//! Variables are resolved to slots at compile time. Action parameters take
//! slots `0..n`; each quantifier pushes its variables onto the end, so the
//! slot of a variable is its depth in the binding stack.

use super::domain::FunctionId;
use super::state::{Atom, PredicateId};
use super::types::{ObjectId, TypeId};

pub type Slot = usize;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Term {
    Var(Slot),
    Object(ObjectId),
}

impl Term {
    pub fn resolve(&self, bindings: &[ObjectId]) -> ObjectId {
        match self {
            Term::Var(slot) => bindings[*slot],
            Term::Object(object) => *object,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AtomTemplate {
    pub predicate: PredicateId,
    pub args: Vec<Term>,
}

impl AtomTemplate {
    pub fn ground(&self, bindings: &[ObjectId]) -> Atom {
        Atom::new(self.predicate, self.args.iter().map(|t| t.resolve(bindings)).collect())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    pub name: String,
    pub kind: TypeId,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Formula {
    Atom(AtomTemplate),
    Not(Box<Formula>),
    And(Vec<Formula>),
    Or(Vec<Formula>),
    Equals(Term, Term),
    Exists(Vec<Variable>, Box<Formula>),
    Forall(Vec<Variable>, Box<Formula>),
}

impl Formula {
    pub fn truth() -> Self {
        Formula::And(Vec::new())
    }

    /// Top-level conjuncts, with nested `and`s flattened.
    pub fn conjuncts(&self) -> Vec<&Formula> {
        match self {
            Formula::And(parts) => parts.iter().flat_map(|p| p.conjuncts()).collect(),
            other => vec![other],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionTemplate {
    pub function: FunctionId,
    pub args: Vec<Term>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NumericExpr {
    Number(f64),
    Function(FunctionTemplate),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Add(AtomTemplate),
    Delete(AtomTemplate),
    Conditional(Formula, Vec<Effect>),
    Universal(Vec<Variable>, Vec<Effect>),
    IncreaseCost(NumericExpr),
}
