use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use enumset::EnumSet;

use super::compiler;
use super::formula::{Effect, Formula};
use super::parser::ast::{Requirement, Stmt};
use super::state::PredicateId;
use super::types::{Objects, TypeId, Types};
use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub usize);

#[derive(Clone, Debug, PartialEq)]
pub struct Predicate {
    pub name: String,
    pub parameters: Vec<TypeId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub name: String,
    pub parameters: Vec<TypeId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub kind: TypeId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActionSchema {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub precondition: Formula,
    pub effects: Vec<Effect>,
}

/// Compiled domain. Immutable once built and safe to share between runs.
#[derive(Clone, Debug)]
pub struct Domain {
    pub(crate) name: String,
    pub(crate) requirements: EnumSet<Requirement>,
    pub(crate) types: Types,
    pub(crate) constants: Objects,
    pub(crate) predicates: Vec<Predicate>,
    pub(crate) predicate_mapping: HashMap<String, PredicateId>,
    pub(crate) functions: Vec<Function>,
    pub(crate) function_mapping: HashMap<String, FunctionId>,
    pub(crate) actions: Vec<ActionSchema>,
    pub(crate) action_mapping: HashMap<String, ActionId>,
}

impl Domain {
    pub fn parse(code: &str) -> Result<Domain> {
        Self::parse_named("<domain>", code)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Domain> {
        let path = path.as_ref();
        let code = fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_owned(), source })?;
        Self::parse_named(&path.display().to_string(), &code)
    }

    fn parse_named(file: &str, code: &str) -> Result<Domain> {
        match compiler::parse_definition(file, code)? {
            Stmt::Domain(domain) => compiler::compile_domain(&domain),
            other => Err(Error::structural(format!("{} holds a {} definition, expected a domain", file, other.kind()))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared requirements with composite flags (`:adl`, `:quantified-preconditions`) expanded.
    pub fn requirements(&self) -> EnumSet<Requirement> {
        self.requirements
    }

    pub fn types(&self) -> &Types {
        &self.types
    }

    pub fn constants(&self) -> &Objects {
        &self.constants
    }

    pub fn predicate(&self, id: PredicateId) -> &Predicate {
        &self.predicates[id.0]
    }

    pub fn predicate_id(&self, name: &str) -> Option<PredicateId> {
        self.predicate_mapping.get(name).copied()
    }

    pub fn function(&self, id: FunctionId) -> &Function {
        &self.functions[id.0]
    }

    pub fn function_id(&self, name: &str) -> Option<FunctionId> {
        self.function_mapping.get(name).copied()
    }

    pub fn action(&self, id: ActionId) -> &ActionSchema {
        &self.actions[id.0]
    }

    pub fn action_id(&self, name: &str) -> Option<ActionId> {
        self.action_mapping.get(name).copied()
    }

    pub fn actions(&self) -> &[ActionSchema] {
        &self.actions
    }
}

impl FromStr for Domain {
    type Err = Error;
    fn from_str(pddl: &str) -> Result<Self> {
        Domain::parse(pddl)
    }
}
