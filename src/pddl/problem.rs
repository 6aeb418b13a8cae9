use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use super::compiler;
use super::domain::{Domain, FunctionId};
use super::formula::Formula;
use super::parser::ast::Stmt;
use super::state::{Atom, State};
use super::types::{ObjectId, Objects, TypeIndex};
use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct Metric {
    pub minimize: bool,
    pub function: String,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = if self.minimize { "minimize" } else { "maximize" };
        write!(f, "{} {}", direction, self.function)
    }
}

/// Problem instance compiled against a [`Domain`].
#[derive(Clone, Debug)]
pub struct Problem {
    pub(crate) name: String,
    pub(crate) domain_name: String,
    /// Domain constants followed by the problem's own objects.
    pub(crate) objects: Objects,
    pub(crate) type_index: TypeIndex,
    pub(crate) init: Vec<Atom>,
    pub(crate) initial_cost: f64,
    pub(crate) function_values: HashMap<(FunctionId, Vec<ObjectId>), f64>,
    pub(crate) goal: Formula,
    pub(crate) metric: Option<Metric>,
}

impl Problem {
    pub fn parse(domain: &Domain, code: &str) -> Result<Problem> {
        Self::parse_named(domain, "<problem>", code)
    }

    pub fn from_file(domain: &Domain, path: impl AsRef<Path>) -> Result<Problem> {
        let path = path.as_ref();
        let code = fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_owned(), source })?;
        Self::parse_named(domain, &path.display().to_string(), &code)
    }

    fn parse_named(domain: &Domain, file: &str, code: &str) -> Result<Problem> {
        match compiler::parse_definition(file, code)? {
            Stmt::Problem(problem) => compiler::compile_problem(domain, &problem),
            other => Err(Error::structural(format!("{} holds a {} definition, expected a problem", file, other.kind()))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain_name(&self) -> &str {
        &self.domain_name
    }

    pub fn objects(&self) -> &Objects {
        &self.objects
    }

    pub fn type_index(&self) -> &TypeIndex {
        &self.type_index
    }

    pub fn goal(&self) -> &Formula {
        &self.goal
    }

    pub fn metric(&self) -> Option<&Metric> {
        self.metric.as_ref()
    }

    pub fn initial_cost(&self) -> f64 {
        self.initial_cost
    }

    pub fn function_value(&self, function: FunctionId, args: &[ObjectId]) -> Option<f64> {
        self.function_values.get(&(function, args.to_vec())).copied()
    }

    /// Fresh state for one run. Every call returns an independent copy.
    pub fn initial_state(&self) -> State {
        State::new(self.init.iter().cloned(), self.initial_cost)
    }
}
