//! VAL-style plan files: one `(action arg ...)` per line, with optional
//! `N:` step prefixes, `[duration]` suffixes and `;` comments.
//!
//! Plans can also be given as a JSON step list:
//! `{"steps": [{"step": 1, "action": "navigate", "args": {"t": "icon", ...}}]}`.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::domain::{ActionId, Domain};
use super::parser::lexer::Lexer;
use super::parser::tokens::{Token, TokenKind};
use super::parser::{self, Position};
use super::problem::Problem;
use super::types::ObjectId;
use crate::error::{Error, ParseFailure, Result};
use crate::expect;

#[derive(Clone, Debug, PartialEq)]
pub struct RawStep {
    pub name: String,
    pub arguments: Vec<String>,
    pub line: usize,
}

/// Plan steps by name, before resolution against a domain.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawPlan {
    pub steps: Vec<RawStep>,
}

impl RawPlan {
    pub fn parse(code: &str) -> std::result::Result<RawPlan, parser::Error> {
        use TokenKind::*;
        let mut lexer = Lexer::new(code).peekable();
        let mut steps = Vec::new();
        while let Some(token) = lexer.next() {
            let token = token?;
            let open = match token.kind {
                Literal(_) => {
                    expect!(lexer.next(), {Some(Ok(Token{kind:Colon,..})) => Ok(())}, "Expected ':' after step time.")?;
                    expect!(lexer.next(), {Some(Ok(Token{kind:OpenParenthesis, span})) => Ok(span)}, "Expected '('.")?
                }
                OpenParenthesis => token.span,
                _ => return Err(parser::Error::new(Position::Span(token.span), "Expected plan step.")),
            };
            let name = expect!(lexer.next(), {Some(Ok(Token{kind:Identifier(s),..})) => Ok(s)}, "Expected action name.")?;
            let mut arguments = Vec::new();
            while let Some(Ok(Token { kind: Identifier(s), .. })) = lexer.next_if(|t| matches!(t, Ok(Token { kind: Identifier(_), .. }))) {
                arguments.push(s.to_ascii_lowercase());
            }
            expect!(lexer.next(), {Some(Ok(Token{kind:CloseParenthesis,..})) => Ok(())}, "Expected matched ')'.")?;
            if lexer.next_if(|t| matches!(t, Ok(Token { kind: OpenBracket, .. }))).is_some() {
                expect!(lexer.next(), {Some(Ok(Token{kind:Literal(_),..})) => Ok(())}, "Expected duration.")?;
                expect!(lexer.next(), {Some(Ok(Token{kind:CloseBracket,..})) => Ok(())}, "Expected ']'.")?;
            }
            steps.push(RawStep { name: name.to_ascii_lowercase(), arguments, line: open.line });
        }
        Ok(RawPlan { steps })
    }
}

#[derive(Deserialize)]
struct StepList {
    steps: Vec<JsonStep>,
}

#[derive(Deserialize)]
struct JsonStep {
    #[serde(default)]
    step: Option<i64>,
    action: String,
    /// Object or array. Object arguments are taken in key order.
    #[serde(default)]
    args: Value,
}

fn argument_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.to_ascii_lowercase(),
        other => other.to_string(),
    }
}

impl RawPlan {
    /// Reads a JSON step list. Steps are ordered by `step` when every entry
    /// has one; otherwise the array order is kept. `line` is the 1-based
    /// position after ordering.
    pub fn from_steps_json(code: &str) -> serde_json::Result<RawPlan> {
        let StepList { mut steps } = serde_json::from_str(code)?;
        if steps.iter().all(|s| s.step.is_some()) {
            steps.sort_by_key(|s| s.step);
        }
        let steps = steps
            .into_iter()
            .enumerate()
            .map(|(i, s)| {
                let arguments = match &s.args {
                    Value::Object(map) => map.values().map(argument_text).collect(),
                    Value::Array(values) => values.iter().map(argument_text).collect(),
                    _ => Vec::new(),
                };
                RawStep { name: s.action.to_ascii_lowercase(), arguments, line: i + 1 }
            })
            .collect();
        Ok(RawPlan { steps })
    }
}

/// How plan text is written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlanFormat {
    #[default]
    Pddl,
    StepsJson,
}

/// Schema reference plus concrete arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundAction {
    pub action: ActionId,
    pub arguments: Vec<ObjectId>,
    pub line: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Plan {
    steps: Vec<GroundAction>,
}

impl Plan {
    pub fn new(steps: Vec<GroundAction>) -> Self {
        Self { steps }
    }

    /// Resolves names. Arity and argument types are left to the executor.
    pub fn resolve(domain: &Domain, problem: &Problem, raw: &RawPlan) -> Result<Plan> {
        let objects = problem.objects();
        let mut steps = Vec::with_capacity(raw.steps.len());
        for step in &raw.steps {
            let action = domain
                .action_id(&step.name)
                .ok_or_else(|| Error::structural(format!("plan line {}: unknown action {}", step.line, step.name)))?;
            let arguments = step
                .arguments
                .iter()
                .map(|a| objects.get(a).ok_or_else(|| Error::structural(format!("plan line {}: unknown object {}", step.line, a))))
                .collect::<Result<Vec<_>>>()?;
            steps.push(GroundAction { action, arguments, line: step.line });
        }
        Ok(Plan { steps })
    }

    pub fn parse(domain: &Domain, problem: &Problem, code: &str) -> Result<Plan> {
        Self::parse_named(domain, problem, "<plan>", code)
    }

    pub fn from_file(domain: &Domain, problem: &Problem, path: impl AsRef<Path>) -> Result<Plan> {
        let path = path.as_ref();
        let code = fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_owned(), source })?;
        Self::parse_named(domain, problem, &path.display().to_string(), &code)
    }

    /// Like [`Plan::parse`], with `file` used to label syntax errors.
    pub fn parse_named(domain: &Domain, problem: &Problem, file: &str, code: &str) -> Result<Plan> {
        let raw = RawPlan::parse(code).map_err(|e| Error::Parse(ParseFailure::new(file, code, vec![e])))?;
        Self::resolve(domain, problem, &raw)
    }

    /// Parses `code` written in `format`. JSON that does not describe a step
    /// list is a structural error.
    pub fn parse_as(domain: &Domain, problem: &Problem, format: PlanFormat, file: &str, code: &str) -> Result<Plan> {
        match format {
            PlanFormat::Pddl => Self::parse_named(domain, problem, file, code),
            PlanFormat::StepsJson => {
                let raw = RawPlan::from_steps_json(code).map_err(|e| Error::structural(format!("{}: not a step list: {}", file, e)))?;
                Self::resolve(domain, problem, &raw)
            }
        }
    }

    pub fn from_file_as(domain: &Domain, problem: &Problem, format: PlanFormat, path: impl AsRef<Path>) -> Result<Plan> {
        let path = path.as_ref();
        let code = fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_owned(), source })?;
        Self::parse_as(domain, problem, format, &path.display().to_string(), &code)
    }

    pub fn steps(&self) -> &[GroundAction] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
