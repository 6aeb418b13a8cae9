//! Many plans against one domain and problem, validated in parallel.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::report::Report;
use crate::config::ValidatorConfig;
use crate::error::{Error, Result};
use crate::pddl::plan::PlanFormat;
use crate::pddl::{Domain, Plan, Problem};

#[derive(Clone, Debug, PartialEq)]
pub struct NamedPlan {
    pub name: String,
    pub text: String,
}

#[derive(Debug)]
pub struct BatchRecord {
    pub name: String,
    pub outcome: Result<Report>,
}

impl BatchRecord {
    /// Verdict name, or the error kind when the plan could not be validated.
    pub fn classification(&self) -> &'static str {
        match &self.outcome {
            Ok(report) => report.verdict.as_str(),
            Err(e) => e.kind(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_records: usize,
    pub valid_plans: usize,
    pub invalid_plans: usize,
    /// Records that could not be validated at all; counted in `invalid_plans` too.
    #[serde(default)]
    pub errors: usize,
    /// Share of valid plans, rounded to three decimals.
    pub valid_rate: f64,
    pub classification: BTreeMap<String, usize>,
}

impl BatchSummary {
    pub fn from_records(records: &[BatchRecord]) -> Self {
        let mut classification = BTreeMap::new();
        for record in records {
            *classification.entry(record.classification().to_owned()).or_insert(0) += 1;
        }
        let total_records = records.len();
        let valid_plans = records.iter().filter(|r| matches!(&r.outcome, Ok(report) if report.is_valid())).count();
        let valid_rate = if total_records == 0 { 0.0 } else { (valid_plans as f64 / total_records as f64 * 1000.0).round() / 1000.0 };
        let errors = records.iter().filter(|r| r.outcome.is_err()).count();
        Self { total_records, valid_plans, invalid_plans: total_records - valid_plans, errors, valid_rate, classification }
    }

    /// 0 when every plan is valid, 1 when some plan is invalid, 2 when some
    /// plan could not be validated.
    pub fn exit_status(&self) -> u8 {
        if self.errors > 0 {
            2
        } else if self.invalid_plans > 0 {
            1
        } else {
            0
        }
    }
}

/// Reads every regular file in `dir`, sorted by file name. Hidden files are skipped.
pub fn load_plans(dir: &Path) -> Result<Vec<NamedPlan>> {
    let io = |source| Error::Io { path: dir.to_owned(), source };
    let mut plans = Vec::new();
    for entry in fs::read_dir(dir).map_err(io)? {
        let path = entry.map_err(io)?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_owned) else {
            continue;
        };
        if !path.is_file() || name.starts_with('.') {
            continue;
        }
        let text = fs::read_to_string(&path).map_err(|source| Error::Io { path: path.clone(), source })?;
        plans.push(NamedPlan { name, text });
    }
    plans.sort_by(|l, r| l.name.cmp(&r.name));
    Ok(plans)
}

/// Each plan gets its own state; the domain and problem are shared read-only.
pub fn validate_batch(
    domain: &Domain,
    problem: &Problem,
    plans: &[NamedPlan],
    format: PlanFormat,
    config: &ValidatorConfig,
) -> Vec<BatchRecord> {
    let records: Vec<BatchRecord> = plans
        .par_iter()
        .map(|plan| {
            let outcome = Plan::parse_as(domain, problem, format, &plan.name, &plan.text)
                .and_then(|parsed| super::validate(domain, problem, &parsed, config));
            BatchRecord { name: plan.name.clone(), outcome }
        })
        .collect();
    info!(plans = records.len(), "batch validated");
    records
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{load_plans, validate_batch, BatchSummary, NamedPlan};
    use crate::config::ValidatorConfig;
    use crate::pddl::plan::PlanFormat;
    use crate::pddl::{Domain, Problem};

    fn named(name: &str, text: &str) -> NamedPlan {
        NamedPlan { name: name.into(), text: text.into() }
    }

    #[test]
    fn test_batch_summary() {
        let domain = Domain::parse(
            "(define (domain d) (:requirements :negative-preconditions)
                (:predicates (p ?x))
                (:action set :parameters (?x) :precondition (not (p ?x)) :effect (p ?x)))",
        )
        .unwrap();
        let problem = Problem::parse(&domain, "(define (problem q) (:domain d) (:objects a b) (:goal (and (p a) (p b))))").unwrap();
        let plans = vec![
            named("1.plan", "(set a)\n(set b)"),
            named("2.plan", "(set a)"),
            named("3.plan", "(set a)\n(set a)"),
            named("4.plan", "(fly a)"),
            named("5.plan", "(set b)\n(set a)"),
            named("6.plan", "(set b) (set a)"),
        ];
        let records = validate_batch(&domain, &problem, &plans, PlanFormat::Pddl, &ValidatorConfig::default());
        let classes: Vec<_> = records.iter().map(|r| r.classification()).collect();
        assert_eq!(classes, vec!["VALID", "GOAL_UNMET", "INVALID_PRECONDITION", "STRUCTURAL_ERROR", "VALID", "VALID"]);

        let summary = BatchSummary::from_records(&records);
        assert_eq!(summary.total_records, 6);
        assert_eq!(summary.valid_plans, 3);
        assert_eq!(summary.invalid_plans, 3);
        assert_eq!(summary.valid_rate, 0.5);
        assert_eq!(summary.classification["VALID"], 3);
        assert_eq!(summary.classification["STRUCTURAL_ERROR"], 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.exit_status(), 2);

        let without_error: Vec<_> = records.into_iter().filter(|r| r.outcome.is_ok()).collect();
        assert_eq!(BatchSummary::from_records(&without_error).exit_status(), 1);
        let valid = validate_batch(&domain, &problem, &plans[..1], PlanFormat::Pddl, &ValidatorConfig::default());
        assert_eq!(BatchSummary::from_records(&valid).exit_status(), 0);
    }

    #[test]
    fn test_batch_steps_json() {
        let domain = Domain::parse("(define (domain d) (:predicates (p ?x)) (:action set :parameters (?x) :effect (p ?x)))").unwrap();
        let problem = Problem::parse(&domain, "(define (problem q) (:domain d) (:objects a b) (:goal (p b)))").unwrap();
        let plans = vec![
            named("1.json", r#"{"steps": [{"step": 1, "action": "set", "args": {"x": "b"}}]}"#),
            named("2.json", r#"{"steps": [{"action": "set", "args": ["a"]}]}"#),
            named("3.json", "(set b)"),
        ];
        let records = validate_batch(&domain, &problem, &plans, PlanFormat::StepsJson, &ValidatorConfig::default());
        let classes: Vec<_> = records.iter().map(|r| r.classification()).collect();
        assert_eq!(classes, vec!["VALID", "GOAL_UNMET", "STRUCTURAL_ERROR"]);
    }

    #[test]
    fn test_valid_rate_rounding() {
        let summary = BatchSummary::from_records(&[]);
        assert_eq!(summary.valid_rate, 0.0);
        assert_eq!((2.0f64 / 3.0 * 1000.0).round() / 1000.0, 0.667);
    }

    #[test]
    fn test_load_plans() {
        let dir = tempfile::tempdir().expect("Unable to create temporary directory");
        for (name, text) in [("b.plan", "(y)"), ("a.plan", "(x)"), (".hidden", "(z)")] {
            let mut file = std::fs::File::create(dir.path().join(name)).unwrap();
            write!(file, "{}", text).unwrap();
        }
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        let plans = load_plans(dir.path()).unwrap();
        assert_eq!(plans, vec![named("a.plan", "(x)"), named("b.plan", "(y)")]);
    }
}
