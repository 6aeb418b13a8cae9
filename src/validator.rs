//! Plan validation: execute the plan, check the goal, build a [`Report`].

pub mod batch;
pub mod effects;
pub mod evaluator;
pub mod executor;
pub mod goal;
pub mod report;

#[cfg(test)]
mod properties;

use std::path::Path;

use tracing::info;

pub use batch::{validate_batch, BatchSummary, NamedPlan};
pub use executor::{Execution, Executor};
pub use report::{Failure, FailureReason, ProblemSummary, Report, Verdict};

use crate::config::ValidatorConfig;
use crate::error::{Error, Result};
use crate::pddl::utils::Renderer;
use crate::pddl::plan::PlanFormat;
use crate::pddl::{Domain, Plan, Problem, State};
use goal::GoalChecker;

fn sorted_state(state: &State, renderer: &Renderer) -> Vec<String> {
    let mut atoms: Vec<String> = state.atoms().map(|a| renderer.atom(a)).collect();
    atoms.sort();
    atoms
}

pub fn validate(domain: &Domain, problem: &Problem, plan: &Plan, config: &ValidatorConfig) -> Result<Report> {
    config.check_bounds(problem, plan)?;
    let renderer = Renderer::new(domain, problem.objects());
    let execution = Executor::new(domain, problem, plan).with_diagnostics(config.verbose_diagnostics).run()?;
    let (report, state) = match execution {
        Execution::Succeeded { state } => {
            let checker = GoalChecker::new(problem);
            let (verdict, unsatisfied_goals) = if checker.check(problem.goal(), &state) {
                (Verdict::Valid, Vec::new())
            } else if config.verbose_diagnostics {
                (Verdict::GoalUnmet, checker.unsatisfied(problem.goal(), &state, &renderer))
            } else {
                (Verdict::GoalUnmet, Vec::new())
            };
            let report = Report {
                verdict,
                failure: None,
                unsatisfied_goals,
                steps_executed: plan.len(),
                final_cost: state.cost(),
                metric: None,
                final_state: None,
            };
            (report, state)
        }
        Execution::Failed { index, reason, state } => {
            let failure = Failure { step: index + 1, action: renderer.action(&plan.steps()[index]), reason };
            let report = Report {
                verdict: failure.reason.verdict(),
                failure: Some(failure),
                unsatisfied_goals: Vec::new(),
                steps_executed: index,
                final_cost: state.cost(),
                metric: None,
                final_state: None,
            };
            (report, state)
        }
        Execution::Ready | Execution::Stepping { .. } => {
            return Err(Error::structural("plan execution stopped before reaching a verdict"));
        }
    };
    let report = Report {
        metric: problem.metric().map(ToString::to_string),
        final_state: config.include_final_state.then(|| sorted_state(&state, &renderer)),
        ..report
    };
    info!(
        problem = %problem.name(),
        verdict = %report.verdict,
        steps = report.steps_executed,
        cost = report.final_cost,
        "validated plan"
    );
    Ok(report)
}

/// Parses all three inputs from text and validates.
pub fn validate_text(domain: &str, problem: &str, plan: &str, config: &ValidatorConfig) -> Result<Report> {
    let domain = Domain::parse(domain)?;
    let problem = Problem::parse(&domain, problem)?;
    let plan = Plan::parse(&domain, &problem, plan)?;
    validate(&domain, &problem, &plan, config)
}

pub fn validate_files(domain: &Path, problem: &Path, plan: &Path, config: &ValidatorConfig) -> Result<Report> {
    validate_files_as(domain, problem, plan, PlanFormat::Pddl, config)
}

/// Like [`validate_files`], reading the plan in `format`.
pub fn validate_files_as(domain: &Path, problem: &Path, plan: &Path, format: PlanFormat, config: &ValidatorConfig) -> Result<Report> {
    let domain = Domain::from_file(domain)?;
    let problem = Problem::from_file(&domain, problem)?;
    let plan = Plan::from_file_as(&domain, &problem, format, plan)?;
    validate(&domain, &problem, &plan, config)
}

pub fn summarize_problem(domain: &Domain, problem: &Problem) -> ProblemSummary {
    ProblemSummary {
        domain: domain.name().to_owned(),
        problem: problem.name().to_owned(),
        objects: problem.objects().len(),
        init_atoms: problem.init.len(),
        metric: problem.metric().map(ToString::to_string),
    }
}

/// Compiles `problem` against `domain` without a plan. Parse, typing and
/// reference errors come back as errors.
pub fn check_problem_files(domain: &Path, problem: &Path) -> Result<ProblemSummary> {
    let domain = Domain::from_file(domain)?;
    let problem = Problem::from_file(&domain, problem)?;
    let summary = summarize_problem(&domain, &problem);
    info!(problem = %summary.problem, objects = summary.objects, "problem is well-formed");
    Ok(summary)
}
