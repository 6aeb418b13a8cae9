use std::mem;

use tracing::debug;

use super::effects::EffectApplier;
use super::evaluator::Evaluator;
use super::report::FailureReason;
use crate::error::Result;
use crate::pddl::plan::GroundAction;
use crate::pddl::utils::Renderer;
use crate::pddl::{Domain, Plan, Problem, State};

/// Executor progress. `index` counts steps from 0.
#[derive(Clone, Debug, PartialEq)]
pub enum Execution {
    Ready,
    Stepping { state: State, index: usize },
    /// `state` is the state before step `index` ran.
    Failed { index: usize, reason: FailureReason, state: State },
    Succeeded { state: State },
}

impl Execution {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Execution::Failed { .. } | Execution::Succeeded { .. })
    }
}

/// Runs a plan step by step and stops at the first failing step.
pub struct Executor<'a> {
    domain: &'a Domain,
    problem: &'a Problem,
    plan: &'a Plan,
    evaluator: Evaluator<'a>,
    applier: EffectApplier<'a>,
    diagnostics: bool,
    execution: Execution,
}

impl<'a> Executor<'a> {
    pub fn new(domain: &'a Domain, problem: &'a Problem, plan: &'a Plan) -> Self {
        Self {
            domain,
            problem,
            plan,
            evaluator: Evaluator::new(problem),
            applier: EffectApplier::new(domain, problem),
            diagnostics: true,
            execution: Execution::Ready,
        }
    }

    /// Whether failed preconditions list their unsatisfied conditions.
    pub fn with_diagnostics(mut self, diagnostics: bool) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn execution(&self) -> &Execution {
        &self.execution
    }

    /// Advances by one transition. Returns `false` once a terminal state is reached.
    pub fn step(&mut self) -> Result<bool> {
        match mem::replace(&mut self.execution, Execution::Ready) {
            Execution::Ready => {
                self.execution = Execution::Stepping { state: self.problem.initial_state(), index: 0 };
                Ok(true)
            }
            Execution::Stepping { mut state, index } => {
                let Some(action) = self.plan.steps().get(index) else {
                    self.execution = Execution::Succeeded { state };
                    return Ok(false);
                };
                match self.execute(index, action, &mut state) {
                    Ok(None) => {
                        self.execution = Execution::Stepping { state, index: index + 1 };
                        Ok(true)
                    }
                    Ok(Some(reason)) => {
                        self.execution = Execution::Failed { index, reason, state };
                        Ok(false)
                    }
                    Err(e) => {
                        self.execution = Execution::Stepping { state, index };
                        Err(e)
                    }
                }
            }
            terminal => {
                self.execution = terminal;
                Ok(false)
            }
        }
    }

    /// Steps until a terminal state.
    pub fn run(mut self) -> Result<Execution> {
        while self.step()? {}
        Ok(self.execution)
    }

    fn execute(&self, index: usize, action: &GroundAction, state: &mut State) -> Result<Option<FailureReason>> {
        let schema = self.domain.action(action.action);
        let renderer = Renderer::new(self.domain, self.problem.objects());
        if action.arguments.len() != schema.parameters.len() {
            return Ok(Some(FailureReason::ArityMismatch { expected: schema.parameters.len(), found: action.arguments.len() }));
        }
        let types = self.domain.types();
        let objects = self.problem.objects();
        for (position, (object, parameter)) in action.arguments.iter().zip(&schema.parameters).enumerate() {
            let kind = objects.kind(*object);
            if !types.is_subtype(kind, parameter.kind) {
                return Ok(Some(FailureReason::TypeMismatch {
                    position: position + 1,
                    object: objects.name(*object).to_owned(),
                    expected: types.name(parameter.kind).to_owned(),
                    found: types.name(kind).to_owned(),
                }));
            }
        }
        if !self.evaluator.evaluate(&schema.precondition, state, &action.arguments) {
            let unsatisfied = if self.diagnostics {
                self.evaluator.unsatisfied(&schema.precondition, state, &action.arguments, &renderer)
            } else {
                Vec::new()
            };
            return Ok(Some(FailureReason::PreconditionUnsatisfied { unsatisfied }));
        }
        let effects = self.applier.apply(&schema.effects, state, &action.arguments)?;
        effects.commit(state);
        debug!(step = index + 1, action = %renderer.action(action), cost = state.cost(), "applied step");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::{Execution, Executor};
    use crate::pddl::{Domain, Plan, Problem};
    use crate::validator::report::FailureReason;

    const DOMAIN: &str = "(define (domain lamps)
        (:requirements :typing :negative-preconditions :action-costs)
        (:types lamp switch)
        (:predicates (on ?l - lamp))
        (:functions (total-cost))
        (:action turn-on :parameters (?l - lamp) :precondition (not (on ?l)) :effect (and (on ?l) (increase (total-cost) 1))))";

    fn setup() -> (Domain, Problem) {
        let domain = Domain::parse(DOMAIN).unwrap();
        let problem =
            Problem::parse(&domain, "(define (problem p) (:domain lamps) (:objects a b - lamp s - switch) (:goal (and (on a) (on b))))").unwrap();
        (domain, problem)
    }

    #[test]
    fn test_transitions() {
        let (domain, problem) = setup();
        let plan = Plan::parse(&domain, &problem, "(turn-on a)").unwrap();
        let mut executor = Executor::new(&domain, &problem, &plan);
        assert_eq!(executor.execution(), &Execution::Ready);
        assert!(executor.step().unwrap());
        assert!(matches!(executor.execution(), Execution::Stepping { index: 0, .. }));
        assert!(executor.step().unwrap());
        assert!(matches!(executor.execution(), Execution::Stepping { index: 1, .. }));
        assert!(!executor.step().unwrap());
        let Execution::Succeeded { state } = executor.execution() else { panic!("expected success") };
        assert_eq!(state.cost(), 1.0);
        assert!(!executor.step().unwrap());
        assert!(executor.execution().is_terminal());
    }

    #[test]
    fn test_fail_fast() {
        let (domain, problem) = setup();
        let plan = Plan::parse(&domain, &problem, "(turn-on a)\n(turn-on a)\n(turn-on b)").unwrap();
        let execution = Executor::new(&domain, &problem, &plan).run().unwrap();
        let Execution::Failed { index, reason, state } = execution else { panic!("expected failure") };
        assert_eq!(index, 1);
        assert_eq!(reason, FailureReason::PreconditionUnsatisfied { unsatisfied: vec!["(not (on a))".into()] });
        assert_eq!(state.len(), 1);
        assert_eq!(state.cost(), 1.0);
    }

    #[test]
    fn test_type_mismatch() {
        let (domain, problem) = setup();
        let plan = Plan::parse(&domain, &problem, "(turn-on s)").unwrap();
        let execution = Executor::new(&domain, &problem, &plan).run().unwrap();
        assert_eq!(
            execution,
            Execution::Failed {
                index: 0,
                reason: FailureReason::TypeMismatch { position: 1, object: "s".into(), expected: "lamp".into(), found: "switch".into() },
                state: problem.initial_state(),
            }
        );
        let plan = Plan::parse(&domain, &problem, "(turn-on a b)").unwrap();
        let execution = Executor::new(&domain, &problem, &plan).run().unwrap();
        assert!(matches!(execution, Execution::Failed { reason: FailureReason::ArityMismatch { expected: 1, found: 2 }, .. }));
    }

    #[test]
    fn test_without_diagnostics() {
        let (domain, problem) = setup();
        let plan = Plan::parse(&domain, &problem, "(turn-on a)\n(turn-on a)").unwrap();
        let execution = Executor::new(&domain, &problem, &plan).with_diagnostics(false).run().unwrap();
        assert!(matches!(execution, Execution::Failed { reason: FailureReason::PreconditionUnsatisfied { unsatisfied }, .. } if unsatisfied.is_empty()));
    }
}
