use super::evaluator::Evaluator;
use crate::pddl::formula::Formula;
use crate::pddl::utils::Renderer;
use crate::pddl::{Problem, State};

/// Evaluates the goal once, on the final state, with no bindings.
pub struct GoalChecker<'a> {
    evaluator: Evaluator<'a>,
}

impl<'a> GoalChecker<'a> {
    pub fn new(problem: &'a Problem) -> Self {
        Self { evaluator: Evaluator::new(problem) }
    }

    pub fn check(&self, goal: &Formula, state: &State) -> bool {
        self.evaluator.evaluate(goal, state, &[])
    }

    pub fn unsatisfied(&self, goal: &Formula, state: &State, renderer: &Renderer) -> Vec<String> {
        self.evaluator.unsatisfied(goal, state, &[], renderer)
    }
}
