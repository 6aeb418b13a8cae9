//! Property tests for the executor over a family of generated switch problems.

use proptest::prelude::*;

use super::evaluator::Evaluator;
use super::{validate_text, FailureReason, Verdict};
use crate::config::ValidatorConfig;
use crate::pddl::{Domain, Problem};

const DOMAIN: &str = "(define (domain switches)
    (:requirements :typing :negative-preconditions :quantified-preconditions :action-costs)
    (:types switch ghost)
    (:predicates (on ?s - switch) (haunted ?g - ghost))
    (:functions (total-cost))
    (:action turn-on :parameters (?s - switch) :precondition (not (on ?s)) :effect (and (on ?s) (increase (total-cost) 1)))
    (:action turn-off :parameters (?s - switch) :precondition (on ?s) :effect (and (not (on ?s)) (increase (total-cost) 1)))
    (:action flicker :parameters (?s - switch) :effect (and (not (on ?s)) (on ?s) (increase (total-cost) 1))))";

fn problem(initial: &[bool], goal: &str) -> String {
    let objects: Vec<String> = (0..initial.len()).map(|i| format!("s{}", i)).collect();
    let init: Vec<String> = initial
        .iter()
        .enumerate()
        .filter(|(_, on)| **on)
        .map(|(i, _)| format!("(on s{})", i))
        .collect();
    format!(
        "(define (problem generated) (:domain switches) (:objects {} - switch) (:init {} (= (total-cost) 0)) (:goal {}))",
        objects.join(" "),
        init.join(" "),
        goal
    )
}

fn plan(steps: &[(bool, usize)], switches: usize) -> String {
    steps
        .iter()
        .map(|(on, i)| format!("({} s{})\n", if *on { "turn-on" } else { "turn-off" }, i % switches))
        .collect()
}

const ALL_ON: &str = "(forall (?s - switch) (on ?s))";

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn evaluation_leaves_state_untouched(initial in prop::collection::vec(any::<bool>(), 1..6)) {
        let domain = Domain::parse(DOMAIN).unwrap();
        let problem = Problem::parse(&domain, &problem(&initial, ALL_ON)).unwrap();
        let state = problem.initial_state();
        let before = state.clone();
        let holds = Evaluator::new(&problem).evaluate(problem.goal(), &state, &[]);
        prop_assert_eq!(holds, initial.iter().all(|on| *on));
        prop_assert_eq!(state, before);
    }

    #[test]
    fn empty_plan_checks_initial_state(initial in prop::collection::vec(any::<bool>(), 1..6)) {
        let report = validate_text(DOMAIN, &problem(&initial, ALL_ON), "", &ValidatorConfig::default()).unwrap();
        let expected = if initial.iter().all(|on| *on) { Verdict::Valid } else { Verdict::GoalUnmet };
        prop_assert_eq!(report.verdict, expected);
        prop_assert_eq!(report.steps_executed, 0);
        prop_assert_eq!(report.final_cost, 0.0);
    }

    #[test]
    fn add_wins_over_delete(initial in prop::collection::vec(any::<bool>(), 1..6), pick in 0usize..6) {
        let target = pick % initial.len();
        let config = ValidatorConfig { include_final_state: true, ..Default::default() };
        let report = validate_text(DOMAIN, &problem(&initial, "(and)"), &format!("(flicker s{})", target), &config).unwrap();
        prop_assert_eq!(report.verdict, Verdict::Valid);
        let state = report.final_state.unwrap();
        let lit = format!("(on s{})", target);
        let present = state.contains(&lit);
        prop_assert!(present);
    }

    #[test]
    fn execution_stops_at_first_failure(
        initial in prop::collection::vec(any::<bool>(), 1..6),
        steps in prop::collection::vec((any::<bool>(), 0usize..6), 0..12),
    ) {
        let n = initial.len();
        let mut model = initial.clone();
        let mut failed_at = None;
        for (index, (on, i)) in steps.iter().enumerate() {
            let switch = i % n;
            if model[switch] == *on {
                failed_at = Some(index);
                break;
            }
            model[switch] = *on;
        }

        let config = ValidatorConfig { include_final_state: true, ..Default::default() };
        let report = validate_text(DOMAIN, &problem(&initial, ALL_ON), &plan(&steps, n), &config).unwrap();
        // The reported state is the one after the last successful step.
        let mut expected_state: Vec<String> = model.iter().enumerate().filter(|(_, on)| **on).map(|(i, _)| format!("(on s{})", i)).collect();
        expected_state.sort();
        prop_assert_eq!(report.final_state.clone().unwrap(), expected_state);
        match failed_at {
            Some(index) => {
                prop_assert_eq!(report.verdict, Verdict::InvalidPrecondition);
                let failure = report.failure.unwrap();
                prop_assert_eq!(failure.step, index + 1);
                let precondition = matches!(failure.reason, FailureReason::PreconditionUnsatisfied { .. });
                prop_assert!(precondition);
                prop_assert_eq!(report.steps_executed, index);
                prop_assert_eq!(report.final_cost, index as f64);
            }
            None => {
                let expected = if model.iter().all(|on| *on) { Verdict::Valid } else { Verdict::GoalUnmet };
                prop_assert_eq!(report.verdict, expected);
                prop_assert_eq!(report.steps_executed, steps.len());
                prop_assert_eq!(report.final_cost, steps.len() as f64);
            }
        }
    }

    #[test]
    fn quantifiers_over_empty_type(initial in prop::collection::vec(any::<bool>(), 1..6)) {
        let config = ValidatorConfig::default();
        let forall = validate_text(DOMAIN, &problem(&initial, "(forall (?g - ghost) (haunted ?g))"), "", &config).unwrap();
        prop_assert_eq!(forall.verdict, Verdict::Valid);
        let exists = validate_text(DOMAIN, &problem(&initial, "(exists (?g - ghost) (not (haunted ?g)))"), "", &config).unwrap();
        prop_assert_eq!(exists.verdict, Verdict::GoalUnmet);
    }
}
