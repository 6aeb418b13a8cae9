use crate::pddl::formula::{Formula, Variable};
use crate::pddl::types::{ObjectId, TypeIndex};
use crate::pddl::utils::Renderer;
use crate::pddl::{Problem, State};

/// Evaluates preconditions, guards and goals. Never mutates the state.
#[derive(Clone, Copy)]
pub struct Evaluator<'a> {
    type_index: &'a TypeIndex,
}

impl<'a> Evaluator<'a> {
    pub fn new(problem: &'a Problem) -> Self {
        Self { type_index: problem.type_index() }
    }

    pub fn evaluate(&self, formula: &Formula, state: &State, substitution: &[ObjectId]) -> bool {
        let mut bindings = substitution.to_vec();
        self.holds(formula, state, &mut bindings)
    }

    /// Same as [`Evaluator::evaluate`] but extends `bindings` in place.
    /// Quantifiers pop what they push, so `bindings` is unchanged on return.
    pub(crate) fn holds(&self, formula: &Formula, state: &State, bindings: &mut Vec<ObjectId>) -> bool {
        match formula {
            Formula::Atom(template) => state.contains(&template.ground(bindings)),
            Formula::Not(inner) => !self.holds(inner, state, bindings),
            Formula::And(parts) => parts.iter().all(|p| self.holds(p, state, bindings)),
            Formula::Or(parts) => parts.iter().any(|p| self.holds(p, state, bindings)),
            Formula::Equals(left, right) => left.resolve(bindings) == right.resolve(bindings),
            Formula::Exists(variables, body) => self.witness(variables, body, state, bindings, true),
            Formula::Forall(variables, body) => !self.witness(variables, body, state, bindings, false),
        }
    }

    /// Searches for an assignment of `variables` under which `body` evaluates
    /// to `target`. Stops at the first one found.
    fn witness(&self, variables: &[Variable], body: &Formula, state: &State, bindings: &mut Vec<ObjectId>, target: bool) -> bool {
        let Some((first, rest)) = variables.split_first() else {
            return self.holds(body, state, bindings) == target;
        };
        for object in self.type_index.objects_of(first.kind) {
            bindings.push(*object);
            let found = self.witness(rest, body, state, bindings, target);
            bindings.pop();
            if found {
                return true;
            }
        }
        false
    }

    /// Top-level conjuncts of `formula` that are false, rendered as PDDL.
    pub fn unsatisfied(&self, formula: &Formula, state: &State, substitution: &[ObjectId], renderer: &Renderer) -> Vec<String> {
        formula
            .conjuncts()
            .into_iter()
            .filter(|c| !self.evaluate(c, state, substitution))
            .map(|c| renderer.formula(c, substitution))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Evaluator;
    use crate::pddl::formula::{AtomTemplate, Formula, Term, Variable};
    use crate::pddl::types::{ObjectId, TypeId};
    use crate::pddl::utils::Renderer;
    use crate::pddl::{Domain, Problem, State};

    const DOMAIN: &str = "(define (domain grid)
        (:requirements :typing :negative-preconditions :equality :quantified-preconditions :disjunctive-preconditions)
        (:types cell empty-kind)
        (:predicates (lit ?c - cell) (adjacent ?a - cell ?b - cell)))";

    fn setup(objects: &str, init: &str) -> (Domain, Problem) {
        let domain = Domain::parse(DOMAIN).unwrap();
        let problem = Problem::parse(
            &domain,
            &format!("(define (problem p) (:domain grid) (:objects {}) (:init {}) (:goal (and)))", objects, init),
        )
        .unwrap();
        (domain, problem)
    }

    fn lit(domain: &Domain, term: Term) -> Formula {
        Formula::Atom(AtomTemplate { predicate: domain.predicate_id("lit").unwrap(), args: vec![term] })
    }

    #[test]
    fn test_connectives() {
        let (domain, problem) = setup("a b - cell", "(lit a)");
        let state = problem.initial_state();
        let e = Evaluator::new(&problem);
        let a = problem.objects().get("a").unwrap();
        let b = problem.objects().get("b").unwrap();
        assert!(e.evaluate(&lit(&domain, Term::Var(0)), &state, &[a]));
        assert!(!e.evaluate(&lit(&domain, Term::Var(0)), &state, &[b]));
        assert!(e.evaluate(&Formula::Not(Box::new(lit(&domain, Term::Object(b)))), &state, &[]));
        assert!(e.evaluate(&Formula::truth(), &state, &[]));
        assert!(!e.evaluate(&Formula::Or(vec![]), &state, &[]));
        assert!(e.evaluate(&Formula::Equals(Term::Var(0), Term::Object(a)), &state, &[a]));
        assert!(!e.evaluate(&Formula::Equals(Term::Var(0), Term::Var(1)), &state, &[a, b]));
    }

    #[test]
    fn test_quantifiers() {
        let (domain, problem) = setup("a b c - cell", "(lit a) (lit b) (adjacent a b)");
        let state = problem.initial_state();
        let e = Evaluator::new(&problem);
        let cell = domain.types().get("cell").unwrap();
        let var = |name: &str| Variable { name: name.into(), kind: cell };

        let some_lit = Formula::Exists(vec![var("x")], Box::new(lit(&domain, Term::Var(0))));
        let all_lit = Formula::Forall(vec![var("x")], Box::new(lit(&domain, Term::Var(0))));
        assert!(e.evaluate(&some_lit, &state, &[]));
        assert!(!e.evaluate(&all_lit, &state, &[]));

        // exists x, y: adjacent(x, y) and x != y
        let adjacent = Formula::Atom(AtomTemplate { predicate: domain.predicate_id("adjacent").unwrap(), args: vec![Term::Var(0), Term::Var(1)] });
        let pair = Formula::Exists(
            vec![var("x"), var("y")],
            Box::new(Formula::And(vec![adjacent, Formula::Not(Box::new(Formula::Equals(Term::Var(0), Term::Var(1))))])),
        );
        assert!(e.evaluate(&pair, &state, &[]));

        // forall x: lit(x) or x = c
        let c = problem.objects().get("c").unwrap();
        let covered = Formula::Forall(
            vec![var("x")],
            Box::new(Formula::Or(vec![lit(&domain, Term::Var(0)), Formula::Equals(Term::Var(0), Term::Object(c))])),
        );
        assert!(e.evaluate(&covered, &state, &[]));
    }

    #[test]
    fn test_empty_pool() {
        let (domain, problem) = setup("a - cell", "(lit a)");
        let state = problem.initial_state();
        let e = Evaluator::new(&problem);
        let nothing = domain.types().get("empty-kind").unwrap();
        let v = vec![Variable { name: "x".into(), kind: nothing }];
        let body = Formula::Equals(Term::Var(0), Term::Var(0));
        assert!(!e.evaluate(&Formula::Exists(v.clone(), Box::new(body.clone())), &state, &[]));
        assert!(e.evaluate(&Formula::Forall(v, Box::new(body)), &state, &[]));
    }

    #[test]
    fn test_bindings_restored() {
        let (domain, problem) = setup("a b - cell", "(lit a)");
        let e = Evaluator::new(&problem);
        let x = Variable { name: "x".into(), kind: TypeId::OBJECT };
        let f = Formula::Forall(vec![x], Box::new(lit(&domain, Term::Var(1))));
        let mut bindings = vec![ObjectId(0)];
        e.holds(&f, &State::default(), &mut bindings);
        assert_eq!(bindings, vec![ObjectId(0)]);
    }

    #[test]
    fn test_unsatisfied() {
        let (domain, problem) = setup("a b - cell", "(lit a)");
        let state = problem.initial_state();
        let e = Evaluator::new(&problem);
        let b = problem.objects().get("b").unwrap();
        let f = Formula::And(vec![lit(&domain, Term::Object(b)), Formula::And(vec![lit(&domain, Term::Var(0))])]);
        let renderer = Renderer::new(&domain, problem.objects());
        assert_eq!(e.unsatisfied(&f, &state, &[b], &renderer), vec!["(lit b)", "(lit b)"]);
        let a = problem.objects().get("a").unwrap();
        assert_eq!(e.unsatisfied(&f, &state, &[a], &renderer), vec!["(lit b)"]);
    }
}
