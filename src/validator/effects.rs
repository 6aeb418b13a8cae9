use std::collections::HashSet;

use tracing::trace;

use super::evaluator::Evaluator;
use crate::error::{Error, Result};
use crate::pddl::formula::{Effect, NumericExpr, Variable};
use crate::pddl::state::Atom;
use crate::pddl::types::ObjectId;
use crate::pddl::utils::Renderer;
use crate::pddl::{Domain, Problem, State};

/// Changes computed from one pre-action state, applied together by [`EffectSet::commit`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectSet {
    pub add: HashSet<Atom>,
    pub delete: HashSet<Atom>,
    pub cost: f64,
}

impl EffectSet {
    /// Deletes first, then adds, so an atom in both sets ends up present.
    pub fn commit(self, state: &mut State) {
        for atom in &self.delete {
            state.remove(atom);
        }
        for atom in self.add {
            state.insert(atom);
        }
        state.add_cost(self.cost);
    }
}

pub struct EffectApplier<'a> {
    domain: &'a Domain,
    problem: &'a Problem,
    evaluator: Evaluator<'a>,
}

impl<'a> EffectApplier<'a> {
    pub fn new(domain: &'a Domain, problem: &'a Problem) -> Self {
        Self { domain, problem, evaluator: Evaluator::new(problem) }
    }

    /// Computes the add/delete sets and cost of `effects`. Every guard is
    /// evaluated against `state` as it was before the action.
    pub fn apply(&self, effects: &[Effect], state: &State, substitution: &[ObjectId]) -> Result<EffectSet> {
        let mut set = EffectSet::default();
        let mut bindings = substitution.to_vec();
        self.collect(effects, state, &mut bindings, &mut set)?;
        trace!(add = set.add.len(), delete = set.delete.len(), cost = set.cost, "computed effects");
        Ok(set)
    }

    fn collect(&self, effects: &[Effect], state: &State, bindings: &mut Vec<ObjectId>, set: &mut EffectSet) -> Result<()> {
        for effect in effects {
            match effect {
                Effect::Add(template) => {
                    set.add.insert(template.ground(bindings));
                }
                Effect::Delete(template) => {
                    set.delete.insert(template.ground(bindings));
                }
                Effect::Conditional(guard, inner) => {
                    if self.evaluator.holds(guard, state, bindings) {
                        self.collect(inner, state, bindings, set)?;
                    }
                }
                Effect::Universal(variables, inner) => self.universal(variables, inner, state, bindings, set)?,
                Effect::IncreaseCost(amount) => set.cost += self.increment(amount, bindings)?,
            }
        }
        Ok(())
    }

    fn universal(&self, variables: &[Variable], inner: &[Effect], state: &State, bindings: &mut Vec<ObjectId>, set: &mut EffectSet) -> Result<()> {
        let Some((first, rest)) = variables.split_first() else {
            return self.collect(inner, state, bindings, set);
        };
        for object in self.problem.type_index().objects_of(first.kind) {
            bindings.push(*object);
            let result = self.universal(rest, inner, state, bindings, set);
            bindings.pop();
            result?;
        }
        Ok(())
    }

    fn increment(&self, amount: &NumericExpr, bindings: &[ObjectId]) -> Result<f64> {
        match amount {
            NumericExpr::Number(n) => Ok(*n),
            NumericExpr::Function(template) => {
                let args: Vec<ObjectId> = template.args.iter().map(|t| t.resolve(bindings)).collect();
                let renderer = Renderer::new(self.domain, self.problem.objects());
                match self.problem.function_value(template.function, &args) {
                    Some(value) if value < 0.0 => Err(Error::structural(format!(
                        "cost {} = {} is negative",
                        renderer.function(template.function, &args),
                        value
                    ))),
                    Some(value) => Ok(value),
                    None => Err(Error::structural(format!(
                        "cost {} has no value in :init",
                        renderer.function(template.function, &args)
                    ))),
                }
            }
        }
    }
}
