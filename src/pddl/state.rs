use std::collections::HashSet;

use super::types::ObjectId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PredicateId(pub usize);

/// Ground atom. States never hold variables.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom {
    pub predicate: PredicateId,
    pub args: Vec<ObjectId>,
}

impl Atom {
    pub fn new(predicate: PredicateId, args: Vec<ObjectId>) -> Self {
        Self { predicate, args }
    }
}

/// Set of true atoms plus the cost register.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct State {
    atoms: HashSet<Atom>,
    cost: f64,
}

impl State {
    pub fn new(atoms: impl IntoIterator<Item = Atom>, cost: f64) -> Self {
        Self { atoms: atoms.into_iter().collect(), cost }
    }

    pub fn contains(&self, atom: &Atom) -> bool {
        self.atoms.contains(atom)
    }

    pub fn insert(&mut self, atom: Atom) -> bool {
        self.atoms.insert(atom)
    }

    pub fn remove(&mut self, atom: &Atom) -> bool {
        self.atoms.remove(atom)
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Increments are never negative; the register only grows.
    pub fn add_cost(&mut self, amount: f64) {
        debug_assert!(amount >= 0.0);
        self.cost += amount;
    }

    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.iter()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Atom, PredicateId, State};
    use crate::pddl::types::ObjectId;

    #[test]
    fn test_membership() {
        let at = Atom::new(PredicateId(0), vec![ObjectId(1)]);
        let mut state = State::new(vec![at.clone(), at.clone()], 2.0);
        assert_eq!(state.len(), 1);
        assert!(state.contains(&at));
        assert!(!state.contains(&Atom::new(PredicateId(0), vec![ObjectId(2)])));
        assert!(state.remove(&at));
        assert!(state.is_empty());
        state.add_cost(1.5);
        assert_eq!(state.cost(), 3.5);
    }
}
