//! PDDL text rendering for atoms, formulas and grounded actions.

use super::domain::{Domain, FunctionId};
use super::formula::{Formula, Term, Variable};
use super::plan::GroundAction;
use super::state::{Atom, PredicateId};
use super::types::{ObjectId, Objects};

pub struct Renderer<'a> {
    domain: &'a Domain,
    objects: &'a Objects,
}

fn build_object_string(objects: &Objects, args: &[ObjectId]) -> String {
    args.iter().fold(String::new(), |acc, item| acc + " " + objects.name(*item))
}

impl<'a> Renderer<'a> {
    pub fn new(domain: &'a Domain, objects: &'a Objects) -> Self {
        Self { domain, objects }
    }

    pub fn atom(&self, atom: &Atom) -> String {
        self.ground(atom.predicate, &atom.args)
    }

    fn ground(&self, predicate: PredicateId, args: &[ObjectId]) -> String {
        format!("({}{})", self.domain.predicate(predicate).name, build_object_string(self.objects, args))
    }

    pub fn function(&self, function: FunctionId, args: &[ObjectId]) -> String {
        format!("({}{})", self.domain.function(function).name, build_object_string(self.objects, args))
    }

    pub fn action(&self, action: &GroundAction) -> String {
        format!("({}{})", self.domain.action(action.action).name, build_object_string(self.objects, &action.arguments))
    }

    /// Renders `formula` with `bindings` substituted. Variables bound inside
    /// the formula keep their `?name`.
    pub fn formula(&self, formula: &Formula, bindings: &[ObjectId]) -> String {
        let mut out = String::new();
        let mut names = Vec::new();
        self.write_formula(&mut out, formula, bindings, &mut names);
        out
    }

    fn term(&self, out: &mut String, term: &Term, bindings: &[ObjectId], names: &[String]) {
        match term {
            Term::Object(o) => out.push_str(self.objects.name(*o)),
            Term::Var(slot) if *slot < bindings.len() => out.push_str(self.objects.name(bindings[*slot])),
            Term::Var(slot) => {
                out.push('?');
                out.push_str(names.get(slot - bindings.len()).map(String::as_str).unwrap_or("_"));
            }
        }
    }

    fn write_group(&self, out: &mut String, op: &str, parts: &[Formula], bindings: &[ObjectId], names: &mut Vec<String>) {
        out.push('(');
        out.push_str(op);
        for part in parts {
            out.push(' ');
            self.write_formula(out, part, bindings, names);
        }
        out.push(')');
    }

    fn write_quantifier(&self, out: &mut String, op: &str, variables: &[Variable], body: &Formula, bindings: &[ObjectId], names: &mut Vec<String>) {
        out.push('(');
        out.push_str(op);
        out.push_str(" (");
        let types = self.domain.types();
        let declared = variables.iter().map(|v| format!("?{} - {}", v.name, types.name(v.kind))).collect::<Vec<_>>().join(" ");
        out.push_str(&declared);
        out.push_str(") ");
        names.extend(variables.iter().map(|v| v.name.clone()));
        self.write_formula(out, body, bindings, names);
        names.truncate(names.len() - variables.len());
        out.push(')');
    }

    fn write_formula(&self, out: &mut String, formula: &Formula, bindings: &[ObjectId], names: &mut Vec<String>) {
        match formula {
            Formula::Atom(template) => {
                out.push('(');
                out.push_str(&self.domain.predicate(template.predicate).name);
                for arg in &template.args {
                    out.push(' ');
                    self.term(out, arg, bindings, names);
                }
                out.push(')');
            }
            Formula::Not(inner) => {
                out.push_str("(not ");
                self.write_formula(out, inner, bindings, names);
                out.push(')');
            }
            Formula::And(parts) => self.write_group(out, "and", parts, bindings, names),
            Formula::Or(parts) => self.write_group(out, "or", parts, bindings, names),
            Formula::Equals(left, right) => {
                out.push_str("(= ");
                self.term(out, left, bindings, names);
                out.push(' ');
                self.term(out, right, bindings, names);
                out.push(')');
            }
            Formula::Exists(variables, body) => self.write_quantifier(out, "exists", variables, body, bindings, names),
            Formula::Forall(variables, body) => self.write_quantifier(out, "forall", variables, body, bindings, names),
        }
    }
}
