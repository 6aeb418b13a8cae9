//! Turns parsed ASTs into the immutable [`Domain`] and [`Problem`] models.
//!
//! Names are lowercased, types and objects resolved, variables bound to slots
//! and every construct checked against the declared requirements.

use std::collections::{HashMap, HashSet};

use enumset::EnumSet;
use tracing::{debug, warn};

use super::domain::{ActionId, ActionSchema, Domain, Function, FunctionId, Parameter, Predicate};
use super::formula::{AtomTemplate, Effect, Formula, FunctionTemplate, NumericExpr, Term, Variable};
use super::parser::ast::{self, InitElement, Requirement, Stmt, TypedList};
use super::parser::Parser;
use super::problem::{Metric, Problem};
use super::state::{Atom, PredicateId};
use super::types::{Objects, TypeId, TypeIndex, Types};
use crate::error::{Error, ParseFailure, Result};

const TOTAL_COST: &str = "total-cost";

/// Parses exactly one `(define ...)` from `code`.
pub(crate) fn parse_definition<'a>(file: &str, code: &'a str) -> Result<Stmt<'a>> {
    let mut errors = Vec::new();
    let mut statements = Vec::new();
    for result in Parser::new(code) {
        match result {
            Ok(stmt) => statements.push(stmt),
            Err(e) => errors.push(e),
        }
    }
    if !errors.is_empty() {
        return Err(Error::Parse(ParseFailure::new(file, code, errors)));
    }
    match statements.len() {
        1 => Ok(statements.remove(0)),
        0 => Err(Error::structural(format!("{} contains no definition", file))),
        n => Err(Error::structural(format!("{} contains {} definitions, expected one", file, n))),
    }
}

/// Expands composite flags and rejects flags outside the supported fragment.
pub fn expand_requirements(declared: EnumSet<Requirement>) -> Result<EnumSet<Requirement>> {
    use Requirement::*;
    let unsupported = Fluents | NumericFluents | DurativeActions | DerivedPredicates | TimedInitialLiterals | Preferences | Constraints;
    if let Some(requirement) = (declared & unsupported).iter().next() {
        return Err(Error::UnsupportedFeature { requirement, context: String::from("the :requirements declaration") });
    }
    let mut r = declared;
    if r.is_empty() {
        r.insert(Strips);
    }
    if r.contains(ADL) {
        r |= Strips | Typing | NegativePreconditions | DisjunctivePreconditions | Equality | QuantifiedPreconditions | ConditionalEffects;
    }
    if r.contains(QuantifiedPreconditions) {
        r |= ExistentialPreconditions | UniversalPreconditions;
    }
    Ok(r)
}

fn require(requirements: EnumSet<Requirement>, requirement: Requirement, context: impl FnOnce() -> String) -> Result<()> {
    if requirements.contains(requirement) {
        Ok(())
    } else {
        Err(Error::UnsupportedFeature { requirement, context: context() })
    }
}

fn resolve_type(types: &Types, name: &str) -> Result<TypeId> {
    let name = name.to_ascii_lowercase();
    types.get(&name).ok_or_else(|| Error::structural(format!("unknown type {}", name)))
}

/// Flattens a typed list into `(name, type)` pairs. Untyped names are `object`.
fn typed_names(types: &Types, lists: &[TypedList], requirements: EnumSet<Requirement>, context: &str) -> Result<Vec<(String, TypeId)>> {
    let mut result = Vec::new();
    for TypedList { identifiers, kind } in lists {
        let kind = match kind {
            Some(k) => {
                require(requirements, Requirement::Typing, || format!("typed declaration in {}", context))?;
                resolve_type(types, k)?
            }
            None => TypeId::OBJECT,
        };
        result.extend(identifiers.iter().map(|i| (i.to_ascii_lowercase(), kind)));
    }
    Ok(result)
}

fn declare_types(types: &mut Types, lists: &[TypedList], requirements: EnumSet<Requirement>) -> Result<()> {
    if lists.is_empty() {
        return Ok(());
    }
    require(requirements, Requirement::Typing, || String::from("the :types section"))?;
    let mut declared = HashSet::new();
    for TypedList { identifiers, kind } in lists {
        let parent = match kind {
            Some(k) => types.declare(&k.to_ascii_lowercase()),
            None => TypeId::OBJECT,
        };
        for identifier in identifiers {
            let name = identifier.to_ascii_lowercase();
            if !declared.insert(name.clone()) {
                return Err(Error::structural(format!("type {} is declared more than once", name)));
            }
            let id = types.declare(&name);
            if id != TypeId::OBJECT || parent != TypeId::OBJECT {
                types.set_parent(id, parent)?;
            }
        }
    }
    Ok(())
}

fn declare_objects(types: &Types, objects: &mut Objects, lists: &[TypedList], requirements: EnumSet<Requirement>, context: &str) -> Result<()> {
    for (name, kind) in typed_names(types, lists, requirements, context)? {
        objects.insert(&name, kind)?;
    }
    Ok(())
}

fn signatures(types: &Types, declarations: &[ast::Predicate], requirements: EnumSet<Requirement>, what: &str) -> Result<Vec<(String, Vec<TypeId>)>> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();
    for ast::Predicate { name, variables } in declarations {
        let name = name.to_ascii_lowercase();
        if !seen.insert(name.clone()) {
            return Err(Error::structural(format!("{} {} is declared more than once", what, name)));
        }
        let context = format!("{} {}", what, name);
        let parameters = typed_names(types, variables, requirements, &context)?.into_iter().map(|(_, kind)| kind).collect();
        result.push((name, parameters));
    }
    Ok(result)
}

pub(crate) fn compile_domain(ast: &ast::Domain) -> Result<Domain> {
    let name = ast.name.to_ascii_lowercase();
    let requirements = expand_requirements(ast.requirements)?;
    let mut types = Types::new();
    declare_types(&mut types, &ast.types, requirements)?;
    let mut constants = Objects::default();
    declare_objects(&types, &mut constants, &ast.constants, requirements, "the :constants section")?;

    let mut predicates = Vec::new();
    let mut predicate_mapping = HashMap::new();
    for (name, parameters) in signatures(&types, &ast.predicates, requirements, "predicate")? {
        predicate_mapping.insert(name.clone(), PredicateId(predicates.len()));
        predicates.push(Predicate { name, parameters });
    }
    let mut functions = Vec::new();
    let mut function_mapping = HashMap::new();
    for (name, parameters) in signatures(&types, &ast.functions, requirements, "function")? {
        function_mapping.insert(name.clone(), FunctionId(functions.len()));
        functions.push(Function { name, parameters });
    }

    let mut domain = Domain {
        name,
        requirements,
        types,
        constants,
        predicates,
        predicate_mapping,
        functions,
        function_mapping,
        actions: Vec::new(),
        action_mapping: HashMap::new(),
    };

    let mut actions = Vec::new();
    let mut action_mapping = HashMap::new();
    for action in &ast.actions {
        let name = action.name.to_ascii_lowercase();
        if action_mapping.contains_key(&name) {
            return Err(Error::structural(format!("action {} is declared more than once", name)));
        }
        let schema = Compiler::new(&domain, &domain.constants, requirements, format!("action {}", name)).action(action)?;
        action_mapping.insert(name, ActionId(actions.len()));
        actions.push(schema);
    }
    domain.actions = actions;
    domain.action_mapping = action_mapping;

    debug!(
        domain = %domain.name,
        types = domain.types.len(),
        predicates = domain.predicates.len(),
        actions = domain.actions.len(),
        "compiled domain"
    );
    Ok(domain)
}

pub(crate) fn compile_problem(domain: &Domain, ast: &ast::Problem) -> Result<Problem> {
    let name = ast.name.to_ascii_lowercase();
    let domain_name = ast.domain.to_ascii_lowercase();
    if domain_name != domain.name() {
        return Err(Error::structural(format!(
            "problem {} is defined for domain {} but was given domain {}",
            name,
            domain_name,
            domain.name()
        )));
    }
    let requirements = expand_requirements(domain.requirements() | ast.requirements)?;
    let mut objects = domain.constants().clone();
    declare_objects(domain.types(), &mut objects, &ast.objects, requirements, "the :objects section")?;
    let type_index = TypeIndex::build(domain.types(), &objects);

    let mut compiler = Compiler::new(domain, &objects, requirements, format!("problem {}", name));
    let mut init = Vec::new();
    let mut initial_cost = 0.0;
    let mut function_values = HashMap::new();
    for element in &ast.init {
        match element {
            InitElement::Literal { name, objects } => {
                let terms: Vec<ast::Term> = objects.iter().map(|o| ast::Term::Name(*o)).collect();
                init.push(compiler.atom(name, &terms)?.ground(&[]));
            }
            InitElement::Negated { name, .. } => {
                return Err(Error::structural(format!(
                    "initial fact (not ({} ...)) is negative; the initial state lists true atoms only",
                    name.to_ascii_lowercase()
                )));
            }
            InitElement::Value { function, objects, value } if function.eq_ignore_ascii_case(TOTAL_COST) && objects.is_empty() => {
                if *value < 0.0 {
                    return Err(Error::structural(format!("initial total-cost {} is negative", value)));
                }
                initial_cost = *value;
            }
            InitElement::Value { function, objects, value } => {
                let terms: Vec<ast::Term> = objects.iter().map(|o| ast::Term::Name(*o)).collect();
                let template = compiler.function(&ast::FunctionTerm { name: *function, terms })?;
                let args: Vec<_> = template.args.iter().map(|t| t.resolve(&[])).collect();
                if function_values.insert((template.function, args), *value).is_some() {
                    return Err(Error::structural(format!("function {} is assigned more than once in :init", function.to_ascii_lowercase())));
                }
            }
        }
    }
    let goal = compiler.formula(&ast.goal)?;
    let metric = ast.metric.as_ref().and_then(|m| match &m.function {
        Some(f) if f.name.eq_ignore_ascii_case(TOTAL_COST) && f.terms.is_empty() => {
            Some(Metric { minimize: m.direction.eq_ignore_ascii_case("minimize"), function: String::from(TOTAL_COST) })
        }
        _ => {
            warn!(problem = %name, "only total-cost metrics are tracked; ignoring :metric");
            None
        }
    });

    debug!(problem = %name, objects = objects.len(), init = init.len(), "compiled problem");
    Ok(Problem {
        name,
        domain_name,
        type_index,
        init: dedup(init),
        initial_cost,
        function_values,
        goal,
        metric,
        objects,
    })
}

fn dedup(atoms: Vec<Atom>) -> Vec<Atom> {
    let mut seen = HashSet::new();
    atoms.into_iter().filter(|a| seen.insert(a.clone())).collect()
}

/// Compiles formulas and effects within one action or problem.
struct Compiler<'c> {
    domain: &'c Domain,
    objects: &'c Objects,
    requirements: EnumSet<Requirement>,
    /// Variables in scope, indexed by slot.
    scope: Vec<Variable>,
    context: String,
}

impl<'c> Compiler<'c> {
    fn new(domain: &'c Domain, objects: &'c Objects, requirements: EnumSet<Requirement>, context: String) -> Self {
        Self { domain, objects, requirements, scope: Vec::new(), context }
    }

    fn require(&self, requirement: Requirement, construct: &str) -> Result<()> {
        require(self.requirements, requirement, || format!("{} in {}", construct, self.context))
    }

    fn bind(&mut self, lists: &[TypedList]) -> Result<Vec<Variable>> {
        let variables: Vec<Variable> = typed_names(self.domain.types(), lists, self.requirements, &self.context)?
            .into_iter()
            .map(|(name, kind)| Variable { name, kind })
            .collect();
        for (i, v) in variables.iter().enumerate() {
            if variables[..i].iter().any(|w| w.name == v.name) {
                return Err(Error::structural(format!("variable ?{} is bound twice in {}", v.name, self.context)));
            }
        }
        self.scope.extend(variables.iter().cloned());
        Ok(variables)
    }

    fn unbind(&mut self, count: usize) {
        self.scope.truncate(self.scope.len() - count);
    }

    fn term(&self, term: &ast::Term) -> Result<(Term, TypeId)> {
        match term {
            ast::Term::Variable(v) => {
                let name = v.to_ascii_lowercase();
                self.scope
                    .iter()
                    .rposition(|var| var.name == name)
                    .map(|slot| (Term::Var(slot), self.scope[slot].kind))
                    .ok_or_else(|| Error::structural(format!("variable ?{} is not bound in {}", name, self.context)))
            }
            ast::Term::Name(n) => {
                let name = n.to_ascii_lowercase();
                self.objects
                    .get(&name)
                    .map(|id| (Term::Object(id), self.objects.kind(id)))
                    .ok_or_else(|| Error::structural(format!("unknown object {} in {}", name, self.context)))
            }
        }
    }

    /// Checks count and subtype compatibility of `terms` against a signature.
    fn arguments(&self, what: &str, expected: &[TypeId], terms: &[ast::Term]) -> Result<Vec<Term>> {
        if expected.len() != terms.len() {
            return Err(Error::structural(format!(
                "{} takes {} arguments but {} were given in {}",
                what,
                expected.len(),
                terms.len(),
                self.context
            )));
        }
        let types = self.domain.types();
        let mut args = Vec::with_capacity(terms.len());
        for (position, (term, parameter)) in terms.iter().zip(expected).enumerate() {
            let (t, kind) = self.term(term)?;
            if !types.is_subtype(kind, *parameter) {
                return Err(Error::structural(format!(
                    "argument {} of {} must be {} but is {} in {}",
                    position + 1,
                    what,
                    types.name(*parameter),
                    types.name(kind),
                    self.context
                )));
            }
            args.push(t);
        }
        Ok(args)
    }

    fn atom(&self, name: &str, terms: &[ast::Term]) -> Result<AtomTemplate> {
        let name = name.to_ascii_lowercase();
        let predicate = self
            .domain
            .predicate_id(&name)
            .ok_or_else(|| Error::structural(format!("unknown predicate {} in {}", name, self.context)))?;
        let args = self.arguments(&format!("predicate {}", name), &self.domain.predicate(predicate).parameters, terms)?;
        Ok(AtomTemplate { predicate, args })
    }

    fn function(&self, term: &ast::FunctionTerm) -> Result<FunctionTemplate> {
        let name = term.name.to_ascii_lowercase();
        let function = self
            .domain
            .function_id(&name)
            .ok_or_else(|| Error::structural(format!("unknown function {} in {}", name, self.context)))?;
        let args = self.arguments(&format!("function {}", name), &self.domain.function(function).parameters, &term.terms)?;
        Ok(FunctionTemplate { function, args })
    }

    fn quantified(&mut self, variables: &[TypedList], body: &ast::Expr) -> Result<(Vec<Variable>, Box<Formula>)> {
        let variables = self.bind(variables)?;
        let body = self.formula(body);
        self.unbind(variables.len());
        Ok((variables, Box::new(body?)))
    }

    fn formulas(&mut self, exprs: &[ast::Expr]) -> Result<Vec<Formula>> {
        exprs.iter().map(|e| self.formula(e)).collect()
    }

    fn formula(&mut self, expr: &ast::Expr) -> Result<Formula> {
        use ast::Expr;
        match expr {
            Expr::And(parts) => Ok(Formula::And(self.formulas(parts)?)),
            Expr::Or(parts) => {
                self.require(Requirement::DisjunctivePreconditions, "or")?;
                Ok(Formula::Or(self.formulas(parts)?))
            }
            Expr::Not(inner) => {
                // (not (= a b)) only needs :equality.
                if !matches!(**inner, Expr::Equals(..)) {
                    self.require(Requirement::NegativePreconditions, "not")?;
                }
                Ok(Formula::Not(Box::new(self.formula(inner)?)))
            }
            Expr::Imply(antecedent, consequent) => {
                self.require(Requirement::DisjunctivePreconditions, "imply")?;
                let antecedent = self.formula(antecedent)?;
                let consequent = self.formula(consequent)?;
                Ok(Formula::Or(vec![Formula::Not(Box::new(antecedent)), consequent]))
            }
            Expr::Equals(left, right) => {
                self.require(Requirement::Equality, "=")?;
                Ok(Formula::Equals(self.term(left)?.0, self.term(right)?.0))
            }
            Expr::Exists(variables, body) => {
                self.require(Requirement::ExistentialPreconditions, "exists")?;
                let (variables, body) = self.quantified(variables, body)?;
                Ok(Formula::Exists(variables, body))
            }
            Expr::Forall(variables, body) => {
                self.require(Requirement::UniversalPreconditions, "forall")?;
                let (variables, body) = self.quantified(variables, body)?;
                Ok(Formula::Forall(variables, body))
            }
            Expr::Literal { name, terms } => Ok(Formula::Atom(self.atom(name, terms)?)),
        }
    }

    fn effects(&mut self, effect: &ast::Effect, out: &mut Vec<Effect>) -> Result<()> {
        use ast::Effect as E;
        match effect {
            E::And(parts) => {
                for part in parts {
                    self.effects(part, out)?;
                }
            }
            E::Add { name, terms } => out.push(Effect::Add(self.atom(name, terms)?)),
            E::Delete { name, terms } => out.push(Effect::Delete(self.atom(name, terms)?)),
            E::When(guard, inner) => {
                self.require(Requirement::ConditionalEffects, "when")?;
                let guard = self.formula(guard)?;
                let mut effects = Vec::new();
                self.effects(inner, &mut effects)?;
                out.push(Effect::Conditional(guard, effects));
            }
            E::Forall(variables, inner) => {
                self.require(Requirement::ConditionalEffects, "forall effect")?;
                let variables = self.bind(variables)?;
                let mut effects = Vec::new();
                let result = self.effects(inner, &mut effects);
                self.unbind(variables.len());
                result?;
                out.push(Effect::Universal(variables, effects));
            }
            E::Increase(target, value) => {
                self.require(Requirement::ActionCosts, "increase")?;
                if !target.name.eq_ignore_ascii_case(TOTAL_COST) || !target.terms.is_empty() {
                    return Err(Error::UnsupportedFeature {
                        requirement: Requirement::NumericFluents,
                        context: format!("increase of ({}) in {}", target.name.to_ascii_lowercase(), self.context),
                    });
                }
                if self.domain.function_id(TOTAL_COST).is_none() {
                    return Err(Error::structural(format!("total-cost is increased in {} but not declared in :functions", self.context)));
                }
                let amount = match value {
                    ast::NumericExpr::Number(n) if *n < 0.0 => {
                        return Err(Error::structural(format!("negative cost increment {} in {}", n, self.context)));
                    }
                    ast::NumericExpr::Number(n) => NumericExpr::Number(*n),
                    ast::NumericExpr::Function(f) => NumericExpr::Function(self.function(f)?),
                };
                out.push(Effect::IncreaseCost(amount));
            }
        }
        Ok(())
    }

    fn action(mut self, action: &ast::Action) -> Result<ActionSchema> {
        let name = action.name.to_ascii_lowercase();
        let parameters = self.bind(&action.parameters)?.into_iter().map(|v| Parameter { name: v.name, kind: v.kind }).collect();
        let precondition = match &action.precondition {
            Some(expr) => self.formula(expr)?,
            None => Formula::truth(),
        };
        let mut effects = Vec::new();
        if let Some(effect) = &action.effect {
            self.effects(effect, &mut effects)?;
        }
        Ok(ActionSchema { name, parameters, precondition, effects })
    }
}
