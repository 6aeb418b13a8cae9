use std::fmt;

use enumset::{EnumSet, EnumSetType};

#[derive(PartialEq, Debug)]
pub enum Stmt<'a> {
    Domain(Domain<'a>),
    Problem(Problem<'a>),
}

impl<'a> Stmt<'a> {
    pub fn kind(&self) -> &'static str {
        match self {
            Stmt::Domain(_) => "domain",
            Stmt::Problem(_) => "problem",
        }
    }
}

#[derive(PartialEq, Debug)]
pub struct Problem<'a> {
    pub name: &'a str,
    pub domain: &'a str,
    pub requirements: EnumSet<Requirement>,
    pub objects: Vec<TypedList<'a>>,
    pub init: Vec<InitElement<'a>>,
    pub goal: Expr<'a>,
    pub metric: Option<Metric<'a>>,
}

#[derive(PartialEq, Debug)]
pub struct Domain<'a> {
    pub name: &'a str,
    pub requirements: EnumSet<Requirement>,
    pub types: Vec<TypedList<'a>>,
    pub constants: Vec<TypedList<'a>>,
    pub predicates: Vec<Predicate<'a>>,
    pub functions: Vec<Predicate<'a>>,
    pub actions: Vec<Action<'a>>,
}

#[derive(EnumSetType, Debug)]
pub enum Requirement {
    Strips,
    Typing,
    NegativePreconditions,
    DisjunctivePreconditions,
    Equality,
    ExistentialPreconditions,
    UniversalPreconditions,
    QuantifiedPreconditions,
    ConditionalEffects,
    ActionCosts,
    ADL,
    Fluents,
    NumericFluents,
    DurativeActions,
    DerivedPredicates,
    TimedInitialLiterals,
    Preferences,
    Constraints,
}

impl Requirement {
    pub fn from_name(name: &str) -> Option<Requirement> {
        use Requirement::*;
        let r = match name.to_ascii_lowercase().as_str() {
            "strips" => Strips,
            "typing" => Typing,
            "negative-preconditions" => NegativePreconditions,
            "disjunctive-preconditions" => DisjunctivePreconditions,
            "equality" => Equality,
            "existential-preconditions" => ExistentialPreconditions,
            "universal-preconditions" => UniversalPreconditions,
            "quantified-preconditions" => QuantifiedPreconditions,
            "conditional-effects" => ConditionalEffects,
            "action-costs" => ActionCosts,
            "adl" => ADL,
            "fluents" => Fluents,
            "numeric-fluents" => NumericFluents,
            "durative-actions" => DurativeActions,
            "derived-predicates" => DerivedPredicates,
            "timed-initial-literals" => TimedInitialLiterals,
            "preferences" => Preferences,
            "constraints" => Constraints,
            _ => return None,
        };
        Some(r)
    }

    pub fn name(&self) -> &'static str {
        use Requirement::*;
        match self {
            Strips => "strips",
            Typing => "typing",
            NegativePreconditions => "negative-preconditions",
            DisjunctivePreconditions => "disjunctive-preconditions",
            Equality => "equality",
            ExistentialPreconditions => "existential-preconditions",
            UniversalPreconditions => "universal-preconditions",
            QuantifiedPreconditions => "quantified-preconditions",
            ConditionalEffects => "conditional-effects",
            ActionCosts => "action-costs",
            ADL => "adl",
            Fluents => "fluents",
            NumericFluents => "numeric-fluents",
            DurativeActions => "durative-actions",
            DerivedPredicates => "derived-predicates",
            TimedInitialLiterals => "timed-initial-literals",
            Preferences => "preferences",
            Constraints => "constraints",
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.name())
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Term<'a> {
    Variable(&'a str),
    Name(&'a str),
}

/// Goal description: precondition, goal and `when` guards all share this grammar.
#[derive(PartialEq, Debug)]
pub enum Expr<'a> {
    And(Vec<Expr<'a>>),
    Or(Vec<Expr<'a>>),
    Not(Box<Expr<'a>>),
    Imply(Box<Expr<'a>>, Box<Expr<'a>>),
    Equals(Term<'a>, Term<'a>),
    Exists(Vec<TypedList<'a>>, Box<Expr<'a>>),
    Forall(Vec<TypedList<'a>>, Box<Expr<'a>>),
    Literal { name: &'a str, terms: Vec<Term<'a>> },
}

#[derive(PartialEq, Debug)]
pub struct FunctionTerm<'a> {
    pub name: &'a str,
    pub terms: Vec<Term<'a>>,
}

#[derive(PartialEq, Debug)]
pub enum NumericExpr<'a> {
    Number(f64),
    Function(FunctionTerm<'a>),
}

#[derive(PartialEq, Debug)]
pub enum Effect<'a> {
    And(Vec<Effect<'a>>),
    Add { name: &'a str, terms: Vec<Term<'a>> },
    Delete { name: &'a str, terms: Vec<Term<'a>> },
    When(Expr<'a>, Box<Effect<'a>>),
    Forall(Vec<TypedList<'a>>, Box<Effect<'a>>),
    Increase(FunctionTerm<'a>, NumericExpr<'a>),
}

#[derive(PartialEq, Debug)]
pub enum InitElement<'a> {
    Literal { name: &'a str, objects: Vec<&'a str> },
    Negated { name: &'a str, objects: Vec<&'a str> },
    Value { function: &'a str, objects: Vec<&'a str>, value: f64 },
}

#[derive(PartialEq, Debug)]
pub struct Metric<'a> {
    pub direction: &'a str,
    pub function: Option<FunctionTerm<'a>>,
}

#[derive(PartialEq, Debug)]
pub struct Action<'a> {
    pub name: &'a str,
    pub parameters: Vec<TypedList<'a>>,
    pub precondition: Option<Expr<'a>>,
    pub effect: Option<Effect<'a>>,
}

#[derive(PartialEq, Debug)]
pub struct Predicate<'a> {
    pub name: &'a str,
    pub variables: Vec<TypedList<'a>>,
}

/// `a b - kind`. A trailing group without `- kind` has `kind: None` and defaults to `object`.
#[derive(PartialEq, Debug)]
pub struct TypedList<'a> {
    pub identifiers: Vec<&'a str>,
    pub kind: Option<&'a str>,
}
