pub mod ast;
pub mod lexer;
pub mod tokens;

use std::fmt;
use std::iter::Peekable;

use enumset::EnumSet;

use ast::{Effect, Expr, FunctionTerm, InitElement, Metric, NumericExpr, Requirement, Stmt, Term, TypedList};
use lexer::Lexer;
use tokens::{KeywordToken, OpToken, Span, Token, TokenKind};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Position {
    Span(Span),
    EOF,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Error {
    pub pos: Position,
    pub message: String,
}

impl Error {
    pub fn new(pos: Position, message: &str) -> Self {
        Self { pos, message: String::from(message) }
    }

    pub fn line(&self) -> Option<usize> {
        match self.pos {
            Position::Span(span) => Some(span.line),
            Position::EOF => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pos {
            Position::Span(span) => write!(f, "line:{} col:{} {}", span.line, span.col, self.message),
            Position::EOF => write!(f, "end of file: {}", self.message),
        }
    }
}

impl std::error::Error for Error {}

/// Parses PDDL domain and problem definitions.
/// Based on https://github.com/jan-dolejsi/pddl-reference/blob/master/_citedpapers/pddl3bnf.pdf
pub struct Parser<'a> {
    lexer: Peekable<Lexer<'a>>,
}

impl<'a> Iterator for Parser<'a> {
    type Item = Result<Stmt<'a>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lexer.peek()?;
        let r = self.root();
        if r.is_err() {
            self.error_recover();
        }
        Some(r)
    }
}

const EXPECTED_IDENTIFIER: &str = "Expected identifier.";
const EXPECTED_COLON: &str = "Expected ':'.";
const EXPECTED_OPEN_PARENTHESIS: &str = "Expected '('.";
const EXPECTED_CLOSE_PARENTHESIS: &str = "Expected matched ')'.";
const EXPECTED_TERM: &str = "Expected variable or object name.";

#[macro_export]
macro_rules! expect {
    ($input:expr, {$($p:pat => $b:expr$(,)?)+}, $err:expr) => {
        match $input {
            $($p => $b,)+
            Some(Ok($crate::pddl::parser::tokens::Token{span,..})) => Err($crate::pddl::parser::Error {
                pos: $crate::pddl::parser::Position::Span(span),
                message: String::from($err),
            }),
            Some(Err(e)) => Err(e),
            None => Err($crate::pddl::parser::Error {
                pos: $crate::pddl::parser::Position::EOF,
                message: String::from($err),
            }),
        }
    };
}

impl<'a> Parser<'a> {
    pub fn new(code: &'a str) -> Self {
        let lexer = Lexer::<'a>::new(code).peekable();
        Self { lexer }
    }

    // A definition that failed to parse is not resumable; drop the rest of the input.
    fn error_recover(&mut self) {
        for _ in self.lexer.by_ref() {}
    }

    fn next_is(&mut self, kind: TokenKind<'a>) -> bool {
        self.lexer.next_if(|t| matches!(t, Ok(Token { kind: k, .. }) if *k == kind)).is_some()
    }

    fn peek_is(&mut self, kind: TokenKind<'a>) -> bool {
        matches!(self.lexer.peek(), Some(Ok(Token { kind: k, .. })) if *k == kind)
    }

    fn open(&mut self) -> Result<(), Error> {
        expect!(self.lexer.next(), {Some(Ok(Token{kind:TokenKind::OpenParenthesis,..})) => Ok(())}, EXPECTED_OPEN_PARENTHESIS)
    }

    fn close(&mut self) -> Result<(), Error> {
        expect!(self.lexer.next(), {Some(Ok(Token{kind:TokenKind::CloseParenthesis,..})) => Ok(())}, EXPECTED_CLOSE_PARENTHESIS)
    }

    fn identifier(&mut self) -> Result<&'a str, Error> {
        expect!(self.lexer.next(), {Some(Ok(Token{kind:TokenKind::Identifier(s),..})) => Ok(s)}, EXPECTED_IDENTIFIER)
    }

    fn number(&mut self) -> Result<f64, Error> {
        expect!(self.lexer.next(), {Some(Ok(Token{kind:TokenKind::Literal(l),..})) => Ok(l.value())}, "Expected number.")
    }

    fn names(&mut self) -> Vec<&'a str> {
        let mut names = Vec::new();
        while let Some(Ok(Token { kind: TokenKind::Identifier(s), .. })) =
            self.lexer.next_if(|t| matches!(t, Ok(Token { kind: TokenKind::Identifier(_), .. })))
        {
            names.push(s);
        }
        names
    }

    fn type_name(&mut self) -> Result<&'a str, Error> {
        expect!(self.lexer.next(), {
            Some(Ok(Token{kind:TokenKind::Identifier(s),..})) => Ok(s),
            Some(Ok(Token{kind:TokenKind::OpenParenthesis, span})) => Err(Error::new(Position::Span(span), "Either types are not supported.")),
        }, "Expected type name after '-'.")
    }

    fn typed_list_name(&mut self) -> Result<Vec<TypedList<'a>>, Error> {
        let mut lists = Vec::new();
        loop {
            let identifiers = self.names();
            if self.next_is(TokenKind::Minus) {
                let kind = self.type_name()?;
                lists.push(TypedList { identifiers, kind: Some(kind) });
            } else {
                if !identifiers.is_empty() {
                    lists.push(TypedList { identifiers, kind: None });
                }
                return Ok(lists);
            }
        }
    }

    fn typed_list_variable(&mut self) -> Result<Vec<TypedList<'a>>, Error> {
        let mut lists = Vec::new();
        let mut identifiers = Vec::new();
        loop {
            if self.next_is(TokenKind::QuestionMark) {
                identifiers.push(self.identifier()?);
            } else if self.next_is(TokenKind::Minus) {
                let kind = self.type_name()?;
                lists.push(TypedList { identifiers: std::mem::take(&mut identifiers), kind: Some(kind) });
            } else {
                if !identifiers.is_empty() {
                    lists.push(TypedList { identifiers, kind: None });
                }
                return Ok(lists);
            }
        }
    }

    fn term(&mut self) -> Result<Term<'a>, Error> {
        expect!(self.lexer.next(), {
            Some(Ok(Token{kind:TokenKind::QuestionMark,..})) => Ok(Term::Variable(self.identifier()?)),
            Some(Ok(Token{kind:TokenKind::Identifier(s),..})) => Ok(Term::Name(s)),
        }, EXPECTED_TERM)
    }

    fn terms(&mut self) -> Result<Vec<Term<'a>>, Error> {
        let mut terms = Vec::new();
        while matches!(
            self.lexer.peek(),
            Some(Ok(Token { kind: TokenKind::QuestionMark | TokenKind::Identifier(_), .. }))
        ) {
            terms.push(self.term()?);
        }
        Ok(terms)
    }

    fn quantified_variables(&mut self) -> Result<Vec<TypedList<'a>>, Error> {
        self.open()?;
        let variables = self.typed_list_variable()?;
        self.close()?;
        Ok(variables)
    }

    fn expr_list(&mut self) -> Result<Vec<Expr<'a>>, Error> {
        let mut group = Vec::new();
        while self.peek_is(TokenKind::OpenParenthesis) {
            group.push(self.expr()?)
        }
        Ok(group)
    }

    fn expr(&mut self) -> Result<Expr<'a>, Error> {
        use OpToken::*;
        use TokenKind::{Equals, Identifier, Op};
        self.open()?;
        if self.next_is(TokenKind::CloseParenthesis) {
            return Ok(Expr::And(Vec::new()));
        }
        let result = expect!(self.lexer.next(), {
            Some(Ok(Token{kind:Op(And),..})) => Ok(Expr::And(self.expr_list()?)),
            Some(Ok(Token{kind:Op(Or),..})) => Ok(Expr::Or(self.expr_list()?)),
            Some(Ok(Token{kind:Op(Not),..})) => Ok(Expr::Not(Box::new(self.expr()?))),
            Some(Ok(Token{kind:Op(Imply),..})) => {
                let antecedent = self.expr()?;
                let consequent = self.expr()?;
                Ok(Expr::Imply(Box::new(antecedent), Box::new(consequent)))
            },
            Some(Ok(Token{kind:Op(Exists),..})) => {
                let variables = self.quantified_variables()?;
                Ok(Expr::Exists(variables, Box::new(self.expr()?)))
            },
            Some(Ok(Token{kind:Op(Forall),..})) => {
                let variables = self.quantified_variables()?;
                Ok(Expr::Forall(variables, Box::new(self.expr()?)))
            },
            Some(Ok(Token{kind:Equals,..})) => {
                let left = self.term()?;
                let right = self.term()?;
                Ok(Expr::Equals(left, right))
            },
            Some(Ok(Token{kind:Identifier(name),..})) => Ok(Expr::Literal { name, terms: self.terms()? }),
        }, "Expected expression.")?;
        self.close()?;
        Ok(result)
    }

    fn function_term(&mut self) -> Result<FunctionTerm<'a>, Error> {
        self.open()?;
        let name = self.identifier()?;
        let terms = self.terms()?;
        self.close()?;
        Ok(FunctionTerm { name, terms })
    }

    fn numeric_expr(&mut self) -> Result<NumericExpr<'a>, Error> {
        if matches!(self.lexer.peek(), Some(Ok(Token { kind: TokenKind::Literal(_), .. }))) {
            Ok(NumericExpr::Number(self.number()?))
        } else {
            Ok(NumericExpr::Function(self.function_term()?))
        }
    }

    fn effect(&mut self) -> Result<Effect<'a>, Error> {
        use OpToken::*;
        use TokenKind::{Identifier, Op};
        self.open()?;
        if self.next_is(TokenKind::CloseParenthesis) {
            return Ok(Effect::And(Vec::new()));
        }
        let result = expect!(self.lexer.next(), {
            Some(Ok(Token{kind:Op(And),..})) => {
                let mut effects = Vec::new();
                while self.peek_is(TokenKind::OpenParenthesis) {
                    effects.push(self.effect()?);
                }
                Ok(Effect::And(effects))
            },
            Some(Ok(Token{kind:Op(Not),..})) => {
                self.open()?;
                let name = self.identifier()?;
                let terms = self.terms()?;
                self.close()?;
                Ok(Effect::Delete { name, terms })
            },
            Some(Ok(Token{kind:Op(When),..})) => {
                let guard = self.expr()?;
                Ok(Effect::When(guard, Box::new(self.effect()?)))
            },
            Some(Ok(Token{kind:Op(Forall),..})) => {
                let variables = self.quantified_variables()?;
                Ok(Effect::Forall(variables, Box::new(self.effect()?)))
            },
            Some(Ok(Token{kind:Op(Increase),..})) => {
                let function = self.function_term()?;
                Ok(Effect::Increase(function, self.numeric_expr()?))
            },
            Some(Ok(Token{kind:Identifier(name),..})) => Ok(Effect::Add { name, terms: self.terms()? }),
        }, "Expected effect.")?;
        self.close()?;
        Ok(result)
    }

    fn action(&mut self) -> Result<ast::Action<'a>, Error> {
        use KeywordToken::{Effect, Parameters, Precondition};
        use TokenKind::Keyword;
        let name = self.identifier()?;
        let mut parameters = Vec::new();
        let mut precondition = None;
        let mut effect = None;
        while self.next_is(TokenKind::Colon) {
            expect!(self.lexer.next(), {
                Some(Ok(Token{kind:Keyword(Parameters),..})) => {
                    self.open()?;
                    parameters = self.typed_list_variable()?;
                    self.close()
                },
                Some(Ok(Token{kind:Keyword(Precondition),..})) => Ok(precondition = Some(self.expr()?)),
                Some(Ok(Token{kind:Keyword(Effect),..})) => Ok(effect = Some(self.effect()?)),
            }, "Expected :parameters, :precondition or :effect.")?;
        }
        Ok(ast::Action { name, parameters, precondition, effect })
    }

    fn predicates(&mut self) -> Result<Vec<ast::Predicate<'a>>, Error> {
        let mut predicates = Vec::new();
        while self.next_is(TokenKind::OpenParenthesis) {
            let name = self.identifier()?;
            let variables = self.typed_list_variable()?;
            predicates.push(ast::Predicate { name, variables });
            self.close()?;
        }
        Ok(predicates)
    }

    fn functions(&mut self) -> Result<Vec<ast::Predicate<'a>>, Error> {
        let mut functions = Vec::new();
        while self.next_is(TokenKind::OpenParenthesis) {
            let name = self.identifier()?;
            let variables = self.typed_list_variable()?;
            functions.push(ast::Predicate { name, variables });
            self.close()?;
            // Only `number` valued functions are meaningful here; the return type is not kept.
            if self.next_is(TokenKind::Minus) {
                self.type_name()?;
            }
        }
        Ok(functions)
    }

    fn requirements(&mut self) -> Result<EnumSet<Requirement>, Error> {
        let mut r = EnumSet::empty();
        while self.next_is(TokenKind::Colon) {
            let requirement = expect!(self.lexer.next(), {
                Some(Ok(Token{kind:TokenKind::Identifier(s), span})) => Requirement::from_name(s)
                    .ok_or_else(|| Error { pos: Position::Span(span), message: format!("Unknown requirement :{}.", s) }),
            }, "Expected requirement.")?;
            r.insert(requirement);
        }
        Ok(r)
    }

    fn init(&mut self) -> Result<Vec<InitElement<'a>>, Error> {
        use TokenKind::{Equals, Identifier, Op};
        let mut init = Vec::new();
        while self.next_is(TokenKind::OpenParenthesis) {
            let element = expect!(self.lexer.next(), {
                Some(Ok(Token{kind:Identifier(name),..})) => Ok(InitElement::Literal { name, objects: self.names() }),
                Some(Ok(Token{kind:Op(OpToken::Not),..})) => {
                    self.open()?;
                    let name = self.identifier()?;
                    let objects = self.names();
                    self.close()?;
                    Ok(InitElement::Negated { name, objects })
                },
                Some(Ok(Token{kind:Equals,..})) => {
                    self.open()?;
                    let function = self.identifier()?;
                    let objects = self.names();
                    self.close()?;
                    let value = self.number()?;
                    Ok(InitElement::Value { function, objects, value })
                },
            }, "Expected initial fact.")?;
            self.close()?;
            init.push(element);
        }
        Ok(init)
    }

    fn metric(&mut self) -> Result<Metric<'a>, Error> {
        let direction = self.identifier()?;
        let function = if self.peek_is(TokenKind::OpenParenthesis) { Some(self.function_term()?) } else { None };
        Ok(Metric { direction, function })
    }

    fn problem(&mut self) -> Result<Stmt<'a>, Error> {
        use KeywordToken::*;
        use TokenKind::Keyword;
        let (name, span) = expect!(self.lexer.next(), {Some(Ok(Token{kind:TokenKind::Identifier(s), span})) => Ok((s, span))}, "Expected problem name.")?;
        self.close()?;
        let mut domain = None;
        let mut requirements = EnumSet::empty();
        let mut objects = Vec::new();
        let mut init = Vec::new();
        let mut goal = None;
        let mut metric = None;
        while self.next_is(TokenKind::OpenParenthesis) {
            expect!(self.lexer.next(), {Some(Ok(Token{kind:TokenKind::Colon,..})) => Ok(())}, EXPECTED_COLON)?;
            expect!(self.lexer.next(), {
                Some(Ok(Token{kind:Keyword(Domain),..})) => Ok(domain = Some(self.identifier()?)),
                Some(Ok(Token{kind:Keyword(Requirements),..})) => Ok(requirements = self.requirements()?),
                Some(Ok(Token{kind:Keyword(Objects),..})) => Ok(objects = self.typed_list_name()?),
                Some(Ok(Token{kind:Keyword(Init),..})) => Ok(init = self.init()?),
                Some(Ok(Token{kind:Keyword(Goal),..})) => Ok(goal = Some(self.expr()?)),
                Some(Ok(Token{kind:Keyword(Metric),..})) => Ok(metric = Some(self.metric()?)),
            }, "Expected :domain, :requirements, :objects, :init, :goal or :metric.")?;
            self.close()?;
        }
        let domain = domain.ok_or_else(|| Error::new(Position::Span(span), "Problem does not name its :domain."))?;
        let goal = goal.ok_or_else(|| Error::new(Position::Span(span), "Problem does not declare a :goal."))?;
        Ok(Stmt::Problem(ast::Problem { name, domain, requirements, objects, init, goal, metric }))
    }

    fn domain(&mut self) -> Result<Stmt<'a>, Error> {
        use KeywordToken::*;
        use TokenKind::Keyword;
        let name = expect!(self.lexer.next(), {Some(Ok(Token{kind:TokenKind::Identifier(s),..})) => Ok(s)}, "Expected domain name.")?;
        self.close()?;
        let mut requirements = EnumSet::empty();
        let mut types = Vec::new();
        let mut constants = Vec::new();
        let mut predicates = Vec::new();
        let mut functions = Vec::new();
        let mut actions = Vec::new();
        while self.next_is(TokenKind::OpenParenthesis) {
            expect!(self.lexer.next(), {Some(Ok(Token{kind:TokenKind::Colon,..})) => Ok(())}, EXPECTED_COLON)?;
            expect!(self.lexer.next(), {
                Some(Ok(Token{kind:Keyword(Requirements),..})) => Ok(requirements = self.requirements()?),
                Some(Ok(Token{kind:Keyword(Types),..})) => Ok(types = self.typed_list_name()?),
                Some(Ok(Token{kind:Keyword(Constants),..})) => Ok(constants = self.typed_list_name()?),
                Some(Ok(Token{kind:Keyword(Predicates),..})) => Ok(predicates = self.predicates()?),
                Some(Ok(Token{kind:Keyword(Functions),..})) => Ok(functions = self.functions()?),
                Some(Ok(Token{kind:Keyword(Action),..})) => Ok(actions.push(self.action()?)),
            }, "Expected :requirements, :types, :constants, :predicates, :functions or :action.")?;
            self.close()?;
        }
        Ok(Stmt::Domain(ast::Domain { name, requirements, types, constants, predicates, functions, actions }))
    }

    /// Consumes a bare word such as `define`, matched case-insensitively.
    fn word(&mut self, expected: &[&'static str], message: &str) -> Result<&'static str, Error> {
        expect!(self.lexer.next(), {
            Some(Ok(Token{kind:TokenKind::Identifier(s), span})) => expected
                .iter()
                .find(|w| w.eq_ignore_ascii_case(s))
                .copied()
                .ok_or_else(|| Error::new(Position::Span(span), message)),
        }, message)
    }

    fn root(&mut self) -> Result<Stmt<'a>, Error> {
        self.open()?;
        self.word(&["define"], "Expected 'define'.")?;
        self.open()?;
        let body = match self.word(&["domain", "problem"], "Expected 'domain' or 'problem'.")? {
            "domain" => self.domain()?,
            _ => self.problem()?,
        };
        self.close()?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use enumset::{enum_set, EnumSet};

    use super::ast::{
        Action, Domain, Effect, Expr, FunctionTerm, InitElement, Metric, NumericExpr, Predicate, Problem, Requirement, Stmt, Term,
        TypedList,
    };
    use super::{Parser, Position};

    #[test]
    fn test_domain() {
        let code = "(define (domain test) (:requirements :strips :typing) (:types hand - object water - beverage) (:predicates (warm ?o - object)) (:action test :parameters (?h - hand ?b - beverage) :precondition (cold ?h) :effect (warm ?b)))";
        let mut parser = Parser::new(code);
        assert_eq!(
            parser.next(),
            Some(Ok(Stmt::Domain(Domain {
                name: "test",
                requirements: enum_set!(Requirement::Strips | Requirement::Typing),
                types: vec![
                    TypedList { identifiers: vec!["hand"], kind: Some("object") },
                    TypedList { identifiers: vec!["water"], kind: Some("beverage") }
                ],
                constants: vec![],
                predicates: vec![Predicate { name: "warm", variables: vec![TypedList { identifiers: vec!["o"], kind: Some("object") }] }],
                functions: vec![],
                actions: vec![Action {
                    name: "test",
                    parameters: vec![
                        TypedList { identifiers: vec!["h"], kind: Some("hand") },
                        TypedList { identifiers: vec!["b"], kind: Some("beverage") }
                    ],
                    precondition: Some(Expr::Literal { name: "cold", terms: vec![Term::Variable("h")] }),
                    effect: Some(Effect::Add { name: "warm", terms: vec![Term::Variable("b")] })
                }]
            })))
        );
        assert_eq!(parser.next(), None);
    }

    #[test]
    fn test_problem() {
        let code = "(define (problem test) (:domain barman) (:objects shaker1 - shaker) (:init (ontable shaker1) (= (total-cost) 0)) (:goal (and (contains shot1 cocktail1))) (:metric minimize (total-cost)))";
        let mut parser = Parser::new(code);
        assert_eq!(
            parser.next(),
            Some(Ok(Stmt::Problem(Problem {
                name: "test",
                domain: "barman",
                requirements: EnumSet::empty(),
                objects: vec![TypedList { identifiers: vec!["shaker1"], kind: Some("shaker") }],
                init: vec![
                    InitElement::Literal { name: "ontable", objects: vec!["shaker1"] },
                    InitElement::Value { function: "total-cost", objects: vec![], value: 0.0 }
                ],
                goal: Expr::And(vec![Expr::Literal { name: "contains", terms: vec![Term::Name("shot1"), Term::Name("cocktail1")] }]),
                metric: Some(Metric { direction: "minimize", function: Some(FunctionTerm { name: "total-cost", terms: vec![] }) }),
            })))
        )
    }

    #[test]
    fn test_untyped_tail() {
        let code = "(define (domain d) (:predicates (p ?a ?b - t ?c)))";
        if let Some(Ok(Stmt::Domain(domain))) = Parser::new(code).next() {
            assert_eq!(
                domain.predicates[0].variables,
                vec![
                    TypedList { identifiers: vec!["a", "b"], kind: Some("t") },
                    TypedList { identifiers: vec!["c"], kind: None }
                ]
            );
        } else {
            assert!(false); // Parser failed.
        }
    }

    #[test]
    fn test_adl_constructs() {
        let code = "(define (domain d) (:action a :parameters (?x) :precondition (and (not (= ?x c)) (exists (?y - t) (p ?x ?y)) (imply (q) (forall (?z) (r ?z)))) :effect (and (forall (?z) (when (r ?z) (not (r ?z)))) (increase (total-cost) 2))))";
        if let Some(Ok(Stmt::Domain(domain))) = Parser::new(code).next() {
            let action = &domain.actions[0];
            assert_eq!(
                action.precondition,
                Some(Expr::And(vec![
                    Expr::Not(Box::new(Expr::Equals(Term::Variable("x"), Term::Name("c")))),
                    Expr::Exists(
                        vec![TypedList { identifiers: vec!["y"], kind: Some("t") }],
                        Box::new(Expr::Literal { name: "p", terms: vec![Term::Variable("x"), Term::Variable("y")] })
                    ),
                    Expr::Imply(
                        Box::new(Expr::Literal { name: "q", terms: vec![] }),
                        Box::new(Expr::Forall(
                            vec![TypedList { identifiers: vec!["z"], kind: None }],
                            Box::new(Expr::Literal { name: "r", terms: vec![Term::Variable("z")] })
                        ))
                    ),
                ]))
            );
            assert_eq!(
                action.effect,
                Some(Effect::And(vec![
                    Effect::Forall(
                        vec![TypedList { identifiers: vec!["z"], kind: None }],
                        Box::new(Effect::When(
                            Expr::Literal { name: "r", terms: vec![Term::Variable("z")] },
                            Box::new(Effect::Delete { name: "r", terms: vec![Term::Variable("z")] })
                        ))
                    ),
                    Effect::Increase(FunctionTerm { name: "total-cost", terms: vec![] }, NumericExpr::Number(2.0)),
                ]))
            );
        } else {
            assert!(false); // Parser failed.
        }
    }

    #[test]
    fn test_error_position() {
        let code = "(define (domain d)\n  (:predicates (p ?x)\n  (:action))";
        let result = Parser::new(code).next().unwrap();
        let err = result.unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert!(matches!(err.pos, Position::Span(_)));
    }

    #[test]
    fn test_reserved_words_as_names() {
        let code = "(define (problem goal) (:domain init) (:objects action effect - types) (:init (problem action)) (:goal (and (domain effect))))";
        if let Some(Ok(Stmt::Problem(problem))) = Parser::new(code).next() {
            assert_eq!(problem.name, "goal");
            assert_eq!(problem.domain, "init");
            assert_eq!(problem.objects, vec![TypedList { identifiers: vec!["action", "effect"], kind: Some("types") }]);
            assert_eq!(problem.init, vec![InitElement::Literal { name: "problem", objects: vec!["action"] }]);
            assert_eq!(problem.goal, Expr::And(vec![Expr::Literal { name: "domain", terms: vec![Term::Name("effect")] }]));
        } else {
            assert!(false); // Parser failed.
        }
        let err = Parser::new("(define (puzzle p))").next().unwrap().unwrap_err();
        assert_eq!(err.message, "Expected 'domain' or 'problem'.");
    }

    #[test]
    fn test_unknown_requirement() {
        let code = "(define (domain d) (:requirements :teleportation))";
        let err = Parser::new(code).next().unwrap().unwrap_err();
        assert_eq!(err.message, "Unknown requirement :teleportation.");
    }
}
