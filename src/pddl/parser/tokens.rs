use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub line: usize,
    pub col: usize,
    pub len: usize,
}

impl Span {
    pub fn new(line: usize, col: usize, len: usize) -> Self {
        Self { line, col, len }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Literal {
    I(i64),
    F(f64),
}

impl Literal {
    pub fn value(&self) -> f64 {
        match self {
            Literal::I(i) => *i as f64,
            Literal::F(f) => *f,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::I(i) => write!(f, "{}", i),
            Literal::F(fv) => write!(f, "{}", fv),
        }
    }
}

/// Section and structural keywords. Matched case-insensitively by the lexer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeywordToken {
    Domain,
    Requirements,
    Types,
    Constants,
    Predicates,
    Functions,
    Action,
    Parameters,
    Precondition,
    Effect,
    Objects,
    Init,
    Goal,
    Metric,
}

/// Logical and effect operators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OpToken {
    And,
    Or,
    Not,
    Imply,
    Exists,
    Forall,
    When,
    Increase,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TokenKind<'a> {
    OpenParenthesis,
    CloseParenthesis,
    OpenBracket,
    CloseBracket,
    Colon,
    QuestionMark,
    Minus,
    Equals,
    Identifier(&'a str),
    Literal(Literal),
    Keyword(KeywordToken),
    Op(OpToken),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Token<'a> {
    pub span: Span,
    pub kind: TokenKind<'a>,
}

impl fmt::Display for KeywordToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use KeywordToken::*;
        let s = match self {
            Domain => "domain",
            Requirements => "requirements",
            Types => "types",
            Constants => "constants",
            Predicates => "predicates",
            Functions => "functions",
            Action => "action",
            Parameters => "parameters",
            Precondition => "precondition",
            Effect => "effect",
            Objects => "objects",
            Init => "init",
            Goal => "goal",
            Metric => "metric",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for OpToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use OpToken::*;
        let s = match self {
            And => "and",
            Or => "or",
            Not => "not",
            Imply => "imply",
            Exists => "exists",
            Forall => "forall",
            When => "when",
            Increase => "increase",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for TokenKind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind::*;
        match self {
            OpenParenthesis => write!(f, "("),
            CloseParenthesis => write!(f, ")"),
            OpenBracket => write!(f, "["),
            CloseBracket => write!(f, "]"),
            Colon => write!(f, ":"),
            QuestionMark => write!(f, "?"),
            Minus => write!(f, "-"),
            Equals => write!(f, "="),
            Identifier(s) => write!(f, "{}", s),
            Literal(l) => write!(f, "{}", l),
            Keyword(k) => write!(f, "{}", k),
            Op(o) => write!(f, "{}", o),
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}
