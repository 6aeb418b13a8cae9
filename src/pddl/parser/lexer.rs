use std::iter::Peekable;
use std::str::CharIndices;

use super::tokens::{KeywordToken, Literal, OpToken, Span, Token, TokenKind};
use super::{Error, Position};
use KeywordToken::*;
use OpToken::*;
use TokenKind::*;

pub struct Lexer<'a> {
    text: &'a str,
    it: Peekable<CharIndices<'a>>,
    line: usize, // current source line, used for error reporting by Tokens
    col: usize,  // current source column, used for error reporting by Tokens
    previous: Option<TokenKind<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            it: text.char_indices().peekable(),
            line: 1,
            col: 1,
            previous: None,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let (offset, c) = self.next_char()?;
        let new_token = match c {
            ':' => Ok(Token { span: Span::new(self.line, self.col, 1), kind: Colon }),
            '(' => Ok(Token { span: Span::new(self.line, self.col, 1), kind: OpenParenthesis }),
            ')' => Ok(Token { span: Span::new(self.line, self.col, 1), kind: CloseParenthesis }),
            '[' => Ok(Token { span: Span::new(self.line, self.col, 1), kind: OpenBracket }),
            ']' => Ok(Token { span: Span::new(self.line, self.col, 1), kind: CloseBracket }),
            '?' => Ok(Token { span: Span::new(self.line, self.col, 1), kind: QuestionMark }),
            '=' => Ok(Token { span: Span::new(self.line, self.col, 1), kind: Equals }),
            '-' if matches!(self.it.peek(), Some((_, d)) if d.is_ascii_digit()) => self.number(offset),
            '-' => Ok(Token { span: Span::new(self.line, self.col, 1), kind: Minus }),
            c if c.is_whitespace() => {
                self.col += 1;
                return self.next();
            }
            c if c.is_alphabetic() || c == '_' => self.identifier(offset),
            c if c.is_ascii_digit() => self.number(offset),
            _ => Err(Error::new(Position::Span(Span::new(self.line, self.col, 1)), "Unexpected character.")),
        };
        match &new_token {
            Ok(t) => {
                self.col += t.span.len;
                self.previous = Some(t.kind);
            }
            Err(_) => {
                self.col += 1;
                self.previous = None;
            }
        }
        Some(new_token)
    }
}

impl<'a> Lexer<'a> {
    fn next_char(&mut self) -> Option<(usize, char)> {
        let c = self.it.next();
        match c {
            // Newline handler:
            Some((_, '\n')) => {
                self.col = 1;
                self.line += 1;
                self.next_char()
            }

            // Comments:
            Some((_, ';')) => {
                while self.it.next_if(|(_, c)| *c != '\n').is_some() {}
                self.next_char()
            }
            _ => c,
        }
    }

    fn slice_from(&mut self, offset: usize) -> &'a str {
        if let Some((end, _)) = self.it.peek() {
            &self.text[offset..*end]
        } else {
            &self.text[offset..]
        }
    }

    fn number(&mut self, offset: usize) -> Result<Token<'a>, Error> {
        let mut contains_dot = false;
        let mut len = 1;
        while let Some((_, c)) = self.it.next_if(|(_, c)| c.is_ascii_digit() || *c == '.') {
            len += 1;
            if c == '.' {
                contains_dot = true;
            }
        }
        let slice = self.slice_from(offset);
        let span = Span::new(self.line, self.col, len);
        if contains_dot {
            match slice.parse::<f64>() {
                Ok(literal) => Ok(Token { span, kind: Literal(Literal::F(literal)) }),
                Err(_) => Err(Error::new(Position::Span(span), "Unable to parse float.")),
            }
        } else {
            match slice.parse::<i64>() {
                Ok(literal) => Ok(Token { span, kind: Literal(Literal::I(literal)) }),
                Err(_) => Err(Error::new(Position::Span(span), "Unable to parse integer.")),
            }
        }
    }

    fn identifier(&mut self, offset: usize) -> Result<Token<'a>, Error> {
        let mut len = 1;
        while self
            .it
            .next_if(|(_, c)| c.is_alphanumeric() || *c == '_' || *c == '-')
            .is_some()
        {
            len += 1;
        }
        let slice = self.slice_from(offset);
        let span = Span::new(self.line, self.col, len);
        // Section names are only reserved after ':' and operators only after '('.
        // Anywhere else the same words are ordinary names.
        let lowered = slice.to_ascii_lowercase();
        let kind = match self.previous {
            Some(Colon) => section_keyword(&lowered).map(Keyword),
            Some(OpenParenthesis) => operator(&lowered).map(Op),
            _ => None,
        }
        .unwrap_or(Identifier(slice));
        Ok(Token { span, kind })
    }
}

fn section_keyword(word: &str) -> Option<KeywordToken> {
    let k = match word {
        "domain" => Domain,
        "requirements" => Requirements,
        "types" => Types,
        "constants" => Constants,
        "predicates" => Predicates,
        "functions" => Functions,
        "action" => Action,
        "parameters" => Parameters,
        "precondition" => Precondition,
        "effect" => Effect,
        "objects" => Objects,
        "init" => Init,
        "goal" => Goal,
        "metric" => Metric,
        _ => return None,
    };
    Some(k)
}

fn operator(word: &str) -> Option<OpToken> {
    let o = match word {
        "and" => And,
        "or" => Or,
        "not" => Not,
        "imply" => Imply,
        "exists" => Exists,
        "forall" => Forall,
        "when" => When,
        "increase" => Increase,
        _ => return None,
    };
    Some(o)
}
