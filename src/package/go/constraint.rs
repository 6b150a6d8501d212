//! Build constraint expressions.
//!
//! Supports both forms Go accepts in a file header:
//! `//go:build linux && (amd64 || arm64) && !cgo` and the older
//! `// +build linux,amd64 darwin` (space = OR, comma = AND).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    #[error("invalid build constraint: {0}")]
    Syntax(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Tag(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn eval(&self, has_tag: &impl Fn(&str) -> bool) -> bool {
        match self {
            Expr::Tag(tag) => has_tag(tag),
            Expr::Not(inner) => !inner.eval(has_tag),
            Expr::And(lhs, rhs) => lhs.eval(has_tag) && rhs.eval(has_tag),
            Expr::Or(lhs, rhs) => lhs.eval(has_tag) || rhs.eval(has_tag),
        }
    }

    fn and(lhs: Expr, rhs: Expr) -> Expr {
        Expr::And(Box::new(lhs), Box::new(rhs))
    }

    fn or(lhs: Expr, rhs: Expr) -> Expr {
        Expr::Or(Box::new(lhs), Box::new(rhs))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    Tag(String),
    Not,
    And,
    Or,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Tok>, ConstraintError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '!' => tokens.push(Tok::Not),
            '(' => tokens.push(Tok::LParen),
            ')' => tokens.push(Tok::RParen),
            '&' if chars.next_if_eq(&'&').is_some() => tokens.push(Tok::And),
            '|' if chars.next_if_eq(&'|').is_some() => tokens.push(Tok::Or),
            c if is_tag_char(c) => {
                let mut tag = String::from(c);
                while let Some(c) = chars.next_if(|&c| is_tag_char(c)) {
                    tag.push(c);
                }
                tokens.push(Tok::Tag(tag));
            }
            c => return Err(ConstraintError::Syntax(format!("unexpected '{}' in {:?}", c, input))),
        }
    }

    Ok(tokens)
}

fn is_tag_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

struct ExprParser {
    tokens: Vec<Tok>,
    pos: usize,
}

impl ExprParser {
    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Tok> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn or_expr(&mut self) -> Result<Expr, ConstraintError> {
        let mut lhs = self.and_expr()?;
        while self.peek() == Some(&Tok::Or) {
            self.advance();
            lhs = Expr::or(lhs, self.and_expr()?);
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Expr, ConstraintError> {
        let mut lhs = self.not_expr()?;
        while self.peek() == Some(&Tok::And) {
            self.advance();
            lhs = Expr::and(lhs, self.not_expr()?);
        }
        Ok(lhs)
    }

    fn not_expr(&mut self) -> Result<Expr, ConstraintError> {
        match self.advance() {
            Some(Tok::Not) => Ok(Expr::Not(Box::new(self.not_expr()?))),
            Some(Tok::LParen) => {
                let inner = self.or_expr()?;
                match self.advance() {
                    Some(Tok::RParen) => Ok(inner),
                    _ => Err(ConstraintError::Syntax("missing ')'".to_string())),
                }
            }
            Some(Tok::Tag(tag)) => Ok(Expr::Tag(tag)),
            Some(other) => Err(ConstraintError::Syntax(format!("unexpected {:?}", other))),
            None => Err(ConstraintError::Syntax("unexpected end of expression".to_string())),
        }
    }
}

/// Parse the expression following `//go:build`
pub fn parse_go_build(expr: &str) -> Result<Expr, ConstraintError> {
    let tokens = tokenize(expr)?;
    let mut parser = ExprParser { tokens, pos: 0 };
    let parsed = parser.or_expr()?;

    if parser.pos != parser.tokens.len() {
        return Err(ConstraintError::Syntax(format!("unexpected trailing tokens in {:?}", expr)));
    }
    Ok(parsed)
}

/// Parse the body of a `// +build` line, `None` when it has no options
pub fn parse_plus_build(line: &str) -> Result<Option<Expr>, ConstraintError> {
    let mut result: Option<Expr> = None;

    for option in line.split_whitespace() {
        let mut clause: Option<Expr> = None;
        for term in option.split(',') {
            let (negated, tag) = match term.strip_prefix('!') {
                Some(tag) => (true, tag),
                None => (false, term),
            };
            if tag.is_empty() || tag.starts_with('!') || !tag.chars().all(is_tag_char) {
                return Err(ConstraintError::Syntax(format!("invalid +build term {:?}", term)));
            }

            let mut expr = Expr::Tag(tag.to_string());
            if negated {
                expr = Expr::Not(Box::new(expr));
            }
            clause = Some(match clause {
                Some(prev) => Expr::and(prev, expr),
                None => expr,
            });
        }

        if let Some(clause) = clause {
            result = Some(match result {
                Some(prev) => Expr::or(prev, clause),
                None => clause,
            });
        }
    }

    Ok(result)
}
