//! Restricted arithmetic evaluation.
//!
//! Only numeric literals, `+ - * / **` and parentheses are understood. The grammar mirrors
//! the usual precedence of those operators, with `**` binding tighter than a unary sign on
//! its left and associating to the right:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := factor (('*' | '/') factor)*
//! factor  := ('+' | '-') factor | power
//! power   := primary ('**' factor)?
//! primary := NUMBER | '(' expr ')'
//! ```
use serde_json::{json, Value};

use super::tool::{ToolParameter, ToolSpec};
use crate::errors::{AgentError, AgentResult};

pub const TOOL_NAME: &str = "calculate";

const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Power,
    LParen,
    RParen,
}

fn invalid(message: impl Into<String>) -> AgentError {
    AgentError::InvalidExpression(message.into())
}

fn tokenize(input: &str) -> AgentResult<Vec<(usize, Token)>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let start = i;
        let token = match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '/' => {
                if chars.get(i + 1) == Some(&'/') {
                    return Err(invalid(format!(
                        "unsupported operator '//' at position {start}"
                    )));
                }
                Token::Slash
            }
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    i += 1;
                    Token::Power
                } else {
                    Token::Star
                }
            }
            '(' => Token::LParen,
            ')' => Token::RParen,
            c if c.is_ascii_digit() || c == '.' => {
                let end = scan_number(&chars, i);
                let literal: String = chars[i..end].iter().collect();
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| invalid(format!("malformed number '{literal}' at position {start}")))?;
                i = end;
                tokens.push((start, Token::Number(value)));
                continue;
            }
            other => {
                return Err(invalid(format!(
                    "unexpected character '{other}' at position {start}"
                )))
            }
        };
        tokens.push((start, token));
        i += 1;
    }

    Ok(tokens)
}

/// Returns the end index of the numeric literal starting at `start`
fn scan_number(chars: &[char], start: usize) -> usize {
    let mut i = start;
    while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
        i += 1;
    }
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).map(|(_, t)| *t)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    fn position(&self) -> String {
        match self.tokens.get(self.pos) {
            Some((offset, _)) => format!("position {offset}"),
            None => "end of input".to_string(),
        }
    }

    fn enter(&mut self) -> AgentResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(invalid("expression is nested too deeply"));
        }
        Ok(())
    }

    fn expr(&mut self) -> AgentResult<f64> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.advance();
                    value += self.term()?;
                }
                Some(Token::Minus) => {
                    self.advance();
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> AgentResult<f64> {
        let mut value = self.factor()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.advance();
                    value *= self.factor()?;
                }
                Some(Token::Slash) => {
                    self.advance();
                    let divisor = self.factor()?;
                    if divisor == 0.0 {
                        return Err(invalid("division by zero"));
                    }
                    value /= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    fn factor(&mut self) -> AgentResult<f64> {
        self.enter()?;
        let value = match self.peek() {
            Some(Token::Plus) => {
                self.advance();
                self.factor()?
            }
            Some(Token::Minus) => {
                self.advance();
                -self.factor()?
            }
            _ => self.power()?,
        };
        self.depth -= 1;
        Ok(value)
    }

    fn power(&mut self) -> AgentResult<f64> {
        let base = self.primary()?;
        if self.peek() == Some(Token::Power) {
            self.advance();
            let exponent = self.factor()?;
            if base == 0.0 && exponent < 0.0 {
                return Err(invalid("zero cannot be raised to a negative power"));
            }
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> AgentResult<f64> {
        let at = self.position();
        match self.advance() {
            Some(Token::Number(value)) => Ok(value),
            Some(Token::LParen) => {
                self.enter()?;
                let value = self.expr()?;
                if self.peek() != Some(Token::RParen) {
                    return Err(invalid(format!("expected ')' at {}", self.position())));
                }
                self.advance();
                self.depth -= 1;
                Ok(value)
            }
            Some(_) => Err(invalid(format!("unexpected operator at {at}"))),
            None => Err(invalid("unexpected end of input")),
        }
    }
}

/// Evaluate an arithmetic expression
pub fn calculate(expression: &str) -> AgentResult<f64> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(invalid("expression is empty"));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if parser.pos < parser.tokens.len() {
        return Err(invalid(format!("unexpected token at {}", parser.position())));
    }
    if !value.is_finite() {
        return Err(invalid("result is not a finite number"));
    }
    Ok(value)
}

pub fn tool() -> ToolSpec {
    ToolSpec::new(
        TOOL_NAME,
        "Evaluate an arithmetic expression using + - * / ** and parentheses",
        vec![ToolParameter::new(
            "expression",
            "The arithmetic expression, e.g. 4 * 7 / 3",
        )],
        |args: &Value| {
            let expression = args["expression"].as_str().unwrap_or_default();
            Ok(json!(calculate(expression)?))
        },
    )
}
