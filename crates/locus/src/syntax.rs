//! Artifact syntax gate.
//!
//! Generated test code is checked before any locator is verified; an artifact
//! that does not parse is rejected outright.

use rustpython_parser::{ast, Parse};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::result::LocusError;

/// Position and message of a syntax failure
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("line {line}, column {column}: {message}")]
pub struct SyntaxError {
    /// What went wrong
    pub message: String,
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
}

impl SyntaxError {
    fn at(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            line: position.line,
            column: position.column,
        }
    }
}

impl From<SyntaxError> for LocusError {
    fn from(err: SyntaxError) -> Self {
        Self::SyntaxInvalid {
            message: err.message,
            line: err.line,
            column: err.column,
        }
    }
}

/// A syntax checker for code artifacts
pub trait SyntaxCheck: Send + Sync {
    /// Check the artifact, reporting the first error found
    fn check(&self, code: &str) -> Result<(), SyntaxError>;
}

/// Accepts everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSyntaxCheck;

impl SyntaxCheck for NoSyntaxCheck {
    fn check(&self, _code: &str) -> Result<(), SyntaxError> {
        Ok(())
    }
}

/// Lexical check for Python test code: string literals terminate, and
/// brackets are balanced and correctly nested. Comments are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimiterCheck;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Position {
    line: usize,
    column: usize,
}

struct Cursor<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    position: Position,
}

impl<'a> Cursor<'a> {
    fn new(code: &'a str) -> Self {
        Self {
            chars: code.chars().peekable(),
            position: Position { line: 1, column: 1 },
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.position.line += 1;
            self.position.column = 1;
        } else {
            self.position.column += 1;
        }
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }
}

const fn closer_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

impl DelimiterCheck {
    fn string(cursor: &mut Cursor<'_>, quote: char, raw: bool, start: Position) -> Result<(), SyntaxError> {
        let triple = if cursor.peek() == Some(quote) {
            cursor.bump();
            if cursor.eat(quote) {
                true
            } else {
                // empty string literal
                return Ok(());
            }
        } else {
            false
        };

        let mut run = 0;
        while let Some(c) = cursor.bump() {
            match c {
                '\\' if !raw => {
                    cursor.bump();
                    run = 0;
                }
                '\\' => {
                    // raw strings still cannot end on a backslash-quote
                    if cursor.peek() == Some(quote) {
                        cursor.bump();
                    }
                    run = 0;
                }
                '\n' if !triple => {
                    return Err(SyntaxError::at("unterminated string literal", start));
                }
                c if c == quote => {
                    if !triple {
                        return Ok(());
                    }
                    run += 1;
                    if run == 3 {
                        return Ok(());
                    }
                }
                _ => run = 0,
            }
        }
        let message = if triple {
            "unterminated triple-quoted string literal"
        } else {
            "unterminated string literal"
        };
        Err(SyntaxError::at(message, start))
    }
}

impl SyntaxCheck for DelimiterCheck {
    fn check(&self, code: &str) -> Result<(), SyntaxError> {
        let mut cursor = Cursor::new(code);
        let mut stack: Vec<(char, Position)> = Vec::new();
        let mut prev_ident: Option<char> = None;
        let mut prefix = String::new();

        loop {
            let start = cursor.position;
            let Some(c) = cursor.bump() else { break };
            match c {
                '#' => {
                    while cursor.peek().is_some_and(|c| c != '\n') {
                        cursor.bump();
                    }
                }
                '"' | '\'' => {
                    let raw = prev_ident.is_some()
                        && prefix.len() <= 3
                        && prefix.chars().all(|p| "rRbBfFuU".contains(p))
                        && prefix.contains(['r', 'R']);
                    Self::string(&mut cursor, c, raw, start)?;
                }
                '(' | '[' | '{' => stack.push((c, start)),
                ')' | ']' | '}' => match stack.pop() {
                    Some((open, _)) if closer_for(open) == c => {}
                    Some((open, open_at)) => {
                        return Err(SyntaxError::at(
                            format!(
                                "closing '{c}' does not match opening '{open}' on line {}",
                                open_at.line
                            ),
                            start,
                        ));
                    }
                    None => return Err(SyntaxError::at(format!("unmatched '{c}'"), start)),
                },
                _ => {}
            }

            if c.is_alphanumeric() || c == '_' {
                if prev_ident.is_none() {
                    prefix.clear();
                }
                prefix.push(c);
                prev_ident = Some(c);
            } else {
                prev_ident = None;
                prefix.clear();
            }
        }

        match stack.pop() {
            Some((open, position)) => Err(SyntaxError::at(format!("'{open}' was never closed"), position)),
            None => Ok(()),
        }
    }
}

/// Full Python parse of the artifact.
///
/// Delimiters are checked first so that an unclosed bracket is reported where
/// it opens rather than at end of input.
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonSyntax;

impl SyntaxCheck for PythonSyntax {
    fn check(&self, code: &str) -> Result<(), SyntaxError> {
        DelimiterCheck.check(code)?;
        ast::Suite::parse(code, "<artifact>")
            .map(drop)
            .map_err(|err| {
                let position = position_of(code, usize::from(err.offset));
                SyntaxError::at(err.error.to_string(), position)
            })
    }
}

/// 1-based line and column of a byte offset
fn position_of(code: &str, offset: usize) -> Position {
    let before = code.get(..offset).unwrap_or(code);
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    Position {
        line: before.matches('\n').count() + 1,
        column: before[line_start..].chars().count() + 1,
    }
}
