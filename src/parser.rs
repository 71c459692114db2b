//! Translation clause parsing
//!
//! A translation string holds one or more clauses separated by `,` or `;`
//! outside brackets. Each clause maps an inclusive source index range onto
//! something:
//!
//! | Syntax | Clause |
//! |---|---|
//! | `a:b=c:d` | index range |
//! | `a:b=C1:C2` | color range |
//! | `a:b=%[r,g,b]:[r,g,b]` | desaturation, factors `0.0..=2.0` |
//! | `a:b=#[r,g,b]` | colourisation |
//! | `a:b=@amount C` | tint, `amount` in percent |
//!
//! A color `C` is `[r,g,b]`, a hex literal (`#F00`, `#FF0000`) or a CSS name.
//! Clauses may be wrapped in double quotes, as they are in lump definitions.

use thiserror::Error;

use crate::color::{parse_color, ColorError, PalEntry};
use crate::tokenizer::{tokenize, Spanned, Token};

/// Highest valid palette index in a clause.
pub const MAX_INDEX: i64 = 255;

/// Error while parsing translation text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    #[error("translation is empty")]
    Empty,
    #[error("unexpected character '{ch}' at offset {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("malformed number '{literal}' at offset {pos}")]
    BadNumber { literal: String, pos: usize },
    #[error("expected {expected} at offset {pos}, found {found}")]
    Expected { expected: &'static str, found: String, pos: usize },
    #[error("palette index {value} out of range at offset {pos}")]
    IndexOutOfRange { value: i64, pos: usize },
    #[error("bad color at offset {pos}: {error}")]
    Color { pos: usize, error: ColorError },
}

/// One parsed translation clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    IndexRange { start: u8, end: u8, pal1: u8, pal2: u8 },
    ColorRange { start: u8, end: u8, from: PalEntry, to: PalEntry },
    Desaturation { start: u8, end: u8, from: [f64; 3], to: [f64; 3] },
    Colourisation { start: u8, end: u8, color: PalEntry },
    Tint { start: u8, end: u8, amount: i32, color: PalEntry },
}

/// Split translation text into clause strings with their byte offsets.
///
/// Separators inside `[...]` are ignored. Surrounding double quotes and
/// whitespace are stripped; empty pieces are dropped.
pub fn split_clauses(text: &str) -> Vec<(usize, &str)> {
    let mut clauses = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth -= 1,
            ',' | ';' if depth <= 0 => {
                push_clause(&mut clauses, text, start, i);
                start = i + 1;
                depth = 0;
            }
            _ => {}
        }
    }
    push_clause(&mut clauses, text, start, text.len());

    clauses
}

fn push_clause<'a>(clauses: &mut Vec<(usize, &'a str)>, text: &'a str, start: usize, end: usize) {
    let piece = &text[start..end];
    let lead = piece.len() - piece.trim_start_matches(|c: char| c.is_whitespace() || c == '"').len();
    let trimmed = piece.trim_matches(|c: char| c.is_whitespace() || c == '"');
    if !trimmed.is_empty() {
        clauses.push((start + lead, trimmed));
    }
}

/// Parse every clause of a translation string.
///
/// Fails as a whole if any clause is malformed.
pub fn parse_translation(text: &str) -> Result<Vec<Clause>, TranslationError> {
    let pieces = split_clauses(text);
    if pieces.is_empty() {
        return Err(TranslationError::Empty);
    }
    pieces.into_iter().map(|(offset, clause)| parse_clause_at(clause, offset)).collect()
}

/// Parse a single clause.
///
/// # Examples
///
/// ```
/// use palremap::parser::{parse_clause, Clause};
///
/// let clause = parse_clause("0:15=#[255,0,0]").unwrap();
/// assert!(matches!(clause, Clause::Colourisation { start: 0, end: 15, .. }));
/// ```
pub fn parse_clause(text: &str) -> Result<Clause, TranslationError> {
    parse_clause_at(text, 0)
}

/// Parse a single clause whose text starts at `offset` in a longer string.
pub fn parse_clause_at(text: &str, offset: usize) -> Result<Clause, TranslationError> {
    let tokens = tokenize(text, offset)?;
    let mut cur = Cursor { tokens: &tokens, next: 0, end_pos: offset + text.len() };

    let start = cur.expect_index()?;
    cur.expect_punct(':', "':'")?;
    let end = cur.expect_index()?;
    cur.expect_punct('=', "'='")?;

    let clause = match cur.peek() {
        Some(Token::Punct('%')) => {
            cur.bump();
            let from = cur.expect_factor_triple()?;
            cur.expect_punct(':', "':'")?;
            let to = cur.expect_factor_triple()?;
            Clause::Desaturation { start, end, from, to }
        }
        Some(Token::Punct('#')) => {
            cur.bump();
            let color = cur.expect_bracket_color()?;
            Clause::Colourisation { start, end, color }
        }
        Some(Token::Punct('@')) => {
            cur.bump();
            let amount = cur.expect_int("tint amount")?;
            let color = cur.expect_color()?;
            Clause::Tint { start, end, amount: amount.clamp(i32::MIN as i64, i32::MAX as i64) as i32, color }
        }
        Some(Token::Int(_)) => {
            let pal1 = cur.expect_index()?;
            cur.expect_punct(':', "':'")?;
            let pal2 = cur.expect_index()?;
            Clause::IndexRange { start, end, pal1, pal2 }
        }
        _ => {
            let from = cur.expect_color()?;
            cur.expect_punct(':', "':'")?;
            let to = cur.expect_color()?;
            Clause::ColorRange { start, end, from, to }
        }
    };

    cur.expect_end()?;
    Ok(clause)
}

struct Cursor<'a> {
    tokens: &'a [Spanned],
    next: usize,
    end_pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.next).map(|s| &s.token)
    }

    fn pos(&self) -> usize {
        self.tokens.get(self.next).map(|s| s.pos).unwrap_or(self.end_pos)
    }

    fn bump(&mut self) -> Option<&'a Spanned> {
        let tok = self.tokens.get(self.next);
        if tok.is_some() {
            self.next += 1;
        }
        tok
    }

    fn error(&self, expected: &'static str) -> TranslationError {
        let found = self.peek().map(Token::describe).unwrap_or_else(|| "end of input".to_string());
        TranslationError::Expected { expected, found, pos: self.pos() }
    }

    fn expect_punct(&mut self, c: char, expected: &'static str) -> Result<(), TranslationError> {
        match self.peek() {
            Some(Token::Punct(p)) if *p == c => {
                self.bump();
                Ok(())
            }
            _ => Err(self.error(expected)),
        }
    }

    fn expect_int(&mut self, expected: &'static str) -> Result<i64, TranslationError> {
        match self.peek() {
            Some(Token::Int(n)) => {
                let n = *n;
                self.bump();
                Ok(n)
            }
            _ => Err(self.error(expected)),
        }
    }

    fn expect_index(&mut self) -> Result<u8, TranslationError> {
        let pos = self.pos();
        let value = self.expect_int("palette index")?;
        if !(0..=MAX_INDEX).contains(&value) {
            return Err(TranslationError::IndexOutOfRange { value, pos });
        }
        Ok(value as u8)
    }

    fn expect_number(&mut self) -> Result<f64, TranslationError> {
        match self.peek() {
            Some(Token::Int(n)) => {
                let n = *n as f64;
                self.bump();
                Ok(n)
            }
            Some(Token::Float(f)) => {
                let f = *f;
                self.bump();
                Ok(f)
            }
            _ => Err(self.error("number")),
        }
    }

    /// `[x, y, z]` of numbers
    fn expect_factor_triple(&mut self) -> Result<[f64; 3], TranslationError> {
        self.expect_punct('[', "'['")?;
        let r = self.expect_number()?;
        self.expect_punct(',', "','")?;
        let g = self.expect_number()?;
        self.expect_punct(',', "','")?;
        let b = self.expect_number()?;
        self.expect_punct(']', "']'")?;
        Ok([r, g, b])
    }

    /// `[r, g, b]` of integers, each clamped to 0..=255
    fn expect_bracket_color(&mut self) -> Result<PalEntry, TranslationError> {
        self.expect_punct('[', "'['")?;
        let r = self.expect_int("red component")?;
        self.expect_punct(',', "','")?;
        let g = self.expect_int("green component")?;
        self.expect_punct(',', "','")?;
        let b = self.expect_int("blue component")?;
        self.expect_punct(']', "']'")?;
        Ok(PalEntry::rgb(clamp_channel(r), clamp_channel(g), clamp_channel(b)))
    }

    fn expect_color(&mut self) -> Result<PalEntry, TranslationError> {
        let pos = self.pos();
        match self.peek() {
            Some(Token::Punct('[')) => self.expect_bracket_color(),
            Some(Token::Hex(s)) | Some(Token::Ident(s)) => {
                self.bump();
                let rgba = parse_color(s).map_err(|error| TranslationError::Color { pos, error })?;
                Ok(PalEntry::from(rgba).with_alpha(255))
            }
            _ => Err(self.error("color")),
        }
    }

    fn expect_end(&self) -> Result<(), TranslationError> {
        match self.peek() {
            None => Ok(()),
            Some(_) => Err(self.error("end of clause")),
        }
    }
}

fn clamp_channel(v: i64) -> u8 {
    v.clamp(0, 255) as u8
}
