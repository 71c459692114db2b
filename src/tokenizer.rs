//! Token extraction from translation strings
//!
//! Splits clause text such as `112:127=[255,0,0]:#400000` into integers,
//! floats, punctuation, hex color literals and identifiers.

use crate::parser::TranslationError;

/// A single lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Int(i64),
    Float(f64),
    /// One of `: = [ ] , % @ # "`
    Punct(char),
    /// `#` immediately followed by hex digits, e.g. `#FF0000`
    Hex(String),
    /// A bare word, used for named colors
    Ident(String),
}

impl Token {
    /// Short human-readable description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Int(n) => format!("integer {}", n),
            Token::Float(f) => format!("number {}", f),
            Token::Punct(c) => format!("'{}'", c),
            Token::Hex(s) => format!("color {}", s),
            Token::Ident(s) => format!("'{}'", s),
        }
    }
}

/// A token with the byte offset it starts at.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub pos: usize,
}

/// Tokenize a translation string.
///
/// `base` is added to every reported position, so clause text cut out of a
/// longer string reports offsets into the original.
///
/// # Examples
///
/// ```
/// use palremap::tokenizer::{tokenize, Token};
///
/// let tokens = tokenize("0:15=#[255,0,0]", 0).unwrap();
/// assert_eq!(tokens[0].token, Token::Int(0));
/// assert_eq!(tokens[4].token, Token::Punct('#'));
/// assert_eq!(tokens.len(), 12);
/// ```
pub fn tokenize(text: &str, base: usize) -> Result<Vec<Spanned>, TranslationError> {
    let mut tokens = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;

        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let token = if c.is_ascii_digit() || c == b'.' || (c == b'-' && next_is_number(bytes, i + 1)) {
            i += 1;
            while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                i += 1;
            }
            let literal = &text[start..i];
            number_token(literal, base + start)?
        } else if c == b'#' && i + 1 < bytes.len() && bytes[i + 1].is_ascii_hexdigit() {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_alphanumeric() {
                i += 1;
            }
            Token::Hex(text[start..i].to_string())
        } else if c.is_ascii_alphabetic() || c == b'_' {
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'-') {
                i += 1;
            }
            Token::Ident(text[start..i].to_string())
        } else if matches!(c, b':' | b'=' | b'[' | b']' | b',' | b'%' | b'@' | b'#' | b'"') {
            i += 1;
            Token::Punct(c as char)
        } else {
            // Report the full character, not a UTF-8 continuation byte
            let ch = text[start..].chars().next().unwrap_or('?');
            return Err(TranslationError::UnexpectedChar { ch, pos: base + start });
        };

        tokens.push(Spanned { token, pos: base + start });
    }

    Ok(tokens)
}

fn next_is_number(bytes: &[u8], i: usize) -> bool {
    i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.')
}

fn number_token(literal: &str, pos: usize) -> Result<Token, TranslationError> {
    if literal.contains('.') {
        literal.parse::<f64>().map(Token::Float).map_err(|_| TranslationError::BadNumber {
            literal: literal.to_string(),
            pos,
        })
    } else {
        literal.parse::<i64>().map(Token::Int).map_err(|_| TranslationError::BadNumber {
            literal: literal.to_string(),
            pos,
        })
    }
}
