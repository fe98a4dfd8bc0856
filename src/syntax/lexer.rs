use logos::Logos;

use crate::error::{ParseError, parse_error::ParseResult};

/// Represents a flat lexical unit of the stripped input.
///
/// The lexeme only classifies its slice; the slice itself is kept next to it
/// in a [`Spanned`] value.
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Lexeme {
    /// A run of Latin or Greek letters (or `_`) with optional trailing digits,
    /// such as `x`, `sin`, `x2` or `Σ`.
    #[regex(r"[a-zA-Z_Α-Ωα-ω]+[0-9]*")]
    Name,
    /// Reserved single-glyph names: `∫` and `√`.
    #[token("∫")]
    #[token("√")]
    Glyph,
    /// A run of decimal digits.
    #[regex(r"[0-9]+")]
    Digits,
    /// `(`, `[` or `{`.
    #[token("(")]
    #[token("[")]
    #[token("{")]
    Open,
    /// `)`, `]` or `}`.
    #[token(")")]
    #[token("]")]
    #[token("}")]
    Close,
    /// Any other single character: operators, separators, punctuation.
    #[regex(r"[^a-zA-Z_Α-Ωα-ω0-9()\[\]{}∫√]")]
    Other,
}

/// A lexeme together with its text and byte position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spanned<'a> {
    /// The lexeme kind.
    pub lexeme:   Lexeme,
    /// The matched slice.
    pub text:     &'a str,
    /// Byte offset of the slice in the scanned input.
    pub position: usize,
}

impl Spanned<'_> {
    /// Returns the first character of the slice.
    ///
    /// Brackets and `Other` lexemes are always exactly one character long.
    #[must_use]
    pub fn glyph(&self) -> char {
        self.text.chars().next().unwrap_or_default()
    }
}

/// Scans the whole input into lexemes.
///
/// # Errors
/// Returns `UnexpectedCharacter` for input the lexer cannot classify.
///
/// # Example
/// ```
/// use mathtree::syntax::lexer::{Lexeme, scan};
///
/// let lexemes = scan("sin(x2)").unwrap();
/// let kinds: Vec<_> = lexemes.iter().map(|s| s.lexeme).collect();
///
/// assert_eq!(kinds,
///            [Lexeme::Name, Lexeme::Open, Lexeme::Name, Lexeme::Close]);
/// assert_eq!(lexemes[2].text, "x2");
/// ```
pub fn scan(input: &str) -> ParseResult<Vec<Spanned<'_>>> {
    let mut lexer = Lexeme::lexer(input);
    let mut lexemes = Vec::new();

    while let Some(lexeme) = lexer.next() {
        let position = lexer.span().start;
        let text = lexer.slice();
        match lexeme {
            Ok(lexeme) => lexemes.push(Spanned { lexeme,
                                                 text,
                                                 position }),
            Err(()) => {
                return Err(ParseError::UnexpectedCharacter { ch: text.chars()
                                                                     .next()
                                                                     .unwrap_or_default(),
                                                             position });
            },
        }
    }

    log::trace!("scanned {} lexemes from {input:?}", lexemes.len());
    Ok(lexemes)
}
