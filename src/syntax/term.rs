use crate::{
    error::{ParseError, parse_error::ParseResult},
    syntax::lexer::{Lexeme, Spanned, scan},
};

/// The content of a bracket pair, tokenized recursively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Opening glyph: `(`, `[` or `{`.
    pub open:     char,
    /// Closing glyph matching `open`.
    pub close:    char,
    /// Terms between the brackets.
    pub terms:    Vec<Term>,
    /// Byte position of the opening glyph.
    pub position: usize,
}

/// Represents a lexical term.
///
/// Terms form a recursive sequence: every bracket pair of the input becomes a
/// [`Block`] holding the terms it encloses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// A single character without structure: operators, separators and
    /// anything else.
    Char {
        /// The character.
        ch:       char,
        /// Byte position in the stripped input.
        position: usize,
    },
    /// A run of decimal digits, kept as text so leading zeros of fractional
    /// parts survive.
    Number {
        /// The digits.
        digits:   String,
        /// Byte position in the stripped input.
        position: usize,
    },
    /// A name such as `x`, `pi` or `x2`.
    Name {
        /// The name.
        name:     String,
        /// Byte position in the stripped input.
        position: usize,
    },
    /// A bracket pair not preceded by a name.
    Block(Block),
    /// A name immediately followed by a bracket pair: `sin(x)`.
    Function {
        /// The function name.
        name:     String,
        /// The argument block.
        block:    Block,
        /// Byte position of the name.
        position: usize,
    },
    /// A function term followed by a `{...}` block: `summ{i=1..5}{i}`.
    Functional {
        /// The functional name.
        name:     String,
        /// The parameter block.
        params:   Block,
        /// The core block.
        core:     Block,
        /// Byte position of the name.
        position: usize,
    },
}

impl Block {
    /// Reproduces the text of the block, brackets included.
    #[must_use]
    pub fn text(&self) -> String {
        let mut text = String::new();
        text.push(self.open);
        for term in &self.terms {
            text.push_str(&term.text());
        }
        text.push(self.close);
        text
    }
}

impl Term {
    /// Reproduces the text the term was read from.
    ///
    /// ## Example
    /// ```
    /// use mathtree::syntax::term::tokenize;
    ///
    /// let terms = tokenize("int{x=0..1}{x^2}").unwrap();
    /// let text: String = terms.iter().map(|t| t.text()).collect();
    ///
    /// assert_eq!(terms.len(), 1);
    /// assert_eq!(text, "int{x=0..1}{x^2}");
    /// ```
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Char { ch, .. } => ch.to_string(),
            Self::Number { digits, .. } => digits.clone(),
            Self::Name { name, .. } => name.clone(),
            Self::Block(block) => block.text(),
            Self::Function { name, block, .. } => format!("{name}{}", block.text()),
            Self::Functional { name, params, core, .. } => {
                format!("{name}{}{}", params.text(), core.text())
            },
        }
    }

    /// Gets the byte position of the term.
    #[must_use]
    pub const fn position(&self) -> usize {
        match self {
            Self::Char { position, .. }
            | Self::Number { position, .. }
            | Self::Name { position, .. }
            | Self::Function { position, .. }
            | Self::Functional { position, .. } => *position,
            Self::Block(block) => block.position,
        }
    }

    /// Returns the character of a `Char` term.
    #[must_use]
    pub const fn as_char(&self) -> Option<char> {
        match self {
            Self::Char { ch, .. } => Some(*ch),
            _ => None,
        }
    }
}

/// Returns the closing glyph for an opening bracket.
#[must_use]
pub const fn closing_bracket(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

/// Tokenizes stripped input into a term sequence.
///
/// # Errors
/// - `UnmatchedBracket` if an opening bracket has no closing bracket of the
///   same kind.
/// - `UnexpectedClosingBracket` for a closing bracket without an opener.
///
/// # Example
/// ```
/// use mathtree::syntax::term::{Term, tokenize};
///
/// let terms = tokenize("3(x+1)").unwrap();
///
/// assert!(matches!(terms[0], Term::Number { .. }));
/// assert!(matches!(terms[1], Term::Block(_)));
/// assert!(tokenize("(2+3").is_err());
/// ```
pub fn tokenize(input: &str) -> ParseResult<Vec<Term>> {
    let lexemes = scan(input)?;
    tokenize_lexemes(&lexemes)
}

/// Builds terms out of a slice of lexemes, recursing into every bracket pair.
fn tokenize_lexemes(lexemes: &[Spanned<'_>]) -> ParseResult<Vec<Term>> {
    let mut terms: Vec<Term> = Vec::new();
    let mut index = 0;

    while index < lexemes.len() {
        let current = lexemes[index];
        match current.lexeme {
            Lexeme::Name | Lexeme::Glyph => terms.push(Term::Name { name:     current.text
                                                                                  .to_string(),
                                                                    position: current.position, }),
            Lexeme::Digits => terms.push(Term::Number { digits:   current.text.to_string(),
                                                        position: current.position, }),
            Lexeme::Other => terms.push(Term::Char { ch:       current.glyph(),
                                                     position: current.position, }),
            Lexeme::Close => {
                return Err(ParseError::UnexpectedClosingBracket { bracket:  current.glyph(),
                                                                  position: current.position, });
            },
            Lexeme::Open => {
                let open = current.glyph();
                let end = matching_close(lexemes, index)?;
                let block = Block { open,
                                    close: closing_bracket(open).unwrap_or(open),
                                    terms: tokenize_lexemes(&lexemes[index + 1..end])?,
                                    position: current.position };
                push_block(&mut terms, block);
                index = end;
            },
        }
        index += 1;
    }

    Ok(terms)
}

/// Finds the index of the bracket closing the one at `open_index`.
///
/// Only brackets of the same kind are counted; other kinds are balanced
/// independently when the enclosed lexemes are tokenized.
fn matching_close(lexemes: &[Spanned<'_>], open_index: usize) -> ParseResult<usize> {
    let opener = lexemes[open_index];
    let open = opener.glyph();
    let close = closing_bracket(open).unwrap_or(open);
    let mut depth = 0usize;

    for (offset, spanned) in lexemes[open_index..].iter().enumerate() {
        let glyph = spanned.glyph();
        if spanned.lexeme == Lexeme::Open && glyph == open {
            depth += 1;
        } else if spanned.lexeme == Lexeme::Close && glyph == close {
            depth -= 1;
            if depth == 0 {
                return Ok(open_index + offset);
            }
        }
    }

    Err(ParseError::UnmatchedBracket { bracket:  open,
                                       position: opener.position, })
}

/// Appends a block, promoting a preceding name to a function term and a
/// preceding function term to a functional term.
fn push_block(terms: &mut Vec<Term>, block: Block) {
    match terms.pop() {
        Some(Term::Name { name, position }) => {
            terms.push(Term::Function { name,
                                        block,
                                        position });
        },
        Some(Term::Function { name,
                              block: params,
                              position, })
            if block.open == '{' =>
        {
            terms.push(Term::Functional { name,
                                          params,
                                          core: block,
                                          position });
        },
        Some(previous) => {
            terms.push(previous);
            terms.push(Term::Block(block));
        },
        None => terms.push(Term::Block(block)),
    }
}
