use thiserror::Error;

/// Represents all errors that can occur during tokenizing or tree assembly.
///
/// Positions are byte offsets into the input after preprocessing and
/// character stripping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// An opening bracket has no matching closing bracket of the same kind.
    #[error("Error at position {position}: Bracket '{bracket}' is never closed.")]
    UnmatchedBracket {
        /// The opening glyph.
        bracket:  char,
        /// Where the bracket was found.
        position: usize,
    },
    /// A closing bracket appeared without an opening one.
    #[error("Error at position {position}: Unexpected closing bracket '{bracket}'.")]
    UnexpectedClosingBracket {
        /// The closing glyph.
        bracket:  char,
        /// Where the bracket was found.
        position: usize,
    },
    /// An argument group (or the whole input) contains nothing.
    #[error("Error at position {position}: No argument defined.")]
    NoArgument {
        /// Position of the enclosing block, or of the separator that ends the
        /// empty group.
        position: usize,
    },
    /// A character has no meaning at its position and no hook replaced it.
    #[error("Error at position {position}: Unexpected character '{ch}'.")]
    UnexpectedCharacter {
        /// The offending character.
        ch:       char,
        /// Where it was found.
        position: usize,
    },
    /// An operator lacks one of its operands.
    #[error("Operator '{operator}' is missing an operand.")]
    MissingOperand {
        /// The operator glyph.
        operator: String,
    },
    /// A functional's parameter block has no `iterator = min..max` equation.
    #[error("Error at position {position}: Functional '{functional}' has no iterator. Example: summ{{i=1..5}}{{i}}")]
    MissingIterator {
        /// Name the functional was called with.
        functional: String,
        /// Position of the functional term.
        position:   usize,
    },
    /// The iterator equation of a functional is not bound to an interval.
    #[error("Error at position {position}: Functional '{functional}' expects a domain of the form min..max.")]
    InvalidDomain {
        /// Name the functional was called with.
        functional: String,
        /// Position of the functional term.
        position:   usize,
    },
    /// No builtin matches and the lookup hook did not supply a function.
    #[error("Error at position {position}: Unknown function '{name}' taking {arity} argument(s).")]
    UnknownFunction {
        /// The function name.
        name:     String,
        /// Number of arguments at the call site.
        arity:    usize,
        /// Position of the call.
        position: usize,
    },
    /// A two-block call names no known functional.
    #[error("Error at position {position}: Unknown functional '{name}'.")]
    UnknownFunctional {
        /// The functional name.
        name:     String,
        /// Position of the call.
        position: usize,
    },
    /// A number literal could not be represented.
    #[error("Error at position {position}: Invalid number '{literal}'.")]
    InvalidNumber {
        /// The literal text.
        literal:  String,
        /// Where it was found.
        position: usize,
    },
    /// The parser configuration is inconsistent.
    #[error("Invalid parser configuration: {details}.")]
    InvalidConfig {
        /// What is wrong with it.
        details: String,
    },
}

/// Result type used by the tokenizer and the assembler.
pub type ParseResult<T> = Result<T, ParseError>;
