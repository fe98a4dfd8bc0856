/// Structural errors.
///
/// Raised while tokenizing or assembling a tree: bracket mismatches, empty
/// argument groups, malformed functionals and unresolved names. A parse error
/// always means no expression was produced.
pub mod parse_error;
/// Errors raised after a successful parse.
///
/// Covers symbol lookups on a finished expression, compilation against a
/// parameter list and calls of compiled functions. Numeric problems are never
/// errors; they propagate as NaN or infinity.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
