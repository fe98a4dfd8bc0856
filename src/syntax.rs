/// Parser configuration.
///
/// Holds the configurable glyphs (decimal and argument separators), the set of
/// characters stripped before scanning, and the quadrature settings handed to
/// integrals at bind time.
pub mod config;
/// The lexer turns stripped input into flat lexemes.
///
/// Lexemes carry no structure: brackets are reported individually and names,
/// digit runs and single characters are not yet interpreted.
pub mod lexer;
/// The term tokenizer builds the recursive term sequence.
///
/// Brackets are matched per kind and their content is tokenized recursively
/// into block terms. Names followed by blocks are promoted to function and
/// functional terms.
pub mod term;
