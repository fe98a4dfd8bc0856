//! # mathtree
//!
//! mathtree reads mathematical expressions such as `2x^2 + sin(pi/4)` or
//! `∫(x=0..1){x^2}` into evaluable trees. Trees can be evaluated directly,
//! compiled to a stack program, composed with arithmetic operators and
//! printed back as text.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::error::parse_error::ParseResult;

/// Builds trees out of terms.
///
/// This module turns the term sequence produced by the tokenizer into an
/// arena tree. Each fragment is inserted next to the previous one by
/// precedence climbing, so no grammar tables are involved.
///
/// # Responsibilities
/// - Splits blocks into argument groups and chains the group roots.
/// - Resolves names to variables, functions and functionals.
/// - Runs the node-added and function-lookup hooks.
/// - Validates that every operator received its operands.
pub mod assembler;
/// Lowers expressions to stack programs.
///
/// The compiled backend runs the same numeric primitives as the tree walker,
/// so both produce identical results for the same inputs.
pub mod compiler;
/// Provides the error types for parsing and evaluation.
///
/// Parsing fails with a [`ParseError`] that locates the problem by byte
/// offset or name. Operations on a finished expression fail with a
/// [`RuntimeError`].
pub mod error;
/// The expression facade.
///
/// # Responsibilities
/// - Evaluates trees and lists the symbols they reference.
/// - Assigns variables and binds external sources.
/// - Composes, folds, prints and compiles expressions.
pub mod expression;
/// Summation and integration over a bound iterator.
///
/// A functional call such as `summ{i=1..n}{i^2}` owns a private iterator
/// slot. Binding finds the iterator and domain among its parameters and
/// rewrites them into a fixed layout both backends read.
pub mod functional;
/// The configurable entry point of a parse.
pub mod parser;
/// Symbol tables.
///
/// Variables, functions and functionals are stored once per expression and
/// referenced from nodes by id.
pub mod symbols;
/// Turns raw text into terms.
///
/// This module strips the input, scans it into lexemes with `logos`, and
/// groups the lexemes into nested terms with matched brackets.
///
/// # Responsibilities
/// - Holds the parser configuration.
/// - Reports bracket mismatches and empty groups with their byte offset.
pub mod syntax;
/// The arena tree.
///
/// Nodes live in one vector and refer to each other by index. Splicing a node
/// above or below another is a matter of reassigning indices.
pub mod tree;
/// General utilities for safe numeric conversion.
///
/// These helpers convert between `usize` and `f64` without silent data loss,
/// which matters wherever a step count is derived from floating-point bounds.
pub mod util;

pub use crate::{
    compiler::CompiledFunction,
    error::{ParseError, RuntimeError},
    expression::Expression,
    parser::Parser,
    syntax::config::ParserConfig,
};

/// Parses and evaluates an expression with the default configuration.
///
/// Variables read as `0`.
///
/// # Errors
/// Returns the [`ParseError`] of the parse.
///
/// # Examples
/// ```
/// use mathtree::evaluate;
///
/// assert_eq!(evaluate("2 + 3 * 4").unwrap(), 14.0);
/// assert_eq!(evaluate("summ{i=1..4}{i^2}").unwrap(), 30.0);
///
/// // Unbalanced brackets never produce a value.
/// assert!(evaluate("(1 + 2").is_err());
/// ```
pub fn evaluate(source: &str) -> ParseResult<f64> {
    Ok(Expression::parse(source)?.evaluate())
}
