/// Composition of expressions under a binary operator.
///
/// Implements `+ - * /` from `std::ops` for owned and borrowed expressions,
/// plus [`Expression::pow`](core::Expression::pow). Both operands are copied
/// into a fresh arena and their symbol tables merged by name.
pub mod compose;
/// The [`Expression`](core::Expression) type and its symbol views.
///
/// # Responsibilities
/// - Owns the compacted tree, the symbol table and the configuration.
/// - Lists the variables, constants, functions and functionals referenced.
/// - Assigns variables and binds external value sources.
/// - Hands the expression to the compiler.
pub mod core;
/// Re-stringification with the configured separators.
pub mod display;
/// The tree-walking evaluator.
pub mod eval;
/// Constant folding.
pub mod fold;

pub use self::core::Expression;
