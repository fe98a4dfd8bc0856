use thiserror::Error;

/// Represents all errors that can occur on an already parsed expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The expression has no variable with this name.
    #[error("Unknown variable '{name}'.")]
    UnknownVariable {
        /// The name of the variable.
        name: String,
    },
    /// Tried to assign a value to a constant such as `pi`.
    #[error("Cannot assign to constant '{name}'.")]
    ConstantAssignment {
        /// The name of the constant.
        name: String,
    },
    /// A variable is referenced but absent from the compiled signature.
    #[error("Variable '{name}' is not a parameter of the compiled function.")]
    UnboundParameter {
        /// The name of the variable.
        name: String,
    },
    /// A compiled function was called with the wrong number of arguments.
    #[error("Argument count mismatch: expected {expected}, found {found}.")]
    ArgumentCountMismatch {
        /// Number of declared parameters.
        expected: usize,
        /// Number of supplied arguments.
        found:    usize,
    },
}
