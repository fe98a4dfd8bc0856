/// Built-in constants.
pub mod constant;
/// Functions: builtin tables and caller-supplied closures.
pub mod function;
/// Variable slots and the table resolving names to them.
pub mod variable;

use crate::{
    functional::{Functional, FunctionalId},
    symbols::{function::FunctionTable, variable::VariableTable},
};

/// Everything a tree refers to by id: variables, functions and functionals.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    /// Variable slots, public and private.
    pub variables:   VariableTable,
    /// Resolved functions.
    pub functions:   FunctionTable,
    /// Bound functional call sites.
    pub functionals: Vec<Functional>,
}

impl SymbolTable {
    /// Registers a functional call site.
    pub fn push_functional(&mut self, functional: Functional) -> FunctionalId {
        self.functionals.push(functional);
        FunctionalId(self.functionals.len() - 1)
    }

    /// Gets a functional by id.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this table.
    #[must_use]
    pub fn functional(&self, id: FunctionalId) -> &Functional {
        &self.functionals[id.0]
    }
}
