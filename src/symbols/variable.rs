use std::{cell::Cell, collections::HashMap, fmt, sync::Arc};

use crate::{error::RuntimeError, symbols::constant::constant_value};

/// Handle of a variable slot inside its [`VariableTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// The slot index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// An external value producer, read every time the variable is read.
pub type Source = Arc<dyn Fn() -> f64 + Send + Sync>;

/// A named value slot shared by every node that refers to the name.
///
/// The value lives in a [`Cell`], so assigning through a shared reference is
/// immediately visible to every reader of the expression.
#[derive(Clone)]
pub struct Variable {
    name:     String,
    value:    Cell<f64>,
    source:   Option<Source>,
    constant: bool,
    private:  bool,
}

impl Variable {
    /// Creates a public variable holding `0`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self { name:     name.to_string(),
               value:    Cell::new(0.0),
               source:   None,
               constant: false,
               private:  false, }
    }

    /// Creates a constant.
    #[must_use]
    pub fn constant(name: &str, value: f64) -> Self {
        Self { constant: true,
               value: Cell::new(value),
               ..Self::new(name) }
    }

    /// Creates an iterator slot owned by a single functional.
    #[must_use]
    pub(crate) fn private(name: &str) -> Self {
        Self { private: true,
               ..Self::new(name) }
    }

    /// The variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reads the current value, calling the external source if there is one.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.source.as_ref().map_or_else(|| self.value.get(), |source| source())
    }

    /// Assigns a value.
    ///
    /// # Errors
    /// Returns `ConstantAssignment` for constants.
    pub fn set(&self, value: f64) -> Result<(), RuntimeError> {
        if self.constant {
            return Err(RuntimeError::ConstantAssignment { name: self.name.clone() });
        }
        self.value.set(value);
        Ok(())
    }

    /// Assigns without checks; used by functionals stepping their iterator.
    pub(crate) fn assign(&self, value: f64) {
        self.value.set(value);
    }

    /// Makes the variable read its value from `source`.
    pub(crate) fn set_source(&mut self, source: Source) {
        self.source = Some(source);
    }

    /// Whether the variable is one of the built-in constants.
    #[must_use]
    pub const fn is_constant(&self) -> bool {
        self.constant
    }

    /// Whether the value can be cached or folded, i.e. it is not produced by
    /// an external source at read time.
    #[must_use]
    pub const fn is_precomputable(&self) -> bool {
        self.source.is_none()
    }

    /// Whether the slot belongs to a single functional (its iterator).
    #[must_use]
    pub const fn is_private(&self) -> bool {
        self.private
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
         .field("name", &self.name)
         .field("value", &self.value.get())
         .field("external", &self.source.is_some())
         .field("constant", &self.constant)
         .field("private", &self.private)
         .finish()
    }
}

/// Variable slots of one expression.
///
/// Public variables and constants are indexed by name, so every reference to
/// a name resolves to the same slot. Private slots are reachable only through
/// the ids held by their functional and its nodes.
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    slots:   Vec<Variable>,
    by_name: HashMap<String, VarId>,
}

impl VariableTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds the public slot (or constant) named `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<VarId> {
        self.by_name.get(name).copied()
    }

    /// Resolves a name, creating the slot on first use. Built-in constant
    /// names create constants.
    ///
    /// ## Example
    /// ```
    /// use mathtree::symbols::variable::VariableTable;
    ///
    /// let mut table = VariableTable::new();
    /// let x = table.intern("x");
    ///
    /// assert_eq!(table.intern("x"), x);
    /// let pi = table.intern("pi");
/// assert!(table.get(pi).is_constant());
    /// ```
    pub fn intern(&mut self, name: &str) -> VarId {
        if let Some(id) = self.lookup(name) {
            return id;
        }
        let variable = constant_value(name).map_or_else(|| Variable::new(name),
                                                        |value| Variable::constant(name, value));
        self.insert(variable)
    }

    /// Adds `variable` under its name, or returns the existing slot of that
    /// name. Private variables always get a fresh slot.
    pub fn insert(&mut self, variable: Variable) -> VarId {
        if !variable.private
           && let Some(id) = self.lookup(&variable.name)
        {
            return id;
        }
        let id = VarId(self.slots.len());
        if !variable.private {
            self.by_name.insert(variable.name.clone(), id);
        }
        self.slots.push(variable);
        id
    }

    /// Adds a fresh private slot.
    pub fn push_private(&mut self, name: &str) -> VarId {
        self.insert(Variable::private(name))
    }

    /// Gets a slot.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this table.
    #[must_use]
    pub fn get(&self, id: VarId) -> &Variable {
        &self.slots[id.0]
    }

    /// Gets a slot mutably.
    pub(crate) fn get_mut(&mut self, id: VarId) -> &mut Variable {
        &mut self.slots[id.0]
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the table has no slot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates over slots with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (VarId, &Variable)> {
        self.slots.iter().enumerate().map(|(index, variable)| (VarId(index), variable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_slots_never_alias_public_ones() {
        let mut table = VariableTable::new();
        let public = table.intern("i");
        let first = table.push_private("i");
        let second = table.push_private("i");

        assert_ne!(public, first);
        assert_ne!(first, second);
        assert_eq!(table.lookup("i"), Some(public));
    }

    #[test]
    fn constants_refuse_assignment() {
        let mut table = VariableTable::new();
        let pi = table.intern("pi");

        assert!(matches!(table.get(pi).set(3.0),
                         Err(RuntimeError::ConstantAssignment { .. })));
    }

    #[test]
    fn external_sources_are_not_precomputable() {
        let mut variable = Variable::new("t");
        variable.set_source(Arc::new(|| 4.0));

        assert_eq!(variable.value(), 4.0);
        assert!(!variable.is_precomputable());
    }

    #[test]
    fn cloned_slots_are_independent() {
        let original = Variable::new("x");
        let copy = original.clone();
        copy.set(5.0).unwrap();

        assert_eq!(original.value(), 0.0);
        assert_eq!(copy.value(), 5.0);
    }
}
