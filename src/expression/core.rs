use crate::{
    compiler::{lower::lower, program::CompiledFunction},
    error::{RuntimeError, parse_error::ParseResult},
    functional::FunctionalId,
    parser::Parser,
    symbols::{
        SymbolTable,
        function::FunctionId,
        variable::{VarId, Variable},
    },
    syntax::config::ParserConfig,
    tree::{NodeId, NodeKind, Tree},
};

/// A parsed expression: the tree, the symbols it refers to and the
/// configuration it was read with.
///
/// Every reference to a name shares one variable slot, so assigning through
/// [`Expression::set`] is seen by all of them. [`Clone`] copies the tree and
/// the slots; clones never alias each other.
///
/// ## Example
/// ```
/// use mathtree::Expression;
///
/// let expr = Expression::parse("x^2 + 2x + 1").unwrap();
/// expr.set("x", 3.0).unwrap();
///
/// assert_eq!(expr.evaluate(), 16.0);
/// assert_eq!(expr.variables(), ["x"]);
/// ```
#[derive(Debug, Clone)]
pub struct Expression {
    pub(crate) tree:    Tree,
    pub(crate) root:    NodeId,
    pub(crate) symbols: SymbolTable,
    pub(crate) config:  ParserConfig,
    variables:          Vec<VarId>,
    constants:          Vec<VarId>,
    functions:          Vec<FunctionId>,
    functionals:        Vec<FunctionalId>,
}

impl Expression {
    /// Parses `input` with the default configuration.
    ///
    /// # Errors
    /// See [`Parser::parse`].
    pub fn parse(input: &str) -> ParseResult<Self> {
        Parser::new().parse(input)
    }

    /// Wraps an assembled tree and classifies the symbols it references.
    pub(crate) fn from_parts(tree: Tree,
                             root: NodeId,
                             symbols: SymbolTable,
                             config: ParserConfig)
                             -> Self {
        let mut expression = Self { tree,
                                    root,
                                    symbols,
                                    config,
                                    variables: Vec::new(),
                                    constants: Vec::new(),
                                    functions: Vec::new(),
                                    functionals: Vec::new() };
        expression.classify();
        expression
    }

    /// Rebuilds the four symbol views from the nodes reachable from the root,
    /// in order of first appearance.
    pub(crate) fn classify(&mut self) {
        self.variables.clear();
        self.constants.clear();
        self.functions.clear();
        self.functionals.clear();

        for id in self.tree.preorder(self.root) {
            match self.tree.kind(id) {
                NodeKind::Variable(var) => {
                    let variable = self.symbols.variables.get(*var);
                    let list = if variable.is_constant() {
                        &mut self.constants
                    } else if variable.is_private() {
                        continue;
                    } else {
                        &mut self.variables
                    };
                    if !list.contains(var) {
                        list.push(*var);
                    }
                },
                NodeKind::Call { function, .. } if !self.functions.contains(function) => {
                    self.functions.push(*function);
                },
                NodeKind::Functional(functional) => self.functionals.push(*functional),
                _ => {},
            }
        }
    }

    /// Names of the public variables, constants excluded.
    #[must_use]
    pub fn variables(&self) -> Vec<&str> {
        self.variables.iter()
                      .map(|id| self.symbols.variables.get(*id).name())
                      .collect()
    }

    /// Names of the constants referenced, such as `pi`.
    #[must_use]
    pub fn constants(&self) -> Vec<&str> {
        self.constants.iter()
                      .map(|id| self.symbols.variables.get(*id).name())
                      .collect()
    }

    /// Names of the functions called.
    #[must_use]
    pub fn functions(&self) -> Vec<&str> {
        self.functions.iter()
                      .map(|id| self.symbols.functions.get(*id).name())
                      .collect()
    }

    /// Names of the functionals, one entry per call site.
    #[must_use]
    pub fn functionals(&self) -> Vec<&str> {
        self.functionals.iter()
                        .map(|id| self.symbols.functional(*id).name())
                        .collect()
    }

    fn find(&self, name: &str) -> Option<VarId> {
        self.variables
            .iter()
            .chain(&self.constants)
            .copied()
            .find(|id| self.symbols.variables.get(*id).name() == name)
    }

    /// Gets a public variable or constant by name.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.find(name).map(|id| self.symbols.variables.get(id))
    }

    /// Assigns a variable.
    ///
    /// # Errors
    /// - `UnknownVariable` if the expression does not reference `name`.
    /// - `ConstantAssignment` if `name` is a constant.
    pub fn set(&self, name: &str, value: f64) -> Result<(), RuntimeError> {
        self.variable(name)
            .ok_or_else(|| RuntimeError::UnknownVariable { name: name.to_string() })?
            .set(value)
    }

    /// Makes a variable read its value from `source` on every evaluation.
    /// The variable is no longer precomputable, so constant folding leaves it
    /// alone.
    ///
    /// ## Example
    /// ```
    /// use mathtree::Expression;
    ///
    /// let mut expr = Expression::parse("2t").unwrap();
    /// expr.bind_external("t", || 21.0).unwrap();
    ///
    /// assert_eq!(expr.evaluate(), 42.0);
    /// ```
    ///
    /// # Errors
    /// The same as [`Expression::set`].
    pub fn bind_external<F>(&mut self, name: &str, source: F) -> Result<(), RuntimeError>
        where F: Fn() -> f64 + Send + Sync + 'static
    {
        let id = self.find(name)
                     .ok_or_else(|| RuntimeError::UnknownVariable { name: name.to_string() })?;
        let variable = self.symbols.variables.get_mut(id);
        if variable.is_constant() {
            return Err(RuntimeError::ConstantAssignment { name: name.to_string() });
        }
        variable.set_source(std::sync::Arc::new(source));
        Ok(())
    }

    /// Assigns every binding, then evaluates.
    ///
    /// # Errors
    /// The first error of [`Expression::set`].
    pub fn evaluate_with(&self, bindings: &[(&str, f64)]) -> Result<f64, RuntimeError> {
        for (name, value) in bindings {
            self.set(name, *value)?;
        }
        Ok(self.evaluate())
    }

    /// Lowers the expression to a stack program taking `parameters` in order.
    ///
    /// Constants are embedded; every other variable must be listed.
    ///
    /// ## Example
    /// ```
    /// use mathtree::Expression;
    ///
    /// let expr = Expression::parse("summ{i=1..n}{i*x}").unwrap();
    /// let f = expr.compile(&["x", "n"]).unwrap();
    ///
    /// assert_eq!(f.call(&[2.0, 4.0]).unwrap(), 20.0);
    /// assert!(expr.compile(&["x"]).is_err());
    /// ```
    ///
    /// # Errors
    /// Returns `UnboundParameter` for a variable missing from `parameters`.
    pub fn compile(&self, parameters: &[&str]) -> Result<CompiledFunction, RuntimeError> {
        lower(self, parameters)
    }

    /// The node arena.
    #[must_use]
    pub const fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The root node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// The symbols nodes refer to, including slots no longer referenced.
    #[must_use]
    pub const fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// The configuration used to read and print the expression.
    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }
}
