use std::sync::Arc;

use crate::{
    assembler::{core::Assembler, hooks::Hooks},
    error::{ParseError, parse_error::ParseResult},
    expression::core::Expression,
    symbols::function::Function,
    syntax::{config::ParserConfig, term::tokenize},
    tree::NodeKind,
};

/// Reads text into [`Expression`]s.
///
/// A parser holds the configuration and the hooks; it can be reused for any
/// number of inputs.
///
/// ## Example
/// ```
/// use mathtree::Parser;
///
/// let parser = Parser::new().on_preprocess(|input| Some(input.replace("plus", "+")));
///
/// assert_eq!(parser.parse("2 plus 3").unwrap().evaluate(), 5.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
    hooks:  Hooks,
}

impl Parser {
    /// Creates a parser with the default configuration and no hooks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with a custom configuration.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the configuration does not validate.
    pub fn with_config(config: ParserConfig) -> ParseResult<Self> {
        config.validate()?;
        Ok(Self { config,
                  hooks: Hooks::default() })
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Rewrites the input before it is stripped and scanned. Returning `None`
    /// keeps the input as is.
    #[must_use]
    pub fn on_preprocess<F>(mut self, hook: F) -> Self
        where F: Fn(&str) -> Option<String> + Send + Sync + 'static
    {
        self.hooks.preprocess = Some(Arc::new(hook));
        self
    }

    /// Replaces the kind of freshly built fragments, before they are linked
    /// into the tree. This is the only way to give meaning to characters the
    /// parser does not know.
    ///
    /// ## Example
    /// ```
    /// use mathtree::{
    ///     Parser,
    ///     tree::{NodeKind, Operator},
    /// };
    ///
    /// let parser = Parser::new().on_node_added(|kind| {
    ///                               (kind == &NodeKind::Punctuation('%'))
    ///                                   .then_some(NodeKind::Operator(Operator::Div))
    ///                           });
    ///
    /// assert_eq!(parser.parse("9 % 3").unwrap().evaluate(), 3.0);
    /// assert!(mathtree::Parser::new().parse("9 % 3").is_err());
    /// ```
    #[must_use]
    pub fn on_node_added<F>(mut self, hook: F) -> Self
        where F: Fn(&NodeKind) -> Option<NodeKind> + Send + Sync + 'static
    {
        self.hooks.node_added = Some(Arc::new(hook));
        self
    }

    /// Supplies functions for names and arities no builtin answers for.
    #[must_use]
    pub fn on_function_lookup<F>(mut self, hook: F) -> Self
        where F: Fn(&str, usize) -> Option<Function> + Send + Sync + 'static
    {
        self.hooks.function_lookup = Some(Arc::new(hook));
        self
    }

    /// Observes the name of every public variable of each parsed expression.
    #[must_use]
    pub fn on_variable_discovered<F>(mut self, hook: F) -> Self
        where F: Fn(&str) + Send + Sync + 'static
    {
        self.hooks.variable_discovered = Some(Arc::new(hook));
        self
    }

    /// Parses `input`.
    ///
    /// # Errors
    /// Returns the first structural error found; no partial expression is
    /// ever returned.
    pub fn parse(&self, input: &str) -> ParseResult<Expression> {
        let input = self.hooks.preprocess(input).unwrap_or_else(|| input.to_string());
        let stripped = self.config.strip(&input);
        let terms = tokenize(&stripped)?;
        if terms.is_empty() {
            return Err(ParseError::NoArgument { position: 0 });
        }

        let (tree, root, symbols) = Assembler::new(&self.config, &self.hooks).assemble(&terms)?;
        let expression = Expression::from_parts(tree, root, symbols, self.config.clone());
        for name in expression.variables() {
            self.hooks.discover(name);
        }

        log::debug!("parsed {stripped:?}: {} variables, {} functions, {} functionals",
                    expression.variables().len(),
                    expression.functions().len(),
                    expression.functionals().len());
        Ok(expression)
    }
}
