use crate::{
    assembler::core::Assembler,
    error::{ParseError, parse_error::ParseResult},
    functional::{
        FunctionalKind,
        bind::{CallSite, bind},
    },
    symbols::function::builtin,
    syntax::term::{Block, Term},
    tree::{NodeId, NodeKind, Operator},
};

/// The glyph doubled to form an interval, independent of the decimal
/// separator.
const RANGE_GLYPH: char = '.';

impl Assembler<'_> {
    /// Builds the fragment starting at `terms[index]`.
    ///
    /// # Returns
    /// The root of the fragment and the number of terms it consumed: three for
    /// a number with fraction, two for a leading fraction or a range glyph,
    /// one otherwise.
    pub(super) fn fragment(&mut self, terms: &[Term], index: usize) -> ParseResult<(NodeId, usize)> {
        let decimal = self.config.decimal_separator;
        let char_at = |offset: usize| terms.get(index + offset).and_then(Term::as_char);
        let digits_at = |offset: usize| match terms.get(index + offset) {
            Some(Term::Number { digits, .. }) => Some(digits.as_str()),
            _ => None,
        };

        match &terms[index] {
            Term::Number { digits, position } => {
                if char_at(1) == Some(decimal)
                   && let Some(fraction) = digits_at(2)
                {
                    return Ok((self.number(digits, fraction, *position)?, 3));
                }
                Ok((self.number(digits, "0", *position)?, 1))
            },
            Term::Char { ch, position } => {
                if *ch == RANGE_GLYPH && char_at(1) == Some(RANGE_GLYPH) {
                    return Ok((self.tree.push(NodeKind::Interval), 2));
                }
                if *ch == decimal
                   && let Some(fraction) = digits_at(1)
                {
                    return Ok((self.number("0", fraction, *position)?, 2));
                }
                if let Some(op) = Operator::from_glyph(*ch) {
                    return Ok((self.tree.push(NodeKind::Operator(op)), 1));
                }
                let node = self.tree.push(NodeKind::Punctuation(*ch));
                self.punctuation.insert(node, *position);
                Ok((node, 1))
            },
            Term::Name { name, .. } => {
                let var = self.symbols.variables.intern(name);
                Ok((self.tree.push(NodeKind::Variable(var)), 1))
            },
            Term::Block(block) => {
                let inner = self.block(&block.terms, block.position)?;
                let node = self.tree.push(NodeKind::Bracket { open:  block.open,
                                                              close: block.close, });
                self.tree.set_left(node, Some(inner));
                Ok((node, 1))
            },
            Term::Function { name,
                             block,
                             position, } => Ok((self.call(name, block, *position)?, 1)),
            Term::Functional { name,
                               params,
                               core,
                               position, } => {
                Ok((self.functional(name, params, core, *position)?, 1))
            },
        }
    }

    fn number(&mut self, whole: &str, fraction: &str, position: usize) -> ParseResult<NodeId> {
        let literal = format!("{whole}.{fraction}");
        let value = literal.parse::<f64>()
                           .map_err(|_| ParseError::InvalidNumber { literal, position })?;
        Ok(self.tree.push(NodeKind::Constant(value)))
    }

    /// Builds a call node, resolving the function by name and arity: first
    /// among functions already used, then builtins, then the lookup hook.
    fn call(&mut self, name: &str, block: &Block, position: usize) -> ParseResult<NodeId> {
        let args = self.block(&block.terms, block.position)?;
        let arity = self.tree.elements(args).len();

        let function = match self.symbols.functions.lookup(name, arity) {
            Some(id) => id,
            None => {
                let function = builtin(name, arity).or_else(|| self.hooks.lookup_function(name, arity))
                                                   .ok_or_else(|| ParseError::UnknownFunction {
                                                       name: name.to_string(),
                                                       arity,
                                                       position,
                                                   })?;
                self.symbols.functions.intern(function)
            },
        };

        let node = self.tree.push(NodeKind::Call { function,
                                                   open: block.open,
                                                   close: block.close });
        self.tree.set_left(node, Some(args));
        Ok(node)
    }

    fn functional(&mut self,
                  name: &str,
                  params: &Block,
                  core: &Block,
                  position: usize)
                  -> ParseResult<NodeId> {
        let kind = FunctionalKind::from_name(name).ok_or_else(|| {
                                                      ParseError::UnknownFunctional { name: name.to_string(),
                                                                                      position }
                                                  })?;
        let params = self.block(&params.terms, params.position)?;
        let core = self.block(&core.terms, core.position)?;
        let site = CallSite { name,
                              kind,
                              position,
                              settings: self.config.quadrature };
        bind(&mut self.tree, &mut self.symbols, site, params, core)
    }
}
