use std::collections::HashMap;

use crate::{
    assembler::hooks::Hooks,
    error::{ParseError, parse_error::ParseResult},
    symbols::SymbolTable,
    syntax::{config::ParserConfig, term::Term},
    tree::{NodeId, NodeKind, Operator, Tree},
};

/// Builds one tree out of a term sequence.
///
/// The assembler owns the arena and the symbol tables while a parse is in
/// progress. Blocks are assembled recursively into the same arena; nodes
/// orphaned by splicing are dropped when the finished tree is compacted.
pub struct Assembler<'a> {
    pub(super) config:      &'a ParserConfig,
    pub(super) hooks:       &'a Hooks,
    pub(super) tree:        Tree,
    pub(super) symbols:     SymbolTable,
    pub(super) punctuation: HashMap<NodeId, usize>,
}

impl<'a> Assembler<'a> {
    /// Creates an assembler with empty arena and symbol tables.
    #[must_use]
    pub fn new(config: &'a ParserConfig, hooks: &'a Hooks) -> Self {
        Self { config,
               hooks,
               tree: Tree::new(),
               symbols: SymbolTable::default(),
               punctuation: HashMap::new() }
    }

    /// Assembles a whole input.
    ///
    /// # Returns
    /// The compacted tree, its root and the symbols it refers to.
    ///
    /// # Errors
    /// Any structural error found in a group or a nested block; `NoArgument`
    /// for an empty input.
    pub fn assemble(mut self, terms: &[Term]) -> ParseResult<(Tree, NodeId, SymbolTable)> {
        let root = self.block(terms, 0)?;
        let (tree, root) = self.tree.compact(root);
        log::debug!("assembled {} nodes ({} before compaction)", tree.len(), self.tree.len());
        Ok((tree, root, self.symbols))
    }

    /// Assembles the terms of one block: every argument group gets its own
    /// root, and several roots are chained into an argument list.
    pub(super) fn block(&mut self, terms: &[Term], position: usize) -> ParseResult<NodeId> {
        let separator = self.config.argument_separator;
        let mut groups = Vec::new();
        let mut start = 0;
        for (index, term) in terms.iter().enumerate() {
            if term.as_char() == Some(separator) {
                groups.push((&terms[start..index], term.position()));
                start = index + 1;
            }
        }
        groups.push((&terms[start..], terms.last().map_or(position, Term::position)));

        let mut roots = Vec::with_capacity(groups.len());
        for (group, position) in groups {
            roots.push(self.group(group, position)?);
        }

        if roots.len() == 1 {
            return Ok(roots[0]);
        }
        Ok(self.chain(roots))
    }

    /// Right-chains roots into `ArgList` links, labelling `name: value`
    /// roots.
    fn chain(&mut self, roots: Vec<NodeId>) -> NodeId {
        let mut next = None;
        for root in roots.into_iter().rev() {
            let argument = self.label(root);
            let link = self.tree.push(NodeKind::ArgList);
            self.tree.set_left(link, Some(argument));
            self.tree.set_right(link, next);
            next = Some(link);
        }
        next.unwrap_or_else(|| self.tree.push(NodeKind::ArgList))
    }

    fn label(&mut self, root: NodeId) -> NodeId {
        if self.tree.kind(root) != &NodeKind::Operator(Operator::Colon) {
            return root;
        }
        let name = match self.tree.left(root).map(|left| self.tree.kind(left)) {
            Some(NodeKind::Variable(var)) => self.symbols.variables.get(*var).name().to_string(),
            _ => return root,
        };
        let value = self.tree.take_right(root);
        let named = self.tree.push(NodeKind::NamedArg(name));
        self.tree.set_left(named, value);
        named
    }

    /// Assembles one argument group, left to right.
    fn group(&mut self, terms: &[Term], position: usize) -> ParseResult<NodeId> {
        let mut prev: Option<NodeId> = None;
        let mut index = 0;

        while index < terms.len() {
            let (cur, consumed) = self.fragment(terms, index)?;
            index += consumed;

            if let Some(kind) = self.hooks.node_added(self.tree.kind(cur)) {
                self.tree.set_kind(cur, kind);
            }
            if let Some(prev) = prev {
                self.attach(prev, cur);
            }
            prev = Some(cur);
        }

        let Some(prev) = prev else {
            return Err(ParseError::NoArgument { position });
        };
        let root = self.tree.topmost(prev);
        self.validate(root)?;
        Ok(root)
    }

    /// Rejects leftover punctuation and operators missing an operand.
    fn validate(&self, root: NodeId) -> ParseResult<()> {
        for id in self.tree.preorder(root) {
            let missing = |operator: String| Err(ParseError::MissingOperand { operator });
            let (left, right) = (self.tree.left(id), self.tree.right(id));
            match self.tree.kind(id) {
                NodeKind::Punctuation(ch) => {
                    return Err(ParseError::UnexpectedCharacter { ch:       *ch,
                                                                 position: self.punctuation
                                                                               .get(&id)
                                                                               .copied()
                                                                               .unwrap_or_default(), });
                },
                NodeKind::Operator(op) if right.is_none() || (left.is_none() && !op.is_prefix()) => {
                    return missing(op.glyph().to_string());
                },
                NodeKind::Interval if left.is_none() || right.is_none() => {
                    return missing("..".to_string());
                },
                _ => {},
            }
        }
        Ok(())
    }
}
