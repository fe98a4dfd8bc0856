use std::collections::HashMap;

use crate::{
    expression::core::Expression,
    tree::{NodeId, NodeKind, Operator},
};

impl Expression {
    /// Replaces every operator, bracket and builtin call whose operands are
    /// all constant by a single constant node.
    ///
    /// Built-in constants count as constant operands; variables, functionals
    /// and functions supplied by hooks never do.
    ///
    /// ## Example
    /// ```
    /// use mathtree::Expression;
    ///
    /// let mut expr = Expression::parse("x * (2 + sqrt(4))").unwrap();
    /// expr.fold_constants();
    ///
    /// assert_eq!(expr.to_string(), "x*4");
    /// ```
    pub fn fold_constants(&mut self) {
        let before = self.tree.len();
        self.fold();
        let (tree, root) = self.tree.compact(self.root);
        log::debug!("folded {before} nodes into {}", tree.len());
        self.tree = tree;
        self.root = root;
        self.classify();
    }

    /// Folds the tree bottom-up: every node is visited after its children.
    fn fold(&mut self) {
        let mut constant = HashMap::new();

        for id in self.tree.preorder(self.root).into_iter().rev() {
            let operands = [self.tree.left(id), self.tree.right(id)].into_iter()
                                                                    .flatten()
                                                                    .all(|child| {
                                                                        constant.get(&child)
                                                                                == Some(&true)
                                                                    });

            let (is_constant, replace) = match self.tree.kind(id) {
                NodeKind::Constant(_) => (true, false),
                NodeKind::Variable(var) => {
                    let variable = self.symbols.variables.get(*var);
                    (variable.is_constant() && variable.is_precomputable(), false)
                },
                NodeKind::Operator(Operator::Question | Operator::Colon)
                    if self.in_colon_chain(id) =>
                {
                    (operands, false)
                },
                NodeKind::Operator(_) | NodeKind::Bracket { .. } => (operands, operands),
                NodeKind::Call { function, .. } => {
                    let pure = operands && self.symbols.functions.get(*function).is_builtin();
                    (pure, pure)
                },
                NodeKind::ArgList | NodeKind::NamedArg(_) => (operands, false),
                NodeKind::Functional(_) | NodeKind::Interval | NodeKind::Punctuation(_) => {
                    (false, false)
                },
            };

            if replace {
                let value = self.eval(Some(id));
                self.tree.set_kind(id, NodeKind::Constant(value));
                self.tree.set_left(id, None);
                self.tree.set_right(id, None);
            }
            constant.insert(id, is_constant);
        }
    }

    /// Whether `id` hangs under a `:`, where it is one alternative of a
    /// conditional chain and only folds along with the whole chain.
    fn in_colon_chain(&self, id: NodeId) -> bool {
        self.tree
            .parent(id)
            .is_some_and(|parent| self.tree.kind(parent) == &NodeKind::Operator(Operator::Colon))
    }
}
