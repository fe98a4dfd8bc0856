use std::collections::HashMap;

use crate::{
    expression::core::Expression,
    symbols::{SymbolTable, variable::VarId},
    tree::{NodeId, NodeKind, Operator, Tree},
};

impl Expression {
    /// Joins two expressions under a binary operator.
    ///
    /// Both trees are copied into a new arena. A side whose root binds looser
    /// than `op` is wrapped in `()`. Variables are merged by name, so `x` on
    /// both sides becomes one slot; the left side's value wins. Private
    /// iterator slots stay private.
    ///
    /// ## Example
    /// ```
    /// use mathtree::{Expression, tree::Operator};
    ///
    /// let a = Expression::parse("x+1").unwrap();
    /// let b = Expression::parse("x-1").unwrap();
    /// let product = a.compose(Operator::Mul, &b);
    ///
    /// assert_eq!(product.to_string(), "(x+1)*(x-1)");
    /// assert_eq!(product.evaluate_with(&[("x", 3.0)]).unwrap(), 8.0);
    /// ```
    #[must_use]
    pub fn compose(&self, op: Operator, rhs: &Self) -> Self {
        let mut tree = Tree::new();
        let mut symbols = SymbolTable::default();

        let left = self.import(&mut tree, &mut symbols);
        let left = wrap(&mut tree, left, op);
        let right = rhs.import(&mut tree, &mut symbols);
        let right = wrap(&mut tree, right, op);

        let root = tree.push(NodeKind::Operator(op));
        tree.set_left(root, Some(left));
        tree.set_right(root, Some(right));

        Self::from_parts(tree, root, symbols, self.config.clone())
    }

    /// Raises the expression to the power `rhs`.
    #[must_use]
    pub fn pow(&self, rhs: &Self) -> Self {
        self.compose(Operator::Pow, rhs)
    }

    /// Copies the tree into `tree`, re-registering every symbol in
    /// `symbols`.
    fn import(&self, tree: &mut Tree, symbols: &mut SymbolTable) -> NodeId {
        let mut private: HashMap<VarId, VarId> = HashMap::new();
        let mut remap_var = |symbols: &mut SymbolTable, id: VarId| {
            let variable = self.symbols.variables.get(id);
            if variable.is_private() {
                *private.entry(id)
                        .or_insert_with(|| symbols.variables.push_private(variable.name()))
            } else {
                symbols.variables.insert(variable.clone())
            }
        };

        tree.graft(&self.tree, self.root, &mut |kind: &NodeKind| match kind {
                NodeKind::Variable(id) => NodeKind::Variable(remap_var(symbols, *id)),
                NodeKind::Call { function,
                                 open,
                                 close, } => {
                    let function = self.symbols.functions.get(*function).clone();
                    NodeKind::Call { function: symbols.functions.intern(function),
                                     open:     *open,
                                     close:    *close, }
                },
                NodeKind::Functional(id) => {
                    let mut functional = self.symbols.functional(*id).clone();
                    functional.iterator = remap_var(symbols, functional.iterator);
                    NodeKind::Functional(symbols.push_functional(functional))
                },
                other => other.clone(),
            })
    }
}

fn wrap(tree: &mut Tree, root: NodeId, op: Operator) -> NodeId {
    if tree.priority(root).is_none_or(|priority| priority >= op.priority()) {
        return root;
    }
    let bracket = tree.push(NodeKind::Bracket { open:  '(',
                                                close: ')', });
    tree.set_left(bracket, Some(root));
    bracket
}

macro_rules! compose_operator {
    ($trait:ident, $method:ident, $op:expr) => {
        impl std::ops::$trait for &Expression {
            type Output = Expression;

            fn $method(self, rhs: Self) -> Expression {
                self.compose($op, rhs)
            }
        }

        impl std::ops::$trait for Expression {
            type Output = Expression;

            fn $method(self, rhs: Self) -> Expression {
                self.compose($op, &rhs)
            }
        }
    };
}

compose_operator!(Add, add, Operator::Add);
compose_operator!(Sub, sub, Operator::Sub);
compose_operator!(Mul, mul, Operator::Mul);
compose_operator!(Div, div, Operator::Div);
