use crate::{
    expression::core::Expression,
    functional::layout,
    tree::{NodeId, NodeKind, Operator, operator::truth},
};

impl Expression {
    /// Evaluates the expression by walking the tree.
    ///
    /// Numeric problems propagate as NaN or infinity, following IEEE-754.
    ///
    /// ## Example
    /// ```
    /// use mathtree::Expression;
    ///
    /// assert_eq!(Expression::parse("2+3*4").unwrap().evaluate(), 14.0);
    /// assert_eq!(Expression::parse("1 > 2 ? 10 : 20").unwrap().evaluate(), 20.0);
    /// assert!(Expression::parse("0/0").unwrap().evaluate().is_nan());
    /// ```
    #[must_use]
    pub fn evaluate(&self) -> f64 {
        self.eval(Some(self.root))
    }

    /// Evaluates a subtree; an empty slot reads as NaN.
    pub(crate) fn eval(&self, id: Option<NodeId>) -> f64 {
        let Some(id) = id else {
            return f64::NAN;
        };
        let (left, right) = (self.tree.left(id), self.tree.right(id));

        match self.tree.kind(id) {
            NodeKind::Constant(value) => *value,
            NodeKind::Variable(var) => self.symbols.variables.get(*var).value(),
            NodeKind::Operator(Operator::Colon) => self.select(id),
            NodeKind::Operator(op) => match left {
                Some(_) => self.eval_chain(id),
                None => op.apply_prefix(self.eval(right)),
            },
            NodeKind::Call { function, .. } => {
                let args: Vec<f64> = left.map(|args| self.tree.elements(args))
                                         .unwrap_or_default()
                                         .into_iter()
                                         .map(|arg| self.eval(Some(arg)))
                                         .collect();
                self.symbols.functions.get(*function).call(&args)
            },
            NodeKind::Functional(functional) => {
                let functional = self.symbols.functional(*functional);
                let layout = layout(&self.tree, id);
                let iterator = self.symbols.variables.get(functional.iterator());
                functional.run(self.eval(layout.min),
                               self.eval(layout.max),
                               layout.step.map(|step| self.eval(Some(step))),
                               |x| {
                                   iterator.assign(x);
                                   self.eval(layout.body)
                               })
            },
            NodeKind::ArgList => self.eval(self.tree.elements(id).last().copied()),
            NodeKind::Bracket { .. } | NodeKind::NamedArg(_) => self.eval(left),
            NodeKind::Interval | NodeKind::Punctuation(_) => f64::NAN,
        }
    }

    /// Evaluates the infix operators along the left spine of `top` in a loop;
    /// recursion only enters right operands.
    fn eval_chain(&self, top: NodeId) -> f64 {
        let spine = self.tree.left_spine(top, |id| self.tree.is_plain_infix(id));
        let mut value = self.eval(spine.last().and_then(|bottom| self.tree.left(*bottom)));
        for id in spine.into_iter().rev() {
            if let NodeKind::Operator(op) = self.tree.kind(id) {
                value = op.apply(value, self.eval(self.tree.right(id)));
            }
        }
        value
    }

    /// Picks the first alternative of a `c1 ? a : c2 ? b : d` chain whose
    /// condition holds. The last alternative is the fallback; other
    /// alternatives that are not conditionals are skipped.
    fn select(&self, colon: NodeId) -> f64 {
        let mut alternatives = self.tree.alternatives(colon);
        let fallback = alternatives.pop().flatten();
        for alternative in alternatives.into_iter().flatten() {
            if self.tree.kind(alternative) == &NodeKind::Operator(Operator::Question)
               && truth(self.eval(self.tree.left(alternative)))
            {
                return self.eval(self.tree.right(alternative));
            }
        }
        self.eval(fallback)
    }
}
