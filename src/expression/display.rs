use std::fmt::{self, Write};

use crate::{
    expression::core::Expression,
    functional::layout,
    tree::{NodeId, NodeKind, Operator},
};

impl fmt::Display for Expression {
    /// Writes the expression back as text that parses to an equivalent
    /// expression with the same configuration.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, Some(self.root))
    }
}

impl Expression {
    fn write_node(&self, f: &mut fmt::Formatter<'_>, id: Option<NodeId>) -> fmt::Result {
        let Some(id) = id else {
            return Ok(());
        };
        let (left, right) = (self.tree.left(id), self.tree.right(id));
        let separator = self.config.argument_separator;

        match self.tree.kind(id) {
            NodeKind::Constant(value) => self.write_number(f, *value),
            NodeKind::Variable(var) => f.write_str(self.symbols.variables.get(*var).name()),
            NodeKind::Operator(_) if left.is_some() => self.write_chain(f, id),
            NodeKind::Operator(op) => {
                f.write_str(op.glyph())?;
                self.write_operand(f, right, u8::MAX, false)
            },
            NodeKind::Interval => {
                let priority = self.tree.priority(id).unwrap_or_default();
                self.write_operand(f, left, priority, false)?;
                f.write_str("..")?;
                self.write_operand(f, right, priority, true)
            },
            NodeKind::Call { function,
                             open,
                             close, } => {
                f.write_str(self.symbols.functions.get(*function).name())?;
                f.write_char(*open)?;
                self.write_list(f, left, separator)?;
                f.write_char(*close)
            },
            NodeKind::Functional(functional) => {
                let functional = self.symbols.functional(*functional);
                let layout = layout(&self.tree, id);
                let iterator = self.symbols.variables.get(functional.iterator());
                write!(f, "{}{{{}=", functional.name(), iterator.name())?;
                self.write_operand(f, layout.min, Operator::Equal.priority() + 1, false)?;
                f.write_str("..")?;
                self.write_operand(f, layout.max, Operator::Equal.priority() + 1, true)?;
                if layout.step.is_some() {
                    f.write_char(':')?;
                    self.write_operand(f, layout.step, Operator::Colon.priority(), true)?;
                }
                f.write_str("}{")?;
                self.write_list(f, layout.body, separator)?;
                f.write_char('}')
            },
            NodeKind::Bracket { open, close } => {
                f.write_char(*open)?;
                self.write_node(f, left)?;
                f.write_char(*close)
            },
            NodeKind::ArgList => self.write_list(f, Some(id), separator),
            NodeKind::NamedArg(name) => {
                write!(f, "{name}:")?;
                self.write_node(f, left)
            },
            NodeKind::Punctuation(ch) => f.write_char(*ch),
        }
    }

    /// Writes infix operators whose left operands print without parentheses,
    /// walking down their left spine in a loop.
    fn write_chain(&self, f: &mut fmt::Formatter<'_>, top: NodeId) -> fmt::Result {
        let spine = self.tree.left_spine(top, |link| self.is_bare_infix(link));
        let Some(bottom) = spine.last().copied() else {
            return Ok(());
        };
        self.write_operand(f,
                           self.tree.left(bottom),
                           self.tree.priority(bottom).unwrap_or_default(),
                           false)?;

        for link in spine.into_iter().rev() {
            if let (NodeKind::Operator(op), Some(left)) = (self.tree.kind(link), self.tree.left(link)) {
                let right = self.tree.right(link);
                f.write_str(self.glyph(*op, left, right))?;
                self.write_operand(f, right, op.priority(), true)?;
            }
        }
        Ok(())
    }

    /// Whether a left operand is an infix operator printed without
    /// parentheses.
    fn is_bare_infix(&self, id: NodeId) -> bool {
        let outer = self.tree.parent(id).and_then(|parent| self.tree.priority(parent));
        matches!(self.tree.kind(id), NodeKind::Operator(_))
        && self.tree.left(id).is_some()
        && self.tree.priority(id) >= outer
    }

    /// Writes an operand of an operator of `priority`, in parentheses when
    /// reading it back would attach it differently.
    fn write_operand(&self,
                     f: &mut fmt::Formatter<'_>,
                     id: Option<NodeId>,
                     priority: u8,
                     right_side: bool)
                     -> fmt::Result {
        let wrap = id.is_some_and(|id| {
                         let infix = self.tree.left(id).is_some();
                         match self.tree.kind(id) {
                             NodeKind::Constant(value) => *value < 0.0,
                             NodeKind::Operator(_) | NodeKind::Interval if infix => {
                                 let inner = self.tree.priority(id).unwrap_or_default();
                                 inner < priority || (right_side && inner == priority)
                             },
                             _ => false,
                         }
                     });
        if wrap {
            f.write_char('(')?;
            self.write_node(f, id)?;
            f.write_char(')')
        } else {
            self.write_node(f, id)
        }
    }

    fn write_list(&self, f: &mut fmt::Formatter<'_>, head: Option<NodeId>, separator: char) -> fmt::Result {
        let Some(head) = head else {
            return Ok(());
        };
        for (index, element) in self.tree.elements(head).into_iter().enumerate() {
            if index > 0 {
                f.write_char(separator)?;
            }
            self.write_node(f, Some(element))?;
        }
        Ok(())
    }

    fn write_number(&self, f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
        if value.is_nan() {
            return f.write_str("(0/0)");
        }
        if value.is_infinite() {
            return f.write_str(if value > 0.0 { "(1/0)" } else { "(-1/0)" });
        }
        let text = value.to_string();
        if self.config.decimal_separator == '.' {
            f.write_str(&text)
        } else {
            f.write_str(&text.replace('.', &self.config.decimal_separator.to_string()))
        }
    }

    /// Implicit multiplication stays implicit only in `3(x)`, where reading
    /// it back cannot form a name or a call.
    fn glyph(&self, op: Operator, left: NodeId, right: Option<NodeId>) -> &'static str {
        let bracketed = right.is_some_and(|right| {
                                 matches!(self.tree.kind(right),
                                          NodeKind::Bracket { open: '(' | '[', .. })
                             });
        let numeric = matches!(self.tree.kind(left), NodeKind::Constant(value) if *value >= 0.0);
        match op {
            Operator::ImplicitMul if numeric && bracketed => "",
            Operator::ImplicitMul => "*",
            _ => op.glyph(),
        }
    }
}
