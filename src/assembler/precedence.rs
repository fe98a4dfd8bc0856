use crate::{
    assembler::core::Assembler,
    tree::{NodeId, NodeKind, Operator},
};

impl Assembler<'_> {
    /// Links `cur` into the group tree next to `prev`, the fragment attached
    /// before it.
    pub(super) fn attach(&mut self, prev: NodeId, cur: NodeId) {
        let tree = &self.tree;
        if matches!(tree.kind(cur), NodeKind::Punctuation(_)) {
            let target = tree.rightmost(tree.topmost(prev));
            self.tree.set_right(target, Some(cur));
            return;
        }
        if tree.is_operator(cur) {
            self.attach_operator(prev, cur);
            return;
        }
        if tree.kind(prev).is_operand() && tree.kind(cur).is_operand() {
            let product = self.tree.push(NodeKind::Operator(Operator::ImplicitMul));
            self.attach_operator(prev, product);
            self.tree.set_right(product, Some(cur));
            return;
        }
        self.tree.set_right(prev, Some(cur));
    }

    /// Inserts an operator by precedence climbing.
    fn attach_operator(&mut self, prev: NodeId, cur: NodeId) {
        let tree = &self.tree;
        let context = if tree.is_operator(prev) {
            Some(prev)
        } else {
            tree.parent(prev).filter(|parent| tree.is_operator(*parent))
        };

        let Some(mut context) = context else {
            let root = tree.topmost(prev);
            log::trace!("{:?} adopts root {:?}", tree.kind(cur), tree.kind(root));
            self.tree.set_left(cur, Some(root));
            return;
        };

        if context == prev && tree.right(prev).is_none() && is_prefix(tree.kind(cur)) {
            log::trace!("{:?} in prefix position", tree.kind(cur));
            self.tree.set_right(prev, Some(cur));
            return;
        }

        while tree.left(context).is_none() {
            match tree.parent(context) {
                Some(parent) if tree.is_operator(parent) => context = parent,
                _ => break,
            }
        }

        if tree.left(context).is_none() {
            log::trace!("{:?} adopts prefix {:?}", tree.kind(cur), tree.kind(context));
            self.tree.replace(context, cur);
            self.tree.set_left(cur, Some(context));
            return;
        }
        if tree.right(context).is_none() {
            self.tree.set_right(context, Some(cur));
            return;
        }

        let priority = tree.priority(cur).unwrap_or_default();
        if priority <= tree.priority(context).unwrap_or_default() {
            let mut ancestor = context;
            while let Some(parent) = tree.parent(ancestor) {
                if tree.priority(parent).is_some_and(|p| p >= priority) {
                    ancestor = parent;
                } else {
                    break;
                }
            }
            log::trace!("{:?} spliced above {:?}", tree.kind(cur), tree.kind(ancestor));
            self.tree.replace(ancestor, cur);
            self.tree.set_left(cur, Some(ancestor));
        } else {
            let mut node = context;
            while let Some(right) = tree.right(node) {
                let descends = tree.left(right).is_some()
                               && tree.priority(right).is_some_and(|p| p < priority);
                if !descends {
                    break;
                }
                node = right;
            }
            log::trace!("{:?} spliced below {:?}", tree.kind(cur), tree.kind(node));
            let stolen = self.tree.take_right(node);
            self.tree.set_left(cur, stolen);
            self.tree.set_right(node, Some(cur));
        }
    }
}

fn is_prefix(kind: &NodeKind) -> bool {
    matches!(kind, NodeKind::Operator(op) if op.is_prefix())
}
