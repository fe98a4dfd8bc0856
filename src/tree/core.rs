use crate::tree::{
    node::{Node, NodeId, NodeKind},
    operator::Operator,
};

/// Which child slot of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The left child.
    Left,
    /// The right child.
    Right,
}

/// An arena of nodes linked by indices.
///
/// Splicing only reassigns indices; nodes are never moved or freed. Nodes left
/// unreachable by splicing are dropped by [`Tree::compact`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Creates an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Adds an unlinked node.
    pub fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(Node::new(kind));
        NodeId(self.nodes.len() - 1)
    }

    /// Number of nodes in the arena, reachable or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Gets a node.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this arena.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Gets the kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// Replaces the kind of a node, keeping its links.
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.nodes[id.0].kind = kind;
    }

    /// The left child of a node.
    #[must_use]
    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].left
    }

    /// The right child of a node.
    #[must_use]
    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].right
    }

    /// The parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// The child on `side`.
    #[must_use]
    pub fn child(&self, id: NodeId, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left(id),
            Side::Right => self.right(id),
        }
    }

    /// The priority of a node if it is an operator.
    #[must_use]
    pub fn priority(&self, id: NodeId) -> Option<u8> {
        self.kind(id).priority()
    }

    /// Whether a node is an operator.
    #[must_use]
    pub fn is_operator(&self, id: NodeId) -> bool {
        self.kind(id).is_operator()
    }

    /// Links `child` into `side` of `parent`.
    ///
    /// `child` is first unlinked from its former parent; the former occupant
    /// of the slot is left parentless.
    pub fn link(&mut self, parent: NodeId, side: Side, child: Option<NodeId>) {
        if let Some(child) = child {
            self.detach(child);
        }
        let slot = match side {
            Side::Left => &mut self.nodes[parent.0].left,
            Side::Right => &mut self.nodes[parent.0].right,
        };
        let former = std::mem::replace(slot, child);
        if let Some(former) = former {
            self.nodes[former.0].parent = None;
        }
        if let Some(child) = child {
            self.nodes[child.0].parent = Some(parent);
        }
    }

    /// Links `child` as the left child of `parent`.
    pub fn set_left(&mut self, parent: NodeId, child: Option<NodeId>) {
        self.link(parent, Side::Left, child);
    }

    /// Links `child` as the right child of `parent`.
    pub fn set_right(&mut self, parent: NodeId, child: Option<NodeId>) {
        self.link(parent, Side::Right, child);
    }

    /// Unlinks a node from its parent, making it the root of its own subtree.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes[id.0].parent.take() else {
            return;
        };
        let parent = &mut self.nodes[parent.0];
        if parent.left == Some(id) {
            parent.left = None;
        }
        if parent.right == Some(id) {
            parent.right = None;
        }
    }

    /// Unlinks and returns the right child of a node.
    pub fn take_right(&mut self, id: NodeId) -> Option<NodeId> {
        let right = self.right(id)?;
        self.detach(right);
        Some(right)
    }

    /// Puts `replacement` where `old` hangs, leaving `old` parentless.
    ///
    /// If `old` is a root, `replacement` is simply detached and becomes a root
    /// as well.
    pub fn replace(&mut self, old: NodeId, replacement: NodeId) {
        self.detach(replacement);
        if let Some(parent) = self.parent(old) {
            let side = if self.left(parent) == Some(old) {
                Side::Left
            } else {
                Side::Right
            };
            self.link(parent, side, Some(replacement));
        }
    }

    /// Walks up to the node without parent.
    #[must_use]
    pub fn topmost(&self, mut id: NodeId) -> NodeId {
        while let Some(parent) = self.parent(id) {
            id = parent;
        }
        id
    }

    /// Walks down the right children to the last one.
    #[must_use]
    pub fn rightmost(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.right(id) {
            id = right;
        }
        id
    }

    /// Lists the elements of an argument list headed by `head`; any other
    /// node is a list of one.
    #[must_use]
    pub fn elements(&self, head: NodeId) -> Vec<NodeId> {
        if self.kind(head) != &NodeKind::ArgList {
            return vec![head];
        }
        let mut elements = Vec::new();
        let mut link = Some(head);
        while let Some(id) = link {
            elements.extend(self.left(id));
            link = self.right(id);
        }
        elements
    }

    /// Collects the subtree of `root` in pre-order (node, left, right).
    #[must_use]
    pub fn preorder(&self, root: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(right) = self.right(id) {
                stack.push(right);
            }
            if let Some(left) = self.left(id) {
                stack.push(left);
            }
        }
        order
    }

    /// Follows left children from `top` for as long as `follow` accepts them.
    /// Returns the visited nodes, `top` first.
    #[must_use]
    pub fn left_spine<F>(&self, top: NodeId, follow: F) -> Vec<NodeId>
        where F: Fn(NodeId) -> bool
    {
        let mut spine = vec![top];
        let mut id = top;
        while let Some(left) = self.left(id)
              && follow(left)
        {
            spine.push(left);
            id = left;
        }
        spine
    }

    /// Whether a node is an infix operator other than `:`, so that its value
    /// only combines the values of both operands.
    #[must_use]
    pub fn is_plain_infix(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Operator(op) if *op != Operator::Colon)
        && self.left(id).is_some()
    }

    /// Lists the alternatives of the `:` chain headed by `colon`, left to
    /// right.
    ///
    /// `c1 ? a : c2 ? b : d` associates as `((c1 ? a) : (c2 ? b)) : d`, which
    /// gives `[c1 ? a, c2 ? b, d]`.
    #[must_use]
    pub fn alternatives(&self, colon: NodeId) -> Vec<Option<NodeId>> {
        let spine = self.left_spine(colon, |id| self.kind(id) == &NodeKind::Operator(Operator::Colon));
        let mut alternatives = vec![spine.last().and_then(|bottom| self.left(*bottom))];
        alternatives.extend(spine.iter().rev().map(|id| self.right(*id)));
        alternatives
    }

    /// Copies the subtree of `root` from `source` into this arena, passing
    /// every kind through `map`. Returns the new root, which is parentless.
    pub fn graft<F>(&mut self, source: &Self, root: NodeId, map: &mut F) -> NodeId
        where F: FnMut(&NodeKind) -> NodeKind
    {
        let top = self.push(map(source.kind(root)));
        let mut pending = vec![(root, top)];
        while let Some((from, to)) = pending.pop() {
            for side in [Side::Left, Side::Right] {
                if let Some(child) = source.child(from, side) {
                    let copy = self.push(map(source.kind(child)));
                    self.link(to, side, Some(copy));
                    pending.push((child, copy));
                }
            }
        }
        top
    }

    /// Builds a new arena holding only the subtree of `root`.
    #[must_use]
    pub fn compact(&self, root: NodeId) -> (Self, NodeId) {
        let mut tree = Self::new();
        let root = tree.graft(self, root, &mut NodeKind::clone);
        (tree, root)
    }

    /// Checks the link invariants of the subtree of `root`: the root has no
    /// parent and every child points back at the node holding it.
    #[must_use]
    pub fn is_well_linked(&self, root: NodeId) -> bool {
        if self.parent(root).is_some() {
            return false;
        }
        self.preorder(root).into_iter().all(|id| {
                                           [self.left(id), self.right(id)].into_iter()
                                                                          .flatten()
                                                                          .all(|child| {
                                                                              self.parent(child)
                                                                              == Some(id)
                                                                          })
                                       })
    }

    /// Counts the nodes without a parent.
    #[must_use]
    pub fn root_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.parent.is_none()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(tree: &mut Tree, value: f64) -> NodeId {
        tree.push(NodeKind::Constant(value))
    }

    #[test]
    fn linking_moves_a_child_between_parents() {
        let mut tree = Tree::new();
        let a = tree.push(NodeKind::Operator(Operator::Add));
        let b = tree.push(NodeKind::Operator(Operator::Mul));
        let one = constant(&mut tree, 1.0);

        tree.set_left(a, Some(one));
        tree.set_right(b, Some(one));

        assert_eq!(tree.left(a), None);
        assert_eq!(tree.right(b), Some(one));
        assert_eq!(tree.parent(one), Some(b));
    }

    #[test]
    fn replacing_a_child_leaves_it_parentless() {
        let mut tree = Tree::new();
        let add = tree.push(NodeKind::Operator(Operator::Add));
        let one = constant(&mut tree, 1.0);
        let mul = tree.push(NodeKind::Operator(Operator::Mul));

        tree.set_right(add, Some(one));
        tree.replace(one, mul);
        tree.set_left(mul, Some(one));

        assert_eq!(tree.right(add), Some(mul));
        assert_eq!(tree.parent(mul), Some(add));
        assert_eq!(tree.parent(one), Some(mul));
        assert!(tree.is_well_linked(add));
    }

    #[test]
    fn replacing_a_root_makes_two_roots() {
        let mut tree = Tree::new();
        let one = constant(&mut tree, 1.0);
        let neg = tree.push(NodeKind::Operator(Operator::Sub));

        tree.replace(one, neg);
        tree.set_left(neg, Some(one));

        assert_eq!(tree.topmost(one), neg);
        assert_eq!(tree.root_count(), 1);
    }

    #[test]
    fn compaction_drops_unreachable_nodes() {
        let mut tree = Tree::new();
        let _orphan = constant(&mut tree, 7.0);
        let add = tree.push(NodeKind::Operator(Operator::Add));
        let one = constant(&mut tree, 1.0);
        let two = constant(&mut tree, 2.0);
        tree.set_left(add, Some(one));
        tree.set_right(add, Some(two));

        let (compact, root) = tree.compact(add);

        assert_eq!(compact.len(), 3);
        assert_eq!(compact.root_count(), 1);
        assert_eq!(compact.kind(root), &NodeKind::Operator(Operator::Add));
        assert!(compact.is_well_linked(root));
    }

    #[test]
    fn preorder_visits_left_before_right() {
        let mut tree = Tree::new();
        let add = tree.push(NodeKind::Operator(Operator::Add));
        let one = constant(&mut tree, 1.0);
        let two = constant(&mut tree, 2.0);
        tree.set_left(add, Some(one));
        tree.set_right(add, Some(two));

        assert_eq!(tree.preorder(add), [add, one, two]);
    }

    #[test]
    fn grafting_a_deep_chain_keeps_its_shape() {
        let mut tree = Tree::new();
        let mut top = constant(&mut tree, 1.0);
        for _ in 0..100_000 {
            let add = tree.push(NodeKind::Operator(Operator::Add));
            let one = constant(&mut tree, 1.0);
            tree.set_left(add, Some(top));
            tree.set_right(add, Some(one));
            top = add;
        }

        let (compact, root) = tree.compact(top);

        assert_eq!(compact.len(), tree.len());
        assert!(compact.is_well_linked(root));
        assert_eq!(compact.left_spine(root, |id| compact.is_plain_infix(id)).len(), 100_000);
    }

    #[test]
    fn alternatives_flatten_a_colon_chain() {
        let mut tree = Tree::new();
        let first = tree.push(NodeKind::Operator(Operator::Question));
        let second = tree.push(NodeKind::Operator(Operator::Question));
        let fallback = constant(&mut tree, 7.0);
        let inner = tree.push(NodeKind::Operator(Operator::Colon));
        let outer = tree.push(NodeKind::Operator(Operator::Colon));
        tree.set_left(inner, Some(first));
        tree.set_right(inner, Some(second));
        tree.set_left(outer, Some(inner));
        tree.set_right(outer, Some(fallback));

        assert_eq!(tree.alternatives(outer), [Some(first), Some(second), Some(fallback)]);
        assert_eq!(tree.alternatives(inner), [Some(first), Some(second)]);
    }
}
