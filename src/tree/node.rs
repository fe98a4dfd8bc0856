use crate::{
    symbols::{function::FunctionId, variable::VarId},
    functional::FunctionalId,
    tree::operator::{INTERVAL_PRIORITY, Operator},
};

/// Stable handle of a node inside its [`Tree`](crate::tree::core::Tree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The arena index of the node.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// What a node represents.
///
/// Operands are `Constant`, `Variable`, `Call`, `Functional` and `Bracket`.
/// `Operator` and `Interval` take part in precedence climbing. `ArgList`,
/// `NamedArg` and `Punctuation` are structural.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A literal number.
    Constant(f64),
    /// A reference to a variable slot; constants such as `pi` are variables
    /// flagged constant.
    Variable(VarId),
    /// An operator; `left` and `right` are its operands (`left` is empty in
    /// prefix position).
    Operator(Operator),
    /// A function call; `left` holds the argument or the argument list.
    Call {
        /// The resolved function.
        function: FunctionId,
        /// Opening glyph of the argument block.
        open:     char,
        /// Closing glyph of the argument block.
        close:    char,
    },
    /// A functional call; `left` holds the normalized parameters, `right` the
    /// core expression.
    Functional(FunctionalId),
    /// A `min..max` pair; `left` is `min`, `right` is `max`.
    Interval,
    /// Decorative brackets around `left`.
    Bracket {
        /// Opening glyph.
        open:  char,
        /// Closing glyph.
        close: char,
    },
    /// One link of an argument list: `left` is the argument, `right` the next
    /// link.
    ArgList,
    /// A labelled argument `name: value`; `left` is the value.
    NamedArg(String),
    /// A character without meaning at its position. It must be replaced by
    /// the node-added hook, or the parse fails.
    Punctuation(char),
}

impl NodeKind {
    /// The precedence-climbing priority, or `None` for non-operators.
    #[must_use]
    pub const fn priority(&self) -> Option<u8> {
        match self {
            Self::Operator(op) => Some(op.priority()),
            Self::Interval => Some(INTERVAL_PRIORITY),
            _ => None,
        }
    }

    /// Whether the node takes part in precedence climbing.
    #[must_use]
    pub const fn is_operator(&self) -> bool {
        self.priority().is_some()
    }

    /// Whether two such nodes side by side imply a multiplication.
    #[must_use]
    pub const fn is_operand(&self) -> bool {
        matches!(self,
                 Self::Constant(_)
                 | Self::Variable(_)
                 | Self::Call { .. }
                 | Self::Functional(_)
                 | Self::Bracket { .. })
    }
}

/// A node of the arena tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) kind:   NodeKind,
    pub(crate) left:   Option<NodeId>,
    pub(crate) right:  Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl Node {
    /// Creates an unlinked node.
    #[must_use]
    pub const fn new(kind: NodeKind) -> Self {
        Self { kind,
               left: None,
               right: None,
               parent: None }
    }

    /// The node kind.
    #[must_use]
    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The left child.
    #[must_use]
    pub const fn left(&self) -> Option<NodeId> {
        self.left
    }

    /// The right child.
    #[must_use]
    pub const fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// The parent.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}
