/// The arena and its splicing primitives.
///
/// Nodes are addressed by [`NodeId`](node::NodeId); `left`, `right` and
/// `parent` are optional ids, so splicing is index reassignment.
pub mod core;
/// Node kinds and the node record.
pub mod node;
/// Operator glyphs, priorities and their numeric meaning.
pub mod operator;

pub use self::{
    core::{Side, Tree},
    node::{Node, NodeId, NodeKind},
    operator::Operator,
};
