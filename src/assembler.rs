/// The assembler state and the per-block and per-group passes.
///
/// A block is split into argument groups by the argument separator. Each
/// group is assembled into one tree, validated, and the group roots of a
/// block are chained into an argument list.
pub mod core;
/// Conversion of terms into tree fragments.
///
/// # Responsibilities
/// - Merges `digits . digits` and `. digits` into constants.
/// - Turns `..` into an interval node.
/// - Resolves names to variables, functions and functionals, assembling their
///   blocks recursively.
pub mod fragment;
/// Callbacks that customize a parse.
pub mod hooks;
/// Precedence climbing: insertion of a fragment next to the previous one by
/// ancestor and descendant splicing.
pub mod precedence;
