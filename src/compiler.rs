/// Lowering of an expression tree into stack programs.
///
/// Constants and builtin constants are pooled, listed variables become
/// parameter slots and every functional iterator gets a private slot after
/// the parameters.
pub mod lower;
/// Instructions, programs and the [`CompiledFunction`](program::CompiledFunction)
/// that runs them.
///
/// A compiled function owns copies of everything it needs, so it holds no
/// reference to the expression it came from and can be shared across
/// threads.
pub mod program;

pub use program::CompiledFunction;
