use std::{fmt, sync::Arc};

use crate::{symbols::function::Function, tree::NodeKind};

/// Rewrites the raw input before stripping and scanning.
pub type PreprocessHook = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;
/// Replaces the kind of a freshly built fragment.
pub type NodeAddedHook = Arc<dyn Fn(&NodeKind) -> Option<NodeKind> + Send + Sync>;
/// Supplies a function no builtin answers for.
pub type FunctionLookupHook = Arc<dyn Fn(&str, usize) -> Option<Function> + Send + Sync>;
/// Observes every public variable of a parsed expression.
pub type VariableDiscoveredHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Callbacks injected into the parser. Every hook is optional; a hook that
/// returns `None` leaves the default behavior in place.
#[derive(Clone, Default)]
pub struct Hooks {
    pub(crate) preprocess:          Option<PreprocessHook>,
    pub(crate) node_added:          Option<NodeAddedHook>,
    pub(crate) function_lookup:     Option<FunctionLookupHook>,
    pub(crate) variable_discovered: Option<VariableDiscoveredHook>,
}

impl Hooks {
    /// Runs the preprocessing hook.
    #[must_use]
    pub fn preprocess(&self, input: &str) -> Option<String> {
        self.preprocess.as_ref().and_then(|hook| hook(input))
    }

    /// Runs the node-added hook.
    #[must_use]
    pub fn node_added(&self, kind: &NodeKind) -> Option<NodeKind> {
        self.node_added.as_ref().and_then(|hook| hook(kind))
    }

    /// Runs the function-lookup hook.
    #[must_use]
    pub fn lookup_function(&self, name: &str, arity: usize) -> Option<Function> {
        self.function_lookup.as_ref().and_then(|hook| hook(name, arity))
    }

    /// Runs the variable-discovered hook.
    pub fn discover(&self, name: &str) {
        if let Some(hook) = &self.variable_discovered {
            hook(name);
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
         .field("preprocess", &self.preprocess.is_some())
         .field("node_added", &self.node_added.is_some())
         .field("function_lookup", &self.function_lookup.is_some())
         .field("variable_discovered", &self.variable_discovered.is_some())
         .finish()
    }
}
