/// Binding of a functional call site: iterator discovery and tree surgery on
/// the parameter block.
pub mod bind;
/// Numeric primitives shared by both evaluation backends: stepped sums,
/// trapezoid and adaptive Gauss–Kronrod integration.
pub mod quadrature;

use crate::{
    functional::quadrature::{QuadratureSettings, adaptive, sum_range, trapezoid},
    symbols::variable::VarId,
    tree::{NodeId, NodeKind, Tree},
};

/// Handle of a functional inside its expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionalId(pub(crate) usize);

/// The operation a functional performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionalKind {
    /// `summ`, `Sum` or `Σ`.
    Sum,
    /// `int`, `integral`, `Int`, `Integral` or `∫`.
    Integral,
}

impl FunctionalKind {
    /// Resolves a functional name.
    ///
    /// ## Example
    /// ```
    /// use mathtree::functional::FunctionalKind;
    ///
    /// assert_eq!(FunctionalKind::from_name("Σ"), Some(FunctionalKind::Sum));
    /// assert_eq!(FunctionalKind::from_name("∫"), Some(FunctionalKind::Integral));
    /// assert_eq!(FunctionalKind::from_name("prod"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "summ" | "Sum" | "Σ" => Some(Self::Sum),
            "int" | "integral" | "Int" | "Integral" | "∫" => Some(Self::Integral),
            _ => None,
        }
    }
}

/// How a functional evaluates, decided once when it is bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    /// A sum over `min..max` with the given step, or `1`.
    Stepped,
    /// A trapezoid integral with an explicit step.
    FixedStep,
    /// An error-controlled integral.
    Adaptive(QuadratureSettings),
}

/// A bound functional call site.
#[derive(Debug, Clone, PartialEq)]
pub struct Functional {
    pub(crate) kind:     FunctionalKind,
    pub(crate) name:     String,
    pub(crate) iterator: VarId,
    pub(crate) mode:     Mode,
}

/// The nodes a functional node reads when it is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Lower bound of the domain.
    pub min:  Option<NodeId>,
    /// Upper bound of the domain.
    pub max:  Option<NodeId>,
    /// The step, if one was given.
    pub step: Option<NodeId>,
    /// The core expression.
    pub body: Option<NodeId>,
}

impl Functional {
    /// The operation performed.
    #[must_use]
    pub const fn kind(&self) -> FunctionalKind {
        self.kind
    }

    /// The name the functional was called with.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The private iterator slot.
    #[must_use]
    pub const fn iterator(&self) -> VarId {
        self.iterator
    }

    /// The evaluation mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Runs the functional over `min..max`, calling `body` with each
    /// iterator value. The caller is responsible for storing the value where
    /// the body reads its iterator.
    pub fn run<F>(&self, min: f64, max: f64, step: Option<f64>, mut body: F) -> f64
        where F: FnMut(f64) -> f64
    {
        match (self.mode, step) {
            (Mode::Stepped, step) => sum_range(&mut body, min, max, step.unwrap_or(1.0)),
            (Mode::FixedStep, Some(step)) => trapezoid(&mut body, min, max, step),
            (Mode::FixedStep, None) => f64::NAN,
            (Mode::Adaptive(settings), _) => adaptive(&mut body, min, max, &settings),
        }
    }
}

/// Reads the normalized shape below a functional node: `left` holds
/// `ArgList(NamedArg("domain"), ArgList(NamedArg("step")))` or a lone
/// `NamedArg("domain")`, `right` holds the core.
#[must_use]
pub fn layout(tree: &Tree, node: NodeId) -> Layout {
    let named = |id: Option<NodeId>| match id {
        Some(id) if matches!(tree.kind(id), NodeKind::ArgList) => tree.left(id),
        other => other,
    };
    let params = tree.left(node);
    let domain = named(params).and_then(|domain| tree.left(domain));
    let step = params.filter(|id| matches!(tree.kind(*id), NodeKind::ArgList))
                     .and_then(|id| named(tree.right(id)))
                     .and_then(|step| tree.left(step));

    Layout { min: domain.and_then(|interval| tree.left(interval)),
             max: domain.and_then(|interval| tree.right(interval)),
             step,
             body: tree.right(node) }
}
