use crate::{
    error::{ParseError, parse_error::ParseResult},
    functional::{Functional, FunctionalKind, Mode, quadrature::QuadratureSettings},
    symbols::{SymbolTable, variable::VarId},
    tree::{NodeId, NodeKind, Operator, Tree},
};

/// Where and how a functional was called.
#[derive(Debug, Clone, Copy)]
pub struct CallSite<'a> {
    /// The name used at the call site.
    pub name:     &'a str,
    /// The resolved operation.
    pub kind:     FunctionalKind,
    /// Position of the call in the stripped input.
    pub position: usize,
    /// Settings handed to an adaptive integral.
    pub settings: QuadratureSettings,
}

/// Binds a functional to its assembled parameter and core trees and returns
/// the functional node.
///
/// The iterator is the variable on the left of the first `iterator =
/// min..max` equation in `params`. It is replaced by a private slot in both
/// subtrees, so that the same name outside the functional keeps referring to
/// the shared variable. The step is the right side of a `:` following the
/// equation or, for integrals, the value of a `d<iterator> = step` equation.
///
/// The parameter tree is rebuilt as `ArgList(NamedArg("domain"),
/// ArgList(NamedArg("step")))`, or a lone `NamedArg("domain")` without step.
///
/// # Errors
/// - `MissingIterator` if no equation binds a variable.
/// - `InvalidDomain` if the bound value is not an interval.
pub fn bind(tree: &mut Tree,
            symbols: &mut SymbolTable,
            site: CallSite<'_>,
            params: NodeId,
            core: NodeId)
            -> ParseResult<NodeId> {
    let equations: Vec<(NodeId, VarId)> =
        tree.preorder(params)
            .into_iter()
            .filter(|id| tree.kind(*id) == &NodeKind::Operator(Operator::Equal))
            .filter_map(|id| match tree.left(id).map(|left| tree.kind(left)) {
                Some(NodeKind::Variable(var)) => Some((id, *var)),
                _ => None,
            })
            .collect();

    if equations.is_empty() {
        return Err(ParseError::MissingIterator { functional: site.name.to_string(),
                                                 position:   site.position, });
    }
    let (equation, public, domain) =
        equations.iter()
                 .find_map(|&(id, var)| domain_of(tree, id).map(|domain| (id, var, domain)))
                 .ok_or_else(|| ParseError::InvalidDomain { functional: site.name.to_string(),
                                                            position:   site.position, })?;

    let name = symbols.variables.get(public).name().to_string();
    let step = colon_step(tree, equation).or_else(|| {
                                             if site.kind != FunctionalKind::Integral {
                                                 return None;
                                             }
                                             let binder = format!("d{name}");
                                             equations.iter()
                                                      .find(|(_, var)| {
                                                          symbols.variables.get(*var).name() == binder
                                                      })
                                                      .and_then(|(id, _)| tree.right(*id))
                                         });

    let private = symbols.variables.push_private(&name);
    for root in [params, core] {
        rebind(tree, root, public, private);
    }

    let params = normalize(tree, domain, step);
    let mode = match (site.kind, step) {
        (FunctionalKind::Sum, _) => Mode::Stepped,
        (FunctionalKind::Integral, Some(_)) => Mode::FixedStep,
        (FunctionalKind::Integral, None) => Mode::Adaptive(site.settings),
    };
    log::debug!("bound {} over '{name}' at {} in mode {mode:?}", site.name, site.position);

    let id = symbols.push_functional(Functional { kind: site.kind,
                                                  name: site.name.to_string(),
                                                  iterator: private,
                                                  mode });
    let node = tree.push(NodeKind::Functional(id));
    tree.set_left(node, Some(params));
    tree.set_right(node, Some(core));
    Ok(node)
}

/// The interval on the right of an equation, looking through brackets.
fn domain_of(tree: &Tree, equation: NodeId) -> Option<NodeId> {
    let mut node = tree.right(equation)?;
    while matches!(tree.kind(node), NodeKind::Bracket { .. }) {
        node = tree.left(node)?;
    }
    matches!(tree.kind(node), NodeKind::Interval).then_some(node)
}

/// The right side of a `:` whose left side is `equation`.
fn colon_step(tree: &Tree, equation: NodeId) -> Option<NodeId> {
    let parent = tree.parent(equation)?;
    let is_colon = tree.kind(parent) == &NodeKind::Operator(Operator::Colon);
    if is_colon && tree.left(parent) == Some(equation) {
        tree.right(parent)
    } else {
        None
    }
}

fn rebind(tree: &mut Tree, root: NodeId, from: VarId, to: VarId) {
    for id in tree.preorder(root) {
        if tree.kind(id) == &NodeKind::Variable(from) {
            tree.set_kind(id, NodeKind::Variable(to));
        }
    }
}

fn normalize(tree: &mut Tree, domain: NodeId, step: Option<NodeId>) -> NodeId {
    let named = |tree: &mut Tree, label: &str, value: NodeId| {
        let node = tree.push(NodeKind::NamedArg(label.to_string()));
        tree.set_left(node, Some(value));
        node
    };

    let domain = named(tree, "domain", domain);
    let Some(step) = step else {
        return domain;
    };
    let step = named(tree, "step", step);
    let tail = tree.push(NodeKind::ArgList);
    tree.set_left(tail, Some(step));
    let head = tree.push(NodeKind::ArgList);
    tree.set_left(head, Some(domain));
    tree.set_right(head, Some(tail));
    head
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::variable::VariableTable;

    fn site(kind: FunctionalKind) -> CallSite<'static> {
        CallSite { name: "f",
                   kind,
                   position: 0,
                   settings: QuadratureSettings::default() }
    }

    fn leaf(tree: &mut Tree, kind: NodeKind) -> NodeId {
        tree.push(kind)
    }

    fn binary(tree: &mut Tree, kind: NodeKind, left: NodeId, right: NodeId) -> NodeId {
        let node = tree.push(kind);
        tree.set_left(node, Some(left));
        tree.set_right(node, Some(right));
        node
    }

    /// Builds `i = 1..5` and a core reading `i` and `n`.
    fn sum_parts(tree: &mut Tree, variables: &mut VariableTable) -> (NodeId, NodeId) {
        let i = variables.intern("i");
        let n = variables.intern("n");
        let lhs = leaf(tree, NodeKind::Variable(i));
        let one = leaf(tree, NodeKind::Constant(1.0));
        let five = leaf(tree, NodeKind::Constant(5.0));
        let interval = binary(tree, NodeKind::Interval, one, five);
        let params = binary(tree, NodeKind::Operator(Operator::Equal), lhs, interval);
        let body_i = leaf(tree, NodeKind::Variable(i));
        let body_n = leaf(tree, NodeKind::Variable(n));
        let core = binary(tree, NodeKind::Operator(Operator::Mul), body_i, body_n);
        (params, core)
    }

    #[test]
    fn iterator_becomes_private() {
        let mut tree = Tree::new();
        let mut symbols = SymbolTable::default();
        let (params, core) = sum_parts(&mut tree, &mut symbols.variables);
        let public = symbols.variables.lookup("i").unwrap();

        let node = bind(&mut tree, &mut symbols, site(FunctionalKind::Sum), params, core).unwrap();

        let NodeKind::Functional(id) = tree.kind(node) else {
            panic!("expected a functional node");
        };
        let functional = symbols.functional(*id);
        assert_ne!(functional.iterator(), public);
        assert!(symbols.variables.get(functional.iterator()).is_private());
        assert_eq!(tree.kind(tree.left(core).unwrap()),
                   &NodeKind::Variable(functional.iterator()));
        assert_eq!(tree.kind(tree.right(core).unwrap()),
                   &NodeKind::Variable(symbols.variables.lookup("n").unwrap()));
        assert_eq!(functional.mode(), Mode::Stepped);
        assert!(tree.is_well_linked(node));
    }

    #[test]
    fn integral_without_step_is_adaptive() {
        let mut tree = Tree::new();
        let mut symbols = SymbolTable::default();
        let (params, core) = sum_parts(&mut tree, &mut symbols.variables);

        let node =
            bind(&mut tree, &mut symbols, site(FunctionalKind::Integral), params, core).unwrap();

        assert!(matches!(tree.kind(tree.left(node).unwrap()), NodeKind::NamedArg(label) if label == "domain"));
        assert!(matches!(symbols.functionals[0].mode(), Mode::Adaptive(_)));
    }

    #[test]
    fn differential_binder_sets_the_step() {
        let mut tree = Tree::new();
        let mut symbols = SymbolTable::default();
        let (equation, core) = sum_parts(&mut tree, &mut symbols.variables);
        let di = symbols.variables.intern("di");
        let binder = leaf(&mut tree, NodeKind::Variable(di));
        let width = leaf(&mut tree, NodeKind::Constant(0.5));
        let step = binary(&mut tree, NodeKind::Operator(Operator::Equal), binder, width);
        let tail = tree.push(NodeKind::ArgList);
        tree.set_left(tail, Some(step));
        let params = tree.push(NodeKind::ArgList);
        tree.set_left(params, Some(equation));
        tree.set_right(params, Some(tail));

        let node =
            bind(&mut tree, &mut symbols, site(FunctionalKind::Integral), params, core).unwrap();

        let layout = crate::functional::layout(&tree, node);
        assert_eq!(layout.step, Some(width));
        assert_eq!(symbols.functionals[0].mode(), Mode::FixedStep);
    }

    #[test]
    fn missing_equation_is_rejected() {
        let mut tree = Tree::new();
        let mut symbols = SymbolTable::default();
        let params = leaf(&mut tree, NodeKind::Constant(1.0));
        let core = leaf(&mut tree, NodeKind::Constant(2.0));

        assert!(matches!(bind(&mut tree, &mut symbols, site(FunctionalKind::Sum), params, core),
                         Err(ParseError::MissingIterator { .. })));
    }

    #[test]
    fn equation_without_interval_is_rejected() {
        let mut tree = Tree::new();
        let mut symbols = SymbolTable::default();
        let i = symbols.variables.intern("i");
        let lhs = leaf(&mut tree, NodeKind::Variable(i));
        let rhs = leaf(&mut tree, NodeKind::Constant(3.0));
        let params = binary(&mut tree, NodeKind::Operator(Operator::Equal), lhs, rhs);
        let core = leaf(&mut tree, NodeKind::Variable(i));

        assert!(matches!(bind(&mut tree, &mut symbols, site(FunctionalKind::Sum), params, core),
                         Err(ParseError::InvalidDomain { .. })));
    }
}
