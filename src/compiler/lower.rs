use std::collections::HashMap;

use ordered_float::OrderedFloat;

use crate::{
    compiler::program::{CompiledFunction, Instruction, Loop, Program},
    error::RuntimeError,
    expression::core::Expression,
    functional::layout,
    symbols::{
        function::{Function, FunctionId},
        variable::VarId,
    },
    tree::{NodeId, NodeKind, Operator},
};

/// Lowers `expr` into a function of `parameters`, in order.
///
/// Parameters the expression never reads are allowed.
///
/// # Errors
/// `UnboundParameter` for the first public variable that is neither a
/// constant nor listed.
pub(crate) fn lower(expr: &Expression, parameters: &[&str]) -> Result<CompiledFunction, RuntimeError> {
    let mut lowering = Lowering { expr,
                                  parameters,
                                  constants: Vec::new(),
                                  pooled: HashMap::new(),
                                  functions: Vec::new(),
                                  called: HashMap::new(),
                                  slots: HashMap::new(),
                                  frame_size: parameters.len(),
                                  loops: Vec::new() };

    let mut main = Program::default();
    lowering.node(&mut main, Some(expr.root))?;

    log::debug!("compiled {} instructions, {} loops, {} constants, frame of {}",
                main.code.len(),
                lowering.loops.len(),
                lowering.constants.len(),
                lowering.frame_size);

    Ok(CompiledFunction { parameters: parameters.iter().map(ToString::to_string).collect(),
                          frame_size: lowering.frame_size,
                          constants: lowering.constants,
                          functions: lowering.functions,
                          loops: lowering.loops,
                          main })
}

struct Lowering<'a> {
    expr:       &'a Expression,
    parameters: &'a [&'a str],
    constants:  Vec<f64>,
    /// Pool index by value and sign, so `0` and `-0` stay distinct.
    pooled:     HashMap<(OrderedFloat<f64>, bool), usize>,
    functions:  Vec<Function>,
    called:     HashMap<FunctionId, usize>,
    /// Frame slots of private iterators.
    slots:      HashMap<VarId, usize>,
    frame_size: usize,
    loops:      Vec<Loop>,
}

impl Lowering<'_> {
    fn node(&mut self, program: &mut Program, id: Option<NodeId>) -> Result<(), RuntimeError> {
        let Some(id) = id else {
            self.constant(program, f64::NAN);
            return Ok(());
        };
        let expr = self.expr;
        let tree = &expr.tree;
        let (left, right) = (tree.left(id), tree.right(id));

        match tree.kind(id) {
            NodeKind::Constant(value) => self.constant(program, *value),
            NodeKind::Variable(var) => self.variable(program, *var)?,
            NodeKind::Operator(Operator::Colon) => {
                let mut alternatives = tree.alternatives(id);
                let fallback = alternatives.pop().flatten();
                let mut selects = 0;
                for alternative in alternatives.into_iter().flatten() {
                    if tree.kind(alternative) == &NodeKind::Operator(Operator::Question) {
                        self.node(program, tree.left(alternative))?;
                        self.node(program, tree.right(alternative))?;
                        selects += 1;
                    }
                }
                self.node(program, fallback)?;
                program.code.extend(std::iter::repeat_n(Instruction::Select, selects));
            },
            NodeKind::Operator(_) if left.is_some() => {
                let spine = tree.left_spine(id, |link| tree.is_plain_infix(link));
                self.node(program, spine.last().and_then(|bottom| tree.left(*bottom)))?;
                for link in spine.into_iter().rev() {
                    self.node(program, tree.right(link))?;
                    if let NodeKind::Operator(op) = tree.kind(link) {
                        program.code.push(Instruction::Binary(*op));
                    }
                }
            },
            NodeKind::Operator(op) => {
                self.node(program, right)?;
                program.code.push(Instruction::Prefix(*op));
            },
            NodeKind::Call { function, .. } => {
                let args = left.map(|args| tree.elements(args)).unwrap_or_default();
                for arg in &args {
                    self.node(program, Some(*arg))?;
                }
                let function = self.function(*function);
                program.code.push(Instruction::Call { function,
                                                      arity: args.len() });
            },
            NodeKind::Functional(functional) => {
                let functional = expr.symbols.functional(*functional).clone();
                let layout = layout(tree, id);
                let slot = self.slot(functional.iterator());

                let looped = Loop { slot,
                                    min: self.program(layout.min)?,
                                    max: self.program(layout.max)?,
                                    step: layout.step
                                                .map(|step| self.program(Some(step)))
                                                .transpose()?,
                                    body: self.program(layout.body)?,
                                    functional };
                self.loops.push(looped);
                program.code.push(Instruction::Functional(self.loops.len() - 1));
            },
            NodeKind::ArgList => {
                let last = tree.elements(id).last().copied();
                self.node(program, last)?;
            },
            NodeKind::Bracket { .. } | NodeKind::NamedArg(_) => self.node(program, left)?,
            NodeKind::Interval | NodeKind::Punctuation(_) => self.constant(program, f64::NAN),
        }
        Ok(())
    }

    fn program(&mut self, id: Option<NodeId>) -> Result<Program, RuntimeError> {
        let mut program = Program::default();
        self.node(&mut program, id)?;
        Ok(program)
    }

    fn constant(&mut self, program: &mut Program, value: f64) {
        let key = (OrderedFloat(value), value.is_sign_negative());
        let index = *self.pooled.entry(key).or_insert_with(|| {
                                                 self.constants.push(value);
                                                 self.constants.len() - 1
                                             });
        program.code.push(Instruction::Constant(index));
    }

    fn variable(&mut self, program: &mut Program, id: VarId) -> Result<(), RuntimeError> {
        let expr = self.expr;
        let variable = expr.symbols.variables.get(id);
        if variable.is_constant() {
            self.constant(program, variable.value());
        } else if variable.is_private() {
            let slot = self.slot(id);
            program.code.push(Instruction::Load(slot));
        } else {
            let slot = self.parameters
                           .iter()
                           .position(|name| *name == variable.name())
                           .ok_or_else(|| RuntimeError::UnboundParameter { name: variable.name()
                                                                                         .to_string(), })?;
            program.code.push(Instruction::Load(slot));
        }
        Ok(())
    }

    fn slot(&mut self, id: VarId) -> usize {
        *self.slots.entry(id).or_insert_with(|| {
                                 self.frame_size += 1;
                                 self.frame_size - 1
                             })
    }

    fn function(&mut self, id: FunctionId) -> usize {
        if let Some(index) = self.called.get(&id) {
            return *index;
        }
        self.functions.push(self.expr.symbols.functions.get(id).clone());
        self.called.insert(id, self.functions.len() - 1);
        self.functions.len() - 1
    }
}
