use crate::{
    error::RuntimeError,
    functional::Functional,
    symbols::function::Function,
    tree::{Operator, operator::truth},
};

/// One step of a stack program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Pushes an entry of the constant pool.
    Constant(usize),
    /// Pushes a frame slot.
    Load(usize),
    /// Replaces the top of the stack by the operator applied in prefix
    /// position.
    Prefix(Operator),
    /// Pops the right then the left operand and pushes the result.
    Binary(Operator),
    /// Pops `otherwise`, `then` and `condition`; pushes `then` when the
    /// condition holds.
    Select,
    /// Pops `arity` arguments and pushes the result of the function.
    Call {
        /// Index into the function table.
        function: usize,
        /// Number of arguments on the stack.
        arity:    usize,
    },
    /// Runs a loop and pushes its result.
    Functional(usize),
}

/// A straight-line sequence of instructions leaving one value on the stack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub(crate) code: Vec<Instruction>,
}

impl Program {
    /// The instructions in execution order.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.code
    }
}

/// A lowered functional call site.
#[derive(Debug, Clone)]
pub(crate) struct Loop {
    pub(crate) functional: Functional,
    pub(crate) slot:       usize,
    pub(crate) min:        Program,
    pub(crate) max:        Program,
    pub(crate) step:       Option<Program>,
    pub(crate) body:       Program,
}

/// An expression lowered to a stack machine, called with positional
/// arguments.
///
/// ## Example
/// ```
/// use mathtree::Expression;
///
/// let f = Expression::parse("a*x + b").unwrap().compile(&["x", "a", "b"]).unwrap();
///
/// assert_eq!(f.call(&[2.0, 3.0, 1.0]).unwrap(), 7.0);
/// assert_eq!(f.parameters(), ["x", "a", "b"]);
/// assert!(f.call(&[1.0]).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct CompiledFunction {
    pub(crate) parameters: Vec<String>,
    pub(crate) frame_size: usize,
    pub(crate) constants:  Vec<f64>,
    pub(crate) functions:  Vec<Function>,
    pub(crate) loops:      Vec<Loop>,
    pub(crate) main:       Program,
}

impl CompiledFunction {
    /// Parameter names in call order.
    #[must_use]
    pub fn parameters(&self) -> Vec<&str> {
        self.parameters.iter().map(String::as_str).collect()
    }

    /// The top-level program.
    #[must_use]
    pub const fn program(&self) -> &Program {
        &self.main
    }

    /// Evaluates the function.
    ///
    /// # Errors
    /// Returns `ArgumentCountMismatch` unless exactly one argument per
    /// parameter is given.
    pub fn call(&self, args: &[f64]) -> Result<f64, RuntimeError> {
        if args.len() != self.parameters.len() {
            return Err(RuntimeError::ArgumentCountMismatch { expected: self.parameters.len(),
                                                             found:    args.len(), });
        }
        let mut frame = vec![0.0; self.frame_size];
        frame[..args.len()].copy_from_slice(args);
        let mut stack = Vec::new();

        Ok(self.execute(&self.main, &mut frame, &mut stack))
    }

    fn execute(&self, program: &Program, frame: &mut [f64], stack: &mut Vec<f64>) -> f64 {
        let base = stack.len();

        for instruction in &program.code {
            match *instruction {
                Instruction::Constant(index) => stack.push(self.constants[index]),
                Instruction::Load(slot) => stack.push(frame[slot]),
                Instruction::Prefix(op) => {
                    let operand = pop(stack);
                    stack.push(op.apply_prefix(operand));
                },
                Instruction::Binary(op) => {
                    let rhs = pop(stack);
                    let lhs = pop(stack);
                    stack.push(op.apply(lhs, rhs));
                },
                Instruction::Select => {
                    let otherwise = pop(stack);
                    let then = pop(stack);
                    let condition = pop(stack);
                    stack.push(if truth(condition) { then } else { otherwise });
                },
                Instruction::Call { function, arity } => {
                    let args = stack.split_off(stack.len().saturating_sub(arity).max(base));
                    stack.push(self.functions[function].call(&args));
                },
                Instruction::Functional(index) => {
                    let value = self.run_loop(&self.loops[index], frame, stack);
                    stack.push(value);
                },
            }
        }

        let value = pop(stack);
        stack.truncate(base);
        value
    }

    fn run_loop(&self, looped: &Loop, frame: &mut [f64], stack: &mut Vec<f64>) -> f64 {
        let min = self.execute(&looped.min, frame, stack);
        let max = self.execute(&looped.max, frame, stack);
        let step = looped.step.as_ref().map(|step| self.execute(step, frame, stack));

        looped.functional.run(min, max, step, |x| {
                              frame[looped.slot] = x;
                              self.execute(&looped.body, frame, stack)
                          })
    }
}

fn pop(stack: &mut Vec<f64>) -> f64 {
    stack.pop().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Expression;

    fn is_send_sync<T: Send + Sync>() {}

    #[test]
    fn compiled_functions_can_cross_threads() {
        is_send_sync::<CompiledFunction>();

        let f = Expression::parse("x^2").unwrap().compile(&["x"]).unwrap();
        let handle = std::thread::spawn(move || f.call(&[3.0]).unwrap());

        assert_eq!(handle.join().unwrap(), 9.0);
    }

    #[test]
    fn constants_are_pooled_once() {
        let f = Expression::parse("1 + x + 1").unwrap().compile(&["x"]).unwrap();

        assert_eq!(f.constants, [1.0]);
        assert_eq!(f.program().instructions(),
                   [Instruction::Constant(0),
                    Instruction::Load(0),
                    Instruction::Binary(Operator::Add),
                    Instruction::Constant(0),
                    Instruction::Binary(Operator::Add)]);
    }

    #[test]
    fn ternaries_lower_to_select() {
        let f = Expression::parse("x > 0 ? 1 : -1").unwrap().compile(&["x"]).unwrap();

        assert!(f.program().instructions().contains(&Instruction::Select));
        assert_eq!(f.call(&[5.0]).unwrap(), 1.0);
        assert_eq!(f.call(&[-5.0]).unwrap(), -1.0);
    }

    #[test]
    fn ternary_chains_lower_to_nested_selects() {
        let f = Expression::parse("x > 0 ? 1 : x < 0 ? -1 : 0").unwrap().compile(&["x"]).unwrap();
        let selects = f.program()
                       .instructions()
                       .iter()
                       .filter(|instruction| **instruction == Instruction::Select)
                       .count();

        assert_eq!(selects, 2);
        assert_eq!(f.call(&[-5.0]).unwrap(), -1.0);
    }

    #[test]
    fn every_call_gets_a_fresh_frame() {
        let f = Expression::parse("summ{i=1..n}{i}").unwrap().compile(&["n"]).unwrap();

        assert_eq!(f.call(&[4.0]).unwrap(), 10.0);
        assert_eq!(f.call(&[3.0]).unwrap(), 6.0);
        assert_eq!(f.frame_size, 2);
    }

    #[test]
    fn wrong_argument_counts_are_rejected() {
        let f = Expression::parse("x + y").unwrap().compile(&["x", "y"]).unwrap();

        assert_eq!(f.call(&[1.0]),
                   Err(RuntimeError::ArgumentCountMismatch { expected: 2,
                                                             found:    1, }));
    }
}
