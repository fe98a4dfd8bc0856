use std::{collections::HashMap, fmt, sync::Arc};

/// Handle of a function inside its [`FunctionTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(pub(crate) usize);

/// A caller-supplied function body.
pub type NativeFn = Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>;

/// A builtin body, stored as a plain function pointer.
#[derive(Debug, Clone, Copy)]
pub enum Builtin {
    /// Takes one argument.
    Unary(fn(f64) -> f64),
    /// Takes two arguments.
    Binary(fn(f64, f64) -> f64),
}

#[derive(Clone)]
enum Body {
    Builtin(Builtin),
    Native(NativeFn),
}

/// A callable with a fixed arity.
#[derive(Clone)]
pub struct Function {
    name:  String,
    arity: usize,
    body:  Body,
}

impl Function {
    /// Wraps a closure as a function of `arity` arguments.
    ///
    /// ## Example
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mathtree::{Parser, symbols::function::Function};
    ///
    /// let parser = Parser::new().on_function_lookup(|name, arity| {
    ///                               (name == "avg" && arity == 3).then(|| {
    ///                                   Function::native("avg", 3, Arc::new(|args: &[f64]| {
    ///                                       args.iter().sum::<f64>() / 3.0
    ///                                   }))
    ///                               })
    ///                           });
    ///
    /// assert_eq!(parser.parse("avg(1, 2, 6)").unwrap().evaluate(), 3.0);
    /// ```
    #[must_use]
    pub fn native(name: &str, arity: usize, body: NativeFn) -> Self {
        Self { name: name.to_string(),
               arity,
               body: Body::Native(body) }
    }

    fn builtin(name: &str, body: Builtin) -> Self {
        let arity = match body {
            Builtin::Unary(_) => 1,
            Builtin::Binary(_) => 2,
        };
        Self { name: name.to_string(),
               arity,
               body: Body::Builtin(body) }
    }

    /// The name the function was resolved under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of arguments.
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.arity
    }

    /// Whether the function is builtin, and therefore pure.
    #[must_use]
    pub const fn is_builtin(&self) -> bool {
        matches!(self.body, Body::Builtin(_))
    }

    /// Calls the function. Missing arguments read as NaN.
    #[must_use]
    pub fn call(&self, args: &[f64]) -> f64 {
        let arg = |index: usize| args.get(index).copied().unwrap_or(f64::NAN);
        match &self.body {
            Body::Builtin(Builtin::Unary(f)) => f(arg(0)),
            Body::Builtin(Builtin::Binary(f)) => f(arg(0), arg(1)),
            Body::Native(f) => f(args),
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
         .field("name", &self.name)
         .field("arity", &self.arity)
         .field("builtin", &self.is_builtin())
         .finish()
    }
}

/// A builtin function definition.
pub struct BuiltinDef {
    /// Every name the function answers to.
    pub names: &'static [&'static str],
    /// The body; its variant fixes the arity.
    pub body:  Builtin,
}

/// Generates the builtin function table.
///
/// Each entry is `[names...] => unary|binary body`, the body being a path or a
/// closure coercible to a function pointer.
macro_rules! builtin_functions {
    ($([$($name:literal),+] => $kind:ident $body:expr),* $(,)?) => {
        /// Every builtin function.
        pub const BUILTIN_FUNCTIONS: &[BuiltinDef] = &[
            $(BuiltinDef { names: &[$($name),+], body: builtin_functions!(@body $kind $body) }),*
        ];
    };
    (@body unary $body:expr) => { Builtin::Unary($body) };
    (@body binary $body:expr) => { Builtin::Binary($body) };
}

builtin_functions! {
    ["sin", "Sin", "SIN"] => unary f64::sin,
    ["cos", "Cos", "COS"] => unary f64::cos,
    ["tan", "Tan", "TAN", "tg"] => unary f64::tan,
    ["ctg", "Ctg", "cot"] => unary ctg,
    ["asin"] => unary f64::asin,
    ["acos"] => unary f64::acos,
    ["atan", "Atan", "ATAN", "arctg"] => unary f64::atan,
    ["sinh"] => unary f64::sinh,
    ["cosh"] => unary f64::cosh,
    ["tanh"] => unary f64::tanh,
    ["abs", "Abs", "ABS"] => unary f64::abs,
    ["sign", "Sign", "sgn"] => unary sign,
    ["exp", "Exp", "EXP"] => unary f64::exp,
    ["sqrt", "Sqrt", "SQRT", "√"] => unary f64::sqrt,
    ["log10", "lg", "Lg", "Log10"] => unary f64::log10,
    ["ln", "Ln", "LN", "loge"] => unary f64::ln,
    ["floor"] => unary f64::floor,
    ["ceil"] => unary f64::ceil,
    ["round"] => unary f64::round,
    ["atan2", "Atan2"] => binary f64::atan2,
    ["pow", "Pow"] => binary f64::powf,
    ["log", "Log"] => binary log,
    ["min"] => binary f64::min,
    ["max"] => binary f64::max,
    ["hypot"] => binary f64::hypot,
}

fn ctg(x: f64) -> f64 {
    1.0 / x.tan()
}

/// `-1`, `0` or `1`; NaN stays NaN.
fn sign(x: f64) -> f64 {
    if x == 0.0 || x.is_nan() { x } else { x.signum() }
}

/// Logarithm of `value` in `base`.
fn log(base: f64, value: f64) -> f64 {
    value.log(base)
}

/// Finds a builtin function by name and arity.
///
/// ## Example
/// ```
/// use mathtree::symbols::function::builtin;
///
/// assert_eq!(builtin("lg", 1).unwrap().call(&[1000.0]), 3.0);
/// assert!(builtin("lg", 2).is_none());
/// ```
#[must_use]
pub fn builtin(name: &str, arity: usize) -> Option<Function> {
    BUILTIN_FUNCTIONS.iter()
                     .find(|def| def.names.contains(&name))
                     .map(|def| Function::builtin(name, def.body))
                     .filter(|function| function.arity() == arity)
}

/// Functions resolved by one expression, deduplicated by name and arity.
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    functions: Vec<Function>,
    by_key:    HashMap<(String, usize), FunctionId>,
}

impl FunctionTable {
    /// Adds a function, or returns the id of the one already registered under
    /// the same name and arity.
    pub fn intern(&mut self, function: Function) -> FunctionId {
        let key = (function.name.clone(), function.arity);
        if let Some(id) = self.by_key.get(&key) {
            return *id;
        }
        let id = FunctionId(self.functions.len());
        self.by_key.insert(key, id);
        self.functions.push(function);
        id
    }

    /// Finds a registered function.
    #[must_use]
    pub fn lookup(&self, name: &str, arity: usize) -> Option<FunctionId> {
        self.by_key.get(&(name.to_string(), arity)).copied()
    }

    /// Gets a function.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this table.
    #[must_use]
    pub fn get(&self, id: FunctionId) -> &Function {
        &self.functions[id.0]
    }

    /// Iterates over functions with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (FunctionId, &Function)> {
        self.functions.iter().enumerate().map(|(index, function)| (FunctionId(index), function))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_of_zero_is_zero() {
        let sign = builtin("sgn", 1).unwrap();

        assert_eq!(sign.call(&[0.0]), 0.0);
        assert_eq!(sign.call(&[-3.0]), -1.0);
        assert!(sign.call(&[f64::NAN]).is_nan());
    }

    #[test]
    fn log_takes_the_base_first() {
        let log = builtin("Log", 2).unwrap();

        assert!((log.call(&[2.0, 8.0]) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn aliases_resolve_to_the_same_body() {
        let a = builtin("arctg", 1).unwrap();
        let b = builtin("atan", 1).unwrap();

        assert_eq!(a.call(&[1.0]), b.call(&[1.0]));
        assert_eq!(a.name(), "arctg");
    }

    #[test]
    fn table_deduplicates_by_name_and_arity() {
        let mut table = FunctionTable::default();
        let first = table.intern(builtin("sin", 1).unwrap());
        let second = table.intern(builtin("sin", 1).unwrap());
        let native = table.intern(Function::native("sin", 2, Arc::new(|_: &[f64]| 0.0)));

        assert_eq!(first, second);
        assert_ne!(first, native);
        assert_eq!(table.lookup("sin", 2), Some(native));
    }
}
