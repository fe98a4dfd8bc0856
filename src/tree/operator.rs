use std::fmt;

/// Priority of the interval (`min..max`) node, between comparisons and
/// additive operators.
pub const INTERVAL_PRIORITY: u8 = 6;

/// A binary (or prefix) operator recognized by the assembler.
///
/// Every operator has a fixed priority class. Equal priorities associate to
/// the left, exponentiation included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `:`, labels a value (`name: value`) or closes a conditional.
    Colon,
    /// `?`, opens a conditional `c ? a : b`.
    Question,
    /// `|`, logical or.
    Or,
    /// `&`, logical and.
    And,
    /// `=`, equality; binds the iterator inside functional parameters.
    Equal,
    /// `≠`
    NotEqual,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `+`, binary or prefix.
    Add,
    /// `-`, binary or prefix.
    Sub,
    /// `*`, `×` or `·`.
    Mul,
    /// Multiplication synthesized for juxtaposed operands such as `3(x+1)`.
    ImplicitMul,
    /// `/`
    Div,
    /// `!`, prefix logical not.
    Not,
    /// `^`
    Pow,
}

impl Operator {
    /// Maps a glyph to its operator.
    ///
    /// ## Example
    /// ```
    /// use mathtree::tree::operator::Operator;
    ///
    /// assert_eq!(Operator::from_glyph('×'), Some(Operator::Mul));
    /// assert_eq!(Operator::from_glyph('#'), None);
    /// ```
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            ':' => Some(Self::Colon),
            '?' => Some(Self::Question),
            '|' => Some(Self::Or),
            '&' => Some(Self::And),
            '=' => Some(Self::Equal),
            '≠' => Some(Self::NotEqual),
            '<' => Some(Self::Less),
            '>' => Some(Self::Greater),
            '+' => Some(Self::Add),
            '-' => Some(Self::Sub),
            '*' | '×' | '·' => Some(Self::Mul),
            '/' => Some(Self::Div),
            '!' => Some(Self::Not),
            '^' => Some(Self::Pow),
            _ => None,
        }
    }

    /// The priority class; larger binds tighter.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Colon => 1,
            Self::Question => 2,
            Self::Or => 3,
            Self::And => 4,
            Self::Equal | Self::NotEqual | Self::Less | Self::Greater => 5,
            Self::Add | Self::Sub => 7,
            Self::Mul | Self::ImplicitMul | Self::Div => 8,
            Self::Not => 9,
            Self::Pow => 10,
        }
    }

    /// Whether the operator may appear without a left operand.
    #[must_use]
    pub const fn is_prefix(self) -> bool {
        matches!(self, Self::Add | Self::Sub | Self::Not)
    }

    /// The glyph used when re-stringifying; implicit multiplication has none.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Colon => ":",
            Self::Question => "?",
            Self::Or => "|",
            Self::And => "&",
            Self::Equal => "=",
            Self::NotEqual => "≠",
            Self::Less => "<",
            Self::Greater => ">",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::ImplicitMul => "",
            Self::Div => "/",
            Self::Not => "!",
            Self::Pow => "^",
        }
    }

    /// Applies the operator to two values.
    ///
    /// Comparisons and logical operators yield `1.0` or `0.0`. `?` yields
    /// `rhs` when `lhs` holds and NaN otherwise, `:` yields `rhs`.
    #[must_use]
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Colon => rhs,
            Self::Question => {
                if truth(lhs) {
                    rhs
                } else {
                    f64::NAN
                }
            },
            Self::Or => flag(truth(lhs) || truth(rhs)),
            Self::And => flag(truth(lhs) && truth(rhs)),
            #[allow(clippy::float_cmp)]
            Self::Equal => flag(lhs == rhs),
            #[allow(clippy::float_cmp)]
            Self::NotEqual => flag(lhs != rhs),
            Self::Less => flag(lhs < rhs),
            Self::Greater => flag(lhs > rhs),
            Self::Add => lhs + rhs,
            Self::Sub => lhs - rhs,
            Self::Mul | Self::ImplicitMul => lhs * rhs,
            Self::Div => lhs / rhs,
            Self::Not => flag(!truth(rhs)),
            Self::Pow => lhs.powf(rhs),
        }
    }

    /// Applies the operator in prefix position; `-x` is `0 - x`.
    #[must_use]
    pub fn apply_prefix(self, operand: f64) -> f64 {
        match self {
            Self::Add => operand,
            Self::Sub => 0.0 - operand,
            Self::Not => flag(!truth(operand)),
            _ => f64::NAN,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

/// Reads a number as a truth value; NaN is false.
#[must_use]
pub fn truth(value: f64) -> bool {
    value != 0.0 && !value.is_nan()
}

/// Writes a truth value as a number.
#[must_use]
pub const fn flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}
