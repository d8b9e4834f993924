use strum::{Display, EnumIter, EnumIs, FromRepr};

/// Discriminant of a [`Term`](crate::term::Term) node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumIs, FromRepr)]
#[repr(u8)]
pub enum TermType {
    // Leaves
    Constant,
    Variable,

    // Opaque atoms
    ArrayVariable,
    FunctionValue,
    Summation,

    // Arithmetic
    Binary,
    Linear,
}

/// Arithmetic operators of the algebra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumIs, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOperator {
    #[strum(to_string = "+")]
    Addition,
    #[strum(to_string = "-")]
    Subtraction,
    #[strum(to_string = "*")]
    Multiplication,
}

impl BinaryOperator {
    /// Human-readable name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            BinaryOperator::Addition => "addition",
            BinaryOperator::Subtraction => "subtraction",
            BinaryOperator::Multiplication => "multiplication",
        }
    }

    /// Whether chains of this operator can be flattened and reordered.
    pub fn is_associative(self) -> bool {
        !matches!(self, BinaryOperator::Subtraction)
    }

    /// Neutral element of associative operators.
    pub fn identity(self) -> Option<i64> {
        match self {
            BinaryOperator::Addition => Some(0),
            BinaryOperator::Multiplication => Some(1),
            BinaryOperator::Subtraction => None,
        }
    }

    /// Fixed-width (wrapping) evaluation on constants.
    pub fn fold(self, lhs: i64, rhs: i64) -> i64 {
        match self {
            BinaryOperator::Addition => lhs.wrapping_add(rhs),
            BinaryOperator::Subtraction => lhs.wrapping_sub(rhs),
            BinaryOperator::Multiplication => lhs.wrapping_mul(rhs),
        }
    }

    /// Binding strength used when printing, higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Addition | BinaryOperator::Subtraction => 1,
            BinaryOperator::Multiplication => 2,
        }
    }
}
