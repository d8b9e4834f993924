//! Patterns used by rewrite rules.
//!
//! A [`Pattern`] is a separate type from [`Term`]: wildcards can only appear in rule
//! definitions and can never leak into a tree handed to, or returned to, a caller.
//!
//! Wildcards are identified by a small integer, unique within one rule, and restricted by
//! a [`WildcardKind`]. Patterns compose with `+`, `-` and `*`:
//! ```
//! use hyterm::rewrite::pattern::{any, cst};
//!
//! let p = cst(0) * any(1) + any(1);
//! assert_eq!(p.to_string(), "#0 * ?1 + ?1");
//! ```
use std::collections::BTreeSet;

use strum::EnumIs;

use crate::term::{BinaryOperator, Node, Term};

/// Restriction on what a wildcard may bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs)]
pub enum WildcardKind {
    /// Any subterm.
    Anything,
    /// A numeric constant.
    Constant,
    /// A scalar or array variable.
    Variable,
}

impl WildcardKind {
    /// Whether `term` may be bound by a wildcard of this kind.
    pub fn admits(self, term: &Term) -> bool {
        match self {
            WildcardKind::Anything => true,
            WildcardKind::Constant => term.is_constant(),
            WildcardKind::Variable => {
                matches!(term.node(), Node::Variable(_) | Node::ArrayVariable { .. })
            }
        }
    }

    fn sigil(self) -> char {
        match self {
            WildcardKind::Anything => '?',
            WildcardKind::Constant => '#',
            WildcardKind::Variable => '$',
        }
    }
}

/// Left- or right-hand side of a rewrite rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Wildcard {
        kind: WildcardKind,
        id: u8,
    },
    Constant(i64),
    Binary {
        op: BinaryOperator,
        left: Box<Pattern>,
        right: Box<Pattern>,
    },
}

/// Wildcard matching any subterm.
pub fn any(id: u8) -> Pattern {
    Pattern::Wildcard {
        kind: WildcardKind::Anything,
        id,
    }
}

/// Wildcard matching numeric constants only.
pub fn cst(id: u8) -> Pattern {
    Pattern::Wildcard {
        kind: WildcardKind::Constant,
        id,
    }
}

/// Wildcard matching variables only.
pub fn var(id: u8) -> Pattern {
    Pattern::Wildcard {
        kind: WildcardKind::Variable,
        id,
    }
}

/// Literal constant.
pub fn lit(value: i64) -> Pattern {
    Pattern::Constant(value)
}

impl Pattern {
    pub fn binary(op: BinaryOperator, left: Pattern, right: Pattern) -> Pattern {
        Pattern::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Ids of every wildcard occurring in this pattern.
    pub fn wildcards(&self) -> BTreeSet<u8> {
        let mut out = BTreeSet::new();
        let mut stack = vec![self];
        while let Some(p) = stack.pop() {
            match p {
                Pattern::Wildcard { id, .. } => {
                    out.insert(*id);
                }
                Pattern::Constant(_) => {}
                Pattern::Binary { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        out
    }

    fn precedence(&self) -> u8 {
        match self {
            Pattern::Binary { op, .. } => op.precedence(),
            _ => u8::MAX,
        }
    }
}

impl Term {
    /// Fast shape check: whether the operator skeleton of this tree is compatible with the
    /// skeleton of `pattern`. Wildcards are checked against their kind only; consistency of
    /// repeated wildcards is left to the full match.
    pub fn matches(&self, pattern: &Pattern) -> bool {
        match pattern {
            Pattern::Wildcard { kind, .. } => kind.admits(self),
            Pattern::Constant(value) => self.as_constant() == Some(*value),
            Pattern::Binary { op, left, right } => match self.as_binary() {
                Some((o, l, r)) if o == *op => l.matches(left) && r.matches(right),
                _ => false,
            },
        }
    }
}

macro_rules! impl_pattern_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl std::ops::$trait for Pattern {
            type Output = Pattern;

            fn $method(self, rhs: Pattern) -> Pattern {
                Pattern::binary($op, self, rhs)
            }
        }
    };
}

impl_pattern_op!(Add, add, BinaryOperator::Addition);
impl_pattern_op!(Sub, sub, BinaryOperator::Subtraction);
impl_pattern_op!(Mul, mul, BinaryOperator::Multiplication);

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pattern::Wildcard { kind, id } => write!(f, "{}{id}", kind.sigil()),
            Pattern::Constant(value) => write!(f, "{value}"),
            Pattern::Binary { op, left, right } => {
                if left.precedence() < op.precedence() {
                    write!(f, "({left})")?;
                } else {
                    write!(f, "{left}")?;
                }
                write!(f, " {op} ")?;
                if right.precedence() <= op.precedence() {
                    write!(f, "({right})")
                } else {
                    write!(f, "{right}")
                }
            }
        }
    }
}
