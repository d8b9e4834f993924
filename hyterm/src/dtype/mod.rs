//! Value-domain lattice assigned to every term.
//!
//! Role
//! - Describe the set of values a term may take: unbounded integers, naturals, positive
//!   integers, `{0, 1}`, constant or symbolic integer ranges, and logical values.
//! - Provide the lattice operations ([`ValueType::intersection`], [`ValueType::union`],
//!   [`ValueType::type_assignable`]) and the closure table for `+ - *` (see [`arith`]).
//!
//! Integral variants are interpreted as intervals over the extended integers (see
//! [`interval`]); the symbolic [`ValueType::TermBoundedInteger`] is only interpreted as an
//! interval once both of its bounds are constants.
//!
//! Example
//! ```
//! use hyterm::dtype::{Operand, ValueType};
//!
//! let t = ValueType::NaturalNumber.addition_with_type(Operand::Literal(5)).unwrap();
//! assert_eq!(t, ValueType::PositiveInteger);
//! ```
pub mod arith;
pub mod interval;

use std::cmp::Ordering;

use crate::dtype::interval::{Extent, Interval};
use crate::error::{Error, Result};
use crate::term::Term;

pub use arith::Operand;

/// Element of the value-domain lattice.
///
/// Unparameterized variants are plain unit values; the bounded variants are small owned
/// values. A bounded variant may denote the empty set (`lo > hi`), in which case every
/// operation that needs a concrete bound reports [`Error::EmptyDomain`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValueType {
    /// Every fixed-width integer.
    #[default]
    Integer,
    /// Integers `>= 0`.
    NaturalNumber,
    /// Integers `>= 1`.
    PositiveInteger,
    /// Exactly `{0, 1}`.
    ZeroOrOne,
    /// Integers in `[lo, hi]`.
    ConstantBoundedInteger { lo: i64, hi: i64 },
    /// Integers in `[lo, hi]` where both bounds are integer terms.
    TermBoundedInteger { lo: Box<Term>, hi: Box<Term> },
    /// Truth values.
    Logical,
}

/// Integral reading of a value type, used by every lattice operation.
pub(crate) enum Domain<'a> {
    /// Known interval; `parameterized` is set for bounded variants so that results derived
    /// from them stay bounded.
    Range {
        interval: Interval,
        parameterized: bool,
    },
    /// Range with symbolic bounds.
    Symbolic { lo: &'a Term, hi: &'a Term },
}

impl ValueType {
    /// Narrowest unparameterized type containing `value`.
    pub fn of_constant(value: i64) -> ValueType {
        match value {
            0 | 1 => ValueType::ZeroOrOne,
            v if v > 1 => ValueType::PositiveInteger,
            _ => ValueType::Integer,
        }
    }

    /// Bounded type `[lo, hi]`. The range may be empty.
    pub fn bounded(lo: i64, hi: i64) -> ValueType {
        ValueType::ConstantBoundedInteger { lo, hi }
    }

    /// Bounded type whose bounds are terms.
    pub fn term_bounded(lo: Term, hi: Term) -> ValueType {
        ValueType::TermBoundedInteger {
            lo: Box::new(lo),
            hi: Box::new(hi),
        }
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, ValueType::Logical)
    }

    pub fn is_integral(&self) -> bool {
        !self.is_logical()
    }

    /// Whether this type is known to denote no value at all.
    pub fn is_empty(&self) -> bool {
        match self {
            ValueType::ConstantBoundedInteger { lo, hi } => lo > hi,
            ValueType::TermBoundedInteger { lo, hi } => {
                match (lo.as_constant(), hi.as_constant()) {
                    (Some(lo), Some(hi)) => lo > hi,
                    _ => false,
                }
            }
            _ => false,
        }
    }

    /// Concrete bounds of this type; `None` stands for an unbounded (or symbolic) end.
    pub fn bounds(&self) -> Result<(Option<i64>, Option<i64>)> {
        match self.domain("bounds")? {
            Domain::Range { interval, .. } => Ok((interval.lo.as_i64(), interval.hi.as_i64())),
            Domain::Symbolic { .. } => Ok((None, None)),
        }
    }

    /// Symbolic bounds of a [`ValueType::TermBoundedInteger`].
    pub fn term_bounds(&self) -> Option<(&Term, &Term)> {
        match self {
            ValueType::TermBoundedInteger { lo, hi } => Some((lo, hi)),
            _ => None,
        }
    }

    /// Integral reading of this type. Fails on logical and empty types.
    pub(crate) fn domain(&self, operation: &'static str) -> Result<Domain<'_>> {
        if self.is_logical() {
            return Err(Error::TypeMismatch {
                operation,
                found: self.to_string(),
            });
        }
        if self.is_empty() {
            return Err(self.empty_domain());
        }
        if let Some(interval) = self.interval() {
            return Ok(Domain::Range {
                interval,
                parameterized: self.is_parameterized(),
            });
        }
        match self.term_bounds() {
            Some((lo, hi)) => Ok(Domain::Symbolic { lo, hi }),
            None => Err(Error::TypeMismatch {
                operation,
                found: self.to_string(),
            }),
        }
    }

    /// Interval denoted by this type, if it is integral and not symbolic. Empty bounded
    /// types yield an empty interval.
    fn interval(&self) -> Option<Interval> {
        match self {
            ValueType::Integer => Some(Interval::INTEGER),
            ValueType::NaturalNumber => Some(Interval::NATURAL),
            ValueType::PositiveInteger => Some(Interval::POSITIVE),
            ValueType::ZeroOrOne => Some(Interval::ZERO_OR_ONE),
            ValueType::ConstantBoundedInteger { lo, hi } => Some(Interval::new(*lo, *hi)),
            ValueType::TermBoundedInteger { lo, hi } => {
                Some(Interval::new(lo.as_constant()?, hi.as_constant()?))
            }
            ValueType::Logical => None,
        }
    }

    fn is_parameterized(&self) -> bool {
        matches!(
            self,
            ValueType::ConstantBoundedInteger { .. } | ValueType::TermBoundedInteger { .. }
        )
    }

    fn empty_domain(&self) -> Error {
        match self {
            ValueType::ConstantBoundedInteger { lo, hi } => Error::EmptyDomain {
                lo: lo.to_string(),
                hi: hi.to_string(),
            },
            ValueType::TermBoundedInteger { lo, hi } => Error::EmptyDomain {
                lo: lo.to_string(),
                hi: hi.to_string(),
            },
            _ => Error::EmptyDomain {
                lo: String::from("?"),
                hi: String::from("?"),
            },
        }
    }

    /// Map an interval back onto the lattice.
    ///
    /// A finite interval stays a [`ValueType::ConstantBoundedInteger`] when `parameterized`
    /// is set. Otherwise the narrowest unparameterized type containing the interval is
    /// selected, preferring `ZeroOrOne`, then `PositiveInteger`, `NaturalNumber` and
    /// finally `Integer`.
    pub(crate) fn from_interval(interval: Interval, parameterized: bool) -> ValueType {
        if parameterized {
            if let (Some(lo), Some(hi)) = (interval.lo.as_i64(), interval.hi.as_i64()) {
                return ValueType::ConstantBoundedInteger { lo, hi };
            }
        }
        Self::narrowest_unparameterized(&interval)
    }

    fn narrowest_unparameterized(interval: &Interval) -> ValueType {
        [
            (Interval::ZERO_OR_ONE, ValueType::ZeroOrOne),
            (Interval::POSITIVE, ValueType::PositiveInteger),
            (Interval::NATURAL, ValueType::NaturalNumber),
        ]
        .into_iter()
        .find(|(candidate, _)| candidate.contains(interval))
        .map(|(_, ty)| ty)
        .unwrap_or(ValueType::Integer)
    }

    /// Unparameterized type denoting exactly `interval`, if any.
    fn exact_unparameterized(interval: &Interval) -> Option<ValueType> {
        [
            (Interval::INTEGER, ValueType::Integer),
            (Interval::NATURAL, ValueType::NaturalNumber),
            (Interval::POSITIVE, ValueType::PositiveInteger),
            (Interval::ZERO_OR_ONE, ValueType::ZeroOrOne),
        ]
        .into_iter()
        .find(|(candidate, _)| candidate == interval)
        .map(|(_, ty)| ty)
    }

    /// Narrowest common subtype of both types, `None` if they share no value.
    ///
    /// Symbolic ranges cannot be intersected with a different domain. With one term-bounded
    /// side the result is an over-approximation: the other side, unless that side is
    /// `Integer` in which case the term-bounded one is exact. Two different term-bounded
    /// sides give `self`. An over-approximated result may be non-empty when the exact meet
    /// is empty.
    pub fn intersection(&self, other: &ValueType) -> Option<ValueType> {
        match (self, other) {
            (ValueType::Logical, ValueType::Logical) => return Some(ValueType::Logical),
            (ValueType::Logical, _) | (_, ValueType::Logical) => return None,
            _ => {}
        }
        if self.is_empty() || other.is_empty() {
            return None;
        }
        if self == other {
            return Some(self.clone());
        }

        let (lhs, rhs) = match (self.interval(), other.interval()) {
            (Some(lhs), Some(rhs)) => (lhs, rhs),
            (None, None) => return Some(self.clone()),
            (None, Some(_)) => return Some(Self::meet_with_symbolic(self, other)),
            (Some(_), None) => return Some(Self::meet_with_symbolic(other, self)),
        };

        let interval = lhs.intersect(&rhs)?;
        if !self.is_parameterized() && !other.is_parameterized() {
            if let Some(exact) = Self::exact_unparameterized(&interval) {
                return Some(exact);
            }
        }
        Some(Self::from_interval(interval, interval.is_finite()))
    }

    fn meet_with_symbolic(symbolic: &ValueType, known: &ValueType) -> ValueType {
        match known {
            ValueType::Integer => symbolic.clone(),
            known => known.clone(),
        }
    }

    /// Narrowest supertype of both types that a single lattice element represents, `None`
    /// when there is none (mixing logical and integral values).
    pub fn union(&self, other: &ValueType) -> Option<ValueType> {
        match (self, other) {
            (ValueType::Logical, ValueType::Logical) => return Some(ValueType::Logical),
            (ValueType::Logical, _) | (_, ValueType::Logical) => return None,
            _ => {}
        }
        if self.is_empty() {
            return Some(other.clone());
        }
        if other.is_empty() || self == other {
            return Some(self.clone());
        }

        let (lhs, rhs) = match (self.interval(), other.interval()) {
            (Some(lhs), Some(rhs)) => (lhs, rhs),
            _ => return Some(ValueType::Integer),
        };

        let hull = lhs.hull(&rhs);
        let parameterized = self.is_parameterized() || other.is_parameterized();
        Some(Self::from_interval(hull, parameterized))
    }

    /// Whether every value of `self` is a value of `target`, i.e. whether a term of type
    /// `self` may be stored in a declaration of type `target`.
    pub fn type_assignable(&self, target: &ValueType) -> bool {
        match (self, target) {
            (ValueType::Logical, ValueType::Logical) => return true,
            (ValueType::Logical, _) | (_, ValueType::Logical) => return false,
            _ => {}
        }
        if self.is_empty() || self == target || *target == ValueType::Integer {
            return true;
        }
        match (self.interval(), target.interval()) {
            (Some(value), Some(declared)) => declared.contains(&value),
            _ => false,
        }
    }
}

impl PartialOrd for ValueType {
    /// Subtype ordering: `a < b` iff `a` is a strict subtype of `b`. Distinct types that
    /// denote the same values (two empty ranges, `[0..1]` and `ZeroOrOne`) are unordered,
    /// so that `Equal` agrees with `==`.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        match (self.type_assignable(other), other.type_assignable(self)) {
            (true, true) => None,
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (false, false) => None,
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Integer => write!(f, "Integer"),
            ValueType::NaturalNumber => write!(f, "NaturalNumber"),
            ValueType::PositiveInteger => write!(f, "PositiveInteger"),
            ValueType::ZeroOrOne => write!(f, "ZeroOrOne"),
            ValueType::ConstantBoundedInteger { lo, hi } => write!(f, "[{lo}..{hi}]"),
            ValueType::TermBoundedInteger { lo, hi } => write!(f, "[{lo}..{hi}]"),
            ValueType::Logical => write!(f, "Logical"),
        }
    }
}

impl Extent {
    fn to_term(self) -> Option<Term> {
        self.as_i64().map(Term::constant)
    }
}

impl Interval {
    /// Finite bounds as constant terms.
    pub(crate) fn to_terms(self) -> Option<(Term, Term)> {
        Some((self.lo.to_term()?, self.hi.to_term()?))
    }
}
