//! Closure table of the lattice under `+`, `-` and `*`.
//!
//! The result type of `lhs op rhs` is obtained with a single match over both operand
//! domains: known ranges are combined with interval arithmetic and mapped back onto the
//! lattice, symbolic ranges are combined term-wise for `+` and `-`.
//!
//! | lhs               | op  | rhs               | result            |
//! |-------------------|-----|-------------------|-------------------|
//! | `NaturalNumber`   | `+` | `PositiveInteger` | `PositiveInteger` |
//! | `NaturalNumber`   | `-` | `PositiveInteger` | `Integer`         |
//! | `ZeroOrOne`       | `*` | `ZeroOrOne`       | `ZeroOrOne`       |
//! | `NaturalNumber`   | `*` | literal `0`       | `ZeroOrOne`       |
//! | `NaturalNumber`   | `+` | literal `5`       | `PositiveInteger` |
//! | `NaturalNumber`   | `+` | literal `-3`      | `Integer`         |
//! | `[1..3]`          | `+` | `[10..20]`        | `[11..23]`        |
//! | `[lo..hi]` (terms)| `+` | literal `1`       | `[lo + 1..hi + 1]`|
use crate::dtype::interval::Interval;
use crate::dtype::{Domain, ValueType};
use crate::error::Result;
use crate::term::{BinaryOperator, Term};

/// Right-hand side of an arithmetic type query.
///
/// A raw literal is a degenerate operand: it denotes exactly one value and never makes
/// the result a bounded type on its own.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    Type(&'a ValueType),
    Literal(i64),
}

impl<'a> From<&'a ValueType> for Operand<'a> {
    fn from(value: &'a ValueType) -> Self {
        Operand::Type(value)
    }
}

impl From<i64> for Operand<'_> {
    fn from(value: i64) -> Self {
        Operand::Literal(value)
    }
}

impl<'a> Operand<'a> {
    /// Operand describing `term`: constants are passed as literals.
    pub fn of_term(term: &'a Term) -> Self {
        match term.as_constant() {
            Some(value) => Operand::Literal(value),
            None => Operand::Type(term.dtype()),
        }
    }

    fn domain(&self, operation: &'static str) -> Result<Domain<'a>> {
        match self {
            Operand::Type(ty) => ty.domain(operation),
            Operand::Literal(value) => Ok(Domain::Range {
                interval: Interval::point(*value),
                parameterized: false,
            }),
        }
    }
}

impl ValueType {
    /// Type of `self + rhs`.
    pub fn addition_with_type<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<ValueType> {
        self.result_type(BinaryOperator::Addition, rhs.into())
    }

    /// Type of `self - rhs`.
    pub fn subtraction_with_type<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<ValueType> {
        self.result_type(BinaryOperator::Subtraction, rhs.into())
    }

    /// Type of `self * rhs`.
    pub fn multiplication_with_type<'a>(
        &self,
        rhs: impl Into<Operand<'a>>,
    ) -> Result<ValueType> {
        self.result_type(BinaryOperator::Multiplication, rhs.into())
    }

    /// Type of `self op rhs`. Fails with `EmptyDomain` if either operand is an empty
    /// bounded type and with `TypeMismatch` on logical operands.
    pub fn result_type(&self, op: BinaryOperator, rhs: Operand<'_>) -> Result<ValueType> {
        let lhs = self.domain(op.name())?;
        let rhs = rhs.domain(op.name())?;

        match (lhs, rhs) {
            (
                Domain::Range {
                    interval: l,
                    parameterized: lp,
                },
                Domain::Range {
                    interval: r,
                    parameterized: rp,
                },
            ) => {
                let interval = match op {
                    BinaryOperator::Addition => l.add(&r),
                    BinaryOperator::Subtraction => l.sub(&r),
                    BinaryOperator::Multiplication => l.mul(&r),
                };
                Ok(ValueType::from_interval(interval, lp || rp))
            }
            (lhs, rhs) => symbolic_result_type(op, lhs, rhs),
        }
    }
}

/// Result type when at least one side has symbolic bounds.
fn symbolic_result_type(op: BinaryOperator, lhs: Domain<'_>, rhs: Domain<'_>) -> Result<ValueType> {
    let (Some((l_lo, l_hi)), Some((r_lo, r_hi))) = (bound_terms(lhs), bound_terms(rhs)) else {
        return Ok(ValueType::Integer);
    };

    let (lo, hi) = match op {
        BinaryOperator::Addition => (
            Term::addition(l_lo, r_lo)?,
            Term::addition(l_hi, r_hi)?,
        ),
        BinaryOperator::Subtraction => (
            Term::subtraction(l_lo, r_hi)?,
            Term::subtraction(l_hi, r_lo)?,
        ),
        BinaryOperator::Multiplication => return Ok(ValueType::Integer),
    };
    Ok(ValueType::term_bounded(lo.evaluated()?, hi.evaluated()?))
}

/// Bounds of a domain as terms, `None` when a bound is infinite.
fn bound_terms(domain: Domain<'_>) -> Option<(Term, Term)> {
    match domain {
        Domain::Range { interval, .. } => interval.to_terms(),
        Domain::Symbolic { lo, hi } => Some((lo.clone(), hi.clone())),
    }
}
