//! Free-function builders, convenient for tests and front-ends.
//!
//! ```
//! use hyterm::term::func::*;
//!
//! let t = add(mul(constant(3), int("x")).unwrap(), constant(5)).unwrap();
//! assert_eq!(t.to_string(), "3 * x + 5");
//! ```
use crate::dtype::ValueType;
use crate::error::Result;
use crate::term::{BinaryOperator, Term};

pub fn constant(value: i64) -> Term {
    Term::constant(value)
}

pub fn var(name: &str, dtype: ValueType) -> Term {
    Term::variable(name, dtype)
}

/// Variable of type `Integer`.
pub fn int(name: &str) -> Term {
    Term::variable(name, ValueType::Integer)
}

/// Variable of type `NaturalNumber`.
pub fn nat(name: &str) -> Term {
    Term::variable(name, ValueType::NaturalNumber)
}

pub fn add(left: Term, right: Term) -> Result<Term> {
    Term::addition(left, right)
}

pub fn sub(left: Term, right: Term) -> Result<Term> {
    Term::subtraction(left, right)
}

pub fn mul(left: Term, right: Term) -> Result<Term> {
    Term::multiplication(left, right)
}

pub fn binary(op: BinaryOperator, left: Term, right: Term) -> Result<Term> {
    Term::binary(op, left, right)
}

pub fn array(name: &str, index: Term, element: ValueType) -> Result<Term> {
    Term::array_variable(name, index, element)
}

pub fn apply(name: &str, argument: Term, result: ValueType) -> Term {
    Term::function_value(name, argument, result)
}

pub fn sum(index: &str, lower: Term, upper: Term, body: Term) -> Result<Term> {
    Term::summation(index, lower, upper, body)
}
