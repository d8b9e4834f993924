//! Flattening, ordering and grouping of associative chains.
//!
//! Role
//! - [`linearize`] turns nested `+`/`-` and `*` nodes into flat [`Node::Linear`] chains in
//!   canonical form, bottom-up. Subtraction is read as `a + -1 * b`.
//! - [`canonicalize`] produces the canonical chain for one operator from a list of
//!   operands: nested chains of the same operator are flattened, constants are folded into
//!   a single operand, like terms of a sum have their coefficients added, and the remaining
//!   operands are sorted by a total order that does not depend on the input shape.
//! - [`reassemble`] folds every chain back into left-nested binary nodes.
//!
//! Canonical order, lowest first: constants, compound operands (ranked by how many
//! non-constant operands they contain), variables and array elements, function values and
//! summations. Ties are broken by [`HashLevel::NoConstants`] then [`HashLevel::Full`]
//! fingerprints. The rank ignores numeric coefficients so that `3 * x` and `x` sort
//! together and stay adjacent for grouping.
//!
//! In a sum the folded constant goes last and is omitted when zero; in a product it goes
//! first and is always present, unless it is zero, in which case the whole product is `0`.
//!
//! Canonicalization is idempotent: canonicalizing a canonical chain returns it unchanged.
use std::cmp::Ordering;
use std::iter;

use either::Either;
use log::debug;

use crate::error::Result;
use crate::term::{BinaryOperator, HashLevel, Node, Term};

/// Canonical form of the arithmetic structure of `term`. Array indices, function arguments
/// and summation parts are left as they are.
pub fn linearize(term: Term) -> Result<Term> {
    match term.operator() {
        Some(op) => canonicalize(op, vec![term]),
        None => Ok(term),
    }
}

/// Canonical chain `operands[0] op operands[1] op ...`.
///
/// The result is a [`Node::Linear`] node, or a single operand when nothing else is left.
pub fn canonicalize(op: BinaryOperator, operands: Vec<Term>) -> Result<Term> {
    let subtraction = op == BinaryOperator::Subtraction;
    let op = chain_operator(op);

    let mut parts = Vec::with_capacity(operands.len());
    for (position, operand) in operands.into_iter().enumerate() {
        collect_chain(op, operand, subtraction && position > 0, &mut parts);
    }

    let mut folded = op.identity().unwrap_or_default();
    let mut rest = Vec::with_capacity(parts.len());
    for (part, negated) in parts {
        let part = if negated { negate(part)? } else { linearize(part)? };
        for part in flatten(op, part) {
            match part.as_constant() {
                Some(value) => folded = op.fold(folded, value),
                None => rest.push(part),
            }
        }
    }

    let mut keyed: Vec<_> = rest.into_iter().map(SortKey::of).collect();
    keyed.sort_by(SortKey::order);

    let mut out = match op {
        BinaryOperator::Addition => collect_like_terms(keyed)?,
        _ => keyed.into_iter().map(|k| k.term).collect(),
    };

    match op {
        BinaryOperator::Multiplication => {
            if folded == 0 {
                return Ok(Term::constant(0));
            }
            if out.is_empty() {
                return Ok(Term::constant(folded));
            }
            out.insert(0, Term::constant(folded));
        }
        _ => {
            if folded != 0 {
                out.push(Term::constant(folded));
            }
            match out.len() {
                0 => return Ok(Term::constant(0)),
                1 => return Ok(out.remove(0)),
                _ => {}
            }
        }
    }

    Term::linear(op, out)
}

/// Fold every chain of `term` back into left-nested binary nodes.
pub fn reassemble(term: Term) -> Result<Term> {
    term.map_bottom_up(|term| match term.into_parts() {
        (Node::Linear { op, operands }, _) => {
            let mut iter = operands.into_iter();
            let Some(first) = iter.next() else {
                return Ok(Term::constant(op.identity().unwrap_or_default()));
            };
            iter.try_fold(first, |acc, operand| Term::binary(op, acc, operand))
        }
        (node, dtype) => Ok(Term::from_parts(node, dtype)),
    })
}

/// Subtraction chains are sums of negated operands.
fn chain_operator(op: BinaryOperator) -> BinaryOperator {
    match op {
        BinaryOperator::Subtraction => BinaryOperator::Addition,
        op => op,
    }
}

/// Push onto `out`, left to right, the operands of the `op` chain rooted at `term`, each
/// with whether it is subtracted. Walks binary spines and nested chains of `op` without
/// recursion. A subtracted sub-chain is kept whole.
fn collect_chain(op: BinaryOperator, term: Term, negated: bool, out: &mut Vec<(Term, bool)>) {
    let mut stack = vec![(term, negated)];
    while let Some((term, negated)) = stack.pop() {
        let descend = !negated && term.operator().is_some_and(|inner| chain_operator(inner) == op);
        if !descend {
            out.push((term, negated));
            continue;
        }
        match term.into_parts() {
            (Node::Binary { op: inner, left, right }, _) => {
                stack.push((*right, inner == BinaryOperator::Subtraction));
                stack.push((*left, false));
            }
            (Node::Linear { operands, .. }, _) => {
                stack.extend(operands.into_iter().rev().map(|operand| (operand, false)));
            }
            (node, dtype) => out.push((Term::from_parts(node, dtype), false)),
        }
    }
}

fn negate(term: Term) -> Result<Term> {
    canonicalize(
        BinaryOperator::Multiplication,
        vec![Term::constant(-1), term],
    )
}

/// Operands of `term` seen as part of an `op` chain.
fn flatten(op: BinaryOperator, term: Term) -> impl Iterator<Item = Term> {
    match term.into_parts() {
        (Node::Linear { op: inner, operands }, _) if inner == op => {
            Either::Left(operands.into_iter())
        }
        (node, dtype) => Either::Right(iter::once(Term::from_parts(node, dtype))),
    }
}

/// Sum the coefficients of adjacent like terms of a sorted sum.
fn collect_like_terms(keyed: Vec<SortKey>) -> Result<Vec<Term>> {
    let mut out = Vec::with_capacity(keyed.len());
    let mut iter = keyed.into_iter().peekable();

    while let Some(head) = iter.next() {
        let (mut coefficient, mut factors) = split_coefficient(head.term);
        while let Some(next) = iter.next_if(|k| k.shape == head.shape) {
            let (c, _) = split_coefficient(next.term);
            coefficient = coefficient.wrapping_add(c);
        }

        if coefficient == 0 {
            debug!("like terms `{}` cancel out", head.shape);
            continue;
        }
        if coefficient == 1 && factors.len() == 1 {
            out.extend(factors.pop());
        } else {
            factors.insert(0, Term::constant(coefficient));
            out.push(Term::linear(BinaryOperator::Multiplication, factors)?);
        }
    }

    Ok(out)
}

/// `(c, [f1, f2, ...])` for a canonical product `c * f1 * f2 * ...`, `(1, [term])` for any
/// other term.
fn split_coefficient(term: Term) -> (i64, Vec<Term>) {
    match term.into_parts() {
        (
            Node::Linear {
                op: BinaryOperator::Multiplication,
                mut operands,
            },
            _,
        ) if operands.first().and_then(Term::as_constant).is_some() => {
            let coefficient = operands.remove(0).as_constant().unwrap_or(1);
            (coefficient, operands)
        }
        (node, dtype) => (1, vec![Term::from_parts(node, dtype)]),
    }
}

/// Rank of an operand in canonical order, ignoring coefficients.
fn rank(term: &Term) -> (u8, usize) {
    match term.node() {
        Node::Constant(_) => (0, 0),
        Node::Variable(_) | Node::ArrayVariable { .. } => (2, 0),
        Node::FunctionValue { .. } | Node::Summation { .. } => (3, 0),
        Node::Binary { left, right, .. } => rank_compound([&**left, &**right]),
        Node::Linear { operands, .. } => rank_compound(operands),
    }
}

/// A compound operand with a single non-constant operand ranks as that operand.
fn rank_compound<'t>(operands: impl IntoIterator<Item = &'t Term>) -> (u8, usize) {
    let variable: Vec<&Term> = operands.into_iter().filter(|t| !t.is_constant()).collect();
    match variable.as_slice() {
        [single] => rank(single),
        many => (1, many.len()),
    }
}

struct SortKey {
    rank: (u8, usize),
    shape: String,
    full: String,
    term: Term,
}

impl SortKey {
    fn of(term: Term) -> Self {
        Self {
            rank: rank(&term),
            shape: term.hash(HashLevel::NoConstants),
            full: term.hash(HashLevel::Full),
            term,
        }
    }

    fn order(&self, other: &Self) -> Ordering {
        self.rank
            .cmp(&other.rank)
            .then_with(|| self.shape.cmp(&other.shape))
            .then_with(|| self.full.cmp(&other.full))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::func::*;

    fn lin(t: Result<Term>) -> Term {
        linearize(t.unwrap()).unwrap()
    }

    #[test]
    fn operand_order_does_not_matter() {
        let (x, y) = (int("x"), int("y"));
        let a = lin(add(x.clone(), y.clone()));
        let b = lin(add(y, x));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "x + y");
    }

    #[test]
    fn like_terms_are_grouped() {
        let x = int("x");
        let t = add(
            mul(constant(3), x.clone()).unwrap(),
            mul(constant(2), x.clone()).unwrap(),
        );
        assert_eq!(lin(t).to_string(), "5 * x");

        let t = sub(mul(constant(3), x.clone()).unwrap(), mul(constant(3), x).unwrap());
        assert_eq!(lin(t), constant(0));
    }

    #[test]
    fn constants_are_extracted() {
        let x = int("x");
        // (2 + x) + 3
        let t = add(add(constant(2), x.clone()).unwrap(), constant(3));
        assert_eq!(lin(t).to_string(), "x + 5");

        // 2 * (x * 3)
        let t = mul(constant(2), mul(x.clone(), constant(3)).unwrap());
        assert_eq!(lin(t).to_string(), "6 * x");

        let t = mul(constant(0), x);
        assert_eq!(lin(t), constant(0));
    }

    #[test]
    fn compound_operands_sort_before_variables() {
        let (x, y, z) = (int("x"), int("y"), int("z"));
        // z + x * y
        let t = add(z, mul(x, y).unwrap());
        assert_eq!(lin(t).to_string(), "1 * x * y + z");
    }

    #[test]
    fn canonical_chains_are_stable() {
        let (x, y) = (int("x"), int("y"));
        let t = lin(add(
            sub(mul(constant(4), y.clone()).unwrap(), x.clone()).unwrap(),
            constant(7),
        ));
        assert_eq!(linearize(t.clone()).unwrap(), t);
        assert_eq!(t.to_string(), "-1 * x + 4 * y + 7");
    }

    #[test]
    fn reassembly_folds_left() {
        let (x, y, z) = (int("x"), int("y"), int("z"));
        let t = canonicalize(BinaryOperator::Addition, vec![z, y, x]).unwrap();
        let t = reassemble(t).unwrap();
        assert_eq!(t.type_(), crate::term::TermType::Binary);
        assert_eq!(t.to_string(), "x + y + z");
    }

    #[test]
    fn long_left_chains_flatten_in_one_pass() {
        let names: Vec<String> = (0..2000).map(|i| format!("v{i:04}")).collect();
        let chain = names
            .iter()
            .skip(1)
            .try_fold(int(&names[0]), |acc, name| sub(acc, int(name)))
            .unwrap();
        let t = linearize(chain).unwrap();

        let Node::Linear { op, operands } = t.node() else {
            panic!("expected a chain, got {t}");
        };
        assert_eq!(*op, BinaryOperator::Addition);
        assert_eq!(operands.len(), 2000);
        assert_eq!(operands.iter().filter(|o| o.as_variable().is_some()).count(), 1);
    }

    #[test]
    fn subtracted_chains_stay_grouped() {
        let (x, y, z) = (int("x"), int("y"), int("z"));
        // x - (y - z) reads as x + -1 * (y - z)
        let nested = lin(sub(x.clone(), sub(y.clone(), z.clone()).unwrap()));
        let Node::Linear { operands, .. } = nested.node() else {
            panic!("expected a chain, got {nested}");
        };
        assert_eq!(operands.len(), 2);

        // (x - y) - z reads as x + -1 * y + -1 * z
        let flat = lin(sub(sub(x, y).unwrap(), z));
        let Node::Linear { operands, .. } = flat.node() else {
            panic!("expected a chain, got {flat}");
        };
        assert_eq!(operands.len(), 3);
    }
}
