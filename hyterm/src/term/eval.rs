//! One-step local reduction.
//!
//! [`Term::evaluated`] visits the tree bottom-up once and applies, at each binary node,
//! the first matching local rule:
//! - constant folding (`2 + 3 -> 5`, wrapping on overflow),
//! - identity elimination (`x + 0 -> x`, `0 + x -> x`, `x - 0 -> x`, `x * 1 -> x`,
//!   `1 * x -> x`, `x * 0 -> 0`, `0 * x -> 0`),
//! - equal operands under subtraction (`t - t -> 0`),
//! - sign normalization (`a + (-c) * b -> a - c * b`, `a - (-c) * b -> a + c * b`, with
//!   `1 * b` written `b`).
//!
//! Unrelated operands are never reordered or grouped; that is the job of
//! [`Term::simplified`](crate::simplify).
use crate::error::Result;
use crate::term::{BinaryOperator, Node, Term};

impl Term {
    /// Local simplification of every node, bottom-up, in a single pass.
    pub fn evaluated(&self) -> Result<Term> {
        self.clone().evaluate_owned()
    }

    pub(crate) fn evaluate_owned(self) -> Result<Term> {
        self.map_bottom_up(Term::evaluate_root)
    }

    /// Fold binary nodes whose operands are both constants, bottom-up, and nothing else.
    pub(crate) fn fold_constants(self) -> Result<Term> {
        self.map_bottom_up(|term| {
            let folded = match term.as_binary() {
                Some((op, left, right)) => match (left.as_constant(), right.as_constant()) {
                    (Some(a), Some(b)) => Some(op.fold(a, b)),
                    _ => None,
                },
                None => None,
            };
            Ok(folded.map_or(term, Term::constant))
        })
    }

    fn evaluate_root(self) -> Result<Term> {
        let (op, left, right) = match self.node {
            Node::Binary { op, left, right } => (op, *left, *right),
            node => {
                return Ok(Term {
                    node,
                    dtype: self.dtype,
                });
            }
        };

        if let (Some(a), Some(b)) = (left.as_constant(), right.as_constant()) {
            return Ok(Term::constant(op.fold(a, b)));
        }

        use BinaryOperator::*;
        match (op, left.as_constant(), right.as_constant()) {
            (Addition, _, Some(0)) | (Subtraction, _, Some(0)) | (Multiplication, _, Some(1)) => {
                return Ok(left);
            }
            (Addition, Some(0), _) | (Multiplication, Some(1), _) => return Ok(right),
            (Multiplication, Some(0), _) | (Multiplication, _, Some(0)) => {
                return Ok(Term::constant(0));
            }
            _ => {}
        }

        if op == Subtraction && left == right {
            return Ok(Term::constant(0));
        }

        if matches!(op, Addition | Subtraction) {
            if let Some((coefficient, factor)) = negative_coefficient(&right) {
                let flipped = if op == Addition { Subtraction } else { Addition };
                let magnitude = coefficient.wrapping_neg();
                let right = match magnitude {
                    1 => factor.clone(),
                    _ => Term::multiplication(Term::constant(magnitude), factor.clone())?,
                };
                return Term::binary(flipped, left, right);
            }
        }

        Term::binary(op, left, right)
    }
}

/// `(c, b)` when `term` is `c * b` with a negative constant `c` whose negation fits.
fn negative_coefficient(term: &Term) -> Option<(i64, &Term)> {
    match term.as_binary()? {
        (BinaryOperator::Multiplication, left, right) => match left.as_constant()? {
            c if c < 0 && c != i64::MIN => Some((c, right)),
            _ => None,
        },
        _ => None,
    }
}
