//! Content fingerprints of terms.
//!
//! A fingerprint is a prefix-notation string of the tree: `x`, `a[(+ i 1)]`, `f(x)`,
//! `(* 3 x)`, `(sum i 0 n a[i])`. Binary and linear chains share the `(op ...)` form.
//!
//! [`HashLevel::NoConstants`] drops the numeric constants that are direct operands of the
//! fingerprinted node; when a single operand remains, the node fingerprints as that operand.
//! Hence `3 * x`, `5 * x` and `x` share the fingerprint `x`, which is how the canonicalizer
//! recognises like terms. Deeper subterms always use [`HashLevel::Full`], so `f(x + 3)` and
//! `f(x + 5)` stay distinct.
use std::fmt::Write;

use crate::term::{Node, Term};

/// Precision of a [`Term::hash`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashLevel {
    /// Every node, constants included.
    #[default]
    Full,
    /// Ignore numeric constant operands of the root.
    NoConstants,
}

impl Term {
    /// Fingerprint of this term at the given precision.
    pub fn hash(&self, level: HashLevel) -> String {
        let mut out = String::new();
        match level {
            HashLevel::Full => self.write_full(&mut out),
            HashLevel::NoConstants => self.write_no_constants(&mut out),
        }
        out
    }

    fn write_no_constants(&self, out: &mut String) {
        let (op, operands): (_, Vec<&Term>) = match &self.node {
            Node::Constant(_) => return,
            Node::Binary { op, left, right } => (*op, vec![&**left, &**right]),
            Node::Linear { op, operands } => (*op, operands.iter().collect()),
            _ => return self.write_full(out),
        };

        let remaining: Vec<&Term> = operands.into_iter().filter(|o| !o.is_constant()).collect();
        match remaining.as_slice() {
            [] => {}
            [single] => single.write_full(out),
            many => {
                let _ = write!(out, "({op}");
                for operand in many {
                    out.push(' ');
                    operand.write_full(out);
                }
                out.push(')');
            }
        }
    }

    fn write_full(&self, out: &mut String) {
        match &self.node {
            Node::Constant(value) => {
                let _ = write!(out, "{value}");
            }
            Node::Variable(name) => out.push_str(name),
            Node::ArrayVariable { name, index } => {
                out.push_str(name);
                out.push('[');
                index.write_full(out);
                out.push(']');
            }
            Node::FunctionValue { name, argument } => {
                out.push_str(name);
                out.push('(');
                argument.write_full(out);
                out.push(')');
            }
            Node::Binary { op, left, right } => {
                let _ = write!(out, "({op} ");
                left.write_full(out);
                out.push(' ');
                right.write_full(out);
                out.push(')');
            }
            Node::Linear { op, operands } => {
                let _ = write!(out, "({op}");
                for operand in operands {
                    out.push(' ');
                    operand.write_full(out);
                }
                out.push(')');
            }
            Node::Summation {
                index,
                lower,
                upper,
                body,
            } => {
                let _ = write!(out, "(sum {index} ");
                lower.write_full(out);
                out.push(' ');
                upper.write_full(out);
                out.push(' ');
                body.write_full(out);
                out.push(')');
            }
        }
    }
}
