//! Integer terms: constructors, structural inspection, and reduction.
//!
//! Role
//! - [`Term`] is an owned expression tree. Each node carries the [`ValueType`] computed when
//!   it was built; constructors consult the type lattice eagerly and fail with
//!   [`Error::EmptyDomain`](crate::error::Error::EmptyDomain) instead of producing an
//!   ill-typed node.
//! - Trees never share nodes: `Clone` is a deep copy and every rewriting operation consumes
//!   or copies its input, so a caller's tree is never aliased by a result.
//! - One-step reduction lives in [`eval`], fingerprints in [`hash`], printing in [`pretty`].
//!   Full normalization is [`Term::simplified`](crate::simplify).
//!
//! Example
//! ```
//! use hyterm::prelude::*;
//!
//! let x = var("x", ValueType::NaturalNumber);
//! let t = add(x.clone(), constant(0)).unwrap();
//! assert_eq!(t.evaluated().unwrap(), x);
//! ```
pub mod eval;
pub mod func;
pub mod hash;
pub mod pretty;
pub mod variant;

use std::collections::BTreeSet;

use smallvec::SmallVec;

use crate::dtype::{Operand, ValueType};
use crate::error::{Error, Result};

pub use hash::HashLevel;
pub use variant::{BinaryOperator, TermType};

/// Expression node together with its value type.
///
/// Equality is structural: two terms are equal when their nodes, payloads, types and
/// children are pairwise equal, whatever buffers they were built in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    node: Node,
    dtype: ValueType,
}

/// Shape of a [`Term`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Fixed-width integer literal.
    Constant(i64),
    /// Scalar program variable.
    Variable(String),
    /// Element `name[index]` of an array variable.
    ArrayVariable { name: String, index: Box<Term> },
    /// Application `name(argument)` of an uninterpreted function.
    FunctionValue { name: String, argument: Box<Term> },
    /// `left op right`.
    Binary {
        op: BinaryOperator,
        left: Box<Term>,
        right: Box<Term>,
    },
    /// `sum(index, lower, upper, body)`: sum of `body` for `index` ranging over
    /// `[lower, upper]`. `index` is bound inside `body` only.
    Summation {
        index: String,
        lower: Box<Term>,
        upper: Box<Term>,
        body: Box<Term>,
    },
    /// Flat chain `o1 op o2 op ... op on` of an associative operator. Produced by the
    /// canonicalizer, see [`crate::linear`].
    Linear {
        op: BinaryOperator,
        operands: Vec<Term>,
    },
}

impl Term {
    // ======================== Construction ========================

    /// Integer literal. Its type is the narrowest unparameterized type holding `value`.
    pub fn constant(value: i64) -> Term {
        Term {
            node: Node::Constant(value),
            dtype: ValueType::of_constant(value),
        }
    }

    /// Variable declared with type `dtype`.
    pub fn variable(name: impl Into<String>, dtype: ValueType) -> Term {
        Term {
            node: Node::Variable(name.into()),
            dtype,
        }
    }

    /// Array element `name[index]` whose elements have type `element`.
    pub fn array_variable(name: impl Into<String>, index: Term, element: ValueType) -> Result<Term> {
        index.expect_integral("array index")?;
        Ok(Term {
            node: Node::ArrayVariable {
                name: name.into(),
                index: Box::new(index),
            },
            dtype: element,
        })
    }

    /// Application of the uninterpreted function `name`, returning values of type `result`.
    pub fn function_value(name: impl Into<String>, argument: Term, result: ValueType) -> Term {
        Term {
            node: Node::FunctionValue {
                name: name.into(),
                argument: Box::new(argument),
            },
            dtype: result,
        }
    }

    /// `left op right`, typed by asking the left operand's type how it combines with the
    /// right operand.
    pub fn binary(op: BinaryOperator, left: Term, right: Term) -> Result<Term> {
        let dtype = left.dtype.result_type(op, Operand::of_term(&right))?;
        Ok(Term {
            node: Node::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            dtype,
        })
    }

    pub fn addition(left: Term, right: Term) -> Result<Term> {
        Self::binary(BinaryOperator::Addition, left, right)
    }

    pub fn subtraction(left: Term, right: Term) -> Result<Term> {
        Self::binary(BinaryOperator::Subtraction, left, right)
    }

    pub fn multiplication(left: Term, right: Term) -> Result<Term> {
        Self::binary(BinaryOperator::Multiplication, left, right)
    }

    /// `sum(index, lower, upper, body)`. The sum is a natural number when the body is,
    /// an integer otherwise.
    pub fn summation(
        index: impl Into<String>,
        lower: Term,
        upper: Term,
        body: Term,
    ) -> Result<Term> {
        lower.expect_integral("summation bound")?;
        upper.expect_integral("summation bound")?;
        body.expect_integral("summation")?;

        let dtype = if body.dtype.type_assignable(&ValueType::NaturalNumber) {
            ValueType::NaturalNumber
        } else {
            ValueType::Integer
        };
        Ok(Term {
            node: Node::Summation {
                index: index.into(),
                lower: Box::new(lower),
                upper: Box::new(upper),
                body: Box::new(body),
            },
            dtype,
        })
    }

    /// Flat chain of an associative operator. The type is folded left to right exactly as
    /// the equivalent left-nested binary chain would be typed.
    pub fn linear(op: BinaryOperator, operands: Vec<Term>) -> Result<Term> {
        debug_assert!(op.is_associative(), "linear chains require an associative operator");

        let mut iter = operands.iter();
        let dtype = match iter.next() {
            None => ValueType::of_constant(op.identity().unwrap_or_default()),
            Some(first) => {
                let mut acc = first.dtype.clone();
                for operand in iter {
                    acc = acc.result_type(op, Operand::of_term(operand))?;
                }
                acc
            }
        };
        Ok(Term {
            node: Node::Linear { op, operands },
            dtype,
        })
    }

    fn expect_integral(&self, operation: &'static str) -> Result<()> {
        if self.dtype.is_logical() {
            return Err(Error::TypeMismatch {
                operation,
                found: self.dtype.to_string(),
            });
        }
        Ok(())
    }

    // ======================== Inspection ========================

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn into_node(self) -> Node {
        self.node
    }

    /// Value type computed when this node was built.
    pub fn dtype(&self) -> &ValueType {
        &self.dtype
    }

    pub fn type_(&self) -> TermType {
        match &self.node {
            Node::Constant(_) => TermType::Constant,
            Node::Variable(_) => TermType::Variable,
            Node::ArrayVariable { .. } => TermType::ArrayVariable,
            Node::FunctionValue { .. } => TermType::FunctionValue,
            Node::Binary { .. } => TermType::Binary,
            Node::Summation { .. } => TermType::Summation,
            Node::Linear { .. } => TermType::Linear,
        }
    }

    pub fn as_constant(&self) -> Option<i64> {
        match self.node {
            Node::Constant(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.node, Node::Constant(_))
    }

    pub fn as_variable(&self) -> Option<&str> {
        match &self.node {
            Node::Variable(name) => Some(name),
            _ => None,
        }
    }

    /// Operator of a binary or linear node.
    pub fn operator(&self) -> Option<BinaryOperator> {
        match self.node {
            Node::Binary { op, .. } | Node::Linear { op, .. } => Some(op),
            _ => None,
        }
    }

    /// `(op, left, right)` of a binary node.
    pub fn as_binary(&self) -> Option<(BinaryOperator, &Term, &Term)> {
        match &self.node {
            Node::Binary { op, left, right } => Some((*op, left, right)),
            _ => None,
        }
    }

    /// Direct subterms, in left-to-right order.
    pub fn children(&self) -> SmallVec<&Term, 4> {
        let mut out = SmallVec::new();
        match &self.node {
            Node::Constant(_) | Node::Variable(_) => {}
            Node::ArrayVariable { index, .. } => out.push(&**index),
            Node::FunctionValue { argument, .. } => out.push(&**argument),
            Node::Binary { left, right, .. } => {
                out.push(&**left);
                out.push(&**right);
            }
            Node::Summation {
                lower, upper, body, ..
            } => {
                out.push(&**lower);
                out.push(&**upper);
                out.push(&**body);
            }
            Node::Linear { operands, .. } => out.extend(operands.iter()),
        }
        out
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        let mut stack = vec![self];
        let mut size = 0;
        while let Some(term) = stack.pop() {
            size += 1;
            stack.extend(term.children());
        }
        size
    }

    /// Length of the longest root-to-leaf path, a leaf having depth 1.
    pub fn depth(&self) -> usize {
        let mut stack = vec![(self, 1)];
        let mut depth = 0;
        while let Some((term, level)) = stack.pop() {
            depth = depth.max(level);
            stack.extend(term.children().into_iter().map(|child| (child, level + 1)));
        }
        depth
    }

    /// Independent copy of this tree. Terms own their children, so this is `clone`.
    pub fn deep_copy(&self) -> Term {
        self.clone()
    }

    /// Structural equality.
    pub fn equals(&self, other: &Term) -> bool {
        self == other
    }

    /// Names of the variables occurring free in this term, including those mentioned by
    /// term-bounded variable types. Array names are not variables.
    pub fn free_variables(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_free_variables(&mut out);
        out
    }

    fn collect_free_variables(&self, out: &mut BTreeSet<String>) {
        match &self.node {
            Node::Variable(name) => {
                out.insert(name.clone());
                if let Some((lo, hi)) = self.dtype.term_bounds() {
                    lo.collect_free_variables(out);
                    hi.collect_free_variables(out);
                }
            }
            Node::Summation {
                index,
                lower,
                upper,
                body,
            } => {
                lower.collect_free_variables(out);
                upper.collect_free_variables(out);
                let mut inner = BTreeSet::new();
                body.collect_free_variables(&mut inner);
                inner.remove(index);
                out.extend(inner);
            }
            _ => {
                for child in self.children() {
                    child.collect_free_variables(out);
                }
            }
        }
    }

    /// Whether `name` occurs free in this term.
    pub fn mentions(&self, name: &str) -> bool {
        self.free_variables().contains(name)
    }

    // ======================== Rebuilding ========================

    /// Rebuild this node after transforming each direct child with `f`. Binary, linear and
    /// summation nodes go through their constructors, so the type is recomputed.
    pub fn map_children<F>(self, mut f: F) -> Result<Term>
    where
        F: FnMut(Term) -> Result<Term>,
    {
        let dtype = self.dtype;
        match self.node {
            node @ (Node::Constant(_) | Node::Variable(_)) => Ok(Term { node, dtype }),
            Node::ArrayVariable { name, index } => Term::array_variable(name, f(*index)?, dtype),
            Node::FunctionValue { name, argument } => {
                Ok(Term::function_value(name, f(*argument)?, dtype))
            }
            Node::Binary { op, left, right } => {
                let left = f(*left)?;
                let right = f(*right)?;
                Term::binary(op, left, right)
            }
            Node::Summation {
                index,
                lower,
                upper,
                body,
            } => {
                let lower = f(*lower)?;
                let upper = f(*upper)?;
                let body = f(*body)?;
                Term::summation(index, lower, upper, body)
            }
            Node::Linear { op, operands } => {
                let operands = operands.into_iter().map(f).collect::<Result<Vec<_>>>()?;
                Term::linear(op, operands)
            }
        }
    }

    /// Rebuild this node after transforming the children that are not arithmetic operands
    /// of this node (array indices, function arguments, summation parts), leaving binary
    /// and linear operands untouched.
    pub fn map_opaque_children<F>(self, mut f: F) -> Result<Term>
    where
        F: FnMut(Term) -> Result<Term>,
    {
        self.rebuild_iteratively(
            |term| matches!(term.node, Node::Binary { .. } | Node::Linear { .. }),
            |term| term.map_children(&mut f),
            Ok,
        )
    }

    /// Rebuild the whole tree bottom-up: every node is passed to `f` once its children have
    /// been replaced by their own results.
    ///
    /// Same result as `f(self.map_children(|c| c.map_bottom_up(f))?)`, but the tree is
    /// walked with an explicit stack, so long operator chains do not deepen the call stack.
    pub fn map_bottom_up<F>(self, f: F) -> Result<Term>
    where
        F: FnMut(Term) -> Result<Term>,
    {
        self.rebuild_iteratively(|_| true, Ok, f)
    }

    /// Post-order rebuild. Nodes accepted by `descend` are split and rebuilt through `built`
    /// after their children; the others are handed whole to `skipped`.
    fn rebuild_iteratively<D, S, B>(self, descend: D, mut skipped: S, mut built: B) -> Result<Term>
    where
        D: Fn(&Term) -> bool,
        S: FnMut(Term) -> Result<Term>,
        B: FnMut(Term) -> Result<Term>,
    {
        let mut tasks = vec![Task::Visit(self)];
        let mut done: Vec<Term> = Vec::new();

        while let Some(task) = tasks.pop() {
            let term = match task {
                Task::Visit(term) if descend(&term) => {
                    let (shell, children) = Shell::split(term);
                    tasks.push(Task::Build(shell));
                    tasks.extend(children.into_iter().rev().map(Task::Visit));
                    continue;
                }
                Task::Visit(term) => skipped(term)?,
                Task::Build(shell) => built(shell.join(&mut done)?)?,
            };
            done.push(term);
        }

        Ok(pop_child(&mut done))
    }

    pub(crate) fn into_parts(self) -> (Node, ValueType) {
        (self.node, self.dtype)
    }

    /// Reassemble a node taken apart by [`Term::into_parts`], without re-typing it.
    pub(crate) fn from_parts(node: Node, dtype: ValueType) -> Term {
        Term { node, dtype }
    }

    /// Replace the declared type of a variable-like leaf.
    pub(crate) fn with_dtype(self, dtype: ValueType) -> Term {
        Term {
            node: self.node,
            dtype,
        }
    }
}

/// Pending step of [`Term::rebuild_iteratively`].
enum Task {
    Visit(Term),
    Build(Shell),
}

/// A node whose children were taken out, remembering what is needed to rebuild it.
enum Shell {
    Leaf(Term),
    ArrayVariable { name: String, element: ValueType },
    FunctionValue { name: String, result: ValueType },
    Binary(BinaryOperator),
    Summation(String),
    Linear(BinaryOperator, usize),
}

impl Shell {
    /// Children are returned left to right.
    fn split(term: Term) -> (Shell, Vec<Term>) {
        let Term { node, dtype } = term;
        match node {
            node @ (Node::Constant(_) | Node::Variable(_)) => {
                (Shell::Leaf(Term { node, dtype }), Vec::new())
            }
            Node::ArrayVariable { name, index } => (
                Shell::ArrayVariable {
                    name,
                    element: dtype,
                },
                vec![*index],
            ),
            Node::FunctionValue { name, argument } => (
                Shell::FunctionValue {
                    name,
                    result: dtype,
                },
                vec![*argument],
            ),
            Node::Binary { op, left, right } => (Shell::Binary(op), vec![*left, *right]),
            Node::Summation {
                index,
                lower,
                upper,
                body,
            } => (Shell::Summation(index), vec![*lower, *upper, *body]),
            Node::Linear { op, operands } => (Shell::Linear(op, operands.len()), operands),
        }
    }

    /// Rebuild from the rebuilt children found on top of `done`, last child topmost.
    fn join(self, done: &mut Vec<Term>) -> Result<Term> {
        match self {
            Shell::Leaf(term) => Ok(term),
            Shell::ArrayVariable { name, element } => {
                Term::array_variable(name, pop_child(done), element)
            }
            Shell::FunctionValue { name, result } => {
                Ok(Term::function_value(name, pop_child(done), result))
            }
            Shell::Binary(op) => {
                let right = pop_child(done);
                let left = pop_child(done);
                Term::binary(op, left, right)
            }
            Shell::Summation(index) => {
                let body = pop_child(done);
                let upper = pop_child(done);
                let lower = pop_child(done);
                Term::summation(index, lower, upper, body)
            }
            Shell::Linear(op, arity) => {
                let operands = done.split_off(done.len() - arity);
                Term::linear(op, operands)
            }
        }
    }
}

fn pop_child(done: &mut Vec<Term>) -> Term {
    done.pop()
        .unwrap_or_else(|| unreachable!("children are rebuilt before their parent"))
}

impl From<i64> for Term {
    fn from(value: i64) -> Self {
        Term::constant(value)
    }
}
