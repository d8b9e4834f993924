//! Full normalization of terms.
//!
//! Role
//! - [`Simplifier`] drives the built-in rule sets and the canonicalizer to produce the
//!   normal form used for equality comparisons: two terms that are equal up to
//!   commutativity, associativity, distribution and constant folding simplify to
//!   structurally equal trees.
//! - [`Term::simplified`] uses a shared simplifier with the default configuration.
//!
//! Pipeline, applied bottom-up (opaque children such as array indices are simplified
//! first, on their own):
//! 1. one-step evaluation,
//! 2. `expand`, to its fixpoint,
//! 3. `convert-subtractions`, `expand` again (to distribute the `-1` factors introduced by
//!    the conversion over sums), then `left-associate`,
//! 4. `ordering`, twice or to its fixpoint depending on [`OrderingMode`],
//! 5. `collapse-groups`,
//! 6. linearization and reassembly ([`crate::linear`]),
//! 7. a final one-step evaluation.
//!
//! Steps 2 to 5 are each followed by constant folding. Full evaluation is deliberately kept
//! out of the middle of the pipeline since it would turn `a + -1 * b` back into `a - b`.
//!
//! Example
//! ```
//! use hyterm::prelude::*;
//!
//! let x = int("x");
//! let t = add(
//!     sub(mul(constant(3), x.clone()).unwrap(), mul(constant(2), x.clone()).unwrap()).unwrap(),
//!     constant(5),
//! )
//! .unwrap();
//! assert_eq!(t.simplified().unwrap(), add(x, constant(5)).unwrap());
//! ```
use log::debug;
use once_cell::sync::Lazy;

use crate::error::Result;
use crate::linear::{linearize, reassemble};
use crate::rewrite::rules::builtin;
use crate::rewrite::{apply_owned, saturate_owned};
use crate::term::Term;

/// How often the `ordering` rule set is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderingMode {
    /// Exactly two passes.
    Twice,
    /// Passes until one performs no rewrite.
    #[default]
    Fixpoint,
}

/// Knobs of the [`Simplifier`] pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimplifierConfig {
    pub ordering: OrderingMode,
    /// Distribute products over sums and differences.
    pub expand: bool,
    /// Evaluate the reassembled tree once more (identities, sign normalization).
    pub final_evaluation: bool,
}

impl Default for SimplifierConfig {
    fn default() -> Self {
        Self {
            ordering: OrderingMode::default(),
            expand: true,
            final_evaluation: true,
        }
    }
}

impl SimplifierConfig {
    pub fn with_ordering(mut self, ordering: OrderingMode) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    pub fn with_final_evaluation(mut self, final_evaluation: bool) -> Self {
        self.final_evaluation = final_evaluation;
        self
    }
}

/// Normalization engine. Stateless apart from its configuration, and cheap to build.
#[derive(Debug, Clone, Default)]
pub struct Simplifier {
    config: SimplifierConfig,
}

static DEFAULT: Lazy<Simplifier> = Lazy::new(Simplifier::default);

impl Simplifier {
    pub fn new(config: SimplifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimplifierConfig {
        &self.config
    }

    /// Normal form of `term`. The input is left untouched.
    pub fn simplify(&self, term: &Term) -> Result<Term> {
        debug!("simplifying `{term}`");
        self.simplify_owned(term.deep_copy())
    }

    fn simplify_owned(&self, term: Term) -> Result<Term> {
        let mut term = term
            .map_opaque_children(|child| self.simplify_owned(child))?
            .evaluate_owned()?;

        if self.config.expand {
            term = saturate_owned(term, builtin::expand())?
                .term
                .fold_constants()?;
        }

        term = apply_owned(term, builtin::convert_subtractions())?.term;
        if self.config.expand {
            term = saturate_owned(term, builtin::expand())?.term;
        }
        term = apply_owned(term, builtin::left_associate())?
            .term
            .fold_constants()?;

        term = match self.config.ordering {
            OrderingMode::Twice => {
                let once = apply_owned(term, builtin::ordering())?.term;
                apply_owned(once, builtin::ordering())?.term
            }
            OrderingMode::Fixpoint => saturate_owned(term, builtin::ordering())?.term,
        }
        .fold_constants()?;

        term = apply_owned(term, builtin::collapse_groups())?
            .term
            .fold_constants()?;

        term = reassemble(linearize(term)?)?;

        if self.config.final_evaluation {
            term = term.evaluate_owned()?;
        }
        Ok(term)
    }
}

impl Term {
    /// Canonical normal form, with the default [`SimplifierConfig`].
    pub fn simplified(&self) -> Result<Term> {
        DEFAULT.simplify(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::func::*;

    #[test]
    fn like_terms_merge_and_constants_trail() {
        let x = int("x");
        let t = add(
            sub(
                mul(constant(3), x.clone()).unwrap(),
                mul(constant(2), x.clone()).unwrap(),
            )
            .unwrap(),
            constant(5),
        )
        .unwrap();
        let s = t.simplified().unwrap();
        assert_eq!(s, add(x, constant(5)).unwrap());
    }

    #[test]
    fn differences_are_normalized() {
        let (a, b) = (int("a"), int("b"));
        let t = sub(b.clone(), mul(constant(-1), a.clone()).unwrap()).unwrap();
        assert_eq!(t.simplified().unwrap().to_string(), "a + b");

        let t = sub(a.clone(), b.clone()).unwrap();
        assert_eq!(t.simplified().unwrap().to_string(), "a - b");
    }

    #[test]
    fn products_are_distributed() {
        let (x, y) = (int("x"), int("y"));
        // 2 * (x + y) - 2 * y
        let t = sub(
            mul(constant(2), add(x.clone(), y.clone()).unwrap()).unwrap(),
            mul(constant(2), y).unwrap(),
        )
        .unwrap();
        assert_eq!(t.simplified().unwrap(), mul(constant(2), x).unwrap());
    }

    #[test]
    fn without_expansion_sums_stay_factored() {
        let (x, y) = (int("x"), int("y"));
        let t = mul(constant(2), add(x, y).unwrap()).unwrap();
        let simplifier = Simplifier::new(SimplifierConfig::default().with_expand(false));
        assert_eq!(simplifier.simplify(&t).unwrap().to_string(), "2 * (x + y)");
    }

    #[test]
    fn both_ordering_modes_agree_on_small_inputs() {
        let (x, y) = (int("x"), int("y"));
        let t = add(
            add(constant(4), mul(y.clone(), constant(3)).unwrap()).unwrap(),
            x,
        )
        .unwrap();
        let twice = Simplifier::new(SimplifierConfig::default().with_ordering(OrderingMode::Twice));
        assert_eq!(twice.simplify(&t).unwrap(), t.simplified().unwrap());
        assert_eq!(t.simplified().unwrap().to_string(), "x + 3 * y + 4");
    }

    #[test]
    fn opaque_children_are_simplified() {
        let i = int("i");
        let idx = add(i.clone(), sub(constant(1), i.clone()).unwrap()).unwrap();
        let t = array("a", idx, crate::dtype::ValueType::Integer).unwrap();
        assert_eq!(t.simplified().unwrap().to_string(), "a[1]");
    }
}
