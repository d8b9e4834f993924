//! Pattern-based rewriting.
//!
//! Role
//! - [`pattern`] defines rule sides, [`matcher`] finds and splices matches, [`rules`]
//!   groups rules into named sets and provides the built-in sets.
//! - [`apply_rule_set`] runs every rule of a set in order, each one exhaustively: the tree
//!   is searched for the first match, the match is replaced, and the search goes on until
//!   the rule no longer matches anywhere. After a replacement only the ancestors of the
//!   rewritten node and what follows it in pre-order are searched again, which finds the
//!   same match as a search from the root.
//! - [`saturate`] repeats whole passes until a pass performs no rewrite.
//!
//! Termination is the responsibility of the rule author: a rule that can re-create its own
//! pattern loops forever.
//!
//! Example
//! ```
//! use hyterm::prelude::*;
//! use hyterm::rewrite::{apply_rule_set, rules::builtin};
//!
//! let t = sub(int("a"), int("b")).unwrap();
//! let out = apply_rule_set(&t, builtin::convert_subtractions()).unwrap();
//! assert_eq!(out.rewrites, 1);
//! assert_eq!(out.term.to_string(), "a + -1 * b");
//! ```
pub mod matcher;
pub mod pattern;
pub mod rules;

use log::{debug, trace};
use smallvec::SmallVec;

use crate::error::Result;
use crate::rewrite::matcher::{Slot, build_new_term, find_entry_point_from, splice};
use crate::term::Term;

pub use pattern::{Pattern, WildcardKind};
pub use rules::{Rule, RuleSet};

/// Result of a rewriting pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub term: Term,
    /// Number of individual rewrites performed.
    pub rewrites: usize,
}

/// Apply each rule of `rules`, in order, until it no longer matches. The input is left
/// untouched.
pub fn apply_rule_set(tree: &Term, rules: &RuleSet) -> Result<Rewritten> {
    apply_owned(tree.deep_copy(), rules)
}

/// Repeat [`apply_rule_set`] until a pass performs no rewrite.
pub fn saturate(tree: &Term, rules: &RuleSet) -> Result<Rewritten> {
    saturate_owned(tree.deep_copy(), rules)
}

pub(crate) fn saturate_owned(mut current: Term, rules: &RuleSet) -> Result<Rewritten> {
    let mut total = 0;
    loop {
        let pass = apply_owned(current, rules)?;
        current = pass.term;
        total += pass.rewrites;
        if pass.rewrites == 0 {
            return Ok(Rewritten {
                term: current,
                rewrites: total,
            });
        }
    }
}

pub(crate) fn apply_owned(mut tree: Term, rules: &RuleSet) -> Result<Rewritten> {
    let mut rewrites = 0;
    for rule in rules.rules() {
        let mut resume: SmallVec<Slot, 16> = SmallVec::new();
        while let Some(entry) = find_entry_point_from(&tree, rule.pattern(), &resume) {
            let replacement = build_new_term(rule.replacement(), &entry.binding)?;
            trace!(
                "[{}] {} at depth {}: -> {}",
                rules.name(),
                rule,
                entry.path.len(),
                replacement
            );
            tree = splice(tree, &entry.path, replacement)?;
            resume = entry.path;
            rewrites += 1;
        }
    }
    debug!("rule set `{}`: {} rewrite(s)", rules.name(), rewrites);
    Ok(Rewritten {
        term: tree,
        rewrites,
    })
}
