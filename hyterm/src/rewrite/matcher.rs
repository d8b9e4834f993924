//! Matching patterns against concrete trees and splicing replacements back in.
//!
//! Role
//! - [`match_pattern_terms`] unifies one candidate subtree with a pattern, walking both
//!   in lock-step with a FIFO worklist and recording wildcard bindings.
//! - [`find_entry_point`] locates the first subtree (pre-order, left before right) that
//!   matches a pattern. Only binary nodes are descended into: array indices, function
//!   arguments and summation parts are opaque here. [`find_entry_point_from`] picks the
//!   search up after a splice instead of starting over.
//! - Trees are walked with explicit stacks, never by recursion on their depth.
//! - [`build_new_term`] instantiates a replacement pattern, [`splice`] puts it back in
//!   place, rebuilding every ancestor so that types along the path are recomputed.
use std::collections::VecDeque;

use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::rewrite::pattern::Pattern;
use crate::term::{Node, Term};

/// Wildcard id to subterm mapping produced by a successful match.
///
/// Bound subterms are owned copies, so a binding outlives any edit to the tree it was
/// taken from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Binding {
    slots: SmallVec<(u8, Term), 4>,
}

impl Binding {
    pub fn get(&self, id: u8) -> Option<&Term> {
        self.slots.iter().find(|(i, _)| *i == id).map(|(_, t)| t)
    }

    /// Bind `id` to `term`. A wildcard that is already bound only accepts a structurally
    /// equal subterm; returns whether the binding is still consistent.
    pub fn bind(&mut self, id: u8, term: &Term) -> bool {
        match self.get(id) {
            Some(existing) => existing == term,
            None => {
                self.slots.push((id, term.deep_copy()));
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Step from a binary node to one of its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Left,
    Right,
}

/// Location of a matching subtree, as the path from the root, with its bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub path: SmallVec<Slot, 16>,
    pub binding: Binding,
}

impl EntryPoint {
    /// The match is the whole tree.
    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }
}

/// Unify `candidate` with `pattern`.
///
/// Returns the bindings when every pattern node is matched by a compatible tree node and
/// every repeated wildcard binds structurally equal subterms, `None` otherwise.
pub fn match_pattern_terms(candidate: &Term, pattern: &Pattern) -> Option<Binding> {
    let mut bound: SmallVec<(u8, &Term), 4> = SmallVec::new();
    let mut queue: VecDeque<(&Term, &Pattern)> = VecDeque::new();
    queue.push_back((candidate, pattern));

    while let Some((term, pat)) = queue.pop_front() {
        match pat {
            Pattern::Wildcard { kind, id } => {
                if !kind.admits(term) {
                    return None;
                }
                match bound.iter().find(|(i, _)| i == id) {
                    Some((_, existing)) if *existing != term => return None,
                    Some(_) => {}
                    None => bound.push((*id, term)),
                }
            }
            Pattern::Constant(value) => {
                if term.as_constant() != Some(*value) {
                    return None;
                }
            }
            Pattern::Binary { op, left, right } => match term.as_binary() {
                Some((o, l, r)) if o == *op => {
                    queue.push_back((l, left));
                    queue.push_back((r, right));
                }
                _ => return None,
            },
        }
    }

    let mut binding = Binding::default();
    for (id, term) in bound {
        binding.bind(id, term);
    }
    Some(binding)
}

/// First subtree of `tree` matching `pattern`, in pre-order with left operands visited
/// before right operands.
pub fn find_entry_point(tree: &Term, pattern: &Pattern) -> Option<EntryPoint> {
    find_entry_point_from(tree, pattern, &[])
}

/// Same as [`find_entry_point`] for a tree whose only change since the last search is at
/// `resume`: nothing before `resume` in pre-order matched, so only the ancestors on the
/// path are checked again before the search continues from `resume` onwards.
pub fn find_entry_point_from(tree: &Term, pattern: &Pattern, resume: &[Slot]) -> Option<EntryPoint> {
    let mut path: Vec<Slot> = Vec::new();
    // (subtree, depth of its parent, step from the parent)
    let mut stack: Vec<(&Term, usize, Option<Slot>)> = Vec::new();

    let mut node = tree;
    for &step in resume {
        let Some((_, left, right)) = node.as_binary() else {
            break;
        };
        if let Some(binding) = try_match(node, pattern) {
            return Some(EntryPoint {
                path: path.iter().copied().collect(),
                binding,
            });
        }
        node = match step {
            Slot::Left => {
                stack.push((right, path.len(), Some(Slot::Right)));
                left
            }
            Slot::Right => right,
        };
        path.push(step);
    }
    stack.push((node, path.len(), None));

    while let Some((term, depth, step)) = stack.pop() {
        path.truncate(depth);
        path.extend(step);

        if let Some(binding) = try_match(term, pattern) {
            return Some(EntryPoint {
                path: path.iter().copied().collect(),
                binding,
            });
        }
        if let Some((_, left, right)) = term.as_binary() {
            stack.push((right, path.len(), Some(Slot::Right)));
            stack.push((left, path.len(), Some(Slot::Left)));
        }
    }

    None
}

fn try_match(term: &Term, pattern: &Pattern) -> Option<Binding> {
    if term.matches(pattern) {
        match_pattern_terms(term, pattern)
    } else {
        None
    }
}

/// Instantiate `replacement`, substituting each wildcard with a fresh copy of its binding.
///
/// Rule sets check at construction that every replacement wildcard is bound by the
/// pattern, so [`Error::UnboundWildcard`] only arises with hand-made bindings.
pub fn build_new_term(replacement: &Pattern, binding: &Binding) -> Result<Term> {
    match replacement {
        Pattern::Wildcard { id, .. } => binding
            .get(*id)
            .map(Term::deep_copy)
            .ok_or(Error::UnboundWildcard { wildcard: *id }),
        Pattern::Constant(value) => Ok(Term::constant(*value)),
        Pattern::Binary { op, left, right } => Term::binary(
            *op,
            build_new_term(left, binding)?,
            build_new_term(right, binding)?,
        ),
    }
}

/// Replace the subtree of `tree` at `path` with `replacement`. Every node on the path is
/// rebuilt through [`Term::binary`].
///
/// # Panics
/// If `path` steps through a node that is not binary. Paths from [`find_entry_point`]
/// never do.
pub fn splice(tree: Term, path: &[Slot], replacement: Term) -> Result<Term> {
    let mut ancestors = Vec::with_capacity(path.len());
    let mut node = tree;
    for &step in path {
        let Node::Binary { op, left, right } = node.into_node() else {
            unreachable!("entry point paths only traverse binary nodes");
        };
        let (next, sibling) = match step {
            Slot::Left => (*left, *right),
            Slot::Right => (*right, *left),
        };
        ancestors.push((op, step, sibling));
        node = next;
    }

    ancestors
        .into_iter()
        .rev()
        .try_fold(replacement, |child, (op, step, sibling)| match step {
            Slot::Left => Term::binary(op, child, sibling),
            Slot::Right => Term::binary(op, sibling, child),
        })
}
