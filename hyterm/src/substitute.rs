//! Whole-tree variable substitution.
//!
//! Every free occurrence of a variable is replaced in one traversal: plain operands, array
//! indices, function arguments, summation bounds and bodies, and the bounds of
//! term-bounded variable types. Rebuilt nodes go through their constructors so types are
//! recomputed.
//!
//! Summation indices are binders. A substitution never reaches occurrences bound by a
//! summation, and an index that would capture a free variable of the replacement is renamed
//! first (`i` becomes `i'`, `i''`, ...).
use std::collections::BTreeSet;

use crate::dtype::ValueType;
use crate::error::Result;
use crate::term::{Node, Term};

impl Term {
    /// Replace every free occurrence of `name` with `replacement`.
    ///
    /// Example
    /// ```
    /// use hyterm::prelude::*;
    ///
    /// let t = add(int("x"), array("a", int("x"), ValueType::Integer).unwrap()).unwrap();
    /// let y1 = add(int("y"), constant(1)).unwrap();
    /// assert_eq!(t.substitute("x", &y1).unwrap().to_string(), "y + 1 + a[y + 1]");
    /// ```
    pub fn substitute(&self, name: &str, replacement: &Term) -> Result<Term> {
        self.substitute_all(&[(name, replacement.clone())])
    }

    /// Simultaneous substitution: replacements are not themselves rewritten, so
    /// `[(x, y), (y, x)]` swaps `x` and `y`. When a name occurs twice the first pair wins.
    pub fn substitute_all(&self, substitutions: &[(&str, Term)]) -> Result<Term> {
        if substitutions.is_empty() {
            return Ok(self.deep_copy());
        }
        substitute_owned(self.deep_copy(), substitutions)
    }
}

fn lookup<'s>(substitutions: &'s [(&str, Term)], name: &str) -> Option<&'s Term> {
    substitutions
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, t)| t)
}

fn substitute_owned(term: Term, substitutions: &[(&str, Term)]) -> Result<Term> {
    match term.into_parts() {
        (Node::Variable(name), dtype) => match lookup(substitutions, &name) {
            Some(replacement) => Ok(replacement.deep_copy()),
            None => map_term_bounds(Term::variable(name, dtype), |bound| {
                substitute_owned(bound, substitutions)
            }),
        },
        (
            Node::Summation {
                index,
                lower,
                upper,
                body,
            },
            _,
        ) => substitute_in_summation(index, *lower, *upper, *body, substitutions),
        (node, dtype) => Term::from_parts(node, dtype)
            .map_children(|child| substitute_owned(child, substitutions)),
    }
}

/// Apply `f` to both bounds of a term-bounded variable type.
fn map_term_bounds<F>(term: Term, mut f: F) -> Result<Term>
where
    F: FnMut(Term) -> Result<Term>,
{
    let Some((lo, hi)) = term.dtype().term_bounds() else {
        return Ok(term);
    };
    let (lo, hi) = (lo.deep_copy(), hi.deep_copy());
    let dtype = ValueType::term_bounded(f(lo)?, f(hi)?);
    Ok(term.with_dtype(dtype))
}

fn substitute_in_summation(
    index: String,
    lower: Term,
    upper: Term,
    body: Term,
    substitutions: &[(&str, Term)],
) -> Result<Term> {
    let lower = substitute_owned(lower, substitutions)?;
    let upper = substitute_owned(upper, substitutions)?;

    // The index shadows any substitution of the same name inside the body.
    let inner: Vec<(&str, Term)> = substitutions
        .iter()
        .filter(|(name, _)| *name != index && body.mentions(name))
        .cloned()
        .collect();
    if inner.is_empty() {
        return Term::summation(index, lower, upper, body);
    }

    let captures = inner.iter().any(|(_, replacement)| replacement.mentions(&index));
    let (index, body) = if captures {
        let fresh = fresh_name(&index, &body, &inner);
        let body = rename(body, &index, &fresh)?;
        (fresh, body)
    } else {
        (index, body)
    };

    let body = substitute_owned(body, &inner)?;
    Term::summation(index, lower, upper, body)
}

/// `base` followed by as many primes as needed to be unused in `body` and `substitutions`.
fn fresh_name(base: &str, body: &Term, substitutions: &[(&str, Term)]) -> String {
    let mut taken: BTreeSet<String> = body.free_variables();
    for (name, replacement) in substitutions {
        taken.insert(name.to_string());
        taken.extend(replacement.free_variables());
    }

    let mut candidate = format!("{base}'");
    while taken.contains(&candidate) {
        candidate.push('\'');
    }
    candidate
}

/// Rename free occurrences of `from` to `to`, keeping each occurrence's declared type.
fn rename(term: Term, from: &str, to: &str) -> Result<Term> {
    match term.into_parts() {
        (Node::Variable(name), dtype) if name == from => Ok(Term::variable(to, dtype)),
        (Node::Variable(name), dtype) => {
            map_term_bounds(Term::variable(name, dtype), |bound| rename(bound, from, to))
        }
        (
            Node::Summation {
                index,
                lower,
                upper,
                body,
            },
            _,
        ) if index == from => Term::summation(
            index,
            rename(*lower, from, to)?,
            rename(*upper, from, to)?,
            *body,
        ),
        (node, dtype) => Term::from_parts(node, dtype).map_children(|child| rename(child, from, to)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::func::*;

    #[test]
    fn every_free_occurrence_is_replaced() {
        let x = int("x");
        let n = nat("n");
        let elem = array("a", x.clone(), ValueType::Integer).unwrap();
        let s = sum(
            "i",
            x.clone(),
            n,
            array("b", int("i"), ValueType::Integer).unwrap(),
        )
        .unwrap();
        let t = add(add(x, elem).unwrap(), s).unwrap();

        let y1 = add(int("y"), constant(1)).unwrap();
        let out = t.substitute("x", &y1).unwrap();
        assert_eq!(
            out.to_string(),
            "y + 1 + a[y + 1] + sum(i, y + 1, n, b[i])"
        );
        assert!(!out.mentions("x"));
    }

    #[test]
    fn bound_indices_are_not_substituted() {
        let s = sum(
            "x",
            constant(0),
            nat("n"),
            array("a", int("x"), ValueType::Integer).unwrap(),
        )
        .unwrap();
        let out = s.substitute("x", &constant(5)).unwrap();
        assert_eq!(out, s);
    }

    #[test]
    fn capturing_indices_are_renamed() {
        let body = mul(
            int("x"),
            array("a", int("i"), ValueType::Integer).unwrap(),
        )
        .unwrap();
        let s = sum("i", constant(0), nat("n"), body).unwrap();
        let i1 = add(int("i"), constant(1)).unwrap();
        let out = s.substitute("x", &i1).unwrap();
        assert_eq!(out.to_string(), "sum(i', 0, n, (i + 1) * a[i'])");
        let free: Vec<_> = out.free_variables().into_iter().collect();
        assert_eq!(free, vec!["i".to_string(), "n".to_string()]);
    }

    #[test]
    fn simultaneous_substitution_swaps() {
        let t = sub(int("x"), int("y")).unwrap();
        let out = t
            .substitute_all(&[("x", int("y")), ("y", int("x"))])
            .unwrap();
        assert_eq!(out.to_string(), "y - x");
    }

    #[test]
    fn term_bounds_of_variable_types_are_substituted() {
        let k = var("k", ValueType::term_bounded(constant(0), int("m")));
        let out = k.substitute("m", &nat("p")).unwrap();
        assert_eq!(out.as_variable(), Some("k"));
        let free: Vec<_> = out.free_variables().into_iter().collect();
        assert_eq!(free, vec!["k".to_string(), "p".to_string()]);
    }
}
