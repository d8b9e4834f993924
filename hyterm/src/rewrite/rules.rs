//! Rewrite rules and the built-in rule sets used by the simplifier.
use std::fmt;

use crate::error::{Error, Result};
use crate::rewrite::pattern::Pattern;

/// `pattern -> replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pattern: Pattern,
    replacement: Pattern,
}

impl Rule {
    pub fn new(pattern: Pattern, replacement: Pattern) -> Self {
        Self {
            pattern,
            replacement,
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn replacement(&self) -> &Pattern {
        &self.replacement
    }

    /// First wildcard of the replacement that the pattern does not bind.
    fn unbound_wildcard(&self) -> Option<u8> {
        let bound = self.pattern.wildcards();
        self.replacement
            .wildcards()
            .into_iter()
            .find(|id| !bound.contains(id))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.pattern, self.replacement)
    }
}

/// Named, ordered list of rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    name: String,
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Fails with [`Error::MalformedRule`] if some replacement uses a wildcard its pattern
    /// does not bind.
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Result<Self> {
        let name = name.into();
        for (index, rule) in rules.iter().enumerate() {
            if let Some(wildcard) = rule.unbound_wildcard() {
                return Err(Error::MalformedRule {
                    rule_set: name,
                    rule: index,
                    wildcard,
                });
            }
        }
        Ok(Self { name, rules })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Rule sets driving [`Simplifier`](crate::simplify::Simplifier).
///
/// In the rules below `?n` matches anything, `#n` a constant and `$n` a variable.
pub mod builtin {
    use once_cell::sync::Lazy;

    use super::{Rule, RuleSet};
    use crate::rewrite::pattern::{any, cst, lit, var};

    fn build(name: &str, rules: Vec<Rule>) -> RuleSet {
        RuleSet::new(name, rules).expect("built-in rule sets only use bound wildcards")
    }

    static EXPAND: Lazy<RuleSet> = Lazy::new(|| {
        let (x, y, z) = (|| any(0), || any(1), || any(2));
        build(
            "expand",
            vec![
                Rule::new(x() * (y() - z()), x() * y() - x() * z()),
                Rule::new((x() - y()) * z(), x() * z() - y() * z()),
                Rule::new(x() * (y() + z()), x() * y() + x() * z()),
                Rule::new((x() + y()) * z(), x() * z() + y() * z()),
            ],
        )
    });

    static CONVERT_SUBTRACTIONS: Lazy<RuleSet> = Lazy::new(|| {
        build(
            "convert-subtractions",
            vec![Rule::new(any(0) - any(1), any(0) + lit(-1) * any(1))],
        )
    });

    static LEFT_ASSOCIATE: Lazy<RuleSet> = Lazy::new(|| {
        let (x, y, z) = (|| any(0), || any(1), || any(2));
        build(
            "left-associate",
            vec![
                Rule::new(x() + (y() + z()), (x() + y()) + z()),
                Rule::new(x() * (y() * z()), (x() * y()) * z()),
            ],
        )
    });

    static ORDERING: Lazy<RuleSet> = Lazy::new(|| {
        let (a, c, v) = (|| any(0), || cst(1), || var(2));
        build(
            "ordering",
            vec![
                Rule::new(v() * c(), c() * v()),
                Rule::new((a() * v()) * c(), (a() * c()) * v()),
                Rule::new(c() + v(), v() + c()),
                Rule::new((a() + c()) + v(), (a() + v()) + c()),
            ],
        )
    });

    static COLLAPSE_GROUPS: Lazy<RuleSet> = Lazy::new(|| {
        let (a, x) = (|| any(0), || any(1));
        let (c1, c2) = (|| cst(2), || cst(3));
        build(
            "collapse-groups",
            vec![
                Rule::new(x() + x(), lit(2) * x()),
                Rule::new(c1() * x() + c2() * x(), (c1() + c2()) * x()),
                Rule::new(c1() * x() + x(), (c1() + lit(1)) * x()),
                Rule::new(x() + c1() * x(), (c1() + lit(1)) * x()),
                Rule::new((a() + x()) + x(), a() + lit(2) * x()),
                Rule::new(
                    (a() + c1() * x()) + c2() * x(),
                    a() + (c1() + c2()) * x(),
                ),
            ],
        )
    });

    /// Distribute multiplication over addition and subtraction, on both sides.
    pub fn expand() -> &'static RuleSet {
        &EXPAND
    }

    /// `?0 - ?1 -> ?0 + -1 * ?1`.
    pub fn convert_subtractions() -> &'static RuleSet {
        &CONVERT_SUBTRACTIONS
    }

    /// Re-associate `+` and `*` chains to the left.
    pub fn left_associate() -> &'static RuleSet {
        &LEFT_ASSOCIATE
    }

    /// Move constants before variables in products and after variables in sums.
    pub fn ordering() -> &'static RuleSet {
        &ORDERING
    }

    /// Merge adjacent like terms of a sum.
    pub fn collapse_groups() -> &'static RuleSet {
        &COLLAPSE_GROUPS
    }

    /// Every built-in rule set, in pipeline order.
    pub fn all() -> [&'static RuleSet; 5] {
        [
            expand(),
            convert_subtractions(),
            left_associate(),
            ordering(),
            collapse_groups(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::pattern::any;

    #[test]
    fn unbound_replacement_wildcards_are_rejected() {
        let rule = Rule::new(any(0) + any(1), any(0) * any(2));
        let err = RuleSet::new("broken", vec![rule]).unwrap_err();
        assert_eq!(
            err,
            Error::MalformedRule {
                rule_set: "broken".to_string(),
                rule: 0,
                wildcard: 2,
            }
        );
    }

    #[test]
    fn builtin_sets_are_well_formed() {
        let sizes: Vec<_> = builtin::all().iter().map(|s| s.len()).collect();
        assert_eq!(sizes, vec![4, 1, 2, 4, 6]);
        assert_eq!(builtin::ordering().name(), "ordering");
        assert_eq!(
            builtin::convert_subtractions().rules()[0].to_string(),
            "?0 - ?1 -> ?0 + -1 * ?1"
        );
    }
}
