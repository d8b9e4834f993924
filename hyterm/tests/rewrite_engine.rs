use hyterm::prelude::*;
use hyterm::rewrite::matcher::{Slot, find_entry_point, match_pattern_terms};
use hyterm::rewrite::pattern::{any, cst, lit, var as pvar};
use hyterm::rewrite::rules::builtin;
use hyterm::rewrite::{Rule, RuleSet, apply_rule_set, saturate};

#[test]
fn custom_rule_sets_rewrite_to_fixpoint() {
    // ?0 * 1 -> ?0 and 1 * ?0 -> ?0
    let rules = RuleSet::new(
        "unit",
        vec![
            Rule::new(any(0) * lit(1), any(0)),
            Rule::new(lit(1) * any(0), any(0)),
        ],
    )
    .unwrap();

    let x = int("x");
    let t = mul(
        mul(constant(1), x.clone()).unwrap(),
        mul(int("y"), constant(1)).unwrap(),
    )
    .unwrap();
    let out = apply_rule_set(&t, &rules).unwrap();
    assert_eq!(out.rewrites, 2);
    assert_eq!(out.term.to_string(), "x * y");
}

#[test]
fn malformed_rules_fail_when_the_set_is_built() {
    let err = RuleSet::new(
        "broken",
        vec![
            Rule::new(any(0), any(0)),
            Rule::new(any(0) + any(1), any(3)),
        ],
    )
    .unwrap_err();
    match err {
        Error::MalformedRule {
            rule_set,
            rule,
            wildcard,
        } => {
            assert_eq!(rule_set, "broken");
            assert_eq!(rule, 1);
            assert_eq!(wildcard, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn matching_binds_wildcards_in_worklist_order() {
    // (3 * x) + (3 * x)
    let three_x = mul(constant(3), int("x")).unwrap();
    let t = add(three_x.clone(), three_x.clone()).unwrap();
    let binding = match_pattern_terms(&t, &(cst(0) * any(1) + cst(0) * any(1))).unwrap();
    assert_eq!(binding.get(0), Some(&constant(3)));
    assert_eq!(binding.get(1), Some(&int("x")));

    let t = add(three_x, mul(constant(4), int("x")).unwrap()).unwrap();
    assert!(match_pattern_terms(&t, &(cst(0) * any(1) + cst(0) * any(1))).is_none());
}

#[test]
fn entry_points_are_found_left_first() {
    // (a + 1) * (b + 2)
    let t = mul(
        add(int("a"), constant(1)).unwrap(),
        add(int("b"), constant(2)).unwrap(),
    )
    .unwrap();
    let entry = find_entry_point(&t, &(pvar(0) + cst(1))).unwrap();
    assert_eq!(entry.path.as_slice(), &[Slot::Left]);
    assert_eq!(entry.binding.get(0), Some(&int("a")));
    assert!(!entry.is_root());
}

#[test]
fn rewriting_never_mutates_the_input() {
    let t = sub(int("a"), sub(int("b"), int("c")).unwrap()).unwrap();
    let snapshot = t.deep_copy();
    let out = apply_rule_set(&t, builtin::convert_subtractions()).unwrap();
    assert_eq!(t, snapshot);
    assert_eq!(out.rewrites, 2);
    assert_eq!(out.term.to_string(), "a + -1 * (b + -1 * c)");
}

#[test]
fn left_association_flattens_right_chains() {
    let (a, b, c, d) = (int("a"), int("b"), int("c"), int("d"));
    let t = add(a, add(b, add(c, d).unwrap()).unwrap()).unwrap();
    let out = saturate(&t, builtin::left_associate()).unwrap();
    assert_eq!(out.term.to_string(), "a + b + c + d");
    let first = out.term.as_binary().unwrap().1;
    assert_eq!(first.to_string(), "a + b + c");
}

#[test]
fn rewritten_nodes_are_retyped() {
    // n * (n + 1) with n natural expands into n * n + n * 1
    let n = nat("n");
    let t = mul(n.clone(), add(n.clone(), constant(1)).unwrap()).unwrap();
    assert_eq!(*t.dtype(), ValueType::NaturalNumber);
    let out = apply_rule_set(&t, builtin::expand()).unwrap();
    assert_eq!(out.term.to_string(), "n * n + n * 1");
    assert_eq!(*out.term.dtype(), ValueType::NaturalNumber);
}
