use hyterm::prelude::*;

#[test]
fn substitution_reaches_operands_indices_and_bounds() {
    let x = int("x");
    let plain = mul(constant(2), x.clone()).unwrap();
    let indexed = array("a", x.clone(), ValueType::Integer).unwrap();
    let summed = sum(
        "k",
        constant(0),
        x.clone(),
        array("b", int("k"), ValueType::NaturalNumber).unwrap(),
    )
    .unwrap();
    let t = add(add(plain, indexed).unwrap(), summed).unwrap();

    let y1 = add(int("y"), constant(1)).unwrap();
    let out = t.substitute("x", &y1).unwrap();
    assert_eq!(
        out.to_string(),
        "2 * (y + 1) + a[y + 1] + sum(k, 0, y + 1, b[k])"
    );
    assert!(!out.mentions("x"));
    assert!(out.mentions("y"));
    // The original tree is untouched.
    assert!(t.mentions("x"));
}

#[test]
fn substituted_terms_simplify_consistently() {
    let x = int("x");
    let t = sub(mul(constant(3), x.clone()).unwrap(), x).unwrap();
    let y1 = add(int("y"), constant(1)).unwrap();
    let out = t.substitute("x", &y1).unwrap().simplified().unwrap();
    assert_eq!(out.to_string(), "2 * y + 2");
}

#[test]
fn substitution_retypes_the_result() {
    let n = nat("n");
    let t = add(n.clone(), constant(1)).unwrap();
    assert_eq!(*t.dtype(), ValueType::PositiveInteger);
    let out = t.substitute("n", &int("m")).unwrap();
    assert_eq!(*out.dtype(), ValueType::Integer);
}

#[test]
fn summation_index_is_never_captured() {
    let body = add(
        int("x"),
        array("a", int("j"), ValueType::Integer).unwrap(),
    )
    .unwrap();
    let s = sum("j", constant(1), nat("n"), body).unwrap();
    let out = s.substitute("x", &mul(constant(2), int("j")).unwrap()).unwrap();
    assert_eq!(out.to_string(), "sum(j', 1, n, 2 * j + a[j'])");
    assert!(out.mentions("j"));
}
