use hyterm::prelude::*;

fn s(t: Term) -> Term {
    t.simplified().unwrap()
}

#[test]
fn end_to_end_linear_combination() {
    // 3*x - 2*x + 5
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
    let out = s(t);
    match out.as_binary() {
        Some((BinaryOperator::Addition, left, right)) => {
            assert_eq!(left.as_variable(), Some("x"));
            assert_eq!(right.as_constant(), Some(5));
        }
        _ => panic!("expected an addition, found {out}"),
    }
}

#[test]
fn constant_folding() {
    for (a, b) in [(2, 3), (-7, 4), (0, 0), (i64::MAX, 1)] {
        assert_eq!(s(add(constant(a), constant(b)).unwrap()), constant(a.wrapping_add(b)));
        assert_eq!(s(sub(constant(a), constant(b)).unwrap()), constant(a.wrapping_sub(b)));
        assert_eq!(s(mul(constant(a), constant(b)).unwrap()), constant(a.wrapping_mul(b)));
    }
}

#[test]
fn coefficient_accumulation() {
    let x = int("x");
    let t = add(
        mul(constant(3), x.clone()).unwrap(),
        mul(constant(2), x.clone()).unwrap(),
    )
    .unwrap();
    assert_eq!(s(t), s(mul(constant(5), x).unwrap()));
}

#[test]
fn commutativity_and_associativity() {
    let a = mul(int("x"), int("y")).unwrap();
    let b = array("arr", add(int("i"), constant(1)).unwrap(), ValueType::Integer).unwrap();
    let c = sub(constant(4), apply("f", int("z"), ValueType::Integer)).unwrap();

    assert_eq!(
        s(add(a.clone(), b.clone()).unwrap()),
        s(add(b.clone(), a.clone()).unwrap())
    );
    assert_eq!(
        s(add(add(a.clone(), b.clone()).unwrap(), c.clone()).unwrap()),
        s(add(a.clone(), add(b.clone(), c.clone()).unwrap()).unwrap())
    );
    assert_eq!(
        s(mul(mul(a.clone(), b.clone()).unwrap(), c.clone()).unwrap()),
        s(mul(c, mul(b, a).unwrap()).unwrap())
    );
}

#[test]
fn idempotence() {
    let (x, y) = (int("x"), int("y"));
    // (x - y) * (x + y) - x * x
    let t = sub(
        mul(
            sub(x.clone(), y.clone()).unwrap(),
            add(x.clone(), y.clone()).unwrap(),
        )
        .unwrap(),
        mul(x.clone(), x).unwrap(),
    )
    .unwrap();
    let once = s(t);
    assert_eq!(once.to_string(), "-1 * y * y");
    assert_eq!(s(once.clone()), once);
}

#[test]
fn subtraction_of_sums_cancels() {
    let (x, y, z) = (int("x"), int("y"), int("z"));
    // (y + z) + (x - (y + z))
    let yz = add(y, z).unwrap();
    let t = add(yz.clone(), sub(x.clone(), yz).unwrap()).unwrap();
    assert_eq!(s(t), x);
}

#[test]
fn equal_polynomials_share_a_normal_form() {
    let (a, b) = (int("a"), int("b"));
    // (a + b) * (a + b)  vs  a*a + 2*a*b + b*b
    let square = mul(add(a.clone(), b.clone()).unwrap(), add(a.clone(), b.clone()).unwrap()).unwrap();
    let expanded = add(
        add(
            mul(a.clone(), a.clone()).unwrap(),
            mul(mul(constant(2), a.clone()).unwrap(), b.clone()).unwrap(),
        )
        .unwrap(),
        mul(b.clone(), b).unwrap(),
    )
    .unwrap();
    assert_eq!(s(square), s(expanded));
}

#[test]
fn configuration_is_honoured() {
    let x = int("x");
    let t = add(x.clone(), mul(constant(-1), int("y")).unwrap()).unwrap();
    let raw = Simplifier::new(SimplifierConfig::default().with_final_evaluation(false));
    assert_eq!(raw.simplify(&t).unwrap().to_string(), "x + -1 * y");
    assert_eq!(s(t).to_string(), "x - y");
    assert_eq!(raw.config().ordering, OrderingMode::Fixpoint);
}

fn sum_of(names: &[String]) -> Term {
    names[1..]
        .iter()
        .try_fold(int(&names[0]), |acc, name| add(acc, int(name)))
        .unwrap()
}

fn names(prefix: &str, count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("{prefix}{i:03}")).collect()
}

/// Operands of the left-nested sum at the root of `t`.
fn summands(t: &Term) -> usize {
    let mut count = 1;
    let mut current = t;
    while let Some((BinaryOperator::Addition, left, _)) = current.as_binary() {
        count += 1;
        current = left;
    }
    count
}

#[test]
fn product_of_three_sums_expands_fully() {
    // (x1 + ... + x6) * (y1 + ... + y5) * (z1 + ... + z4)
    let t = mul(
        mul(sum_of(&names("x", 6)), sum_of(&names("y", 5))).unwrap(),
        sum_of(&names("z", 4)),
    )
    .unwrap();
    let out = s(t);
    assert_eq!(summands(&out), 6 * 5 * 4);
    assert_eq!(s(out.clone()), out);
}

#[test]
fn long_sums_normalize_independently_of_order() {
    let mut vars = names("v", 500);
    let forward = s(sum_of(&vars));
    vars.reverse();
    let backward = s(sum_of(&vars));

    assert_eq!(summands(&forward), 500);
    assert_eq!(forward, backward);
}
