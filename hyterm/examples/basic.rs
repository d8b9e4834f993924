use hyterm::prelude::*;

fn main() {
    let (x, y) = (int("x"), int("y"));
    let n = nat("n");

    // (x + y) * (x - y) + sum(i, 0, n, a[i]) - (x * x - 1)
    let square_difference = mul(
        add(x.clone(), y.clone()).unwrap(),
        sub(x.clone(), y.clone()).unwrap(),
    )
    .unwrap();
    let total = sum(
        "i",
        constant(0),
        n.clone(),
        array("a", int("i"), ValueType::NaturalNumber).unwrap(),
    )
    .unwrap();
    let term = sub(
        add(square_difference, total).unwrap(),
        sub(mul(x.clone(), x.clone()).unwrap(), constant(1)).unwrap(),
    )
    .unwrap();

    print!("input:      ");
    term.pretty_print().unwrap();
    println!("  : {}", term.dtype());

    let simplified = term.simplified().unwrap();
    print!("simplified: ");
    simplified.pretty_print().unwrap();
    println!("  : {}", simplified.dtype());

    // Substituting the upper bound and simplifying again
    let shifted = simplified
        .substitute("n", &add(n, constant(1)).unwrap())
        .unwrap()
        .simplified()
        .unwrap();
    print!("n := n + 1: ");
    shifted.pretty_print().unwrap();
    println!();
}
