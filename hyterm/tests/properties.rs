//! Randomized checks of the algebraic laws the normal form must satisfy. Generators are
//! seeded so that failures are reproducible.
use hyterm::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

const SAMPLES: usize = 64;

fn random_leaf(rng: &mut impl Rng) -> Term {
    match rng.random_range(0..=4) {
        0 => constant(rng.random_range(-4..=4)),
        1 => int(["x", "y", "z"][rng.random_range(0..3)]),
        2 => nat("n"),
        3 => {
            let index = add(int("i"), constant(rng.random_range(0..=2))).unwrap();
            array("a", index, ValueType::Integer).unwrap()
        }
        _ => apply("f", int(["x", "y"][rng.random_range(0..2)]), ValueType::Integer),
    }
}

fn random_term(rng: &mut impl Rng, budget: usize) -> Term {
    if budget == 0 || rng.random_bool(0.3) {
        return random_leaf(rng);
    }
    let left = random_term(rng, budget - 1);
    let right = random_term(rng, budget - 1);
    let node = match rng.random_range(0..3) {
        0 => add(left, right),
        1 => sub(left, right),
        _ => mul(left, right),
    };
    node.unwrap()
}

fn s(t: Term) -> Term {
    t.simplified().unwrap()
}

#[test]
fn addition_commutes() {
    let mut rng = ChaCha20Rng::seed_from_u64(0x5eed);
    for _ in 0..SAMPLES {
        let a = random_term(&mut rng, 3);
        let b = random_term(&mut rng, 3);
        assert_eq!(
            s(add(a.clone(), b.clone()).unwrap()),
            s(add(b.clone(), a.clone()).unwrap()),
            "a = {a}, b = {b}"
        );
    }
}

#[test]
fn multiplication_commutes() {
    let mut rng = ChaCha20Rng::seed_from_u64(0xc0ffee);
    for _ in 0..SAMPLES {
        let a = random_term(&mut rng, 2);
        let b = random_term(&mut rng, 2);
        assert_eq!(
            s(mul(a.clone(), b.clone()).unwrap()),
            s(mul(b.clone(), a.clone()).unwrap()),
            "a = {a}, b = {b}"
        );
    }
}

#[test]
fn addition_associates() {
    let mut rng = ChaCha20Rng::seed_from_u64(0xa550c);
    for _ in 0..SAMPLES {
        let a = random_term(&mut rng, 2);
        let b = random_term(&mut rng, 2);
        let c = random_term(&mut rng, 2);
        let left = add(add(a.clone(), b.clone()).unwrap(), c.clone()).unwrap();
        let right = add(a.clone(), add(b.clone(), c.clone()).unwrap()).unwrap();
        assert_eq!(s(left), s(right), "a = {a}, b = {b}, c = {c}");
    }
}

#[test]
fn simplification_is_idempotent() {
    let mut rng = ChaCha20Rng::seed_from_u64(0x1de);
    for _ in 0..SAMPLES {
        let t = random_term(&mut rng, 4);
        let once = s(t.clone());
        assert_eq!(s(once.clone()), once, "t = {t}");
    }
}

#[test]
fn added_then_subtracted_terms_cancel() {
    let mut rng = ChaCha20Rng::seed_from_u64(0x0);
    for _ in 0..SAMPLES {
        let a = random_term(&mut rng, 3);
        let b = random_term(&mut rng, 3);
        let t = sub(add(a.clone(), b.clone()).unwrap(), b.clone()).unwrap();
        assert_eq!(s(t), s(a.clone()), "a = {a}, b = {b}");
    }
}
