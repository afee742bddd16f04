//! End-to-end demo: multiply two random cyclotomic integers, factor the
//! product, and check the factors recombine to an associate of it.
//!
//! Ported from `example.py` in the reference material (`CYC.init(5)`,
//! `CYC.random(5)`, `factor`, `isAssoc`). A library has no business printing
//! on its hot path, so this lives here rather than in `src/`.

use cyclofactor::{factor, CycContext, CycInt, Int};
use rug::rand::RandState;
use std::rc::Rc;

fn main() {
    let ctx = Rc::new(CycContext::init(5).expect("5 is a valid odd prime"));
    let mut rng = RandState::new();
    let bound = Int::from(5u32);

    for _ in 0..10 {
        let a = CycInt::random(&ctx, &bound, &mut rng);
        let b = CycInt::random(&ctx, &bound, &mut rng);
        let c = a.mul(&b);
        let f = factor(&ctx, &c, &mut rng).expect("factor should succeed for n = 5");
        println!("{c} -> {f:?}");

        let mut d = CycInt::one(&ctx);
        for (k, &e) in f.iter() {
            d = d.mul(&k.pow(e as u64));
        }
        if !d.is_assoc(&c) {
            panic!("wrong: {d} is not an associate of {c}");
        }
    }
}
