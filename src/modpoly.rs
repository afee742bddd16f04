//! Polynomial arithmetic over Z/pZ, used only to find the roots of a
//! Period layer's `MPoly` modulo a rational prime `p` (PrimeFactor step 1).
//!
//! `MPoly` is guaranteed by the theory to split completely into linear
//! factors whenever `p`'s order mod `n` equals the period's `f`, so root
//! finding is all this module needs to provide — not general factorization.

use crate::bigint::Int;
use rug::rand::RandState;

/// Dense polynomial over Z/pZ, ascending coefficient order, always reduced
/// into `[0, p)`. The zero polynomial is `coeffs == []`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModPoly {
    pub coeffs: Vec<Int>,
}

impl ModPoly {
    pub fn new(coeffs: &[Int], p: &Int) -> Self {
        let mut c: Vec<Int> = coeffs.iter().map(|x| x.floor_mod(p)).collect();
        while c.last().is_some_and(|x| x.is_zero()) {
            c.pop();
        }
        ModPoly { coeffs: c }
    }

    pub fn degree(&self) -> i64 {
        self.coeffs.len() as i64 - 1
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn leading(&self) -> Int {
        self.coeffs.last().cloned().unwrap_or_else(Int::zero)
    }

    pub fn x(p: &Int) -> Self {
        ModPoly::new(&[Int::zero(), Int::one()], p)
    }
}

fn add(a: &ModPoly, b: &ModPoly, p: &Int) -> ModPoly {
    let n = a.coeffs.len().max(b.coeffs.len());
    let mut c = Vec::with_capacity(n);
    for i in 0..n {
        let x = a.coeffs.get(i).cloned().unwrap_or_else(Int::zero);
        let y = b.coeffs.get(i).cloned().unwrap_or_else(Int::zero);
        c.push(&x + &y);
    }
    ModPoly::new(&c, p)
}

fn sub(a: &ModPoly, b: &ModPoly, p: &Int) -> ModPoly {
    let neg_b: Vec<Int> = b.coeffs.iter().map(|x| -x).collect();
    add(a, &ModPoly::new(&neg_b, p), p)
}

fn scalar_mul(a: &ModPoly, k: &Int, p: &Int) -> ModPoly {
    let c: Vec<Int> = a.coeffs.iter().map(|x| x * k).collect();
    ModPoly::new(&c, p)
}

fn mul(a: &ModPoly, b: &ModPoly, p: &Int) -> ModPoly {
    if a.is_zero() || b.is_zero() {
        return ModPoly { coeffs: vec![] };
    }
    let mut c = vec![Int::zero(); a.coeffs.len() + b.coeffs.len() - 1];
    for (i, ai) in a.coeffs.iter().enumerate() {
        if ai.is_zero() {
            continue;
        }
        for (j, bj) in b.coeffs.iter().enumerate() {
            c[i + j] = &c[i + j] + &(ai * bj);
        }
    }
    ModPoly::new(&c, p)
}

/// `(quotient, remainder)` of `a / b` over the field Z/pZ (`b` nonzero).
fn divmod(a: &ModPoly, b: &ModPoly, p: &Int) -> (ModPoly, ModPoly) {
    assert!(!b.is_zero(), "division by the zero polynomial");
    let mut rem = a.clone();
    let mut quot = vec![Int::zero(); 0];
    let inv_lead = b
        .leading()
        .mod_inverse(p)
        .expect("leading coefficient invertible mod prime p");
    while !rem.is_zero() && rem.degree() >= b.degree() {
        let shift = (rem.degree() - b.degree()) as usize;
        let coeff = (&rem.leading() * &inv_lead).floor_mod(p);
        if quot.len() < shift + 1 {
            quot.resize_with(shift + 1, Int::zero);
        }
        quot[shift] = coeff.clone();
        let mut term = vec![Int::zero(); shift];
        term.push(coeff);
        let term_poly = ModPoly::new(&term, p);
        rem = sub(&rem, &mul(&term_poly, b, p), p);
    }
    (ModPoly::new(&quot, p), rem)
}

/// Monic gcd of `a` and `b` over Z/pZ via the Euclidean algorithm.
pub fn gcd(a: &ModPoly, b: &ModPoly, p: &Int) -> ModPoly {
    let (mut r0, mut r1) = (a.clone(), b.clone());
    while !r1.is_zero() {
        let (_, r) = divmod(&r0, &r1, p);
        r0 = r1;
        r1 = r;
    }
    if r0.is_zero() {
        return r0;
    }
    let inv_lead = r0.leading().mod_inverse(p).expect("nonzero leading coeff");
    scalar_mul(&r0, &inv_lead, p)
}

/// `base^exp mod modulus`, all arithmetic over Z/pZ[x].
fn powmod(base: &ModPoly, exp: &Int, modulus: &ModPoly, p: &Int) -> ModPoly {
    let mut result = ModPoly::new(&[Int::one()], p);
    let (_, mut b) = divmod(base, modulus, p);
    let mut e = exp.clone();
    let two = Int::from(2u32);
    while !e.is_zero() {
        if !(&e % &two).is_zero() {
            let (_, r) = divmod(&mul(&result, &b, p), modulus, p);
            result = r;
        }
        let (_, sq) = divmod(&mul(&b, &b, p), modulus, p);
        b = sq;
        e = Int(e.0 / &two.0);
    }
    result
}

const BRUTE_FORCE_LIMIT: u64 = 1 << 16;

/// All roots of `f` mod `p`, assuming (as guaranteed by the caller's theory)
/// that `f` splits completely into linear factors over Z/pZ.
pub fn roots(f: &ModPoly, p: &Int, rng: &mut RandState) -> Vec<Int> {
    if f.is_zero() {
        return vec![];
    }
    match p.to_u64() {
        Some(pu) if pu <= BRUTE_FORCE_LIMIT => brute_force_roots(f, p),
        _ => {
            let mut out = vec![];
            split(f, p, rng, &mut out);
            out
        }
    }
}

fn brute_force_roots(f: &ModPoly, p: &Int) -> Vec<Int> {
    let pu = p.to_u64().expect("bounded by BRUTE_FORCE_LIMIT");
    let mut roots = Vec::new();
    for r in 0..pu {
        let x = Int::from(r);
        if eval(f, &x, p).is_zero() {
            roots.push(x);
        }
    }
    roots
}

fn eval(f: &ModPoly, x: &Int, p: &Int) -> Int {
    let mut acc = Int::zero();
    for c in f.coeffs.iter().rev() {
        acc = (&(&acc * x) + c).floor_mod(p);
    }
    acc
}

/// Cantor-Zassenhaus equal-degree-1 splitting: recursively extracts all
/// roots of `f`, which is assumed to split completely into linear factors.
fn split(f: &ModPoly, p: &Int, rng: &mut RandState, out: &mut Vec<Int>) {
    let d = f.degree();
    if d <= 0 {
        return;
    }
    if d == 1 {
        let inv_lead = f.leading().mod_inverse(p).expect("monic-able");
        let root = (&(-&f.coeffs[0]) * &inv_lead).floor_mod(p);
        out.push(root);
        return;
    }
    let half = Int(p.0.clone() - 1) / Int::from(2u32);
    loop {
        let a = crate::bigint::random_in_range(rng, &Int::zero(), p);
        let x_plus_a = add(&ModPoly::x(p), &ModPoly::new(&[a], p), p);
        let h = powmod(&x_plus_a, &half, f, p);
        let h_minus_one = sub(&h, &ModPoly::new(&[Int::one()], p), p);
        let g = gcd(&h_minus_one, f, p);
        if g.degree() > 0 && g.degree() < d {
            let (quot, _) = divmod(f, &g, p);
            split(&g, p, rng, out);
            split(&quot, p, rng, out);
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divmod_exact() {
        let p = Int::from(13u32);
        // (x-1)(x-2) = x^2 - 3x + 2
        let f = ModPoly::new(&[Int::from(2i64), Int::from(-3i64), Int::one()], &p);
        let g = ModPoly::new(&[Int::from(-1i64), Int::one()], &p); // x - 1
        let (q, r) = divmod(&f, &g, &p);
        assert!(r.is_zero());
        assert_eq!(q, ModPoly::new(&[Int::from(-2i64), Int::one()], &p));
    }

    #[test]
    fn gcd_of_coprime_is_one() {
        let p = Int::from(7u32);
        let f = ModPoly::new(&[Int::from(1i64), Int::one()], &p); // x+1
        let g = ModPoly::new(&[Int::from(2i64), Int::one()], &p); // x+2
        let g_gcd = gcd(&f, &g, &p);
        assert_eq!(g_gcd.degree(), 0);
    }

    #[test]
    fn brute_force_roots_of_quadratic() {
        let p = Int::from(11u32);
        // x^2 - 1 = (x-1)(x+1), roots 1 and 10
        let f = ModPoly::new(&[Int::from(-1i64), Int::zero(), Int::one()], &p);
        let mut r = brute_force_roots(&f, &p);
        r.sort();
        assert_eq!(r, vec![Int::from(1u32), Int::from(10u32)]);
    }

    #[test]
    fn split_finds_all_roots_of_cubic() {
        let mut rng = RandState::new();
        let p = Int::from(1_000_003u32); // small prime, but over the brute-force cutover in spirit
        // (x-2)(x-3)(x-5) = x^3 - 10x^2 + 31x - 30
        let f = ModPoly::new(
            &[
                Int::from(-30i64),
                Int::from(31i64),
                Int::from(-10i64),
                Int::one(),
            ],
            &p,
        );
        let mut r = roots(&f, &p, &mut rng);
        r.sort();
        assert_eq!(r, vec![Int::from(2u32), Int::from(3u32), Int::from(5u32)]);
    }
}
