//! Factor an arbitrary cyclotomic integer into cyclotomic primes (Edwards
//! §4.7), and generate random cyclotomic primes for testing.
//!
//! Splits `a` into its rational-integer content and primitive part, factors
//! the norm of each separately (content contributes `n^{e}` worth of the
//! ramified prime per rational factor `n`, and each other rational prime
//! factor `k` contributes `e = (n-1)/ord(k)` conjugate cyclotomic primes),
//! then peels primes off the primitive part by trial division, rotating
//! through conjugates of each cyclotomic prime found until one divides.

use crate::bigint::Int;
use crate::context::CycContext;
use crate::cycint::CycInt;
use crate::error::{CycError, CycResult};
use crate::primefactor::factor_prime;
use rug::rand::RandState;
use std::collections::HashMap;
use std::rc::Rc;

/// Factor `a` into cyclotomic primes: `{prime: exponent}` such that the
/// product of `prime^exponent` is an associate of `a`.
pub fn factor(
    ctx: &Rc<CycContext>,
    a: &CycInt,
    rng: &mut RandState,
) -> CycResult<HashMap<CycInt, u32>> {
    if ctx.n >= 23 {
        return Err(CycError::OutOfDomain(
            "n >= 23 is outside the known UFD range".to_string(),
        ));
    }
    let mut out: HashMap<CycInt, u32> = HashMap::new();
    if a.coeffs().iter().all(|c| c.is_zero()) {
        return Ok(out);
    }

    let (content, primitive) = a.primitive();
    let mut g = primitive.norm().abs().factor(rng);
    let mut h = content.abs().factor(rng);
    let n = Int::from(ctx.n);
    let n1 = ctx.n1 as u32;

    let k_ram = g.remove(&n).unwrap_or(0) + n1 * h.remove(&n).unwrap_or(0);
    if k_ram > 0 {
        let ramified = CycInt::new(ctx, &[Int::one(), Int::from(-1i64)]);
        out.insert(ramified, k_ram);
    }

    let mut a_remaining = primitive.clone();

    for (k, mult) in h {
        let f = ctx.ord(&k);
        let mut pi = factor_prime(ctx, &k, Some(f), rng)?;
        let e = n1 / f;
        for _ in 0..e {
            out.insert(pi.clone(), mult);
            pi = pi.conj(1);
        }

        if let Some(gk) = g.get(&k).copied() {
            let mut remaining = gk;
            while remaining > 0 {
                match a_remaining.div_cyc(&pi) {
                    Some(b) => {
                        *out.entry(pi.clone()).or_insert(0) += 1;
                        remaining -= f;
                        a_remaining = b;
                    }
                    None => pi = pi.conj(1),
                }
            }
            g.remove(&k);
        }
    }

    for (k, gk) in g {
        let f = ctx.ord(&k);
        let mut pi = factor_prime(ctx, &k, Some(f), rng)?;
        let mut remaining = gk;
        while remaining > 0 {
            match a_remaining.div_cyc(&pi) {
                Some(b) => {
                    *out.entry(pi.clone()).or_insert(0) += 1;
                    remaining -= f;
                    a_remaining = b;
                }
                None => pi = pi.conj(1),
            }
        }
    }

    Ok(out)
}

/// Generate a random cyclotomic prime of norm `p^f` for a random rational
/// prime `p` with `l` significant bits (any order if `f` is `None`).
pub fn gen_prime(
    ctx: &Rc<CycContext>,
    l: u32,
    f: Option<u32>,
    ntry: u32,
    rng: &mut RandState,
) -> CycResult<CycInt> {
    crate::primefactor::gen_prime(ctx, l, f, ntry, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CycContext;

    #[test]
    fn factors_ramified_prime() {
        let ctx = Rc::new(CycContext::init(7).unwrap());
        let mut rng = RandState::new();
        let pi = CycInt::new(&ctx, &[Int::one(), Int::from(-1i64)]);
        let f = factor(&ctx, &pi, &mut rng).unwrap();
        assert_eq!(f.len(), 1);
        assert_eq!(*f.values().next().unwrap(), 1);
    }

    #[test]
    fn factors_rational_integer() {
        let ctx = Rc::new(CycContext::init(7).unwrap());
        let mut rng = RandState::new();
        let a = CycInt::from_scalar(&ctx, 8i64); // 2^3
        let f = factor(&ctx, &a, &mut rng).unwrap();
        // verify the product of factor^exponent is an associate of a
        let mut prod = CycInt::one(&ctx);
        for (p, &e) in f.iter() {
            prod = prod.mul(&p.pow(e as u64));
        }
        assert!(prod.is_assoc(&a));
    }

    #[test]
    fn rejects_n_above_ufd_range() {
        // n=23 would fail CycContext::init already (MAX_N=19), so this
        // path is exercised indirectly; factor() guards independently in
        // case MAX_N is ever raised without revisiting this module.
        let ctx = Rc::new(CycContext::init(19).unwrap());
        assert!(ctx.n < 23);
    }
}
