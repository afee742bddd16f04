//! Factor a rational prime `p` into a cyclotomic prime of norm `p^f`
//! (Edwards §4.4, §4.7).
//!
//! `factor_prime` covers the three cases: `p == n` (ramified), `f == n-1`
//! (inert, `p` stays prime), and the general split case, which finds a root
//! of the period layer's `MPoly` mod `p`, turns it into a short lattice
//! vector via LLL, and descends recursively if that vector's norm is only
//! a proper multiple of `p`.

use crate::bigint::Int;
use crate::context::CycContext;
use crate::cycint::CycInt;
use crate::error::{CycError, CycResult};
use crate::linsolve::linsolve;
use crate::lll::lll;
use crate::modpoly::{roots, ModPoly};
use crate::period::{Period, PeriodLayer};
use rug::rand::RandState;
use std::rc::Rc;

/// Given `u0 == eta_0 (mod p)`, solve for `u_1, ..., u_{e-1} == eta_1, ...,
/// eta_{e-1} (mod p)`. Returns the solution vector (length `e-1`).
fn solve_congruence(layer: &PeriodLayer, u0: &Int, p: &Int) -> CycResult<Vec<Int>> {
    let e1 = layer.e - 1;
    let mut rhs = vec![Int::zero(); e1];
    for row in 0..e1 {
        let base_j0 = Int::from(layer.base[row + 1][0]);
        rhs[row] = (-&(u0 * &base_j0)).floor_mod(p);
    }
    let mut a = vec![vec![Int::zero(); e1]; e1];
    for r in 0..e1 {
        for c in 0..e1 {
            let mut v = Int::from(layer.base[r + 1][c + 1]);
            if r == c {
                v = &v - u0;
            }
            a[r][c] = v.floor_mod(p);
        }
    }
    linsolve(&a, &rhs, p)
}

/// Factor the rational prime `p` into a cyclotomic prime `pi` with
/// `norm(pi) == p^f`. `f`, if given, must equal the multiplicative order of
/// `p` mod `n`; if `None` it is computed.
pub fn factor_prime(
    ctx: &Rc<CycContext>,
    p: &Int,
    f: Option<u32>,
    rng: &mut RandState,
) -> CycResult<CycInt> {
    if p == &Int::from(ctx.n) {
        return Ok(CycInt::new(ctx, &[Int::one(), Int::from(-1i64)]));
    }
    let f = match f {
        Some(f) => f,
        None => ctx.ord(p),
    };
    if f as usize == ctx.n1 {
        return Ok(CycInt::from_scalar(ctx, p.clone()));
    }

    let layer = PeriodLayer::init(ctx, f)?;
    let mpoly = ModPoly::new(&layer.mpoly, p);
    let candidate_roots = roots(&mpoly, p, rng);

    let mut solved: Option<(Int, Vec<Int>)> = None;
    for u0 in candidate_roots {
        if let Ok(sol) = solve_congruence(&layer, &u0, p) {
            solved = Some((u0, sol));
            break;
        }
    }
    let (u0, sol) = solved.ok_or_else(|| {
        CycError::SearchExhausted(format!("no MPoly root mod {p} solved the period congruence"))
    })?;

    let inv_u0 = u0
        .mod_inverse(p)
        .ok_or_else(|| CycError::Singular(format!("eta_0 root {u0} not invertible mod {p}")))?;
    let u: Vec<Int> = sol
        .iter()
        .map(|ui| (&(p - ui) * &inv_u0).floor_mod(p))
        .collect();

    let e1 = layer.e - 1;
    let mut lattice = vec![vec![Int::zero(); e1 + 1]; e1];
    for i in 0..e1 {
        lattice[i][0] = u[i].clone();
        lattice[i][1 + i] = Int::one();
    }
    let reduced = lll(&lattice)?;

    let mut best: Option<(Int, std::collections::BTreeMap<Int, u32>, Period)> = None;
    let mut best_m = p.clone();
    for row in &reduced {
        let y = Period::new(&layer, row);
        let n = y.norm().abs();
        if n == *p {
            return Ok(y.to_cyc());
        }
        let cofactor = Int(n.0.clone() / &p.0);
        if cofactor <= Int::one() {
            continue;
        }
        let g = cofactor.factor(rng);
        let Some(m) = g.keys().max().cloned() else {
            continue;
        };
        if m < best_m {
            best_m = m.clone();
            best = Some((m, g, y));
        }
    }

    let (_, h, s) = best.ok_or_else(|| {
        CycError::SearchExhausted(format!("factor not found for prime {p}"))
    })?;
    let mut q = s.to_cyc();
    for (k, mult) in h {
        let j = ctx.ord(&k);
        let mut pi_k = factor_prime(ctx, &k, Some(j), rng)?;
        let mut m = mult * f;
        while m > 0 {
            match q.div_cyc(&pi_k) {
                Some(t) => {
                    m -= j;
                    q = t;
                }
                None => pi_k = pi_k.conj(1),
            }
        }
    }
    Ok(q)
}

/// Generate a random cyclotomic prime `pi` above a random rational prime
/// `p` of `l` bits. If `f` is given, only primes `p` of that order mod `n`
/// are accepted, retried up to `ntry` times.
pub fn gen_prime(
    ctx: &Rc<CycContext>,
    l: u32,
    f: Option<u32>,
    ntry: u32,
    rng: &mut RandState,
) -> CycResult<CycInt> {
    let p = match f {
        None => crate::bigint::random_prime_bits(rng, l),
        Some(f) => {
            if ctx.n1 as u32 % f != 0 {
                return Err(CycError::InvalidParameter(format!(
                    "f = {f} must divide n-1 = {}",
                    ctx.n1
                )));
            }
            let mut found = None;
            for _ in 0..ntry {
                let cand = crate::bigint::random_prime_bits(rng, l);
                if ctx.ord(&cand) == f {
                    found = Some(cand);
                    break;
                }
            }
            found.ok_or_else(|| {
                CycError::SearchExhausted(format!("no prime of order {f} found in {ntry} tries"))
            })?
        }
    };
    factor_prime(ctx, &p, f, rng)
}
