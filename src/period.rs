//! `Period`: the subring Z[η₀,…,η_{e−1}] fixed by the index-`f` subgroup of
//! the Galois group, for a Period layer built from a [`CycContext`] and a
//! divisor `f` of `n-1`.
//!
//! The structure constants are stored as a single `e`×`e` "multiply by ω"
//! table `base`, where `base[p][q]` is the coefficient of `η_q` in `ω·η_p`;
//! the full three-index table `w[i,j,k]` used by the reference algorithm is
//! `base[(j-i) mod e][(k-i) mod e]` and is never materialized, only read on
//! the fly, since it is a simple re-index of `base`.

use crate::bigint::Int;
use crate::context::CycContext;
use crate::cycint::CycInt;
use crate::error::{CycError, CycResult};
use std::rc::Rc;

/// Tables for a fixed period length `f` (so `e = (n-1)/f` periods).
#[derive(Debug)]
pub struct PeriodLayer {
    pub ctx: Rc<CycContext>,
    pub e: usize,
    pub f: u32,
    /// `index[p][j] = g_pow[p + j*e]`, the exponents in the p-th Galois
    /// orbit.
    pub index: Vec<Vec<u32>>,
    /// `cjind[i][k] = (k + i) mod e`.
    pub cjind: Vec<Vec<usize>>,
    /// `base[p][q]` = coefficient of η_q in ω·η_p.
    pub base: Vec<Vec<i64>>,
    /// Coefficients of `MPoly(x) = ∏(x - η_i)`, ascending degree, monic,
    /// length `e+1`.
    pub mpoly: Vec<Int>,
}

fn raw_neg(c: &[Int]) -> Vec<Int> {
    c.iter().map(|x| -x).collect()
}

fn raw_add(a: &[Int], b: &[Int]) -> Vec<Int> {
    a.iter().zip(b).map(|(x, y)| x + y).collect()
}

fn w(layer: &PeriodLayer, i: usize, j: usize, k: usize) -> i64 {
    let e = layer.e;
    layer.base[(j + e - i) % e][(k + e - i) % e]
}

fn raw_mul(layer: &PeriodLayer, a: &[Int], b: &[Int]) -> Vec<Int> {
    let e = layer.e;
    let mut c = vec![Int::zero(); e];
    for i in 0..e {
        if a[i].is_zero() {
            continue;
        }
        for j in 0..e {
            if b[j].is_zero() {
                continue;
            }
            let ab = &a[i] * &b[j];
            for k in 0..e {
                let coeff = w(layer, i, j, k);
                if coeff != 0 {
                    c[k] = &c[k] + &(&ab * &Int::from(coeff as i64));
                }
            }
        }
    }
    c
}

fn raw_conj(layer: &PeriodLayer, c: &[Int], shift: i64) -> Vec<Int> {
    let e = layer.e as i64;
    let idx = (((shift % e) + e) % e) as usize;
    layer.cjind[idx].iter().map(|&k| c[k].clone()).collect()
}

fn raw_to_int(c: &[Int]) -> Int {
    -&c[0]
}

impl PeriodLayer {
    /// Build the tables for period length `f` (`f` must divide `ctx.n1`).
    pub fn init(ctx: &Rc<CycContext>, f: u32) -> CycResult<Rc<PeriodLayer>> {
        let n1 = ctx.n1 as u32;
        if n1 % f != 0 {
            return Err(CycError::InvalidParameter(format!(
                "f = {f} does not divide n-1 = {n1}"
            )));
        }
        let e = (n1 / f) as usize;

        let mut index = vec![vec![0u32; f as usize]; e];
        for p in 0..e {
            for j in 0..f as usize {
                index[p][j] = ctx.g_pow[p + j * e];
            }
        }

        let mut cjind = vec![vec![0usize; e]; e];
        for i in 0..e {
            for k in 0..e {
                cjind[i][k] = (k + i) % e;
            }
        }

        let mut base = vec![vec![0i64; e]; e];
        for p in 0..e {
            for j in 0..f as usize {
                let m = index[p][j];
                let k = (1 + m) % ctx.n;
                if k == 0 {
                    for col in base[p].iter_mut() {
                        *col -= f as i64;
                    }
                } else {
                    let orbit = (ctx.log_g[k as usize] as usize) % e;
                    base[p][orbit] += 1;
                }
            }
        }

        let mut layer = PeriodLayer {
            ctx: ctx.clone(),
            e,
            f,
            index,
            cjind,
            base,
            mpoly: vec![],
        };

        // Build MPoly(x) = (x - eta_0)...(x - eta_{e-1}) by incrementally
        // multiplying in one root at a time (Period.py's construction).
        let basis = |i: usize| -> Vec<Int> {
            let mut v = vec![Int::zero(); e];
            v[i] = Int::one();
            v
        };
        let mut u: Vec<Vec<Int>> = Vec::with_capacity(e);
        let mut y = raw_neg(&basis(0));
        for i in 0..e {
            u.push(y.clone());
            for j in (0..=i).rev() {
                if j < i {
                    let yj = raw_mul(&layer, &u[j], &y);
                    u[j] = yj;
                }
                if j > 0 {
                    let sum = raw_add(&u[j], &u[j - 1]);
                    u[j] = sum;
                }
            }
            y = raw_conj(&layer, &y, 1);
        }
        // Horner assembly a = a*x + c.to_int(), processing u in reverse order
        // of root index; descending coefficients then flip to ascending.
        let mut coeffs_descending = vec![Int::one()];
        for c in u.iter().rev() {
            coeffs_descending.push(raw_to_int(c));
        }
        layer.mpoly = coeffs_descending.into_iter().rev().collect();

        Ok(Rc::new(layer))
    }
}

/// An element `Σ c_j η_j` of the period subring for a fixed layer.
#[derive(Clone, Debug)]
pub struct Period {
    layer: Rc<PeriodLayer>,
    c: Vec<Int>,
}

impl Period {
    pub fn new(layer: &Rc<PeriodLayer>, c: &[Int]) -> Self {
        let mut v: Vec<Int> = c.iter().take(layer.e).cloned().collect();
        v.resize_with(layer.e, Int::zero);
        Period {
            layer: layer.clone(),
            c: v,
        }
    }

    pub fn basis(layer: &Rc<PeriodLayer>, i: usize) -> Self {
        let mut v = vec![Int::zero(); layer.e];
        v[i] = Int::one();
        Period {
            layer: layer.clone(),
            c: v,
        }
    }

    pub fn layer(&self) -> &Rc<PeriodLayer> {
        &self.layer
    }

    pub fn coeffs(&self) -> &[Int] {
        &self.c
    }

    pub fn neg(&self) -> Self {
        Period {
            layer: self.layer.clone(),
            c: raw_neg(&self.c),
        }
    }

    pub fn add(&self, other: &Period) -> Self {
        Period {
            layer: self.layer.clone(),
            c: raw_add(&self.c, &other.c),
        }
    }

    pub fn mul(&self, other: &Period) -> Self {
        Period {
            layer: self.layer.clone(),
            c: raw_mul(&self.layer, &self.c, &other.c),
        }
    }

    /// Conjugate by cyclic permutation: η_j ↦ η_{j+i}.
    pub fn conj(&self, i: i64) -> Self {
        Period {
            layer: self.layer.clone(),
            c: raw_conj(&self.layer, &self.c, i),
        }
    }

    /// Product of all `e` conjugates (including the identity); a rational
    /// integer.
    pub fn norm(&self) -> Int {
        let mut prod = self.c.clone();
        for i in 1..self.layer.e {
            prod = raw_mul(&self.layer, &prod, &raw_conj(&self.layer, &self.c, i as i64));
        }
        raw_to_int(&prod)
    }

    pub fn to_int(&self) -> Int {
        raw_to_int(&self.c)
    }

    pub fn is_rational(&self) -> Option<Int> {
        let first = &self.c[0];
        if self.c.iter().all(|x| x == first) {
            Some(self.to_int())
        } else {
            None
        }
    }

    /// Lift to a CycInt by scattering coefficients into ω-coefficients at
    /// positions `index[i][j]`, then normalizing.
    pub fn to_cyc(&self) -> CycInt {
        let n = self.layer.ctx.n as usize;
        let mut v = vec![Int::zero(); n];
        for (i, row) in self.layer.index.iter().enumerate() {
            for &pos in row {
                v[pos as usize] = self.c[i].clone();
            }
        }
        CycInt::new(&self.layer.ctx, &v)
    }
}

impl PartialEq for Period {
    fn eq(&self, other: &Self) -> bool {
        self.layer.e == other.layer.e && self.c == other.c
    }
}
impl Eq for Period {}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(n: u32) -> Rc<CycContext> {
        Rc::new(CycContext::init(n).unwrap())
    }

    #[test]
    fn inert_layer_has_a_single_period() {
        // f = n-1 => e = 1, MPoly = x - eta_0 with eta_0 = -(1+...+w^{n-1})... actually
        // the single period equals the sum of all nontrivial powers of omega.
        let c = ctx(7);
        let layer = PeriodLayer::init(&c, 6).unwrap();
        assert_eq!(layer.e, 1);
        assert_eq!(layer.mpoly.len(), 2);
    }

    #[test]
    fn mpoly_is_monic_of_degree_e() {
        let c = ctx(7);
        let layer = PeriodLayer::init(&c, 2).unwrap();
        assert_eq!(layer.e, 3);
        assert_eq!(layer.mpoly.len(), 4);
        assert_eq!(layer.mpoly[3], Int::one());
    }

    #[test]
    fn conj_zero_is_identity() {
        let c = ctx(11);
        let layer = PeriodLayer::init(&c, 5).unwrap();
        let a = Period::basis(&layer, 0);
        assert_eq!(a.conj(0), a);
    }

    #[test]
    fn norm_is_rational_and_matches_mpoly_constant_term() {
        let c = ctx(7);
        let layer = PeriodLayer::init(&c, 2).unwrap();
        let eta0 = Period::basis(&layer, 0);
        // product of all conjugates of eta_0 is (-1)^e * MPoly(0)
        let n = eta0.norm();
        let expected = if layer.e % 2 == 0 {
            layer.mpoly[0].clone()
        } else {
            -&layer.mpoly[0]
        };
        assert_eq!(n, expected);
    }

    #[test]
    fn to_cyc_then_norm_matches_period_norm() {
        let c = ctx(7);
        let layer = PeriodLayer::init(&c, 2).unwrap();
        let eta0 = Period::basis(&layer, 0);
        let lifted = eta0.to_cyc();
        assert_eq!(lifted.norm(), eta0.norm());
    }

    #[test]
    fn addition_is_coordinatewise() {
        let c = ctx(11);
        let layer = PeriodLayer::init(&c, 5).unwrap();
        let a = Period::new(&layer, &[Int::from(1i64), Int::from(2i64)]);
        let b = Period::new(&layer, &[Int::from(3i64), Int::from(-1i64)]);
        let sum = a.add(&b);
        assert_eq!(sum.coeffs(), &[Int::from(4i64), Int::from(1i64)]);
    }
}
