//! `CycInt`: an exact element of Z[ω] for the odd prime `n` fixed by a
//! [`CycContext`], represented as its length-`n` coefficient vector in `ω`.
//!
//! Two coefficient vectors denote the same ring element iff they differ by
//! a constant added to every coordinate (`1 + ω + ... + ω^{n-1} = 0`); this
//! type keeps the stronger invariant `c[n-1] == 0` after every producing
//! operation, so equality and hashing can simply compare/hash the vector.

use crate::bigint::Int;
use crate::context::CycContext;
use rug::rand::RandState;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Mul, Neg, Sub};
use std::rc::Rc;

#[derive(Clone)]
pub struct CycInt {
    ctx: Rc<CycContext>,
    c: Vec<Int>,
}

impl CycInt {
    /// Build from a coefficient vector, right-padded with zero to length
    /// `n` (or truncated if longer), then normalized.
    pub fn new(ctx: &Rc<CycContext>, coeffs: &[Int]) -> Self {
        let n = ctx.n as usize;
        let mut c: Vec<Int> = coeffs.iter().take(n).cloned().collect();
        c.resize_with(n, Int::zero);
        CycInt { ctx: ctx.clone(), c }.normalize()
    }

    pub fn from_scalar(ctx: &Rc<CycContext>, v: impl Into<Int>) -> Self {
        let n = ctx.n as usize;
        let mut c = vec![Int::zero(); n];
        c[0] = v.into();
        CycInt { ctx: ctx.clone(), c }
    }

    pub fn zero(ctx: &Rc<CycContext>) -> Self {
        Self::from_scalar(ctx, 0i64)
    }

    pub fn one(ctx: &Rc<CycContext>) -> Self {
        Self::from_scalar(ctx, 1i64)
    }

    pub fn ctx(&self) -> &Rc<CycContext> {
        &self.ctx
    }

    pub fn coeffs(&self) -> &[Int] {
        &self.c
    }

    fn same_ctx(&self, other: &CycInt) {
        debug_assert_eq!(self.ctx.n, other.ctx.n, "mixed CycContext");
    }

    /// Subtract `c[n-1]` from every coordinate, so the last coordinate is 0.
    pub fn normalize(&self) -> Self {
        let last = self.c[self.ctx.n as usize - 1].clone();
        if last.is_zero() {
            return self.clone();
        }
        let c = self.c.iter().map(|x| x - &last).collect();
        CycInt {
            ctx: self.ctx.clone(),
            c,
        }
    }

    pub fn add(&self, other: &CycInt) -> Self {
        self.same_ctx(other);
        let c = self.c.iter().zip(&other.c).map(|(a, b)| a + b).collect();
        CycInt {
            ctx: self.ctx.clone(),
            c,
        }
        .normalize()
    }

    pub fn sub(&self, other: &CycInt) -> Self {
        self.add(&other.neg())
    }

    pub fn neg(&self) -> Self {
        let c = self.c.iter().map(|x| -x).collect();
        CycInt {
            ctx: self.ctx.clone(),
            c,
        }
        .normalize()
    }

    pub fn add_int(&self, k: &Int) -> Self {
        let mut c = self.c.clone();
        c[0] = &c[0] + k;
        CycInt {
            ctx: self.ctx.clone(),
            c,
        }
        .normalize()
    }

    pub fn sub_int(&self, k: &Int) -> Self {
        self.add_int(&(-k.clone()))
    }

    pub fn scalar_mul(&self, k: &Int) -> Self {
        let c = self.c.iter().map(|x| x * k).collect();
        CycInt {
            ctx: self.ctx.clone(),
            c,
        }
        .normalize()
    }

    /// Convolution of the two coefficient vectors (length `2n-1`), folded
    /// back into length `n` using `ω^n = 1`, then normalized via
    /// `1 + ω + ... + ω^{n-1} = 0`.
    pub fn mul(&self, other: &CycInt) -> Self {
        self.same_ctx(other);
        let n = self.ctx.n as usize;
        let mut conv = vec![Int::zero(); 2 * n - 1];
        for (i, ai) in self.c.iter().enumerate() {
            if ai.is_zero() {
                continue;
            }
            for (j, bj) in other.c.iter().enumerate() {
                conv[i + j] = &conv[i + j] + &(ai * bj);
            }
        }
        let mut c: Vec<Int> = conv[..n].to_vec();
        for (k, v) in conv[n..].iter().enumerate() {
            // ω^{n+k} = ω^k
            c[k] = &c[k] + v;
        }
        CycInt {
            ctx: self.ctx.clone(),
            c,
        }
        .normalize()
    }

    /// Apply the automorphism ω ↦ ω^{g^i} (`i` taken mod `n-1`).
    pub fn conj(&self, i: i64) -> Self {
        let n1 = self.ctx.n1 as i64;
        let idx = (((i % n1) + n1) % n1) as usize;
        let perm = &self.ctx.cjind[idx];
        let c = perm.iter().map(|&k| self.c[k].clone()).collect();
        CycInt {
            ctx: self.ctx.clone(),
            c,
        }
    }

    /// Product of all `n-1` Galois conjugates (including the identity);
    /// always a rational integer.
    pub fn norm(&self) -> Int {
        let mut prod = self.clone();
        for i in 1..self.ctx.n1 {
            prod = prod.mul(&self.conj(i as i64));
        }
        prod.to_int()
    }

    /// `(content, primitive part)` with `self == content * primitive_part`
    /// and `content >= 0`.
    pub fn primitive(&self) -> (Int, CycInt) {
        let mut d = Int::zero();
        for x in &self.c {
            d = d.gcd(x);
        }
        if d.is_zero() {
            return (Int::zero(), self.clone());
        }
        let c = self.c.iter().map(|x| Int(x.0.clone() / &d.0)).collect();
        (
            d,
            CycInt {
                ctx: self.ctx.clone(),
                c,
            },
        )
    }

    /// Trial division by an integer: `None` if it does not divide evenly.
    pub fn div_int(&self, k: &Int) -> Option<Self> {
        if k.is_zero() {
            return None;
        }
        let mut c = Vec::with_capacity(self.c.len());
        for x in &self.c {
            let r = Int(x.0.clone() % &k.0);
            if !r.is_zero() {
                return None;
            }
            c.push(Int(x.0.clone() / &k.0));
        }
        Some(
            CycInt {
                ctx: self.ctx.clone(),
                c,
            }
            .normalize(),
        )
    }

    /// Trial division by another CycInt: multiply both sides by the product
    /// of `other`'s non-identity conjugates, turning the divisor into its
    /// (rational) norm, then check coordinatewise divisibility.
    pub fn div_cyc(&self, other: &CycInt) -> Option<Self> {
        self.same_ctx(other);
        if other.norm().is_zero() {
            return None;
        }
        let mut co_factor = Self::one(&self.ctx);
        for i in 1..self.ctx.n1 {
            co_factor = co_factor.mul(&other.conj(i as i64));
        }
        // co_factor * other == N(other) (as a CycInt with a single nonzero coord)
        let n_other = co_factor.mul(other).to_int();
        let numer = self.mul(&co_factor);
        numer.div_int(&n_other)
    }

    pub fn to_int(&self) -> Int {
        &self.c[0] - &self.c[self.ctx.n as usize - 1]
    }

    /// `Some(v)` if every coordinate beyond the first equals a single
    /// constant (so the element is rational, equal to `v`); `None`
    /// otherwise.
    pub fn is_rational(&self) -> Option<Int> {
        let first = &self.c[1];
        if self.c[1..].iter().all(|x| x == first) {
            Some(self.to_int())
        } else {
            None
        }
    }

    pub fn pow(&self, e: u64) -> Self {
        if e == 0 {
            return Self::one(&self.ctx);
        }
        let mut result = Self::one(&self.ctx);
        let mut base = self.clone();
        let mut exp = e;
        while exp > 0 {
            if exp & 1 == 1 {
                result = result.mul(&base);
            }
            base = base.mul(&base);
            exp >>= 1;
        }
        result
    }

    pub fn is_unit(&self) -> bool {
        self.norm().abs() == Int::one()
    }

    /// `true` iff `other` divides `self` and the quotient is a unit.
    pub fn is_assoc(&self, other: &CycInt) -> bool {
        match self.div_cyc(other) {
            Some(q) => q.is_unit(),
            None => false,
        }
    }

    /// Uniform coefficients in `[-b+1, b)` for coordinates `0..n-1`; the
    /// last coordinate is fixed at 0 (so the result is already normalized).
    pub fn random(ctx: &Rc<CycContext>, b: &Int, rng: &mut RandState) -> Self {
        let n = ctx.n as usize;
        let lo = Int(rug::Integer::from(1) - &b.0);
        let hi = b.clone();
        let mut c: Vec<Int> = (0..n - 1)
            .map(|_| crate::bigint::random_in_range(rng, &lo, &hi))
            .collect();
        c.push(Int::zero());
        CycInt { ctx: ctx.clone(), c }
    }
}

impl PartialEq for CycInt {
    fn eq(&self, other: &Self) -> bool {
        self.ctx.n == other.ctx.n && self.c == other.c
    }
}
impl Eq for CycInt {}

impl Hash for CycInt {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.c.hash(state);
    }
}

impl fmt::Debug for CycInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CycInt({:?})", self.c)
    }
}

impl fmt::Display for CycInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (i, c) in self.c.iter().enumerate() {
            if c.is_zero() {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            if i == 0 {
                write!(f, "{c}")?;
            } else {
                write!(f, "{c}*w^{i}")?;
            }
        }
        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}

impl Add for &CycInt {
    type Output = CycInt;
    fn add(self, rhs: &CycInt) -> CycInt {
        CycInt::add(self, rhs)
    }
}
impl Sub for &CycInt {
    type Output = CycInt;
    fn sub(self, rhs: &CycInt) -> CycInt {
        CycInt::sub(self, rhs)
    }
}
impl Mul for &CycInt {
    type Output = CycInt;
    fn mul(self, rhs: &CycInt) -> CycInt {
        CycInt::mul(self, rhs)
    }
}
impl Neg for &CycInt {
    type Output = CycInt;
    fn neg(self) -> CycInt {
        CycInt::neg(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(n: u32) -> Rc<CycContext> {
        Rc::new(CycContext::init(n).unwrap())
    }

    fn cyc(ctx: &Rc<CycContext>, v: &[i64]) -> CycInt {
        CycInt::new(ctx, &v.iter().map(|&x| Int::from(x)).collect::<Vec<_>>())
    }

    #[test]
    fn addition_then_subtraction_is_identity() {
        let c = ctx(5);
        let a = cyc(&c, &[1, 2, 3, 4, 0]);
        let b = cyc(&c, &[2, -1, 0, 1, 0]);
        assert_eq!(&(&(&a + &b) - &a), &b);
    }

    #[test]
    fn multiplicative_identity_and_zero() {
        let c = ctx(7);
        let a = cyc(&c, &[1, -2, 3, 0, 0, 1, 0]);
        let one = CycInt::one(&c);
        let zero = CycInt::zero(&c);
        assert_eq!(a.mul(&one), a);
        assert_eq!(a.mul(&zero), zero);
    }

    #[test]
    fn conj_zero_is_identity_and_composes() {
        let c = ctx(11);
        let a = cyc(&c, &[3, 1, -2, 0, 5, 0, 0, -1, 2, 0, 0]);
        assert_eq!(a.conj(0), a);
        let lhs = a.conj(2).conj(3);
        let rhs = a.conj(5);
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn norm_of_rational_integer_is_kth_power() {
        let c = ctx(7);
        let k = CycInt::from_scalar(&c, 3i64);
        assert_eq!(k.norm(), Int::from(3i64).pow_u32(6));
    }

    #[test]
    fn norm_is_multiplicative() {
        let c = ctx(5);
        let a = cyc(&c, &[1, 2, 3, 4, 0]);
        let b = cyc(&c, &[2, -1, 0, 1, 0]);
        assert_eq!(a.mul(&b).norm(), &a.norm() * &b.norm());
    }

    #[test]
    fn ramified_prime_has_norm_n() {
        // 1 - w, the ramified prime for n = 7
        let c = ctx(7);
        let pi = cyc(&c, &[1, -1, 0, 0, 0, 0, 0]);
        assert_eq!(pi.norm(), Int::from(7i64));
    }

    #[test]
    fn primitive_part_has_content_one() {
        let c = ctx(5);
        let a = cyc(&c, &[6, 9, 12, 3, 0]);
        let (d, prim) = a.primitive();
        assert_eq!(d, Int::from(3i64));
        assert_eq!(prim.scalar_mul(&d), a);
        let (d2, _) = prim.primitive();
        assert_eq!(d2, Int::one());
    }

    #[test]
    fn division_recovers_exact_quotient() {
        let c = ctx(7);
        let a = cyc(&c, &[1, -1, 0, 0, 0, 0, 0]); // 1 - w
        let b = cyc(&c, &[1, 0, -1, 0, 0, 0, 0]); // 1 - w^2 = (1-w)(1+w)
        let q = b.div_cyc(&a).expect("1-w divides 1-w^2");
        assert_eq!(&q.mul(&a), &b);
    }

    #[test]
    fn non_divisor_returns_none() {
        let c = ctx(7);
        let a = cyc(&c, &[2, 0, 0, 0, 0, 0, 0]);
        let b = cyc(&c, &[1, -1, 0, 0, 0, 0, 0]); // norm 7, coprime to 2
        assert!(a.div_cyc(&b).is_none());
    }

    #[test]
    fn division_by_a_divisor_with_non_unit_first_coordinate() {
        // d = 2 - w, so d.c[0] == 2 (not a unit coordinate); dividend = d^2.
        let c = ctx(7);
        let d = cyc(&c, &[2, -1, 0, 0, 0, 0, 0]);
        let dividend = d.mul(&d);
        let q = dividend.div_cyc(&d).expect("d divides d^2");
        assert_eq!(q, d);
        assert_eq!(&q.mul(&d), &dividend);
    }

    #[test]
    fn exponent_ladder_matches_repeated_mul() {
        let c = ctx(5);
        let a = cyc(&c, &[1, 2, 0, -1, 0]);
        let mut repeated = CycInt::one(&c);
        for _ in 0..5 {
            repeated = repeated.mul(&a);
        }
        assert_eq!(a.pow(5), repeated);
        assert_eq!(a.pow(0), CycInt::one(&c));
    }

    #[test]
    fn omega_itself_is_a_unit() {
        let c = ctx(5);
        let w = cyc(&c, &[0, 1, 0, 0, 0]);
        assert!(w.is_unit());
    }
}
