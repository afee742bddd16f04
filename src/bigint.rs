//! Arbitrary-precision integer services: the "BigInt / ModInt" component of
//! the design, implemented directly on `rug::Integer` rather than imported
//! from a dedicated crate (none of the reference material depends on one).
//!
//! [`Int`] is a thin newtype, in the same spirit as the teacher's `QInt` —
//! it exists so that `Hash` can be given a stable, representation-independent
//! definition and so the ring/period/search modules have one coefficient
//! type to pass around.

use rug::integer::Order;
use rug::ops::Pow;
use rug::rand::RandState;
use rug::Integer;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};

/// An arbitrary-precision signed integer.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct Int(pub Integer);

impl Int {
    pub fn zero() -> Self {
        Int(Integer::new())
    }

    pub fn one() -> Self {
        Int(Integer::from(1))
    }

    pub fn is_zero(&self) -> bool {
        self.0.cmp0() == std::cmp::Ordering::Equal
    }

    pub fn is_negative(&self) -> bool {
        self.0.cmp0() == std::cmp::Ordering::Less
    }

    pub fn abs(&self) -> Int {
        Int(self.0.clone().abs())
    }

    pub fn gcd(&self, other: &Int) -> Int {
        Int(self.0.clone().gcd(&other.0))
    }

    pub fn pow_u32(&self, exp: u32) -> Int {
        Int(Pow::pow(&self.0, exp).into())
    }

    pub fn to_u32(&self) -> Option<u32> {
        self.0.to_u32()
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.0.to_u64()
    }

    /// Lossy conversion to `f64`, for lattice-reduction bookkeeping only.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64()
    }

    /// `self mod m`, result in `[0, m)` for `m > 0` (floor modulus, unlike
    /// `rug::Integer`'s truncating `Rem`).
    pub fn floor_mod(&self, m: &Int) -> Int {
        let mut r = Int(self.0.clone() % &m.0);
        if r.is_negative() {
            r = Int(r.0 + &m.0);
        }
        r
    }

    /// Binary exponentiation modulo `modulus` (`modulus > 0`).
    pub fn mod_pow(&self, exp: &Int, modulus: &Int) -> Int {
        debug_assert!(!exp.is_negative());
        let mut base = self.floor_mod(modulus);
        let mut e = exp.0.clone();
        let mut result = Int::one();
        let two = Integer::from(2);
        while e != 0 {
            if e.is_odd() {
                result = (&result * &base).floor_mod(modulus);
            }
            base = (&base * &base).floor_mod(modulus);
            e /= &two;
        }
        result
    }

    /// Extended Euclidean algorithm: returns `(g, x, y)` with
    /// `a*x + b*y = g = gcd(a, b)`.
    pub fn extended_gcd(a: &Int, b: &Int) -> (Int, Int, Int) {
        if b.is_zero() {
            return (a.clone(), Int::one(), Int::zero());
        }
        let q = Int(a.0.clone() / &b.0);
        let r = Int(a.0.clone() % &b.0);
        let (g, x1, y1) = Int::extended_gcd(b, &r);
        // a*x1' ... standard back-substitution: (g, y1, x1 - q*y1)
        let y = Int(x1.0 - &(&q.0 * &y1.0));
        (g, y1, y)
    }

    /// Modular inverse of `self` mod `modulus`, or `None` if they are not
    /// coprime.
    pub fn mod_inverse(&self, modulus: &Int) -> Option<Int> {
        let a = self.floor_mod(modulus);
        let (g, x, _) = Int::extended_gcd(&a, modulus);
        if g.abs() != Int::one() {
            return None;
        }
        Some(x.floor_mod(modulus))
    }

    /// Miller-Rabin primality test, `rounds` independent witnesses.
    pub fn is_probable_prime(&self, rounds: u32, rng: &mut RandState) -> bool {
        let n = &self.0;
        if *n < 2 {
            return false;
        }
        for small in [2u32, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31] {
            let s = Integer::from(small);
            if *n == s {
                return true;
            }
            if (n.clone() % &s) == 0 {
                return false;
            }
        }
        let n1 = Int(n.clone() - 1);
        let mut d = n1.clone();
        let mut r = 0u32;
        while (&d.0 % 2) == 0 {
            d = Int(d.0 / 2);
            r += 1;
        }
        let n_int = Int(n.clone());
        'witness: for _ in 0..rounds {
            let a = random_in_range(rng, &Int::from(2u32), &Int(n.clone() - 2));
            let mut x = a.mod_pow(&d, &n_int);
            if x == Int::one() || x == n1 {
                continue;
            }
            for _ in 0..r.saturating_sub(1) {
                x = (&x * &x).floor_mod(&n_int);
                if x == n1 {
                    continue 'witness;
                }
            }
            return false;
        }
        true
    }

    /// Factor `self` (assumed positive) into its prime multiplicities.
    pub fn factor(&self, rng: &mut RandState) -> BTreeMap<Int, u32> {
        let mut map = BTreeMap::new();
        let mut n = self.abs();
        if n <= Int::one() {
            return map;
        }
        // strip small primes by trial division first
        let mut p = Int::from(2u32);
        while &p * &p <= n && p.to_u64().unwrap_or(u64::MAX) < 1_000_000 {
            while n.floor_mod(&p).is_zero() {
                *map.entry(p.clone()).or_insert(0) += 1;
                n = Int(n.0 / &p.0);
            }
            p = Int(p.0 + 1);
        }
        if n > Int::one() {
            factor_recursive(&n, rng, &mut map);
        }
        map
    }
}

fn factor_recursive(n: &Int, rng: &mut RandState, map: &mut BTreeMap<Int, u32>) {
    if n <= &Int::one() {
        return;
    }
    if n.is_probable_prime(30, rng) {
        *map.entry(n.clone()).or_insert(0) += 1;
        return;
    }
    let d = pollard_rho(n, rng);
    factor_recursive(&d, rng, map);
    factor_recursive(&Int(n.0.clone() / &d.0), rng, map);
}

/// Brent's variant of Pollard's rho: returns a non-trivial factor of the
/// composite `n`.
fn pollard_rho(n: &Int, rng: &mut RandState) -> Int {
    if n.floor_mod(&Int::from(2u32)).is_zero() {
        return Int::from(2u32);
    }
    loop {
        let c = random_in_range(rng, &Int::one(), n);
        let f = |x: &Int| -> Int { (&(x * x) + &c).floor_mod(n) };
        let mut x = random_in_range(rng, &Int::zero(), n);
        let mut y = x.clone();
        let mut d = Int::one();
        while d == Int::one() {
            x = f(&x);
            y = f(&f(&y));
            let diff = Int((&x.0 - &y.0).abs());
            d = diff.gcd(n);
        }
        if d != *n {
            return d;
        }
        // bad choice of c, retry with a fresh one
    }
}

/// Uniform random integer in `[lo, hi)` (`hi > lo`).
pub fn random_in_range(rng: &mut RandState, lo: &Int, hi: &Int) -> Int {
    let span = Int(hi.0.clone() - &lo.0);
    debug_assert!(!span.is_negative() && !span.is_zero());
    let bits = span.0.significant_bits().max(1);
    let r = Integer::from(Integer::random_bits(bits, rng));
    Int(lo.0.clone() + (r % &span.0))
}

/// A random prime with exactly `bits` significant bits.
pub fn random_prime_bits(rng: &mut RandState, bits: u32) -> Int {
    let lo = Int(Integer::from(1) << (bits - 1));
    let hi = Int(Integer::from(1) << bits);
    loop {
        let mut cand = random_in_range(rng, &lo, &hi);
        if cand.floor_mod(&Int::from(2u32)).is_zero() {
            cand = Int(cand.0 + 1);
        }
        while cand < hi {
            if cand.is_probable_prime(30, rng) {
                return cand;
            }
            cand = Int(cand.0 + 2);
        }
    }
}

impl fmt::Display for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Hash for Int {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.cmp0().hash(state);
        self.0.to_digits::<u8>(Order::Msf).hash(state);
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Int {
                fn from(v: $t) -> Int {
                    Int(Integer::from(v))
                }
            }
        )*
    };
}
impl_from_int!(i64, i32, u64, u32, usize);

impl From<Integer> for Int {
    fn from(v: Integer) -> Int {
        Int(v)
    }
}

impl Neg for Int {
    type Output = Int;
    fn neg(self) -> Int {
        Int(-self.0)
    }
}
impl Neg for &Int {
    type Output = Int;
    fn neg(self) -> Int {
        Int(-self.0.clone())
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait for Int {
            type Output = Int;
            fn $method(self, rhs: Int) -> Int {
                Int(self.0 $op rhs.0)
            }
        }
        impl<'a> $trait<&'a Int> for &'a Int {
            type Output = Int;
            fn $method(self, rhs: &'a Int) -> Int {
                Int((&self.0) $op (&rhs.0))
            }
        }
        impl<'a> $trait<Int> for &'a Int {
            type Output = Int;
            fn $method(self, rhs: Int) -> Int {
                Int((&self.0) $op rhs.0)
            }
        }
        impl<'a> $trait<&'a Int> for Int {
            type Output = Int;
            fn $method(self, rhs: &'a Int) -> Int {
                Int(self.0 $op (&rhs.0))
            }
        }
    };
}
impl_binop!(Add, add, +);
impl_binop!(Sub, sub, -);
impl_binop!(Mul, mul, *);
impl_binop!(Div, div, /);
impl_binop!(Rem, rem, %);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic() {
        let a = Int::from(7i64);
        let b = Int::from(3i64);
        assert_eq!(&a + &b, Int::from(10i64));
        assert_eq!(&a - &b, Int::from(4i64));
        assert_eq!(&a * &b, Int::from(21i64));
        assert_eq!(&a % &b, Int::from(1i64));
    }

    #[test]
    fn floor_mod_is_nonnegative() {
        let a = Int::from(-7i64);
        let m = Int::from(5i64);
        assert_eq!(a.floor_mod(&m), Int::from(3i64));
    }

    #[test]
    fn mod_pow_matches_fermat() {
        // 2^10 mod 11 == 1 (Fermat's little theorem, 11 prime)
        let base = Int::from(2i64);
        let exp = Int::from(10i64);
        let m = Int::from(11i64);
        assert_eq!(base.mod_pow(&exp, &m), Int::one());
    }

    #[test]
    fn mod_inverse_roundtrip() {
        let a = Int::from(7i64);
        let m = Int::from(26i64);
        let inv = a.mod_inverse(&m).unwrap();
        assert_eq!((&a * &inv).floor_mod(&m), Int::one());
    }

    #[test]
    fn extended_gcd_bezout() {
        let a = Int::from(240i64);
        let b = Int::from(46i64);
        let (g, x, y) = Int::extended_gcd(&a, &b);
        assert_eq!(g, Int::from(2i64));
        assert_eq!(&(&a * &x) + &(&b * &y), g);
    }

    #[test]
    fn factor_small_composite() {
        let mut rng = RandState::new();
        let n = Int::from(360i64); // 2^3 * 3^2 * 5
        let f = n.factor(&mut rng);
        assert_eq!(f.get(&Int::from(2i64)), Some(&3));
        assert_eq!(f.get(&Int::from(3i64)), Some(&2));
        assert_eq!(f.get(&Int::from(5i64)), Some(&1));
        let product: Int = f
            .iter()
            .fold(Int::one(), |acc, (p, &e)| &acc * &p.pow_u32(e));
        assert_eq!(product, n);
    }

    #[test]
    fn factor_product_of_two_primes() {
        let mut rng = RandState::new();
        let n = Int::from(997i64) * Int::from(991i64);
        let f = n.factor(&mut rng);
        assert_eq!(f.len(), 2);
        assert_eq!(f.get(&Int::from(997i64)), Some(&1));
        assert_eq!(f.get(&Int::from(991i64)), Some(&1));
    }

    #[test]
    fn primality() {
        let mut rng = RandState::new();
        assert!(Int::from(97i64).is_probable_prime(30, &mut rng));
        assert!(!Int::from(91i64).is_probable_prime(30, &mut rng)); // 7*13
    }

    #[test]
    fn random_prime_has_requested_bit_length() {
        let mut rng = RandState::new();
        let p = random_prime_bits(&mut rng, 12);
        assert!(p >= Int(Integer::from(1) << 11u32));
        assert!(p < Int(Integer::from(1) << 12u32));
        assert!(p.is_probable_prime(30, &mut rng));
    }
}
