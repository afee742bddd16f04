//! Lattice basis reduction (Lenstra-Lenstra-Lovász), used by
//! [`crate::primefactor`] to pull the short vector of norm `p` out of the
//! congruence lattice.
//!
//! Reference: H. Cohen, *A Course in Computational Algebraic Number
//! Theory*, Algorithm 2.6.3. The reference implementation runs this in
//! 80-bit `long double`; this port uses [`rug::Float`] at a fixed working
//! precision comfortably above that for the same role.

use crate::error::{CycError, CycResult};
use rug::Float;

/// Working precision for the Gram-Schmidt bookkeeping, in bits. Chosen well
/// above `long double`'s ~64-bit mantissa since arbitrary-precision floats
/// are already on hand via `rug`.
const PRECISION: u32 = 256;

fn f(v: f64) -> Float {
    Float::with_val(PRECISION, v)
}

fn dot(a: &[Float], b: &[Float]) -> Float {
    let mut s = f(0.0);
    for (x, y) in a.iter().zip(b) {
        s += Float::with_val(PRECISION, x * y);
    }
    s
}

/// `B[k] -= round(M[k,l])*B[l]`, `M[k,0..=l] -= round(M[k,l])*M[l,0..=l]`.
fn reduce(k: usize, l: usize, b: &mut [Vec<Float>], mu: &mut [Vec<Float>]) {
    let q = mu[k][l].clone().round();
    if q.is_zero() {
        return;
    }
    let n = b[k].len();
    for t in 0..n {
        let sub = Float::with_val(PRECISION, &q * &b[l][t]);
        b[k][t] -= sub;
    }
    for t in 0..=l {
        let sub = Float::with_val(PRECISION, &q * &mu[l][t]);
        mu[k][t] -= sub;
    }
}

/// LLL-reduce the row vectors `rows` (assumed linearly independent,
/// `rows.len() <= rows[0].len()`). Returns the reduced integer basis.
pub fn lll(rows: &[Vec<crate::bigint::Int>]) -> CycResult<Vec<Vec<crate::bigint::Int>>> {
    use crate::bigint::Int;

    let m = rows.len();
    if m == 0 {
        return Ok(vec![]);
    }
    let n = rows[0].len();

    let mut b: Vec<Vec<Float>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|x| Float::with_val(PRECISION, &x.0))
                .collect()
        })
        .collect();

    let mut mu: Vec<Vec<Float>> = vec![vec![f(0.0); m]; m];
    for (i, row) in mu.iter_mut().enumerate() {
        row[i] = f(1.0);
    }
    let mut c: Vec<Vec<Float>> = vec![vec![f(0.0); n]; m];
    let mut csq: Vec<Float> = vec![f(0.0); m];

    c[0] = b[0].clone();
    csq[0] = dot(&b[0], &b[0]);

    let mut k = 1usize;
    let mut kmax = 0usize;
    let eps = Float::with_val(PRECISION, 1e-6);

    while k < m {
        if k > kmax {
            kmax = k;
            for i in 0..k {
                mu[k][i] = Float::with_val(PRECISION, dot(&c[i], &b[k]) / &csq[i]);
            }
            let mut ck = b[k].clone();
            for i in 0..k {
                for t in 0..n {
                    let sub = Float::with_val(PRECISION, &mu[k][i] * &c[i][t]);
                    ck[t] -= sub;
                }
            }
            c[k] = ck;
            csq[k] = dot(&c[k], &c[k]);
            if csq[k].clone().abs() < eps {
                return Err(CycError::Singular(
                    "dependent row vectors in LLL".to_string(),
                ));
            }
        }

        reduce(k, k - 1, &mut b, &mut mu);
        let u = mu[k][k - 1].clone();
        let u_sq_ckm1 = Float::with_val(PRECISION, &u * &u) * &csq[k - 1];
        let d = Float::with_val(PRECISION, &csq[k] + u_sq_ckm1);
        let threshold = Float::with_val(PRECISION, 0.75) * &csq[k - 1];

        if d >= threshold {
            if k >= 2 {
                for l in (0..=(k - 2)).rev() {
                    reduce(k, l, &mut b, &mut mu);
                }
            }
            k += 1;
        } else {
            b.swap(k - 1, k);
            for col in 0..(k - 1) {
                let tmp = mu[k - 1][col].clone();
                mu[k - 1][col] = mu[k][col].clone();
                mu[k][col] = tmp;
            }

            let old_u = u;
            let old_ck = csq[k].clone();
            let old_ckm1 = csq[k - 1].clone();
            let old_c_k_vec = c[k].clone();
            let old_c_km1_vec = c[k - 1].clone();

            let new_m_k_km1 = Float::with_val(PRECISION, &old_u * &old_ckm1) / &d;
            let new_ck = Float::with_val(PRECISION, &old_ck / &d);
            mu[k][k - 1] = new_m_k_km1.clone();
            csq[k] = new_ck.clone();

            let mut new_c_km1 = old_c_k_vec.clone();
            for t in 0..n {
                new_c_km1[t] += Float::with_val(PRECISION, &old_u * &old_c_km1_vec[t]);
            }
            let mut new_c_k = vec![f(0.0); n];
            for t in 0..n {
                new_c_k[t] = Float::with_val(PRECISION, &new_ck * &old_c_km1_vec[t])
                    - Float::with_val(PRECISION, &new_m_k_km1 * &old_c_k_vec[t]);
            }
            c[k - 1] = new_c_km1;
            c[k] = new_c_k;

            csq[k] = Float::with_val(PRECISION, &old_ckm1 * &csq[k]);
            csq[k - 1] = d.clone();

            for row in (k + 1)..m {
                let tmp = mu[row][k - 1].clone();
                mu[row][k - 1] = mu[row][k].clone();
                mu[row][k] = tmp;
            }
            for row in (k + 1)..m {
                let sub = Float::with_val(PRECISION, &old_u * &mu[row][k - 1]);
                mu[row][k] -= sub;
            }
            for row in (k + 1)..m {
                let add = Float::with_val(PRECISION, &mu[k][k - 1] * &mu[row][k]);
                mu[row][k - 1] += add;
            }

            if k > 1 {
                k -= 1;
            }
        }
    }

    let out: Vec<Vec<Int>> = b
        .iter()
        .map(|row| {
            row.iter()
                .map(|x| Int(x.clone().round().to_integer().unwrap_or_default()))
                .collect()
        })
        .collect();
    Ok(out)
}
