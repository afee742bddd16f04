//! Solve a square linear system `A x = b (mod p)` by Gauss-Jordan
//! elimination over the field Z/pZ, used by [`crate::primefactor`] to turn
//! a root of `MPoly` mod `p` into period coordinates.

use crate::bigint::Int;
use crate::error::{CycError, CycResult};

/// Solve `A x == b (mod p)` for a square matrix `A` (rows of equal length)
/// and right-hand side `b`. Returns the unique solution mod `p`, or
/// `CycError::Singular` if `A` has no pivot in some column.
pub fn linsolve(a: &[Vec<Int>], b: &[Int], p: &Int) -> CycResult<Vec<Int>> {
    let m = a.len();
    assert!(a.iter().all(|row| row.len() == m), "A must be square");
    assert_eq!(b.len(), m, "b must match A's row count");

    // Augmented matrix, m rows by m+1 columns, reduced in place.
    let mut rows: Vec<Vec<Int>> = a
        .iter()
        .zip(b)
        .map(|(row, bi)| {
            let mut r: Vec<Int> = row.iter().map(|x| x.floor_mod(p)).collect();
            r.push(bi.floor_mod(p));
            r
        })
        .collect();

    for k in 0..m {
        let pivot = (k..m).find(|&j| !rows[j][k].is_zero());
        let j = pivot.ok_or_else(|| {
            CycError::Singular(format!("no pivot in column {k} of linsolve"))
        })?;
        if j != k {
            rows.swap(j, k);
        }

        let inv = rows[k][k]
            .mod_inverse(p)
            .ok_or_else(|| CycError::Singular(format!("pivot in column {k} not invertible mod p")))?;
        for col in k..=m {
            rows[k][col] = (&rows[k][col] * &inv).floor_mod(p);
        }

        for row in 0..m {
            if row == k {
                continue;
            }
            let factor = rows[row][k].clone();
            if factor.is_zero() {
                continue;
            }
            for col in k..=m {
                let sub = &factor * &rows[k][col];
                rows[row][col] = (&rows[row][col] - &sub).floor_mod(p);
            }
        }
    }

    Ok(rows.iter().map(|row| row[m].clone()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_simple_system() {
        let p = Int::from(11u32);
        // [1 1; 1 -1] x = [3; 1] => x = [2, 1]
        let a = vec![
            vec![Int::from(1i64), Int::from(1i64)],
            vec![Int::from(1i64), Int::from(-1i64)],
        ];
        let b = vec![Int::from(3i64), Int::from(1i64)];
        let x = linsolve(&a, &b, &p).unwrap();
        assert_eq!(x, vec![Int::from(2u32), Int::from(1u32)]);
    }

    #[test]
    fn detects_singular_matrix() {
        let p = Int::from(7u32);
        let a = vec![
            vec![Int::from(1i64), Int::from(2i64)],
            vec![Int::from(2i64), Int::from(4i64)],
        ];
        let b = vec![Int::from(1i64), Int::from(2i64)];
        assert!(linsolve(&a, &b, &p).is_err());
    }

    #[test]
    fn solves_identity_system() {
        let p = Int::from(13u32);
        let a = vec![
            vec![Int::from(1i64), Int::from(0i64), Int::from(0i64)],
            vec![Int::from(0i64), Int::from(1i64), Int::from(0i64)],
            vec![Int::from(0i64), Int::from(0i64), Int::from(1i64)],
        ];
        let b = vec![Int::from(5i64), Int::from(6i64), Int::from(7i64)];
        let x = linsolve(&a, &b, &p).unwrap();
        assert_eq!(x, b);
    }
}
