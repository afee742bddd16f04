//! Error types for cyclotomic ring arithmetic and prime-factor search.

use std::fmt;

/// Errors raised by context/ring/period/search operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycError {
    /// `n` is not an odd prime in `[3, 19]`, or `f` does not divide `n - 1`.
    InvalidParameter(String),
    /// A linear system had no non-zero pivot, or LLL hit a numerically zero
    /// Gram-Schmidt norm.
    Singular(String),
    /// The prime-factor search exhausted every MPoly root / LLL candidate
    /// without finding a cyclotomic prime above `p`, or a bounded search for
    /// a prime of given order ran out of trials.
    SearchExhausted(String),
    /// `factor` was called while the active context has `n >= 23`, where
    /// Z[ω] is no longer known to be a unique factorization domain.
    OutOfDomain(String),
}

impl fmt::Display for CycError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycError::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
            CycError::Singular(msg) => write!(f, "singular: {msg}"),
            CycError::SearchExhausted(msg) => write!(f, "search exhausted: {msg}"),
            CycError::OutOfDomain(msg) => write!(f, "out of domain: {msg}"),
        }
    }
}

impl std::error::Error for CycError {}

/// The crate's standard result alias.
pub type CycResult<T> = Result<T, CycError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            format!("{}", CycError::InvalidParameter("n=21".into())),
            "invalid parameter: n=21"
        );
        assert_eq!(
            format!("{}", CycError::Singular("zero pivot".into())),
            "singular: zero pivot"
        );
    }

    #[test]
    fn error_trait() {
        let e = CycError::OutOfDomain("n=23".into());
        let _: &dyn std::error::Error = &e;
    }
}
