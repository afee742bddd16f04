//! Cyclotomic integer factorization via Kummer's classical theory.
//!
//! Implements the arithmetic of Z[ω] for ω a primitive n-th root of unity
//! (n an odd prime, 3 <= n <= 19, the range for which Z[ω] is known to be a
//! unique factorization domain), the period subrings used to factor
//! rational primes into cyclotomic primes, and the classical factorization
//! algorithm itself (Edwards, *Fermat's Last Theorem*, §4.2-4.7).

pub mod bigint;
pub mod context;
pub mod cycint;
pub mod error;
pub mod factor;
pub mod linsolve;
pub mod lll;
pub mod modpoly;
pub mod period;
pub mod primefactor;

pub use bigint::Int;
pub use context::CycContext;
pub use cycint::CycInt;
pub use error::{CycError, CycResult};
pub use factor::factor;
pub use period::{Period, PeriodLayer};
pub use primefactor::{factor_prime, gen_prime};
