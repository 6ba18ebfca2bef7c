//! # Sacred Numbers
//!
//! Builds the bounded universe of "remarkable" numbers that measured values
//! get compared against.
//!
//! ## Pipeline
//!
//! ```text
//! BuildOptions
//!     │
//!     ├──> Seeds (constants, 0..=n, primes, Fibonacci)
//!     │
//!     ├──> Unary closure (powers and roots)
//!     │
//!     ├──> Binary closure
//!     │      ├─ Mul
//!     │      ├─ Sum (twice)
//!     │      └─ Frac
//!     │
//!     └──> Finalize (sorted by value, complexity factors)
//!            └─> RemarkableSet
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use sacred_numbers::{BuildOptions, RemarkableSet};
//!
//! fn main() -> sacred_numbers::Result<()> {
//!     let set = RemarkableSet::build(&BuildOptions::default())?;
//!     println!("{} remarkable numbers", set.len());
//!     Ok(())
//! }
//! ```

mod closure;
mod error;
mod key;
mod options;
mod progress;
mod seeds;
mod set;
mod table;

pub mod integer;
pub mod series;

pub use closure::PassStats;
pub use error::{NumbersError, Result};
pub use key::{Key, SIGNIFICANT_DIGITS};
pub use options::{BuildOptions, FactorCurve, PowerCost, Tuning};
pub use progress::{checkpoint, Milestones, NoProgress, Progress, ProgressEvent};
pub use seeds::{named_constants, NamedConstant};
pub use set::{RemarkableNumber, RemarkableSet};
