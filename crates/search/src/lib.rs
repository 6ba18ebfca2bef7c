//! # Sacred Search
//!
//! Matches measured values against a prebuilt
//! [`RemarkableSet`](sacred_numbers::RemarkableSet).
//!
//! - [`check_number`]: one value, ranked by relevance
//! - [`check_property`]: every numeric value of chosen dataset properties
//! - [`check_property_ratio`]: every pairwise ratio (smaller over larger)
//!
//! ## Example
//!
//! ```no_run
//! use sacred_numbers::{BuildOptions, RemarkableSet};
//! use sacred_search::check_number;
//!
//! fn main() -> sacred_search::Result<()> {
//!     let set = RemarkableSet::build(&BuildOptions::default())?;
//!     for found in check_number(&set, 1737.4 / 6371.0).iter().take(5) {
//!         println!("{} R={:.2}", found.name, found.relevance);
//!     }
//!     Ok(())
//! }
//! ```

mod dataset;
mod error;
mod matcher;
mod scan;

pub use dataset::{Dataset, Record};
pub use error::{Result, SearchError};
pub use matcher::{check_number, relative_delta, relevance, score, within_tolerance, MatchResult};
pub use scan::{
    check_property, check_property_ratio, ItemMatches, PropertyMatches, PropertySelection,
    ScanReport,
};
