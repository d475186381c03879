//! fb-core: numeric foundation for the feedback controllers.
//!
//! Contains:
//! - units (uom SI time + constructors)
//! - numeric (Real, tolerances, finite clamping, discrete filter steps)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{FbError, FbResult};
pub use numeric::*;
pub use units::*;
