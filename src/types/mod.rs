//! Type definitions for stablewatch

mod error;
mod record;

pub use error::*;
pub use record::*;
