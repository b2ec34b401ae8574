//! Spesen Common Types
//!
//! Shared types used across the spesen expense-report engine: the closed
//! currency set, amount sanitization and monetary formatting, line
//! identifiers, and time helpers.

pub mod currency;
pub mod identifiers;
pub mod money;
pub mod time;

pub use currency::*;
pub use identifiers::*;
pub use money::*;
pub use time::*;
