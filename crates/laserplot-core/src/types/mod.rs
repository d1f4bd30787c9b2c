//! Type system utilities and aliases.
//!
//! ## Modules
//!
//! - [`aliases`]: Type aliases for boxed iterators.

pub mod aliases;

pub use aliases::*;
