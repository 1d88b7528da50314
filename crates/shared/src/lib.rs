//! Parley Shared Types
//!
//! This crate contains the records and errors shared by the Parley server crates.

pub mod error;
pub mod types;

pub use error::*;
pub use types::*;
