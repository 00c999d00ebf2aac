//! Utility functions and helpers

pub mod casing;
pub mod hash;
