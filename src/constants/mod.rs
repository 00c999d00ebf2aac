//! Constants used throughout the generator

pub mod addresses;
pub mod discriminators;
