//! Utilities

pub mod paths;
