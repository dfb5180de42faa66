//! Data types for the lead scanner.

pub mod config;
pub mod lead;
pub mod result;
pub mod signals;
