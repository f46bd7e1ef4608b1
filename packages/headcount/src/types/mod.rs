//! Data types for the headcount library.

pub mod config;
pub mod observation;
pub mod result;
