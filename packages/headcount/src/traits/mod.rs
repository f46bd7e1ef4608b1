//! Core trait abstractions for the headcount library.
//!
//! These traits define the seams applications implement to provide
//! transport and additional sources.

pub mod adapter;
pub mod fetcher;
