// src/tracker/mod.rs
mod failure;

pub use failure::{Alert, FailureTracker};
