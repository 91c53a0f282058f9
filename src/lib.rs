// src/lib.rs
pub mod config;
pub mod endpoint;
pub mod metrics;
pub mod notify;
pub mod probe;
pub mod scheduler;
pub mod tracker;

pub use endpoint::Endpoint;
