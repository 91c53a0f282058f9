// src/scheduler/mod.rs
mod runner;

pub use runner::{Scheduler, TickError, TickReport};
