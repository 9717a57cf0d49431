//! Application layer - Use case implementations
//!
//! Event simulators, hunting policy and memory scanners.

pub mod hunt;
pub mod report;
pub mod scanner;
pub mod simulator;
