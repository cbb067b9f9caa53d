// Common test utilities

pub mod fixtures;
pub mod harness;
