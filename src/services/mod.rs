//! Process-level services for the viewer binary

#[cfg(feature = "runtime")]
pub mod tracing_setup;
