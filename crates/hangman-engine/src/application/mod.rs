//! Application layer: the orchestrator, persistence gateway and read views.

pub mod machine;
pub mod persistence;
pub mod queries;
