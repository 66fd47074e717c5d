//! Boundary between tabmodel and optimization-modeling environments.

pub mod adapter;
pub mod errors;
pub mod memory;

pub use adapter::{Environment, ObjectiveHandle, VariableHandle};
pub use errors::{EnvError, Result};
pub use memory::{MemoryEnvironment, MemoryObjective, MemoryParameter, MemoryVariable};
