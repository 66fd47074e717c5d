use tabmodel_core::{Key, Value};

use crate::errors::Result;

/// Solved variable exposed by a modeling environment.
pub trait VariableHandle {
    fn name(&self) -> &str;

    /// Number of index components of every defined index tuple.
    fn arity(&self) -> usize;

    /// Index tuples the variable is defined over, in environment order.
    fn indices(&self) -> Result<Vec<Key>>;

    /// Solved scalar at `index`.
    fn value(&self, index: &Key) -> Result<f64>;
}

/// Objective exposed by a modeling environment.
pub trait ObjectiveHandle {
    fn name(&self) -> &str;

    fn value(&self) -> Result<f64>;
}

/// Trait implemented by optimization-modeling environments that accept named
/// index sets and parameters and expose solved variables and objectives.
///
/// Implementations are driven from a single logical flow; one model is in
/// flight per environment instance.
pub trait Environment {
    /// Returns the engine identifier (e.g. `memory`).
    fn engine(&self) -> &'static str;

    /// True when `name` already holds data in the environment.
    fn has_symbol(&self, name: &str) -> bool;

    /// Register an index set; members keep their iteration order.
    fn register_set(&mut self, name: &str, members: &[Key]) -> Result<()>;

    /// Register a parameter indexed by tuples of `arity` components.
    fn register_parameter(
        &mut self,
        name: &str,
        arity: usize,
        values: &[(Key, Value)],
    ) -> Result<()>;

    fn variable(&self, name: &str) -> Result<&dyn VariableHandle>;

    fn objective(&self, name: &str) -> Result<&dyn ObjectiveHandle>;
}
