use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::debug;

use tabmodel_core::{Key, Value};

use crate::adapter::{Environment, ObjectiveHandle, VariableHandle};
use crate::errors::{EnvError, Result};

/// Parameter data held by a [`MemoryEnvironment`].
#[derive(Debug, Clone)]
pub struct MemoryParameter {
    name: String,
    arity: usize,
    values: IndexMap<Key, Value>,
}

impl MemoryParameter {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn get(&self, index: &Key) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn number(&self, index: &Key) -> Option<f64> {
        self.get(index).and_then(Value::as_f64)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Variable whose solved values were published into a [`MemoryEnvironment`].
#[derive(Debug, Clone)]
pub struct MemoryVariable {
    name: String,
    arity: usize,
    values: IndexMap<Key, f64>,
}

impl VariableHandle for MemoryVariable {
    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> usize {
        self.arity
    }

    fn indices(&self) -> Result<Vec<Key>> {
        Ok(self.values.keys().cloned().collect())
    }

    fn value(&self, index: &Key) -> Result<f64> {
        self.values
            .get(index)
            .copied()
            .ok_or_else(|| EnvError::UnknownIndex {
                symbol: self.name.clone(),
                index: index.clone(),
            })
    }
}

#[derive(Debug, Clone)]
pub struct MemoryObjective {
    name: String,
    value: Option<f64>,
}

impl ObjectiveHandle for MemoryObjective {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Result<f64> {
        self.value
            .ok_or_else(|| EnvError::Unsolved(self.name.clone()))
    }
}

#[derive(Debug, Clone)]
enum Symbol {
    Set(Vec<Key>),
    Parameter(MemoryParameter),
    Variable(MemoryVariable),
    Objective(MemoryObjective),
}

/// In-memory modeling environment.
///
/// Sets, parameters, variables and objectives share one namespace. A solver
/// reads registered data through [`MemoryEnvironment::set`] and
/// [`MemoryEnvironment::parameter`] and publishes its results with
/// [`MemoryEnvironment::declare_variable`],
/// [`MemoryEnvironment::set_variable_value`] and
/// [`MemoryEnvironment::set_objective`].
#[derive(Debug, Clone, Default)]
pub struct MemoryEnvironment {
    symbols: IndexMap<String, Symbol>,
}

impl MemoryEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, name: &str) -> Option<&[Key]> {
        match self.symbols.get(name) {
            Some(Symbol::Set(members)) => Some(members.as_slice()),
            _ => None,
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&MemoryParameter> {
        match self.symbols.get(name) {
            Some(Symbol::Parameter(parameter)) => Some(parameter),
            _ => None,
        }
    }

    pub fn symbol_names(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }

    /// Declare a variable so solved values can be published for it.
    pub fn declare_variable(&mut self, name: &str, arity: usize) -> Result<()> {
        self.claim(name)?;
        self.symbols.insert(
            name.to_string(),
            Symbol::Variable(MemoryVariable {
                name: name.to_string(),
                arity,
                values: IndexMap::new(),
            }),
        );
        Ok(())
    }

    /// Publish the solved value of a declared variable at `index`.
    pub fn set_variable_value(
        &mut self,
        name: &str,
        index: impl Into<Key>,
        value: f64,
    ) -> Result<()> {
        let index = index.into();
        let variable = match self.symbols.get_mut(name) {
            Some(Symbol::Variable(variable)) => variable,
            Some(_) => return Err(EnvError::WrongKind(name.to_string())),
            None => return Err(EnvError::UnknownSymbol(name.to_string())),
        };
        if index.arity() != variable.arity {
            return Err(EnvError::rejected(
                name,
                format!(
                    "index {index} has arity {}, expected {}",
                    index.arity(),
                    variable.arity
                ),
            ));
        }
        variable.values.insert(index, value);
        Ok(())
    }

    /// Publish an objective value, creating the objective on first use.
    pub fn set_objective(&mut self, name: &str, value: f64) -> Result<()> {
        match self.symbols.get_mut(name) {
            Some(Symbol::Objective(objective)) => {
                objective.value = Some(value);
                Ok(())
            }
            Some(_) => Err(EnvError::WrongKind(name.to_string())),
            None => {
                self.symbols.insert(
                    name.to_string(),
                    Symbol::Objective(MemoryObjective {
                        name: name.to_string(),
                        value: Some(value),
                    }),
                );
                Ok(())
            }
        }
    }

    fn claim(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(EnvError::rejected(name, "symbol name must not be empty"));
        }
        if self.symbols.contains_key(name) {
            return Err(EnvError::rejected(name, "symbol already defined"));
        }
        Ok(())
    }
}

impl Environment for MemoryEnvironment {
    fn engine(&self) -> &'static str {
        "memory"
    }

    fn has_symbol(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    fn register_set(&mut self, name: &str, members: &[Key]) -> Result<()> {
        self.claim(name)?;

        let mut seen = HashSet::with_capacity(members.len());
        let arity = members.first().map(Key::arity);
        for member in members {
            if Some(member.arity()) != arity {
                return Err(EnvError::rejected(name, "set members have mixed arity"));
            }
            if !seen.insert(member) {
                return Err(EnvError::rejected(name, format!("duplicate member {member}")));
            }
        }

        debug!(set = %name, members = members.len(), "set registered");
        self.symbols
            .insert(name.to_string(), Symbol::Set(members.to_vec()));
        Ok(())
    }

    fn register_parameter(
        &mut self,
        name: &str,
        arity: usize,
        values: &[(Key, Value)],
    ) -> Result<()> {
        self.claim(name)?;

        let mut data = IndexMap::with_capacity(values.len());
        for (index, value) in values {
            if index.arity() != arity {
                return Err(EnvError::rejected(
                    name,
                    format!("index {index} has arity {}, expected {arity}", index.arity()),
                ));
            }
            if data.insert(index.clone(), value.clone()).is_some() {
                return Err(EnvError::rejected(name, format!("duplicate index {index}")));
            }
        }

        debug!(parameter = %name, arity, values = data.len(), "parameter registered");
        self.symbols.insert(
            name.to_string(),
            Symbol::Parameter(MemoryParameter {
                name: name.to_string(),
                arity,
                values: data,
            }),
        );
        Ok(())
    }

    fn variable(&self, name: &str) -> Result<&dyn VariableHandle> {
        match self.symbols.get(name) {
            Some(Symbol::Variable(variable)) => Ok(variable),
            Some(_) => Err(EnvError::WrongKind(name.to_string())),
            None => Err(EnvError::UnknownSymbol(name.to_string())),
        }
    }

    fn objective(&self, name: &str) -> Result<&dyn ObjectiveHandle> {
        match self.symbols.get(name) {
            Some(Symbol::Objective(objective)) => Ok(objective),
            Some(_) => Err(EnvError::WrongKind(name.to_string())),
            None => Err(EnvError::UnknownSymbol(name.to_string())),
        }
    }
}
