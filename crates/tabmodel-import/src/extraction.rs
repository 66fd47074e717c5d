use std::fmt;

use indexmap::IndexMap;

use tabmodel_env::VariableHandle;

/// Which field of a table an extraction fills.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldSelector {
    /// Copy the solved value into the named data field.
    Field(String),
    /// Record only index membership; the table's sole data field takes its default.
    Presence,
}

impl fmt::Display for FieldSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSelector::Field(name) => f.write_str(name),
            FieldSelector::Presence => f.write_str("<presence>"),
        }
    }
}

/// Predicate over a solved scalar.
pub type ValueFilter<'a> = Box<dyn Fn(f64) -> bool + 'a>;

/// Variable handle paired with an optional value filter.
pub struct Extraction<'a> {
    variable: &'a dyn VariableHandle,
    filter: Option<ValueFilter<'a>>,
}

impl<'a> Extraction<'a> {
    pub fn new(variable: &'a dyn VariableHandle) -> Self {
        Self {
            variable,
            filter: None,
        }
    }

    pub fn filtered<F>(variable: &'a dyn VariableHandle, filter: F) -> Self
    where
        F: Fn(f64) -> bool + 'a,
    {
        Self {
            variable,
            filter: Some(Box::new(filter)),
        }
    }

    pub fn variable(&self) -> &'a dyn VariableHandle {
        self.variable
    }

    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    /// Without a filter only nonzero values are kept.
    pub fn accepts(&self, value: f64) -> bool {
        match &self.filter {
            Some(filter) => filter(value),
            None => value != 0.0,
        }
    }
}

impl fmt::Debug for Extraction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extraction")
            .field("variable", &self.variable.name())
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}

/// Mapping from `(table, field selector)` to the variable that fills it.
///
/// Entries keep insertion order; inserting an existing pair replaces it.
#[derive(Debug, Default)]
pub struct ExtractionSpec<'a> {
    entries: IndexMap<(String, FieldSelector), Extraction<'a>>,
}

impl<'a> ExtractionSpec<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        table: &str,
        selector: FieldSelector,
        extraction: Extraction<'a>,
    ) -> Option<Extraction<'a>> {
        self.entries
            .insert((table.to_string(), selector), extraction)
    }

    pub fn magnitude(mut self, table: &str, field: &str, variable: &'a dyn VariableHandle) -> Self {
        self.insert(
            table,
            FieldSelector::Field(field.to_string()),
            Extraction::new(variable),
        );
        self
    }

    pub fn magnitude_filtered<F>(
        mut self,
        table: &str,
        field: &str,
        variable: &'a dyn VariableHandle,
        filter: F,
    ) -> Self
    where
        F: Fn(f64) -> bool + 'a,
    {
        self.insert(
            table,
            FieldSelector::Field(field.to_string()),
            Extraction::filtered(variable, filter),
        );
        self
    }

    pub fn presence(mut self, table: &str, variable: &'a dyn VariableHandle) -> Self {
        self.insert(table, FieldSelector::Presence, Extraction::new(variable));
        self
    }

    pub fn presence_filtered<F>(
        mut self,
        table: &str,
        variable: &'a dyn VariableHandle,
        filter: F,
    ) -> Self
    where
        F: Fn(f64) -> bool + 'a,
    {
        self.insert(
            table,
            FieldSelector::Presence,
            Extraction::filtered(variable, filter),
        );
        self
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &FieldSelector, &Extraction<'a>)> {
        self.entries
            .iter()
            .map(|((table, selector), extraction)| (table.as_str(), selector, extraction))
    }

    /// Distinct table names, in first-seen order.
    pub fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for (table, _) in self.entries.keys() {
            if !names.contains(&table.as_str()) {
                names.push(table.as_str());
            }
        }
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
