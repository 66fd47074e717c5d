use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::dataset::DataSet;
use crate::error::Result;

/// Produce a deep, schema-validated duplicate of `source`.
///
/// Every row is re-validated against the schema while it is copied, so the
/// copy never shares row storage with the source.
pub fn copy_dataset(source: &DataSet) -> Result<DataSet> {
    let start = Instant::now();
    let mut copy = DataSet::with_options(Arc::clone(source.schema()), source.options());

    for (name, table) in source.tables() {
        let target = copy.require_table_mut(name)?;
        for (key, row) in table.iter() {
            target.insert(key.clone(), row.iter().map(|(field, value)| (field, value.clone())))?;
        }
    }

    debug!(
        tables = source.schema().len(),
        rows = copy.row_count(),
        duration_ms = start.elapsed().as_millis() as u64,
        "data set copied"
    );
    Ok(copy)
}
