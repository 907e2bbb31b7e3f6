//! The immutable, in-memory tax-rate dataset.
//!
//! A [`Dataset`] is built once (normally by the ingestion crate) and then
//! shared read-only, usually behind an `Arc`, by every resolver. Nothing
//! mutates it after construction, so concurrent readers need no locking.

use std::collections::HashMap;
use std::fmt;

use crate::models::{Field, RateRecord};
use crate::resolvers::common::compare_options;

/// Columns reported by [`Dataset::summary`].
pub const AUDITED_FIELDS: [Field; 5] = [
    Field::Year,
    Field::Province,
    Field::Activity,
    Field::SubActivity,
    Field::SubSubActivity,
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<RateRecord>,
}

impl Dataset {
    pub fn new(records: Vec<RateRecord>) -> Self {
        Self { records }
    }

    /// The dataset a degraded process serves when the source could not be loaded.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[RateRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Value counts for the hierarchy columns, missing values excluded.
    pub fn summary(&self) -> DatasetSummary {
        let columns = AUDITED_FIELDS
            .into_iter()
            .map(|field| {
                let mut counts: HashMap<String, usize> = HashMap::new();
                for value in self.records.iter().filter_map(|r| r.display_value(field)) {
                    *counts.entry(value).or_default() += 1;
                }

                let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
                counts.sort_by(|(a, _), (b, _)| compare_options(a, b));
                ColumnSummary { field, counts }
            })
            .collect();

        DatasetSummary {
            total_rows: self.records.len(),
            columns,
        }
    }
}

impl FromIterator<RateRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = RateRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSummary {
    pub field: Field,
    /// `(value, rows)` pairs in option order.
    pub counts: Vec<(String, usize)>,
}

/// Audit report printed at startup and by the command line tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSummary {
    pub total_rows: usize,
    pub columns: Vec<ColumnSummary>,
}

impl DatasetSummary {
    pub fn column(
        &self,
        field: Field,
    ) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.field == field)
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Dataset summary")?;
        for column in &self.columns {
            writeln!(f, "\n{} ({} distinct values)", column.field, column.counts.len())?;
            for (value, rows) in &column.counts {
                writeln!(f, "  {value:<40} {rows:>6}")?;
            }
        }
        write!(f, "\nTotal rows loaded: {}", self.total_rows)
    }
}
