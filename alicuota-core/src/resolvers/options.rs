//! Progressive narrowing of the choices offered for the next filter.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::ResolveError;
use super::common::{compare_options, parse_year, strip_float_suffix};
use crate::Dataset;
use crate::models::{Field, FieldKind, FilterSelection, OptionPolicy, RateRecord};

/// Synthetic choice standing for rows that leave the field empty.
pub const GENERAL_CASE_OPTION: &str = "N/A - Caso General";

/// A single prior choice, resolved against the schema.
#[derive(Debug, Clone)]
enum Condition<'f> {
    Year(i32),
    Text(Field, &'f str),
    /// `None` when the filter text is not a number: nothing matches it.
    Decimal(Field, Option<Decimal>),
}

impl Condition<'_> {
    fn matches(
        &self,
        record: &RateRecord,
    ) -> bool {
        match self {
            Self::Year(year) => record.year == *year,
            Self::Text(field, value) => record.text(*field) == Some(*value),
            Self::Decimal(field, value) => value.is_some() && record.decimal(*field) == *value,
        }
    }
}

/// Computes the values still valid for a field given the choices made so far.
#[derive(Debug, Clone, Copy)]
pub struct OptionResolver<'a> {
    dataset: &'a Dataset,
}

impl<'a> OptionResolver<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Sorted, deduplicated options for `field_name`.
    ///
    /// An empty list tells the caller that no combination exists past this
    /// point. Malformed requests (unknown field or filter column) also come
    /// back empty; the reason is logged.
    pub fn resolve(
        &self,
        field_name: &str,
        filters: &FilterSelection,
    ) -> Vec<String> {
        debug!(field = field_name, ?filters, "resolving filter options");

        match self.try_resolve(field_name, filters) {
            Ok(options) => {
                debug!(field = field_name, count = options.len(), "options resolved");
                options
            }
            Err(error) => {
                warn!(field = field_name, %error, "option request degraded to an empty list");
                Vec::new()
            }
        }
    }

    /// Same as [`OptionResolver::resolve`] but reports malformed requests.
    pub fn try_resolve(
        &self,
        field_name: &str,
        filters: &FilterSelection,
    ) -> Result<Vec<String>, ResolveError> {
        let rows = self.narrow(filters)?;
        if rows.is_empty() {
            debug!(field = field_name, "no rows left after filtering");
            return Ok(Vec::new());
        }

        let field = Field::parse(field_name)
            .ok_or_else(|| ResolveError::UnknownField(field_name.to_string()))?;

        let mut options: Vec<String> = rows.iter().filter_map(|r| r.display_value(field)).collect();

        match field.option_policy() {
            OptionPolicy::BlockWhenEmpty => {}
            OptionPolicy::OfferGeneralCase => {
                // Also covers the all-missing case: rows is non-empty here.
                if rows.iter().any(|r| r.display_value(field).is_none()) {
                    options.push(GENERAL_CASE_OPTION.to_string());
                }
            }
        }

        Ok(sort_options(options))
    }

    /// Rows satisfying every prior choice.
    fn narrow(
        &self,
        filters: &FilterSelection,
    ) -> Result<Vec<&'a RateRecord>, ResolveError> {
        let mut conditions = Vec::with_capacity(filters.len());

        for (name, value) in filters.iter() {
            let field =
                Field::parse(name).ok_or_else(|| ResolveError::UnknownField(name.to_string()))?;

            match field.kind() {
                FieldKind::Year => match parse_year(value) {
                    Some(year) => conditions.push(Condition::Year(year)),
                    None => debug!(value, "ignoring non-integer year filter"),
                },
                FieldKind::Text => conditions.push(Condition::Text(field, value)),
                FieldKind::Decimal => {
                    conditions.push(Condition::Decimal(field, Decimal::from_str(value).ok()))
                }
            }
        }

        Ok(self
            .dataset
            .records()
            .iter()
            .filter(|record| conditions.iter().all(|c| c.matches(record)))
            .collect())
    }
}

/// Strips float suffixes, orders with [`compare_options`] and drops duplicates.
fn sort_options(options: Vec<String>) -> Vec<String> {
    let mut options: Vec<String> = options
        .iter()
        .map(|o| strip_float_suffix(o).to_string())
        .collect();
    options.sort_by(|a, b| compare_options(a, b));
    options.dedup();
    options
}
