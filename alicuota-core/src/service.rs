//! The two operations offered to the calling layer.

use std::sync::Arc;

use tracing::warn;

use crate::Dataset;
use crate::models::{Field, FilterSelection, RateOutcome};
use crate::resolvers::{OptionResolver, RateResolver};

pub const MISSING_REQUIRED_MESSAGE: &str = "Province and year are required.";

/// Read-only facade over a shared [`Dataset`].
///
/// Cloning is cheap and every clone sees the same data, so one service can be
/// handed to any number of concurrent request handlers.
#[derive(Debug, Clone, Default)]
pub struct AlicuotaService {
    dataset: Arc<Dataset>,
}

impl AlicuotaService {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Values still valid for `field_name` given the prior choices.
    /// Empty means the selection cannot go any further.
    pub fn filter_options(
        &self,
        field_name: &str,
        filters: &FilterSelection,
    ) -> Vec<String> {
        OptionResolver::new(&self.dataset).resolve(field_name, filters)
    }

    /// The rate governing a full selection. `province` and `year` are required.
    pub fn rate(
        &self,
        filters: &FilterSelection,
    ) -> RateOutcome {
        if !filters.contains(Field::Province) || !filters.contains(Field::Year) {
            warn!(?filters, "rate requested without province and year");
            return RateOutcome::error(MISSING_REQUIRED_MESSAGE);
        }

        RateResolver::new(&self.dataset).resolve(filters)
    }
}

impl From<Dataset> for AlicuotaService {
    fn from(dataset: Dataset) -> Self {
        Self::new(Arc::new(dataset))
    }
}
