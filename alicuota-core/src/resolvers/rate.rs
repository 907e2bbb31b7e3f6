//! Most-specific-first lookup of the records governing a full selection.
//!
//! The base set is every record of the requested province and year. The
//! rules in [`CASCADE`] are tried in order against it; the first one that
//! matches at least one record decides the outcome.

use tracing::{debug, warn};

use super::ResolveError;
use super::common::parse_year;
use super::format::format_outcome;
use crate::Dataset;
use crate::models::{Field, FilterSelection, RateOutcome, RateRecord};

pub const NO_MATCH_MESSAGE: &str = "Could not resolve a specific rate.";

/// The parts of a selection the cascade looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RateQuery<'f> {
    province: &'f str,
    year: i32,
    activity: Option<&'f str>,
    sub_activity: Option<&'f str>,
    sub_sub_activity: Option<&'f str>,
}

impl<'f> RateQuery<'f> {
    fn from_filters(filters: &'f FilterSelection) -> Result<Self, ResolveError> {
        let province = filters
            .get(Field::Province)
            .ok_or(ResolveError::MissingFilter(Field::Province))?;
        let raw_year = filters
            .get(Field::Year)
            .ok_or(ResolveError::MissingFilter(Field::Year))?;
        let year = parse_year(raw_year).ok_or_else(|| ResolveError::InvalidYear(raw_year.to_string()))?;

        Ok(Self {
            province,
            year,
            activity: filters.get(Field::Activity),
            sub_activity: filters.get(Field::SubActivity),
            sub_sub_activity: filters.get(Field::SubSubActivity),
        })
    }
}

type MatchFn = for<'q, 'r> fn(&RateQuery<'q>, &[&'r RateRecord]) -> Vec<&'r RateRecord>;

struct MatchRule {
    name: &'static str,
    apply: MatchFn,
}

const CASCADE: [MatchRule; 5] = [
    MatchRule {
        name: "sub_activity_without_activity",
        apply: sub_activity_without_activity,
    },
    MatchRule {
        name: "full_hierarchy",
        apply: full_hierarchy,
    },
    MatchRule {
        name: "activity_and_sub_activity",
        apply: activity_and_sub_activity,
    },
    MatchRule {
        name: "activity",
        apply: activity_only,
    },
    MatchRule {
        name: "uniform_rate",
        apply: uniform_rate,
    },
];

fn select<'r>(
    base: &[&'r RateRecord],
    keep: impl Fn(&RateRecord) -> bool,
) -> Vec<&'r RateRecord> {
    base.iter().copied().filter(|record| keep(record)).collect()
}

/// Jurisdictions without an activity level put the top category in either
/// column, so the sub-activity is looked up in both.
fn sub_activity_without_activity<'r>(
    query: &RateQuery<'_>,
    base: &[&'r RateRecord],
) -> Vec<&'r RateRecord> {
    match (query.activity, query.sub_activity) {
        (None, Some(sub)) => select(base, |r| {
            r.sub_activity.as_deref() == Some(sub) || r.activity.as_deref() == Some(sub)
        }),
        _ => Vec::new(),
    }
}

fn full_hierarchy<'r>(
    query: &RateQuery<'_>,
    base: &[&'r RateRecord],
) -> Vec<&'r RateRecord> {
    match (query.activity, query.sub_activity, query.sub_sub_activity) {
        (Some(activity), Some(sub), Some(sub_sub)) => select(base, |r| {
            r.activity.as_deref() == Some(activity)
                && r.sub_activity.as_deref() == Some(sub)
                && r.sub_sub_activity.as_deref() == Some(sub_sub)
        }),
        _ => Vec::new(),
    }
}

fn activity_and_sub_activity<'r>(
    query: &RateQuery<'_>,
    base: &[&'r RateRecord],
) -> Vec<&'r RateRecord> {
    match (query.activity, query.sub_activity) {
        (Some(activity), Some(sub)) => select(base, |r| {
            r.activity.as_deref() == Some(activity) && r.sub_activity.as_deref() == Some(sub)
        }),
        _ => Vec::new(),
    }
}

fn activity_only<'r>(
    query: &RateQuery<'_>,
    base: &[&'r RateRecord],
) -> Vec<&'r RateRecord> {
    match query.activity {
        Some(activity) => select(base, |r| r.activity.as_deref() == Some(activity)),
        None => Vec::new(),
    }
}

/// A jurisdiction charging one rate regardless of activity.
///
/// The outcome is built from the first record alone: the shared rate is the
/// answer, not a bracket list over unrelated activities.
fn uniform_rate<'r>(
    _query: &RateQuery<'_>,
    base: &[&'r RateRecord],
) -> Vec<&'r RateRecord> {
    match base.first() {
        Some(first) if base.iter().all(|r| r.rate == first.rate) => vec![*first],
        _ => Vec::new(),
    }
}

/// Resolves a full filter selection to a [`RateOutcome`].
#[derive(Debug, Clone, Copy)]
pub struct RateResolver<'a> {
    dataset: &'a Dataset,
}

impl<'a> RateResolver<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Never fails: malformed selections and misses are error outcomes.
    pub fn resolve(
        &self,
        filters: &FilterSelection,
    ) -> RateOutcome {
        match self.try_resolve(filters) {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(%error, "rate request rejected");
                RateOutcome::error(error.to_string())
            }
        }
    }

    pub fn try_resolve(
        &self,
        filters: &FilterSelection,
    ) -> Result<RateOutcome, ResolveError> {
        let query = RateQuery::from_filters(filters)?;
        debug!(?query, "resolving rate");

        let base: Vec<&RateRecord> = self
            .dataset
            .records()
            .iter()
            .filter(|r| r.province.as_deref() == Some(query.province) && r.year == query.year)
            .collect();

        for rule in &CASCADE {
            let matched = (rule.apply)(&query, &base);
            if !matched.is_empty() {
                debug!(rule = rule.name, rows = matched.len(), "rate rule matched");
                return Ok(format_outcome(&matched));
            }
        }

        debug!(base_rows = base.len(), "no rate rule matched");
        Ok(RateOutcome::error(NO_MATCH_MESSAGE))
    }
}
