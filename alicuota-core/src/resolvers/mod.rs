//! Resolution logic over a [`Dataset`](crate::Dataset).
//!
//! - [`options`] narrows the dataset by prior choices and lists the values
//!   still valid for the next field.
//! - [`rate`] walks a most-specific-first cascade of match rules to find the
//!   records that govern a full selection.
//! - [`format`] turns the matched records into a [`RateOutcome`](crate::RateOutcome).

pub mod common;
pub mod format;
pub mod options;
pub mod rate;

pub use format::{FixedCharge, format_outcome};
pub use options::{GENERAL_CASE_OPTION, OptionResolver};
pub use rate::{NO_MATCH_MESSAGE, RateResolver};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::Field;

/// Malformed requests, or data that cannot be turned into an outcome,
/// detected while resolving.
///
/// These never reach callers of the service: option requests degrade to an
/// empty list and rate requests to an error outcome.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("required filter '{0}' is missing")]
    MissingFilter(Field),

    #[error("year '{0}' is not an integer")]
    InvalidYear(String),

    #[error("fixed charge of {count} modules x {value} is out of range")]
    ChargeOutOfRange { count: Decimal, value: Decimal },

    #[error("rate {0} is out of range")]
    RateOutOfRange(Decimal),
}
