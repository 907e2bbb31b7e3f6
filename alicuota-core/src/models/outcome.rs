use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The answer to "which rate applies to this selection?".
///
/// Serialized as a JSON object tagged by `status`: `ok`, `fixed`, `varies`
/// or `error`. Missing amounts are `null`, never a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RateOutcome {
    /// A single percentage rate applies.
    #[serde(rename = "ok")]
    Rate(SingleRate),
    /// Only a fixed fee applies.
    Fixed(FixedFee),
    /// The rate depends on the taxable base.
    Varies(BracketSchedule),
    Error { message: String },
}

impl RateOutcome {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Self::Rate(_) => "ok",
            Self::Fixed(_) => "fixed",
            Self::Varies(_) => "varies",
            Self::Error { .. } => "error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleRate {
    #[serde(with = "rust_decimal::serde::float")]
    pub rate_fraction: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_min: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub amount_max: Option<Decimal>,
    /// Fixed charge levied on top of the rate, omitted when there is none.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub additional_fixed_charge: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedFee {
    #[serde(with = "rust_decimal::serde::float")]
    pub fixed_amount: Decimal,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSchedule {
    pub message: String,
    /// In dataset order.
    pub brackets: Vec<Bracket>,
}

/// One taxable-base bracket ("tramo") of a [`BracketSchedule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    #[serde(with = "rust_decimal::serde::float_option")]
    pub threshold_from: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub threshold_to: Option<Decimal>,
    /// Rate as a percentage rounded to two places; zero when missing.
    #[serde(with = "rust_decimal::serde::float")]
    pub rate_percent: Decimal,
    /// Rate as a fraction; zero when missing.
    #[serde(with = "rust_decimal::serde::float")]
    pub rate_fraction: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub fixed_charge: Decimal,
    /// How `fixed_charge` was derived; empty when there is none.
    pub fixed_detail: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_min: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub amount_max: Option<Decimal>,
}
