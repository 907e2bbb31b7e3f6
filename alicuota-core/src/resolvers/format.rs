//! Formatting of matched records into a [`RateOutcome`].

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{Bracket, BracketSchedule, FixedFee, RateOutcome, RateRecord, SingleRate};
use crate::resolvers::ResolveError;
use crate::resolvers::common::{decimal_text, round_half_up};

pub const VARIES_MESSAGE: &str = "The rate depends on the taxable base.";

/// Where a record's fixed charge comes from.
///
/// An explicit non-zero amount wins; otherwise a module count and a module
/// value, when both are present, multiply into the charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedCharge {
    Explicit(Decimal),
    Modules { count: Decimal, value: Decimal },
}

impl FixedCharge {
    pub fn of(record: &RateRecord) -> Option<Self> {
        match record.fixed_amount {
            Some(amount) if !amount.is_zero() => Some(Self::Explicit(amount)),
            _ => match (record.module_count, record.module_value) {
                (Some(count), Some(value)) => Some(Self::Modules { count, value }),
                _ => None,
            },
        }
    }

    /// Fails when the module product does not fit in a [`Decimal`].
    pub fn amount(&self) -> Result<Decimal, ResolveError> {
        match *self {
            Self::Explicit(amount) => Ok(amount),
            Self::Modules { count, value } => count
                .checked_mul(value)
                .ok_or(ResolveError::ChargeOutOfRange { count, value }),
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Self::Explicit(amount) => format!("Fixed amount: ${}", decimal_text(*amount)),
            Self::Modules { count, value } => {
                format!("{} mod. x ${}", decimal_text(*count), decimal_text(*value))
            }
        }
    }
}

/// Builds the outcome for the records a resolution step matched.
///
/// Several records form a bracket schedule, kept in the order given. A single
/// record is a percentage rate, or a fixed fee when its rate is missing or zero.
/// Amounts that overflow become an error outcome.
pub fn format_outcome(rows: &[&RateRecord]) -> RateOutcome {
    let formatted = match rows {
        [] => return RateOutcome::error("no records to format"),
        [row] => single_row(row),
        _ => rows
            .iter()
            .map(|row| bracket(row))
            .collect::<Result<Vec<_>, _>>()
            .map(|brackets| {
                RateOutcome::Varies(BracketSchedule {
                    message: VARIES_MESSAGE.to_string(),
                    brackets,
                })
            }),
    };

    formatted.unwrap_or_else(|error| {
        warn!(%error, "matched records could not be formatted");
        RateOutcome::error(error.to_string())
    })
}

fn single_row(row: &RateRecord) -> Result<RateOutcome, ResolveError> {
    let charge = FixedCharge::of(row).map(|c| c.amount()).transpose()?;

    let outcome = match row.rate {
        Some(rate) if !rate.is_zero() => RateOutcome::Rate(SingleRate {
            rate_fraction: rate,
            amount_min: row.amount_min.unwrap_or_default(),
            amount_max: row.amount_max,
            additional_fixed_charge: charge,
        }),
        _ => {
            let amount = charge.unwrap_or_default();
            RateOutcome::Fixed(FixedFee {
                fixed_amount: amount,
                description: format!("Fixed amount determined: ${}", decimal_text(amount)),
            })
        }
    };
    Ok(outcome)
}

fn bracket(row: &RateRecord) -> Result<Bracket, ResolveError> {
    let rate = row.rate.unwrap_or_default();
    let charge = FixedCharge::of(row);
    let percent = rate
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(ResolveError::RateOutOfRange(rate))?;

    Ok(Bracket {
        threshold_from: row.threshold_from,
        threshold_to: row.threshold_to,
        rate_percent: round_half_up(percent),
        rate_fraction: rate,
        fixed_charge: charge.map(|c| c.amount()).transpose()?.unwrap_or_default(),
        fixed_detail: charge.map(|c| c.detail()).unwrap_or_default(),
        amount_min: row.amount_min.unwrap_or_default(),
        amount_max: row.amount_max,
    })
}
