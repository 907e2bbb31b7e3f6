use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Field;
use crate::resolvers::common::decimal_text;

/// One row of the tax-rate dataset.
///
/// Every column except `year` may be missing. Several rows sharing the same
/// (province, year, activity, sub_activity, sub_sub_activity) key are the
/// ordered taxable-base brackets of one schedule; a lone row is a flat rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRecord {
    pub province: Option<String>,
    /// Zero when the source value could not be read as an integer.
    pub year: i32,
    pub activity: Option<String>,
    pub sub_activity: Option<String>,
    pub sub_sub_activity: Option<String>,
    /// Fraction between 0 and 1.
    pub rate: Option<Decimal>,
    pub fixed_amount: Option<Decimal>,
    pub module_count: Option<Decimal>,
    pub module_value: Option<Decimal>,
    pub threshold_from: Option<Decimal>,
    pub threshold_to: Option<Decimal>,
    pub amount_min: Option<Decimal>,
    pub amount_max: Option<Decimal>,
}

impl RateRecord {
    /// Borrowed value of a text column. `None` for non-text columns too.
    pub fn text(
        &self,
        field: Field,
    ) -> Option<&str> {
        match field {
            Field::Province => self.province.as_deref(),
            Field::Activity => self.activity.as_deref(),
            Field::SubActivity => self.sub_activity.as_deref(),
            Field::SubSubActivity => self.sub_sub_activity.as_deref(),
            _ => None,
        }
    }

    /// Value of a decimal column. `None` for non-decimal columns too.
    pub fn decimal(
        &self,
        field: Field,
    ) -> Option<Decimal> {
        match field {
            Field::Rate => self.rate,
            Field::FixedAmount => self.fixed_amount,
            Field::ModuleCount => self.module_count,
            Field::ModuleValue => self.module_value,
            Field::ThresholdFrom => self.threshold_from,
            Field::ThresholdTo => self.threshold_to,
            Field::AmountMin => self.amount_min,
            Field::AmountMax => self.amount_max,
            _ => None,
        }
    }

    /// Any column rendered as the text callers filter and choose by.
    pub fn display_value(
        &self,
        field: Field,
    ) -> Option<String> {
        match field {
            Field::Year => Some(self.year.to_string()),
            Field::Province | Field::Activity | Field::SubActivity | Field::SubSubActivity => {
                self.text(field).map(str::to_string)
            }
            _ => self.decimal(field).map(decimal_text),
        }
    }
}
