mod field;
mod filters;
mod outcome;
mod rate_record;

pub use field::{Field, FieldKind, OptionPolicy};
pub use filters::{FilterSelection, FilterValue};
pub use outcome::{Bracket, BracketSchedule, FixedFee, RateOutcome, SingleRate};
pub use rate_record::RateRecord;
