use serde::{Deserialize, Serialize};

/// A column of the tax-rate dataset.
///
/// Every column has a canonical lowercase name and also accepts the Spanish
/// name used by the statistical export the dataset comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Province,
    Year,
    Activity,
    SubActivity,
    SubSubActivity,
    Rate,
    FixedAmount,
    ModuleCount,
    ModuleValue,
    ThresholdFrom,
    ThresholdTo,
    AmountMin,
    AmountMax,
}

/// How the option resolver treats a field whose narrowed values are all missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionPolicy {
    /// No clean values means no options: the caller must stop or skip.
    BlockWhenEmpty,
    /// Missing values are offered as a synthetic "general case" option.
    OfferGeneralCase,
}

/// Storage class of a column's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Year,
    Decimal,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Self::Province,
        Self::Year,
        Self::Activity,
        Self::SubActivity,
        Self::SubSubActivity,
        Self::Rate,
        Self::FixedAmount,
        Self::ModuleCount,
        Self::ModuleValue,
        Self::ThresholdFrom,
        Self::ThresholdTo,
        Self::AmountMin,
        Self::AmountMax,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Province => "province",
            Self::Year => "year",
            Self::Activity => "activity",
            Self::SubActivity => "sub_activity",
            Self::SubSubActivity => "sub_sub_activity",
            Self::Rate => "rate",
            Self::FixedAmount => "fixed_amount",
            Self::ModuleCount => "module_count",
            Self::ModuleValue => "module_value",
            Self::ThresholdFrom => "threshold_from",
            Self::ThresholdTo => "threshold_to",
            Self::AmountMin => "amount_min",
            Self::AmountMax => "amount_max",
        }
    }

    /// Column name in the source export, where it differs from [`Field::as_str`].
    pub fn source_alias(&self) -> Option<&'static str> {
        match self {
            Self::Province => Some("provincia"),
            Self::Year => None,
            Self::Activity => Some("actividad"),
            Self::SubActivity => Some("subactividad"),
            Self::SubSubActivity => Some("subsubactividad"),
            Self::Rate => Some("alicuota"),
            Self::FixedAmount => Some("monto_fijo"),
            Self::ModuleCount => Some("montomodulo"),
            Self::ModuleValue => Some("valormodulo"),
            Self::ThresholdFrom => Some("umbral_desde"),
            Self::ThresholdTo => Some("umbral_hasta"),
            Self::AmountMin => Some("monto_min"),
            Self::AmountMax => Some("monto_max"),
        }
    }

    /// Case-insensitive lookup by canonical name or source alias.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == name || field.source_alias() == Some(name.as_str()))
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Province | Self::Activity | Self::SubActivity | Self::SubSubActivity => {
                FieldKind::Text
            }
            Self::Year => FieldKind::Year,
            _ => FieldKind::Decimal,
        }
    }

    pub fn option_policy(&self) -> OptionPolicy {
        match self {
            Self::SubActivity => OptionPolicy::OfferGeneralCase,
            _ => OptionPolicy::BlockWhenEmpty,
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
