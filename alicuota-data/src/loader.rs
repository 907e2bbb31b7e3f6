//! CSV loader for the tax-rate dataset.
//!
//! ## CSV Format
//!
//! The file must have a header row. Column order does **not** matter and
//! header names are matched case-insensitively, either by canonical name or
//! by the Spanish name used in the statistical export:
//!
//! | Column             | Source alias       | Required | Type    |
//! |--------------------|--------------------|----------|---------|
//! | `province`         | `provincia`        | yes      | text    |
//! | `year`             | `year`             | yes      | integer |
//! | `activity`         | `actividad`        | no       | text    |
//! | `sub_activity`     | `subactividad`     | no       | text    |
//! | `sub_sub_activity` | `subsubactividad`  | no       | text    |
//! | `rate`             | `alicuota`         | no       | decimal |
//! | `fixed_amount`     | `monto_fijo`       | no       | decimal |
//! | `module_count`     | `montomodulo`      | no       | decimal |
//! | `module_value`     | `valormodulo`      | no       | decimal |
//! | `threshold_from`   | `umbral_desde`     | no       | decimal |
//! | `threshold_to`     | `umbral_hasta`     | no       | decimal |
//! | `amount_min`       | `monto_min`        | no       | decimal |
//! | `amount_max`       | `monto_max`        | no       | decimal |
//!
//! Other columns are ignored. In every cell, non-breaking spaces become
//! spaces, padding is trimmed, and an empty cell or the `.` placeholder is a
//! missing value. Decimal cells also read `nan` as missing. A year that is
//! not an integer is truncated if it is a number and read as `0` otherwise.
//!
//! ### Example
//!
//! ```csv
//! provincia,year,actividad,subactividad,subsubactividad,alicuota,monto_fijo
//! CABA,2024,.,Comercio,.,0.01,.
//! Salta,2024.0,Contratos,Locación,Urbana,0.012,
//! ```

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use alicuota_core::resolvers::common::clean_text;
use alicuota_core::{Dataset, Field, RateRecord};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors that can occur while loading the dataset.
#[derive(Debug, Error)]
pub enum DatasetLoadError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The underlying CSV reader failed (bad quoting, ragged rows, etc.).
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column '{0}' not found")]
    MissingColumn(Field),

    /// Two headers resolve to the same field, e.g. `province` and `provincia`.
    #[error("columns '{first}' and '{second}' both map to '{field}'")]
    DuplicateColumn {
        field: Field,
        first: String,
        second: String,
    },

    /// `row` is 1-based and does not count the header.
    #[error("invalid number '{value}' in column '{field}' on row {row}")]
    InvalidNumber {
        field: Field,
        row: usize,
        value: String,
    },
}

const REQUIRED_COLUMNS: [Field; 2] = [Field::Province, Field::Year];

// ---------------------------------------------------------------------------
// Header mapping
// ---------------------------------------------------------------------------

/// Position of each known field in the CSV rows.
#[derive(Debug)]
struct ColumnMap {
    positions: HashMap<Field, usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, DatasetLoadError> {
        let mut positions = HashMap::new();

        for (index, header) in headers.iter().enumerate() {
            let Some(field) = Field::parse(header) else {
                debug!(column = header, "ignoring unknown column");
                continue;
            };

            if let Some(previous) = positions.insert(field, index) {
                return Err(DatasetLoadError::DuplicateColumn {
                    field,
                    first: headers.get(previous).unwrap_or_default().to_string(),
                    second: header.to_string(),
                });
            }
        }

        if let Some(missing) = REQUIRED_COLUMNS.into_iter().find(|f| !positions.contains_key(f)) {
            return Err(DatasetLoadError::MissingColumn(missing));
        }

        if !positions.contains_key(&Field::Rate) {
            warn!("column 'rate' not found; every record will lack a percentage rate");
        }

        Ok(Self { positions })
    }

    fn cell<'r>(
        &self,
        record: &'r csv::StringRecord,
        field: Field,
    ) -> Option<&'r str> {
        self.positions.get(&field).and_then(|&index| record.get(index))
    }
}

// ---------------------------------------------------------------------------
// Cell conversion
// ---------------------------------------------------------------------------

fn text_cell(raw: Option<&str>) -> Option<String> {
    raw.and_then(clean_text)
}

fn decimal_cell(
    raw: Option<&str>,
    field: Field,
    row: usize,
) -> Result<Option<Decimal>, DatasetLoadError> {
    let Some(value) = text_cell(raw) else {
        return Ok(None);
    };
    if value.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }

    Decimal::from_str(&value)
        .or_else(|_| Decimal::from_scientific(&value))
        .map(Some)
        .map_err(|_| DatasetLoadError::InvalidNumber { field, row, value })
}

/// Integer, else a number truncated toward zero, else 0.
fn year_cell(raw: Option<&str>) -> i32 {
    text_cell(raw)
        .and_then(|value| {
            value
                .parse::<i32>()
                .ok()
                .or_else(|| Decimal::from_str(&value).ok().and_then(|d| d.trunc().to_i32()))
        })
        .unwrap_or(0)
}

/// Convert a single CSV row into a [`RateRecord`].
///
/// `row_number` is 1-based (for error messages).
fn convert_row(
    columns: &ColumnMap,
    record: &csv::StringRecord,
    row_number: usize,
) -> Result<RateRecord, DatasetLoadError> {
    let text = |field: Field| text_cell(columns.cell(record, field));
    let decimal = |field: Field| decimal_cell(columns.cell(record, field), field, row_number);

    Ok(RateRecord {
        province: text(Field::Province),
        year: year_cell(columns.cell(record, Field::Year)),
        activity: text(Field::Activity),
        sub_activity: text(Field::SubActivity),
        sub_sub_activity: text(Field::SubSubActivity),
        rate: decimal(Field::Rate)?,
        fixed_amount: decimal(Field::FixedAmount)?,
        module_count: decimal(Field::ModuleCount)?,
        module_value: decimal(Field::ModuleValue)?,
        threshold_from: decimal(Field::ThresholdFrom)?,
        threshold_to: decimal(Field::ThresholdTo)?,
        amount_min: decimal(Field::AmountMin)?,
        amount_max: decimal(Field::AmountMax)?,
    })
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

/// Reads the tax-rate dataset from CSV.
pub struct DatasetLoader;

impl DatasetLoader {
    /// Parse a dataset from any reader. Records keep file order.
    ///
    /// # Errors
    ///
    /// * [`DatasetLoadError::Csv`] if the CSV is structurally invalid.
    /// * [`DatasetLoadError::MissingColumn`] / [`DatasetLoadError::DuplicateColumn`]
    ///   if the header cannot be mapped.
    /// * [`DatasetLoadError::InvalidNumber`] if a decimal cell is not a number.
    pub fn parse<R: Read>(reader: R) -> Result<Dataset, DatasetLoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let columns = ColumnMap::from_headers(csv_reader.headers()?)?;

        let mut records = Vec::new();
        for (idx, result) in csv_reader.records().enumerate() {
            let record = result?;
            records.push(convert_row(&columns, &record, idx + 1)?);
        }

        Ok(Dataset::new(records))
    }

    /// Read a file from disk and delegate to [`DatasetLoader::parse`].
    pub fn load_from_file(path: &Path) -> Result<Dataset, DatasetLoadError> {
        let file = std::fs::File::open(path).map_err(|source| DatasetLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let dataset = Self::parse(file)?;
        info!(path = %path.display(), rows = dataset.len(), "dataset loaded");
        Ok(dataset)
    }

    /// Like [`DatasetLoader::load_from_file`], but a failure is logged and an
    /// empty dataset returned so the process stays reachable for diagnostics.
    pub fn load_or_empty(path: &Path) -> Dataset {
        match Self::load_from_file(path) {
            Ok(dataset) => dataset,
            Err(error) => {
                error!(path = %path.display(), %error, "dataset not loaded; serving an empty dataset");
                Dataset::empty()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const CANONICAL_CSV: &str = "\
province,year,activity,sub_activity,sub_sub_activity,rate,fixed_amount,module_count,module_value,threshold_from,threshold_to,amount_min,amount_max
Salta,2024,Contratos,Locación,Urbana,0.012,,,,,,,
Salta,2024,Seguros,.,.,.,500,,,,,,
";

    const SOURCE_CSV: &str = "\
PROVINCIA,Year,Actividad,SubActividad,SubSubActividad,Alicuota,Monto_Fijo,MontoModulo,ValorModulo,Umbral_Desde,Umbral_Hasta,Monto_Min,Monto_Max,Observaciones
\u{a0}CABA ,2024.0,.,Comercio\u{a0},.,0.01,.,.,.,.,.,.,.,texto libre
Córdoba,2023,Bancos,Préstamos,.,0.005,.,.,.,0,100000,.,.,
Córdoba,2023,Bancos,Préstamos,.,0.01,.,10,35.5,100000,.,150,nan,
";

    #[test]
    fn parse_canonical_headers() {
        let dataset = DatasetLoader::parse(CANONICAL_CSV.as_bytes()).expect("should parse");

        assert_eq!(dataset.len(), 2);
        assert_eq!(
            dataset.records()[0],
            RateRecord {
                province: Some("Salta".to_string()),
                year: 2024,
                activity: Some("Contratos".to_string()),
                sub_activity: Some("Locación".to_string()),
                sub_sub_activity: Some("Urbana".to_string()),
                rate: Some(dec!(0.012)),
                ..Default::default()
            }
        );
    }

    #[test]
    fn placeholders_become_missing() {
        let dataset = DatasetLoader::parse(CANONICAL_CSV.as_bytes()).expect("should parse");
        let seguros = &dataset.records()[1];

        assert_eq!(seguros.sub_activity, None);
        assert_eq!(seguros.sub_sub_activity, None);
        assert_eq!(seguros.rate, None);
        assert_eq!(seguros.fixed_amount, Some(dec!(500)));
    }

    #[test]
    fn parse_source_headers_and_clean_cells() {
        let dataset = DatasetLoader::parse(SOURCE_CSV.as_bytes()).expect("should parse");
        let caba = &dataset.records()[0];

        assert_eq!(caba.province.as_deref(), Some("CABA"));
        assert_eq!(caba.year, 2024);
        assert_eq!(caba.activity, None);
        assert_eq!(caba.sub_activity.as_deref(), Some("Comercio"));
        assert_eq!(caba.rate, Some(dec!(0.01)));
        assert_eq!(caba.fixed_amount, None);
    }

    #[test]
    fn parse_bracket_columns() {
        let dataset = DatasetLoader::parse(SOURCE_CSV.as_bytes()).expect("should parse");
        let upper = &dataset.records()[2];

        assert_eq!(upper.threshold_from, Some(dec!(100000)));
        assert_eq!(upper.threshold_to, None);
        assert_eq!(upper.module_count, Some(dec!(10)));
        assert_eq!(upper.module_value, Some(dec!(35.5)));
        assert_eq!(upper.amount_min, Some(dec!(150)));
        assert_eq!(upper.amount_max, None);
    }

    #[test]
    fn year_coercion_falls_back_to_zero() {
        assert_eq!(year_cell(Some("2024")), 2024);
        assert_eq!(year_cell(Some("2024.0")), 2024);
        assert_eq!(year_cell(Some("2024.7")), 2024);
        assert_eq!(year_cell(Some("s/d")), 0);
        assert_eq!(year_cell(Some(".")), 0);
        assert_eq!(year_cell(None), 0);
    }

    #[test]
    fn scientific_notation_is_accepted() {
        let value = decimal_cell(Some("1.5e-2"), Field::Rate, 1).expect("should parse");

        assert_eq!(value, Some(dec!(0.015)));
    }

    #[test]
    fn invalid_decimal_reports_row_and_column() {
        let csv = "province,year,rate\nSalta,2024,0.01\nSalta,2024,uno por ciento\n";

        let err = DatasetLoader::parse(csv.as_bytes()).expect_err("should reject bad number");

        match err {
            DatasetLoadError::InvalidNumber { field, row, value } => {
                assert_eq!(field, Field::Rate);
                assert_eq!(row, 2);
                assert_eq!(value, "uno por ciento");
            }
            other => panic!("expected InvalidNumber, got {other:?}"),
        }
    }

    #[test]
    fn missing_required_column_is_rejected() {
        let csv = "provincia,actividad\nSalta,Seguros\n";

        let err = DatasetLoader::parse(csv.as_bytes()).expect_err("year is required");

        assert!(matches!(err, DatasetLoadError::MissingColumn(Field::Year)));
    }

    #[test]
    fn duplicate_mapping_is_rejected() {
        let csv = "province,provincia,year\nSalta,Salta,2024\n";

        let err = DatasetLoader::parse(csv.as_bytes()).expect_err("duplicate province");

        match err {
            DatasetLoadError::DuplicateColumn { field, first, second } => {
                assert_eq!(field, Field::Province);
                assert_eq!(first, "province");
                assert_eq!(second, "provincia");
            }
            other => panic!("expected DuplicateColumn, got {other:?}"),
        }
    }

    #[test]
    fn missing_optional_columns_read_as_missing() {
        let csv = "province,year\nSalta,2024\n";

        let dataset = DatasetLoader::parse(csv.as_bytes()).expect("should parse");

        assert_eq!(dataset.records()[0].rate, None);
        assert_eq!(dataset.records()[0].activity, None);
    }

    #[test]
    fn ragged_rows_are_a_csv_error() {
        let csv = "province,year\nSalta,2024,extra\n";

        let err = DatasetLoader::parse(csv.as_bytes()).expect_err("ragged row");

        assert!(matches!(err, DatasetLoadError::Csv(_)));
    }

    #[test]
    fn header_only_is_empty_dataset() {
        let dataset = DatasetLoader::parse("province,year\n".as_bytes()).expect("valid");

        assert!(dataset.is_empty());
    }
}
