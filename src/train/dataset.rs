//! Historical dataset loading.
//!
//! CSV rows are parsed leniently: a row whose numeric model inputs fail to
//! parse is a data-quality skip, never a run failure. Growth rates are kept
//! as `Option` so the orchestrator can drop unusable rows while counting
//! them.

use crate::record::{VentureRecord, CATEGORICAL_FIELDS, GROWTH_RATE_FIELD, NUMERIC_FIELDS};
use crate::{CrecerError, Result};
use std::path::Path;

/// A loaded historical dataset with its skip count.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<VentureRecord>,
    /// Rows dropped because a numeric model input was missing or
    /// unparseable.
    pub skipped_rows: usize,
}

/// Load venture records from a headered CSV file. Required columns are the
/// numeric and categorical model inputs plus the growth-rate signal; extra
/// columns are ignored.
pub fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| CrecerError::Dataset { path: path.to_path_buf(), message: e.to_string() })?;

    let headers = reader
        .headers()
        .map_err(|e| CrecerError::Dataset { path: path.to_path_buf(), message: e.to_string() })?
        .clone();

    let column = |name: &str| -> Result<usize> {
        headers.iter().position(|h| h == name).ok_or_else(|| CrecerError::Dataset {
            path: path.to_path_buf(),
            message: format!("missing required column '{name}'"),
        })
    };

    let numeric_cols: Vec<usize> =
        NUMERIC_FIELDS.iter().map(|&f| column(f)).collect::<Result<_>>()?;
    let categorical_cols: Vec<usize> =
        CATEGORICAL_FIELDS.iter().map(|&f| column(f)).collect::<Result<_>>()?;
    let growth_col = column(GROWTH_RATE_FIELD)?;

    let mut records = Vec::new();
    let mut skipped_rows = 0usize;

    for row in reader.records() {
        let row =
            row.map_err(|e| CrecerError::Dataset { path: path.to_path_buf(), message: e.to_string() })?;

        let mut numeric = [0.0f64; 4];
        let mut usable = true;
        for (slot, &col) in numeric.iter_mut().zip(&numeric_cols) {
            match row.get(col).and_then(|v| v.parse::<f64>().ok()).filter(|v| v.is_finite()) {
                Some(v) => *slot = v,
                None => {
                    usable = false;
                    break;
                }
            }
        }
        if !usable {
            skipped_rows += 1;
            continue;
        }

        let growth_rate_cent =
            row.get(growth_col).and_then(|v| v.parse::<f64>().ok()).filter(|v| v.is_finite());

        records.push(VentureRecord {
            investment_amount: numeric[0],
            valuation: numeric[1],
            number_of_investors: numeric[2],
            year_founded: numeric[3],
            growth_rate_cent,
            domain: row.get(categorical_cols[0]).unwrap_or_default().to_string(),
            startup_stage: row.get(categorical_cols[1]).unwrap_or_default().to_string(),
            industry_funder_type: row.get(categorical_cols[2]).unwrap_or_default().to_string(),
        });
    }

    Ok(Dataset { records, skipped_rows })
}
