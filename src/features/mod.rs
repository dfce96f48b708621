//! Feature Transformer: raw venture attributes → fixed-length numeric vector.
//!
//! Numeric fields are standardized (mean 0, unit variance), categorical
//! fields are one-hot expanded over the levels observed at fit time, in
//! sorted order. Transform is a pure function of the fitted state: a vector
//! from one fitted transformer is never valid input for another.

use crate::record::{VentureRecord, CATEGORICAL_FIELDS, NUMERIC_FIELDS};
use crate::{CrecerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Fitted standardization parameters for one numeric field.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NumericScaler {
    field: String,
    mean: f64,
    /// Population standard deviation; a constant field scales by 1 so the
    /// standardized value stays 0 instead of dividing by zero.
    scale: f64,
}

/// Fitted one-hot encoding for one categorical field.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CategoryEncoder {
    field: String,
    /// Distinct levels observed at fit time, sorted. One output dimension
    /// per level; a level unseen at fit time maps to an all-zero block.
    levels: Vec<String>,
}

/// Deterministic mapping from a raw record to a feature vector. No hidden
/// state beyond the fitted parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureTransformer {
    numeric: Vec<NumericScaler>,
    categorical: Vec<CategoryEncoder>,
}

impl FeatureTransformer {
    /// Fit standardization and one-hot parameters on historical records.
    pub fn fit(records: &[VentureRecord]) -> Result<Self> {
        if records.is_empty() {
            return Err(CrecerError::EmptyDataset);
        }
        let n = records.len() as f64;

        let numeric = NUMERIC_FIELDS
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let mean = records.iter().map(|r| r.numeric_field(i)).sum::<f64>() / n;
                let variance = records
                    .iter()
                    .map(|r| {
                        let d = r.numeric_field(i) - mean;
                        d * d
                    })
                    .sum::<f64>()
                    / n;
                let std = variance.sqrt();
                NumericScaler {
                    field: (*field).to_string(),
                    mean,
                    scale: if std == 0.0 { 1.0 } else { std },
                }
            })
            .collect();

        let categorical = CATEGORICAL_FIELDS
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let levels: BTreeSet<&str> =
                    records.iter().map(|r| r.categorical_field(i)).collect();
                CategoryEncoder {
                    field: (*field).to_string(),
                    levels: levels.into_iter().map(str::to_owned).collect(),
                }
            })
            .collect();

        Ok(Self { numeric, categorical })
    }

    /// Transform one record. Pure and total: unknown category levels produce
    /// an all-zero block for that field rather than failing.
    pub fn transform(&self, record: &VentureRecord) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.output_len());
        for (i, scaler) in self.numeric.iter().enumerate() {
            out.push((record.numeric_field(i) - scaler.mean) / scaler.scale);
        }
        for (i, encoder) in self.categorical.iter().enumerate() {
            let value = record.categorical_field(i);
            let hit = encoder.levels.binary_search_by(|level| level.as_str().cmp(value)).ok();
            for j in 0..encoder.levels.len() {
                out.push(if hit == Some(j) { 1.0 } else { 0.0 });
            }
        }
        out
    }

    /// Transform a batch into a row-major design matrix.
    pub fn transform_matrix(&self, records: &[VentureRecord]) -> Vec<Vec<f64>> {
        records.iter().map(|r| self.transform(r)).collect()
    }

    /// Output vector length: numeric fields plus one dimension per observed
    /// category level.
    pub fn output_len(&self) -> usize {
        self.numeric.len() + self.categorical.iter().map(|e| e.levels.len()).sum::<usize>()
    }

    /// Resolvable name per output dimension: numeric field names verbatim,
    /// one-hot dimensions as `{field}_{level}`.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.output_len());
        for scaler in &self.numeric {
            names.push(scaler.field.clone());
        }
        for encoder in &self.categorical {
            for level in &encoder.levels {
                names.push(format!("{}_{}", encoder.field, level));
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record(
        amount: f64,
        valuation: f64,
        investors: f64,
        year: f64,
        domain: &str,
        stage: &str,
        funder: &str,
    ) -> VentureRecord {
        VentureRecord {
            investment_amount: amount,
            valuation,
            number_of_investors: investors,
            year_founded: year,
            growth_rate_cent: None,
            domain: domain.into(),
            startup_stage: stage.into(),
            industry_funder_type: funder.into(),
        }
    }

    fn sample_records() -> Vec<VentureRecord> {
        vec![
            record(100.0, 1000.0, 1.0, 2015.0, "Fintech", "Seed", "VC"),
            record(200.0, 2000.0, 2.0, 2017.0, "Health", "Series A", "Angel"),
            record(300.0, 3000.0, 3.0, 2019.0, "Fintech", "Seed", "VC"),
        ]
    }

    #[test]
    fn test_fit_empty_is_an_error() {
        assert!(matches!(FeatureTransformer::fit(&[]), Err(CrecerError::EmptyDataset)));
    }

    #[test]
    fn test_standardization_centers_and_scales() {
        let records = sample_records();
        let t = FeatureTransformer::fit(&records).unwrap();
        let vectors = t.transform_matrix(&records);

        // investment_amount is dimension 0: mean 200, population std ~81.65
        let mean: f64 = vectors.iter().map(|v| v[0]).sum::<f64>() / 3.0;
        let var: f64 = vectors.iter().map(|v| v[0] * v[0]).sum::<f64>() / 3.0;
        assert_relative_eq!(mean, 0.0, epsilon = 1e-12);
        assert_relative_eq!(var, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_field_scales_by_one() {
        let records = vec![
            record(5.0, 1000.0, 2.0, 2020.0, "A", "S", "F"),
            record(5.0, 2000.0, 2.0, 2020.0, "A", "S", "F"),
        ];
        let t = FeatureTransformer::fit(&records).unwrap();
        let v = t.transform(&records[0]);
        // Constant investment_amount standardizes to exactly 0, not NaN.
        assert_eq!(v[0], 0.0);
    }

    #[test]
    fn test_output_layout_numeric_then_one_hot_blocks() {
        let records = sample_records();
        let t = FeatureTransformer::fit(&records).unwrap();
        // 4 numeric + domain{Fintech,Health} + stage{Seed,Series A} + funder{Angel,VC}
        assert_eq!(t.output_len(), 10);
        assert_eq!(
            t.feature_names(),
            vec![
                "investment_amount",
                "valuation",
                "number_of_investors",
                "year_founded",
                "domain_Fintech",
                "domain_Health",
                "startup_stage_Seed",
                "startup_stage_Series A",
                "industry_funder_type_Angel",
                "industry_funder_type_VC",
            ]
        );
    }

    #[test]
    fn test_one_hot_marks_exactly_one_level() {
        let records = sample_records();
        let t = FeatureTransformer::fit(&records).unwrap();
        let v = t.transform(&records[1]);
        // domain block is dims 4..6, sorted levels [Fintech, Health]
        assert_eq!(&v[4..6], &[0.0, 1.0]);
        let block_sum: f64 = v[4..6].iter().sum();
        assert_eq!(block_sum, 1.0);
    }

    #[test]
    fn test_unseen_level_maps_to_zero_block() {
        let records = sample_records();
        let t = FeatureTransformer::fit(&records).unwrap();
        let unseen = record(150.0, 1500.0, 2.0, 2018.0, "Energy", "Seed", "VC");
        let v = t.transform(&unseen);
        assert_eq!(&v[4..6], &[0.0, 0.0]);
        assert_eq!(v.len(), t.output_len());
    }

    #[test]
    fn test_transform_is_idempotent() {
        let records = sample_records();
        let t = FeatureTransformer::fit(&records).unwrap();
        let a = t.transform(&records[0]);
        let b = t.transform(&records[0]);
        // Bit-identical, not merely approximately equal.
        assert_eq!(a, b);
    }

    #[test]
    fn test_names_resolve_every_dimension() {
        let records = sample_records();
        let t = FeatureTransformer::fit(&records).unwrap();
        assert_eq!(t.feature_names().len(), t.output_len());
    }
}
