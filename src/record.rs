//! Venture records and growth classes.
//!
//! `VentureRecord` is the raw attribute mapping a venture submits at
//! onboarding; `GrowthClass` is the ordinal label the classifier assigns.
//! Field order is fixed by `NUMERIC_FIELDS` / `CATEGORICAL_FIELDS` so that
//! feature-vector layout is stable across fit and transform.

use crate::{CrecerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric model inputs, in feature-vector order.
pub const NUMERIC_FIELDS: [&str; 4] =
    ["investment_amount", "valuation", "number_of_investors", "year_founded"];

/// Categorical model inputs, in feature-vector order.
pub const CATEGORICAL_FIELDS: [&str; 3] = ["domain", "startup_stage", "industry_funder_type"];

/// Continuous growth signal the class label is derived from. Never a model
/// input and never required at inference time.
pub const GROWTH_RATE_FIELD: &str = "growth_rate_cent";

/// A raw venture record. Immutable once submitted for prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VentureRecord {
    pub investment_amount: f64,
    pub valuation: f64,
    pub number_of_investors: f64,
    pub year_founded: f64,
    /// Present on historical rows; `None` when missing or unparseable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_rate_cent: Option<f64>,
    pub domain: String,
    pub startup_stage: String,
    pub industry_funder_type: String,
}

impl VentureRecord {
    /// Numeric field value by position in `NUMERIC_FIELDS`.
    pub(crate) fn numeric_field(&self, index: usize) -> f64 {
        match index {
            0 => self.investment_amount,
            1 => self.valuation,
            2 => self.number_of_investors,
            3 => self.year_founded,
            _ => unreachable!("numeric field index out of range: {index}"),
        }
    }

    /// Categorical field value by position in `CATEGORICAL_FIELDS`.
    pub(crate) fn categorical_field(&self, index: usize) -> &str {
        match index {
            0 => &self.domain,
            1 => &self.startup_stage,
            2 => &self.industry_funder_type,
            _ => unreachable!("categorical field index out of range: {index}"),
        }
    }

    /// Parse an inference request: a JSON object containing exactly the
    /// recognized feature keys. Extra keys are ignored; a missing or
    /// non-numeric required key is a caller error naming that key.
    ///
    /// The growth rate is read if present (matching pools carry it) but is
    /// never required for inference.
    pub fn from_inference_json(value: &serde_json::Value) -> Result<Self> {
        let map = value.as_object().ok_or_else(|| CrecerError::InvalidFeature {
            field: "<root>".into(),
            message: "inference input must be a JSON object".into(),
        })?;

        let numeric = |field: &str| -> Result<f64> {
            let v = map
                .get(field)
                .ok_or_else(|| CrecerError::MissingFeature { field: field.into() })?;
            v.as_f64().ok_or_else(|| CrecerError::InvalidFeature {
                field: field.into(),
                message: format!("expected a number, got {v}"),
            })
        };
        let categorical = |field: &str| -> Result<String> {
            let v = map
                .get(field)
                .ok_or_else(|| CrecerError::MissingFeature { field: field.into() })?;
            v.as_str().map(str::to_owned).ok_or_else(|| CrecerError::InvalidFeature {
                field: field.into(),
                message: format!("expected a string, got {v}"),
            })
        };

        Ok(Self {
            investment_amount: numeric("investment_amount")?,
            valuation: numeric("valuation")?,
            number_of_investors: numeric("number_of_investors")?,
            year_founded: numeric("year_founded")?,
            growth_rate_cent: map.get(GROWTH_RATE_FIELD).and_then(serde_json::Value::as_f64),
            domain: categorical("domain")?,
            startup_stage: categorical("startup_stage")?,
            industry_funder_type: categorical("industry_funder_type")?,
        })
    }
}

/// Ordinal growth potential class, ordered by increasing growth-rate
/// quantile. Class identity is carried by this enum, never by positional
/// array indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GrowthClass {
    Low,
    Medium,
    High,
}

impl GrowthClass {
    /// Number of classes. The classifier and explainer are fitted against
    /// exactly this many labels.
    pub const COUNT: usize = 3;

    /// All classes in ordinal order.
    pub const ALL: [GrowthClass; 3] = [GrowthClass::Low, GrowthClass::Medium, GrowthClass::High];

    /// Map a class index back to a label. `None` for an out-of-range index,
    /// which the inference layer reports as a distinct "Unknown" result
    /// rather than failing the request.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Low),
            1 => Some(Self::Medium),
            2 => Some(Self::High),
            _ => None,
        }
    }

    /// Ordinal index of this class.
    pub fn index(self) -> usize {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for GrowthClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
