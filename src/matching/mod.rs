//! Matching & Ranking Engine: filter a venture pool by an investor's hard
//! constraints, then rank survivors by cosine similarity to an ideal
//! preference vector.
//!
//! The score vector per record is `(1 - normalized valuation, normalized
//! growth rate)`, normalized against the filtered pool's maxima — low
//! valuation and high growth both push a record toward the ideal `(1, 1)`.
//! Scores live only for the duration of one response.

use crate::record::VentureRecord;
use crate::{CrecerError, Result};
use serde::{Deserialize, Serialize};

/// Ranked responses are capped at this many records.
pub const MAX_RESULTS: usize = 5;

/// Ideal direction: minimal valuation, maximal growth.
const IDEAL: [f64; 2] = [1.0, 1.0];

/// Investor constraints, supplied per matching request. Absent bounds fall
/// back to "accept everything".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Preference {
    /// Exact-match domain filter; `None` accepts any domain.
    pub domain: Option<String>,
    pub min_valuation: f64,
    pub max_valuation: f64,
    pub min_growth_rate: f64,
}

impl Default for Preference {
    fn default() -> Self {
        Self {
            domain: None,
            min_valuation: 0.0,
            max_valuation: f64::INFINITY,
            min_growth_rate: 0.0,
        }
    }
}

impl Preference {
    /// Reject malformed preference objects before any filtering. Reported as
    /// a caller error with the specific reason.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| {
            Err(CrecerError::InvalidPreference { message: message.to_string() })
        };
        if self.min_valuation.is_nan() || self.max_valuation.is_nan() {
            return invalid("valuation bounds must be numbers");
        }
        if !self.min_valuation.is_finite() {
            return invalid("min_valuation must be finite");
        }
        if self.min_valuation > self.max_valuation {
            return invalid("min_valuation exceeds max_valuation");
        }
        if !self.min_growth_rate.is_finite() {
            return invalid("min_growth_rate must be finite");
        }
        Ok(())
    }
}

/// One ranked record with its match score in [-1, 1].
#[derive(Debug, Clone, Serialize)]
pub struct RankedVenture {
    #[serde(flatten)]
    pub record: VentureRecord,
    pub match_score: f64,
}

/// Filter the pool by the preference's hard constraints, rank survivors by
/// match score descending, and return at most [`MAX_RESULTS`] records. Ties
/// keep input order; an empty filtered pool returns an empty sequence.
pub fn recommend(pool: &[VentureRecord], preference: &Preference) -> Result<Vec<RankedVenture>> {
    preference.validate()?;

    // Hard constraints: all must hold, no partial credit. A record without a
    // growth rate competes as if it were 0.
    let filtered: Vec<&VentureRecord> = pool
        .iter()
        .filter(|r| {
            r.valuation >= preference.min_valuation
                && r.valuation <= preference.max_valuation
                && r.growth_rate_cent.unwrap_or(0.0) >= preference.min_growth_rate
                && preference.domain.as_deref().is_none_or(|d| r.domain == d)
        })
        .collect();

    if filtered.is_empty() {
        return Ok(Vec::new());
    }

    // Normalize against the filtered pool's maxima; a zero maximum divides
    // by 1 instead.
    let max_valuation = positive_max(filtered.iter().map(|r| r.valuation));
    let max_growth = positive_max(filtered.iter().map(|r| r.growth_rate_cent.unwrap_or(0.0)));

    let mut ranked: Vec<RankedVenture> = filtered
        .into_iter()
        .map(|r| {
            let vector = [
                1.0 - r.valuation / max_valuation,
                r.growth_rate_cent.unwrap_or(0.0) / max_growth,
            ];
            RankedVenture { record: r.clone(), match_score: cosine_similarity(vector, IDEAL) }
        })
        .collect();

    // Stable sort: equal scores keep pool order.
    ranked.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    ranked.truncate(MAX_RESULTS);
    Ok(ranked)
}

fn positive_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0f64, f64::max);
    if max == 0.0 {
        1.0
    } else {
        max
    }
}

fn cosine_similarity(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dot = a[0] * b[0] + a[1] * b[1];
    let norm_a = (a[0] * a[0] + a[1] * a[1]).sqrt();
    let norm_b = (b[0] * b[0] + b[1] * b[1]).sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
