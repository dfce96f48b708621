//! Online inference path: class label plus ranked explanation for a single
//! venture record.
//!
//! The `Predictor` is constructed once at service start from the persisted
//! artifact pair, held by the request-handling context, and dropped at
//! shutdown. It is read-only after construction, so concurrent requests
//! share it without locking.

use crate::artifact::ModelArtifact;
use crate::explain::{Contribution, TOP_K};
use crate::record::{GrowthClass, VentureRecord};
use crate::Result;
use serde::{Serialize, Serializer};
use std::path::Path;

/// Inference response: the predicted class and the top features that drove
/// it, by descending attribution magnitude.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// `None` when the ensemble emits an index outside the three known
    /// labels; serialized as `"Unknown"` rather than failing the request.
    #[serde(serialize_with = "serialize_class")]
    pub growth_class: Option<GrowthClass>,
    pub top_features: Vec<Contribution>,
}

impl Prediction {
    /// Display label, `"Unknown"` for an out-of-range class index.
    pub fn class_label(&self) -> &'static str {
        self.growth_class.map_or("Unknown", GrowthClass::as_str)
    }
}

fn serialize_class<S: Serializer>(
    class: &Option<GrowthClass>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(class.map_or("Unknown", GrowthClass::as_str))
}

/// Loaded inference state. Immutable for the process lifetime; replacing the
/// model means a new training run and a fresh `Predictor`.
#[derive(Debug, Clone)]
pub struct Predictor {
    artifact: ModelArtifact,
    feature_names: Vec<String>,
}

impl Predictor {
    /// Load the artifact pair from `dir`. Missing or corrupt artifacts are
    /// startup-fatal: the caller must refuse to serve without them.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        Ok(Self::from_artifact(ModelArtifact::load_from_dir(dir)?))
    }

    /// Wrap an already-loaded artifact (fresh training runs hand their
    /// outcome straight to a predictor in tests and offline evaluation).
    pub fn from_artifact(artifact: ModelArtifact) -> Self {
        let feature_names = artifact.transformer.feature_names();
        Self { artifact, feature_names }
    }

    /// Predict from a raw JSON inference request. Missing or mistyped
    /// required keys are caller errors naming the key; extra keys are
    /// ignored.
    pub fn predict_json(&self, input: &serde_json::Value) -> Result<Prediction> {
        let record = VentureRecord::from_inference_json(input)?;
        Ok(self.predict(&record))
    }

    /// Predict for an already-validated record. Attribution is always
    /// computed for the class the classifier itself returned for this
    /// vector.
    pub fn predict(&self, record: &VentureRecord) -> Prediction {
        let x = self.artifact.transformer.transform(record);
        let class_index = self.artifact.forest.predict(&x);
        let top_features =
            self.artifact.explainer.top_contributions(&x, class_index, &self.feature_names, TOP_K);
        Prediction { growth_class: GrowthClass::from_index(class_index), top_features }
    }
}
