//! Model artifact persistence.
//!
//! One training run produces an immutable artifact pair: `pipeline.bin`
//! (fitted transformer + classifier) and `explainer.bin` (fitted attribution
//! engine). Each file is a magic-tagged, versioned bincode envelope, written
//! to a temporary sibling and renamed into place so the load path never sees
//! a partially written artifact. Both files are required at load; absence or
//! corruption of either is startup-fatal.

use crate::explain::TreeExplainer;
use crate::features::FeatureTransformer;
use crate::forest::RandomForest;
use crate::{CrecerError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Transformer + classifier artifact file name.
pub const PIPELINE_FILE: &str = "pipeline.bin";
/// Attribution engine artifact file name.
pub const EXPLAINER_FILE: &str = "explainer.bin";

const MAGIC: [u8; 4] = *b"CRCR";
/// Bumped on any incompatible change to the serialized payloads.
pub const ARTIFACT_VERSION: u16 = 1;

/// On-disk envelope: magic tag and format version ahead of the payload.
#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    magic: [u8; 4],
    version: u16,
    payload: T,
}

#[derive(Serialize, Deserialize)]
struct PipelinePayload {
    transformer: FeatureTransformer,
    forest: RandomForest,
}

#[derive(Serialize, Deserialize)]
struct ExplainerPayload {
    explainer: TreeExplainer,
}

/// The immutable output of one training run. Loaded once at service start,
/// shared read-only across concurrent inference calls, replaced only by a
/// fresh training run and reload.
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    pub transformer: FeatureTransformer,
    pub forest: RandomForest,
    pub explainer: TreeExplainer,
}

impl ModelArtifact {
    /// Persist the pair under `dir`, creating it if needed. Each file is
    /// fully written and fsync-free renamed; an existing artifact is only
    /// replaced once the new bytes are complete.
    pub fn save_to_dir(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .map_err(|e| CrecerError::io(format!("creating {}", dir.display()), e))?;

        let pipeline = PipelinePayload {
            transformer: self.transformer.clone(),
            forest: self.forest.clone(),
        };
        write_atomic(&dir.join(PIPELINE_FILE), &pipeline)?;

        let explainer = ExplainerPayload { explainer: self.explainer.clone() };
        write_atomic(&dir.join(EXPLAINER_FILE), &explainer)?;
        Ok(())
    }

    /// Load the pair from `dir`. A missing or corrupt file is reported as a
    /// startup-fatal error; the inference service must refuse to start on it.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let pipeline: PipelinePayload = read_envelope(&dir.join(PIPELINE_FILE))?;
        let explainer: ExplainerPayload = read_envelope(&dir.join(EXPLAINER_FILE))?;
        Ok(Self {
            transformer: pipeline.transformer,
            forest: pipeline.forest,
            explainer: explainer.explainer,
        })
    }
}

fn write_atomic<T: Serialize>(path: &Path, payload: &T) -> Result<()> {
    let envelope = Envelope { magic: MAGIC, version: ARTIFACT_VERSION, payload };
    let bytes = bincode::serialize(&envelope)
        .map_err(|e| CrecerError::Serialization { message: format!("encoding {}: {e}", path.display()) })?;

    let tmp = temp_sibling(path);
    fs::write(&tmp, &bytes)
        .map_err(|e| CrecerError::io(format!("writing {}", tmp.display()), e))?;
    // Atomic rename: the load path sees either the old artifact or the new
    // one, never a partial file.
    fs::rename(&tmp, path)
        .map_err(|e| CrecerError::io(format!("renaming {} into place", tmp.display()), e))
}

fn read_envelope<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CrecerError::ArtifactNotFound { path: path.to_path_buf() }
        } else {
            CrecerError::io(format!("reading {}", path.display()), e)
        }
    })?;

    let envelope: Envelope<T> = bincode::deserialize(&bytes).map_err(|e| {
        CrecerError::ArtifactCorrupt { path: path.to_path_buf(), message: e.to_string() }
    })?;

    if envelope.magic != MAGIC {
        return Err(CrecerError::ArtifactCorrupt {
            path: path.to_path_buf(),
            message: "bad magic tag".into(),
        });
    }
    if envelope.version != ARTIFACT_VERSION {
        return Err(CrecerError::ArtifactCorrupt {
            path: path.to_path_buf(),
            message: format!(
                "unsupported artifact version {} (expected {ARTIFACT_VERSION})",
                envelope.version
            ),
        });
    }
    Ok(envelope.payload)
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
