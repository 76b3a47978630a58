//! Persisted model snapshots used as the baseline for the next run.
//!
//! A snapshot is the YAML encoding of a [`ClassModel`] stored next to the
//! generated sources. Change flags are never persisted.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::context::ServiceContext;
use crate::error::{GenError, Result};
use crate::model::ClassModel;

/// Encodes a model as YAML. The same model always yields the same text.
///
/// # Errors
///
/// Returns [`GenError::Snapshot`] if serialization fails.
pub fn encode(model: &ClassModel) -> Result<String> {
    Ok(serde_yaml::to_string(model)?)
}

/// Decodes a model from YAML; every `modified` flag starts out `false`.
///
/// # Errors
///
/// Returns [`GenError::Snapshot`] if the text is not a valid snapshot.
pub fn decode(text: &str) -> Result<ClassModel> {
    Ok(serde_yaml::from_str(text)?)
}

/// Location of the snapshot named `file_name` for `model`.
#[must_use]
pub fn snapshot_path(model: &ClassModel, file_name: &str) -> PathBuf {
    Path::new(&model.package_src_folder()).join(file_name)
}

/// Loads the previous snapshot, treating absence or corruption as a first run.
#[must_use]
pub fn load(ctx: &ServiceContext, path: &Path) -> Option<ClassModel> {
    if !ctx.fs.exists(path) {
        debug!(path = %path.display(), "no previous snapshot, first run");
        return None;
    }
    let text = match ctx.fs.read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "could not read snapshot, regenerating from scratch");
            return None;
        }
    };
    match decode(&text) {
        Ok(model) => Some(model),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "could not decode snapshot, regenerating from scratch");
            None
        }
    }
}

/// Writes `model` as the new snapshot, replacing any previous one.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn save(ctx: &ServiceContext, path: &Path, model: &ClassModel) -> Result<()> {
    let text = encode(model)?;
    ctx.fs.write(path, &text).map_err(|e| GenError::fs(path, e.as_ref()))
}
