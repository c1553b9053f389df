use std::fs;

use tracing::debug;

use crate::error::{Chainable, Result};
use crate::outcome::Artifact;
use crate::value::Sink;

/// Writes `artifact` to its cache path, creating parent directories and
/// truncating whatever was there. There is no locking: identical inputs
/// produce identical bytes, so concurrent writers agree.
pub fn write_artifact(artifact: &Artifact) -> Result<()> {
    if let Some(parent) = artifact.path.parent() {
        fs::create_dir_all(parent).chain_with(|| error! {
            "failed to create cache directory",
            "directory" => parent.display(),
        })?;
    }

    artifact.path.write(artifact.body.clone())?;
    debug!(path = %artifact.path.display(), bytes = artifact.body.len(), "cache artifact written");
    Ok(())
}
