use std::path::{Path, PathBuf};

use tracing::debug;

use crate::value::{Dict, Format, Json};

/// A post descriptor: language code to the stored source fragment for that
/// language, e.g. `{"en": "31415-EN-lorem-ipsum.md"}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostMeta {
    fields: Dict,
}

impl PostMeta {
    pub fn new(fields: Dict) -> Self {
        PostMeta { fields }
    }

    /// The stored fragment for `lang`. Missing, empty and non-string entries
    /// all read as absent.
    pub fn fragment(&self, lang: &str) -> Option<&str> {
        self.fields.get(lang)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }
}

/// Read-only lookup of post descriptors stored as `<dir>/<id>.json`.
#[derive(Debug, Clone)]
pub struct MetaStore {
    dir: PathBuf,
}

impl MetaStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        MetaStore { dir: dir.as_ref().to_path_buf() }
    }

    pub fn descriptor_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// Reads the descriptor for `id`. A missing file and an undecodable one
    /// are indistinguishable to callers: both yield `None`.
    pub fn get(&self, id: &str) -> Option<PostMeta> {
        let path = self.descriptor_path(id);
        match Json::read::<_, Dict>(path.as_path()) {
            Ok(fields) => Some(PostMeta::new(fields)),
            Err(e) => {
                debug!(id, path = %path.display(), "no usable descriptor: {e}");
                None
            }
        }
    }
}
