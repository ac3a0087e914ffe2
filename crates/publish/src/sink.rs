use std::collections::{BTreeMap, HashSet};
use std::sync::RwLock;

use tracing::debug;

use crate::error::SinkError;

/// Object storage for published artifacts.
///
/// Keys are `/`-separated paths inside a single bucket. Implementations must
/// be usable from several threads, the same way the review stores are.
pub trait ArtifactSink: Send + Sync {
    /// Bucket every key is written under.
    fn bucket(&self) -> &str;

    /// URI scheme used in manifests.
    fn scheme(&self) -> &str {
        "s3"
    }

    /// Store `bytes` under `key`, replacing any previous object.
    fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), SinkError>;

    /// Every key starting with `prefix`, in lexicographic order.
    fn list(&self, prefix: &str) -> Result<Vec<String>, SinkError>;

    /// A URL granting read access to `key` for `ttl_secs` seconds.
    fn presign(&self, key: &str, ttl_secs: u64) -> Result<String, SinkError>;

    /// `<scheme>://<bucket>/<key>`.
    fn object_uri(&self, key: &str) -> String {
        format!("{}://{}/{}", self.scheme(), self.bucket(), key)
    }
}

/// Reject keys that are empty, absolute, or step outside the bucket.
pub(crate) fn validate_key(key: &str) -> Result<(), SinkError> {
    let escapes = key
        .split(['/', '\\'])
        .any(|segment| segment == ".." || segment == ".");
    if key.is_empty() || key.starts_with('/') || key.starts_with('\\') || escapes {
        return Err(SinkError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// A stored object with the content type it was written with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// An in-memory sink using a `RwLock` around a sorted map.
///
/// Writes to keys registered with [`failing_on`](Self::failing_on) are
/// rejected, which lets callers exercise partial-export paths.
pub struct InMemorySink {
    bucket: String,
    objects: RwLock<BTreeMap<String, StoredObject>>,
    failing_keys: HashSet<String>,
}

impl InMemorySink {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: RwLock::new(BTreeMap::new()),
            failing_keys: HashSet::new(),
        }
    }

    pub fn failing_on(mut self, key: impl Into<String>) -> Self {
        self.failing_keys.insert(key.into());
        self
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().ok()?.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArtifactSink for InMemorySink {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), SinkError> {
        validate_key(key)?;
        if self.failing_keys.contains(key) {
            return Err(SinkError::write(&self.bucket, key, "write rejected"));
        }
        self.objects
            .write()
            .map_err(|_| SinkError::backend("poisoned lock"))?
            .insert(
                key.to_string(),
                StoredObject {
                    bytes: bytes.to_vec(),
                    content_type: content_type.to_string(),
                },
            );
        debug!(bucket = %self.bucket, key, size = bytes.len(), "artifact_put");
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, SinkError> {
        let guard = self
            .objects
            .read()
            .map_err(|_| SinkError::backend("poisoned lock"))?;
        Ok(guard
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn presign(&self, key: &str, ttl_secs: u64) -> Result<String, SinkError> {
        let guard = self
            .objects
            .read()
            .map_err(|_| SinkError::backend("poisoned lock"))?;
        if !guard.contains_key(key) {
            return Err(SinkError::missing(&self.bucket, key));
        }
        Ok(format!("{}?expires_in={ttl_secs}", self.object_uri(key)))
    }
}
