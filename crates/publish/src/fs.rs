use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;
use url::Url;

use crate::error::SinkError;
use crate::sink::{validate_key, ArtifactSink};

/// A sink that mirrors one bucket as a directory tree under `<root>/<bucket>/`.
///
/// Presigned URLs are `file://` URLs with an `expires` unix timestamp. The
/// timestamp is informational; nothing enforces it locally.
#[derive(Debug, Clone)]
pub struct FsSink {
    root: PathBuf,
    bucket: String,
}

impl FsSink {
    pub fn new(root: impl Into<PathBuf>, bucket: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            bucket: bucket.into(),
        }
    }

    pub fn bucket_dir(&self) -> PathBuf {
        self.root.join(&self.bucket)
    }

    /// Filesystem path backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, SinkError> {
        validate_key(key)?;
        Ok(self.bucket_dir().join(key))
    }
}

impl ArtifactSink for FsSink {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), SinkError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| SinkError::write(&self.bucket, key, err))?;
        }
        fs::write(&path, bytes).map_err(|err| SinkError::write(&self.bucket, key, err))?;
        debug!(
            bucket = %self.bucket,
            key,
            content_type,
            size = bytes.len(),
            "artifact_put"
        );
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, SinkError> {
        let dir = self.bucket_dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut keys = Vec::new();
        collect_keys(&dir, "", &mut keys)
            .map_err(|err| SinkError::list(&self.bucket, prefix, err))?;
        keys.retain(|key| key.starts_with(prefix));
        keys.sort();
        Ok(keys)
    }

    fn presign(&self, key: &str, ttl_secs: u64) -> Result<String, SinkError> {
        let path = self.path_for(key)?;
        if !path.is_file() {
            return Err(SinkError::missing(&self.bucket, key));
        }
        let absolute = path
            .canonicalize()
            .map_err(|err| SinkError::backend(err.to_string()))?;
        let mut url = Url::from_file_path(&absolute).map_err(|()| {
            SinkError::backend(format!("{} has no file URL", absolute.display()))
        })?;
        let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        let expires = Utc::now().timestamp().saturating_add(ttl);
        url.query_pairs_mut()
            .append_pair("expires", &expires.to_string());
        Ok(url.into())
    }
}

fn collect_keys(dir: &Path, relative: &str, out: &mut Vec<String>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let key = if relative.is_empty() {
            name.into_owned()
        } else {
            format!("{relative}/{name}")
        };
        if entry.file_type()?.is_dir() {
            collect_keys(&entry.path(), &key, out)?;
        } else {
            out.push(key);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objects_land_under_the_bucket_directory() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsSink::new(dir.path(), "exports");
        sink.put("nested/data.json", b"[]", "application/json").unwrap();

        let written = fs::read(dir.path().join("exports/nested/data.json")).unwrap();
        assert_eq!(written, b"[]");
        assert_eq!(sink.object_uri("nested/data.json"), "s3://exports/nested/data.json");
    }

    #[test]
    fn list_walks_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsSink::new(dir.path(), "charts");
        assert!(sink.list("charts/").unwrap().is_empty());

        for key in ["charts/b.png", "charts/a.svg", "misc/readme.txt"] {
            sink.put(key, b"x", "application/octet-stream").unwrap();
        }
        assert_eq!(
            sink.list("charts/").unwrap(),
            vec!["charts/a.svg", "charts/b.png"]
        );
    }

    #[test]
    fn presign_yields_file_url_with_expiry() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsSink::new(dir.path(), "charts");
        sink.put("charts/a.svg", b"<svg/>", "image/svg+xml").unwrap();

        let before = Utc::now().timestamp();
        let url = Url::parse(&sink.presign("charts/a.svg", 3600).unwrap()).unwrap();
        assert_eq!(url.scheme(), "file");
        assert!(url.path().ends_with("/charts/a.svg"));

        let expires: i64 = url
            .query_pairs()
            .find(|(name, _)| name == "expires")
            .map(|(_, value)| value.parse().unwrap())
            .unwrap();
        assert!(expires >= before + 3600);
    }

    #[test]
    fn presign_of_missing_object_fails() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsSink::new(dir.path(), "charts");
        assert!(matches!(
            sink.presign("charts/none.svg", 60),
            Err(SinkError::MissingObject { .. })
        ));
        assert!(matches!(
            sink.put("../escape", b"x", "text/plain"),
            Err(SinkError::InvalidKey(_))
        ));
    }
}
