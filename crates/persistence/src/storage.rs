//! Filesystem store for payment artifacts.
//!
//! The contract is deliberately small: `put(key, bytes)` and
//! `get(key) -> bytes or NotFound`. Keys are derived from the booking id
//! and the sanitized original filename, so a re-upload for the same
//! booking and filename overwrites the previous bytes. All IO runs under
//! a bounded timeout and surfaces as a retryable `Storage` error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::timeout;
use uuid::Uuid;

use domain::DomainError;

/// Derive the storage key for a booking's payment artifact.
///
/// The filename is flattened to a safe basename so a hostile
/// `../../etc/passwd` upload cannot escape the artifact root.
pub fn artifact_key(booking_id: Uuid, filename: &str) -> String {
    let safe: String = Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}_{}", booking_id, safe)
}

/// Payment artifact store backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
    io_timeout: Duration,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>, io_timeout_secs: u64) -> Self {
        Self {
            root: root.into(),
            io_timeout: Duration::from_secs(io_timeout_secs),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Store artifact bytes under a key, creating the root directory on
    /// first use. Overwrites any previous bytes under the same key.
    pub async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), DomainError> {
        let io = async {
            tokio::fs::create_dir_all(&self.root).await?;
            tokio::fs::write(self.path_for(key), bytes).await
        };
        match timeout(self.io_timeout, io).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                tracing::error!(key, error = %e, "artifact write failed");
                Err(DomainError::Storage(e.to_string()))
            }
            Err(_) => Err(DomainError::Storage("artifact write timed out".into())),
        }
    }

    /// Retrieve artifact bytes by key.
    pub async fn get(&self, key: &str) -> Result<Vec<u8>, DomainError> {
        match timeout(self.io_timeout, tokio::fs::read(self.path_for(key))).await {
            Ok(Ok(bytes)) => Ok(bytes),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(DomainError::NotFound("payment file"))
            }
            Ok(Err(e)) => {
                tracing::error!(key, error = %e, "artifact read failed");
                Err(DomainError::Storage(e.to_string()))
            }
            Err(_) => Err(DomainError::Storage("artifact read timed out".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> ArtifactStore {
        let dir = std::env::temp_dir().join(format!("artifacts-test-{}", Uuid::new_v4()));
        ArtifactStore::new(dir, 5)
    }

    #[test]
    fn test_artifact_key_shape() {
        let id = Uuid::new_v4();
        assert_eq!(
            artifact_key(id, "receipt.pdf"),
            format!("{}_receipt.pdf", id)
        );
    }

    #[test]
    fn test_artifact_key_flattens_paths() {
        let id = Uuid::new_v4();
        let key = artifact_key(id, "../../etc/passwd");
        assert!(!key.contains('/'));
        assert!(!key.contains(".."));
        assert_eq!(key, format!("{}_passwd", id));
    }

    #[test]
    fn test_artifact_key_replaces_odd_characters() {
        let id = Uuid::new_v4();
        // seven non-ASCII/space characters each become one underscore
        assert_eq!(
            artifact_key(id, "мой чек.png"),
            format!("{}_{}", id, "_______.png")
        );
    }

    #[tokio::test]
    async fn test_put_then_get_round_trip() {
        let store = test_store();
        store.put("key1", b"payment proof").await.unwrap();
        assert_eq!(store.get("key1").await.unwrap(), b"payment proof");
    }

    #[tokio::test]
    async fn test_get_missing_key_is_not_found() {
        let store = test_store();
        store.put("other", b"x").await.unwrap();
        assert!(matches!(
            store.get("missing").await,
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_reupload_overwrites() {
        let store = test_store();
        store.put("key1", b"first").await.unwrap();
        store.put("key1", b"second").await.unwrap();
        assert_eq!(store.get("key1").await.unwrap(), b"second");
    }
}
