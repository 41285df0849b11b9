use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Configuration for [`StorageService`].
#[derive(Debug, PartialEq, Eq, Clone, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StorageConfig {
	/// Root directory of the object store.
	pub path: PathBuf,
}

/// Filesystem-backed object store.
///
/// Holds backup snapshots and adoption photos. Objects are addressed by
/// keys of the form `prefix/name.ext`; keys never escape the root
/// directory.
#[derive(Debug)]
pub struct StorageService {
	root: PathBuf,
}

impl StorageService {
	pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
		std::fs::create_dir_all(&config.path)?;
		Ok(Self {
			root: config.path.clone(),
		})
	}

	/// Stores `bytes` under a fresh key `{prefix}/{uuid}.{ext}`.
	pub async fn put(
		&self,
		prefix: &str,
		ext: &str,
		bytes: &[u8],
	) -> Result<String, StorageError> {
		let key = format!("{}/{}.{}", prefix, Uuid::now_v7(), ext);
		let path = self.resolve(&key)?;
		if let Some(parent) = path.parent() {
			tokio::fs::create_dir_all(parent).await?;
		}
		tokio::fs::write(&path, bytes).await?;
		info!(key, size = bytes.len(), "stored object");
		Ok(key)
	}

	pub async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		let path = self.resolve(key)?;
		match tokio::fs::read(&path).await {
			Ok(bytes) => Ok(bytes),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
				Err(StorageError::NotFound(key.to_owned()))
			}
			Err(err) => Err(err.into()),
		}
	}

	pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
		let path = self.resolve(key)?;
		match tokio::fs::remove_file(&path).await {
			Ok(()) => Ok(()),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
				Err(StorageError::NotFound(key.to_owned()))
			}
			Err(err) => Err(err.into()),
		}
	}

	fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
		if key.is_empty()
			|| key.starts_with('/')
			|| key.split('/').any(|segment| {
				segment.is_empty()
					|| segment == "."
					|| segment == ".."
					|| !segment
						.chars()
						.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
			}) {
			return Err(StorageError::InvalidKey(key.to_owned()));
		}
		Ok(self.root.join(Path::new(key)))
	}
}

#[derive(Debug, Error)]
pub enum StorageError {
	#[error("invalid object key: {0}")]
	InvalidKey(String),
	#[error("object not found: {0}")]
	NotFound(String),
	#[error("storage I/O error: {0}")]
	IoError(#[from] std::io::Error),
}
