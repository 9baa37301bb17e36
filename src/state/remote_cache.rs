//! Cached [`RemoteDescriptor`] persistence.

use crate::error::{Result, StateError};
use crate::remote::RemoteDescriptor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Directory under `$HOME` holding the cache
pub const CACHE_DIR_NAME: &str = ".release_flow";

const CACHE_FILE_NAME: &str = "remote.json";

#[derive(Serialize, Deserialize)]
struct CachedRemote {
    #[serde(flatten)]
    descriptor: RemoteDescriptor,
    saved_at: DateTime<Utc>,
}

/// Location of the cached remote selection
#[derive(Debug, Clone)]
pub struct RemoteCache {
    path: PathBuf,
}

impl RemoteCache {
    /// `~/.release_flow/remote.json`
    pub fn default_location() -> Result<Self> {
        let home = dirs::home_dir().ok_or(StateError::NoHomeDir)?;
        Ok(Self::at(home.join(CACHE_DIR_NAME).join(CACHE_FILE_NAME)))
    }

    /// Cache stored at an explicit path
    pub fn at<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Cache file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached descriptor; an unreadable cache is treated as empty
    pub fn load(&self) -> Result<Option<RemoteDescriptor>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        match serde_json::from_str::<CachedRemote>(&content) {
            Ok(cached) => {
                log::debug!(
                    "using remote selection cached at {} ({})",
                    cached.saved_at,
                    self.path.display()
                );
                Ok(Some(cached.descriptor))
            }
            Err(e) => {
                log::warn!("ignoring corrupted cache {}: {}", self.path.display(), e);
                Ok(None)
            }
        }
    }

    /// Persist `descriptor`, replacing any previous selection
    pub fn save(&self, descriptor: &RemoteDescriptor) -> Result<()> {
        let save_failed = |reason: String| StateError::SaveFailed {
            path: self.path.clone(),
            reason,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }

        let serialized = serde_json::to_string_pretty(&CachedRemote {
            descriptor: descriptor.clone(),
            saved_at: Utc::now(),
        })?;

        // Write to a sibling temp file first, then rename over the cache
        let temp_path = self.path.with_extension("tmp");
        {
            let mut file = fs::File::create(&temp_path).map_err(|e| save_failed(e.to_string()))?;
            restrict_permissions(&file)?;
            file.write_all(serialized.as_bytes())
                .map_err(|e| save_failed(e.to_string()))?;
            file.sync_all().map_err(|e| save_failed(e.to_string()))?;
        }
        fs::rename(&temp_path, &self.path).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Delete the cache; returns whether anything was removed
    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(file: &fs::File) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &fs::File) -> Result<()> {
    Ok(())
}
