//! `package.json` descriptor.

use super::{identity, invalid};
use crate::error::Result;
use crate::metadata::{PackageDescriptor, ProjectIdentity};
use semver::Version;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub(super) const FILE_NAME: &str = "package.json";

/// An npm package descriptor
#[derive(Debug, Clone)]
pub struct NpmManifest {
    path: PathBuf,
}

impl NpmManifest {
    /// Descriptor at `path`
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> Result<Value> {
        let content = std::fs::read_to_string(&self.path)?;
        let value: Value = serde_json::from_str(&content).map_err(|e| invalid(&self.path, e))?;
        if !value.is_object() {
            return Err(invalid(&self.path, "top level is not an object").into());
        }
        Ok(value)
    }
}

impl PackageDescriptor for NpmManifest {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<ProjectIdentity> {
        let value = self.load()?;
        identity(
            &self.path,
            value.get("name").and_then(Value::as_str),
            value.get("version").and_then(Value::as_str),
        )
    }

    fn write_version(&self, version: &Version) -> Result<()> {
        let mut value = self.load()?;
        if let Some(object) = value.as_object_mut() {
            object.insert("version".to_string(), Value::String(version.to_string()));
        }
        let mut rendered = serde_json::to_string_pretty(&value)?;
        rendered.push('\n');
        std::fs::write(&self.path, rendered)?;
        log::debug!("wrote version {} to {}", version, self.path.display());
        Ok(())
    }
}
