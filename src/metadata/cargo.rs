//! `Cargo.toml` descriptor.

use super::{identity, invalid};
use crate::error::Result;
use crate::metadata::{PackageDescriptor, ProjectIdentity};
use semver::Version;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub(super) const FILE_NAME: &str = "Cargo.toml";

#[derive(Deserialize)]
struct RawManifest {
    package: Option<RawPackage>,
}

#[derive(Deserialize)]
struct RawPackage {
    name: Option<String>,
    // May be `{ workspace = true }`, which counts as absent.
    version: Option<toml::Value>,
}

/// A single-package Cargo manifest
#[derive(Debug, Clone)]
pub struct CargoManifest {
    path: PathBuf,
}

impl CargoManifest {
    /// Descriptor at `path`
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl PackageDescriptor for CargoManifest {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<ProjectIdentity> {
        let content = std::fs::read_to_string(&self.path)?;
        let raw: RawManifest = toml::from_str(&content).map_err(|e| invalid(&self.path, e))?;
        let package = raw.package.ok_or_else(|| invalid(&self.path, "missing [package] table"))?;
        let version = package.version.as_ref().and_then(toml::Value::as_str);
        identity(&self.path, package.name.as_deref(), version)
    }

    fn write_version(&self, version: &Version) -> Result<()> {
        let content = std::fs::read_to_string(&self.path)?;
        let mut doc = content
            .parse::<toml_edit::DocumentMut>()
            .map_err(|e| invalid(&self.path, e))?;

        let package = doc
            .get_mut("package")
            .and_then(|item| item.as_table_like_mut())
            .ok_or_else(|| invalid(&self.path, "missing [package] table"))?;
        let inherited = package
            .get("version")
            .and_then(|item| item.as_table_like())
            .is_some_and(|table| table.contains_key("workspace"));
        if inherited {
            return Err(invalid(
                &self.path,
                "version is inherited from the workspace; bump it in the workspace manifest",
            )
            .into());
        }
        package.insert("version", toml_edit::value(version.to_string()));

        std::fs::write(&self.path, doc.to_string())?;
        log::debug!("wrote version {} to {}", version, self.path.display());
        Ok(())
    }
}
