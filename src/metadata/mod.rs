//! Package descriptor discovery and version write-back.
//!
//! The project being released is identified by a descriptor at its root:
//! `Cargo.toml` (edited format-preserving) or `package.json` (key order kept).

mod cargo;
mod npm;

pub use cargo::CargoManifest;
pub use npm::NpmManifest;

use crate::error::{ManifestError, Result, VersionError};
use semver::Version;
use std::path::{Path, PathBuf};

/// Version assumed when the descriptor does not carry one
pub const DEFAULT_VERSION: Version = Version::new(1, 0, 0);

/// Name and version of the project being released
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectIdentity {
    /// Package name as written in the descriptor
    pub name: String,
    /// Current package version
    pub version: Version,
}

impl ProjectIdentity {
    /// Repository name on the remote host (`@scope/pkg` becomes `pkg`)
    pub fn repo_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// Read/write access to the project's descriptor file
pub trait PackageDescriptor {
    /// Descriptor file location
    fn path(&self) -> &Path;

    /// Read name and version
    fn read(&self) -> Result<ProjectIdentity>;

    /// Rewrite the version, leaving everything else untouched
    fn write_version(&self, version: &Version) -> Result<()>;
}

/// The descriptor found in a project directory
#[derive(Debug, Clone)]
pub enum Manifest {
    /// Cargo.toml
    Cargo(CargoManifest),
    /// package.json
    Npm(NpmManifest),
}

impl Manifest {
    /// Find the descriptor in `dir`, preferring `Cargo.toml`
    pub fn detect(dir: &Path) -> Result<Self> {
        let cargo = dir.join(cargo::FILE_NAME);
        if cargo.is_file() {
            return Ok(Manifest::Cargo(CargoManifest::new(cargo)));
        }
        let npm = dir.join(npm::FILE_NAME);
        if npm.is_file() {
            return Ok(Manifest::Npm(NpmManifest::new(npm)));
        }
        Err(ManifestError::NotFound {
            dir: dir.to_path_buf(),
        }
        .into())
    }
}

impl PackageDescriptor for Manifest {
    fn path(&self) -> &Path {
        match self {
            Manifest::Cargo(m) => m.path(),
            Manifest::Npm(m) => m.path(),
        }
    }

    fn read(&self) -> Result<ProjectIdentity> {
        match self {
            Manifest::Cargo(m) => m.read(),
            Manifest::Npm(m) => m.read(),
        }
    }

    fn write_version(&self, version: &Version) -> Result<()> {
        match self {
            Manifest::Cargo(m) => m.write_version(version),
            Manifest::Npm(m) => m.write_version(version),
        }
    }
}

/// Build an identity from raw descriptor fields
fn identity(path: &Path, name: Option<&str>, version: Option<&str>) -> Result<ProjectIdentity> {
    let name = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ManifestError::MissingName {
            path: path.to_path_buf(),
        })?
        .to_string();

    let version = match version.map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => Version::parse(raw).map_err(|source| VersionError::ParseFailed {
            version: raw.to_string(),
            source,
        })?,
        None => DEFAULT_VERSION,
    };

    Ok(ProjectIdentity { name, version })
}

fn invalid(path: &Path, reason: impl std::fmt::Display) -> ManifestError {
    ManifestError::Invalid {
        path: PathBuf::from(path),
        reason: reason.to_string(),
    }
}
