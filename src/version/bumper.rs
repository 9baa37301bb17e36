//! Semantic version increments.

use crate::error::VersionError;
use semver::{BuildMetadata, Prerelease, Version};
use std::fmt;

/// Kind of version increment offered when the remote release is not behind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    /// x.y.Z
    Patch,
    /// x.Y.0
    Minor,
    /// X.0.0
    Major,
}

impl VersionBump {
    /// Offered in prompt order; the first entry is the default.
    pub const ALL: [VersionBump; 3] = [VersionBump::Patch, VersionBump::Minor, VersionBump::Major];

    /// Apply this increment, dropping pre-release and build metadata.
    ///
    /// A pre-release already sitting on the target boundary is promoted
    /// instead of bumped (`1.0.0-beta` patch -> `1.0.0`).
    pub fn apply(self, version: &Version) -> Result<Version, VersionError> {
        let overflow = || VersionError::Overflow {
            version: version.to_string(),
            bump: self.as_str().to_string(),
        };
        let mut next = version.clone();
        let pre = !version.pre.is_empty();
        match self {
            VersionBump::Patch => {
                if !pre {
                    next.patch = next.patch.checked_add(1).ok_or_else(overflow)?;
                }
            }
            VersionBump::Minor => {
                if !(pre && next.patch == 0) {
                    next.minor = next.minor.checked_add(1).ok_or_else(overflow)?;
                }
                next.patch = 0;
            }
            VersionBump::Major => {
                if !(pre && next.minor == 0 && next.patch == 0) {
                    next.major = next.major.checked_add(1).ok_or_else(overflow)?;
                }
                next.minor = 0;
                next.patch = 0;
            }
        }
        next.pre = Prerelease::EMPTY;
        next.build = BuildMetadata::EMPTY;
        Ok(next)
    }

    /// Lowercase name used on the command line and in prompts
    pub fn as_str(self) -> &'static str {
        match self {
            VersionBump::Patch => "patch",
            VersionBump::Minor => "minor",
            VersionBump::Major => "major",
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
