//! Extraction of versions embedded in remote ref names.
//!
//! `git ls-remote --refs` prints one `<sha>\t<ref>` pair per line. Release
//! tags are `refs/tags/release/<major>.<minor>.<patch>`; per-version working
//! branches are `refs/heads/develop/<major>.<minor>.<patch>`.

use regex::Regex;
use semver::Version;
use std::sync::LazyLock;

/// Prefix of release tag names
pub const RELEASE_PREFIX: &str = "release/";

/// Prefix of develop branch names
pub const DEVELOP_PREFIX: &str = "develop/";

/// Family of refs carrying an embedded version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// `refs/tags/release/<semver>`
    ReleaseTag,
    /// `refs/tags/develop/<semver>`
    DevelopTag,
    /// `refs/heads/develop/<semver>`
    DevelopBranch,
}

static RELEASE_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)refs/tags/release/(\d+\.\d+\.\d+)$").expect("release tag regex is valid")
});

static DEVELOP_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)refs/tags/develop/(\d+\.\d+\.\d+)$").expect("develop tag regex is valid")
});

static DEVELOP_BRANCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)refs/heads/develop/(\d+\.\d+\.\d+)$")
        .expect("develop branch regex is valid")
});

impl RefKind {
    fn pattern(self) -> &'static Regex {
        match self {
            RefKind::ReleaseTag => &RELEASE_TAG_RE,
            RefKind::DevelopTag => &DEVELOP_TAG_RE,
            RefKind::DevelopBranch => &DEVELOP_BRANCH_RE,
        }
    }
}

/// Parse every line of a ref listing matching `kind`, newest version first.
///
/// Lines that do not match, or whose captured version is not valid semver
/// (leading zeros, overflow), are skipped. The sort is stable so equal
/// versions keep their listing order.
pub fn parse_versions<'a, I>(lines: I, kind: RefKind) -> Vec<Version>
where
    I: IntoIterator<Item = &'a str>,
{
    let re = kind.pattern();
    let mut versions: Vec<Version> = lines
        .into_iter()
        .filter_map(|line| {
            let caps = re.captures(line.trim())?;
            Version::parse(&caps[1]).ok()
        })
        .collect();

    versions.sort_by(|a, b| b.cmp(a));
    versions
}

/// Release tag name for `version`
pub fn release_tag(version: &Version) -> String {
    format!("{RELEASE_PREFIX}{version}")
}

/// Develop branch name for `version`
pub fn develop_branch(version: &Version) -> String {
    format!("{DEVELOP_PREFIX}{version}")
}
