//! Build identity of the running relay.
//!
//! `build.rs` embeds git metadata through vergen. Builds outside a git
//! checkout (crates.io tarballs, vendored sources) get `"unknown"` for every
//! git field, and [`BuildInfo::is_release_tree`] reports `false`.

use serde::Serialize;

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

const UNKNOWN: &str = "unknown";

/// Metadata describing the binary, as reported by `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub branch: &'static str,
    pub commit: &'static str,
    pub dirty: bool,
}

impl BuildInfo {
    /// Metadata embedded at compile time.
    pub fn current() -> Self {
        Self {
            version: PKG_VERSION,
            branch: option_env!("VERGEN_GIT_BRANCH").unwrap_or(UNKNOWN),
            commit: option_env!("VERGEN_GIT_SHA").unwrap_or(UNKNOWN),
            dirty: option_env!("VERGEN_GIT_DIRTY") == Some("true"),
        }
    }

    /// First seven characters of the commit hash.
    pub fn short_commit(&self) -> &str {
        match self.commit.char_indices().nth(7) {
            Some((idx, _)) => &self.commit[..idx],
            None => self.commit,
        }
    }

    /// Built from a clean, identified commit.
    pub fn is_release_tree(&self) -> bool {
        self.commit != UNKNOWN && !self.dirty
    }

    /// `{version}+{branch}.{commit}`, with `.dirty` appended for modified trees.
    pub fn label(&self) -> String {
        let suffix = if self.dirty { ".dirty" } else { "" };
        format!(
            "{}+{}.{}{suffix}",
            self.version,
            self.branch,
            self.short_commit()
        )
    }
}

/// Version label of this build, logged at startup and served by `/health`.
pub fn version_string() -> String {
    BuildInfo::current().label()
}
