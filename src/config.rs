//! Repository-wide tunables (section 6, "Persisted store layout"; section
//! 4.3.2's volatility `K`; section 4.4.2's depth cap): where the repository
//! lives on disk and the knobs its two engines run with.

use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use veritaschain_core::algebra::AlgebraConfig;
use veritaschain_core::confidence::ConfidenceConfig;

/// The directory name a repository root is rooted at, analogous to `.git`.
pub const REPO_DIR: &str = ".veritaschain";

/// Everything a [`crate::Repository`] needs to know before it opens or
/// initializes its backing store.
#[derive(Clone, Debug)]
pub struct RepoConfig {
    /// The repository's working directory; the on-disk store lives under
    /// `root.join(REPO_DIR)`.
    pub root: PathBuf,
    /// Free-form identity stamped on commits and branches created without
    /// an explicit author.
    pub default_author: String,
    /// Event-algebra tunables: composite resolution depth cap.
    pub algebra: AlgebraConfig,
    /// Confidence-engine tunables: volatility `K`, cache capacity, merge
    /// delta threshold.
    pub confidence: ConfidenceConfig,
}

impl RepoConfig {
    /// A config rooted at `root`, everything else at its default.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// The hidden directory this config's store lives under.
    pub fn store_dir(&self) -> PathBuf {
        self.root.join(REPO_DIR)
    }
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            default_author: "unknown".to_string(),
            algebra: AlgebraConfig::default(),
            confidence: ConfidenceConfig::default(),
        }
    }
}

/// Falls back to the current working directory if the platform has no
/// well-known data directory (e.g. a stripped-down container).
fn default_root() -> PathBuf {
    ProjectDirs::from("chain", "veritaschain", "veritaschain")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| Path::new(".").to_path_buf())
}
