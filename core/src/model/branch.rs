use crate::error::CoreError;
use crate::id::ContentHash;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The branch every repository starts with; protected against deletion and
/// renaming (section 4.5.1).
pub const DEFAULT_BRANCH: &str = "main";

/// A named, movable pointer at a commit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    /// The branch name.
    pub name: String,
    /// The commit the branch currently points at. `None` for a freshly
    /// created branch with no commits yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<ContentHash>,
    /// When the branch was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    /// Free-form creator identifier.
    pub author: String,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Set for [`DEFAULT_BRANCH`]; prevents deletion and renaming.
    #[serde(default)]
    pub protected: bool,
}

impl Branch {
    /// Creates the default branch, protected and parent-less.
    pub fn default_branch(created: OffsetDateTime, author: impl Into<String>) -> Self {
        Self {
            name: DEFAULT_BRANCH.to_string(),
            head: None,
            created,
            author: author.into(),
            description: None,
            protected: true,
        }
    }

    /// Creates a new, unprotected branch pointed at `head`.
    pub fn new(
        name: impl Into<String>,
        head: Option<ContentHash>,
        created: OffsetDateTime,
        author: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let name = name.into();
        validate_branch_name(&name)?;
        Ok(Self {
            name,
            head,
            created,
            author: author.into(),
            description: None,
            protected: false,
        })
    }
}

/// Validates a branch name against `^[A-Za-z0-9_][A-Za-z0-9_-]*$`: must not
/// end in `.lock`, and must not contain whitespace or path separators
/// (section 4.5.1).
pub fn validate_branch_name(name: &str) -> Result<(), CoreError> {
    let invalid = || CoreError::InvalidBranchName {
        name: name.to_string(),
    };
    if name.is_empty() || name.len() > 255 {
        return Err(invalid());
    }
    if name.ends_with(".lock") {
        return Err(invalid());
    }
    let mut chars = name.chars();
    let first_ok = chars
        .next()
        .map(|c| c.is_ascii_alphanumeric() || c == '_')
        .unwrap_or(false);
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'));
    if !first_ok || !rest_ok {
        return Err(invalid());
    }
    Ok(())
}
