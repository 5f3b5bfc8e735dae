//! Branch CRUD (section 4.5.1): `list`, `create`, `switch`, `rename`,
//! `delete`, `current`, each expressed over the [`RefStore`] seam so the
//! facade crate can back it with whatever file layout it likes.

use crate::error::{CoreError, CoreResult};
use crate::model::{validate_branch_name, Branch, DEFAULT_BRANCH};
use crate::store::RefStore;
use time::OffsetDateTime;

/// Lists every branch known to the repository.
pub fn list(refs: &dyn RefStore) -> CoreResult<Vec<Branch>> {
    refs.list_branches()
}

/// The branch `HEAD` currently points at.
pub fn current(refs: &dyn RefStore) -> CoreResult<Branch> {
    let name = refs.head()?;
    refs.get_branch(&name)?
        .ok_or(CoreError::BranchNotFound { name })
}

/// Creates a new branch pointed at `from_commit` (or unborn, if `None`).
/// Fails with `BranchExists` unless `force` is set.
pub fn create(
    refs: &dyn RefStore,
    name: &str,
    from_commit: Option<crate::id::ContentHash>,
    force: bool,
    author: &str,
    now: OffsetDateTime,
) -> CoreResult<Branch> {
    validate_branch_name(name)?;
    if !force && refs.get_branch(name)?.is_some() {
        return Err(CoreError::BranchExists {
            name: name.to_string(),
        });
    }
    let branch = Branch::new(name, from_commit, now, author)?;
    refs.put_branch(&branch)?;
    Ok(branch)
}

/// Switches `HEAD` to `name`. With `create_if_missing`, creates an unborn
/// branch first; `force` permits switching away from anything (reserved
/// for future dirty-state checks — the core has no working tree).
pub fn switch(
    refs: &dyn RefStore,
    name: &str,
    create_if_missing: bool,
    force: bool,
    author: &str,
    now: OffsetDateTime,
) -> CoreResult<Branch> {
    let _ = force;
    let branch = match refs.get_branch(name)? {
        Some(branch) => branch,
        None if create_if_missing => create(refs, name, None, false, author, now)?,
        None => {
            return Err(CoreError::BranchNotFound {
                name: name.to_string(),
            })
        }
    };
    refs.set_head(name)?;
    Ok(branch)
}

/// Renames `old` to `new`. Fails with `BranchProtected` if `old` is the
/// default branch, `BranchNotFound` if it doesn't exist, `BranchExists`
/// for `new` unless `force` is set.
pub fn rename(refs: &dyn RefStore, old: &str, new: &str, force: bool) -> CoreResult<Branch> {
    if old == DEFAULT_BRANCH {
        return Err(CoreError::BranchProtected {
            name: old.to_string(),
        });
    }
    validate_branch_name(new)?;
    let mut branch = refs.get_branch(old)?.ok_or_else(|| CoreError::BranchNotFound {
        name: old.to_string(),
    })?;
    if !force && refs.get_branch(new)?.is_some() {
        return Err(CoreError::BranchExists {
            name: new.to_string(),
        });
    }
    let was_head = refs.head()? == old;
    refs.delete_branch(old)?;
    branch.name = new.to_string();
    refs.put_branch(&branch)?;
    if was_head {
        refs.set_head(new)?;
    }
    Ok(branch)
}

/// Deletes a branch. Fails with `BranchProtected` for the default branch
/// or the current `HEAD`, unless `force` is set for the latter.
pub fn delete(refs: &dyn RefStore, name: &str, force: bool) -> CoreResult<()> {
    if name == DEFAULT_BRANCH {
        return Err(CoreError::BranchProtected {
            name: name.to_string(),
        });
    }
    if refs.get_branch(name)?.is_none() {
        return Err(CoreError::BranchNotFound {
            name: name.to_string(),
        });
    }
    if !force && refs.head()? == name {
        return Err(CoreError::BranchProtected {
            name: name.to_string(),
        });
    }
    refs.delete_branch(name)
}
