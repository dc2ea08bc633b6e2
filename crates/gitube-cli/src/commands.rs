//! CLI command implementations.

use gitube_gitolite::{Conf, ConfError, ConfStore, Permission};
use std::path::Path;
use thiserror::Error;

/// Where gitolite-admin keeps its configuration.
pub const DEFAULT_CONF_PATH: &str = "conf/gitolite.conf";

/// CLI errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Conf(#[from] ConfError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} is not in canonical form")]
    NotCanonical(String),
}

pub type Result<T> = std::result::Result<T, CliError>;

fn load(path: &Path) -> Result<ConfStore> {
    tracing::debug!(path = %path.display(), "Reading configuration");
    let text = std::fs::read_to_string(path)?;
    Ok(ConfStore::try_from(text.as_str())?)
}

fn save(path: &Path, store: &ConfStore) -> Result<()> {
    tracing::info!(path = %path.display(), "Writing configuration");
    std::fs::write(path, store.render())?;
    Ok(())
}

fn as_strs(values: &[String]) -> Vec<&str> {
    values.iter().map(String::as_str).collect()
}

/// Print the configuration.
pub fn show(path: &Path, json: bool) -> Result<()> {
    let conf = load(path)?.into_inner();
    if json {
        println!("{}", serde_json::to_string_pretty(&conf)?);
    } else {
        print!("{conf}");
    }
    Ok(())
}

/// Parse the configuration and print a summary.
pub fn check(path: &Path) -> Result<()> {
    let conf = load(path)?.into_inner();
    let rules: usize = conf.repos().map(|r| r.rules().len()).sum();

    println!("{}: OK", path.display());
    println!("  Groups: {}", conf.groups().len());
    println!("  Repos:  {}", conf.repos().len());
    println!("  Rules:  {}", rules);
    Ok(())
}

/// Rewrite the configuration in canonical form.
pub fn fmt(path: &Path, check: bool) -> Result<()> {
    let original = std::fs::read_to_string(path)?;
    let conf: Conf = original.parse()?;
    let canonical = conf.to_string();

    if canonical == original {
        return Ok(());
    }
    if check {
        return Err(CliError::NotCanonical(path.display().to_string()));
    }
    save(path, &ConfStore::from(conf))
}

/// Add users to a group.
pub fn group_add(path: &Path, name: &str, users: &[String]) -> Result<()> {
    let store = load(path)?;
    store.add_group_members(name, &as_strs(users))?;
    save(path, &store)?;

    println!("{}", store.get_group(name)?);
    Ok(())
}

/// Remove users from a group.
pub fn group_remove(path: &Path, name: &str, users: &[String]) -> Result<()> {
    let store = load(path)?;
    store.remove_group_members(name, &as_strs(users))?;
    save(path, &store)?;

    println!("{}", store.get_group(name)?);
    Ok(())
}

/// Delete a group.
pub fn group_delete(path: &Path, name: &str) -> Result<()> {
    let store = load(path)?;
    if store.delete_group(name).is_none() {
        println!("No group named @{name}");
        return Ok(());
    }
    save(path, &store)?;

    println!("Deleted group @{name}");
    Ok(())
}

/// Grant a permission on a repository.
pub fn repo_grant(
    path: &Path,
    repo: &str,
    permission: &str,
    refspec: &str,
    grantees: &[String],
) -> Result<()> {
    let permission: Permission = permission.parse()?;
    let store = load(path)?;
    store.grant(repo, permission, refspec, &as_strs(grantees))?;
    save(path, &store)?;

    print!("{}", store.get_repo(repo)?);
    Ok(())
}

/// Revoke every rule of the given grantees.
pub fn repo_revoke(path: &Path, repo: &str, grantees: &[String]) -> Result<()> {
    let store = load(path)?;
    store.revoke(repo, &as_strs(grantees))?;
    save(path, &store)?;

    print!("{}", store.get_repo(repo)?);
    Ok(())
}

/// Delete a repository block.
pub fn repo_delete(path: &Path, repo: &str) -> Result<()> {
    let store = load(path)?;
    if store.delete_repo(repo).is_none() {
        println!("No repo named {repo}");
        return Ok(());
    }
    save(path, &store)?;

    println!("Deleted repo {repo}");
    Ok(())
}
