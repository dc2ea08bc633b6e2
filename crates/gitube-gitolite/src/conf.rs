//! The configuration document.

use crate::error::{ConfError, Result};
use crate::group::Group;
use crate::named::NamedMap;
use crate::parser;
use crate::repo::Repo;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A `gitolite.conf` document: groups and repositories keyed by name.
///
/// Both collections iterate in insertion order. Adding an entity whose name
/// is already present replaces the old one in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Conf {
    groups: NamedMap<Group>,
    repos: NamedMap<Repo>,
}

impl Conf {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Groups ====================

    /// Add a group, replacing any group with the same name.
    pub fn add_group(&mut self, group: Group) {
        self.groups.insert(group);
    }

    /// Check if a group exists.
    pub fn has_group(&self, name: &str) -> bool {
        self.groups.contains(name)
    }

    /// Get a group by name.
    pub fn get_group(&self, name: &str) -> Result<&Group> {
        self.groups
            .get(name)
            .ok_or_else(|| ConfError::NotFound(format!("group '@{}'", name)))
    }

    /// Get a mutable reference to a group by name.
    pub fn get_group_mut(&mut self, name: &str) -> Result<&mut Group> {
        self.groups
            .get_mut(name)
            .ok_or_else(|| ConfError::NotFound(format!("group '@{}'", name)))
    }

    /// Remove a group. Absent names are not an error.
    pub fn del_group(&mut self, name: &str) -> Option<Group> {
        self.groups.remove(name)
    }

    /// Groups in insertion order.
    pub fn groups(&self) -> std::slice::Iter<'_, Group> {
        self.groups.iter()
    }

    // ==================== Repositories ====================

    /// Add a repository, replacing any repository with the same name.
    pub fn add_repo(&mut self, repo: Repo) {
        self.repos.insert(repo);
    }

    /// Check if a repository exists.
    pub fn has_repo(&self, name: &str) -> bool {
        self.repos.contains(name)
    }

    /// Get a repository by name.
    pub fn get_repo(&self, name: &str) -> Result<&Repo> {
        self.repos
            .get(name)
            .ok_or_else(|| ConfError::NotFound(format!("repo '{}'", name)))
    }

    /// Get a mutable reference to a repository by name.
    pub fn get_repo_mut(&mut self, name: &str) -> Result<&mut Repo> {
        self.repos
            .get_mut(name)
            .ok_or_else(|| ConfError::NotFound(format!("repo '{}'", name)))
    }

    /// Remove a repository. Absent names are not an error.
    pub fn del_repo(&mut self, name: &str) -> Option<Repo> {
        self.repos.remove(name)
    }

    /// Repositories in insertion order.
    pub fn repos(&self) -> std::slice::Iter<'_, Repo> {
        self.repos.iter()
    }

    // ==================== Text ====================

    /// Parse `text` and merge it into this document.
    ///
    /// Parsed groups and repos replace existing ones with the same name. On
    /// error the document is left unchanged.
    pub fn parse_conf(&mut self, text: &str) -> Result<()> {
        let parsed = parser::parse(text)?;
        self.merge(parsed);
        Ok(())
    }

    /// Move every group and repo of `other` into this document.
    pub fn merge(&mut self, other: Conf) {
        for group in other.groups {
            self.add_group(group);
        }
        for repo in other.repos {
            self.add_repo(repo);
        }
    }

    /// Render the canonical text form. Same as `to_string()`.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl FromStr for Conf {
    type Err = ConfError;

    fn from_str(s: &str) -> Result<Self> {
        parser::parse(s)
    }
}

impl fmt::Display for Conf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in self.groups.iter() {
            writeln!(f, "{}", group)?;
        }
        if !self.groups.is_empty() && !self.repos.is_empty() {
            writeln!(f)?;
        }
        for (i, repo) in self.repos.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", repo)?;
        }
        Ok(())
    }
}
