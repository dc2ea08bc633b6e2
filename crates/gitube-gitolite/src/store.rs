//! Lock-guarded configuration document.

use crate::{
    conf::Conf,
    error::{ConfError, Result},
    group::Group,
    permission::Permission,
    repo::Repo,
};
use parking_lot::RwLock;

/// Thread-safe holder for one [`Conf`].
///
/// Every operation takes the document's single lock for its whole duration,
/// so compound edits (create-if-missing, then modify) are atomic.
#[derive(Debug, Default)]
pub struct ConfStore {
    conf: RwLock<Conf>,
}

impl ConfStore {
    /// Create a store holding an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `conf`.
    pub fn from_conf(conf: Conf) -> Self {
        Self {
            conf: RwLock::new(conf),
        }
    }

    /// Parse `text` and merge it into the stored document.
    ///
    /// Parsing happens before the lock is taken; a malformed document leaves
    /// the store untouched.
    pub fn parse(&self, text: &str) -> Result<()> {
        let parsed: Conf = text.parse()?;
        self.conf.write().merge(parsed);
        Ok(())
    }

    /// Render the stored document.
    pub fn render(&self) -> String {
        self.conf.read().to_string()
    }

    /// Clone the stored document.
    pub fn snapshot(&self) -> Conf {
        self.conf.read().clone()
    }

    /// Consume the store, returning the document.
    pub fn into_inner(self) -> Conf {
        self.conf.into_inner()
    }

    /// Run `f` with shared access to the document.
    pub fn read<T>(&self, f: impl FnOnce(&Conf) -> T) -> T {
        f(&self.conf.read())
    }

    /// Run `f` with exclusive access to the document.
    pub fn write<T>(&self, f: impl FnOnce(&mut Conf) -> T) -> T {
        f(&mut self.conf.write())
    }

    // ==================== Groups ====================

    /// Check if a group exists.
    pub fn has_group(&self, name: &str) -> bool {
        self.conf.read().has_group(name)
    }

    /// Get a copy of a group.
    pub fn get_group(&self, name: &str) -> Result<Group> {
        self.conf.read().get_group(name).cloned()
    }

    /// Add users to a group, creating the group if it does not exist.
    pub fn add_group_members(&self, group: &str, users: &[&str]) -> Result<()> {
        let mut conf = self.conf.write();
        if !conf.has_group(group) {
            tracing::debug!(group = %group, "creating group");
            conf.add_group(Group::new(group));
        }
        conf.get_group_mut(group)?.add_users(users.iter().copied());
        Ok(())
    }

    /// Remove users from an existing group.
    pub fn remove_group_members(&self, group: &str, users: &[&str]) -> Result<()> {
        let mut conf = self.conf.write();
        conf.get_group_mut(group)?.del_users(users.iter().copied());
        Ok(())
    }

    /// Delete a group, returning it if it existed.
    pub fn delete_group(&self, name: &str) -> Option<Group> {
        self.conf.write().del_group(name)
    }

    // ==================== Repositories ====================

    /// Check if a repository exists.
    pub fn has_repo(&self, name: &str) -> bool {
        self.conf.read().has_repo(name)
    }

    /// Get a copy of a repository.
    pub fn get_repo(&self, name: &str) -> Result<Repo> {
        self.conf.read().get_repo(name).cloned()
    }

    /// Grant `permission` on `refspec` to each grantee, creating the
    /// repository if it does not exist.
    pub fn grant(
        &self,
        repo: &str,
        permission: Permission,
        refspec: &str,
        grantees: &[&str],
    ) -> Result<()> {
        let mut conf = self.conf.write();
        if !conf.has_repo(repo) {
            tracing::debug!(repo = %repo, "creating repo");
            conf.add_repo(Repo::new(repo));
        }
        conf.get_repo_mut(repo)?
            .add_permission(permission, refspec, grantees.iter().copied());
        Ok(())
    }

    /// Drop every rule of the given grantees on an existing repository.
    pub fn revoke(&self, repo: &str, grantees: &[&str]) -> Result<()> {
        let mut conf = self.conf.write();
        let existing = conf.get_repo_mut(repo)?;
        if !grantees.iter().any(|g| existing.has_grantee(g)) {
            tracing::debug!(repo = %repo, ?grantees, "no rules to revoke");
        }
        existing.del_permission(grantees.iter().copied());
        Ok(())
    }

    /// Delete a repository, returning it if it existed.
    pub fn delete_repo(&self, name: &str) -> Option<Repo> {
        self.conf.write().del_repo(name)
    }

    /// Names of groups and repos, in insertion order.
    pub fn names(&self) -> (Vec<String>, Vec<String>) {
        let conf = self.conf.read();
        (
            conf.groups().map(|g| g.name().to_string()).collect(),
            conf.repos().map(|r| r.name().to_string()).collect(),
        )
    }
}

impl From<Conf> for ConfStore {
    fn from(conf: Conf) -> Self {
        Self::from_conf(conf)
    }
}

impl TryFrom<&str> for ConfStore {
    type Error = ConfError;

    fn try_from(text: &str) -> Result<Self> {
        Ok(Self::from_conf(text.parse()?))
    }
}
