//! Repository blocks (`repo name` followed by rule lines).

use crate::named::Named;
use crate::permission::{Permission, PermissionRule};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a non-rule line inside a repo block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingKind {
    /// `config <git-config-key> = <value>`
    Config,
    /// `option <gitolite-option> = <value>`
    Option,
}

impl SettingKind {
    /// Leading keyword of the line.
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKind::Config => "config",
            SettingKind::Option => "option",
        }
    }

    /// Match a line's leading keyword.
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "config" => Some(SettingKind::Config),
            "option" => Some(SettingKind::Option),
            _ => None,
        }
    }
}

/// A `config`/`option` line attached to a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSetting {
    /// Line keyword.
    pub kind: SettingKind,
    /// Setting key, e.g. `hooks.mailinglist`.
    pub key: String,
    /// Raw value text, possibly empty.
    pub value: String,
}

impl fmt::Display for RepoSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} = {}", self.kind.as_str(), self.key, self.value)
    }
}

/// A repository and its permission rules.
///
/// Rules are kept in insertion order and keyed by grantee. A grantee may
/// hold several rules, e.g. `RW` on all refs plus a `-` on `master`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    name: String,
    rules: Vec<PermissionRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    settings: Vec<RepoSetting>,
}

impl Repo {
    /// Create a repository with no rules.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
            settings: Vec::new(),
        }
    }

    /// Repository name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All rules in insertion order.
    pub fn rules(&self) -> &[PermissionRule] {
        &self.rules
    }

    /// `config`/`option` settings in insertion order.
    pub fn settings(&self) -> &[RepoSetting] {
        &self.settings
    }

    /// Grant `permission` on `refspec` to each grantee.
    ///
    /// Every grantee gets its own rule line. An empty refspec applies the
    /// rule to all refs. Re-adding an identical rule is a no-op.
    pub fn add_permission<I, S>(&mut self, permission: Permission, refspec: &str, grantees: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for grantee in grantees {
            let rule = PermissionRule::new(permission, refspec, grantee);
            if !self.rules.contains(&rule) {
                self.rules.push(rule);
            }
        }
    }

    /// Drop every rule of each named grantee.
    pub fn del_permission<I, S>(&mut self, grantees: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for grantee in grantees {
            let grantee = grantee.as_ref();
            self.rules.retain(|r| r.grantee != grantee);
        }
    }

    /// Check if any rule applies to `grantee`.
    pub fn has_grantee(&self, grantee: &str) -> bool {
        self.rules.iter().any(|r| r.grantee == grantee)
    }

    /// Rendered line of the most recently added rule for `grantee`.
    pub fn permission(&self, grantee: &str) -> Option<String> {
        self.rules
            .iter()
            .rev()
            .find(|r| r.grantee == grantee)
            .map(PermissionRule::line)
    }

    /// All rules for `grantee`, in insertion order.
    pub fn permissions_for<'a>(
        &'a self,
        grantee: &'a str,
    ) -> impl Iterator<Item = &'a PermissionRule> + 'a {
        self.rules.iter().filter(move |r| r.grantee == grantee)
    }

    /// `(grantee, rendered line)` pairs in insertion order.
    pub fn permissions(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        self.rules.iter().map(|r| (r.grantee.as_str(), r.line()))
    }

    /// Attach a `config` or `option` line. A later setting with the same
    /// kind and key replaces the earlier one.
    pub fn set(&mut self, kind: SettingKind, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.settings.iter_mut().find(|s| s.kind == kind && s.key == key) {
            Some(existing) => existing.value = value,
            None => self.settings.push(RepoSetting { kind, key, value }),
        }
    }

    /// Remove a setting. Absent keys are ignored.
    pub fn unset(&mut self, kind: SettingKind, key: &str) {
        self.settings.retain(|s| !(s.kind == kind && s.key == key));
    }
}

impl Named for Repo {
    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "repo {}", self.name)?;
        for rule in &self.rules {
            writeln!(f, "    {}", rule)?;
        }
        for setting in &self.settings {
            writeln!(f, "    {}", setting)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn matches(pattern: &str, text: &str) -> bool {
        Regex::new(pattern).unwrap().is_match(text)
    }

    #[test]
    fn test_add_permission() {
        let mut repo = Repo::new("gitube");
        repo.add_permission(Permission::WRITE, "", ["harry", "harryxu"]);
        repo.add_permission(Permission::DENY, "master", ["harry"]);
        let repo_str = repo.to_string();

        assert!(matches(r"repo\sgitube", &repo_str));
        assert!(matches(r"RW\s+=\sharry\n", &repo_str));
        assert!(matches(r"RW\s+=\sharryxu", &repo_str));
        assert!(matches(r"-\smaster\s+=\sharry", &repo_str));

        assert_eq!(
            repo_str,
            "repo gitube\n    RW  = harry\n    RW  = harryxu\n    - master = harry\n"
        );
    }

    #[test]
    fn test_del_permission() {
        let mut repo = Repo::new("gitube");
        repo.add_permission(Permission::WRITE, "", ["harry"]);
        repo.add_permission(Permission::DENY, "master", ["harry"]);
        repo.add_permission(Permission::READ, "", ["flash"]);
        let repo_str = repo.to_string();

        assert!(matches(r"RW\s+=\sharry", &repo_str));
        assert!(matches(r"-\smaster\s+=\sharry", &repo_str));

        repo.del_permission(["harry"]);
        let repo_str = repo.to_string();

        assert!(!matches(r"RW\s+=\sharry", &repo_str));
        assert!(!matches(r"-\smaster\s+=\sharry", &repo_str));
        assert!(!repo.has_grantee("harry"));
        assert_eq!(repo.permission("flash").as_deref(), Some("R  = flash"));

        // Absent grantees are ignored
        repo.del_permission(["nobody"]);
        assert_eq!(repo.rules().len(), 1);
    }

    #[test]
    fn test_multi_grantee_equals_single_calls() {
        let mut batched = Repo::new("r");
        batched.add_permission(Permission::WRITE, "", ["alice", "bob"]);

        let mut single = Repo::new("r");
        single.add_permission(Permission::WRITE, "", ["alice"]);
        single.add_permission(Permission::WRITE, "", ["bob"]);

        assert_eq!(batched, single);
    }

    #[test]
    fn test_duplicate_rule_ignored() {
        let mut repo = Repo::new("r");
        repo.add_permission(Permission::WRITE, "dev", ["alice"]);
        repo.add_permission(Permission::WRITE, "dev", ["alice"]);
        assert_eq!(repo.rules().len(), 1);
    }

    #[test]
    fn test_permission_lookup() {
        let mut repo = Repo::new("gitube");
        repo.add_permission(Permission::WRITE, "", ["harry"]);
        repo.add_permission(Permission::DENY, "master", ["harry"]);

        assert_eq!(repo.permission("harry").as_deref(), Some("- master = harry"));
        assert_eq!(repo.permissions_for("harry").count(), 2);
        assert!(repo.permission("nobody").is_none());

        let pairs: Vec<_> = repo.permissions().collect();
        assert_eq!(
            pairs,
            vec![
                ("harry", "RW  = harry".to_string()),
                ("harry", "- master = harry".to_string()),
            ]
        );
    }

    #[test]
    fn test_settings_render_after_rules() {
        let mut repo = Repo::new("foo");
        repo.set(SettingKind::Config, "hooks.mailinglist", "dev@example.com");
        repo.add_permission(Permission::READ, "", ["@all"]);
        repo.set(SettingKind::Option, "deny-rules", "1");
        repo.set(SettingKind::Config, "hooks.mailinglist", "ops@example.com");

        assert_eq!(
            repo.to_string(),
            concat!(
                "repo foo\n",
                "    R  = @all\n",
                "    config hooks.mailinglist = ops@example.com\n",
                "    option deny-rules = 1\n",
            )
        );

        repo.unset(SettingKind::Option, "deny-rules");
        assert_eq!(repo.settings().len(), 1);
    }

    #[test]
    fn test_empty_repo_render() {
        assert_eq!(Repo::new("empty").to_string(), "repo empty\n");
    }
}
