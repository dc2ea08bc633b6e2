//! Group definitions (`@name = members...`).

use crate::named::Named;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named, ordered set of users or `@group` references.
///
/// Members are stored verbatim. Nested group references are not expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    name: String,
    users: Vec<String>,
}

impl Group {
    /// Create a new empty group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            users: Vec::new(),
        }
    }

    /// Create a group holding `users` exactly as given, duplicates included.
    pub(crate) fn with_users(name: impl Into<String>, users: Vec<String>) -> Self {
        Self {
            name: name.into(),
            users,
        }
    }

    /// Group name, without the leading `@`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in insertion order.
    pub fn users(&self) -> &[String] {
        &self.users
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Check if the group has no members.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Append users not already present, keeping their order.
    pub fn add_users<I, S>(&mut self, users: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for user in users {
            let user = user.into();
            if !self.has_user(&user) {
                self.users.push(user);
            }
        }
    }

    /// Remove the given users. Absent names are ignored.
    pub fn del_users<I, S>(&mut self, users: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for user in users {
            let user = user.as_ref();
            self.users.retain(|u| u != user);
        }
    }

    /// Check if a user (or `@group` reference) is a member.
    pub fn has_user(&self, user: &str) -> bool {
        self.users.iter().any(|u| u == user)
    }
}

impl Named for Group {
    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{} = {}", self.name, self.users.join(" "))
    }
}
