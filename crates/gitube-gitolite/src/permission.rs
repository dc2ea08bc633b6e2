//! Permission specs and rendered permission rules.

use crate::error::ConfError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Base access of a permission spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// Create wild repositories (`C`).
    Create,
    /// Clone and fetch (`R`).
    Read,
    /// Push fast-forward updates (`RW`).
    Write,
    /// Push including rewinds (`RW+`).
    Rewind,
    /// Deny rule (`-`).
    Deny,
}

impl Access {
    fn as_str(&self) -> &'static str {
        match self {
            Access::Create => "C",
            Access::Read => "R",
            Access::Write => "RW",
            Access::Rewind => "RW+",
            Access::Deny => "-",
        }
    }

    const fn pushes(&self) -> bool {
        matches!(self, Access::Write | Access::Rewind)
    }
}

/// A gitolite access spec, the first token of a rule line.
///
/// A base access optionally followed, for `RW`/`RW+`, by the `C` (create
/// ref), `D` (delete ref) and `M` (merge commit) modifiers. Renders in
/// gitolite's canonical order, e.g. `RW+CDM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Permission {
    access: Access,
    create: bool,
    delete: bool,
    merge: bool,
}

impl Permission {
    /// `C`
    pub const CREATE: Permission = Permission::new(Access::Create);
    /// `R`
    pub const READ: Permission = Permission::new(Access::Read);
    /// `RW`
    pub const WRITE: Permission = Permission::new(Access::Write);
    /// `RW+`
    pub const REWIND: Permission = Permission::new(Access::Rewind);
    /// `-`
    pub const DENY: Permission = Permission::new(Access::Deny);

    /// A spec with no modifiers.
    pub const fn new(access: Access) -> Self {
        Self {
            access,
            create: false,
            delete: false,
            merge: false,
        }
    }

    /// Add the `C` modifier. Ignored unless the base access pushes.
    pub const fn with_create(self) -> Self {
        Self {
            create: self.access.pushes(),
            ..self
        }
    }

    /// Add the `D` modifier. Ignored unless the base access pushes.
    pub const fn with_delete(self) -> Self {
        Self {
            delete: self.access.pushes(),
            ..self
        }
    }

    /// Add the `M` modifier. Ignored unless the base access pushes.
    pub const fn with_merge(self) -> Self {
        Self {
            merge: self.access.pushes(),
            ..self
        }
    }

    /// Every valid spec, in canonical form.
    pub fn all() -> Vec<Permission> {
        let mut all = vec![Self::CREATE, Self::READ, Self::DENY];
        for base in [Self::WRITE, Self::REWIND] {
            for create in [false, true] {
                for delete in [false, true] {
                    for merge in [false, true] {
                        all.push(Permission {
                            create,
                            delete,
                            merge,
                            ..base
                        });
                    }
                }
            }
        }
        all
    }

    /// Base access without modifiers.
    pub fn access(&self) -> Access {
        self.access
    }

    /// Check if the spec allows clone/fetch.
    pub fn can_read(&self) -> bool {
        matches!(self.access, Access::Read | Access::Write | Access::Rewind)
    }

    /// Check if the spec allows pushing.
    pub fn can_write(&self) -> bool {
        self.access.pushes()
    }

    /// Check if the spec allows non-fast-forward pushes.
    pub fn can_rewind(&self) -> bool {
        self.access == Access::Rewind
    }

    /// Check if the spec allows creating refs (or wild repos for `C`).
    pub fn can_create(&self) -> bool {
        self.create || self.access == Access::Create
    }

    /// Check if the spec allows deleting refs.
    pub fn can_delete(&self) -> bool {
        self.delete
    }

    /// Check if the spec allows pushing merge commits where gitolite
    /// restricts them.
    pub fn can_merge(&self) -> bool {
        self.merge
    }

    /// Check if this is a deny rule.
    pub fn is_deny(&self) -> bool {
        self.access == Access::Deny
    }
}

impl FromStr for Permission {
    type Err = ConfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfError::InvalidPermission(s.to_string());

        match s {
            "C" => return Ok(Self::CREATE),
            "R" => return Ok(Self::READ),
            "-" => return Ok(Self::DENY),
            _ => {}
        }

        let rest = s.strip_prefix("RW").ok_or_else(invalid)?;
        let (base, rest) = match rest.strip_prefix('+') {
            Some(rest) => (Self::REWIND, rest),
            None => (Self::WRITE, rest),
        };
        let (merge, rest) = match rest.strip_suffix('M') {
            Some(rest) => (true, rest),
            None => (false, rest),
        };
        // gitolite accepts C and D in either order
        let (create, delete) = match rest {
            "" => (false, false),
            "C" => (true, false),
            "D" => (false, true),
            "CD" | "DC" => (true, true),
            _ => return Err(invalid()),
        };

        Ok(Permission {
            create,
            delete,
            merge,
            ..base
        })
    }
}

impl TryFrom<String> for Permission {
    type Error = ConfError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Permission> for String {
    fn from(p: Permission) -> Self {
        p.to_string()
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.access.as_str())?;
        if self.create {
            f.write_str("C")?;
        }
        if self.delete {
            f.write_str("D")?;
        }
        if self.merge {
            f.write_str("M")?;
        }
        Ok(())
    }
}

/// One permission rule of a repository: a single configuration line.
///
/// Rendered as `<perm> <refspec> = <grantee>`. With an empty refspec this
/// collapses to `<perm>  = <grantee>` (two spaces), which existing
/// configuration consumers expect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionRule {
    /// Access spec.
    pub permission: Permission,
    /// Ref pattern the rule is restricted to, empty for all refs.
    pub refspec: String,
    /// User or `@group` the rule applies to.
    pub grantee: String,
}

impl PermissionRule {
    /// Create a new rule.
    pub fn new(
        permission: Permission,
        refspec: impl Into<String>,
        grantee: impl Into<String>,
    ) -> Self {
        Self {
            permission,
            refspec: refspec.into(),
            grantee: grantee.into(),
        }
    }

    /// Render the rule as a configuration line, without indentation.
    pub fn line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PermissionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} = {}", self.permission, self.refspec, self.grantee)
    }
}
