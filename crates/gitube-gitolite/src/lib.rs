//! Model and text form of gitolite's `gitolite.conf`.
//!
//! This crate provides:
//! - **Groups**: `@name = members...` definitions
//! - **Repos**: repository blocks holding permission rules keyed by grantee
//! - **Conf**: the whole document, with a line-oriented parser and a
//!   canonical renderer
//! - **ConfStore**: a lock-guarded document for shared use
//!
//! Every entity renders through [`std::fmt::Display`].
//!
//! # Example
//!
//! ```
//! use gitube_gitolite::{Conf, Group, Permission, Repo};
//!
//! let mut developers = Group::new("developer");
//! developers.add_users(["harry", "harryxu"]);
//!
//! let mut repo = Repo::new("gitube");
//! repo.add_permission(Permission::WRITE, "", ["@developer"]);
//! repo.add_permission(Permission::DENY, "master", ["harryxu"]);
//!
//! let mut conf = Conf::new();
//! conf.add_group(developers);
//! conf.add_repo(repo);
//!
//! let text = conf.to_string();
//! assert_eq!(
//!     text,
//!     "@developer = harry harryxu\n\nrepo gitube\n    RW  = @developer\n    - master = harryxu\n"
//! );
//!
//! // Parsing the rendered text yields the same document.
//! let reparsed: Conf = text.parse().unwrap();
//! assert_eq!(reparsed, conf);
//! assert_eq!(
//!     reparsed.get_repo("gitube").unwrap().permission("harryxu").as_deref(),
//!     Some("- master = harryxu")
//! );
//! ```

mod conf;
mod error;
mod group;
mod named;
mod parser;
mod permission;
mod repo;
mod store;

pub use conf::Conf;
pub use error::{ConfError, Result};
pub use group::Group;
pub use named::{Named, NamedMap};
pub use permission::{Access, Permission, PermissionRule};
pub use repo::{Repo, RepoSetting, SettingKind};
pub use store::ConfStore;
