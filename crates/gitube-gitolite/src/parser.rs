//! Line-oriented parser for `gitolite.conf` text.
//!
//! Recognized line shapes:
//!
//! ```text
//! @staff      =   @interns alice          # group definition
//! repo gitolite tsh                       # opens a repo block
//!     RW+     =   sitaram                 # rule, applies to every repo in the block
//!     RW  dev =   alice bob               # rule restricted to a refspec
//!     config  hooks.mailinglist = a@b.c   # git-config setting
//!     option  deny-rules = 1              # gitolite option
//! ```
//!
//! Comments (`#` to end of line) and blank lines are discarded. Any other
//! line is an error; the parser never skips input it does not understand.

use crate::conf::Conf;
use crate::error::{ConfError, Result};
use crate::group::Group;
use crate::permission::Permission;
use crate::repo::{Repo, SettingKind};

/// Parse a whole document into a fresh [`Conf`].
pub(crate) fn parse(text: &str) -> Result<Conf> {
    let mut conf = Conf::new();
    // Names opened by the most recent `repo` header.
    let mut block: Vec<String> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_comment(raw).trim();
        let Some(first) = line.split_whitespace().next() else {
            continue;
        };

        if first.starts_with('@') {
            let group = parse_group(line, line_no)?;
            tracing::trace!(
                line = line_no,
                group = %group.name(),
                members = group.len(),
                "group definition"
            );
            conf.add_group(group);
            block.clear();
        } else if first == "repo" {
            block = parse_repo_header(line, line_no)?;
            tracing::debug!(line = line_no, repos = ?block, "opened repo block");
            for name in &block {
                conf.add_repo(Repo::new(name.clone()));
            }
        } else if block.is_empty() {
            return Err(ConfError::parse(
                line_no,
                format!("unexpected line outside of a repo block: '{line}'"),
            ));
        } else if let Some(kind) = SettingKind::from_keyword(first) {
            let (key, value) = parse_setting(line, first, line_no)?;
            for name in &block {
                conf.get_repo_mut(name)?.set(kind, key, value);
            }
        } else {
            let (permission, refspec, grantees) = parse_rule(line, line_no)?;
            tracing::trace!(line = line_no, %permission, %refspec, ?grantees, "permission rule");
            for name in &block {
                conf.get_repo_mut(name)?
                    .add_permission(permission, &refspec, grantees.iter().copied());
            }
        }
    }

    tracing::debug!(
        groups = conf.groups().len(),
        repos = conf.repos().len(),
        "parsed gitolite configuration"
    );
    Ok(conf)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Split at the first `=`, or fail with `what` in the message.
fn split_assignment<'a>(
    line: &'a str,
    what: &str,
    line_no: usize,
) -> Result<(&'a str, &'a str)> {
    line.split_once('=')
        .ok_or_else(|| ConfError::parse(line_no, format!("{what} is missing '='")))
}

fn parse_group(line: &str, line_no: usize) -> Result<Group> {
    let (lhs, rhs) = split_assignment(line, "group definition", line_no)?;

    let mut lhs_tokens = lhs.split_whitespace();
    let name = match (lhs_tokens.next(), lhs_tokens.next()) {
        (Some(token), None) => token.trim_start_matches('@'),
        _ => {
            return Err(ConfError::parse(
                line_no,
                format!("invalid group name: '{}'", lhs.trim()),
            ))
        }
    };
    if name.is_empty() {
        return Err(ConfError::parse(line_no, "group name is empty"));
    }

    let members = rhs.split_whitespace().map(String::from).collect();
    Ok(Group::with_users(name, members))
}

fn parse_repo_header(line: &str, line_no: usize) -> Result<Vec<String>> {
    let names: Vec<String> = line.split_whitespace().skip(1).map(String::from).collect();
    if names.is_empty() {
        return Err(ConfError::parse(line_no, "repo line names no repository"));
    }
    Ok(names)
}

fn parse_rule(line: &str, line_no: usize) -> Result<(Permission, String, Vec<&str>)> {
    let (lhs, rhs) = split_assignment(line, "permission line", line_no)?;

    let mut lhs_tokens = lhs.split_whitespace();
    let spec = lhs_tokens
        .next()
        .ok_or_else(|| ConfError::parse(line_no, "permission line has no permission"))?;
    let permission: Permission = spec
        .parse()
        .map_err(|e: ConfError| ConfError::parse(line_no, e.to_string()))?;
    let refspec = lhs_tokens.collect::<Vec<_>>().join(" ");

    let grantees: Vec<&str> = rhs.split_whitespace().collect();
    if grantees.is_empty() {
        return Err(ConfError::parse(line_no, "permission line has no grantees"));
    }

    Ok((permission, refspec, grantees))
}

fn parse_setting<'a>(
    line: &'a str,
    keyword: &str,
    line_no: usize,
) -> Result<(&'a str, &'a str)> {
    let (lhs, rhs) = split_assignment(line, keyword, line_no)?;
    let lhs = lhs.trim_start();
    let key = lhs.strip_prefix(keyword).unwrap_or(lhs).trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return Err(ConfError::parse(
            line_no,
            format!("invalid {keyword} key: '{key}'"),
        ));
    }
    Ok((key, rhs.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "
@developers     =   dilbert alice bob
@interns        =   ashok sitaram
@staff          =   @interns @developers

repo gitolite tsh gitpod
    RW+     =   sitaram
    RW  dev =   alice bob
    R       =   @all

repo foo
    RW      =   alice
";

    fn parse_err(text: &str) -> (usize, String) {
        match parse(text) {
            Err(ConfError::Parse { line, message }) => (line, message),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_groups() {
        let conf = parse(SAMPLE).unwrap();

        let developers = conf.get_group("developers").unwrap();
        assert_eq!(developers.users(), ["dilbert", "alice", "bob"]);

        let staff = conf.get_group("staff").unwrap();
        assert!(staff.has_user("@interns"));
        assert!(staff.has_user("@developers"));
        assert!(!staff.has_user("alice"));
    }

    #[test]
    fn test_parse_multi_name_block() {
        let conf = parse(SAMPLE).unwrap();

        for name in ["gitolite", "tsh", "gitpod"] {
            let repo = conf.get_repo(name).unwrap();
            assert_eq!(repo.permission("sitaram").as_deref(), Some("RW+  = sitaram"));
            assert_eq!(repo.permission("bob").as_deref(), Some("RW dev = bob"));
            assert_eq!(repo.permission("alice").as_deref(), Some("RW dev = alice"));
            assert_eq!(repo.permission("@all").as_deref(), Some("R  = @all"));
            assert_eq!(repo.rules().len(), 4);
        }

        let foo = conf.get_repo("foo").unwrap();
        assert_eq!(foo.permission("alice").as_deref(), Some("RW  = alice"));
        assert_eq!(foo.rules().len(), 1);
    }

    #[test]
    fn test_parse_comments_and_settings() {
        let text = "\
# admin group
@admins = boss   # the boss

repo gitube
    RW+ = @admins
    config hooks.mailinglist = dev@example.com
    option deny-rules = 1
";
        let conf = parse(text).unwrap();
        let repo = conf.get_repo("gitube").unwrap();
        assert_eq!(repo.settings().len(), 2);
        assert_eq!(repo.settings()[0].key, "hooks.mailinglist");
        assert_eq!(repo.settings()[0].value, "dev@example.com");
        assert_eq!(repo.settings()[1].kind, SettingKind::Option);
        assert_eq!(conf.get_group("admins").unwrap().users(), ["boss"]);
    }

    #[test]
    fn test_parse_multi_token_refspec() {
        let conf = parse("repo r\n    RW master dev = alice\n").unwrap();
        let repo = conf.get_repo("r").unwrap();
        assert_eq!(repo.permission("alice").as_deref(), Some("RW master dev = alice"));
    }

    #[test]
    fn test_parse_tight_spacing() {
        let conf = parse("@g=a b\nrepo r\n RW+=@g\n").unwrap();
        assert_eq!(conf.get_group("g").unwrap().users(), ["a", "b"]);
        assert_eq!(
            conf.get_repo("r").unwrap().permission("@g").as_deref(),
            Some("RW+  = @g")
        );
    }

    #[test]
    fn test_empty_group_definition() {
        let conf = parse("@empty =\n").unwrap();
        assert!(conf.get_group("empty").unwrap().is_empty());
    }

    #[test]
    fn test_group_members_kept_verbatim() {
        let conf = parse("@g = a b a\n").unwrap();
        let group = conf.get_group("g").unwrap();
        assert_eq!(group.users(), ["a", "b", "a"]);
        assert_eq!(group.to_string(), "@g = a b a");

        let reparsed = parse(&conf.to_string()).unwrap();
        assert_eq!(reparsed, conf);
    }

    #[test]
    fn test_parse_merge_modifier() {
        let conf = parse("repo foo\n    RWM = alice\n    RW+CDM dev = bob\n").unwrap();
        let foo = conf.get_repo("foo").unwrap();

        assert_eq!(foo.permission("alice").as_deref(), Some("RWM  = alice"));
        assert_eq!(foo.permission("bob").as_deref(), Some("RW+CDM dev = bob"));
        assert!(foo.rules().iter().all(|r| r.permission.can_merge()));
        assert!(foo.rules()[1].permission.can_delete());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_err("repo\n").0, 1);
        assert_eq!(
            parse_err("\nrepo foo\n    RW alice\n"),
            (3, "permission line is missing '='".into())
        );
        assert_eq!(parse_err("repo foo\n    = alice\n").0, 2);
        assert_eq!(
            parse_err("repo foo\n    RW =\n"),
            (2, "permission line has no grantees".into())
        );
        assert!(parse_err("repo foo\n    WR = alice\n").1.contains("invalid permission"));
        assert_eq!(parse_err("@developers alice bob\n").0, 1);
        assert_eq!(parse_err("@ = alice\n").0, 1);
        assert_eq!(parse_err("@a b = alice\n").0, 1);
        assert_eq!(parse_err("RW = alice\n").0, 1);
        assert_eq!(parse_err("repo foo\n    config = x\n").0, 2);
    }

    #[test]
    fn test_group_line_closes_repo_block() {
        let (line, _) = parse_err("repo foo\n    RW = alice\n@g = a\n    RW = bob\n");
        assert_eq!(line, 4);
    }

    #[test]
    fn test_repeated_repo_block_overwrites() {
        let conf = parse("repo foo\n    RW = alice\nrepo foo\n    R = bob\n").unwrap();
        let foo = conf.get_repo("foo").unwrap();
        assert!(!foo.has_grantee("alice"));
        assert_eq!(foo.permission("bob").as_deref(), Some("R  = bob"));
    }
}
