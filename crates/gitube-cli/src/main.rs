//! Gitube CLI - edit gitolite configuration files.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// Gitube - manage gitolite access rules
#[derive(Parser, Debug)]
#[command(name = "gitube")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to gitolite.conf
    #[arg(short, long, global = true, default_value = commands::DEFAULT_CONF_PATH)]
    conf: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the configuration in canonical form
    Show {
        /// Print the parsed model as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse the configuration and report what it defines
    Check,

    /// Rewrite the configuration in canonical form
    Fmt {
        /// Fail instead of rewriting if the file is not canonical
        #[arg(long)]
        check: bool,
    },

    /// Manage groups
    Group {
        #[command(subcommand)]
        command: GroupCommands,
    },

    /// Manage repository rules
    Repo {
        #[command(subcommand)]
        command: RepoCommands,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug)]
enum GroupCommands {
    /// Add users to a group, creating it if needed
    Add {
        /// Group name (without '@')
        name: String,
        /// Users or @group references
        #[arg(required = true)]
        users: Vec<String>,
    },

    /// Remove users from a group
    Remove {
        /// Group name (without '@')
        name: String,
        /// Users or @group references
        #[arg(required = true)]
        users: Vec<String>,
    },

    /// Delete a group
    Delete {
        /// Group name (without '@')
        name: String,
    },
}

#[derive(Subcommand, Debug)]
enum RepoCommands {
    /// Grant a permission, creating the repository if needed
    Grant {
        /// Repository name
        repo: String,
        /// Permission spec (R, RW, RW+, RWC, RW+CD, -, ...)
        permission: String,
        /// Users or @group references
        #[arg(required = true)]
        grantees: Vec<String>,
        /// Restrict the rule to a ref pattern
        #[arg(short, long, default_value = "")]
        refspec: String,
    },

    /// Remove every rule of the given grantees
    Revoke {
        /// Repository name
        repo: String,
        /// Users or @group references
        #[arg(required = true)]
        grantees: Vec<String>,
    },

    /// Delete a repository block
    Delete {
        /// Repository name
        repo: String,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let default_filter = format!("gitube={log_level},gitube_gitolite={log_level}");
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let conf = cli.conf.as_path();
    let result = match cli.command {
        Commands::Show { json } => commands::show(conf, json),
        Commands::Check => commands::check(conf),
        Commands::Fmt { check } => commands::fmt(conf, check),
        Commands::Group { command } => match command {
            GroupCommands::Add { name, users } => commands::group_add(conf, &name, &users),
            GroupCommands::Remove { name, users } => commands::group_remove(conf, &name, &users),
            GroupCommands::Delete { name } => commands::group_delete(conf, &name),
        },
        Commands::Repo { command } => match command {
            RepoCommands::Grant {
                repo,
                permission,
                grantees,
                refspec,
            } => commands::repo_grant(conf, &repo, &permission, &refspec, &grantees),
            RepoCommands::Revoke { repo, grantees } => {
                commands::repo_revoke(conf, &repo, &grantees)
            }
            RepoCommands::Delete { repo } => commands::repo_delete(conf, &repo),
        },
        Commands::Version => {
            println!("gitube {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
