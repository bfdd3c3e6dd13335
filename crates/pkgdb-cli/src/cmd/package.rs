use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::{Args, Subcommand};
use pkgdb_core::{
    batch::{self, BatchRequest, BatchResult},
    info::{self, PackageInfo},
    repository::{Repository, YamlRepository},
    types::TransitionKind,
};
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum PackageSubcommand {
    /// Show a package and its listings
    Info {
        name: String,
        /// Restrict to these branches (repeatable: --branch f18 --branch master)
        #[arg(long = "branch")]
        branches: Vec<String>,
    },
    /// Give up ownership of packages on the given branches
    Orphan(Targets),
    /// Take ownership of orphaned packages
    Unorphan {
        #[command(flatten)]
        targets: Targets,
        /// New point of contact (defaults to --user)
        #[arg(long)]
        poc: Option<String>,
    },
    /// Retire packages on the given branches
    Retire {
        #[command(flatten)]
        targets: Targets,
        /// Also set the critical-path flag
        #[arg(long)]
        critpath: Option<bool>,
    },
    /// Bring retired packages back (admin only)
    Unretire {
        #[command(flatten)]
        targets: Targets,
        /// Also set the critical-path flag
        #[arg(long)]
        critpath: Option<bool>,
    },
}

#[derive(Args)]
pub struct Targets {
    /// Package names
    #[arg(required = true)]
    packages: Vec<String>,
    /// Branch names (repeatable: --branch f18 --branch master)
    #[arg(long = "branch", required = true)]
    branches: Vec<String>,
}

impl Targets {
    fn request(self, kind: TransitionKind) -> BatchRequest {
        BatchRequest::new(kind, self.packages, self.branches)
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(
    root: &Path,
    user: Option<&str>,
    subcmd: PackageSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    match subcmd {
        PackageSubcommand::Info { name, branches } => show(root, &name, &branches, json),
        PackageSubcommand::Orphan(targets) => {
            apply(root, user, targets.request(TransitionKind::Orphan), json)
        }
        PackageSubcommand::Unorphan { targets, poc } => {
            let user = require_user(user)?;
            let request = targets
                .request(TransitionKind::Unorphan)
                .with_poc(poc.unwrap_or_else(|| user.to_string()));
            apply(root, Some(user), request, json)
        }
        PackageSubcommand::Retire { targets, critpath } => {
            let mut request = targets.request(TransitionKind::Retire);
            request.critpath = critpath;
            apply(root, user, request, json)
        }
        PackageSubcommand::Unretire { targets, critpath } => {
            let mut request = targets.request(TransitionKind::Unretire);
            request.critpath = critpath;
            apply(root, user, request, json)
        }
    }
}

fn require_user(user: Option<&str>) -> anyhow::Result<&str> {
    user.filter(|u| !u.trim().is_empty())
        .context("no caller: pass --user or set PKGDB_USER")
}

// ---------------------------------------------------------------------------
// transitions
// ---------------------------------------------------------------------------

fn apply(
    root: &Path,
    user: Option<&str>,
    request: BatchRequest,
    json: bool,
) -> anyhow::Result<()> {
    let user = require_user(user)?;
    let result = batch::apply_at(root, user, &request)
        .with_context(|| format!("failed to {} packages", request.transition))?;

    if json {
        print_json(&result)?;
    } else {
        print_result(&request, &result);
    }

    if !result.committed {
        anyhow::bail!("no listing was updated");
    }
    Ok(())
}

fn print_result(request: &BatchRequest, result: &BatchResult) {
    for message in result.messages.iter().filter(|m| !m.is_empty()) {
        println!("{message}");
    }
    if result.committed {
        println!(
            "{}: {} listing(s) updated",
            request.transition,
            result.messages.len()
        );
    }
    for error in &result.errors {
        eprintln!("  {error}");
    }
}

// ---------------------------------------------------------------------------
// info
// ---------------------------------------------------------------------------

fn show(root: &Path, name: &str, branches: &[String], json: bool) -> anyhow::Result<()> {
    let db = YamlRepository::new(root)
        .snapshot()
        .context("failed to load package database")?;
    let info = info::package_info(&db, name, branches)?;

    if json {
        return print_json(&info);
    }
    print_info(&info);
    Ok(())
}

fn print_info(info: &PackageInfo) {
    println!("{}: {}", info.package.name, info.package.summary);
    if let Some(url) = &info.package.upstream_url {
        println!("upstream: {url}");
    }
    println!();

    if info.listings.is_empty() {
        println!("No listings.");
        return;
    }

    let rows = info
        .listings
        .iter()
        .map(|l| {
            vec![
                l.branch.clone(),
                l.status.to_string(),
                l.point_of_contact.clone(),
                if l.critpath { "yes" } else { "no" }.to_string(),
                l.committers.join(", "),
            ]
        })
        .collect();
    print_table(&["BRANCH", "STATUS", "POC", "CRITPATH", "COMMITTERS"], rows);
}
