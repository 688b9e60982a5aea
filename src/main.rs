//! vecoh CLI - element-level version control for html and xml files

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vecoh::ops::{checkout, fsck, history_of, save, CheckoutOptions};
use vecoh::types::DocumentKind;
use vecoh::{list_pointers, list_pointers_matching, Error, Repo};

#[derive(Parser)]
#[command(name = "vecoh")]
#[command(about = "version control for html and xml, one element at a time")]
#[command(version)]
struct Cli {
    /// directory to look for the repository from
    #[arg(short = 'C', long, default_value = ".")]
    repo: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// initialize a new repository
    Init {
        /// path to create repository at
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// save the current content of one or more files
    Save {
        /// files or glob patterns
        #[arg(required = true)]
        files: Vec<String>,

        /// parse as html or xml regardless of extension
        #[arg(short = 't', long = "type")]
        kind: Option<String>,

        /// commit message
        #[arg(short, long, default_value = "")]
        message: String,
    },

    /// show the commit history of tracked files
    History {
        /// tracked paths or glob patterns (all tracked files if omitted)
        patterns: Vec<String>,
    },

    /// restore a file to a saved revision
    Checkout {
        /// file to restore
        file: PathBuf,

        /// commit hash or unique prefix
        hash: String,

        /// overwrite unsaved changes
        #[arg(short, long)]
        force: bool,
    },

    /// verify repository integrity
    Fsck,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("VECOH_LOG")
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> vecoh::Result<ExitCode> {
    match cli.command {
        Commands::Init { path } => {
            let repo = Repo::init(&path)?;
            println!("initialized vecoh repository at {}", repo.root().display());
        }

        Commands::Save {
            files,
            kind,
            message,
        } => {
            let repo = Repo::discover(&cli.repo)?;
            let kind = kind.map(|k| k.parse::<DocumentKind>()).transpose()?;

            for file in expand_files(&files)? {
                let hash = save(&repo, &file, kind, &message)?;
                println!("{} {}", hash, file.display());
            }
        }

        Commands::History { patterns } => {
            let repo = Repo::discover(&cli.repo)?;
            let paths = tracked_matching(&repo, &patterns)?;

            for path in paths {
                println!("\n{}", path);
                println!("{}", "-".repeat(path.chars().count()));
                for entry in history_of(&repo, &path)? {
                    println!("{}\n", entry?);
                }
            }
        }

        Commands::Checkout { file, hash, force } => {
            let repo = Repo::discover(&cli.repo)?;
            let resolved = checkout(&repo, &file, &hash, CheckoutOptions { force })?;
            println!("checked out {} to {}", resolved, file.display());
        }

        Commands::Fsck => {
            let repo = Repo::discover(&cli.repo)?;
            let report = fsck(&repo)?;

            println!("objects checked: {}", report.objects_checked);
            println!("commits checked: {}", report.commits_checked);

            if !report.corrupt_objects.is_empty() {
                println!("\ncorrupt objects:");
                for obj in &report.corrupt_objects {
                    println!("  {}: {}", obj.hash, obj.message);
                }
            }

            if !report.missing_objects.is_empty() {
                println!("\nmissing objects:");
                for obj in &report.missing_objects {
                    println!(
                        "  {} {} (referenced by {})",
                        obj.object_type, obj.hash, obj.referenced_by
                    );
                }
            }

            if !report.broken_chains.is_empty() {
                println!("\nbroken histories:");
                for chain in &report.broken_chains {
                    println!("  {}: {}", chain.path, chain.message);
                }
            }

            if !report.dangling_objects.is_empty() {
                println!("\ndangling objects: {}", report.dangling_objects.len());
            }

            if report.is_ok() {
                println!("\nrepository is healthy");
            } else {
                println!("\nrepository has issues");
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// expand each argument as a glob; an argument matching nothing is an error
fn expand_files(patterns: &[String]) -> vecoh::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let matches = glob::glob(pattern).map_err(|e| Error::InvalidPath(e.to_string()))?;
        let before = files.len();
        for entry in matches.flatten() {
            if entry.is_file() {
                files.push(entry);
            }
        }
        if files.len() == before {
            return Err(Error::NoMatchingPath(pattern.clone()));
        }
    }

    Ok(files)
}

/// tracked paths named by the patterns, or every tracked path
///
/// a pattern matches working files on disk and, for files that no longer
/// exist, tracked paths relative to the repository root.
fn tracked_matching(repo: &Repo, patterns: &[String]) -> vecoh::Result<BTreeSet<String>> {
    if patterns.is_empty() {
        return Ok(list_pointers(repo)?.into_iter().collect());
    }

    let mut paths = BTreeSet::new();
    for pattern in patterns {
        let before = paths.len();

        if let Ok(matches) = glob::glob(pattern) {
            for entry in matches.flatten() {
                if let Ok(tracked) = repo.tracked_path(&entry) {
                    if vecoh::is_tracked(repo, &tracked)? {
                        paths.insert(tracked);
                    }
                }
            }
        }
        paths.extend(list_pointers_matching(repo, pattern)?);

        if paths.len() == before {
            return Err(Error::NoMatchingPath(pattern.clone()));
        }
    }

    Ok(paths)
}
