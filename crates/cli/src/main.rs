//! demark command-line tool.
//!
//! Provides the `resolve` subcommand that sweeps a directory tree for
//! conflict markers and collapses them per the policy document, plus
//! `init` / `validate` helpers for the policy document itself.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use demark_core::discover::discover_files;
use demark_core::pattern::PathMatcher;
use demark_core::policy::{PolicyDocument, PolicyRuleSet};
use demark_core::processor::FileProcessor;
use demark_core::report::{FileStatus, ReportBuilder, ResolveReport};

/// Default policy document name, looked up inside the scan root. Hidden, so
/// it is never itself a resolution candidate.
const POLICY_FILE_NAME: &str = ".demark.toml";

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// demark command-line tool.
#[derive(Parser, Debug)]
#[command(
    name = "demark",
    version,
    about = "Resolve merge-conflict markers across a tree by path policy"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve conflict markers under a root directory.
    Resolve {
        /// Directory to scan.
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Policy document (default: `.demark.toml` inside the root).
        #[arg(short, long)]
        policy: Option<PathBuf>,

        /// Write the JSON report here instead of stdout.
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Generate a default policy document.
    Init {
        /// Output path for the generated document.
        #[arg(short, long, default_value = POLICY_FILE_NAME)]
        output: PathBuf,
    },

    /// Validate a policy document.
    Validate {
        /// Policy document to check.
        #[arg(short, long, default_value = POLICY_FILE_NAME)]
        policy: PathBuf,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Resolve {
            root,
            policy,
            report,
        } => cmd_resolve(&root, policy.as_deref(), report.as_deref()),
        Commands::Init { output } => cmd_init(&output),
        Commands::Validate { policy } => cmd_validate(&policy),
    }
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

fn cmd_resolve(root: &Path, policy: Option<&Path>, report_path: Option<&Path>) -> Result<()> {
    let policy_path = policy
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.join(POLICY_FILE_NAME));

    // Built once up front and handed into every per-file call.
    let rules = PolicyRuleSet::load(&policy_path);

    let files = discover_files(root);
    info!(
        root = %root.display(),
        files = files.len(),
        rules = rules.len(),
        "starting resolve run"
    );

    let mut builder = ReportBuilder::new();
    for file in &files {
        builder.push(FileProcessor::process(file, root, &rules));
    }
    let report = builder.build();

    // Per-file outcomes never fail the run; only losing the report does.
    match report_path {
        Some(path) => {
            report
                .write_to_file(path)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            print_summary(&report);
            println!();
            println!("Report written to {}", path.display());
        }
        None => {
            println!("{}", report.to_json().context("failed to serialize report")?);
        }
    }

    Ok(())
}

fn cmd_init(output: &Path) -> Result<()> {
    let default_policy = r#"# demark policy document
#
# Patterns are shell-style globs matched against the whole path relative
# to the scan root, forward-slash separated. `*` matches across directory
# separators; scope a rule to one directory by writing the separator into
# the pattern (e.g. "scripts/*"). First match wins, `ours` rules first.
# Files matched by no rule keep both sides of each conflict.

[files]
ours   = []
theirs = []
"#;

    if output.exists() {
        anyhow::bail!(
            "file already exists: {}. Use a different path or remove the existing file.",
            output.display()
        );
    }

    std::fs::write(output, default_policy).context("failed to write policy document")?;

    println!("Default policy document written to {}", output.display());
    println!();
    println!("Next steps:");
    println!("  1. Add glob patterns to the ours/theirs lists");
    println!(
        "  2. Check the document with: demark validate --policy {}",
        output.display()
    );
    println!("  3. Run: demark resolve");

    Ok(())
}

fn cmd_validate(policy: &Path) -> Result<()> {
    println!("Validating policy document: {}", policy.display());
    println!();

    let document =
        PolicyDocument::load_from_file(policy).context("failed to load policy document")?;
    println!("  [OK] TOML structure is valid");

    let rules = document.into_rules();
    let mut invalid = 0;
    for (pattern, strategy) in &rules {
        match PathMatcher::new(pattern) {
            Ok(_) => println!("  [OK] {} -> {}", pattern, strategy),
            Err(e) => {
                println!("  [FAIL] {} -> {}: {}", pattern, strategy, e);
                invalid += 1;
            }
        }
    }

    println!();
    if invalid > 0 {
        anyhow::bail!("{} of {} pattern(s) failed to compile", invalid, rules.len());
    }
    println!("Policy document is valid ({} rule(s)).", rules.len());

    Ok(())
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

fn print_summary(report: &ResolveReport) {
    if report.files.is_empty() {
        println!("No files discovered.");
        return;
    }

    println!("{:<50} {:<10} {:<8}", "FILE", "STATUS", "STRATEGY");
    println!("{}", "-".repeat(70));

    for file in &report.files {
        let strategy = file
            .strategy
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<50} {:<10} {:<8}",
            truncate(&file.path, 50),
            file.status,
            strategy,
        );
    }

    let resolved = count(report, FileStatus::Resolved);
    let clean = count(report, FileStatus::Clean);
    let skipped = count(report, FileStatus::Skipped);
    println!();
    println!(
        "{} file(s): {} resolved, {} clean, {} skipped",
        report.files.len(),
        resolved,
        clean,
        skipped
    );
}

fn count(report: &ResolveReport, status: FileStatus) -> usize {
    report.files.iter().filter(|f| f.status == status).count()
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}
