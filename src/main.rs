//! batch-renamer - rename the files of one directory from a plain-language
//! instruction.
//!
//! The proposal comes from a language model and is validated against the
//! directory before anything is renamed. Operations with validation errors
//! are only applied when explicitly requested.

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use batch_renamer::ai::AnthropicClient;
use batch_renamer::commands::{
    confirm_question, decision_from_answer, decision_from_flags, parse_only, prepare_run,
    PreparedRun,
};
use batch_renamer::config::{load_dotenv, RenamerConfig};
use batch_renamer::execution::{
    AbortFlag, Decision, ExecutionPreview, ExecutionResult, OperationOutcome, Severity,
};
use batch_renamer::{init_tracing, RenamerError, Result};

/// Rename the files in a directory from a plain-language instruction
#[derive(Parser, Debug)]
#[command(name = "batch-renamer", version, about, long_about = None)]
struct Cli {
    /// Directory whose files should be renamed (not recursive)
    dir: PathBuf,

    /// How the files should be renamed, e.g. "lowercase kebab-case, keep extensions"
    instruction: String,

    /// Apply without asking; operations with validation errors are left out
    #[arg(short, long)]
    yes: bool,

    /// With --yes, also apply operations that have validation errors
    #[arg(long, requires = "yes")]
    all: bool,

    /// Only apply these operations (1-based, comma separated)
    #[arg(long, value_delimiter = ',', value_name = "N,..", conflicts_with = "all")]
    only: Vec<usize>,

    /// Show the proposal and validation report without renaming anything
    #[arg(long)]
    dry_run: bool,

    /// Print the preview and the result as JSON
    #[arg(long)]
    json: bool,

    /// Model to use (overrides RENAMER_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Response token limit (overrides RENAMER_MAX_TOKENS)
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

const EXIT_FAILED: u8 = 1;
const EXIT_ABORTED: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(EXIT_FAILED)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = RenamerConfig::from_env()?;
    if let Some(model) = cli.model.clone() {
        config.model = model;
    }
    if let Some(max_tokens) = cli.max_tokens {
        config.max_tokens = max_tokens;
    }

    let client = AnthropicClient::new(config)?;
    let prepared = prepare_run(&cli.dir, &cli.instruction, &client).await?;
    let preview = prepared.preview();

    if cli.json {
        print_json(&preview)?;
    } else {
        print_preview(&prepared, &preview);
    }

    if prepared.plan.is_empty() || cli.dry_run {
        return Ok(ExitCode::SUCCESS);
    }

    let decision = decide(&cli, &prepared)?;

    let abort = AbortFlag::new();
    let on_ctrl_c = abort.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.abort();
        }
    });

    let result = tokio::task::spawn_blocking(move || prepared.execute(&decision, Some(abort)))
        .await
        .map_err(|e| RenamerError::Io(io::Error::new(io::ErrorKind::Other, e)))?;

    let Some(result) = result else {
        eprintln!("Aborted, nothing renamed.");
        return Ok(ExitCode::from(EXIT_ABORTED));
    };

    if cli.json {
        print_json(&result)?;
    } else {
        print_result(&result);
    }

    Ok(ExitCode::from(exit_code_for(&result)))
}

/// 0 when every submitted operation was applied, 2 when interrupted, else 1
fn exit_code_for(result: &ExecutionResult) -> u8 {
    if result.aborted {
        EXIT_ABORTED
    } else if result.success() {
        0
    } else {
        EXIT_FAILED
    }
}

/// Turn flags (or the user's answer) into a decision
fn decide(cli: &Cli, prepared: &PreparedRun) -> Result<Decision> {
    let subset = if cli.only.is_empty() {
        None
    } else {
        Some(parse_only(&cli.only, prepared.plan.len())?)
    };

    if let Some(indices) = &subset {
        let issues = prepared.selection_issues(&Decision::ProceedWithSubset(indices.clone()));
        for issue in issues {
            eprintln!(
                "warning: operation {}: {}",
                issue.operation_index + 1,
                issue.message
            );
        }
    }

    if let Some(decision) = decision_from_flags(cli.yes, cli.all, subset.clone()) {
        return Ok(decision);
    }

    let has_errors = prepared.report.has_errors();
    let answer = ask(&confirm_question(subset.as_ref(), has_errors))?;

    Ok(decision_from_answer(&answer, subset, has_errors))
}

fn ask(question: &str) -> Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "{}", question)?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| RenamerError::Io(io::Error::new(io::ErrorKind::Other, e)))?;
    println!("{}", json);
    Ok(())
}

fn print_preview(prepared: &PreparedRun, preview: &ExecutionPreview) {
    if preview.entries.is_empty() {
        println!(
            "No renames proposed for {} ({} files).",
            prepared.snapshot.directory.display(),
            prepared.snapshot.len()
        );
        return;
    }

    println!(
        "Proposed renames in {} ({} of {} files):",
        prepared.snapshot.directory.display(),
        preview.entries.len(),
        prepared.snapshot.len()
    );

    for entry in &preview.entries {
        let marker = if entry.safe { " " } else { "!" };
        println!(
            "{} {:>3}. {} -> {}",
            marker,
            entry.operation_index + 1,
            entry.original,
            entry.new
        );
        if let Some(reason) = &entry.reason {
            println!("        {}", reason);
        }
        for issue in &entry.issues {
            let label = match issue.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            println!("        {}: {}", label, issue.message);
        }
    }

    println!(
        "\n{} safe, {} with errors, {} warnings",
        preview.safe_count, preview.blocked_count, preview.warning_count
    );
}

fn print_result(result: &ExecutionResult) {
    for r in &result.results {
        match &r.outcome {
            OperationOutcome::Applied => println!("  renamed  {} -> {}", r.original, r.new),
            OperationOutcome::Skipped => println!("  skipped  {} -> {}", r.original, r.new),
            OperationOutcome::Failed(detail) => {
                println!("  FAILED   {} -> {}: {}", r.original, r.new, detail)
            }
        }
    }

    println!(
        "\n{} renamed, {} failed, {} skipped",
        result.applied_count(),
        result.failed_count(),
        result.skipped_count()
    );

    if result.aborted {
        println!("Interrupted: operations after the last one listed were not attempted.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use batch_renamer::execution::OperationResult;

    fn result(outcomes: &[OperationOutcome], aborted: bool) -> ExecutionResult {
        ExecutionResult {
            results: outcomes
                .iter()
                .enumerate()
                .map(|(i, outcome)| OperationResult {
                    operation_index: i,
                    original: format!("{}.txt", i),
                    new: format!("{}.new", i),
                    outcome: outcome.clone(),
                })
                .collect(),
            aborted,
        }
    }

    #[test]
    fn test_exit_code_success() {
        let r = result(&[OperationOutcome::Applied, OperationOutcome::Skipped], false);
        assert_eq!(exit_code_for(&r), 0);
    }

    #[test]
    fn test_exit_code_failure() {
        let r = result(
            &[OperationOutcome::Applied, OperationOutcome::Failed("gone".into())],
            false,
        );
        assert_eq!(exit_code_for(&r), EXIT_FAILED);
    }

    #[test]
    fn test_exit_code_interrupted() {
        let r = result(&[OperationOutcome::Applied], true);
        assert_eq!(exit_code_for(&r), EXIT_ABORTED);

        let r = result(&[OperationOutcome::Failed("gone".into())], true);
        assert_eq!(exit_code_for(&r), EXIT_ABORTED);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from(["batch-renamer", "/tmp", "lowercase", "--only", "1,3"]).unwrap();
        assert_eq!(cli.only, vec![1, 3]);
        assert!(!cli.yes);

        assert!(Cli::try_parse_from(["batch-renamer", "/tmp", "x", "--all"]).is_err());
        assert!(Cli::try_parse_from(["batch-renamer", "/tmp", "x", "-y", "--all", "--only", "1"]).is_err());
    }
}
