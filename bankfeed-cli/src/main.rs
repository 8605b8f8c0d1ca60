use anyhow::{Context, Result, bail};
use bankfeed_ingest::{StatementFormat, draft, parse_statement};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "bankfeed", version, about = "Bank statement import tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a bank CSV export and report what would be imported
    Import {
        /// Path to the exported .csv
        #[arg(long)]
        csv: PathBuf,

        /// Destination account id; when set, insert-ready drafts are built
        #[arg(long)]
        account: Option<String>,

        /// Emit the full outcome as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Import { csv, account, json } => run_import(&csv, account.as_deref(), json),
    }
}

fn run_import(csv: &Path, account: Option<&str>, json: bool) -> Result<()> {
    let raw = std::fs::read_to_string(csv).with_context(|| format!("reading {}", csv.display()))?;

    let outcome = parse_statement(&raw);

    if outcome.format == StatementFormat::Unknown {
        bail!(
            "{}",
            outcome
                .diagnostics
                .first()
                .map(String::as_str)
                .unwrap_or("unrecognized CSV format")
        );
    }

    if outcome.records.is_empty() {
        bail!("no valid transactions found in {}", csv.display());
    }

    let drafts = account.map(|id| draft::to_drafts(&outcome.records, id));

    if json {
        let payload = match &drafts {
            Some(drafts) => serde_json::json!({ "outcome": outcome, "drafts": drafts }),
            None => serde_json::to_value(&outcome)?,
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let data_rows = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .count()
        .saturating_sub(1);
    println!(
        "Parsed {} of {} data rows ({})",
        outcome.records.len(),
        data_rows,
        outcome.format
    );

    for r in &outcome.records {
        println!(
            "{}  {:<7} {:>12}  {}",
            r.date,
            r.kind.as_str(),
            r.amount.to_string(),
            r.description
        );
    }

    let expenses = outcome.records.iter().filter(|r| r.is_expense()).count();
    println!(
        "\n{} records ({} expenses, {} income)",
        outcome.records.len(),
        expenses,
        outcome.records.len() - expenses
    );

    if let Some(drafts) = &drafts {
        let batch_count = draft::batches(drafts).count();
        println!(
            "Prepared {} drafts for account {} in {} insert batch(es)",
            drafts.len(),
            account.unwrap_or_default(),
            batch_count
        );
    }

    if !outcome.diagnostics.is_empty() {
        eprintln!("\nSkipped rows:");
        for d in &outcome.diagnostics {
            eprintln!("  {d}");
        }
    }

    Ok(())
}
