//! Map command - run the whole pipeline without a browser.

use std::path::{Path, PathBuf};

use colored::Colorize;
use colmap::{DirectorySink, MappingSession};

use crate::cli::{Choice, SessionOptions};
use crate::provider;

/// Number of rewritten cells listed before summarizing.
const MAX_LISTED_CHANGES: usize = 10;

pub fn run(
    file: PathBuf,
    columns: Vec<String>,
    reject: Vec<String>,
    choose: Vec<Choice>,
    output: Option<PathBuf>,
    options: &SessionOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let client = provider::build_client(options)?;
    let mut session = MappingSession::with_config(options.session_config());
    session.load_path(&file)?;

    let columns = if columns.is_empty() {
        session
            .eligible_columns()
            .into_iter()
            .map(|c| c.name)
            .collect()
    } else {
        columns
    };
    if columns.is_empty() {
        return Err(format!(
            "No eligible columns in {}. Try --any-field or --target-field.",
            file.display()
        )
        .into());
    }
    for column in &columns {
        session.toggle_column(column)?;
    }

    println!(
        "{} {} column(s) via {}",
        "Requesting suggestions for".cyan().bold(),
        columns.len().to_string().white().bold(),
        client.name()
    );
    session.submit(client.as_ref())?;

    for key in &reject {
        if session.decisions().get(key).is_some_and(|d| d.accepted) {
            session.toggle_acceptance(key)?;
        } else if session.decisions().get(key).is_none() {
            return Err(format!("No suggestion to reject for '{}'", key).into());
        }
    }
    for choice in &choose {
        session.select_alternative(&choice.key, &choice.value)?;
    }

    print_review(&session);

    session.apply()?;
    let dir = output.unwrap_or_else(|| default_output_dir(&file));
    let sink = DirectorySink::new(dir);
    let artifact = session.export(&sink)?;

    if let Some(notice) = session.notice() {
        println!("{} {}", "Done:".green().bold(), notice.message());
    }
    if let Some(result) = session.transformed() {
        println!("  {} cell(s) rewritten", result.cells_rewritten);
        for audit in result.row_audits.iter().take(MAX_LISTED_CHANGES) {
            println!(
                "    row {} {}: '{}' → '{}'",
                audit.row + 1,
                audit.column.dimmed(),
                audit.original_value,
                audit.new_value.green()
            );
        }
        if result.row_audits.len() > MAX_LISTED_CHANGES {
            println!(
                "    ... and {} more",
                result.row_audits.len() - MAX_LISTED_CHANGES
            );
        }
    }
    println!(
        "{} {}",
        "Saved".cyan().bold(),
        sink.path_for(&artifact.file_name).display()
    );

    Ok(())
}

fn print_review(session: &MappingSession) {
    let summary = session.decisions().summary();
    println!();
    println!(
        "{} ({} of {} accepted)",
        "Suggestions".cyan().bold(),
        summary.accepted,
        summary.total
    );

    for (key, decision) in session.decisions().iter() {
        let mark = if decision.accepted {
            "✓".green()
        } else {
            "✗".red()
        };
        let others: Vec<&str> = session
            .suggestions()
            .get(key)
            .map(|s| s.choices())
            .unwrap_or_default()
            .into_iter()
            .filter(|c| *c != decision.selected_mapping)
            .collect();

        if others.is_empty() {
            println!("  {} {} → {}", mark, key, decision.selected_mapping.white().bold());
        } else {
            println!(
                "  {} {} → {} {}",
                mark,
                key,
                decision.selected_mapping.white().bold(),
                format!("(also: {})", others.join(", ")).dimmed()
            );
        }
    }
    println!();
}

fn default_output_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
