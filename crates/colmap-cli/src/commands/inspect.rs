//! Inspect command - show what a file offers for mapping.

use std::path::PathBuf;

use colored::Colorize;
use colmap::MappingSession;

use crate::cli::SessionOptions;

pub fn run(file: PathBuf, options: &SessionOptions) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let config = options.session_config();
    let window = config.window;
    let target = config.target_field.clone();

    let mut session = MappingSession::with_config(config);
    session.load_path(&file)?;

    let (Some(source), Some(dataset)) = (session.source(), session.dataset()) else {
        return Err("File did not load".into());
    };

    println!("{} {}", "File:".cyan().bold(), source.file.white().bold());
    println!(
        "  {} rows, {} columns, {}",
        source.row_count, source.column_count, source.hash
    );
    println!();

    println!("{}", "Fields:".cyan().bold());
    for name in dataset.field_names() {
        println!("  {}", name);
    }
    println!();

    let eligible = session.eligible_columns();
    match &target {
        Some(t) => println!("{} (target: {})", "Eligible columns".cyan().bold(), t.yellow()),
        None => println!("{}", "Eligible columns".cyan().bold()),
    }

    if eligible.is_empty() {
        println!("  {}", "none".dimmed());
        if target.is_some() {
            println!(
                "  Use {} to offer every column with data.",
                "--any-field".cyan()
            );
        }
        return Ok(());
    }

    for column in &eligible {
        println!(
            "  {} ({} of {} sampled values filled)",
            column.name.white().bold(),
            column.non_empty.to_string().green(),
            window.size
        );

        let sample = window.sample(dataset, &column.name);
        for value in sample.values() {
            match value {
                Some(v) if !v.is_empty() => println!("    {}", v),
                Some(_) => println!("    {}", "(empty)".dimmed()),
                None => println!("    {}", "(absent)".dimmed()),
            }
        }
    }

    Ok(())
}
