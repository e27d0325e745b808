//! The `hrplatform stats` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use comfy_table::{Cell, Table};

use hrplatform_core::progress::{FileStore, ProgressStore};

use super::load_config;

pub fn execute(config_path: Option<PathBuf>, reset: bool) -> Result<()> {
    let config = load_config(config_path.as_deref(), None)?;
    let store = Arc::new(FileStore::new(config.progress_file.clone()));
    let mut progress = ProgressStore::new(store);

    if reset {
        progress.clear();
        println!("Progress cleared ({}).", config.progress_file.display());
        return Ok(());
    }

    progress.load();
    let stats = progress.stats();
    let p = progress.progress();

    println!("Quizzes taken:        {}", stats.attempts);
    println!("Average score:        {}%", stats.average);
    println!("Best score:           {}%", stats.best);
    println!("Treaties viewed:      {}", p.viewed_treaties.len());
    println!("Institutions viewed:  {}", p.viewed_institutions.len());
    println!(
        "Time spent:           {}m {}s",
        p.time_spent / 60,
        p.time_spent % 60
    );

    if p.quiz_history.is_empty() {
        println!("\nNo quizzes taken yet. Run `hrplatform quiz` to start one.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Date", "Category", "Score", "Percentage"]);
    for attempt in p.quiz_history.iter().rev() {
        table.add_row(vec![
            Cell::new(attempt.date.format("%Y-%m-%d %H:%M")),
            Cell::new(&attempt.category),
            Cell::new(format!("{} / {}", attempt.score, attempt.total)),
            Cell::new(format!("{}%", attempt.percentage)),
        ]);
    }
    println!("\n{table}");

    let recent: Vec<String> = stats.recent.iter().map(|s| format!("{s}%")).collect();
    println!("Recent: {}", recent.join(" "));
    Ok(())
}
