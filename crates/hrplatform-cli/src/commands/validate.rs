//! The `hrplatform validate` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use hrplatform_core::validate::validate_dataset;

use super::{load_config, load_data};

pub async fn execute(config_path: Option<PathBuf>, data_dir: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path.as_deref(), data_dir)?;
    let data = load_data(&config).await?;

    println!(
        "Data: {} treaties, {} institutions, {} connections, {} events, {} eras, {} questions, {} cases",
        data.treaties.len(),
        data.institutions.len(),
        data.connections.len(),
        data.events.len(),
        data.eras.len(),
        data.quiz_questions.len(),
        data.cases.len()
    );

    let warnings = validate_dataset(&data);
    if warnings.is_empty() {
        println!("All data valid.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Resource", "Record", "Warning"]);
    for w in &warnings {
        table.add_row(vec![
            Cell::new(w.resource),
            Cell::new(w.record_id.as_deref().unwrap_or("-")),
            Cell::new(&w.message),
        ]);
    }
    println!("{table}");
    println!("\n{} warning(s) found.", warnings.len());
    Ok(())
}
