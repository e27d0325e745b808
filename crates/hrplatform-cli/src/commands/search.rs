//! The `hrplatform search` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use hrplatform_core::search::{search, MIN_QUERY_LEN};

use super::{load_config, load_data};

pub async fn execute(
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    query: String,
) -> Result<()> {
    if query.trim().chars().count() < MIN_QUERY_LEN {
        anyhow::bail!("search query must be at least {MIN_QUERY_LEN} characters");
    }
    let config = load_config(config_path.as_deref(), data_dir)?;
    let data = load_data(&config).await?;

    let results = search(&data, &query);
    if results.is_empty() {
        println!("No results found");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Type", "Id", "Title", "Details", "Section"]);
    for r in &results {
        table.add_row(vec![
            Cell::new(r.kind),
            Cell::new(&r.id),
            Cell::new(&r.title),
            Cell::new(&r.subtitle),
            Cell::new(r.kind.section().fragment()),
        ]);
    }
    println!("{table}");
    Ok(())
}
