//! The `hrplatform init` command.

use std::path::Path;

use anyhow::{Context, Result};

use hrplatform_core::config::{starter_config, CONFIG_FILE};
use hrplatform_core::loader;

const STARTER_DATA: [(&str, &str); 6] = [
    (loader::TREATIES, include_str!("../../../../data/treaties.json")),
    (loader::INSTITUTIONS, include_str!("../../../../data/institutions.json")),
    (loader::CONNECTIONS, include_str!("../../../../data/connections.json")),
    (loader::TIMELINE_EVENTS, include_str!("../../../../data/timeline-events.json")),
    (loader::QUIZ_QUESTIONS, include_str!("../../../../data/quiz-questions.json")),
    (loader::CASES, include_str!("../../../../data/cases.json")),
];

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

pub fn execute() -> Result<()> {
    write_if_missing(Path::new(CONFIG_FILE), &starter_config()?)?;

    std::fs::create_dir_all("data")?;
    for (name, content) in STARTER_DATA {
        write_if_missing(&Path::new("data").join(name), content)?;
    }

    println!("\nNext steps:");
    println!("  1. Edit the files in data/ or point data_dir in {CONFIG_FILE} elsewhere");
    println!("  2. Run: hrplatform validate");
    println!("  3. Run: hrplatform build");

    Ok(())
}
