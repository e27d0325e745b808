//! The `hrplatform build` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};

use hrplatform_core::app::AppState;
use hrplatform_core::loader::load_all;
use hrplatform_core::progress::{
    FileStore, KeyValueStore, MemoryStore, LANGUAGE_KEY, PROGRESS_KEY, THEME_KEY,
};
use hrplatform_core::router::Router;
use hrplatform_core::timeline::{TypeFilter, ViewMode};
use hrplatform_render::site::{collect_guides, write_site};

use super::{fetcher_for, load_config, ConsoleNotifier};

pub struct BuildArgs {
    pub config: Option<PathBuf>,
    pub data: Option<PathBuf>,
    pub data_url: Option<String>,
    pub output: Option<PathBuf>,
    pub section: Option<String>,
    pub view: String,
    pub filter: String,
    pub guides: Option<PathBuf>,
}

pub async fn execute(args: BuildArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref(), args.data)?;
    if let Some(url) = args.data_url {
        config.data_url = Some(url);
    }
    if let Some(output) = args.output {
        config.output_dir = output;
    }
    if let Some(guides) = args.guides {
        config.guides_dir = Some(guides);
    }

    let view: ViewMode = args.view.parse().map_err(|e: String| anyhow!(e))?;
    let filter: TypeFilter = args.filter.parse().map_err(|e: String| anyhow!(e))?;

    let fetcher = fetcher_for(&config);
    println!("Loading data from {}", fetcher.describe());
    let data = load_all(fetcher.as_ref(), &ConsoleNotifier).await;

    // Building reads saved progress but never writes it back.
    let saved = FileStore::new(config.progress_file.clone());
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::snapshot(
        &saved,
        &[PROGRESS_KEY, THEME_KEY, LANGUAGE_KEY],
    ));
    let mut app = AppState::new(data, store, &config);
    app.timeline.set_view(view);
    app.timeline.set_filter(filter);

    if let Some(section) = &args.section {
        app.router = Router::parse(section).map_err(|e| anyhow!(e))?;
    }
    tracing::debug!(
        section = app.router.current().id(),
        view = %app.timeline.view(),
        "initial state"
    );

    let guides = match &config.guides_dir {
        Some(dir) => collect_guides(dir)?,
        None => Vec::new(),
    };

    let summary = write_site(&app, &config.site_title, &guides, &config.output_dir)?;

    println!(
        "Loaded {} treaties, {} institutions, {} events, {} questions, {} cases",
        app.data.treaties.len(),
        app.data.institutions.len(),
        app.data.events.len(),
        app.data.quiz_questions.len(),
        app.data.cases.len()
    );
    let sections: Vec<&str> = summary.sections.iter().map(|s| s.id()).collect();
    println!("Sections: {}", sections.join(", "));
    if summary.guides > 0 {
        println!("Copied {} guide(s)", summary.guides);
    }
    println!(
        "Site written to {} ({} bytes, {} data files)",
        summary.index.display(),
        summary.index_bytes,
        summary.data_files
    );
    Ok(())
}
