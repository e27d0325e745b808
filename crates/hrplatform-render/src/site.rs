//! Static site assembly.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use hrplatform_core::app::AppState;
use hrplatform_core::loader::{self, DataSet};
use hrplatform_core::model::{Language, QuizQuestion};
use hrplatform_core::quiz::correct_choice;
use hrplatform_core::router::Section;
use hrplatform_core::search::{search_index, IndexEntry};

use crate::html::{document, json_script, Shell};
use crate::pages::{
    render_about, render_cases, render_guides, render_home, render_quiz, render_treaties, Guide,
};
use crate::timeline::render_timeline_section;
use crate::web::render_web_section;

/// What [`write_site`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSummary {
    pub index: PathBuf,
    pub index_bytes: usize,
    pub data_files: usize,
    pub guides: usize,
    /// Sections rendered with content, in navigation order.
    pub sections: Vec<Section>,
}

/// Study guide pages (`*.html`) in `dir`, sorted by file name. A missing
/// directory yields no guides.
pub fn collect_guides(dir: &Path) -> Result<Vec<Guide>> {
    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "no guides directory");
        return Ok(Vec::new());
    }
    let mut guides = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read guides: {}", dir.display()))?
    {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("html") {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            continue;
        };
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read guide: {}", path.display()))?;
        let title = html_title(&content).unwrap_or_else(|| title_from_file_name(&file_name));
        guides.push(Guide {
            file_name,
            title,
            source: path,
        });
    }
    guides.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(guides)
}

fn html_title(content: &str) -> Option<String> {
    let start = content.find("<title>")? + "<title>".len();
    let end = content[start..].find("</title>")? + start;
    let title = content[start..end].trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// "un-treaty-bodies.html" -> "Un treaty bodies".
fn title_from_file_name(name: &str) -> String {
    let stem = name.strip_suffix(".html").unwrap_or(name).replace(['-', '_'], " ");
    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Serialize)]
struct ClientSearchEntry<'a> {
    #[serde(flatten)]
    entry: &'a IndexEntry,
    section: &'static str,
}

/// A question as the page script runs it: localized, with the answer as an
/// option index.
#[derive(Serialize)]
struct ClientQuestion<'a> {
    id: &'a str,
    category: &'a str,
    difficulty: &'a str,
    question: &'a str,
    options: Vec<String>,
    correct: usize,
    explanation: &'a str,
    #[serde(rename = "examTip", skip_serializing_if = "Option::is_none")]
    exam_tip: Option<&'a str>,
}

impl<'a> ClientQuestion<'a> {
    fn new(q: &'a QuizQuestion, lang: Language) -> Self {
        Self {
            id: &q.id,
            category: &q.category,
            difficulty: &q.difficulty,
            question: q.text(lang),
            options: q.option_labels(lang),
            correct: correct_choice(q),
            explanation: q.explanation_text(lang),
            exam_tip: q.exam_tip.as_deref(),
        }
    }
}

#[derive(Serialize)]
struct ClientData<'a> {
    search: Vec<ClientSearchEntry<'a>>,
    questions: Vec<ClientQuestion<'a>>,
}

/// Render every section and assemble `index.html`.
pub fn render_index(
    app: &AppState,
    title: &str,
    guides: &[Guide],
    generated: DateTime<Utc>,
) -> (String, Vec<Section>) {
    let data = &app.data;
    let stats = app.progress.stats();
    let viewed = app.progress.progress().viewed_treaties.len();

    let sections: Vec<(Section, String)> = Section::ALL
        .iter()
        .map(|&section| {
            let body = match section {
                Section::Home => render_home(data, &stats, viewed),
                Section::Timeline => render_timeline_section(&app.timeline, data),
                Section::SpiderWeb => render_web_section(data, app.router.web_filter()),
                Section::Treaties => render_treaties(data),
                Section::Cases => render_cases(&data.cases),
                Section::Quiz => render_quiz(&data.quiz_questions, &data.quiz_metadata),
                Section::Guides => render_guides(guides),
                Section::About => render_about(data, &generated.format("%Y-%m-%d %H:%M UTC").to_string()),
            };
            (section, body)
        })
        .collect();

    let index = search_index(data);
    let client = ClientData {
        search: index
            .iter()
            .map(|entry| ClientSearchEntry {
                entry,
                section: entry.result.kind.section().id(),
            })
            .collect(),
        questions: data
            .quiz_questions
            .iter()
            .map(|q| ClientQuestion::new(q, app.language()))
            .collect(),
    };

    let shell = Shell {
        title,
        theme: app.theme(),
        language: app.language(),
        active: app.router.current(),
    };
    let rendered = sections
        .iter()
        .filter(|(_, body)| !body.is_empty())
        .map(|(section, _)| *section)
        .collect();
    (
        document(&shell, &sections, &json_script("site-data", &client)),
        rendered,
    )
}

/// Write the site into `out_dir`: `index.html`, the resources re-serialized
/// under `data/`, and copies of the guides under `guides/`.
pub fn write_site(app: &AppState, title: &str, guides: &[Guide], out_dir: &Path) -> Result<SiteSummary> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output dir: {}", out_dir.display()))?;

    let (html, sections) = render_index(app, title, guides, Utc::now());
    let index = out_dir.join("index.html");
    std::fs::write(&index, &html)
        .with_context(|| format!("failed to write site: {}", index.display()))?;

    let data_dir = out_dir.join("data");
    let data_files = write_data_files(&app.data, &data_dir)?;

    if !guides.is_empty() {
        let guides_dir = out_dir.join("guides");
        std::fs::create_dir_all(&guides_dir)
            .with_context(|| format!("failed to create {}", guides_dir.display()))?;
        for guide in guides {
            let target = guides_dir.join(&guide.file_name);
            std::fs::copy(&guide.source, &target).with_context(|| {
                format!("failed to copy guide {} to {}", guide.source.display(), target.display())
            })?;
        }
    }

    tracing::info!(
        path = %index.display(),
        bytes = html.len(),
        data_files,
        guides = guides.len(),
        "site written"
    );
    Ok(SiteSummary {
        index,
        index_bytes: html.len(),
        data_files,
        guides: guides.len(),
        sections,
    })
}

/// Write the resources in their load format so the output is itself a
/// valid data directory.
fn write_data_files(data: &DataSet, dir: &Path) -> Result<usize> {
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let mut files = vec![
        (loader::TREATIES, serde_json::json!({ "treaties": data.treaties })),
        (
            loader::INSTITUTIONS,
            serde_json::json!({ "institutions": data.institutions }),
        ),
        (
            loader::CONNECTIONS,
            serde_json::json!({ "connections": data.connections }),
        ),
        (
            loader::TIMELINE_EVENTS,
            serde_json::json!({ "events": data.events, "metadata": { "eras": data.eras } }),
        ),
        (
            loader::QUIZ_QUESTIONS,
            serde_json::json!({ "questions": data.quiz_questions, "metadata": data.quiz_metadata }),
        ),
    ];
    if !data.cases.is_empty() {
        files.push((loader::CASES, serde_json::json!({ "cases": data.cases })));
    }

    for (name, value) in &files {
        let path = dir.join(name);
        let json = serde_json::to_string_pretty(value)
            .with_context(|| format!("failed to serialize {name}"))?;
        std::fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(files.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use hrplatform_core::config::SiteConfig;
    use hrplatform_core::loader::FsFetcher;
    use hrplatform_core::model::{CorrectAnswer, Event, EventType, QuestionKind};
    use hrplatform_core::progress::MemoryStore;

    fn question(id: &str, correct: CorrectAnswer) -> QuizQuestion {
        QuizQuestion {
            id: id.into(),
            kind: QuestionKind::TrueFalse,
            category: "foundations".into(),
            difficulty: "basic".into(),
            question: "The UDHR was adopted in 1948.</script>".into(),
            question_sl: Some("SV je bila sprejeta leta 1948.".into()),
            options: vec![],
            options_sl: None,
            correct,
            explanation: "Adopted 10 December 1948.".into(),
            explanation_sl: None,
            exam_tip: None,
        }
    }

    fn app() -> AppState {
        let mut data = DataSet::default();
        data.events = vec![Event {
            id: "udhr".into(),
            year: 1948,
            title: "Universal Declaration".into(),
            kind: EventType::Declaration,
            description: None,
            significance: None,
            system: Some("un".into()),
            highlight: true,
            related_id: None,
        }];
        data.quiz_questions = vec![question("q1", CorrectAnswer::Bool(false))];
        AppState::new(data, Arc::new(MemoryStore::new()), &SiteConfig::default())
    }

    #[test]
    fn index_embeds_client_data() {
        let app = app();
        let (html, sections) = render_index(&app, "Atlas", &[], Utc::now());
        assert!(html.contains("<script type=\"application/json\" id=\"site-data\">"));
        assert!(html.contains("\"correct\":1"));
        assert!(html.contains("\"options\":[\"True\",\"False\"]"));
        assert!(html.contains("\"section\":\"timeline\""));
        assert!(html.contains("1948.<\\/script>"));
        assert!(!html.contains("\"examTip\""));
        assert!(sections.contains(&Section::Timeline));
        assert!(!sections.contains(&Section::Cases));
        assert!(!sections.contains(&Section::Guides));
    }

    #[test]
    fn exam_tips_reach_the_page() {
        let mut app = app();
        app.data.quiz_questions[0].exam_tip = Some("Remember Human Rights Day.".into());
        let (html, _) = render_index(&app, "Atlas", &[], Utc::now());
        assert!(html.contains("\"examTip\":\"Remember Human Rights Day.\""));
        assert!(html.contains("tip.className = 'exam-tip'"));
    }

    #[test]
    fn questions_follow_language() {
        let mut app = app();
        app.set_language(Language::Sl);
        let (html, _) = render_index(&app, "Atlas", &[], Utc::now());
        assert!(html.contains("SV je bila sprejeta"));
        assert!(html.contains("\"Drži\""));
        assert!(html.contains("lang=\"sl\""));
    }

    #[tokio::test]
    async fn written_data_dir_loads_back() {
        let app = app();
        let out = tempfile::tempdir().unwrap();
        let summary = write_site(&app, "Atlas", &[], out.path()).unwrap();
        assert!(summary.index.exists());
        assert_eq!(summary.data_files, 5);
        assert!(summary.index_bytes > 0);

        let fetcher = FsFetcher::new(out.path().join("data"));
        let reloaded = loader::try_load(&fetcher).await.unwrap();
        assert_eq!(reloaded.events, app.data.events);
        assert_eq!(reloaded.quiz_questions, app.data.quiz_questions);
        assert_eq!(reloaded.eras, app.data.eras);
    }

    #[test]
    fn guides_are_collected_and_copied() {
        let src = tempfile::tempdir().unwrap();
        std::fs::write(
            src.path().join("un-system.html"),
            "<html><head><title>The UN System</title></head></html>",
        )
        .unwrap();
        std::fs::write(src.path().join("regional_courts.html"), "<p>no title</p>").unwrap();
        std::fs::write(src.path().join("notes.txt"), "skip").unwrap();

        let guides = collect_guides(src.path()).unwrap();
        assert_eq!(guides.len(), 2);
        assert_eq!(guides[0].title, "Regional courts");
        assert_eq!(guides[1].title, "The UN System");

        let out = tempfile::tempdir().unwrap();
        let summary = write_site(&app(), "Atlas", &guides, out.path()).unwrap();
        assert_eq!(summary.guides, 2);
        assert!(out.path().join("guides/un-system.html").exists());
        assert!(summary.sections.contains(&Section::Guides));

        assert!(collect_guides(&src.path().join("missing")).unwrap().is_empty());
    }
}
