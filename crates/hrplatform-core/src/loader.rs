//! JSON resource loading.
//!
//! All resources are fetched concurrently and joined before anything is
//! built from them. A failure of any required resource leaves the whole
//! data set empty and raises one user notification; the optional case-law
//! resource degrades to an empty collection on its own.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::LoadError;
use crate::model::{
    default_eras, Case, Connection, Era, Event, Institution, QuizMetadata, QuizQuestion, Treaty,
};
use crate::notify::{Notifier, LOAD_FAILED_MESSAGE};

pub const TREATIES: &str = "treaties.json";
pub const INSTITUTIONS: &str = "institutions.json";
pub const CONNECTIONS: &str = "connections.json";
pub const TIMELINE_EVENTS: &str = "timeline-events.json";
pub const QUIZ_QUESTIONS: &str = "quiz-questions.json";
pub const CASES: &str = "cases.json";

/// Every resource name, required ones first.
pub const ALL_RESOURCES: [&str; 6] = [
    TREATIES,
    INSTITUTIONS,
    CONNECTIONS,
    TIMELINE_EVENTS,
    QUIZ_QUESTIONS,
    CASES,
];

// ---------------------------------------------------------------------------
// Fetchers
// ---------------------------------------------------------------------------

/// Source of raw resource bodies.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Where resources come from, for log messages.
    fn describe(&self) -> String;

    /// Fetch the body of the resource called `name`.
    async fn fetch(&self, name: &str) -> Result<String, LoadError>;
}

/// Reads resources from a local directory.
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ResourceFetcher for FsFetcher {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    async fn fetch(&self, name: &str) -> Result<String, LoadError> {
        let path = self.root.join(name);
        tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound(name.to_string())
            } else {
                LoadError::Io {
                    resource: name.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }
}

/// Fetches resources relative to a base URL.
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    fn describe(&self) -> String {
        self.base_url.clone()
    }

    async fn fetch(&self, name: &str) -> Result<String, LoadError> {
        let response = self
            .client
            .get(self.url_for(name))
            .send()
            .await
            .map_err(|e| LoadError::Io {
                resource: name.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LoadError::NotFound(name.to_string()));
        }
        if !status.is_success() {
            return Err(LoadError::Http {
                resource: name.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| LoadError::Io {
            resource: name.to_string(),
            message: e.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Wire formats
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TreatiesFile {
    #[serde(default)]
    treaties: Vec<Treaty>,
}

#[derive(Debug, Deserialize)]
struct InstitutionsFile {
    #[serde(default)]
    institutions: Vec<Institution>,
}

#[derive(Debug, Deserialize)]
struct ConnectionsFile {
    #[serde(default)]
    connections: Vec<Connection>,
}

#[derive(Debug, Deserialize)]
struct TimelineFile {
    #[serde(default)]
    events: Vec<Event>,
    #[serde(default)]
    metadata: Option<TimelineMetadata>,
}

#[derive(Debug, Deserialize)]
struct TimelineMetadata {
    #[serde(default)]
    eras: Option<Vec<Era>>,
}

#[derive(Debug, Deserialize)]
struct QuizFile {
    #[serde(default)]
    questions: Vec<QuizQuestion>,
    #[serde(default)]
    metadata: QuizMetadata,
}

#[derive(Debug, Deserialize)]
struct CasesFile {
    #[serde(default)]
    cases: Vec<Case>,
}

// ---------------------------------------------------------------------------
// Data set
// ---------------------------------------------------------------------------

/// Every collection the site is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    pub treaties: Vec<Treaty>,
    pub institutions: Vec<Institution>,
    pub connections: Vec<Connection>,
    pub events: Vec<Event>,
    /// Eras from the timeline metadata, or the default set.
    pub eras: Vec<Era>,
    pub quiz_questions: Vec<QuizQuestion>,
    pub quiz_metadata: QuizMetadata,
    pub cases: Vec<Case>,
}

impl Default for DataSet {
    fn default() -> Self {
        Self {
            treaties: Vec::new(),
            institutions: Vec::new(),
            connections: Vec::new(),
            events: Vec::new(),
            eras: default_eras(),
            quiz_questions: Vec::new(),
            quiz_metadata: QuizMetadata::default(),
            cases: Vec::new(),
        }
    }
}

impl DataSet {
    /// True when nothing was loaded.
    pub fn is_empty(&self) -> bool {
        self.treaties.is_empty()
            && self.institutions.is_empty()
            && self.connections.is_empty()
            && self.events.is_empty()
            && self.quiz_questions.is_empty()
            && self.cases.is_empty()
    }

    pub fn treaty(&self, id: &str) -> Option<&Treaty> {
        self.treaties.iter().find(|t| t.id == id)
    }

    pub fn institution(&self, id: &str) -> Option<&Institution> {
        self.institutions.iter().find(|i| i.id == id)
    }

    pub fn event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn case(&self, id: &str) -> Option<&Case> {
        self.cases.iter().find(|c| c.id == id)
    }
}

async fn fetch_json<T: DeserializeOwned>(
    fetcher: &dyn ResourceFetcher,
    name: &str,
) -> Result<T, LoadError> {
    let body = fetcher.fetch(name).await?;
    serde_json::from_str(&body).map_err(|source| LoadError::Parse {
        resource: name.to_string(),
        source,
    })
}

/// Load every resource, failing on the first required resource that fails.
pub async fn try_load(fetcher: &dyn ResourceFetcher) -> Result<DataSet, LoadError> {
    let (treaties, institutions, connections, timeline, quiz, cases) = futures::join!(
        fetch_json::<TreatiesFile>(fetcher, TREATIES),
        fetch_json::<InstitutionsFile>(fetcher, INSTITUTIONS),
        fetch_json::<ConnectionsFile>(fetcher, CONNECTIONS),
        fetch_json::<TimelineFile>(fetcher, TIMELINE_EVENTS),
        fetch_json::<QuizFile>(fetcher, QUIZ_QUESTIONS),
        fetch_json::<CasesFile>(fetcher, CASES),
    );

    let cases = match cases {
        Ok(file) => file.cases,
        Err(e) => {
            tracing::warn!("case law unavailable, continuing without it: {e}");
            Vec::new()
        }
    };

    let timeline = timeline?;
    let quiz = quiz?;
    let eras = timeline
        .metadata
        .and_then(|m| m.eras)
        .filter(|eras| !eras.is_empty())
        .unwrap_or_else(default_eras);

    Ok(DataSet {
        treaties: treaties?.treaties,
        institutions: institutions?.institutions,
        connections: connections?.connections,
        events: timeline.events,
        eras,
        quiz_questions: quiz.questions,
        quiz_metadata: quiz.metadata,
        cases,
    })
}

/// Load every resource. On failure the user is notified once and an empty
/// data set is returned.
pub async fn load_all(fetcher: &dyn ResourceFetcher, notifier: &dyn Notifier) -> DataSet {
    match try_load(fetcher).await {
        Ok(data) => {
            tracing::info!(
                source = %fetcher.describe(),
                treaties = data.treaties.len(),
                institutions = data.institutions.len(),
                timeline_events = data.events.len(),
                quiz_questions = data.quiz_questions.len(),
                cases = data.cases.len(),
                "data loaded successfully"
            );
            data
        }
        Err(e) => {
            tracing::error!(source = %fetcher.describe(), "error loading data: {e}");
            notifier.notify(LOAD_FAILED_MESSAGE);
            DataSet::default()
        }
    }
}
