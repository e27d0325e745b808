//! Global search across treaties, institutions and timeline events.

use std::fmt;

use serde::Serialize;

use crate::loader::DataSet;
use crate::router::Section;

/// Queries shorter than this return nothing.
pub const MIN_QUERY_LEN: usize = 2;
/// At most this many results are returned.
pub const MAX_RESULTS: usize = 10;
/// Client-side input debounce, in milliseconds.
pub const DEBOUNCE_MS: u64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Treaty,
    Institution,
    Event,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    #[serde(rename = "type")]
    pub kind: ResultKind,
    pub id: String,
    pub title: String,
    pub subtitle: String,
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultKind::Treaty => write!(f, "treaty"),
            ResultKind::Institution => write!(f, "institution"),
            ResultKind::Event => write!(f, "event"),
        }
    }
}

impl ResultKind {
    /// Section a result of this kind is shown in.
    pub fn section(self) -> Section {
        match self {
            ResultKind::Treaty => Section::Treaties,
            ResultKind::Institution => Section::SpiderWeb,
            ResultKind::Event => Section::Timeline,
        }
    }
}

/// A searchable record: the result it yields plus the lower-cased text
/// queries are matched against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    #[serde(flatten)]
    pub result: SearchResult,
    pub haystack: String,
}

/// Every searchable record, treaties first, then institutions, then events.
pub fn search_index(data: &DataSet) -> Vec<IndexEntry> {
    let treaties = data.treaties.iter().map(|t| IndexEntry {
        haystack: format!("{} {} {}", t.full_name, t.short_name, t.id).to_lowercase(),
        result: SearchResult {
            kind: ResultKind::Treaty,
            id: t.id.clone(),
            title: t.short_name.clone(),
            subtitle: t.full_name.clone(),
        },
    });

    let institutions = data.institutions.iter().map(|i| {
        let short = i.short_name.as_deref().unwrap_or("");
        IndexEntry {
            haystack: format!("{} {} {}", i.name, short, i.id).to_lowercase(),
            result: SearchResult {
                kind: ResultKind::Institution,
                id: i.id.clone(),
                title: i.short_name.clone().unwrap_or_else(|| i.name.clone()),
                subtitle: i.name.clone(),
            },
        }
    });

    let events = data.events.iter().map(|e| {
        let description = e.description.as_deref().unwrap_or("");
        IndexEntry {
            haystack: format!("{} {}", e.title, description).to_lowercase(),
            result: SearchResult {
                kind: ResultKind::Event,
                id: e.id.clone(),
                title: e.title.clone(),
                subtitle: format!("{} - {}", e.year, e.kind),
            },
        }
    });

    treaties.chain(institutions).chain(events).collect()
}

/// Case-insensitive substring search over [`search_index`], truncated to
/// [`MAX_RESULTS`].
pub fn search(data: &DataSet, query: &str) -> Vec<SearchResult> {
    let query = query.trim().to_lowercase();
    if query.chars().count() < MIN_QUERY_LEN {
        return Vec::new();
    }
    search_index(data)
        .into_iter()
        .filter(|entry| entry.haystack.contains(&query))
        .map(|entry| entry.result)
        .take(MAX_RESULTS)
        .collect()
}
