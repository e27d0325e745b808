//! Core data model types for hrplatform.
//!
//! These mirror the static JSON resources the site is built from. Field
//! names follow the camelCase wire format; every collection is immutable
//! once loaded.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

/// A dated entry on the historical timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique identifier.
    pub id: String,
    /// Year the event took place.
    pub year: i32,
    /// Short title.
    pub title: String,
    /// Category of the event.
    #[serde(rename = "type")]
    pub kind: EventType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub significance: Option<String>,
    /// Protection system (e.g. "un", "european").
    #[serde(default)]
    pub system: Option<String>,
    /// Preferred in era previews.
    #[serde(default)]
    pub highlight: bool,
    /// Id of the treaty this event documents, if any.
    #[serde(default)]
    pub related_id: Option<String>,
}

/// The six event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Treaty,
    Institution,
    Declaration,
    Event,
    Charter,
    Historical,
}

impl EventType {
    /// All event types in track order.
    pub const ALL: [EventType; 6] = [
        EventType::Treaty,
        EventType::Institution,
        EventType::Declaration,
        EventType::Event,
        EventType::Charter,
        EventType::Historical,
    ];

    /// Display colour for this type.
    pub fn color(self) -> &'static str {
        match self {
            EventType::Treaty => "#3B82F6",
            EventType::Institution => "#8B5CF6",
            EventType::Declaration => "#10B981",
            EventType::Event => "#F59E0B",
            EventType::Charter => "#EF4444",
            EventType::Historical => "#6B7280",
        }
    }

    /// Plural label used for stacked rows.
    pub fn plural_label(self) -> &'static str {
        match self {
            EventType::Treaty => "Treaties",
            EventType::Institution => "Institutions",
            EventType::Declaration => "Declarations",
            EventType::Event => "Events",
            EventType::Charter => "Charters",
            EventType::Historical => "Historical",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventType::Treaty => "treaty",
            EventType::Institution => "institution",
            EventType::Declaration => "declaration",
            EventType::Event => "event",
            EventType::Charter => "charter",
            EventType::Historical => "historical",
        };
        f.write_str(s)
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "treaty" => Ok(EventType::Treaty),
            "institution" => Ok(EventType::Institution),
            "declaration" => Ok(EventType::Declaration),
            "event" => Ok(EventType::Event),
            "charter" => Ok(EventType::Charter),
            "historical" => Ok(EventType::Historical),
            other => Err(format!("unknown event type: {other}")),
        }
    }
}

/// A named, half-open span `[start, end)` of the year axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Era {
    pub id: String,
    pub name: String,
    /// First year of the era (inclusive).
    pub start: i32,
    /// First year after the era (exclusive).
    pub end: i32,
    pub color: String,
    #[serde(default)]
    pub description: String,
}

impl Era {
    /// Whether `year` falls inside this era.
    pub fn contains(&self, year: i32) -> bool {
        year >= self.start && year < self.end
    }
}

/// End year that is displayed as "Present".
pub const PRESENT_END_YEAR: i32 = 2030;

/// Era set used when the timeline resource carries no metadata.
pub fn default_eras() -> Vec<Era> {
    let era = |id: &str, name: &str, start, end, color: &str, description: &str| Era {
        id: id.into(),
        name: name.into(),
        start,
        end,
        color: color.into(),
        description: description.into(),
    };
    vec![
        era(
            "origins",
            "Origins",
            1215,
            1944,
            "#6B7280",
            "Historical foundations of human rights concepts",
        ),
        era(
            "foundation",
            "Foundation Era",
            1945,
            1966,
            "#3B82F6",
            "Post-WWII establishment of international human rights framework",
        ),
        era(
            "expansion",
            "Expansion Era",
            1966,
            1990,
            "#10B981",
            "Development of specialized treaties and regional systems",
        ),
        era(
            "postcold",
            "Post-Cold War",
            1990,
            2006,
            "#8B5CF6",
            "Vienna Conference, new institutions, and global expansion",
        ),
        era(
            "modern",
            "Modern Era",
            2006,
            PRESENT_END_YEAR,
            "#F59E0B",
            "Human Rights Council, new treaties, and contemporary challenges",
        ),
    ]
}

// ---------------------------------------------------------------------------
// Treaties, institutions, connections
// ---------------------------------------------------------------------------

/// An international or regional human rights instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Treaty {
    pub id: String,
    pub full_name: String,
    #[serde(default)]
    pub short_name: String,
    pub system: String,
    #[serde(default)]
    pub adopted: Option<i32>,
    #[serde(default)]
    pub entered_force: Option<i32>,
    #[serde(default)]
    pub states_parties: Option<u32>,
    #[serde(default)]
    pub key_articles: Vec<KeyArticle>,
    #[serde(default)]
    pub optional_protocols: Vec<OptionalProtocol>,
    #[serde(default)]
    pub significance: Option<String>,
    /// Id of the institution that monitors compliance.
    #[serde(default)]
    pub monitoring_body: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// A notable article of a treaty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyArticle {
    /// Article number; some instruments use composite numbers like "2(1)".
    #[serde(deserialize_with = "string_or_number")]
    pub number: String,
    pub title: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// An optional protocol attached to a treaty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionalProtocol {
    pub name: String,
    pub year: i32,
    #[serde(default)]
    pub function: String,
}

/// A human rights body, court, or organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    /// Kind of body ("court", "treaty-body", "organization", ...).
    #[serde(rename = "type")]
    pub kind: String,
    pub system: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub established: Option<i32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub composition: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A documented relationship between two treaties or institutions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Relationship weight in `[0, 1]`.
    #[serde(default = "default_strength")]
    pub strength: f64,
}

fn default_strength() -> f64 {
    0.5
}

// ---------------------------------------------------------------------------
// Quiz
// ---------------------------------------------------------------------------

/// A single quiz question, optionally with a Slovenian translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub category: String,
    pub difficulty: String,
    pub question: String,
    #[serde(default, rename = "questionSL")]
    pub question_sl: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, rename = "optionsSL")]
    pub options_sl: Option<Vec<String>>,
    pub correct: CorrectAnswer,
    #[serde(default)]
    pub explanation: String,
    #[serde(default, rename = "explanationSL")]
    pub explanation_sl: Option<String>,
    #[serde(default)]
    pub exam_tip: Option<String>,
}

impl QuizQuestion {
    /// Question text in `lang`, falling back to English.
    pub fn text(&self, lang: Language) -> &str {
        match (lang, &self.question_sl) {
            (Language::Sl, Some(sl)) => sl,
            _ => &self.question,
        }
    }

    /// Answer options in `lang`. True/false questions yield the two fixed labels.
    pub fn option_labels(&self, lang: Language) -> Vec<String> {
        match self.kind {
            QuestionKind::TrueFalse => match lang {
                Language::En => vec!["True".into(), "False".into()],
                Language::Sl => vec!["Drži".into(), "Ne drži".into()],
            },
            QuestionKind::Multiple => match (lang, &self.options_sl) {
                (Language::Sl, Some(sl)) if sl.len() == self.options.len() => sl.clone(),
                _ => self.options.clone(),
            },
        }
    }

    /// Explanation in `lang`, falling back to English.
    pub fn explanation_text(&self, lang: Language) -> &str {
        match (lang, &self.explanation_sl) {
            (Language::Sl, Some(sl)) => sl,
            _ => &self.explanation,
        }
    }
}

/// Question format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    #[serde(rename = "multiple")]
    Multiple,
    #[serde(rename = "truefalse", alias = "true-false")]
    TrueFalse,
}

/// The correct answer: an option index or a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    Bool(bool),
    Index(usize),
}

/// Category descriptor in quiz metadata: a bare id or an id with a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryInfo {
    Id(String),
    Detailed {
        id: String,
        #[serde(default)]
        name: Option<String>,
    },
}

impl CategoryInfo {
    pub fn id(&self) -> &str {
        match self {
            CategoryInfo::Id(id) | CategoryInfo::Detailed { id, .. } => id,
        }
    }

    /// Human-readable label; falls back to the id with dashes replaced.
    pub fn label(&self) -> String {
        match self {
            CategoryInfo::Detailed {
                name: Some(name), ..
            } => name.clone(),
            _ => self.id().replace('-', " "),
        }
    }
}

/// Metadata block of the quiz resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizMetadata {
    #[serde(default)]
    pub categories: Vec<CategoryInfo>,
    #[serde(default)]
    pub difficulty_levels: Vec<String>,
}

// ---------------------------------------------------------------------------
// Case law
// ---------------------------------------------------------------------------

/// A leading judgment or decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: String,
    pub name: String,
    pub year: i32,
    pub court: String,
    pub category: String,
    #[serde(default)]
    pub articles: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub facts: String,
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub holding: String,
    #[serde(default)]
    pub significance: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub importance: String,
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// UI language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Sl,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => write!(f, "en"),
            Language::Sl => write!(f, "sl"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "sl" | "slovenian" | "slovene" => Ok(Language::Sl),
            other => Err(format!("unknown language: {other}")),
        }
    }
}

/// Colour theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

/// Colour associated with a protection system.
pub fn system_color(system: &str) -> &'static str {
    match system {
        "un" => "#3B82F6",
        "european" => "#8B5CF6",
        "inter-american" => "#10B981",
        "african" => "#F59E0B",
        "ihl" => "#EF4444",
        _ => "#6B7280",
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        S(String),
        N(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::S(s) => s,
        Raw::N(n) => n.to_string(),
    })
}
