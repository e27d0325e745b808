//! Timeline engine.
//!
//! One [`TimelineState`] holds the view mode, the category filter, the
//! expanded era and the zoom/pan position. Every presentation is rebuilt
//! from that state and the event data by [`TimelineState::render`], so the
//! filter and the expanded era survive switching between views.

pub mod eras;
pub mod layout;
pub mod scale;
pub mod stacked;
pub mod zoom;

use std::fmt;
use std::str::FromStr;

use crate::loader::DataSet;
use crate::model::{Era, Event, EventType, Treaty};

pub use eras::{build_era_blocks, EraBlock};
pub use stacked::{build_stacked_view, StackedView};
pub use zoom::{build_continuous_view, ContinuousView, ZoomState};

/// Which presentation is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Eras,
    Zoom,
    Stacked,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Eras, ViewMode::Zoom, ViewMode::Stacked];
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Eras => write!(f, "eras"),
            ViewMode::Zoom => write!(f, "zoom"),
            ViewMode::Stacked => write!(f, "stacked"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eras" => Ok(ViewMode::Eras),
            "zoom" => Ok(ViewMode::Zoom),
            "stacked" => Ok(ViewMode::Stacked),
            other => Err(format!("unknown timeline view: {other}")),
        }
    }
}

/// Category filter: everything, or a single event type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Only(EventType),
}

impl TypeFilter {
    /// "all" followed by each event type in track order.
    pub const ALL: [TypeFilter; 7] = [
        TypeFilter::All,
        TypeFilter::Only(EventType::Treaty),
        TypeFilter::Only(EventType::Institution),
        TypeFilter::Only(EventType::Declaration),
        TypeFilter::Only(EventType::Event),
        TypeFilter::Only(EventType::Charter),
        TypeFilter::Only(EventType::Historical),
    ];

    pub fn matches(self, kind: EventType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(k) => k == kind,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => write!(f, "all"),
            TypeFilter::Only(kind) => write!(f, "{kind}"),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(TypeFilter::All)
        } else {
            s.parse().map(TypeFilter::Only)
        }
    }
}

/// Interaction state of the timeline section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelineState {
    view: ViewMode,
    filter: TypeFilter,
    selected_era: Option<String>,
    pub zoom: ZoomState,
}

impl TimelineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn filter(&self) -> TypeFilter {
        self.filter
    }

    pub fn selected_era(&self) -> Option<&str> {
        self.selected_era.as_deref()
    }

    /// Switch presentation. Filter and expanded era carry over.
    pub fn set_view(&mut self, view: ViewMode) {
        tracing::debug!(from = %self.view, to = %view, "timeline view switch");
        self.view = view;
    }

    pub fn set_filter(&mut self, filter: TypeFilter) {
        tracing::debug!(%filter, "timeline filter");
        self.filter = filter;
    }

    /// Expand `era_id`, collapsing any other; selecting the expanded era
    /// collapses it.
    pub fn toggle_era(&mut self, era_id: &str) {
        if self.selected_era.as_deref() == Some(era_id) {
            self.selected_era = None;
        } else {
            self.selected_era = Some(era_id.to_string());
        }
    }

    /// Build the active presentation. `None` when there are no events, in
    /// which case the whole timeline section is suppressed.
    pub fn render<'a>(&self, events: &'a [Event], eras: &'a [Era]) -> Option<TimelineView<'a>> {
        self.render_mode(self.view, events, eras)
    }

    /// Build a specific presentation with the current filter and era.
    pub fn render_mode<'a>(
        &self,
        mode: ViewMode,
        events: &'a [Event],
        eras: &'a [Era],
    ) -> Option<TimelineView<'a>> {
        if events.is_empty() {
            return None;
        }
        match mode {
            ViewMode::Eras => Some(TimelineView::Eras(build_era_blocks(
                events,
                eras,
                self.filter,
                self.selected_era(),
            ))),
            ViewMode::Zoom => {
                build_continuous_view(events, eras, self.filter).map(TimelineView::Zoom)
            }
            ViewMode::Stacked => build_stacked_view(events, self.filter).map(TimelineView::Stacked),
        }
    }
}

/// A rendered presentation of the timeline.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineView<'a> {
    Eras(Vec<EraBlock<'a>>),
    Zoom(ContinuousView<'a>),
    Stacked(StackedView<'a>),
}

/// Everything the event detail dialog shows.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDetail<'a> {
    pub event: &'a Event,
    pub color: &'static str,
    /// "Treaty", "Declaration", ...
    pub type_label: String,
    /// "INTER AMERICAN" style badge text.
    pub system_badge: Option<String>,
    /// Treaty linked through `relatedId`.
    pub related: Option<&'a Treaty>,
}

/// Look up an event and resolve what its detail view needs.
pub fn event_detail<'a>(data: &'a DataSet, event_id: &str) -> Option<EventDetail<'a>> {
    let event = data.event(event_id)?;
    let kind = event.kind.to_string();
    let mut chars = kind.chars();
    let type_label = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    Some(EventDetail {
        event,
        color: event.kind.color(),
        type_label,
        system_badge: event
            .system
            .as_ref()
            .map(|s| s.replacen('-', " ", 1).to_uppercase()),
        related: event.related_id.as_deref().and_then(|id| data.treaty(id)),
    })
}
