//! Era-grouped presentation.

use super::TypeFilter;
use crate::model::{Era, Event, PRESENT_END_YEAR};

/// Events shown on a collapsed era block.
pub const PREVIEW_SIZE: usize = 3;

/// One era block of the grouped view.
#[derive(Debug, Clone, PartialEq)]
pub struct EraBlock<'a> {
    pub era: &'a Era,
    /// Matching events, sorted by year.
    pub events: Vec<&'a Event>,
    /// Up to three events for the collapsed preview.
    pub preview: Vec<&'a Event>,
    /// Events beyond the first three ("+N more").
    pub overflow: usize,
    pub expanded: bool,
}

impl EraBlock<'_> {
    /// Year range label; the open-ended final era reads "Present".
    pub fn years_label(&self) -> String {
        era_years_label(self.era)
    }
}

/// "1945 – 1966", or "2006 – Present" for the open-ended era.
pub fn era_years_label(era: &Era) -> String {
    if era.end == PRESENT_END_YEAR {
        format!("{} – Present", era.start)
    } else {
        format!("{} – {}", era.start, era.end)
    }
}

/// Group `events` into `eras` using half-open membership, apply `filter`,
/// and pick previews.
pub fn build_era_blocks<'a>(
    events: &'a [Event],
    eras: &'a [Era],
    filter: TypeFilter,
    selected_era: Option<&str>,
) -> Vec<EraBlock<'a>> {
    eras.iter()
        .map(|era| {
            let mut era_events: Vec<&Event> = events
                .iter()
                .filter(|e| era.contains(e.year) && filter.matches(e.kind))
                .collect();
            era_events.sort_by_key(|e| e.year);

            let highlighted: Vec<&Event> = era_events
                .iter()
                .copied()
                .filter(|e| e.highlight)
                .take(PREVIEW_SIZE)
                .collect();
            let preview = if highlighted.is_empty() {
                era_events.iter().copied().take(PREVIEW_SIZE).collect()
            } else {
                highlighted
            };

            EraBlock {
                era,
                overflow: era_events.len().saturating_sub(PREVIEW_SIZE),
                preview,
                events: era_events,
                expanded: selected_era == Some(era.id.as_str()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{default_eras, EventType};

    fn ev(id: &str, year: i32, kind: EventType, highlight: bool) -> Event {
        Event {
            id: id.into(),
            year,
            title: id.into(),
            kind,
            description: None,
            significance: None,
            system: None,
            highlight,
            related_id: None,
        }
    }

    #[test]
    fn boundary_year_belongs_to_the_starting_era() {
        let eras = default_eras();
        let events = vec![ev("charter", 1945, EventType::Charter, true)];
        let blocks = build_era_blocks(&events, &eras, TypeFilter::All, None);

        let origins = blocks.iter().find(|b| b.era.id == "origins").unwrap();
        let foundation = blocks.iter().find(|b| b.era.name == "Foundation Era").unwrap();
        assert!(origins.events.is_empty());
        assert_eq!(foundation.events.len(), 1);

        let events = vec![ev("covenants", 1966, EventType::Treaty, false)];
        let blocks = build_era_blocks(&events, &eras, TypeFilter::All, None);
        assert!(blocks[1].events.is_empty());
        assert_eq!(blocks[2].events.len(), 1);
    }

    #[test]
    fn preview_prefers_highlights() {
        let eras = default_eras();
        let events = vec![
            ev("a", 1950, EventType::Treaty, false),
            ev("b", 1946, EventType::Treaty, false),
            ev("c", 1960, EventType::Treaty, true),
            ev("d", 1955, EventType::Treaty, false),
            ev("e", 1948, EventType::Declaration, true),
        ];
        let blocks = build_era_blocks(&events, &eras, TypeFilter::All, None);
        let foundation = &blocks[1];

        assert_eq!(
            foundation.events.iter().map(|e| e.year).collect::<Vec<_>>(),
            vec![1946, 1948, 1950, 1955, 1960]
        );
        assert_eq!(
            foundation.preview.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
            vec!["e", "c"]
        );
        assert_eq!(foundation.overflow, 2);
    }

    #[test]
    fn preview_falls_back_to_first_three() {
        let eras = default_eras();
        let events = vec![
            ev("late", 1980, EventType::Treaty, false),
            ev("early", 1967, EventType::Treaty, false),
            ev("mid", 1975, EventType::Treaty, false),
            ev("last", 1989, EventType::Treaty, false),
        ];
        let blocks = build_era_blocks(&events, &eras, TypeFilter::All, None);
        let preview: Vec<&str> = blocks[2].preview.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(preview, vec!["early", "mid", "late"]);
        assert_eq!(blocks[2].overflow, 1);
    }

    #[test]
    fn filtered_count_matches_type_total_inside_eras() {
        let eras = default_eras();
        let events = vec![
            ev("t1", 1950, EventType::Treaty, false),
            ev("t2", 1989, EventType::Treaty, false),
            ev("t3", 2010, EventType::Treaty, false),
            ev("t-gap", 1944, EventType::Treaty, false),
            ev("d1", 1948, EventType::Declaration, false),
            ev("i1", 1993, EventType::Institution, false),
        ];
        let blocks = build_era_blocks(&events, &eras, TypeFilter::Only(EventType::Treaty), None);
        let shown: usize = blocks.iter().map(|b| b.events.len()).sum();
        let expected = events
            .iter()
            .filter(|e| e.kind == EventType::Treaty && eras.iter().any(|era| era.contains(e.year)))
            .count();
        assert_eq!(shown, expected);
        assert_eq!(shown, 3);
    }

    #[test]
    fn zero_matches_render_empty_blocks() {
        let eras = default_eras();
        let events = vec![ev("t1", 1950, EventType::Treaty, false)];
        let blocks = build_era_blocks(&events, &eras, TypeFilter::Only(EventType::Charter), None);
        assert_eq!(blocks.len(), 5);
        assert!(blocks.iter().all(|b| b.events.is_empty() && b.preview.is_empty()));
    }

    #[test]
    fn present_label_is_display_only() {
        let eras = default_eras();
        assert_eq!(era_years_label(&eras[4]), "2006 – Present");
        assert_eq!(era_years_label(&eras[1]), "1945 – 1966");
        assert!(!eras[4].contains(PRESENT_END_YEAR));
    }
}
