//! Stacked per-type rows.

use super::scale::{year_extent, year_ticks, LinearScale};
use super::TypeFilter;
use crate::model::{Event, EventType};

/// Pixel width of a stacked row.
pub const TRACK_WIDTH: f64 = 2000.0;
/// Horizontal inset of the scale inside a row.
pub const TRACK_INSET: f64 = 50.0;
/// Year padding on both sides of the data extent.
pub const TRACK_YEAR_PADDING: i32 = 20;
/// Opacity of rows hidden by the filter.
pub const FILTERED_OPACITY: f64 = 0.3;

/// One event mark on a row.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedMark<'a> {
    pub event: &'a Event,
    pub x: f64,
}

/// A row for one event type.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedRow<'a> {
    pub kind: EventType,
    pub marks: Vec<StackedMark<'a>>,
    /// 1.0, or [`FILTERED_OPACITY`] when the filter excludes this type.
    pub opacity: f64,
}

impl StackedRow<'_> {
    /// "Treaties (12)".
    pub fn label(&self) -> String {
        format!("{} ({})", self.kind.plural_label(), self.marks.len())
    }
}

/// The whole stacked view.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedView<'a> {
    pub width: f64,
    pub rows: Vec<StackedRow<'a>>,
    /// Axis labels `(year, x)`.
    pub ticks: Vec<(i32, f64)>,
}

/// Build rows for every type that has at least one event. Filtering dims
/// rows instead of removing them so the layout stays put.
pub fn build_stacked_view(events: &[Event], filter: TypeFilter) -> Option<StackedView<'_>> {
    let (min, max) = year_extent(events.iter().map(|e| e.year))?;
    let scale = LinearScale::padded_extent(
        [min, max],
        TRACK_YEAR_PADDING,
        (TRACK_INSET, TRACK_WIDTH - TRACK_INSET),
    )?;

    let rows = EventType::ALL
        .iter()
        .filter_map(|&kind| {
            let marks: Vec<StackedMark<'_>> = events
                .iter()
                .filter(|e| e.kind == kind)
                .map(|event| StackedMark {
                    event,
                    x: scale.year(event.year),
                })
                .collect();
            if marks.is_empty() {
                return None;
            }
            Some(StackedRow {
                kind,
                marks,
                opacity: if filter.matches(kind) {
                    1.0
                } else {
                    FILTERED_OPACITY
                },
            })
        })
        .collect();

    let ticks = year_ticks(min, max, 50)
        .into_iter()
        .map(|y| (y, scale.year(y)))
        .collect();

    Some(StackedView {
        width: TRACK_WIDTH,
        rows,
        ticks,
    })
}
