//! Continuous zoomable/pannable timeline.

use super::layout::{calculate_event_positions, truncate_text};
use super::scale::{year_extent, year_ticks, LinearScale};
use super::TypeFilter;
use crate::model::{Era, Event};

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 4.0;
/// Multiplicative change per control action or wheel tick.
pub const ZOOM_STEP: f64 = 1.15;
/// Horizontal scroll per keyboard press or shift-wheel tick.
pub const PAN_STEP: f64 = 100.0;

/// Minimum pixel width of the axis.
pub const MIN_WIDTH: f64 = 3000.0;
/// Pixel width reserved per event.
pub const EVENT_SPACING: f64 = 120.0;
/// Height of the drawing band (axis sits in the middle).
pub const BAND_HEIGHT: f64 = 400.0;
/// Outer margin on every side.
pub const MARGIN: f64 = 100.0;
/// Year padding on both sides of the data extent.
pub const YEAR_PADDING: i32 = 30;
/// Year the view initially scrolls towards.
pub const FOCUS_YEAR: i32 = 1940;
/// Opacity of markers hidden by the filter.
pub const DIMMED_OPACITY: f64 = 0.15;
/// Label characters before truncation.
pub const LABEL_CHARS: usize = 18;

/// Zoom factor and horizontal scroll of the continuous view.
///
/// Zoom only stretches the horizontal extent; rows keep their height.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomState {
    factor: f64,
    scroll_x: f64,
    drag: Option<DragAnchor>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragAnchor {
    pointer_x: f64,
    scroll_x: f64,
}

/// Keyboard pan direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    Left,
    Right,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self {
            factor: 1.0,
            scroll_x: 0.0,
            drag: None,
        }
    }
}

impl ZoomState {
    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn scroll_x(&self) -> f64 {
        self.scroll_x
    }

    /// "115%".
    pub fn percent_label(&self) -> String {
        format!("{}%", (self.factor * 100.0).round())
    }

    pub fn zoom_in(&mut self) {
        self.factor = (self.factor * ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.factor = (self.factor / ZOOM_STEP).max(MIN_ZOOM);
    }

    pub fn reset(&mut self) {
        self.factor = 1.0;
    }

    /// One wheel tick. Shift turns the wheel into a horizontal pan; otherwise
    /// scrolling up (negative delta) zooms in.
    pub fn wheel(&mut self, delta_y: f64, shift: bool) {
        if shift {
            self.scroll_by(delta_y.signum() * PAN_STEP);
        } else if delta_y < 0.0 {
            self.zoom_in();
        } else if delta_y > 0.0 {
            self.zoom_out();
        }
    }

    pub fn pan(&mut self, direction: PanDirection) {
        match direction {
            PanDirection::Left => self.scroll_by(-PAN_STEP),
            PanDirection::Right => self.scroll_by(PAN_STEP),
        }
    }

    pub fn scroll_by(&mut self, dx: f64) {
        self.scroll_to(self.scroll_x + dx);
    }

    pub fn scroll_to(&mut self, x: f64) {
        self.scroll_x = x.max(0.0);
    }

    pub fn pointer_down(&mut self, pointer_x: f64) {
        self.drag = Some(DragAnchor {
            pointer_x,
            scroll_x: self.scroll_x,
        });
    }

    /// Move during a drag; no effect without a preceding pointer-down.
    pub fn pointer_move(&mut self, pointer_x: f64) {
        if let Some(anchor) = self.drag {
            self.scroll_to(anchor.scroll_x - (pointer_x - anchor.pointer_x));
        }
    }

    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Horizontal extent of content `width` px wide at the current zoom.
    pub fn scaled_width(&self, width: f64) -> f64 {
        width * self.factor
    }
}

/// A background band for one era.
#[derive(Debug, Clone, PartialEq)]
pub struct EraBand<'a> {
    pub era: &'a Era,
    pub x1: f64,
    pub x2: f64,
}

/// A positioned event marker.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomMarker<'a> {
    pub event: &'a Event,
    pub x: f64,
    pub y: f64,
    pub above: bool,
    pub radius: f64,
    pub label: String,
    pub opacity: f64,
}

/// The continuous timeline, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousView<'a> {
    pub width: f64,
    pub height: f64,
    pub scale: LinearScale,
    pub bands: Vec<EraBand<'a>>,
    pub ticks: Vec<(i32, f64)>,
    pub markers: Vec<ZoomMarker<'a>>,
}

impl ContinuousView<'_> {
    pub fn axis_y(&self) -> f64 {
        self.height / 2.0
    }

    /// Scroll offset that puts the focus year a third into a viewport.
    pub fn initial_scroll(&self, viewport_width: f64) -> f64 {
        (self.scale.year(FOCUS_YEAR) - viewport_width / 3.0).max(0.0)
    }

    /// Unzoomed x of the start of `era`. Eras outside the data's year
    /// range map off-canvas.
    pub fn era_x(&self, era: &Era) -> f64 {
        self.scale.year(era.start)
    }

    /// Scroll offset for the era quick-nav button of `era`.
    pub fn era_scroll(&self, era: &Era) -> f64 {
        (self.era_x(era) - 100.0).max(0.0)
    }
}

/// Lay out every event on a continuous axis. Filtering dims markers but
/// keeps their positions.
pub fn build_continuous_view<'a>(
    events: &'a [Event],
    eras: &'a [Era],
    filter: TypeFilter,
) -> Option<ContinuousView<'a>> {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by_key(|e| e.year);

    let (min, max) = year_extent(sorted.iter().map(|e| e.year))?;
    let width = MIN_WIDTH.max(sorted.len() as f64 * EVENT_SPACING);
    let height = BAND_HEIGHT;
    let scale = LinearScale::padded_extent([min, max], YEAR_PADDING, (0.0, width))?;

    let bands = eras
        .iter()
        .filter_map(|era| {
            let x1 = scale.year(era.start).max(0.0);
            let x2 = scale.year(era.end).min(width);
            (x2 > x1).then_some(EraBand { era, x1, x2 })
        })
        .collect();

    let ticks = year_ticks(min, max, 50)
        .into_iter()
        .map(|y| (y, scale.year(y)))
        .collect();

    let positions = calculate_event_positions(&sorted, &scale, height);
    let markers = sorted
        .iter()
        .zip(positions)
        .map(|(event, pos)| ZoomMarker {
            event,
            x: pos.x,
            y: pos.y,
            above: pos.above,
            radius: if event.highlight { 18.0 } else { 14.0 },
            label: truncate_text(&event.title, LABEL_CHARS),
            opacity: if filter.matches(event.kind) {
                1.0
            } else {
                DIMMED_OPACITY
            },
        })
        .collect();

    Some(ContinuousView {
        width,
        height,
        scale,
        bands,
        ticks,
        markers,
    })
}
