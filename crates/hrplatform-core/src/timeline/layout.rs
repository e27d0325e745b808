//! Greedy label placement for the continuous timeline.
//!
//! Events alternate above and below the axis by index parity. Each event
//! tries up to [`MAX_LEVELS`] stacked offsets and takes the first one that
//! keeps it out of every earlier event's exclusion box. When all levels
//! collide the last level tried is kept, so dense clusters can still
//! overlap. Placement is order dependent: callers must pass events sorted
//! by year.

use super::scale::LinearScale;
use crate::model::Event;

/// Distance of the first level from the axis.
pub const BASE_OFFSET: f64 = 100.0;
/// Extra distance per level.
pub const LEVEL_HEIGHT: f64 = 60.0;
/// Levels tried before giving up.
pub const MAX_LEVELS: usize = 3;
/// Horizontal half-width of the exclusion box.
pub const MIN_DISTANCE_X: f64 = 100.0;
/// Vertical half-height of the exclusion box.
pub const MIN_DISTANCE_Y: f64 = 40.0;

/// Placement of one event marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventPosition {
    pub x: f64,
    pub y: f64,
    /// Level that was accepted (or the last tried).
    pub level: usize,
    pub above: bool,
}

fn collides(placed: &[EventPosition], x: f64, y: f64) -> bool {
    placed
        .iter()
        .any(|p| (p.x - x).abs() < MIN_DISTANCE_X && (p.y - y).abs() < MIN_DISTANCE_Y)
}

/// Compute marker positions for `events` (sorted by year) inside a band of
/// the given `height`, with the axis at `height / 2`.
pub fn calculate_event_positions(
    events: &[&Event],
    scale: &LinearScale,
    height: f64,
) -> Vec<EventPosition> {
    let axis = height / 2.0;
    let mut placed: Vec<EventPosition> = Vec::with_capacity(events.len());

    for (i, event) in events.iter().enumerate() {
        let x = scale.year(event.year);
        let above = i % 2 == 0;

        let mut y = axis;
        let mut level = 0;
        for l in 0..MAX_LEVELS {
            let offset = BASE_OFFSET + l as f64 * LEVEL_HEIGHT;
            y = if above { axis - offset } else { axis + offset };
            level = l;
            if !collides(&placed, x, y) {
                break;
            }
        }

        placed.push(EventPosition { x, y, level, above });
    }

    placed
}

/// Shorten `text` to `max_len` characters, ending in "..." when cut.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_len.saturating_sub(2)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EventType;

    fn ev(year: i32) -> Event {
        Event {
            id: format!("e{year}"),
            year,
            title: format!("Event {year}"),
            kind: EventType::Treaty,
            description: None,
            significance: None,
            system: None,
            highlight: false,
            related_id: None,
        }
    }

    fn scale() -> LinearScale {
        // 10px per year
        LinearScale::new((1900.0, 2000.0), (0.0, 1000.0))
    }

    #[test]
    fn alternates_above_and_below() {
        let events = [ev(1900), ev(1950), ev(2000)];
        let refs: Vec<&Event> = events.iter().collect();
        let pos = calculate_event_positions(&refs, &scale(), 400.0);

        assert_eq!(pos[0].y, 100.0);
        assert!(pos[0].above);
        assert_eq!(pos[1].y, 300.0);
        assert!(!pos[1].above);
        assert_eq!(pos[2].y, 100.0);
        assert!(pos.iter().all(|p| p.level == 0));
    }

    #[test]
    fn close_same_side_events_step_out_a_level() {
        // e0 above at x=0, e1 below at x=50, e2 above at x=80: collides with e0.
        let events = [ev(1900), ev(1905), ev(1908)];
        let refs: Vec<&Event> = events.iter().collect();
        let pos = calculate_event_positions(&refs, &scale(), 400.0);

        assert_eq!(pos[2].level, 1);
        assert_eq!(pos[2].y, 200.0 - 160.0);
    }

    #[test]
    fn dense_cluster_keeps_last_level() {
        // Seven events in the same year: the 4th above-axis marker finds all
        // three levels taken and stays on level 2.
        let events: Vec<Event> = (0..7).map(|_| ev(1950)).collect();
        let refs: Vec<&Event> = events.iter().collect();
        let pos = calculate_event_positions(&refs, &scale(), 400.0);

        let above: Vec<_> = pos.iter().filter(|p| p.above).collect();
        assert_eq!(above.len(), 4);
        assert_eq!(
            above.iter().map(|p| p.level).collect::<Vec<_>>(),
            vec![0, 1, 2, 2]
        );
        assert_eq!(above[3].y, above[2].y);
    }

    #[test]
    fn exclusion_needs_both_axes() {
        // Same x but 120px apart vertically on opposite sides: no collision.
        let events = [ev(1950), ev(1950)];
        let refs: Vec<&Event> = events.iter().collect();
        let pos = calculate_event_positions(&refs, &scale(), 400.0);
        assert_eq!(pos[0].level, 0);
        assert_eq!(pos[1].level, 0);
    }

    #[test]
    fn truncates_long_labels() {
        assert_eq!(truncate_text("Magna Carta", 18), "Magna Carta");
        assert_eq!(
            truncate_text("Universal Declaration of Human Rights", 18),
            "Universal Declar..."
        );
    }
}
