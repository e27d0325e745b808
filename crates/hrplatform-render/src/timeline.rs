//! Timeline section: era blocks, continuous zoom view and stacked rows.
//!
//! All three presentations are rendered up front from the same
//! [`TimelineState`]; the page script only toggles which one is visible.

use hrplatform_core::loader::DataSet;
use hrplatform_core::model::Era;
use hrplatform_core::timeline::eras::EraBlock;
use hrplatform_core::timeline::stacked::StackedView;
use hrplatform_core::timeline::zoom::ContinuousView;
use hrplatform_core::timeline::{
    build_era_blocks, event_detail, TimelineState, TimelineView, TypeFilter, ViewMode,
};

use crate::html::{escape, num};

/// Height of one stacked row.
const ROW_HEIGHT: f64 = 60.0;

/// Render the timeline section body. Empty when there are no events.
pub fn render_timeline_section(state: &TimelineState, data: &DataSet) -> String {
    if data.events.is_empty() {
        return String::new();
    }

    let mut html = String::new();
    html.push_str("<h2>Timeline</h2>\n");

    html.push_str("<div class=\"toolbar view-toggle\">\n");
    for mode in ViewMode::ALL {
        let active = if mode == state.view() { " active" } else { "" };
        html.push_str(&format!(
            "<button class=\"view-btn{active}\" data-view=\"{mode}\">{}</button>\n",
            view_label(mode)
        ));
    }
    html.push_str("</div>\n");

    html.push_str("<div class=\"toolbar timeline-filters\">\n");
    for filter in TypeFilter::ALL {
        let active = if filter == state.filter() { " active" } else { "" };
        html.push_str(&format!(
            "<button class=\"filter-btn{active}\" data-filter=\"{filter}\">{}</button>\n",
            capitalize(&filter.to_string())
        ));
    }
    html.push_str("</div>\n");

    for mode in ViewMode::ALL {
        let hidden = if mode == state.view() { "" } else { " hidden" };
        html.push_str(&format!(
            "<div class=\"timeline-view\" data-view=\"{mode}\"{hidden}>\n"
        ));
        match mode {
            // One block set per filter; the script swaps between them.
            ViewMode::Eras => {
                for filter in TypeFilter::ALL {
                    let blocks =
                        build_era_blocks(&data.events, &data.eras, filter, state.selected_era());
                    html.push_str(&render_era_blocks(&blocks, filter, filter == state.filter()));
                }
            }
            _ => match state.render_mode(mode, &data.events, &data.eras) {
                Some(TimelineView::Zoom(view)) => html.push_str(&render_continuous(
                    &view,
                    &data.eras,
                    state.zoom.percent_label(),
                )),
                Some(TimelineView::Stacked(view)) => html.push_str(&render_stacked(&view)),
                _ => {}
            },
        }
        html.push_str("</div>\n");
    }

    for event in &data.events {
        html.push_str(&render_event_detail(data, &event.id));
    }
    html
}

fn view_label(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::Eras => "Eras",
        ViewMode::Zoom => "Zoom",
        ViewMode::Stacked => "Stacked",
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Era-grouped blocks for one filter, with a collapsed preview and the
/// full expanded list. Sets for inactive filters are emitted `hidden`.
pub fn render_era_blocks(blocks: &[EraBlock<'_>], filter: TypeFilter, visible: bool) -> String {
    let mut html = String::new();
    let hidden = if visible { "" } else { " hidden" };
    html.push_str(&format!(
        "<div class=\"era-blocks\" data-type-filter=\"{filter}\"{hidden}>\n"
    ));
    for block in blocks {
        let expanded = if block.expanded { " expanded" } else { "" };
        html.push_str(&format!(
            "<div class=\"era-block{expanded}\" data-era=\"{}\" style=\"--era: {}\">\n",
            escape(&block.era.id),
            escape(&block.era.color)
        ));
        html.push_str(&format!(
            "<div class=\"era-header\"><h3>{}</h3><span class=\"era-years\">{}</span>\
             <span class=\"era-count\">{} events</span></div>\n",
            escape(&block.era.name),
            escape(&block.years_label()),
            block.events.len()
        ));
        if !block.era.description.is_empty() {
            html.push_str(&format!(
                "<p class=\"era-description\">{}</p>\n",
                escape(&block.era.description)
            ));
        }

        html.push_str("<div class=\"era-preview\">\n");
        for event in &block.preview {
            html.push_str(&format!(
                "<span class=\"era-preview-item\" data-event=\"{}\" data-type=\"{}\">{} {}</span>\n",
                escape(&event.id),
                event.kind,
                event.year,
                escape(&event.title)
            ));
        }
        if block.overflow > 0 {
            html.push_str(&format!(
                "<span class=\"era-overflow\">+{} more</span>\n",
                block.overflow
            ));
        }
        html.push_str("</div>\n");

        html.push_str("<div class=\"era-events\">\n");
        for event in &block.events {
            html.push_str(&format!(
                "<div class=\"era-event\" data-event=\"{}\" data-type=\"{}\">\
                 <span class=\"era-event-year\">{}</span> \
                 <span class=\"era-event-dot\" style=\"color: {}\">&#9679;</span> {}</div>\n",
                escape(&event.id),
                event.kind,
                event.year,
                event.kind.color(),
                escape(&event.title)
            ));
        }
        html.push_str("</div>\n</div>\n");
    }
    html.push_str("</div>\n");
    html
}

/// Continuous SVG axis with era bands, ticks, markers and the zoom controls.
///
/// Positions are emitted at zoom factor 1 together with `data-x`, so the
/// script can re-place them horizontally without stretching the circles.
pub fn render_continuous(view: &ContinuousView<'_>, eras: &[Era], zoom_label: String) -> String {
    let mut html = String::new();
    let axis_y = view.axis_y();

    html.push_str("<div class=\"toolbar zoom-controls\">\n");
    html.push_str("<button id=\"zoomOut\" title=\"Zoom out\">&minus;</button>\n");
    html.push_str(&format!("<span id=\"zoomLevel\">{zoom_label}</span>\n"));
    html.push_str("<button id=\"zoomIn\" title=\"Zoom in\">+</button>\n");
    html.push_str("<button id=\"zoomReset\">Reset</button>\n");
    for era in eras {
        html.push_str(&format!(
            "<button class=\"era-nav-btn\" data-x=\"{}\" style=\"border-color: {}\">{}</button>\n",
            num(view.era_x(era)),
            escape(&era.color),
            escape(&era.name)
        ));
    }
    html.push_str("</div>\n");

    html.push_str(&format!(
        "<div class=\"timeline-scroller\" id=\"zoomScroller\" data-focus-x=\"{}\">\n",
        num(view.initial_scroll(0.0))
    ));
    html.push_str(&format!(
        "<svg id=\"zoomCanvas\" width=\"{w}\" height=\"{h}\" data-width=\"{w}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        w = num(view.width),
        h = num(view.height)
    ));

    for band in &view.bands {
        html.push_str(&format!(
            "<rect class=\"era-band\" x=\"{x}\" y=\"0\" width=\"{w}\" height=\"{h}\" fill=\"{c}\" fill-opacity=\"0.08\" data-x1=\"{x}\" data-x2=\"{x2}\"/>\n",
            x = num(band.x1),
            x2 = num(band.x2),
            w = num(band.x2 - band.x1),
            h = num(view.height),
            c = escape(&band.era.color)
        ));
    }

    html.push_str(&format!(
        "<line x1=\"0\" y1=\"{y}\" x2=\"100%\" y2=\"{y}\" stroke=\"currentColor\" stroke-width=\"2\"/>\n",
        y = num(axis_y)
    ));
    for (year, x) in &view.ticks {
        html.push_str(&format!(
            "<g class=\"tick\" transform=\"translate({x},{y})\" data-x=\"{x}\" data-y=\"{y}\">\
             <line y2=\"6\" stroke=\"currentColor\"/>\
             <text y=\"20\" text-anchor=\"middle\" font-size=\"11\" fill=\"currentColor\">{year}</text></g>\n",
            x = num(*x),
            y = num(axis_y)
        ));
    }

    for marker in &view.markers {
        let stem = axis_y - marker.y;
        let label_y = if marker.above {
            -marker.radius - 8.0
        } else {
            marker.radius + 16.0
        };
        html.push_str(&format!(
            "<g class=\"zoom-marker\" data-event=\"{id}\" data-type=\"{kind}\" transform=\"translate({x},{y})\" \
             data-x=\"{x}\" data-y=\"{y}\" opacity=\"{op}\">\
             <line y2=\"{stem}\" stroke=\"{c}\" stroke-dasharray=\"2,2\"/>\
             <circle r=\"{r}\" fill=\"{c}\"/>\
             <text y=\"{ly}\" text-anchor=\"middle\" font-size=\"11\" fill=\"currentColor\">{label}</text>\
             <title>{year}: {title}</title></g>\n",
            id = escape(&marker.event.id),
            kind = marker.event.kind,
            x = num(marker.x),
            y = num(marker.y),
            op = marker.opacity,
            stem = num(stem),
            c = marker.event.kind.color(),
            r = num(marker.radius),
            ly = num(label_y),
            label = escape(&marker.label),
            year = marker.event.year,
            title = escape(&marker.event.title)
        ));
    }

    html.push_str("</svg>\n</div>\n");
    html
}

/// One SVG row per event type.
pub fn render_stacked(view: &StackedView<'_>) -> String {
    let mut html = String::new();
    html.push_str("<div class=\"stacked-rows\">\n");
    for row in &view.rows {
        html.push_str(&format!(
            "<div class=\"stacked-row\" data-type=\"{}\" style=\"opacity: {}\">\n",
            row.kind, row.opacity
        ));
        html.push_str(&format!(
            "<div class=\"stacked-label\" style=\"color: {}\">{}</div>\n",
            row.kind.color(),
            escape(&row.label())
        ));
        html.push_str(&format!(
            "<svg width=\"{w}\" height=\"{h}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
            w = num(view.width),
            h = num(ROW_HEIGHT)
        ));
        html.push_str(&format!(
            "<line x1=\"0\" y1=\"{y}\" x2=\"{w}\" y2=\"{y}\" stroke=\"currentColor\" stroke-opacity=\"0.2\"/>\n",
            y = num(ROW_HEIGHT / 2.0),
            w = num(view.width)
        ));
        for mark in &row.marks {
            html.push_str(&format!(
                "<circle class=\"stacked-mark\" data-event=\"{}\" cx=\"{}\" cy=\"{}\" r=\"6\" fill=\"{}\">\
                 <title>{}: {}</title></circle>\n",
                escape(&mark.event.id),
                num(mark.x),
                num(ROW_HEIGHT / 2.0),
                row.kind.color(),
                mark.event.year,
                escape(&mark.event.title)
            ));
        }
        html.push_str("</svg>\n</div>\n");
    }

    html.push_str(&format!(
        "<svg class=\"stacked-axis\" width=\"{}\" height=\"24\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        num(view.width)
    ));
    for (year, x) in &view.ticks {
        html.push_str(&format!(
            "<text x=\"{}\" y=\"16\" text-anchor=\"middle\" font-size=\"11\" fill=\"currentColor\">{year}</text>\n",
            num(*x)
        ));
    }
    html.push_str("</svg>\n</div>\n");
    html
}

/// Hidden detail block for one event, opened in the modal on click.
pub fn render_event_detail(data: &DataSet, event_id: &str) -> String {
    let Some(detail) = event_detail(data, event_id) else {
        return String::new();
    };
    let event = detail.event;

    let mut html = String::new();
    html.push_str(&format!(
        "<div class=\"event-detail\" data-id=\"{}\">\n",
        escape(&event.id)
    ));
    html.push_str(&format!(
        "<span class=\"badge\" style=\"background: {}; color: #fff\">{}</span>\n",
        detail.color,
        escape(&detail.type_label)
    ));
    if let Some(badge) = &detail.system_badge {
        html.push_str(&format!("<span class=\"badge\">{}</span>\n", escape(badge)));
    }
    html.push_str(&format!(
        "<h2>{}</h2>\n<p class=\"event-year\">{}</p>\n",
        escape(&event.title),
        event.year
    ));
    if let Some(description) = &event.description {
        html.push_str(&format!("<p>{}</p>\n", escape(description)));
    }
    if let Some(significance) = &event.significance {
        html.push_str(&format!(
            "<h4>Significance</h4>\n<p>{}</p>\n",
            escape(significance)
        ));
    }
    if let Some(treaty) = detail.related {
        html.push_str(&format!(
            "<h4>Related Treaty</h4>\n<p><strong>{}</strong> {}</p>\n",
            escape(&treaty.short_name),
            escape(&treaty.full_name)
        ));
        if let Some(parties) = treaty.states_parties {
            html.push_str(&format!("<p>States Parties: {parties}</p>\n"));
        }
    }
    html.push_str("</div>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrplatform_core::model::{Event, EventType, Treaty};

    fn ev(id: &str, year: i32, kind: EventType, highlight: bool) -> Event {
        Event {
            id: id.into(),
            year,
            title: format!("{id} <title>"),
            kind,
            description: Some("A description".into()),
            significance: None,
            system: Some("un".into()),
            highlight,
            related_id: None,
        }
    }

    fn data() -> DataSet {
        let mut data = DataSet::default();
        data.events = vec![
            ev("charter", 1945, EventType::Charter, true),
            ev("udhr", 1948, EventType::Declaration, true),
            ev("echr", 1950, EventType::Treaty, false),
            ev("cerd", 1965, EventType::Treaty, false),
            ev("iccpr", 1966, EventType::Treaty, true),
        ];
        data
    }

    #[test]
    fn no_events_renders_nothing() {
        assert!(render_timeline_section(&TimelineState::new(), &DataSet::default()).is_empty());
    }

    #[test]
    fn all_views_present_and_active_one_visible() {
        let mut state = TimelineState::new();
        state.set_view(ViewMode::Stacked);
        let html = render_timeline_section(&state, &data());

        assert!(html.contains("data-view=\"eras\" hidden"));
        assert!(html.contains("data-view=\"zoom\" hidden"));
        assert!(html.contains("<div class=\"timeline-view\" data-view=\"stacked\">"));
        assert!(html.contains("view-btn active\" data-view=\"stacked\""));
        assert!(html.contains("filter-btn active\" data-filter=\"all\""));
        assert!(html.contains("&lt;title&gt;"));
        assert!(!html.contains("<title><"));
    }

    #[test]
    fn foundation_era_groups_and_overflows() {
        let data = data();
        let state = TimelineState::new();
        let html = render_timeline_section(&state, &data);
        assert!(html.contains("Foundation Era"));
        assert!(html.contains("1945 – 1966"));
        assert!(html.contains("4 events"));
        assert!(html.contains("+1 more"));
        assert!(html.contains("2006 – Present"));
    }

    #[test]
    fn filter_dims_markers_and_rows() {
        let data = data();
        let mut state = TimelineState::new();
        state.set_filter(TypeFilter::Only(EventType::Treaty));
        let html = render_timeline_section(&state, &data);
        assert!(html.contains("filter-btn active\" data-filter=\"treaty\""));
        assert!(html.contains("opacity=\"0.15\""));
        assert!(html.contains("data-type=\"declaration\" style=\"opacity: 0.3\""));
        assert!(html.contains("Treaties (3)"));
    }

    #[test]
    fn every_filter_has_its_own_era_blocks() {
        let mut state = TimelineState::new();
        state.set_filter(TypeFilter::Only(EventType::Treaty));
        let html = render_timeline_section(&state, &data());

        assert_eq!(html.matches("<div class=\"era-blocks\"").count(), 7);
        assert!(html.contains("<div class=\"era-blocks\" data-type-filter=\"treaty\">"));
        assert!(html.contains("<div class=\"era-blocks\" data-type-filter=\"all\" hidden>"));

        // The unfiltered set still carries every event, so "All" can restore them.
        let all_start = html.find("data-type-filter=\"all\"").unwrap();
        let all_end = html.find("data-type-filter=\"treaty\"").unwrap();
        let all_set = &html[all_start..all_end];
        assert!(all_set.contains("data-event=\"udhr\""));
        assert!(all_set.contains("4 events"));
        assert!(all_set.contains("+1 more"));

        let treaty_end = html.find("data-type-filter=\"institution\"").unwrap();
        let treaty_set = &html[all_end..treaty_end];
        assert!(!treaty_set.contains("udhr"));
        assert!(treaty_set.contains("2 events"));
        assert!(!treaty_set.contains("+1 more"));
        assert!(treaty_set.contains("era-preview-item\" data-event=\"echr\" data-type=\"treaty\""));
    }

    #[test]
    fn expanded_era_is_shared_by_every_filter_set() {
        let mut state = TimelineState::new();
        state.toggle_era("foundation");
        let html = render_timeline_section(&state, &data());
        assert_eq!(
            html.matches("era-block expanded\" data-era=\"foundation\"").count(),
            7
        );
    }

    #[test]
    fn zoom_controls_and_era_nav() {
        let html = render_timeline_section(&TimelineState::new(), &data());
        assert!(html.contains("id=\"zoomLevel\">100%"));
        assert_eq!(html.matches("class=\"era-nav-btn\"").count(), 5);
        assert!(html.contains("data-x1="));
    }

    #[test]
    fn event_detail_includes_related_treaty() {
        let mut data = data();
        data.events[4].related_id = Some("iccpr".into());
        data.events[4].system = Some("inter-american".into());
        data.treaties.push(Treaty {
            id: "iccpr".into(),
            full_name: "International Covenant on Civil and Political Rights".into(),
            short_name: "ICCPR".into(),
            system: "un".into(),
            adopted: Some(1966),
            entered_force: Some(1976),
            states_parties: Some(173),
            key_articles: vec![],
            optional_protocols: vec![],
            significance: None,
            monitoring_body: None,
            color: None,
        });
        let html = render_event_detail(&data, "iccpr");
        assert!(html.contains("Related Treaty"));
        assert!(html.contains("States Parties: 173"));
        assert!(html.contains("INTER AMERICAN"));
        assert!(html.contains(">Treaty</span>"));
        assert!(render_event_detail(&data, "missing").is_empty());
    }
}
