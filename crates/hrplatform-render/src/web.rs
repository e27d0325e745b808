//! Relationship diagram section.

use hrplatform_core::loader::DataSet;
use hrplatform_core::web::{ForceLayout, Graph, LayoutParams, Node, NodeData, NodeShape};

use crate::html::{escape, num};

/// Render the relationship diagram with nodes placed by the force layout.
/// `filter` pre-applies a protection-system filter (from `#spider-web?filter=`
/// style navigation); the script can change it afterwards.
pub fn render_web_section(data: &DataSet, filter: Option<&str>) -> String {
    let graph = Graph::build(&data.institutions, &data.treaties, &data.connections);
    let params = LayoutParams::default();
    let positions = graph.layout(&ForceLayout, &params);
    let opacities = graph.system_filter(filter);

    let mut html = String::new();
    html.push_str("<h2>Institutions and Treaties</h2>\n");

    html.push_str("<div class=\"toolbar\">\n");
    let mut systems: Vec<&str> = Vec::new();
    for node in &graph.nodes {
        if !systems.contains(&node.system) {
            systems.push(node.system);
        }
    }
    let active = filter.unwrap_or("all");
    for system in std::iter::once("all").chain(systems.iter().copied()) {
        let class = if system == active { " active" } else { "" };
        let label = if system == "all" {
            "All".to_string()
        } else {
            system.replacen('-', " ", 1).to_uppercase()
        };
        html.push_str(&format!(
            "<button class=\"filter-btn{class}\" data-filter=\"{}\">{}</button>\n",
            escape(system),
            escape(&label)
        ));
    }
    html.push_str(
        "<input type=\"search\" id=\"webSearch\" placeholder=\"Find a body or treaty...\" autocomplete=\"off\">\n",
    );
    html.push_str("</div>\n");

    html.push_str("<div class=\"web-container\">\n");
    html.push_str(&format!(
        "<svg viewBox=\"0 0 {w} {h}\" width=\"{w}\" height=\"{h}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        w = num(params.width),
        h = num(params.height)
    ));

    html.push_str("<g class=\"links\">\n");
    for (i, edge) in graph.edges.iter().enumerate() {
        let (a, b) = (&positions[edge.source], &positions[edge.target]);
        let (source, target) = (&graph.nodes[edge.source], &graph.nodes[edge.target]);
        html.push_str(&format!(
            "<line class=\"link\" data-source=\"{}\" data-target=\"{}\" data-systems=\"{} {}\" data-kind=\"{}\" \
             x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#999\" stroke-width=\"{}\" style=\"opacity: {}\"/>\n",
            escape(source.id),
            escape(target.id),
            escape(source.system),
            escape(target.system),
            escape(edge.kind),
            num(a.x),
            num(a.y),
            num(b.x),
            num(b.y),
            num(edge.stroke_width()),
            opacities.edges[i]
        ));
    }
    html.push_str("</g>\n");

    html.push_str("<g class=\"nodes\">\n");
    for (i, node) in graph.nodes.iter().enumerate() {
        let neighbors: Vec<&str> = graph
            .neighbors(i)
            .into_iter()
            .map(|n| graph.nodes[n].id)
            .collect();
        let p = &positions[i];
        html.push_str(&format!(
            "<g class=\"node\" data-id=\"{}\" data-system=\"{}\" data-kind=\"{}\" data-label=\"{}\" data-name=\"{}\" \
             data-neighbors=\"{}\" transform=\"translate({},{})\" style=\"opacity: {}\">\n",
            escape(node.id),
            escape(node.system),
            escape(node.kind),
            escape(&node.label),
            escape(node.full_name),
            escape(&neighbors.join(" ")),
            num(p.x),
            num(p.y),
            opacities.nodes[i]
        ));
        html.push_str(&shape_markup(node));
        html.push_str(&format!(
            "<text dy=\"{}\" text-anchor=\"middle\" font-size=\"11\" fill=\"currentColor\">{}</text>\n",
            num(node.size() / 2.0 + 15.0),
            escape(&node.label)
        ));
        html.push_str(&format!("<title>{}</title>\n", escape(node.full_name)));
        html.push_str("</g>\n");
    }
    html.push_str("</g>\n</svg>\n</div>\n");

    for (i, node) in graph.nodes.iter().enumerate() {
        html.push_str(&render_node_detail(&graph, i, node));
    }
    html
}

fn shape_markup(node: &Node<'_>) -> String {
    let h = node.size() / 2.0;
    let fill = escape(&node.color);
    match node.shape() {
        NodeShape::Circle => format!("<circle r=\"{}\" fill=\"{fill}\"/>\n", num(h)),
        NodeShape::Square => format!(
            "<rect x=\"{m}\" y=\"{m}\" width=\"{s}\" height=\"{s}\" fill=\"{fill}\"/>\n",
            m = num(-h),
            s = num(2.0 * h)
        ),
        NodeShape::Triangle => format!(
            "<polygon points=\"0,{} {},{} {},{}\" fill=\"{fill}\"/>\n",
            num(-h),
            num(h),
            num(h),
            num(-h),
            num(h)
        ),
        NodeShape::Diamond => format!(
            "<polygon points=\"0,{n} {h},0 0,{h} {n},0\" fill=\"{fill}\"/>\n",
            n = num(-h),
            h = num(h)
        ),
        NodeShape::Hexagon => {
            let points: Vec<String> = (0..6)
                .map(|k| {
                    let angle = std::f64::consts::PI / 3.0 * k as f64;
                    format!("{},{}", num(h * angle.cos()), num(h * angle.sin()))
                })
                .collect();
            format!("<polygon points=\"{}\" fill=\"{fill}\"/>\n", points.join(" "))
        }
    }
}

/// Hidden detail block for a node.
fn render_node_detail(graph: &Graph<'_>, index: usize, node: &Node<'_>) -> String {
    let mut html = String::new();
    html.push_str(&format!(
        "<div class=\"node-detail\" data-id=\"{}\">\n",
        escape(node.id)
    ));
    html.push_str(&format!(
        "<span class=\"badge\" style=\"background: {}; color: #fff\">{}</span>\n",
        escape(&node.color),
        escape(&node.system.to_uppercase())
    ));
    html.push_str(&format!(
        "<h2>{}</h2>\n<p class=\"node-type\">{}</p>\n",
        escape(node.full_name),
        escape(&node.kind.replacen('-', " ", 1))
    ));

    let mut rows: Vec<(&str, String)> = Vec::new();
    match node.data {
        NodeData::Institution(inst) => {
            if let Some(description) = &inst.description {
                html.push_str(&format!("<p>{}</p>\n", escape(description)));
            }
            if let Some(year) = inst.established {
                rows.push(("Established", year.to_string()));
            }
            if let Some(location) = &inst.location {
                rows.push(("Location", location.clone()));
            }
            if let Some(composition) = &inst.composition {
                rows.push(("Composition", composition.clone()));
            }
        }
        NodeData::Treaty(treaty) => {
            if let Some(year) = treaty.adopted {
                rows.push(("Adopted", year.to_string()));
            }
            if let Some(parties) = treaty.states_parties {
                rows.push(("States Parties", parties.to_string()));
            }
            if let Some(significance) = &treaty.significance {
                rows.push(("Significance", significance.clone()));
            }
        }
    }
    for (label, value) in rows {
        html.push_str(&format!(
            "<p><strong>{label}:</strong> {}</p>\n",
            escape(&value)
        ));
    }

    let neighbors = graph.neighbors(index);
    if !neighbors.is_empty() {
        html.push_str("<h4>Connections</h4>\n<ul>\n");
        for n in neighbors {
            html.push_str(&format!("<li>{}</li>\n", escape(&graph.nodes[n].label)));
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</div>\n");
    html
}
