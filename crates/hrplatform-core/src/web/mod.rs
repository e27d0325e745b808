//! Relationship diagram.
//!
//! Builds the node/edge graph of institutions and treaties, derives hover
//! highlights and filter opacities from it, and hands layout to a
//! [`LayoutEngine`].

pub mod force;

use std::collections::{BTreeSet, HashMap};

pub use force::{ForceLayout, LayoutEdge, LayoutEngine, LayoutParams, Point};

use crate::model::{system_color, Connection, Institution, Treaty};

/// Opacity of a node outside the active filter or search.
pub const NODE_DIMMED_OPACITY: f64 = 0.1;
/// Default edge opacity.
pub const EDGE_OPACITY: f64 = 0.6;
/// Opacity of an edge with no endpoint in the active filter.
pub const EDGE_DIMMED_OPACITY: f64 = 0.05;

/// What a node stands for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeData<'a> {
    Institution(&'a Institution),
    Treaty(&'a Treaty),
}

/// Drawing shape, by kind of body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    Hexagon,
    Triangle,
    Square,
    Diamond,
    Circle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node<'a> {
    pub id: &'a str,
    pub label: String,
    pub full_name: &'a str,
    /// Institution type, or "treaty".
    pub kind: &'a str,
    pub system: &'a str,
    pub color: String,
    pub data: NodeData<'a>,
}

impl Node<'_> {
    /// Shape size in pixels.
    pub fn size(&self) -> f64 {
        match self.kind {
            "organization" => 40.0,
            "principal-organ" | "court" | "charter" => 30.0,
            "treaty" => 28.0,
            "declaration" => 26.0,
            "mechanism" | "agency" => 22.0,
            _ => 25.0,
        }
    }

    pub fn shape(&self) -> NodeShape {
        match self.kind {
            "organization" => NodeShape::Hexagon,
            "court" => NodeShape::Triangle,
            "treaty-body" | "commission" | "agency" | "subsidiary-body" | "principal-organ" => {
                NodeShape::Square
            }
            "mechanism" => NodeShape::Diamond,
            _ => NodeShape::Circle,
        }
    }

    /// Case-insensitive substring match on label or full name.
    /// `query` must already be lower-case.
    fn matches(&self, query: &str) -> bool {
        self.label.to_lowercase().contains(query) || self.full_name.to_lowercase().contains(query)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge<'a> {
    pub source: usize,
    pub target: usize,
    pub kind: &'a str,
    pub strength: f64,
}

impl Edge<'_> {
    pub fn stroke_width(&self) -> f64 {
        (self.strength * 3.0).max(1.0)
    }
}

/// Node and edge opacities for a filter or search.
#[derive(Debug, Clone, PartialEq)]
pub struct Opacities {
    pub nodes: Vec<f64>,
    pub edges: Vec<f64>,
}

/// Derived hover state: a node plus its direct neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub focus: usize,
    /// Focus node and its 1-hop neighbours.
    pub connected: BTreeSet<usize>,
    /// Edges touching the focus node.
    pub edges: BTreeSet<usize>,
}

impl Highlight {
    pub fn is_dimmed(&self, node: usize) -> bool {
        !self.connected.contains(&node)
    }
}

/// The relationship graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph<'a> {
    pub nodes: Vec<Node<'a>>,
    pub edges: Vec<Edge<'a>>,
    index: HashMap<&'a str, usize>,
}

impl<'a> Graph<'a> {
    /// Union institutions and treaties (institutions win on id collision)
    /// and keep only connections whose endpoints both exist.
    pub fn build(
        institutions: &'a [Institution],
        treaties: &'a [Treaty],
        connections: &'a [Connection],
    ) -> Self {
        let mut nodes = Vec::with_capacity(institutions.len() + treaties.len());
        let mut index = HashMap::new();

        for inst in institutions {
            if index.contains_key(inst.id.as_str()) {
                continue;
            }
            index.insert(inst.id.as_str(), nodes.len());
            nodes.push(Node {
                id: &inst.id,
                label: inst.short_name.clone().unwrap_or_else(|| inst.name.clone()),
                full_name: &inst.name,
                kind: &inst.kind,
                system: &inst.system,
                color: inst
                    .color
                    .clone()
                    .unwrap_or_else(|| system_color(&inst.system).to_string()),
                data: NodeData::Institution(inst),
            });
        }

        for treaty in treaties {
            if index.contains_key(treaty.id.as_str()) {
                continue;
            }
            index.insert(treaty.id.as_str(), nodes.len());
            let label = if treaty.short_name.is_empty() {
                treaty.id.to_uppercase()
            } else {
                treaty.short_name.clone()
            };
            nodes.push(Node {
                id: &treaty.id,
                label,
                full_name: &treaty.full_name,
                kind: "treaty",
                system: &treaty.system,
                color: treaty
                    .color
                    .clone()
                    .unwrap_or_else(|| system_color(&treaty.system).to_string()),
                data: NodeData::Treaty(treaty),
            });
        }

        let mut dropped = 0usize;
        let edges = connections
            .iter()
            .filter_map(|conn| {
                let edge = match (index.get(conn.source.as_str()), index.get(conn.target.as_str()))
                {
                    (Some(&source), Some(&target)) => Some(Edge {
                        source,
                        target,
                        kind: &conn.kind,
                        strength: conn.strength.clamp(0.0, 1.0),
                    }),
                    _ => None,
                };
                if edge.is_none() {
                    dropped += 1;
                }
                edge
            })
            .collect();
        if dropped > 0 {
            tracing::debug!(dropped, "connections with unknown endpoints skipped");
        }

        Self {
            nodes,
            edges,
            index,
        }
    }

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&Node<'a>> {
        self.node_index(id).map(|i| &self.nodes[i])
    }

    /// Indices of nodes directly connected to `node`.
    pub fn neighbors(&self, node: usize) -> BTreeSet<usize> {
        self.edges
            .iter()
            .filter_map(|e| {
                if e.source == node {
                    Some(e.target)
                } else if e.target == node {
                    Some(e.source)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Hover highlight for node `id`.
    pub fn highlight(&self, id: &str) -> Option<Highlight> {
        let focus = self.node_index(id)?;
        let mut connected = self.neighbors(focus);
        connected.insert(focus);
        let edges = self
            .edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.source == focus || e.target == focus)
            .map(|(i, _)| i)
            .collect();
        Some(Highlight {
            focus,
            connected,
            edges,
        })
    }

    /// Opacities for a protection-system filter; `None` shows everything.
    pub fn system_filter(&self, system: Option<&str>) -> Opacities {
        let Some(system) = system else {
            return self.unfiltered();
        };
        Opacities {
            nodes: self
                .nodes
                .iter()
                .map(|n| {
                    if n.system == system {
                        1.0
                    } else {
                        NODE_DIMMED_OPACITY
                    }
                })
                .collect(),
            edges: self
                .edges
                .iter()
                .map(|e| {
                    if self.nodes[e.source].system == system || self.nodes[e.target].system == system
                    {
                        EDGE_OPACITY
                    } else {
                        EDGE_DIMMED_OPACITY
                    }
                })
                .collect(),
        }
    }

    /// Opacities for a label search. Edges are left untouched; an empty
    /// query resets everything.
    pub fn search(&self, query: &str) -> Opacities {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.unfiltered();
        }
        Opacities {
            nodes: self
                .nodes
                .iter()
                .map(|n| {
                    if n.matches(&query) {
                        1.0
                    } else {
                        NODE_DIMMED_OPACITY
                    }
                })
                .collect(),
            edges: vec![EDGE_OPACITY; self.edges.len()],
        }
    }

    fn unfiltered(&self) -> Opacities {
        Opacities {
            nodes: vec![1.0; self.nodes.len()],
            edges: vec![EDGE_OPACITY; self.edges.len()],
        }
    }

    /// Position every node with `engine`.
    pub fn layout<E: LayoutEngine + ?Sized>(&self, engine: &E, params: &LayoutParams) -> Vec<Point> {
        let edges: Vec<LayoutEdge> = self
            .edges
            .iter()
            .map(|e| LayoutEdge {
                source: e.source,
                target: e.target,
                strength: e.strength,
            })
            .collect();
        engine.layout(self.nodes.len(), &edges, params)
    }
}
