//! Force-directed layout.
//!
//! [`LayoutEngine`] is the seam between the relationship diagram and
//! whatever simulation places its nodes. [`ForceLayout`] is the bundled
//! velocity-Verlet simulation: link springs weighted by connection
//! strength, all-pairs repulsion, collision separation and re-centering,
//! cooled by an exponentially decaying alpha.

use std::f64::consts::PI;

/// An edge between node indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutEdge {
    pub source: usize,
    pub target: usize,
    /// Connection strength in `[0, 1]`.
    pub strength: f64,
}

/// A node position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Simulation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParams {
    pub width: f64,
    pub height: f64,
    /// Rest length of every link.
    pub link_distance: f64,
    /// Link stiffness is `strength * link_strength_scale`.
    pub link_strength_scale: f64,
    /// Many-body strength; negative repels.
    pub charge: f64,
    /// Minimum distance kept between node centres is twice this.
    pub collision_radius: f64,
    pub iterations: usize,
    /// Fraction of velocity lost per tick.
    pub velocity_decay: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 600.0,
            link_distance: 100.0,
            link_strength_scale: 0.3,
            charge: -400.0,
            collision_radius: 50.0,
            iterations: 300,
            velocity_decay: 0.4,
        }
    }
}

/// Places `node_count` nodes given their edges.
pub trait LayoutEngine {
    fn layout(&self, node_count: usize, edges: &[LayoutEdge], params: &LayoutParams)
        -> Vec<Point>;
}

/// Deterministic force simulation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForceLayout;

const ALPHA_MIN: f64 = 0.001;

impl ForceLayout {
    /// Phyllotaxis spiral around the centre, so runs are reproducible.
    fn initial_positions(node_count: usize, params: &LayoutParams) -> Vec<Point> {
        let angle_step = PI * (3.0 - 5f64.sqrt());
        (0..node_count)
            .map(|i| {
                let radius = 10.0 * (0.5 + i as f64).sqrt();
                let angle = i as f64 * angle_step;
                Point {
                    x: params.width / 2.0 + radius * angle.cos(),
                    y: params.height / 2.0 + radius * angle.sin(),
                }
            })
            .collect()
    }

    /// Tiny deterministic offset for coincident nodes.
    fn jiggle(i: usize, j: usize) -> (f64, f64) {
        let seed = (i * 31 + j * 17) as f64;
        (1e-6 * (seed.sin()), 1e-6 * (seed.cos()))
    }
}

impl LayoutEngine for ForceLayout {
    fn layout(
        &self,
        node_count: usize,
        edges: &[LayoutEdge],
        params: &LayoutParams,
    ) -> Vec<Point> {
        let mut pos = Self::initial_positions(node_count, params);
        if node_count < 2 {
            return pos;
        }
        let mut vel = vec![Point::default(); node_count];

        let mut degree = vec![0usize; node_count];
        for e in edges {
            degree[e.source] += 1;
            degree[e.target] += 1;
        }

        let iterations = params.iterations.max(1);
        let alpha_decay = 1.0 - ALPHA_MIN.powf(1.0 / iterations as f64);
        let mut alpha = 1.0;
        let centre = Point {
            x: params.width / 2.0,
            y: params.height / 2.0,
        };

        for _ in 0..iterations {
            alpha += (0.0 - alpha) * alpha_decay;

            // Links
            for e in edges {
                if e.source == e.target {
                    continue;
                }
                let (s, t) = (e.source, e.target);
                let mut dx = pos[t].x + vel[t].x - pos[s].x - vel[s].x;
                let mut dy = pos[t].y + vel[t].y - pos[s].y - vel[s].y;
                if dx == 0.0 && dy == 0.0 {
                    (dx, dy) = Self::jiggle(s, t);
                }
                let len = (dx * dx + dy * dy).sqrt();
                let k = (len - params.link_distance) / len
                    * alpha
                    * e.strength
                    * params.link_strength_scale;
                let (fx, fy) = (dx * k, dy * k);
                let bias = degree[s] as f64 / (degree[s] + degree[t]) as f64;
                vel[t].x -= fx * bias;
                vel[t].y -= fy * bias;
                vel[s].x += fx * (1.0 - bias);
                vel[s].y += fy * (1.0 - bias);
            }

            // Repulsion and collision
            for i in 0..node_count {
                for j in (i + 1)..node_count {
                    let mut dx = pos[j].x - pos[i].x;
                    let mut dy = pos[j].y - pos[i].y;
                    if dx == 0.0 && dy == 0.0 {
                        (dx, dy) = Self::jiggle(i, j);
                    }
                    let l2 = (dx * dx + dy * dy).max(1.0);

                    let w = params.charge * alpha / l2;
                    vel[i].x += dx * w;
                    vel[i].y += dy * w;
                    vel[j].x -= dx * w;
                    vel[j].y -= dy * w;

                    let min = 2.0 * params.collision_radius;
                    let len = l2.sqrt();
                    if len < min {
                        let push = (min - len) / len * 0.5;
                        vel[i].x -= dx * push * 0.5;
                        vel[i].y -= dy * push * 0.5;
                        vel[j].x += dx * push * 0.5;
                        vel[j].y += dy * push * 0.5;
                    }
                }
            }

            let keep = 1.0 - params.velocity_decay;
            for (p, v) in pos.iter_mut().zip(vel.iter_mut()) {
                v.x *= keep;
                v.y *= keep;
                p.x += v.x;
                p.y += v.y;
            }

            // Centering
            let n = node_count as f64;
            let mean_x = pos.iter().map(|p| p.x).sum::<f64>() / n;
            let mean_y = pos.iter().map(|p| p.y).sum::<f64>() / n;
            for p in pos.iter_mut() {
                p.x += centre.x - mean_x;
                p.y += centre.y - mean_y;
            }
        }

        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_finite_and_centred() {
        let edges = [
            LayoutEdge {
                source: 0,
                target: 1,
                strength: 1.0,
            },
            LayoutEdge {
                source: 1,
                target: 2,
                strength: 0.5,
            },
        ];
        let params = LayoutParams::default();
        let pos = ForceLayout.layout(5, &edges, &params);

        assert_eq!(pos.len(), 5);
        assert!(pos.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
        let mean_x = pos.iter().map(|p| p.x).sum::<f64>() / 5.0;
        let mean_y = pos.iter().map(|p| p.y).sum::<f64>() / 5.0;
        assert!((mean_x - params.width / 2.0).abs() < 1e-6);
        assert!((mean_y - params.height / 2.0).abs() < 1e-6);
    }

    #[test]
    fn nodes_do_not_coincide() {
        let pos = ForceLayout.layout(8, &[], &LayoutParams::default());
        for i in 0..pos.len() {
            for j in (i + 1)..pos.len() {
                assert!(pos[i].distance(&pos[j]) > 1.0);
            }
        }
    }

    #[test]
    fn linked_nodes_sit_closer_than_unlinked() {
        let params = LayoutParams::default();
        let linked = ForceLayout.layout(
            2,
            &[LayoutEdge {
                source: 0,
                target: 1,
                strength: 1.0,
            }],
            &params,
        );
        let free = ForceLayout.layout(2, &[], &params);
        assert!(linked[0].distance(&linked[1]) < free[0].distance(&free[1]));
    }

    #[test]
    fn layout_is_deterministic() {
        let edges = [LayoutEdge {
            source: 0,
            target: 2,
            strength: 0.7,
        }];
        let params = LayoutParams::default();
        assert_eq!(
            ForceLayout.layout(4, &edges, &params),
            ForceLayout.layout(4, &edges, &params)
        );
    }

    #[test]
    fn trivial_graphs() {
        assert!(ForceLayout.layout(0, &[], &LayoutParams::default()).is_empty());
        let one = ForceLayout.layout(1, &[], &LayoutParams::default());
        assert_eq!(one.len(), 1);
    }
}
