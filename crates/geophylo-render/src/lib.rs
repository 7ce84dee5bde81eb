#![forbid(unsafe_code)]

//! Headless SVG renderer for geophylogeny layouts.
//!
//! Draws the map rectangle, X-shaped site markers, leaders in the instance's
//! style, the tree with orthogonal edges, and id labels for sites and
//! leaves. Expects current coordinates (`compute_x_coordinates` plus
//! `compute_y_coordinates` with this renderer's `y_step`); rendering never
//! mutates the geophylogeny.

use geophylo::{Geophylogeny, LeaderStyle};
use std::fmt::Write as _;

const RECT_STROKE_WIDTH: f64 = 2.0;
const RECT_STROKE_COLOR: &str = "grey";
const VERTEX_RADIUS: f64 = 2.5;
const VERTEX_STROKE_WIDTH: f64 = 1.0;
const EDGE_STROKE_WIDTH: f64 = 2.0;
const MARKER_SIZE: f64 = 5.0;
const MARKER_STROKE_WIDTH: f64 = 1.5;
const LEADER_STROKE_WIDTH: f64 = 2.0;
const LEADER_COLOR: &str = "#666666";
const LABEL_OFFSET_TREE: f64 = -6.0;
const LABEL_OFFSET_SITES: f64 = 10.0;
const TREE_OFFSET: f64 = -16.0;

const CLUSTER_COLORS: &[&str] = &[
    "#1f78b4", "#33a02c", "#e31a1c", "#ff7f00", "#6a3d9a", "#b15928", "#a6cee3", "#b2df8a",
    "#fb9a99", "#fdbf6f", "#cab2d6", "#ffff99",
];

#[derive(Debug, Clone, Copy)]
pub struct SvgRenderOptions {
    /// Space between the map rectangle and the canvas edge.
    pub padding: f64,
    /// Vertical distance per unit of vertex height.
    pub y_step: f64,
    /// When true, draw id labels next to sites and leaves.
    pub include_labels: bool,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            padding: 5.0,
            y_step: 16.0,
            include_labels: true,
        }
    }
}

impl SvgRenderOptions {
    pub fn tree_canvas_height(&self, geophylogeny: &Geophylogeny) -> f64 {
        self.padding + geophylogeny.tree().height() * self.y_step + 20.0
    }
}

/// Renders the geophylogeny into an SVG document string.
pub fn render_geophylogeny_svg(geophylogeny: &Geophylogeny, options: &SvgRenderOptions) -> String {
    let map_width = f64::from(geophylogeny.map_width());
    let map_height = f64::from(geophylogeny.map_height());
    let tree_canvas_height = options.tree_canvas_height(geophylogeny);

    let canvas = Canvas {
        x_zero: options.padding,
        y_zero: tree_canvas_height,
        width: map_width + 2.0 * options.padding,
        height: map_height + tree_canvas_height,
    };

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        canvas.width + 50.0,
        canvas.height + 120.0,
        canvas.width,
        canvas.height,
    );

    if options.include_labels {
        write_labels(&mut svg, geophylogeny, &canvas);
    }
    if geophylogeny.leader_style() != LeaderStyle::None {
        write_leaders(&mut svg, geophylogeny, &canvas);
    }
    write_background(&mut svg, geophylogeny, &canvas);
    write_sites(&mut svg, geophylogeny, &canvas);
    write_edges(&mut svg, geophylogeny, &canvas);
    write_vertices(&mut svg, geophylogeny, &canvas);

    svg.push_str("</svg>\n");
    svg
}

/// Map-space to SVG-space offsets: the map rectangle starts at
/// `(x_zero, y_zero)` and the tree occupies the band above it.
struct Canvas {
    x_zero: f64,
    y_zero: f64,
    width: f64,
    height: f64,
}

impl Canvas {
    fn map_x(&self, x: f64) -> f64 {
        self.x_zero + x
    }

    fn map_y(&self, y: f64) -> f64 {
        self.y_zero + y
    }

    /// Model tree coordinates have leaves at y = 0 and ancestors at
    /// negative y, so the same offset applies.
    fn tree_y(&self, y: f64) -> f64 {
        self.y_zero + y + TREE_OFFSET
    }
}

fn write_background(svg: &mut String, geophylogeny: &Geophylogeny, canvas: &Canvas) {
    let _ = writeln!(
        svg,
        r#"<g id="backgroundLayer"><rect x="{}" y="{}" width="{}" height="{}" stroke-width="{RECT_STROKE_WIDTH}" stroke="{RECT_STROKE_COLOR}" fill="none"/></g>"#,
        canvas.x_zero,
        canvas.y_zero,
        geophylogeny.map_width(),
        geophylogeny.map_height(),
    );
}

fn write_leaders(svg: &mut String, geophylogeny: &Geophylogeny, canvas: &Canvas) {
    let _ = writeln!(svg, r#"<g id="leaderLayer">"#);
    for leaf in geophylogeny.tree().leaf_indices() {
        let site = geophylogeny.site_of_leaf(leaf);
        let x_site = canvas.map_x(site.x);
        let y_site = canvas.map_y(site.y);
        let x_leaf = canvas.map_x(geophylogeny.tree().vertex(leaf).x());
        let y_leaf = canvas.y_zero;

        let d = match geophylogeny.leader_style() {
            LeaderStyle::Po => {
                format!("M{x_site},{y_site} {x_leaf},{y_site} {x_leaf},{y_leaf}")
            }
            LeaderStyle::S => format!("M{x_site},{y_site} {x_leaf},{y_leaf}"),
            LeaderStyle::None => continue,
        };
        let _ = writeln!(
            svg,
            r#"<path stroke="{LEADER_COLOR}" stroke-width="{LEADER_STROKE_WIDTH}" fill="none" stroke-opacity="0.5" stroke-linecap="round" d="{d}"/>"#,
        );
    }
    let _ = writeln!(svg, "</g>");
}

fn write_labels(svg: &mut String, geophylogeny: &Geophylogeny, canvas: &Canvas) {
    let _ = writeln!(svg, r#"<g id="labelLayer">"#);
    for leaf in geophylogeny.tree().leaf_indices() {
        let site = geophylogeny.site_of_leaf(leaf);
        let id = geophylogeny.tree().vertex(leaf).id();

        let x_site_label = canvas.map_x(site.x);
        let y_site_label = canvas.map_y(site.y) + LABEL_OFFSET_SITES;
        let _ = writeln!(
            svg,
            r#"<text x="{x_site_label}" y="{y_site_label}" text-anchor="middle" dominant-baseline="middle" style="font-size: smaller;">{id}</text>"#,
        );

        let x_leaf_label = canvas.map_x(geophylogeny.tree().vertex(leaf).x());
        let y_leaf_label = canvas.tree_y(0.0) + LABEL_OFFSET_TREE;
        let _ = writeln!(
            svg,
            r#"<text x="{x_leaf_label}" y="{y_leaf_label}" text-anchor="middle" dominant-baseline="middle" style="font-size: smaller;">{id}</text>"#,
        );
    }
    let _ = writeln!(svg, "</g>");
}

fn write_sites(svg: &mut String, geophylogeny: &Geophylogeny, canvas: &Canvas) {
    let _ = writeln!(svg, r#"<g id="siteLayer">"#);
    for (leaf, site) in geophylogeny.sites().iter().enumerate() {
        let x = canvas.map_x(site.x);
        let y = canvas.map_y(site.y);
        let offset = MARKER_SIZE / 2.0;
        let d = format!(
            "M{},{} {},{} M {},{} {},{}",
            x - offset,
            y - offset,
            x + offset,
            y + offset,
            x - offset,
            y + offset,
            x + offset,
            y - offset,
        );
        let stroke = if geophylogeny.has_clusters() {
            cluster_color(site.cluster)
        } else {
            "black"
        };
        let _ = writeln!(
            svg,
            r#"<path id="s{}" stroke="{stroke}" stroke-width="{MARKER_STROKE_WIDTH}" fill="none" d="{d}"/>"#,
            leaf + 1,
        );
    }
    let _ = writeln!(svg, "</g>");
}

fn write_edges(svg: &mut String, geophylogeny: &Geophylogeny, canvas: &Canvas) {
    let tree = geophylogeny.tree();
    let _ = writeln!(svg, r#"<g id="edgeLayer">"#);
    for vertex in tree.vertices() {
        let Some(parent) = vertex.parent() else {
            continue;
        };
        let parent = tree.vertex(parent);
        let x1 = canvas.map_x(vertex.x());
        let y1 = canvas.tree_y(vertex.y());
        let x2 = canvas.map_x(parent.x());
        let y2 = canvas.tree_y(parent.y());
        let _ = writeln!(
            svg,
            r#"<path stroke="black" stroke-width="{EDGE_STROKE_WIDTH}" fill="none" d="M{x1},{y1} {x1},{y2} {x2},{y2}"/>"#,
        );
    }
    let _ = writeln!(svg, "</g>");
}

fn write_vertices(svg: &mut String, geophylogeny: &Geophylogeny, canvas: &Canvas) {
    let _ = writeln!(svg, r#"<g id="vertexLayer">"#);
    for vertex in geophylogeny.tree().vertices() {
        let cx = canvas.map_x(vertex.x());
        let cy = canvas.tree_y(vertex.y());
        let fill = if vertex.is_leaf() {
            if geophylogeny.has_clusters() {
                cluster_color(geophylogeny.site_of_leaf(vertex.index()).cluster)
            } else {
                "white"
            }
        } else {
            "black"
        };
        let _ = writeln!(
            svg,
            r#"<circle id="v{}" cx="{cx}" cy="{cy}" r="{VERTEX_RADIUS}" stroke="black" stroke-width="{VERTEX_STROKE_WIDTH}" fill="{fill}"/>"#,
            vertex.id(),
        );
    }
    let _ = writeln!(svg, "</g>");
}

fn cluster_color(cluster: usize) -> &'static str {
    CLUSTER_COLORS[cluster % CLUSTER_COLORS.len()]
}
