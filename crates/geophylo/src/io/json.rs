//! JSON document format for geophylogeny instances.
//!
//! The document carries the tree as a nested object (`leaf`, `id`, `label`,
//! `site_id`, `left`, `right`), a flat site list, and the map dimensions.
//! Vertex ids are the 0-based arena indices.

use crate::error::{Error, Result};
use crate::model::{Geophylogeny, LeaderStyle, Site, Tree, TreeBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
pub struct GeophylogenyDoc {
    pub title: String,
    pub map_width: u32,
    pub map_height: u32,
    pub num_leaves: usize,
    pub tree: VertexDoc,
    pub num_sites: usize,
    pub sites: Vec<SiteDoc>,
    #[serde(default)]
    pub num_clusters: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VertexDoc {
    pub leaf: bool,
    pub id: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<VertexDoc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<VertexDoc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SiteDoc {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub cluster: usize,
}

pub fn read_geophylogeny(path: impl AsRef<Path>) -> Result<Geophylogeny> {
    let text = std::fs::read_to_string(path)?;
    from_json_str(&text)
}

pub fn write_geophylogeny(geophylogeny: &Geophylogeny, path: impl AsRef<Path>) -> Result<()> {
    std::fs::write(path, to_json_string(geophylogeny)?)?;
    Ok(())
}

pub fn from_json_str(text: &str) -> Result<Geophylogeny> {
    let doc: GeophylogenyDoc = serde_json::from_str(text)?;
    build_geophylogeny(&doc)
}

pub fn to_json_string(geophylogeny: &Geophylogeny) -> Result<String> {
    Ok(serde_json::to_string_pretty(&document_of(geophylogeny))?)
}

fn build_geophylogeny(doc: &GeophylogenyDoc) -> Result<Geophylogeny> {
    let num_leaves = doc.num_leaves;
    if doc.sites.len() != doc.num_sites {
        return Err(malformed(format!(
            "document declares {} sites but lists {}",
            doc.num_sites,
            doc.sites.len()
        )));
    }

    let mut builder = TreeBuilder::new(num_leaves);
    let mut site_of_leaf: Vec<Option<usize>> = vec![None; num_leaves];
    let root = add_vertex(&doc.tree, &mut builder, &mut site_of_leaf)?;
    let tree = builder.build(root)?;

    // Re-index so that sites[leaf] is the leaf's site.
    let mut sites = Vec::with_capacity(num_leaves);
    for leaf in 0..num_leaves {
        let site_id = site_of_leaf[leaf]
            .ok_or_else(|| malformed(format!("leaf {leaf} has no site assignment")))?;
        let site = doc
            .sites
            .get(site_id)
            .ok_or_else(|| malformed(format!("leaf {leaf} references unknown site {site_id}")))?;
        sites.push(Site::with_cluster(site.x, site.y, site.cluster));
    }

    Ok(Geophylogeny::new(
        tree,
        sites,
        doc.map_width,
        doc.map_height,
        doc.title.clone(),
        LeaderStyle::None,
    ))
}

fn add_vertex(
    doc: &VertexDoc,
    builder: &mut TreeBuilder,
    site_of_leaf: &mut [Option<usize>],
) -> Result<usize> {
    if doc.leaf {
        let site_id = doc
            .site_id
            .ok_or_else(|| malformed(format!("leaf vertex {} has no site_id", doc.id)))?;
        builder.leaf(doc.id, doc.label.clone())?;
        let slot = site_of_leaf
            .get_mut(doc.id)
            .ok_or_else(|| malformed(format!("leaf id {} out of range", doc.id)))?;
        *slot = Some(site_id);
        return Ok(doc.id);
    }

    let left = doc
        .left
        .as_deref()
        .ok_or_else(|| malformed(format!("internal vertex {} missing left child", doc.id)))?;
    let right = doc
        .right
        .as_deref()
        .ok_or_else(|| malformed(format!("internal vertex {} missing right child", doc.id)))?;
    let left_index = add_vertex(left, builder, site_of_leaf)?;
    let right_index = add_vertex(right, builder, site_of_leaf)?;
    builder.inner(doc.id, left_index, right_index)?;
    Ok(doc.id)
}

fn document_of(geophylogeny: &Geophylogeny) -> GeophylogenyDoc {
    let tree = geophylogeny.tree();
    GeophylogenyDoc {
        title: geophylogeny.name().to_string(),
        map_width: geophylogeny.map_width(),
        map_height: geophylogeny.map_height(),
        num_leaves: tree.num_leaves(),
        tree: vertex_doc(tree, tree.root()),
        num_sites: geophylogeny.sites().len(),
        sites: geophylogeny
            .sites()
            .iter()
            .map(|site| SiteDoc {
                x: site.x,
                y: site.y,
                cluster: site.cluster,
            })
            .collect(),
        num_clusters: geophylogeny.num_clusters(),
    }
}

fn vertex_doc(tree: &Tree, v: usize) -> VertexDoc {
    let vertex = tree.vertex(v);
    match (vertex.left_child(), vertex.right_child()) {
        (Some(left), Some(right)) => VertexDoc {
            leaf: false,
            id: v,
            label: None,
            site_id: None,
            left: Some(Box::new(vertex_doc(tree, left))),
            right: Some(Box::new(vertex_doc(tree, right))),
        },
        _ => VertexDoc {
            leaf: true,
            id: v,
            label: Some(
                vertex
                    .taxon()
                    .map_or_else(|| v.to_string(), str::to_string),
            ),
            site_id: Some(v),
            left: None,
            right: None,
        },
    }
}

fn malformed(message: String) -> Error {
    Error::MalformedInstance { message }
}
