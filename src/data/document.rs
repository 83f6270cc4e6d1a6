use std::collections::HashMap;
use std::fs;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::scene::{EdgeData, GraphScene, ItemTag, LabelData, LabelKind, LayoutRect, NodeData};
use crate::util::{stable_unit_pair, text_width_hint};

const MIN_NODE_EXTENT: f32 = 30.0;
const MAX_NODE_EXTENT: f32 = 800.0;
const WORLD_SPREAD: f32 = 2400.0;
const LABEL_FONT_SIZE: f32 = 12.0;

#[derive(Debug, Deserialize)]
struct GraphDocument {
    nodes: Vec<NodeEntry>,
    #[serde(default)]
    edges: Vec<EdgeEntry>,
}

#[derive(Debug, Deserialize)]
struct NodeEntry {
    id: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    group: Option<u32>,
    #[serde(default = "default_connections")]
    connections: f32,
}

#[derive(Debug, Deserialize)]
struct EdgeEntry {
    source: String,
    target: String,
    #[serde(default = "default_thickness")]
    thickness: f32,
}

fn default_connections() -> f32 {
    1.0
}

fn default_thickness() -> f32 {
    1.0
}

pub fn load_scene(path: &str) -> Result<GraphScene> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph document {path}"))?;
    let document: GraphDocument = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse graph document {path}"))?;

    if document.nodes.is_empty() {
        return Err(anyhow!("graph document {path} contains no nodes"));
    }

    let max_connections = document
        .nodes
        .iter()
        .map(|entry| entry.connections)
        .fold(1.0_f32, f32::max);

    let mut scene = GraphScene::default();
    let mut index_by_id = HashMap::with_capacity(document.nodes.len());

    for entry in &document.nodes {
        if index_by_id.contains_key(entry.id.as_str()) {
            continue;
        }

        let extent = node_extent(entry.connections, max_connections);
        let (unit_x, unit_y) = stable_unit_pair(&entry.id);
        let color = match entry.color.as_deref() {
            Some(raw) => Some(parse_hex_color(raw).with_context(|| {
                format!("invalid color for node {}: {raw}", entry.id)
            })?),
            None => None,
        };

        index_by_id.insert(entry.id.clone(), scene.nodes.len());
        scene.nodes.push(NodeData {
            id: entry.id.clone(),
            layout: LayoutRect {
                x: unit_x * WORLD_SPREAD - extent * 0.5,
                y: unit_y * WORLD_SPREAD - extent * 0.5,
                width: extent,
                height: extent,
            },
            tag: ItemTag {
                color,
                icon: entry.label.clone(),
                group: entry.group,
                weight: entry.connections,
            },
        });
    }

    for (index, node) in scene.nodes.iter().enumerate() {
        scene.labels.push(LabelData {
            owner: index,
            text: node.id.clone(),
            width: text_width_hint(&node.id, LABEL_FONT_SIZE),
            height: LABEL_FONT_SIZE,
            kind: LabelKind::Text,
        });
    }

    for entry in &document.edges {
        let (Some(&source), Some(&target)) = (
            index_by_id.get(entry.source.as_str()),
            index_by_id.get(entry.target.as_str()),
        ) else {
            log::debug!(
                "skipping edge {} -> {} with unknown endpoint",
                entry.source,
                entry.target
            );
            continue;
        };
        if source == target {
            continue;
        }
        scene.edges.push(EdgeData {
            source,
            target,
            thickness: entry.thickness.max(0.2),
        });
    }

    log::info!(
        "loaded {} nodes, {} edges from {path}",
        scene.nodes.len(),
        scene.edges.len()
    );
    Ok(scene)
}

/// Node extent from connection count, mapped onto the same range the data
/// source was authored for.
fn node_extent(connections: f32, max_connections: f32) -> f32 {
    let span = (max_connections - 1.0).max(1.0);
    let normalized = ((connections - 1.0) / span).clamp(0.0, 1.0);
    MIN_NODE_EXTENT + (MAX_NODE_EXTENT - MIN_NODE_EXTENT) * normalized
}

fn parse_hex_color(raw: &str) -> Result<[u8; 3]> {
    let digits = raw.strip_prefix('#').unwrap_or(raw);
    if digits.len() != 6 || !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return Err(anyhow!("expected #rrggbb, got {raw}"));
    }

    let channel = |range| u8::from_str_radix(&digits[range], 16).expect("validated hex digits");
    Ok([channel(0..2), channel(2..4), channel(4..6)])
}
