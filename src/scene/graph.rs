/// Identity of a rendered item, stable for the lifetime of the scene.
///
/// Selection, highlight sets, and animation assignments all key on this.
/// Synthetic icon labels are always appended after every text label and
/// removed en bloc, so text-label indices never shift.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemRef {
    Node(usize),
    Edge(usize),
    Label(usize),
}

/// Item extent in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutRect {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }
}

/// Application-defined tag data attached to a node by the graph source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemTag {
    pub color: Option<[u8; 3]>,
    pub icon: Option<String>,
    pub group: Option<u32>,
    pub weight: f32,
}

#[derive(Clone, Debug)]
pub struct NodeData {
    pub id: String,
    pub layout: LayoutRect,
    pub tag: ItemTag,
}

#[derive(Clone, Debug)]
pub struct EdgeData {
    pub source: usize,
    pub target: usize,
    pub thickness: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelKind {
    Text,
    /// Zero-size carrier for an icon in the accelerated backend.
    SyntheticIcon,
}

#[derive(Clone, Debug)]
pub struct LabelData {
    pub owner: usize,
    pub text: String,
    pub width: f32,
    pub height: f32,
    pub kind: LabelKind,
}

/// The graph store: nodes, edges, and labels enumerated by index.
///
/// Owned by the application; the rendering subsystem only reads items and
/// adds/removes synthetic icon labels.
#[derive(Clone, Debug, Default)]
pub struct GraphScene {
    pub nodes: Vec<NodeData>,
    pub edges: Vec<EdgeData>,
    pub labels: Vec<LabelData>,
}

impl GraphScene {
    pub fn node_labels(&self, node: usize) -> impl Iterator<Item = (usize, &LabelData)> {
        self.labels
            .iter()
            .enumerate()
            .filter(move |(_, label)| label.owner == node)
    }

    pub fn incident_edges(&self, node: usize) -> impl Iterator<Item = usize> {
        self.edges
            .iter()
            .enumerate()
            .filter_map(move |(index, edge)| {
                (edge.source == node || edge.target == node).then_some(index)
            })
    }

    /// Distinct icon keys across all nodes, in first-seen order.
    pub fn icon_keys(&self) -> Vec<&str> {
        let mut keys = Vec::new();
        for node in &self.nodes {
            if let Some(key) = node.tag.icon.as_deref()
                && !keys.contains(&key)
            {
                keys.push(key);
            }
        }
        keys
    }

    /// Appends a zero-size synthetic label carrying an icon key.
    pub fn add_icon_label(&mut self, owner: usize, key: &str) -> usize {
        self.labels.push(LabelData {
            owner,
            text: key.to_owned(),
            width: 0.0,
            height: 0.0,
            kind: LabelKind::SyntheticIcon,
        });
        self.labels.len() - 1
    }

    /// Drops every synthetic icon label. Text labels keep their indices
    /// because synthetic labels are only ever appended after them.
    pub fn remove_icon_labels(&mut self) {
        self.labels.retain(|label| label.kind != LabelKind::SyntheticIcon);
    }

    pub fn icon_label_count(&self) -> usize {
        self.labels
            .iter()
            .filter(|label| label.kind == LabelKind::SyntheticIcon)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_with_two_nodes() -> GraphScene {
        let mut scene = GraphScene::default();
        for id in ["alpha", "beta"] {
            scene.nodes.push(NodeData {
                id: id.to_owned(),
                layout: LayoutRect {
                    x: 0.0,
                    y: 0.0,
                    width: 40.0,
                    height: 40.0,
                },
                tag: ItemTag::default(),
            });
        }
        scene.edges.push(EdgeData {
            source: 0,
            target: 1,
            thickness: 1.0,
        });
        scene.labels.push(LabelData {
            owner: 0,
            text: "alpha".to_owned(),
            width: 30.0,
            height: 12.0,
            kind: LabelKind::Text,
        });
        scene
    }

    #[test]
    fn synthetic_labels_append_and_remove_without_shifting_text_labels() {
        let mut scene = scene_with_two_nodes();
        let icon_label = scene.add_icon_label(1, "de");
        assert_eq!(icon_label, 1);
        assert_eq!(scene.icon_label_count(), 1);

        scene.remove_icon_labels();
        assert_eq!(scene.icon_label_count(), 0);
        assert_eq!(scene.labels.len(), 1);
        assert_eq!(scene.labels[0].kind, LabelKind::Text);
        assert_eq!(scene.labels[0].owner, 0);
    }

    #[test]
    fn incident_edges_covers_both_endpoints() {
        let scene = scene_with_two_nodes();
        assert_eq!(scene.incident_edges(0).collect::<Vec<_>>(), vec![0]);
        assert_eq!(scene.incident_edges(1).collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn icon_keys_deduplicate_in_order() {
        let mut scene = scene_with_two_nodes();
        scene.nodes[0].tag.icon = Some("de".to_owned());
        scene.nodes[1].tag.icon = Some("de".to_owned());
        assert_eq!(scene.icon_keys(), vec!["de"]);
    }
}
