use eframe::egui::Color32;

use crate::scene::{LabelData, NodeData};
use crate::util::group_color;

use super::visual::{Producer, Visual, VisualShape};

/// Screen-space extent, in device pixels, below which items fall back to
/// their overview representation.
pub const DETAIL_THRESHOLD: f32 = 20.0;

const FALLBACK_FILL: Color32 = Color32::from_rgb(140, 150, 160);

fn node_fill(node: &NodeData) -> Color32 {
    if let Some([r, g, b]) = node.tag.color {
        Color32::from_rgb(r, g, b)
    } else if let Some(group) = node.tag.group {
        let [r, g, b] = group_color(group);
        Color32::from_rgb(r, g, b)
    } else {
        FALLBACK_FILL
    }
}

/// Full-fidelity node rendering: white backing ring, tag-colored fill, and
/// the tag's icon drawn over the disc.
#[derive(Clone, Copy, Debug, Default)]
pub struct DetailNodeStyle;

impl DetailNodeStyle {
    fn create_visual(&self, node: &NodeData) -> Visual {
        Visual::created_by(
            Producer::Detail,
            VisualShape::NodeDisc {
                fill: node_fill(node),
                backing: true,
                icon: node.tag.icon.clone(),
            },
        )
    }

    fn update_visual(&self, node: &NodeData, visual: &mut Visual) {
        if let VisualShape::NodeDisc { fill, icon, .. } = &mut visual.shape {
            *fill = node_fill(node);
            if icon.as_deref() != node.tag.icon.as_deref() {
                *icon = node.tag.icon.clone();
            }
        }
        visual.updates += 1;
    }
}

/// Cheap node rendering for small on-screen extents: a plain filled disc.
#[derive(Clone, Copy, Debug, Default)]
pub struct OverviewNodeStyle;

impl OverviewNodeStyle {
    fn create_visual(&self, node: &NodeData) -> Visual {
        Visual::created_by(
            Producer::Overview,
            VisualShape::NodeDisc {
                fill: node_fill(node),
                backing: false,
                icon: None,
            },
        )
    }

    fn update_visual(&self, node: &NodeData, visual: &mut Visual) {
        if let VisualShape::NodeDisc { fill, .. } = &mut visual.shape {
            *fill = node_fill(node);
        }
        visual.updates += 1;
    }
}

/// Per-node wrapper choosing between detail and overview rendering from the
/// node's on-screen extent. The decision is recomputed on every call; only
/// the resulting visual and its producer tag are cached by the caller.
#[derive(Clone, Copy, Debug)]
pub struct LevelOfDetailNodeStyle {
    pub threshold: f32,
    pub detail: DetailNodeStyle,
    pub overview: OverviewNodeStyle,
}

impl Default for LevelOfDetailNodeStyle {
    fn default() -> Self {
        Self {
            threshold: DETAIL_THRESHOLD,
            detail: DetailNodeStyle,
            overview: OverviewNodeStyle,
        }
    }
}

impl LevelOfDetailNodeStyle {
    pub fn use_detail(&self, node: &NodeData, scale: f32) -> bool {
        node.layout.width * scale >= self.threshold && node.layout.height * scale >= self.threshold
    }

    pub fn render(&self, node: &NodeData, scale: f32, previous: Option<Visual>) -> Visual {
        let target = if self.use_detail(node, scale) {
            Producer::Detail
        } else {
            Producer::Overview
        };

        match previous {
            Some(mut visual) if visual.producer == target => {
                match target {
                    Producer::Detail => self.detail.update_visual(node, &mut visual),
                    Producer::Overview => self.overview.update_visual(node, &mut visual),
                }
                visual
            }
            _ => match target {
                Producer::Detail => self.detail.create_visual(node),
                Producer::Overview => self.overview.create_visual(node),
            },
        }
    }
}

/// Text appearance shared between the standard detail style and the derived
/// accelerated label styles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelAppearance {
    pub font_size: f32,
    pub color: Color32,
}

impl Default for LabelAppearance {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            color: Color32::from_gray(235),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct DetailLabelStyle {
    pub appearance: LabelAppearance,
}

impl Default for DetailLabelStyle {
    fn default() -> Self {
        Self {
            appearance: LabelAppearance::default(),
        }
    }
}

impl DetailLabelStyle {
    fn create_visual(&self, label: &LabelData) -> Visual {
        Visual::created_by(
            Producer::Detail,
            VisualShape::LabelText {
                text: label.text.clone(),
                font_size: self.appearance.font_size,
                color: self.appearance.color,
            },
        )
    }

    fn update_visual(&self, label: &LabelData, visual: &mut Visual) {
        if let VisualShape::LabelText { text, .. } = &mut visual.shape
            && text != &label.text
        {
            *text = label.text.clone();
        }
        visual.updates += 1;
    }
}

/// Labels below the width threshold draw nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct OverviewLabelStyle;

impl OverviewLabelStyle {
    fn create_visual(&self) -> Visual {
        Visual::created_by(Producer::Overview, VisualShape::Hidden)
    }

    fn update_visual(&self, visual: &mut Visual) {
        visual.updates += 1;
    }
}

/// Label counterpart of [`LevelOfDetailNodeStyle`]; the threshold test uses
/// on-screen width alone.
#[derive(Clone, Copy, Debug)]
pub struct LevelOfDetailLabelStyle {
    pub threshold: f32,
    pub detail: DetailLabelStyle,
    pub overview: OverviewLabelStyle,
}

impl Default for LevelOfDetailLabelStyle {
    fn default() -> Self {
        Self {
            threshold: DETAIL_THRESHOLD,
            detail: DetailLabelStyle::default(),
            overview: OverviewLabelStyle,
        }
    }
}

impl LevelOfDetailLabelStyle {
    pub fn use_detail(&self, label: &LabelData, scale: f32) -> bool {
        label.width * scale >= self.threshold
    }

    /// The appearance a label currently renders with, if any; the overview
    /// side is void, so it resolves to nothing.
    pub fn active_appearance(&self, label: &LabelData, scale: f32) -> Option<LabelAppearance> {
        self.use_detail(label, scale)
            .then_some(self.detail.appearance)
    }

    pub fn render(&self, label: &LabelData, scale: f32, previous: Option<Visual>) -> Visual {
        let target = if self.use_detail(label, scale) {
            Producer::Detail
        } else {
            Producer::Overview
        };

        match previous {
            Some(mut visual) if visual.producer == target => {
                match target {
                    Producer::Detail => self.detail.update_visual(label, &mut visual),
                    Producer::Overview => self.overview.update_visual(&mut visual),
                }
                visual
            }
            _ => match target {
                Producer::Detail => self.detail.create_visual(label),
                Producer::Overview => self.overview.create_visual(),
            },
        }
    }
}
