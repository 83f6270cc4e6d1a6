use eframe::egui::Color32;

/// Which style produced a cached visual.
///
/// Compared by value on every render pass to decide update-vs-recreate; a
/// visual produced by one side of a level-of-detail pair must never be fed
/// into the other side's update path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Producer {
    Detail,
    Overview,
}

/// Cached renderable geometry for one item.
#[derive(Clone, Debug, PartialEq)]
pub enum VisualShape {
    NodeDisc {
        fill: Color32,
        /// Detail rendering backs the disc with a white ring.
        backing: bool,
        /// Icon key drawn over the disc, when the detail style carries one.
        icon: Option<String>,
    },
    LabelText {
        text: String,
        font_size: f32,
        color: Color32,
    },
    /// The overview label representation draws nothing.
    Hidden,
}

/// A renderable produced for exactly one item by exactly one style.
///
/// `updates` counts incremental-update passes since creation; the create
/// path resets it to zero. Callers retain the visual between frames and pass
/// it back on the next render call.
#[derive(Clone, Debug, PartialEq)]
pub struct Visual {
    pub producer: Producer,
    pub updates: u32,
    pub shape: VisualShape,
}

impl Visual {
    pub fn created_by(producer: Producer, shape: VisualShape) -> Self {
        Self {
            producer,
            updates: 0,
            shape,
        }
    }
}
