mod graph;

pub use graph::{
    EdgeData, GraphScene, ItemRef, ItemTag, LabelData, LabelKind, LayoutRect, NodeData,
};
