mod animate;
mod backend;
mod icons;
mod style;
mod visual;

pub use animate::{AnimationDriver, HighlightAnimator, HighlightMode, ItemAnimation};
pub use backend::{
    AcceleratedBackend, AcceleratedLabelStyle, AcceleratedNodeStyle, IconLabelStyle, RenderBackendManager,
    RenderMode, SelectionState, StandardBackend,
};
pub use icons::{HttpIconFetcher, ICON_HEIGHT, ICON_WIDTH, IconBitmap, IconCache, IconFetcher};
pub use style::{
    DetailLabelStyle, DetailNodeStyle, LabelAppearance, LevelOfDetailLabelStyle,
    LevelOfDetailNodeStyle, OverviewLabelStyle, OverviewNodeStyle,
};
pub use visual::{Producer, Visual, VisualShape};

#[cfg(test)]
pub(crate) use backend::tests_support;
