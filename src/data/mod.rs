mod document;

pub use document::load_scene;
