use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use eframe::egui::Color32;

use crate::scene::{GraphScene, ItemRef, LabelData, NodeData};

use super::animate::{AnimationDriver, ItemAnimation};
use super::icons::{IconBitmap, IconCache};
use super::style::{LabelAppearance, LevelOfDetailLabelStyle, LevelOfDetailNodeStyle};
use super::visual::Visual;

/// Rendering strategy for the whole view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// Retained per-item rendering with full style fidelity.
    Standard,
    /// Batched rendering that trades per-item fidelity for draw-call count.
    Accelerated,
}

/// Selection-indicator state. Each backend owns its own instance; the
/// selected set transfers across the swap boundary by capture and restore,
/// never by sharing.
#[derive(Clone, Debug, Default)]
pub struct SelectionState {
    selected: HashSet<ItemRef>,
}

impl SelectionState {
    pub fn set_selected(&mut self, item: ItemRef, selected: bool) {
        if selected {
            self.selected.insert(item);
        } else {
            self.selected.remove(&item);
        }
    }

    pub fn is_selected(&self, item: ItemRef) -> bool {
        self.selected.contains(&item)
    }

    pub fn items(&self) -> Vec<ItemRef> {
        self.selected.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// The standard backend: level-of-detail styles plus the retained visual for
/// every item rendered so far.
#[derive(Debug, Default)]
pub struct StandardBackend {
    pub node_style: LevelOfDetailNodeStyle,
    pub label_style: LevelOfDetailLabelStyle,
    pub visuals: HashMap<ItemRef, Visual>,
    pub selection: SelectionState,
}

impl StandardBackend {
    /// Runs one render pass for a node, reusing the retained visual when its
    /// producer still applies.
    pub fn render_node(&mut self, index: usize, node: &NodeData, scale: f32) -> &Visual {
        let item = ItemRef::Node(index);
        let previous = self.visuals.remove(&item);
        let visual = self.node_style.render(node, scale, previous);
        self.visuals.entry(item).or_insert(visual)
    }

    pub fn render_label(&mut self, index: usize, label: &LabelData, scale: f32) -> &Visual {
        let item = ItemRef::Label(index);
        let previous = self.visuals.remove(&item);
        let visual = self.label_style.render(label, scale, previous);
        self.visuals.entry(item).or_insert(visual)
    }
}

/// Filled-shape rendering for a color-bearing node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AcceleratedNodeStyle {
    pub fill: Color32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AcceleratedLabelStyle {
    pub appearance: LabelAppearance,
}

/// Style of a synthetic icon label, carrying the resolved bitmap.
#[derive(Clone, Debug)]
pub struct IconLabelStyle {
    pub key: String,
    pub icon: Arc<IconBitmap>,
}

/// The accelerated backend: styles derived per item at switch time, per-item
/// animation assignments, and the single animation driver. Built fresh on
/// every switch to accelerated rendering.
#[derive(Debug, Default)]
pub struct AcceleratedBackend {
    pub node_styles: HashMap<usize, AcceleratedNodeStyle>,
    pub label_styles: HashMap<usize, AcceleratedLabelStyle>,
    /// Keyed by synthetic-label index.
    pub icon_labels: HashMap<usize, IconLabelStyle>,
    /// Icon keys still resolving, with the nodes waiting on each.
    pending_icons: HashMap<String, Vec<usize>>,
    pub animations: HashMap<ItemRef, ItemAnimation>,
    pub driver: AnimationDriver,
    pub selection: SelectionState,
}

impl AcceleratedBackend {
    pub fn pending_icon_nodes(&self) -> usize {
        self.pending_icons.values().map(Vec::len).sum()
    }
}

pub type RenderModeListener = Box<dyn Fn(RenderMode)>;

/// Owns the current rendering backend and performs the switch sequence.
///
/// The standard backend is created once and held for the lifetime of the
/// manager; the accelerated backend is rebuilt on every switch. A switch is
/// a single synchronous critical section: capture selection, deselect all,
/// stop animations, swap managers, restore selection. Only the icon styling
/// of still-resolving keys completes later, through
/// [`RenderBackendManager::apply_resolved_icons`].
pub struct RenderBackendManager {
    mode: RenderMode,
    automatic: bool,
    suspended: bool,
    zoom_threshold: f32,
    standard: StandardBackend,
    accelerated: Option<AcceleratedBackend>,
    listeners: Vec<RenderModeListener>,
}

impl RenderBackendManager {
    pub fn new(zoom_threshold: f32) -> Self {
        Self {
            mode: RenderMode::Standard,
            automatic: false,
            suspended: false,
            zoom_threshold,
            standard: StandardBackend::default(),
            accelerated: None,
            listeners: Vec::new(),
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn is_accelerated(&self) -> bool {
        self.mode == RenderMode::Accelerated
    }

    pub fn automatic(&self) -> bool {
        self.automatic
    }

    pub fn suspended(&self) -> bool {
        self.suspended
    }

    pub fn zoom_threshold(&self) -> f32 {
        self.zoom_threshold
    }

    pub fn set_zoom_threshold(&mut self, threshold: f32) {
        self.zoom_threshold = threshold;
    }

    pub fn standard_mut(&mut self) -> &mut StandardBackend {
        &mut self.standard
    }

    pub fn accelerated(&self) -> Option<&AcceleratedBackend> {
        self.accelerated.as_ref()
    }

    pub fn accelerated_mut(&mut self) -> Option<&mut AcceleratedBackend> {
        self.accelerated.as_mut()
    }

    /// Selection state of the currently active backend.
    pub fn selection(&self) -> &SelectionState {
        match &self.accelerated {
            Some(accelerated) => &accelerated.selection,
            None => &self.standard.selection,
        }
    }

    pub fn selection_mut(&mut self) -> &mut SelectionState {
        match &mut self.accelerated {
            Some(accelerated) => &mut accelerated.selection,
            None => &mut self.standard.selection,
        }
    }

    pub fn add_mode_listener(&mut self, listener: impl Fn(RenderMode) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Enables or disables automatic switching. Enabling evaluates the
    /// current scale immediately, exactly like a scale-change notification.
    pub fn set_automatic(
        &mut self,
        enabled: bool,
        zoom: f32,
        scene: &mut GraphScene,
        icons: &mut IconCache,
    ) {
        self.automatic = enabled;
        if enabled {
            self.toggle(zoom < self.zoom_threshold, zoom, scene, icons);
        }
    }

    /// Scale-change notification from the view surface.
    pub fn on_scale_changed(&mut self, zoom: f32, scene: &mut GraphScene, icons: &mut IconCache) {
        if self.automatic && !self.suspended {
            self.toggle(zoom < self.zoom_threshold, zoom, scene, icons);
        }
    }

    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    pub fn resume(&mut self) {
        self.suspended = false;
    }

    /// Switches to the requested backend. Idempotent: a no-op when the
    /// requested backend is already current or the manager is suspended.
    pub fn toggle(
        &mut self,
        want_accelerated: bool,
        zoom: f32,
        scene: &mut GraphScene,
        icons: &mut IconCache,
    ) {
        if self.suspended {
            return;
        }
        if want_accelerated == self.is_accelerated() {
            return;
        }

        // Selection decorations must not render mid-swap: capture, clear,
        // and restore into the incoming backend at the end.
        let selected = self.selection().items();
        self.selection_mut().clear();

        if let Some(accelerated) = self.accelerated.as_mut() {
            accelerated.driver.stop();
            accelerated.animations.clear();
        }
        // Retained visuals never survive a swap; their producers are gone.
        self.standard.visuals.clear();

        if want_accelerated {
            if !icons.is_warm(scene) {
                log::debug!("icon cache not yet warm; icon styling will trail the switch");
            }
            self.accelerated = Some(self.build_accelerated(zoom, scene, icons));
            self.mode = RenderMode::Accelerated;
        } else {
            log::debug!("removing {} synthetic icon labels", scene.icon_label_count());
            scene.remove_icon_labels();
            self.accelerated = None;
            self.mode = RenderMode::Standard;
        }

        for item in selected {
            self.selection_mut().set_selected(item, true);
        }

        log::info!("render backend switched to {:?}", self.mode);
        for listener in &self.listeners {
            listener(self.mode);
        }
    }

    fn build_accelerated(
        &self,
        zoom: f32,
        scene: &mut GraphScene,
        icons: &mut IconCache,
    ) -> AcceleratedBackend {
        let mut backend = AcceleratedBackend::default();

        // Every label reuses the appearance its level-of-detail pair shows
        // at the current zoom; a void side resolves to the built-in default.
        for (index, label) in scene.labels.iter().enumerate() {
            let appearance = self
                .standard
                .label_style
                .active_appearance(label, zoom)
                .unwrap_or_default();
            backend
                .label_styles
                .insert(index, AcceleratedLabelStyle { appearance });
        }

        // Color-bearing nodes collapse to a filled shape; the accelerated
        // path does not carry the standard styles' richness.
        for (index, node) in scene.nodes.iter().enumerate() {
            if let Some([r, g, b]) = node.tag.color {
                backend.node_styles.insert(
                    index,
                    AcceleratedNodeStyle {
                        fill: Color32::from_rgb(r, g, b),
                    },
                );
            }
        }

        // Icon-bearing nodes get a zero-size synthetic label carrying the
        // resolved icon. Keys still in flight are styled once resolution
        // lands; everything else proceeds immediately.
        let icon_nodes = scene
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| node.tag.icon.clone().map(|key| (index, key)))
            .collect::<Vec<_>>();
        for (index, key) in icon_nodes {
            icons.request(&key);
            match icons.entry(&key) {
                Some(Some(bitmap)) => {
                    let label = scene.add_icon_label(index, &key);
                    backend
                        .icon_labels
                        .insert(label, IconLabelStyle { key, icon: bitmap });
                }
                // Permanent "no icon": the node renders without one.
                Some(None) => {}
                None => {
                    log::debug!("deferring icon styling for node {index} ({key})");
                    backend.pending_icons.entry(key).or_default().push(index);
                }
            }
        }

        backend
    }

    /// Styles nodes whose icon resolution completed after the switch. Safe
    /// no-op while the standard backend is active; a late resolution then
    /// simply has no visible effect.
    pub fn apply_resolved_icons(
        &mut self,
        completed: &[String],
        scene: &mut GraphScene,
        icons: &IconCache,
    ) {
        let Some(accelerated) = self.accelerated.as_mut() else {
            return;
        };

        for key in completed {
            let Some(nodes) = accelerated.pending_icons.remove(key) else {
                continue;
            };
            match icons.entry(key) {
                Some(Some(bitmap)) => {
                    for node in nodes {
                        let label = scene.add_icon_label(node, key);
                        accelerated.icon_labels.insert(
                            label,
                            IconLabelStyle {
                                key: key.clone(),
                                icon: Arc::clone(&bitmap),
                            },
                        );
                    }
                }
                _ => log::debug!("icon {key} unavailable; nodes render without it"),
            }
        }
    }

    pub fn advance_animations(&mut self, delta_seconds: f32) {
        if let Some(accelerated) = self.accelerated.as_mut() {
            accelerated.driver.advance(delta_seconds);
        }
    }

    /// Stops the animation driver and drops every per-item assignment.
    pub fn stop_highlight(&mut self) {
        if let Some(accelerated) = self.accelerated.as_mut() {
            accelerated.driver.stop();
            accelerated.animations.clear();
        }
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use std::io::Cursor;
    use std::sync::Arc;
    use std::sync::mpsc::{self, Sender};
    use std::sync::Mutex;
    use std::thread;
    use std::time::Duration;

    use anyhow::{Result, anyhow};

    use crate::render::icons::{IconCache, IconFetcher};
    use crate::scene::{EdgeData, GraphScene, ItemTag, LabelData, LabelKind, LayoutRect, NodeData};

    pub(crate) fn png_bytes() -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(4, 4, image::Rgba([200, 10, 10, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    /// Three nodes (one icon-bearing, two color/plain), two edges, one text
    /// label per node.
    pub(crate) fn scene_fixture() -> GraphScene {
        let mut scene = GraphScene::default();
        let seeds: [(&str, f32, ItemTag); 3] = [
            (
                "n0",
                100.0,
                ItemTag {
                    color: Some([200, 80, 40]),
                    icon: Some("de".to_owned()),
                    group: Some(1),
                    weight: 3.0,
                },
            ),
            (
                "n1",
                100.0,
                ItemTag {
                    color: Some([40, 80, 200]),
                    icon: None,
                    group: Some(1),
                    weight: 2.0,
                },
            ),
            (
                "n2",
                60.0,
                ItemTag {
                    color: None,
                    icon: None,
                    group: Some(2),
                    weight: 1.0,
                },
            ),
        ];

        for (id, extent, tag) in seeds {
            let index = scene.nodes.len();
            scene.nodes.push(NodeData {
                id: id.to_owned(),
                layout: LayoutRect {
                    x: (index as f32) * 200.0,
                    y: 0.0,
                    width: extent,
                    height: extent,
                },
                tag,
            });
            scene.labels.push(LabelData {
                owner: index,
                text: id.to_owned(),
                width: 100.0,
                height: 12.0,
                kind: LabelKind::Text,
            });
        }
        scene.edges.push(EdgeData {
            source: 0,
            target: 1,
            thickness: 1.0,
        });
        scene.edges.push(EdgeData {
            source: 1,
            target: 2,
            thickness: 1.0,
        });
        scene
    }

    /// Returns icon bytes immediately.
    pub(crate) struct StaticFetcher;

    impl IconFetcher for StaticFetcher {
        fn fetch(&self, _key: &str) -> Result<Vec<u8>> {
            Ok(png_bytes())
        }
    }

    /// Blocks every fetch until the returned sender releases it.
    pub(crate) struct GatedFetcher {
        gate: Mutex<mpsc::Receiver<()>>,
    }

    impl GatedFetcher {
        pub(crate) fn new() -> (Arc<Self>, Sender<()>) {
            let (tx, rx) = mpsc::channel();
            (
                Arc::new(Self {
                    gate: Mutex::new(rx),
                }),
                tx,
            )
        }
    }

    impl IconFetcher for GatedFetcher {
        fn fetch(&self, _key: &str) -> Result<Vec<u8>> {
            self.gate
                .lock()
                .unwrap()
                .recv()
                .map_err(|_| anyhow!("gate closed"))?;
            Ok(png_bytes())
        }
    }

    pub(crate) fn poll_until_resolved(cache: &mut IconCache, key: &str) {
        for _ in 0..500 {
            cache.poll();
            if cache.is_resolved(key) {
                return;
            }
            thread::sleep(Duration::from_millis(2));
        }
        panic!("icon {key} never resolved");
    }

    /// An icon cache with the fixture's "de" icon already resolved.
    pub(crate) fn warm_icon_cache() -> IconCache {
        let mut cache = IconCache::new(Arc::new(StaticFetcher));
        cache.request("de");
        poll_until_resolved(&mut cache, "de");
        cache
    }

    /// An icon cache whose fetches block until the sender fires.
    pub(crate) fn cold_icon_cache() -> (IconCache, Sender<()>) {
        let (fetcher, gate) = GatedFetcher::new();
        (IconCache::new(fetcher), gate)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::tests_support::{cold_icon_cache, scene_fixture, warm_icon_cache};
    use super::*;
    use crate::render::style::DETAIL_THRESHOLD;

    #[test]
    fn toggle_is_idempotent() {
        let mut scene = scene_fixture();
        let mut icons = warm_icon_cache();
        let mut manager = RenderBackendManager::new(0.2);
        let switches = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&switches);
        manager.add_mode_listener(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        manager.toggle(true, 0.1, &mut scene, &mut icons);
        assert_eq!(manager.mode(), RenderMode::Accelerated);
        assert_eq!(switches.load(Ordering::SeqCst), 1);
        let icon_labels = scene.icon_label_count();

        manager.toggle(true, 0.1, &mut scene, &mut icons);
        assert_eq!(manager.mode(), RenderMode::Accelerated);
        assert_eq!(switches.load(Ordering::SeqCst), 1);
        assert_eq!(scene.icon_label_count(), icon_labels);
    }

    #[test]
    fn selection_survives_the_switch_in_both_directions() {
        let mut scene = scene_fixture();
        let mut icons = warm_icon_cache();
        let mut manager = RenderBackendManager::new(0.2);

        manager
            .selection_mut()
            .set_selected(ItemRef::Node(0), true);
        manager
            .selection_mut()
            .set_selected(ItemRef::Edge(1), true);

        manager.toggle(true, 0.1, &mut scene, &mut icons);
        assert!(manager.selection().is_selected(ItemRef::Node(0)));
        assert!(manager.selection().is_selected(ItemRef::Edge(1)));
        assert_eq!(manager.selection().len(), 2);
        // The standard backend's own set was drained by the capture.
        assert!(manager.standard.selection.is_empty());

        manager.toggle(false, 0.1, &mut scene, &mut icons);
        assert!(manager.selection().is_selected(ItemRef::Node(0)));
        assert!(manager.selection().is_selected(ItemRef::Edge(1)));
        assert_eq!(manager.selection().len(), 2);
    }

    #[test]
    fn toggle_while_suspended_is_a_no_op() {
        let mut scene = scene_fixture();
        let mut icons = warm_icon_cache();
        let mut manager = RenderBackendManager::new(0.2);

        manager.suspend();
        manager.toggle(true, 0.1, &mut scene, &mut icons);
        assert_eq!(manager.mode(), RenderMode::Standard);
        assert!(manager.accelerated().is_none());
    }

    #[test]
    fn suspension_swallows_scale_changes_until_resumed() {
        let mut scene = scene_fixture();
        let mut icons = warm_icon_cache();
        let mut manager = RenderBackendManager::new(0.2);

        // Automatic, above the threshold: stays standard.
        manager.set_automatic(true, 1.0, &mut scene, &mut icons);
        assert_eq!(manager.mode(), RenderMode::Standard);

        manager.suspend();
        manager.on_scale_changed(0.05, &mut scene, &mut icons);
        assert_eq!(manager.mode(), RenderMode::Standard);

        manager.resume();
        manager.on_scale_changed(0.05, &mut scene, &mut icons);
        assert_eq!(manager.mode(), RenderMode::Accelerated);
    }

    #[test]
    fn enabling_automatic_evaluates_the_current_scale() {
        let mut scene = scene_fixture();
        let mut icons = warm_icon_cache();
        let mut manager = RenderBackendManager::new(0.2);

        manager.set_automatic(true, 0.1, &mut scene, &mut icons);
        assert_eq!(manager.mode(), RenderMode::Accelerated);

        // Manual scale changes are ignored once automatic is off again.
        manager.set_automatic(false, 0.1, &mut scene, &mut icons);
        manager.on_scale_changed(1.0, &mut scene, &mut icons);
        assert_eq!(manager.mode(), RenderMode::Accelerated);
    }

    #[test]
    fn accelerated_styles_derive_from_tags_and_active_label_appearance() {
        let mut scene = scene_fixture();
        let mut icons = warm_icon_cache();
        let mut manager = RenderBackendManager::new(0.2);

        // Zoom high enough that label width 100 crosses the detail
        // threshold: the derived appearance is the detail one.
        let zoom = (DETAIL_THRESHOLD / 100.0) * 2.0;
        manager.toggle(true, zoom, &mut scene, &mut icons);

        let accelerated = manager.accelerated().unwrap();
        assert_eq!(accelerated.node_styles.len(), 2);
        assert_eq!(
            accelerated.node_styles.get(&0).unwrap().fill,
            Color32::from_rgb(200, 80, 40)
        );
        assert!(!accelerated.node_styles.contains_key(&2));

        let detail = manager.standard.label_style.detail.appearance;
        assert_eq!(
            accelerated.label_styles.get(&0).unwrap().appearance,
            detail
        );

        // The warm cache styles the icon-bearing node synchronously.
        assert_eq!(scene.icon_label_count(), 1);
        assert_eq!(accelerated.icon_labels.len(), 1);
        assert_eq!(accelerated.pending_icon_nodes(), 0);
    }

    #[test]
    fn label_appearance_falls_back_to_default_when_overview_is_active() {
        let mut scene = scene_fixture();
        let mut icons = warm_icon_cache();
        let mut manager = RenderBackendManager::new(0.2);

        // Zoom so low the overview (void) side is active everywhere.
        manager.toggle(true, 0.01, &mut scene, &mut icons);

        let accelerated = manager.accelerated().unwrap();
        assert_eq!(
            accelerated.label_styles.get(&0).unwrap().appearance,
            LabelAppearance::default()
        );
    }

    #[test]
    fn cold_cache_defers_icon_styling_until_resolution_lands() {
        let mut scene = scene_fixture();
        let (mut icons, gate) = cold_icon_cache();
        let mut manager = RenderBackendManager::new(0.2);

        manager.toggle(true, 0.1, &mut scene, &mut icons);
        assert_eq!(manager.mode(), RenderMode::Accelerated);
        assert_eq!(scene.icon_label_count(), 0);
        let accelerated = manager.accelerated().unwrap();
        assert!(accelerated.icon_labels.is_empty());
        assert_eq!(accelerated.pending_icon_nodes(), 1);
        // Non-icon styling proceeded immediately.
        assert_eq!(accelerated.node_styles.len(), 2);

        gate.send(()).unwrap();
        super::tests_support::poll_until_resolved(&mut icons, "de");
        let completed = vec!["de".to_owned()];
        manager.apply_resolved_icons(&completed, &mut scene, &icons);

        assert_eq!(scene.icon_label_count(), 1);
        let accelerated = manager.accelerated().unwrap();
        assert_eq!(accelerated.icon_labels.len(), 1);
        assert_eq!(accelerated.pending_icon_nodes(), 0);
    }

    #[test]
    fn late_resolution_after_switching_back_has_no_effect() {
        let mut scene = scene_fixture();
        let (mut icons, gate) = cold_icon_cache();
        let mut manager = RenderBackendManager::new(0.2);

        manager.toggle(true, 0.1, &mut scene, &mut icons);
        manager.toggle(false, 0.1, &mut scene, &mut icons);
        assert_eq!(manager.mode(), RenderMode::Standard);

        gate.send(()).unwrap();
        super::tests_support::poll_until_resolved(&mut icons, "de");
        manager.apply_resolved_icons(&["de".to_owned()], &mut scene, &icons);

        assert_eq!(scene.icon_label_count(), 0);
        assert!(manager.accelerated().is_none());

        // The entry settled in the shared cache, so the next switch styles
        // the node synchronously.
        manager.toggle(true, 0.1, &mut scene, &mut icons);
        assert_eq!(scene.icon_label_count(), 1);
        assert_eq!(manager.accelerated().unwrap().pending_icon_nodes(), 0);
    }

    #[test]
    fn switching_back_removes_synthetic_labels_and_retained_visuals() {
        let mut scene = scene_fixture();
        let mut icons = warm_icon_cache();
        let mut manager = RenderBackendManager::new(0.2);

        // Populate a retained visual in the standard backend first.
        let node = scene.nodes[0].clone();
        manager.standard_mut().render_node(0, &node, 1.0);
        assert_eq!(manager.standard.visuals.len(), 1);

        manager.toggle(true, 0.1, &mut scene, &mut icons);
        assert!(manager.standard.visuals.is_empty());
        assert_eq!(scene.icon_label_count(), 1);

        manager.toggle(false, 0.1, &mut scene, &mut icons);
        assert_eq!(scene.icon_label_count(), 0);
        assert!(manager.accelerated().is_none());
        assert_eq!(scene.labels.len(), 3);
    }

    #[test]
    fn switching_clears_animation_assignments() {
        let mut scene = scene_fixture();
        let mut icons = warm_icon_cache();
        let mut manager = RenderBackendManager::new(0.2);

        manager.toggle(true, 0.1, &mut scene, &mut icons);
        let accelerated = manager.accelerated_mut().unwrap();
        accelerated
            .animations
            .insert(ItemRef::Node(0), ItemAnimation::Fade);
        accelerated.driver.start();

        manager.toggle(false, 0.1, &mut scene, &mut icons);
        manager.toggle(true, 0.1, &mut scene, &mut icons);
        let accelerated = manager.accelerated().unwrap();
        assert!(accelerated.animations.is_empty());
        assert!(!accelerated.driver.is_running());
    }
}
