use std::collections::HashSet;

use crate::scene::{GraphScene, ItemRef};

use super::backend::RenderBackendManager;

/// How hover emphasis is expressed while the accelerated backend runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HighlightMode {
    /// Fade everything outside the highlight set toward neutral.
    FadeOthers,
    /// Pulse the highlighted items themselves.
    PulseHighlighted,
}

/// Animation assigned to a single item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemAnimation {
    Fade,
    Pulse,
}

const FADE_IN_SECS: f32 = 0.35;
const PULSE_PERIOD_SECS: f32 = 1.2;

/// The shared play/stop engine. One animation runs at a time; starting a new
/// one stops the previous run first. Time advances explicitly from the frame
/// loop, so the driver is deterministic under test.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnimationDriver {
    running: bool,
    elapsed: f32,
}

impl AnimationDriver {
    pub fn start(&mut self) {
        self.running = true;
        self.elapsed = 0.0;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn advance(&mut self, delta_seconds: f32) {
        if self.running {
            self.elapsed += delta_seconds.max(0.0);
        }
    }

    /// Fade progress in [0, 1]; eases in over the first fraction of a second.
    pub fn fade_factor(&self) -> f32 {
        if !self.running {
            return 0.0;
        }
        (self.elapsed / FADE_IN_SECS).clamp(0.0, 1.0)
    }

    /// Radius multiplier for pulsing items; 1.0 while stopped.
    pub fn pulse_scale(&self) -> f32 {
        if !self.running {
            return 1.0;
        }
        let phase = (self.elapsed / PULSE_PERIOD_SECS) * std::f32::consts::TAU;
        1.0 + 0.18 * phase.sin()
    }
}

/// Applies hover emphasis through the accelerated backend's animation
/// engine. A no-op while the standard backend is current.
#[derive(Clone, Copy, Debug)]
pub struct HighlightAnimator {
    mode: HighlightMode,
}

impl Default for HighlightAnimator {
    fn default() -> Self {
        Self {
            mode: HighlightMode::FadeOthers,
        }
    }
}

impl HighlightAnimator {
    pub fn mode(&self) -> HighlightMode {
        self.mode
    }

    /// Switching modes stops any in-flight animation and clears per-item
    /// assignments; setting the current mode again changes nothing.
    pub fn set_mode(&mut self, mode: HighlightMode, backend: &mut RenderBackendManager) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        backend.stop_highlight();
    }

    pub fn play(
        &mut self,
        highlight: &[ItemRef],
        scene: &GraphScene,
        backend: &mut RenderBackendManager,
    ) {
        let Some(accelerated) = backend.accelerated_mut() else {
            return;
        };

        // One driver: a new play replaces whatever was running.
        accelerated.driver.stop();
        accelerated.animations.clear();

        let set = highlight.iter().copied().collect::<HashSet<_>>();
        match self.mode {
            HighlightMode::FadeOthers => {
                // A faded node takes its labels and incident edges with it;
                // items inside the highlight set are left untouched.
                for index in 0..scene.nodes.len() {
                    if set.contains(&ItemRef::Node(index)) {
                        continue;
                    }
                    accelerated
                        .animations
                        .insert(ItemRef::Node(index), ItemAnimation::Fade);
                    for (label_index, _) in scene.node_labels(index) {
                        accelerated
                            .animations
                            .insert(ItemRef::Label(label_index), ItemAnimation::Fade);
                    }
                    for edge_index in scene.incident_edges(index) {
                        if set.contains(&ItemRef::Edge(edge_index)) {
                            continue;
                        }
                        accelerated
                            .animations
                            .insert(ItemRef::Edge(edge_index), ItemAnimation::Fade);
                    }
                }
            }
            HighlightMode::PulseHighlighted => {
                for item in &set {
                    accelerated.animations.insert(*item, ItemAnimation::Pulse);
                    if let ItemRef::Node(index) = item {
                        for (label_index, _) in scene.node_labels(*index) {
                            accelerated
                                .animations
                                .insert(ItemRef::Label(label_index), ItemAnimation::Pulse);
                        }
                    }
                }
            }
        }

        accelerated.driver.start();
    }

    /// Removes every per-item assignment; safe when nothing is assigned.
    pub fn clear(&mut self, backend: &mut RenderBackendManager) {
        if let Some(accelerated) = backend.accelerated_mut() {
            accelerated.animations.clear();
        }
    }
}
