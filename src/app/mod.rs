use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::anyhow;
use eframe::egui::{self, Context, TextureHandle, Vec2};

use crate::data::load_scene;
use crate::render::{
    HighlightAnimator, HttpIconFetcher, IconCache, IconFetcher, RenderBackendManager,
};
use crate::scene::GraphScene;

mod hover;
mod interaction;
mod panel;
mod view;

const INITIAL_ZOOM: f32 = 0.6;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data_path: String,
    pub icon_base: Option<String>,
    pub zoom_threshold: f32,
    pub automatic: bool,
}

pub struct GraphLensApp {
    config: AppConfig,
    state: AppState,
    reload_rx: Option<Receiver<Result<GraphScene, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<GraphScene, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    scene: GraphScene,
    icons: IconCache,
    backend: RenderBackendManager,
    animator: HighlightAnimator,
    pan: Vec2,
    zoom: f32,
    hovered_group: Option<u32>,
    icon_textures: HashMap<String, TextureHandle>,
    show_fps: bool,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
    visible_node_count: usize,
    visible_edge_count: usize,
}

/// Fetcher used when no icon source is configured; every key settles as a
/// permanent "no icon".
struct NoIconSource;

impl IconFetcher for NoIconSource {
    fn fetch(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        Err(anyhow!("no icon source configured, cannot fetch {key}"))
    }
}

impl ViewModel {
    fn new(mut scene: GraphScene, config: &AppConfig) -> Self {
        let fetcher: Arc<dyn IconFetcher> = match config.icon_base.as_deref() {
            Some(base) => match HttpIconFetcher::new(base) {
                Ok(fetcher) => Arc::new(fetcher),
                Err(error) => {
                    log::warn!("icon fetcher unavailable: {error:#}");
                    Arc::new(NoIconSource)
                }
            },
            None => Arc::new(NoIconSource),
        };

        let mut icons = IconCache::new(fetcher);
        if config.icon_base.is_some() {
            icons.request_all(&scene);
        }

        let mut backend = RenderBackendManager::new(config.zoom_threshold);
        backend.add_mode_listener(|mode| log::debug!("render-mode listener notified: {mode:?}"));
        if config.automatic {
            backend.set_automatic(true, INITIAL_ZOOM, &mut scene, &mut icons);
        }

        Self {
            scene,
            icons,
            backend,
            animator: HighlightAnimator::default(),
            pan: Vec2::ZERO,
            zoom: INITIAL_ZOOM,
            hovered_group: None,
            icon_textures: HashMap::new(),
            show_fps: false,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
            visible_node_count: 0,
            visible_edge_count: 0,
        }
    }

    fn show(
        &mut self,
        ctx: &Context,
        config: &AppConfig,
        reload_requested: &mut bool,
        is_reloading: bool,
    ) {
        self.update_fps(ctx);

        let completed = self.icons.poll();
        if !completed.is_empty() {
            self.backend
                .apply_resolved_icons(&completed, &mut self.scene, &self.icons);
        }

        let delta_seconds = ctx.input(|input| input.stable_dt).clamp(0.0, 0.1);
        self.backend.advance_animations(delta_seconds);

        self.show_side_panel(ctx, config, reload_requested, is_reloading);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_graph(ui);
        });

        let animating = self
            .backend
            .accelerated()
            .is_some_and(|accelerated| accelerated.driver.is_running());
        if animating || self.icons.pending_count() > 0 {
            ctx.request_repaint();
        }
    }
}

impl GraphLensApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let state = Self::start_load(config.data_path.clone());
        Self {
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(data_path: String) -> Receiver<Result<GraphScene, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_scene(&data_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(data_path: String) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(data_path),
        }
    }
}

impl eframe::App for GraphLensApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(scene) => {
                            AppState::Ready(Box::new(ViewModel::new(scene, &self.config)))
                        }
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.config.data_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.config, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.config.data_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(scene) => AppState::Ready(Box::new(ViewModel::new(
                                    scene,
                                    &self.config,
                                ))),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
