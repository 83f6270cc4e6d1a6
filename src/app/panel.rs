use eframe::egui::{self, Context};

use crate::render::{HighlightMode, RenderMode};

use super::{AppConfig, ViewModel};

impl ViewModel {
    pub(super) fn show_side_panel(
        &mut self,
        ctx: &Context,
        config: &AppConfig,
        reload_requested: &mut bool,
        is_reloading: bool,
    ) {
        egui::SidePanel::left("controls")
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                ui.heading("Rendering");

                let mode_text = match self.backend.mode() {
                    RenderMode::Standard => "standard",
                    RenderMode::Accelerated => "accelerated",
                };
                ui.label(format!("Active backend: {mode_text}"));

                let mut automatic = self.backend.automatic();
                if ui
                    .checkbox(&mut automatic, "Switch backend with zoom")
                    .changed()
                {
                    self.backend
                        .set_automatic(automatic, self.zoom, &mut self.scene, &mut self.icons);
                }

                let mut threshold = self.backend.zoom_threshold();
                let threshold_response = ui.add(
                    egui::Slider::new(&mut threshold, 0.02..=1.0)
                        .text("zoom threshold")
                        .logarithmic(true),
                );
                if threshold_response.changed() {
                    self.backend.set_zoom_threshold(threshold);
                    self.backend
                        .on_scale_changed(self.zoom, &mut self.scene, &mut self.icons);
                }

                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(!automatic, egui::Button::new("Standard"))
                        .clicked()
                    {
                        self.backend
                            .toggle(false, self.zoom, &mut self.scene, &mut self.icons);
                    }
                    if ui
                        .add_enabled(!automatic, egui::Button::new("Accelerated"))
                        .clicked()
                    {
                        self.backend
                            .toggle(true, self.zoom, &mut self.scene, &mut self.icons);
                    }
                });

                let mut suspended = self.backend.suspended();
                if ui.checkbox(&mut suspended, "Suspend switching").changed() {
                    if suspended {
                        self.backend.suspend();
                    } else {
                        self.backend.resume();
                    }
                }

                ui.separator();
                ui.heading("Hover highlight");
                let mut mode = self.animator.mode();
                ui.radio_value(&mut mode, HighlightMode::FadeOthers, "Fade others");
                ui.radio_value(&mut mode, HighlightMode::PulseHighlighted, "Pulse highlighted");
                if mode != self.animator.mode() {
                    self.animator.set_mode(mode, &mut self.backend);
                }

                ui.separator();
                ui.heading("Icons");
                ui.label(format!(
                    "resolved {}  |  in flight {}",
                    self.icons.resolved_count(),
                    self.icons.pending_count()
                ));
                if let Some(accelerated) = self.backend.accelerated()
                    && accelerated.pending_icon_nodes() > 0
                {
                    ui.label(format!(
                        "{} nodes awaiting icon styling",
                        accelerated.pending_icon_nodes()
                    ));
                }

                ui.separator();
                ui.label(format!("Selected items: {}", self.backend.selection().len()));
                if ui.button("Clear selection").clicked() {
                    self.backend.selection_mut().clear();
                }

                ui.separator();
                ui.checkbox(&mut self.show_fps, "Show frame rate");
                if self.show_fps {
                    ui.label(self.fps_text());
                }

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Reload").clicked() {
                        *reload_requested = true;
                    }
                    if is_reloading {
                        ui.spinner();
                    }
                });
                ui.label(
                    egui::RichText::new(&config.data_path)
                        .small()
                        .color(egui::Color32::from_gray(140)),
                );

                ui.add_space(8.0);
                ui.label(
                    egui::RichText::new(format!(
                        "{} nodes, {} edges on screen  |  zoom {:.2}",
                        self.visible_node_count, self.visible_edge_count, self.zoom
                    ))
                    .small(),
                );
            });
    }

    pub(super) fn update_fps(&mut self, ctx: &Context) {
        const FPS_SAMPLE_WINDOW: usize = 120;

        let delta = ctx.input(|input| input.stable_dt);
        if delta <= f32::EPSILON {
            return;
        }

        self.fps_current = (1.0 / delta).clamp(0.0, 1000.0);
        self.fps_samples.push_back(self.fps_current);
        while self.fps_samples.len() > FPS_SAMPLE_WINDOW {
            self.fps_samples.pop_front();
        }
    }

    fn fps_text(&self) -> String {
        if self.fps_samples.is_empty() {
            return format!("FPS {:.0}", self.fps_current);
        }
        let average = self.fps_samples.iter().sum::<f32>() / self.fps_samples.len() as f32;
        format!("FPS {:.0}  |  avg {average:.1}", self.fps_current)
    }
}
