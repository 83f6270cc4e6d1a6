use eframe::egui::{self, Pos2, Rect, Ui};

use super::ViewModel;
use super::view::screen_to_world;

impl ViewModel {
    pub(super) fn handle_graph_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        let next_zoom = (self.zoom * zoom_factor).clamp(0.02, 6.0);
        if (next_zoom - self.zoom).abs() <= f32::EPSILON {
            return;
        }

        self.zoom = next_zoom;
        self.pan = pointer - rect.center() - (world_before * self.zoom);

        // Every scale change notifies the backend manager; whether it acts
        // depends on its automatic/suspended state.
        self.backend
            .on_scale_changed(self.zoom, &mut self.scene, &mut self.icons);
    }

    pub(super) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    pub(super) fn hovered_node(
        ui: &Ui,
        screen_positions: &[Pos2],
        screen_radii: &[f32],
    ) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        (0..screen_positions.len())
            .filter_map(|index| {
                let distance = screen_positions[index].distance(pointer);
                (distance <= screen_radii[index]).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    pub(super) fn hovered_edge(
        &self,
        ui: &Ui,
        screen_positions: &[Pos2],
    ) -> Option<usize> {
        const EDGE_HOVER_DISTANCE: f32 = 6.0;

        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        self.scene
            .edges
            .iter()
            .enumerate()
            .filter_map(|(index, edge)| {
                let start = *screen_positions.get(edge.source)?;
                let end = *screen_positions.get(edge.target)?;
                let distance = point_segment_distance(pointer, start, end);
                (distance <= EDGE_HOVER_DISTANCE).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }
}

fn point_segment_distance(point: Pos2, start: Pos2, end: Pos2) -> f32 {
    let segment = end - start;
    let length_sq = segment.length_sq();
    if length_sq <= f32::EPSILON {
        return point.distance(start);
    }

    let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
    point.distance(start + segment * t)
}
