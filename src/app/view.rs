use std::collections::HashMap;

use eframe::egui::{
    self, Align2, Color32, Context, FontId, Pos2, Rect, Sense, Stroke, TextureHandle, Ui, Vec2,
    pos2, vec2,
};

use crate::render::{IconBitmap, ItemAnimation, RenderMode, VisualShape};
use crate::scene::{ItemRef, LabelKind};

use super::ViewModel;
use super::hover::{collect_group_items, hover_group};

const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);
const EDGE_COLOR: Color32 = Color32::from_rgb(84, 90, 98);
const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
/// Fill for accelerated nodes whose tag carries no color.
const PLAIN_FILL: Color32 = Color32::from_rgb(120, 128, 138);

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}

fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

fn circle_on_screen(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

fn edge_on_screen(rect: Rect, start: Pos2, end: Pos2) -> bool {
    let min_x = start.x.min(end.x);
    let max_x = start.x.max(end.x);
    let min_y = start.y.min(end.y);
    let max_y = start.y.max(end.y);
    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}

fn icon_texture(
    textures: &mut HashMap<String, TextureHandle>,
    ctx: &Context,
    key: &str,
    bitmap: &IconBitmap,
) -> egui::TextureId {
    if let Some(handle) = textures.get(key) {
        return handle.id();
    }

    let image = egui::ColorImage::from_rgba_unmultiplied(
        [bitmap.width as usize, bitmap.height as usize],
        &bitmap.rgba,
    );
    let handle = ctx.load_texture(format!("icon-{key}"), image, egui::TextureOptions::LINEAR);
    let id = handle.id();
    textures.insert(key.to_owned(), handle);
    id
}

fn paint_icon(
    painter: &egui::Painter,
    texture: egui::TextureId,
    bitmap: &IconBitmap,
    position: Pos2,
    radius: f32,
    tint: Color32,
) {
    // Icon spans half the node extent, like the detail template renders it.
    let width = radius;
    let height = width * (bitmap.height as f32 / bitmap.width as f32);
    let icon_rect = Rect::from_center_size(position, vec2(width, height));
    painter.image(
        texture,
        icon_rect,
        Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
        tint,
    );
}

impl ViewModel {
    pub(super) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, BACKGROUND);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        let pan = self.pan;
        let zoom = self.zoom;

        let mut screen_positions = Vec::with_capacity(self.scene.nodes.len());
        let mut screen_radii = Vec::with_capacity(self.scene.nodes.len());
        for node in &self.scene.nodes {
            let (center_x, center_y) = node.layout.center();
            screen_positions.push(world_to_screen(rect, pan, zoom, vec2(center_x, center_y)));
            screen_radii.push(node.layout.width * 0.5 * zoom);
        }

        let hovered_node = Self::hovered_node(ui, &screen_positions, &screen_radii);
        let hovered_item = match hovered_node {
            Some(index) => Some(ItemRef::Node(index)),
            None => self.hovered_edge(ui, &screen_positions).map(ItemRef::Edge),
        };

        if hovered_item.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        self.update_hover_highlight(hovered_item);

        if response.clicked_by(egui::PointerButton::Primary) {
            match hovered_item {
                Some(item) => {
                    let selected = self.backend.selection().is_selected(item);
                    self.backend.selection_mut().set_selected(item, !selected);
                }
                None => self.backend.selection_mut().clear(),
            }
        }

        match self.backend.mode() {
            RenderMode::Standard => {
                self.draw_standard(ui.ctx(), &painter, rect, &screen_positions, &screen_radii);
            }
            RenderMode::Accelerated => {
                self.draw_accelerated(ui.ctx(), &painter, rect, &screen_positions, &screen_radii);
            }
        }

        self.draw_selection_indicators(&painter, &screen_positions, &screen_radii);

        if let Some(index) = hovered_node
            && let Some(node) = self.scene.nodes.get(index)
        {
            let cluster = node
                .tag
                .group
                .map_or_else(|| "-".to_owned(), |group| group.to_string());
            let panel_text = format!(
                "{}  |  cluster {cluster}  |  {} links",
                node.id, node.tag.weight as u32
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                panel_text,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }
    }

    /// Turns a hover change into a highlight-set change. The same cluster
    /// hovered twice in a row does nothing; leaving every cluster clears.
    fn update_hover_highlight(&mut self, hovered: Option<ItemRef>) {
        let group = hover_group(&self.scene, hovered);
        if group == self.hovered_group {
            return;
        }
        self.hovered_group = group;

        match group {
            Some(group) => {
                let highlight = collect_group_items(&self.scene, group);
                self.animator
                    .play(&highlight, &self.scene, &mut self.backend);
            }
            None => self.animator.clear(&mut self.backend),
        }
    }

    /// Retained per-item pass: every visible item renders through its
    /// level-of-detail style, reusing the previous visual where the
    /// producer still matches.
    fn draw_standard(
        &mut self,
        ctx: &Context,
        painter: &egui::Painter,
        rect: Rect,
        screen_positions: &[Pos2],
        screen_radii: &[f32],
    ) {
        let zoom = self.zoom;

        let mut visible_edges = 0usize;
        for edge in &self.scene.edges {
            let (Some(&start), Some(&end)) = (
                screen_positions.get(edge.source),
                screen_positions.get(edge.target),
            ) else {
                continue;
            };
            if !edge_on_screen(rect, start, end) {
                continue;
            }
            let width = (edge.thickness * zoom).clamp(0.4, 3.2);
            painter.line_segment([start, end], Stroke::new(width, EDGE_COLOR));
            visible_edges += 1;
        }
        self.visible_edge_count = visible_edges;

        let mut visible_nodes = 0usize;
        for index in 0..self.scene.nodes.len() {
            let position = screen_positions[index];
            let radius = screen_radii[index];
            if !circle_on_screen(rect, position, radius) {
                continue;
            }
            visible_nodes += 1;

            let node = &self.scene.nodes[index];
            let visual = self
                .backend
                .standard_mut()
                .render_node(index, node, zoom)
                .clone();

            if let VisualShape::NodeDisc {
                fill,
                backing,
                icon,
            } = visual.shape
            {
                if backing {
                    painter.circle_filled(position, radius, Color32::WHITE);
                    painter.circle_filled(position, radius * 0.96, fill);
                } else {
                    painter.circle_filled(position, radius, fill);
                }
                if let Some(key) = icon {
                    self.draw_node_icon(ctx, painter, &key, position, radius, Color32::WHITE);
                }
            }
        }
        self.visible_node_count = visible_nodes;

        for index in 0..self.scene.labels.len() {
            let label = &self.scene.labels[index];
            let (Some(&owner_position), Some(&owner_radius)) = (
                screen_positions.get(label.owner),
                screen_radii.get(label.owner),
            ) else {
                continue;
            };
            if !circle_on_screen(rect, owner_position, owner_radius + 40.0) {
                continue;
            }

            let visual = self
                .backend
                .standard_mut()
                .render_label(index, label, zoom)
                .clone();

            if let VisualShape::LabelText {
                text,
                font_size,
                color,
            } = visual.shape
            {
                painter.text(
                    owner_position + vec2(0.0, owner_radius + 4.0),
                    Align2::CENTER_TOP,
                    text,
                    FontId::proportional(font_size),
                    color,
                );
            }
        }
    }

    /// Batched pass: derived per-item styles only, with fade/pulse factors
    /// from the animation driver applied inline.
    fn draw_accelerated(
        &mut self,
        ctx: &Context,
        painter: &egui::Painter,
        rect: Rect,
        screen_positions: &[Pos2],
        screen_radii: &[f32],
    ) {
        let zoom = self.zoom;
        let Some(accelerated) = self.backend.accelerated() else {
            return;
        };
        let driver = accelerated.driver;
        let fade = driver.fade_factor();
        let pulse = driver.pulse_scale();

        let mut visible_edges = 0usize;
        for (index, edge) in self.scene.edges.iter().enumerate() {
            let (Some(&start), Some(&end)) = (
                screen_positions.get(edge.source),
                screen_positions.get(edge.target),
            ) else {
                continue;
            };
            if !edge_on_screen(rect, start, end) {
                continue;
            }

            let faded = accelerated.animations.get(&ItemRef::Edge(index))
                == Some(&ItemAnimation::Fade);
            let color = if faded {
                blend_color(EDGE_COLOR, BACKGROUND, fade * 0.85)
            } else {
                EDGE_COLOR
            };
            let width = (edge.thickness * zoom * 0.8).clamp(0.3, 2.2);
            painter.line_segment([start, end], Stroke::new(width, color));
            visible_edges += 1;
        }
        self.visible_edge_count = visible_edges;

        let mut visible_nodes = 0usize;
        for index in 0..self.scene.nodes.len() {
            let position = screen_positions[index];
            let mut radius = screen_radii[index];
            if !circle_on_screen(rect, position, radius) {
                continue;
            }
            visible_nodes += 1;

            let mut fill = accelerated
                .node_styles
                .get(&index)
                .map_or(PLAIN_FILL, |style| style.fill);
            match accelerated.animations.get(&ItemRef::Node(index)) {
                Some(ItemAnimation::Fade) => fill = blend_color(fill, BACKGROUND, fade * 0.8),
                Some(ItemAnimation::Pulse) => radius *= pulse,
                None => {}
            }
            painter.circle_filled(position, radius, fill);
        }
        self.visible_node_count = visible_nodes;

        for (index, label) in self.scene.labels.iter().enumerate() {
            if label.kind != LabelKind::Text {
                continue;
            }
            let (Some(&owner_position), Some(&owner_radius)) = (
                screen_positions.get(label.owner),
                screen_radii.get(label.owner),
            ) else {
                continue;
            };
            if !circle_on_screen(rect, owner_position, owner_radius + 40.0) {
                continue;
            }
            let Some(style) = accelerated.label_styles.get(&index) else {
                continue;
            };

            let mut color = style.appearance.color;
            if accelerated.animations.get(&ItemRef::Label(index))
                == Some(&ItemAnimation::Fade)
            {
                color = blend_color(color, BACKGROUND, fade * 0.8);
            }
            painter.text(
                owner_position + vec2(0.0, owner_radius + 4.0),
                Align2::CENTER_TOP,
                &label.text,
                FontId::proportional(style.appearance.font_size),
                color,
            );
        }

        // Synthetic icon labels, styled at switch time or when their
        // resolution landed.
        for (&label_index, style) in &accelerated.icon_labels {
            let Some(label) = self.scene.labels.get(label_index) else {
                continue;
            };
            let (Some(&owner_position), Some(&owner_radius)) = (
                screen_positions.get(label.owner),
                screen_radii.get(label.owner),
            ) else {
                continue;
            };
            if !circle_on_screen(rect, owner_position, owner_radius) {
                continue;
            }

            let tint = if accelerated.animations.get(&ItemRef::Label(label_index))
                == Some(&ItemAnimation::Fade)
            {
                Color32::WHITE.gamma_multiply(1.0 - fade * 0.8)
            } else {
                Color32::WHITE
            };
            let texture = icon_texture(&mut self.icon_textures, ctx, &style.key, &style.icon);
            paint_icon(painter, texture, &style.icon, owner_position, owner_radius, tint);
        }
    }

    fn draw_node_icon(
        &mut self,
        ctx: &Context,
        painter: &egui::Painter,
        key: &str,
        position: Pos2,
        radius: f32,
        tint: Color32,
    ) {
        // Unresolved or failed icons simply leave the disc bare.
        let Some(Some(bitmap)) = self.icons.entry(key) else {
            return;
        };
        let texture = icon_texture(&mut self.icon_textures, ctx, key, &bitmap);
        paint_icon(painter, texture, &bitmap, position, radius, tint);
    }

    fn draw_selection_indicators(
        &self,
        painter: &egui::Painter,
        screen_positions: &[Pos2],
        screen_radii: &[f32],
    ) {
        for item in self.backend.selection().items() {
            match item {
                ItemRef::Node(index) => {
                    if let (Some(&position), Some(&radius)) =
                        (screen_positions.get(index), screen_radii.get(index))
                    {
                        painter.circle_stroke(
                            position,
                            radius + 3.0,
                            Stroke::new(2.0, SELECTED_COLOR),
                        );
                    }
                }
                ItemRef::Edge(index) => {
                    if let Some(edge) = self.scene.edges.get(index)
                        && let (Some(&start), Some(&end)) = (
                            screen_positions.get(edge.source),
                            screen_positions.get(edge.target),
                        )
                    {
                        painter.line_segment([start, end], Stroke::new(2.4, SELECTED_COLOR));
                    }
                }
                ItemRef::Label(_) => {}
            }
        }
    }
}
