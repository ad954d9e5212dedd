// src/ui.rs - egui widgets: skeleton canvas and camera preview
use eframe::egui::{self, Color32, Pos2, Rect, Stroke, Vec2};
use nalgebra::Vector3;
use nalgebra_glm as glm;

use std::time::{Duration, Instant};

use crate::frame::RawFrame;
use crate::pipeline::TickSchedule;
use crate::renderer::{project_with, Color, LineStyle, PointStyle, RenderTarget, ViewCamera};

#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color32,
    pub background: Color32,
    pub surface: Color32,
    pub error: Color32,
    pub text_secondary: Color32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color32::from_rgb(70, 130, 240),
            background: Color32::from_rgb(20, 20, 25),
            surface: Color32::from_rgb(30, 30, 35),
            error: Color32::from_rgb(244, 67, 54),
            text_secondary: Color32::from_rgb(200, 200, 200),
        }
    }
}

pub fn color32(color: Color) -> Color32 {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgb(channel(color[0]), channel(color[1]), channel(color[2]))
}

/// Maps normalized device coordinates onto `rect`, with +y pointing up.
pub fn ndc_to_screen(rect: Rect, ndc: &glm::Vec3) -> Pos2 {
    let center = rect.center();
    Pos2::new(
        center.x + ndc.x * rect.width() * 0.5,
        center.y - ndc.y * rect.height() * 0.5,
    )
}

/// Paints skeleton primitives into a region of an egui layer.
pub struct EguiCanvas<'a> {
    painter: &'a egui::Painter,
    rect: Rect,
    background: Color32,
    view_projection: glm::Mat4,
}

impl<'a> EguiCanvas<'a> {
    pub fn new(painter: &'a egui::Painter, rect: Rect, background: Color32) -> Self {
        Self {
            painter,
            rect,
            background,
            view_projection: glm::Mat4::identity(),
        }
    }

    fn to_screen(&self, p: &Vector3<f32>) -> Option<Pos2> {
        let ndc = project_with(&self.view_projection, p)?;
        // Outside the depth range means clipped by near or far.
        (-1.0..=1.0).contains(&ndc.z).then(|| ndc_to_screen(self.rect, &ndc))
    }
}

impl RenderTarget for EguiCanvas<'_> {
    fn clear(&mut self) {
        self.painter.rect_filled(self.rect, egui::Rounding::same(4.0), self.background);
    }

    fn set_projection(&mut self, camera: &ViewCamera) {
        self.view_projection = camera.view_projection();
    }

    fn line(&mut self, from: &Vector3<f32>, to: &Vector3<f32>, style: &LineStyle) {
        if let (Some(a), Some(b)) = (self.to_screen(from), self.to_screen(to)) {
            self.painter
                .line_segment([a, b], Stroke::new(style.width, color32(style.color)));
        }
    }

    fn point(&mut self, at: &Vector3<f32>, style: &PointStyle) {
        if let Some(pos) = self.to_screen(at) {
            self.painter.circle_filled(pos, style.size * 0.5, color32(style.color));
        }
    }
}

/// Auto-repeat for a push button: fires at a fixed rate while held, and once
/// on a click whose press never fired (a tap shorter than one UI frame, or a
/// second click inside the repeat interval).
#[derive(Debug, Clone)]
pub struct HoldRepeat {
    schedule: TickSchedule,
    fired_this_press: bool,
}

impl HoldRepeat {
    pub fn new(interval: Duration) -> Self {
        Self {
            schedule: TickSchedule::new(interval),
            fired_this_press: false,
        }
    }

    /// Call once per UI frame with the button's state; true means fire a step.
    pub fn poll(&mut self, held: bool, clicked: bool, now: Instant) -> bool {
        let mut fire = false;
        if held && self.schedule.due(now) {
            fire = true;
            self.fired_this_press = true;
        }
        if clicked && !self.fired_this_press {
            fire = true;
        }
        if !held {
            self.fired_this_press = false;
        }
        fire
    }
}

// Custom widget for video display
pub struct VideoWidget {
    texture: Option<egui::TextureHandle>,
    aspect_ratio: f32,
}

impl Default for VideoWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoWidget {
    pub fn new() -> Self {
        Self {
            texture: None,
            aspect_ratio: 4.0 / 3.0,
        }
    }

    pub fn has_frame(&self) -> bool {
        self.texture.is_some()
    }

    pub fn update_frame(&mut self, ctx: &egui::Context, frame: &RawFrame) {
        let size = [frame.width() as usize, frame.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &frame.to_rgba());
        if frame.height() > 0 {
            self.aspect_ratio = frame.width() as f32 / frame.height() as f32;
        }

        match self.texture.as_mut() {
            Some(texture) => texture.set(color_image, Default::default()),
            None => self.texture = Some(ctx.load_texture("video_frame", color_image, Default::default())),
        }
    }

    /// Drops the last uploaded frame.
    pub fn reset(&mut self) {
        self.texture = None;
    }

    pub fn show(&self, ui: &mut egui::Ui, theme: &Theme) {
        let available_size = ui.available_size();
        let widget_width = available_size.x.min(available_size.y * self.aspect_ratio);
        let widget_height = widget_width / self.aspect_ratio;

        let size = Vec2::new(widget_width, widget_height);
        let (rect, _response) = ui.allocate_exact_size(size, egui::Sense::hover());

        if let Some(texture) = &self.texture {
            ui.painter().image(
                texture.id(),
                rect,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        } else {
            ui.painter().rect_filled(rect, egui::Rounding::same(4.0), theme.surface);
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "No Video Signal",
                egui::FontId::proportional(16.0),
                theme.text_secondary,
            );
        }
    }
}
