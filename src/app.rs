// src/app.rs
use eframe::egui;
use std::time::{Duration, Instant};
use tracing::error;

use crate::config::ViewerConfig;
use crate::mediapipe_bridge::{PoseModel, SimulatedPoseModel};
use crate::orbit::CameraOrbitController;
use crate::pipeline::{Pipeline, TickOutcome, TickSchedule};
use crate::ui::{EguiCanvas, HoldRepeat, Theme, VideoWidget};
use crate::video::{available_devices, DeviceInfo, NokhwaOpener};

const ROTATE_REPEAT: Duration = Duration::from_millis(50);

pub type LivePipeline = Pipeline<NokhwaOpener, Box<dyn PoseModel>>;

pub struct ViewerApp {
    pipeline: LivePipeline,
    orbit: CameraOrbitController,
    schedule: TickSchedule,
    rotate_left: HoldRepeat,
    rotate_right: HoldRepeat,

    // UI State
    theme: Theme,
    video: VideoWidget,
    devices: Vec<DeviceInfo>,
    selected_device: u32,
    last_outcome: Option<TickOutcome>,
    status: Option<String>,
}

impl ViewerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: ViewerConfig) -> Self {
        let model: Box<dyn PoseModel> = Box::new(SimulatedPoseModel::new());
        let mut pipeline = Pipeline::from_config(NokhwaOpener::new(config.mirror_feed), model, &config);
        let orbit = pipeline.renderer().orbit_controller(config.orbit_step_deg);

        let status = pipeline
            .select_device(config.camera_index)
            .err()
            .map(|e| e.to_string());

        Self {
            pipeline,
            orbit,
            schedule: TickSchedule::new(config.tick_interval()),
            rotate_left: HoldRepeat::new(ROTATE_REPEAT),
            rotate_right: HoldRepeat::new(ROTATE_REPEAT),
            theme: Theme::default(),
            video: VideoWidget::new(),
            devices: available_devices(),
            selected_device: config.camera_index,
            last_outcome: None,
            status,
        }
    }

    fn run_tick(&mut self, ctx: &egui::Context, now: Instant) {
        if !self.schedule.due(now) {
            return;
        }
        match self.pipeline.tick() {
            Ok(outcome) => self.last_outcome = Some(outcome),
            Err(e) => error!("Pose extraction failed: {:#}", e),
        }
        if let Some(frame) = self.pipeline.take_annotated() {
            self.video.update_frame(ctx, &frame);
        }
    }

    fn switch_device(&mut self, index: u32) {
        self.status = self.pipeline.select_device(index).err().map(|e| e.to_string());
        if self.status.is_some() {
            self.video.reset();
        }
    }

    fn render_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                ui.heading("Pose Skeleton Viewer");
                ui.separator();

                let selected_text = self
                    .devices
                    .iter()
                    .find(|d| d.index == self.selected_device)
                    .map(|d| d.name.clone())
                    .unwrap_or_else(|| format!("Camera {}", self.selected_device));

                let mut chosen = self.selected_device;
                egui::ComboBox::from_label("Camera")
                    .selected_text(selected_text)
                    .show_ui(ui, |ui| {
                        for device in &self.devices {
                            ui.selectable_value(&mut chosen, device.index, device.name.as_str());
                        }
                    });
                if chosen != self.selected_device {
                    self.selected_device = chosen;
                    self.switch_device(chosen);
                }

                if ui.button("⟳ Refresh").clicked() {
                    self.devices = available_devices();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(status) = &self.status {
                        ui.colored_label(self.theme.error, status);
                    } else if let Some(TickOutcome::Drawn { joints }) = self.last_outcome {
                        ui.label(format!("{} joints", joints));
                    }
                });
            });
            ui.add_space(10.0);
        });
    }

    fn render_control_panel(&mut self, ctx: &egui::Context, now: Instant) {
        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                let left = ui.add_sized([120.0, 40.0], egui::Button::new("< Rotate"));
                let right = ui.add_sized([120.0, 40.0], egui::Button::new("Rotate >"));

                if self.rotate_left.poll(left.is_pointer_button_down_on(), left.clicked(), now) {
                    self.orbit.rotate_left();
                }
                if self.rotate_right.poll(right.is_pointer_button_down_on(), right.clicked(), now) {
                    self.orbit.rotate_right();
                }

                ui.separator();
                ui.label(format!("Yaw: {:.0}°", self.pipeline.renderer().yaw_deg()));
            });
            ui.add_space(10.0);
        });
    }

    fn render_main_content(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                columns[0].group(|ui| {
                    ui.heading("Camera Feed");
                    self.video.show(ui, &self.theme);
                });

                columns[1].group(|ui| {
                    ui.heading("Skeleton");
                    let (rect, _response) =
                        ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
                    let renderer = self.pipeline.renderer_mut();
                    renderer.resize(rect.width(), rect.height());

                    let painter = ui.painter_at(rect);
                    let mut canvas = EguiCanvas::new(&painter, rect, self.theme.background);
                    renderer.paint(&mut canvas);
                });
            });
        });
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.run_tick(ctx, now);

        self.render_header(ctx);
        self.render_control_panel(ctx, now);
        self.render_main_content(ctx);

        ctx.request_repaint_after(self.schedule.remaining(Instant::now()).min(ROTATE_REPEAT));
    }
}
