// src/main.rs
use anyhow::Context;
use eframe::egui;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pose_skeleton_viewer::app::ViewerApp;
use pose_skeleton_viewer::ViewerConfig;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ViewerConfig::load().context("Failed to load viewer config")?;
    info!(camera = config.camera_index, interval_ms = config.tick_interval_ms, "Starting viewer");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 700.0])
            .with_min_inner_size([800.0, 500.0]),
        centered: true,
        ..Default::default()
    };

    eframe::run_native(
        "Pose Skeleton Viewer",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(create_visuals());
            Box::new(ViewerApp::new(cc, config))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Error running application: {e}"))
}

fn create_visuals() -> egui::Visuals {
    let mut visuals = egui::Visuals::dark();

    visuals.widgets.noninteractive.bg_fill = egui::Color32::from_rgb(30, 30, 35);
    visuals.widgets.inactive.bg_fill = egui::Color32::from_rgb(45, 45, 52);
    visuals.widgets.hovered.bg_fill = egui::Color32::from_rgb(55, 55, 65);
    visuals.widgets.active.bg_fill = egui::Color32::from_rgb(70, 130, 240);

    visuals.widgets.inactive.rounding = egui::Rounding::same(8.0);
    visuals.widgets.hovered.rounding = egui::Rounding::same(8.0);
    visuals.widgets.active.rounding = egui::Rounding::same(8.0);
    visuals.window_rounding = egui::Rounding::same(12.0);

    visuals
}
