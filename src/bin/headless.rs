// src/bin/headless.rs - Runs the pipeline without a window and logs each tick
use anyhow::Context;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use pose_skeleton_viewer::mediapipe_bridge::SimulatedPoseModel;
use pose_skeleton_viewer::video::NokhwaOpener;
use pose_skeleton_viewer::{DrawList, Pipeline, TickOutcome, ViewerConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ViewerConfig::load().context("Failed to load viewer config")?;
    // Optional tick limit as the first argument; runs until ctrl-c otherwise.
    let limit: Option<u64> = std::env::args().nth(1).and_then(|a| a.parse().ok());

    let mut pipeline = Pipeline::from_config(
        NokhwaOpener::new(config.mirror_feed),
        SimulatedPoseModel::new(),
        &config,
    );
    if pipeline.select_device(config.camera_index).is_err() {
        warn!("Running without a camera; ticks will produce no frames");
    }

    let mut canvas = DrawList::new();
    let mut interval = time::interval(config.tick_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match pipeline.tick() {
                    Ok(TickOutcome::Drawn { joints }) => {
                        let stats = pipeline.renderer_mut().paint(&mut canvas);
                        info!(tick = pipeline.ticks(), joints, bones = stats.bones, "Skeleton updated");
                    }
                    Ok(TickOutcome::NoFrame) => {}
                    Err(e) => error!("Pose extraction failed: {:#}", e),
                }
                if limit.is_some_and(|n| pipeline.ticks() >= n) {
                    break;
                }
            }
            _ = &mut shutdown => {
                info!("Interrupted");
                break;
            }
        }
    }

    Ok(())
}
