// src/pipeline.rs - Periodic acquire -> extract -> draw driver
use anyhow::Result;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::ViewerConfig;
use crate::extractor::PoseExtractor;
use crate::frame::RawFrame;
use crate::mediapipe_bridge::PoseModel;
use crate::renderer::SkeletonRenderer;
use crate::video::{CameraFeed, DeviceOpener};

/// What one tick produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No frame was available; the renderer was left alone.
    NoFrame,
    /// A frame was processed and handed to the renderer.
    Drawn { joints: usize },
}

/// Decides when the next tick is due. Ticks that fall behind are skipped
/// rather than queued.
#[derive(Debug, Clone)]
pub struct TickSchedule {
    interval: Duration,
    last: Option<Instant>,
}

impl TickSchedule {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last: None }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True when a tick should run at `now`; marks it as run.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Time left until the next tick at `now`.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.last {
            Some(last) => self.interval.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }
}

pub struct Pipeline<O: DeviceOpener, M: PoseModel> {
    feed: CameraFeed<O>,
    extractor: PoseExtractor<M>,
    renderer: SkeletonRenderer,
    last_annotated: Option<RawFrame>,
    ticks: u64,
}

impl<O: DeviceOpener, M: PoseModel> Pipeline<O, M> {
    pub fn new(feed: CameraFeed<O>, extractor: PoseExtractor<M>, renderer: SkeletonRenderer) -> Self {
        info!(model = extractor.model_name(), "Pipeline started");
        Self {
            feed,
            extractor,
            renderer,
            last_annotated: None,
            ticks: 0,
        }
    }

    /// Wires a pipeline from the viewer settings. No device is opened yet.
    pub fn from_config(opener: O, model: M, config: &ViewerConfig) -> Self {
        Self::new(
            CameraFeed::new(opener),
            PoseExtractor::new(model, config.extractor.clone()),
            SkeletonRenderer::new(config.hierarchy.build()),
        )
    }

    /// One pass: pull a frame, extract joints and hand them to the renderer.
    /// Without a frame nothing downstream is touched. An extraction error
    /// propagates and leaves the renderer with its previous skeleton.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        self.ticks += 1;
        let Some(frame) = self.feed.acquire() else {
            debug!(tick = self.ticks, "No frame available");
            return Ok(TickOutcome::NoFrame);
        };

        let extraction = self.extractor.extract(&frame)?;
        let joints = extraction.joints.len();
        debug!(tick = self.ticks, joints, "Frame processed");

        self.renderer.draw(Some(extraction.joints));
        self.last_annotated = Some(extraction.annotated);
        Ok(TickOutcome::Drawn { joints })
    }

    /// Switches the capture device; the current skeleton stays on screen.
    pub fn select_device(&mut self, index: u32) -> crate::error::Result<()> {
        self.feed.select_device(index)
    }

    pub fn feed(&self) -> &CameraFeed<O> {
        &self.feed
    }

    pub fn renderer(&self) -> &SkeletonRenderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut SkeletonRenderer {
        &mut self.renderer
    }

    /// Most recent annotated frame, for the operator preview.
    pub fn last_annotated(&self) -> Option<&RawFrame> {
        self.last_annotated.as_ref()
    }

    /// Takes the annotated frame so a display only uploads each one once.
    pub fn take_annotated(&mut self) -> Option<RawFrame> {
        self.last_annotated.take()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl<O: DeviceOpener, M: PoseModel> Drop for Pipeline<O, M> {
    fn drop(&mut self) {
        info!(ticks = self.ticks, "Pipeline stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_is_due_immediately() {
        let mut schedule = TickSchedule::new(Duration::from_millis(33));
        let start = Instant::now();
        assert_eq!(schedule.remaining(start), Duration::ZERO);
        assert!(schedule.due(start));
    }

    #[test]
    fn test_schedule_waits_for_interval() {
        let mut schedule = TickSchedule::new(Duration::from_millis(33));
        let start = Instant::now();
        assert!(schedule.due(start));
        assert!(!schedule.due(start + Duration::from_millis(10)));
        assert_eq!(schedule.remaining(start + Duration::from_millis(10)), Duration::from_millis(23));
        assert!(schedule.due(start + Duration::from_millis(33)));
    }

    #[test]
    fn test_late_ticks_are_not_queued() {
        let mut schedule = TickSchedule::new(Duration::from_millis(33));
        let start = Instant::now();
        assert!(schedule.due(start));
        let late = start + Duration::from_millis(500);
        assert!(schedule.due(late));
        assert!(!schedule.due(late + Duration::from_millis(1)));
    }
}
