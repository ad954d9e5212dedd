use nalgebra::Vector3;
use std::collections::VecDeque;

use pose_skeleton_viewer::config::HierarchyChoice;
use pose_skeleton_viewer::frame::RawFrame;
use pose_skeleton_viewer::hierarchy::HierarchyEntry;
use pose_skeleton_viewer::mediapipe_bridge::{Landmark, PoseLandmarks, PoseModel};
use pose_skeleton_viewer::renderer::RenderTarget;
use pose_skeleton_viewer::video::{CaptureDevice, DeviceOpener};
use pose_skeleton_viewer::{DrawList, Joint, Pipeline, TickOutcome, ViewerConfig, ViewerError};

/// Replays a fixed script of model outputs, one per frame.
struct ScriptedModel {
    script: VecDeque<Result<Option<PoseLandmarks>, String>>,
}

impl ScriptedModel {
    fn new<I: IntoIterator<Item = Result<Option<PoseLandmarks>, String>>>(script: I) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    fn idle() -> Self {
        Self {
            script: VecDeque::new(),
        }
    }
}

impl PoseModel for ScriptedModel {
    fn process(&mut self, _frame: &RawFrame) -> anyhow::Result<Option<PoseLandmarks>> {
        match self.script.pop_front() {
            Some(Ok(detection)) => Ok(detection),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => Ok(None),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

struct StillDevice {
    frames_left: usize,
}

impl CaptureDevice for StillDevice {
    fn read_frame(&mut self) -> pose_skeleton_viewer::Result<RawFrame> {
        if self.frames_left == 0 {
            return Err(ViewerError::FrameRead("end of stream".to_string()));
        }
        self.frames_left -= 1;
        Ok(RawFrame::filled(8, 6, [40, 40, 40]))
    }

    fn close(&mut self) {}
}

struct StillOpener {
    frames: usize,
}

impl DeviceOpener for StillOpener {
    type Device = StillDevice;

    fn open(&mut self, index: u32) -> pose_skeleton_viewer::Result<StillDevice> {
        if index > 0 {
            return Err(ViewerError::DeviceOpen {
                index,
                reason: "not connected".to_string(),
            });
        }
        Ok(StillDevice {
            frames_left: self.frames,
        })
    }
}

fn pose(visible: &[(Joint, [f32; 3])]) -> PoseLandmarks {
    let mut world = vec![Landmark::new(0.0, 0.0, 0.0, 0.1); Joint::COUNT];
    for (joint, [x, y, z]) in visible {
        world[joint.index()] = Landmark::new(*x, *y, *z, 0.95);
    }
    let image = vec![Landmark::new(0.5, 0.5, 0.0, 0.9); Joint::COUNT];
    PoseLandmarks { world, image }
}

fn hip_knee_ankle_config() -> ViewerConfig {
    ViewerConfig {
        hierarchy: HierarchyChoice::Custom(vec![HierarchyEntry {
            parent: Joint::LeftHip.into(),
            children: vec![Joint::LeftKnee.into(), Joint::LeftAnkle.into()],
        }]),
        ..ViewerConfig::default()
    }
}

fn pipeline(frames: usize, model: ScriptedModel) -> Pipeline<StillOpener, ScriptedModel> {
    let mut pipeline = Pipeline::from_config(StillOpener { frames }, model, &hip_knee_ankle_config());
    pipeline.select_device(0).unwrap();
    pipeline
}

#[test]
fn test_partial_skeleton_end_to_end() {
    let model = ScriptedModel::new([Ok(Some(pose(&[
        (Joint::LeftHip, [0.0, 0.0, 0.0]),
        (Joint::LeftKnee, [0.5, 0.0, 0.0]),
    ])))]);
    let mut pipeline = pipeline(1, model);

    assert_eq!(pipeline.tick().unwrap(), TickOutcome::Drawn { joints: 2 });

    let mut canvas = DrawList::new();
    let stats = pipeline.renderer_mut().paint(&mut canvas);
    assert_eq!(stats.bones, 1);
    assert_eq!(
        canvas.lines().collect::<Vec<_>>(),
        vec![(&Vector3::zeros(), &Vector3::new(1.0, 0.0, 0.0))]
    );
    let mut points: Vec<_> = canvas.points().copied().collect();
    points.sort_by(|a, b| a.x.total_cmp(&b.x));
    assert_eq!(points, vec![Vector3::zeros(), Vector3::new(1.0, 0.0, 0.0)]);
    assert!(pipeline.last_annotated().is_some());
}

#[test]
fn test_no_person_draws_nothing() {
    let model = ScriptedModel::new([Ok(None)]);
    let mut pipeline = pipeline(1, model);

    assert_eq!(pipeline.tick().unwrap(), TickOutcome::Drawn { joints: 0 });
    let mut canvas = DrawList::new();
    pipeline.renderer_mut().paint(&mut canvas);
    assert_eq!(canvas.line_count(), 0);
    assert_eq!(canvas.point_count(), 0);
}

#[test]
fn test_missing_frame_keeps_previous_skeleton() {
    let model = ScriptedModel::new([Ok(Some(pose(&[
        (Joint::LeftHip, [0.0, 0.0, 0.0]),
        (Joint::LeftKnee, [0.0, 0.4, 0.0]),
    ])))]);
    let mut pipeline = pipeline(1, model);
    pipeline.tick().unwrap();

    let mut before = DrawList::new();
    pipeline.renderer_mut().paint(&mut before);

    assert_eq!(pipeline.tick().unwrap(), TickOutcome::NoFrame);
    assert!(!pipeline.renderer().needs_redraw());
    let mut after = DrawList::new();
    pipeline.renderer_mut().paint(&mut after);
    assert_eq!(before, after);
    assert_eq!(after.line_count(), 1);
}

#[test]
fn test_model_failure_propagates_and_keeps_skeleton() {
    let model = ScriptedModel::new([
        Ok(Some(pose(&[(Joint::LeftHip, [0.0, 0.0, 0.0])]))),
        Err("inference graph crashed".to_string()),
    ]);
    let mut pipeline = pipeline(2, model);
    pipeline.tick().unwrap();

    let err = pipeline.tick().unwrap_err();
    assert!(format!("{:#}", err).contains("inference graph crashed"));
    assert_eq!(pipeline.renderer().joints().map(|j| j.len()), Some(1));
}

#[test]
fn test_failed_device_switch_stops_frames() {
    let model = ScriptedModel::idle();
    let mut pipeline = pipeline(10, model);
    assert!(pipeline.select_device(3).is_err());
    assert!(!pipeline.feed().is_open());
    assert_eq!(pipeline.tick().unwrap(), TickOutcome::NoFrame);
}

#[test]
fn test_orbit_steps_apply_on_next_paint() {
    let mut pipeline = pipeline(0, ScriptedModel::idle());
    let controller = pipeline.renderer().orbit_controller(4.0);
    controller.rotate_left();
    controller.rotate_left();
    controller.rotate_left();

    let mut canvas = DrawList::new();
    canvas.clear();
    pipeline.renderer_mut().paint(&mut canvas);
    assert_eq!(canvas.camera().map(|c| c.yaw_deg), Some(-12.0));
}

#[test]
fn test_startup_open_failure_keeps_ticking() {
    let mut pipeline = Pipeline::from_config(StillOpener { frames: 5 }, ScriptedModel::idle(), &hip_knee_ankle_config());
    assert!(pipeline.select_device(2).is_err());
    for _ in 0..3 {
        assert_eq!(pipeline.tick().unwrap(), TickOutcome::NoFrame);
    }
    assert_eq!(pipeline.ticks(), 3);
    assert!(pipeline.renderer().joints().is_none());
}
