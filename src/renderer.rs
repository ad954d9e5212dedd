// src/renderer.rs - Skeleton paint pass over a pluggable render target
use nalgebra::Vector3;
use nalgebra_glm as glm;

use crate::hierarchy::JointHierarchy;
use crate::joint::FrameJointMap;
use crate::orbit::{CameraOrbitController, OrbitDelta};

/// RGB in 0..1.
pub type Color = [f32; 3];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Color,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointStyle {
    pub color: Color,
    pub size: f32,
}

pub const BONE_STYLE: LineStyle = LineStyle {
    color: [1.0, 0.0, 0.0],
    width: 2.5,
};

pub const JOINT_STYLE: PointStyle = PointStyle {
    color: [0.0, 1.0, 0.0],
    size: 5.5,
};

/// Perspective camera looking down -Z from a fixed distance, orbited about
/// the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewCamera {
    pub aspect: f32,
    pub yaw_deg: f32,
}

impl ViewCamera {
    pub const FOV_Y_DEG: f32 = 45.0;
    pub const NEAR: f32 = 0.1;
    pub const FAR: f32 = 100.0;
    pub const DISTANCE: f32 = 4.0;

    pub fn view_projection(&self) -> glm::Mat4 {
        let projection = glm::perspective(self.aspect, Self::FOV_Y_DEG.to_radians(), Self::NEAR, Self::FAR);
        let view = glm::translate(&glm::Mat4::identity(), &glm::vec3(0.0, 0.0, -Self::DISTANCE));
        let view = glm::rotate_y(&view, self.yaw_deg.to_radians());
        projection * view
    }

    /// Normalized device coordinates of `p`, or `None` when it is behind the
    /// eye.
    pub fn project(&self, p: &Vector3<f32>) -> Option<glm::Vec3> {
        project_with(&self.view_projection(), p)
    }
}

pub fn project_with(view_projection: &glm::Mat4, p: &Vector3<f32>) -> Option<glm::Vec3> {
    let clip = view_projection * glm::vec4(p.x, p.y, p.z, 1.0);
    if clip.w <= f32::EPSILON {
        return None;
    }
    Some(glm::vec3(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w))
}

/// Rendering capability the skeleton paints through.
pub trait RenderTarget {
    /// Discards everything drawn so far.
    fn clear(&mut self);
    fn set_projection(&mut self, camera: &ViewCamera);
    fn line(&mut self, from: &Vector3<f32>, to: &Vector3<f32>, style: &LineStyle);
    fn point(&mut self, at: &Vector3<f32>, style: &PointStyle);
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line {
        from: Vector3<f32>,
        to: Vector3<f32>,
        style: LineStyle,
    },
    Point {
        at: Vector3<f32>,
        style: PointStyle,
    },
}

/// Records what was drawn since the last clear. Used where there is no
/// display surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    camera: Option<ViewCamera>,
    primitives: Vec<Primitive>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn camera(&self) -> Option<&ViewCamera> {
        self.camera.as_ref()
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn lines(&self) -> impl Iterator<Item = (&Vector3<f32>, &Vector3<f32>)> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Line { from, to, .. } => Some((from, to)),
            Primitive::Point { .. } => None,
        })
    }

    pub fn points(&self) -> impl Iterator<Item = &Vector3<f32>> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Point { at, .. } => Some(at),
            Primitive::Line { .. } => None,
        })
    }

    pub fn line_count(&self) -> usize {
        self.lines().count()
    }

    pub fn point_count(&self) -> usize {
        self.points().count()
    }
}

impl RenderTarget for DrawList {
    fn clear(&mut self) {
        self.camera = None;
        self.primitives.clear();
    }

    fn set_projection(&mut self, camera: &ViewCamera) {
        self.camera = Some(*camera);
    }

    fn line(&mut self, from: &Vector3<f32>, to: &Vector3<f32>, style: &LineStyle) {
        self.primitives.push(Primitive::Line {
            from: *from,
            to: *to,
            style: *style,
        });
    }

    fn point(&mut self, at: &Vector3<f32>, style: &PointStyle) {
        self.primitives.push(Primitive::Point { at: *at, style: *style });
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaintStats {
    pub bones: usize,
    pub joints: usize,
}

/// Holds the latest joint map and the orbit state, and turns them into bone
/// segments and joint markers on each paint pass.
pub struct SkeletonRenderer {
    hierarchy: JointHierarchy,
    joints: Option<FrameJointMap>,
    yaw_deg: f32,
    orbit: OrbitDelta,
    aspect: f32,
    redraw_requested: bool,
}

impl SkeletonRenderer {
    pub fn new(hierarchy: JointHierarchy) -> Self {
        Self {
            hierarchy,
            joints: None,
            yaw_deg: 0.0,
            orbit: OrbitDelta::new(),
            aspect: 1.0,
            redraw_requested: true,
        }
    }

    pub fn hierarchy(&self) -> &JointHierarchy {
        &self.hierarchy
    }

    pub fn joints(&self) -> Option<&FrameJointMap> {
        self.joints.as_ref()
    }

    pub fn yaw_deg(&self) -> f32 {
        self.yaw_deg
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect
    }

    pub fn orbit_delta(&self) -> OrbitDelta {
        self.orbit.clone()
    }

    /// A controller whose rotate actions land in this renderer's pending delta.
    pub fn orbit_controller(&self, step_deg: f32) -> CameraOrbitController {
        CameraOrbitController::with_step(self.orbit.clone(), step_deg)
    }

    /// True when a paint pass would change what is on screen.
    pub fn needs_redraw(&self) -> bool {
        self.redraw_requested || self.orbit.pending() != 0.0
    }

    /// Replaces the stored map. `None` leaves the current skeleton as is.
    pub fn draw(&mut self, joints: Option<FrameJointMap>) {
        if let Some(joints) = joints {
            self.joints = Some(joints);
            self.redraw_requested = true;
        }
    }

    /// Drops the stored map; the next paint shows no skeleton.
    pub fn clear(&mut self) {
        self.joints = None;
        self.redraw_requested = true;
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.aspect = if height <= 0.0 { 1.0 } else { width / height };
        self.redraw_requested = true;
    }

    pub fn camera(&self) -> ViewCamera {
        ViewCamera {
            aspect: self.aspect,
            yaw_deg: self.yaw_deg,
        }
    }

    pub fn paint<T: RenderTarget + ?Sized>(&mut self, target: &mut T) -> PaintStats {
        // Consume the pending orbit exactly once per pass.
        self.yaw_deg += self.orbit.take();
        self.redraw_requested = false;

        target.clear();
        target.set_projection(&self.camera());

        let mut stats = PaintStats::default();
        let Some(joints) = self.joints.as_ref() else {
            return stats;
        };

        for (parent, children) in self.hierarchy.iter() {
            let Some(from) = parent.lookup(joints) else {
                continue;
            };
            for child in children {
                if let Some(to) = child.lookup(joints) {
                    target.line(from, to, &BONE_STYLE);
                    stats.bones += 1;
                }
            }
        }

        for (_, at) in joints.iter() {
            target.point(at, &JOINT_STYLE);
            stats.joints += 1;
        }

        stats
    }
}
