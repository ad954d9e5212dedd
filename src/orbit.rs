// src/orbit.rs - Discrete yaw orbiting
use std::cell::Cell;
use std::rc::Rc;

pub const DEFAULT_ROTATION_STEP_DEG: f32 = 4.0;

/// Pending yaw in degrees, shared between whoever issues rotate actions and
/// the renderer that consumes it. Everything runs on one loop, so a plain
/// `Cell` is enough.
#[derive(Debug, Clone, Default)]
pub struct OrbitDelta(Rc<Cell<f32>>);

impl OrbitDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, degrees: f32) {
        self.0.set(self.0.get() + degrees);
    }

    pub fn pending(&self) -> f32 {
        self.0.get()
    }

    /// Returns the accumulated delta and resets it to zero.
    pub fn take(&self) -> f32 {
        self.0.replace(0.0)
    }
}

/// Rotate-left / rotate-right actions. Each call adds one step to the pending
/// delta; nothing is replaced, so a held button that fires repeatedly orbits
/// by the sum of its steps at the next paint.
#[derive(Debug, Clone)]
pub struct CameraOrbitController {
    delta: OrbitDelta,
    step_deg: f32,
}

impl CameraOrbitController {
    pub fn new(delta: OrbitDelta) -> Self {
        Self::with_step(delta, DEFAULT_ROTATION_STEP_DEG)
    }

    pub fn with_step(delta: OrbitDelta, step_deg: f32) -> Self {
        Self {
            delta,
            step_deg: step_deg.abs(),
        }
    }

    pub fn rotate_left(&self) {
        self.delta.add(-self.step_deg);
    }

    pub fn rotate_right(&self) {
        self.delta.add(self.step_deg);
    }

    pub fn pending(&self) -> f32 {
        self.delta.pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotations_accumulate() {
        let delta = OrbitDelta::new();
        let controller = CameraOrbitController::new(delta.clone());
        controller.rotate_right();
        controller.rotate_right();
        controller.rotate_left();
        controller.rotate_right();
        assert_eq!(delta.pending(), 8.0);
    }

    #[test]
    fn test_take_resets() {
        let delta = OrbitDelta::new();
        let controller = CameraOrbitController::new(delta.clone());
        controller.rotate_left();
        assert_eq!(delta.take(), -4.0);
        assert_eq!(delta.take(), 0.0);
        assert_eq!(controller.pending(), 0.0);
    }

    #[test]
    fn test_custom_step_sign_is_normalized() {
        let delta = OrbitDelta::new();
        let controller = CameraOrbitController::with_step(delta.clone(), -10.0);
        controller.rotate_left();
        assert_eq!(delta.pending(), -10.0);
    }
}
