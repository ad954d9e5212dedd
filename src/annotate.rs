// src/annotate.rs - 2D overlay of the model's keypoints on the camera frame
use image::Rgb;
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};

use crate::frame::RawFrame;
use crate::joint::Joint;
use crate::mediapipe_bridge::{Landmark, PoseLandmarks, POSE_CONNECTIONS};

/// Landmarks below this visibility are left off the overlay.
pub const OVERLAY_VISIBILITY: f32 = 0.5;

const CONNECTION_COLOR: Rgb<u8> = Rgb([224, 224, 224]);
const LEFT_COLOR: Rgb<u8> = Rgb([255, 138, 0]);
const RIGHT_COLOR: Rgb<u8> = Rgb([0, 217, 231]);
const CENTER_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const OUTLINE_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

fn landmark_color(joint: Joint) -> Rgb<u8> {
    match joint {
        Joint::Nose => CENTER_COLOR,
        j if j.name().starts_with("LEFT") || j == Joint::MouthLeft => LEFT_COLOR,
        _ => RIGHT_COLOR,
    }
}

fn to_pixel(lm: &Landmark, width: u32, height: u32) -> Option<(f32, f32)> {
    // Off-frame (or NaN) landmarks are not drawn.
    let on_frame = (0.0..=1.0).contains(&lm.x) && (0.0..=1.0).contains(&lm.y);
    if lm.visibility < OVERLAY_VISIBILITY || !on_frame {
        return None;
    }
    let px = (lm.x * width as f32).min(width.saturating_sub(1) as f32);
    let py = (lm.y * height as f32).min(height.saturating_sub(1) as f32);
    Some((px, py))
}

/// Returns a copy of `frame` with the model's image landmarks and connections
/// drawn on top. The 3D joint map plays no part here.
pub fn draw_landmarks(frame: &RawFrame, landmarks: &PoseLandmarks) -> RawFrame {
    if frame.is_empty() {
        return frame.clone();
    }
    let mut img = frame.to_rgb_image();
    let (w, h) = img.dimensions();
    let radius = ((w.min(h) / 160) as i32).max(2);

    for (a, b) in POSE_CONNECTIONS.iter() {
        let start = landmarks.image_landmark(*a).and_then(|lm| to_pixel(lm, w, h));
        let end = landmarks.image_landmark(*b).and_then(|lm| to_pixel(lm, w, h));
        if let (Some(start), Some(end)) = (start, end) {
            draw_line_segment_mut(&mut img, start, end, CONNECTION_COLOR);
        }
    }

    for joint in Joint::ALL {
        let Some((px, py)) = landmarks.image_landmark(joint).and_then(|lm| to_pixel(lm, w, h)) else {
            continue;
        };
        let center = (px as i32, py as i32);
        draw_filled_circle_mut(&mut img, center, radius, landmark_color(joint));
        draw_hollow_circle_mut(&mut img, center, radius + 1, OUTLINE_COLOR);
    }

    RawFrame::from_rgb_image(img)
}
