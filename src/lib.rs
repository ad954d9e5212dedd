//! Live pose-to-skeleton viewer: camera frames go through a pose model, the
//! confident joints become a 3D stick figure, and the figure is painted from
//! an orbitable camera.

pub mod annotate;
pub mod app;
pub mod config;
pub mod error;
pub mod extractor;
pub mod frame;
pub mod hierarchy;
pub mod joint;
pub mod mediapipe_bridge;
pub mod orbit;
pub mod pipeline;
pub mod renderer;
pub mod ui;
pub mod video;

pub use config::ViewerConfig;
pub use error::{Result, ViewerError};
pub use extractor::{ExtractorConfig, PoseExtractor};
pub use hierarchy::JointHierarchy;
pub use joint::{FrameJointMap, Joint};
pub use pipeline::{Pipeline, TickOutcome, TickSchedule};
pub use renderer::{DrawList, RenderTarget, SkeletonRenderer};
