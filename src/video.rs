// src/video.rs - Capture device lifecycle and frame acquisition
use image::imageops;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{ApiBackend, CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution};
use nokhwa::Camera;
use tracing::{error, info, warn};

use crate::error::{Result, ViewerError};
use crate::frame::RawFrame;

/// An open capture device.
pub trait CaptureDevice {
    fn read_frame(&mut self) -> Result<RawFrame>;

    /// Releases the device. Must tolerate being called more than once.
    fn close(&mut self);
}

/// Opens capture devices by index.
pub trait DeviceOpener {
    type Device: CaptureDevice;

    fn open(&mut self, index: u32) -> Result<Self::Device>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub index: u32,
    pub name: String,
}

/// Lists the cameras the native backend can see. An enumeration failure is
/// logged and reported as no cameras.
pub fn available_devices() -> Vec<DeviceInfo> {
    match nokhwa::query(ApiBackend::Auto) {
        Ok(cameras) => cameras
            .iter()
            .enumerate()
            .map(|(i, camera)| DeviceInfo {
                index: i as u32,
                name: camera.human_name(),
            })
            .collect(),
        Err(e) => {
            warn!("Failed to query cameras: {}", e);
            Vec::new()
        }
    }
}

/// Supplies raw frames from at most one open device. Selecting a device
/// always releases the previous one first; if the new one fails to open the
/// feed stays closed and yields nothing until another device is selected.
pub struct CameraFeed<O: DeviceOpener> {
    opener: O,
    device: Option<(u32, O::Device)>,
}

impl<O: DeviceOpener> CameraFeed<O> {
    pub fn new(opener: O) -> Self {
        Self { opener, device: None }
    }

    pub fn select_device(&mut self, index: u32) -> Result<()> {
        self.close();
        match self.opener.open(index) {
            Ok(device) => {
                info!(index, "Camera open and ready");
                self.device = Some((index, device));
                Ok(())
            }
            Err(e) => {
                error!(index, "Unable to open camera: {}", e);
                Err(e)
            }
        }
    }

    pub fn close(&mut self) {
        if let Some((index, mut device)) = self.device.take() {
            device.close();
            info!(index, "Camera closed");
        }
    }

    pub fn is_open(&self) -> bool {
        self.device.is_some()
    }

    pub fn current_index(&self) -> Option<u32> {
        self.device.as_ref().map(|(index, _)| *index)
    }

    /// Next frame from the open device, if any. A read failure skips this
    /// frame but keeps the device.
    pub fn acquire(&mut self) -> Option<RawFrame> {
        let (index, device) = self.device.as_mut()?;
        match device.read_frame() {
            Ok(frame) => Some(frame),
            Err(e) => {
                warn!(index = *index, "Dropped frame: {}", e);
                None
            }
        }
    }
}

impl<O: DeviceOpener> Drop for CameraFeed<O> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Opens native cameras through nokhwa at 640x480, 30 fps.
#[derive(Debug, Clone)]
pub struct NokhwaOpener {
    mirror: bool,
}

impl NokhwaOpener {
    pub fn new(mirror: bool) -> Self {
        Self { mirror }
    }
}

impl DeviceOpener for NokhwaOpener {
    type Device = NokhwaDevice;

    fn open(&mut self, index: u32) -> Result<NokhwaDevice> {
        let format = CameraFormat::new(Resolution::new(640, 480), FrameFormat::MJPEG, 30);
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Exact(format));

        let open_err = |e: nokhwa::NokhwaError| ViewerError::DeviceOpen {
            index,
            reason: e.to_string(),
        };
        let mut camera = Camera::new(CameraIndex::Index(index), requested).map_err(open_err)?;
        camera.open_stream().map_err(open_err)?;

        Ok(NokhwaDevice {
            camera,
            mirror: self.mirror,
            streaming: true,
        })
    }
}

pub struct NokhwaDevice {
    camera: Camera,
    mirror: bool,
    streaming: bool,
}

impl CaptureDevice for NokhwaDevice {
    fn read_frame(&mut self) -> Result<RawFrame> {
        if !self.streaming {
            return Err(ViewerError::FrameRead("stream is closed".to_string()));
        }
        let buffer = self
            .camera
            .frame()
            .map_err(|e| ViewerError::FrameRead(e.to_string()))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| ViewerError::FrameRead(e.to_string()))?;

        let img = if self.mirror {
            imageops::flip_horizontal(&decoded)
        } else {
            decoded
        };
        Ok(RawFrame::from_rgb_image(img))
    }

    fn close(&mut self) {
        if self.streaming {
            if let Err(e) = self.camera.stop_stream() {
                warn!("Failed to stop camera stream: {}", e);
            }
            self.streaming = false;
        }
    }
}

impl Drop for NokhwaDevice {
    fn drop(&mut self) {
        self.close();
    }
}
