//! # av-capture-linux
//!
//! Linux backends for `av-capture-core`.
//!
//! Provides:
//! - [`V4l2VideoSource`] — camera capture from `/dev/video*` via V4L2
//! - [`CpalAudioSource`] — microphone capture via cpal (ALSA on Linux)
//! - [`list_video_devices`] / [`list_audio_devices`] — device discovery
//!
//! ## Usage
//! ```ignore
//! use std::time::Duration;
//! use av_capture_core::{AudioConfig, Camera, Microphone, VideoConfig};
//! use av_capture_linux::{CpalAudioSource, V4l2VideoSource};
//!
//! let mut camera = Camera::new(V4l2VideoSource::index(0), VideoConfig::default());
//! camera.start()?;
//! let frame = camera.frame();
//!
//! let mut mic = Microphone::new(CpalAudioSource::default_device(), AudioConfig::default());
//! mic.start()?;
//! let block = mic.read(Duration::from_millis(100));
//! println!("level: {:.2}", mic.level());
//! ```

mod convert;
pub mod cpal_microphone;
pub mod enumerate;
#[cfg(target_os = "linux")]
pub mod v4l2_camera;

pub use cpal_microphone::CpalAudioSource;
pub use enumerate::list_audio_devices;
#[cfg(target_os = "linux")]
pub use enumerate::list_video_devices;
#[cfg(target_os = "linux")]
pub use v4l2_camera::V4l2VideoSource;
