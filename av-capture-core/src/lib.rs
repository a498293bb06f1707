//! # av-capture-core
//!
//! Platform-agnostic threaded A/V capture.
//!
//! A background thread per device pulls samples and publishes them for any
//! number of consumer threads, under two handoff policies: a camera
//! overwrites a single latest-frame slot, a microphone feeds a bounded
//! drop-oldest block queue while maintaining a running RMS loudness level.
//! Platform backends (Linux V4L2/cpal in `av-capture-linux`) implement the
//! `VideoSource`/`AudioSource` traits and plug into the generic sessions.
//!
//! ## Architecture
//!
//! ```text
//! av-capture-core (this crate)
//! ├── traits/       ← VideoSource/VideoStream, AudioSource/AudioStream
//! ├── models/       ← CaptureError, configs, descriptors, Frame, AudioBlock
//! ├── processing/   ← LatestCell, DropQueue, RMS level
//! ├── session/      ← Camera, Microphone (generic orchestrators)
//! └── mock          ← hardware-free backends for tests and CI
//! ```
//!
//! ## Usage
//!
//! ```
//! use std::time::Duration;
//! use av_capture_core::{AudioConfig, Microphone};
//! use av_capture_core::mock::MockAudioSource;
//!
//! let mut mic = Microphone::new(MockAudioSource::tone(0.2), AudioConfig::default());
//! mic.start().unwrap();
//! if let Some(block) = mic.read(Duration::from_millis(200)) {
//!     println!("level {:.2}, {} frames", mic.level(), block.frames());
//! }
//! mic.stop();
//! ```

pub mod mock;
pub mod models;
pub mod processing;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::config::{AudioConfig, VideoConfig};
pub use models::device::{AudioDeviceInfo, VideoDeviceInfo};
pub use models::error::CaptureError;
pub use models::media::{AudioBlock, AudioParams, Frame, PixelFormat, VideoParams};
pub use processing::drop_queue::DropQueue;
pub use processing::latest_cell::LatestCell;
pub use processing::level::rms_level;
pub use session::camera::Camera;
pub use session::microphone::Microphone;
pub use traits::audio_source::{AudioSource, AudioStream};
pub use traits::video_source::{VideoSource, VideoStream};
