//! Mock capture backends for testing without hardware.
//!
//! These implement the backend traits over synthetic data, which makes the
//! full session lifecycle exercisable in CI environments that have no
//! camera or microphone attached.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::models::config::{AudioConfig, VideoConfig};
use crate::models::error::CaptureError;
use crate::models::media::{AudioBlock, AudioParams, Frame, PixelFormat, VideoParams};
use crate::traits::audio_source::{AudioSource, AudioStream};
use crate::traits::video_source::{VideoSource, VideoStream};

/// A video backend that synthesizes frames at the configured rate.
///
/// Frames carry a monotonically increasing sequence stamp readable with
/// [`frame_sequence`], so tests can tell captures apart.
#[derive(Debug, Default)]
pub struct MockVideoSource {
    fail_open: bool,
    frame_limit: Option<u64>,
    opens: Arc<AtomicUsize>,
    stream_alive: Arc<AtomicBool>,
}

impl MockVideoSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source whose `open` always fails, for no-device scenarios.
    pub fn failing() -> Self {
        Self {
            fail_open: true,
            ..Self::default()
        }
    }

    /// Stop producing after `limit` frames; further reads report not-ready.
    pub fn with_frame_limit(mut self, limit: u64) -> Self {
        self.frame_limit = Some(limit);
        self
    }

    /// How many times `open` has succeeded.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Whether a stream opened from this source is still alive.
    pub fn stream_alive(&self) -> bool {
        self.stream_alive.load(Ordering::SeqCst)
    }
}

impl VideoSource for MockVideoSource {
    type Stream = MockVideoStream;

    fn open(&self, config: &VideoConfig) -> Result<MockVideoStream, CaptureError> {
        if self.fail_open {
            return Err(CaptureError::DeviceUnavailable(
                "mock device configured to fail".into(),
            ));
        }
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.stream_alive.store(true, Ordering::SeqCst);
        Ok(MockVideoStream {
            params: VideoParams {
                width: config.width,
                height: config.height,
                fps: config.fps as f32,
            },
            interval: Duration::from_secs_f64(1.0 / f64::from(config.fps.max(1))),
            sequence: 0,
            limit: self.frame_limit,
            alive: Arc::clone(&self.stream_alive),
        })
    }
}

/// The live end of a [`MockVideoSource`].
#[derive(Debug)]
pub struct MockVideoStream {
    params: VideoParams,
    interval: Duration,
    sequence: u64,
    limit: Option<u64>,
    alive: Arc<AtomicBool>,
}

impl VideoStream for MockVideoStream {
    fn params(&self) -> VideoParams {
        self.params
    }

    fn read_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
        if let Some(limit) = self.limit {
            if self.sequence >= limit {
                return Ok(None);
            }
        }
        thread::sleep(self.interval);

        let pixel = PixelFormat::Rgb24;
        let len = self.params.width as usize * self.params.height as usize * pixel.bytes_per_pixel();
        let mut data = vec![(self.sequence & 0xff) as u8; len];
        data[..8].copy_from_slice(&self.sequence.to_be_bytes());
        self.sequence += 1;

        Ok(Some(Frame {
            width: self.params.width,
            height: self.params.height,
            pixel,
            data,
        }))
    }
}

impl Drop for MockVideoStream {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

/// Sequence stamp embedded in a mock frame's first bytes.
pub fn frame_sequence(frame: &Frame) -> u64 {
    let mut stamp = [0u8; 8];
    stamp.copy_from_slice(&frame.data[..8]);
    u64::from_be_bytes(stamp)
}

/// An audio backend that replays preloaded blocks or synthesizes a steady
/// tone.
///
/// Preloaded blocks are delivered back-to-back with no pacing, which lets
/// tests flood a session faster than any consumer drains it.
#[derive(Debug, Default)]
pub struct MockAudioSource {
    fail_open: bool,
    preloaded: Vec<AudioBlock>,
    tone_amplitude: Option<f32>,
    opens: Arc<AtomicUsize>,
    stream_alive: Arc<AtomicBool>,
}

impl MockAudioSource {
    /// Replay `blocks` in order, then report timeouts forever.
    pub fn with_blocks(blocks: Vec<AudioBlock>) -> Self {
        Self {
            preloaded: blocks,
            ..Self::default()
        }
    }

    /// Generate constant-amplitude blocks endlessly, paced at the block
    /// duration.
    pub fn tone(amplitude: f32) -> Self {
        Self {
            tone_amplitude: Some(amplitude),
            ..Self::default()
        }
    }

    /// A source whose `open` always fails, for no-device scenarios.
    pub fn failing() -> Self {
        Self {
            fail_open: true,
            ..Self::default()
        }
    }

    /// How many times `open` has succeeded.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Whether a stream opened from this source is still alive.
    pub fn stream_alive(&self) -> bool {
        self.stream_alive.load(Ordering::SeqCst)
    }

    /// A block whose every sample is `value`; its RMS level equals
    /// `value.abs()` (clipped at 1.0), which makes level assertions exact.
    pub fn constant_block(value: f32, config: &AudioConfig) -> AudioBlock {
        AudioBlock {
            samples: vec![value; config.block_size as usize * config.channels as usize],
            channels: config.channels,
            sample_rate: config.sample_rate,
        }
    }
}

impl AudioSource for MockAudioSource {
    type Stream = MockAudioStream;

    fn open(&self, config: &AudioConfig) -> Result<MockAudioStream, CaptureError> {
        if self.fail_open {
            return Err(CaptureError::DeviceUnavailable(
                "mock device configured to fail".into(),
            ));
        }
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.stream_alive.store(true, Ordering::SeqCst);
        Ok(MockAudioStream {
            params: AudioParams {
                device_name: "mock input".into(),
                sample_rate: config.sample_rate,
                channels: config.channels,
            },
            pending: self.preloaded.clone().into(),
            tone_amplitude: self.tone_amplitude,
            block_interval: Duration::from_secs_f64(
                f64::from(config.block_size) / f64::from(config.sample_rate.max(1)),
            ),
            block_samples: config.block_size as usize * config.channels as usize,
            alive: Arc::clone(&self.stream_alive),
        })
    }
}

/// The live end of a [`MockAudioSource`].
#[derive(Debug)]
pub struct MockAudioStream {
    params: AudioParams,
    pending: VecDeque<AudioBlock>,
    tone_amplitude: Option<f32>,
    block_interval: Duration,
    block_samples: usize,
    alive: Arc<AtomicBool>,
}

impl AudioStream for MockAudioStream {
    fn params(&self) -> AudioParams {
        self.params.clone()
    }

    fn read_block(&mut self, timeout: Duration) -> Result<Option<AudioBlock>, CaptureError> {
        if let Some(block) = self.pending.pop_front() {
            return Ok(Some(block));
        }
        if let Some(amplitude) = self.tone_amplitude {
            thread::sleep(self.block_interval);
            return Ok(Some(AudioBlock {
                samples: vec![amplitude; self.block_samples],
                channels: self.params.channels,
                sample_rate: self.params.sample_rate,
            }));
        }
        thread::sleep(timeout);
        Ok(None)
    }
}

impl Drop for MockAudioStream {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::processing::level::rms_level;

    #[test]
    fn video_frames_are_stamped_in_sequence() {
        let source = MockVideoSource::new();
        let mut stream = source
            .open(&VideoConfig {
                width: 8,
                height: 8,
                fps: 1000,
            })
            .unwrap();

        let first = stream.read_frame().unwrap().unwrap();
        let second = stream.read_frame().unwrap().unwrap();
        assert_eq!(frame_sequence(&first), 0);
        assert_eq!(frame_sequence(&second), 1);
        assert_eq!(first.data.len(), first.expected_len());
    }

    #[test]
    fn frame_limit_reports_not_ready() {
        let source = MockVideoSource::new().with_frame_limit(1);
        let mut stream = source
            .open(&VideoConfig {
                width: 4,
                height: 4,
                fps: 1000,
            })
            .unwrap();

        assert!(stream.read_frame().unwrap().is_some());
        assert!(stream.read_frame().unwrap().is_none());
        assert!(stream.read_frame().unwrap().is_none());
    }

    #[test]
    fn constant_block_level_matches_amplitude() {
        let block = MockAudioSource::constant_block(0.25, &AudioConfig::default());
        assert_relative_eq!(rms_level(&block.samples), 0.25, epsilon = 1e-5);
    }

    #[test]
    fn preloaded_blocks_replay_then_dry_up() {
        let config = AudioConfig::default();
        let blocks = vec![
            MockAudioSource::constant_block(0.1, &config),
            MockAudioSource::constant_block(0.2, &config),
        ];
        let source = MockAudioSource::with_blocks(blocks);
        let mut stream = source.open(&config).unwrap();

        let timeout = Duration::from_millis(1);
        assert_eq!(stream.read_block(timeout).unwrap().unwrap().samples[0], 0.1);
        assert_eq!(stream.read_block(timeout).unwrap().unwrap().samples[0], 0.2);
        assert!(stream.read_block(timeout).unwrap().is_none());
    }

    #[test]
    fn dropping_stream_clears_alive_flag() {
        let source = MockVideoSource::new();
        let stream = source.open(&VideoConfig::default()).unwrap();
        assert!(source.stream_alive());
        drop(stream);
        assert!(!source.stream_alive());
    }
}
