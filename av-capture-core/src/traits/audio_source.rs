use std::time::Duration;

use crate::models::config::AudioConfig;
use crate::models::error::CaptureError;
use crate::models::media::{AudioBlock, AudioParams};

/// Factory for opening an audio capture stream.
///
/// Implemented by platform backends (cpal) and by
/// [`MockAudioSource`](crate::mock::MockAudioSource) for hardware-free
/// tests. As with video, `open` runs on the capture thread and the live
/// handle stays there.
///
/// Backends that deliver audio through a driver-invoked callback (the
/// common model) bridge it to this pull interface internally; the block
/// and level bookkeeping always runs on the capture thread either way.
pub trait AudioSource: Send + Sync + 'static {
    /// The live, reading end of an opened device.
    type Stream: AudioStream;

    /// Open the device and negotiate `config`.
    fn open(&self, config: &AudioConfig) -> Result<Self::Stream, CaptureError>;
}

/// An open audio device delivering fixed-size sample blocks.
pub trait AudioStream {
    /// Parameters the device actually granted.
    fn params(&self) -> AudioParams;

    /// Read the next block, waiting up to `timeout` for one to be ready.
    ///
    /// `Ok(None)` on timeout; blocks that arrive mid-wait are delivered
    /// immediately.
    fn read_block(&mut self, timeout: Duration) -> Result<Option<AudioBlock>, CaptureError>;
}
