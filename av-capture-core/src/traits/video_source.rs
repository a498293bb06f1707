use crate::models::config::VideoConfig;
use crate::models::error::CaptureError;
use crate::models::media::{Frame, VideoParams};

/// Factory for opening a video capture stream.
///
/// Implemented by platform backends (V4L2 on Linux) and by
/// [`MockVideoSource`](crate::mock::MockVideoSource) for hardware-free
/// tests. Sessions are generic over this trait.
///
/// `open` is called on the capture thread, so the live device handle never
/// leaves that thread: it is created after the thread starts and dropped
/// after the loop exits.
pub trait VideoSource: Send + Sync + 'static {
    /// The live, reading end of an opened device.
    type Stream: VideoStream;

    /// Open the device and negotiate `config`.
    ///
    /// Any failure here is fatal to `start()`; the device may grant
    /// different parameters than requested, reported by
    /// [`VideoStream::params`].
    fn open(&self, config: &VideoConfig) -> Result<Self::Stream, CaptureError>;
}

/// An open video device delivering frames.
pub trait VideoStream {
    /// Parameters the device actually granted.
    fn params(&self) -> VideoParams;

    /// Read the next frame.
    ///
    /// `Ok(None)` means no frame is ready yet; the capture loop pauses
    /// briefly and retries. `Err` is a backend anomaly worth one warning,
    /// not a loop exit.
    fn read_frame(&mut self) -> Result<Option<Frame>, CaptureError>;
}
