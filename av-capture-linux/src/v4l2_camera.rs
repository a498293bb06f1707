//! Camera capture from `/dev/video*` via V4L2.
//!
//! Opens a device node, negotiates RGB24 (falling back to YUYV, which is
//! what most UVC webcams actually grant) and the requested frame rate,
//! then reads frames through a memory-mapped buffer stream.

use std::path::PathBuf;

use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::capture::Parameters;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

use av_capture_core::{
    CaptureError, Frame, PixelFormat, VideoConfig, VideoParams, VideoSource, VideoStream,
};

/// Memory-mapped buffers queued on the device.
const STREAM_BUFFERS: u32 = 4;

/// A V4L2 video device selector.
///
/// Holds no open handle; the device is opened by the capture thread at
/// `start()`.
#[derive(Debug, Clone)]
pub struct V4l2VideoSource {
    path: PathBuf,
}

impl V4l2VideoSource {
    /// Select `/dev/video{index}`.
    pub fn index(index: usize) -> Self {
        Self {
            path: PathBuf::from(format!("/dev/video{index}")),
        }
    }

    /// Select an explicit device node path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The device node this source will open.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl VideoSource for V4l2VideoSource {
    type Stream = V4l2FrameStream;

    fn open(&self, config: &VideoConfig) -> Result<V4l2FrameStream, CaptureError> {
        let device = Device::with_path(&self.path).map_err(|e| {
            CaptureError::DeviceUnavailable(format!("{}: {e}", self.path.display()))
        })?;

        let request = Format::new(config.width, config.height, FourCC::new(b"RGB3"));
        let granted = match device.set_format(&request) {
            Ok(format) if format.fourcc == FourCC::new(b"RGB3") => format,
            _ => {
                let request = Format::new(config.width, config.height, FourCC::new(b"YUYV"));
                device
                    .set_format(&request)
                    .map_err(|e| CaptureError::ConfigurationFailed(format!("set format: {e}")))?
            }
        };

        let pixel = if granted.fourcc == FourCC::new(b"RGB3") {
            PixelFormat::Rgb24
        } else if granted.fourcc == FourCC::new(b"YUYV") {
            PixelFormat::Yuyv
        } else {
            return Err(CaptureError::ConfigurationFailed(format!(
                "device granted unsupported format {}",
                granted.fourcc
            )));
        };

        // The driver may quantize the rate; read back what it granted.
        let fps = match device.set_params(&Parameters::with_fps(config.fps)) {
            Ok(params) if params.interval.numerator != 0 => {
                params.interval.denominator as f32 / params.interval.numerator as f32
            }
            _ => config.fps as f32,
        };

        let stream = MmapStream::with_buffers(&device, Type::VideoCapture, STREAM_BUFFERS)
            .map_err(|e| CaptureError::Backend(format!("mmap stream: {e}")))?;

        Ok(V4l2FrameStream {
            _device: device,
            stream,
            pixel,
            params: VideoParams {
                width: granted.width,
                height: granted.height,
                fps,
            },
        })
    }
}

/// An open V4L2 capture stream.
pub struct V4l2FrameStream {
    // Keeps the descriptor alive alongside the mapped buffers.
    _device: Device,
    stream: MmapStream<'static>,
    pixel: PixelFormat,
    params: VideoParams,
}

impl VideoStream for V4l2FrameStream {
    fn params(&self) -> VideoParams {
        self.params
    }

    fn read_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
        let (buf, meta) = match self.stream.next() {
            Ok(pair) => pair,
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::WouldBlock
                        | std::io::ErrorKind::TimedOut
                        | std::io::ErrorKind::Interrupted
                ) =>
            {
                return Ok(None)
            }
            Err(e) => return Err(CaptureError::Backend(format!("frame dequeue: {e}"))),
        };

        let used = meta.bytesused as usize;
        let data = if used > 0 && used <= buf.len() {
            buf[..used].to_vec()
        } else {
            buf.to_vec()
        };

        Ok(Some(Frame {
            width: self.params.width,
            height: self.params.height,
            pixel: self.pixel,
            data,
        }))
    }
}
