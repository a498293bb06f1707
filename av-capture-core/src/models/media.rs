use std::time::Duration;

/// Pixel layout of a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 24-bit RGB, 3 bytes per pixel.
    Rgb24,
    /// Packed YUV 4:2:2, 2 bytes per pixel.
    Yuyv,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Rgb24 => 3,
            Self::Yuyv => 2,
        }
    }
}

/// A single decoded video frame.
///
/// `data` holds `width * height * bytes_per_pixel` bytes in row order.
/// Frames are plain values: reading one out of a camera yields an
/// independent copy the caller may mutate freely without affecting the
/// producer's next write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixel: PixelFormat,
    pub data: Vec<u8>,
}

impl Frame {
    /// Byte length implied by the frame's dimensions and pixel format.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.pixel.bytes_per_pixel()
    }
}

/// A fixed-size block of interleaved audio samples, normalized to
/// `[-1.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBlock {
    /// Interleaved samples (`frames * channels` entries).
    pub samples: Vec<f32>,
    /// Number of interleaved channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate of this block in Hz.
    pub sample_rate: u32,
}

impl AudioBlock {
    /// Number of frames (samples per channel) in the block.
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels as usize
    }

    /// Wall-clock duration the block covers.
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames() as f64 / f64::from(self.sample_rate))
    }
}

/// Video parameters actually granted by the device, which may differ from
/// the requested [`VideoConfig`](crate::VideoConfig).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoParams {
    pub width: u32,
    pub height: u32,
    pub fps: f32,
}

/// Audio parameters actually granted by the device.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioParams {
    pub device_name: String,
    pub sample_rate: u32,
    pub channels: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_expected_len() {
        let frame = Frame {
            width: 4,
            height: 2,
            pixel: PixelFormat::Rgb24,
            data: vec![0; 24],
        };
        assert_eq!(frame.expected_len(), 24);
        assert_eq!(frame.data.len(), frame.expected_len());
    }

    #[test]
    fn yuyv_is_two_bytes_per_pixel() {
        assert_eq!(PixelFormat::Yuyv.bytes_per_pixel(), 2);
    }

    #[test]
    fn block_frames_and_duration() {
        let block = AudioBlock {
            samples: vec![0.0; 3200],
            channels: 2,
            sample_rate: 16_000,
        };
        assert_eq!(block.frames(), 1600);
        assert_eq!(block.duration(), Duration::from_millis(100));
    }

    #[test]
    fn degenerate_block_is_harmless() {
        let block = AudioBlock {
            samples: Vec::new(),
            channels: 0,
            sample_rate: 0,
        };
        assert_eq!(block.frames(), 0);
        assert_eq!(block.duration(), Duration::ZERO);
    }
}
