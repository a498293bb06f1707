/// Requested video capture parameters.
///
/// The device may grant different values; the granted ones are reported by
/// `Camera::params` after a successful start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoConfig {
    /// Frame width in pixels (default: 640).
    pub width: u32,

    /// Frame height in pixels (default: 480).
    pub height: u32,

    /// Requested frame rate (default: 30).
    pub fps: u32,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fps: 30,
        }
    }
}

impl VideoConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err("frame dimensions must be non-zero".into());
        }
        if self.fps == 0 {
            return Err("frame rate must be positive".into());
        }
        Ok(())
    }
}

/// Requested audio capture parameters.
///
/// As with video, the device may negotiate different values; the granted
/// ones are reported by `Microphone::params` after a successful start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioConfig {
    /// Sample rate in Hz (default: 16000).
    pub sample_rate: u32,

    /// Channel count (default: 1).
    pub channels: u16,

    /// Frames per delivered block (default: 1024).
    pub block_size: u32,

    /// Capacity of the block queue (default: 100). When full, the oldest
    /// block is dropped to admit the newest.
    pub queue_capacity: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            channels: 1,
            block_size: 1024,
            queue_capacity: 100,
        }
    }
}

impl AudioConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 {
            return Err("sample rate must be positive".into());
        }
        if self.channels == 0 {
            return Err("channel count must be non-zero".into());
        }
        if self.block_size == 0 {
            return Err("block size must be non-zero".into());
        }
        if self.queue_capacity == 0 {
            return Err("queue capacity must be non-zero".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_defaults() {
        let config = VideoConfig::default();
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 480);
        assert_eq!(config.fps, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn audio_defaults() {
        let config = AudioConfig::default();
        assert_eq!(config.sample_rate, 16_000);
        assert_eq!(config.channels, 1);
        assert_eq!(config.block_size, 1024);
        assert_eq!(config.queue_capacity, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_dimensions_rejected() {
        let config = VideoConfig {
            width: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_queue_capacity_rejected() {
        let config = AudioConfig {
            queue_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
