/// A video capture device discovered by enumeration.
///
/// Descriptors identify devices; they hold no open handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDeviceInfo {
    /// Device index (N in `/dev/videoN`).
    pub index: u32,
    /// Filesystem path of the device node.
    pub path: String,
    /// Native width observed during the probe.
    pub width: u32,
    /// Native height observed during the probe.
    pub height: u32,
}

/// An audio input device discovered by enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioDeviceInfo {
    /// Position in the host's input device listing.
    pub index: usize,
    /// Human-readable device name.
    pub name: String,
    /// Input channel count.
    pub channels: u16,
    /// Default sample rate in Hz.
    pub sample_rate: u32,
    /// Whether this is the system default input.
    pub is_default: bool,
}
