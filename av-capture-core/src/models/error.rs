use thiserror::Error;

/// Errors that can occur while opening or configuring a capture device.
///
/// Every variant is fatal to `start()` and propagated to the caller, who
/// decides whether to pick another device. Once a session is running,
/// transient conditions (a read with no data ready, a full queue) are
/// absorbed internally and never surface as errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// No device matched the requested index, path, or name.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// No default input device is configured on this system.
    #[error("no default input device configured")]
    NoDefaultDevice,

    /// The device exists but could not be opened (busy, unplugged,
    /// permission denied).
    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),

    /// The device or backend rejected the requested parameters.
    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    /// Failure reported by the underlying capture library.
    #[error("backend error: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_detail() {
        let err = CaptureError::DeviceNotFound("/dev/video7".into());
        assert_eq!(err.to_string(), "device not found: /dev/video7");
    }

    #[test]
    fn no_default_device_display() {
        assert_eq!(
            CaptureError::NoDefaultDevice.to_string(),
            "no default input device configured"
        );
    }
}
