//! Device discovery.
//!
//! Video enumeration probes each `/dev/video*` node by opening it and
//! reading one frame, which weeds out metadata nodes and broken devices.
//! Audio enumeration is a metadata query only; no stream is opened.

use av_capture_core::AudioDeviceInfo;
#[cfg(target_os = "linux")]
use av_capture_core::VideoDeviceInfo;

/// Probe `/dev/video*` nodes and return those that deliver a frame,
/// ordered by index, with the resolution each granted.
#[cfg(target_os = "linux")]
pub fn list_video_devices() -> Vec<VideoDeviceInfo> {
    use av_capture_core::{VideoConfig, VideoSource, VideoStream};

    use crate::v4l2_camera::V4l2VideoSource;

    let mut nodes: Vec<(u32, String)> = std::fs::read_dir("/dev")
        .into_iter()
        .flatten()
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            let index: u32 = name.strip_prefix("video")?.parse().ok()?;
            Some((index, format!("/dev/{name}")))
        })
        .collect();
    nodes.sort_unstable();

    let mut devices = Vec::new();
    for (index, path) in nodes {
        let source = V4l2VideoSource::with_path(&path);
        let Ok(mut stream) = source.open(&VideoConfig::default()) else {
            continue;
        };
        // One real frame separates cameras from nodes that only open.
        if !matches!(stream.read_frame(), Ok(Some(_))) {
            continue;
        }
        let params = stream.params();
        devices.push(VideoDeviceInfo {
            index,
            path,
            width: params.width,
            height: params.height,
        });
    }
    devices
}

/// List input-capable audio devices with their advertised metadata.
pub fn list_audio_devices() -> Vec<AudioDeviceInfo> {
    use cpal::traits::{DeviceTrait, HostTrait};

    let host = cpal::default_host();
    let default_name = host.default_input_device().and_then(|d| d.name().ok());

    let Ok(inputs) = host.input_devices() else {
        return Vec::new();
    };

    inputs
        .enumerate()
        .filter_map(|(index, device)| {
            let name = device.name().ok()?;
            let config = device.default_input_config().ok()?;
            Some(AudioDeviceInfo {
                index,
                is_default: default_name.as_deref() == Some(name.as_str()),
                channels: config.channels(),
                sample_rate: config.sample_rate().0,
                name,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_audio_devices_does_not_panic() {
        // May be empty in CI, but must not panic.
        let _ = list_audio_devices();
    }

    #[test]
    #[ignore = "probes video hardware"]
    #[cfg(target_os = "linux")]
    fn listing_video_devices_reports_resolution() {
        for device in list_video_devices() {
            assert!(device.path.starts_with("/dev/video"));
            assert!(device.width > 0 && device.height > 0);
        }
    }
}
