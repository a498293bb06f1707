//! Microphone capture via cpal (ALSA on Linux).
//!
//! cpal delivers audio through a callback on its own audio thread. The
//! callback does nothing but forward the raw buffer over a channel; the
//! capture loop's `read_block` reassembles those buffers into fixed-size
//! [`AudioBlock`]s at the requested rate and channel count.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use av_capture_core::{
    AudioBlock, AudioConfig, AudioParams, AudioSource, AudioStream, CaptureError,
};

use crate::convert::{remix_channels, resample};

#[derive(Debug, Clone, Default)]
enum DeviceSelector {
    #[default]
    Default,
    Index(usize),
    Name(String),
}

/// A cpal input device selector.
///
/// Holds no open handle; the device is opened by the capture thread at
/// `start()`.
#[derive(Debug, Clone, Default)]
pub struct CpalAudioSource {
    selector: DeviceSelector,
}

impl CpalAudioSource {
    /// Use the system default input device.
    pub fn default_device() -> Self {
        Self {
            selector: DeviceSelector::Default,
        }
    }

    /// Select an input device by enumeration index (see
    /// [`list_audio_devices`](crate::list_audio_devices)).
    pub fn index(index: usize) -> Self {
        Self {
            selector: DeviceSelector::Index(index),
        }
    }

    /// Select an input device by name.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            selector: DeviceSelector::Name(name.into()),
        }
    }

    fn device(&self) -> Result<cpal::Device, CaptureError> {
        let host = cpal::default_host();
        match &self.selector {
            DeviceSelector::Default => host
                .default_input_device()
                .ok_or(CaptureError::NoDefaultDevice),
            DeviceSelector::Index(index) => host
                .input_devices()
                .map_err(|e| CaptureError::Backend(e.to_string()))?
                .nth(*index)
                .ok_or_else(|| CaptureError::DeviceNotFound(format!("input device #{index}"))),
            DeviceSelector::Name(name) => {
                let devices = host
                    .input_devices()
                    .map_err(|e| CaptureError::Backend(e.to_string()))?;
                for device in devices {
                    if device.name().map(|n| n == *name).unwrap_or(false) {
                        return Ok(device);
                    }
                }
                Err(CaptureError::DeviceNotFound(name.clone()))
            }
        }
    }
}

impl AudioSource for CpalAudioSource {
    type Stream = CpalBlockStream;

    fn open(&self, config: &AudioConfig) -> Result<CpalBlockStream, CaptureError> {
        let device = self.device()?;
        let name = device.name().unwrap_or_else(|_| "unknown".into());

        let supported = device
            .default_input_config()
            .map_err(|e| CaptureError::DeviceUnavailable(format!("{name}: {e}")))?;

        let (tx, rx) = mpsc::channel::<Vec<f32>>();

        // First preference: the exact requested format (ALSA's plug layer
        // grants most rates). Fall back to the device's native format and
        // convert per buffer.
        let requested = cpal::StreamConfig {
            channels: config.channels,
            sample_rate: cpal::SampleRate(config.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let (stream, native_rate, native_channels) =
            match build_stream(&device, &requested, cpal::SampleFormat::F32, tx.clone()) {
                Ok(stream) => (stream, config.sample_rate, config.channels),
                Err(_) => {
                    let native_rate = supported.sample_rate().0;
                    let native_channels = supported.channels();
                    let format = supported.sample_format();
                    let native: cpal::StreamConfig = supported.into();
                    let stream = build_stream(&device, &native, format, tx)?;
                    (stream, native_rate, native_channels)
                }
            };

        stream
            .play()
            .map_err(|e| CaptureError::Backend(format!("start stream: {e}")))?;

        if native_rate != config.sample_rate || native_channels != config.channels {
            log::info!(
                "audio input is {native_rate}Hz {native_channels}ch, converting to {}Hz {}ch",
                config.sample_rate,
                config.channels
            );
        }

        Ok(CpalBlockStream {
            _stream: stream,
            rx,
            pending: Vec::new(),
            native_rate,
            native_channels,
            samples_per_block: config.block_size as usize * config.channels as usize,
            params: AudioParams {
                device_name: name,
                sample_rate: config.sample_rate,
                channels: config.channels,
            },
        })
    }
}

fn build_stream(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    format: cpal::SampleFormat,
    tx: Sender<Vec<f32>>,
) -> Result<cpal::Stream, CaptureError> {
    let err_fn = |e: cpal::StreamError| log::error!("audio stream error: {e}");
    let stream = match format {
        cpal::SampleFormat::F32 => device.build_input_stream(
            config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                // Send failures mean the reader is gone; the stream is
                // about to be torn down anyway.
                let _ = tx.send(data.to_vec());
            },
            err_fn,
            None,
        ),
        cpal::SampleFormat::I16 => device.build_input_stream(
            config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                let samples: Vec<f32> = data
                    .iter()
                    .map(|&s| f32::from(s) / f32::from(i16::MAX))
                    .collect();
                let _ = tx.send(samples);
            },
            err_fn,
            None,
        ),
        other => {
            return Err(CaptureError::ConfigurationFailed(format!(
                "unsupported sample format: {other:?}"
            )))
        }
    };
    stream.map_err(|e| CaptureError::Backend(format!("build stream: {e}")))
}

/// A running cpal input stream, reassembled into fixed-size blocks.
///
/// Dropping this stops the underlying hardware stream.
pub struct CpalBlockStream {
    _stream: cpal::Stream,
    rx: Receiver<Vec<f32>>,
    pending: Vec<f32>,
    native_rate: u32,
    native_channels: u16,
    samples_per_block: usize,
    params: AudioParams,
}

impl AudioStream for CpalBlockStream {
    fn params(&self) -> AudioParams {
        self.params.clone()
    }

    fn read_block(&mut self, timeout: Duration) -> Result<Option<AudioBlock>, CaptureError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.pending.len() >= self.samples_per_block {
                let rest = self.pending.split_off(self.samples_per_block);
                let samples = std::mem::replace(&mut self.pending, rest);
                return Ok(Some(AudioBlock {
                    samples,
                    channels: self.params.channels,
                    sample_rate: self.params.sample_rate,
                }));
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }
            match self.rx.recv_timeout(remaining) {
                Ok(raw) => {
                    let mixed = remix_channels(&raw, self.native_channels, self.params.channels);
                    let resampled = resample(
                        &mixed,
                        self.params.channels,
                        self.native_rate,
                        self.params.sample_rate,
                    );
                    self.pending.extend_from_slice(&resampled);
                }
                Err(RecvTimeoutError::Timeout) => return Ok(None),
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(CaptureError::Backend("audio callback channel closed".into()))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore = "requires audio hardware"]
    fn open_default_device() {
        let source = CpalAudioSource::default_device();
        let mut stream = source.open(&AudioConfig::default()).unwrap();
        let block = stream.read_block(Duration::from_secs(1)).unwrap();
        assert!(block.is_some());
    }
}
