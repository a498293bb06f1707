//! Sample-format helpers for the cpal backend's native-format fallback.
//!
//! When a device refuses the requested stream format, capture runs at the
//! device's native rate and channel count and these helpers convert each
//! callback buffer before it is re-blocked.

/// Convert interleaved samples from `channels` to `target` channels.
///
/// Multi-channel to mono averages each frame; mono to multi duplicates the
/// sample across channels. Matching counts (and layouts with no sensible
/// mapping) pass through unchanged.
pub(crate) fn remix_channels(samples: &[f32], channels: u16, target: u16) -> Vec<f32> {
    if channels == target || channels == 0 || target == 0 {
        return samples.to_vec();
    }
    if target == 1 {
        return samples
            .chunks(channels as usize)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect();
    }
    if channels == 1 {
        let mut out = Vec::with_capacity(samples.len() * target as usize);
        for &sample in samples {
            for _ in 0..target {
                out.push(sample);
            }
        }
        return out;
    }
    samples.to_vec()
}

/// Linear-interpolation resampler for interleaved frames.
///
/// Returns the input unchanged when the rates already match.
pub(crate) fn resample(samples: &[f32], channels: u16, from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() || channels == 0 || from_rate == 0 {
        return samples.to_vec();
    }

    let ch = channels as usize;
    let frames = samples.len() / ch;
    let ratio = f64::from(to_rate) / f64::from(from_rate);
    let out_frames = (frames as f64 * ratio) as usize;

    let mut out = vec![0.0f32; out_frames * ch];
    for i in 0..out_frames {
        let src = i as f64 / ratio;
        let index = src as usize;
        let fraction = (src - index as f64) as f32;

        for c in 0..ch {
            let a = samples[index * ch + c];
            let b = if index + 1 < frames {
                samples[(index + 1) * ch + c]
            } else {
                a
            };
            out[i * ch + c] = a * (1.0 - fraction) + b * fraction;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_channels_pass_through() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(remix_channels(&samples, 1, 1), samples);
    }

    #[test]
    fn stereo_averages_to_mono() {
        let samples = [0.4, 0.6, -0.2, 0.8];
        let mono = remix_channels(&samples, 2, 1);
        assert_eq!(mono.len(), 2);
        assert!((mono[0] - 0.5).abs() < 1e-6);
        assert!((mono[1] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn mono_duplicates_to_stereo() {
        let samples = [0.5, -0.5];
        assert_eq!(remix_channels(&samples, 1, 2), vec![0.5, 0.5, -0.5, -0.5]);
    }

    #[test]
    fn resample_same_rate_is_passthrough() {
        let samples = vec![0.1, 0.2, 0.3, 0.4];
        assert_eq!(resample(&samples, 1, 48_000, 48_000), samples);
    }

    #[test]
    fn downsample_halves_frame_count() {
        let samples: Vec<f32> = (0..960).map(|i| i as f32 / 960.0).collect();
        let out = resample(&samples, 1, 32_000, 16_000);
        assert_eq!(out.len(), 480);
    }

    #[test]
    fn upsample_interpolates_midpoints() {
        let samples = [0.0, 1.0];
        let out = resample(&samples, 1, 8_000, 16_000);
        assert_eq!(out.len(), 4);
        assert!((out[1] - 0.5).abs() < 0.01);
    }

    #[test]
    fn stereo_resample_keeps_channels_separate() {
        // Left channel constant 1.0, right constant -1.0.
        let samples = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let out = resample(&samples, 2, 32_000, 16_000);
        assert_eq!(out.len(), 4);
        assert!((out[0] - 1.0).abs() < 1e-6);
        assert!((out[1] + 1.0).abs() < 1e-6);
    }
}
