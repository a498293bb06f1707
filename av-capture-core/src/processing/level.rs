/// Root-mean-square amplitude of a sample block, clipped to `[0.0, 1.0]`.
///
/// Channels are not distinguished: the block is treated as one flat slice.
/// Runs on the capture thread for every block, so it is a single pass with
/// no allocation.
pub fn rms_level(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt().min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn silence_is_zero() {
        assert_eq!(rms_level(&[0.0; 64]), 0.0);
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(rms_level(&[]), 0.0);
    }

    #[test]
    fn constant_half_scale() {
        let samples = vec![0.5f32; 1024];
        assert_relative_eq!(rms_level(&samples), 0.5, epsilon = 1e-4);
    }

    #[test]
    fn out_of_range_clips_to_one() {
        let samples = vec![2.0f32; 1024];
        assert_relative_eq!(rms_level(&samples), 1.0);
    }

    #[test]
    fn sign_does_not_matter() {
        let samples = [0.5, -0.5, 0.5, -0.5];
        assert_relative_eq!(rms_level(&samples), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn full_scale_square_wave() {
        let samples = [1.0, -1.0, 1.0, -1.0];
        assert_relative_eq!(rms_level(&samples), 1.0, epsilon = 1e-6);
    }
}
