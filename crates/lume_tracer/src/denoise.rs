//! A-trous wavelet denoising.
//!
//! An expanding-stride 5x5 convolution with B-spline weights, run for
//! three iterations with the stride doubling each time. Smooths the
//! residual Monte Carlo noise of an accumulated sample buffer without
//! touching its overall structure.

use lume_math::Vec3;

/// 1D B-spline kernel; the 5x5 weights are its outer product.
const KERNEL: [f32; 5] = [1.0 / 16.0, 1.0 / 4.0, 3.0 / 8.0, 1.0 / 4.0, 1.0 / 16.0];

const ITERATIONS: u32 = 3;

/// Denoise a row-major RGB buffer in place.
pub fn atrous_denoise(pixels: &mut [Vec3], width: u32, height: u32) {
    debug_assert_eq!(pixels.len(), (width * height) as usize);

    let mut scratch = vec![Vec3::ZERO; pixels.len()];

    for iteration in 0..ITERATIONS {
        let stride = 1i64 << iteration;
        atrous_pass(pixels, &mut scratch, width, height, stride);
        pixels.copy_from_slice(&scratch);
    }
}

/// One dilated convolution pass; taps outside the image clamp to the
/// nearest edge pixel.
fn atrous_pass(input: &[Vec3], output: &mut [Vec3], width: u32, height: u32, stride: i64) {
    let w = width as i64;
    let h = height as i64;

    for y in 0..h {
        for x in 0..w {
            let mut sum = Vec3::ZERO;
            for (j, ky) in KERNEL.iter().enumerate() {
                let ty = (y + stride * (j as i64 - 2)).clamp(0, h - 1);
                for (i, kx) in KERNEL.iter().enumerate() {
                    let tx = (x + stride * (i as i64 - 2)).clamp(0, w - 1);
                    sum += input[(ty * w + tx) as usize] * (ky * kx);
                }
            }
            output[(y * w + x) as usize] = sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_image_is_preserved() {
        let mut pixels = vec![Vec3::splat(0.5); 16 * 16];
        atrous_denoise(&mut pixels, 16, 16);

        for p in &pixels {
            assert!((*p - Vec3::splat(0.5)).length() < 1e-4);
        }
    }

    #[test]
    fn test_kernel_is_normalized() {
        let sum: f32 = KERNEL.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_noise_variance_shrinks() {
        // Deterministic checkerboard "noise"
        let (w, h) = (32u32, 32u32);
        let mut pixels: Vec<Vec3> = (0..w * h)
            .map(|i| {
                let on = ((i % 2) ^ ((i / w) % 2)) == 1;
                Vec3::splat(if on { 1.0 } else { 0.0 })
            })
            .collect();

        let variance = |buf: &[Vec3]| {
            let mean = buf.iter().map(|p| p.x).sum::<f32>() / buf.len() as f32;
            buf.iter().map(|p| (p.x - mean).powi(2)).sum::<f32>() / buf.len() as f32
        };

        let before = variance(&pixels);
        atrous_denoise(&mut pixels, w, h);
        let after = variance(&pixels);

        assert!(after < before * 0.1, "before={before} after={after}");
        // Mean is conserved up to edge clamping
        let mean_after = pixels.iter().map(|p| p.x).sum::<f32>() / pixels.len() as f32;
        assert!((mean_after - 0.5).abs() < 0.05);
    }
}
