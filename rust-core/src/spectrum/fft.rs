//! FFT engine using realfft for real-valued signals
//!
//! Produces the full two-sided spectrum the beamformer expects: the
//! real-to-complex transform fills bins `0..=N/2` and the remaining bins are
//! recovered from Hermitian symmetry.

use crate::error::FkError;
use num_complex::Complex64;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// FFT engine for real-valued signals
pub struct FftEngine {
    /// FFT size (number of samples)
    fft_size: usize,

    /// Real FFT processor
    r2c: Arc<dyn RealToComplex<f64>>,

    /// Reusable input buffer
    input_buffer: Vec<f64>,

    /// Reusable output buffer (half spectrum)
    output_buffer: Vec<Complex64>,

    scratch: Vec<Complex64>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of samples, any length)
    pub fn new(fft_size: usize) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(fft_size);

        let input_buffer = r2c.make_input_vec();
        let output_buffer = r2c.make_output_vec();
        let scratch = r2c.make_scratch_vec();

        Self {
            fft_size,
            r2c,
            input_buffer,
            output_buffer,
            scratch,
        }
    }

    /// Compute the full complex DFT `X[k] = Σ x[n]·e^{-2πikn/N}`
    ///
    /// # Arguments
    /// * `signal` - Input signal (zero-padded or truncated to fft_size)
    ///
    /// # Returns
    /// All `fft_size` bins in standard DFT order
    pub fn compute_spectrum(&mut self, signal: &[f64]) -> Result<Vec<Complex64>, FkError> {
        let copy_len = signal.len().min(self.fft_size);
        self.input_buffer[..copy_len].copy_from_slice(&signal[..copy_len]);
        self.input_buffer[copy_len..].fill(0.0);

        self.r2c.process_with_scratch(
            &mut self.input_buffer,
            &mut self.output_buffer,
            &mut self.scratch,
        )?;

        let mut spectrum = Vec::with_capacity(self.fft_size);
        spectrum.extend_from_slice(&self.output_buffer);
        // X[N-k] = conj(X[k])
        for k in self.output_buffer.len()..self.fft_size {
            spectrum.push(self.output_buffer[self.fft_size - k].conj());
        }
        Ok(spectrum)
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }
}

/// Bin-centre frequencies in DFT order (numpy `fftfreq` convention)
///
/// Indices `0..ceil(N/2)` hold `0, Δf, 2Δf, ...`; the rest start at
/// `ceil(-N/2)·Δf` and increase towards `-Δf`.
pub fn frequency_axis(num_samples: usize, delta_frequency: f64) -> Vec<f64> {
    let n = num_samples as i64;
    let positive_bins = (n + 1) / 2;
    let mut negative = -(n / 2);

    (0..n)
        .map(|i| {
            let base = if i < positive_bins {
                i
            } else {
                let value = negative;
                negative += 1;
                value
            };
            base as f64 * delta_frequency
        })
        .collect()
}

/// Indices whose absolute frequency lies in `[low_hz, high_hz]`
pub fn passband_bins(frequencies: &[f64], low_hz: f64, high_hz: f64) -> Vec<usize> {
    frequencies
        .iter()
        .enumerate()
        .filter(|(_, f)| {
            let magnitude = f.abs();
            magnitude >= low_hz && magnitude <= high_hz
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::FftPlanner;
    use std::f64::consts::PI;

    fn full_complex_fft(signal: &[f64]) -> Vec<Complex64> {
        let mut buffer: Vec<Complex64> = signal.iter().map(|&s| Complex64::new(s, 0.0)).collect();
        let mut planner = FftPlanner::<f64>::new();
        planner.plan_fft_forward(signal.len()).process(&mut buffer);
        buffer
    }

    #[test]
    fn test_fft_dc_signal() {
        let mut fft = FftEngine::new(100);

        let spectrum = fft.compute_spectrum(&[1.0; 100]).unwrap();

        assert_eq!(spectrum.len(), 100);
        assert!((spectrum[0].re - 100.0).abs() < 1e-9);
        assert!(spectrum[10].norm() < 1e-9);
    }

    #[test]
    fn test_matches_complex_fft() {
        // odd and even sizes both need the mirrored upper half
        for &size in &[160usize, 161] {
            let signal: Vec<f64> = (0..size)
                .map(|n| (0.3 * n as f64).sin() + 0.2 * (1.7 * n as f64).cos() + 0.05 * n as f64)
                .collect();

            let mut fft = FftEngine::new(size);
            let ours = fft.compute_spectrum(&signal).unwrap();
            let reference = full_complex_fft(&signal);

            assert_eq!(ours.len(), reference.len());
            for (a, b) in ours.iter().zip(reference.iter()) {
                assert!((a - b).norm() < 1e-8, "size {size}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn test_fft_sine_wave() {
        let size = 400;
        let sample_rate = 40.0;
        let signal: Vec<f64> = (0..size)
            .map(|n| (2.0 * PI * 2.0 * n as f64 / sample_rate).sin())
            .collect();

        let mut fft = FftEngine::new(size);
        let spectrum = fft.compute_spectrum(&signal).unwrap();
        let freqs = frequency_axis(size, sample_rate / size as f64);

        let (peak_bin, _) = spectrum
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.norm().partial_cmp(&b.norm()).unwrap())
            .unwrap();

        assert!((freqs[peak_bin].abs() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_frequency_axis_odd() {
        let freqs = frequency_axis(9, 1.0);
        assert_eq!(freqs, vec![0.0, 1.0, 2.0, 3.0, 4.0, -4.0, -3.0, -2.0, -1.0]);
    }

    #[test]
    fn test_frequency_axis_even() {
        let freqs = frequency_axis(10, 0.5);
        assert_eq!(
            freqs,
            vec![0.0, 0.5, 1.0, 1.5, 2.0, -2.5, -2.0, -1.5, -1.0, -0.5]
        );
    }

    #[test]
    fn test_passband_bins_inclusive() {
        let freqs = frequency_axis(10, 0.5);
        let bins = passband_bins(&freqs, 1.0, 2.0);
        assert_eq!(bins, vec![2, 3, 4, 6, 7, 8]);
    }
}
