//! Delay-and-sum (Bartlett) beamforming over a uniform slowness grid
//!
//! For each grid cell every channel's passband spectrum is phase-shifted by
//! its plane-wave delay, the channels are summed and divided by the channel
//! count, and the beam power is `Σ|beam|² / N²`.
//!
//! In the planar case the steering factor separates into an east and a north
//! part, `e^{i2πf(e·sx + n·sy)} = e^{i2πf·e·sx} · e^{i2πf·n·sy}`, so both
//! are tabulated once per window and each cell only multiplies them.

use super::grid::SlownessGrid;
use crate::geometry::RelativePosition;
use crate::spectrum::WindowSpectra;
use ndarray::{Array2, Array3};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Below this the vertical slowness radicand is treated as evanescent
const ZERO_THRESHOLD: f64 = 1.0e-5;

/// Power and F-statistic grids for one window, `[slow_count_y, slow_count_x]`
#[derive(Debug, Clone, PartialEq)]
pub struct BeamGrids {
    pub power: Array2<f64>,
    pub fstat: Array2<f64>,
}

/// F-statistic of a beam power against the average single-channel power.
///
/// Non-finite results (e.g. `power == average_power`, NaN power) propagate.
pub fn f_statistic(power: f64, average_power: f64, num_channels: usize) -> f64 {
    (num_channels as f64 - 1.0) * power / (average_power - power)
}

/// Steering factors `e^{i2π·f·d·s}` for every (slowness step, channel, bin)
fn steering_table(
    slowness: impl Iterator<Item = f64>,
    displacements: &[f64],
    frequencies: &[f64],
) -> Array3<Complex64> {
    let slowness: Vec<f64> = slowness.collect();
    Array3::from_shape_fn(
        (slowness.len(), displacements.len(), frequencies.len()),
        |(s, k, f)| {
            let phase = 2.0 * PI * frequencies[f] * displacements[k] * slowness[s];
            Complex64::from_polar(1.0, phase)
        },
    )
}

/// Grid-search beamformer configured for one invocation
#[derive(Debug, Clone)]
pub struct Beamformer {
    grid: SlownessGrid,
    use_vertical_offsets: bool,
    medium_velocity_km_per_sec: f64,
}

impl Beamformer {
    pub fn new(grid: SlownessGrid, use_vertical_offsets: bool, medium_velocity_km_per_sec: f64) -> Self {
        Self {
            grid,
            use_vertical_offsets,
            medium_velocity_km_per_sec,
        }
    }

    pub fn grid(&self) -> &SlownessGrid {
        &self.grid
    }

    /// Vertical slowness for a horizontal slowness pair.
    ///
    /// Zero for planar beamforming; NaN when the direction is evanescent.
    pub fn vertical_slowness(&self, slow_east: f64, slow_north: f64) -> f64 {
        if !self.use_vertical_offsets {
            return 0.0;
        }
        let velocity = self.medium_velocity_km_per_sec;
        let radicand = 1.0 / (velocity * velocity) - slow_east * slow_east - slow_north * slow_north;
        if radicand >= ZERO_THRESHOLD {
            radicand.sqrt()
        } else {
            f64::NAN
        }
    }

    /// Evaluate power and F-statistic at every grid cell.
    ///
    /// `positions[k]` is the position of the channel in row `k` of
    /// `spectra.passband`.
    pub fn beamform(&self, spectra: &WindowSpectra, positions: &[RelativePosition]) -> BeamGrids {
        debug_assert_eq!(positions.len(), spectra.num_channels());

        let rows = self.grid.count_y;
        let cols = self.grid.count_x;
        let num_channels = spectra.num_channels();
        let num_bins = spectra.frequencies.len();
        let n = spectra.num_samples as f64;
        let scaling = 1.0 / (n * n);
        let average_power = spectra.average_power();

        let east: Vec<f64> = positions.iter().map(|p| p.east_displacement_km).collect();
        let north: Vec<f64> = positions.iter().map(|p| p.north_displacement_km).collect();
        let vertical: Vec<f64> = positions.iter().map(|p| p.vertical_displacement_km).collect();

        let east_table = steering_table(
            (0..cols).map(|j| self.grid.slow_east(j)),
            &east,
            &spectra.frequencies,
        );
        let north_table = steering_table(
            (0..rows).map(|i| self.grid.slow_north(i)),
            &north,
            &spectra.frequencies,
        );

        let mut power = Array2::<f64>::zeros((rows, cols));
        let mut fstat = Array2::<f64>::zeros((rows, cols));
        let mut beam = vec![Complex64::new(0.0, 0.0); num_bins];

        for i in 0..rows {
            let slow_north = self.grid.slow_north(i);
            for j in 0..cols {
                let slow_east = self.grid.slow_east(j);
                let slow_vertical = self.vertical_slowness(slow_east, slow_north);

                let pixel = if slow_vertical.is_nan() {
                    f64::NAN
                } else {
                    beam.fill(Complex64::new(0.0, 0.0));
                    for k in 0..num_channels {
                        let row = spectra.passband.row(k);
                        let east_steer = east_table.slice(ndarray::s![j, k, ..]);
                        let north_steer = north_table.slice(ndarray::s![i, k, ..]);
                        let vertical_phase = 2.0 * PI * vertical[k] * slow_vertical;

                        for f in 0..num_bins {
                            let mut steer = east_steer[f] * north_steer[f];
                            if vertical_phase != 0.0 {
                                steer *= Complex64::from_polar(
                                    1.0,
                                    vertical_phase * spectra.frequencies[f],
                                );
                            }
                            beam[f] += row[f] * steer;
                        }
                    }

                    let channel_count = num_channels as f64;
                    beam.iter()
                        .map(|b| (*b / channel_count).norm_sqr())
                        .sum::<f64>()
                        * scaling
                };

                power[[i, j]] = pixel;
                fstat[[i, j]] = f_statistic(pixel, average_power, num_channels);
            }
        }

        BeamGrids { power, fstat }
    }
}
