//! Peak attributes (azimuth, slowness) of an FK power grid

use super::grid::SlownessGrid;
use crate::geometry::{horizontal_slowness, receiver_to_source_azimuth_deg};
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

/// Attributes read off the maximum-power cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FkAttributes {
    pub row: usize,
    pub col: usize,
    pub slow_east_sec_per_km: f64,
    pub slow_north_sec_per_km: f64,
    /// Horizontal slowness magnitude
    pub slowness_sec_per_km: f64,
    /// Degrees clockwise from north, `[0, 360)`
    pub receiver_to_source_azimuth_deg: f64,
    pub peak_fstat: f64,
}

/// Attributes of the largest non-NaN power cell; `None` if every cell is NaN.
pub fn peak_attributes(
    grid: &SlownessGrid,
    power: &ArrayView2<f64>,
    fstat: &ArrayView2<f64>,
) -> Option<FkAttributes> {
    let ((row, col), _) = power
        .indexed_iter()
        .filter(|(_, p)| !p.is_nan())
        .fold(None, |best: Option<((usize, usize), f64)>, (index, &p)| match best {
            Some((_, max)) if p <= max => best,
            _ => Some((index, p)),
        })?;

    let slow_east = grid.slow_east(col);
    let slow_north = grid.slow_north(row);
    Some(FkAttributes {
        row,
        col,
        slow_east_sec_per_km: slow_east,
        slow_north_sec_per_km: slow_north,
        slowness_sec_per_km: horizontal_slowness(slow_east, slow_north),
        receiver_to_source_azimuth_deg: receiver_to_source_azimuth_deg(slow_east, slow_north),
        peak_fstat: fstat[[row, col]],
    })
}
