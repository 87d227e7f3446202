//! Slowness grid geometry
//!
//! Row 0 is the most positive (northernmost) slowness. Rows follow
//! `start_y + (count_y - i) * delta_y`, which places the grid one step north
//! of `start_y`.

use crate::definition::SpectrumDefinition;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlownessGrid {
    pub start_x_sec_per_km: f64,
    pub delta_x_sec_per_km: f64,
    pub count_x: usize,
    pub start_y_sec_per_km: f64,
    pub delta_y_sec_per_km: f64,
    pub count_y: usize,
}

impl SlownessGrid {
    pub fn from_definition(definition: &SpectrumDefinition) -> Self {
        Self {
            start_x_sec_per_km: definition.slow_start_x_sec_per_km,
            delta_x_sec_per_km: definition.slow_delta_x_sec_per_km,
            count_x: definition.slow_count_x,
            start_y_sec_per_km: definition.slow_start_y_sec_per_km,
            delta_y_sec_per_km: definition.slow_delta_y_sec_per_km,
            count_y: definition.slow_count_y,
        }
    }

    /// East slowness of column `j`
    pub fn slow_east(&self, j: usize) -> f64 {
        self.start_x_sec_per_km + j as f64 * self.delta_x_sec_per_km
    }

    /// North slowness of row `i`
    pub fn slow_north(&self, i: usize) -> f64 {
        self.start_y_sec_per_km + (self.count_y - i) as f64 * self.delta_y_sec_per_km
    }

    /// `(row, col)` of the cell closest to the given slowness
    pub fn nearest_cell(&self, slow_east: f64, slow_north: f64) -> (usize, usize) {
        let col = (0..self.count_x)
            .min_by(|&a, &b| {
                let da = (self.slow_east(a) - slow_east).abs();
                let db = (self.slow_east(b) - slow_east).abs();
                da.total_cmp(&db)
            })
            .unwrap_or(0);
        let row = (0..self.count_y)
            .min_by(|&a, &b| {
                let da = (self.slow_north(a) - slow_north).abs();
                let db = (self.slow_north(b) - slow_north).abs();
                da.total_cmp(&db)
            })
            .unwrap_or(0);
        (row, col)
    }
}
