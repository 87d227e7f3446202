//! FK quality code from the ratio of the two largest local maxima
//!
//! | ratio (dB) | code |
//! |------------|------|
//! | ≥ 6        | 1    |
//! | ≥ 4        | 2    |
//! | ≥ 1        | 3    |
//! | otherwise  | 4    |

use ndarray::{Array2, ArrayView2};

/// Best quality code
pub const QUALITY_BEST: u8 = 1;
/// Worst quality code, also used when the grid has no usable peak
pub const QUALITY_WORST: u8 = 4;

/// Linear power ratio for a level in dB
fn power_decibel(db: f64) -> f64 {
    10f64.powf(db / 10.0)
}

/// Copy of `power` with NaN cells replaced by zero
fn zero_nans(power: &ArrayView2<f64>) -> Array2<f64> {
    power.mapv(|p| if p.is_nan() { 0.0 } else { p })
}

/// Whether no neighbour in the (edge-clipped) 3×3 block is strictly greater
pub fn is_local_maximum(power: &ArrayView2<f64>, row: usize, col: usize) -> bool {
    let (rows, cols) = power.dim();
    if rows == 1 && cols == 1 {
        return false;
    }

    let value = power[[row, col]];
    let row_range = row.saturating_sub(1)..=(row + 1).min(rows - 1);
    for r in row_range {
        let col_range = col.saturating_sub(1)..=(col + 1).min(cols - 1);
        for c in col_range {
            if power[[r, c]] > value {
                return false;
            }
        }
    }
    true
}

/// Values of all local maxima, largest first (NaN cells count as zero)
pub fn local_maxima(power: &ArrayView2<f64>) -> Vec<f64> {
    let zeroed = zero_nans(power);
    let view = zeroed.view();
    let mut peaks: Vec<f64> = view
        .indexed_iter()
        .filter(|((row, col), _)| is_local_maximum(&view, *row, *col))
        .map(|(_, &value)| value)
        .collect();
    peaks.sort_by(|a, b| b.total_cmp(a));
    peaks
}

/// Ratio of the largest to the second-largest peak; 0 with fewer than two
pub fn peak_ratio(power: &ArrayView2<f64>) -> f64 {
    match local_maxima(power).as_slice() {
        [max, second, ..] => max / second,
        _ => 0.0,
    }
}

/// Map a peak ratio onto the 1..=4 quality scale
pub fn quality_from_ratio(ratio: f64) -> u8 {
    if ratio >= power_decibel(6.0) {
        1
    } else if ratio >= power_decibel(4.0) {
        2
    } else if ratio >= power_decibel(1.0) {
        3
    } else {
        QUALITY_WORST
    }
}

/// Quality code of an FK power grid
pub fn fk_quality(power: &ArrayView2<f64>) -> u8 {
    quality_from_ratio(peak_ratio(power))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_flat_grid_is_worst() {
        let power = Array2::from_elem((5, 5), 2.0);
        assert!((peak_ratio(&power.view()) - 1.0).abs() < 1e-12);
        assert_eq!(fk_quality(&power.view()), QUALITY_WORST);
    }

    #[test]
    fn test_dominant_peak_is_best() {
        let mut power = Array2::from_elem((7, 7), 0.1);
        power[[1, 1]] = 10.0;
        power[[5, 5]] = 2.0;

        // the untouched plateau also counts as local maxima, all below 2.0
        let peaks = local_maxima(&power.view());
        assert_eq!(&peaks[..2], &[10.0, 2.0]);
        assert!(peaks[2..].iter().all(|&p| p == 0.1));
        assert_eq!(fk_quality(&power.view()), QUALITY_BEST);
    }

    #[test]
    fn test_ratio_thresholds() {
        assert_eq!(quality_from_ratio(10f64.powf(0.6)), 1);
        assert_eq!(quality_from_ratio(3.9), 2);
        assert_eq!(quality_from_ratio(10f64.powf(0.4)), 2);
        assert_eq!(quality_from_ratio(2.0), 3);
        assert_eq!(quality_from_ratio(10f64.powf(0.1)), 3);
        assert_eq!(quality_from_ratio(1.2), 4);
        assert_eq!(quality_from_ratio(0.0), 4);
        assert_eq!(quality_from_ratio(f64::INFINITY), 1);
        assert_eq!(quality_from_ratio(f64::NAN), 4);
    }

    #[test]
    fn test_single_peak_ratio_is_zero() {
        let power = array![[0.0, 1.0, 2.0], [1.0, 2.0, 3.0], [2.0, 3.0, 9.0]];
        assert_eq!(local_maxima(&power.view()), vec![9.0]);
        assert_eq!(peak_ratio(&power.view()), 0.0);
        assert_eq!(fk_quality(&power.view()), QUALITY_WORST);
    }

    #[test]
    fn test_single_cell_has_no_peak() {
        let power = array![[5.0]];
        assert!(local_maxima(&power.view()).is_empty());
        assert_eq!(fk_quality(&power.view()), QUALITY_WORST);
    }

    #[test]
    fn test_edge_and_corner_peaks() {
        let power = array![[4.0, 1.0, 1.0, 1.0], [1.0, 1.0, 1.0, 1.0], [1.0, 1.0, 1.0, 3.0]];
        let view = power.view();
        assert!(is_local_maximum(&view, 0, 0));
        assert!(is_local_maximum(&view, 2, 3));
        assert!(!is_local_maximum(&view, 1, 1));
        assert!(!is_local_maximum(&view, 2, 2));
    }

    #[test]
    fn test_nan_cells_treated_as_zero() {
        let power = array![[f64::NAN, 1.0, f64::NAN], [f64::NAN, f64::NAN, f64::NAN], [8.0, f64::NAN, 2.0]];
        // peaks: 1.0, 8.0, 2.0 (NaN cells are zero and never beat a positive neighbour)
        assert_eq!(local_maxima(&power.view()), vec![8.0, 2.0, 1.0]);
        assert_eq!(fk_quality(&power.view()), QUALITY_BEST);
        // input untouched
        assert!(power[[0, 0]].is_nan());
    }

    #[test]
    fn test_zero_second_peak_propagates() {
        // two separated maxima, one of them zero
        let power = array![[5.0, 0.0, 0.0, -1.0, 0.0]];
        let ratio = peak_ratio(&power.view());
        assert!(ratio.is_infinite());
        assert_eq!(quality_from_ratio(ratio), QUALITY_BEST);
    }
}
