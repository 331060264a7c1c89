//! Read-only axis view over a power table.

use crate::dataset::PowerTable;

/// Bracketing axis values for one query coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bracket {
    /// Largest axis value at or below the query (clamped to the axis).
    pub low: f64,
    /// Smallest axis value at or above the query (clamped to the axis).
    pub high: f64,
    /// True if the query was outside the observed range and was clamped.
    pub clamped: bool,
}

impl Bracket {
    /// Returns true if the query sits exactly on an axis value.
    pub fn is_degenerate(&self) -> bool {
        self.low == self.high
    }

    /// Fractional position of `q` between `low` and `high`.
    ///
    /// Zero for a degenerate bracket; clamped queries map to the nearest end.
    pub fn fraction(&self, q: f64) -> f64 {
        if self.is_degenerate() {
            0.0
        } else {
            ((q - self.low) / (self.high - self.low)).clamp(0.0, 1.0)
        }
    }
}

/// Distinct sorted axes of a power table and whether they form a complete
/// rectangle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterpolationGrid {
    diameters: Vec<f64>,
    speeds: Vec<f64>,
    complete: bool,
}

impl InterpolationGrid {
    /// Derive the grid view of `table`.
    pub fn from_table(table: &PowerTable) -> Self {
        let diameters = distinct_sorted(table.records().iter().map(|r| r.diameter));
        let speeds = distinct_sorted(table.records().iter().map(|r| r.speed));
        let complete = !table.is_empty()
            && table.distinct_pairs() == diameters.len() * speeds.len();
        Self {
            diameters,
            speeds,
            complete,
        }
    }

    /// Distinct diameters, ascending.
    pub fn diameters(&self) -> &[f64] {
        &self.diameters
    }

    /// Distinct speeds, ascending.
    pub fn speeds(&self) -> &[f64] {
        &self.speeds
    }

    /// Returns true if the grid has no points.
    pub fn is_empty(&self) -> bool {
        self.diameters.is_empty()
    }

    /// Returns true if every diameter/speed combination is present.
    ///
    /// This is the strategy predicate: complete rectangles (single-value axes
    /// included) are served by bilinear interpolation, everything else by the
    /// scattered-data method.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Returns true if both axes have at least two distinct values.
    pub fn spans_both_axes(&self) -> bool {
        self.diameters.len() >= 2 && self.speeds.len() >= 2
    }

    /// Number of combinations absent from the table.
    pub fn missing_count(&self, table: &PowerTable) -> usize {
        (self.diameters.len() * self.speeds.len()).saturating_sub(table.distinct_pairs())
    }

    /// Combinations absent from the table, diameter-major.
    pub fn missing_pairs(&self, table: &PowerTable) -> Vec<(f64, f64)> {
        let mut missing = Vec::new();
        for &d in &self.diameters {
            for &n in &self.speeds {
                if table.get(d, n).is_none() {
                    missing.push((d, n));
                }
            }
        }
        missing
    }

    /// Bracket a diameter query. `None` for an empty grid.
    pub fn bracket_diameter(&self, d: f64) -> Option<Bracket> {
        bracket(&self.diameters, d)
    }

    /// Bracket a speed query. `None` for an empty grid.
    pub fn bracket_speed(&self, n: f64) -> Option<Bracket> {
        bracket(&self.speeds, n)
    }
}

fn distinct_sorted(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut v: Vec<f64> = values.collect();
    v.sort_by(f64::total_cmp);
    v.dedup_by(|a, b| a == b);
    v
}

/// Bracket `q` on an ascending axis.
///
/// Outside the axis both ends collapse onto the nearest boundary value.
pub fn bracket(axis: &[f64], q: f64) -> Option<Bracket> {
    let (&min, &max) = (axis.first()?, axis.last()?);
    if q <= min {
        return Some(Bracket {
            low: min,
            high: min,
            clamped: q < min,
        });
    }
    if q >= max {
        return Some(Bracket {
            low: max,
            high: max,
            clamped: q > max,
        });
    }
    // min < q < max: at least one value on each side.
    let upper = axis.partition_point(|&v| v < q);
    let high = axis[upper];
    let low = if high == q { high } else { axis[upper - 1] };
    Some(Bracket {
        low,
        high,
        clamped: false,
    })
}
