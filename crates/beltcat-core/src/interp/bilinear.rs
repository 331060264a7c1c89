//! Bilinear interpolation on a rectangular grid.

use crate::dataset::PowerTable;
use crate::grid::{Bracket, InterpolationGrid};

/// The four bracketing grid points of a query.
///
/// `q11 = (d_low, n_low)`, `q12 = (d_low, n_high)`, `q21 = (d_high, n_low)`,
/// `q22 = (d_high, n_high)`. A corner is `None` when the combination is absent
/// from the table.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Corners {
    /// Diameter bracket.
    pub diameter: Bracket,
    /// Speed bracket.
    pub speed: Bracket,
    /// Power at `(d_low, n_low)`.
    pub q11: Option<f64>,
    /// Power at `(d_low, n_high)`.
    pub q12: Option<f64>,
    /// Power at `(d_high, n_low)`.
    pub q21: Option<f64>,
    /// Power at `(d_high, n_high)`.
    pub q22: Option<f64>,
}

impl Corners {
    /// Returns true if the query hits a grid point on both axes.
    pub fn is_exact(&self) -> bool {
        self.diameter.is_degenerate() && self.speed.is_degenerate()
    }

    /// Corners the interpolation actually reads. A degenerate axis collapses
    /// its pair onto the low corner.
    fn used(&self) -> impl Iterator<Item = Option<f64>> {
        let d_span = !self.diameter.is_degenerate();
        let n_span = !self.speed.is_degenerate();
        [
            Some(self.q11),
            d_span.then_some(self.q21),
            n_span.then_some(self.q12),
            (d_span && n_span).then_some(self.q22),
        ]
        .into_iter()
        .flatten()
    }

    /// Number of read corners absent from the table.
    pub fn missing(&self) -> usize {
        self.used().filter(Option::is_none).count()
    }

    /// Two-stage linear interpolation, missing corners read as zero.
    ///
    /// Along the diameter axis at `n_low` and `n_high` first, then between
    /// the two results along the speed axis. Exact grid hits return the stored
    /// value without arithmetic.
    pub fn interpolate(&self, d: f64, n: f64) -> f64 {
        let q11 = self.q11.unwrap_or(0.0);
        if self.is_exact() {
            return q11;
        }
        let q12 = self.q12.unwrap_or(0.0);
        let q21 = self.q21.unwrap_or(0.0);
        let q22 = self.q22.unwrap_or(0.0);

        let (r1, r2) = if self.diameter.is_degenerate() {
            (q11, q12)
        } else {
            let t = self.diameter.fraction(d);
            ((1.0 - t) * q11 + t * q21, (1.0 - t) * q12 + t * q22)
        };

        if self.speed.is_degenerate() {
            r1
        } else {
            let u = self.speed.fraction(n);
            (1.0 - u) * r1 + u * r2
        }
    }
}

/// Dense grid of stored values over the distinct axes of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct BilinearGrid {
    grid: InterpolationGrid,
    /// Diameter-major: `values[di * speeds.len() + si]`.
    values: Vec<Option<f64>>,
}

impl BilinearGrid {
    /// Lay out `table` on its axes. The first record of a pair wins.
    pub fn new(table: &PowerTable) -> Self {
        let grid = InterpolationGrid::from_table(table);
        let speeds = grid.speeds().len();
        let mut values = vec![None; grid.diameters().len() * speeds];
        for r in table.records() {
            if let (Some(di), Some(si)) = (
                position(grid.diameters(), r.diameter),
                position(grid.speeds(), r.speed),
            ) {
                let slot = &mut values[di * speeds + si];
                if slot.is_none() {
                    *slot = Some(r.power);
                }
            }
        }
        Self { grid, values }
    }

    /// The axis view this grid was built on.
    pub fn grid(&self) -> &InterpolationGrid {
        &self.grid
    }

    /// Stored value at an exact axis combination.
    pub fn value_at(&self, d: f64, n: f64) -> Option<f64> {
        let di = position(self.grid.diameters(), d)?;
        let si = position(self.grid.speeds(), n)?;
        self.values[di * self.grid.speeds().len() + si]
    }

    /// Bracket a query and read its corners. `None` for an empty grid.
    pub fn corners(&self, d: f64, n: f64) -> Option<Corners> {
        let diameter = self.grid.bracket_diameter(d)?;
        let speed = self.grid.bracket_speed(n)?;
        Some(Corners {
            diameter,
            speed,
            q11: self.value_at(diameter.low, speed.low),
            q12: self.value_at(diameter.low, speed.high),
            q21: self.value_at(diameter.high, speed.low),
            q22: self.value_at(diameter.high, speed.high),
        })
    }
}

fn position(axis: &[f64], v: f64) -> Option<usize> {
    axis.binary_search_by(|x| x.total_cmp(&v)).ok()
}
