//! Piecewise-linear interpolation over an irregular point cloud.
//!
//! Points are normalized to the unit square on both axes and triangulated.
//! A query inside a triangle is the barycentric blend of its vertices; a
//! query outside the triangulated hull takes the value of the nearest point.

use std::collections::HashSet;

use super::triangulation::{self, EDGE_EPSILON, Point, Triangle};
use crate::dataset::{PowerTable, pair_key};
use crate::grid::InterpolationGrid;

/// How a scattered evaluation was resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScatteredValue {
    /// The query coincides with a stored point.
    Exact(f64),
    /// Barycentric blend inside a triangle.
    Linear(f64),
    /// Nearest stored point, for queries outside the hull.
    Nearest(f64),
}

impl ScatteredValue {
    /// The numeric value regardless of how it was obtained.
    pub fn value(&self) -> f64 {
        match *self {
            ScatteredValue::Exact(v) | ScatteredValue::Linear(v) | ScatteredValue::Nearest(v) => v,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisScale {
    min: f64,
    span: f64,
}

impl AxisScale {
    fn new(axis: &[f64]) -> Self {
        match (axis.first(), axis.last()) {
            (Some(&min), Some(&max)) if max > min => Self {
                min,
                span: max - min,
            },
            (Some(&min), _) => Self { min, span: 1.0 },
            _ => Self { min: 0.0, span: 1.0 },
        }
    }

    fn apply(&self, v: f64) -> f64 {
        (v - self.min) / self.span
    }
}

/// Triangulated point cloud of one power table.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatteredInterpolator {
    /// Normalized `(diameter, speed)` positions, one per distinct pair.
    points: Vec<Point>,
    /// Raw `(diameter, speed)` positions, parallel to `points`.
    raw: Vec<(f64, f64)>,
    /// Power values, parallel to `points`.
    values: Vec<f64>,
    triangles: Vec<Triangle>,
    diameter_scale: AxisScale,
    speed_scale: AxisScale,
}

impl ScatteredInterpolator {
    /// Triangulate the distinct pairs of `table`. The first record of a pair wins.
    pub fn new(table: &PowerTable) -> Self {
        let grid = InterpolationGrid::from_table(table);
        let diameter_scale = AxisScale::new(grid.diameters());
        let speed_scale = AxisScale::new(grid.speeds());

        let mut raw = Vec::with_capacity(table.distinct_pairs());
        let mut values = Vec::with_capacity(table.distinct_pairs());
        let mut seen = HashSet::with_capacity(table.distinct_pairs());
        for r in table.records() {
            if table.get(r.diameter, r.speed) == Some(r.power)
                && seen.insert(pair_key(r.diameter, r.speed))
            {
                raw.push((r.diameter, r.speed));
                values.push(r.power);
            }
        }
        let points: Vec<Point> = raw
            .iter()
            .map(|&(d, n)| [diameter_scale.apply(d), speed_scale.apply(n)])
            .collect();
        let triangles = triangulation::triangulate(&points);

        Self {
            points,
            raw,
            values,
            triangles,
            diameter_scale,
            speed_scale,
        }
    }

    /// Returns true if there are no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of triangles in the triangulation.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Evaluate at `(d, n)`. `None` only when there are no points.
    pub fn evaluate(&self, d: f64, n: f64) -> Option<ScatteredValue> {
        if let Some(i) = self.raw.iter().position(|&(rd, rn)| rd == d && rn == n) {
            return Some(ScatteredValue::Exact(self.values[i]));
        }
        let q = [self.diameter_scale.apply(d), self.speed_scale.apply(n)];
        for &[a, b, c] in &self.triangles {
            let Some(w) = triangulation::barycentric(self.points[a], self.points[b], self.points[c], q)
            else {
                continue;
            };
            if w.iter().all(|&x| x >= -EDGE_EPSILON) {
                let v = w[0] * self.values[a] + w[1] * self.values[b] + w[2] * self.values[c];
                return Some(ScatteredValue::Linear(v));
            }
        }
        self.nearest(q).map(|i| ScatteredValue::Nearest(self.values[i]))
    }

    /// Index of the point closest to normalized position `q`; first wins ties.
    fn nearest(&self, q: Point) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, p) in self.points.iter().enumerate() {
            let dist_sq = (p[0] - q[0]).powi(2) + (p[1] - q[1]).powi(2);
            if best.is_none_or(|(_, b)| dist_sq < b) {
                best = Some((i, dist_sq));
            }
        }
        best.map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::long_format::LongRecord;

    fn table(points: &[(f64, f64, f64)]) -> PowerTable {
        PowerTable::new(
            points
                .iter()
                .map(|&(d, n, p)| LongRecord::new(d, n, p))
                .collect(),
        )
    }

    /// 3x3 grid of the plane p = d/100 + n/1000 minus the (224, 1450) corner.
    fn l_shape() -> ScatteredInterpolator {
        let mut pts = Vec::new();
        for d in [180.0, 200.0, 224.0] {
            for n in [710.0, 950.0, 1450.0] {
                if !(d == 224.0 && n == 1450.0) {
                    pts.push((d, n, d / 100.0 + n / 1000.0));
                }
            }
        }
        ScatteredInterpolator::new(&table(&pts))
    }

    #[test]
    fn exact_point() {
        let s = l_shape();
        let expected = 200.0 / 100.0 + 950.0 / 1000.0;
        assert_eq!(s.evaluate(200.0, 950.0), Some(ScatteredValue::Exact(expected)));
    }

    #[test]
    fn linear_inside_hull_reproduces_plane() {
        let s = l_shape();
        assert!(s.triangle_count() > 0);
        let v = s.evaluate(190.0, 800.0).unwrap();
        assert!(matches!(v, ScatteredValue::Linear(_)));
        assert!((v.value() - (1.9 + 0.8)).abs() < 1e-9);
    }

    #[test]
    fn outside_hull_uses_nearest() {
        let s = l_shape();
        // The missing corner lies outside the hull of the L.
        let v = s.evaluate(224.0, 1450.0).unwrap();
        assert!(matches!(v, ScatteredValue::Nearest(_)));
        let v = s.evaluate(400.0, 710.0).unwrap();
        assert_eq!(v, ScatteredValue::Nearest(224.0 / 100.0 + 710.0 / 1000.0));
    }

    #[test]
    fn collinear_points_fall_back_to_nearest() {
        let s = ScatteredInterpolator::new(&table(&[
            (180.0, 710.0, 1.0),
            (200.0, 950.0, 2.0),
            (220.0, 1190.0, 3.0),
        ]));
        assert_eq!(s.triangle_count(), 0);
        assert_eq!(s.evaluate(182.0, 720.0), Some(ScatteredValue::Nearest(1.0)));
    }

    #[test]
    fn empty_is_none() {
        let s = ScatteredInterpolator::new(&PowerTable::default());
        assert!(s.is_empty());
        assert_eq!(s.evaluate(1.0, 1.0), None);
    }

    #[test]
    fn duplicate_pairs_use_first() {
        let s = ScatteredInterpolator::new(&table(&[
            (180.0, 710.0, 1.0),
            (180.0, 710.0, 9.0),
        ]));
        assert_eq!(s.evaluate(180.0, 710.0), Some(ScatteredValue::Exact(1.0)));
    }

    #[test]
    fn repeated_records_become_one_point() {
        let s = ScatteredInterpolator::new(&table(&[
            (180.0, 710.0, 1.0),
            (200.0, 710.0, 2.0),
            (180.0, 710.0, 1.0),
            (180.0, 950.0, 3.0),
            (200.0, 710.0, 2.0),
        ]));
        assert_eq!(s.points.len(), 3);
        assert_eq!(s.raw, vec![(180.0, 710.0), (200.0, 710.0), (180.0, 950.0)]);
        assert_eq!(s.triangle_count(), 1);
    }
}
