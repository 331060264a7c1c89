//! Power lookups against a long-format table.
//!
//! [`Interpolator`] is a tagged strategy chosen once per table: bilinear
//! interpolation when the table's diameter/speed combinations form a complete
//! rectangle, scattered-data interpolation otherwise. Every query returns a
//! [`Lookup`] with a finite power and a [`Resolution`] saying how it was
//! obtained; nothing here fails for numeric input.
//!
//! Queries outside the observed range are clamped to the nearest boundary on
//! each axis before either strategy runs.

mod bilinear;
mod scattered;
pub mod triangulation;

pub use bilinear::{BilinearGrid, Corners};
pub use scattered::{ScatteredInterpolator, ScatteredValue};

use std::fmt;

use tracing::warn;

use crate::dataset::PowerTable;

/// Which interpolation strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum StrategyChoice {
    /// Bilinear for complete rectangles, scattered otherwise (default).
    #[default]
    Auto,
    /// Always bilinear; absent corners follow [`MissingCornerPolicy`].
    Bilinear,
    /// Always scattered.
    Scattered,
}

/// What a bilinear lookup does when a bracketing corner is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum MissingCornerPolicy {
    /// Read the corner as `0.0` and count it in [`Lookup::missing_corners`] (default).
    #[default]
    Zero,
    /// Return [`Resolution::MissingData`] instead of a number.
    Unknown,
    /// Answer the query with the scattered-data method.
    Scattered,
}

/// Options for a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LookupOptions {
    /// Strategy selection.
    pub strategy: StrategyChoice,
    /// Handling of absent bilinear corners.
    pub missing_corners: MissingCornerPolicy,
}

impl LookupOptions {
    /// Set the strategy (builder pattern).
    pub fn with_strategy(mut self, strategy: StrategyChoice) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the missing-corner policy (builder pattern).
    pub fn with_missing_corners(mut self, policy: MissingCornerPolicy) -> Self {
        self.missing_corners = policy;
        self
    }
}

/// How a lookup was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Resolution {
    /// The (clamped) query is a stored point.
    Exact,
    /// Bilinear interpolation between four grid corners.
    Bilinear,
    /// Barycentric interpolation inside the scattered triangulation.
    Scattered,
    /// Nearest stored point; the query was outside the scattered hull.
    Nearest,
    /// A required corner is absent and the policy is
    /// [`MissingCornerPolicy::Unknown`]. The power is `0.0` and meaningless.
    MissingData,
    /// Empty table or non-finite query. The power is `0.0`.
    NoData,
}

impl Resolution {
    /// Lowercase name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Exact => "exact",
            Resolution::Bilinear => "bilinear",
            Resolution::Scattered => "scattered",
            Resolution::Nearest => "nearest",
            Resolution::MissingData => "missing_data",
            Resolution::NoData => "no_data",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one power lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lookup {
    /// Rated power. Always finite; `0.0` for [`Resolution::NoData`] and
    /// [`Resolution::MissingData`].
    pub power: f64,
    /// How the value was obtained.
    pub resolution: Resolution,
    /// The diameter was outside the observed range and was clamped.
    pub clamped_diameter: bool,
    /// The speed was outside the observed range and was clamped.
    pub clamped_speed: bool,
    /// Bracketing corners that were absent from the table.
    pub missing_corners: usize,
    /// Bracketing corners, for bilinear lookups.
    pub corners: Option<Corners>,
}

impl Lookup {
    /// A flagged zero for an unanswerable query.
    pub fn no_data() -> Self {
        Self {
            power: 0.0,
            resolution: Resolution::NoData,
            clamped_diameter: false,
            clamped_speed: false,
            missing_corners: 0,
            corners: None,
        }
    }

    /// The power if it is backed by data.
    pub fn value(&self) -> Option<f64> {
        match self.resolution {
            Resolution::NoData | Resolution::MissingData => None,
            _ => Some(self.power),
        }
    }

    /// Returns true for an empty table or non-finite query.
    pub fn is_no_data(&self) -> bool {
        self.resolution == Resolution::NoData
    }

    /// Returns true if the power should not be trusted as-is: no data,
    /// missing data, or absent corners read as zero.
    pub fn is_flagged(&self) -> bool {
        self.value().is_none() || self.missing_corners > 0
    }
}

/// Interpolation strategy bound to one table.
#[derive(Debug, Clone, PartialEq)]
pub enum Interpolator {
    /// The table has no records.
    Empty,
    /// Rectangular grid. `fallback` is present when the grid is incomplete.
    Bilinear {
        /// Dense grid of stored values.
        grid: BilinearGrid,
        /// Triangulation used for absent corners under
        /// [`MissingCornerPolicy::Scattered`].
        fallback: Option<ScatteredInterpolator>,
    },
    /// Irregular point cloud.
    Scattered {
        /// Triangulated points.
        cloud: ScatteredInterpolator,
        /// Observed diameter range.
        diameters: (f64, f64),
        /// Observed speed range.
        speeds: (f64, f64),
    },
}

impl Interpolator {
    /// Choose and build a strategy for `table`.
    pub fn new(table: &PowerTable, strategy: StrategyChoice) -> Self {
        if table.is_empty() {
            return Interpolator::Empty;
        }
        let grid = BilinearGrid::new(table);
        let complete = grid.grid().is_complete();
        let use_bilinear = match strategy {
            StrategyChoice::Auto => complete,
            StrategyChoice::Bilinear => true,
            StrategyChoice::Scattered => false,
        };
        if use_bilinear {
            let fallback = (!complete).then(|| ScatteredInterpolator::new(table));
            Interpolator::Bilinear { grid, fallback }
        } else {
            let axes = grid.grid();
            let range = |axis: &[f64]| {
                (
                    axis.first().copied().unwrap_or(0.0),
                    axis.last().copied().unwrap_or(0.0),
                )
            };
            Interpolator::Scattered {
                diameters: range(axes.diameters()),
                speeds: range(axes.speeds()),
                cloud: ScatteredInterpolator::new(table),
            }
        }
    }

    /// Short name of the chosen strategy.
    pub fn kind(&self) -> &'static str {
        match self {
            Interpolator::Empty => "empty",
            Interpolator::Bilinear { .. } => "bilinear",
            Interpolator::Scattered { .. } => "scattered",
        }
    }

    /// Power at `(d, n)`.
    pub fn lookup(&self, d: f64, n: f64, policy: MissingCornerPolicy) -> Lookup {
        if !d.is_finite() || !n.is_finite() {
            return Lookup::no_data();
        }
        match self {
            Interpolator::Empty => Lookup::no_data(),
            Interpolator::Bilinear { grid, fallback } => {
                bilinear_lookup(grid, fallback.as_ref(), d, n, policy)
            }
            Interpolator::Scattered {
                cloud,
                diameters,
                speeds,
            } => {
                let (cd, clamped_diameter) = clamp(d, *diameters);
                let (cn, clamped_speed) = clamp(n, *speeds);
                let mut result = scattered_lookup(cloud, cd, cn);
                result.clamped_diameter = clamped_diameter;
                result.clamped_speed = clamped_speed;
                result
            }
        }
    }
}

fn clamp(v: f64, (min, max): (f64, f64)) -> (f64, bool) {
    if v < min {
        (min, true)
    } else if v > max {
        (max, true)
    } else {
        (v, false)
    }
}

fn bilinear_lookup(
    grid: &BilinearGrid,
    fallback: Option<&ScatteredInterpolator>,
    d: f64,
    n: f64,
    policy: MissingCornerPolicy,
) -> Lookup {
    let Some(corners) = grid.corners(d, n) else {
        return Lookup::no_data();
    };
    let missing = corners.missing();
    let mut result = Lookup {
        power: 0.0,
        resolution: Resolution::Bilinear,
        clamped_diameter: corners.diameter.clamped,
        clamped_speed: corners.speed.clamped,
        missing_corners: missing,
        corners: Some(corners),
    };

    if missing > 0 {
        warn!(
            diameter = d,
            speed = n,
            missing,
            ?policy,
            "bilinear lookup is missing grid corners"
        );
        match (policy, fallback) {
            (MissingCornerPolicy::Unknown, _) => {
                result.resolution = Resolution::MissingData;
                return result;
            }
            (MissingCornerPolicy::Scattered, Some(cloud)) => {
                // The grid view already clamped the query.
                let cd = corners.diameter.low.max(d.min(corners.diameter.high));
                let cn = corners.speed.low.max(n.min(corners.speed.high));
                let scattered = scattered_lookup(cloud, cd, cn);
                result.power = scattered.power;
                result.resolution = scattered.resolution;
                return result;
            }
            _ => {}
        }
    }

    result.power = corners.interpolate(d, n);
    if corners.is_exact() && missing == 0 {
        result.resolution = Resolution::Exact;
    }
    result
}

fn scattered_lookup(cloud: &ScatteredInterpolator, d: f64, n: f64) -> Lookup {
    let Some(value) = cloud.evaluate(d, n) else {
        return Lookup::no_data();
    };
    let resolution = match value {
        ScatteredValue::Exact(_) => Resolution::Exact,
        ScatteredValue::Linear(_) => Resolution::Scattered,
        ScatteredValue::Nearest(_) => Resolution::Nearest,
    };
    Lookup {
        power: value.value(),
        resolution,
        ..Lookup::no_data()
    }
}

/// Power at `(diameter, speed)` with default options.
///
/// Builds the strategy for this one query; hold an [`Interpolator`] to serve
/// many queries against the same table.
pub fn lookup(table: &PowerTable, diameter: f64, speed: f64) -> Lookup {
    lookup_with(table, diameter, speed, LookupOptions::default())
}

/// Power at `(diameter, speed)` with explicit options.
pub fn lookup_with(
    table: &PowerTable,
    diameter: f64,
    speed: f64,
    options: LookupOptions,
) -> Lookup {
    Interpolator::new(table, options.strategy).lookup(diameter, speed, options.missing_corners)
}
