//! Long-format assembly: rows crossed with the diameter axis.

use crate::classify::AxisHeader;
use crate::rows::DataRow;

/// One `(diameter, speed, power)` record.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LongRecord {
    /// Pulley diameter.
    pub diameter: f64,
    /// Rotational speed.
    pub speed: f64,
    /// Rated power.
    pub power: f64,
}

impl LongRecord {
    /// Create a record.
    pub fn new(diameter: f64, speed: f64, power: f64) -> Self {
        Self {
            diameter,
            speed,
            power,
        }
    }
}

/// Expand rows into records, row by row, diameters in header order.
///
/// Produces exactly `header.len() * rows.len()` records.
pub fn assemble(header: &AxisHeader, rows: &[DataRow]) -> Vec<LongRecord> {
    let mut records = Vec::with_capacity(header.len() * rows.len());
    for row in rows {
        for (diameter, power) in header.values().iter().zip(&row.values) {
            records.push(LongRecord::new(*diameter, row.speed, *power));
        }
    }
    records
}
