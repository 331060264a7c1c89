//! beltcat-core: Backend-independent rating-table reconstruction and lookup.
//!
//! Catalog rating tables (rated power by pulley diameter and rotational speed)
//! arrive as a flat stream of text with no row or column markers. This crate
//! rebuilds the table from that stream and answers power queries against it.
//!
//! # Pipeline
//!
//! - [`block`]: locate table text between a profile's start/end sentinels
//! - [`token`]: clean text into numeric tokens
//! - [`classify`]: split the diameter header from the data stream
//! - [`rows`]: cut the data stream into rows
//! - [`long_format`]: expand rows into `(diameter, speed, power)` records
//! - [`dataset`]: the resulting [`PowerTable`] and its CSV forms
//! - [`interp`]: bilinear and scattered-data lookups
//!
//! [`parse_table`] runs the whole pipeline for one [`Profile`]; a
//! [`ProfileCache`] keeps parsed tables between queries.

pub mod block;
pub mod cache;
pub mod classify;
pub mod dataset;
pub mod error;
pub mod grid;
pub mod interp;
pub mod long_format;
pub mod pipeline;
pub mod profile;
pub mod rows;
pub mod token;

pub use block::{RawTextBlock, Sentinels, extract_blocks};
pub use cache::ProfileCache;
pub use classify::{AxisHeader, ClassifiedTable, Classifier, ClassifierState, classify};
pub use dataset::{CSV_HEADER, PowerTable};
pub use error::{CatalogError, ParseResult, ParseWarning, ParseWarningCode};
pub use grid::{Bracket, InterpolationGrid};
pub use interp::{
    Corners, Interpolator, Lookup, LookupOptions, MissingCornerPolicy, Resolution,
    StrategyChoice, lookup, lookup_with,
};
pub use long_format::{LongRecord, assemble};
pub use pipeline::{ParsedTable, parse_table};
pub use profile::{AlignmentPolicy, BlockMode, DuplicatePolicy, Profile, RowStrategy};
pub use rows::{AlignmentReport, DataRow, RowSet, reconstruct};
pub use token::{Token, tokenize};
