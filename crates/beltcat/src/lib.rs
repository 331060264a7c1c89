//! beltcat: Reconstruct belt-drive rating tables from catalog documents.
//!
//! Catalogs print rated power as a grid of pulley diameter by rotational
//! speed. Text extraction flattens that grid into an unstructured stream of
//! numbers; this crate reads the document, rebuilds the table for a
//! configured profile, and answers power queries by interpolation.
//!
//! # Quick start
//!
//! ```no_run
//! use beltcat::Catalog;
//!
//! let mut catalog = Catalog::open("catalog.pdf")?;
//! let hit = catalog.lookup("C", 190.0, 710.0)?;
//! println!("{} kW ({})", hit.power, hit.resolution);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The backend-independent pipeline lives in [`beltcat_core`] and is
//! re-exported here.

pub mod catalog;
pub mod dataset_file;
pub mod error;
pub mod page_range;
pub mod profiles;
pub mod source;

pub use beltcat_core::*;

pub use catalog::Catalog;
pub use dataset_file::{DatasetFormat, parse_dataset, read_dataset, write_dataset};
pub use error::SourceError;
pub use page_range::parse_page_range;
pub use profiles::ProfileSet;
pub use source::{PAGE_BREAK, PdfSource, PlainTextSource, TextSource, is_pdf, open_source};
