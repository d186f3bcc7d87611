//! Core library for shipping-document parsing.
//!
//! This crate provides:
//! - Document text sources (embedded PDF text, plain text files)
//! - The field extraction engine: header rules, description-line
//!   location, token-plucking decomposition, batch row expansion
//! - Export, domestic and packing-list pipelines
//! - Record QC, override merging, and a CSV sink

pub mod config;
pub mod error;
pub mod extract;
pub mod merge;
pub mod qc;
pub mod record;
pub mod schema;
pub mod sink;
pub mod source;
pub mod text;

pub use config::DocketConfig;
pub use error::{DocketError, Result, SinkError, SourceError};
pub use extract::{
    parse_domestic_text, parse_export_text, parse_packing_text, DomesticOutcome, ParseOutcome,
    ProductAttributes,
};
pub use qc::{render_report, validate, QcResult};
pub use record::FieldMap;
pub use source::{DocumentSource, PdfTextSource, TextFileSource};
