//! The structured field extraction engine.
//!
//! Pure functions over strings and field maps: no I/O, no shared state.
//! A pattern that fails to match is never an error; every miss resolves
//! to a default (empty string, the "N/A" size sentinel, or a skip).

pub mod batches;
pub mod description;
pub mod domestic;
pub mod export;
pub mod header;
pub mod packing;
pub mod patterns;
pub mod product;

pub use description::DescriptionCandidate;
pub use domestic::{parse_domestic_text, DomesticOutcome};
pub use export::{parse_export_text, ParseOutcome};
pub use packing::parse_packing_text;
pub use product::ProductAttributes;
