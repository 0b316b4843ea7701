//! Document model types.
//!
//! This module defines the intermediate representation that bridges the
//! markdown scanner and the document builders. Elements are
//! backend-agnostic; a builder decides how each one looks.

mod cover;
mod document;
mod element;
mod inline;
mod table;

pub use cover::{CoverField, CoverPage, MODIFIED_DATE_LABEL, VERSION_LABEL};
pub use document::Document;
pub use element::{CodeKind, Element, ImageBlock, TextStyle};
pub use inline::{parse_inline, strip_bold, strip_markup, Span, SpanKind};
pub use table::{is_separator_row, parse_table, split_cells, TableBlock};
