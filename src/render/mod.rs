//! Rendering module: the builder contract and the bundled backends.

mod builder;
mod json;
mod result;
mod text;

pub use builder::{build_document, build_element, DocumentBuilder};
pub use json::{JsonBuilder, JsonFormat};
pub use result::ConversionStats;
pub use text::TextBuilder;
