//! Markdown scanning: source preparation, line classification and the
//! forward pass that turns lines into document elements.

mod preprocess;
mod rules;
mod scanner;
mod stream;

pub use preprocess::{clean_header, normalize, prepare_source};
pub use rules::{classify, Rule, RULES};
pub use scanner::{
    scan_markdown, ScanOutput, Scanner, BLOCK_SPACING, FLOW_SPACING, QUOTE_SPACING,
};
pub use stream::LineStream;
