//! Layout decisions made during the scan: table column widths and page
//! breaks.

mod page_break;
mod patterns;
mod widths;

pub use page_break::{
    is_change_detail, section_number, BreakDecision, BreakReason, H3Heading, PageBreakPolicy,
    ScanState,
};
pub use patterns::{PatternCache, SharedPatterns, SharedTableWidths, PATTERNS_FILE};
pub use widths::{
    fit_to_total, header_weight, match_pattern, resolve_widths, weighted_widths, PatternMap,
    WidthResolver, WidthSource, DEFAULT_TOTAL_WIDTH,
};
