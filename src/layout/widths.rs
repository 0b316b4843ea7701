//! Table column width resolution.
//!
//! Widths are resolved through a fallback chain, first match wins:
//!
//! 1. document-level patterns from the configuration (`tableWidths`)
//! 2. shared `common` patterns
//! 3. shared `byDocType` patterns for the current document type
//! 4. a weighted split driven by keyword classification of each header
//!
//! Every resolved vector has one entry per header and sums exactly to the
//! requested total.

use super::patterns::SharedPatterns;
use indexmap::IndexMap;

/// Ordered `keyword|keyword|…` → widths map.
pub type PatternMap = IndexMap<String, Vec<u32>>;

/// Usable width of a landscape page in DXA (twentieths of a point).
pub const DEFAULT_TOTAL_WIDTH: u32 = 12960;

/// Headers for narrow columns (weight 1).
const SMALL_HEADERS: &[&str] = &[
    "No", "코드", "필수", "길이", "타입", "MTI", "값", "버전", "시작", "결과", "단계",
];

/// Headers for regular columns (weight 2).
const MEDIUM_HEADERS: &[&str] = &[
    "날짜",
    "작성자",
    "호출 주체",
    "Processing Code",
    "변경 내용",
    "참조 섹션",
    "QR 유형",
    "판별 조건",
    "처리 방식",
    "결제 완료 시점",
    "사용 지역",
    "Tag 01 값",
    "금액(Tag 54)",
    "금액 입력",
    "trxStatus",
    "비고",
    "origTxnId",
    "origData",
    "구분",
    "조건",
    "방향",
    "주체",
    "패턴",
];

/// Headers for wide, free-text columns (weight 4).
const LARGE_HEADERS: &[&str] = &[
    "설명", "내용", "용도", "엔드포인트", "필드", "API명", "항목", "규격", "요건", "동작", "처리",
    "검증", "권한",
];

const SMALL_WEIGHT: u32 = 1;
const MEDIUM_WEIGHT: u32 = 2;
const LARGE_WEIGHT: u32 = 4;
const DEFAULT_WEIGHT: u32 = 2;

/// Which level of the fallback chain produced a width vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WidthSource {
    /// Configuration `tableWidths`
    Document,
    /// Shared `common` patterns
    Common,
    /// Shared `byDocType` patterns
    DocType,
    /// Keyword-weighted split
    Weighted,
}

/// Find the first pattern in `map` that matches a header row.
///
/// A pattern matches when every `|`-separated keyword is a substring of the
/// joined header row and the stored vector has one entry per header. Stored
/// vectors that sum to zero are skipped.
pub fn match_pattern<'a>(
    header_row: &str,
    header_count: usize,
    map: &'a PatternMap,
) -> Option<&'a [u32]> {
    map.iter()
        .find(|(pattern, widths)| {
            widths.len() == header_count
                && widths.iter().any(|w| *w > 0)
                && pattern
                    .split('|')
                    .map(str::trim)
                    .all(|keyword| header_row.contains(keyword))
        })
        .map(|(_, widths)| widths.as_slice())
}

/// Weight of a single header for the fallback split.
pub fn header_weight(header: &str) -> u32 {
    let header = header.trim();
    if SMALL_HEADERS.iter().any(|k| header.contains(k)) {
        SMALL_WEIGHT
    } else if MEDIUM_HEADERS.iter().any(|k| header.contains(k)) {
        MEDIUM_WEIGHT
    } else if LARGE_HEADERS.iter().any(|k| header.contains(k)) {
        LARGE_WEIGHT
    } else {
        DEFAULT_WEIGHT
    }
}

/// Split `total` proportionally to `weights`, flooring each share and folding
/// the remainder into the last column.
fn split_by_weights(weights: &[u32], total: u32) -> Vec<u32> {
    let weight_sum: u64 = weights.iter().map(|w| u64::from(*w)).sum();
    if weights.is_empty() || weight_sum == 0 {
        return vec![0; weights.len()];
    }

    let mut widths: Vec<u32> = weights
        .iter()
        .map(|w| (u64::from(*w) * u64::from(total) / weight_sum) as u32)
        .collect();

    let assigned: u32 = widths.iter().sum();
    if let Some(last) = widths.last_mut() {
        *last += total - assigned;
    }
    widths
}

/// Weighted fallback split for a header row.
pub fn weighted_widths<S: AsRef<str>>(headers: &[S], total: u32) -> Vec<u32> {
    let weights: Vec<u32> = headers.iter().map(|h| header_weight(h.as_ref())).collect();
    split_by_weights(&weights, total)
}

/// Rescale a stored vector so that it sums to `total`.
pub fn fit_to_total(widths: &[u32], total: u32) -> Vec<u32> {
    let sum: u64 = widths.iter().map(|w| u64::from(*w)).sum();
    if sum == u64::from(total) {
        return widths.to_vec();
    }
    split_by_weights(widths, total)
}

/// Width resolver bound to one document.
#[derive(Debug, Clone, Copy)]
pub struct WidthResolver<'a> {
    document: Option<&'a PatternMap>,
    shared: Option<&'a SharedPatterns>,
    doc_type: Option<&'a str>,
    total: u32,
}

impl<'a> WidthResolver<'a> {
    /// Create a resolver with no patterns and the default total width.
    pub fn new() -> Self {
        Self {
            document: None,
            shared: None,
            doc_type: None,
            total: DEFAULT_TOTAL_WIDTH,
        }
    }

    /// Use document-level patterns.
    pub fn with_document_patterns(mut self, patterns: &'a PatternMap) -> Self {
        self.document = Some(patterns);
        self
    }

    /// Use shared patterns.
    pub fn with_shared(mut self, shared: Option<&'a SharedPatterns>) -> Self {
        self.shared = shared;
        self
    }

    /// Set the document-type tag used for `byDocType` lookup.
    pub fn with_doc_type(mut self, doc_type: Option<&'a str>) -> Self {
        self.doc_type = doc_type;
        self
    }

    /// Set the total width to distribute.
    pub fn with_total(mut self, total: u32) -> Self {
        self.total = total;
        self
    }

    /// Total width this resolver distributes.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Resolve widths for a header row.
    pub fn resolve<S: AsRef<str>>(&self, headers: &[S]) -> Vec<u32> {
        self.resolve_with_source(headers).0
    }

    /// Resolve widths and report which level of the chain matched.
    pub fn resolve_with_source<S: AsRef<str>>(&self, headers: &[S]) -> (Vec<u32>, WidthSource) {
        let row = headers
            .iter()
            .map(|h| h.as_ref())
            .collect::<Vec<&str>>()
            .join("|");
        let count = headers.len();

        let shared = self.shared;
        let candidates = [
            (WidthSource::Document, self.document),
            (WidthSource::Common, shared.map(SharedPatterns::common)),
            (
                WidthSource::DocType,
                shared.zip(self.doc_type).and_then(|(s, t)| s.for_doc_type(t)),
            ),
        ];

        for (source, map) in candidates {
            if let Some(widths) = map.and_then(|m| match_pattern(&row, count, m)) {
                log::debug!("Table widths for [{}] from {:?} patterns", row, source);
                return (fit_to_total(widths, self.total), source);
            }
        }

        log::debug!("Table widths for [{}] from weighted fallback", row);
        (weighted_widths(headers, self.total), WidthSource::Weighted)
    }
}

impl Default for WidthResolver<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve widths for a header row in one call.
pub fn resolve_widths<S: AsRef<str>>(
    headers: &[S],
    document: &PatternMap,
    shared: Option<&SharedPatterns>,
    total: u32,
    doc_type: Option<&str>,
) -> Vec<u32> {
    WidthResolver::new()
        .with_document_patterns(document)
        .with_shared(shared)
        .with_doc_type(doc_type)
        .with_total(total)
        .resolve(headers)
}
