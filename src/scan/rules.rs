//! Line classification.
//!
//! Each scan step picks the first rule in [`RULES`] whose predicate accepts
//! the line under the cursor. The order is significant: headings before the
//! image-section fence skip, fences before tables, the flow label before the
//! generic label.

use crate::layout::ScanState;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

pub(crate) static RE_NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.\s").unwrap());

static RE_FLOW_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*([^*]*처리\s*흐름[^*]*):\*\*\s*$").unwrap());

pub(crate) static RE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*([^*]+):\*\*\s*(.*)?$").unwrap());

/// A construct the scanner knows how to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Blank line or `---`; skipped
    Separator,
    /// `# `
    H1,
    /// `## `
    H2,
    /// `### `
    H3,
    /// Code fence while an image section is open; skipped
    ImageSectionFence,
    /// `#### `
    H4,
    /// `##### `
    H5,
    /// `> `
    Blockquote,
    /// Opening code fence
    CodeFence,
    /// `|`-prefixed line
    Table,
    /// `- `
    Bullet,
    /// `N. `
    NumberedItem,
    /// `**…처리 흐름…:**`
    FlowLabel,
    /// `**label:** content`
    Label,
    /// Anything else
    Paragraph,
}

impl Rule {
    /// Stable name, used in statistics and logs.
    pub fn name(self) -> &'static str {
        match self {
            Rule::Separator => "separator",
            Rule::H1 => "h1",
            Rule::H2 => "h2",
            Rule::H3 => "h3",
            Rule::ImageSectionFence => "image_section_fence",
            Rule::H4 => "h4",
            Rule::H5 => "h5",
            Rule::Blockquote => "blockquote",
            Rule::CodeFence => "code_fence",
            Rule::Table => "table",
            Rule::Bullet => "bullet",
            Rule::NumberedItem => "numbered_item",
            Rule::FlowLabel => "flow_label",
            Rule::Label => "label",
            Rule::Paragraph => "paragraph",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

type Predicate = fn(&str, &ScanState) -> bool;

pub(crate) fn is_fence(line: &str) -> bool {
    line.trim().starts_with("```")
}

fn separator(line: &str, _: &ScanState) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed == "---"
}

fn h1(line: &str, _: &ScanState) -> bool {
    line.starts_with("# ")
}

fn h2(line: &str, _: &ScanState) -> bool {
    line.starts_with("## ")
}

fn h3(line: &str, _: &ScanState) -> bool {
    line.starts_with("### ")
}

fn image_section_fence(line: &str, state: &ScanState) -> bool {
    state.in_image_section() && is_fence(line)
}

fn h4(line: &str, _: &ScanState) -> bool {
    line.starts_with("#### ")
}

fn h5(line: &str, _: &ScanState) -> bool {
    line.starts_with("##### ")
}

fn blockquote(line: &str, _: &ScanState) -> bool {
    line.starts_with("> ")
}

fn code_fence(line: &str, _: &ScanState) -> bool {
    is_fence(line)
}

fn table(line: &str, _: &ScanState) -> bool {
    line.trim().starts_with('|')
}

fn bullet(line: &str, _: &ScanState) -> bool {
    line.trim().starts_with("- ")
}

fn numbered_item(line: &str, _: &ScanState) -> bool {
    RE_NUMBERED.is_match(line.trim())
}

fn flow_label(line: &str, _: &ScanState) -> bool {
    RE_FLOW_LABEL.is_match(line.trim())
}

fn label(line: &str, _: &ScanState) -> bool {
    RE_LABEL.is_match(line.trim())
}

fn paragraph(_: &str, _: &ScanState) -> bool {
    true
}

/// Dispatch table, tried in order.
pub const RULES: &[(Rule, Predicate)] = &[
    (Rule::Separator, separator),
    (Rule::H1, h1),
    (Rule::H2, h2),
    (Rule::H3, h3),
    (Rule::ImageSectionFence, image_section_fence),
    (Rule::H4, h4),
    (Rule::H5, h5),
    (Rule::Blockquote, blockquote),
    (Rule::CodeFence, code_fence),
    (Rule::Table, table),
    (Rule::Bullet, bullet),
    (Rule::NumberedItem, numbered_item),
    (Rule::FlowLabel, flow_label),
    (Rule::Label, label),
    (Rule::Paragraph, paragraph),
];

/// Pick the rule for a line.
pub fn classify(line: &str, state: &ScanState) -> Rule {
    RULES
        .iter()
        .find(|(_, accepts)| accepts(line, state))
        .map_or(Rule::Paragraph, |(rule, _)| *rule)
}

/// Bold label that starts a new block and ends a flow: `**X:**` where X does
/// not start with `Step`.
pub(crate) fn is_block_label(line: &str) -> bool {
    let Some(inner) = line
        .strip_prefix("**")
        .and_then(|rest| rest.trim_end().strip_suffix(":**"))
    else {
        return false;
    };
    !inner.is_empty() && !inner.contains('*') && !inner.starts_with("Step")
}
