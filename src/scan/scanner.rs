//! Markdown to element conversion.

use super::rules::{classify, is_block_label, is_fence, Rule, RE_LABEL, RE_NUMBERED};
use super::stream::LineStream;
use crate::config::{DocConfig, ImageEntry};
use crate::layout::{
    section_number, H3Heading, PageBreakPolicy, PatternCache, ScanState, WidthResolver,
    DEFAULT_TOTAL_WIDTH,
};
use crate::model::{
    parse_table, strip_bold, strip_markup, CodeKind, Element, ImageBlock, TableBlock, TextStyle,
};
use crate::render::ConversionStats;
use crate::warnings::Warnings;
use std::path::{Path, PathBuf};

/// Space after a blockquote box and before an H5 line.
pub const QUOTE_SPACING: u32 = 150;

/// Space after code blocks and tables.
pub const BLOCK_SPACING: u32 = 100;

/// Space after a flow box.
pub const FLOW_SPACING: u32 = 80;

/// Result of scanning one markdown source.
#[derive(Debug, Clone, Default)]
pub struct ScanOutput {
    /// Body elements in order
    pub elements: Vec<Element>,
    /// Statistics
    pub stats: ConversionStats,
    /// Non-fatal problems
    pub warnings: Warnings,
}

/// Single forward pass over markdown lines.
///
/// A scanner is configured once and consumed by [`Scanner::scan`]; every run
/// starts from a fresh [`ScanState`].
pub struct Scanner<'a> {
    config: &'a DocConfig,
    policy: PageBreakPolicy,
    widths: WidthResolver<'a>,
    image_root: PathBuf,
    state: ScanState,
    elements: Vec<Element>,
    stats: ConversionStats,
    warnings: Warnings,
}

impl<'a> Scanner<'a> {
    /// Create a scanner for a configuration. Relative image paths resolve
    /// against `project_root`.
    pub fn new(config: &'a DocConfig, project_root: &Path) -> Self {
        let image_root = match config.images.base_path.as_deref() {
            Some(base) => project_root.join(base),
            None => project_root.to_path_buf(),
        };

        let widths = WidthResolver::new()
            .with_document_patterns(&config.table_widths)
            .with_doc_type(config.doc_type.as_deref())
            .with_total(DEFAULT_TOTAL_WIDTH);

        Self {
            config,
            policy: PageBreakPolicy::new(&config.page_breaks),
            widths,
            image_root,
            state: ScanState::new(),
            elements: Vec::new(),
            stats: ConversionStats::new(),
            warnings: Warnings::new(),
        }
    }

    /// Use shared width patterns from a cache.
    pub fn with_patterns(mut self, cache: &'a PatternCache) -> Self {
        self.widths = self.widths.with_shared(cache.get());
        self
    }

    /// Set the total table width in DXA.
    pub fn with_table_width(mut self, total: u32) -> Self {
        self.widths = self.widths.with_total(total);
        self
    }

    /// Convert markdown text into elements.
    pub fn scan(mut self, text: &str) -> ScanOutput {
        let mut lines = LineStream::new(text);
        self.stats.line_count = lines.len() as u32;

        while let Some(line) = lines.current() {
            let rule = classify(line, &self.state);
            log::trace!("line {}: {}", lines.position() + 1, rule);
            self.stats.record_rule(rule.name());

            match rule {
                Rule::Separator => lines.advance(),
                Rule::H1 => {
                    self.emit(Element::heading(1, heading_text(line, "# ")));
                    lines.advance();
                }
                Rule::H2 => {
                    self.h2(heading_text(line, "## "));
                    lines.advance();
                }
                Rule::H3 => self.h3(&mut lines),
                Rule::ImageSectionFence => skip_fenced_block(&mut lines),
                Rule::H4 => {
                    self.emit(Element::heading(4, strip_bold(heading_text(line, "#### "))));
                    lines.advance();
                }
                Rule::H5 => {
                    self.emit(Element::Paragraph {
                        text: strip_bold(heading_text(line, "##### ")),
                        style: TextStyle::bold_with_spacing(QUOTE_SPACING),
                    });
                    lines.advance();
                }
                Rule::Blockquote => self.blockquote(&mut lines),
                Rule::CodeFence => self.code_block(&mut lines),
                Rule::Table => self.table(&mut lines),
                Rule::Bullet => {
                    let text = &line.trim()[2..];
                    self.emit(Element::Bullet { text: text.into() });
                    lines.advance();
                }
                Rule::NumberedItem => {
                    let text = RE_NUMBERED.replace(line.trim(), "").into_owned();
                    self.emit(Element::Bullet { text });
                    lines.advance();
                }
                Rule::FlowLabel => self.flow(&mut lines),
                Rule::Label => {
                    self.label(line.trim());
                    lines.advance();
                }
                Rule::Paragraph => {
                    self.emit(Element::paragraph(strip_markup(line.trim())));
                    lines.advance();
                }
            }
        }

        self.stats.warning_count = self.warnings.len() as u32;
        ScanOutput {
            elements: self.elements,
            stats: self.stats,
            warnings: self.warnings,
        }
    }

    fn emit(&mut self, element: Element) {
        self.stats.record(&element);
        self.elements.push(element);
    }

    fn h2(&mut self, title: &str) {
        let decision = self.policy.on_h2(&mut self.state, title);
        if decision.page_break {
            self.emit(Element::PageBreak);
        }
        self.emit(Element::heading(2, title));
    }

    fn h3(&mut self, lines: &mut LineStream<'_>) {
        let Some(line) = lines.next_line() else {
            return;
        };
        let title = heading_text(line, "### ");
        let config = self.config;
        let image = section_number(title).and_then(|section| {
            config
                .images
                .section_map
                .get(section)
                .map(|entry| (section, entry))
        });

        let heading = H3Heading::new(title).with_image(image.is_some());
        let decision = self.policy.on_h3(&mut self.state, &heading);
        if decision.page_break {
            self.emit(Element::PageBreak);
        }
        self.emit(Element::heading(3, title));

        match image {
            Some((section, entry)) => self.image_section(lines, section, entry),
            None => self.state.image_section = None,
        }
    }

    /// Description text, then the image, then an optional diagram fence.
    fn image_section(&mut self, lines: &mut LineStream<'_>, section: &str, entry: &ImageEntry) {
        self.state.image_section = Some(section.to_string());

        while let Some(line) = lines.current() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                lines.advance();
                continue;
            }
            if is_fence(line) || line.starts_with("## ") || line.starts_with("### ") {
                break;
            }
            self.emit(Element::paragraph(trimmed));
            lines.advance();
        }

        let path = self.image_root.join(entry.file());
        if path.exists() {
            let (width, height) = entry.size();
            self.emit(Element::Image(ImageBlock {
                path,
                width,
                height,
                section: Some(section.to_string()),
            }));
        } else {
            self.warnings
                .push(format!("Image file not found: {}", path.display()));
        }

        if lines.current().is_some_and(is_fence) {
            skip_fenced_block(lines);
        }
    }

    fn blockquote(&mut self, lines: &mut LineStream<'_>) {
        let quoted = lines.take_while(|l| l.starts_with("> "));
        let text = quoted
            .iter()
            .map(|l| strip_bold(&l[2..]).trim().to_string())
            .collect::<Vec<_>>()
            .join(" ");

        let attention = self
            .config
            .attention_markers
            .iter()
            .any(|marker| !marker.is_empty() && text.starts_with(marker.as_str()));

        self.emit(if attention {
            Element::WarningBox { text }
        } else {
            Element::InfoBox { text }
        });
        self.emit(Element::spacer(QUOTE_SPACING));
    }

    fn code_block(&mut self, lines: &mut LineStream<'_>) {
        lines.advance();
        let body: Vec<String> = lines
            .take_while(|l| !is_fence(l))
            .into_iter()
            .map(str::to_string)
            .collect();
        lines.advance();

        if body.is_empty() {
            return;
        }

        let kind = code_kind(&body);
        self.emit(Element::CodeBlock { kind, lines: body });
        self.emit(Element::spacer(BLOCK_SPACING));
    }

    fn table(&mut self, lines: &mut LineStream<'_>) {
        let table_lines = lines.take_while(|l| l.trim().starts_with('|'));
        let mut rows = parse_table(&table_lines);
        if rows.len() < 2 {
            log::debug!("table with {} row(s) dropped", rows.len());
            return;
        }

        let headers = rows.remove(0);
        let widths = self.widths.resolve(&headers);
        self.emit(Element::Table(TableBlock::new(headers, widths, rows)));
        self.emit(Element::spacer(BLOCK_SPACING));
    }

    fn flow(&mut self, lines: &mut LineStream<'_>) {
        lines.advance();
        let mut flow: Vec<String> = Vec::new();

        while let Some(line) = lines.current() {
            let current = line.trim();

            if current.is_empty() && !flow.is_empty() && ends_flow_after_blank(lines.peek(1)) {
                break;
            }
            if current.starts_with("####")
                || current.starts_with("### ")
                || current.starts_with("## ")
                || current.starts_with("---")
            {
                break;
            }
            if is_block_label(current) && !current.contains("처리") && !flow.is_empty() {
                break;
            }
            if current.starts_with("**Step")
                || current.starts_with("- ")
                || RE_NUMBERED.is_match(current)
            {
                flow.push(current.to_string());
            }
            lines.advance();
        }

        if !flow.is_empty() {
            self.emit(Element::FlowBox { lines: flow });
            self.emit(Element::spacer(FLOW_SPACING));
        }
    }

    fn label(&mut self, line: &str) {
        let Some(caps) = RE_LABEL.captures(line) else {
            self.emit(Element::paragraph(strip_markup(line)));
            return;
        };
        let label = format!("{}:", &caps[1]);
        let content = caps.get(2).map_or(String::new(), |m| strip_markup(m.as_str()));
        self.emit(Element::LabelText { label, content });
    }
}

/// Scan markdown with a configuration, without shared patterns.
pub fn scan_markdown(text: &str, config: &DocConfig, project_root: &Path) -> ScanOutput {
    Scanner::new(config, project_root).scan(text)
}

fn heading_text<'l>(line: &'l str, prefix: &str) -> &'l str {
    line.strip_prefix(prefix).unwrap_or(line).trim()
}

/// Skip an opening fence, its body and the closing fence.
fn skip_fenced_block(lines: &mut LineStream<'_>) {
    lines.advance();
    lines.take_while(|l| !is_fence(l));
    lines.advance();
}

/// JSON when the first non-blank line opens an object or array.
fn code_kind(body: &[String]) -> CodeKind {
    let first = body
        .iter()
        .map(|l| l.trim())
        .find(|l| !l.is_empty())
        .unwrap_or("");
    if first.starts_with('{') || first.starts_with('[') {
        CodeKind::Json
    } else {
        CodeKind::Syntax
    }
}

/// Whether a blank line inside a flow ends it, judged by the line after it.
fn ends_flow_after_blank(next: Option<&str>) -> bool {
    let Some(next) = next else {
        return true;
    };
    let trimmed = next.trim();
    trimmed.is_empty()
        || trimmed.starts_with("####")
        || trimmed.starts_with("---")
        || (trimmed.starts_with("**") && trimmed.ends_with(":**") && !next.contains("Step"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> ScanOutput {
        scan_markdown(text, &DocConfig::new("doc.md", "out.json"), Path::new("."))
    }

    fn kinds(elements: &[Element]) -> Vec<&'static str> {
        elements.iter().map(Element::kind_name).collect()
    }

    #[test]
    fn test_code_kind() {
        let json = vec!["".to_string(), "  {\"a\": 1}".to_string()];
        assert_eq!(code_kind(&json), CodeKind::Json);
        assert_eq!(code_kind(&["int a;".to_string()]), CodeKind::Syntax);
        assert_eq!(code_kind(&["[1, 2]".to_string()]), CodeKind::Json);
        assert_eq!(code_kind(&["".to_string()]), CodeKind::Syntax);
    }

    #[test]
    fn test_unterminated_fence_consumes_rest() {
        let out = scan("```\nlet a = 1;\n## not a heading");
        assert_eq!(kinds(&out.elements), vec!["code_block", "spacer"]);
        match &out.elements[0] {
            Element::CodeBlock { lines, .. } => assert_eq!(lines.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_empty_fence_emits_nothing() {
        let out = scan("```\n```\n본문");
        assert_eq!(kinds(&out.elements), vec!["paragraph"]);
    }

    #[test]
    fn test_label_and_paragraph() {
        let out = scan("**요청 URL:** `POST /pay` **필수**\n일반 `코드` **강조** 문장");
        assert_eq!(
            out.elements,
            vec![
                Element::LabelText {
                    label: "요청 URL:".into(),
                    content: "POST /pay 필수".into(),
                },
                Element::paragraph("일반 코드 강조 문장"),
            ]
        );
    }

    #[test]
    fn test_numbered_becomes_bullet() {
        let out = scan("1. 첫째\n- 둘째 **굵게**");
        assert_eq!(
            out.elements,
            vec![
                Element::Bullet {
                    text: "첫째".into()
                },
                Element::Bullet {
                    text: "둘째 **굵게**".into()
                },
            ]
        );
    }

    #[test]
    fn test_rule_hits_recorded() {
        let out = scan("## 변경 이력\n\n본문\n---\n");
        assert_eq!(out.stats.rule_count("h2"), 1);
        assert_eq!(out.stats.rule_count("separator"), 2);
        assert_eq!(out.stats.rule_count("paragraph"), 1);
        assert_eq!(out.stats.line_count, 4);
    }
}
