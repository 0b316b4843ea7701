//! Integration tests for the markdown scanner.

use mddocx::config::{ImageEntry, PageBreakOptions};
use mddocx::layout::{resolve_widths, PatternMap};
use mddocx::model::{CodeKind, Element};
use mddocx::scan::{scan_markdown, ScanOutput, BLOCK_SPACING, FLOW_SPACING, QUOTE_SPACING};
use mddocx::DocConfig;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn config() -> DocConfig {
    DocConfig::new("doc.md", "out.json")
}

fn scan(text: &str) -> ScanOutput {
    scan_markdown(text, &config(), Path::new("."))
}

fn kinds(out: &ScanOutput) -> Vec<&'static str> {
    out.elements.iter().map(Element::kind_name).collect()
}

#[test]
fn test_default_page_breaks() {
    let text = "\
## 변경 이력
| 버전 | 날짜 | 변경 내용 |
|---|---|---|
| v1.0 | 2026-01-01 | 최초 작성 |

## 개요
### 1.1 목적
본문
### 1.2 범위
본문
## 상세
";
    let out = scan(text);
    assert_eq!(
        kinds(&out),
        vec![
            "heading",
            "table",
            "spacer",
            "page_break",
            "heading",
            "heading",
            "paragraph",
            "page_break",
            "heading",
            "paragraph",
            "page_break",
            "heading",
        ]
    );
    assert_eq!(out.stats.page_break_count, 3);

    match &out.elements[1] {
        Element::Table(table) => {
            assert_eq!(table.headers, vec!["버전", "날짜", "변경 내용"]);
            assert_eq!(table.widths, vec![2592, 5184, 5184]);
            assert_eq!(table.rows, vec![vec!["v1.0", "2026-01-01", "최초 작성"]]);
        }
        other => panic!("expected table, got {:?}", other),
    }
    assert_eq!(out.elements[2], Element::spacer(BLOCK_SPACING));
}

#[test]
fn test_change_detail_headings() {
    let text = "## 변경 이력\n### v1.1 변경 상세\n### v1.0 변경 상세\n";
    let out = scan(text);
    assert_eq!(out.stats.page_break_count, 0);

    let mut config = config();
    config.page_breaks = PageBreakOptions {
        change_detail_h3_break: true,
        ..Default::default()
    };
    let out = scan_markdown(text, &config, Path::new("."));
    assert_eq!(
        kinds(&out),
        vec!["heading", "heading", "page_break", "heading"]
    );
}

#[test]
fn test_explicit_h3_lists() {
    let text = "## 개요\n### 1.1 a\n### 1.2 b\n### 1.3 c\n";
    let mut config = config();
    config.page_breaks.no_break_h3_sections = vec!["1.2".into()];
    config.page_breaks.default_h3_break = false;
    config.page_breaks.h3_sections = vec!["1.1".into(), "1.3".into()];

    let out = scan_markdown(text, &config, Path::new("."));
    // 1.1 is listed but first under its H2.
    assert_eq!(
        kinds(&out),
        vec!["heading", "heading", "heading", "page_break", "heading"]
    );
}

#[test]
fn test_image_section() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("images")).unwrap();
    fs::write(dir.path().join("images/flow.png"), b"png").unwrap();

    let mut config = config();
    config.images.base_path = Some("images".into());
    config
        .images
        .section_map
        .insert("2.1".into(), ImageEntry::File("flow.png".into()));
    config.images.section_map.insert(
        "2.2".into(),
        ImageEntry::Sized {
            file: "missing.png".into(),
            width: Some(600),
            height: None,
        },
    );

    let text = "\
## 개요
### 2.1 결제 흐름
결제 요청 흐름은 다음과 같다.

```mermaid
graph LR
```
```json
{\"a\": 1}
```
### 2.2 취소 흐름
설명
## 다음
";
    let out = scan_markdown(text, &config, dir.path());
    assert_eq!(
        kinds(&out),
        vec![
            "heading",
            "heading",
            "paragraph",
            "image",
            "page_break",
            "heading",
            "paragraph",
            "page_break",
            "heading",
        ]
    );

    match &out.elements[3] {
        Element::Image(image) => {
            assert_eq!(image.path, dir.path().join("images").join("flow.png"));
            assert_eq!((image.width, image.height), (780, 500));
            assert_eq!(image.section.as_deref(), Some("2.1"));
        }
        other => panic!("expected image, got {:?}", other),
    }

    assert_eq!(out.warnings.len(), 1);
    assert!(out.warnings.iter().any(|w| w.contains("missing.png")));
    assert_eq!(out.stats.code_block_count, 0);
}

#[test]
fn test_flow_box() {
    let text = "\
**결제 처리 흐름:**
**Step 1:** 요청 수신
- 검증
설명 문장은 무시
2. 응답

**응답 예시:**
본문
";
    let out = scan(text);
    assert_eq!(
        out.elements,
        vec![
            Element::FlowBox {
                lines: vec![
                    "**Step 1:** 요청 수신".into(),
                    "- 검증".into(),
                    "2. 응답".into(),
                ],
            },
            Element::spacer(FLOW_SPACING),
            Element::LabelText {
                label: "응답 예시:".into(),
                content: String::new(),
            },
            Element::paragraph("본문"),
        ]
    );
}

#[test]
fn test_flow_box_ends_at_new_label() {
    let out = scan("**처리 흐름:**\n1. 하나\n**비고:**\n#### 다음");
    assert_eq!(
        kinds(&out),
        vec!["flow_box", "spacer", "label_text", "heading"]
    );
}

#[test]
fn test_empty_flow_emits_nothing() {
    let out = scan("**처리 흐름:**\n설명만 있음\n## 다음");
    assert_eq!(kinds(&out), vec!["heading"]);
}

#[test]
fn test_blockquotes() {
    let out = scan("> **주의:** 운영 환경에서는\n> 키를 교체한다\n\n> 참고: 테스트 키");
    assert_eq!(
        out.elements,
        vec![
            Element::WarningBox {
                text: "주의: 운영 환경에서는 키를 교체한다".into()
            },
            Element::spacer(QUOTE_SPACING),
            Element::InfoBox {
                text: "참고: 테스트 키".into()
            },
            Element::spacer(QUOTE_SPACING),
        ]
    );
}

#[test]
fn test_custom_attention_markers() {
    let mut config = config();
    config.attention_markers = vec!["WARNING".into()];
    let out = scan_markdown("> WARNING: x\n\n> 주의: y", &config, Path::new("."));
    assert!(matches!(out.elements[0], Element::WarningBox { .. }));
    assert!(matches!(out.elements[2], Element::InfoBox { .. }));
}

#[test]
fn test_code_block_kinds() {
    let text = "```\n{\n  \"a\": 1\n}\n```\n```java\nint a;\n```\n```text\n{\"a\": 1}\n```\n```plain\nfoo\n```";
    let out = scan(text);
    let code_kinds: Vec<CodeKind> = out
        .elements
        .iter()
        .filter_map(|e| match e {
            Element::CodeBlock { kind, .. } => Some(*kind),
            _ => None,
        })
        .collect();
    // The info string never decides the kind.
    assert_eq!(
        code_kinds,
        vec![CodeKind::Json, CodeKind::Syntax, CodeKind::Json, CodeKind::Syntax]
    );
    assert_eq!(out.stats.code_block_count, 4);
}

#[test]
fn test_headings_strip_bold() {
    let out = scan("#### **필드** 정의\n##### **참고**");
    assert_eq!(out.elements[0], Element::heading(4, "필드 정의"));
    match &out.elements[1] {
        Element::Paragraph { text, style } => {
            assert_eq!(text, "참고");
            assert!(style.bold);
            assert_eq!(style.spacing_before, Some(QUOTE_SPACING));
        }
        other => panic!("expected paragraph, got {:?}", other),
    }
}

#[test]
fn test_document_width_patterns() {
    let mut config = config();
    config
        .table_widths
        .insert("No | API명".into(), vec![1000, 5000, 6960]);
    config.table_widths.insert("항목 | 값".into(), vec![1, 3]);

    let text = "\
| No | API명 | 설명 |
|---|---|---|
| 1 | pay | 결제 |

| 항목 | 값 |
|---|---|
| a | b |
";
    let out = scan_markdown(text, &config, Path::new("."));
    let widths: Vec<Vec<u32>> = out
        .elements
        .iter()
        .filter_map(|e| match e {
            Element::Table(t) => Some(t.widths.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(widths, vec![vec![1000, 5000, 6960], vec![3240, 9720]]);
}

#[test]
fn test_single_row_table_dropped() {
    let out = scan("| a | b |\n|---|---|\n다음");
    assert_eq!(kinds(&out), vec!["paragraph"]);
}

#[test]
fn test_weighted_widths_example() {
    let widths = resolve_widths(&["No", "설명", "API명"], &PatternMap::new(), None, 12960, None);
    assert_eq!(widths, vec![1440, 5760, 5760]);
}

#[test]
fn test_cursor_reaches_end_on_unterminated_constructs() {
    let out = scan("| a | b |\n| 1 | 2 |");
    assert_eq!(kinds(&out), vec!["table", "spacer"]);

    let out = scan("> 인용");
    assert_eq!(kinds(&out), vec!["info_box", "spacer"]);
}
