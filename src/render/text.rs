//! Plain text preview backend.

use super::DocumentBuilder;
use crate::config::DocInfo;
use crate::error::Result;
use crate::model::{
    parse_inline, CodeKind, CoverPage, ImageBlock, SpanKind, TableBlock, TextStyle,
};
use crate::theme::Theme;

const DEFAULT_LINE_WIDTH: usize = 72;
const MIN_LINE_WIDTH: usize = 20;
const MAX_LINE_WIDTH: usize = 400;

/// Resolve inline markup to plain text. Code spans keep their backticks.
fn render_inline(text: &str) -> String {
    parse_inline(text)
        .into_iter()
        .map(|span| match span.kind {
            SpanKind::Plain | SpanKind::Bold => span.text,
            SpanKind::Code => format!("`{}`", span.text),
        })
        .collect()
}

/// East Asian wide and fullwidth ranges.
fn is_wide(c: char) -> bool {
    matches!(
        c as u32,
        0x1100..=0x115F
            | 0x2E80..=0x303E
            | 0x3041..=0x33FF
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xA000..=0xA4CF
            | 0xA960..=0xA97F
            | 0xAC00..=0xD7A3
            | 0xF900..=0xFAFF
            | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60
            | 0xFFE0..=0xFFE6
            | 0x20000..=0x3FFFD
    )
}

fn display_width(text: &str) -> usize {
    text.chars().map(|c| if is_wide(c) { 2 } else { 1 }).sum()
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(text));
    format!("{}{}", text, " ".repeat(fill))
}

/// Builder that renders a readable plain-text preview.
#[derive(Debug, Clone)]
pub struct TextBuilder {
    line_width: usize,
    lines: Vec<String>,
}

impl TextBuilder {
    /// Create a builder. The `textWidth` size of the theme sets the rule
    /// width, clamped to 20..=400 columns.
    pub fn new(theme: &Theme) -> Self {
        let line_width = theme
            .size("textWidth")
            .map_or(DEFAULT_LINE_WIDTH, |w| {
                usize::try_from(w).unwrap_or(MAX_LINE_WIDTH)
            })
            .clamp(MIN_LINE_WIDTH, MAX_LINE_WIDTH);
        Self {
            line_width,
            lines: Vec::new(),
        }
    }

    fn rule(&self, c: char) -> String {
        c.to_string().repeat(self.line_width)
    }

    fn blank(&mut self) {
        if self.lines.last().is_some_and(|l| !l.is_empty()) {
            self.lines.push(String::new());
        }
    }

    fn boxed(&mut self, marker: &str, text: &str) {
        self.blank();
        self.lines.push(format!("{} {}", marker, render_inline(text)));
    }
}

impl DocumentBuilder for TextBuilder {
    fn heading(&mut self, level: u8, text: &str) {
        self.blank();
        self.lines.push(text.to_string());
        match level {
            1 => self.lines.push("=".repeat(display_width(text))),
            2 => self.lines.push("-".repeat(display_width(text))),
            _ => {}
        }
    }

    fn text(&mut self, text: &str, style: &TextStyle) {
        if style.spacing_before.is_some() {
            self.blank();
        }
        let text = render_inline(text);
        if style.bold {
            self.lines.push(format!("*{}*", text));
        } else {
            self.lines.push(text);
        }
    }

    fn label_text(&mut self, label: &str, content: &str) {
        if content.is_empty() {
            self.lines.push(label.to_string());
        } else {
            self.lines.push(format!("{} {}", label, content));
        }
    }

    fn bullet(&mut self, text: &str) {
        self.lines.push(format!("  • {}", render_inline(text)));
    }

    fn info_box(&mut self, text: &str) {
        self.boxed("[i]", text);
    }

    fn warning_box(&mut self, text: &str) {
        self.boxed("[!]", text);
    }

    fn flow_box(&mut self, lines: &[String]) {
        self.blank();
        for line in lines {
            self.lines.push(format!("  | {}", render_inline(line)));
        }
    }

    fn page_break(&mut self) {
        self.blank();
        self.lines.push("\u{000C}".to_string());
    }

    fn spacer(&mut self, _before: u32) {
        self.blank();
    }

    fn code_block(&mut self, kind: CodeKind, lines: &[String]) {
        self.blank();
        if kind == CodeKind::Json {
            self.lines.push("    // json".to_string());
        }
        for line in lines {
            self.lines.push(format!("    {}", line));
        }
    }

    fn table(&mut self, table: &TableBlock) {
        let total = table
            .widths
            .iter()
            .map(|w| *w as usize)
            .sum::<usize>()
            .max(1);
        let columns: Vec<usize> = table
            .widths
            .iter()
            .map(|w| ((*w as usize).saturating_mul(self.line_width) / total).max(4))
            .collect();

        let render_row = |cells: &[String]| {
            cells
                .iter()
                .zip(&columns)
                .map(|(cell, width)| pad(cell, *width))
                .collect::<Vec<_>>()
                .join(" ")
                .trim_end()
                .to_string()
        };

        self.blank();
        self.lines.push(render_row(&table.headers));
        self.lines.push(
            columns
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join(" "),
        );
        for row in &table.rows {
            self.lines.push(render_row(row));
        }
    }

    fn image(&mut self, image: &ImageBlock) -> Result<()> {
        self.lines.push(format!(
            "[image {} ({}x{})]",
            image.path.display(),
            image.width,
            image.height
        ));
        Ok(())
    }

    fn cover_page(&mut self, cover: &CoverPage) -> Result<()> {
        self.lines.push(self.rule('='));
        self.lines.push(cover.title.clone());
        if let Some(ref subtitle) = cover.subtitle {
            self.lines.push(subtitle.clone());
        }
        self.lines.push(String::new());
        for field in &cover.fields {
            self.lines.push(format!("{}: {}", field.label, field.value));
        }
        if let Some(ref author) = cover.author {
            self.lines.push(author.clone());
        }
        if let Some(ref logo) = cover.logo {
            self.lines.push(format!("[logo {}]", logo.display()));
        }
        self.lines.push(self.rule('='));
        self.lines.push("\u{000C}".to_string());
        Ok(())
    }

    fn finish(&mut self, _info: &DocInfo) -> Result<Vec<u8>> {
        let mut output = self.lines.join("\n");
        output.push('\n');
        Ok(output.into_bytes())
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CoverField;

    fn finish(builder: &mut TextBuilder) -> String {
        String::from_utf8(builder.finish(&DocInfo::default()).unwrap()).unwrap()
    }

    #[test]
    fn test_inline_resolved() {
        let mut builder = TextBuilder::new(&Theme::new());
        builder.bullet("**필수** 값 `txnId`");
        assert_eq!(finish(&mut builder), "  • 필수 값 `txnId`\n");
    }

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("개요"), 4);
        assert_eq!(display_width("API명"), 5);
        assert_eq!(display_width("요청 → 응답 •"), 13);
        assert_eq!(display_width("ＡＢ"), 4);
    }

    #[test]
    fn test_text_width_clamped() {
        let mut theme = Theme::new();
        theme.sizes.insert("textWidth".into(), u64::MAX.into());
        let mut builder = TextBuilder::new(&theme);
        assert_eq!(builder.line_width, MAX_LINE_WIDTH);
        builder.table(&TableBlock::new(
            vec!["No".into(), "설명".into()],
            vec![u32::MAX, u32::MAX],
            vec![vec!["1".into(), "요청".into()]],
        ));
        let text = finish(&mut builder);
        assert!(text.lines().all(|l| display_width(l) <= MAX_LINE_WIDTH + 1));

        theme.sizes.insert("textWidth".into(), 3.into());
        assert_eq!(TextBuilder::new(&theme).line_width, MIN_LINE_WIDTH);
    }

    #[test]
    fn test_heading_underline() {
        let mut builder = TextBuilder::new(&Theme::new());
        builder.heading(2, "개요");
        assert_eq!(finish(&mut builder), "개요\n----\n");
    }

    #[test]
    fn test_table_layout() {
        let mut theme = Theme::new();
        theme.sizes.insert("textWidth".into(), 40.into());
        let mut builder = TextBuilder::new(&theme);
        builder.table(&TableBlock::new(
            vec!["No".into(), "설명".into()],
            vec![1000, 3000],
            vec![vec!["1".into(), "요청".into()]],
        ));
        let text = finish(&mut builder);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "No         설명");
        assert_eq!(lines[1], format!("{} {}", "-".repeat(10), "-".repeat(30)));
        assert_eq!(lines[2], "1          요청");
    }

    #[test]
    fn test_cover_page() {
        let mut builder = TextBuilder::new(&Theme::new());
        let cover = CoverPage {
            title: "가이드".into(),
            fields: vec![CoverField::new("버전", "v1.0")],
            ..Default::default()
        };
        builder.cover_page(&cover).unwrap();
        let text = finish(&mut builder);
        assert!(text.contains("가이드\n"));
        assert!(text.contains("버전: v1.0"));
        assert!(text.contains('\u{000C}'));
    }
}
