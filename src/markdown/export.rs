//! Standalone HTML export of a rendered lesson
//!
//! Writes the same [`LessonDocument`] the viewer shows, so heading anchors
//! match the outline ids and code blocks carry the viewer's highlighting.

use super::highlight::{CodeHighlighter, CodeSpan};
use super::render::{Block, LessonDocument, ListItem, StyledText, TableAlignment};
use crate::error::ExportError;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Options for HTML export
#[derive(Debug, Clone)]
pub struct HtmlExportOptions {
    /// Document title
    pub title: Option<String>,
    /// Use dark mode styles
    pub dark_mode: bool,
    /// Include the outline of levels 1-3 at the top
    pub include_toc: bool,
}

impl Default for HtmlExportOptions {
    fn default() -> Self {
        Self {
            title: None,
            dark_mode: false,
            include_toc: true,
        }
    }
}

/// HTML exporter for lesson documents
#[derive(Debug, Clone)]
pub struct HtmlExporter {
    highlighter: CodeHighlighter,
}

impl HtmlExporter {
    pub fn new(highlighter: CodeHighlighter) -> Self {
        Self { highlighter }
    }

    /// Render a full HTML page
    pub fn export_html(&self, document: &LessonDocument, options: &HtmlExportOptions) -> String {
        let title = options
            .title
            .as_deref()
            .or_else(|| document.title())
            .unwrap_or("Lesson");

        let mut body = String::new();
        if options.include_toc {
            write_toc(&mut body, document);
        }
        for block in &document.blocks {
            self.write_block(&mut body, block);
        }

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="Cosmic Lessons">
    <title>{}</title>
    {}
</head>
<body>
    <article class="lesson">
{}
    </article>
</body>
</html>"#,
            escape_html(title),
            styles(options.dark_mode),
            body
        )
    }

    /// Render and write to `output_path`
    pub fn export_html_file(
        &self,
        document: &LessonDocument,
        output_path: &Path,
        options: &HtmlExportOptions,
    ) -> ExportResult<()> {
        if document.blocks.is_empty() {
            return Err(ExportError::NothingToExport);
        }
        let html = self.export_html(document, options);
        std::fs::write(output_path, html).map_err(|source| ExportError::Write {
            path: output_path.to_path_buf(),
            source,
        })?;
        log::info!("Exported lesson to {}", output_path.display());
        Ok(())
    }

    fn write_block(&self, out: &mut String, block: &Block) {
        match block {
            Block::Paragraph(spans) => {
                out.push_str("<p>");
                write_spans(out, spans);
                out.push_str("</p>\n");
            }
            Block::Heading { id, level, content } => {
                let _ = write!(out, "<h{} id=\"{}\">", level, escape_html(&id.slug));
                write_spans(out, content);
                let _ = writeln!(out, "</h{}>", level);
            }
            Block::CodeBlock { language, code, .. } => {
                let highlighted = self.highlighter.highlight(language.as_deref(), code);
                match language {
                    Some(lang) => {
                        let _ = write!(
                            out,
                            "<pre><code class=\"language-{}\">",
                            escape_html(lang)
                        );
                    }
                    None => out.push_str("<pre><code>"),
                }
                for line in &highlighted.lines {
                    write_code_line(out, line);
                    out.push('\n');
                }
                out.push_str("</code></pre>\n");
            }
            Block::Blockquote(children) => {
                out.push_str("<blockquote>\n");
                for child in children {
                    self.write_block(out, child);
                }
                out.push_str("</blockquote>\n");
            }
            Block::UnorderedList(items) => {
                out.push_str("<ul>\n");
                self.write_items(out, items);
                out.push_str("</ul>\n");
            }
            Block::OrderedList { start, items } => {
                let _ = writeln!(out, "<ol start=\"{}\">", start);
                self.write_items(out, items);
                out.push_str("</ol>\n");
            }
            Block::Table {
                headers,
                rows,
                alignments,
            } => {
                out.push_str("<table>\n<thead><tr>");
                for (i, cell) in headers.iter().enumerate() {
                    write_cell(out, "th", cell, alignments.get(i).copied());
                }
                out.push_str("</tr></thead>\n<tbody>\n");
                for row in rows {
                    out.push_str("<tr>");
                    for (i, cell) in row.iter().enumerate() {
                        write_cell(out, "td", cell, alignments.get(i).copied());
                    }
                    out.push_str("</tr>\n");
                }
                out.push_str("</tbody>\n</table>\n");
            }
            Block::HorizontalRule => out.push_str("<hr>\n"),
            Block::Html(html) => out.push_str(html),
            Block::FootnoteDefinition { label, content } => {
                let _ = write!(
                    out,
                    "<div class=\"footnote\" id=\"fn-{}\"><sup>{}</sup>",
                    escape_html(label),
                    escape_html(label)
                );
                for child in content {
                    self.write_block(out, child);
                }
                out.push_str("</div>\n");
            }
        }
    }

    fn write_items(&self, out: &mut String, items: &[ListItem]) {
        for item in items {
            out.push_str("<li>");
            if let Some(checked) = item.task {
                out.push_str(if checked {
                    "<input type=\"checkbox\" checked disabled> "
                } else {
                    "<input type=\"checkbox\" disabled> "
                });
            }
            for child in &item.content {
                self.write_block(out, child);
            }
            out.push_str("</li>\n");
        }
    }
}

impl Default for HtmlExporter {
    fn default() -> Self {
        Self::new(CodeHighlighter::default())
    }
}

/// Suggested output file next to the lesson, or in `fallback_dir` for remote lessons
pub fn suggest_output_path(lesson: &Path, fallback_dir: &Path) -> PathBuf {
    let stem = lesson
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("lesson");
    let dir = match lesson.parent() {
        Some(parent) if parent.is_dir() => parent,
        _ => fallback_dir,
    };
    dir.join(format!("{}.html", stem))
}

fn write_toc(out: &mut String, document: &LessonDocument) {
    let entries: Vec<_> = document.headings.iter().filter(|h| h.level <= 3).collect();
    if entries.is_empty() {
        return;
    }
    out.push_str("<nav class=\"toc\">\n<ul>\n");
    for heading in entries {
        let _ = writeln!(
            out,
            "<li class=\"toc-h{}\"><a href=\"#{}\">{}</a></li>",
            heading.level,
            escape_html(&heading.id.slug),
            escape_html(&heading.text)
        );
    }
    out.push_str("</ul>\n</nav>\n");
}

fn write_spans(out: &mut String, spans: &[StyledText]) {
    for span in spans {
        let mut text = escape_html(&span.text).replace('\n', "<br>");
        if span.code {
            text = format!("<code>{}</code>", text);
        }
        if span.bold {
            text = format!("<strong>{}</strong>", text);
        }
        if span.italic {
            text = format!("<em>{}</em>", text);
        }
        if span.strikethrough {
            text = format!("<del>{}</del>", text);
        }
        match &span.link {
            Some(url) => {
                let _ = write!(out, "<a href=\"{}\">{}</a>", escape_html(url), text);
            }
            None => out.push_str(&text),
        }
    }
}

fn write_cell(out: &mut String, tag: &str, cell: &[StyledText], alignment: Option<TableAlignment>) {
    let align = match alignment {
        Some(TableAlignment::Left) => " style=\"text-align:left\"",
        Some(TableAlignment::Center) => " style=\"text-align:center\"",
        Some(TableAlignment::Right) => " style=\"text-align:right\"",
        _ => "",
    };
    let _ = write!(out, "<{}{}>", tag, align);
    write_spans(out, cell);
    let _ = write!(out, "</{}>", tag);
}

fn write_code_line(out: &mut String, line: &[CodeSpan]) {
    for span in line {
        let text = escape_html(&span.text);
        match span.color {
            Some([r, g, b]) => {
                let mut style = format!("color:#{:02x}{:02x}{:02x}", r, g, b);
                if span.bold {
                    style.push_str(";font-weight:bold");
                }
                if span.italic {
                    style.push_str(";font-style:italic");
                }
                let _ = write!(out, "<span style=\"{}\">{}</span>", style, text);
            }
            None => out.push_str(&text),
        }
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn styles(dark_mode: bool) -> String {
    let palette = if dark_mode {
        ":root { --bg: #0d1117; --text: #c9d1d9; --link: #58a6ff; --code-bg: #161b22; --border: #30363d; --muted: #8b949e; }"
    } else {
        ":root { --bg: #ffffff; --text: #24292e; --link: #0366d6; --code-bg: #f6f8fa; --border: #e1e4e8; --muted: #6a737d; }"
    };

    format!(
        r#"<style>
        {}
        body {{
            font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif;
            line-height: 1.6;
            color: var(--text);
            background: var(--bg);
            max-width: 860px;
            margin: 0 auto;
            padding: 2rem;
        }}
        h1, h2 {{ border-bottom: 1px solid var(--border); padding-bottom: .3em; }}
        a {{ color: var(--link); text-decoration: none; }}
        code {{ background: var(--code-bg); padding: .2em .4em; border-radius: 6px; font-size: 85%; }}
        pre {{ background: var(--code-bg); padding: 16px; overflow: auto; border-radius: 6px; }}
        pre code {{ background: transparent; padding: 0; font-size: 100%; }}
        blockquote {{ margin: 16px 0; padding: 0 1em; color: var(--muted); border-left: .25em solid var(--border); }}
        table {{ border-collapse: collapse; }}
        th, td {{ padding: 6px 13px; border: 1px solid var(--border); }}
        .toc {{ background: var(--code-bg); padding: 12px 20px; border-radius: 6px; margin-bottom: 24px; }}
        .toc ul {{ list-style: none; margin: 0; padding: 0; }}
        .toc-h2 {{ padding-left: 1em; }}
        .toc-h3 {{ padding-left: 2em; }}
        .footnote {{ font-size: .9em; color: var(--muted); }}
    </style>"#,
        palette
    )
}
