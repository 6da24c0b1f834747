//! Page layout primitives.
//!
//! Coordinates are layout units measured from the top-left corner of the page.
//! Every block goes through [`Layout::ensure_space`] before it is placed, so a
//! block is never split across two pages.

use serde::Serialize;

/// Placeholder written for an empty labeled value.
pub const BLANK: &str = "____________________";
/// Height reserved by every signature block.
pub const SIGNATURE_BLOCK_HEIGHT: f64 = 25.0;

pub const BODY_FONT_SIZE: f64 = 10.0;
pub const HEADING_FONT_SIZE: f64 = 11.0;
pub const TITLE_FONT_SIZE: f64 = 16.0;

const SIGNATURE_RULE_WIDTH: f64 = 70.0;
const DATE_RULE_OFFSET: f64 = 95.0;
const DATE_RULE_WIDTH: f64 = 50.0;

/// Fixed page geometry, in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub line_height: f64,
    /// Average glyph advance used for wrapping.
    pub char_width: f64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            margin_top: 20.0,
            margin_bottom: 27.0,
            margin_left: 20.0,
            margin_right: 20.0,
            line_height: 6.0,
            char_width: 2.0,
        }
    }
}

impl PageGeometry {
    pub fn content_width(&self) -> f64 {
        self.width - self.margin_left - self.margin_right
    }

    /// Characters per full-width line.
    pub fn columns(&self) -> usize {
        ((self.content_width() / self.char_width).floor() as usize).max(1)
    }

    /// Lowest y a block may reach.
    pub fn page_bottom(&self) -> f64 {
        self.height - self.margin_bottom
    }

    pub fn body_height(&self) -> f64 {
        self.page_bottom() - self.margin_top
    }

    /// Whether a full body fits at least a signature block and a few lines.
    pub fn is_usable(&self) -> bool {
        self.char_width > 0.0
            && self.line_height > 0.0
            && self.content_width() >= DATE_RULE_OFFSET + DATE_RULE_WIDTH
            && self.body_height() >= SIGNATURE_BLOCK_HEIGHT.max(self.line_height * 4.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    Title,
    Heading,
    Paragraph,
    Field,
    Signature,
    BlankLine,
    Rule,
}

/// Where a block ended up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedBlock {
    pub kind: BlockKind,
    pub top: f64,
    pub height: f64,
}

/// Drawing primitive inside a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Element {
    /// `y` is the text baseline.
    Text {
        x: f64,
        y: f64,
        size: f64,
        bold: bool,
        text: String,
    },
    Line { x1: f64, x2: f64, y: f64 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub number: usize,
    pub blocks: Vec<PlacedBlock>,
    pub elements: Vec<Element>,
}

impl Page {
    fn new(number: usize) -> Self {
        Self {
            number,
            ..Default::default()
        }
    }

    /// All text on the page, one element per line.
    pub fn text_lines(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text { text, .. } => Some(text.as_str()),
            Element::Line { .. } => None,
        })
    }
}

/// One line of a multi-line text block.
#[derive(Debug, Clone, PartialEq)]
struct Line {
    text: String,
    bold: bool,
    indent: f64,
    /// Bold text drawn at the left margin on the same baseline.
    lead: Option<String>,
}

impl Line {
    fn plain(text: String) -> Self {
        Self {
            text,
            bold: false,
            indent: 0.0,
            lead: None,
        }
    }

    fn bold(text: String) -> Self {
        Self {
            bold: true,
            ..Self::plain(text)
        }
    }

    fn indented(text: String, indent: f64) -> Self {
        Self {
            indent,
            ..Self::plain(text)
        }
    }
}

/// Cursor-driven page builder.
#[derive(Debug)]
pub struct Layout {
    geometry: PageGeometry,
    done: Vec<Page>,
    current: Page,
    cursor_y: f64,
}

impl Layout {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            done: Vec::new(),
            current: Page::new(1),
            cursor_y: geometry.margin_top,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn cursor_y(&self) -> f64 {
        self.cursor_y
    }

    pub fn page_count(&self) -> usize {
        self.done.len() + 1
    }

    /// Start a new page when a block of `height` would cross the bottom margin.
    ///
    /// A block already at the top of a page stays there.
    pub fn ensure_space(&mut self, height: f64) {
        let at_top = self.cursor_y <= self.geometry.margin_top;
        if !at_top && self.cursor_y + height > self.geometry.page_bottom() {
            self.new_page();
        }
    }

    pub fn new_page(&mut self) {
        let number = self.page_count() + 1;
        log::debug!("Layout page break, starting page {}", number);
        let full = std::mem::replace(&mut self.current, Page::new(number));
        self.done.push(full);
        self.cursor_y = self.geometry.margin_top;
    }

    /// Centered bold document title.
    pub fn title(&mut self, text: &str) {
        let g = self.geometry;
        let columns = ((g.columns() as f64) * BODY_FONT_SIZE / TITLE_FONT_SIZE) as usize;
        let advance = g.char_width * TITLE_FONT_SIZE / BODY_FONT_SIZE;
        let lines = wrap_text(text, columns.max(1));
        let line_height = g.line_height * 1.5;
        let height = lines.len() as f64 * line_height + g.line_height;

        self.place(BlockKind::Title, height, |top, elements| {
            for (i, line) in lines.into_iter().enumerate() {
                let width = line.chars().count() as f64 * advance;
                let x = g.margin_left + ((g.content_width() - width) / 2.0).max(0.0);
                elements.push(Element::Text {
                    x,
                    y: top + (i as f64 + 0.75) * line_height,
                    size: TITLE_FONT_SIZE,
                    bold: true,
                    text: line,
                });
            }
        });
    }

    /// Bold section heading with half a line of space above it.
    pub fn heading(&mut self, text: &str) {
        let lines = wrap_text(text, self.geometry.columns())
            .into_iter()
            .map(Line::bold)
            .collect();
        let gap = self.geometry.line_height / 2.0;
        self.lines(BlockKind::Heading, lines, gap, 0.0, HEADING_FONT_SIZE);
    }

    /// Word-wrapped body text. Paragraphs taller than a page become several blocks.
    pub fn paragraph(&mut self, text: &str) {
        let lines = wrap_text(text, self.geometry.columns())
            .into_iter()
            .map(Line::plain)
            .collect();
        let gap = self.geometry.line_height / 2.0;
        self.lines(BlockKind::Paragraph, lines, 0.0, gap, BODY_FONT_SIZE);
    }

    /// `Label: value` on one line, continuation lines aligned under the value.
    ///
    /// Values taller than a page body continue in further blocks; the label is
    /// only drawn on the first line.
    pub fn inline_field(&mut self, label: &str, value: &str) {
        let g = self.geometry;
        let label = format!("{}:", label.trim_end_matches(':'));
        let label_chars = label.chars().count() + 1;
        let value_columns = g.columns().saturating_sub(label_chars).max(g.columns() / 3).max(1);
        let indent = label_chars as f64 * g.char_width;

        let mut lines: Vec<Line> = wrap_text(non_blank(value), value_columns)
            .into_iter()
            .map(|text| Line::indented(text, indent))
            .collect();
        if let Some(first) = lines.first_mut() {
            first.lead = Some(label);
        }
        self.lines(BlockKind::Field, lines, 0.0, 0.0, BODY_FONT_SIZE);
    }

    /// Bold label on its own line, wrapped value below it.
    pub fn stacked_field(&mut self, label: &str, value: &str) {
        let indent = self.geometry.char_width * 2.0;
        let mut lines = vec![Line::bold(label.to_string())];
        lines.extend(
            wrap_text(non_blank(value), self.geometry.columns().saturating_sub(2).max(1))
                .into_iter()
                .map(|text| Line::indented(text, indent)),
        );
        let gap = self.geometry.line_height / 2.0;
        self.lines(BlockKind::Field, lines, 0.0, gap, BODY_FONT_SIZE);
    }

    /// Fixed-height signature block.
    ///
    /// Draws the signature rule with `label` beneath it and a date rule to the
    /// right. `date` is printed above the date rule; `signed` adds an on-file
    /// marker above the signature rule.
    pub fn signature(&mut self, label: &str, date: Option<&str>, signed: bool) {
        let g = self.geometry;
        let date = date.map(str::trim).filter(|d| !d.is_empty()).map(str::to_string);
        let label = label.to_string();

        self.place(BlockKind::Signature, SIGNATURE_BLOCK_HEIGHT, |top, elements| {
            let rule_y = top + 12.0;
            let caption_y = rule_y + 5.0;
            let date_x = g.margin_left + DATE_RULE_OFFSET;

            if signed {
                elements.push(Element::Text {
                    x: g.margin_left + 2.0,
                    y: rule_y - 2.0,
                    size: BODY_FONT_SIZE,
                    bold: false,
                    text: "(signature on file)".to_string(),
                });
            }
            if let Some(date) = date {
                elements.push(Element::Text {
                    x: date_x + 2.0,
                    y: rule_y - 2.0,
                    size: BODY_FONT_SIZE,
                    bold: false,
                    text: date,
                });
            }
            elements.push(Element::Line {
                x1: g.margin_left,
                x2: g.margin_left + SIGNATURE_RULE_WIDTH,
                y: rule_y,
            });
            elements.push(Element::Text {
                x: g.margin_left,
                y: caption_y,
                size: BODY_FONT_SIZE,
                bold: false,
                text: label,
            });
            elements.push(Element::Line {
                x1: date_x,
                x2: date_x + DATE_RULE_WIDTH,
                y: rule_y,
            });
            elements.push(Element::Text {
                x: date_x,
                y: caption_y,
                size: BODY_FONT_SIZE,
                bold: false,
                text: "Date".to_string(),
            });
        });
    }

    /// A full-width rule one line tall, for hand-written entries.
    pub fn blank_line(&mut self) {
        let g = self.geometry;
        self.place(BlockKind::BlankLine, g.line_height * 1.5, |top, elements| {
            elements.push(Element::Line {
                x1: g.margin_left,
                x2: g.margin_left + g.content_width(),
                y: top + g.line_height * 1.25,
            });
        });
    }

    /// Thin separator between parts of a document.
    pub fn rule(&mut self) {
        let g = self.geometry;
        self.place(BlockKind::Rule, g.line_height, |top, elements| {
            elements.push(Element::Line {
                x1: g.margin_left,
                x2: g.margin_left + g.content_width(),
                y: top + g.line_height / 2.0,
            });
        });
    }

    pub fn finish(mut self) -> Vec<Page> {
        self.done.push(self.current);
        self.done
    }

    /// Place multi-line text, splitting into page-sized chunks when needed.
    fn lines(&mut self, kind: BlockKind, lines: Vec<Line>, before: f64, after: f64, size: f64) {
        let g = self.geometry;
        let per_chunk = (((g.body_height() - before - after) / g.line_height).floor() as usize).max(1);

        let mut lines = lines;
        while !lines.is_empty() {
            let rest = lines.split_off(per_chunk.min(lines.len()));
            let chunk = std::mem::replace(&mut lines, rest);
            let height = before + chunk.len() as f64 * g.line_height + after;

            self.place(kind, height, |top, elements| {
                for (i, line) in chunk.into_iter().enumerate() {
                    let y = top + before + (i as f64 + 0.75) * g.line_height;
                    if let Some(lead) = line.lead {
                        elements.push(Element::Text {
                            x: g.margin_left,
                            y,
                            size,
                            bold: true,
                            text: lead,
                        });
                    }
                    elements.push(Element::Text {
                        x: g.margin_left + line.indent,
                        y,
                        size,
                        bold: line.bold,
                        text: line.text,
                    });
                }
            });
        }
    }

    fn place<F>(&mut self, kind: BlockKind, height: f64, draw: F)
    where
        F: FnOnce(f64, &mut Vec<Element>),
    {
        self.ensure_space(height);
        let top = self.cursor_y;
        draw(top, &mut self.current.elements);
        self.current.blocks.push(PlacedBlock { kind, top, height });
        self.cursor_y += height;
    }
}

fn non_blank(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() {
        BLANK
    } else {
        value
    }
}

/// Wrap `text` at word boundaries to at most `columns` characters per line.
///
/// Explicit newlines are kept, and words longer than a line are hard-split.
/// Always yields at least one line.
pub fn wrap_text(text: &str, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let mut lines = Vec::new();

    for raw in text.lines() {
        let start = lines.len();
        let mut current = String::new();
        let mut current_len = 0usize;

        for word in raw.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();
            while chars.len() > columns {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = chars.split_off(columns);
                lines.push(chars.into_iter().collect());
                chars = rest;
            }
            if chars.is_empty() {
                continue;
            }

            if current_len == 0 {
                current = chars.iter().collect();
                current_len = chars.len();
            } else if current_len + 1 + chars.len() <= columns {
                current.push(' ');
                current.extend(chars.iter());
                current_len += 1 + chars.len();
            } else {
                lines.push(std::mem::replace(&mut current, chars.iter().collect()));
                current_len = chars.len();
            }
        }

        if current_len > 0 || lines.len() == start {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
