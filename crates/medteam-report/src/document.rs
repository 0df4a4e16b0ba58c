//! Block-level document model and the lopdf writer

use crate::error::Result;
use crate::text::{encode_win_ansi, sanitize, strip_inline_markdown, wrap, Face};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::path::Path;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 56.0;
const FOOTER_Y: f32 = 30.0;
const LEADING: f32 = 1.4;

const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 14.0;
const SUBHEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.5;
const FOOTER_SIZE: f32 = 8.0;
const BULLET_INDENT: f32 = 14.0;

/// One unit of document content
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Section heading
    Heading(String),
    /// Bold line inside a section
    Subheading(String),
    Paragraph(String),
    Bullet(String),
    /// Vertical gap of one body line
    Spacer,
}

/// A text line placed on a page
#[derive(Debug, Clone)]
struct Line {
    face: Face,
    size: f32,
    x: f32,
    y: f32,
    text: String,
}

/// Builder for a paginated text document.
///
/// ```rust,ignore
/// let bytes = ReportDocument::new("Case Report")
///     .heading("History")
///     .paragraph("Patient reports chest pain")
///     .to_pdf_bytes()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReportDocument {
    title: String,
    blocks: Vec<Block>,
}

impl ReportDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn heading(mut self, text: impl Into<String>) -> Self {
        self.blocks.push(Block::Heading(text.into()));
        self
    }

    pub fn paragraph(mut self, text: impl Into<String>) -> Self {
        self.blocks.push(Block::Paragraph(text.into()));
        self
    }

    pub fn spacer(mut self) -> Self {
        self.blocks.push(Block::Spacer);
        self
    }

    /// Append model output, flattening light Markdown.
    ///
    /// `#` headings and lines wrapped in `**` become subheadings, `-`, `*`
    /// and `•` items become bullets, blank lines become spacers. Emphasis
    /// and code markers are dropped.
    pub fn markdown(mut self, text: &str) -> Self {
        let mut pending_gap = false;
        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() {
                pending_gap = true;
                continue;
            }
            if pending_gap {
                if !matches!(self.blocks.last(), None | Some(Block::Spacer | Block::Heading(_))) {
                    self.blocks.push(Block::Spacer);
                }
                pending_gap = false;
            }
            self.blocks.push(markdown_block(line));
        }
        self
    }

    /// Serialize to PDF bytes
    pub fn to_pdf_bytes(&self) -> Result<Vec<u8>> {
        let mut doc = self.build()?;
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        tracing::debug!(
            title = %self.title,
            blocks = self.blocks.len(),
            bytes = bytes.len(),
            "Rendered PDF"
        );
        Ok(bytes)
    }

    /// Serialize and write to `path`
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let bytes = self.to_pdf_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Lay out every block into pages of positioned lines
    fn layout(&self) -> Vec<Vec<Line>> {
        let mut pager = Pager::new();
        let width = PAGE_WIDTH - 2.0 * MARGIN;

        pager.text(&sanitize(&self.title), Face::Bold, TITLE_SIZE, MARGIN, width);
        pager.gap(BODY_SIZE);

        for block in &self.blocks {
            match block {
                Block::Heading(text) => {
                    pager.gap(BODY_SIZE * 0.8);
                    pager.keep_with_next(HEADING_SIZE, BODY_SIZE);
                    pager.text(&sanitize(text), Face::Bold, HEADING_SIZE, MARGIN, width);
                    pager.gap(BODY_SIZE * 0.3);
                }
                Block::Subheading(text) => {
                    pager.keep_with_next(SUBHEADING_SIZE, BODY_SIZE);
                    pager.text(&sanitize(text), Face::Bold, SUBHEADING_SIZE, MARGIN, width);
                }
                Block::Paragraph(text) => {
                    pager.text(&sanitize(text), Face::Regular, BODY_SIZE, MARGIN, width);
                }
                Block::Bullet(text) => {
                    let marker_x = MARGIN + BULLET_INDENT / 3.0;
                    let text_x = MARGIN + BULLET_INDENT;
                    pager.bullet(&sanitize(text), marker_x, text_x, width - BULLET_INDENT);
                }
                Block::Spacer => pager.gap(BODY_SIZE),
            }
        }

        pager.finish()
    }

    fn build(&self) -> Result<Document> {
        let pages = self.layout();
        let total = pages.len();

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let regular = doc.add_object(font_dictionary(Face::Regular));
        let bold = doc.add_object(font_dictionary(Face::Bold));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                Face::Regular.resource() => regular,
                Face::Bold.resource() => bold,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(total);
        for (index, lines) in pages.iter().enumerate() {
            let mut operations = Vec::new();
            for line in lines {
                push_text(&mut operations, line);
            }
            let footer = format!("Page {} of {}", index + 1, total);
            let footer_width = Face::Regular.text_width(&footer, FOOTER_SIZE);
            push_text(
                &mut operations,
                &Line {
                    face: Face::Regular,
                    size: FOOTER_SIZE,
                    x: (PAGE_WIDTH - footer_width) / 2.0,
                    y: FOOTER_Y,
                    text: footer,
                },
            );

            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => total as i64,
            }),
        );
        let catalog_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(encode_win_ansi(&sanitize(&self.title))),
            "Producer" => Object::string_literal("medteam"),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        Ok(doc)
    }
}

fn markdown_block(line: &str) -> Block {
    if line.starts_with('#') {
        let text = line.trim_start_matches('#').trim();
        return Block::Subheading(strip_inline_markdown(text));
    }
    for marker in ["- ", "* ", "• ", "+ "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Block::Bullet(strip_inline_markdown(rest.trim()));
        }
    }
    if line.len() > 4 && line.starts_with("**") && line.ends_with("**") {
        return Block::Subheading(strip_inline_markdown(line));
    }
    Block::Paragraph(strip_inline_markdown(line))
}

fn font_dictionary(face: Face) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => face.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

/// One BT/ET block per line so extracted text keeps its line breaks
fn push_text(operations: &mut Vec<Operation>, line: &Line) {
    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new(
        "Tf",
        vec![line.face.resource().into(), line.size.into()],
    ));
    operations.push(Operation::new("Td", vec![line.x.into(), line.y.into()]));
    operations.push(Operation::new(
        "Tj",
        vec![Object::string_literal(encode_win_ansi(&line.text))],
    ));
    operations.push(Operation::new("ET", vec![]));
}

/// Tracks the cursor and starts new pages when the bottom margin is reached
struct Pager {
    pages: Vec<Vec<Line>>,
    current: Vec<Line>,
    y: f32,
}

impl Pager {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn at_top(&self) -> bool {
        self.current.is_empty()
    }

    /// Advance for a line of `size`, breaking the page when needed
    fn advance(&mut self, size: f32) -> f32 {
        let step = size * LEADING;
        if self.y - step < MARGIN && !self.at_top() {
            self.new_page();
        }
        self.y -= step;
        self.y
    }

    fn gap(&mut self, size: f32) {
        if !self.at_top() {
            self.y -= size;
        }
    }

    /// Break before a heading that would be stranded at the page bottom
    fn keep_with_next(&mut self, size: f32, next: f32) {
        if self.y - size * LEADING - next * LEADING < MARGIN && !self.at_top() {
            self.new_page();
        }
    }

    fn place(&mut self, face: Face, size: f32, x: f32, text: String) {
        let y = self.advance(size);
        self.current.push(Line {
            face,
            size,
            x,
            y,
            text,
        });
    }

    fn text(&mut self, text: &str, face: Face, size: f32, x: f32, width: f32) {
        for line in wrap(text, face, size, width) {
            self.place(face, size, x, line);
        }
    }

    fn bullet(&mut self, text: &str, marker_x: f32, text_x: f32, width: f32) {
        for (i, line) in wrap(text, Face::Regular, BODY_SIZE, width).into_iter().enumerate() {
            let y = self.advance(BODY_SIZE);
            if i == 0 {
                self.current.push(Line {
                    face: Face::Regular,
                    size: BODY_SIZE,
                    x: marker_x,
                    y,
                    text: "•".to_string(),
                });
            }
            self.current.push(Line {
                face: Face::Regular,
                size: BODY_SIZE,
                x: text_x,
                y,
                text: line,
            });
        }
    }

    fn finish(mut self) -> Vec<Vec<Line>> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}
