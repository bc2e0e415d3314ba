//! Paginated PDF formatter.
//!
//! Two passes: `layout` walks the outline with a vertical cursor and places every physical line
//! on a page (plain data, testable on its own), then `render` serializes the placed lines with
//! lopdf using the standard-14 Helvetica faces.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::export::metrics::Face;
use crate::export::outline::{outline, Block, Section};
use crate::export::ExportError;
use crate::models::StructuredDocument;

const MM: f32 = 72.0 / 25.4;

/// Page geometry in points. Cursor positions are measured from the top edge.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub line_height: f32,
    pub title_size: f32,
    pub body_size: f32,
    /// Extra space after a section title.
    pub title_gap: f32,
}

impl Default for PageGeometry {
    /// A4 portrait, 15mm margins, 8mm lines.
    fn default() -> Self {
        Self {
            width: 210.0 * MM,
            height: 297.0 * MM,
            margin: 15.0 * MM,
            line_height: 8.0 * MM,
            title_size: 13.0,
            body_size: 10.0,
            title_gap: 2.0 * MM,
        }
    }
}

impl PageGeometry {
    fn usable_width(&self) -> f32 {
        self.width - self.margin * 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub face: Face,
    pub size: f32,
    pub x: f32,
    /// Baseline, from the top edge of the page.
    pub y: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub lines: Vec<PlacedLine>,
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

struct Cursor<'g> {
    geometry: &'g PageGeometry,
    pages: Vec<PageLayout>,
    y: f32,
}

impl<'g> Cursor<'g> {
    fn new(geometry: &'g PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![PageLayout::default()],
            y: geometry.margin,
        }
    }

    /// Starts a new page when one more line would cross the bottom margin.
    fn ensure_room(&mut self) {
        let g = self.geometry;
        if self.y + g.line_height > g.height - g.margin {
            self.pages.push(PageLayout::default());
            self.y = g.margin;
        }
    }

    fn write(&mut self, text: &str, face: Face, size: f32) {
        let g = self.geometry;
        for line in face.metrics().wrap(text, size, g.usable_width()) {
            self.ensure_room();
            let x = g.margin;
            let y = self.y;
            if let Some(page) = self.pages.last_mut() {
                page.lines.push(PlacedLine {
                    text: line,
                    face,
                    size,
                    x,
                    y,
                });
            }
            self.y += g.line_height;
        }
    }

    fn blank_line(&mut self) {
        self.ensure_room();
        self.y += self.geometry.line_height;
    }

    fn section(&mut self, section: &Section) {
        let g = self.geometry;
        self.write(section.title, Face::HelveticaBold, g.title_size);
        self.y += g.title_gap;

        for block in &section.blocks {
            match block {
                Block::Text(text) | Block::EntryHeading(text) | Block::DateRange(text) => {
                    self.write(text, Face::Helvetica, g.body_size)
                }
                Block::Bullet(item) => {
                    self.write(&format!("\u{2022} {item}"), Face::Helvetica, g.body_size)
                }
                Block::Placeholder(text) => self.write(text, Face::Helvetica, g.body_size),
                Block::Spacer => self.blank_line(),
            }
        }

        self.y += g.line_height;
    }
}

/// Places every line of the document on pages.
pub fn layout(doc: &StructuredDocument, geometry: &PageGeometry) -> Vec<PageLayout> {
    let mut cursor = Cursor::new(geometry);
    for section in outline(doc) {
        cursor.section(&section);
    }
    cursor.pages
}

// ────────────────────────────────────────────────────────────────────────────
// Serialization
// ────────────────────────────────────────────────────────────────────────────

/// Lays out and serializes the document as PDF bytes.
pub fn render(doc: &StructuredDocument) -> Result<Vec<u8>, ExportError> {
    let geometry = PageGeometry::default();
    write_pdf(&layout(doc, &geometry), &geometry)
}

fn write_pdf(pages: &[PageLayout], geometry: &PageGeometry) -> Result<Vec<u8>, ExportError> {
    let mut pdf = Document::with_version("1.5");
    let pages_id = pdf.new_object_id();

    let regular_id = pdf.add_object(font_dictionary(Face::Helvetica));
    let bold_id = pdf.add_object(font_dictionary(Face::HelveticaBold));
    let resources_id = pdf.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let content = Content {
            operations: page_operations(page, geometry),
        };
        let encoded = content
            .encode()
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let content_id = pdf.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(points(geometry.width)),
                Object::Integer(points(geometry.height)),
            ],
        }),
    );
    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    pdf.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    pdf.save_to(&mut bytes)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    Ok(bytes)
}

fn font_dictionary(face: Face) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => face.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn page_operations(page: &PageLayout, geometry: &PageGeometry) -> Vec<Operation> {
    let mut ops = Vec::with_capacity(page.lines.len() * 5);
    for line in &page.lines {
        let font = match line.face {
            Face::Helvetica => "F1",
            Face::HelveticaBold => "F2",
        };
        // PDF user space grows upward from the bottom edge.
        let baseline = geometry.height - line.y;
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![font.into(), points(line.size).into()],
        ));
        ops.push(Operation::new(
            "Td",
            vec![points(line.x).into(), points(baseline).into()],
        ));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(win_ansi(&line.text))],
        ));
        ops.push(Operation::new("ET", vec![]));
    }
    ops
}

fn points(value: f32) -> i64 {
    value.round() as i64
}

/// Encodes text for a WinAnsi simple font. Unmappable characters become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2026}' => 0x85,
            '\u{20ac}' => 0x80,
            _ => b'?',
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
