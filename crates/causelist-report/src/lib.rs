//! Paginated PDF rendering of the cause list grid.
//!
//! The presentation contract is fixed: A4, 20 pt margins, a bold title
//! line, four tuned column widths, a colored header row repeated on every
//! page, thin grid lines, and word-wrapped 8 pt cells. Rows with more or
//! fewer than four cells still render; widths are simply not recalculated.

mod layout;

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};
use tracing::info;

pub use layout::{clean_cell, text_width, wrap};

/// Default output file name; overwritten on each run.
pub const DEFAULT_OUTPUT: &str = "cause_list_output.pdf";

const TITLE: &str = "Spl. Court for CBI Cases, Hyderabad - Cause List";

// ISO A4 in points.
const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN: f32 = 20.0;

const TITLE_SIZE: f32 = 14.0;
const TITLE_GAP: f32 = 12.0;

const FONT_SIZE: f32 = 8.0;
const LINE_HEIGHT: f32 = 9.6;
const CELL_PAD: f32 = 3.0;
const HEADER_BOTTOM_PAD: f32 = 8.0;

/// Tuned for (serial no., case no., parties, advocate); in points.
const COLUMN_WIDTHS: [f32; 4] = [43.2, 93.6, 252.0, 108.0];

const HEADER_FILL: (f32, f32, f32) = (0.118, 0.533, 0.898);
const HEADER_TEXT: (f32, f32, f32) = (0.961, 0.961, 0.961);
const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);
const GRID_GREY: f32 = 0.5;
const GRID_WIDTH: f32 = 0.25;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("pdf build failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("pdf write failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;

struct CellLayout {
    lines: Vec<String>,
    width: f32,
}

struct RowLayout {
    cells: Vec<CellLayout>,
    height: f32,
    header: bool,
}

fn column_width(index: usize) -> f32 {
    COLUMN_WIDTHS
        .get(index)
        .copied()
        .unwrap_or(COLUMN_WIDTHS[COLUMN_WIDTHS.len() - 1])
}

fn layout_row(cells: &[String], header: bool) -> RowLayout {
    let laid_out: Vec<CellLayout> = cells
        .iter()
        .enumerate()
        .map(|(index, text)| {
            let width = column_width(index);
            CellLayout {
                lines: layout::wrap(text, width - 2.0 * CELL_PAD, FONT_SIZE),
                width,
            }
        })
        .collect();

    let max_lines = laid_out.iter().map(|cell| cell.lines.len()).max().unwrap_or(1);
    let pad_bottom = if header { HEADER_BOTTOM_PAD } else { CELL_PAD };
    RowLayout {
        cells: laid_out,
        height: max_lines as f32 * LINE_HEIGHT + CELL_PAD + pad_bottom,
        header,
    }
}

/// Content-stream builder for one page.
struct PageOps {
    ops: Vec<Operation>,
}

impl PageOps {
    fn new() -> Self {
        Self { ops: Vec::new() }
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: (f32, f32, f32)) {
        self.ops.push(Operation::new(
            "rg",
            vec![color.0.into(), color.1.into(), color.2.into()],
        ));
        self.ops
            .push(Operation::new("re", vec![x.into(), y.into(), w.into(), h.into()]));
        self.ops.push(Operation::new("f", vec![]));
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ops.push(Operation::new(
            "RG",
            vec![GRID_GREY.into(), GRID_GREY.into(), GRID_GREY.into()],
        ));
        self.ops.push(Operation::new("w", vec![GRID_WIDTH.into()]));
        self.ops
            .push(Operation::new("re", vec![x.into(), y.into(), w.into(), h.into()]));
        self.ops.push(Operation::new("S", vec![]));
    }

    fn text(&mut self, x: f32, y: f32, font: &[u8], size: f32, color: (f32, f32, f32), text: &str) {
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new(
            "Tf",
            vec![Object::Name(font.to_vec()), size.into()],
        ));
        self.ops.push(Operation::new(
            "rg",
            vec![color.0.into(), color.1.into(), color.2.into()],
        ));
        self.ops
            .push(Operation::new("Td", vec![x.into(), y.into()]));
        self.ops.push(Operation::new("Tj", vec![pdf_string(text)]));
        self.ops.push(Operation::new("ET", vec![]));
    }
}

/// Base fonts only speak Latin-1; anything outside it degrades to '?'.
fn pdf_string(text: &str) -> Object {
    let bytes = text
        .chars()
        .map(|c| if (c as u32) < 256 { c as u8 } else { b'?' })
        .collect();
    Object::String(bytes, StringFormat::Literal)
}

fn draw_row(page: &mut PageOps, row: &RowLayout, y_top: f32) {
    let mut x = MARGIN;
    for cell in &row.cells {
        if row.header {
            page.fill_rect(x, y_top - row.height, cell.width, row.height, HEADER_FILL);
        }
        page.stroke_rect(x, y_top - row.height, cell.width, row.height);

        let (font, color): (&[u8], _) = if row.header {
            (b"F2", HEADER_TEXT)
        } else {
            (b"F1", BLACK)
        };
        let mut baseline = y_top - CELL_PAD - FONT_SIZE;
        for line in &cell.lines {
            if !line.is_empty() {
                page.text(x + CELL_PAD, baseline, font, FONT_SIZE, color, line);
            }
            baseline -= LINE_HEIGHT;
        }
        x += cell.width;
    }
}

/// Renders the row-major grid to a PDF at `path`, overwriting any prior
/// file. The first row is treated as the header and repeats after every
/// page break. Reports success or failure; the caller already knows the
/// path.
pub fn render_table<S: AsRef<str>>(rows: &[Vec<S>], path: &Path) -> Result<()> {
    let mut cleaned: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| clean_cell(cell.as_ref())).collect())
        .collect();
    if cleaned.is_empty() {
        // Upstream guarantees a sentinel, but an empty grid must still
        // produce a document.
        cleaned.push(vec!["No Data Found".to_string()]);
    }

    let header = layout_row(&cleaned[0], true);
    let body: Vec<RowLayout> = cleaned[1..]
        .iter()
        .map(|row| layout_row(row, false))
        .collect();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut page = PageOps::new();
    let mut y = PAGE_HEIGHT - MARGIN;

    // Bold centred title, first page only.
    y -= TITLE_SIZE;
    let title_x = ((PAGE_WIDTH - text_width(TITLE, TITLE_SIZE)) / 2.0).max(MARGIN);
    page.text(title_x, y, b"F2", TITLE_SIZE, BLACK, TITLE);
    y -= TITLE_GAP;

    draw_row(&mut page, &header, y);
    y -= header.height;

    for row in &body {
        if y - row.height < MARGIN {
            flush_page(&mut doc, pages_id, resources_id, &mut page, &mut page_ids)?;
            y = PAGE_HEIGHT - MARGIN;
            draw_row(&mut page, &header, y);
            y -= header.height;
        }
        draw_row(&mut page, row, y);
        y -= row.height;
    }
    flush_page(&mut doc, pages_id, resources_id, &mut page, &mut page_ids)?;

    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();
    let count = page_ids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path)?;

    info!(path = %path.display(), pages = count, "cause list pdf written");
    Ok(())
}

fn flush_page(
    doc: &mut Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    page: &mut PageOps,
    page_ids: &mut Vec<ObjectId>,
) -> Result<()> {
    let content = Content {
        operations: std::mem::take(&mut page.ops),
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![
            0f32.into(),
            0f32.into(),
            PAGE_WIDTH.into(),
            PAGE_HEIGHT.into(),
        ],
    });
    page_ids.push(page_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    fn render_to_bytes(table: &[Vec<String>]) -> Vec<u8> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        render_table(table, &path).unwrap();
        std::fs::read(&path).unwrap()
    }

    #[test]
    fn renders_a_small_table() {
        let table = rows(&[
            &["Sr No", "Case No", "Parties", "Advocate"],
            &["1", "CC 12/2025", "State vs A", "B. Rao"],
            &["2", "CC 13/2025", "State vs C", "D. Rao"],
        ]);
        let bytes = render_to_bytes(&table);
        assert!(bytes.starts_with(b"%PDF"));
        // Uncompressed content streams keep the text greppable.
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("Cause List"));
        assert!(text.contains("CC 12/2025"));
    }

    #[test]
    fn view_labels_never_reach_the_document() {
        let table = rows(&[
            &["Sr No", "Case No", "Parties", "Advocate"],
            &["1", "CC 12/2025", "State vs A View", "B. Rao View"],
        ]);
        let bytes = render_to_bytes(&table);
        let text = String::from_utf8_lossy(&bytes);
        assert!(!text.contains("View"));
        assert!(text.contains("B. Rao"));
    }

    #[test]
    fn sentinel_table_renders_one_row() {
        let table = rows(&[&["No Data Found"]]);
        let bytes = render_to_bytes(&table);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("Data"));
        assert!(text.contains("Found"));
    }

    #[test]
    fn ragged_rows_do_not_fail() {
        let table = rows(&[
            &["A", "B", "C", "D"],
            &["only one cell"],
            &["1", "2", "3", "4", "5", "6"],
            &[],
        ]);
        let bytes = render_to_bytes(&table);
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_tables_paginate_with_repeated_header() {
        let mut table = rows(&[&["Sr No", "Case No", "Parties", "Advocate"]]);
        for i in 0..200 {
            table.push(vec![
                i.to_string(),
                format!("CC {i}/2025"),
                "State of Telangana vs A Rather Long Set of Party Names".to_string(),
                "Some Advocate".to_string(),
            ]);
        }
        let bytes = render_to_bytes(&table);
        let text = String::from_utf8_lossy(&bytes);
        // More than one page object means more than one header draw.
        assert!(text.matches("MediaBox").count() >= 2);
    }

    #[test]
    fn empty_grid_still_produces_a_document() {
        let table: Vec<Vec<String>> = Vec::new();
        let bytes = render_to_bytes(&table);
        assert!(bytes.starts_with(b"%PDF"));
    }
}
