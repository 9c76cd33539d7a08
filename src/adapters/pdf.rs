//! Plain-text PDF export.
//!
//! One font, one size. Text is word-wrapped by measured Helvetica glyph widths
//! and flows onto new pages when a page is full. The built-in Helvetica only
//! covers WinAnsi, so text with other characters is refused rather than
//! silently thinned out.

use crate::core::DocumentRenderer;
use crate::utils::error::{PlannerError, Result};
use printpdf::{BuiltinFont, Mm, PdfDocument};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const MM_PER_POINT: f32 = 25.4 / 72.0;

/// Glyph widths of Helvetica for ASCII 0x20..=0x7E, in 1/1000 em (Adobe AFM).
#[rustfmt::skip]
const HELVETICA_ASCII_WIDTHS: [u32; 95] = [
    278, 278, 355, 556, 556, 889, 667, 222, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,      // 'p'..'~'
];

// No Helvetica glyph is wider than one em.
const WIDEST_GLYPH: u32 = 1000;

/// Characters WinAnsiEncoding maps into 0x80..=0x9F.
const WIN_ANSI_EXTRAS: &str = "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ";

/// Advance width of `c` in 1/1000 em. Non-ASCII glyphs are taken as the widest.
pub fn helvetica_width(c: char) -> u32 {
    match c {
        ' '..='~' => HELVETICA_ASCII_WIDTHS[c as usize - 0x20],
        _ => WIDEST_GLYPH,
    }
}

/// Whether the built-in fonts can draw `c`.
pub fn is_win_ansi(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{A0}'..='\u{FF}') || WIN_ANSI_EXTRAS.contains(c)
}

#[derive(Debug, Clone)]
pub struct PdfRenderer {
    font_size: f32,
    line_height_mm: f32,
    lines_per_page: usize,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            line_height_mm: 10.0,
            lines_per_page: 27,
        }
    }
}

impl PdfRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Usable line width, in the same 1/1000 em units as `helvetica_width`.
    fn max_line_units(&self) -> u32 {
        let text_width_mm = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
        (text_width_mm / (self.font_size * MM_PER_POINT) * 1000.0) as u32
    }

    /// Printed width of `line` in millimetres.
    pub fn line_width_mm(&self, line: &str) -> f32 {
        let units: u32 = line.chars().map(helvetica_width).sum();
        units as f32 / 1000.0 * self.font_size * MM_PER_POINT
    }

    /// Splits `text` into pages of wrapped lines.
    pub fn layout(&self, text: &str) -> Vec<Vec<String>> {
        paginate(
            wrap_text(text, self.max_line_units(), helvetica_width),
            self.lines_per_page,
        )
    }
}

/// Lists every distinct character the built-in font cannot draw.
fn unencodable_chars(text: &str) -> Vec<char> {
    let mut found: Vec<char> = Vec::new();
    for c in text.chars() {
        if !c.is_whitespace() && !is_win_ansi(c) && !found.contains(&c) {
            found.push(c);
        }
    }
    found
}

impl DocumentRenderer for PdfRenderer {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    fn render(&self, title: &str, text: &str) -> Result<Vec<u8>> {
        let unsupported = unencodable_chars(text);
        if !unsupported.is_empty() {
            let listed: Vec<String> = unsupported
                .iter()
                .map(|c| format!("'{}' (U+{:04X})", c, *c as u32))
                .collect();
            return Err(PlannerError::render(format!(
                "the PDF font cannot encode {}",
                listed.join(", ")
            )));
        }

        let pages = self.layout(text);

        let (doc, first_page, first_layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Page 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| PlannerError::render(format!("font setup failed: {:?}", e)))?;

        for (index, lines) in pages.iter().enumerate() {
            let (page, layer) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(
                    Mm(PAGE_WIDTH_MM),
                    Mm(PAGE_HEIGHT_MM),
                    format!("Page {}", index + 1),
                )
            };
            let layer = doc.get_page(page).get_layer(layer);

            let mut y = PAGE_HEIGHT_MM - MARGIN_MM - self.line_height_mm / 2.0;
            for line in lines {
                if !line.is_empty() {
                    layer.use_text(line.as_str(), self.font_size, Mm(MARGIN_MM), Mm(y), &font);
                }
                y -= self.line_height_mm;
            }
        }

        tracing::debug!("Rendered PDF with {} page(s)", pages.len());
        doc.save_to_bytes()
            .map_err(|e| PlannerError::render(format!("PDF serialization failed: {:?}", e)))
    }
}

/// Greedy word wrap by measured width. Blank lines survive; words wider than
/// `max_width` are split.
pub fn wrap_text<F>(text: &str, max_width: u32, width_of: F) -> Vec<String>
where
    F: Fn(char) -> u32,
{
    let space = width_of(' ');
    let mut lines = Vec::new();

    for raw_line in text.lines() {
        let raw_line = raw_line.replace('\t', "    ");
        let mut current = String::new();
        let mut current_width = 0;

        for word in raw_line.split_whitespace() {
            for piece in split_word(word, max_width, &width_of) {
                let piece_width: u32 = piece.chars().map(&width_of).sum();

                if !current.is_empty() && current_width + space + piece_width > max_width {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                if !current.is_empty() {
                    current.push(' ');
                    current_width += space;
                }
                current.push_str(&piece);
                current_width += piece_width;
            }
        }

        lines.push(current);
    }

    lines
}

// Every piece holds at least one char, so a single over-wide glyph still advances.
fn split_word<F>(word: &str, max_width: u32, width_of: &F) -> Vec<String>
where
    F: Fn(char) -> u32,
{
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut piece_width = 0;

    for c in word.chars() {
        let w = width_of(c);
        if !piece.is_empty() && piece_width + w > max_width {
            pieces.push(std::mem::take(&mut piece));
            piece_width = 0;
        }
        piece.push(c);
        piece_width += w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

/// Chunks lines into pages. Always yields at least one (possibly empty) page.
pub fn paginate(lines: Vec<String>, lines_per_page: usize) -> Vec<Vec<String>> {
    let lines_per_page = lines_per_page.max(1);
    let mut pages: Vec<Vec<String>> = lines
        .chunks(lines_per_page)
        .map(|chunk| chunk.to_vec())
        .collect();
    if pages.is_empty() {
        pages.push(Vec::new());
    }
    pages
}
