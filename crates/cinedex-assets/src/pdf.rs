//! Single-page PDF rendering for a media record.
//!
//! Built with `printpdf` on the standard Helvetica fonts, so no font files
//! are embedded. Layout, top to bottom:
//!
//! 1. the title, centered, 20pt bold red
//! 2. the type and the year, centered, 14pt grey
//! 3. the poster, at most 500pt wide (any format the decoder reads)
//! 4. the remaining fields as `key: value` lines, 12pt, wrapped
//!
//! Text that runs past the bottom margin is dropped.

use cinedex_types::{fields, MediaRecord};
use printpdf::image_crate::{self, DynamicImage};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfLayerReference, Pt, Rgb,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{AssetError, AssetResult};

/// A4 in points.
pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 40.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const MAX_POSTER_WIDTH: f32 = 500.0;

const HEADER_SIZE: f32 = 20.0;
const SUBTITLE_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 12.0;
const LINE_GAP: f32 = 1.2;

const RED: (f32, f32, f32) = (1.0, 0.0, 0.0);
const GREY: (f32, f32, f32) = (0.502, 0.502, 0.502);
const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    /// Advance width in 1/1000 em. The standard fonts carry no metrics in
    /// `printpdf`, so the Helvetica AFM widths live here.
    fn advance(self, c: char) -> u16 {
        let table = match self {
            Font::Regular => &HELVETICA_WIDTHS,
            Font::Bold => &HELVETICA_BOLD_WIDTHS,
        };
        match c as u32 {
            code @ 32..=126 => table[(code - 32) as usize],
            _ => 556,
        }
    }
}

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Keep what the standard fonts can show: printable ASCII and Latin-1.
/// Other whitespace becomes a space, anything else `?`.
fn printable(text: &str) -> String {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c,
            _ if c.is_whitespace() => ' ',
            _ => '?',
        })
        .collect()
}

fn text_width(text: &str, font: Font, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(font.advance(c))).sum();
    units as f32 * size / 1000.0
}

/// Greedy word wrap. A single word wider than the line is kept whole on its
/// own line.
fn wrap(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split(' ').filter(|w| !w.is_empty()) {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if text_width(&candidate, font, size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_owned()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn pt(value: f32) -> Mm {
    Mm::from(Pt(value))
}

fn rgb((r, g, b): (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

/// Draws onto the single page layer while tracking the vertical cursor.
struct PageBuilder {
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    cursor: f32,
}

impl PageBuilder {
    fn remaining(&self) -> f32 {
        self.cursor - MARGIN
    }

    fn gap(&mut self, points: f32) {
        self.cursor -= points;
    }

    /// Returns false once the line no longer fits on the page.
    fn line(&mut self, text: &str, font: Font, size: f32, color: (f32, f32, f32), centered: bool) -> bool {
        let height = size * LINE_GAP;
        if self.remaining() < height {
            return false;
        }
        self.cursor -= height;
        let x = if centered {
            ((PAGE_WIDTH - text_width(text, font, size)) / 2.0).max(MARGIN)
        } else {
            MARGIN
        };
        let baseline = self.cursor + (height - size);

        let face = match font {
            Font::Regular => &self.regular,
            Font::Bold => &self.bold,
        };
        self.layer.set_fill_color(rgb(color));
        self.layer.use_text(text, size, pt(x), pt(baseline), face);
        true
    }

    fn paragraph(&mut self, text: &str, font: Font, size: f32, color: (f32, f32, f32), centered: bool) -> bool {
        wrap(&printable(text), font, size, CONTENT_WIDTH)
            .iter()
            .all(|line| self.line(line, font, size, color, centered))
    }

    /// Place `poster` centered under the cursor, 500pt wide or shrunk to the
    /// space left. Returns false when there is no room at all.
    fn image(&mut self, poster: &DynamicImage) -> bool {
        let available = self.remaining();
        if available <= 0.0 {
            return false;
        }
        let natural_width = poster.width() as f32;
        let natural_height = poster.height() as f32;
        let mut width = MAX_POSTER_WIDTH;
        let mut height = natural_height * width / natural_width;
        if height > available {
            height = available;
            width = natural_width * height / natural_height;
        }
        self.cursor -= height;
        let x = (PAGE_WIDTH - width) / 2.0;

        // At 72 dpi one pixel is one point, so the scale is target / natural.
        Image::from_dynamic_image(poster).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(pt(x)),
                translate_y: Some(pt(self.cursor)),
                scale_x: Some(width / natural_width),
                scale_y: Some(height / natural_height),
                dpi: Some(72.0),
                ..Default::default()
            },
        );
        true
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Option<Vec<String>> = items.iter().map(scalar_text).collect();
            parts.filter(|p| !p.is_empty()).map(|p| p.join(", "))
        }
        Value::Null | Value::Object(_) => None,
    }
}

fn body_lines(media: &MediaRecord) -> Vec<String> {
    let mut lines = vec![format!("{}: {}", fields::MEDIA_ID, media.id)];
    lines.extend(
        media
            .extra
            .iter()
            .filter_map(|(key, value)| scalar_text(value).map(|text| format!("{key}: {text}"))),
    );
    lines.push(format!("{}: {}", fields::CREATED_AT, media.created_at));
    lines.push(format!("{}: {}", fields::UPDATED_AT, media.updated_at));
    lines
}

fn decode_poster(media: &MediaRecord, bytes: &[u8]) -> Option<DynamicImage> {
    match image_crate::load_from_memory(bytes) {
        Ok(decoded) if decoded.width() > 0 && decoded.height() > 0 => {
            Some(DynamicImage::ImageRgb8(decoded.to_rgb8()))
        }
        Ok(_) => {
            warn!(id = %media.id, "poster has no pixels; rendering without it");
            None
        }
        Err(e) => {
            warn!(id = %media.id, error = %e, "poster is not a readable image; rendering without it");
            None
        }
    }
}

/// Render `media` as a one-page PDF. `poster` is the raw image, if one
/// could be fetched; anything the decoder cannot read is left out.
pub fn render_media_pdf(media: &MediaRecord, poster: Option<&[u8]>) -> AssetResult<Vec<u8>> {
    let poster = poster.and_then(|bytes| decode_poster(media, bytes));

    let (doc, page_index, layer_index) = PdfDocument::new(
        media.title.as_str(),
        pt(PAGE_WIDTH),
        pt(PAGE_HEIGHT),
        "content",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AssetError::Render(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AssetError::Render(e.to_string()))?;

    let mut page = PageBuilder {
        layer: doc.get_page(page_index).get_layer(layer_index),
        regular,
        bold,
        cursor: PAGE_HEIGHT - MARGIN,
    };
    page.paragraph(&media.title, Font::Bold, HEADER_SIZE, RED, true);
    page.gap(SUBTITLE_SIZE);
    page.paragraph(&media.kind, Font::Regular, SUBTITLE_SIZE, GREY, true);
    page.gap(SUBTITLE_SIZE / 2.0);
    page.paragraph(&media.year.to_string(), Font::Regular, SUBTITLE_SIZE, GREY, true);
    page.gap(SUBTITLE_SIZE);
    if let Some(poster) = &poster {
        if page.image(poster) {
            page.gap(BODY_SIZE * 2.0);
        } else {
            debug!(id = %media.id, "no room left for the poster");
        }
    }
    for line in body_lines(media) {
        if !page.paragraph(&line, Font::Regular, BODY_SIZE, BLACK, false) {
            debug!(id = %media.id, "body text truncated at page bottom");
            break;
        }
    }

    doc.save_to_bytes().map_err(|e| AssetError::Render(e.to_string()))
}
