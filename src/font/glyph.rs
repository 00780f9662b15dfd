//! Bitmap font glyph table
//!
//! `GlyphTableWriter` is the capability a font exposes so emoji glyphs can
//! be added to it: an appendable page list, line metrics, and a glyph table
//! keyed by character code. `BitmapFont` is a plain owned implementation.

use std::collections::HashMap;
use std::sync::Arc;

use super::texture::{TexturePage, TextureRegion};

/// Metrics and texture coordinates for one glyph
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Glyph {
    /// Character code the glyph is stored under
    pub id: u32,
    /// Source rectangle origin on the page (pixels)
    pub src_x: i32,
    pub src_y: i32,
    /// Rendered size (pixels, unscaled)
    pub width: i32,
    pub height: i32,
    pub u: f32,
    pub v: f32,
    pub u2: f32,
    pub v2: f32,
    /// Offset from the pen position
    pub x_offset: i32,
    pub y_offset: i32,
    /// Horizontal advance to next character
    pub x_advance: i32,
    /// Excluded from fixed-width batching of regular characters
    pub fixed_width: bool,
    /// Index into the font's page list
    pub page: usize,
}

/// Mutable view of a font that glyphs can be injected into
pub trait GlyphTableWriter {
    /// Number of pages the font currently draws from
    fn page_count(&self) -> usize;

    /// Append a page region; returns its index
    fn push_page(&mut self, region: TextureRegion) -> usize;

    /// Current (scaled) line height
    fn line_height(&self) -> f32;

    /// Current vertical scale factor
    fn scale_y(&self) -> f32;

    fn glyph(&self, code: u32) -> Option<&Glyph>;

    fn set_glyph(&mut self, code: u32, glyph: Glyph);
}

/// Owned bitmap font: pages plus a code -> glyph table
#[derive(Debug, Clone)]
pub struct BitmapFont {
    /// Font name (for logging)
    pub name: String,
    /// Regions the font draws from, indexed by `Glyph::page`
    regions: Vec<TextureRegion>,
    glyphs: HashMap<u32, Glyph>,
    /// Unscaled line height
    base_line_height: f32,
    scale_x: f32,
    scale_y: f32,
}

impl BitmapFont {
    /// Create an empty font with the given unscaled line height
    pub fn new(name: &str, line_height: f32) -> Self {
        Self {
            name: name.to_string(),
            regions: Vec::new(),
            glyphs: HashMap::new(),
            base_line_height: line_height,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Create a font with one page and evenly spaced monospace glyphs for
    /// each character of `chars` (a stand-in for a generated font)
    pub fn monospace(name: &str, page: Arc<TexturePage>, chars: &str, cell: i32) -> Self {
        let mut font = Self::new(name, cell as f32);
        let page_w = page.width as f32;
        let page_h = page.height as f32;
        let columns = (page.width as i32 / cell.max(1)).max(1);
        font.push_page(TextureRegion::whole(page));

        for (i, ch) in chars.chars().enumerate() {
            let code = ch as u32;
            let i = i as i32;
            let src_x = (i % columns) * cell;
            let src_y = (i / columns) * cell;
            font.set_glyph(
                code,
                Glyph {
                    id: code,
                    src_x,
                    src_y,
                    width: cell,
                    height: cell,
                    u: src_x as f32 / page_w,
                    v: src_y as f32 / page_h,
                    u2: (src_x + cell) as f32 / page_w,
                    v2: (src_y + cell) as f32 / page_h,
                    x_offset: 0,
                    y_offset: -cell,
                    x_advance: cell,
                    fixed_width: false,
                    page: 0,
                },
            );
        }
        font
    }

    /// Set the font scale; line height follows the vertical scale
    pub fn set_scale(&mut self, scale_x: f32, scale_y: f32) {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
    }

    pub fn scale_x(&self) -> f32 {
        self.scale_x
    }

    pub fn regions(&self) -> &[TextureRegion] {
        &self.regions
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Glyphs for each character of `text`; unknown characters are skipped
    pub fn glyph_run(&self, text: &str) -> Vec<&Glyph> {
        text.chars()
            .filter_map(|ch| self.glyphs.get(&(ch as u32)))
            .collect()
    }

    /// Scaled width of `text` (sum of advances)
    pub fn text_width(&self, text: &str) -> f32 {
        self.glyph_run(text)
            .iter()
            .map(|g| g.x_advance as f32 * self.scale_x)
            .sum()
    }
}

impl GlyphTableWriter for BitmapFont {
    fn page_count(&self) -> usize {
        self.regions.len()
    }

    fn push_page(&mut self, region: TextureRegion) -> usize {
        self.regions.push(region);
        self.regions.len() - 1
    }

    fn line_height(&self) -> f32 {
        self.base_line_height * self.scale_y
    }

    fn scale_y(&self) -> f32 {
        self.scale_y
    }

    fn glyph(&self, code: u32) -> Option<&Glyph> {
        self.glyphs.get(&code)
    }

    fn set_glyph(&mut self, code: u32, glyph: Glyph) {
        self.glyphs.insert(code, glyph);
    }
}
