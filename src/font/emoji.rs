//! Emoji glyph injection
//!
//! Fonts index glyphs by a single character code, so multi-unit emoji
//! (e.g. 😎 = `\u{D83D}\u{DE0E}` in UTF-16) cannot be looked up directly.
//! Each emoji in the atlas is instead given a single replacement code
//! `BASE_CODE + index`, a glyph pointing at its atlas region is injected
//! into the font under that code, and text is filtered so every emoji
//! becomes its replacement code before layout.
//!
//! One atlas can be injected into any number of fonts; injected glyphs
//! scale with each font's line height.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info, trace, warn};

use super::atlas::{AtlasRegion, TextureAtlas};
use super::glyph::{Glyph, GlyphTableWriter};
use super::texture::{TextureFilter, TexturePage, TextureRegion};
use crate::constants::{
    BASE_CODE, HIGH_SURROGATE_END, LOW_SURROGATE_START, MAX_EMOJI, SURROGATE_END,
    SURROGATE_START, VARIATION_SELECTOR_END, VARIATION_SELECTOR_START,
};
use crate::error::AtlasError;

/// Normalized texture rectangle and pixel size of an atlas region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionUv {
    pub u: f32,
    pub v: f32,
    pub u2: f32,
    pub v2: f32,
    pub width: u32,
    pub height: u32,
}

impl From<&AtlasRegion> for RegionUv {
    fn from(region: &AtlasRegion) -> Self {
        Self {
            u: region.u,
            v: region.v,
            u2: region.u2,
            v2: region.v2,
            width: region.packed_width(),
            height: region.packed_height(),
        }
    }
}

/// One mapped emoji
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmojiEntry {
    /// Unicode scalar value the region name encodes
    pub codepoint: u32,
    /// Offset from BASE_CODE (position in atlas iteration order)
    pub index: u16,
    /// Index into the atlas pages
    pub page: usize,
    pub region: RegionUv,
}

impl EmojiEntry {
    /// Replacement character code for this emoji
    #[inline]
    pub fn code(&self) -> u32 {
        BASE_CODE + self.index as u32
    }
}

/// Emoji atlas plus the code point -> injected glyph table
#[derive(Debug)]
pub struct EmojiSupport {
    atlas: TextureAtlas,
    /// Pages shared with every font the emoji are injected into
    pages: Vec<Arc<TexturePage>>,
    /// Code point -> entry
    table: HashMap<u32, EmojiEntry>,
}

impl EmojiSupport {
    /// Load an emoji atlas with linear filtering
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AtlasError> {
        Self::load_with_filter(path, TextureFilter::Linear)
    }

    /// Load an emoji atlas; nearest filtering can look crisper for small emoji
    pub fn load_with_filter<P: AsRef<Path>>(
        path: P,
        filter: TextureFilter,
    ) -> Result<Self, AtlasError> {
        info!("EmojiSupport: loading {:?}", path.as_ref());
        let atlas = TextureAtlas::load(path)?;
        Self::from_atlas(atlas, filter)
    }

    /// Build the emoji table from a parsed atlas
    ///
    /// Every region name must be a hexadecimal code point. The table is
    /// only returned when all regions are valid.
    pub fn from_atlas(mut atlas: TextureAtlas, filter: TextureFilter) -> Result<Self, AtlasError> {
        if atlas.regions.len() > MAX_EMOJI {
            return Err(AtlasError::TooManyEmoji {
                count: atlas.regions.len(),
                max: MAX_EMOJI,
            });
        }

        atlas.set_filter(filter);

        let mut table = HashMap::with_capacity(atlas.regions.len());
        for (i, region) in atlas.regions.iter().enumerate() {
            let codepoint = u32::from_str_radix(region.name.trim(), 16).map_err(|_| {
                AtlasError::MalformedAtlasEntry {
                    name: region.name.to_string(),
                }
            })?;
            let entry = EmojiEntry {
                codepoint,
                index: i as u16,
                page: region.page,
                region: RegionUv::from(region),
            };
            if let Some(prev) = table.insert(codepoint, entry) {
                warn!(
                    "EmojiSupport: duplicate emoji {:X} (region {} replaces {})",
                    codepoint, i, prev.index
                );
            }
        }

        let pages: Vec<Arc<TexturePage>> = atlas.pages.iter().cloned().map(Arc::new).collect();
        for page in &pages {
            debug!(
                "EmojiSupport: page {} {}x{} filter={}",
                page.file.display(),
                page.width,
                page.height,
                page.min_filter
            );
        }
        info!(
            "EmojiSupport: {} emoji on {} page(s)",
            table.len(),
            pages.len()
        );

        Ok(Self {
            atlas,
            pages,
            table,
        })
    }

    /// Parsed atlas (for direct region access, e.g. an emoji as an image)
    pub fn atlas(&self) -> &TextureAtlas {
        &self.atlas
    }

    pub fn pages(&self) -> &[Arc<TexturePage>] {
        &self.pages
    }

    pub fn entry(&self, codepoint: u32) -> Option<&EmojiEntry> {
        self.table.get(&codepoint)
    }

    /// Entries sorted by index
    pub fn entries(&self) -> Vec<&EmojiEntry> {
        let mut entries: Vec<&EmojiEntry> = self.table.values().collect();
        entries.sort_by_key(|e| e.index);
        entries
    }

    /// Number of mapped emoji
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Replacement character for one emoji
    pub fn glyph_char(&self, codepoint: u32) -> Option<char> {
        self.entry(codepoint).and_then(|e| char::from_u32(e.code()))
    }

    /// Every injected replacement character in index order
    pub fn all_glyphs(&self) -> String {
        self.entries()
            .iter()
            .filter_map(|e| char::from_u32(e.code()))
            .collect()
    }

    /// Replacement character belongs to a mapped emoji
    pub fn is_injected(&self, ch: char) -> bool {
        let code = ch as u32;
        code >= BASE_CODE && self.table.values().any(|e| e.code() == code)
    }

    // ========================================================================
    // Font injection
    // ========================================================================

    /// Add the emoji pages and glyphs to a font
    ///
    /// Glyphs are square, sized to the font's unscaled line height, and only
    /// inserted where the font has no glyph yet. Returns the number inserted.
    pub fn add_to_font<F: GlyphTableWriter + ?Sized>(&self, font: &mut F) -> usize {
        let page_base = font.page_count();
        for page in &self.pages {
            font.push_page(TextureRegion::whole(Arc::clone(page)));
        }

        let size = (font.line_height() / font.scale_y()) as i32;
        let mut added = 0;
        for entry in self.entries() {
            let code = entry.code();
            if font.glyph(code).is_some() {
                continue;
            }
            // Atlas V axis is inverted relative to font pages
            font.set_glyph(
                code,
                Glyph {
                    id: code,
                    src_x: 0,
                    src_y: 0,
                    width: size,
                    height: size,
                    u: entry.region.u,
                    v: entry.region.v2,
                    u2: entry.region.u2,
                    v2: entry.region.v,
                    x_offset: 0,
                    y_offset: -size,
                    x_advance: size,
                    fixed_width: true,
                    page: page_base + entry.page,
                },
            );
            added += 1;
        }

        debug!(
            "EmojiSupport: {} glyphs added at size {} (page base {})",
            added, size, page_base
        );
        added
    }

    // ========================================================================
    // Text filtering
    // ========================================================================

    /// Replace emoji in UTF-16 text with their replacement codes
    ///
    /// Unmapped surrogate pairs and variation selectors are dropped;
    /// everything else passes through.
    pub fn filter_utf16(&self, text: &[u16]) -> Vec<u16> {
        let mut out = Vec::with_capacity(text.len());
        let mut i = 0;
        while i < text.len() {
            let unit = text[i] as u32;
            let is_surrogate = (SURROGATE_START..=SURROGATE_END).contains(&unit);
            let is_variation =
                (VARIATION_SELECTOR_START..=VARIATION_SELECTOR_END).contains(&unit);

            let codepoint = match text.get(i + 1) {
                Some(&next)
                    if unit <= HIGH_SURROGATE_END
                        && is_surrogate
                        && (LOW_SURROGATE_START..=SURROGATE_END).contains(&(next as u32)) =>
                {
                    0x10000 + ((unit - SURROGATE_START) << 10) + (next as u32 - LOW_SURROGATE_START)
                }
                _ => unit,
            };

            if let Some(entry) = self.table.get(&codepoint) {
                out.push(entry.code() as u16);
            } else if !is_surrogate && !is_variation {
                out.push(text[i]);
            } else {
                trace!("EmojiSupport: dropping U+{:04X}", codepoint);
            }
            i += if is_surrogate { 2 } else { 1 };
        }
        out
    }

    /// Replace emoji in a string with their replacement characters
    pub fn filter_str(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            let cp = ch as u32;
            if let Some(c) = self.glyph_char(cp) {
                out.push(c);
            } else if cp > 0xFFFF
                || (VARIATION_SELECTOR_START..=VARIATION_SELECTOR_END).contains(&cp)
            {
                trace!("EmojiSupport: dropping U+{:04X}", cp);
            } else {
                out.push(ch);
            }
        }
        out
    }

    /// Filter optional text; absent input stays absent
    pub fn filter_opt(&self, text: Option<&str>) -> Option<String> {
        text.map(|t| self.filter_str(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::glyph::BitmapFont;

    const ATLAS: &str = "emojis.png
size: 64, 32
filter: Nearest,Nearest
1f600
  xy: 0, 0
  size: 32, 32
1f60e
  xy: 32, 0
  size: 32, 32

more.png
size: 32, 32
2764
  xy: 0, 0
  size: 32, 32
";

    fn support() -> EmojiSupport {
        let atlas = TextureAtlas::parse(ATLAS, Path::new("")).unwrap();
        EmojiSupport::from_atlas(atlas, TextureFilter::Linear).unwrap()
    }

    fn utf16(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    #[test]
    fn test_dense_indices() {
        let emoji = support();
        let mut indices: Vec<u16> = emoji.entries().iter().map(|e| e.index).collect();
        indices.sort();
        assert_eq!(indices, [0, 1, 2]);
        assert_eq!(emoji.entry(0x1F60E).unwrap().index, 1);
        assert_eq!(emoji.entry(0x2764).unwrap().page, 1);
    }

    #[test]
    fn test_filter_applied_to_pages() {
        let emoji = support();
        assert!(emoji
            .pages()
            .iter()
            .all(|p| p.min_filter == TextureFilter::Linear && p.mag_filter == TextureFilter::Linear));
    }

    #[test]
    fn test_malformed_name_fails_load() {
        let text = "a.png\nsize: 8,8\n1f600\n  xy: 0,0\n  size: 1,1\nnot-hex\n  xy: 1,0\n  size: 1,1\n";
        let atlas = TextureAtlas::parse(text, Path::new("")).unwrap();
        let err = EmojiSupport::from_atlas(atlas, TextureFilter::Linear).unwrap_err();
        match err {
            AtlasError::MalformedAtlasEntry { name } => assert_eq!(name, "not-hex"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_too_many_regions() {
        let mut atlas = TextureAtlas::parse(ATLAS, Path::new("")).unwrap();
        let region = atlas.regions[0].clone();
        atlas.regions = vec![region; MAX_EMOJI + 1];
        let err = EmojiSupport::from_atlas(atlas, TextureFilter::Linear).unwrap_err();
        assert!(matches!(err, AtlasError::TooManyEmoji { .. }));
    }

    #[test]
    fn test_filter_passthrough() {
        let emoji = support();
        assert_eq!(emoji.filter_utf16(&utf16("abc")), utf16("abc"));
        assert_eq!(emoji.filter_str("abc"), "abc");
    }

    #[test]
    fn test_filter_substitution() {
        let emoji = support();
        let out = emoji.filter_utf16(&[b'x' as u16, 0xD83D, 0xDE0E, b' ' as u16, b'y' as u16]);
        assert_eq!(out, [b'x' as u16, 0xB001, b' ' as u16, b'y' as u16]);
        assert_eq!(emoji.filter_str("x😎 y"), "x\u{B001} y");
    }

    #[test]
    fn test_filter_bmp_emoji_and_variation_selector() {
        let emoji = support();
        // Mapped heart: replaced, selector dropped
        assert_eq!(emoji.filter_str("\u{2764}\u{FE0F}"), "\u{B002}");
        // Unmapped heart-like symbol keeps its own unit
        assert_eq!(emoji.filter_utf16(&[0x2763, 0xFE0F]), [0x2763]);
    }

    #[test]
    fn test_filter_drops_unknown_pairs() {
        let emoji = support();
        // 💙 is not in the atlas
        assert_eq!(emoji.filter_utf16(&utf16("a\u{1F499}b")), utf16("ab"));
        assert_eq!(emoji.filter_str("a\u{1F499}b"), "ab");
    }

    #[test]
    fn test_filter_lone_surrogate_skips_two_units() {
        let emoji = support();
        assert_eq!(emoji.filter_utf16(&[0xDE0E, b'a' as u16, b'b' as u16]), [b'b' as u16]);
        assert_eq!(emoji.filter_utf16(&[b'a' as u16, 0xD83D]), [b'a' as u16]);
    }

    #[test]
    fn test_filter_empty_and_absent() {
        let emoji = support();
        assert!(emoji.filter_utf16(&[]).is_empty());
        assert_eq!(emoji.filter_str(""), "");
        assert_eq!(emoji.filter_opt(None), None);
        assert_eq!(emoji.filter_opt(Some("😀")), Some("\u{B000}".to_string()));
    }

    #[test]
    fn test_add_to_font_glyph_shape() {
        let emoji = support();
        let mut font = BitmapFont::new("default", 15.0);
        font.set_scale(2.0, 2.0);
        let added = emoji.add_to_font(&mut font);
        assert_eq!(added, 3);
        assert_eq!(font.page_count(), 2);

        let g = *font.glyph(0xB001).unwrap();
        assert_eq!((g.width, g.height, g.x_advance), (15, 15, 15));
        assert_eq!((g.x_offset, g.y_offset), (0, -15));
        assert_eq!((g.u, g.u2), (0.5, 1.0));
        // V swapped
        assert_eq!((g.v, g.v2), (1.0, 0.0));
        assert!(g.fixed_width);
        assert_eq!(g.page, 0);
        assert_eq!(font.glyph(0xB002).unwrap().page, 1);
    }

    #[test]
    fn test_add_to_font_is_idempotent() {
        let emoji = support();
        let mut once = BitmapFont::new("a", 20.0);
        emoji.add_to_font(&mut once);
        let mut twice = BitmapFont::new("b", 20.0);
        emoji.add_to_font(&mut twice);
        assert_eq!(emoji.add_to_font(&mut twice), 0);
        for code in BASE_CODE..BASE_CODE + 3 {
            assert_eq!(once.glyph(code), twice.glyph(code));
        }
        assert_eq!(once.glyph_count(), twice.glyph_count());
    }

    #[test]
    fn test_existing_glyph_not_overwritten() {
        let emoji = support();
        let mut font = BitmapFont::new("f", 10.0);
        let existing = Glyph {
            id: 0xB000,
            width: 3,
            ..Glyph::default()
        };
        font.set_glyph(0xB000, existing);
        assert_eq!(emoji.add_to_font(&mut font), 2);
        assert_eq!(font.glyph(0xB000), Some(&existing));
    }

    #[test]
    fn test_page_base_offsets_existing_pages() {
        let emoji = support();
        let mut font = BitmapFont::new("f", 10.0);
        font.push_page(TextureRegion::whole(Arc::clone(&emoji.pages()[0])));
        emoji.add_to_font(&mut font);
        assert_eq!(font.glyph(0xB000).unwrap().page, 1);
        assert_eq!(font.glyph(0xB002).unwrap().page, 2);
    }

    #[test]
    fn test_duplicate_codepoint_later_region_wins() {
        let text = "a.png\nsize: 96,32\n1f600\n  xy: 0,0\n  size: 32,32\n1f600\n  xy: 32,0\n  size: 32,32\n1f60e\n  xy: 64,0\n  size: 32,32\n";
        let atlas = TextureAtlas::parse(text, Path::new("")).unwrap();
        let regions = atlas.regions.len();
        let emoji = EmojiSupport::from_atlas(atlas, TextureFilter::Linear).unwrap();

        let grin = emoji.entry(0x1F600).unwrap();
        assert_eq!(grin.index, 1);
        assert_eq!(grin.region.u, 32.0 / 96.0);
        assert_eq!(emoji.entry(0x1F60E).unwrap().index, 2);
        assert_eq!(emoji.len(), regions - 1);

        let mut font = BitmapFont::new("f", 12.0);
        assert_eq!(emoji.add_to_font(&mut font), 2);
        assert!(font.glyph(BASE_CODE).is_none());

        let all = emoji.all_glyphs();
        assert_eq!(all, "\u{B001}\u{B002}");
        assert!(all.chars().all(|c| font.glyph(c as u32).is_some()));
        assert_eq!(emoji.filter_str("\u{1F600}"), "\u{B001}");
        assert!(!emoji.is_injected('\u{B000}'));
        assert!(emoji.is_injected('\u{B002}'));
    }

    #[test]
    fn test_all_glyphs_and_glyph_char() {
        let emoji = support();
        assert_eq!(emoji.all_glyphs(), "\u{B000}\u{B001}\u{B002}");
        assert_eq!(emoji.glyph_char(0x1F600), Some('\u{B000}'));
        assert_eq!(emoji.glyph_char(0x41), None);
        assert_eq!(emoji.len(), 3);
    }
}
