//! Emoji atlas loading and glyph injection
//!
//! Handles:
//! - Texture atlas description parsing (legacy and current layouts)
//! - Texture page metadata and sampling filters
//! - Bitmap font glyph tables
//! - Emoji glyph injection and text filtering

pub mod atlas;
pub mod emoji;
pub mod glyph;
pub mod texture;

pub use atlas::{AtlasRegion, TextureAtlas};
pub use emoji::{EmojiEntry, EmojiSupport, RegionUv};
pub use glyph::{BitmapFont, Glyph, GlyphTableWriter};
pub use texture::{TextureFilter, TexturePage, TextureRegion, TextureWrap};
