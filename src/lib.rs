//! emoji-glyphs - emoji support for bitmap fonts
//!
//! Bitmap fonts look glyphs up by a single character code, so emoji that
//! need a surrogate pair cannot be drawn. This crate loads an emoji texture
//! atlas whose regions are named by hex code point, injects one glyph per
//! emoji into a font at `0xB000 + i`, and rewrites text so each emoji
//! becomes that single character.
//!
//! ```text
//! ┌──────────────┐   load    ┌──────────────┐  add_to_font  ┌────────────┐
//! │ emojis.atlas │ ────────→ │ EmojiSupport │ ────────────→ │ BitmapFont │
//! └──────────────┘           └──────────────┘               └────────────┘
//!                                   │ filter_str
//!                                   ↓
//!                       "hi 😎" → "hi \u{B001}"
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod font;

pub use constants::{BASE_CODE, VERSION};
pub use error::AtlasError;
pub use font::{
    BitmapFont, EmojiEntry, EmojiSupport, Glyph, GlyphTableWriter, TextureAtlas, TextureFilter,
};
