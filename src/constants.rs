//! Global constants for emoji-glyphs
//!
//! Code point ranges and limits shared by the atlas loader,
//! the font injector and the text filter.

// ============================================================================
// Injected Glyph Range
// ============================================================================

/// First code point used for injected emoji glyphs (very rarely used range)
pub const BASE_CODE: u32 = 0xB000;

/// Maximum number of emoji that fit between BASE_CODE and the surrogate range
pub const MAX_EMOJI: usize = (SURROGATE_START - BASE_CODE) as usize;

// ============================================================================
// UTF-16 Ranges
// ============================================================================

/// First UTF-16 surrogate unit (high surrogate start)
pub const SURROGATE_START: u32 = 0xD800;

/// Last high surrogate unit
pub const HIGH_SURROGATE_END: u32 = 0xDBFF;

/// First low surrogate unit
pub const LOW_SURROGATE_START: u32 = 0xDC00;

/// Last UTF-16 surrogate unit (low surrogate end)
pub const SURROGATE_END: u32 = 0xDFFF;

/// Variation selectors (presentation style marks, never rendered on their own)
pub const VARIATION_SELECTOR_START: u32 = 0xFE00;

/// Last variation selector (VS16, emoji presentation)
pub const VARIATION_SELECTOR_END: u32 = 0xFE0F;

// ============================================================================
// Versioning
// ============================================================================

/// Helper version (bumped with the glyph injection behaviour)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
