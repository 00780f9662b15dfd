//! Texture pages and regions
//!
//! Metadata for the image pages an atlas is packed into.
//! Pixel data stays with the host renderer; pages only describe
//! where the image lives and how it is sampled.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Texture sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureFilter {
    /// Nearest-neighbor (crisper for small emoji)
    Nearest,
    /// Bilinear (default)
    #[default]
    Linear,
    MipMap,
    MipMapNearestNearest,
    MipMapLinearNearest,
    MipMapNearestLinear,
    MipMapLinearLinear,
}

impl TextureFilter {
    /// Name as written in atlas files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nearest => "Nearest",
            Self::Linear => "Linear",
            Self::MipMap => "MipMap",
            Self::MipMapNearestNearest => "MipMapNearestNearest",
            Self::MipMapLinearNearest => "MipMapLinearNearest",
            Self::MipMapNearestLinear => "MipMapNearestLinear",
            Self::MipMapLinearLinear => "MipMapLinearLinear",
        }
    }
}

impl fmt::Display for TextureFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextureFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        [
            Self::Nearest,
            Self::Linear,
            Self::MipMap,
            Self::MipMapNearestNearest,
            Self::MipMapLinearNearest,
            Self::MipMapNearestLinear,
            Self::MipMapLinearLinear,
        ]
        .into_iter()
        .find(|f| f.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| format!("unknown texture filter: {}", s))
    }
}

/// Texture wrap mode along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureWrap {
    #[default]
    ClampToEdge,
    Repeat,
}

/// One atlas page (a single packed image)
#[derive(Debug, Clone, PartialEq)]
pub struct TexturePage {
    /// Image path (resolved against the atlas file directory)
    pub file: PathBuf,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Pixel format name (e.g. "RGBA8888")
    pub format: SmolStr,
    /// Minification filter
    pub min_filter: TextureFilter,
    /// Magnification filter
    pub mag_filter: TextureFilter,
    pub u_wrap: TextureWrap,
    pub v_wrap: TextureWrap,
    /// Premultiplied alpha
    pub pma: bool,
}

impl TexturePage {
    /// Set both sampling filters
    pub fn set_filter(&mut self, min: TextureFilter, mag: TextureFilter) {
        self.min_filter = min;
        self.mag_filter = mag;
    }
}

/// Rectangle of a shared page, addressed in normalized coordinates
#[derive(Debug, Clone)]
pub struct TextureRegion {
    pub page: Arc<TexturePage>,
    pub u: f32,
    pub v: f32,
    pub u2: f32,
    pub v2: f32,
    /// Region width in pixels
    pub width: u32,
    /// Region height in pixels
    pub height: u32,
}

impl TextureRegion {
    /// Region covering an entire page
    pub fn whole(page: Arc<TexturePage>) -> Self {
        let (width, height) = (page.width, page.height);
        Self {
            page,
            u: 0.0,
            v: 0.0,
            u2: 1.0,
            v2: 1.0,
            width,
            height,
        }
    }
}
