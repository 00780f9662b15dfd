//! Texture atlas description parser
//!
//! Reads the packed atlas text format: one or more pages, each naming an
//! image file followed by its named regions. Both the legacy layout
//! (indented `xy`/`size`/`orig`/`offset` fields) and the newer layout
//! (`bounds`/`offsets`, page `pma`) are accepted.
//!
//! ```text
//! emojis.png
//! size: 64, 32
//! format: RGBA8888
//! filter: Linear, Linear
//! repeat: none
//! 1f600
//!   rotate: false
//!   xy: 0, 0
//!   size: 32, 32
//!   orig: 32, 32
//!   offset: 0, 0
//!   index: -1
//! ```

use std::path::Path;

use log::{debug, trace};
use smol_str::SmolStr;

use super::texture::{TextureFilter, TexturePage, TextureWrap};
use crate::error::AtlasError;

/// Named rectangle on an atlas page
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasRegion {
    /// Region name (for emoji atlases: hex code point)
    pub name: SmolStr,
    /// Index of the backing page in `TextureAtlas::pages`
    pub page: usize,
    /// Left edge on the page (pixels)
    pub x: u32,
    /// Top edge on the page (pixels)
    pub y: u32,
    /// Unrotated width (pixels)
    pub width: u32,
    /// Unrotated height (pixels)
    pub height: u32,
    /// Size before whitespace stripping
    pub original_width: u32,
    pub original_height: u32,
    /// Whitespace stripped from the left/bottom
    pub offset_x: f32,
    pub offset_y: f32,
    /// Rotation in degrees (0 or 90 in practice)
    pub degrees: i32,
    /// Animation frame index, -1 when absent
    pub index: i32,
    pub u: f32,
    pub v: f32,
    pub u2: f32,
    pub v2: f32,
}

impl AtlasRegion {
    /// Region was packed rotated by 90 degrees
    pub fn rotated(&self) -> bool {
        self.degrees == 90
    }

    /// Width of the packed rectangle on the page
    pub fn packed_width(&self) -> u32 {
        if self.rotated() {
            self.height
        } else {
            self.width
        }
    }

    /// Height of the packed rectangle on the page
    pub fn packed_height(&self) -> u32 {
        if self.rotated() {
            self.width
        } else {
            self.height
        }
    }
}

/// Parsed atlas: pages in file order and regions in iteration order
#[derive(Debug, Clone, Default)]
pub struct TextureAtlas {
    pub pages: Vec<TexturePage>,
    pub regions: Vec<AtlasRegion>,
}

/// Page header being read
struct PageBuilder {
    file: String,
    line: usize,
    size: Option<(u32, u32)>,
    format: SmolStr,
    filter: (TextureFilter, TextureFilter),
    wrap: (TextureWrap, TextureWrap),
    pma: bool,
}

impl PageBuilder {
    fn new(file: &str, line: usize) -> Self {
        Self {
            file: file.to_string(),
            line,
            size: None,
            format: SmolStr::new("RGBA8888"),
            filter: (TextureFilter::Nearest, TextureFilter::Nearest),
            wrap: (TextureWrap::ClampToEdge, TextureWrap::ClampToEdge),
            pma: false,
        }
    }

    fn field(&mut self, key: &str, value: &str, line: usize) -> Result<(), AtlasError> {
        match key {
            "size" => {
                let [w, h] = parse_tuple::<2>(value, line)?;
                self.size = Some((to_u32(w, line)?, to_u32(h, line)?));
            }
            "format" => self.format = SmolStr::new(value),
            "filter" => {
                let mut parts = value.split(',');
                let min = parse_filter(parts.next().unwrap_or(""), line)?;
                let mag = match parts.next() {
                    Some(mag) => parse_filter(mag, line)?,
                    None => min,
                };
                self.filter = (min, mag);
            }
            "repeat" => {
                let repeat_x = value.contains('x');
                let repeat_y = value.contains('y');
                let wrap = |on: bool| {
                    if on {
                        TextureWrap::Repeat
                    } else {
                        TextureWrap::ClampToEdge
                    }
                };
                self.wrap = (wrap(repeat_x), wrap(repeat_y));
            }
            "pma" => self.pma = value == "true",
            _ => trace!("Atlas: ignoring page field {} at line {}", key, line),
        }
        Ok(())
    }

    fn finish(self, image_dir: &Path) -> Result<TexturePage, AtlasError> {
        let file = image_dir.join(&self.file);
        let (width, height) = match self.size {
            Some(size) => size,
            None => {
                debug!("Atlas: page {} has no size, reading image header", file.display());
                image::image_dimensions(&file).map_err(|source| AtlasError::PageImage {
                    path: file.clone(),
                    source,
                })?
            }
        };
        if width == 0 || height == 0 {
            return Err(AtlasError::syntax(self.line, format!("page {} has zero size", self.file)));
        }
        Ok(TexturePage {
            file,
            width,
            height,
            format: self.format,
            min_filter: self.filter.0,
            mag_filter: self.filter.1,
            u_wrap: self.wrap.0,
            v_wrap: self.wrap.1,
            pma: self.pma,
        })
    }
}

/// Region being read (UVs are resolved once all pages are known)
struct RegionBuilder {
    name: SmolStr,
    page: usize,
    xy: (u32, u32),
    size: (u32, u32),
    orig: Option<(u32, u32)>,
    offset: (f32, f32),
    degrees: i32,
    index: i32,
}

impl RegionBuilder {
    fn new(name: &str, page: usize) -> Self {
        Self {
            name: SmolStr::new(name),
            page,
            xy: (0, 0),
            size: (0, 0),
            orig: None,
            offset: (0.0, 0.0),
            degrees: 0,
            index: -1,
        }
    }

    fn field(&mut self, key: &str, value: &str, line: usize) -> Result<(), AtlasError> {
        match key {
            "xy" => {
                let [x, y] = parse_tuple::<2>(value, line)?;
                self.xy = (to_u32(x, line)?, to_u32(y, line)?);
            }
            "size" => {
                let [w, h] = parse_tuple::<2>(value, line)?;
                self.size = (to_u32(w, line)?, to_u32(h, line)?);
            }
            "bounds" => {
                let [x, y, w, h] = parse_tuple::<4>(value, line)?;
                self.xy = (to_u32(x, line)?, to_u32(y, line)?);
                self.size = (to_u32(w, line)?, to_u32(h, line)?);
            }
            "orig" => {
                let [w, h] = parse_tuple::<2>(value, line)?;
                self.orig = Some((to_u32(w, line)?, to_u32(h, line)?));
            }
            "offset" => {
                let [x, y] = parse_tuple::<2>(value, line)?;
                self.offset = (x as f32, y as f32);
            }
            "offsets" => {
                let [x, y, w, h] = parse_tuple::<4>(value, line)?;
                self.offset = (x as f32, y as f32);
                self.orig = Some((to_u32(w, line)?, to_u32(h, line)?));
            }
            "rotate" => {
                self.degrees = match value {
                    "true" => 90,
                    "false" => 0,
                    other => other
                        .parse()
                        .map_err(|_| AtlasError::syntax(line, format!("invalid rotate: {}", other)))?,
                };
            }
            "index" => {
                self.index = value
                    .parse()
                    .map_err(|_| AtlasError::syntax(line, format!("invalid index: {}", value)))?;
            }
            _ => trace!("Atlas: ignoring region field {} at line {}", key, line),
        }
        Ok(())
    }

    fn finish(self, pages: &[TexturePage]) -> AtlasRegion {
        let page = &pages[self.page];
        let (width, height) = self.size;
        let (original_width, original_height) = self.orig.unwrap_or(self.size);
        let mut region = AtlasRegion {
            name: self.name,
            page: self.page,
            x: self.xy.0,
            y: self.xy.1,
            width,
            height,
            original_width,
            original_height,
            offset_x: self.offset.0,
            offset_y: self.offset.1,
            degrees: self.degrees,
            index: self.index,
            u: 0.0,
            v: 0.0,
            u2: 0.0,
            v2: 0.0,
        };
        let (page_w, page_h) = (page.width as f32, page.height as f32);
        region.u = region.x as f32 / page_w;
        region.v = region.y as f32 / page_h;
        region.u2 = (region.x + region.packed_width()) as f32 / page_w;
        region.v2 = (region.y + region.packed_height()) as f32 / page_h;
        region
    }
}

impl TextureAtlas {
    /// Load an atlas description; page images are resolved next to it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AtlasError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| AtlasError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let image_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::parse(&text, image_dir)
    }

    /// Parse atlas text. `image_dir` is prepended to page file names.
    pub fn parse(text: &str, image_dir: &Path) -> Result<Self, AtlasError> {
        let mut pages = Vec::new();
        let mut raw_regions = Vec::new();
        let mut page: Option<PageBuilder> = None;
        let mut region: Option<RegionBuilder> = None;

        for (i, raw) in text.lines().enumerate() {
            let line_no = i + 1;
            let line = raw.trim();

            // Blank line ends the current page
            if line.is_empty() {
                raw_regions.extend(region.take());
                if let Some(p) = page.take() {
                    pages.push(p.finish(image_dir)?);
                }
                continue;
            }

            match split_field(line) {
                None if page.is_none() => page = Some(PageBuilder::new(line, line_no)),
                None => {
                    raw_regions.extend(region.take());
                    region = Some(RegionBuilder::new(line, pages.len()));
                }
                Some((key, value)) => {
                    if let Some(r) = region.as_mut() {
                        r.field(key, value, line_no)?;
                    } else if let Some(p) = page.as_mut() {
                        p.field(key, value, line_no)?;
                    } else {
                        return Err(AtlasError::syntax(
                            line_no,
                            format!("field '{}' before page name", key),
                        ));
                    }
                }
            }
        }
        raw_regions.extend(region.take());
        if let Some(p) = page.take() {
            pages.push(p.finish(image_dir)?);
        }

        let mut regions: Vec<AtlasRegion> =
            raw_regions.into_iter().map(|r| r.finish(&pages)).collect();

        // Indexed regions first; -1 keeps file order at the end (stable sort)
        regions.sort_by_key(|r| if r.index < 0 { i32::MAX } else { r.index });

        debug!("Atlas: {} pages, {} regions", pages.len(), regions.len());
        Ok(Self { pages, regions })
    }

    /// First region with the given name
    pub fn find_region(&self, name: &str) -> Option<&AtlasRegion> {
        self.regions.iter().find(|r| r.name == name)
    }

    /// Set the sampling filter of every page
    pub fn set_filter(&mut self, filter: TextureFilter) {
        for page in &mut self.pages {
            page.set_filter(filter, filter);
        }
    }
}

/// Split "key: value" (None for name lines)
fn split_field(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    Some((key.trim(), value.trim()))
}

fn parse_tuple<const N: usize>(value: &str, line: usize) -> Result<[i32; N], AtlasError> {
    let mut out = [0i32; N];
    let mut parts = value.split(',');
    for slot in out.iter_mut() {
        let part = parts
            .next()
            .ok_or_else(|| AtlasError::syntax(line, format!("expected {} values: {}", N, value)))?;
        *slot = part
            .trim()
            .parse()
            .map_err(|_| AtlasError::syntax(line, format!("invalid number: {}", part.trim())))?;
    }
    Ok(out)
}

fn to_u32(v: i32, line: usize) -> Result<u32, AtlasError> {
    u32::try_from(v).map_err(|_| AtlasError::syntax(line, format!("negative value: {}", v)))
}

fn parse_filter(name: &str, line: usize) -> Result<TextureFilter, AtlasError> {
    name.parse().map_err(|e: String| AtlasError::syntax(line, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY: &str = "
emojis.png
size: 64, 32
format: RGBA8888
filter: Linear,Linear
repeat: none
1f600
  rotate: false
  xy: 0, 0
  size: 32, 32
  orig: 32, 32
  offset: 0, 0
  index: -1
1f60e
  rotate: false
  xy: 32, 0
  size: 32, 32
  orig: 32, 32
  offset: 0, 0
  index: -1
";

    const NEW_FORMAT: &str = "emojis.png
size:64,32
filter:Linear,Linear
pma:true
1f600
bounds:0,0,32,32
1f60e
bounds:32,0,32,32
";

    #[test]
    fn test_parse_legacy_layout() {
        let atlas = TextureAtlas::parse(LEGACY, Path::new("assets")).unwrap();
        assert_eq!(atlas.pages.len(), 1);
        let page = &atlas.pages[0];
        assert_eq!(page.file, Path::new("assets").join("emojis.png"));
        assert_eq!((page.width, page.height), (64, 32));
        assert_eq!(page.min_filter, TextureFilter::Linear);
        assert!(!page.pma);

        let names: Vec<&str> = atlas.regions.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["1f600", "1f60e"]);
        let r = &atlas.regions[1];
        assert_eq!((r.x, r.y, r.width, r.height), (32, 0, 32, 32));
        assert_eq!((r.u, r.v, r.u2, r.v2), (0.5, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_new_layout_matches_legacy() {
        let legacy = TextureAtlas::parse(LEGACY, Path::new("")).unwrap();
        let new = TextureAtlas::parse(NEW_FORMAT, Path::new("")).unwrap();
        assert_eq!(legacy.regions, new.regions);
        assert!(new.pages[0].pma);
    }

    #[test]
    fn test_multiple_pages() {
        let text = "a.png\nsize: 32,32\n1f600\n  xy: 0,0\n  size: 32,32\n\nb.png\nsize: 64,64\n1f60e\n  xy: 32,32\n  size: 32,32\n";
        let atlas = TextureAtlas::parse(text, Path::new("")).unwrap();
        assert_eq!(atlas.pages.len(), 2);
        assert_eq!(atlas.regions[0].page, 0);
        assert_eq!(atlas.regions[1].page, 1);
        assert_eq!(atlas.regions[1].u, 0.5);
        assert_eq!(atlas.regions[1].v2, 1.0);
    }

    #[test]
    fn test_rotated_region_swaps_packed_size() {
        let text = "a.png\nsize: 100,100\n1f600\n  rotate: true\n  xy: 0,0\n  size: 20,10\n";
        let atlas = TextureAtlas::parse(text, Path::new("")).unwrap();
        let r = &atlas.regions[0];
        assert!(r.rotated());
        assert_eq!((r.packed_width(), r.packed_height()), (10, 20));
        assert_eq!((r.u2, r.v2), (0.1, 0.2));
    }

    #[test]
    fn test_indexed_regions_sorted_first() {
        let text = "a.png\nsize: 8,8\nplain\n  xy: 0,0\n  size: 1,1\nframe\n  xy: 1,0\n  size: 1,1\n  index: 1\nframe\n  xy: 2,0\n  size: 1,1\n  index: 0\n";
        let atlas = TextureAtlas::parse(text, Path::new("")).unwrap();
        let xs: Vec<u32> = atlas.regions.iter().map(|r| r.x).collect();
        assert_eq!(xs, [2, 1, 0]);
        assert_eq!(atlas.find_region("frame").unwrap().index, 0);
        assert!(atlas.find_region("missing").is_none());
    }

    #[test]
    fn test_missing_size_reads_page_image() {
        let dir = std::env::temp_dir().join(format!("emoji-glyphs-atlas-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        image::RgbaImage::new(40, 20).save(dir.join("page.png")).unwrap();

        let text = "page.png\nformat: RGBA8888\n1f600\n  xy: 20,10\n  size: 20,10\n";
        let atlas = TextureAtlas::parse(text, &dir).unwrap();
        assert_eq!((atlas.pages[0].width, atlas.pages[0].height), (40, 20));
        assert_eq!((atlas.regions[0].u, atlas.regions[0].v), (0.5, 0.5));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_page_image_is_error() {
        let text = "does-not-exist.png\n1f600\n  xy: 0,0\n  size: 1,1\n";
        let err = TextureAtlas::parse(text, Path::new("/nonexistent")).unwrap_err();
        assert!(matches!(err, AtlasError::PageImage { .. }));
    }

    #[test]
    fn test_syntax_errors_carry_line() {
        let err = TextureAtlas::parse("size: 1,1\n", Path::new("")).unwrap_err();
        assert!(matches!(err, AtlasError::Syntax { line: 1, .. }));

        let text = "a.png\nsize: 8,8\n1f600\n  xy: 0\n";
        let err = TextureAtlas::parse(text, Path::new("")).unwrap_err();
        assert!(matches!(err, AtlasError::Syntax { line: 4, .. }));

        let text = "a.png\nsize: 8,8\nfilter: Bicubic\n";
        let err = TextureAtlas::parse(text, Path::new("")).unwrap_err();
        assert!(matches!(err, AtlasError::Syntax { line: 3, .. }));
    }

    #[test]
    fn test_set_filter_applies_to_all_pages() {
        let text = "a.png\nsize: 8,8\n\nb.png\nsize: 8,8\n";
        let mut atlas = TextureAtlas::parse(text, Path::new("")).unwrap();
        atlas.set_filter(TextureFilter::MipMap);
        assert!(atlas
            .pages
            .iter()
            .all(|p| p.min_filter == TextureFilter::MipMap && p.mag_filter == TextureFilter::MipMap));
    }
}
