//! emoji-glyphs demo
//!
//! Loads the configured emoji atlas, injects it into two fonts (a default
//! font and a larger generated one) and prints how sample strings are
//! filtered and laid out.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────────┐
//! │ config.toml  │ ──→ │ EmojiSupport │ ──→ │ default / 40px   │
//! └──────────────┘     └──────────────┘     │ fonts + samples  │
//!                                           └──────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info};

use emoji_glyphs::config::Config;
use emoji_glyphs::font::{TextureFilter, TexturePage, TextureWrap};
use emoji_glyphs::{BitmapFont, EmojiSupport, GlyphTableWriter, VERSION};

/// Font page image size (metadata only, pixels are never read)
const FONT_PAGE_WIDTH: u32 = 1024;
const FONT_PAGE_HEIGHT: u32 = 512;

fn print_help() {
    println!("emoji-glyphs {} - emoji glyph injection demo", VERSION);
    println!();
    println!("USAGE:");
    println!("    emoji-glyphs [OPTIONS] [TEXT...]");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help          Show this help");
    println!("    -V, --version       Show version");
    println!("    --atlas PATH        Emoji atlas file (overrides config)");
    println!("    --nearest           Use nearest filtering for emoji pages");
    println!("    --init-config       Write default config to ~/.config/emoji-glyphs/");
    println!();
    println!("TEXT is filtered instead of the configured samples.");
    println!("Set RUST_LOG=debug for details.");
}

/// Font page used by the demo fonts
fn font_page(name: &str) -> Arc<TexturePage> {
    Arc::new(TexturePage {
        file: PathBuf::from(name),
        width: FONT_PAGE_WIDTH,
        height: FONT_PAGE_HEIGHT,
        format: "RGBA8888".into(),
        min_filter: TextureFilter::Linear,
        mag_filter: TextureFilter::Linear,
        u_wrap: TextureWrap::ClampToEdge,
        v_wrap: TextureWrap::ClampToEdge,
        pma: false,
    })
}

/// Escape non-ASCII characters so replacement codes are visible
fn escape(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii() {
                c.to_string()
            } else {
                format!("\\u{{{:X}}}", c as u32)
            }
        })
        .collect()
}

fn print_sample(font: &mut BitmapFont, emoji: &EmojiSupport, text: &str, scales: &[f32]) {
    let filtered = emoji.filter_str(text);
    println!("  {:?}", text);
    println!("    filtered: {}", escape(&filtered));

    let emoji_count = filtered.chars().filter(|&c| emoji.is_injected(c)).count();
    for &scale in scales {
        font.set_scale(scale, scale);
        println!(
            "    {} @ {:.2}x{:.2}: {} glyphs ({} emoji), width {:.1}, line height {:.1}",
            font.name,
            font.scale_x(),
            scale,
            font.glyph_run(&filtered).len(),
            emoji_count,
            font.text_width(&filtered),
            font.line_height()
        );
    }
    font.set_scale(1.0, 1.0);
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Check command line arguments
    let args: Vec<String> = std::env::args().skip(1).collect();

    // --help
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    // --version
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("emoji-glyphs {}", VERSION);
        return Ok(());
    }

    if args.iter().any(|a| a == "--init-config") {
        let path = Config::write_default()?;
        println!("Config file generated: {}", path.display());
        return Ok(());
    }

    let mut config = Config::load();

    // Remaining arguments: options with values, flags, then free text
    let mut texts = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--atlas" => {
                let path = iter.next().context("--atlas requires a path")?;
                config.emoji.atlas = path.clone();
            }
            "--nearest" => config.emoji.filter = TextureFilter::Nearest,
            _ => texts.push(arg.clone()),
        }
    }

    let atlas_path = config.atlas_path();
    let emoji = EmojiSupport::load_with_filter(&atlas_path, config.emoji.filter)
        .with_context(|| format!("Failed to load emoji atlas: {}", atlas_path.display()))?;
    info!("{} emoji loaded from {}", emoji.len(), atlas_path.display());

    let mut default_font = BitmapFont::monospace(
        "default-font",
        font_page("default.png"),
        &config.font.characters,
        config.font.default_size,
    );
    let mut generated_font = BitmapFont::monospace(
        "generated",
        font_page("generated.png"),
        &config.font.characters,
        config.font.generated_size,
    );

    for font in [&mut default_font, &mut generated_font] {
        let added = emoji.add_to_font(font);
        debug!(
            "{}: {} emoji glyphs, {} pages",
            font.name,
            added,
            font.page_count()
        );
    }

    println!("emoji-glyphs {}", VERSION);
    println!("Atlas: {} ({} emoji, {} pages)", atlas_path.display(), emoji.len(), emoji.pages().len());
    println!();

    let samples = if texts.is_empty() {
        config.demo.samples.clone()
    } else {
        vec![texts.join(" ")]
    };

    println!("Samples:");
    for text in &samples {
        print_sample(&mut default_font, &emoji, text, &config.demo.scales);
        print_sample(&mut generated_font, &emoji, text, &[1.0]);
    }
    println!();

    // Show all emoji as plain text
    let all = emoji.all_glyphs();
    println!(
        "All emoji: {} characters, width {:.1} in {}",
        all.chars().count(),
        default_font.text_width(&all),
        default_font.name
    );

    // Direct access to one emoji region
    if let Some(region) = emoji.atlas().find_region("1f60e") {
        println!(
            "Region 1f60e: page {} at ({}, {}) {}x{} (orig {}x{}, offset {},{}, rotated {})",
            region.page,
            region.x,
            region.y,
            region.width,
            region.height,
            region.original_width,
            region.original_height,
            region.offset_x,
            region.offset_y,
            region.rotated()
        );
        let page = &emoji.pages()[region.page];
        println!(
            "  on {}: {} {}x{}, filter {}/{}, wrap {:?}/{:?}, pma {}",
            page.file.display(),
            page.format,
            page.width,
            page.height,
            page.min_filter,
            page.mag_filter,
            page.u_wrap,
            page.v_wrap,
            page.pma
        );
    }

    Ok(())
}
