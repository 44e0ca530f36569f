//! QR code rendering.
//!
//! Encoding is delegated to the `qrcode` crate. This module only adapts it to
//! the two outputs the CLI needs: block characters for the terminal and SVG
//! documents for export.

use qrcode::render::{svg, unicode};
use qrcode::QrCode;

use crate::error::{Error, Result};

/// Byte capacity of the largest QR symbol (version 40) at the default
/// error-correction level (M).
pub const MAX_ENCODABLE_BYTES: usize = 2331;

/// How a code should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Minimum width and height in pixels. Only used by image outputs; the
    /// terminal always draws one character column per module.
    pub size: u32,
    /// Surround the code with the standard quiet zone.
    pub quiet_zone: bool,
    /// Swap dark and light modules.
    pub invert: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            size: 180,
            quiet_zone: true,
            invert: false,
        }
    }
}

/// Turns text into a displayable QR image.
pub trait QrRenderer {
    /// Render `text` with the given options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the text cannot be encoded.
    fn render(&self, text: &str, options: &RenderOptions) -> Result<String>;
}

/// Renders codes with Unicode half-block characters, two module rows per
/// line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalRenderer;

impl QrRenderer for TerminalRenderer {
    fn render(&self, text: &str, options: &RenderOptions) -> Result<String> {
        let code = encode(text)?;
        let mut renderer = code.render::<unicode::Dense1x2>();
        renderer.quiet_zone(options.quiet_zone);
        if options.invert {
            renderer
                .dark_color(unicode::Dense1x2::Light)
                .light_color(unicode::Dense1x2::Dark);
        }
        Ok(renderer.build())
    }
}

/// Renders codes as standalone SVG documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgRenderer;

impl QrRenderer for SvgRenderer {
    fn render(&self, text: &str, options: &RenderOptions) -> Result<String> {
        let code = encode(text)?;
        let (dark, light) = if options.invert {
            ("#ffffff", "#000000")
        } else {
            ("#000000", "#ffffff")
        };
        Ok(code
            .render::<svg::Color<'_>>()
            .min_dimensions(options.size, options.size)
            .quiet_zone(options.quiet_zone)
            .dark_color(svg::Color(dark))
            .light_color(svg::Color(light))
            .build())
    }
}

fn encode(text: &str) -> Result<QrCode> {
    QrCode::new(text.as_bytes()).map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_render_shape() {
        let output = TerminalRenderer
            .render("hello", &RenderOptions::default())
            .unwrap();
        let lines: Vec<&str> = output.lines().collect();

        // Version 1 is 21 modules, plus a 4-module quiet zone on each side.
        let width = 21 + 8;
        assert_eq!(lines[0].chars().count(), width);
        assert_eq!(lines.len(), width.div_ceil(2));
        assert!(lines.iter().all(|l| l.chars().count() == width));
    }

    #[test]
    fn test_terminal_render_without_quiet_zone() {
        let options = RenderOptions {
            quiet_zone: false,
            ..RenderOptions::default()
        };
        let output = TerminalRenderer.render("hello", &options).unwrap();
        assert_eq!(output.lines().next().unwrap().chars().count(), 21);
    }

    #[test]
    fn test_terminal_invert_changes_output() {
        let normal = TerminalRenderer
            .render("invert me", &RenderOptions::default())
            .unwrap();
        let inverted = TerminalRenderer
            .render(
                "invert me",
                &RenderOptions {
                    invert: true,
                    ..RenderOptions::default()
                },
            )
            .unwrap();
        assert_ne!(normal, inverted);
        assert_eq!(normal.lines().count(), inverted.lines().count());
    }

    #[test]
    fn test_render_is_deterministic() {
        let options = RenderOptions::default();
        let a = TerminalRenderer.render("same", &options).unwrap();
        let b = TerminalRenderer.render("same", &options).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_svg_render() {
        let options = RenderOptions {
            size: 64,
            ..RenderOptions::default()
        };
        let svg = SvgRenderer.render("https://example.com", &options).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("#000000"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_long_text_within_limit_renders() {
        let text = "x".repeat(2000);
        assert!(TerminalRenderer
            .render(&text, &RenderOptions::default())
            .is_ok());
    }

    #[test]
    fn test_too_long_text_fails() {
        let text = "x".repeat(MAX_ENCODABLE_BYTES * 2);
        let result = TerminalRenderer.render(&text, &RenderOptions::default());
        assert!(matches!(result, Err(Error::Render(_))));
    }
}
