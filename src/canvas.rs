//! Drawing surface.
//!
//! The engine only ever does two things to its output: fill the whole
//! surface with a translucent or opaque color, and stamp single glyphs.
//! [`Canvas`] captures that; [`Framebuffer`] implements it on a CPU RGBA8
//! buffer with the built-in bitmap font, and the viewer uploads that buffer
//! to the GPU every tick.

use glam::Vec2;

use crate::color::Rgb;
use crate::font::{self, GLYPH_COLS, GLYPH_ROWS};

/// How glyph pixels combine with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blend {
    /// Source-over.
    #[default]
    Over,
    /// `|dst - src|`, mixed in by alpha.
    Difference,
}

/// A soft halo drawn behind a glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    /// Blur radius in pixels.
    pub blur: f32,
    pub color: Rgb,
}

/// Per-glyph draw state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphStyle {
    pub color: Rgb,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
    /// Cell size in pixels.
    pub font_size: f32,
    pub glow: Option<Glow>,
    pub blend: Blend,
}

impl GlyphStyle {
    pub fn new(color: Rgb, alpha: f32, font_size: f32) -> Self {
        Self {
            color,
            alpha,
            font_size,
            glow: None,
            blend: Blend::Over,
        }
    }

    pub fn with_glow(mut self, blur: f32, color: Rgb) -> Self {
        self.glow = Some(Glow { blur, color });
        self
    }

    pub fn with_blend(mut self, blend: Blend) -> Self {
        self.blend = blend;
        self
    }
}

/// A 2D surface the engine draws into.
pub trait Canvas {
    /// Surface size in pixels.
    fn size(&self) -> (u32, u32);

    /// Source-over fill of the whole surface.
    fn fill(&mut self, color: Rgb, alpha: f32);

    /// Draw one glyph with its left edge at `position.x` and baseline at `position.y`.
    fn draw_glyph(&mut self, ch: char, position: Vec2, style: &GlyphStyle);

    /// Draw a left-to-right run of glyphs.
    fn draw_text(&mut self, text: &str, position: Vec2, style: &GlyphStyle) {
        let advance = glyph_advance(style.font_size);
        let mut pen = position;
        for ch in text.chars() {
            if ch != ' ' {
                self.draw_glyph(ch, pen, style);
            }
            pen.x += advance;
        }
    }
}

/// Integer pixel scale for a font size; one font pixel is at least one pixel.
#[inline]
pub fn pixel_scale(font_size: f32) -> u32 {
    let s = (font_size / 8.0).round();
    if s.is_finite() && s >= 1.0 {
        s as u32
    } else {
        1
    }
}

/// Horizontal pen advance for one glyph at `font_size`.
#[inline]
pub fn glyph_advance(font_size: f32) -> f32 {
    ((GLYPH_COLS + 1) * pixel_scale(font_size)) as f32
}

/// CPU RGBA8 surface. Always opaque.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Framebuffer {
    /// A black surface.
    pub fn new(width: u32, height: u32) -> Self {
        let mut fb = Self {
            width: 0,
            height: 0,
            pixels: Vec::new(),
        };
        fb.resize(width, height);
        fb
    }

    /// Reallocate to a new size. Content is reset to black.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels
            .extend(std::iter::repeat([0, 0, 0, 255]).take((width * height) as usize).flatten());
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 rows, top to bottom.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Color at a pixel, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        Some(Rgb::new(self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]))
    }

    #[inline]
    fn blend_pixel(&mut self, x: i32, y: i32, color: Rgb, alpha: f32, blend: Blend) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let i = ((y as u32 * self.width + x as u32) * 4) as usize;
        let src = [color.r, color.g, color.b];
        for (c, s) in src.into_iter().enumerate() {
            let d = self.pixels[i + c];
            let target = match blend {
                Blend::Over => s,
                Blend::Difference => d.abs_diff(s),
            };
            self.pixels[i + c] = mix(d, target, alpha);
        }
    }
}

#[inline]
fn mix(dst: u8, src: u8, alpha: f32) -> u8 {
    let v = src as f32 * alpha + dst as f32 * (1.0 - alpha);
    v.round().clamp(0.0, 255.0) as u8
}

impl Canvas for Framebuffer {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill(&mut self, color: Rgb, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        for px in self.pixels.chunks_exact_mut(4) {
            px[0] = mix(px[0], color.r, alpha);
            px[1] = mix(px[1], color.g, alpha);
            px[2] = mix(px[2], color.b, alpha);
        }
    }

    fn draw_glyph(&mut self, ch: char, position: Vec2, style: &GlyphStyle) {
        let alpha = style.alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 || !position.is_finite() {
            return;
        }
        let scale = pixel_scale(style.font_size) as i32;
        let left = position.x.round() as i32;
        let top = position.y.round() as i32 - GLYPH_ROWS as i32 * scale;

        if let Some(glow) = style.glow {
            let radius = (glow.blur / 3.0).ceil().clamp(0.0, 4.0) as i32;
            if radius > 0 {
                let mask = GlyphMask::new(ch, scale);
                let halo_alpha = alpha * 0.35;
                for y in -radius..mask.height + radius {
                    for x in -radius..mask.width + radius {
                        if !mask.get(x, y) && mask.near(x, y, radius) {
                            self.blend_pixel(left + x, top + y, glow.color, halo_alpha, Blend::Over);
                        }
                    }
                }
            }
        }

        for (col, row) in font::lit_pixels(ch) {
            let (gx, gy) = (left + col as i32 * scale, top + row as i32 * scale);
            for dy in 0..scale {
                for dx in 0..scale {
                    self.blend_pixel(gx + dx, gy + dy, style.color, alpha, style.blend);
                }
            }
        }
    }
}

/// Scaled glyph coverage, used to find halo pixels.
struct GlyphMask {
    width: i32,
    height: i32,
    bits: Vec<bool>,
}

impl GlyphMask {
    fn new(ch: char, scale: i32) -> Self {
        let width = GLYPH_COLS as i32 * scale;
        let height = GLYPH_ROWS as i32 * scale;
        let mut bits = vec![false; (width * height) as usize];
        for (col, row) in font::lit_pixels(ch) {
            for dy in 0..scale {
                for dx in 0..scale {
                    let x = col as i32 * scale + dx;
                    let y = row as i32 * scale + dy;
                    bits[(y * width + x) as usize] = true;
                }
            }
        }
        Self { width, height, bits }
    }

    fn get(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height && self.bits[(y * self.width + x) as usize]
    }

    fn near(&self, x: i32, y: i32, radius: i32) -> bool {
        (-radius..=radius).any(|dy| (-radius..=radius).any(|dx| self.get(x + dx, y + dy)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREEN: Rgb = Rgb::new(0, 255, 0);

    fn lit_count(fb: &Framebuffer) -> usize {
        fb.pixels().chunks_exact(4).filter(|p| p[0] != 0 || p[1] != 0 || p[2] != 0).count()
    }

    #[test]
    fn test_new_is_opaque_black() {
        let fb = Framebuffer::new(4, 3);
        assert_eq!(fb.pixels().len(), 4 * 3 * 4);
        assert!(fb.pixels().chunks_exact(4).all(|p| p == [0, 0, 0, 255]));
    }

    #[test]
    fn test_fill_blends() {
        let mut fb = Framebuffer::new(2, 2);
        fb.fill(Rgb::new(200, 100, 50), 0.5);
        assert_eq!(fb.pixel(1, 1), Some(Rgb::new(100, 50, 25)));
        fb.fill(Rgb::new(10, 20, 30), 1.0);
        assert_eq!(fb.pixel(0, 0), Some(Rgb::new(10, 20, 30)));
    }

    #[test]
    fn test_glyph_stamps_font_pixels() {
        let mut fb = Framebuffer::new(20, 20);
        fb.draw_glyph('|', Vec2::new(0.0, 10.0), &GlyphStyle::new(GREEN, 1.0, 10.0));
        assert_eq!(lit_count(&fb), 7);
        assert_eq!(fb.pixel(2, 3), Some(GREEN));
        assert_eq!(fb.pixel(2, 9), Some(GREEN));
        assert_eq!(fb.pixel(2, 10), Some(Rgb::new(0, 0, 0)));
    }

    #[test]
    fn test_glyph_scales_with_font_size() {
        let mut fb = Framebuffer::new(40, 40);
        fb.draw_glyph('|', Vec2::new(0.0, 20.0), &GlyphStyle::new(GREEN, 1.0, 16.0));
        assert_eq!(lit_count(&fb), 7 * 4);
    }

    #[test]
    fn test_glow_adds_halo() {
        let mut plain = Framebuffer::new(30, 30);
        let mut glowing = Framebuffer::new(30, 30);
        let style = GlyphStyle::new(GREEN, 1.0, 10.0);
        plain.draw_glyph('A', Vec2::new(10.0, 20.0), &style);
        glowing.draw_glyph('A', Vec2::new(10.0, 20.0), &style.with_glow(10.0, GREEN));
        assert!(lit_count(&glowing) > lit_count(&plain));
    }

    #[test]
    fn test_difference_blend_inverts() {
        let mut fb = Framebuffer::new(10, 10);
        fb.fill(Rgb::new(255, 255, 255), 1.0);
        let style = GlyphStyle::new(Rgb::new(255, 0, 255), 1.0, 10.0).with_blend(Blend::Difference);
        fb.draw_glyph('|', Vec2::new(0.0, 7.0), &style);
        assert_eq!(fb.pixel(2, 0), Some(Rgb::new(0, 255, 0)));
    }

    #[test]
    fn test_clipping_and_zero_alpha() {
        let mut fb = Framebuffer::new(8, 8);
        fb.draw_glyph('A', Vec2::new(-3.0, 2.0), &GlyphStyle::new(GREEN, 1.0, 10.0));
        fb.draw_glyph('A', Vec2::new(100.0, 100.0), &GlyphStyle::new(GREEN, 1.0, 10.0));
        fb.draw_glyph('B', Vec2::new(0.0, 7.0), &GlyphStyle::new(GREEN, 0.0, 10.0));
        assert!(lit_count(&fb) > 0);
        assert!(fb.pixel(0, 7).is_some());
    }

    #[test]
    fn test_draw_text_advances() {
        let mut fb = Framebuffer::new(40, 10);
        fb.draw_text("||", Vec2::new(0.0, 7.0), &GlyphStyle::new(GREEN, 1.0, 10.0));
        assert_eq!(fb.pixel(2, 0), Some(GREEN));
        assert_eq!(fb.pixel(8, 0), Some(GREEN));
    }

    #[test]
    fn test_resize_resets() {
        let mut fb = Framebuffer::new(4, 4);
        fb.fill(GREEN, 1.0);
        fb.resize(6, 2);
        assert_eq!(fb.size(), (6, 2));
        assert_eq!(fb.pixel(5, 1), Some(Rgb::new(0, 0, 0)));
    }
}
