//! 8-bit RGB / RGBA color types.
//!
//! Every constructor that takes arithmetic input (floats or wide integers)
//! clamps into `0..=255`, so an out-of-range channel can never be built.

use serde::{Deserialize, Serialize};

/// Opaque 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from float channels, truncating toward zero then clamping.
    /// NaN maps to 0.
    #[inline]
    pub fn from_f32(r: f32, g: f32, b: f32) -> Self {
        Self::new(clamp_f32(r), clamp_f32(g), clamp_f32(b))
    }

    /// Builds a color from signed channels, clamping each into `0..=255`.
    #[inline]
    pub fn from_i32(r: i32, g: i32, b: i32) -> Self {
        Self::new(clamp_i32(r), clamp_i32(g), clamp_i32(b))
    }

    #[inline]
    pub const fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Attach an alpha channel.
    #[inline]
    pub const fn with_alpha(self, a: u8) -> Rgba {
        Rgba { r: self.r, g: self.g, b: self.b, a }
    }

    #[inline]
    pub const fn opaque(self) -> Rgba {
        self.with_alpha(255)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

/// 8-bit sRGB color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    #[inline]
    pub const fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    #[inline]
    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Source-over composite of `self` onto an opaque destination pixel.
    #[inline]
    pub fn blend_over(self, dst: [u8; 3]) -> [u8; 3] {
        match self.a {
            255 => [self.r, self.g, self.b],
            0 => dst,
            a => {
                let a = u32::from(a);
                let inv = 255 - a;
                let mix = |s: u8, d: u8| ((u32::from(s) * a + u32::from(d) * inv + 127) / 255) as u8;
                [mix(self.r, dst[0]), mix(self.g, dst[1]), mix(self.b, dst[2])]
            }
        }
    }
}

#[inline]
fn clamp_f32(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.trunc().clamp(0.0, 255.0) as u8
}

#[inline]
fn clamp_i32(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_constructor_clamps_and_truncates() {
        assert_eq!(Rgb::from_f32(-4.0, 300.5, 127.9), Rgb::new(0, 255, 127));
        assert_eq!(Rgb::from_f32(f32::NAN, f32::INFINITY, f32::NEG_INFINITY), Rgb::new(0, 255, 0));
    }

    #[test]
    fn int_constructor_clamps() {
        assert_eq!(Rgb::from_i32(-18, 273, 40), Rgb::new(0, 255, 40));
    }

    #[test]
    fn blend_extremes() {
        let dst = [10, 20, 30];
        assert_eq!(Rgb::new(200, 100, 0).opaque().blend_over(dst), [200, 100, 0]);
        assert_eq!(Rgb::new(200, 100, 0).with_alpha(0).blend_over(dst), dst);
    }

    #[test]
    fn blend_half_alpha_rounds() {
        // (255*128 + 0*127 + 127) / 255 = 128
        let out = Rgb::WHITE.with_alpha(128).blend_over([0, 0, 0]);
        assert_eq!(out, [128, 128, 128]);
    }
}
