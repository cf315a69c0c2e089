//! Normalized RGB color used by the compositor.

use std::ops::Mul;

/// An RGB triple with channels conventionally in `[0, 1]`.
///
/// Channels are not clamped on construction or scaling; clamping only happens
/// when the color is rasterized with [`Color::to_rgb8`].
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// A gray with every channel set to `value`.
    pub const fn gray(value: f64) -> Self {
        Self::new(value, value, value)
    }

    /// Convert to 8-bit channels: clamp to `[0, 1]`, scale by 255, truncate.
    pub fn to_rgb8(self) -> [u8; 3] {
        [channel_to_u8(self.r), channel_to_u8(self.g), channel_to_u8(self.b)]
    }
}

impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, rhs: f64) -> Color {
        Color::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}

/// Truncates rather than rounds: 0.5 maps to 127.
fn channel_to_u8(value: f64) -> u8 {
    // NaN maps to 0
    let clamped = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    (clamped * 255.0) as u8
}
