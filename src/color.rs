use glam::Vec4;

/// # Color
///
/// 8-bit RGBA color.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Red.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Green.
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    /// Blue.
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    /// Cornflower blue.
    pub const CORNFLOWER_BLUE: Self = Self::rgb(100, 149, 237);

    /// Returns an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Returns a color with the given channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the channels as floats in `0.0..=1.0`.
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a].map(|channel| f32::from(channel) / 255.0)
    }

    /// Returns a color from float channels. Values are clamped to `0.0..=1.0`.
    pub fn from_array(value: [f32; 4]) -> Self {
        let [r, g, b, a] = value.map(unit_to_u8);
        Self { r, g, b, a }
    }

    /// Returns the channels as a vector in `0.0..=1.0`.
    pub fn to_vec4(self) -> Vec4 {
        Vec4::from_array(self.to_array())
    }

    /// Converts to hue, saturation and value.
    pub fn to_hsva(self) -> Hsva {
        let [r, g, b, _] = self.to_array();
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let chroma = max - min;

        let h = if chroma == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / chroma).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / chroma + 2.0)
        } else {
            60.0 * ((r - g) / chroma + 4.0)
        };
        let s = if max == 0.0 { 0.0 } else { chroma / max };

        Hsva {
            h,
            s,
            v: max,
            a: self.a,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<Hsva> for Color {
    fn from(value: Hsva) -> Self {
        value.to_rgba()
    }
}

/// # HSVA
///
/// Color as hue in degrees, saturation and value in `0.0..=1.0`, and 8-bit alpha.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hsva {
    /// Hue in degrees.
    pub h: f32,
    /// Saturation.
    pub s: f32,
    /// Value.
    pub v: f32,
    /// Alpha channel.
    pub a: u8,
}

impl Hsva {
    /// Converts to RGBA. Hue wraps around 360 degrees.
    pub fn to_rgba(self) -> Color {
        let h = self.h.rem_euclid(360.0);
        let s = self.s.clamp(0.0, 1.0);
        let v = self.v.clamp(0.0, 1.0);

        let chroma = v * s;
        let x = chroma * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
        let m = v - chroma;

        let (r, g, b) = match (h / 60.0) as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };

        Color {
            r: unit_to_u8(r + m),
            g: unit_to_u8(g + m),
            b: unit_to_u8(b + m),
            a: self.a,
        }
    }
}

impl From<Color> for Hsva {
    fn from(value: Color) -> Self {
        value.to_hsva()
    }
}

fn unit_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_hsva_red_returns_zero_hue() {
        let hsva = Color::RED.to_hsva();

        assert_eq!(hsva, Hsva { h: 0.0, s: 1.0, v: 1.0, a: 255 });
    }

    #[test]
    fn to_hsva_blue_returns_240_hue() {
        assert_eq!(Color::BLUE.to_hsva().h, 240.0);
    }

    #[test]
    fn to_hsva_gray_returns_zero_saturation() {
        let hsva = Color::rgb(128, 128, 128).to_hsva();

        assert_eq!(hsva.s, 0.0);
        assert_eq!(hsva.h, 0.0);
    }

    #[test]
    fn to_rgba_green_hue_returns_green() {
        let color = Hsva { h: 120.0, s: 1.0, v: 1.0, a: 255 }.to_rgba();

        assert_eq!(color, Color::GREEN);
    }

    #[test]
    fn to_rgba_wraps_hue() {
        let color = Hsva { h: 480.0, s: 1.0, v: 1.0, a: 10 }.to_rgba();

        assert_eq!(color, Color::rgba(0, 255, 0, 10));
    }

    #[test]
    fn hsva_conversion_preserves_cornflower_blue() {
        let color = Color::CORNFLOWER_BLUE.to_hsva().to_rgba();

        assert_eq!(color, Color::CORNFLOWER_BLUE);
    }

    #[test]
    fn from_array_clamps_channels() {
        let color = Color::from_array([2.0, -1.0, 0.5, 1.0]);

        assert_eq!(color, Color::rgba(255, 0, 128, 255));
    }

    #[test]
    fn to_array_white_returns_ones() {
        assert_eq!(Color::WHITE.to_array(), [1.0; 4]);
    }
}
