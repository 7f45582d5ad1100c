/// Linear RGBA color with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Rgba { r, g, b, a }
    }

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Rgba { r, g, b, a: 1.0 }
    }

    /// Builds an opaque color from a `0xRRGGBB` literal
    pub fn hex(value: u32) -> Self {
        let r = ((value >> 16) & 0xff) as f64 / 255.0;
        let g = ((value >> 8) & 0xff) as f64 / 255.0;
        let b = (value & 0xff) as f64 / 255.0;
        Rgba::rgb(r, g, b)
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Rgba { a, ..self }
    }

    /// Multiplies the color channels, leaving alpha untouched
    pub fn scale(self, factor: f64) -> Self {
        Rgba {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
            a: self.a,
        }
    }

    /// Component-wise product of the color channels
    pub fn modulate(self, other: Rgba) -> Self {
        Rgba {
            r: self.r * other.r,
            g: self.g * other.g,
            b: self.b * other.b,
            a: self.a,
        }
    }

    pub fn add(self, other: Rgba) -> Self {
        Rgba {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
            a: self.a,
        }
    }

    pub fn lerp(self, other: Rgba, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Rgba {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Source-over compositing of `self` onto an opaque `dst`
    pub fn over(self, dst: Rgba) -> Self {
        dst.lerp(self.with_alpha(1.0), self.a)
    }

    pub fn clamped(self) -> Self {
        Rgba {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }

    /// Quantizes to 8-bit channels
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let c = self.clamped();
        (
            (c.r * 255.0).round() as u8,
            (c.g * 255.0).round() as u8,
            (c.b * 255.0).round() as u8,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_unpacks_channels() {
        assert_eq!(Rgba::hex(0xff0000).to_rgb8(), (255, 0, 0));
        assert_eq!(Rgba::hex(0x87ceeb).to_rgb8(), (0x87, 0xce, 0xeb));
    }

    #[test]
    fn over_respects_alpha() {
        let sky = Rgba::rgb(0.0, 0.0, 1.0);
        assert_eq!(Rgba::WHITE.with_alpha(0.0).over(sky), sky);
        assert_eq!(Rgba::WHITE.over(sky), Rgba::WHITE);
        let half = Rgba::WHITE.with_alpha(0.5).over(Rgba::BLACK);
        assert!((half.r - 0.5).abs() < 1e-12);
    }

    #[test]
    fn quantization_clamps() {
        assert_eq!(Rgba::rgb(2.0, -1.0, 0.5).to_rgb8(), (255, 0, 128));
    }
}
