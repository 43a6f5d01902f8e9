// Pixel storage comes from the image crate
use image::{Rgba, RgbaImage};

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::geometry::Bounds;

/// A fixed-size grid of RGBA pixels
///
/// Thin wrapper around `image::RgbaImage` that adds the textual fixture format
/// and the bounds the shapes are constrained to. Width and height are fixed at
/// construction; pixels are mutated in place.
///
/// Equality is exact per-pixel equality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    image: RgbaImage,
}

impl Bitmap {
    /// Create a bitmap filled with a single colour
    pub fn new(width: u32, height: u32, color: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, color),
        }
    }

    /// Take ownership of an existing image
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Bounds covering the whole bitmap
    pub fn bounds(&self) -> Bounds {
        Bounds::from_dimensions(self.width(), self.height())
    }

    /// Read a pixel
    ///
    /// # Panics
    /// Panics if `(x, y)` is outside the bitmap
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    /// Overwrite a pixel
    ///
    /// # Panics
    /// Panics if `(x, y)` is outside the bitmap
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba<u8>) {
        self.image.put_pixel(x, y, color);
    }

    /// Overwrite every pixel with the same colour
    pub fn fill(&mut self, color: Rgba<u8>) {
        for pixel in self.image.pixels_mut() {
            *pixel = color;
        }
    }

    /// Raw RGBA bytes in row-major order
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

impl From<RgbaImage> for Bitmap {
    fn from(image: RgbaImage) -> Self {
        Self::from_image(image)
    }
}

impl Index<(u32, u32)> for Bitmap {
    type Output = Rgba<u8>;

    fn index(&self, (x, y): (u32, u32)) -> &Rgba<u8> {
        self.image.get_pixel(x, y)
    }
}

impl IndexMut<(u32, u32)> for Bitmap {
    fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut Rgba<u8> {
        self.image.get_pixel_mut(x, y)
    }
}

/// Textual fixture format
///
/// The first line holds `width height`; every following line is one row of
/// whitespace separated pixels written as `r,g,b,a`:
///
/// ```text
/// 2 1
/// 0,0,0,255 255,255,255,255
/// ```
impl fmt::Display for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.width(), self.height())?;
        for row in self.image.rows() {
            let pixels: Vec<String> = row
                .map(|p| format!("{},{},{},{}", p[0], p[1], p[2], p[3]))
                .collect();
            writeln!(f, "{}", pixels.join(" "))?;
        }
        Ok(())
    }
}

/// Parses the format written by `Display`
///
/// Pixels with only three channels are accepted and treated as opaque.
impl FromStr for Bitmap {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut tokens = s.split_whitespace();

        let mut dimension = |name: &str| -> Result<u32> {
            tokens
                .next()
                .and_then(|t| t.parse::<u32>().ok())
                .ok_or_else(|| Error::MalformedBitmap(format!("missing or invalid {name}")))
        };
        let width = dimension("width")?;
        let height = dimension("height")?;

        let expected = width as usize * height as usize;
        let mut raw = Vec::with_capacity(expected * 4);
        for token in tokens {
            raw.extend_from_slice(&parse_pixel(token)?);
        }

        if raw.len() != expected * 4 {
            return Err(Error::MalformedBitmap(format!(
                "expected {} pixels, found {}",
                expected,
                raw.len() / 4
            )));
        }

        // Length was checked above, so from_raw can't fail
        RgbaImage::from_raw(width, height, raw)
            .map(Bitmap::from_image)
            .ok_or_else(|| Error::MalformedBitmap("pixel buffer size mismatch".to_string()))
    }
}

fn parse_pixel(token: &str) -> Result<[u8; 4]> {
    let channels = token
        .split(',')
        .map(|c| c.trim().parse::<u8>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| Error::MalformedBitmap(format!("invalid pixel {token:?}")))?;

    match channels.as_slice() {
        [r, g, b, a] => Ok([*r, *g, *b, *a]),
        [r, g, b] => Ok([*r, *g, *b, 255]),
        _ => Err(Error::MalformedBitmap(format!("invalid pixel {token:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_bitmap_is_filled() {
        let bitmap = Bitmap::new(4, 3, Rgba([1, 2, 3, 4]));
        assert_eq!(bitmap.dimensions(), (4, 3));
        assert!(bitmap.as_image().pixels().all(|p| *p == Rgba([1, 2, 3, 4])));
    }

    #[test]
    fn test_pixel_access() {
        let mut bitmap = Bitmap::new(4, 4, Rgba([0, 0, 0, 255]));
        bitmap.set_pixel(1, 2, Rgba([255, 0, 0, 255]));
        assert_eq!(bitmap.pixel(1, 2), Rgba([255, 0, 0, 255]));
        assert_eq!(bitmap[(1, 2)], Rgba([255, 0, 0, 255]));

        bitmap[(3, 3)] = Rgba([0, 255, 0, 255]);
        assert_eq!(bitmap.pixel(3, 3), Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn test_equality_is_per_pixel() {
        let a = Bitmap::new(5, 5, Rgba([9, 9, 9, 255]));
        let mut b = a.clone();
        assert_eq!(a, b);
        b.set_pixel(4, 4, Rgba([9, 9, 9, 254]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_text_format_round_trip() {
        let mut bitmap = Bitmap::new(3, 2, Rgba([10, 20, 30, 255]));
        bitmap.set_pixel(2, 1, Rgba([0, 0, 0, 0]));

        let text = bitmap.to_string();
        assert!(text.starts_with("3 2\n"));

        let parsed: Bitmap = text.parse().unwrap();
        assert_eq!(parsed, bitmap);
    }

    #[test]
    fn test_parse_rgb_pixels_are_opaque() {
        let parsed: Bitmap = "1 1\n7,8,9".parse().unwrap();
        assert_eq!(parsed.pixel(0, 0), Rgba([7, 8, 9, 255]));
    }

    #[test]
    fn test_parse_wrong_pixel_count() {
        let result = "2 2\n0,0,0,0 0,0,0,0 0,0,0,0".parse::<Bitmap>();
        assert!(matches!(result, Err(Error::MalformedBitmap(_))));
    }

    #[test]
    fn test_parse_bad_channel() {
        assert!("1 1\n300,0,0,0".parse::<Bitmap>().is_err());
        assert!("x 1\n0,0,0,0".parse::<Bitmap>().is_err());
    }

    #[test]
    fn test_bounds_cover_bitmap() {
        let bitmap = Bitmap::new(8, 6, Rgba([0, 0, 0, 255]));
        assert_eq!(bitmap.bounds(), Bounds::new(0, 0, 8, 6));
    }
}
