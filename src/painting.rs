// Colour fitting, alpha blending and the record of painted shapes
use crate::bitmap::Bitmap;
use crate::geometry::Scanline;
use crate::shapes::Shape;

// Image types from the image crate
use image::Rgba;

// Serialization support for exporting paintings
use serde::{Deserialize, Serialize};

/// Compute the colour that best brings `current` towards `target` on `lines`
///
/// Finds the colour which, composited over `current` with the given alpha,
/// lands closest on average to `target` over every pixel of `lines`. The
/// returned colour carries `alpha` in its alpha channel.
///
/// With no pixels to look at the colour is black; with `alpha == 0` nothing
/// can be painted, so a fully transparent colour is returned.
pub fn compute_color(
    target: &Bitmap,
    current: &Bitmap,
    lines: &[Scanline],
    alpha: u8,
) -> Rgba<u8> {
    if alpha == 0 {
        return Rgba([0, 0, 0, 0]);
    }

    // Fixed point: channels are scaled by 257 (0..=255 -> 0..=65535), and the
    // difference to the target is amplified by the inverse of the alpha
    let a = 257 * 255 / alpha as i64;

    let mut totals = [0i64; 3];
    let mut count = 0i64;

    for line in lines {
        let y = line.y as u32;
        for x in line.x1..=line.x2 {
            let t = target.pixel(x as u32, y);
            let c = current.pixel(x as u32, y);
            for (channel, total) in totals.iter_mut().enumerate() {
                let tc = t[channel] as i64;
                let cc = c[channel] as i64;
                *total += (tc - cc) * a + cc * 257;
            }
            count += 1;
        }
    }

    if count == 0 {
        return Rgba([0, 0, 0, alpha]);
    }

    let channel = |total: i64| ((total / count) >> 8).clamp(0, 255) as u8;
    Rgba([
        channel(totals[0]),
        channel(totals[1]),
        channel(totals[2]),
        alpha,
    ])
}

/// Copy the pixels covered by `lines` from `source` into `destination`
pub fn copy_lines(destination: &mut Bitmap, source: &Bitmap, lines: &[Scanline]) {
    for line in lines {
        let y = line.y as u32;
        for x in line.x1..=line.x2 {
            destination.set_pixel(x as u32, y, source.pixel(x as u32, y));
        }
    }
}

/// Draw `lines` onto `bitmap` with proper alpha blending
///
/// Porter-Duff "over" in 16-bit fixed point: the colour is premultiplied by
/// its alpha and each destination channel is scaled by the inverse alpha.
/// Every channel, alpha included, is blended the same way.
pub fn draw_lines(bitmap: &mut Bitmap, color: Rgba<u8>, lines: &[Scanline]) {
    const MAX: u32 = u16::MAX as u32;

    let [r, g, b, a] = color.0;
    let alpha = a as u32;

    // Widen 8-bit channels to 16 bits (x * 257) and premultiply by alpha
    let premultiply = |c: u8| {
        let c = c as u32;
        (c | (c << 8)) * alpha / 255
    };
    let sr = premultiply(r);
    let sg = premultiply(g);
    let sb = premultiply(b);
    let sa = alpha | (alpha << 8);

    let inverse = (MAX - sa) * 257;

    // Fits in u32: dst * inverse + src * MAX <= MAX^2 because src <= sa
    let blend = |dst: u8, src: u32| (((dst as u32 * inverse + src * MAX) / MAX) >> 8) as u8;

    for line in lines {
        let y = line.y as u32;
        for x in line.x1..=line.x2 {
            let d = bitmap.pixel(x as u32, y);
            bitmap.set_pixel(
                x as u32,
                y,
                Rgba([
                    blend(d[0], sr),
                    blend(d[1], sg),
                    blend(d[2], sb),
                    blend(d[3], sa),
                ]),
            );
        }
    }
}

/// Average colour of a bitmap, a good default background
pub fn average_color(bitmap: &Bitmap) -> Rgba<u8> {
    let count = bitmap.width() as u64 * bitmap.height() as u64;
    if count == 0 {
        return Rgba([0, 0, 0, 255]);
    }

    let mut totals = [0u64; 4];
    for pixel in bitmap.as_image().pixels() {
        for (total, &channel) in totals.iter_mut().zip(pixel.0.iter()) {
            *total += channel as u64;
        }
    }

    Rgba(totals.map(|total| (total / count) as u8))
}

/// A shape that has been painted, with its colour and the score it left behind
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeResult {
    /// Difference between target and canvas after painting this shape
    pub score: f64,

    /// Colour the shape was painted with, alpha included
    /// Stored as a plain array: the image crate is built without its serde feature
    pub color: [u8; 4],

    pub shape: Shape,
}

/// An ordered list of painted shapes on top of a flat background
///
/// Order matters: later shapes are blended over earlier ones. Rendering a
/// painting replays exactly the draws the model performed, so `render()`
/// reproduces the model's canvas pixel for pixel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Painting {
    /// Shapes in the order they were painted
    pub shapes: Vec<ShapeResult>,

    /// Background colour the canvas started from
    background: [u8; 4],

    width: u32,
    height: u32,
}

impl Painting {
    /// Create an empty painting
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Self {
        Self {
            shapes: Vec::new(),
            background: background.0,
            width,
            height,
        }
    }

    /// Record a painted shape on top of the others
    pub fn push(&mut self, result: ShapeResult) {
        self.shapes.push(result);
    }

    /// Render the painting to a bitmap
    pub fn render(&self) -> Bitmap {
        let mut bitmap = Bitmap::new(self.width, self.height, self.background());
        for result in &self.shapes {
            let lines = result.shape.rasterize();
            draw_lines(&mut bitmap, Rgba(result.color), &lines);
        }
        bitmap
    }

    pub fn background(&self) -> Rgba<u8> {
        Rgba(self.background)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bounds;
    use crate::shapes::{Rectangle, Shape};

    fn rows(y1: i32, y2: i32, x1: i32, x2: i32) -> Vec<Scanline> {
        (y1..=y2).map(|y| Scanline::new(y, x1, x2)).collect()
    }

    #[test]
    fn test_draw_opaque_replaces_pixels() {
        let mut bitmap = Bitmap::new(4, 4, Rgba([10, 20, 30, 255]));
        let lines = rows(1, 2, 1, 2);
        draw_lines(&mut bitmap, Rgba([200, 100, 50, 255]), &lines);

        assert_eq!(bitmap.pixel(1, 1), Rgba([200, 100, 50, 255]));
        assert_eq!(bitmap.pixel(2, 2), Rgba([200, 100, 50, 255]));
        // Outside the lines nothing changes
        assert_eq!(bitmap.pixel(0, 0), Rgba([10, 20, 30, 255]));
        assert_eq!(bitmap.pixel(3, 1), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_draw_transparent_is_noop() {
        let original = Bitmap::new(3, 3, Rgba([10, 20, 30, 255]));
        let mut bitmap = original.clone();
        draw_lines(&mut bitmap, Rgba([255, 255, 255, 0]), &rows(0, 2, 0, 2));
        assert_eq!(bitmap, original);
    }

    #[test]
    fn test_draw_half_alpha_blends() {
        let mut bitmap = Bitmap::new(1, 1, Rgba([0, 0, 0, 255]));
        draw_lines(&mut bitmap, Rgba([255, 255, 255, 128]), &rows(0, 0, 0, 0));
        let p = bitmap.pixel(0, 0);
        // About half way between black and white
        assert!((126..=130).contains(&p[0]), "{p:?}");
        assert_eq!(p[0], p[1]);
        assert_eq!(p[1], p[2]);
        assert_eq!(p[3], 255);
    }

    #[test]
    fn test_draw_is_deterministic() {
        let mut a = Bitmap::new(5, 5, Rgba([40, 90, 160, 255]));
        let mut b = a.clone();
        let lines = rows(0, 4, 1, 3);
        draw_lines(&mut a, Rgba([7, 77, 177, 99]), &lines);
        draw_lines(&mut b, Rgba([7, 77, 177, 99]), &lines);
        assert_eq!(a, b);
    }

    #[test]
    fn test_copy_lines_only_touches_lines() {
        let source = Bitmap::new(4, 4, Rgba([255, 0, 0, 255]));
        let mut destination = Bitmap::new(4, 4, Rgba([0, 0, 255, 255]));
        copy_lines(&mut destination, &source, &[Scanline::new(2, 1, 3)]);

        assert_eq!(destination.pixel(1, 2), Rgba([255, 0, 0, 255]));
        assert_eq!(destination.pixel(3, 2), Rgba([255, 0, 0, 255]));
        assert_eq!(destination.pixel(0, 2), Rgba([0, 0, 255, 255]));
        assert_eq!(destination.pixel(1, 1), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_compute_color_opaque_is_target_average() {
        let mut target = Bitmap::new(4, 1, Rgba([100, 0, 0, 255]));
        target.set_pixel(1, 0, Rgba([200, 0, 0, 255]));
        let current = Bitmap::new(4, 1, Rgba([0, 0, 0, 255]));

        let color = compute_color(&target, &current, &[Scanline::new(0, 0, 1)], 255);
        assert_eq!(color, Rgba([150, 0, 0, 255]));
    }

    #[test]
    fn test_compute_color_half_alpha_overshoots() {
        // To reach 128 from 0 at half opacity the paint must be near white
        let target = Bitmap::new(2, 2, Rgba([128, 128, 128, 255]));
        let current = Bitmap::new(2, 2, Rgba([0, 0, 0, 255]));
        let color = compute_color(&target, &current, &rows(0, 1, 0, 1), 128);
        assert!(color[0] >= 250, "{color:?}");
        assert_eq!(color[3], 128);
    }

    #[test]
    fn test_compute_color_clamps() {
        // Unreachable target: the raw estimate is negative and must clamp at 0
        let target = Bitmap::new(1, 1, Rgba([0, 0, 0, 255]));
        let current = Bitmap::new(1, 1, Rgba([255, 255, 255, 255]));
        let color = compute_color(&target, &current, &rows(0, 0, 0, 0), 10);
        assert_eq!(color, Rgba([0, 0, 0, 10]));
    }

    #[test]
    fn test_compute_color_edge_cases() {
        let bitmap = Bitmap::new(2, 2, Rgba([9, 9, 9, 255]));
        assert_eq!(compute_color(&bitmap, &bitmap, &[], 77), Rgba([0, 0, 0, 77]));
        assert_eq!(
            compute_color(&bitmap, &bitmap, &rows(0, 1, 0, 1), 0),
            Rgba([0, 0, 0, 0])
        );
    }

    #[test]
    fn test_average_color() {
        let mut bitmap = Bitmap::new(2, 1, Rgba([0, 100, 200, 255]));
        bitmap.set_pixel(1, 0, Rgba([100, 200, 0, 255]));
        assert_eq!(average_color(&bitmap), Rgba([50, 150, 100, 255]));
    }

    #[test]
    fn test_painting_render_replays_draws() {
        let bounds = Bounds::from_dimensions(20, 20);
        let mut painting = Painting::new(20, 20, Rgba([255, 255, 255, 255]));
        assert!(painting.is_empty());

        let shape = Shape::Rectangle(Rectangle::new(bounds, 2, 3, 10, 12));
        let color = [30, 60, 90, 128];
        painting.push(ShapeResult {
            score: 0.5,
            color,
            shape: shape.clone(),
        });

        let mut expected = Bitmap::new(20, 20, Rgba([255, 255, 255, 255]));
        draw_lines(&mut expected, Rgba(color), &shape.rasterize());

        assert_eq!(painting.len(), 1);
        assert_eq!(painting.dimensions(), (20, 20));
        assert_eq!(painting.render(), expected);
    }

    #[test]
    fn test_painting_json_round_trip() {
        let bounds = Bounds::from_dimensions(10, 10);
        let mut painting = Painting::new(10, 10, Rgba([1, 2, 3, 255]));
        painting.push(ShapeResult {
            score: 0.25,
            color: [4, 5, 6, 128],
            shape: Shape::Rectangle(Rectangle::new(bounds, 1, 1, 4, 4)),
        });

        let json = painting.to_json().unwrap();
        assert!(json.contains("\"rectangle\""));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["shapes"][0]["color"], serde_json::json!([4, 5, 6, 128]));

        let parsed: Painting = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, painting);
    }
}
