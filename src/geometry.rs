// Small value types shared by the rasterizers, the bitmap and the metrics
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A point on the integer pixel grid
///
/// Only used as an intermediate while tracing outlines. `Hash` lets the
/// tracers de-duplicate pixels with a `HashSet`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

/// A horizontal run of pixels on row `y`, from `x1` to `x2` inclusive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Scanline {
    pub y: i32,
    pub x1: i32,
    pub x2: i32,
}

impl Scanline {
    pub fn new(y: i32, x1: i32, x2: i32) -> Self {
        Self { y, x1, x2 }
    }

    /// Clip this scanline to the inclusive rectangle `[min_x, max_x] x [min_y, max_y]`
    ///
    /// Returns `None` when the row lies outside the vertical range, when the run
    /// is inverted (`x1 > x2`) or when nothing of it survives horizontal
    /// clipping. Runs are never clamped onto the border of the rectangle.
    pub fn trimmed(&self, min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Option<Scanline> {
        if self.y < min_y || self.y > max_y || self.x1 > self.x2 {
            return None;
        }
        let x1 = self.x1.max(min_x);
        let x2 = self.x2.min(max_x);
        if x1 > x2 {
            return None;
        }
        Some(Scanline::new(self.y, x1, x2))
    }

    /// Number of pixels covered by this run
    pub fn len(&self) -> usize {
        (self.x2 - self.x1 + 1).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.x1 > self.x2
    }
}

impl fmt::Display for Scanline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.y, self.x1, self.x2)
    }
}

/// Parses a single `(y,x1,x2)` literal
impl FromStr for Scanline {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::MalformedScanline(s.to_string());
        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(malformed)?;

        let values = inner
            .split(',')
            .map(|part| part.trim().parse::<i32>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| malformed())?;

        match values.as_slice() {
            [y, x1, x2] => Ok(Scanline::new(*y, *x1, *x2)),
            _ => Err(malformed()),
        }
    }
}

/// Parse a comma separated list of scanline literals, e.g. `(0,1,4),(1,0,5)`
pub fn parse_scanlines(text: &str) -> Result<Vec<Scanline>> {
    text.split_inclusive(')')
        .map(|chunk| chunk.trim().trim_start_matches(',').trim())
        .filter(|chunk| !chunk.is_empty())
        .map(str::parse)
        .collect()
}

/// Format scanlines in the same literal list syntax accepted by [`parse_scanlines`]
pub fn format_scanlines(lines: &[Scanline]) -> String {
    lines
        .iter()
        .map(Scanline::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// The region of the canvas a shape may occupy
///
/// `x_max` and `y_max` are exclusive, so the bounds of a `w x h` bitmap are
/// `(0, 0, w, h)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl Bounds {
    pub fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Bounds covering a whole `width x height` canvas
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    /// Last valid column (inclusive)
    pub fn last_x(&self) -> i32 {
        self.x_max - 1
    }

    /// Last valid row (inclusive)
    pub fn last_y(&self) -> i32 {
        self.y_max - 1
    }

    pub fn width(&self) -> i32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> i32 {
        self.y_max - self.y_min
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Clip a scanline so that every pixel it covers is inside these bounds
    pub fn trim(&self, line: Scanline) -> Option<Scanline> {
        line.trimmed(self.x_min, self.y_min, self.last_x(), self.last_y())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_inside_is_unchanged() {
        let line = Scanline::new(5, 2, 8);
        assert_eq!(line.trimmed(0, 0, 9, 9), Some(line));
    }

    #[test]
    fn test_trim_clamps_horizontally() {
        let line = Scanline::new(5, -4, 20);
        assert_eq!(line.trimmed(0, 0, 9, 9), Some(Scanline::new(5, 0, 9)));
    }

    #[test]
    fn test_trim_drops_rows_outside() {
        assert_eq!(Scanline::new(-1, 0, 5).trimmed(0, 0, 9, 9), None);
        assert_eq!(Scanline::new(10, 0, 5).trimmed(0, 0, 9, 9), None);
    }

    #[test]
    fn test_trim_drops_runs_outside_horizontally() {
        // Entirely to the right: never collapsed onto the border column
        assert_eq!(Scanline::new(3, 12, 15).trimmed(0, 0, 9, 9), None);
        assert_eq!(Scanline::new(3, -8, -1).trimmed(0, 0, 9, 9), None);
    }

    #[test]
    fn test_trim_drops_inverted_runs() {
        assert_eq!(Scanline::new(3, 6, 2).trimmed(0, 0, 9, 9), None);
    }

    #[test]
    fn test_trim_with_inverted_bounds() {
        // min_x > max_x can't produce a valid run
        assert_eq!(Scanline::new(0, 0, 10).trimmed(6, 0, 4, 9), None);
    }

    #[test]
    fn test_bounds_trim_is_exclusive_at_max() {
        let bounds = Bounds::from_dimensions(10, 10);
        assert_eq!(
            bounds.trim(Scanline::new(9, 5, 10)),
            Some(Scanline::new(9, 5, 9))
        );
        assert_eq!(bounds.trim(Scanline::new(10, 5, 6)), None);
    }

    #[test]
    fn test_scanline_len() {
        assert_eq!(Scanline::new(0, 3, 3).len(), 1);
        assert_eq!(Scanline::new(0, 3, 7).len(), 5);
        assert!(Scanline::new(0, 4, 3).is_empty());
    }

    #[test]
    fn test_parse_scanline_list() {
        let lines = parse_scanlines("(0,1,4),(1, 0, 5) ,\n(2,-3,7)").unwrap();
        assert_eq!(
            lines,
            vec![
                Scanline::new(0, 1, 4),
                Scanline::new(1, 0, 5),
                Scanline::new(2, -3, 7)
            ]
        );
        assert_eq!(format_scanlines(&lines), "(0,1,4),(1,0,5),(2,-3,7)");
    }

    #[test]
    fn test_parse_empty_list() {
        assert!(parse_scanlines("  ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            "(1,2)".parse::<Scanline>(),
            Err(Error::MalformedScanline(_))
        ));
        assert!(parse_scanlines("(1,2,x)").is_err());
    }
}
