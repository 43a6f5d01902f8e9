// The shape variants and the closed sum type over them
//
// Each variant lives in its own file and implements the same set of
// operations: setup, mutate, rasterize, is_degenerate and Display. `Shape`
// dispatches to them with a `match`, so adding a variant is checked
// exhaustively by the compiler.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::geometry::{Bounds, Scanline};
use crate::random::RandomSource;

mod circle;
mod ellipse;
mod line;
mod polyline;
mod quadratic_bezier;
mod raster;
mod rectangle;
mod rotated_ellipse;
mod rotated_rectangle;
mod triangle;

pub use circle::Circle;
pub use ellipse::Ellipse;
pub use line::Line;
pub use polyline::Polyline;
pub use quadratic_bezier::QuadraticBezier;
pub use rectangle::Rectangle;
pub use rotated_ellipse::RotatedEllipse;
pub use rotated_rectangle::RotatedRectangle;
pub use triangle::Triangle;

/// Add `delta` to `value` and clamp the result into `[min, max]`
///
/// When the range is inverted there is no valid result, so `value` is
/// returned unchanged.
pub(crate) fn nudge(value: i32, delta: i32, min: i32, max: i32) -> i32 {
    if min > max {
        return value;
    }
    value.saturating_add(delta).clamp(min, max)
}

/// Whether the box spanned by `points` lies entirely outside `bounds`
///
/// Every variant draws inside the box of its defining points, so a shape
/// whose box misses the canvas can't cover any pixel.
pub(crate) fn misses_bounds(
    points: impl IntoIterator<Item = (i32, i32)>,
    bounds: &Bounds,
) -> bool {
    let mut points = points.into_iter();
    let Some((x, y)) = points.next() else {
        return true;
    };
    let (mut left, mut top, mut right, mut bottom) = (x, y, x, y);
    for (x, y) in points {
        left = left.min(x);
        right = right.max(x);
        top = top.min(y);
        bottom = bottom.max(y);
    }
    bounds.is_empty()
        || right < bounds.x_min
        || left > bounds.last_x()
        || bottom < bounds.y_min
        || top > bounds.last_y()
}

/// The kind of a shape, without its parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeType {
    Rectangle,
    RotatedRectangle,
    Triangle,
    Circle,
    Ellipse,
    RotatedEllipse,
    Line,
    Polyline,
    QuadraticBezier,
}

impl ShapeType {
    /// Every shape type, in declaration order
    pub const ALL: [ShapeType; 9] = [
        ShapeType::Rectangle,
        ShapeType::RotatedRectangle,
        ShapeType::Triangle,
        ShapeType::Circle,
        ShapeType::Ellipse,
        ShapeType::RotatedEllipse,
        ShapeType::Line,
        ShapeType::Polyline,
        ShapeType::QuadraticBezier,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeType::Rectangle => "rectangle",
            ShapeType::RotatedRectangle => "rotated_rectangle",
            ShapeType::Triangle => "triangle",
            ShapeType::Circle => "circle",
            ShapeType::Ellipse => "ellipse",
            ShapeType::RotatedEllipse => "rotated_ellipse",
            ShapeType::Line => "line",
            ShapeType::Polyline => "polyline",
            ShapeType::QuadraticBezier => "quadratic_bezier",
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses snake_case names; hyphens and upper case are accepted too
impl FromStr for ShapeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        ShapeType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| Error::UnknownShapeType(s.to_string()))
    }
}

/// A shape of any kind
///
/// Enum over the concrete variants: no dynamic dispatch, and the compiler
/// checks every operation handles every variant. `Clone` is the deep copy
/// used to snapshot a candidate before mutating it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Rectangle(Rectangle),
    RotatedRectangle(RotatedRectangle),
    Triangle(Triangle),
    Circle(Circle),
    Ellipse(Ellipse),
    RotatedEllipse(RotatedEllipse),
    Line(Line),
    Polyline(Polyline),
    QuadraticBezier(QuadraticBezier),
}

impl Shape {
    /// A shape of the given type with all parameters at zero
    ///
    /// Call [`Shape::setup`] (or use [`Shape::random`]) to place it.
    pub fn new(shape_type: ShapeType, bounds: Bounds) -> Self {
        match shape_type {
            ShapeType::Rectangle => Shape::Rectangle(Rectangle::new(bounds, 0, 0, 0, 0)),
            ShapeType::RotatedRectangle => {
                Shape::RotatedRectangle(RotatedRectangle::new(bounds, 0, 0, 0, 0, 0))
            }
            ShapeType::Triangle => Shape::Triangle(Triangle::new(bounds, [(0, 0); 3])),
            ShapeType::Circle => Shape::Circle(Circle::new(bounds, 0, 0, 0)),
            ShapeType::Ellipse => Shape::Ellipse(Ellipse::new(bounds, 0, 0, 0, 0)),
            ShapeType::RotatedEllipse => {
                Shape::RotatedEllipse(RotatedEllipse::new(bounds, 0, 0, 0, 0, 0))
            }
            ShapeType::Line => Shape::Line(Line::new(bounds, 0, 0, 0, 0)),
            ShapeType::Polyline => Shape::Polyline(Polyline::new(bounds, [(0, 0); 4])),
            ShapeType::QuadraticBezier => {
                Shape::QuadraticBezier(QuadraticBezier::new(bounds, 0, 0, 0, 0, 0, 0))
            }
        }
    }

    /// A freshly set up shape of the given type
    pub fn random(shape_type: ShapeType, bounds: Bounds, rng: &mut impl RandomSource) -> Self {
        let mut shape = Shape::new(shape_type, bounds);
        shape.setup(rng);
        shape
    }

    /// Pick one of `types` uniformly and set it up
    ///
    /// # Panics
    /// Panics if `types` is empty
    pub fn random_of(types: &[ShapeType], bounds: Bounds, rng: &mut impl RandomSource) -> Self {
        assert!(!types.is_empty(), "At least one shape type is required");
        let index = rng.random_range(0, types.len() as i32 - 1) as usize;
        Shape::random(types[index], bounds, rng)
    }

    /// Give every parameter a random value inside the bounds
    pub fn setup(&mut self, rng: &mut impl RandomSource) {
        match self {
            Shape::Rectangle(s) => s.setup(rng),
            Shape::RotatedRectangle(s) => s.setup(rng),
            Shape::Triangle(s) => s.setup(rng),
            Shape::Circle(s) => s.setup(rng),
            Shape::Ellipse(s) => s.setup(rng),
            Shape::RotatedEllipse(s) => s.setup(rng),
            Shape::Line(s) => s.setup(rng),
            Shape::Polyline(s) => s.setup(rng),
            Shape::QuadraticBezier(s) => s.setup(rng),
        }
    }

    /// Perturb exactly one group of parameters by a small random amount
    pub fn mutate(&mut self, rng: &mut impl RandomSource) {
        match self {
            Shape::Rectangle(s) => s.mutate(rng),
            Shape::RotatedRectangle(s) => s.mutate(rng),
            Shape::Triangle(s) => s.mutate(rng),
            Shape::Circle(s) => s.mutate(rng),
            Shape::Ellipse(s) => s.mutate(rng),
            Shape::RotatedEllipse(s) => s.mutate(rng),
            Shape::Line(s) => s.mutate(rng),
            Shape::Polyline(s) => s.mutate(rng),
            Shape::QuadraticBezier(s) => s.mutate(rng),
        }
    }

    /// Convert the shape into scanlines clipped to its bounds
    ///
    /// The scanlines never overlap. An empty result is logged as a warning;
    /// callers treat it as a candidate that can't improve anything.
    pub fn rasterize(&self) -> Vec<Scanline> {
        let lines = match self {
            Shape::Rectangle(s) => s.rasterize(),
            Shape::RotatedRectangle(s) => s.rasterize(),
            Shape::Triangle(s) => s.rasterize(),
            Shape::Circle(s) => s.rasterize(),
            Shape::Ellipse(s) => s.rasterize(),
            Shape::RotatedEllipse(s) => s.rasterize(),
            Shape::Line(s) => s.rasterize(),
            Shape::Polyline(s) => s.rasterize(),
            Shape::QuadraticBezier(s) => s.rasterize(),
        };
        if lines.is_empty() {
            log::warn!("{self} produced no scanlines");
        }
        lines
    }

    /// Whether the parameters describe a shape with no visual effect
    ///
    /// Decided from the parameters alone, without rasterizing.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Shape::Rectangle(s) => s.is_degenerate(),
            Shape::RotatedRectangle(s) => s.is_degenerate(),
            Shape::Triangle(s) => s.is_degenerate(),
            Shape::Circle(s) => s.is_degenerate(),
            Shape::Ellipse(s) => s.is_degenerate(),
            Shape::RotatedEllipse(s) => s.is_degenerate(),
            Shape::Line(s) => s.is_degenerate(),
            Shape::Polyline(s) => s.is_degenerate(),
            Shape::QuadraticBezier(s) => s.is_degenerate(),
        }
    }

    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Rectangle(_) => ShapeType::Rectangle,
            Shape::RotatedRectangle(_) => ShapeType::RotatedRectangle,
            Shape::Triangle(_) => ShapeType::Triangle,
            Shape::Circle(_) => ShapeType::Circle,
            Shape::Ellipse(_) => ShapeType::Ellipse,
            Shape::RotatedEllipse(_) => ShapeType::RotatedEllipse,
            Shape::Line(_) => ShapeType::Line,
            Shape::Polyline(_) => ShapeType::Polyline,
            Shape::QuadraticBezier(_) => ShapeType::QuadraticBezier,
        }
    }

    /// The canvas region this shape is constrained to
    pub fn bounds(&self) -> Bounds {
        match self {
            Shape::Rectangle(s) => s.bounds(),
            Shape::RotatedRectangle(s) => s.bounds(),
            Shape::Triangle(s) => s.bounds(),
            Shape::Circle(s) => s.bounds(),
            Shape::Ellipse(s) => s.bounds(),
            Shape::RotatedEllipse(s) => s.bounds(),
            Shape::Line(s) => s.bounds(),
            Shape::Polyline(s) => s.bounds(),
            Shape::QuadraticBezier(s) => s.bounds(),
        }
    }
}

/// Human readable description, e.g. `Circle(x=10, y=4, r=3)`
impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Rectangle(s) => fmt::Display::fmt(s, f),
            Shape::RotatedRectangle(s) => fmt::Display::fmt(s, f),
            Shape::Triangle(s) => fmt::Display::fmt(s, f),
            Shape::Circle(s) => fmt::Display::fmt(s, f),
            Shape::Ellipse(s) => fmt::Display::fmt(s, f),
            Shape::RotatedEllipse(s) => fmt::Display::fmt(s, f),
            Shape::Line(s) => fmt::Display::fmt(s, f),
            Shape::Polyline(s) => fmt::Display::fmt(s, f),
            Shape::QuadraticBezier(s) => fmt::Display::fmt(s, f),
        }
    }
}
