// Rasterization helpers shared by the shape variants
use std::collections::{BTreeMap, HashSet};

// Bresenham line iteration from imageproc
use imageproc::drawing::BresenhamLineIter;

use crate::geometry::{Bounds, Point, Scanline};

/// Every pixel on the Bresenham line from `from` to `to`, endpoints included
pub(crate) fn line_points(from: Point<i32>, to: Point<i32>) -> impl Iterator<Item = Point<i32>> {
    BresenhamLineIter::new((from.x as f32, from.y as f32), (to.x as f32, to.y as f32))
        .map(|(x, y)| Point::new(x, y))
}

/// Trace a one pixel wide stroke through `points`
///
/// Consecutive points are joined with Bresenham lines so the stroke has no
/// gaps. A pixel reached twice (where segments meet or the path crosses
/// itself) is emitted only once: the energy and difference functions rely on
/// scanlines never overlapping.
pub(crate) fn trace_path(points: &[Point<i32>], bounds: &Bounds) -> Vec<Scanline> {
    let mut visited: HashSet<Point<i32>> = HashSet::new();
    let mut lines = Vec::new();

    let mut emit = |point: Point<i32>| {
        if visited.insert(point) {
            if let Some(line) = bounds.trim(Scanline::new(point.y, point.x, point.x)) {
                lines.push(line);
            }
        }
    };

    match points {
        [] => {}
        [only] => emit(*only),
        _ => {
            for pair in points.windows(2) {
                for point in line_points(pair[0], pair[1]) {
                    emit(point);
                }
            }
        }
    }

    lines
}

/// Fill a convex polygon
///
/// Traces every edge with Bresenham and emits, for each row the outline
/// touches, one scanline from the leftmost to the rightmost traced pixel.
/// Rows come out top to bottom.
pub(crate) fn fill_polygon(vertices: &[(f32, f32)], bounds: &Bounds) -> Vec<Scanline> {
    if vertices.is_empty() {
        return Vec::new();
    }

    let mut rows: BTreeMap<i32, (i32, i32)> = BTreeMap::new();
    for (i, &from) in vertices.iter().enumerate() {
        let to = vertices[(i + 1) % vertices.len()];
        for (x, y) in BresenhamLineIter::new(from, to) {
            rows.entry(y)
                .and_modify(|(x1, x2)| {
                    *x1 = (*x1).min(x);
                    *x2 = (*x2).max(x);
                })
                .or_insert((x, x));
        }
    }

    rows.into_iter()
        .filter_map(|(y, (x1, x2))| bounds.trim(Scanline::new(y, x1, x2)))
        .collect()
}

/// Largest integer whose square is at most `n`
pub(crate) fn isqrt(n: i64) -> i64 {
    if n <= 0 {
        return 0;
    }
    let mut root = (n as f64).sqrt() as i64;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root
}

/// Rotate `(dx, dy)` by `angle` degrees and translate it to `(x, y)`
///
/// The result is rounded to whole pixels; Bresenham truncates towards zero.
pub(crate) fn rotate_about(x: i32, y: i32, dx: f64, dy: f64, angle: i32) -> (f32, f32) {
    let (sin, cos) = (angle as f64).to_radians().sin_cos();
    (
        (dx * cos - dy * sin + x as f64).round() as f32,
        (dx * sin + dy * cos + y as f64).round() as f32,
    )
}
