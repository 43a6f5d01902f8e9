// Bitmap difference metrics
//
// Every score in this crate is a root-mean-square distance over all RGBA
// channels of every pixel, scaled into [0, 1]:
//
//     score = sqrt(sum((a - b)^2) / (width * height * 4)) / 255
//
// `difference_partial` updates a known score after a few scanlines changed
// and must agree with recomputing the full score from scratch.
use crate::bitmap::Bitmap;
use crate::geometry::Scanline;

use image::Rgba;

// Rayon provides the parallel variant of the full difference
use rayon::prelude::*;

/// Squared error of one pixel, summed over all four channels
#[inline]
fn pixel_error(a: Rgba<u8>, b: Rgba<u8>) -> i64 {
    a.0.iter()
        .zip(b.0.iter())
        .map(|(&x, &y)| {
            let d = x as i64 - y as i64;
            d * d
        })
        .sum()
}

/// Number of channel values the score is averaged over
#[inline]
fn channel_count(bitmap: &Bitmap) -> f64 {
    bitmap.width() as f64 * bitmap.height() as f64 * 4.0
}

/// Turn a sum of squared channel errors into a normalized score
#[inline]
fn normalize(total: i64, channels: f64) -> f64 {
    if channels == 0.0 {
        return 0.0;
    }
    (total.max(0) as f64 / channels).sqrt() / 255.0
}

/// Calculate the difference between two bitmaps (lower is better)
///
/// Root-mean-square of the per-channel differences, including alpha,
/// normalized by 255. Identical bitmaps score `0.0`, a fully black opaque
/// bitmap against a fully white transparent one scores `1.0`.
///
/// # Panics
/// Panics if the bitmaps have different dimensions
pub fn difference_full(first: &Bitmap, second: &Bitmap) -> f64 {
    assert_eq!(
        first.dimensions(),
        second.dimensions(),
        "Bitmaps must have same dimensions"
    );

    let total: i64 = first
        .as_raw()
        .iter()
        .zip(second.as_raw())
        .map(|(&a, &b)| {
            let d = a as i64 - b as i64;
            d * d
        })
        .sum();

    normalize(total, channel_count(first))
}

/// Parallel version of [`difference_full`]
///
/// Splits the work row by row across the rayon thread pool. Integer
/// accumulation makes the result identical to the sequential version.
pub fn difference_full_parallel(first: &Bitmap, second: &Bitmap) -> f64 {
    assert_eq!(
        first.dimensions(),
        second.dimensions(),
        "Bitmaps must have same dimensions"
    );

    let row_bytes = (first.width() as usize * 4).max(1);
    let total: i64 = first
        .as_raw()
        .par_chunks(row_bytes)
        .zip(second.as_raw().par_chunks(row_bytes))
        .map(|(a_row, b_row)| {
            a_row
                .iter()
                .zip(b_row)
                .map(|(&a, &b)| {
                    let d = a as i64 - b as i64;
                    d * d
                })
                .sum::<i64>()
        })
        .sum();

    normalize(total, channel_count(first))
}

/// Update a full difference score after some pixels changed
///
/// `score` must be `difference_full(target, before)`, and `lines` must cover
/// every pixel that differs between `before` and `after` without covering any
/// pixel twice. Only the pixels under `lines` are visited, so the cost is
/// proportional to the painted area rather than the image size.
///
/// # Returns
/// The same value `difference_full(target, after)` would return, up to
/// floating point rounding
///
/// # Panics
/// Panics if a scanline lies outside the bitmaps. In debug builds also
/// panics when the three bitmaps don't share their dimensions.
pub fn difference_partial(
    target: &Bitmap,
    before: &Bitmap,
    after: &Bitmap,
    score: f64,
    lines: &[Scanline],
) -> f64 {
    debug_assert_eq!(target.dimensions(), before.dimensions());
    debug_assert_eq!(target.dimensions(), after.dimensions());

    let channels = channel_count(target);

    // Recover the running sum of squared errors the score stands for
    let scaled = score * 255.0;
    let mut total = (scaled * scaled * channels).round() as i64;

    for line in lines {
        let y = line.y as u32;
        for x in line.x1..=line.x2 {
            let x = x as u32;
            let t = target.pixel(x, y);
            total -= pixel_error(t, before.pixel(x, y));
            total += pixel_error(t, after.pixel(x, y));
        }
    }

    normalize(total, channels)
}
