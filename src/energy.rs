// Energy of a candidate shape: the score the canvas would have if the shape
// were painted on it with its best colour
use crate::bitmap::Bitmap;
use crate::fitness::difference_partial;
use crate::geometry::Scanline;
use crate::painting::{compute_color, copy_lines, draw_lines};

/// Score `current` would have after painting `lines` with the best colour
///
/// Works on `buffer` so `current` is left untouched:
/// 1. the colour closest to `target` at the given alpha is computed
/// 2. the pixels under `lines` are reset from `current`
/// 3. the colour is blended onto those pixels
/// 4. the score is updated from `score` over just those pixels
///
/// Only the pixels under `lines` are read or written, so `buffer` may hold
/// stale pixels elsewhere from earlier candidates.
///
/// # Arguments
/// * `lines` - Rasterized candidate; must not overlap itself
/// * `alpha` - Opacity the shape will be painted with
/// * `score` - `difference_full(target, current)`
///
/// # Returns
/// `difference_full(target, after)` where `after` is `current` with the
/// shape painted on; on return `buffer` holds `after` over `lines`
pub fn default_energy_function(
    lines: &[Scanline],
    alpha: u8,
    target: &Bitmap,
    current: &Bitmap,
    buffer: &mut Bitmap,
    score: f64,
) -> f64 {
    debug_assert_eq!(target.dimensions(), current.dimensions());
    debug_assert_eq!(target.dimensions(), buffer.dimensions());

    let color = compute_color(target, current, lines, alpha);
    copy_lines(buffer, current, lines);
    draw_lines(buffer, color, lines);
    difference_partial(target, current, buffer, score, lines)
}
