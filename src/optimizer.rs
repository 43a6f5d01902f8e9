// Greedy hill climbing over shape parameters
use log::{debug, trace};

use crate::bitmap::Bitmap;
use crate::geometry::Scanline;
use crate::random::RandomSource;
use crate::shapes::{Shape, ShapeType};

/// A candidate shape together with the score painting it would give
#[derive(Clone, Debug, PartialEq)]
pub struct State {
    /// Canvas score after painting `shape`; lower is better
    pub score: f64,
    /// Opacity the shape is painted with
    pub alpha: u8,
    pub shape: Shape,
}

impl State {
    pub fn new(shape: Shape, alpha: u8, score: f64) -> Self {
        Self {
            score,
            alpha,
            shape,
        }
    }
}

/// Improve `state` by random local search
///
/// Runs exactly `max_age` iterations. Each one copies the best shape so far,
/// mutates the copy, rasterizes it and scores it with `energy`. The copy
/// replaces the best only when its score is strictly lower, so the result is
/// never worse than `state`. A copy that rasterizes to nothing is discarded
/// without being scored.
///
/// # Arguments
/// * `state` - Starting point; its score must come from the same `energy`
/// * `max_age` - Number of mutations to try
/// * `buffer` - Scratch bitmap, left holding the last scored candidate
/// * `last_score` - `difference_full(target, current)`
/// * `energy` - Scores scanlines; see [`crate::energy::default_energy_function`]
///
/// # Returns
/// The best state found. With `max_age == 0` this is a copy of `state`.
#[allow(clippy::too_many_arguments)]
pub fn hill_climb<R, E>(
    state: &State,
    max_age: u32,
    target: &Bitmap,
    current: &Bitmap,
    buffer: &mut Bitmap,
    last_score: f64,
    rng: &mut R,
    mut energy: E,
) -> State
where
    R: RandomSource,
    E: FnMut(&[Scanline], u8, &Bitmap, &Bitmap, &mut Bitmap, f64) -> f64,
{
    let mut best = state.clone();
    let mut accepted = 0u32;

    for age in 0..max_age {
        let mut candidate = best.shape.clone();
        candidate.mutate(rng);

        let lines = candidate.rasterize();
        if lines.is_empty() {
            continue;
        }

        let score = energy(&lines, best.alpha, target, current, buffer, last_score);
        if score < best.score {
            debug!("age {age}: {candidate} improves {:.6} -> {score:.6}", best.score);
            best = State::new(candidate, best.alpha, score);
            accepted += 1;
        } else {
            trace!("age {age}: rejected {candidate} at {score:.6}");
        }
    }

    debug!(
        "hill climb kept {accepted}/{max_age} mutations, score {:.6} -> {:.6}",
        state.score, best.score
    );
    best
}

/// Best of `count` freshly set up random shapes
///
/// Each shape type is drawn uniformly from `shape_types`. Degenerate shapes
/// and shapes that rasterize to nothing are skipped.
///
/// # Returns
/// `None` when no candidate produced any scanlines
///
/// # Panics
/// Panics if `shape_types` is empty
#[allow(clippy::too_many_arguments)]
pub fn best_random_state<R, E>(
    shape_types: &[ShapeType],
    alpha: u8,
    count: u32,
    target: &Bitmap,
    current: &Bitmap,
    buffer: &mut Bitmap,
    last_score: f64,
    rng: &mut R,
    mut energy: E,
) -> Option<State>
where
    R: RandomSource,
    E: FnMut(&[Scanline], u8, &Bitmap, &Bitmap, &mut Bitmap, f64) -> f64,
{
    let bounds = target.bounds();
    let mut best: Option<State> = None;

    for _ in 0..count {
        let shape = Shape::random_of(shape_types, bounds, rng);
        if shape.is_degenerate() {
            continue;
        }
        let lines = shape.rasterize();
        if lines.is_empty() {
            continue;
        }

        let score = energy(&lines, alpha, target, current, buffer, last_score);
        if best.as_ref().map_or(true, |b| score < b.score) {
            best = Some(State::new(shape, alpha, score));
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::default_energy_function;
    use crate::fitness::difference_full;
    use crate::geometry::Bounds;
    use crate::random::{RecordingRandom, ReplayRandom, SeededRandom};
    use crate::shapes::Rectangle;
    use image::Rgba;

    /// A white canvas to be painted towards a target with a dark blob
    fn setup() -> (Bitmap, Bitmap, Bitmap, f64) {
        let mut target = Bitmap::new(48, 40, Rgba([255, 255, 255, 255]));
        for y in 10..26 {
            for x in 12..34 {
                target.set_pixel(x, y, Rgba([20, 40, 90, 255]));
            }
        }
        let current = Bitmap::new(48, 40, Rgba([255, 255, 255, 255]));
        let buffer = current.clone();
        let score = difference_full(&target, &current);
        (target, current, buffer, score)
    }

    fn start_state(
        target: &Bitmap,
        current: &Bitmap,
        buffer: &mut Bitmap,
        score: f64,
    ) -> State {
        let shape = Shape::Rectangle(Rectangle::new(target.bounds(), 2, 2, 6, 6));
        let lines = shape.rasterize();
        let start = default_energy_function(&lines, 200, target, current, buffer, score);
        State::new(shape, 200, start)
    }

    #[test]
    fn test_hill_climb_never_worsens() {
        let (target, current, mut buffer, score) = setup();
        let state = start_state(&target, &current, &mut buffer, score);

        let mut rng = SeededRandom::new(17);
        let result = hill_climb(
            &state,
            200,
            &target,
            &current,
            &mut buffer,
            score,
            &mut rng,
            default_energy_function,
        );

        assert!(result.score <= state.score);
        assert_eq!(result.alpha, 200);

        // The reported score is what painting the winning shape really gives
        let mut check = current.clone();
        let lines = result.shape.rasterize();
        let energy = default_energy_function(&lines, 200, &target, &current, &mut check, score);
        assert!((energy - result.score).abs() < 1e-9);
    }

    #[test]
    fn test_hill_climb_is_reproducible_from_recorded_draws() {
        let (target, current, buffer, score) = setup();
        let mut first_buffer = buffer.clone();
        let state = start_state(&target, &current, &mut first_buffer, score);
        let mut second_buffer = first_buffer.clone();

        let mut recorder = RecordingRandom::new(SeededRandom::new(99));
        let first = hill_climb(
            &state,
            100,
            &target,
            &current,
            &mut first_buffer,
            score,
            &mut recorder,
            default_energy_function,
        );

        let mut replay = recorder.replay();
        let second = hill_climb(
            &state,
            100,
            &target,
            &current,
            &mut second_buffer,
            score,
            &mut replay,
            default_energy_function,
        );

        assert_eq!(first, second);
        assert_eq!(first_buffer, second_buffer);
        assert_eq!(replay.remaining(), 0);
    }

    #[test]
    fn test_hill_climb_scores_exactly_max_age_candidates() {
        let (target, current, mut buffer, score) = setup();
        let state = start_state(&target, &current, &mut buffer, score);

        let mut calls = 0;
        let mut rng = SeededRandom::new(3);
        hill_climb(
            &state,
            37,
            &target,
            &current,
            &mut buffer,
            score,
            &mut rng,
            |lines: &[Scanline], alpha: u8, t: &Bitmap, c: &Bitmap, b: &mut Bitmap, s: f64| {
                calls += 1;
                default_energy_function(lines, alpha, t, c, b, s)
            },
        );
        assert_eq!(calls, 37);
    }

    #[test]
    fn test_hill_climb_with_zero_age_returns_start() {
        let (target, current, mut buffer, score) = setup();
        let state = start_state(&target, &current, &mut buffer, score);
        let mut rng = SeededRandom::new(3);
        let result = hill_climb(
            &state,
            0,
            &target,
            &current,
            &mut buffer,
            score,
            &mut rng,
            default_energy_function,
        );
        assert_eq!(result, state);
    }

    #[test]
    fn test_empty_rasterization_is_never_accepted() {
        let (target, current, mut buffer, score) = setup();
        // No room on the canvas: every mutation rasterizes to nothing
        let shape = Shape::Rectangle(Rectangle::new(Bounds::new(0, 0, 0, 0), 0, 0, 0, 0));
        let state = State::new(shape, 128, score);

        let mut calls = 0;
        let mut rng = SeededRandom::new(8);
        let result = hill_climb(
            &state,
            20,
            &target,
            &current,
            &mut buffer,
            score,
            &mut rng,
            |_: &[Scanline], _: u8, _: &Bitmap, _: &Bitmap, _: &mut Bitmap, _: f64| {
                calls += 1;
                0.0
            },
        );

        assert_eq!(calls, 0);
        assert_eq!(result, state);
    }

    #[test]
    fn test_best_random_state_picks_lowest_energy() {
        let (target, current, mut buffer, score) = setup();
        let mut rng = SeededRandom::new(5);
        let state = best_random_state(
            &ShapeType::ALL,
            128,
            30,
            &target,
            &current,
            &mut buffer,
            score,
            &mut rng,
            default_energy_function,
        )
        .unwrap();

        assert_eq!(state.alpha, 128);
        let mut check = current.clone();
        let lines = state.shape.rasterize();
        let energy = default_energy_function(&lines, 128, &target, &current, &mut check, score);
        assert!((energy - state.score).abs() < 1e-9);
    }

    #[test]
    fn test_best_random_state_without_candidates() {
        let (target, current, mut buffer, score) = setup();
        let mut rng = SeededRandom::new(5);
        let state = best_random_state(
            &[ShapeType::Circle],
            128,
            0,
            &target,
            &current,
            &mut buffer,
            score,
            &mut rng,
            default_energy_function,
        );
        assert!(state.is_none());
    }

    const FIXTURE_TARGET: &str = "\
5 4\n\
255,255,255,255 255,255,255,255 200,40,40,255 200,40,40,255 255,255,255,255\n\
255,255,255,255 200,40,40,255 200,40,40,255 200,40,40,255 255,255,255,255\n\
255,255,255,255 200,40,40,255 180,60,50,255 200,40,40,255 255,255,255,255\n\
255,255,255,255 255,255,255,255 255,255,255,255 255,255,255,255 240,240,240,255\n";

    const FIXTURE_CURRENT: &str = "\
5 4\n\
250,250,250,255 250,250,250,255 250,250,250,255 250,250,250,255 250,250,250,255\n\
250,250,250,255 250,250,250,255 250,250,250,255 250,250,250,255 250,250,250,255\n\
250,250,250,255 250,250,250,255 250,250,250,255 250,250,250,255 250,250,250,255\n\
250,250,250,255 250,250,250,255 250,250,250,255 250,250,250,255 250,250,250,255\n";

    const FIXTURE_BUFFER: &str = "\
5 4\n\
217,124,124,255 217,124,124,255 217,124,124,255 217,124,124,255 226,148,147,255\n\
217,124,124,255 217,124,124,255 217,124,124,255 217,124,124,255 226,148,147,255\n\
217,124,124,255 217,124,124,255 217,124,124,255 217,124,124,255 226,148,147,255\n\
250,250,250,255 226,148,147,255 226,148,147,255 226,148,147,255 226,148,147,255\n";

    const FIXTURE_TRACE: &str = "\
1 (min:0,max:1)\n\
2 (min:-16,max:16)\n\
1 (min:-16,max:16)\n\
0 (min:0,max:1)\n\
1 (min:-16,max:16)\n\
0 (min:-16,max:16)\n\
1 (min:0,max:1)\n\
1 (min:-16,max:16)\n\
1 (min:-16,max:16)\n\
0 (min:0,max:1)\n\
0 (min:-16,max:16)\n\
1 (min:-16,max:16)\n\
0 (min:0,max:1)\n\
-1 (min:-16,max:16)\n\
0 (min:-16,max:16)\n";

    #[test]
    fn test_hill_climb_matches_recorded_fixture() {
        let target: Bitmap = FIXTURE_TARGET.parse().unwrap();
        let current: Bitmap = FIXTURE_CURRENT.parse().unwrap();
        let bounds = target.bounds();
        let last_score = difference_full(&target, &current);

        let mut buffer = current.clone();
        let shape = Shape::Rectangle(Rectangle::new(bounds, 0, 0, 1, 1));
        let lines = shape.rasterize();
        let start =
            default_energy_function(&lines, 128, &target, &current, &mut buffer, last_score);
        assert!((start - 0.366_229_424).abs() < 1e-6, "{start}");
        let state = State::new(shape, 128, start);

        // Two improvements, then three rejected candidates
        let mut rng = ReplayRandom::from_trace(FIXTURE_TRACE).unwrap();
        let result = hill_climb(
            &state,
            5,
            &target,
            &current,
            &mut buffer,
            last_score,
            &mut rng,
            default_energy_function,
        );

        assert_eq!(result.shape, Shape::Rectangle(Rectangle::new(bounds, 1, 0, 3, 2)));
        assert_eq!(result.alpha, 128);
        assert!((result.score - 0.168_111_957).abs() < 1e-6, "{}", result.score);
        assert_eq!(rng.remaining(), 0);
        // Left holding the last candidate tried, over stale pixels of earlier ones
        assert_eq!(buffer.to_string(), FIXTURE_BUFFER);
    }
}
