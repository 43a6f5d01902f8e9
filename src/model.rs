// The model: target image, the canvas being painted, and the shapes so far
use crate::bitmap::Bitmap;
use crate::energy::default_energy_function;
use crate::fitness::{difference_full_parallel, difference_partial};
use crate::optimizer::{best_random_state, hill_climb};
use crate::painting::{average_color, compute_color, copy_lines, draw_lines, Painting, ShapeResult};
use crate::random::RandomSource;
use crate::shapes::{Shape, ShapeType};

use image::Rgba;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Knobs for adding one shape to the canvas
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunnerOptions {
    /// Kinds of shape to choose from; must not be empty
    pub shape_types: Vec<ShapeType>,

    /// Opacity every shape is painted with
    pub alpha: u8,

    /// Random shapes tried before hill climbing the best of them
    pub candidates: u32,

    /// Mutations tried by each hill climb
    pub max_age: u32,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            shape_types: ShapeType::ALL.to_vec(),
            alpha: 128,
            candidates: 50,
            max_age: 100,
        }
    }
}

/// Paints shapes onto a canvas one at a time, each chosen to bring the canvas
/// closer to the target
pub struct Model {
    /// The image being approximated; never modified
    target: Bitmap,

    /// Canvas with every accepted shape painted on
    current: Bitmap,

    /// Scratch canvas for scoring candidates
    buffer: Bitmap,

    /// `difference_full(target, current)`, kept up to date incrementally
    score: f64,

    painting: Painting,
}

impl Model {
    /// Start from a canvas filled with `background`
    pub fn new(target: Bitmap, background: Rgba<u8>) -> Self {
        let (width, height) = target.dimensions();
        let current = Bitmap::new(width, height, background);
        let score = difference_full_parallel(&target, &current);
        info!("Starting {width}x{height} canvas at score {score:.6}");

        Self {
            buffer: current.clone(),
            painting: Painting::new(width, height, background),
            target,
            current,
            score,
        }
    }

    /// Start from a canvas filled with the target's average colour
    pub fn with_average_background(target: Bitmap) -> Self {
        let background = average_color(&target);
        Self::new(target, background)
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn target(&self) -> &Bitmap {
        &self.target
    }

    pub fn current(&self) -> &Bitmap {
        &self.current
    }

    pub fn painting(&self) -> &Painting {
        &self.painting
    }

    /// Find a good shape and paint it
    ///
    /// Scores `options.candidates` random shapes, hill climbs the best one and
    /// paints the result if it lowers the score.
    ///
    /// # Returns
    /// The painted shape, or `None` when nothing improved the canvas
    pub fn step(&mut self, options: &RunnerOptions, rng: &mut impl RandomSource) -> Option<ShapeResult> {
        let start = best_random_state(
            &options.shape_types,
            options.alpha,
            options.candidates,
            &self.target,
            &self.current,
            &mut self.buffer,
            self.score,
            rng,
            default_energy_function,
        )?;

        let state = hill_climb(
            &start,
            options.max_age,
            &self.target,
            &self.current,
            &mut self.buffer,
            self.score,
            rng,
            default_energy_function,
        );

        if state.score >= self.score {
            debug!("Best candidate {} doesn't improve {:.6}", state.shape, self.score);
            return None;
        }

        Some(self.add_shape(state.shape, state.alpha))
    }

    /// Paint `shape` onto the canvas with its best colour at `alpha`
    ///
    /// The shape is painted even if it makes the canvas worse.
    pub fn add_shape(&mut self, shape: Shape, alpha: u8) -> ShapeResult {
        let lines = shape.rasterize();
        let color = compute_color(&self.target, &self.current, &lines, alpha);

        // Keep the unpainted pixels in the buffer for the score update
        copy_lines(&mut self.buffer, &self.current, &lines);
        draw_lines(&mut self.current, color, &lines);
        self.score = difference_partial(&self.target, &self.buffer, &self.current, self.score, &lines);

        let result = ShapeResult {
            score: self.score,
            color: color.0,
            shape,
        };
        self.painting.push(result.clone());
        debug!("Painted {} in {:?}, score {:.6}", result.shape, color.0, self.score);
        result
    }
}
