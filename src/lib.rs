// Library root for geometric_art
//
// Approximates an image with geometric shapes: each shape is found by
// sampling random candidates and hill climbing the best one, scored by how
// much closer painting it brings the canvas to the target.

// Primitives: scanlines, bounds and pixel buffers
pub mod bitmap;
pub mod error;
pub mod geometry;
pub mod random;

// Shapes and their rasterization
pub mod shapes;

// Scoring and painting
pub mod energy;
pub mod fitness;
pub mod painting;

// Search
pub mod model;
pub mod optimizer;

// Re-export commonly used types at the library root
pub use bitmap::Bitmap;
pub use energy::default_energy_function;
pub use error::{Error, Result};
pub use fitness::{difference_full, difference_full_parallel, difference_partial};
pub use geometry::{Bounds, Point, Scanline};
pub use model::{Model, RunnerOptions};
pub use optimizer::{hill_climb, State};
pub use painting::{Painting, ShapeResult};
pub use random::{RandomSource, RecordingRandom, ReplayRandom, SeededRandom};
pub use shapes::{Shape, ShapeType};
