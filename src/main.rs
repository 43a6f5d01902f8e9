// Import the clap Parser derive macro for CLI argument parsing
use clap::Parser;

use geometric_art::{Bitmap, Model, RunnerOptions, SeededRandom, ShapeType};

// Import indicatif for progress bars
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use std::fs;
use std::path::{Path, PathBuf};

/// Geometric Art - Recreate an image one shape at a time
///
/// Every shape is picked from a batch of random candidates, refined by hill
/// climbing, and painted with the colour that best matches the target.
#[derive(Parser)]
#[command(name = "geometric-art")]
#[command(about = "Approximate images with geometric shapes", long_about = None)]
#[command(version)]
struct Args {
    /// Path to target image (PNG, JPEG)
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory for generated images and shapes.json
    #[arg(short, long, default_value = "./output")]
    output: PathBuf,

    /// Number of shapes to add
    #[arg(short = 'n', long, default_value_t = 500)]
    shapes: usize,

    /// Comma separated shape types, e.g. "triangle,rotated_ellipse"
    ///
    /// Defaults to every type
    #[arg(short = 's', long, value_delimiter = ',')]
    shape_types: Vec<ShapeType>,

    /// Opacity of every shape (1-255)
    #[arg(short, long, default_value_t = 128, value_parser = clap::value_parser!(u8).range(1..))]
    alpha: u8,

    /// Random candidates sampled before each hill climb
    #[arg(long, default_value_t = 50)]
    candidates: u32,

    /// Mutations tried per hill climb
    #[arg(long, default_value_t = 100)]
    max_age: u32,

    /// Seed for the random number generator
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Save an image every N shapes
    #[arg(long, default_value_t = 50)]
    save_interval: usize,

    /// Number of threads for the parallel difference
    ///
    /// By default Rayon uses all available CPU cores
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// Log filter, e.g. "debug" or "geometric_art=trace"; overrides RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
}

fn main() {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Install env_logger, preferring an explicit filter over RUST_LOG
fn init_logging(filter: Option<&str>) {
    let mut builder = env_logger::Builder::new();
    match filter.map(str::to_string).or_else(|| std::env::var("RUST_LOG").ok()) {
        Some(filter) => builder.parse_filters(&filter),
        None => builder.filter_level(log::LevelFilter::Info),
    };
    builder.init();
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(num_threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
        info!("Using {} thread(s) for parallel processing", num_threads);
    }

    fs::create_dir_all(&args.output)?;

    if !args.input.exists() {
        return Err(format!("Input file not found: {}", args.input.display()).into());
    }
    let target = Bitmap::from_image(image::open(&args.input)?.to_rgba8());
    let (width, height) = target.dimensions();
    info!("Loaded {} ({}x{})", args.input.display(), width, height);

    let options = RunnerOptions {
        shape_types: if args.shape_types.is_empty() {
            ShapeType::ALL.to_vec()
        } else {
            args.shape_types.clone()
        },
        alpha: args.alpha,
        candidates: args.candidates,
        max_age: args.max_age,
    };
    info!(
        "Shapes: {}, types: {:?}, alpha: {}, candidates: {}, max age: {}, seed: {}",
        args.shapes, options.shape_types, options.alpha, options.candidates, options.max_age, args.seed
    );

    let mut model = Model::with_average_background(target);
    let mut rng = SeededRandom::new(args.seed);

    let pb = ProgressBar::new(args.shapes as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} (ETA: {eta}) | {msg}")?
            .progress_chars("=>-"),
    );

    let mut stalled = 0usize;
    for step in 0..args.shapes {
        match model.step(&options, &mut rng) {
            Some(result) => pb.set_message(format!("score: {:.6}", result.score)),
            None => stalled += 1,
        }
        pb.inc(1);

        let painted = step + 1;
        if args.save_interval > 0 && painted % args.save_interval == 0 {
            save_snapshot(&model, &args.output, painted)?;
        }
    }
    pb.finish_with_message(format!("done, score: {:.6}", model.score()));

    if stalled > 0 {
        warn!("{} step(s) found no improving shape", stalled);
    }

    save_snapshot(&model, &args.output, model.painting().len())?;
    let json_path = args.output.join("shapes.json");
    fs::write(&json_path, model.painting().to_json()?)?;

    info!(
        "Painted {} shapes, final score {:.6}",
        model.painting().len(),
        model.score()
    );
    info!("Results in {}", args.output.display());

    Ok(())
}

/// Save the canvas as `shapes_NNNNN.png` and as `latest.png`
fn save_snapshot(model: &Model, output_dir: &Path, shapes: usize) -> geometric_art::Result<()> {
    let image = model.current().as_image();
    image.save(output_dir.join(format!("shapes_{:05}.png", shapes)))?;
    image.save(output_dir.join("latest.png"))?;
    Ok(())
}
