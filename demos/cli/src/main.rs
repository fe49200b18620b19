use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use heatplot::plot::{animate, FrameStats, GridRect};
use heatplot::render::{palette, rasterise, Colour, Raster};
use heatplot::{builtins, generate, Formula};

/// Render implicit equations over x, y and t as heat-mapped animations
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render an equation to an animated GIF (or a single-frame PNG)
    Plot {
        #[clap(flatten)]
        settings: RenderSettings,

        /// Equation text, e.g. "y / 4 = x * (x + 2)"
        equation: String,
    },

    /// Search for an interesting random equation and render it
    Random {
        #[clap(flatten)]
        settings: RenderSettings,

        /// Maximum expression depth of generated candidates
        #[clap(long, default_value_t = 10)]
        max_depth: usize,

        /// RNG seed; picked at random when omitted
        #[clap(long)]
        seed: Option<u64>,
    },

    /// List the registered function names
    Functions,
}

#[derive(Parser)]
struct RenderSettings {
    /// Output file; a `.png` extension writes the first frame, anything
    /// else an animated GIF
    #[clap(short, long, default_value = "out.gif")]
    out: PathBuf,

    /// Half-width of the grid in cells (the grid spans ±size on both axes)
    #[clap(short, long, default_value_t = 100)]
    size: i32,

    /// Real-coordinate step between neighbouring cells
    #[clap(long, default_value_t = 0.1)]
    cell_size: f64,

    /// Integer magnification of the output image
    #[clap(long, default_value_t = 2)]
    scale: usize,

    /// Heat buckets per side of zero; the colour table holds 2n-1 heat
    /// entries and must stay within a GIF's 256 colours
    #[clap(long, default_value_t = 126)]
    buckets: usize,

    /// First time step
    #[clap(long, default_value_t = 0)]
    t_start: i32,

    /// End of the time range (exclusive)
    #[clap(long, default_value_t = 100)]
    t_end: i32,

    /// Frame delay in milliseconds
    #[clap(long, default_value_t = 100)]
    delay_ms: u64,
}

impl RenderSettings {
    fn validate(&self) -> Result<()> {
        if self.buckets == 0 || self.buckets > 126 {
            bail!("--buckets must be between 1 and 126");
        }
        if self.size <= 0 {
            bail!("--size must be positive");
        }
        if self.scale == 0 {
            bail!("--scale must be positive");
        }
        if !(self.cell_size > 0.0) {
            bail!("--cell-size must be positive");
        }
        Ok(())
    }

    fn rect(&self) -> GridRect {
        GridRect::centered(self.size)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match args.cmd {
        Command::Plot { settings, equation } => {
            settings.validate()?;
            let formula = Formula::parse(&equation)?;
            info!("plotting {formula}");
            render_output(&formula, &settings)
        }
        Command::Random {
            settings,
            max_depth,
            seed,
        } => {
            settings.validate()?;
            let formula = search_random(&settings, max_depth, seed)?;
            render_output(&formula, &settings)
        }
        Command::Functions => {
            for name in builtins::names() {
                let arity = if builtins::single(name).is_some() { 1 } else { 2 };
                println!("{name}/{arity}");
            }
            Ok(())
        }
    }
}

/// Generates candidates until one clears the depth gates and the
/// frame-sequence quality bar
fn search_random(settings: &RenderSettings, max_depth: usize, seed: Option<u64>) -> Result<Formula> {
    let seed = seed.unwrap_or_else(rand::random);
    info!("searching with seed {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    loop {
        let candidate = generate::random_formula(&mut rng, max_depth);
        let rendered = candidate.to_string();
        let formula = candidate.simplify();
        if formula.to_string() != rendered {
            debug!("simplified {rendered} to {formula}");
        }

        let depth = formula.depth();
        if depth <= 3 {
            debug!("too shallow: {formula}");
            continue;
        }
        if depth > max_depth {
            debug!("too deep: {formula}");
            continue;
        }

        let (_, frames) = animate(
            &formula,
            settings.t_start,
            settings.t_end,
            settings.rect(),
            settings.cell_size,
        )?;
        let stats = FrameStats::measure(&frames);
        if let Some(reason) = stats.reject_reason(frames.len(), settings.rect()) {
            info!("rejected {formula}: {reason}");
            continue;
        }

        info!("keeping {formula}");
        return Ok(formula);
    }
}

fn render_output(formula: &Formula, settings: &RenderSettings) -> Result<()> {
    let start = Instant::now();
    let (time_used, frames) = animate(
        formula,
        settings.t_start,
        settings.t_end,
        settings.rect(),
        settings.cell_size,
    )?;
    info!(
        "sampled {} frame(s) in {:?} (T {})",
        frames.len(),
        start.elapsed(),
        if time_used { "animates" } else { "unused" },
    );

    let start = Instant::now();
    let rasters: Vec<Raster> = frames
        .iter()
        .map(|frame| rasterise(frame, settings.buckets, settings.scale))
        .collect();
    info!("rendered in {:?}", start.elapsed());

    if has_extension(&settings.out, "png") {
        write_png(&settings.out, &rasters[0])?;
    } else {
        write_gif(
            &settings.out,
            &rasters,
            &palette(settings.buckets),
            settings.delay_ms,
        )?;
    }
    info!("wrote {}", settings.out.display());
    Ok(())
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}

fn write_png(path: &Path, raster: &Raster) -> Result<()> {
    image::save_buffer(
        path,
        &raster.to_rgb_bytes(),
        raster.width() as u32,
        raster.height() as u32,
        image::ColorType::Rgb8,
    )
    .with_context(|| format!("writing {}", path.display()))
}

/// Writes all frames against one global colour table
fn write_gif(path: &Path, rasters: &[Raster], table: &[Colour], delay_ms: u64) -> Result<()> {
    let width = u16::try_from(rasters[0].width()).context("image too wide for GIF")?;
    let height = u16::try_from(rasters[0].height()).context("image too tall for GIF")?;

    let mut table_bytes = Vec::with_capacity(table.len() * 3);
    for colour in table {
        table_bytes.extend_from_slice(colour);
    }
    let exact: HashMap<Colour, u8> = table
        .iter()
        .enumerate()
        .map(|(i, colour)| (*colour, i as u8))
        .collect();

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut encoder = gif::Encoder::new(BufWriter::new(file), width, height, &table_bytes)?;
    encoder.set_repeat(gif::Repeat::Infinite)?;

    for raster in rasters {
        let buffer: Vec<u8> = raster
            .pixels()
            .iter()
            .map(|pixel| match exact.get(pixel) {
                Some(index) => *index,
                None => nearest_index(table, *pixel),
            })
            .collect();
        let mut frame = gif::Frame::default();
        frame.width = width;
        frame.height = height;
        frame.buffer = Cow::from(buffer);
        frame.delay = (delay_ms / 10) as u16;
        encoder.write_frame(&frame)?;
    }
    Ok(())
}

/// Closest table entry by squared RGB distance; only consulted for the rare
/// extreme heat bucket that the palette sweep does not enumerate exactly
fn nearest_index(table: &[Colour], pixel: Colour) -> u8 {
    let mut best = 0;
    let mut best_distance = u32::MAX;
    for (i, colour) in table.iter().enumerate() {
        let distance: u32 = colour
            .iter()
            .zip(pixel.iter())
            .map(|(a, b)| {
                let d = i32::from(*a) - i32::from(*b);
                (d * d) as u32
            })
            .sum();
        if distance < best_distance {
            best_distance = distance;
            best = i;
        }
    }
    best as u8
}
