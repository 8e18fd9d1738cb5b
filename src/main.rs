//! Generate a tool path for cutting angled kerfs into a block of machinable
//! wax with a saw blade.
//!
//! The blade steps across the block at a fixed spacing; at each step it
//! plunges diagonally through the surface to the cut depth and withdraws
//! along the same angle, leaving a row of angled kerfs. The whole job is
//! planned up front, so a bad parameter set fails before the output file
//! exists.
use anyhow::Result;
use kerf::planner::{plan, CutParameters};
use kerf::render::render;
use kerf::write_plan;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "kerf_gen", about = "Generates tool paths for angled kerf cuts")]
struct Opt {
    /// Blade width, in inches
    #[structopt(long, default_value = "2.99213")]
    blade_width: f64,

    /// Width of the wax block, in inches
    #[structopt(long, default_value = "2")]
    wax_width: f64,

    /// Length of the wax block along X, in inches
    #[structopt(long, default_value = "4")]
    wax_length: f64,

    /// Z height the blade returns to between cuts, in inches
    #[structopt(long, default_value = "0.04")]
    retract_height: f64,

    /// Safe Z height for the first approach to the wax, in inches
    #[structopt(long, default_value = "0.25")]
    clearance_height: f64,

    /// Depth of each kerf, in inches (default 100um)
    #[structopt(long, default_value = "0.00393701")]
    cut_depth: f64,

    /// Lateral spacing between kerfs, in inches (default 60um)
    #[structopt(long, default_value = "0.0023622")]
    cut_spacing: f64,

    /// Angle of the cut face from horizontal, in degrees
    #[structopt(long, default_value = "56")]
    cut_angle: f64,

    /// Cutting feed rate, in inches/minute
    #[structopt(long, default_value = "1.0")]
    feed: f64,

    /// Output file for the resulting G code
    #[structopt(short, long, parse(from_os_str))]
    output: PathBuf,

    /// Write an SVG diagram of the planned path to this file
    #[structopt(long, parse(from_os_str))]
    plot: Option<PathBuf>,

    /// Number of moves to include in the diagram
    #[structopt(long, default_value = "50")]
    plot_moves: usize,
}

fn help_text() {
    println!(
        "Before cut:
        - Mount the wax block with its long edge along X
        - Set X home at the position of the first kerf
        - Set Z home at the top face of the wax"
    )
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    help_text();

    let params = CutParameters {
        blade_width: opt.blade_width,
        material_width: opt.wax_width,
        material_length: opt.wax_length,
        retract_height: opt.retract_height,
        clearance_height: opt.clearance_height,
        cut_depth: opt.cut_depth,
        cut_spacing: opt.cut_spacing,
        cut_angle_deg: opt.cut_angle,
        feed_speed: opt.feed,
    };

    // Plan the whole job before touching the disk, so a rejected parameter
    // set never leaves a partial instruction file behind
    let plan = plan(&params)?;

    let mut file = BufWriter::new(
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&opt.output)?,
    );
    write_plan(&mut file, &plan)?;
    file.flush()?;

    println!(
        "Wrote {} moves ({} cuts) to {}",
        plan.moves().len(),
        params.cut_count(),
        opt.output.display()
    );

    if let Some(path) = &opt.plot {
        svg::save(path, &render(plan.moves(), Some(opt.plot_moves)))?;
    }

    Ok(())
}
