use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use polars::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use skymask::prelude::{
    load_path, pixel_number, LoadCfg, Mask, PixelAssignment, Pixelization, SampleCfg, NO_POLYGON,
};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;
mod summary;
mod table;

use provenance::Payload;
use summary::{MaskSummary, PointReport};

#[derive(Parser)]
#[command(name = "skymask")]
#[command(about = "Point queries against spherical polygon masks", version)]
struct Cmd {
    /// Log verbosity: -v debug, -vv trace (default info)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Ignore pixel numbers recorded in the mask and file polygons by extent
    #[arg(long, global = true)]
    coverage: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Print mask properties as JSON
    Info {
        mask: PathBuf,
        /// Re-index before reporting, e.g. `6s` or `u`
        #[arg(long)]
        pixelization: Option<String>,
    },
    /// Resolve every row of a point table and write it back with polyid/weight
    Query {
        mask: PathBuf,
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value = "ra")]
        ra_col: String,
        #[arg(long, default_value = "dec")]
        dec_col: String,
        /// Re-index before querying, e.g. `6s`
        #[arg(long)]
        pixelization: Option<String>,
    },
    /// Resolve a single point and print JSON
    Point {
        mask: PathBuf,
        #[arg(long, allow_negative_numbers = true)]
        ra: f64,
        #[arg(long, allow_negative_numbers = true)]
        dec: f64,
    },
    /// Pixel numbers of points, independent of any mask
    Pixel {
        #[arg(long)]
        res: i64,
        #[arg(long, default_value_t = 's')]
        scheme: char,
        #[arg(long, required = true, num_args = 1.., allow_negative_numbers = true)]
        ra: Vec<f64>,
        #[arg(long, required = true, num_args = 1.., allow_negative_numbers = true)]
        dec: Vec<f64>,
    },
    /// Draw weighted random points from the mask
    Genrand {
        mask: PathBuf,
        #[arg(short, long)]
        n: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Restrict to an RA/Dec box (degrees)
        #[arg(
            long = "box",
            num_args = 4,
            value_names = ["RA_MIN", "RA_MAX", "DEC_MIN", "DEC_MAX"],
            allow_negative_numbers = true
        )]
        radec_box: Option<Vec<f64>>,
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = match cmd.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let cfg = LoadCfg {
        pixel_assignment: if cmd.coverage {
            PixelAssignment::Coverage
        } else {
            PixelAssignment::Declared
        },
        ..LoadCfg::default()
    };
    match cmd.action {
        Action::Info { mask, pixelization } => info(&mask, pixelization.as_deref(), &cfg),
        Action::Query {
            mask,
            input,
            out,
            ra_col,
            dec_col,
            pixelization,
        } => {
            let mask = open_mask(&mask, pixelization.as_deref(), &cfg)?;
            let rows = query(&mask, &input, &out, &ra_col, &dec_col)?;
            tracing::info!(rows, out = %out.display(), "query");
            Ok(())
        }
        Action::Point { mask, ra, dec } => {
            let mask = open_mask(&mask, None, &cfg)?;
            print_json(&PointReport::lookup(&mask, ra, dec))
        }
        Action::Pixel {
            res,
            scheme,
            ra,
            dec,
        } => print_json(&pixel_number(&ra, &dec, scheme, res)?),
        Action::Genrand {
            mask,
            n,
            seed,
            radec_box,
            out,
        } => {
            let mask = open_mask(&mask, None, &cfg)?;
            genrand(&mask, n, seed, radec_box, &out)
        }
    }
}

/// Load a mask and optionally re-index it.
fn open_mask(path: &Path, pixelization: Option<&str>, cfg: &LoadCfg) -> Result<Mask> {
    let mask = load_path(path, cfg).with_context(|| format!("loading mask {}", path.display()))?;
    let Some(text) = pixelization else {
        return Ok(mask);
    };
    let pix: Pixelization = text
        .parse()
        .with_context(|| format!("parsing pixelization '{text}'"))?;
    tracing::info!(from = %mask.pixelization(), to = %pix, "re-indexing mask");
    Ok(mask.with_pixelization(pix)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn info(path: &Path, pixelization: Option<&str>, cfg: &LoadCfg) -> Result<()> {
    let mask = open_mask(path, pixelization, cfg)?;
    print_json(&MaskSummary::from(&mask))
}

/// Append `polyid` and `weight` columns to the table at `input` and write it
/// to `out`; returns the row count.
fn query(mask: &Mask, input: &Path, out: &Path, ra_col: &str, dec_col: &str) -> Result<usize> {
    let mut df = table::read_table(input)?;
    let ra = table::float_column(&df, ra_col)?;
    let dec = table::float_column(&df, dec_col)?;
    let (ids, weights) = mask.polyid_and_weight(&ra, &dec)?;
    let inside = ids.iter().filter(|&&id| id != NO_POLYGON).count();
    df.with_column(Series::new("polyid".into(), ids))?;
    df.with_column(Series::new("weight".into(), weights))?;
    table::write_table(&mut df, out)?;

    let payload = Payload::new(serde_json::json!({
        "ra_col": ra_col,
        "dec_col": dec_col,
        "rows": df.height(),
        "inside": inside,
    }))
    .with_mask(MaskSummary::from(mask))
    .with_input(input.display().to_string());
    provenance::write_sidecar(out, payload)?;
    Ok(df.height())
}

fn genrand(mask: &Mask, n: usize, seed: u64, radec_box: Option<Vec<f64>>, out: &Path) -> Result<()> {
    let radec_box = match radec_box {
        None => None,
        Some(v) => match <[f64; 4]>::try_from(v) {
            Ok(b) => Some(b),
            Err(v) => bail!("--box takes 4 values, got {}", v.len()),
        },
    };
    let mut rng = StdRng::seed_from_u64(seed);
    let (ra, dec) = mask.genrand_with(n, radec_box, SampleCfg::default(), &mut rng)?;
    let mut df = df!("ra" => ra, "dec" => dec)?;
    table::write_table(&mut df, out)?;

    let payload = Payload::new(serde_json::json!({
        "n": n,
        "seed": seed,
        "box": radec_box,
    }))
    .with_mask(MaskSummary::from(mask));
    provenance::write_sidecar(out, payload)?;
    tracing::info!(n, seed, out = %out.display(), "genrand");
    Ok(())
}
