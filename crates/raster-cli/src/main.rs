//! raster - portable-format raster processing CLI
//!
//! Decodes PBM/PGM/PPM files, runs buffer transforms from raster-ops on
//! them and writes the result back out.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use raster_io::{read, write, Pnm, PnmFormat};
use raster_ops::kernel::Kernel;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "raster")]
#[command(author, version, about = "Portable-format raster processing CLI")]
#[command(long_about = "
Process PBM/PGM/PPM images.

Examples:
  raster info photo.pgm
  raster convert mask.pbm mask-ascii.pbm --format p1
  raster flip photo.pgm flipped.pgm --axis x
  raster rotate photo.ppm turned.ppm --degrees 270
  raster resize photo.pgm big.pgm 2
  raster blur photo.ppm soft.ppm --size 5 --sigma 1.5
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Display image information
    #[command(visible_alias = "i")]
    Info {
        /// Input file
        input: PathBuf,
    },

    /// Convert between portable formats
    #[command(visible_alias = "c")]
    Convert {
        /// Input file
        input: PathBuf,
        /// Output file
        output: PathBuf,
        /// Target format (defaults to the binary format of the input's
        /// pixel class)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Mirror along an axis
    Flip {
        /// Input file
        input: PathBuf,
        /// Output file
        output: PathBuf,
        /// Mirror axis
        #[arg(long, value_enum, default_value = "y")]
        axis: Axis,
    },

    /// Rotate by quarter turns
    Rotate {
        /// Input file
        input: PathBuf,
        /// Output file
        output: PathBuf,
        /// Clockwise angle: 90, 180 or 270
        #[arg(long, default_value_t = 90)]
        degrees: u32,
    },

    /// Scale by an integer factor (negative downsizes)
    #[command(visible_alias = "r")]
    Resize {
        /// Input file
        input: PathBuf,
        /// Output file
        output: PathBuf,
        /// Integer factor: k replicates, -k decimates
        factor: f64,
    },

    /// Apply Gaussian blur
    Blur {
        /// Input file
        input: PathBuf,
        /// Output file
        output: PathBuf,
        /// Kernel side (made odd if even)
        #[arg(long, default_value_t = 5)]
        size: usize,
        /// Blur amount
        #[arg(long, default_value_t = 1.5)]
        sigma: f32,
    },
}

/// Portable format names for `--format`.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// ASCII bitmap
    P1,
    /// ASCII graymap
    P2,
    /// ASCII pixmap
    P3,
    /// Binary bitmap
    P4,
    /// Binary graymap
    P5,
    /// Binary pixmap
    P6,
}

impl From<FormatArg> for PnmFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::P1 => PnmFormat::AsciiBitmap,
            FormatArg::P2 => PnmFormat::AsciiGray,
            FormatArg::P3 => PnmFormat::AsciiRgb,
            FormatArg::P4 => PnmFormat::BinaryBitmap,
            FormatArg::P5 => PnmFormat::BinaryGray,
            FormatArg::P6 => PnmFormat::BinaryRgb,
        }
    }
}

/// Mirror axis for `flip`.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Axis {
    /// Mirror left-right
    X,
    /// Flip top-bottom
    Y,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info { input } => info(&input),
        Commands::Convert {
            input,
            output,
            format,
        } => {
            let value = load(&input)?;
            let format = format.map_or_else(|| value.binary_format(), PnmFormat::from);
            save(&output, &value, format)
        }
        Commands::Flip {
            input,
            output,
            axis,
        } => {
            let value = load(&input)?;
            let flipped = match (value, axis) {
                (Pnm::Bits(b), Axis::X) => Pnm::Bits(b.reflect_x()),
                (Pnm::Bits(b), Axis::Y) => Pnm::Bits(b.reflect_y()),
                (Pnm::Pixels(i), Axis::X) => Pnm::Pixels(i.reflect_x()),
                (Pnm::Pixels(i), Axis::Y) => Pnm::Pixels(i.reflect_y()),
            };
            let format = flipped.binary_format();
            save(&output, &flipped, format)
        }
        Commands::Rotate {
            input,
            output,
            degrees,
        } => {
            let value = load(&input)?;
            let turned = match (value, degrees) {
                (Pnm::Bits(b), 90) => Pnm::Bits(b.rotate_90()),
                (Pnm::Bits(b), 180) => Pnm::Bits(b.rotate_180()),
                (Pnm::Bits(b), 270) => Pnm::Bits(b.rotate_270()),
                (Pnm::Pixels(i), 90) => Pnm::Pixels(i.rotate_90()),
                (Pnm::Pixels(i), 180) => Pnm::Pixels(i.rotate_180()),
                (Pnm::Pixels(i), 270) => Pnm::Pixels(i.rotate_270()),
                (_, other) => bail!("rotation must be 90, 180 or 270 degrees, got {other}"),
            };
            let format = turned.binary_format();
            save(&output, &turned, format)
        }
        Commands::Resize {
            input,
            output,
            factor,
        } => {
            let value = load(&input)?;
            let Pnm::Pixels(img) = value else {
                bail!("resize needs gray or rgb pixel data, not a bitmap");
            };
            let resized = raster_ops::resize(&img, factor)
                .with_context(|| format!("resizing by {factor}"))?;
            let out = Pnm::Pixels(resized);
            let format = out.binary_format();
            save(&output, &out, format)
        }
        Commands::Blur {
            input,
            output,
            size,
            sigma,
        } => {
            let value = load(&input)?;
            let Pnm::Pixels(img) = value else {
                bail!("blur needs gray or rgb pixel data, not a bitmap");
            };
            debug!(size, sigma, "building gaussian kernel");
            let kernel = Kernel::gaussian(size, sigma);
            let blurred = raster_ops::map_kernel(&img, &kernel).context("applying blur")?;
            let out = Pnm::Pixels(blurred);
            let format = out.binary_format();
            save(&output, &out, format)
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load(path: &PathBuf) -> Result<Pnm> {
    read(path).with_context(|| format!("reading {}", path.display()))
}

fn save(path: &PathBuf, value: &Pnm, format: PnmFormat) -> Result<()> {
    write(path, value, format).with_context(|| format!("writing {}", path.display()))
}

fn info(input: &PathBuf) -> Result<()> {
    let value = load(input)?;
    match &value {
        Pnm::Bits(bits) => {
            println!("{}", input.display());
            println!("  class:  bitmap (1-bit)");
            println!("  size:   {}x{}", bits.width(), bits.height());
            println!("  stride: {} bytes", bits.row_stride());
            println!("  set:    {}", bits.count_ones());
        }
        Pnm::Pixels(img) => {
            println!("{}", input.display());
            println!("  class:  {} ({} channels)", img.layout(), img.channels());
            println!("  size:   {}x{}", img.width(), img.height());
            println!("  stride: {} bytes", img.row_stride());
        }
    }
    Ok(())
}
