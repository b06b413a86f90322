use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use image::GrayImage;
use image_kernels::math;
use image_kernels::{
    Affine2, BorderMode, DistortStats, DomainPolicy, InterpolationType, MultiBand, PixelBuffer,
    distort_with_policy, rotate_with, scale_with,
};
use image_kernels::{Bicubic, Bilinear, NearestNeighbor};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{Level, info};

#[derive(Parser, Debug)]
#[command(name = "ik_gallery")]
#[command(about = "Run image-kernels operations on PNG fixtures")]
struct Cli {
    /// Log at DEBUG instead of INFO.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(name = "scale")]
    Scale(ScaleArgs),
    #[command(name = "rotate")]
    Rotate(RotateArgs),
    #[command(name = "warp")]
    Warp(WarpArgs),
    #[command(name = "noise")]
    Noise(NoiseArgs),
    #[command(name = "arith")]
    Arith(ArithArgs),
    #[command(name = "flip")]
    Flip(CommonArgs),
    #[command(name = "average_bands")]
    AverageBands(CommonArgs),
}

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, default_value = "out/gallery")]
    out: PathBuf,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum InterpArg {
    Nearest,
    Bilinear,
    Bicubic,
}

impl From<InterpArg> for InterpolationType {
    fn from(value: InterpArg) -> Self {
        match value {
            InterpArg::Nearest => InterpolationType::Nearest,
            InterpArg::Bilinear => InterpolationType::Bilinear,
            InterpArg::Bicubic => InterpolationType::Bicubic,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
enum BorderArg {
    Skip,
    Clamp,
    Constant,
    Reflect101,
    Wrap,
}

impl BorderArg {
    fn policy(self, fill: u8) -> DomainPolicy {
        match self {
            Self::Skip => DomainPolicy::Skip,
            Self::Clamp => DomainPolicy::Border(BorderMode::Clamp),
            Self::Constant => DomainPolicy::Border(BorderMode::Constant(fill as f64)),
            Self::Reflect101 => DomainPolicy::Border(BorderMode::Reflect101),
            Self::Wrap => DomainPolicy::Border(BorderMode::Wrap),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
enum NoiseKind {
    Uniform,
    Gaussian,
}

#[derive(Args, Debug, Clone)]
struct ScaleArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, required = true)]
    width: usize,
    #[arg(long, required = true)]
    height: usize,
    #[arg(long, value_enum, default_value_t = InterpArg::Bilinear)]
    interp: InterpArg,
    /// Value written where the kernel cannot sample.
    #[arg(long, default_value_t = 0)]
    fill: u8,
}

#[derive(Args, Debug, Clone)]
struct RotateArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, default_value_t = 30.0)]
    angle_deg: f32,
    #[arg(long, value_enum, default_value_t = InterpArg::Bilinear)]
    interp: InterpArg,
    /// Swap output width and height.
    #[arg(long, default_value_t = false)]
    transpose_shape: bool,
    #[arg(long, default_value_t = 0)]
    fill: u8,
}

#[derive(Args, Debug, Clone)]
struct WarpArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Forward affine as `a11,a12,a21,a22,tx,ty`.
    #[arg(long, value_delimiter = ',', num_args = 6, required = true)]
    affine: Vec<f64>,
    #[arg(long, value_enum, default_value_t = InterpArg::Bilinear)]
    interp: InterpArg,
    #[arg(long, value_enum, default_value_t = BorderArg::Skip)]
    border: BorderArg,
    #[arg(long, default_value_t = 0)]
    fill: u8,
}

#[derive(Args, Debug, Clone)]
struct NoiseArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, value_enum, default_value_t = NoiseKind::Gaussian)]
    kind: NoiseKind,
    /// Half width for uniform noise, standard deviation for Gaussian noise.
    #[arg(long, default_value_t = 10.0)]
    amount: f64,
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Args, Debug, Clone)]
struct ArithArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, default_value_t = 1.5)]
    gain: f64,
    #[arg(long, default_value_t = -20, allow_hyphen_values = true)]
    offset: i32,
}

#[derive(Debug, Clone, Serialize)]
struct ImageStats {
    min: f64,
    max: f64,
    mean: f64,
    variance: f64,
}

#[derive(Debug, Clone, Serialize)]
struct StatsDto {
    written: usize,
    skipped: usize,
}

impl From<DistortStats> for StatsDto {
    fn from(s: DistortStats) -> Self {
        Self {
            written: s.written,
            skipped: s.skipped,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct MetaDistort {
    operation: &'static str,
    input_size: [usize; 2],
    output_size: [usize; 2],
    interpolation: &'static str,
    border: BorderArg,
    fill: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    angle_deg: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    affine: Option<[f64; 6]>,
    pixels: StatsDto,
}

#[derive(Debug, Clone, Serialize)]
struct MetaNoise {
    kind: NoiseKind,
    amount: f64,
    seed: u64,
    clip: [i32; 2],
    before: ImageStats,
    after: ImageStats,
}

#[derive(Debug, Clone, Serialize)]
struct MetaArith {
    gain: f64,
    offset: i32,
    pipeline: &'static str,
    before: ImageStats,
    after: ImageStats,
    abs_diff: ImageStats,
}

#[derive(Debug, Clone, Serialize)]
struct MetaSimple {
    operation: &'static str,
    size: [usize; 2],
    bands: usize,
    after: ImageStats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Command::Scale(args) => run_scale(args),
        Command::Rotate(args) => run_rotate(args),
        Command::Warp(args) => run_warp(args),
        Command::Noise(args) => run_noise(args),
        Command::Arith(args) => run_arith(args),
        Command::Flip(args) => run_flip(args),
        Command::AverageBands(args) => run_average_bands(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_scale(args: ScaleArgs) -> Result<()> {
    if args.width == 0 || args.height == 0 {
        bail!(
            "output size must be positive, got {}x{}.",
            args.width,
            args.height
        );
    }

    let case_dir = prepare_case(&args.common, "scale")?;
    let img = load_input_u8(&args.common.input)?;

    let out = PixelBuffer::new_fill(args.width, args.height, args.fill)
        .context("allocating output buffer")?;
    let stats = scale_with(&img, &out, args.interp.into()).context("scaling input")?;
    info!(written = stats.written, skipped = stats.skipped, "scaled");

    save_u8_buffer(case_dir.join("scaled.png"), &out)?;
    write_json(
        case_dir.join("meta.json"),
        &MetaDistort {
            operation: "scale",
            input_size: [img.width(), img.height()],
            output_size: [out.width(), out.height()],
            interpolation: InterpolationType::from(args.interp).name(),
            border: BorderArg::Skip,
            fill: args.fill,
            angle_deg: None,
            affine: None,
            pixels: stats.into(),
        },
    )?;

    Ok(())
}

fn run_rotate(args: RotateArgs) -> Result<()> {
    if !args.angle_deg.is_finite() {
        bail!("angle must be finite, got {}.", args.angle_deg);
    }

    let case_dir = prepare_case(&args.common, "rotate")?;
    let img = load_input_u8(&args.common.input)?;

    let (w, h) = if args.transpose_shape {
        (img.height(), img.width())
    } else {
        (img.width(), img.height())
    };
    let out = PixelBuffer::new_fill(w, h, args.fill).context("allocating output buffer")?;
    let stats = rotate_with(&img, &out, args.interp.into(), args.angle_deg.to_radians())
        .context("rotating input")?;
    info!(written = stats.written, skipped = stats.skipped, "rotated");

    save_u8_buffer(case_dir.join("rotated.png"), &out)?;
    write_json(
        case_dir.join("meta.json"),
        &MetaDistort {
            operation: "rotate",
            input_size: [img.width(), img.height()],
            output_size: [w, h],
            interpolation: InterpolationType::from(args.interp).name(),
            border: BorderArg::Skip,
            fill: args.fill,
            angle_deg: Some(args.angle_deg),
            affine: None,
            pixels: stats.into(),
        },
    )?;

    Ok(())
}

fn run_warp(args: WarpArgs) -> Result<()> {
    let [a11, a12, a21, a22, tx, ty] = args.affine[..] else {
        bail!(
            "--affine expects 6 comma-separated values, got {}.",
            args.affine.len()
        );
    };
    let forward = Affine2::new(a11, a12, a21, a22, tx, ty);
    let Some(inverse) = forward.inverse() else {
        bail!("affine {:?} is not invertible.", args.affine);
    };

    let case_dir = prepare_case(&args.common, "warp")?;
    let img = load_input_u8(&args.common.input)?;
    let out = PixelBuffer::new_fill(img.width(), img.height(), args.fill)
        .context("allocating output buffer")?;

    let policy = args.border.policy(args.fill);
    let stats = match InterpolationType::from(args.interp) {
        InterpolationType::Nearest => {
            distort_with_policy(&img, &out, &mut NearestNeighbor::new(), &inverse, policy)
        }
        InterpolationType::Bilinear => {
            distort_with_policy(&img, &out, &mut Bilinear::new(), &inverse, policy)
        }
        InterpolationType::Bicubic => {
            distort_with_policy(&img, &out, &mut Bicubic::new(), &inverse, policy)
        }
    }
    .context("warping input")?;
    info!(written = stats.written, skipped = stats.skipped, "warped");

    save_u8_buffer(case_dir.join("warped.png"), &out)?;
    write_json(
        case_dir.join("meta.json"),
        &MetaDistort {
            operation: "affine",
            input_size: [img.width(), img.height()],
            output_size: [out.width(), out.height()],
            interpolation: InterpolationType::from(args.interp).name(),
            border: args.border,
            fill: args.fill,
            angle_deg: None,
            affine: Some([a11, a12, a21, a22, tx, ty]),
            pixels: stats.into(),
        },
    )?;

    Ok(())
}

fn run_noise(args: NoiseArgs) -> Result<()> {
    if !(args.amount.is_finite() && args.amount > 0.0) {
        bail!("noise amount must be positive, got {}.", args.amount);
    }

    let case_dir = prepare_case(&args.common, "noise")?;
    let img = load_input_u8(&args.common.input)?;
    let before = stats_of(&img);
    let mut rng = StdRng::seed_from_u64(args.seed);

    let added = match args.kind {
        NoiseKind::Uniform => {
            let half = args.amount.ceil() as i32;
            math::add_uniform(&img, &mut rng, -half, half + 1)
        }
        NoiseKind::Gaussian => math::add_gaussian(&img, &mut rng, args.amount, 0, 255),
    };
    added.context("adding noise")?;

    save_u8_buffer(case_dir.join("noisy.png"), &img)?;
    write_json(
        case_dir.join("meta.json"),
        &MetaNoise {
            kind: args.kind,
            amount: args.amount,
            seed: args.seed,
            clip: [0, 255],
            before,
            after: stats_of(&img),
        },
    )?;

    Ok(())
}

fn run_arith(args: ArithArgs) -> Result<()> {
    let case_dir = prepare_case(&args.common, "arith")?;
    let img = load_input_u8(&args.common.input)?;
    let before = stats_of(&img);

    let out = img.create_new(img.width(), img.height())?;
    math::multiply_bounded(&img, args.gain, 0, 255, &out).context("applying gain")?;
    math::plus_bounded(&out, args.offset, 0, 255, &out).context("applying offset")?;

    let diff = out.create_new(out.width(), out.height())?;
    math::diff_abs(&img, &out, &diff).context("computing difference")?;

    save_u8_buffer(case_dir.join("adjusted.png"), &out)?;
    save_u8_buffer(case_dir.join("abs_diff.png"), &diff)?;
    write_json(
        case_dir.join("meta.json"),
        &MetaArith {
            gain: args.gain,
            offset: args.offset,
            pipeline: "multiply_bounded -> plus_bounded, both clipped to [0, 255]",
            before,
            after: stats_of(&out),
            abs_diff: stats_of(&diff),
        },
    )?;

    Ok(())
}

fn run_flip(args: CommonArgs) -> Result<()> {
    let case_dir = prepare_case(&args, "flip")?;
    let img = load_input_u8(&args.input)?;

    // Flip only the left half to show that views share storage.
    let half = img
        .subview(0, 0, (img.width() / 2).max(1), img.height())
        .context("taking left half")?;
    math::flip_vertical(&half);
    math::flip_horizontal(&img);

    save_u8_buffer(case_dir.join("flipped.png"), &img)?;
    write_json(
        case_dir.join("meta.json"),
        &MetaSimple {
            operation: "flip_vertical(left half) + flip_horizontal(full)",
            size: [img.width(), img.height()],
            bands: 1,
            after: stats_of(&img),
        },
    )?;

    Ok(())
}

fn run_average_bands(args: CommonArgs) -> Result<()> {
    let case_dir = prepare_case(&args, "average_bands")?;
    let bands = load_input_rgb_bands(&args.input)?;
    let out = PixelBuffer::new(bands.width(), bands.height()).context("allocating output")?;

    math::average_band(&bands, &out).context("averaging bands")?;

    save_u8_buffer(case_dir.join("average.png"), &out)?;
    write_json(
        case_dir.join("meta.json"),
        &MetaSimple {
            operation: "average_band",
            size: [out.width(), out.height()],
            bands: bands.num_bands(),
            after: stats_of(&out),
        },
    )?;

    Ok(())
}

fn prepare_case(common: &CommonArgs, case_name: &str) -> Result<PathBuf> {
    ensure_file_exists(&common.input, "input")?;

    let case_dir = common.out.join(case_name);
    fs::create_dir_all(&case_dir)
        .with_context(|| format!("creating output directory {}", case_dir.display()))?;

    fs::copy(&common.input, case_dir.join("input.png")).with_context(|| {
        format!(
            "copying input {} -> {}",
            common.input.display(),
            case_dir.join("input.png").display()
        )
    })?;

    Ok(case_dir)
}

fn load_input_u8(path: &Path) -> Result<PixelBuffer<u8>> {
    let dyn_img =
        image::open(path).with_context(|| format!("opening input image {}", path.display()))?;
    let luma = dyn_img.to_luma8();
    let (w, h) = luma.dimensions();
    let data = luma.into_raw();

    PixelBuffer::from_vec(w as usize, h as usize, data)
        .with_context(|| format!("constructing pixel buffer from {}", path.display()))
}

/// Splits an RGB image into one plane per channel.
fn load_input_rgb_bands(path: &Path) -> Result<MultiBand<u8>> {
    let dyn_img =
        image::open(path).with_context(|| format!("opening input image {}", path.display()))?;
    let rgb = dyn_img.to_rgb8();
    let (w, h) = (rgb.width() as usize, rgb.height() as usize);
    let data = rgb.into_raw();

    let mut bands = Vec::with_capacity(3);
    for c in 0..3 {
        let plane: Vec<u8> = data.iter().skip(c).step_by(3).copied().collect();
        bands.push(
            PixelBuffer::from_vec(w, h, plane)
                .with_context(|| format!("constructing band {c} from {}", path.display()))?,
        );
    }
    MultiBand::from_bands(bands).context("assembling bands")
}

fn stats_of(img: &PixelBuffer<u8>) -> ImageStats {
    let mean = math::mean(img);
    ImageStats {
        min: math::min_value(img) as f64,
        max: math::max_value(img) as f64,
        mean,
        variance: math::variance(img, mean),
    }
}

fn save_u8_buffer(path: PathBuf, img: &PixelBuffer<u8>) -> Result<()> {
    let gray = GrayImage::from_raw(img.width() as u32, img.height() as u32, img.to_vec())
        .context("constructing GrayImage from raw bytes")?;
    gray.save(&path)
        .with_context(|| format!("saving image {}", path.display()))
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}
