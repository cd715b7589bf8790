mod progress;

use structopt::StructOpt;

use parallel_texture_synthesis::{
    image::ImageOutputFormat as ImgFmt, Dims, Error, GeneratorProgress, JitterPolicy, Session,
};
use std::path::PathBuf;

fn parse_size(input: &str) -> Result<Dims, std::num::ParseIntError> {
    let mut i = input.splitn(2, 'x');

    let x: u32 = i.next().unwrap_or("").parse()?;
    let y: u32 = match i.next() {
        Some(num) => num.parse()?,
        None => x,
    };
    Ok(Dims::new(x, y))
}

fn parse_img_fmt(input: &str) -> Result<ImgFmt, String> {
    let fmt = match input {
        "png" => ImgFmt::Png,
        "jpg" => ImgFmt::Jpeg(75),
        "bmp" => ImgFmt::Bmp,
        other => {
            return Err(format!(
                "image format `{}` not one of: 'png', 'jpg', 'bmp'",
                other
            ))
        }
    };

    Ok(fmt)
}

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
struct Tweaks {
    /// The maximum random offset, in exemplar pixels, applied to the synthesized
    /// coordinates. It is scaled down at finer levels, and no jitter is applied
    /// below `--jitter-min-level`.
    #[structopt(long, default_value = "25.0")]
    jitter: f32,
    /// The finest exemplar level that is still jittered
    #[structopt(long, default_value = "3")]
    jitter_min_level: u32,
    /// Weighs the cost of coherent candidates during correction. Values below
    /// 1.0 favor copying larger continuous patches of the exemplar.
    #[structopt(long, default_value = "0.2")]
    kappa: f32,
    /// The number of interleaved pixel groups per axis each correction pass is
    /// split into
    #[structopt(long, default_value = "2")]
    subpasses: u32,
    /// The number of correction passes run at every level
    #[structopt(long, default_value = "2")]
    correction_passes: u32,
    /// A seed value for the jitter. The same seed always gives the same result.
    #[structopt(long)]
    seed: Option<u64>,
    /// Don't show progress bars
    #[structopt(long)]
    no_progress: bool,
}

#[derive(StructOpt)]
#[structopt(
    name = "parallel-texture-synthesis",
    about = "Synthesizes images based on an exemplar image",
    rename_all = "kebab-case"
)]
struct Opt {
    /// Size of the generated image, in `width x height`, or a single number for both dimensions
    #[structopt(
        long,
        default_value = "512",
        parse(try_from_str = parse_size)
    )]
    out_size: Dims,
    /// The format to save the generated image as.
    ///
    /// NOTE: this will only apply when stdout is specified via `-o -`, otherwise the image
    /// format is determined by the file extension of the path provided to `-o`
    #[structopt(
        long,
        default_value = "png",
        parse(try_from_str = parse_img_fmt)
    )]
    out_fmt: ImgFmt,
    /// Resize the exemplar, in `width x height`, or a single number for both dimensions
    #[structopt(long, parse(try_from_str = parse_size))]
    in_size: Option<Dims>,
    /// The path to save the generated image to, the file extensions of the path determines
    /// the image format used. You may use `-` for stdout.
    #[structopt(long = "out", short, parse(from_os_str))]
    output_path: PathBuf,
    /// A path to save the patch map to, where the red and green channels hold the
    /// exemplar coordinate each pixel was copied from
    #[structopt(long, parse(from_os_str))]
    patches: Option<PathBuf>,
    /// A directory into which debug images are also saved.
    ///
    /// * `patches.png` - The patch map of the generated image
    /// * `step_<n>_level_<l>.png` - The colorized field of every synthesis step
    #[structopt(long, parse(from_os_str))]
    debug_out_dir: Option<PathBuf>,
    /// The maximum number of worker threads that can be active at any one time
    /// while synthesizing images. Defaults to the logical core count.
    #[structopt(short = "t", long = "threads")]
    max_threads: Option<usize>,
    /// The log level, eg `info` or `parallel_texture_synthesis=debug`. Defaults
    /// to `RUST_LOG`, or `warn` if that isn't set.
    #[structopt(long)]
    log_level: Option<String>,
    #[structopt(flatten)]
    tweaks: Tweaks,
    /// Path to the exemplar used to synthesize a new image
    #[structopt(parse(from_os_str))]
    exemplar: PathBuf,
}

fn main() {
    if let Err(e) = real_main() {
        if atty::is(atty::Stream::Stderr) {
            eprintln!("\x1b[31merror\x1b[0m: {}", e);
        } else {
            eprintln!("error: {}", e);
        }

        std::process::exit(1);
    }
}

fn setup_logging(
    level: Option<&str>,
) -> Result<flexi_logger::LoggerHandle, flexi_logger::FlexiLoggerError> {
    let logger = match level {
        Some(level) => flexi_logger::Logger::try_with_str(level)?,
        None => flexi_logger::Logger::try_with_env_or_str("warn")?,
    };

    logger.start()
}

fn real_main() -> Result<(), Error> {
    let args = Opt::from_args();

    let _logger = match setup_logging(args.log_level.as_deref()) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("failed to initialize logging: {}", e);
            None
        }
    };

    // Check that the extension for the path supplied by the user is one of the ones we support
    {
        match args.output_path.extension().and_then(|ext| ext.to_str()) {
            Some("png") | Some("jpg") | Some("bmp") => {}
            None => {}
            Some(other) => return Err(Error::UnsupportedOutputFormat(other.to_owned())),
        }
    }

    let mut sb = Session::builder()
        .add_example(&args.exemplar)
        .output_size(args.out_size)
        .seed(args.tweaks.seed.unwrap_or_default())
        .jitter_strength(args.tweaks.jitter)
        .jitter_policy(JitterPolicy::Scaled {
            min_level: args.tweaks.jitter_min_level,
        })
        .kappa(args.tweaks.kappa)
        .subpass_grid(args.tweaks.subpasses)
        .correction_passes(args.tweaks.correction_passes);

    if let Some(mt) = args.max_threads {
        sb = sb.max_thread_count(mt);
    }

    if let Some(insize) = args.in_size {
        sb = sb.resize_input(insize);
    }

    let session = sb.build()?;

    let progress: Option<Box<dyn GeneratorProgress>> = if !args.tweaks.no_progress {
        Some(Box::new(progress::ProgressBars::new()))
    } else {
        None
    };

    let generated = session.run(progress)?;

    if let Some(ref dir) = args.debug_out_dir {
        generated.save_debug(dir)?;
    }

    if let Some(ref patches) = args.patches {
        generated.save_patches(patches)?;
    }

    if args.output_path.to_str() == Some("-") {
        let out = std::io::stdout();
        let mut out = out.lock();
        generated.write(&mut out, args.out_fmt)?;
    } else {
        // This won't respect the output format specified by the user,
        // only the extension on the path they specify
        generated.save(&args.output_path)?;
        log::info!("saved {}", args.output_path.display());
    }

    Ok(())
}
