use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{ArgGroup, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "clipstream", version)]
struct Cli {
    /// Enable debug-level logging on stderr.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert between frames, seconds and milliseconds.
    Convert(ConvertArgs),
    /// Decode a range with the synthetic engine and drain the frame buffer.
    Decode(DecodeArgs),
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("input").required(true).args(["frames", "seconds"])))]
struct ConvertArgs {
    /// Frame index to convert.
    #[arg(long, allow_negative_numbers = true)]
    frames: Option<i64>,

    /// Seconds to convert.
    #[arg(long, allow_negative_numbers = true)]
    seconds: Option<f64>,

    /// Frame rate.
    #[arg(long, default_value_t = clipstream::FPS_DEFAULT)]
    fps: f64,
}

#[derive(Parser, Debug)]
struct DecodeArgs {
    /// First source second.
    #[arg(long)]
    start: f64,

    /// Last source second.
    #[arg(long)]
    stop: f64,

    /// Frame rate (defaults to the pipeline config).
    #[arg(long)]
    fps: Option<f64>,

    /// Frame width in pixels.
    #[arg(long, default_value_t = 16)]
    width: u32,

    /// Frame height in pixels.
    #[arg(long, default_value_t = 9)]
    height: u32,

    /// Pipeline config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Source file name reported to the engine.
    #[arg(long, default_value = "synthetic.mp4")]
    file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Convert(args) => cmd_convert(args),
        Command::Decode(args) => cmd_decode(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let frames = match (args.frames, args.seconds) {
        (Some(frames), _) => frames,
        (None, Some(seconds)) => clipstream::seconds_to_frames(seconds, args.fps)?,
        (None, None) => anyhow::bail!("either --frames or --seconds is required"),
    };
    let seconds = clipstream::frames_to_seconds(frames, args.fps)?;
    let millis = clipstream::frames_to_millis(frames, args.fps)?;

    println!("frames: {frames}");
    println!("seconds: {seconds}");
    println!("millis: {millis}");
    Ok(())
}

fn cmd_decode(args: DecodeArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => clipstream::PipelineConfig::from_path(path)?,
        None => clipstream::PipelineConfig::default(),
    };
    let fps = args.fps.unwrap_or(config.fps);
    let range = clipstream::DecodeRange::new(args.start, args.stop)?;
    let engine = Arc::new(clipstream::SyntheticEngine::new(args.width, args.height));
    let file = clipstream::SourceFile::new(&args.file);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;

    let (count, last_us) = runtime.block_on(async move {
        let session = clipstream::DecodeSession::start(engine, file, range, fps, &config)?;
        let buffer = session.buffer();
        let mut count = 0u64;
        let mut last_us = None;
        while let Some(frame) = buffer.dequeue().await {
            count += 1;
            last_us = Some(frame.timestamp_us());
            frame.close();
        }
        tracing::debug!(count, "buffer drained");
        Ok::<_, clipstream::ClipError>((count, last_us))
    })?;

    println!("frames: {count}");
    match last_us {
        Some(us) => println!("last_timestamp_us: {us}"),
        None => println!("last_timestamp_us: none"),
    }
    Ok(())
}
