use clap::{Parser, Subcommand};
use rust_smqt::tools::{enhance_file, load_channels, rgb_stats};
use rust_smqt::{Execution, SmqtConfig, Traversal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "smqt", version, about = "SMQT contrast enhancement")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Enhance an image and write the result as PNG
    Enhance {
        /// Input image (any format the image crate decodes)
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,

        /// Quantization level, overrides SMQT_LEVEL
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=8))]
        level: Option<u8>,

        /// Partition tree walk: recursive or stack
        #[arg(long)]
        traversal: Option<Traversal>,

        /// Transform channels one after another instead of concurrently
        #[arg(long)]
        sequential: bool,

        /// Dedicated worker threads (0 = rayon default)
        #[arg(long)]
        threads: Option<usize>,
    },
    /// Print per-channel statistics before and after the transform
    Stats {
        #[arg(long)]
        image: PathBuf,

        #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=8))]
        level: Option<u8>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_smqt=info,smqt=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Enhance {
            input,
            output,
            level,
            traversal,
            sequential,
            threads,
        } => {
            let mut config = SmqtConfig::from_env();
            if let Some(level) = level {
                config.level = level;
            }
            if let Some(traversal) = traversal {
                config.traversal = traversal;
            }
            if sequential {
                config.execution = Execution::Sequential;
            }
            if let Some(threads) = threads {
                config.threads = threads;
            }
            enhance_cmd(&input, &output, &config)
        }
        Command::Stats { image, level } => {
            let mut config = SmqtConfig::from_env();
            if let Some(level) = level {
                config.level = level;
            }
            stats_cmd(&image, &config)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn enhance_cmd(
    input: &Path,
    output: &Path,
    config: &SmqtConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = enhance_file(input, output, config)?;
    println!(
        "{} ({}x{}) -> {} at level {} ({:.2?})",
        input.display(),
        report.width,
        report.height,
        output.display(),
        report.level,
        report.elapsed
    );
    Ok(())
}

fn stats_cmd(image: &Path, config: &SmqtConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut channels = load_channels(image)?;
    println!(
        "Image: {} ({}x{})",
        image.display(),
        channels.width(),
        channels.height()
    );

    let start = Instant::now();
    config.dispatcher()?.transform(&mut channels)?;
    println!("SMQT level {} in {:.2?}", config.level, start.elapsed());

    for (channel, raw, output) in rgb_stats(&channels) {
        println!(
            "  {:<5} raw: min={:>3} max={:>3} avg={:>3} distinct={:>3} | smqt: min={:>3} max={:>3} avg={:>3} distinct={:>3}",
            channel.to_string(),
            raw.min,
            raw.max,
            raw.avg,
            raw.distinct,
            output.min,
            output.max,
            output.avg,
            output.distinct
        );
    }
    Ok(())
}
