/*
cargo run --bin build_local_dataset -- \
    --source /mnt/videos/cows \
    --split 0.8

interactive (prompts for source and split, writes to ./resources/data):
cargo run --bin build_local_dataset
*/

use anyhow::{bail, Context, Result};
use b_dataset::{build_local_dataset, ConflictPolicy, RunConfig, SplitRatio};
use chrono::Local;
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::{thread_rng, RngCore, SeedableRng};
use simplelog::{Config as LogConfig, LevelFilter, WriteLogger};
use std::fs::{create_dir_all, File};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

// CLI parameters; source and split are prompted for when omitted
#[derive(Parser, Debug)]
#[command(version, about = "Split a labelled video tree into train/test folders")]
struct Cli {
    // Source dataset directory
    #[arg(short, long)]
    source: Option<PathBuf>,

    // Train proportion, 0.0 - 1.0
    #[arg(short = 'r', long)]
    split: Option<f64>,

    // Destination root (default: <cwd>/resources/data)
    #[arg(short, long)]
    dst: Option<PathBuf>,

    // Seed for a reproducible shuffle
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = ConflictPolicy::Prompt)]
    on_conflict: ConflictPolicy,

    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    #[arg(long)]
    no_progress: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // logging setup
    create_dir_all(&cli.log_dir)?;
    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let log_path = cli.log_dir.join(format!("build_local_dataset_{ts}.log"));
    WriteLogger::init(
        LevelFilter::Info,
        LogConfig::default(),
        File::create(&log_path)?,
    )?;

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let source = match cli.source {
        Some(p) => p,
        None => {
            let line = prompt(&mut input, "Source dataset directory: ")?;
            if line.is_empty() {
                bail!("no source dataset directory given");
            }
            PathBuf::from(line)
        }
    };
    let split = match cli.split {
        Some(r) => r,
        None => {
            let line = prompt(
                &mut input,
                "Split proportion for train and test data (0.0 - 1.0): ",
            )?;
            line.parse::<f64>()
                .with_context(|| format!("split proportion {line:?} is not a number"))?
        }
    };
    let dst = match cli.dst {
        Some(p) => p,
        None => std::env::current_dir()?.join("resources").join("data"),
    };

    let cfg = RunConfig {
        source,
        dst,
        split: SplitRatio::new(split)?,
        seed: cli.seed,
        on_conflict: cli.on_conflict,
        progress: !cli.no_progress,
    };

    let mut rng: Box<dyn RngCore> = match cfg.seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(thread_rng()),
    };

    build_local_dataset(&cfg, &mut *rng, |dst| confirm_purge(&mut input, dst))?;
    info!("Log file: {:?}", log_path);
    Ok(())
}

fn prompt(input: &mut impl BufRead, message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_owned())
}

fn confirm_purge(input: &mut impl BufRead, dst: &Path) -> Result<bool> {
    println!(
        "It seems like some files you want to write already exist in {}. \
         It is recommended to purge the local dataset and re-write it anew to avoid inconsistencies.",
        dst.display()
    );
    let answer = prompt(
        input,
        "Do you want to purge current local dataset and re-write anew?\n\
         Note: if aborted, any files that have already been written will persist in the destination folder.\n\
         [y/n]: ",
    )?;
    Ok(answer == "y")
}
