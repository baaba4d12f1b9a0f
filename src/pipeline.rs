//! Scan → split → write, with console reporting and conflict recovery.

use anyhow::{Context, Result};
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rand::Rng;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::collection::{Dataset, SplitSummary, VideoCollection};
use crate::scanner::scan_source;
use crate::splitter::{shuffle_and_split, SplitRatio};
use crate::taxonomy::{Category, Partition};
use crate::writer::{purge, write_dataset, WriteError, WriteReport};

pub const SUMMARY_FILE: &str = "split_summary.json";

/// What to do when the destination already holds a target directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ConflictPolicy {
    /// Ask the operator whether to purge and rewrite.
    #[default]
    Prompt,
    /// Purge and rewrite without asking.
    Purge,
    /// Fail, leaving whatever was already written.
    Abort,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source: PathBuf,
    pub dst: PathBuf,
    pub split: SplitRatio,
    pub seed: Option<u64>,
    pub on_conflict: ConflictPolicy,
    pub progress: bool,
}

/// Run the whole pipeline. `confirm_purge` is only consulted under
/// [`ConflictPolicy::Prompt`] and returns true to purge.
pub fn build_local_dataset<R, F>(
    cfg: &RunConfig,
    rng: &mut R,
    confirm_purge: F,
) -> Result<SplitSummary>
where
    R: Rng + ?Sized,
    F: FnMut(&Path) -> Result<bool>,
{
    info!("Starting local dataset build");
    info!("Source: {:?}  Destination: {:?}", cfg.source, cfg.dst);
    info!("Split: {}  Seed: {:?}", cfg.split.value(), cfg.seed);

    let mut vids = scan_source(&cfg.source)
        .with_context(|| format!("scanning source {}", cfg.source.display()))?;
    print_counts(&vids);
    println!();

    let source_counts = vids.counts();
    let dataset = shuffle_and_split(&mut vids, cfg.split, rng);
    for partition in Partition::ALL {
        println!("[{}]", partition.name());
        print_counts(dataset.partition(partition));
        println!();
    }

    let bar = if cfg.progress {
        let bar = ProgressBar::new(0);
        bar.set_style(ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} copying",
        )?);
        bar
    } else {
        ProgressBar::hidden()
    };
    let report = write_with_policy(&dataset, &cfg.dst, cfg.on_conflict, &bar, confirm_purge)?;

    let summary = SplitSummary {
        created_at: Local::now().to_rfc3339(),
        split: cfg.split.value(),
        seed: cfg.seed,
        source: source_counts,
        train: dataset.train.counts(),
        test: dataset.test.counts(),
    };
    let summary_path = cfg.dst.join(SUMMARY_FILE);
    let file = File::create(&summary_path)
        .with_context(|| format!("creating {}", summary_path.display()))?;
    serde_json::to_writer_pretty(file, &summary)
        .with_context(|| format!("writing {}", summary_path.display()))?;

    info!("Wrote {} files, summary at {:?}", report.files, summary_path);
    println!("Finished building local dataset storage.");
    Ok(summary)
}

/// Write once; on conflict apply `policy`. A purge is followed by exactly
/// one retry, and a conflict on that retry is returned as-is.
pub fn write_with_policy<F>(
    dataset: &Dataset,
    dst: &Path,
    policy: ConflictPolicy,
    bar: &ProgressBar,
    confirm_purge: F,
) -> Result<WriteReport>
where
    F: FnMut(&Path) -> Result<bool>,
{
    recover_with(dataset, dst, policy, bar, confirm_purge, purge)
}

fn recover_with<F, P>(
    dataset: &Dataset,
    dst: &Path,
    policy: ConflictPolicy,
    bar: &ProgressBar,
    mut confirm_purge: F,
    purge_dst: P,
) -> Result<WriteReport>
where
    F: FnMut(&Path) -> Result<bool>,
    P: FnOnce(&Path) -> Result<(), WriteError>,
{
    let err = match write_dataset(dataset, dst, bar) {
        Ok(report) => return Ok(report),
        Err(e @ WriteError::Conflict { .. }) => e,
        Err(e) => return Err(e.into()),
    };
    warn!("{}", err);

    let purge_confirmed = match policy {
        ConflictPolicy::Purge => true,
        ConflictPolicy::Abort => false,
        ConflictPolicy::Prompt => confirm_purge(dst)?,
    };
    if !purge_confirmed {
        return Err(anyhow::Error::new(err).context(format!(
            "aborted; files already written to {} were kept",
            dst.display()
        )));
    }

    println!("Deleting {} and re-writing it anew.", dst.display());
    purge_dst(dst)?;
    write_dataset(dataset, dst, bar)
        .with_context(|| format!("re-writing {} after purge", dst.display()))
}

fn print_counts(vids: &VideoCollection) {
    for cat in Category::ALL {
        println!(
            "There are {} bad videos under \"{}\" category.",
            vids.bad(cat).len(),
            cat
        );
    }
    println!("There are {} good videos.", vids.good().len());
}
