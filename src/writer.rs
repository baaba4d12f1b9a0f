//! Materialises a [`Dataset`] as `dst/{train,test}/{bad/<category>,good}`.

use indicatif::ProgressBar;
use log::{info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::collection::Dataset;
use crate::taxonomy::{Label, Partition};

#[derive(Debug, Error)]
pub enum WriteError {
    /// A target directory was already present; nothing is merged into it.
    #[error("destination directory already exists: {}", path.display())]
    Conflict { path: PathBuf },
    #[error("io error while writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WriteError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, WriteError::Conflict { .. })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub files: usize,
    pub bytes: u64,
}

/// Leaf directory for one (partition, label) bucket.
pub fn target_dir(dst: &Path, partition: Partition, label: Label) -> PathBuf {
    dst.join(partition.name()).join(label.rel_dir())
}

/// Create every leaf directory. Fails with [`WriteError::Conflict`] on the
/// first leaf that already exists; leaves created before it are kept.
pub fn create_skeleton(dst: &Path) -> Result<(), WriteError> {
    for label in Label::all() {
        for partition in Partition::ALL {
            let dir = target_dir(dst, partition, label);
            if let Some(parent) = dir.parent() {
                fs::create_dir_all(parent).map_err(|e| WriteError::io(parent, e))?;
            }
            match fs::create_dir(&dir) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    return Err(WriteError::Conflict { path: dir });
                }
                Err(e) => return Err(WriteError::io(&dir, e)),
            }
        }
    }
    Ok(())
}

/// Build the skeleton, then copy every video into its bucket keeping only
/// the file name. Same-named sources overwrite each other.
pub fn write_dataset(
    dataset: &Dataset,
    dst: &Path,
    bar: &ProgressBar,
) -> Result<WriteReport, WriteError> {
    create_skeleton(dst)?;
    info!("Created dataset skeleton under {:?}", dst);

    bar.set_length(dataset.total() as u64);
    let mut report = WriteReport::default();
    for partition in Partition::ALL {
        for (label, src) in dataset.partition(partition).iter() {
            let Some(name) = src.file_name() else {
                continue;
            };
            let target = target_dir(dst, partition, label).join(name);
            let bytes = fs::copy(src, &target).map_err(|e| WriteError::io(&target, e))?;
            report.files += 1;
            report.bytes += bytes;
            bar.inc(1);
        }
    }
    bar.finish_and_clear();

    info!(
        "Copied {} files ({} bytes) into {:?}",
        report.files, report.bytes, dst
    );
    Ok(report)
}

/// Recursively delete the destination root.
pub fn purge(dst: &Path) -> Result<(), WriteError> {
    warn!("Purging destination {:?}", dst);
    fs::remove_dir_all(dst).map_err(|e| WriteError::io(dst, e))
}
