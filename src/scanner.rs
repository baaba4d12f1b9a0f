//! Source tree discovery.

use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::collection::VideoCollection;
use crate::taxonomy::{is_video, Category, Label, BAD, DUPLICATED_PASSING, GOOD};

/// Walk `source` and group every recognised video by label.
pub fn scan_source(source: &Path) -> Result<VideoCollection> {
    let subjects = subject_dirs(source)?;
    info!("Found {} subject directories in {:?}", subjects.len(), source);

    let mut bad_roots = Vec::new();
    let mut good_roots = Vec::new();
    for subject in &subjects {
        for entry in list_dir(subject)? {
            if !entry.is_dir {
                continue;
            }
            if entry.name == BAD {
                bad_roots.push(entry.path);
            } else if entry.name == GOOD {
                good_roots.push(entry.path);
            }
        }
    }

    let mut vids = VideoCollection::new();

    for root in &bad_roots {
        for entry in list_dir(root)? {
            if !entry.is_dir {
                continue;
            }
            if let Some(cat) = Category::from_name(&entry.name) {
                collect_videos(&entry.path, vids.videos_mut(Label::Bad(cat)))?;
            }
        }
    }

    for root in &good_roots {
        collect_videos(root, vids.videos_mut(Label::Good))?;
    }

    for cat in Category::ALL {
        if vids.bad(cat).is_empty() {
            warn!("No videos found for bad category \"{}\"", cat);
        }
    }
    info!(
        "Scanned {} bad roots and {} good roots, {} videos in total",
        bad_roots.len(),
        good_roots.len(),
        vids.total()
    );
    Ok(vids)
}

/// Immediate subdirectories of the source root.
pub fn subject_dirs(source: &Path) -> Result<Vec<PathBuf>> {
    Ok(list_dir(source)?
        .into_iter()
        .filter(|entry| entry.is_dir)
        .map(|entry| entry.path)
        .collect())
}

/// Append the videos directly inside `dir` to `out`, descending into any
/// `duplicated passing` directory as if its entries were siblings.
pub fn collect_videos(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in list_dir(dir)? {
        if entry.is_dir {
            if entry.name == DUPLICATED_PASSING {
                collect_videos(&entry.path, out)?;
            }
        } else if entry.is_file && is_video(&entry.path) {
            out.push(entry.path);
        }
    }
    Ok(())
}

struct Entry {
    name: String,
    path: PathBuf,
    is_dir: bool,
    is_file: bool,
}

// Immediate children sorted by name so seeded runs reproduce. Symlinks are
// resolved; a link that cannot be stat'ed (loop, dangling, no permission)
// is an error.
fn list_dir(dir: &Path) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    let walker = WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name();
    for entry in walker {
        let entry = entry.with_context(|| format!("reading directory {}", dir.display()))?;
        let file_type = if entry.path_is_symlink() {
            fs::metadata(entry.path())
                .with_context(|| format!("reading metadata of {}", entry.path().display()))?
                .file_type()
        } else {
            entry.file_type()
        };
        entries.push(Entry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: file_type.is_dir(),
            is_file: file_type.is_file(),
            path: entry.into_path(),
        });
    }
    Ok(entries)
}
