//! Fixed label taxonomy and the directory naming conventions of the source tree.
//!
//! Expected source layout:
//!
//! ```text
//! source/
//!   <subject>/
//!     bad/
//!       approach/ direction/ human/ run/ slip/ stop/ two/   (*.mp4)
//!     good/
//!       duplicated passing/                                 (*.mp4)
//!       *.mp4
//! ```
//!
//! Anything else in the tree is ignored.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub const BAD: &str = "bad";
pub const GOOD: &str = "good";
pub const DUPLICATED_PASSING: &str = "duplicated passing";
pub const VIDEO_EXTENSION: &str = "mp4";

/// Undesired-behaviour sub-categories found under a subject's `bad/` directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Approach,
    Direction,
    Human,
    Run,
    Slip,
    Stop,
    Two,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Approach,
        Category::Direction,
        Category::Human,
        Category::Run,
        Category::Slip,
        Category::Stop,
        Category::Two,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Approach => "approach",
            Category::Direction => "direction",
            Category::Human => "human",
            Category::Run => "run",
            Category::Slip => "slip",
            Category::Stop => "stop",
            Category::Two => "two",
        }
    }

    /// Exact, case-sensitive lookup of a category directory name.
    pub fn from_name(name: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A destination bucket: the single good label or one bad category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Good,
    Bad(Category),
}

impl Label {
    /// Every label, bad categories first.
    pub fn all() -> impl Iterator<Item = Label> {
        Category::ALL
            .into_iter()
            .map(Label::Bad)
            .chain(std::iter::once(Label::Good))
    }

    /// Directory of this label relative to a partition root (`good` or `bad/<category>`).
    pub fn rel_dir(self) -> PathBuf {
        match self {
            Label::Good => PathBuf::from(GOOD),
            Label::Bad(cat) => Path::new(BAD).join(cat.name()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    Train,
    Test,
}

impl Partition {
    pub const ALL: [Partition; 2] = [Partition::Train, Partition::Test];

    pub fn name(self) -> &'static str {
        match self {
            Partition::Train => "train",
            Partition::Test => "test",
        }
    }
}

/// True when `path` carries the recognised video extension, ignoring case.
pub fn is_video(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(VIDEO_EXTENSION))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_names_round_trip_through_lookup() {
        for cat in Category::ALL {
            assert_eq!(Category::from_name(cat.name()), Some(cat));
        }
        assert_eq!(Category::from_name("Run"), None);
        assert_eq!(Category::from_name("walk"), None);
    }

    #[test]
    fn video_extension_ignores_case() {
        assert!(is_video(Path::new("clip.mp4")));
        assert!(is_video(Path::new("clip.MP4")));
        assert!(is_video(Path::new("clip.Mp4")));
        assert!(!is_video(Path::new("clip.mov")));
        assert!(!is_video(Path::new("mp4")));
        assert!(!is_video(Path::new(".mp4")));
    }

    #[test]
    fn label_dirs_follow_layout() {
        assert_eq!(Label::Good.rel_dir(), PathBuf::from("good"));
        assert_eq!(
            Label::Bad(Category::Slip).rel_dir(),
            Path::new("bad").join("slip")
        );
        assert_eq!(Label::all().count(), 8);
    }
}
