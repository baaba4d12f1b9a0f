use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::taxonomy::{Category, Label, Partition};

/// Video paths grouped by label. Every bad category is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCollection {
    bad: BTreeMap<Category, Vec<PathBuf>>,
    good: Vec<PathBuf>,
}

impl Default for VideoCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoCollection {
    pub fn new() -> Self {
        Self {
            bad: Category::ALL.into_iter().map(|c| (c, Vec::new())).collect(),
            good: Vec::new(),
        }
    }

    pub fn videos(&self, label: Label) -> &[PathBuf] {
        match label {
            Label::Good => &self.good,
            // all categories are inserted in new()
            Label::Bad(cat) => self.bad.get(&cat).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    pub fn videos_mut(&mut self, label: Label) -> &mut Vec<PathBuf> {
        match label {
            Label::Good => &mut self.good,
            Label::Bad(cat) => self.bad.entry(cat).or_default(),
        }
    }

    pub fn bad(&self, cat: Category) -> &[PathBuf] {
        self.videos(Label::Bad(cat))
    }

    pub fn good(&self) -> &[PathBuf] {
        &self.good
    }

    pub fn total(&self) -> usize {
        Label::all().map(|l| self.videos(l).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// All (label, path) pairs, bad categories first.
    pub fn iter(&self) -> impl Iterator<Item = (Label, &PathBuf)> + '_ {
        Label::all().flat_map(move |l| self.videos(l).iter().map(move |p| (l, p)))
    }

    pub fn counts(&self) -> LabelCounts {
        LabelCounts {
            bad: self.bad.iter().map(|(c, v)| (*c, v.len())).collect(),
            good: self.good.len(),
        }
    }
}

/// Train and test halves of a split collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dataset {
    pub train: VideoCollection,
    pub test: VideoCollection,
}

impl Dataset {
    pub fn partition(&self, partition: Partition) -> &VideoCollection {
        match partition {
            Partition::Train => &self.train,
            Partition::Test => &self.test,
        }
    }

    pub fn total(&self) -> usize {
        self.train.total() + self.test.total()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCounts {
    pub bad: BTreeMap<Category, usize>,
    pub good: usize,
}

/// Counts written next to the materialised dataset as `split_summary.json`.
#[derive(Debug, Clone, Serialize)]
pub struct SplitSummary {
    pub created_at: String,
    pub split: f64,
    pub seed: Option<u64>,
    pub source: LabelCounts,
    pub train: LabelCounts,
    pub test: LabelCounts,
}
