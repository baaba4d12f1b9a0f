//! Builds a stratified train/test copy of a labelled cow-video tree.

pub mod collection;
pub mod pipeline;
pub mod scanner;
pub mod splitter;
pub mod taxonomy;
pub mod writer;

pub use collection::{Dataset, SplitSummary, VideoCollection};
pub use pipeline::{build_local_dataset, ConflictPolicy, RunConfig};
pub use splitter::SplitRatio;
pub use taxonomy::{Category, Label, Partition};
