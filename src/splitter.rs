//! Stratified shuffle-and-cut of a [`VideoCollection`].

use log::info;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::collection::{Dataset, VideoCollection};
use crate::taxonomy::Label;

#[derive(Debug, Error, PartialEq)]
#[error("split proportion must be between 0.0 and 1.0, got {0}")]
pub struct InvalidRatio(pub f64);

/// Fraction of each label assigned to train.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitRatio(f64);

impl SplitRatio {
    pub fn new(ratio: f64) -> Result<Self, InvalidRatio> {
        if (0.0..=1.0).contains(&ratio) {
            Ok(Self(ratio))
        } else {
            Err(InvalidRatio(ratio))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Train length for a sequence of `len` items, rounded down.
    pub fn cut(self, len: usize) -> usize {
        ((len as f64 * self.0).floor() as usize).min(len)
    }
}

/// Shuffle every label's sequence independently.
pub fn shuffle<R: Rng + ?Sized>(vids: &mut VideoCollection, rng: &mut R) {
    for label in Label::all() {
        vids.videos_mut(label).shuffle(rng);
    }
}

/// Cut each label at `floor(ratio * len)`; the prefix goes to train, the rest to test.
pub fn split(vids: &VideoCollection, ratio: SplitRatio) -> Dataset {
    let mut dataset = Dataset::default();
    for label in Label::all() {
        let all = vids.videos(label);
        let (train, test) = all.split_at(ratio.cut(all.len()));
        dataset.train.videos_mut(label).extend_from_slice(train);
        dataset.test.videos_mut(label).extend_from_slice(test);
    }
    info!(
        "Split {} videos at {}: train={} test={}",
        vids.total(),
        ratio.value(),
        dataset.train.total(),
        dataset.test.total()
    );
    dataset
}

/// Shuffle in place, then split.
pub fn shuffle_and_split<R: Rng + ?Sized>(
    vids: &mut VideoCollection,
    ratio: SplitRatio,
    rng: &mut R,
) -> Dataset {
    shuffle(vids, rng);
    split(vids, ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::Category;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::path::PathBuf;

    fn collection(run: usize, good: usize) -> VideoCollection {
        let mut vc = VideoCollection::new();
        for i in 0..run {
            vc.videos_mut(Label::Bad(Category::Run))
                .push(PathBuf::from(format!("run/{i}.mp4")));
        }
        for i in 0..good {
            vc.videos_mut(Label::Good)
                .push(PathBuf::from(format!("good/{i}.mp4")));
        }
        vc
    }

    #[test]
    fn ratio_rejects_out_of_range() {
        assert!(SplitRatio::new(-0.1).is_err());
        assert!(SplitRatio::new(1.01).is_err());
        assert!(SplitRatio::new(f64::NAN).is_err());
        assert!(SplitRatio::new(0.0).is_ok());
        assert!(SplitRatio::new(1.0).is_ok());
    }

    #[test]
    fn cut_rounds_down() {
        let r = SplitRatio::new(0.75).unwrap();
        assert_eq!(r.cut(10), 7);
        assert_eq!(r.cut(4), 3);
        assert_eq!(r.cut(1), 0);
        assert_eq!(r.cut(0), 0);
    }

    #[test]
    fn per_label_counts_follow_floor() {
        let mut vc = collection(10, 4);
        let mut rng = StdRng::seed_from_u64(7);
        let ds = shuffle_and_split(&mut vc, SplitRatio::new(0.75).unwrap(), &mut rng);

        assert_eq!(ds.train.bad(Category::Run).len(), 7);
        assert_eq!(ds.test.bad(Category::Run).len(), 3);
        assert_eq!(ds.train.good().len(), 3);
        assert_eq!(ds.test.good().len(), 1);
        assert_eq!(ds.total(), vc.total());
    }

    #[test]
    fn halves_do_not_overlap() {
        let mut vc = collection(25, 13);
        let mut rng = StdRng::seed_from_u64(1);
        let ds = shuffle_and_split(&mut vc, SplitRatio::new(0.4).unwrap(), &mut rng);

        let train: HashSet<_> = ds.train.iter().map(|(_, p)| p.clone()).collect();
        let test: HashSet<_> = ds.test.iter().map(|(_, p)| p.clone()).collect();
        assert!(train.is_disjoint(&test));
        assert_eq!(train.len() + test.len(), 38);
    }

    #[test]
    fn zero_ratio_sends_everything_to_test() {
        let mut vc = collection(5, 0);
        let original: HashSet<_> = vc.bad(Category::Run).iter().cloned().collect();
        let mut rng = StdRng::seed_from_u64(3);
        let ds = shuffle_and_split(&mut vc, SplitRatio::new(0.0).unwrap(), &mut rng);

        assert!(ds.train.bad(Category::Run).is_empty());
        let test: HashSet<_> = ds.test.bad(Category::Run).iter().cloned().collect();
        assert_eq!(test, original);
    }

    #[test]
    fn full_ratio_sends_everything_to_train() {
        let mut vc = collection(5, 2);
        let mut rng = StdRng::seed_from_u64(3);
        let ds = shuffle_and_split(&mut vc, SplitRatio::new(1.0).unwrap(), &mut rng);
        assert_eq!(ds.train.total(), 7);
        assert!(ds.test.is_empty());
    }

    #[test]
    fn empty_labels_stay_empty() {
        let mut vc = VideoCollection::new();
        let mut rng = StdRng::seed_from_u64(3);
        let ds = shuffle_and_split(&mut vc, SplitRatio::new(0.5).unwrap(), &mut rng);
        assert!(ds.train.is_empty());
        assert!(ds.test.is_empty());
    }

    #[test]
    fn same_seed_same_split() {
        let mut a = collection(20, 20);
        let mut b = collection(20, 20);
        let r = SplitRatio::new(0.5).unwrap();
        let da = shuffle_and_split(&mut a, r, &mut StdRng::seed_from_u64(42));
        let db = shuffle_and_split(&mut b, r, &mut StdRng::seed_from_u64(42));
        assert_eq!(da, db);
    }
}
