use std::rc::Rc;

use crate::{
    types::{Name, SimTime},
    value::{Sample, ValueSource},
};

use super::{Bucket, BucketLayout};

/// One tracked value: its bucket geometry, histogram cells, and the cached
/// last observation that change detection runs against.
///
/// Dwell-time is attributed to the bucket the value is leaving, not the one
/// it is entering. The last bucket entered before teardown therefore never
/// records its final, partial dwell: there is no closing transition for it.
pub struct CoverSeries {
    name: Name,
    source: Rc<dyn ValueSource>,
    per_value_requested: bool,
    layout: Option<BucketLayout>,
    buckets: Vec<Bucket>,
    transitions: u64,
    current_bucket: usize,
    last_sample: Sample,
    last_change: SimTime,
}

impl CoverSeries {
    pub(crate) fn new(name: Name, source: Rc<dyn ValueSource>, per_value_requested: bool) -> Self {
        let last_sample = source.sample();
        CoverSeries {
            name,
            source,
            per_value_requested,
            layout: None,
            buckets: Vec::new(),
            transitions: 0,
            current_bucket: 0,
            last_sample,
            last_change: SimTime::ZERO,
        }
    }

    /// Fixes the bucket geometry and takes the baseline observation. Called
    /// exactly once by the owning registry, before any update. The bucket
    /// holding the initial value becomes the current bucket, so the first
    /// dwell is attributed where the signal actually started.
    pub(crate) fn initialize(&mut self) {
        let layout = BucketLayout::resolve(self.source.kind(), self.per_value_requested);
        self.buckets = vec![Bucket::default(); layout.num_buckets()];
        self.last_sample = self.source.sample();
        self.current_bucket = layout.index_of(&self.last_sample);
        self.layout = Some(layout);
    }

    /// True when the bound value no longer matches the last observation.
    pub fn changed(&self) -> bool {
        self.source.sample() != self.last_sample
    }

    /// Samples the bound value at time `now`.
    ///
    /// An unchanged value is a strict no-op: no bucket moves, no transition
    /// is counted, no timestamp changes. A changed value closes out the
    /// dwell in the bucket being left and opens the bucket the new value
    /// selects.
    pub(crate) fn update(&mut self, now: SimTime) {
        let sample = self.source.sample();
        if sample == self.last_sample {
            return;
        }
        let layout = self.layout.expect("series updated before initialization");
        self.buckets[self.current_bucket].record(now - self.last_change);
        self.current_bucket = layout.index_of(&sample);
        self.last_change = now;
        self.last_sample = sample;
        self.transitions += 1;
    }

    /// One report row: `name,transitions,count;min;max;total,…` in
    /// bucket-index order.
    pub fn report(&self) -> String {
        use std::fmt::Write;

        let mut row = format!("{},{}", self.name, self.transitions);
        for bucket in &self.buckets {
            write!(row, ",{bucket}").expect("writing to a String cannot fail");
        }
        row
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Total transitions observed across all buckets.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Number of buckets; zero before initialization.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Visit count of one bucket. Out-of-range indexes read as zero.
    pub fn bucket_hits(&self, index: usize) -> u64 {
        self.buckets.get(index).map(Bucket::count).unwrap_or(0)
    }

    /// One bucket's accumulated statistics.
    pub fn bucket(&self, index: usize) -> Option<&Bucket> {
        self.buckets.get(index)
    }
}
