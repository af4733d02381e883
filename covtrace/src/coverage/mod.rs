//! The histogram core: bucket cells, bucket geometry, and series lifecycle.

mod bucket;
mod layout;
mod series;

pub use bucket::Bucket;
pub use layout::{BucketLayout, BucketMode, MAX_BANDS};
pub use series::CoverSeries;
