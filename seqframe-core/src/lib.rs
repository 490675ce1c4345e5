//! Lazily-evaluated indexed series and data frames
//!
//! This crate provides a small family of restartable sequence descriptors
//! (counting, materialized, pair-zip, projection, skip, take, filter and
//! element-extract) and the two entities built from them: [`Series`], an
//! ordered run of values paired one-to-one with index keys, and
//! [`DataFrame`], the same over whole rows plus column names.
//!
//! Transformations compose descriptors instead of copying data. A pipeline
//! runs only when a pass is pulled, can be pulled any number of times, and
//! can be forced into concrete storage with `bake`.

#![warn(missing_docs)]

pub mod config;
pub mod dataframe;
pub mod error;
pub mod format;
pub mod index;
pub mod record;
pub mod series;
pub mod slice;
pub mod source;
pub mod transform;
pub mod zip;

use static_assertions::assert_impl_all;

// Re-export key types for convenience
pub use config::{DataFrameConfig, SeriesConfig, SeriesSource};
pub use dataframe::DataFrame;
pub use error::{Error, Result};
pub use format::FormatOptions;
pub use index::Index;
pub use record::Record;
pub use series::Series;
pub use source::{
    CountingSequence, Element, IntoSequence, MaterializedSequence, Ordinal, Pass,
    RestartableSequence, SeqRef,
};

/// The sequence adapters in one place
pub mod sequence {
    pub use crate::slice::{SkipSequence, TakeSequence};
    pub use crate::source::{CountingSequence, MaterializedSequence, RestartableSequence};
    pub use crate::transform::{FilterSequence, ProjectionSequence};
    pub use crate::zip::{ElementExtractSequence, PairZipSequence, TupleSlot};
}

assert_impl_all!(Series<usize, String>: Send, Sync, Clone);
assert_impl_all!(DataFrame<String, serde_json::Value>: Send, Sync, Clone);
assert_impl_all!(Index<usize>: Send, Sync, Clone);
assert_impl_all!(zip::PairZipSequence<usize, String>: Send, Sync);
