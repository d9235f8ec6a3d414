//! Opinion extraction: one masked sub-document per detected opinion.

mod splitter;

pub use splitter::{BoundaryMaps, OpinionSplitter};
