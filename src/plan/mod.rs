//! Opinion planning: from classified boxes to redaction instructions and
//! opinion spans.
//!
//! Planning runs in three steps: near-duplicate detections are filtered
//! out, the survivors are sorted into reading order, and a small state
//! machine walks the ordered stream matching captions to their end
//! markers. The state machine itself lives in [`state`] as a pure
//! transition function so every row of its transition table can be
//! tested without building documents.

mod filter;
mod planner;
mod state;

pub use filter::filter_overlapping;
pub use planner::OpinionPlanner;
pub use state::{PlanEvent, PlannerState, SpanTrackers};
