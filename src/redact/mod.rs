//! Redaction geometry: mapping instructions onto concrete page regions
//! and driving the document engine.
//!
//! The pure half ([`PageFrame`]) derives column- and header/footer-aware
//! rectangles for one page; the impure half ([`Redactor`]) stages those
//! rectangles on a [`crate::engine::RedactableDocument`] and commits each
//! page exactly once.

mod geometry;
mod redactor;

pub use geometry::PageFrame;
pub use redactor::Redactor;
