//! Line ending detection and status reconciliation for lineend.
//!
//! The tracker keeps the line ending state of the active buffer in sync with
//! a display collaborator:
//!
//! ```text
//! buffer edit ─→ Subscription ─→ classify ─→ RescanScheduler ─→ full scan ─→ display
//!                                  │ (Ignore)
//!                                  └─→ nothing to do
//! ```
//!
//! Full scans only run when an edit could change which styles are present.

mod debounce;
mod reaction;
mod scan;
mod tracker;

pub use debounce::RescanScheduler;
pub use reaction::{classify, Reaction};
pub use scan::{compute_line_endings, convert, normalize_line_endings};
pub use tracker::{LineEndingDisplay, LineEndingTracker, TrackerSettings};
