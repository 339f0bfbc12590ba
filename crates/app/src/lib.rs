//! Line ending selector for lineend.
//!
//! Connects the host editor to the line ending tracker:
//! - `Command` - the named commands the host registers
//! - `LineEndingSelector` - active item observation, status tile, picker
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    lineend (bin)                      │
//! │  main.rs - CLI, terminal setup, event loop            │
//! └──────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌──────────────────────────────────────────────────────┐
//! │                lineend-app (this crate)               │
//! │  LineEndingSelector, Command                          │
//! └──────────────────────────────────────────────────────┘
//!            │                 │                 │
//!            ▼                 ▼                 ▼
//!     ┌────────────┐   ┌────────────┐    ┌────────────┐
//!     │  tracker   │   │     ui     │    │   config   │
//!     └────────────┘   └────────────┘    └────────────┘
//! ```

pub mod command;
mod selector;

pub use command::Command;
pub use selector::LineEndingSelector;
