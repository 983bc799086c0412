//! Script configuration: what to type, when, and how to post-process.
//!
//! A script is one in-memory schema with three interchangeable
//! serialization front-ends (TOML, JSON, YAML). The session runner
//! (see [`crate::runner`]) executes its actions; the filter list feeds
//! the post-processing chain.

pub mod action;
pub mod definition;
pub mod file;

pub use action::{Action, TypedAction};
pub use definition::{DelayRange, Script};
pub use file::ScriptFormat;
