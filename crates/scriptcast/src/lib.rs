//! scriptcast: scripted asciinema recordings with cast post-processing
//!
//! This crate records terminal sessions by driving `asciinema rec` from a
//! script of typed lines, markers, and status-bar comments, then
//! post-processes the resulting asciicast v2 file: out-of-band events are
//! merged into the stream chronologically and a configurable filter chain
//! trims and rewrites the recording.
//!
//! The cast pipeline is value-oriented and synchronous: parsing, merging,
//! filtering, and serializing are pure transformations between immutable
//! snapshots, with I/O only at the load/save boundary.
//!
//! # Example
//!
//! ```no_run
//! use scriptcast::{Script, ScriptRunner};
//!
//! fn main() -> scriptcast::Result<()> {
//!     let script = Script::load("demo.toml")?;
//!     ScriptRunner::new().run(&script)?;
//!     Ok(())
//! }
//! ```

// Core types
pub mod cast;
pub mod error;

// Pipeline stages
pub mod filter;
pub mod report;

// Scripted sessions
pub mod runner;
pub mod script;

pub use cast::{AsciiCast, Event, EventRecord, FORMAT_VERSION, Header, Theme, read_cast, write_cast};
pub use error::{ConfigError, ContractError, FormatError, Result, ScriptcastError};
pub use filter::{
    CommentFilter, EndMarkerFilter, EventFilter, FilterChain, FilterSpec, RegexReplacementFilter,
    StartMarkerFilter,
};
pub use report::{marker_links, marker_md_list};
pub use runner::{ScriptRunner, post_process};
pub use script::{Action, DelayRange, Script, ScriptFormat, TypedAction};
