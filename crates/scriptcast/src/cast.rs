//! The asciicast v2 data model and event pipeline.
//!
//! A cast is a header plus a time-ordered event stream. Casts are parsed
//! from and serialized to the line-oriented wire format, enriched with
//! late-bound events via a stable chronological merge, and transformed by
//! filter chains (see [`crate::filter`]).

pub mod codec;
pub mod event;
pub mod header;
pub mod stream;

pub use codec::{read_cast, write_cast};
pub use event::{Event, EventRecord};
pub use header::{FORMAT_VERSION, Header, Theme};
pub use stream::AsciiCast;
